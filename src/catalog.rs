use regex::Regex;

use crate::models::{InstrumentKind, ProxySpec};

/// One market theme: detection tokens plus the search keywords the planner
/// expands it into. Tokens are matched as case-folded substrings, never
/// word-boundary tokenized, so partial matches across CJK/Latin text are
/// intentional.
#[derive(Debug, Clone)]
pub struct ThemeSpec {
    pub name: &'static str,
    pub tokens: &'static [&'static str],
    pub keywords: &'static [&'static str],
}

/// A precision regex over position names that injects an instrument-level
/// search keyword.
#[derive(Debug)]
pub struct InstrumentMatcher {
    pub pattern: Regex,
    pub keyword: &'static str,
}

/// Immutable lookup tables built once at startup and shared by reference.
#[derive(Debug)]
pub struct Catalog {
    pub themes: Vec<ThemeSpec>,
    /// Theme used when no position matches any token
    pub fallback_theme: &'static str,
    /// Theme name reported by the risk grader when nothing is identified
    pub unidentified_theme: &'static str,
    /// Always-on market-level search terms
    pub macro_keywords: &'static [&'static str],
    /// Broad, low-signal keywords whose weight contribution is discounted
    pub broad_terms: &'static [&'static str],
    pub instrument_matchers: Vec<InstrumentMatcher>,
    pub proxy_universe: Vec<ProxySpec>,
    pub bullish_words: &'static [&'static str],
    pub bearish_words: &'static [&'static str],
    pub finance_signal: Regex,
    pub tabloid_signal: Regex,
}

const THEMES: &[ThemeSpec] = &[
    ThemeSpec {
        name: "半导体",
        tokens: &["半导体", "芯片", "集成电路", "晶圆", "semiconductor", "chip"],
        keywords: &["半导体 行业", "芯片 国产替代", "半导体 景气度"],
    },
    ThemeSpec {
        name: "人工智能",
        tokens: &["人工智能", "智能", "算力", "大模型", "机器人", " ai", "ai "],
        keywords: &["AI 产业", "算力 需求", "大模型 应用"],
    },
    ThemeSpec {
        name: "新能源",
        tokens: &["新能源", "光伏", "锂电", "储能", "电池", "风电", "solar"],
        keywords: &["新能源 政策", "光伏 装机", "锂电池 产业链"],
    },
    ThemeSpec {
        name: "医药",
        tokens: &["医药", "医疗", "生物", "创新药", "疫苗", "pharma", "biotech"],
        keywords: &["创新药 审批", "医药 集采", "医疗 行业"],
    },
    ThemeSpec {
        name: "消费",
        tokens: &["白酒", "消费", "食品", "饮料", "零售"],
        keywords: &["白酒 动销", "消费 复苏", "食品饮料 业绩"],
    },
    ThemeSpec {
        name: "军工",
        tokens: &["军工", "国防", "航天", "航空", "defense"],
        keywords: &["军工 订单", "国防 预算"],
    },
    ThemeSpec {
        name: "金融地产",
        tokens: &["银行", "证券", "券商", "保险", "金融", "地产", "房地产"],
        keywords: &["银行 息差", "券商 业绩", "地产 政策"],
    },
    ThemeSpec {
        name: "美股核心",
        tokens: &[
            "标普", "s&p", "sp500", "spy", "纳斯达克", "纳指", "nasdaq", "qqq",
            "道琼斯", "dow", "美股",
        ],
        keywords: &["美股 走势", "标普500", "纳斯达克 科技股", "美联储 利率"],
    },
    ThemeSpec {
        name: "港股科技",
        tokens: &["恒生", "港股", "hang seng", "hstech", "互联网"],
        keywords: &["港股 科技", "恒生科技 指数"],
    },
    ThemeSpec {
        name: "黄金资源",
        tokens: &["黄金", "贵金属", "有色", "原油", "资源", "gold", "oil"],
        keywords: &["黄金 避险", "原油 价格", "有色金属"],
    },
    // Detection never hits this one (no tokens); it only exists so the
    // fallback theme expands into keywords like any other.
    ThemeSpec {
        name: "大盘综合",
        tokens: &[],
        keywords: &["大盘 走势", "市场 资金面"],
    },
];

const MACRO_KEYWORDS: &[&str] = &["美联储 利率", "CPI 通胀", "A股 市场", "央行 政策", "经济 数据"];

const BROAD_TERMS: &[&str] = &["a股 市场", "经济 数据", "大盘 走势", "市场 资金面", "医疗 行业"];

const BULLISH_WORDS: &[&str] = &[
    "大涨", "涨停", "反弹", "利好", "回暖", "增持", "超预期", "突破", "创新高",
    "rally", "surge", "beat", "upgrade",
];

const BEARISH_WORDS: &[&str] = &[
    "大跌", "跌停", "利空", "下挫", "暴跌", "回落", "减持", "不及预期", "亏损",
    "slump", "plunge", "miss", "downgrade",
];

impl Catalog {
    pub fn builtin() -> Self {
        let instrument_matchers = vec![
            matcher(r"(?i)标普\s*500|s&p\s*500|spy", "标普500 指数"),
            matcher(r"(?i)纳斯达克|纳指|nasdaq\s*100|qqq", "纳斯达克100 ETF"),
            matcher(r"(?i)沪深\s*300", "沪深300 指数"),
            matcher(r"(?i)中证\s*500", "中证500 指数"),
            matcher(r"(?i)科创\s*50", "科创50 指数"),
            matcher(r"(?i)恒生科技|hstech", "恒生科技 指数"),
            matcher(r"(?i)黄金\s*etf|gold\s*etf", "黄金 ETF"),
        ];

        let proxy_universe = vec![
            ProxySpec::new("沪深300", "110020", InstrumentKind::CnFund),
            ProxySpec::new("中证500", "161017", InstrumentKind::CnFund),
            ProxySpec::new("创业板", "110026", InstrumentKind::CnFund),
            ProxySpec::new("纳斯达克100", "270042", InstrumentKind::CnFund),
            ProxySpec::new("标普500", "050025", InstrumentKind::CnFund),
            ProxySpec::new("黄金", "000216", InstrumentKind::CnFund),
            ProxySpec::new("SPY", "SPY", InstrumentKind::UsTicker),
            ProxySpec::new("QQQ", "QQQ", InstrumentKind::UsTicker),
        ];

        Self {
            themes: THEMES.to_vec(),
            fallback_theme: "大盘综合",
            unidentified_theme: "未识别",
            macro_keywords: MACRO_KEYWORDS,
            broad_terms: BROAD_TERMS,
            instrument_matchers,
            proxy_universe,
            bullish_words: BULLISH_WORDS,
            bearish_words: BEARISH_WORDS,
            finance_signal: Regex::new(
                r"(?i)财报|业绩|营收|净利|增长|加息|降息|美联储|央行|gdp|cpi|pmi|earnings|revenue|guidance",
            )
            .expect("finance signal pattern is valid"),
            tabloid_signal: Regex::new(r"(?i)八卦|绯闻|明星|娱乐圈|网红|离婚|gossip|celebrity")
                .expect("tabloid pattern is valid"),
        }
    }

    /// Keywords a theme expands into, or the empty slice for unknown names.
    pub fn theme_keywords(&self, theme: &str) -> &'static [&'static str] {
        self.themes
            .iter()
            .find(|spec| spec.name == theme)
            .map(|spec| spec.keywords)
            .unwrap_or(&[])
    }

    pub fn is_broad_term(&self, keyword: &str) -> bool {
        let folded = keyword.to_lowercase();
        self.broad_terms.iter().any(|term| *term == folded)
    }
}

fn matcher(pattern: &str, keyword: &'static str) -> InstrumentMatcher {
    InstrumentMatcher {
        pattern: Regex::new(pattern).expect("instrument pattern is valid"),
        keyword,
    }
}
