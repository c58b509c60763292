use crate::catalog::Catalog;
use crate::models::{Position, RiskItem, RiskLevel, RiskReport, TopTheme};
use crate::services::keyword_service::{portfolio_themes, position_weights};

const SINGLE_WEIGHT_HIGH: f64 = 0.45;
const SINGLE_WEIGHT_MEDIUM: f64 = 0.30;
const THEME_WEIGHT_HIGH: f64 = 0.80;
const THEME_WEIGHT_MEDIUM: f64 = 0.60;
const PNL_HIGH: f64 = -15.0;
const PNL_MEDIUM: f64 = -8.0;

/// Grade portfolio risk from concentration and drawdown signals.
///
/// Three independent checks each raise at most one flag: largest single
/// position weight, largest theme weight, and worst reported pnl%. The
/// overall level is the worst flag raised; the suggested exposure follows
/// from the level. An empty portfolio grades low with no flags.
pub fn grade_risk(catalog: &Catalog, positions: &[Position]) -> RiskReport {
    if positions.is_empty() {
        return RiskReport {
            risk_level: RiskLevel::Low,
            suggested_exposure: RiskLevel::Low.suggested_exposure(),
            top_theme: TopTheme {
                name: catalog.unidentified_theme.to_string(),
                pct: 0.0,
            },
            items: Vec::new(),
        };
    }

    let weights = position_weights(positions);
    let mut items: Vec<RiskItem> = Vec::new();

    // Single-position concentration
    let (max_idx, max_weight) = weights
        .iter()
        .copied()
        .enumerate()
        .fold((0, 0.0), |acc, (i, w)| if w > acc.1 { (i, w) } else { acc });
    let holder = &positions[max_idx].name;

    if let Some(level) = flag_level(max_weight, SINGLE_WEIGHT_HIGH, SINGLE_WEIGHT_MEDIUM) {
        items.push(RiskItem {
            level,
            title: "单一持仓集中".to_string(),
            detail: format!("{} 占组合 {:.0}%", holder, max_weight * 100.0),
        });
    }

    // Theme concentration
    let (themes, theme_weights) =
        portfolio_themes(catalog, positions, &weights, catalog.unidentified_theme);
    let top_name = themes[0].clone();
    let top_pct = theme_weights.get(&top_name).copied().unwrap_or(0.0);

    if let Some(level) = flag_level(top_pct, THEME_WEIGHT_HIGH, THEME_WEIGHT_MEDIUM) {
        items.push(RiskItem {
            level,
            title: "主题集中".to_string(),
            detail: format!("主题「{}」占组合 {:.0}%", top_name, top_pct * 100.0),
        });
    }

    // Drawdown on the worst reported position
    let worst_pnl = positions
        .iter()
        .filter_map(|p| p.pnl_pct)
        .fold(None::<f64>, |acc, pnl| {
            Some(acc.map_or(pnl, |worst| worst.min(pnl)))
        });

    if let Some(pnl) = worst_pnl {
        let level = if pnl <= PNL_HIGH {
            Some(RiskLevel::High)
        } else if pnl <= PNL_MEDIUM {
            Some(RiskLevel::Medium)
        } else {
            None
        };
        if let Some(level) = level {
            items.push(RiskItem {
                level,
                title: "持仓浮亏".to_string(),
                detail: format!("最差持仓收益 {:.1}%", pnl),
            });
        }
    }

    let risk_level = items
        .iter()
        .map(|item| item.level)
        .max()
        .unwrap_or(RiskLevel::Low);

    RiskReport {
        risk_level,
        suggested_exposure: risk_level.suggested_exposure(),
        top_theme: TopTheme {
            name: top_name,
            pct: top_pct,
        },
        items,
    }
}

fn flag_level(value: f64, high: f64, medium: f64) -> Option<RiskLevel> {
    if value >= high {
        Some(RiskLevel::High)
    } else if value >= medium {
        Some(RiskLevel::Medium)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::InstrumentKind;

    fn position(name: &str, mv: f64, pnl: Option<f64>) -> Position {
        Position {
            kind: InstrumentKind::CnFund,
            code: "000000".into(),
            name: name.into(),
            amount: None,
            mv: Some(mv),
            pnl_pct: pnl,
            theme: None,
        }
    }

    #[test]
    fn test_empty_portfolio_grades_low() {
        let catalog = Catalog::builtin();
        let report = grade_risk(&catalog, &[]);
        assert_eq!(report.risk_level, RiskLevel::Low);
        assert_eq!(report.suggested_exposure, 80);
        assert!(report.items.is_empty());
        assert_eq!(report.top_theme.name, "未识别");
        assert_eq!(report.top_theme.pct, 0.0);
    }

    #[test]
    fn test_ninety_ten_split_flags_high_concentration() {
        let catalog = Catalog::builtin();
        let positions = vec![
            position("A", 900.0, None),
            position("B", 100.0, None),
        ];
        let report = grade_risk(&catalog, &positions);

        let concentration = report
            .items
            .iter()
            .find(|item| item.title == "单一持仓集中")
            .expect("0.9 weight must flag");
        assert_eq!(concentration.level, RiskLevel::High);
        assert_eq!(report.risk_level, RiskLevel::High);
        assert_eq!(report.suggested_exposure, 60);
    }

    #[test]
    fn test_theme_concentration_uses_unidentified_fallback() {
        let catalog = Catalog::builtin();
        // Names match no theme tokens: everything lands in 未识别 at weight 1,
        // which exceeds the 0.80 theme threshold
        let positions = vec![
            position("组合X", 500.0, None),
            position("组合Y", 500.0, None),
        ];
        let report = grade_risk(&catalog, &positions);
        assert_eq!(report.top_theme.name, "未识别");
        assert_eq!(report.top_theme.pct, 1.0);
        assert!(report.items.iter().any(|i| i.title == "主题集中" && i.level == RiskLevel::High));
    }

    #[test]
    fn test_worst_pnl_thresholds() {
        let catalog = Catalog::builtin();
        let balanced = |pnl| {
            vec![
                position("半导体基金", 250.0, Some(pnl)),
                position("医药基金", 250.0, Some(1.0)),
                position("白酒消费基金", 250.0, Some(2.0)),
                position("军工基金", 250.0, Some(3.0)),
            ]
        };

        let high = grade_risk(&catalog, &balanced(-20.0));
        assert!(high.items.iter().any(|i| i.title == "持仓浮亏" && i.level == RiskLevel::High));

        let medium = grade_risk(&catalog, &balanced(-10.0));
        assert!(medium.items.iter().any(|i| i.title == "持仓浮亏" && i.level == RiskLevel::Medium));
        assert_eq!(medium.risk_level, RiskLevel::Medium);
        assert_eq!(medium.suggested_exposure, 70);

        let clean = grade_risk(&catalog, &balanced(-2.0));
        assert!(clean.items.iter().all(|i| i.title != "持仓浮亏"));
    }

    #[test]
    fn test_overall_level_is_worst_flag() {
        let catalog = Catalog::builtin();
        // 40% single weight -> medium concentration; -20% pnl -> high drawdown
        let positions = vec![
            position("半导体基金", 400.0, Some(-20.0)),
            position("医药基金", 300.0, None),
            position("白酒消费基金", 300.0, None),
        ];
        let report = grade_risk(&catalog, &positions);
        assert_eq!(report.risk_level, RiskLevel::High);
    }
}
