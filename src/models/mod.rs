mod indicators;
mod keywords;
mod news;
mod position;
mod price_point;
mod radar;
pub mod risk;

pub use indicators::{IndicatorSnapshot, IndicatorsOutcome, Trend};
pub use keywords::{KeywordBuckets, KeywordPlan};
pub use news::{FeedDiagnostic, NewsDigest, NewsItem, RawNewsItem, Sentiment};
pub use position::{InstrumentKind, Position};
pub use price_point::PricePoint;
pub use radar::{ProxyRating, ProxySpec};
pub use risk::{RiskItem, RiskLevel, RiskReport, TopTheme};
