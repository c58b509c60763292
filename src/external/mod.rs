pub mod daily_bar;
pub mod fund_nav;
pub mod market_data;
pub mod news_feed;
pub mod series_provider;
