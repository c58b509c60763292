pub mod indicators;
pub mod keyword_service;
pub mod news_service;
pub mod normalizer;
pub mod radar_service;
pub mod risk_service;
pub mod themes;
