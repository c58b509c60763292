pub mod health;
pub mod keywords;
pub mod market;
pub mod news;
pub mod risk;
