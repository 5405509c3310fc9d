pub mod price_provider;
pub mod trends_provider;
pub mod polygon;
pub mod google_trends;
