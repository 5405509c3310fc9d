pub mod price_service;
pub mod trends_service;
