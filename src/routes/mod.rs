pub(crate) mod health;
pub(crate) mod stock_prices;
pub(crate) mod google_trends;
