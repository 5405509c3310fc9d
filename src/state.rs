use std::sync::Arc;
use crate::external::price_provider::PriceAggregatesProvider;
use crate::external::trends_provider::TrendsProvider;

#[derive(Clone)]
pub struct AppState {
    pub price_provider: Arc<dyn PriceAggregatesProvider>,
    pub trends_provider: Arc<dyn TrendsProvider>,
}
