use async_trait::async_trait;

use crate::external::price_provider::UpstreamError;
use crate::models::{DateRange, InterestPoint};

/// Source of relative search interest for a single keyword.
#[async_trait]
pub trait TrendsProvider: Send + Sync {
    /// An empty vector means the backend had no data for the keyword.
    async fn interest_over_time(
        &self,
        keyword: &str,
        range: &DateRange,
    ) -> Result<Vec<InterestPoint>, UpstreamError>;
}
