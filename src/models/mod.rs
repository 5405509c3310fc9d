mod ticker;
mod trends;
pub mod date_range;

pub use ticker::Ticker;
pub use trends::{to_interest_series, InterestPoint, TrendsResponse};
pub use date_range::DateRange;
