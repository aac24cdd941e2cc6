// Review ordering, pagination, and course rating reconciliation
pub mod aggregator;

pub use aggregator::{paginate, sort_reviews, ReviewAggregator, SortPolicy};
