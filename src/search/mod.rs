pub mod aggregator;
pub mod matcher;
pub mod source;

pub use aggregator::{perform_search, SearchEnvelope, SearchLimits, SearchTotals};
pub use source::{PgSearchSource, SearchSource};
