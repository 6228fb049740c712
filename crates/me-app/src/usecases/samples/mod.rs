//! Sample file use cases.

pub mod recommend;

pub use recommend::{RecommendSamples, UsageCounts};
