//! Sample files shown during onboarding and the scorer that picks them.

pub mod catalog;
pub mod model;
pub mod scorer;

pub use catalog::{get_sample, sample_catalog};
pub use model::{Difficulty, Importance, MetadataHighlight, SampleFile, UserProfile};
pub use scorer::{rank, recommend, score, ScoredSample};
