//! ID type wrappers for type safety.
//!
//! All ids are opaque strings on the wire (`#[serde(transparent)]`), so the
//! persisted JSON layout stays the same as plain string keys.

mod id_macro;

use id_macro::impl_id;
use serde::{Deserialize, Serialize};

/// Owner of an onboarding progress record.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(String);

/// Tutorial identifier, unique across all UI versions.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TutorialId(String);

/// Step identifier, unique within a tutorial.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StepId(String);

/// Feature flag unlocked through onboarding.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FeatureId(String);

/// Sample catalog entry identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SampleId(String);

impl_id!(UserId, TutorialId, StepId, FeatureId, SampleId);
