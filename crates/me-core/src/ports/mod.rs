//! Port interfaces for the application layer
//!
//! Ports define the contract between the application logic (use cases)
//! and infrastructure implementations, keeping the onboarding engine
//! independent of where its state actually lives.

pub mod app_dirs;
mod clock;
pub mod errors;
pub mod storage;

pub use app_dirs::AppDirsPort;
pub use clock::*;
pub use errors::{AppDirsError, StorageError};
pub use storage::KeyValueStorePort;
