//! Adapters layered over core ports.

pub mod json_storage;

pub use json_storage::JsonStorage;
