//! MetaExtract onboarding front-end
//!
//! Bootstrap (config, tracing, wiring) and the command handlers behind the
//! `metaextract` binary.

pub mod bootstrap;
pub mod commands;

pub use bootstrap::{resolve_config, wire_dependencies, AppRuntime};
pub use commands::{execute, Command, Target};
