//! # askai_core
//!
//! Core domain logic for askai: the structure registry, the upstream
//! assistants client, the run poll policy and the ask flow tying them
//! together.

pub mod ask;
pub mod assistants;
pub mod error;
pub mod poll;
pub mod registry;

pub use ask::AskService;
pub use error::AskError;

/// Returns the crate version.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
