//! Domain layer for webforge.
//!
//! Holds the conversation and credential models, the closed error taxonomy,
//! the artifact merge rules, and the traits that the infrastructure layer
//! implements (document stores, credential vault, generation collaborator,
//! session-history log).

pub mod config;
pub mod conversation;
pub mod credential;
pub mod error;
pub mod generation;

// Re-export common error type
pub use error::{Result, WebforgeError};
