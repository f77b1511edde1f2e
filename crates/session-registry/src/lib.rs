//! Live Session Registry Library
//!
//! This library tracks the live lifecycle state of broadcast sessions: one
//! in-memory record per active channel holding viewer counts, likes, and a
//! bounded comment log. Every mutation is atomic with respect to other
//! operations on the same channel; operations on different channels do not
//! serialize against each other.
//!
//! Persistence is deliberately absent: a registry lives exactly as long as
//! the process that owns it.
//!
//! # Modules
//!
//! - `errors` - Error types
//! - `models` - Data models
//! - `observability` - Metrics definitions
//! - `registry` - The session registry itself

pub mod errors;
pub mod models;
pub mod observability;
pub mod registry;

// Re-export primary types
pub use errors::RegistryError;
pub use models::{Comment, LiveSession, NewSession, SessionSummary, ViewerDirection};
pub use registry::{SessionRegistry, COMMENT_LOG_CAPACITY};
