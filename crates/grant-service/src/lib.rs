//! Channel Grant Service Library
//!
//! This library issues and verifies short-lived, role-scoped access
//! credentials for joining a real-time audio/video channel. A grant binds
//! an application id, a channel name, a subject uid, and a set of
//! per-privilege expiries into a single signed token that can be verified
//! statelessly by any holder of the signing secret.
//!
//! # Modules
//!
//! - `config` - Service configuration
//! - `crypto` - Canonical token encoding and HMAC signing
//! - `errors` - Error types
//! - `models` - Data models
//! - `observability` - Metrics definitions
//! - `services` - Business logic layer

pub mod config;
pub mod crypto;
pub mod errors;
pub mod models;
pub mod observability;
pub mod services;

// Re-export primary types
pub use config::GrantConfig;
pub use errors::GrantError;
pub use models::{GrantClaims, GrantRequest, IssuedGrant, Privilege, Role, Verdict};
pub use services::token_service::GrantIssuer;
