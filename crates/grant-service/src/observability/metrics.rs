//! Metrics definitions for the grant service.
//!
//! All metrics follow Prometheus naming conventions:
//! - `grant_` prefix for the grant service
//! - `_total` suffix for counters
//!
//! # Cardinality
//!
//! Labels are bounded to prevent cardinality explosion:
//! - `status`: 2 values (success, error)
//! - `verdict`: 3 values (valid, expired, bad_signature)

use metrics::counter;

/// Record a grant issuance outcome.
///
/// Metric: `grant_tokens_issued_total`
/// Labels: `status`
pub fn record_grant_issued(status: &str) {
    counter!("grant_tokens_issued_total", "status" => status.to_string()).increment(1);
}

/// Record a token verification verdict.
///
/// Metric: `grant_token_verifications_total`
/// Labels: `verdict`
pub fn record_token_verification(verdict: &str) {
    counter!("grant_token_verifications_total", "verdict" => verdict.to_string()).increment(1);
}
