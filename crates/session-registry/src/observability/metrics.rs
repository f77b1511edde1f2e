//! Metrics definitions for the session registry.
//!
//! All metrics follow Prometheus naming conventions:
//! - `registry_` prefix for the session registry
//! - `_total` suffix for counters
//!
//! # Cardinality
//!
//! Labels are bounded to prevent cardinality explosion:
//! - `mode`: 2 values (new, replaced)
//!
//! Channel names are never used as labels.

use metrics::counter;

/// Record a session start.
///
/// Metric: `registry_sessions_started_total`
/// Labels: `mode` (new, replaced)
pub fn record_session_started(mode: &str) {
    counter!("registry_sessions_started_total", "mode" => mode.to_string()).increment(1);
}

/// Record a session end.
///
/// Metric: `registry_sessions_ended_total`
pub fn record_session_ended() {
    counter!("registry_sessions_ended_total").increment(1);
}

/// Record a like.
///
/// Metric: `registry_session_likes_total`
pub fn record_like() {
    counter!("registry_session_likes_total").increment(1);
}

/// Record an appended comment and any evictions it forced.
///
/// Metrics: `registry_session_comments_total`,
/// `registry_session_comments_evicted_total`
pub fn record_comment_appended(evicted: u64) {
    counter!("registry_session_comments_total").increment(1);
    if evicted > 0 {
        counter!("registry_session_comments_evicted_total").increment(evicted);
    }
}
