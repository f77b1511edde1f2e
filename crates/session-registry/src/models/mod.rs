//! Session registry models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// A single chat message attached to a live session.
///
/// Immutable once created. The id is derived from the creation timestamp
/// and exists for display purposes only; it is not a uniqueness key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    /// Creation timestamp in milliseconds, as a string.
    pub id: String,

    /// Display name of the author.
    pub author_name: String,

    /// Comment body.
    pub text: String,

    /// When the comment was appended.
    pub created_at: DateTime<Utc>,
}

/// Live lifecycle record for one broadcasting channel.
///
/// Owned exclusively by the registry; callers only ever see point-in-time
/// clones.
#[derive(Debug, Clone, Serialize)]
pub struct LiveSession {
    /// Channel this session broadcasts on (registry key).
    pub channel_name: String,

    /// Identifier of the broadcaster.
    pub owner_id: String,

    /// Display name of the broadcaster.
    pub owner_display_name: String,

    /// Session title.
    pub title: String,

    /// Reference to a thumbnail image (opaque to the registry).
    pub thumbnail_ref: String,

    /// Current viewer count; never negative.
    pub viewer_count: u32,

    /// Accumulated likes; monotonically increasing.
    pub like_count: u64,

    /// Most recent comments in append order, oldest first, capped at
    /// [`crate::registry::COMMENT_LOG_CAPACITY`].
    pub comments: VecDeque<Comment>,

    /// When the session started.
    pub started_at: DateTime<Utc>,

    /// True for the whole lifetime of the record; ended sessions are
    /// removed rather than flagged.
    pub is_live: bool,
}

/// Parameters for starting a live session.
#[derive(Debug, Clone, Deserialize)]
pub struct NewSession {
    /// Channel to broadcast on. Required, non-empty.
    pub channel_name: String,

    /// Identifier of the broadcaster; defaults to "anonymous".
    #[serde(default)]
    pub owner_id: Option<String>,

    /// Display name of the broadcaster. Required, non-empty.
    pub owner_display_name: String,

    /// Session title; defaults to "Live Stream".
    #[serde(default)]
    pub title: Option<String>,

    /// Thumbnail reference; defaults to empty.
    #[serde(default)]
    pub thumbnail_ref: Option<String>,
}

/// Result of ending a live session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SessionSummary {
    /// How long the session was live, in milliseconds.
    pub duration_ms: u64,

    /// Viewer count at the moment of removal.
    pub final_viewer_count: u32,
}

/// Direction of a viewer-count adjustment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewerDirection {
    /// A viewer joined.
    Increment,

    /// A viewer left.
    Decrement,
}

impl ViewerDirection {
    /// Returns the string representation of the direction.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            ViewerDirection::Increment => "increment",
            ViewerDirection::Decrement => "decrement",
        }
    }
}
