//! In-memory registry of live sessions.
//!
//! One record per active channel, keyed by channel name. The registry is an
//! owned object: construct it once and hand a shared reference to every
//! caller, rather than reaching for module-level state.
//!
//! # Concurrency
//!
//! The table is a `RwLock<HashMap<_, Mutex<LiveSession>>>`. A mutation
//! holds the map read guard plus the per-entry mutex for its whole
//! read-modify-write, so:
//!
//! - two mutations of the same channel serialize on the entry mutex and
//!   neither update is lost;
//! - mutations of different channels share the read guard and proceed
//!   concurrently;
//! - `start` and `end` take the write guard, so a mutation racing an `end`
//!   either completes before the removal or observes the channel as gone,
//!   never a partially applied record.
//!
//! No operation performs I/O or holds a lock across anything unbounded.

use std::collections::{HashMap, VecDeque};

use chrono::Utc;
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, info};

use crate::errors::RegistryError;
use crate::models::{Comment, LiveSession, NewSession, SessionSummary, ViewerDirection};
use crate::observability::metrics::{
    record_comment_appended, record_like, record_session_ended, record_session_started,
};

/// Maximum number of comments retained per session. Appending past the cap
/// evicts the oldest entries until exactly this many remain.
pub const COMMENT_LOG_CAPACITY: usize = 50;

/// Owner id recorded when a start request does not carry one.
const DEFAULT_OWNER_ID: &str = "anonymous";

/// Title recorded when a start request does not carry one.
const DEFAULT_TITLE: &str = "Live Stream";

/// Registry of all live sessions, keyed by channel name.
#[derive(Default)]
pub struct SessionRegistry {
    sessions: RwLock<HashMap<String, Mutex<LiveSession>>>,
}

impl SessionRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a live session on a channel.
    ///
    /// Starting on a channel that already has a live session replaces the
    /// existing record: last start wins, and the prior record's counters
    /// and comments are discarded.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` if the channel name or owner display name is
    /// empty.
    pub async fn start(&self, new_session: NewSession) -> Result<LiveSession, RegistryError> {
        if new_session.channel_name.is_empty() {
            return Err(RegistryError::InvalidInput(
                "channel_name is required".to_string(),
            ));
        }
        if new_session.owner_display_name.is_empty() {
            return Err(RegistryError::InvalidInput(
                "owner_display_name is required".to_string(),
            ));
        }

        let session = LiveSession {
            channel_name: new_session.channel_name,
            owner_id: new_session
                .owner_id
                .unwrap_or_else(|| DEFAULT_OWNER_ID.to_string()),
            owner_display_name: new_session.owner_display_name,
            title: new_session
                .title
                .unwrap_or_else(|| DEFAULT_TITLE.to_string()),
            thumbnail_ref: new_session.thumbnail_ref.unwrap_or_default(),
            viewer_count: 0,
            like_count: 0,
            comments: VecDeque::new(),
            started_at: Utc::now(),
            is_live: true,
        };

        let replaced = {
            let mut sessions = self.sessions.write().await;
            sessions
                .insert(session.channel_name.clone(), Mutex::new(session.clone()))
                .is_some()
        };

        record_session_started(if replaced { "replaced" } else { "new" });
        info!(
            target: "registry.session",
            channel = %session.channel_name,
            owner = %session.owner_display_name,
            replaced,
            "live session started"
        );

        Ok(session)
    }

    /// End a live session, removing its record entirely.
    ///
    /// # Errors
    ///
    /// Returns `SessionNotFound` if the channel has no live session,
    /// including when it was already ended by a concurrent call.
    pub async fn end(&self, channel_name: &str) -> Result<SessionSummary, RegistryError> {
        let entry = {
            let mut sessions = self.sessions.write().await;
            sessions.remove(channel_name)
        };
        let entry =
            entry.ok_or_else(|| RegistryError::SessionNotFound(channel_name.to_string()))?;

        let session = entry.into_inner();
        let elapsed = Utc::now().signed_duration_since(session.started_at);
        let duration_ms = u64::try_from(elapsed.num_milliseconds()).unwrap_or(0);

        record_session_ended();
        info!(
            target: "registry.session",
            channel = %channel_name,
            duration_ms,
            final_viewer_count = session.viewer_count,
            "live session ended"
        );

        Ok(SessionSummary {
            duration_ms,
            final_viewer_count: session.viewer_count,
        })
    }

    /// Adjust the viewer count by one in either direction.
    ///
    /// Decrements clamp at zero; a stray extra leave never drives the count
    /// negative.
    ///
    /// # Errors
    ///
    /// Returns `SessionNotFound` if the channel has no live session.
    pub async fn adjust_viewers(
        &self,
        channel_name: &str,
        direction: ViewerDirection,
    ) -> Result<u32, RegistryError> {
        let count = self
            .with_session(channel_name, |session| {
                session.viewer_count = match direction {
                    ViewerDirection::Increment => session.viewer_count.saturating_add(1),
                    ViewerDirection::Decrement => session.viewer_count.saturating_sub(1),
                };
                session.viewer_count
            })
            .await?;

        debug!(
            target: "registry.session",
            channel = %channel_name,
            direction = direction.as_str(),
            viewer_count = count,
            "adjusted viewer count"
        );

        Ok(count)
    }

    /// Increment the like counter.
    ///
    /// # Errors
    ///
    /// Returns `SessionNotFound` if the channel has no live session.
    pub async fn like(&self, channel_name: &str) -> Result<u64, RegistryError> {
        let likes = self
            .with_session(channel_name, |session| {
                session.like_count = session.like_count.saturating_add(1);
                session.like_count
            })
            .await?;

        record_like();
        Ok(likes)
    }

    /// Append a comment, evicting the oldest entries past the cap.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` if the author name or text is empty, and
    /// `SessionNotFound` if the channel has no live session. Validation
    /// happens before the record is touched.
    pub async fn add_comment(
        &self,
        channel_name: &str,
        author_name: &str,
        text: &str,
    ) -> Result<Comment, RegistryError> {
        if author_name.is_empty() || text.is_empty() {
            return Err(RegistryError::InvalidInput(
                "author_name and text are required".to_string(),
            ));
        }

        let created_at = Utc::now();
        let comment = Comment {
            id: created_at.timestamp_millis().to_string(),
            author_name: author_name.to_string(),
            text: text.to_string(),
            created_at,
        };

        let (comment, evicted) = self
            .with_session(channel_name, move |session| {
                session.comments.push_back(comment.clone());
                let mut evicted = 0u64;
                while session.comments.len() > COMMENT_LOG_CAPACITY {
                    session.comments.pop_front();
                    evicted += 1;
                }
                (comment, evicted)
            })
            .await?;

        record_comment_appended(evicted);
        debug!(
            target: "registry.session",
            channel = %channel_name,
            evicted,
            "comment appended"
        );

        Ok(comment)
    }

    /// The comment log in append order, newest last.
    ///
    /// # Errors
    ///
    /// Returns `SessionNotFound` if the channel has no live session.
    pub async fn comments(&self, channel_name: &str) -> Result<Vec<Comment>, RegistryError> {
        self.with_session(channel_name, |session| {
            session.comments.iter().cloned().collect()
        })
        .await
    }

    /// A point-in-time clone of one session record.
    ///
    /// # Errors
    ///
    /// Returns `SessionNotFound` if the channel has no live session.
    pub async fn get(&self, channel_name: &str) -> Result<LiveSession, RegistryError> {
        self.with_session(channel_name, |session| session.clone())
            .await
    }

    /// A consistent snapshot of all live sessions, most recently started
    /// first. Ties are broken by channel name so repeated calls over
    /// unchanged state return a stable order.
    pub async fn list_active(&self) -> Vec<LiveSession> {
        let sessions = self.sessions.read().await;
        let mut snapshot = Vec::with_capacity(sessions.len());
        for entry in sessions.values() {
            snapshot.push(entry.lock().await.clone());
        }
        drop(sessions);

        snapshot.sort_by(|a, b| {
            b.started_at
                .cmp(&a.started_at)
                .then_with(|| a.channel_name.cmp(&b.channel_name))
        });
        snapshot
    }

    /// Number of currently live channels.
    pub async fn active_count(&self) -> usize {
        self.sessions.read().await.len()
    }

    /// Run a closure against one session under its entry lock.
    ///
    /// The map read guard stays held across the mutation so a racing `end`
    /// (which needs the write guard) cannot interleave between lookup and
    /// update.
    async fn with_session<T>(
        &self,
        channel_name: &str,
        op: impl FnOnce(&mut LiveSession) -> T,
    ) -> Result<T, RegistryError> {
        let sessions = self.sessions.read().await;
        let entry = sessions
            .get(channel_name)
            .ok_or_else(|| RegistryError::SessionNotFound(channel_name.to_string()))?;
        let mut session = entry.lock().await;
        Ok(op(&mut session))
    }
}
