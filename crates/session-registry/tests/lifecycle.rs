//! Session lifecycle flows exercised through the public API.

use anyhow::Result;
use session_registry::{
    NewSession, RegistryError, SessionRegistry, ViewerDirection, COMMENT_LOG_CAPACITY,
};
use std::time::Duration;

fn new_session(channel: &str) -> NewSession {
    NewSession {
        channel_name: channel.to_string(),
        owner_id: Some("u-1".to_string()),
        owner_display_name: "Ada".to_string(),
        title: Some("Launch Day".to_string()),
        thumbnail_ref: Some("thumb/launch.png".to_string()),
    }
}

#[tokio::test]
async fn full_lifecycle_from_start_to_end() -> Result<()> {
    let registry = SessionRegistry::new();

    let started = registry.start(new_session("launch-day")).await?;
    assert!(started.is_live);
    assert_eq!(started.thumbnail_ref, "thumb/launch.png");

    registry
        .adjust_viewers("launch-day", ViewerDirection::Increment)
        .await?;
    registry
        .adjust_viewers("launch-day", ViewerDirection::Increment)
        .await?;
    registry.like("launch-day").await?;
    registry.add_comment("launch-day", "Bea", "hello!").await?;

    let session = registry.get("launch-day").await?;
    assert_eq!(session.viewer_count, 2);
    assert_eq!(session.like_count, 1);
    assert_eq!(session.comments.len(), 1);

    // Hold the session open long enough for a measurable duration.
    tokio::time::sleep(Duration::from_millis(20)).await;

    let summary = registry.end("launch-day").await?;
    assert_eq!(summary.final_viewer_count, 2);
    assert!(summary.duration_ms >= 10);

    assert!(matches!(
        registry.get("launch-day").await,
        Err(RegistryError::SessionNotFound(_))
    ));
    assert!(matches!(
        registry.end("launch-day").await,
        Err(RegistryError::SessionNotFound(_))
    ));

    Ok(())
}

#[tokio::test]
async fn list_active_returns_stable_newest_first_order() -> Result<()> {
    let registry = SessionRegistry::new();

    for channel in ["a", "b", "c"] {
        registry.start(new_session(channel)).await?;
        tokio::time::sleep(Duration::from_millis(5)).await;
    }

    let first = registry.list_active().await;
    let second = registry.list_active().await;

    let order: Vec<&str> = first
        .iter()
        .map(|session| session.channel_name.as_str())
        .collect();
    assert_eq!(order, ["c", "b", "a"]);

    // Repeated calls over unchanged state agree.
    let order_again: Vec<&str> = second
        .iter()
        .map(|session| session.channel_name.as_str())
        .collect();
    assert_eq!(order, order_again);

    Ok(())
}

#[tokio::test]
async fn comment_log_keeps_the_most_recent_fifty() -> Result<()> {
    let registry = SessionRegistry::new();
    registry.start(new_session("launch-day")).await?;

    let total = COMMENT_LOG_CAPACITY + 25;
    for i in 0..total {
        registry
            .add_comment("launch-day", "Bea", &format!("message {i}"))
            .await?;
    }

    let comments = registry.comments("launch-day").await?;
    assert_eq!(comments.len(), COMMENT_LOG_CAPACITY);

    let expected: Vec<String> = (total - COMMENT_LOG_CAPACITY..total)
        .map(|i| format!("message {i}"))
        .collect();
    let actual: Vec<&str> = comments
        .iter()
        .map(|comment| comment.text.as_str())
        .collect();
    assert_eq!(actual, expected);

    Ok(())
}

#[tokio::test]
async fn ending_one_channel_leaves_others_untouched() -> Result<()> {
    let registry = SessionRegistry::new();
    registry.start(new_session("keep")).await?;
    registry.start(new_session("drop")).await?;

    registry
        .adjust_viewers("keep", ViewerDirection::Increment)
        .await?;
    registry.end("drop").await?;

    let kept = registry.get("keep").await?;
    assert_eq!(kept.viewer_count, 1);
    assert_eq!(registry.active_count().await, 1);

    Ok(())
}
