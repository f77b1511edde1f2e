//! Concurrency properties of the registry: no lost updates on a single
//! channel, no interference between channels, and clean resolution of an
//! `end` racing in-flight mutations.

use anyhow::Result;
use futures::future::join_all;
use session_registry::{NewSession, RegistryError, SessionRegistry, ViewerDirection};
use std::sync::Arc;

fn new_session(channel: &str) -> NewSession {
    NewSession {
        channel_name: channel.to_string(),
        owner_id: None,
        owner_display_name: "Ada".to_string(),
        title: None,
        thumbnail_ref: None,
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_increments_are_all_applied() -> Result<()> {
    const TASKS: u32 = 100;

    let registry = Arc::new(SessionRegistry::new());
    registry.start(new_session("load-test")).await?;

    let tasks = (0..TASKS).map(|_| {
        let registry = Arc::clone(&registry);
        tokio::spawn(async move {
            registry
                .adjust_viewers("load-test", ViewerDirection::Increment)
                .await
        })
    });
    for joined in join_all(tasks).await {
        joined??;
    }

    let session = registry.get("load-test").await?;
    assert_eq!(session.viewer_count, TASKS);

    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_likes_are_all_applied() -> Result<()> {
    const TASKS: u64 = 64;

    let registry = Arc::new(SessionRegistry::new());
    registry.start(new_session("load-test")).await?;

    let tasks = (0..TASKS).map(|_| {
        let registry = Arc::clone(&registry);
        tokio::spawn(async move { registry.like("load-test").await })
    });
    for joined in join_all(tasks).await {
        joined??;
    }

    let session = registry.get("load-test").await?;
    assert_eq!(session.like_count, TASKS);

    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn channels_do_not_interfere_under_load() -> Result<()> {
    const PER_CHANNEL: u32 = 50;

    let registry = Arc::new(SessionRegistry::new());
    registry.start(new_session("alpha")).await?;
    registry.start(new_session("bravo")).await?;

    let tasks = (0..PER_CHANNEL * 2).map(|i| {
        let registry = Arc::clone(&registry);
        let channel = if i % 2 == 0 { "alpha" } else { "bravo" };
        tokio::spawn(async move {
            registry
                .adjust_viewers(channel, ViewerDirection::Increment)
                .await
        })
    });
    for joined in join_all(tasks).await {
        joined??;
    }

    assert_eq!(registry.get("alpha").await?.viewer_count, PER_CHANNEL);
    assert_eq!(registry.get("bravo").await?.viewer_count, PER_CHANNEL);

    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn end_racing_mutations_resolves_cleanly() -> Result<()> {
    let registry = Arc::new(SessionRegistry::new());
    registry.start(new_session("flash-mob")).await?;

    let likes = (0..32).map(|_| {
        let registry = Arc::clone(&registry);
        tokio::spawn(async move { registry.like("flash-mob").await })
    });
    let ender = {
        let registry = Arc::clone(&registry);
        tokio::spawn(async move { registry.end("flash-mob").await })
    };

    // Every like either landed before the removal or reported the channel
    // as gone; nothing panics and no partial state is left behind.
    for joined in join_all(likes).await {
        match joined? {
            Ok(_) | Err(RegistryError::SessionNotFound(_)) => {}
            Err(other) => return Err(other.into()),
        }
    }
    ender.await??;

    assert!(matches!(
        registry.get("flash-mob").await,
        Err(RegistryError::SessionNotFound(_))
    ));
    assert_eq!(registry.active_count().await, 0);

    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn decrements_never_drive_the_count_negative() -> Result<()> {
    let registry = Arc::new(SessionRegistry::new());
    registry.start(new_session("load-test")).await?;

    // More decrements than increments, interleaved arbitrarily.
    let tasks = (0..60u32).map(|i| {
        let registry = Arc::clone(&registry);
        let direction = if i % 3 == 0 {
            ViewerDirection::Increment
        } else {
            ViewerDirection::Decrement
        };
        tokio::spawn(async move { registry.adjust_viewers("load-test", direction).await })
    });

    for joined in join_all(tasks).await {
        let count = joined??;
        assert!(count <= 60);
    }

    let session = registry.get("load-test").await?;
    assert!(session.viewer_count <= 20);

    Ok(())
}
