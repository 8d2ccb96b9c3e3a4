//! Tests for the in-memory store

use std::sync::Arc;

use super::*;

#[tokio::test]
async fn test_get_missing_key_returns_none() {
    let store = InMemoryStore::new();

    assert_eq!(store.get("nobody").await.unwrap(), None);
    assert!(store.is_empty());
}

#[tokio::test]
async fn test_put_then_get_returns_last_write() {
    let store = InMemoryStore::new();

    store.put("u1", "https://a.test/hook").await.unwrap();
    store.put("u1", "https://b.test/hook").await.unwrap();

    assert_eq!(
        store.get("u1").await.unwrap().as_deref(),
        Some("https://b.test/hook")
    );
    assert_eq!(store.len(), 1);
}

#[tokio::test]
async fn test_update_sees_current_value() {
    let store = InMemoryStore::new();
    store.put("counter", "1").await.unwrap();

    store
        .update("counter", &|current| {
            let value: u32 = current.unwrap_or_default().parse().unwrap_or(0);
            Ok((value + 1).to_string())
        })
        .await
        .unwrap();

    assert_eq!(store.get("counter").await.unwrap().as_deref(), Some("2"));
}

#[tokio::test]
async fn test_update_error_leaves_value_untouched() {
    let store = InMemoryStore::new();
    store.put("k", "v").await.unwrap();

    let result = store
        .update("k", &|_| {
            Err(StoreError::Corrupt {
                key: "k".to_string(),
                reason: "test".to_string(),
            })
        })
        .await;

    assert!(result.is_err());
    assert_eq!(store.get("k").await.unwrap().as_deref(), Some("v"));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_updates_do_not_lose_writes() {
    let store = Arc::new(InMemoryStore::new());

    let tasks: Vec<_> = (0..50)
        .map(|_| {
            let store = Arc::clone(&store);
            tokio::spawn(async move {
                store
                    .update("counter", &|current| {
                        let value: u32 = current.unwrap_or_default().parse().unwrap_or(0);
                        Ok((value + 1).to_string())
                    })
                    .await
            })
        })
        .collect();

    for task in tasks {
        task.await.unwrap().unwrap();
    }

    assert_eq!(store.get("counter").await.unwrap().as_deref(), Some("50"));
}
