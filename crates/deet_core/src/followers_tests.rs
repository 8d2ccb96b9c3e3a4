//! Tests for follower sets

use super::*;
use crate::store::InMemoryStore;

fn follower_sets() -> (Arc<InMemoryStore>, FollowerSets) {
    let store = Arc::new(InMemoryStore::new());
    let sets = FollowerSets::new(store.clone());
    (store, sets)
}

#[tokio::test]
async fn test_unfollowed_target_has_no_followers() {
    let (_, sets) = follower_sets();

    assert!(sets.followers_of("bob").await.unwrap().is_empty());
}

#[tokio::test]
async fn test_follow_records_follower_under_target_key() {
    let (store, sets) = follower_sets();

    sets.follow("bob", "alice").await.unwrap();

    assert_eq!(
        store.get("bob").await.unwrap().as_deref(),
        Some(r#"["alice"]"#)
    );
    assert_eq!(store.get("alice").await.unwrap(), None);
}

#[tokio::test]
async fn test_follow_is_idempotent() {
    let (_, sets) = follower_sets();

    sets.follow("bob", "alice").await.unwrap();
    sets.follow("bob", "alice").await.unwrap();

    let followers = sets.followers_of("bob").await.unwrap();
    assert_eq!(followers.len(), 1);
    assert!(followers.contains("alice"));
}

#[tokio::test]
async fn test_unfollow_removes_only_that_follower() {
    let (_, sets) = follower_sets();
    sets.follow("bob", "alice").await.unwrap();
    sets.follow("bob", "carol").await.unwrap();

    sets.unfollow("bob", "alice").await.unwrap();

    let followers: Vec<_> = sets.followers_of("bob").await.unwrap().into_iter().collect();
    assert_eq!(followers, vec!["carol".to_string()]);
}

#[tokio::test]
async fn test_unfollow_of_non_follower_is_noop() {
    let (_, sets) = follower_sets();
    sets.follow("bob", "alice").await.unwrap();

    sets.unfollow("bob", "mallory").await.unwrap();

    let followers = sets.followers_of("bob").await.unwrap();
    assert_eq!(followers.len(), 1);
    assert!(followers.contains("alice"));
}

#[tokio::test]
async fn test_unfollow_on_empty_target_writes_nothing() {
    let (store, sets) = follower_sets();

    sets.unfollow("bob", "alice").await.unwrap();

    assert!(sets.followers_of("bob").await.unwrap().is_empty());
    assert!(store.is_empty());
}

#[tokio::test]
async fn test_unfollow_of_non_follower_leaves_stored_value_untouched() {
    let (store, sets) = follower_sets();
    store.put("bob", r#"["carol","alice","alice"]"#).await.unwrap();

    sets.unfollow("bob", "mallory").await.unwrap();

    assert_eq!(
        store.get("bob").await.unwrap().as_deref(),
        Some(r#"["carol","alice","alice"]"#)
    );
}

#[tokio::test]
async fn test_duplicate_ids_in_stored_array_are_collapsed() {
    let (store, sets) = follower_sets();
    store.put("bob", r#"["alice","alice","carol"]"#).await.unwrap();

    let followers = sets.followers_of("bob").await.unwrap();

    assert_eq!(followers.len(), 2);
}

#[tokio::test]
async fn test_corrupt_value_is_reported() {
    let (store, sets) = follower_sets();
    store.put("bob", "not json").await.unwrap();

    let error = sets.followers_of("bob").await.unwrap_err();

    assert!(matches!(error, StoreError::Corrupt { key, .. } if key == "bob"));
}
