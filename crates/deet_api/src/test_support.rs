//! Shared helpers for HTTP layer tests

use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc,
};

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{Request, Response},
};
use deet_core::{
    InMemoryStore, KeyValueStore, RelayContext, SignatureVerifier, StoreError, SIGNATURE_HEADER,
    TIMESTAMP_HEADER,
};
use ed25519_dalek::{Signer, SigningKey};

use crate::AppState;

pub const TIMESTAMP: &str = "1700000000";

pub fn signing_key() -> SigningKey {
    SigningKey::from_bytes(&[42u8; 32])
}

pub fn sign(timestamp: &str, body: &str) -> String {
    let mut message = timestamp.as_bytes().to_vec();
    message.extend_from_slice(body.as_bytes());
    hex::encode(signing_key().sign(&message).to_bytes())
}

/// A POST to `uri` carrying a valid signature over `body`.
pub fn signed_request(uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .header(SIGNATURE_HEADER, sign(TIMESTAMP, body))
        .header(TIMESTAMP_HEADER, TIMESTAMP)
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub async fn body_text(response: Response<Body>) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

/// In-memory store that counts every access.
#[derive(Debug, Default)]
pub struct CountingStore {
    inner: InMemoryStore,
    accesses: AtomicUsize,
}

impl CountingStore {
    pub fn accesses(&self) -> usize {
        self.accesses.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl KeyValueStore for CountingStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        self.accesses.fetch_add(1, Ordering::SeqCst);
        self.inner.get(key).await
    }

    async fn put(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.accesses.fetch_add(1, Ordering::SeqCst);
        self.inner.put(key, value).await
    }
}

pub struct TestStores {
    pub followers: Arc<CountingStore>,
    pub webhooks: Arc<CountingStore>,
}

impl TestStores {
    pub fn accesses(&self) -> usize {
        self.followers.accesses() + self.webhooks.accesses()
    }
}

pub fn test_state() -> (AppState, TestStores) {
    let stores = TestStores {
        followers: Arc::new(CountingStore::default()),
        webhooks: Arc::new(CountingStore::default()),
    };
    let context = RelayContext::new(
        SignatureVerifier::new(signing_key().verifying_key()),
        stores.followers.clone(),
        stores.webhooks.clone(),
        reqwest::Client::new(),
        4,
    );
    (AppState::new(context), stores)
}
