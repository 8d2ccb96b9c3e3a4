//! Tests for context wiring

use super::*;
use crate::config::CloudflareSettings;
use crate::interaction::InteractionResponse;
use ed25519_dalek::SigningKey;
use serde_json::json;
use wiremock::{
    matchers::{body_string, method, path},
    Mock, MockServer, ResponseTemplate,
};

fn verifier() -> SignatureVerifier {
    SignatureVerifier::new(SigningKey::from_bytes(&[5u8; 32]).verifying_key())
}

fn config(store: StoreBackend) -> RelayConfig {
    RelayConfig {
        verifier: verifier(),
        client_credentials: None,
        store,
        max_concurrent_deliveries: 4,
    }
}

#[tokio::test]
async fn test_memory_backend_context_answers_ping() {
    let context = RelayContext::from_config(config(StoreBackend::Memory), reqwest::Client::new())
        .unwrap();

    let response = context.dispatcher.dispatch(br#"{"type":1}"#).await.unwrap();

    assert_eq!(response, InteractionResponse::pong());
}

#[tokio::test]
async fn test_cloudflare_backend_context_writes_to_followers_namespace() {
    let server = MockServer::start().await;
    let value_path = "/accounts/acc/storage/kv/namespaces/ns-f/values/bob";
    Mock::given(method("GET"))
        .and(path(value_path))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path(value_path))
        .and(body_string(r#"["alice"]"#))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let settings = CloudflareSettings {
        api_base: server.uri(),
        account_id: "acc".to_string(),
        api_token: SecretString::from("token".to_string()),
        followers_namespace_id: "ns-f".to_string(),
        webhooks_namespace_id: "ns-w".to_string(),
    };
    let context = RelayContext::from_config(
        config(StoreBackend::Cloudflare(settings)),
        reqwest::Client::new(),
    )
    .unwrap();

    let body = json!({
        "type": 2,
        "user": { "id": "alice", "username": "alice" },
        "data": { "name": "Follow", "type": 2, "target_id": "bob" }
    })
    .to_string();
    let response = context.dispatcher.dispatch(body.as_bytes()).await.unwrap();

    assert!(response.is_ephemeral());
}
