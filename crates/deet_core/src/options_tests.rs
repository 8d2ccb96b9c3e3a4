//! Tests for typed option decoding

use super::*;
use serde_json::json;

fn string_option(name: &str, value: &str) -> CommandOption {
    CommandOption {
        name: name.to_string(),
        kind: OptionType::String,
        value: Some(json!(value)),
    }
}

#[test]
fn test_deet_options_reads_content() {
    let options = vec![string_option("content", "hello")];

    let decoded = DeetOptions::from_options(&options).unwrap();

    assert_eq!(decoded.content, "hello");
}

#[test]
fn test_set_webhook_options_reads_url_among_others() {
    let options = vec![
        string_option("note", "ignored"),
        string_option("url", "https://x.test/hook"),
    ];

    let decoded = SetWebhookOptions::from_options(&options).unwrap();

    assert_eq!(decoded.url, "https://x.test/hook");
}

#[test]
fn test_missing_option_is_reported_by_name() {
    let result = DeetOptions::from_options(&[]);

    match result {
        Err(RelayError::MissingOption { name }) => assert_eq!(name, "content"),
        other => panic!("Expected MissingOption, got {:?}", other),
    }
}

#[test]
fn test_option_without_value_counts_as_missing() {
    let options = vec![CommandOption {
        name: "url".to_string(),
        kind: OptionType::String,
        value: None,
    }];

    assert!(matches!(
        SetWebhookOptions::from_options(&options),
        Err(RelayError::MissingOption { .. })
    ));
}

#[test]
fn test_non_string_option_type_is_rejected() {
    let options = vec![CommandOption {
        name: "content".to_string(),
        kind: OptionType::Other(4),
        value: Some(json!(42)),
    }];

    match DeetOptions::from_options(&options) {
        Err(RelayError::InvalidOptionType { name }) => assert_eq!(name, "content"),
        other => panic!("Expected InvalidOptionType, got {:?}", other),
    }
}

#[test]
fn test_string_typed_option_with_non_string_value_is_rejected() {
    let options = vec![CommandOption {
        name: "content".to_string(),
        kind: OptionType::String,
        value: Some(json!(true)),
    }];

    assert!(matches!(
        DeetOptions::from_options(&options),
        Err(RelayError::InvalidOptionType { .. })
    ));
}
