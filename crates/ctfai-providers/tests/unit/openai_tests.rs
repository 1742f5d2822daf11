//! Tests for the OpenAI-compatible adapter against a mock server

use std::time::Duration;

use ctfai_domain::ErrorKind;
use ctfai_domain::ports::{CompletionRequest, GenerationProvider};
use ctfai_domain::value_objects::TaskKind;
use ctfai_providers::OpenAIGenerationProvider;

fn request() -> CompletionRequest {
    CompletionRequest {
        task: TaskKind::Flag,
        system_prompt: "Reply with the flag only".to_string(),
        prompt: "Generate a flag".to_string(),
        max_tokens: 100,
        temperature: 0.8,
        deadline: Duration::from_secs(5),
    }
}

fn provider(api_key: Option<&str>, base_url: String) -> OpenAIGenerationProvider {
    OpenAIGenerationProvider::new(
        api_key.map(str::to_string),
        Some(base_url),
        "gpt-4o-mini".to_string(),
        reqwest::Client::new(),
    )
}

#[tokio::test]
async fn test_openai_parses_chat_completion() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/chat/completions")
        .match_header("authorization", "Bearer sk-test")
        .match_body(mockito::Matcher::PartialJson(serde_json::json!({
            "model": "gpt-4o-mini",
            "max_tokens": 100,
        })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            r#"{"choices":[{"message":{"role":"assistant","content":"flag{abc}"}}],
                "usage":{"prompt_tokens":20,"completion_tokens":7}}"#,
        )
        .create_async()
        .await;

    let raw = provider(Some("sk-test"), server.url())
        .complete(&request())
        .await
        .unwrap();

    assert_eq!(raw.text, "flag{abc}");
    assert_eq!(raw.tokens_used, Some(7));
    mock.assert_async().await;
}

#[tokio::test]
async fn test_openai_maps_auth_failure_to_provider_error() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("POST", "/chat/completions")
        .with_status(401)
        .with_body(r#"{"error":{"message":"bad key"}}"#)
        .create_async()
        .await;

    let err = provider(Some("sk-wrong"), server.url())
        .complete(&request())
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ProviderError);
    assert!(err.to_string().contains("authentication failed"));
}

#[tokio::test]
async fn test_openai_missing_content_is_malformed() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("POST", "/chat/completions")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"choices":[]}"#)
        .create_async()
        .await;

    let err = provider(Some("sk-test"), server.url())
        .complete(&request())
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::MalformedResponse);
}

#[tokio::test]
async fn test_openai_requires_api_key_before_sending() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/chat/completions")
        .expect(0)
        .create_async()
        .await;

    let err = provider(None, server.url())
        .complete(&request())
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ProviderError);
    mock.assert_async().await;
}

#[tokio::test]
async fn test_openai_ping_lists_models() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/models")
        .match_header("authorization", "Bearer sk-test")
        .with_status(200)
        .with_body(r#"{"data":[]}"#)
        .create_async()
        .await;

    provider(Some("sk-test"), server.url())
        .ping(Duration::from_secs(5))
        .await
        .unwrap();
    mock.assert_async().await;
}

#[test]
fn test_openai_defaults_base_url() {
    let provider = OpenAIGenerationProvider::new(
        Some("sk".to_string()),
        None,
        "gpt-4o-mini".to_string(),
        reqwest::Client::new(),
    );
    assert_eq!(provider.base_url(), "https://api.openai.com/v1");
    assert_eq!(provider.model(), "gpt-4o-mini");
}
