//! Tests for the offline echo adapter

use std::time::{Duration, Instant};

use ctfai_domain::ErrorKind;
use ctfai_domain::ports::{CompletionRequest, GenerationProvider};
use ctfai_domain::value_objects::{ProviderConfig, TaskKind};
use ctfai_providers::{EchoGenerationProvider, EchoMode};

fn request(task: TaskKind, prompt: &str) -> CompletionRequest {
    CompletionRequest {
        task,
        system_prompt: "system".to_string(),
        prompt: prompt.to_string(),
        max_tokens: 100,
        temperature: 0.7,
        deadline: Duration::from_secs(5),
    }
}

#[tokio::test]
async fn test_echo_returns_prompt_for_text() {
    let provider = EchoGenerationProvider::default();
    let raw = provider
        .complete(&request(TaskKind::Text, "hello there"))
        .await
        .unwrap();
    assert_eq!(raw.text, "hello there");
    assert_eq!(raw.tokens_used, None);
}

#[tokio::test]
async fn test_echo_challenge_is_json() {
    let provider = EchoGenerationProvider::default();
    let raw = provider
        .complete(&request(TaskKind::Challenge, "web easy"))
        .await
        .unwrap();
    let value: serde_json::Value = serde_json::from_str(&raw.text).unwrap();
    assert_eq!(value["description"], "web easy");
    assert_eq!(value["flag"], "flag{echo}");
    assert!(value["hints"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_echo_flag() {
    let provider = EchoGenerationProvider::default();
    let raw = provider
        .complete(&request(TaskKind::Flag, "anything"))
        .await
        .unwrap();
    assert_eq!(raw.text, "flag{echo}");
}

#[tokio::test]
async fn test_echo_honors_delay() {
    let provider = EchoGenerationProvider::new(Duration::from_millis(30), EchoMode::Echo);
    let started = Instant::now();
    provider
        .complete(&request(TaskKind::Text, "x"))
        .await
        .unwrap();
    assert!(started.elapsed() >= Duration::from_millis(30));
}

#[tokio::test]
async fn test_echo_fail_and_malformed_modes() {
    let failing = EchoGenerationProvider::new(Duration::ZERO, EchoMode::Fail);
    let err = failing
        .complete(&request(TaskKind::Text, "x"))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ProviderError);
    assert!(failing.ping(Duration::from_secs(1)).await.is_err());

    let malformed = EchoGenerationProvider::new(Duration::ZERO, EchoMode::Malformed);
    let raw = malformed
        .complete(&request(TaskKind::Challenge, "x"))
        .await
        .unwrap();
    assert!(raw.text.is_empty());
}

#[tokio::test]
async fn test_echo_hang_never_answers() {
    let provider = EchoGenerationProvider::new(Duration::ZERO, EchoMode::Hang);
    let outcome = tokio::time::timeout(
        Duration::from_millis(50),
        provider.complete(&request(TaskKind::Text, "x")),
    )
    .await;
    assert!(outcome.is_err(), "hang mode must not complete");
}

#[test]
fn test_echo_from_config_reads_options() {
    let config = ProviderConfig::new("slow", "echo")
        .with_option("delay_ms", "250")
        .with_option("mode", "Malformed");
    let provider = EchoGenerationProvider::from_config(&config).unwrap();
    assert_eq!(provider.mode(), EchoMode::Malformed);
    assert_eq!(provider.model(), "echo");
    assert_eq!(provider.provider_kind(), "echo");
}

#[test]
fn test_echo_from_config_rejects_bad_options() {
    let bad_delay = ProviderConfig::new("a", "echo").with_option("delay_ms", "soon");
    assert!(EchoGenerationProvider::from_config(&bad_delay).is_err());

    let bad_mode = ProviderConfig::new("a", "echo").with_option("mode", "sleep");
    assert!(EchoGenerationProvider::from_config(&bad_mode).is_err());
}
