// Budget-policy tests for the capability gateway.

mod common;

use common::MockProvider;
use std::sync::atomic::Ordering;
use voice_diary::audio::AudioClip;
use voice_diary::gateway::{Gateway, GenerateRequest};
use voice_diary::DiaryError;

fn request(message: &str) -> GenerateRequest {
    GenerateRequest {
        system: "interview".to_string(),
        history: Vec::new(),
        user_message: message.to_string(),
    }
}

fn clip() -> AudioClip {
    AudioClip {
        samples: vec![100i16; 1600],
        sample_rate: 16000,
    }
}

#[tokio::test]
async fn counter_equals_completed_calls() {
    let gateway = Gateway::new(Box::new(MockProvider::new()), 10);

    for n in 1..=3 {
        gateway.generate_reply(&request("hi")).await.unwrap();
        assert_eq!(gateway.calls_used(), n);
    }
}

#[tokio::test]
async fn all_capabilities_share_one_counter() {
    let gateway = Gateway::new(Box::new(MockProvider::new()), 10);

    gateway.generate_reply(&request("hi")).await.unwrap();
    gateway.transcribe(&clip()).await.unwrap();
    gateway.synthesize("hello").await.unwrap();

    assert_eq!(gateway.calls_used(), 3);
}

#[tokio::test]
async fn call_past_budget_is_rejected_before_provider_invoked() {
    let provider = MockProvider::new();
    let attempts = provider.attempts.clone();
    let gateway = Gateway::new(Box::new(provider), 2);

    gateway.generate_reply(&request("one")).await.unwrap();
    gateway.generate_reply(&request("two")).await.unwrap();

    let err = gateway.generate_reply(&request("three")).await.unwrap_err();
    assert!(matches!(err, DiaryError::BudgetExceeded { limit: 2 }));
    assert_eq!(gateway.calls_used(), 2);
    // The third attempt never reached the provider
    assert_eq!(attempts.generate.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn rejected_call_never_reaches_provider() {
    let provider = MockProvider::new();
    let attempts = provider.attempts.clone();
    let gateway = Gateway::new(Box::new(provider), 0);

    // Every capability is rejected locally
    assert!(gateway.generate_reply(&request("hi")).await.is_err());
    assert!(gateway.transcribe(&clip()).await.is_err());
    assert!(gateway.synthesize("hi").await.is_err());

    assert_eq!(gateway.calls_used(), 0);
    assert_eq!(attempts.generate.load(Ordering::SeqCst), 0);
    assert_eq!(attempts.transcribe.load(Ordering::SeqCst), 0);
    assert_eq!(attempts.synthesize.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn failed_generate_does_not_count_and_does_not_retry() {
    let provider = MockProvider::with_replies(vec![Err(MockProvider::service_error())]);
    let gateway = Gateway::new(Box::new(provider), 10);

    let err = gateway.generate_reply(&request("hi")).await.unwrap_err();
    assert!(matches!(err, DiaryError::Service(_)));
    assert_eq!(gateway.calls_used(), 0);
}

#[tokio::test]
async fn transcribe_retries_once_and_counts_once() {
    let provider = MockProvider::new().with_transcriptions(vec![
        Err(MockProvider::service_error()),
        Ok("second try".to_string()),
    ]);
    let attempts = provider.attempts.clone();
    let gateway = Gateway::new(Box::new(provider), 10);

    let text = gateway.transcribe(&clip()).await.unwrap();
    assert_eq!(text, "second try");
    assert_eq!(gateway.calls_used(), 1);
    assert_eq!(attempts.transcribe.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn transcribe_surfaces_failure_after_single_retry() {
    let provider = MockProvider::new().with_transcriptions(vec![
        Err(MockProvider::service_error()),
        Err(MockProvider::service_error()),
        Ok("never reached".to_string()),
    ]);
    let attempts = provider.attempts.clone();
    let gateway = Gateway::new(Box::new(provider), 10);

    let err = gateway.transcribe(&clip()).await.unwrap_err();
    assert!(matches!(err, DiaryError::Service(_)));
    // Exactly two attempts, nothing counted
    assert_eq!(attempts.transcribe.load(Ordering::SeqCst), 2);
    assert_eq!(gateway.calls_used(), 0);
}
