//! 编排器集成测试：重试时序、模型回退与失败分类
//!
//! 时间断言使用 tokio 可控时钟（start_paused），不做真实等待。

use std::sync::Arc;
use std::time::Duration;

use fitcoach::chat::Turn;
use fitcoach::coach::{CoachError, Orchestrator, RetryPolicy};
use fitcoach::llm::MockClient;

fn orchestrator_with(
    script: Vec<Result<String, String>>,
    models: &[&str],
) -> (Arc<MockClient>, Orchestrator) {
    let mock = Arc::new(MockClient::new(script));
    let orchestrator = Orchestrator::new(
        mock.clone(),
        models.iter().map(|m| m.to_string()).collect(),
        RetryPolicy::default(),
    );
    (mock, orchestrator)
}

fn history() -> Vec<Turn> {
    vec![
        Turn::user("I want a beginner workout plan"),
        Turn::assistant("Let's start with 3 days a week."),
        Turn::user("What about rest days?"),
    ]
}

#[tokio::test(start_paused = true)]
async fn retries_with_exponential_backoff_then_succeeds() {
    let (mock, orchestrator) = orchestrator_with(
        vec![
            Err("503 Service Unavailable".to_string()),
            Err("429 Too Many Requests".to_string()),
            Ok("Rest days are where the growth happens!".to_string()),
        ],
        &["gemini-3-flash-preview"],
    );

    let start = tokio::time::Instant::now();
    let reply = orchestrator.reply(&history()).await.unwrap();

    assert_eq!(reply, "Rest days are where the growth happens!");
    assert_eq!(mock.call_count(), 3);
    // 第 1 次失败后等 1s，第 2 次失败后等 2s
    assert_eq!(start.elapsed(), Duration::from_millis(3000));
}

#[tokio::test(start_paused = true)]
async fn exhausts_every_model_then_fails_unified() {
    let always_busy: Vec<Result<String, String>> = (0..6)
        .map(|_| Err("UNAVAILABLE: model overloaded".to_string()))
        .collect();
    let (mock, orchestrator) = orchestrator_with(always_busy, &["model-a", "model-b"]);

    let start = tokio::time::Instant::now();
    let err = orchestrator.reply(&history()).await.unwrap_err();

    assert!(matches!(err, CoachError::Unavailable));
    assert_eq!(
        err.to_string(),
        "All models are currently unavailable. Please try again later."
    );
    // 每个模型恰好尝试 3 次，按候选顺序
    assert_eq!(mock.call_count(), 6);
    assert_eq!(
        mock.models_called(),
        vec!["model-a", "model-a", "model-a", "model-b", "model-b", "model-b"]
    );
    // 每个模型内等 1s + 2s，换模型不等待
    assert_eq!(start.elapsed(), Duration::from_millis(6000));
}

#[tokio::test(start_paused = true)]
async fn fatal_error_fails_immediately_without_fallback() {
    let (mock, orchestrator) = orchestrator_with(
        vec![Err("400 INVALID_ARGUMENT: bad request".to_string())],
        &["model-a", "model-b"],
    );

    let start = tokio::time::Instant::now();
    let err = orchestrator.reply(&history()).await.unwrap_err();

    match err {
        CoachError::Provider(msg) => assert!(msg.contains("400 INVALID_ARGUMENT")),
        other => panic!("expected Provider error, got {:?}", other),
    }
    // 一次调用，零等待，不碰后续模型
    assert_eq!(mock.call_count(), 1);
    assert_eq!(start.elapsed(), Duration::ZERO);
}

#[tokio::test]
async fn empty_provider_reply_falls_back_to_apology() {
    let (_, orchestrator) = orchestrator_with(vec![Ok(String::new())], &["model-a"]);

    let reply = orchestrator.reply(&history()).await.unwrap();
    assert_eq!(
        reply,
        "I'm sorry, I couldn't generate a response. Please try again."
    );
}

#[tokio::test]
async fn empty_history_is_rejected_before_any_call() {
    let (mock, orchestrator) = orchestrator_with(vec![], &["model-a"]);

    let err = orchestrator.reply(&[]).await.unwrap_err();
    assert!(matches!(err, CoachError::EmptyHistory));
    assert_eq!(mock.call_count(), 0);
}

#[tokio::test(start_paused = true)]
async fn recovers_on_second_model_after_first_exhausted() {
    let (mock, orchestrator) = orchestrator_with(
        vec![
            Err("503".to_string()),
            Err("503".to_string()),
            Err("503".to_string()),
            Ok("Here is your plan.".to_string()),
        ],
        &["model-a", "model-b"],
    );

    let reply = orchestrator.reply(&history()).await.unwrap();
    assert_eq!(reply, "Here is your plan.");
    assert_eq!(mock.call_count(), 4);
    assert_eq!(mock.models_called().last().unwrap().as_str(), "model-b");
}
