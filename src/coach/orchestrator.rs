//! 重试与模型回退编排
//!
//! 显式的 (模型序号, 尝试序号) 状态循环：瞬时错误在同一模型上指数退避重试，
//! 重试耗尽后立即切换下一候选模型，不可重试错误直接失败。严格串行，
//! 不做并行扇出，也没有短于重试预算的超时。

use std::sync::Arc;
use std::time::Duration;

use crate::chat::Turn;
use crate::coach::{flatten_history, CoachError, SYSTEM_INSTRUCTION};
use crate::llm::GenerativeClient;

/// 默认候选模型（优先级顺序，契约支持多个）
pub const DEFAULT_MODELS: &[&str] = &["gemini-3-flash-preview"];

/// 服务商空回复时的兜底文案
const EMPTY_REPLY_FALLBACK: &str = "I'm sorry, I couldn't generate a response. Please try again.";

/// 瞬时错误标记：命中任一子串即视为可重试。
/// 服务商错误只有非结构化文本，分类集中在此处以便将来换成结构化错误码。
const RETRYABLE_MARKERS: &[&str] = &[
    "503",
    "429",
    "UNAVAILABLE",
    "RESOURCE_EXHAUSTED",
    "high demand",
];

/// 单模型重试策略：次数上限与指数退避基准
#[derive(Clone, Debug)]
pub struct RetryPolicy {
    /// 每个模型最多尝试次数（含首次）
    pub max_attempts: u32,
    /// 退避基准，第 n 次失败后等待 2^n * base
    pub backoff_base_ms: u64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            backoff_base_ms: 1000,
        }
    }
}

impl RetryPolicy {
    /// 按失败文本判断是否可重试
    pub fn is_retryable(&self, message: &str) -> bool {
        RETRYABLE_MARKERS.iter().any(|m| message.contains(m))
    }

    /// 第 attempt 次（0 起）失败后的等待时长
    pub fn backoff_delay(&self, attempt: u32) -> Duration {
        Duration::from_millis(2u64.pow(attempt) * self.backoff_base_ms)
    }
}

/// 对话编排器：注入的客户端 + 候选模型列表 + 重试策略。
/// 无跨请求状态，可在请求间以 Arc 共享。
pub struct Orchestrator {
    client: Arc<dyn GenerativeClient>,
    models: Vec<String>,
    retry: RetryPolicy,
}

impl Orchestrator {
    pub fn new(client: Arc<dyn GenerativeClient>, models: Vec<String>, retry: RetryPolicy) -> Self {
        Self {
            client,
            models,
            retry,
        }
    }

    /// 给定按序对话历史，返回回复文本或分类后的失败。历史只读，顺序原样进入 Prompt。
    pub async fn reply(&self, history: &[Turn]) -> Result<String, CoachError> {
        if history.is_empty() {
            return Err(CoachError::EmptyHistory);
        }
        let prompt = flatten_history(history);

        for model in &self.models {
            let mut attempt: u32 = 0;
            loop {
                match self
                    .client
                    .generate(model, SYSTEM_INSTRUCTION, &prompt)
                    .await
                {
                    Ok(text) => {
                        if text.is_empty() {
                            return Ok(EMPTY_REPLY_FALLBACK.to_string());
                        }
                        return Ok(text);
                    }
                    Err(msg) if self.retry.is_retryable(&msg) => {
                        attempt += 1;
                        if attempt < self.retry.max_attempts {
                            let delay = self.retry.backoff_delay(attempt - 1);
                            tracing::warn!(
                                "model {} attempt {} failed ({}), retrying in {}ms",
                                model,
                                attempt,
                                msg,
                                delay.as_millis()
                            );
                            tokio::time::sleep(delay).await;
                        } else {
                            tracing::warn!("model {} exhausted retries, trying next model", model);
                            break;
                        }
                    }
                    Err(msg) => return Err(CoachError::Provider(msg)),
                }
            }
        }

        Err(CoachError::Unavailable)
    }
}
