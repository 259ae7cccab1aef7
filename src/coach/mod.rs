//! 对话编排器：Prompt 扁平化 + 带重试与模型回退的生成调用

pub mod error;
pub mod orchestrator;
pub mod prompt;

pub use error::CoachError;
pub use orchestrator::{Orchestrator, RetryPolicy, DEFAULT_MODELS};
pub use prompt::{flatten_history, SYSTEM_INSTRUCTION};
