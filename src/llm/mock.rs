//! 脚本化 Mock 客户端（用于测试，无需 API）
//!
//! 按脚本顺序返回预设结果，并记录每次调用使用的模型名，
//! 供重试/回退测试断言「每个模型恰好尝试 N 次」。

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::llm::GenerativeClient;

/// Mock 客户端：脚本耗尽后回显固定文本
pub struct MockClient {
    script: Mutex<VecDeque<Result<String, String>>>,
    calls: Mutex<Vec<String>>,
}

impl MockClient {
    pub fn new(script: Vec<Result<String, String>>) -> Self {
        Self {
            script: Mutex::new(script.into()),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// 总调用次数
    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    /// 每次调用使用的模型名，按调用顺序
    pub fn models_called(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl GenerativeClient for MockClient {
    async fn generate(&self, model: &str, _system: &str, _prompt: &str) -> Result<String, String> {
        self.calls.lock().unwrap().push(model.to_string());
        self.script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok("Echo from Mock".to_string()))
    }
}
