//! Gemini 客户端（OpenAI 兼容端点）
//!
//! Gemini 提供 OpenAI 兼容的 chat completions 接口，通过 async_openai 调用。
//! - Base URL: https://generativelanguage.googleapis.com/v1beta/openai
//! - API Key: 环境变量 `GEMINI_API_KEY`（进程启动时读取，由入口注入）

use async_openai::config::OpenAIConfig;
use async_openai::types::chat::{
    ChatCompletionRequestMessage, ChatCompletionRequestSystemMessageArgs,
    ChatCompletionRequestUserMessageArgs, CreateChatCompletionRequestArgs,
};
use async_openai::Client;
use async_trait::async_trait;

use crate::llm::GenerativeClient;

/// Gemini OpenAI 兼容端点
pub const GEMINI_OPENAI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/openai";

/// Gemini 客户端：持有 Client，模型名由每次调用传入（供模型回退轮换）
pub struct GeminiClient {
    client: Client<OpenAIConfig>,
}

impl GeminiClient {
    pub fn new(base_url: Option<&str>, api_key: &str) -> Self {
        let config = OpenAIConfig::new()
            .with_api_base(base_url.unwrap_or(GEMINI_OPENAI_BASE_URL))
            .with_api_key(api_key);

        Self {
            client: Client::with_config(config),
        }
    }

    fn to_request_messages(&self, system: &str, prompt: &str) -> Vec<ChatCompletionRequestMessage> {
        vec![
            ChatCompletionRequestMessage::System(
                ChatCompletionRequestSystemMessageArgs::default()
                    .content(system.to_string())
                    .build()
                    .unwrap(),
            ),
            ChatCompletionRequestMessage::User(
                ChatCompletionRequestUserMessageArgs::default()
                    .content(prompt.to_string())
                    .build()
                    .unwrap(),
            ),
        ]
    }
}

#[async_trait]
impl GenerativeClient for GeminiClient {
    async fn generate(&self, model: &str, system: &str, prompt: &str) -> Result<String, String> {
        let request = CreateChatCompletionRequestArgs::default()
            .model(model)
            .messages(self.to_request_messages(system, prompt))
            .build()
            .map_err(|e| e.to_string())?;

        let response = self
            .client
            .chat()
            .create(request)
            .await
            .map_err(|e| e.to_string())?;

        let content = response
            .choices
            .first()
            .and_then(|c| c.message.content.clone())
            .unwrap_or_default();

        Ok(content)
    }
}
