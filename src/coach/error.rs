//! 编排器错误类型
//!
//! 所有失败路径最终落到可展示的字符串：HTTP 层用 user_message 映射为
//! 面向用户的两类文案，服务商原始错误只进日志不出站。

use thiserror::Error;

/// 编排过程中的错误
#[derive(Error, Debug)]
pub enum CoachError {
    /// 所有候选模型的重试均被瞬时错误耗尽
    #[error("All models are currently unavailable. Please try again later.")]
    Unavailable,

    /// 不可重试的服务商错误，保留原始文本
    #[error("Provider error: {0}")]
    Provider(String),

    /// 请求未携带任何对话消息
    #[error("Conversation history is empty")]
    EmptyHistory,
}

impl CoachError {
    /// 映射为面向用户的文案（HTTP 500 响应体）
    pub fn user_message(&self) -> &'static str {
        match self {
            CoachError::Unavailable => {
                "The AI models are currently experiencing high demand. Please try again in a minute."
            }
            _ => "Failed to get response from AI. Please try again.",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unavailable_maps_to_high_demand_message() {
        assert!(CoachError::Unavailable.user_message().contains("high demand"));
    }

    #[test]
    fn test_provider_error_maps_to_generic_message() {
        let err = CoachError::Provider("400 INVALID_ARGUMENT".to_string());
        assert_eq!(
            err.user_message(),
            "Failed to get response from AI. Please try again."
        );
    }
}
