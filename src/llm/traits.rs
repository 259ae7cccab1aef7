//! 生成式客户端抽象
//!
//! 所有后端（Gemini 兼容端点 / Mock）实现 GenerativeClient。错误以服务商返回的
//! 原始文本透传，是否可重试由编排器按文本分类，客户端不做判断。

use async_trait::async_trait;

/// 生成式客户端 trait：单次非流式生成
///
/// 模型名按调用传入（模型回退在同一客户端上轮换候选模型），
/// system 为固定系统指令，prompt 为扁平化后的完整对话文本。
#[async_trait]
pub trait GenerativeClient: Send + Sync {
    async fn generate(&self, model: &str, system: &str, prompt: &str) -> Result<String, String>;
}
