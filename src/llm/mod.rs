//! 生成式后端层：客户端抽象与实现（Gemini OpenAI 兼容端点 / Mock）

pub mod gemini;
pub mod mock;
pub mod traits;

pub use gemini::{GeminiClient, GEMINI_OPENAI_BASE_URL};
pub use mock::MockClient;
pub use traits::GenerativeClient;
