//! FitCoach - Rust 健身教练对话服务
//!
//! 模块划分：
//! - **chat**: 对话数据模型（Turn / Transcript）
//! - **coach**: 对话编排器（Prompt 扁平化、重试与模型回退）
//! - **config**: 应用配置加载（TOML + 环境变量）
//! - **llm**: 生成式后端抽象与实现（Gemini OpenAI 兼容端点 / Mock）
//! - **report**: 会话报告导出（PDF 排版与话题提取）

pub mod chat;
pub mod coach;
pub mod config;
pub mod llm;
pub mod report;
