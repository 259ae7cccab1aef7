//! 应用配置：从 config/default.toml 与环境变量加载
//!
//! 加载顺序：先读 TOML 文件，再用环境变量 `FITCOACH__*` 覆盖（双下划线表示嵌套，
//! 如 `FITCOACH__WEB__PORT=9090`）。所有默认值与编译内置常量一致，
//! 零配置部署的行为即规格行为。

use std::path::PathBuf;

use serde::Deserialize;

use crate::coach::DEFAULT_MODELS;
use crate::llm::GEMINI_OPENAI_BASE_URL;

/// 应用配置根（对应 config/default.toml 的顶层）
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    #[serde(default)]
    pub app: AppSection,
    #[serde(default)]
    pub llm: LlmSection,
    #[serde(default)]
    pub retry: RetrySection,
    #[serde(default)]
    pub web: WebSection,
}

/// [app] 段：应用名
#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppSection {
    pub name: Option<String>,
}

/// [llm] 段：端点与候选模型
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LlmSection {
    /// Gemini OpenAI 兼容端点
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// 候选模型，按优先级排列
    #[serde(default = "default_models")]
    pub models: Vec<String>,
    /// API Key 所在环境变量名（进程启动时必须存在）
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,
}

impl Default for LlmSection {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            models: default_models(),
            api_key_env: default_api_key_env(),
        }
    }
}

fn default_base_url() -> String {
    GEMINI_OPENAI_BASE_URL.to_string()
}

fn default_models() -> Vec<String> {
    DEFAULT_MODELS.iter().map(|m| m.to_string()).collect()
}

fn default_api_key_env() -> String {
    "GEMINI_API_KEY".to_string()
}

/// [retry] 段：单模型重试次数与退避基准
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RetrySection {
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
    #[serde(default = "default_backoff_base_ms")]
    pub backoff_base_ms: u64,
}

impl Default for RetrySection {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            backoff_base_ms: default_backoff_base_ms(),
        }
    }
}

fn default_max_attempts() -> u32 {
    3
}

fn default_backoff_base_ms() -> u64 {
    1000
}

/// [web] 段：监听端口
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct WebSection {
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for WebSection {
    fn default() -> Self {
        Self {
            port: default_port(),
        }
    }
}

fn default_port() -> u16 {
    8080
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            app: AppSection::default(),
            llm: LlmSection::default(),
            retry: RetrySection::default(),
            web: WebSection::default(),
        }
    }
}

/// 从 config 目录加载配置，环境变量 FITCOACH__* 可覆盖
///
/// 1. 按顺序查找 config/default.toml、../config/default.toml、default.toml，找到则作为第一源
/// 2. 若传入 config_path 且文件存在，则追加该文件（可覆盖前面的键）
/// 3. 最后叠加环境变量 FITCOACH__*（双下划线表示嵌套键）
pub fn load_config(config_path: Option<PathBuf>) -> Result<AppConfig, config::ConfigError> {
    let mut builder = config::Config::builder();

    let default_names = ["config/default", "../config/default", "default"];
    for name in default_names {
        let path = format!("{}.toml", name);
        if std::path::Path::new(&path).exists() {
            builder = builder.add_source(config::File::with_name(name).required(false));
            break;
        }
    }

    if let Some(ref path) = config_path {
        if path.exists() {
            builder = builder.add_source(config::File::from(path.clone()).required(false));
        }
    }

    builder = builder.add_source(
        config::Environment::with_prefix("FITCOACH")
            .separator("__")
            .try_parsing(true),
    );

    let c = builder.build()?;
    c.try_deserialize()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_builtin_constants() {
        let cfg = AppConfig::default();
        assert_eq!(cfg.llm.models, vec!["gemini-3-flash-preview"]);
        assert_eq!(cfg.llm.base_url, GEMINI_OPENAI_BASE_URL);
        assert_eq!(cfg.llm.api_key_env, "GEMINI_API_KEY");
        assert_eq!(cfg.retry.max_attempts, 3);
        assert_eq!(cfg.retry.backoff_base_ms, 1000);
        assert_eq!(cfg.web.port, 8080);
    }
}
