//! FitCoach Web 服务
//!
//! 启动: cargo run --bin fitcoach-web
//! 需要环境变量 GEMINI_API_KEY；POST /api/chat 聊天，POST /api/report 导出 PDF。

use std::sync::Arc;

use anyhow::Context;
use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use fitcoach::chat::{Transcript, Turn};
use fitcoach::coach::{Orchestrator, RetryPolicy};
use fitcoach::config::load_config;
use fitcoach::llm::{GeminiClient, GenerativeClient};
use fitcoach::report;

struct AppState {
    orchestrator: Orchestrator,
}

#[derive(Debug, Deserialize)]
struct ChatRequest {
    messages: Vec<Turn>,
}

#[derive(Debug, Serialize)]
struct ChatResponse {
    message: String,
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env().add_directive("info".parse().unwrap()))
        .with(fmt::layer())
        .init();

    let cfg = load_config(None).unwrap_or_else(|e| {
        tracing::warn!("Config load failed ({}), using defaults", e);
        fitcoach::config::AppConfig::default()
    });

    // 唯一的外部机密：启动即读取，缺失直接失败
    let api_key = std::env::var(&cfg.llm.api_key_env)
        .with_context(|| format!("{} is required", cfg.llm.api_key_env))?;

    // 客户端在入口构造一次，注入编排器，跨请求共享
    let client: Arc<dyn GenerativeClient> =
        Arc::new(GeminiClient::new(Some(&cfg.llm.base_url), &api_key));
    let orchestrator = Orchestrator::new(
        client,
        cfg.llm.models.clone(),
        RetryPolicy {
            max_attempts: cfg.retry.max_attempts,
            backoff_base_ms: cfg.retry.backoff_base_ms,
        },
    );

    let state = Arc::new(AppState { orchestrator });

    let app = Router::new()
        .route("/api/chat", post(api_chat))
        .route("/api/report", post(api_report))
        .route("/api/health", get(|| async { "OK" }))
        .with_state(Arc::clone(&state));

    let port = std::env::var("FITCOACH_WEB_PORT")
        .ok()
        .and_then(|s| s.parse::<u16>().ok())
        .unwrap_or(cfg.web.port);
    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("FitCoach Web: http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// POST /api/chat：请求体 { "messages": [{ "role", "content" }, ...] }，
/// 成功 200 { "message" }，失败 500 { "error" }（仅这两种状态码）
async fn api_chat(State(state): State<Arc<AppState>>, Json(req): Json<ChatRequest>) -> Response {
    let transcript = Transcript::from_turns(req.messages);
    match state.orchestrator.reply(transcript.turns()).await {
        Ok(message) => (StatusCode::OK, Json(ChatResponse { message })).into_response(),
        Err(e) => {
            tracing::error!("chat request failed: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: e.user_message().to_string(),
                }),
            )
                .into_response()
        }
    }
}

/// POST /api/report：同一请求体，返回带日期文件名的 PDF 下载
async fn api_report(Json(req): Json<ChatRequest>) -> Response {
    match report::render_report(&req.messages) {
        Ok(bytes) => {
            let filename = format!(
                "FitCoach_Report_{}.pdf",
                chrono::Local::now().format("%Y-%m-%d")
            );
            (
                StatusCode::OK,
                [
                    (header::CONTENT_TYPE, "application/pdf".to_string()),
                    (
                        header::CONTENT_DISPOSITION,
                        format!("attachment; filename=\"{}\"", filename),
                    ),
                ],
                bytes,
            )
                .into_response()
        }
        Err(e) => {
            tracing::error!("report generation failed: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Failed to generate report. Please try again.".to_string(),
                }),
            )
                .into_response()
        }
    }
}
