use std::sync::Arc;

use anyhow::Result;
use axum::{routing::get, Router};

use crate::{
    config::{App, SETTINGS},
    crawler::resolver::QuoteResolver,
    logging,
    search::SearchResolver,
};

/// 錯誤回應
pub mod error;
/// 各路由的處理函式
pub mod handler;

/// 各請求共用的唯讀狀態
pub struct AppState {
    pub quotes: QuoteResolver,
    pub search: SearchResolver,
}

impl AppState {
    pub fn from_settings(settings: &App) -> Self {
        AppState {
            quotes: QuoteResolver::from_settings(settings),
            search: SearchResolver::from_settings(settings),
        }
    }
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/quote", get(handler::quote))
        .route("/quotes", get(handler::quotes))
        .route("/search", get(handler::search))
        .route("/stats", get(handler::stats))
        .route("/health", get(handler::health))
        .with_state(state)
}

/// 啟動 HTTP 服務，直到服務停止才返回
pub async fn start() -> Result<()> {
    let addr = format!("0.0.0.0:{}", SETTINGS.server.port);
    let state = Arc::new(AppState::from_settings(&SETTINGS));

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    logging::info_file_async(format!("HTTP 服務正在 {} 開始服務...", addr));
    logging::info_console(format!("listening on {}", addr));

    let result = axum::serve(listener, router(state)).await;
    match &result {
        Ok(_) => logging::info_file_async(format!("HTTP 服務在 {} 正常停止", addr)),
        Err(why) => {
            logging::error_file_async(format!("HTTP 服務運行中斷 ({}): {}", addr, why))
        }
    }

    Ok(result?)
}
