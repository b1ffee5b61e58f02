use std::sync::Arc;

use axum::{
    extract::{Query, State},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::{
    crawler::resolver::ProviderStat,
    declare::{Resolution, SearchResult},
    web::{
        error::{ApiError, ApiResult},
        AppState,
    },
};

#[derive(Deserialize, Debug, Default)]
pub struct QuoteParams {
    symbol: Option<String>,
}

#[derive(Deserialize, Debug, Default)]
pub struct QuotesParams {
    symbols: Option<String>,
}

#[derive(Deserialize, Debug, Default)]
pub struct SearchParams {
    q: Option<String>,
}

#[derive(Serialize)]
pub struct QuotesBody {
    quotes: Vec<Resolution>,
}

#[derive(Serialize)]
pub struct SearchBody {
    stocks: Vec<SearchResult>,
}

#[derive(Serialize)]
pub struct StatsBody {
    providers: Vec<ProviderStat>,
}

/// 取出查詢參數，空白視為未提供；值本身原樣保留
fn required(value: Option<String>, name: &'static str) -> ApiResult<String> {
    value
        .filter(|v| !v.trim().is_empty())
        .ok_or(ApiError::MissingInput(name))
}

/// GET /quote?symbol=
pub async fn quote(
    State(state): State<Arc<AppState>>,
    Query(params): Query<QuoteParams>,
) -> ApiResult<Json<Resolution>> {
    let symbol = required(params.symbol, "symbol")?;
    Ok(Json(state.quotes.resolve(&symbol).await))
}

/// GET /quotes?symbols=A,B,C
pub async fn quotes(
    State(state): State<Arc<AppState>>,
    Query(params): Query<QuotesParams>,
) -> ApiResult<Json<QuotesBody>> {
    let raw = required(params.symbols, "symbols")?;
    let symbols: Vec<String> = raw
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect();
    if symbols.is_empty() {
        return Err(ApiError::MissingInput("symbols"));
    }

    Ok(Json(QuotesBody {
        quotes: state.quotes.resolve_many(&symbols).await,
    }))
}

/// GET /search?q=
pub async fn search(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SearchParams>,
) -> ApiResult<Json<SearchBody>> {
    let query = required(params.q, "q")?;
    Ok(Json(SearchBody {
        stocks: state.search.search(&query).await,
    }))
}

/// GET /stats
pub async fn stats(State(state): State<Arc<AppState>>) -> Json<StatsBody> {
    Json(StatsBody {
        providers: state.quotes.stats(),
    })
}

/// GET /health
pub async fn health() -> &'static str {
    "ok"
}
