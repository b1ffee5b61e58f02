use async_trait::async_trait;
use reqwest::header;
use rust_decimal::Decimal;
use serde::Deserialize;

use crate::{
    crawler::{self, yahoo::YahooChart, FetchError, ProviderKind, QuoteProvider},
    declare::Quote,
    symbol,
    util::{self, text},
};

#[derive(Deserialize, Debug)]
struct ChartEnvelope {
    chart: Chart,
}

#[derive(Deserialize, Debug)]
struct Chart {
    #[serde(default)]
    result: Option<Vec<ChartResult>>,
}

#[derive(Deserialize, Debug)]
struct ChartResult {
    meta: Option<ChartMeta>,
}

/// chart API `meta` 區塊，只保留報價需要的欄位
#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
struct ChartMeta {
    regular_market_price: Option<f64>,
    chart_previous_close: Option<f64>,
    previous_close: Option<f64>,
    currency: Option<String>,
}

#[async_trait]
impl QuoteProvider for YahooChart {
    fn kind(&self) -> ProviderKind {
        ProviderKind::YahooChart
    }

    async fn fetch(&self, symbol: &str) -> Result<Quote, FetchError> {
        let url = format!(
            "{host}/v8/finance/chart/{symbol}?interval=1d&range=1d",
            host = self.host,
            symbol = urlencoding::encode(symbol)
        );
        let headers = util::http::no_store_headers(&[
            (header::ACCEPT, "application/json"),
            (header::ACCEPT_LANGUAGE, "en-US,en;q=0.5"),
        ]);
        let text = util::http::get(&url, Some(headers), self.timeout).await?;

        parse_quote(symbol, &text)
    }
}

pub(crate) fn parse_quote(symbol: &str, body: &str) -> Result<Quote, FetchError> {
    let envelope: ChartEnvelope = serde_json::from_str(body)
        .map_err(|why| FetchError::MalformedResponse(format!("chart json: {}", why)))?;
    let meta = envelope
        .chart
        .result
        .and_then(|r| r.into_iter().next())
        .and_then(|r| r.meta)
        .ok_or_else(|| FetchError::MalformedResponse("no result in chart response".to_string()))?;

    let price = meta
        .regular_market_price
        .and_then(to_decimal)
        .ok_or_else(|| FetchError::MalformedResponse("missing regularMarketPrice".to_string()))?;
    if price <= Decimal::ZERO {
        return Err(FetchError::NoPositivePrice);
    }

    let previous_close = meta
        .chart_previous_close
        .filter(is_present)
        .or(meta.previous_close)
        .and_then(to_decimal)
        .unwrap_or(Decimal::ZERO);
    let currency = currency_or_default(symbol, meta.currency);

    crawler::build_quote(symbol, price, previous_close, currency)
}

/// 0 與 NaN 視為沒有值
fn is_present(value: &f64) -> bool {
    *value != 0.0 && !value.is_nan()
}

/// 以 f64 的最短十進位表示轉換，避免 236.85 變成 236.849999...
pub(crate) fn to_decimal(value: f64) -> Option<Decimal> {
    text::parse_decimal(&value.to_string(), None)
        .ok()
        .map(|d| d.normalize())
}

/// 來源沒給幣別時依市場補上
pub(crate) fn currency_or_default(symbol: &str, currency: Option<String>) -> String {
    currency
        .filter(|c| !c.trim().is_empty())
        .unwrap_or_else(|| symbol::classify(symbol).currency.to_string())
}
