use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;
use reqwest::header;
use rust_decimal::Decimal;
use scraper::{Html, Selector};

use crate::{
    crawler::{
        self,
        yahoo::{price, YahooPage},
        FetchError, ProviderKind, QuoteProvider,
    },
    declare::Quote,
    util::{self, text},
};

// 內嵌資料可能是一般 JSON，也可能是被跳脫成字串的 JSON（\"field\"），數值可能包在 {"raw":...} 內
static PRICE: Lazy<Regex> = Lazy::new(|| field_pattern("regularMarketPrice"));
static PREVIOUS_CLOSE: Lazy<Regex> = Lazy::new(|| field_pattern("regularMarketPreviousClose"));
static CURRENCY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"\\?"currency\\?"\s*:\s*\\?"([A-Za-z]{3})\\?""#).expect("valid currency pattern")
});

fn field_pattern(field: &str) -> Regex {
    Regex::new(&format!(
        r#"\\?"{field}\\?"\s*:\s*(?:\{{\s*\\?"raw\\?"\s*:\s*)?(-?\d+(?:\.\d+)?(?:[eE][+-]?\d+)?)"#,
        field = field
    ))
    .expect("valid field pattern")
}

#[async_trait]
impl QuoteProvider for YahooPage {
    fn kind(&self) -> ProviderKind {
        ProviderKind::YahooPage
    }

    async fn fetch(&self, symbol: &str) -> Result<Quote, FetchError> {
        let url = format!(
            "{host}/quote/{symbol}/",
            host = self.host,
            symbol = urlencoding::encode(symbol)
        );
        let headers = util::http::no_store_headers(&[
            (header::ACCEPT, "text/html,application/xhtml+xml"),
            (header::ACCEPT_LANGUAGE, "en-US,en;q=0.5"),
        ]);
        let text = util::http::get(&url, Some(headers), self.timeout).await?;

        parse_quote(symbol, &text)
    }
}

/// 從報價頁的 `<script>` 區塊擷取價格、前收與幣別
pub(crate) fn parse_quote(symbol: &str, html: &str) -> Result<Quote, FetchError> {
    let blob = find_data_blob(symbol, html)?;

    let price = PRICE
        .captures(&blob)
        .and_then(|c| c.get(1))
        .ok_or_else(|| FetchError::MalformedResponse("missing regularMarketPrice".to_string()))?;
    let price = crawler::parse_price(price.as_str())?;

    let previous_close = PREVIOUS_CLOSE
        .captures(&blob)
        .and_then(|c| c.get(1))
        .map(|m| text::parse_decimal_or_zero(m.as_str()))
        .unwrap_or(Decimal::ZERO);
    let currency = CURRENCY
        .captures(&blob)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_uppercase());

    crawler::build_quote(
        symbol,
        price,
        previous_close,
        price::currency_or_default(symbol, currency),
    )
}

/// 挑出含有報價欄位的 script；優先選同時出現該代號的區塊，避免取到相關個股的價格
fn find_data_blob(symbol: &str, html: &str) -> Result<String, FetchError> {
    let document = Html::parse_document(html);
    let selector = Selector::parse("script")
        .map_err(|why| FetchError::MalformedResponse(format!("selector: {:?}", why)))?;

    let candidates = document
        .select(&selector)
        .map(|e| e.text().collect::<String>())
        .filter(|s| PRICE.is_match(s))
        .collect::<Vec<String>>();

    let quoted = format!("\"{}\"", symbol);
    let escaped = format!("\\\"{}\\\"", symbol);
    let preferred = candidates
        .iter()
        .position(|s| s.contains(&quoted) || s.contains(&escaped))
        .unwrap_or(0);

    candidates
        .into_iter()
        .nth(preferred)
        .ok_or_else(|| FetchError::MalformedResponse("no quote data blob in page".to_string()))
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use httpmock::{Method::GET, MockServer};
    use rust_decimal_macros::dec;

    use super::*;
    use crate::declare::ProviderOutcome;

    const AAPL_FIXTURE: &str = include_str!("../../../tests/fixtures/yahoo_page_AAPL.html");

    #[test]
    fn test_parse_fixture_prefers_symbol_blob() {
        let q = parse_quote("AAPL", AAPL_FIXTURE).unwrap();
        assert_eq!(q.price, dec!(236.85));
        assert_eq!(q.previous_close, dec!(237.69));
        assert_eq!(q.currency, "USD");
    }

    #[test]
    fn test_parse_plain_json_blob() {
        let html = r#"<html><body><script>root.App.main = {"QuoteSummaryStore":{"price":{"currency":"HKD","regularMarketPrice":{"raw":378.8,"fmt":"378.80"},"regularMarketPreviousClose":{"raw":382.2,"fmt":"382.20"}}}};</script></body></html>"#;
        let q = parse_quote("0700.HK", html).unwrap();
        assert_eq!(q.price, dec!(378.8));
        assert_eq!(q.previous_close, dec!(382.2));
        assert_eq!(q.currency, "HKD");
    }

    #[test]
    fn test_parse_without_previous_close_or_currency() {
        let html = r#"<script>{"regularMarketPrice":1500.5}</script>"#;
        let q = parse_quote("600519.SS", html).unwrap();
        assert_eq!(q.price, dec!(1500.5));
        assert_eq!(q.previous_close, Decimal::ZERO);
        assert_eq!(q.currency, "CNY");
    }

    #[test]
    fn test_parse_rejects_non_positive_price() {
        let html = r#"<script>{"regularMarketPrice":{"raw":0,"fmt":"0.00"}}</script>"#;
        assert!(matches!(
            parse_quote("AAPL", html),
            Err(FetchError::NoPositivePrice)
        ));
    }

    #[test]
    fn test_parse_ignores_markup_outside_scripts() {
        let html = r#"<html><body><p>"regularMarketPrice":123.45</p></body></html>"#;
        assert!(matches!(
            parse_quote("AAPL", html),
            Err(FetchError::MalformedResponse(_))
        ));
    }

    #[tokio::test]
    async fn test_fetch_quote_from_mock() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET).path("/quote/AAPL/");
            then.status(200)
                .header("content-type", "text/html; charset=utf-8")
                .body(AAPL_FIXTURE);
        });

        let yahoo = YahooPage::new(server.base_url(), Duration::from_secs(5));
        let outcome = yahoo.fetch_quote("AAPL").await;

        mock.assert();
        assert!(outcome.is_success());
    }

    #[tokio::test]
    async fn test_consent_redirect_page_is_unavailable() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/quote/AAPL/");
            then.status(200).body("<html><body>consent required</body></html>");
        });

        let yahoo = YahooPage::new(server.base_url(), Duration::from_secs(5));
        assert_eq!(yahoo.fetch_quote("AAPL").await, ProviderOutcome::Unavailable);
    }
}
