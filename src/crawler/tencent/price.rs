use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;
use reqwest::header;

use crate::{
    crawler::{self, tencent::Tencent, FetchError, ProviderKind, QuoteProvider},
    declare::Quote,
    symbol::Venue,
    util::{self, text},
};

static ASSIGNMENT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"v_[^=]+=["']([^"']+)["']"#).expect("valid tencent pattern"));

/// 欄位索引：目前價格、前收
const PRICE_INDEX: usize = 3;
const PREVIOUS_CLOSE_INDEX: usize = 4;
const MIN_FIELDS: usize = 5;

#[async_trait]
impl QuoteProvider for Tencent {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Tencent
    }

    async fn fetch(&self, symbol: &str) -> Result<Quote, FetchError> {
        let code = translate(symbol).ok_or_else(|| FetchError::Unsupported(symbol.to_string()))?;
        let url = format!("{host}/q={code}", host = self.host, code = code);
        let headers = util::http::no_store_headers(&[(header::REFERER, "https://gu.qq.com/")]);
        let text = util::http::get_use_gbk(&url, Some(headers), self.timeout).await?;

        parse_quote(symbol, &text)
    }
}

/// 代號轉換，美股回傳 `None`
pub(crate) fn translate(symbol: &str) -> Option<String> {
    Venue::parse(symbol).mainland_code()
}

/// 解析 `v_xxx="f0~f1~f2~price~prev~..."`
pub(crate) fn parse_quote(symbol: &str, body: &str) -> Result<Quote, FetchError> {
    let fields = crawler::capture_assignment(&ASSIGNMENT, body)?
        .split('~')
        .collect::<Vec<&str>>();

    if fields.len() < MIN_FIELDS {
        return Err(FetchError::MalformedResponse(format!(
            "expected at least {} fields, got {}",
            MIN_FIELDS,
            fields.len()
        )));
    }

    let price = crawler::parse_price(fields[PRICE_INDEX])?;
    let previous_close = text::parse_decimal_or_zero(fields[PREVIOUS_CLOSE_INDEX]);
    let currency = Venue::parse(symbol).market().currency();

    crawler::build_quote(symbol, price, previous_close, currency.as_ref())
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use httpmock::{Method::GET, MockServer};
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    use super::*;
    use crate::declare::ProviderOutcome;

    const HK_FIXTURE: &str = include_str!("../../../tests/fixtures/tencent_hk00700.txt");
    const SH_FIXTURE: &str = include_str!("../../../tests/fixtures/tencent_sh600519.txt");

    #[test]
    fn test_translate() {
        assert_eq!(translate("0700.HK").unwrap(), "hk00700");
        assert_eq!(translate("700.HK").unwrap(), "hk00700");
        assert_eq!(translate("600519.SS").unwrap(), "sh600519");
        assert_eq!(translate("000001.SZ").unwrap(), "sz000001");
        assert!(translate("AAPL").is_none());
    }

    #[test]
    fn test_parse_hong_kong_fixture() {
        let q = parse_quote("0700.HK", HK_FIXTURE).unwrap();
        assert_eq!(q.symbol, "0700.HK");
        assert_eq!(q.price, dec!(378.8));
        assert_eq!(q.previous_close, dec!(382.2));
        assert_eq!(q.change, dec!(-3.4));
        assert_eq!(q.currency, "HKD");
    }

    #[test]
    fn test_parse_shanghai_fixture() {
        let q = parse_quote("600519.SS", SH_FIXTURE).unwrap();
        assert_eq!(q.price, dec!(1500));
        assert_eq!(q.previous_close, dec!(1498.88));
        assert_eq!(q.currency, "CNY");
    }

    #[test]
    fn test_parse_rejects_non_positive_price() {
        let body = r#"v_hk00700="100~腾讯控股~00700~0.000~382.200~0.000";"#;
        assert!(matches!(
            parse_quote("0700.HK", body),
            Err(FetchError::NoPositivePrice)
        ));
    }

    #[test]
    fn test_parse_rejects_change_out_of_range() {
        let body = r#"v_hk00700="100~腾讯控股~00700~100000000000000000000~0.000000001~0.000";"#;
        assert!(matches!(
            parse_quote("0700.HK", body),
            Err(FetchError::MalformedResponse(_))
        ));
    }

    #[test]
    fn test_parse_rejects_short_or_missing_payload() {
        assert!(matches!(
            parse_quote("0700.HK", r#"v_hk00700="100~腾讯控股~00700~378.800";"#),
            Err(FetchError::MalformedResponse(_))
        ));
        assert!(matches!(
            parse_quote("0700.HK", r#"v_pv_none_match="1";"#),
            Err(FetchError::MalformedResponse(_))
        ));
        assert!(matches!(
            parse_quote("0700.HK", "<html>blocked</html>"),
            Err(FetchError::MalformedResponse(_))
        ));
    }

    #[test]
    fn test_parse_unknown_previous_close() {
        let body = r#"v_sz000001="51~平安银行~000001~11.020~--~11.000";"#;
        let q = parse_quote("000001.SZ", body).unwrap();
        assert_eq!(q.previous_close, Decimal::ZERO);
        assert_eq!(q.change, Decimal::ZERO);
        assert_eq!(q.change_percent, Decimal::ZERO);
    }

    #[tokio::test]
    async fn test_fetch_quote_from_mock() {
        let server = MockServer::start();
        let (encoded, _, _) = encoding_rs::GBK.encode(HK_FIXTURE);
        let mock = server.mock(|when, then| {
            when.method(GET).path("/q=hk00700");
            then.status(200).body(encoded.as_ref());
        });

        let tencent = Tencent::new(server.base_url(), Duration::from_secs(5));
        let outcome = tencent.fetch_quote("0700.HK").await;

        mock.assert();
        match outcome {
            ProviderOutcome::Success(q) => assert_eq!(q.price, dec!(378.8)),
            ProviderOutcome::Unavailable => panic!("expected a quote"),
        }
    }

    #[tokio::test]
    async fn test_us_symbol_skips_network() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET);
            then.status(200).body("");
        });

        let tencent = Tencent::new(server.base_url(), Duration::from_secs(5));
        assert_eq!(tencent.fetch_quote("AAPL").await, ProviderOutcome::Unavailable);
        mock.assert_calls(0);
    }

    #[tokio::test]
    async fn test_upstream_error_is_unavailable() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/q=sh600519");
            then.status(502);
        });

        let tencent = Tencent::new(server.base_url(), Duration::from_secs(5));
        assert_eq!(
            tencent.fetch_quote("600519.SS").await,
            ProviderOutcome::Unavailable
        );
    }
}
