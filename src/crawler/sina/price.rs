use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;
use reqwest::header;
use rust_decimal::Decimal;

use crate::{
    crawler::{self, sina::Sina, FetchError, ProviderKind, QuoteProvider},
    declare::Quote,
    symbol::{Market, Venue},
    util::{self, text},
};

static ASSIGNMENT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"var hq_str_[^=]+=["']([^"']+)["']"#).expect("valid sina pattern")
});

/// 各市場的欄位配置
struct Layout {
    price: usize,
    /// `None` 代表此市場的回應沒有前收
    previous_close: Option<usize>,
    min_fields: usize,
}

/// 港股：名稱, 中文名, 現價, 前收, ...
const HONG_KONG: Layout = Layout {
    price: 2,
    previous_close: Some(3),
    min_fields: 4,
};

/// A 股：名稱, 開盤, 前收, 現價, ...
const MAINLAND_CHINA: Layout = Layout {
    price: 3,
    previous_close: Some(2),
    min_fields: 4,
};

/// 美股：名稱, 現價, ...
const OTHER: Layout = Layout {
    price: 1,
    previous_close: None,
    min_fields: 2,
};

#[async_trait]
impl QuoteProvider for Sina {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Sina
    }

    async fn fetch(&self, symbol: &str) -> Result<Quote, FetchError> {
        let url = format!("{host}/list={code}", host = self.host, code = translate(symbol));
        let headers =
            util::http::no_store_headers(&[(header::REFERER, "https://finance.sina.com.cn/")]);
        let text = util::http::get_use_gbk(&url, Some(headers), self.timeout).await?;

        parse_quote(symbol, &text)
    }
}

/// 代號轉換，美股為 `gb_` 加小寫代號
pub(crate) fn translate(symbol: &str) -> String {
    let venue = Venue::parse(symbol);
    venue
        .mainland_code()
        .unwrap_or_else(|| format!("gb_{}", symbol.to_lowercase()))
}

pub(crate) fn parse_quote(symbol: &str, body: &str) -> Result<Quote, FetchError> {
    let fields = crawler::capture_assignment(&ASSIGNMENT, body)?
        .split(',')
        .collect::<Vec<&str>>();
    let market = Venue::parse(symbol).market();
    let layout = match market {
        Market::HongKong => &HONG_KONG,
        Market::MainlandChina => &MAINLAND_CHINA,
        Market::Other => &OTHER,
    };

    if fields.len() < layout.min_fields {
        return Err(FetchError::MalformedResponse(format!(
            "expected at least {} fields for {}, got {}",
            layout.min_fields,
            market,
            fields.len()
        )));
    }

    let price = crawler::parse_price(fields[layout.price])?;
    let previous_close = layout
        .previous_close
        .map(|i| text::parse_decimal_or_zero(fields[i]))
        .unwrap_or(Decimal::ZERO);

    crawler::build_quote(symbol, price, previous_close, market.currency().as_ref())
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use httpmock::{Method::GET, MockServer};
    use rust_decimal_macros::dec;

    use super::*;
    use crate::declare::ProviderOutcome;

    const HK_FIXTURE: &str = include_str!("../../../tests/fixtures/sina_hk00700.txt");
    const SH_FIXTURE: &str = include_str!("../../../tests/fixtures/sina_sh600519.txt");
    const US_FIXTURE: &str = include_str!("../../../tests/fixtures/sina_gb_aapl.txt");

    #[test]
    fn test_translate() {
        assert_eq!(translate("0700.HK"), "hk00700");
        assert_eq!(translate("9988.HK"), "hk09988");
        assert_eq!(translate("600519.SS"), "sh600519");
        assert_eq!(translate("000858.SZ"), "sz000858");
        assert_eq!(translate("AAPL"), "gb_aapl");
        assert_eq!(translate("BRK.B"), "gb_brk.b");
    }

    #[test]
    fn test_parse_hong_kong_fixture() {
        let q = parse_quote("0700.HK", HK_FIXTURE).unwrap();
        assert_eq!(q.price, dec!(378.8));
        assert_eq!(q.previous_close, dec!(382.2));
        assert_eq!(q.currency, "HKD");
    }

    /// A 股的現價在索引 3、前收在索引 2，與港股相反
    #[test]
    fn test_parse_mainland_transposed_offsets() {
        let q = parse_quote("600519.SS", SH_FIXTURE).unwrap();
        assert_eq!(q.price, dec!(1500));
        assert_eq!(q.previous_close, dec!(1498.88));
        assert_eq!(q.currency, "CNY");

        // 同一份欄位若當成港股解析，現價與前收會對調
        let as_hk = parse_quote("600519.HK", SH_FIXTURE).unwrap();
        assert_eq!(as_hk.price, dec!(1498.88));
        assert_eq!(as_hk.previous_close, dec!(1500));
    }

    #[test]
    fn test_parse_us_fixture() {
        let q = parse_quote("AAPL", US_FIXTURE).unwrap();
        assert_eq!(q.price, dec!(236.85));
        assert_eq!(q.previous_close, Decimal::ZERO);
        assert_eq!(q.change, Decimal::ZERO);
        assert_eq!(q.currency, "USD");
    }

    #[test]
    fn test_parse_rejects_non_positive_price() {
        let body = r#"var hq_str_sz000001="平安银行,0.000,11.000,0.000,0.000";"#;
        assert!(matches!(
            parse_quote("000001.SZ", body),
            Err(FetchError::NoPositivePrice)
        ));

        let body = r#"var hq_str_gb_aapl="苹果,0.0000";"#;
        assert!(matches!(parse_quote("AAPL", body), Err(FetchError::NoPositivePrice)));
    }

    #[test]
    fn test_parse_rejects_empty_payload() {
        // 查無代號時新浪回傳空字串
        assert!(matches!(
            parse_quote("ZZZZ", r#"var hq_str_gb_zzzz="";"#),
            Err(FetchError::MalformedResponse(_))
        ));
        assert!(matches!(
            parse_quote("0700.HK", r#"var hq_str_hk00700="TENCENT,腾讯控股,378.800";"#),
            Err(FetchError::MalformedResponse(_))
        ));
    }

    #[tokio::test]
    async fn test_fetch_quote_from_mock() {
        let server = MockServer::start();
        let (encoded, _, _) = encoding_rs::GBK.encode(US_FIXTURE);
        let mock = server.mock(|when, then| {
            when.method(GET).path("/list=gb_aapl");
            then.status(200).body(encoded.as_ref());
        });

        let sina = Sina::new(server.base_url(), Duration::from_secs(5));
        let outcome = sina.fetch_quote("AAPL").await;

        mock.assert();
        assert!(outcome.is_success());
    }

    #[tokio::test]
    async fn test_forbidden_is_unavailable() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/list=hk00700");
            then.status(403).body("Kinsoku");
        });

        let sina = Sina::new(server.base_url(), Duration::from_secs(5));
        assert_eq!(sina.fetch_quote("0700.HK").await, ProviderOutcome::Unavailable);
    }
}
