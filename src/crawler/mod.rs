use std::time::Instant;

use async_trait::async_trait;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};
use thiserror::Error;

use crate::{
    declare::{ProviderOutcome, Quote},
    logging,
};

/// 依市場決定報價來源順序並依序嘗試
pub mod resolver;
/// 新浪財經
pub mod sina;
/// 騰訊證券
pub mod tencent;
/// 雅虎財經
pub mod yahoo;

/// 報價來源代號，設定檔中以 snake_case 表示
#[derive(
    Debug,
    Copy,
    Clone,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ProviderKind {
    /// qt.gtimg.cn，`~` 分隔
    Tencent,
    /// hq.sinajs.cn，`,` 分隔且欄位位置依市場而異
    Sina,
    /// query1.finance.yahoo.com chart API
    YahooChart,
    /// finance.yahoo.com 報價頁內嵌的 JSON
    YahooPage,
}

impl ProviderKind {
    pub fn iterator() -> impl Iterator<Item = Self> {
        [Self::Tencent, Self::Sina, Self::YahooChart, Self::YahooPage]
            .iter()
            .copied()
    }
}

/// 報價來源內部的失敗原因，對外一律收斂成 `ProviderOutcome::Unavailable`
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("symbol {0} is not served by this provider")]
    Unsupported(String),
    #[error("upstream unavailable: {0}")]
    UpstreamUnavailable(String),
    #[error("malformed response: {0}")]
    MalformedResponse(String),
    #[error("no positive price in response")]
    NoPositivePrice,
}

impl FetchError {
    /// 記錄在 log 的 outcome 標籤
    fn label(&self) -> &'static str {
        match self {
            FetchError::Unsupported(_) => "unsupported",
            FetchError::UpstreamUnavailable(_) => "upstream_unavailable",
            FetchError::MalformedResponse(_) => "malformed_response",
            FetchError::NoPositivePrice => "no_positive_price",
        }
    }
}

impl From<anyhow::Error> for FetchError {
    fn from(why: anyhow::Error) -> Self {
        FetchError::UpstreamUnavailable(format!("{:?}", why))
    }
}

#[async_trait]
pub trait QuoteProvider: Send + Sync {
    fn kind(&self) -> ProviderKind;

    /// 發出一次請求並解析成報價
    async fn fetch(&self, symbol: &str) -> Result<Quote, FetchError>;

    /// 取得報價，任何錯誤都只記錄不往外拋
    async fn fetch_quote(&self, symbol: &str) -> ProviderOutcome {
        let start = Instant::now();
        let result = self.fetch(symbol).await.and_then(ensure_positive);
        let elapsed = start.elapsed().as_millis();

        match result {
            Ok(quote) => {
                logging::info_file_async(format!(
                    "provider={} symbol={} outcome=success price={} currency={} elapsed_ms={}",
                    self.kind(),
                    symbol,
                    quote.price,
                    quote.currency,
                    elapsed
                ));
                ProviderOutcome::Success(quote)
            }
            Err(FetchError::Unsupported(_)) => {
                logging::debug_file_async(format!(
                    "provider={} symbol={} outcome=unsupported",
                    self.kind(),
                    symbol
                ));
                ProviderOutcome::Unavailable
            }
            Err(why) => {
                logging::error_file_async(format!(
                    "provider={} symbol={} outcome={} reason={} elapsed_ms={}",
                    self.kind(),
                    symbol,
                    why.label(),
                    why,
                    elapsed
                ));
                ProviderOutcome::Unavailable
            }
        }
    }
}

fn ensure_positive(quote: Quote) -> Result<Quote, FetchError> {
    if quote.price > Decimal::ZERO {
        Ok(quote)
    } else {
        Err(FetchError::NoPositivePrice)
    }
}

/// 擷取 `name="a~b~c"` 這類 JS 指派式的字串內容
pub(crate) fn capture_assignment<'t>(
    pattern: &regex::Regex,
    text: &'t str,
) -> Result<&'t str, FetchError> {
    pattern
        .captures(text)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str())
        .ok_or_else(|| {
            FetchError::MalformedResponse(format!(
                "no assignment found in {:?}",
                text.chars().take(120).collect::<String>()
            ))
        })
}

/// 建立報價，衍生的漲跌超出範圍時視為格式錯誤
pub(crate) fn build_quote<S: Into<String>>(
    symbol: &str,
    price: Decimal,
    previous_close: Decimal,
    currency: S,
) -> Result<Quote, FetchError> {
    Quote::new(symbol, price, previous_close, currency).ok_or_else(|| {
        FetchError::MalformedResponse(format!(
            "change out of range for price {} and previous close {}",
            price, previous_close
        ))
    })
}

/// 解析價格欄位，非正數視為沒有報價
pub(crate) fn parse_price(field: &str) -> Result<Decimal, FetchError> {
    let price = crate::util::text::parse_decimal(field, None)
        .map_err(|why| FetchError::MalformedResponse(why.to_string()))?;
    if price > Decimal::ZERO {
        Ok(price)
    } else {
        Err(FetchError::NoPositivePrice)
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;

    use super::*;

    struct Fixed(Result<Decimal, &'static str>);

    #[async_trait]
    impl QuoteProvider for Fixed {
        fn kind(&self) -> ProviderKind {
            ProviderKind::Sina
        }

        async fn fetch(&self, symbol: &str) -> Result<Quote, FetchError> {
            match self.0 {
                Ok(price) => build_quote(symbol, price, Decimal::ZERO, "USD"),
                Err(why) => Err(FetchError::MalformedResponse(why.to_string())),
            }
        }
    }

    #[tokio::test]
    async fn test_fetch_quote_success() {
        let outcome = Fixed(Ok(dec!(12.5))).fetch_quote("AAPL").await;
        assert_eq!(
            outcome,
            ProviderOutcome::Success(Quote::new("AAPL", dec!(12.5), Decimal::ZERO, "USD").unwrap())
        );
    }

    #[tokio::test]
    async fn test_fetch_quote_collapses_non_positive_price() {
        assert_eq!(
            Fixed(Ok(Decimal::ZERO)).fetch_quote("AAPL").await,
            ProviderOutcome::Unavailable
        );
        assert_eq!(
            Fixed(Ok(dec!(-1))).fetch_quote("AAPL").await,
            ProviderOutcome::Unavailable
        );
    }

    #[tokio::test]
    async fn test_fetch_quote_collapses_error() {
        assert_eq!(
            Fixed(Err("garbage")).fetch_quote("AAPL").await,
            ProviderOutcome::Unavailable
        );
    }

    #[test]
    fn test_parse_price() {
        assert_eq!(parse_price("378.800").unwrap(), dec!(378.8));
        assert!(matches!(parse_price("0.000"), Err(FetchError::NoPositivePrice)));
        assert!(matches!(parse_price("-2"), Err(FetchError::NoPositivePrice)));
        assert!(matches!(parse_price("--"), Err(FetchError::MalformedResponse(_))));
    }

    #[test]
    fn test_provider_kind_names() {
        assert_eq!(ProviderKind::YahooChart.to_string(), "yahoo_chart");
        assert_eq!("yahoo_page".parse::<ProviderKind>().unwrap(), ProviderKind::YahooPage);
        assert_eq!(ProviderKind::iterator().count(), 4);
    }
}
