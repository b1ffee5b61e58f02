use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// 所有來源都失敗時回給呼叫端的訊息
pub const UNAVAILABLE_MESSAGE: &str = "Price temporarily unavailable";

/// 漲跌幅保留的小數位數
const CHANGE_PERCENT_SCALE: u32 = 4;

/// 正規化後的報價
///
/// 由報價來源每次請求時建立，不快取也不跨來源合併。
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Quote {
    pub symbol: String,
    /// 目前價格，必定大於 0
    pub price: Decimal,
    /// 前一日收盤價，0 代表未知
    pub previous_close: Decimal,
    /// 漲跌
    pub change: Decimal,
    /// 漲跌幅(%)
    pub change_percent: Decimal,
    pub currency: String,
}

impl Quote {
    /// 漲跌或漲跌幅超出 `Decimal` 範圍時回傳 `None`
    pub fn new<S: Into<String>>(
        symbol: &str,
        price: Decimal,
        previous_close: Decimal,
        currency: S,
    ) -> Option<Self> {
        let previous_close = previous_close.max(Decimal::ZERO);
        // 前收未知時漲跌與漲跌幅一律為 0
        let (change, change_percent) = if previous_close.is_zero() {
            (Decimal::ZERO, Decimal::ZERO)
        } else {
            let change = price.checked_sub(previous_close)?;
            let percent = change
                .checked_div(previous_close)?
                .checked_mul(Decimal::ONE_HUNDRED)?
                .round_dp(CHANGE_PERCENT_SCALE)
                .normalize();
            (change.normalize(), percent)
        };

        Some(Quote {
            symbol: symbol.to_string(),
            price: price.normalize(),
            previous_close: previous_close.normalize(),
            change,
            change_percent,
            currency: currency.into(),
        })
    }
}

/// 單一報價來源的結果，解析有任何疑義時一律視為 `Unavailable`
#[derive(Debug, Clone, PartialEq)]
pub enum ProviderOutcome {
    Success(Quote),
    Unavailable,
}

impl ProviderOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, ProviderOutcome::Success(_))
    }
}

/// 所有來源都失敗時的回應
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct UnavailableQuote {
    pub symbol: String,
    pub price: Decimal,
    pub unavailable: bool,
    pub error: String,
}

impl UnavailableQuote {
    pub fn new(symbol: &str) -> Self {
        UnavailableQuote {
            symbol: symbol.to_string(),
            price: Decimal::ZERO,
            unavailable: true,
            error: UNAVAILABLE_MESSAGE.to_string(),
        }
    }
}

/// 查價的最終結果
#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(untagged)]
pub enum Resolution {
    Found(Quote),
    Unavailable(UnavailableQuote),
}

impl Resolution {
    pub fn symbol(&self) -> &str {
        match self {
            Resolution::Found(q) => &q.symbol,
            Resolution::Unavailable(u) => &u.symbol,
        }
    }

    pub fn is_unavailable(&self) -> bool {
        matches!(self, Resolution::Unavailable(_))
    }
}

/// 代號搜尋結果
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct SearchResult {
    pub symbol: String,
    pub name: String,
    pub exchange: String,
}

impl SearchResult {
    pub fn new(symbol: &str, name: &str, exchange: &str) -> Self {
        SearchResult {
            symbol: symbol.to_string(),
            name: name.to_string(),
            exchange: exchange.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn test_quote_change() {
        let q = Quote::new("0700.HK", dec!(378.800), dec!(382.200), "HKD").unwrap();
        assert_eq!(q.price, dec!(378.8));
        assert_eq!(q.previous_close, dec!(382.2));
        assert_eq!(q.change, dec!(-3.4));
        assert_eq!(q.change_percent, dec!(-0.8896));
    }

    #[test]
    fn test_quote_change_is_zero_without_previous_close() {
        for price in [dec!(0.01), dec!(1), dec!(190.25), dec!(99999.999)] {
            let q = Quote::new("AAPL", price, Decimal::ZERO, "USD").unwrap();
            assert_eq!(q.change, Decimal::ZERO);
            assert_eq!(q.change_percent, Decimal::ZERO);
        }

        let negative = Quote::new("AAPL", dec!(10), dec!(-5), "USD").unwrap();
        assert_eq!(negative.previous_close, Decimal::ZERO);
        assert_eq!(negative.change, Decimal::ZERO);
    }

    #[test]
    fn test_quote_rejects_overflowing_change() {
        let huge = dec!(100000000000000000000);
        let tiny = dec!(0.000000001);
        assert!(Quote::new("AAPL", huge, tiny, "USD").is_none());
        assert!(Quote::new("AAPL", huge, Decimal::ZERO, "USD").is_some());
    }

    #[test]
    fn test_serialize_found() {
        let q = Quote::new("AAPL", dec!(110), dec!(100), "USD").unwrap();
        let json = serde_json::to_value(Resolution::Found(q)).unwrap();
        assert_eq!(json["symbol"], "AAPL");
        assert_eq!(json["price"].as_f64(), Some(110.0));
        assert_eq!(json["previousClose"].as_f64(), Some(100.0));
        assert_eq!(json["change"].as_f64(), Some(10.0));
        assert_eq!(json["changePercent"].as_f64(), Some(10.0));
        assert_eq!(json["currency"], "USD");
        assert!(json.get("unavailable").is_none());
    }

    #[test]
    fn test_serialize_unavailable() {
        let unavailable = Resolution::Unavailable(UnavailableQuote::new("AAPL"));
        let json = serde_json::to_value(unavailable).unwrap();
        assert_eq!(json["symbol"], "AAPL");
        assert_eq!(json["price"].as_f64(), Some(0.0));
        assert_eq!(json["unavailable"], true);
        assert_eq!(json["error"], UNAVAILABLE_MESSAGE);
    }
}
