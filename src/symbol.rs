//! # 代號分類
//!
//! 依代號後綴判斷所屬市場與預設幣別：
//!
//! - `.HK` → 香港，HKD
//! - `.SS` / `.SZ` → 中國大陸（上海 / 深圳），CNY
//! - 其他 → 美股 / 全球，USD
//!
//! 後綴比對區分大小寫，且只比對字尾。

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};

const HONG_KONG_SUFFIX: &str = ".HK";
const SHANGHAI_SUFFIX: &str = ".SS";
const SHENZHEN_SUFFIX: &str = ".SZ";

/// 港股代號補零後的長度
const HONG_KONG_CODE_WIDTH: usize = 5;

/// 市場別
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Display, AsRefStr)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Market {
    HongKong,
    MainlandChina,
    /// 美股或其他全球市場
    Other,
}

impl Market {
    pub fn currency(&self) -> Currency {
        match self {
            Market::HongKong => Currency::HKD,
            Market::MainlandChina => Currency::CNY,
            Market::Other => Currency::USD,
        }
    }

    pub fn iterator() -> impl Iterator<Item = Self> {
        [Self::HongKong, Self::MainlandChina, Self::Other]
            .iter()
            .copied()
    }
}

/// 市場預設幣別
#[derive(Debug, Copy, Clone, PartialEq, Eq, Display, AsRefStr, EnumString)]
pub enum Currency {
    HKD,
    CNY,
    USD,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Classification {
    pub market: Market,
    pub currency: Currency,
}

/// 判斷代號所屬市場與預設幣別，任何字串都會落在其中一個市場
pub fn classify(symbol: &str) -> Classification {
    let market = Venue::parse(symbol).market();
    Classification {
        market,
        currency: market.currency(),
    }
}

/// 交易所層級的代號，供各報價來源轉換代號格式使用
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Venue<'a> {
    /// 去掉後綴的港股代號，例︰`0700`
    HongKong(&'a str),
    /// 去掉後綴的上海代號，例︰`600519`
    Shanghai(&'a str),
    /// 去掉後綴的深圳代號，例︰`000001`
    Shenzhen(&'a str),
    /// 原始代號
    Other(&'a str),
}

impl<'a> Venue<'a> {
    pub fn parse(symbol: &'a str) -> Self {
        if let Some(code) = symbol.strip_suffix(HONG_KONG_SUFFIX) {
            Venue::HongKong(code)
        } else if let Some(code) = symbol.strip_suffix(SHANGHAI_SUFFIX) {
            Venue::Shanghai(code)
        } else if let Some(code) = symbol.strip_suffix(SHENZHEN_SUFFIX) {
            Venue::Shenzhen(code)
        } else {
            Venue::Other(symbol)
        }
    }

    pub fn market(&self) -> Market {
        match self {
            Venue::HongKong(_) => Market::HongKong,
            Venue::Shanghai(_) | Venue::Shenzhen(_) => Market::MainlandChina,
            Venue::Other(_) => Market::Other,
        }
    }

    /// 騰訊、新浪共用的大陸與香港代號格式︰`hk00700`、`sh600519`、`sz000001`
    ///
    /// 美股沒有共用格式，回傳 `None`。
    pub fn mainland_code(&self) -> Option<String> {
        match self {
            Venue::HongKong(code) => Some(format!(
                "hk{:0>width$}",
                code,
                width = HONG_KONG_CODE_WIDTH
            )),
            Venue::Shanghai(code) => Some(format!("sh{}", code)),
            Venue::Shenzhen(code) => Some(format!("sz{}", code)),
            Venue::Other(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify() {
        let hk = classify("0700.HK");
        assert_eq!(hk.market, Market::HongKong);
        assert_eq!(hk.currency, Currency::HKD);

        for symbol in ["600519.SS", "000001.SZ"] {
            let cn = classify(symbol);
            assert_eq!(cn.market, Market::MainlandChina);
            assert_eq!(cn.currency, Currency::CNY);
        }

        for symbol in ["AAPL", "BRK.B", "0700.hk", "HK", "", "7203.T"] {
            let other = classify(symbol);
            assert_eq!(other.market, Market::Other, "{}", symbol);
            assert_eq!(other.currency, Currency::USD, "{}", symbol);
        }
    }

    #[test]
    fn test_venue_parse() {
        assert_eq!(Venue::parse("0700.HK"), Venue::HongKong("0700"));
        assert_eq!(Venue::parse("600519.SS"), Venue::Shanghai("600519"));
        assert_eq!(Venue::parse("000001.SZ"), Venue::Shenzhen("000001"));
        assert_eq!(Venue::parse("AAPL"), Venue::Other("AAPL"));
        // 只比對字尾
        assert_eq!(Venue::parse("X.HK.US"), Venue::Other("X.HK.US"));
    }

    #[test]
    fn test_mainland_code_zero_pad() {
        assert_eq!(Venue::parse("700.HK").mainland_code().unwrap(), "hk00700");
        assert_eq!(Venue::parse("0700.HK").mainland_code().unwrap(), "hk00700");
        assert_eq!(Venue::parse("5.HK").mainland_code().unwrap(), "hk00005");
        assert_eq!(Venue::parse("09988.HK").mainland_code().unwrap(), "hk09988");
        assert_eq!(Venue::parse("600519.SS").mainland_code().unwrap(), "sh600519");
        assert_eq!(Venue::parse("000001.SZ").mainland_code().unwrap(), "sz000001");
        assert!(Venue::parse("AAPL").mainland_code().is_none());
    }

    #[test]
    fn test_hong_kong_code_is_five_digits() {
        for code in ["1", "22", "333", "4444", "55555"] {
            let symbol = format!("{}.HK", code);
            let translated = Venue::parse(&symbol).mainland_code().unwrap();
            assert_eq!(translated.len(), 2 + HONG_KONG_CODE_WIDTH);
            assert!(translated.ends_with(code));
        }
    }

    #[test]
    fn test_market_display() {
        assert_eq!(Market::MainlandChina.to_string(), "mainland_china");
        assert_eq!(Currency::HKD.as_ref(), "HKD");
        assert_eq!(Market::iterator().count(), 3);
    }
}
