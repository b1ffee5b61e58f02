//! # Yahoo 財經採集模組
//!
//! 此模組負責從 Yahoo 財經（全球站）抓取報價與代號搜尋結果。
//!
//! ## 支援的功能
//!
//! - **chart API (`price`)**：`/v8/finance/chart/{symbol}` 回傳的結構化 JSON。
//! - **報價頁 (`page`)**：`/quote/{symbol}` 頁面 `<script>` 內嵌的 JSON 資料。
//! - **代號搜尋 (`search`)**：`/v1/finance/search`，只保留股票與 ETF。
//!
//! 代號不做轉換，直接使用原始代號（例︰`AAPL`、`0700.HK`）。

use std::time::Duration;

/// 報價頁內嵌資料解析子模組
pub mod page;
/// chart API 報價子模組
pub mod price;
/// 代號搜尋子模組
pub mod search;

/// Yahoo chart API 報價服務
pub struct YahooChart {
    host: String,
    timeout: Duration,
}

impl YahooChart {
    pub fn new<S: Into<String>>(host: S, timeout: Duration) -> Self {
        YahooChart {
            host: host.into(),
            timeout,
        }
    }
}

/// Yahoo 報價頁爬蟲
pub struct YahooPage {
    host: String,
    timeout: Duration,
}

impl YahooPage {
    pub fn new<S: Into<String>>(host: S, timeout: Duration) -> Self {
        YahooPage {
            host: host.into(),
            timeout,
        }
    }
}

/// Yahoo 代號搜尋服務
pub struct YahooSearch {
    host: String,
}

impl YahooSearch {
    pub fn new<S: Into<String>>(host: S) -> Self {
        YahooSearch { host: host.into() }
    }
}
