//! # 新浪財經報價模組
//!
//! 從 `hq.sinajs.cn` 取得港股、A 股與美股報價，作為騰訊的備援。
//!
//! - 代號格式：`hk00700`、`sh600519`、`sz000001`、美股 `gb_aapl`
//! - 回應格式：`var hq_str_hk00700="TENCENT,腾讯控股,378.800,382.200,...";`，GBK 編碼
//! - 欄位位置依市場不同，港股與 A 股的現價、前收位置是相反的

use std::time::Duration;

/// 即時報價子模組
pub mod price;

/// 新浪財經報價服務
pub struct Sina {
    host: String,
    timeout: Duration,
}

impl Sina {
    pub fn new<S: Into<String>>(host: S, timeout: Duration) -> Self {
        Sina {
            host: host.into(),
            timeout,
        }
    }
}
