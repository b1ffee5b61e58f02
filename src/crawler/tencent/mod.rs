//! # 騰訊證券報價模組
//!
//! 從 `qt.gtimg.cn` 取得港股與 A 股即時報價。
//!
//! - 代號格式：`hk00700`、`sh600519`、`sz000001`
//! - 回應格式：`v_hk00700="100~腾讯控股~00700~378.800~382.200~..."`，GBK 編碼
//! - 美股不支援，直接回傳 `Unavailable` 不發出請求

use std::time::Duration;

/// 即時報價子模組
pub mod price;

/// 騰訊證券報價服務
pub struct Tencent {
    host: String,
    timeout: Duration,
}

impl Tencent {
    pub fn new<S: Into<String>>(host: S, timeout: Duration) -> Self {
        Tencent {
            host: host.into(),
            timeout,
        }
    }
}
