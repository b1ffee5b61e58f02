use std::{
    collections::HashMap,
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc,
    },
    time::Duration,
};

use futures::future;
use rand::Rng;
use serde::Serialize;

use crate::{
    config::{self, App},
    crawler::{
        sina::Sina,
        tencent::Tencent,
        yahoo::{YahooChart, YahooPage},
        ProviderKind, QuoteProvider,
    },
    declare::{ProviderOutcome, Resolution, UnavailableQuote},
    logging,
    symbol::{self, Market},
};

const DEFAULT_MAX_BATCH: usize = 50;

#[derive(Default)]
struct Counter {
    success: AtomicU64,
    failure: AtomicU64,
}

/// 各報價來源的成功、失敗次數，用來觀察哪個來源改版或被封鎖
pub struct ProviderStats {
    counters: HashMap<ProviderKind, Counter>,
}

impl Default for ProviderStats {
    fn default() -> Self {
        ProviderStats {
            counters: ProviderKind::iterator()
                .map(|k| (k, Counter::default()))
                .collect(),
        }
    }
}

impl ProviderStats {
    fn record(&self, kind: ProviderKind, outcome: &ProviderOutcome) {
        if let Some(counter) = self.counters.get(&kind) {
            let slot = if outcome.is_success() {
                &counter.success
            } else {
                &counter.failure
            };
            slot.fetch_add(1, Ordering::Relaxed);
        }
    }

    pub fn snapshot(&self) -> Vec<ProviderStat> {
        ProviderKind::iterator()
            .filter_map(|kind| {
                self.counters.get(&kind).map(|c| ProviderStat {
                    provider: kind,
                    success: c.success.load(Ordering::Relaxed),
                    failure: c.failure.load(Ordering::Relaxed),
                })
            })
            .collect()
    }
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct ProviderStat {
    pub provider: ProviderKind,
    pub success: u64,
    pub failure: u64,
}

/// 依市場決定報價來源順序，依序嘗試直到取得正價格為止
pub struct QuoteResolver {
    providers: HashMap<ProviderKind, Arc<dyn QuoteProvider>>,
    order: HashMap<Market, Vec<ProviderKind>>,
    jitter_ms: u64,
    max_batch: usize,
    stats: ProviderStats,
}

impl QuoteResolver {
    /// 未在 `order` 中列出的市場使用預設順序
    pub fn new(
        providers: Vec<Arc<dyn QuoteProvider>>,
        mut order: HashMap<Market, Vec<ProviderKind>>,
    ) -> Self {
        let defaults = config::default_order();
        for market in Market::iterator() {
            if !order.contains_key(&market) {
                if let Some(kinds) = defaults.get(&market) {
                    order.insert(market, kinds.clone());
                }
            }
        }

        QuoteResolver {
            providers: providers.into_iter().map(|p| (p.kind(), p)).collect(),
            order,
            jitter_ms: 0,
            max_batch: DEFAULT_MAX_BATCH,
            stats: ProviderStats::default(),
        }
    }

    pub fn with_jitter(mut self, jitter_ms: u64) -> Self {
        self.jitter_ms = jitter_ms;
        self
    }

    pub fn with_max_batch(mut self, max_batch: usize) -> Self {
        self.max_batch = max_batch.max(1);
        self
    }

    /// 依設定檔註冊所有報價來源
    pub fn from_settings(settings: &App) -> Self {
        let timeout = Duration::from_secs(settings.quote.timeout_secs);
        let hosts = &settings.hosts;
        let providers: Vec<Arc<dyn QuoteProvider>> = vec![
            Arc::new(Tencent::new(hosts.tencent.as_str(), timeout)),
            Arc::new(Sina::new(hosts.sina.as_str(), timeout)),
            Arc::new(YahooChart::new(hosts.yahoo_chart.as_str(), timeout)),
            Arc::new(YahooPage::new(hosts.yahoo_page.as_str(), timeout)),
        ];

        QuoteResolver::new(providers, settings.quote.order.clone())
            .with_jitter(settings.quote.jitter_ms)
            .with_max_batch(settings.quote.max_batch)
    }

    pub fn order_for(&self, market: Market) -> &[ProviderKind] {
        self.order.get(&market).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn stats(&self) -> Vec<ProviderStat> {
        self.stats.snapshot()
    }

    /// 取得報價；所有來源都失敗時回傳 `Resolution::Unavailable`，不會回傳錯誤
    pub async fn resolve(&self, symbol: &str) -> Resolution {
        if self.jitter_ms > 0 {
            let delay = rand::rng().random_range(0..=self.jitter_ms);
            tokio::time::sleep(Duration::from_millis(delay)).await;
        }

        let market = symbol::classify(symbol).market;
        for kind in self.order_for(market) {
            let provider = match self.providers.get(kind) {
                Some(p) => p,
                None => {
                    logging::warn_file_async(format!(
                        "provider={} symbol={} outcome=not_registered",
                        kind, symbol
                    ));
                    continue;
                }
            };

            let outcome = provider.fetch_quote(symbol).await;
            self.stats.record(*kind, &outcome);

            if let ProviderOutcome::Success(quote) = outcome {
                return Resolution::Found(quote);
            }
        }

        logging::warn_file_async(format!(
            "symbol={} market={} outcome=unavailable tried={:?}",
            symbol,
            market,
            self.order_for(market)
        ));

        Resolution::Unavailable(UnavailableQuote::new(symbol))
    }

    /// 批次取得報價，各代號各自獨立查詢並保持輸入順序，超過上限的部分忽略
    pub async fn resolve_many(&self, symbols: &[String]) -> Vec<Resolution> {
        if symbols.len() > self.max_batch {
            logging::warn_file_async(format!(
                "batch of {} symbols truncated to {}",
                symbols.len(),
                self.max_batch
            ));
        }

        future::join_all(
            symbols
                .iter()
                .take(self.max_batch)
                .map(|s| self.resolve(s)),
        )
        .await
    }
}
