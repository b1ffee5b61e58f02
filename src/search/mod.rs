use std::{sync::Arc, time::Duration};

use async_trait::async_trait;

use crate::{
    config::App,
    crawler::{yahoo::YahooSearch, FetchError},
    declare::SearchResult,
    logging,
};

/// 內建股票清單
pub mod local;

/// 單次搜尋最多回傳的筆數
pub const MAX_RESULTS: usize = 10;

#[async_trait]
pub trait SymbolSearch: Send + Sync {
    async fn search(&self, query: &str) -> Result<Vec<SearchResult>, FetchError>;
}

/// 先查外部搜尋服務，失敗、逾時或沒有結果時改用內建清單，兩者結果不混合
pub struct SearchResolver {
    provider: Arc<dyn SymbolSearch>,
    timeout: Duration,
}

impl SearchResolver {
    pub fn new(provider: Arc<dyn SymbolSearch>, timeout: Duration) -> Self {
        SearchResolver { provider, timeout }
    }

    pub fn from_settings(settings: &App) -> Self {
        SearchResolver::new(
            Arc::new(YahooSearch::new(settings.hosts.yahoo_search.as_str())),
            Duration::from_secs(settings.search.timeout_secs),
        )
    }

    pub async fn search(&self, query: &str) -> Vec<SearchResult> {
        match tokio::time::timeout(self.timeout, self.provider.search(query)).await {
            Ok(Ok(results)) if !results.is_empty() => {
                logging::debug_file_async(format!(
                    "search query={} outcome=upstream count={}",
                    query,
                    results.len()
                ));
                results.into_iter().take(MAX_RESULTS).collect()
            }
            Ok(Ok(_)) => {
                logging::info_file_async(format!(
                    "search query={} outcome=empty fallback=local",
                    query
                ));
                local::search(query)
            }
            Ok(Err(why)) => {
                logging::warn_file_async(format!(
                    "search query={} outcome=failed reason={} fallback=local",
                    query, why
                ));
                local::search(query)
            }
            Err(_) => {
                logging::warn_file_async(format!(
                    "search query={} outcome=timeout timeout_secs={} fallback=local",
                    query,
                    self.timeout.as_secs_f64()
                ));
                local::search(query)
            }
        }
    }
}
