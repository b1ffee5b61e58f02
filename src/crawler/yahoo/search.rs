use async_trait::async_trait;
use reqwest::header;
use serde::Deserialize;

use crate::{
    crawler::{yahoo::YahooSearch, FetchError},
    declare::SearchResult,
    search::{SymbolSearch, MAX_RESULTS},
    util,
};

/// 只保留股票與 ETF
const ACCEPTED_QUOTE_TYPES: &[&str] = &["EQUITY", "ETF"];
const UNKNOWN_EXCHANGE: &str = "Unknown";

#[derive(Deserialize, Debug)]
struct SearchEnvelope {
    #[serde(default)]
    quotes: Vec<SearchQuote>,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
struct SearchQuote {
    symbol: Option<String>,
    quote_type: Option<String>,
    shortname: Option<String>,
    longname: Option<String>,
    exchange: Option<String>,
    exch_disp: Option<String>,
}

#[async_trait]
impl SymbolSearch for YahooSearch {
    async fn search(&self, query: &str) -> Result<Vec<SearchResult>, FetchError> {
        let url = format!(
            "{host}/v1/finance/search?q={q}&lang=en-US&region=US&quotesCount={count}&newsCount=0&listsCount=0&enableFuzzyQuery=false",
            host = self.host,
            q = urlencoding::encode(query),
            count = MAX_RESULTS
        );
        let headers = util::http::no_store_headers(&[(header::ACCEPT, "application/json")]);
        // 逾時由 SearchResolver 控制，這裡只給 client 的預設上限
        let text = util::http::get(&url, Some(headers), util::http::DEFAULT_TIMEOUT).await?;

        parse_search(&text)
    }
}

pub(crate) fn parse_search(body: &str) -> Result<Vec<SearchResult>, FetchError> {
    let envelope: SearchEnvelope = serde_json::from_str(body)
        .map_err(|why| FetchError::MalformedResponse(format!("search json: {}", why)))?;

    Ok(envelope
        .quotes
        .into_iter()
        .filter(|q| {
            q.quote_type
                .as_deref()
                .is_some_and(|t| ACCEPTED_QUOTE_TYPES.contains(&t))
        })
        .filter_map(|q| {
            let symbol = q.symbol.filter(|s| !s.is_empty())?;
            let name = non_empty(q.shortname)
                .or_else(|| non_empty(q.longname))
                .unwrap_or_else(|| symbol.clone());
            let exchange = non_empty(q.exch_disp)
                .or_else(|| non_empty(q.exchange))
                .unwrap_or_else(|| UNKNOWN_EXCHANGE.to_string());
            Some(SearchResult {
                symbol,
                name,
                exchange,
            })
        })
        .take(MAX_RESULTS)
        .collect())
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}
