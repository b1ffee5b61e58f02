use std::{collections::HashMap, env, path::PathBuf, str::FromStr};

use anyhow::Result;
use config::{Config as config_config, File as config_file};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::{crawler::ProviderKind, logging, symbol::Market};

const CONFIG_PATH: &str = "app.json";
const APP_CONFIG: &str = "APP_CONFIG";

#[derive(Serialize, Deserialize, Default, Debug, Clone)]
pub struct App {
    #[serde(default)]
    pub server: Server,
    #[serde(default)]
    pub quote: Quote,
    #[serde(default)]
    pub search: Search,
    #[serde(default)]
    pub hosts: Hosts,
}

const SERVER_PORT: &str = "SERVER_PORT";

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Server {
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for Server {
    fn default() -> Self {
        Server {
            port: default_port(),
        }
    }
}

fn default_port() -> u16 {
    8080
}

const QUOTE_TIMEOUT_SECS: &str = "QUOTE_TIMEOUT_SECS";
const QUOTE_JITTER_MS: &str = "QUOTE_JITTER_MS";

/// 報價來源的逾時、錯開延遲與各市場的查詢順序
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Quote {
    #[serde(default = "default_quote_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_jitter_ms")]
    pub jitter_ms: u64,
    #[serde(default = "default_max_batch")]
    pub max_batch: usize,
    #[serde(default = "default_order")]
    pub order: HashMap<Market, Vec<ProviderKind>>,
}

impl Default for Quote {
    fn default() -> Self {
        Quote {
            timeout_secs: default_quote_timeout_secs(),
            jitter_ms: default_jitter_ms(),
            max_batch: default_max_batch(),
            order: default_order(),
        }
    }
}

fn default_quote_timeout_secs() -> u64 {
    8
}

fn default_jitter_ms() -> u64 {
    200
}

fn default_max_batch() -> usize {
    50
}

/// 港股、A股先走騰訊再走新浪，最後才是 Yahoo；美股先 Yahoo 再新浪
pub fn default_order() -> HashMap<Market, Vec<ProviderKind>> {
    HashMap::from([
        (
            Market::HongKong,
            vec![ProviderKind::Tencent, ProviderKind::Sina, ProviderKind::YahooChart],
        ),
        (
            Market::MainlandChina,
            vec![ProviderKind::Tencent, ProviderKind::Sina, ProviderKind::YahooChart],
        ),
        (
            Market::Other,
            vec![ProviderKind::YahooChart, ProviderKind::Sina],
        ),
    ])
}

const SEARCH_TIMEOUT_SECS: &str = "SEARCH_TIMEOUT_SECS";

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Search {
    #[serde(default = "default_search_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for Search {
    fn default() -> Self {
        Search {
            timeout_secs: default_search_timeout_secs(),
        }
    }
}

fn default_search_timeout_secs() -> u64 {
    20
}

/// 各報價來源的 base url（含 scheme），測試時可指向本機模擬伺服器
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(default)]
pub struct Hosts {
    pub tencent: String,
    pub sina: String,
    pub yahoo_chart: String,
    pub yahoo_page: String,
    pub yahoo_search: String,
}

impl Default for Hosts {
    fn default() -> Self {
        Hosts {
            tencent: "https://qt.gtimg.cn".to_string(),
            sina: "https://hq.sinajs.cn".to_string(),
            yahoo_chart: "https://query1.finance.yahoo.com".to_string(),
            yahoo_page: "https://finance.yahoo.com".to_string(),
            yahoo_search: "https://query2.finance.yahoo.com".to_string(),
        }
    }
}

pub static SETTINGS: Lazy<App> = Lazy::new(App::new);

impl App {
    /// 讀取設定檔；檔案不存在或格式錯誤時使用預設值，最後再以 env 覆蓋
    pub fn new() -> Self {
        match Self::get() {
            Ok(app) => app,
            Err(why) => {
                logging::error_file_async(format!(
                    "I can't read the config context because {:?}",
                    why
                ));
                App::default().override_with_env()
            }
        }
    }

    fn get() -> Result<Self> {
        let config_path = config_path();
        if config_path.exists() {
            let config: App = config_config::builder()
                .add_source(config_file::from(config_path))
                .build()?
                .try_deserialize()?;
            return Ok(config.override_with_env());
        }

        Ok(App::default().override_with_env())
    }

    /// 將來至於 env 的設定值覆蓋掉 json 上的設定值
    fn override_with_env(mut self) -> Self {
        if let Some(port) = env_parse::<u16>(SERVER_PORT) {
            self.server.port = port;
        }

        if let Some(secs) = env_parse::<u64>(QUOTE_TIMEOUT_SECS) {
            self.quote.timeout_secs = secs;
        }

        if let Some(ms) = env_parse::<u64>(QUOTE_JITTER_MS) {
            self.quote.jitter_ms = ms;
        }

        if let Some(secs) = env_parse::<u64>(SEARCH_TIMEOUT_SECS) {
            self.search.timeout_secs = secs;
        }

        self
    }
}

fn env_parse<T: FromStr>(key: &str) -> Option<T> {
    env::var(key).ok().and_then(|v| T::from_str(v.trim()).ok())
}

/// 回傳設定檔的路徑
fn config_path() -> PathBuf {
    env::var(APP_CONFIG)
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(CONFIG_PATH))
}
