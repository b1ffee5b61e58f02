use std::time::{Duration, Instant};

use anyhow::{anyhow, Result};
use once_cell::sync::{Lazy, OnceCell};
use reqwest::{header, Client, Method, RequestBuilder, Response};
use tokio::sync::Semaphore;

use crate::{logging, util};

/// A semaphore for limiting concurrent outbound requests.
///
/// 批次查價時避免同一瞬間對報價來源送出過多請求。
static SEMAPHORE: Lazy<Semaphore> = Lazy::new(|| Semaphore::new(MAX_CONCURRENT_REQUESTS));

/// A singleton instance of the reqwest client.
static CLIENT: OnceCell<Client> = OnceCell::new();

const MAX_CONCURRENT_REQUESTS: usize = 16;

/// Client-wide upper bound for a request when the caller has no tighter limit.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Identifying browser user agent sent to every upstream.
pub const USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36";

/// Returns the reqwest client singleton instance or creates one if it doesn't exist.
fn get_client() -> Result<&'static Client> {
    CLIENT.get_or_try_init(|| {
        // 已安裝過時會回傳 Err
        let _ = rustls::crypto::ring::default_provider().install_default();

        Client::builder()
            // ===== 壓縮 =====
            .brotli(true)
            .gzip(true)
            // ===== 超時設置 =====
            .connect_timeout(Duration::from_secs(5))
            .timeout(DEFAULT_TIMEOUT)
            // ===== TCP 優化 =====
            .tcp_nodelay(true)
            // ===== 連接池 =====
            .pool_max_idle_per_host(10)
            .pool_idle_timeout(Duration::from_secs(90))
            .redirect(reqwest::redirect::Policy::limited(5))
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| anyhow!("Failed to create reqwest client: {:?}", e))
    })
}

/// Builds the header set that forces every call to hit the network fresh.
///
/// # Arguments
///
/// * `extra`: Provider-specific identifying headers (Referer, Accept, ...).
pub fn no_store_headers(extra: &[(header::HeaderName, &'static str)]) -> header::HeaderMap {
    let mut headers = header::HeaderMap::with_capacity(extra.len() + 2);
    headers.insert(header::CACHE_CONTROL, header::HeaderValue::from_static("no-cache"));
    headers.insert(header::PRAGMA, header::HeaderValue::from_static("no-cache"));
    for (name, value) in extra {
        headers.insert(name.clone(), header::HeaderValue::from_static(value));
    }

    headers
}

/// Performs an HTTP GET request and returns the response as text.
///
/// # Arguments
///
/// * `url`: The URL to send the GET request to.
/// * `headers`: An optional set of headers to include with the request.
/// * `timeout`: Upper bound for the whole request, body included.
///
/// # Returns
///
/// * `Result<String>`: The response text, or an error if the request fails,
///   the status is not 2xx or the body cannot be read.
pub async fn get(
    url: &str,
    headers: Option<header::HeaderMap>,
    timeout: Duration,
) -> Result<String> {
    send(Method::GET, url, headers, timeout)
        .await?
        .text()
        .await
        .map_err(|e| anyhow!("Error parsing response text: {:?}", e))
}

/// Performs an HTTP GET request and decodes a GBK body into UTF-8.
///
/// # Arguments
///
/// * `url`: The URL to send the GET request to.
/// * `headers`: An optional set of headers to include with the request.
/// * `timeout`: Upper bound for the whole request, body included.
pub async fn get_use_gbk(
    url: &str,
    headers: Option<header::HeaderMap>,
    timeout: Duration,
) -> Result<String> {
    let bytes = send(Method::GET, url, headers, timeout)
        .await?
        .bytes()
        .await
        .map_err(|e| anyhow!("Error reading response body: {:?}", e))?;

    Ok(util::text::gbk_2_utf8(bytes.as_ref()))
}

/// Sends a single HTTP request without retrying.
///
/// # Errors
///
/// Returns an `Err` on network failure, timeout or a non-2xx status.
async fn send(
    method: Method,
    url: &str,
    headers: Option<header::HeaderMap>,
    timeout: Duration,
) -> Result<Response> {
    let visit_log = format!("{method}:{url}");
    let client = get_client()?;
    let mut rb: RequestBuilder = client.request(method, url).timeout(timeout);

    if let Some(h) = headers {
        rb = rb.headers(h);
    }

    let permit = SEMAPHORE
        .acquire()
        .await
        .map_err(|why| anyhow!("Failed to acquire request permit: {:?}", why))?;
    let start = Instant::now();
    let res = rb.send().await;
    let elapsed = start.elapsed().as_millis();
    drop(permit);

    match res {
        Ok(response) if response.status().is_success() => {
            logging::debug_file_async(format!(
                "{} {} {} ms",
                visit_log,
                response.status(),
                elapsed
            ));
            Ok(response)
        }
        Ok(response) => Err(anyhow!(
            "{} responded with status {} after {} ms",
            visit_log,
            response.status(),
            elapsed
        )),
        Err(why) => Err(anyhow!(
            "{} failed because {:?}. {} ms",
            visit_log,
            why,
            elapsed
        )),
    }
}
