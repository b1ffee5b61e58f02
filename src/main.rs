pub mod config;
pub mod crawler;
pub mod declare;
pub mod logging;
pub mod search;
pub mod symbol;
pub mod util;
pub mod web;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    let _ = rustls::crypto::ring::default_provider().install_default();

    logging::info_file_async(format!(
        "啟動報價服務 port={} quote_timeout_secs={} jitter_ms={} search_timeout_secs={}",
        config::SETTINGS.server.port,
        config::SETTINGS.quote.timeout_secs,
        config::SETTINGS.quote.jitter_ms,
        config::SETTINGS.search.timeout_secs
    ));

    if let Err(why) = web::start().await {
        logging::error_console(format!("HTTP 服務啟動失敗: {:?}", why));
        return Err(why);
    }

    Ok(())
}
