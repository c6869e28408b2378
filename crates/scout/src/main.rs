use std::sync::Arc;

use scout_coingecko::CoinGeckoClient;
use scout_core::config::Config;
use scout_openai::OpenAiClient;
use scout_telegram::router::Backends;
use scout_twitter::TwitterClient;

#[tokio::main]
async fn main() -> Result<(), scout_core::Error> {
    scout_core::logging::init("scout")?;

    let cfg = match Config::load() {
        Ok(cfg) => Arc::new(cfg),
        Err(e) => {
            tracing::error!("{e}");
            return Err(e);
        }
    };
    tracing::debug!(credentials = ?cfg.credentials(), "configuration loaded");

    let openai = OpenAiClient::from_config(&cfg)?;
    tracing::info!(model = %openai.model(), "openai client ready");

    let backends = Backends {
        tweets: Arc::new(TwitterClient::from_config(&cfg)?),
        analyst: Arc::new(openai),
        projects: Arc::new(CoinGeckoClient::from_config(&cfg)?),
    };

    scout_telegram::router::run_polling(cfg, backends)
        .await
        .map_err(|e| match e.downcast::<scout_core::Error>() {
            Ok(e) => e,
            Err(e) => scout_core::Error::External(format!("telegram bot failed: {e}")),
        })?;

    Ok(())
}
