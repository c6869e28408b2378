//! CoinGecko adapter: project search + coin details (public API, no key).

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;

use scout_core::{
    config::Config,
    errors::Error,
    ports::ProjectDirectory,
    sources::{MarketData, ProjectProfile, SocialLinks},
    Result,
};

const SERVICE: &str = "coingecko";
const USER_AGENT: &str = concat!("scout/", env!("CARGO_PKG_VERSION"));

#[derive(Clone, Debug)]
pub struct CoinGeckoClient {
    base_url: String,
    http: reqwest::Client,
}

#[derive(Deserialize)]
struct SearchResponse {
    #[serde(default)]
    coins: Vec<SearchCoin>,
}

#[derive(Deserialize)]
struct SearchCoin {
    id: String,
}

#[derive(Deserialize)]
struct CoinDetails {
    id: String,
    name: String,
    #[serde(default)]
    symbol: Option<String>,
    #[serde(default)]
    description: Description,
    #[serde(default)]
    links: Links,
    #[serde(default)]
    market_data: Option<ApiMarketData>,
}

#[derive(Default, Deserialize)]
struct Description {
    #[serde(default)]
    en: Option<String>,
}

#[derive(Default, Deserialize)]
struct Links {
    #[serde(default)]
    homepage: Vec<Option<String>>,
    #[serde(default)]
    whitepaper: Option<String>,
    #[serde(default)]
    twitter_screen_name: Option<String>,
    #[serde(default)]
    telegram_channel_identifier: Option<String>,
    #[serde(default)]
    chat_url: Vec<Option<String>>,
    #[serde(default)]
    repos_url: Repos,
}

#[derive(Default, Deserialize)]
struct Repos {
    #[serde(default)]
    github: Vec<Option<String>>,
}

#[derive(Default, Deserialize)]
struct ApiMarketData {
    #[serde(default)]
    current_price: UsdValue,
    #[serde(default)]
    market_cap: UsdValue,
    #[serde(default)]
    total_volume: UsdValue,
}

#[derive(Default, Deserialize)]
struct UsdValue {
    #[serde(default)]
    usd: Option<f64>,
}

impl CoinGeckoClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| Error::Config(format!("coingecko http client: {e}")))?;
        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http,
        })
    }

    pub fn from_config(cfg: &Config) -> Result<Self> {
        Self::new(cfg.coingecko_api_base_url.clone(), cfg.http_timeout)
    }

    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<T> {
        let resp = self
            .http
            .get(format!("{}{path}", self.base_url))
            .query(query)
            .send()
            .await
            .map_err(|e| Error::api(SERVICE, format!("request error: {e}")))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            return Err(Error::api(
                SERVICE,
                format!(
                    "{path} failed: {status} {}",
                    body.chars().take(200).collect::<String>()
                ),
            ));
        }

        resp.json()
            .await
            .map_err(|e| Error::api(SERVICE, format!("json error: {e}")))
    }
}

/// CoinGecko pads link lists with empty strings.
fn filled(v: Option<String>) -> Option<String> {
    v.map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
}

fn filled_all(v: Vec<Option<String>>) -> Vec<String> {
    v.into_iter().filter_map(filled).collect()
}

impl From<CoinDetails> for ProjectProfile {
    fn from(c: CoinDetails) -> Self {
        let links = c.links;
        let market = c.market_data.unwrap_or_default();
        Self {
            id: c.id,
            name: c.name,
            symbol: filled(c.symbol),
            description: filled(c.description.en).unwrap_or_default(),
            website: filled_all(links.homepage).into_iter().next(),
            whitepaper: filled(links.whitepaper),
            social: SocialLinks {
                twitter: filled(links.twitter_screen_name),
                telegram: filled(links.telegram_channel_identifier),
                discord: filled_all(links.chat_url)
                    .into_iter()
                    .find(|u| u.contains("discord")),
                github: filled_all(links.repos_url.github),
            },
            market: MarketData {
                market_cap_usd: market.market_cap.usd,
                volume_usd: market.total_volume.usd,
                price_usd: market.current_price.usd,
            },
        }
    }
}

#[async_trait]
impl ProjectDirectory for CoinGeckoClient {
    async fn lookup(&self, query: &str) -> Result<Option<ProjectProfile>> {
        let query = query.trim();
        if query.is_empty() {
            return Ok(None);
        }

        let search: SearchResponse = self.get_json("/search", &[("query", query)]).await?;
        let Some(first) = search.coins.into_iter().next() else {
            tracing::debug!(query, "no coingecko match");
            return Ok(None);
        };

        let details: CoinDetails = self
            .get_json(
                &format!("/coins/{}", first.id),
                &[
                    ("localization", "false"),
                    ("tickers", "false"),
                    ("community_data", "false"),
                    ("developer_data", "false"),
                ],
            )
            .await?;

        tracing::debug!(query, id = %details.id, "coingecko match");
        Ok(Some(details.into()))
    }
}
