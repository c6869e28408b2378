//! Data returned by the external read-only sources (Twitter, CoinGecko).

use chrono::{DateTime, Utc};

#[derive(Clone, Debug, PartialEq)]
pub struct Tweet {
    pub id: String,
    pub author: String,
    pub text: String,
    pub created_at: Option<DateTime<Utc>>,
    pub like_count: u64,
    pub retweet_count: u64,
}

impl Tweet {
    pub fn url(&self) -> String {
        format!("https://twitter.com/{}/status/{}", self.author, self.id)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TwitterProfile {
    pub username: String,
    pub followers: u64,
    pub tweet_count: u64,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct SocialLinks {
    pub twitter: Option<String>,
    pub telegram: Option<String>,
    pub discord: Option<String>,
    pub github: Vec<String>,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct MarketData {
    pub market_cap_usd: Option<f64>,
    pub volume_usd: Option<f64>,
    pub price_usd: Option<f64>,
}

/// Basic project profile as listed by a market-data directory.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ProjectProfile {
    pub id: String,
    pub name: String,
    pub symbol: Option<String>,
    pub description: String,
    pub website: Option<String>,
    pub whitepaper: Option<String>,
    pub social: SocialLinks,
    pub market: MarketData,
}
