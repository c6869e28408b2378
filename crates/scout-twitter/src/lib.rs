//! Twitter API v2 adapter (read-only, app bearer token).
//!
//! Recent search backs `/tweets` and `/digest`; user lookup supplies follower
//! counts for project research.

use std::{collections::HashMap, sync::OnceLock, time::Duration};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use regex::Regex;
use reqwest::StatusCode;
use serde::Deserialize;

use scout_core::{
    config::Config,
    errors::Error,
    ports::TweetSource,
    sources::{Tweet, TwitterProfile},
    Result,
};

const SERVICE: &str = "twitter";

/// The search endpoint rejects `max_results` outside this range.
const MIN_RESULTS: usize = 10;
const MAX_RESULTS: usize = 100;

fn is_valid_username(username: &str) -> bool {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[A-Za-z0-9_]{1,15}$").expect("valid regex"))
        .is_match(username)
}

#[derive(Clone, Debug)]
pub struct TwitterClient {
    bearer_token: String,
    base_url: String,
    http: reqwest::Client,
}

#[derive(Deserialize)]
struct SearchResponse {
    #[serde(default)]
    data: Vec<ApiTweet>,
    #[serde(default)]
    includes: Includes,
}

#[derive(Default, Deserialize)]
struct Includes {
    #[serde(default)]
    users: Vec<ApiUser>,
}

#[derive(Deserialize)]
struct ApiTweet {
    id: String,
    text: String,
    #[serde(default)]
    author_id: Option<String>,
    #[serde(default)]
    created_at: Option<String>,
    #[serde(default)]
    public_metrics: TweetMetrics,
}

#[derive(Default, Deserialize)]
struct TweetMetrics {
    #[serde(default)]
    like_count: u64,
    #[serde(default)]
    retweet_count: u64,
}

#[derive(Deserialize)]
struct ApiUser {
    id: String,
    username: String,
    #[serde(default)]
    public_metrics: UserMetrics,
}

#[derive(Default, Deserialize)]
struct UserMetrics {
    #[serde(default)]
    followers_count: u64,
    #[serde(default)]
    tweet_count: u64,
}

#[derive(Deserialize)]
struct UserResponse {
    data: Option<ApiUser>,
}

impl TwitterClient {
    pub fn new(
        bearer_token: impl Into<String>,
        base_url: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::Config(format!("twitter http client: {e}")))?;
        Ok(Self {
            bearer_token: bearer_token.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http,
        })
    }

    pub fn from_config(cfg: &Config) -> Result<Self> {
        Self::new(
            cfg.credentials().twitter_bearer_token(),
            cfg.twitter_api_base_url.clone(),
            cfg.http_timeout,
        )
    }

    async fn get(&self, path: &str, query: &[(&str, String)]) -> Result<reqwest::Response> {
        self.http
            .get(format!("{}{path}", self.base_url))
            .bearer_auth(&self.bearer_token)
            .query(query)
            .send()
            .await
            .map_err(|e| Error::api(SERVICE, format!("request error: {e}")))
    }
}

async fn error_for(resp: reqwest::Response, what: &str) -> Error {
    let status = resp.status();
    let body = resp.text().await.unwrap_or_default();
    Error::api(
        SERVICE,
        format!(
            "{what} failed: {status} {}",
            body.chars().take(200).collect::<String>()
        ),
    )
}

fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .ok()
        .map(|t| t.with_timezone(&Utc))
}

fn to_tweets(resp: SearchResponse) -> Vec<Tweet> {
    let authors: HashMap<&str, &str> = resp
        .includes
        .users
        .iter()
        .map(|u| (u.id.as_str(), u.username.as_str()))
        .collect();

    resp.data
        .iter()
        .map(|t| {
            let author = t
                .author_id
                .as_deref()
                .and_then(|id| authors.get(id).copied())
                .or(t.author_id.as_deref())
                .unwrap_or("unknown")
                .to_string();
            Tweet {
                id: t.id.clone(),
                author,
                text: t.text.clone(),
                created_at: t.created_at.as_deref().and_then(parse_timestamp),
                like_count: t.public_metrics.like_count,
                retweet_count: t.public_metrics.retweet_count,
            }
        })
        .collect()
}

#[async_trait]
impl TweetSource for TwitterClient {
    async fn search_recent(&self, query: &str, limit: usize) -> Result<Vec<Tweet>> {
        let query = query.trim();
        if query.is_empty() || limit == 0 {
            return Ok(Vec::new());
        }

        let params = [
            ("query", format!("{query} -is:retweet")),
            ("max_results", limit.clamp(MIN_RESULTS, MAX_RESULTS).to_string()),
            ("expansions", "author_id".to_string()),
            ("tweet.fields", "created_at,public_metrics".to_string()),
            ("user.fields", "username".to_string()),
        ];
        let resp = self.get("/tweets/search/recent", &params).await?;
        if !resp.status().is_success() {
            return Err(error_for(resp, "search").await);
        }

        let parsed: SearchResponse = resp
            .json()
            .await
            .map_err(|e| Error::api(SERVICE, format!("json error: {e}")))?;

        let mut tweets = to_tweets(parsed);
        tweets.truncate(limit);
        tracing::debug!(query, count = tweets.len(), "twitter recent search");
        Ok(tweets)
    }

    async fn profile(&self, username: &str) -> Result<Option<TwitterProfile>> {
        let username = username.trim().trim_start_matches('@');
        if username.is_empty() {
            return Ok(None);
        }
        if !is_valid_username(username) {
            return Err(Error::api(
                SERVICE,
                format!("invalid username: {}", username.chars().take(40).collect::<String>()),
            ));
        }

        let resp = self
            .get(
                &format!("/users/by/username/{username}"),
                &[("user.fields", "public_metrics".to_string())],
            )
            .await?;
        if resp.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !resp.status().is_success() {
            return Err(error_for(resp, "user lookup").await);
        }

        // Unknown accounts come back as 200 with only an `errors` array.
        let parsed: UserResponse = resp
            .json()
            .await
            .map_err(|e| Error::api(SERVICE, format!("json error: {e}")))?;

        Ok(parsed.data.map(|u| TwitterProfile {
            username: u.username,
            followers: u.public_metrics.followers_count,
            tweet_count: u.public_metrics.tweet_count,
        }))
    }
}
