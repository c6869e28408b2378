//! Ports for the external services the bot aggregates.
//!
//! Adapter crates (`scout-twitter`, `scout-openai`, `scout-coingecko`,
//! `scout-telegram`) implement these; the command service only sees traits.

use async_trait::async_trait;

use crate::{
    analysis::CommunityInfo,
    sources::{ProjectProfile, Tweet, TwitterProfile},
    Result,
};

/// Read-only Twitter access.
#[async_trait]
pub trait TweetSource: Send + Sync {
    /// Most recent tweets matching `query`, newest first, at most `limit`.
    async fn search_recent(&self, query: &str, limit: usize) -> Result<Vec<Tweet>>;

    /// Public metrics for `username` (without `@`); `None` if the account does not exist.
    async fn profile(&self, username: &str) -> Result<Option<TwitterProfile>>;
}

#[derive(Clone, Debug, PartialEq)]
pub struct CompletionRequest {
    pub system: Option<String>,
    pub prompt: String,
    pub max_tokens: u32,
    pub temperature: f32,
}

/// Text completion backend used for summaries and reviews.
#[async_trait]
pub trait Analyst: Send + Sync {
    async fn complete(&self, req: CompletionRequest) -> Result<String>;
}

/// Market-data directory (project search + details).
#[async_trait]
pub trait ProjectDirectory: Send + Sync {
    /// Best match for `query`, or `None` if nothing is listed.
    async fn lookup(&self, query: &str) -> Result<Option<ProjectProfile>>;
}

/// Public Telegram chat lookup.
#[async_trait]
pub trait CommunityDirectory: Send + Sync {
    /// `handle` is a public username with or without `@`.
    async fn lookup(&self, handle: &str) -> Result<Option<CommunityInfo>>;
}
