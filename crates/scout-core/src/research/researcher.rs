use std::sync::Arc;

use chrono::{DateTime, Utc};

use super::{
    needs::identify_needs, research_legitimacy, CommunityHealth, ComprehensiveAnalysis,
    PlatformPresence, SocialPresence, TeamAnalysis, TechnicalAnalysis, TokenomicsReport,
};
use crate::{
    ports::{CommunityDirectory, ProjectDirectory, TweetSource},
    sources::ProjectProfile,
};

/// Runs the research pipeline against the market, Twitter and Telegram ports.
///
/// Every lookup failure is logged and recorded as a warning; research always
/// produces a report, falling back to the bare project identifier.
#[derive(Clone)]
pub struct ProjectResearcher {
    directory: Arc<dyn ProjectDirectory>,
    tweets: Arc<dyn TweetSource>,
    communities: Arc<dyn CommunityDirectory>,
}

impl ProjectResearcher {
    pub fn new(
        directory: Arc<dyn ProjectDirectory>,
        tweets: Arc<dyn TweetSource>,
        communities: Arc<dyn CommunityDirectory>,
    ) -> Self {
        Self {
            directory,
            tweets,
            communities,
        }
    }

    pub async fn research(&self, query: &str, now: DateTime<Utc>) -> ComprehensiveAnalysis {
        let query = query.trim();
        let mut sources = Vec::new();
        let mut warnings = Vec::new();

        let profile = match self.directory.lookup(query).await {
            Ok(Some(p)) => {
                sources.push("CoinGecko".to_string());
                p
            }
            Ok(None) => {
                tracing::info!(project = %query, "no market listing found");
                warnings.push(format!("No CoinGecko listing found for {query}"));
                unlisted(query)
            }
            Err(e) => {
                tracing::warn!(project = %query, "project lookup failed: {e}");
                warnings.push(format!("CoinGecko lookup failed: {e}"));
                unlisted(query)
            }
        };

        let twitter = match profile.social.twitter.as_deref() {
            Some(handle) => {
                PlatformPresence::present(self.twitter_followers(handle, &mut sources, &mut warnings).await)
            }
            None => PlatformPresence::default(),
        };

        let telegram_members = match profile.social.telegram.as_deref() {
            Some(handle) => Some(self.telegram_members(handle, &mut sources, &mut warnings).await),
            None => None,
        };
        let telegram = telegram_members
            .map(PlatformPresence::present)
            .unwrap_or_default();

        let discord = if profile.social.discord.is_some() {
            PlatformPresence::present(0)
        } else {
            PlatformPresence::default()
        };

        let social = SocialPresence::new(twitter, telegram, discord);
        let technical = TechnicalAnalysis::from_profile(&profile);
        let team = TeamAnalysis::from_description(&profile.description);
        let community = CommunityHealth::new(telegram_members, &profile.description);
        let tokenomics = TokenomicsReport::from_description(&profile.description);
        let needs = identify_needs(&social, &technical, &team, &profile.market);
        let legitimacy = research_legitimacy(&social, &technical, &team, &profile.description);

        tracing::info!(
            project = %profile.name,
            score = legitimacy.legitimacy_score,
            risk = %legitimacy.risk_level,
            jobs = needs.jobs.len(),
            "research complete"
        );

        ComprehensiveAnalysis {
            project_name: profile.name,
            description: profile.description,
            website: profile.website,
            market: profile.market,
            legitimacy,
            social,
            technical,
            team,
            community,
            tokenomics,
            needs,
            researched_at: now,
            sources,
            warnings,
        }
    }

    async fn twitter_followers(
        &self,
        handle: &str,
        sources: &mut Vec<String>,
        warnings: &mut Vec<String>,
    ) -> u64 {
        match self.tweets.profile(handle).await {
            Ok(Some(p)) => {
                sources.push("Twitter".to_string());
                p.followers
            }
            Ok(None) => {
                warnings.push(format!("Twitter account @{handle} not found"));
                0
            }
            Err(e) => {
                tracing::warn!(handle, "twitter profile lookup failed: {e}");
                warnings.push(format!("Twitter lookup failed: {e}"));
                0
            }
        }
    }

    async fn telegram_members(
        &self,
        handle: &str,
        sources: &mut Vec<String>,
        warnings: &mut Vec<String>,
    ) -> u64 {
        match self.communities.lookup(handle).await {
            Ok(Some(info)) => {
                sources.push("Telegram".to_string());
                u64::from(info.member_count)
            }
            Ok(None) => {
                warnings.push(format!("Telegram chat @{handle} not found"));
                0
            }
            Err(e) => {
                tracing::warn!(handle, "telegram chat lookup failed: {e}");
                warnings.push(format!("Telegram lookup failed: {e}"));
                0
            }
        }
    }
}

fn unlisted(query: &str) -> ProjectProfile {
    ProjectProfile {
        id: query.to_lowercase(),
        name: query.to_string(),
        description: "No description available".to_string(),
        ..Default::default()
    }
}
