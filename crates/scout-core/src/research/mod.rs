//! Comprehensive project research: presence scoring across social,
//! technical, team and tokenomics dimensions, plus the needs/jobs breakdown.

pub mod needs;
pub mod researcher;

use chrono::{DateTime, Utc};

use crate::{
    analysis::{sentiment, CommunitySize, Indicator, IndicatorKind, ProjectAnalysis, RiskLevel},
    sources::{MarketData, ProjectProfile},
};

pub use needs::{JobCategory, JobOpportunity, Maturity, PitchStrategy, ProjectNeeds, Urgency};
pub use researcher::ProjectResearcher;

fn clamp_score(score: i32) -> u32 {
    score.clamp(0, 100) as u32
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PlatformPresence {
    pub present: bool,
    /// Followers (Twitter) or members (Telegram); 0 when unknown.
    pub audience: u64,
}

impl PlatformPresence {
    pub fn present(audience: u64) -> Self {
        Self {
            present: true,
            audience,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SocialPresence {
    pub twitter: PlatformPresence,
    pub telegram: PlatformPresence,
    pub discord: PlatformPresence,
    pub missing_platforms: Vec<&'static str>,
    pub score: u32,
    pub recommendations: Vec<&'static str>,
}

impl SocialPresence {
    /// Twitter and Telegram count as missing when absent; Discord only adds points.
    pub fn new(twitter: PlatformPresence, telegram: PlatformPresence, discord: PlatformPresence) -> Self {
        let mut missing_platforms = Vec::new();
        if !twitter.present {
            missing_platforms.push("twitter");
        }
        if !telegram.present {
            missing_platforms.push("telegram");
        }

        let mut s = Self {
            twitter,
            telegram,
            discord,
            missing_platforms,
            score: 0,
            recommendations: Vec::new(),
        };
        s.score = s.compute_score();
        s.recommendations = s.compute_recommendations();
        s
    }

    fn compute_score(&self) -> u32 {
        let mut score = 0i32;
        if self.twitter.present {
            score += 30;
            if self.twitter.audience > 10_000 {
                score += 20;
            } else if self.twitter.audience > 1_000 {
                score += 10;
            }
        }
        if self.telegram.present {
            score += 25;
            if self.telegram.audience > 5_000 {
                score += 15;
            } else if self.telegram.audience > 1_000 {
                score += 8;
            }
        }
        if self.discord.present {
            score += 25;
        }
        score -= 15 * self.missing_platforms.len() as i32;
        clamp_score(score)
    }

    fn compute_recommendations(&self) -> Vec<&'static str> {
        let mut recs = Vec::new();
        if self.missing_platforms.contains(&"twitter") {
            recs.push("Establish Twitter presence for announcements and community engagement");
        }
        if self.missing_platforms.contains(&"telegram") {
            recs.push("Create Telegram community for real-time discussions");
        }
        if !self.discord.present {
            recs.push("Set up Discord server for community building and support");
        }
        if self.score < 50 {
            recs.push("Increase social media activity and engagement");
        }
        recs
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TechnicalAnalysis {
    pub github_repos: usize,
    pub whitepaper: bool,
    pub contracts_deployed: bool,
    pub contracts_audited: bool,
    pub missing_elements: Vec<&'static str>,
    pub score: u32,
    pub recommendations: Vec<&'static str>,
}

impl TechnicalAnalysis {
    pub fn from_profile(profile: &ProjectProfile) -> Self {
        let github_repos = profile.social.github.len();
        let whitepaper = profile.whitepaper.is_some();

        let mut missing_elements = Vec::new();
        if github_repos == 0 {
            missing_elements.push("github_repository");
        }
        if !whitepaper {
            missing_elements.push("whitepaper");
        }

        let mut t = Self {
            github_repos,
            whitepaper,
            // Listing data carries no contract deployment or audit info.
            contracts_deployed: false,
            contracts_audited: false,
            missing_elements,
            score: 0,
            recommendations: Vec::new(),
        };
        t.score = t.compute_score();
        t.recommendations = t.compute_recommendations();
        t
    }

    pub fn has_github(&self) -> bool {
        self.github_repos > 0
    }

    fn compute_score(&self) -> u32 {
        let mut score = 0i32;
        if self.has_github() {
            score += 40;
        }
        if self.whitepaper {
            score += 30;
        }
        if self.contracts_deployed {
            score += 20;
        }
        if self.contracts_audited {
            score += 10;
        }
        score -= 20 * self.missing_elements.len() as i32;
        clamp_score(score)
    }

    fn compute_recommendations(&self) -> Vec<&'static str> {
        let mut recs = Vec::new();
        if self.missing_elements.contains(&"github_repository") {
            recs.push("Create public GitHub repository to showcase development progress");
        }
        if self.missing_elements.contains(&"whitepaper") {
            recs.push("Publish detailed whitepaper explaining technology and tokenomics");
        }
        if !self.contracts_audited {
            recs.push("Get smart contracts professionally audited for security");
        }
        recs
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Transparency {
    Anonymous,
    Low,
    Medium,
    High,
}

impl Transparency {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Anonymous => "anonymous",
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

const TEAM_MENTION_KEYWORDS: [&str; 5] = ["team", "founder", "ceo", "developer", "advisor"];

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TeamAnalysis {
    pub transparency: Transparency,
    pub linkedin_profiles: u32,
    pub public_backgrounds: u32,
    pub missing_elements: Vec<&'static str>,
    pub score: u32,
    pub recommendations: Vec<&'static str>,
}

impl TeamAnalysis {
    pub fn from_description(description: &str) -> Self {
        let lower = description.to_lowercase();
        let mentions = TEAM_MENTION_KEYWORDS
            .iter()
            .filter(|k| lower.contains(*k))
            .count();

        let (transparency, missing_elements) = match mentions {
            0 => (Transparency::Anonymous, vec!["team_information"]),
            1 | 2 => (Transparency::Low, Vec::new()),
            _ => (Transparency::Medium, Vec::new()),
        };

        let mut t = Self {
            transparency,
            linkedin_profiles: 0,
            public_backgrounds: 0,
            missing_elements,
            score: 0,
            recommendations: Vec::new(),
        };
        t.score = t.compute_score();
        t.recommendations = t.compute_recommendations();
        t
    }

    fn compute_score(&self) -> u32 {
        let base = match self.transparency {
            Transparency::High => 50,
            Transparency::Medium => 30,
            Transparency::Low => 10,
            Transparency::Anonymous => 0,
        };
        let score = base + self.linkedin_profiles * 10 + self.public_backgrounds * 5;
        score.min(100)
    }

    fn compute_recommendations(&self) -> Vec<&'static str> {
        let mut recs = Vec::new();
        match self.transparency {
            Transparency::Anonymous => {
                recs.push("Consider revealing team members to build trust and credibility")
            }
            Transparency::Low => recs.push("Provide more detailed team information and backgrounds"),
            _ => {}
        }
        if self.linkedin_profiles == 0 {
            recs.push("Create professional LinkedIn profiles for team members");
        }
        recs
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct CommunityHealth {
    /// Size bucket label when the Telegram member count is known.
    pub size: Option<String>,
    pub engagement: &'static str,
    pub sentiment: &'static str,
    pub score: u32,
    pub recommendations: Vec<&'static str>,
}

impl CommunityHealth {
    /// Engagement can't be measured from read-only listings, so the score stays neutral.
    pub fn new(telegram_members: Option<u64>, description: &str) -> Self {
        let size = telegram_members
            .filter(|m| *m > 0)
            .map(|m| CommunitySize::classify(u32::try_from(m).unwrap_or(u32::MAX)).label());
        Self {
            size,
            engagement: "unknown",
            sentiment: sentiment::label(sentiment::compound(description)),
            score: 50,
            recommendations: vec!["Increase community engagement through regular events and updates"],
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TokenomicsReport {
    pub burn_mechanism: bool,
    pub staking: bool,
    pub governance: bool,
    pub red_flags: Vec<&'static str>,
    pub positive_aspects: Vec<&'static str>,
    pub score: u32,
    pub recommendations: Vec<&'static str>,
}

impl TokenomicsReport {
    pub fn from_description(description: &str) -> Self {
        let lower = description.to_lowercase();
        let mut t = Self::default();

        if lower.contains("unlimited supply") {
            t.red_flags.push("unlimited_supply");
        }
        if lower.contains("burn") {
            t.burn_mechanism = true;
            t.positive_aspects.push("burn_mechanism");
        }
        if lower.contains("staking") {
            t.staking = true;
            t.positive_aspects.push("staking_utility");
        }
        if lower.contains("governance") {
            t.governance = true;
            t.positive_aspects.push("governance_utility");
        }

        t.score = clamp_score(
            50 + 15 * t.positive_aspects.len() as i32 - 25 * t.red_flags.len() as i32,
        );

        if !t.burn_mechanism {
            t.recommendations
                .push("Consider implementing token burn mechanism for deflationary pressure");
        }
        if !t.staking {
            t.recommendations
                .push("Add staking utility to encourage long-term holding");
        }
        if !t.governance {
            t.recommendations
                .push("Implement governance functionality for community participation");
        }
        t
    }
}

/// Risk bucket for the averaged research score.
pub fn research_risk(score: f64) -> RiskLevel {
    if score > 70.0 {
        RiskLevel::Low
    } else if score > 50.0 {
        RiskLevel::Medium
    } else if score > 30.0 {
        RiskLevel::High
    } else {
        RiskLevel::Critical
    }
}

/// Legitimacy verdict derived from the research dimensions.
pub fn research_legitimacy(
    social: &SocialPresence,
    technical: &TechnicalAnalysis,
    team: &TeamAnalysis,
    description: &str,
) -> ProjectAnalysis {
    let mut scam = Vec::new();
    let mut positive = Vec::new();

    if team.transparency == Transparency::Anonymous {
        scam.push(Indicator::new(IndicatorKind::MediumRisk, "Anonymous team"));
    } else {
        positive.push(Indicator::new(IndicatorKind::Positive, "Team information available"));
    }

    if technical.score < 30 {
        scam.push(Indicator::new(IndicatorKind::HighRisk, "Poor technical foundation"));
    } else if technical.score > 70 {
        positive.push(Indicator::new(IndicatorKind::Positive, "Strong technical foundation"));
    }

    if social.score < 20 {
        scam.push(Indicator::new(IndicatorKind::MediumRisk, "Minimal social media presence"));
    } else if social.score > 60 {
        positive.push(Indicator::new(IndicatorKind::Positive, "Good social media presence"));
    }

    let score = f64::from(social.score + technical.score + team.score) / 3.0;

    ProjectAnalysis {
        legitimacy_score: score,
        scam_indicators: scam,
        positive_indicators: positive,
        risk_level: research_risk(score),
        tokenomics: None,
        roadmap: None,
        team: None,
        sentiment: sentiment::compound(description),
    }
}

/// Full research report for one project.
#[derive(Clone, Debug)]
pub struct ComprehensiveAnalysis {
    pub project_name: String,
    pub description: String,
    pub website: Option<String>,
    pub market: MarketData,
    pub legitimacy: ProjectAnalysis,
    pub social: SocialPresence,
    pub technical: TechnicalAnalysis,
    pub team: TeamAnalysis,
    pub community: CommunityHealth,
    pub tokenomics: TokenomicsReport,
    pub needs: ProjectNeeds,
    pub researched_at: DateTime<Utc>,
    pub sources: Vec<String>,
    /// Lookups that failed; research still completes without them.
    pub warnings: Vec<String>,
}
