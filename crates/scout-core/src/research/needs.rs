//! What a project is missing, and which freelance roles that opens up.

use super::{SocialPresence, TeamAnalysis, TechnicalAnalysis};
use crate::sources::MarketData;

const SMALL_MARKET_CAP_USD: f64 = 10_000_000.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum JobCategory {
    CommunityManagement,
    Moderation,
    GraphicsDesign,
    SocialMedia,
    PrMarketing,
    BusinessDevelopment,
    TechnicalWriting,
    Development,
    LegalCompliance,
    Partnerships,
    ContentCreation,
    InfluencerOutreach,
}

impl JobCategory {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::CommunityManagement => "community_management",
            Self::Moderation => "moderation",
            Self::GraphicsDesign => "graphics_design",
            Self::SocialMedia => "social_media",
            Self::PrMarketing => "pr_marketing",
            Self::BusinessDevelopment => "business_development",
            Self::TechnicalWriting => "technical_writing",
            Self::Development => "development",
            Self::LegalCompliance => "legal_compliance",
            Self::Partnerships => "partnerships",
            Self::ContentCreation => "content_creation",
            Self::InfluencerOutreach => "influencer_outreach",
        }
    }

    /// `pr_marketing` → `pr marketing`
    pub fn spoken(self) -> String {
        self.as_str().replace('_', " ")
    }

    pub fn pitch(self) -> Option<PitchStrategy> {
        let p = match self {
            Self::CommunityManagement => PitchStrategy {
                strategy: "Focus on engagement metrics and community building experience",
                approach: "Show examples of communities you've grown and engagement strategies",
                key_points: &[
                    "Community growth track record",
                    "Engagement strategies",
                    "Crisis management",
                    "Event organization",
                ],
            },
            Self::Moderation => PitchStrategy {
                strategy: "Emphasize reliability, availability, and conflict resolution skills",
                approach: "Highlight your availability across time zones and moderation tools experience",
                key_points: &[
                    "24/7 availability",
                    "Moderation tools expertise",
                    "Conflict resolution",
                    "Rule enforcement",
                ],
            },
            Self::GraphicsDesign => PitchStrategy {
                strategy: "Lead with a strong portfolio showcasing crypto/web3 design experience",
                approach: "Create sample designs specifically for their project before pitching",
                key_points: &[
                    "Crypto design portfolio",
                    "Brand consistency",
                    "Quick turnaround",
                    "Multiple format delivery",
                ],
            },
            Self::SocialMedia => PitchStrategy {
                strategy: "Present a content strategy with growth projections and engagement tactics",
                approach: "Analyze their current social media and propose specific improvements",
                key_points: &[
                    "Content strategy",
                    "Growth tactics",
                    "Platform expertise",
                    "Analytics tracking",
                ],
            },
            Self::PrMarketing => PitchStrategy {
                strategy: "Demonstrate media connections and successful campaign examples",
                approach: "Propose specific PR opportunities and media outreach strategy",
                key_points: &[
                    "Media relationships",
                    "Campaign success stories",
                    "Industry knowledge",
                    "Crisis communication",
                ],
            },
            Self::BusinessDevelopment => PitchStrategy {
                strategy: "Showcase network connections and partnership facilitation experience",
                approach: "Identify potential partnerships and present strategic opportunities",
                key_points: &[
                    "Network connections",
                    "Deal-making experience",
                    "Market insights",
                    "Strategic thinking",
                ],
            },
            _ => return None,
        };
        Some(p)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PitchStrategy {
    pub strategy: &'static str,
    pub approach: &'static str,
    pub key_points: &'static [&'static str],
}

/// Shown when a category has no tailored pitch.
pub const GENERIC_PITCH: &str =
    "Research the project thoroughly and propose specific improvements in your area of expertise.";

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum Urgency {
    Low,
    Medium,
    High,
}

impl Urgency {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }

    pub fn emoji(self) -> &'static str {
        match self {
            Self::High => "🔥",
            Self::Medium => "⚡",
            Self::Low => "💡",
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct JobOpportunity {
    pub category: JobCategory,
    pub urgency: Urgency,
    pub description: &'static str,
    pub requirements: &'static [&'static str],
    pub pitch: Option<PitchStrategy>,
    pub estimated_budget: &'static str,
    pub time_commitment: &'static str,
}

impl JobOpportunity {
    fn new(
        category: JobCategory,
        urgency: Urgency,
        description: &'static str,
        requirements: &'static [&'static str],
        estimated_budget: &'static str,
        time_commitment: &'static str,
    ) -> Self {
        Self {
            category,
            urgency,
            description,
            requirements,
            pitch: category.pitch(),
            estimated_budget,
            time_commitment,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Maturity {
    Early,
    Developing,
    Mature,
}

impl Maturity {
    pub fn from_average(avg: f64) -> Self {
        if avg < 40.0 {
            Self::Early
        } else if avg < 70.0 {
            Self::Developing
        } else {
            Self::Mature
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Early => "early",
            Self::Developing => "developing",
            Self::Mature => "mature",
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct ProjectNeeds {
    pub missing_elements: Vec<&'static str>,
    pub strengths: Vec<&'static str>,
    pub improvement_areas: Vec<&'static str>,
    pub jobs: Vec<JobOpportunity>,
    pub maturity: Maturity,
}

impl ProjectNeeds {
    pub fn high_urgency_count(&self) -> usize {
        self.jobs.iter().filter(|j| j.urgency == Urgency::High).count()
    }
}

pub fn identify_needs(
    social: &SocialPresence,
    technical: &TechnicalAnalysis,
    team: &TeamAnalysis,
    market: &MarketData,
) -> ProjectNeeds {
    let mut missing = Vec::new();
    let mut improve = Vec::new();
    let mut jobs = Vec::new();

    if social.score < 70 {
        missing.push("strong_social_media_presence");
        improve.push("social_media_strategy");

        if social.missing_platforms.contains(&"twitter") {
            jobs.push(JobOpportunity::new(
                JobCategory::SocialMedia,
                Urgency::High,
                "Twitter account management and content strategy needed",
                &["Social media experience", "Crypto knowledge", "Content creation"],
                "$500-2000/month",
                "Part-time (10-20 hrs/week)",
            ));
        }
        if social.telegram.audience < 1_000 {
            jobs.push(JobOpportunity::new(
                JobCategory::CommunityManagement,
                Urgency::High,
                "Telegram community growth and management needed",
                &["Community building experience", "24/7 availability", "Crypto enthusiasm"],
                "$800-3000/month",
                "Full-time",
            ));
        }
    }

    if technical.score < 60 {
        missing.push("strong_technical_foundation");
        improve.push("technical_documentation");

        if technical.missing_elements.contains(&"whitepaper") {
            jobs.push(JobOpportunity::new(
                JobCategory::TechnicalWriting,
                Urgency::High,
                "Technical writer needed for whitepaper and documentation",
                &["Technical writing experience", "Blockchain knowledge", "Research skills"],
                "$2000-8000 (one-time)",
                "Project-based",
            ));
        }
        if technical.missing_elements.contains(&"github_repository") {
            jobs.push(JobOpportunity::new(
                JobCategory::Development,
                Urgency::Medium,
                "Blockchain developer needed for smart contract development",
                &["Solidity experience", "Smart contract development", "Security knowledge"],
                "$3000-10000/month",
                "Full-time",
            ));
        }
    }

    if team.score < 50 {
        missing.push("team_transparency");
        improve.push("team_credibility");
        jobs.push(JobOpportunity::new(
            JobCategory::PrMarketing,
            Urgency::Medium,
            "PR specialist needed to build team credibility and media presence",
            &["PR experience", "Media relationships", "Crisis communication"],
            "$1500-5000/month",
            "Part-time",
        ));
    }

    // Branding quality can't be judged from listing data; always suggest it.
    missing.push("professional_branding");
    improve.push("visual_identity");
    jobs.push(JobOpportunity::new(
        JobCategory::GraphicsDesign,
        Urgency::Medium,
        "Graphics designer needed for branding and visual content",
        &["Graphic design portfolio", "Crypto/Web3 experience", "Brand development"],
        "$1000-4000/month",
        "Part-time",
    ));

    if market.market_cap_usd.unwrap_or(0.0) < SMALL_MARKET_CAP_USD {
        missing.push("strategic_partnerships");
        improve.push("business_development");
        jobs.push(JobOpportunity::new(
            JobCategory::BusinessDevelopment,
            Urgency::Medium,
            "Business development specialist for partnerships and growth",
            &["BD experience", "Crypto industry network", "Deal-making skills"],
            "$2000-8000/month",
            "Part-time to Full-time",
        ));
    }

    let mut strengths = Vec::new();
    if social.score > 70 {
        strengths.push("strong_social_media_presence");
    }
    if technical.score > 70 {
        strengths.push("solid_technical_foundation");
    }
    if team.score > 70 {
        strengths.push("transparent_team");
    }

    let avg = f64::from(social.score + technical.score + team.score) / 3.0;

    ProjectNeeds {
        missing_elements: missing,
        strengths,
        improvement_areas: improve,
        jobs,
        maturity: Maturity::from_average(avg),
    }
}
