//! Legitimacy heuristics for crypto projects and their Telegram communities.

pub mod analyzer;
pub mod sentiment;
pub mod signals;

use std::fmt;

use chrono::{DateTime, Utc};
use sha2::{Digest, Sha256};

pub use analyzer::ProjectAnalyzer;
pub use signals::{Indicator, IndicatorKind};

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum RiskLevel {
    Low,
    Medium,
    High,
    Critical,
}

impl RiskLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Critical => "critical",
        }
    }

    pub fn emoji(self) -> &'static str {
        match self {
            Self::Low => "✅",
            Self::Medium => "⚠️",
            Self::High => "🔸",
            Self::Critical => "🚨",
        }
    }

    /// High and Critical get warning banners in reports.
    pub fn is_alarming(self) -> bool {
        matches!(self, Self::High | Self::Critical)
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Member-count buckets used to describe small communities.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CommunitySize {
    Micro,
    Small,
    MediumSmall,
    Medium,
    Growing,
    Large,
}

impl CommunitySize {
    pub const ALL: [CommunitySize; 6] = [
        Self::Micro,
        Self::Small,
        Self::MediumSmall,
        Self::Medium,
        Self::Growing,
        Self::Large,
    ];

    /// Inclusive member range.
    pub fn range(self) -> (u32, u32) {
        match self {
            Self::Micro => (1, 30),
            Self::Small => (31, 50),
            Self::MediumSmall => (51, 100),
            Self::Medium => (101, 200),
            Self::Growing => (201, 500),
            Self::Large => (501, u32::MAX),
        }
    }

    pub fn label(self) -> String {
        match self.range() {
            (_, u32::MAX) => "500+".to_string(),
            (lo, hi) => format!("{lo}-{hi}"),
        }
    }

    pub fn contains(self, members: u32) -> bool {
        let (lo, hi) = self.range();
        (lo..=hi).contains(&members)
    }

    /// Bucket for display; an empty (or hidden) member count reports as `Micro`.
    pub fn classify(members: u32) -> Self {
        Self::ALL
            .into_iter()
            .find(|s| s.contains(members))
            .unwrap_or(Self::Micro)
    }
}

/// Snapshot of a Telegram community.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CommunityInfo {
    pub title: String,
    pub username: String,
    pub member_count: u32,
    pub description: String,
    pub recent_messages: Vec<String>,
    pub admin_count: u32,
    pub creation_date: Option<DateTime<Utc>>,
    pub invite_link: Option<String>,
    pub verified: bool,
    pub restricted: bool,
}

impl CommunityInfo {
    /// Text the heuristics run on: title, description and the first ten messages.
    pub fn corpus(&self) -> String {
        let mut text = format!("{} {} ", self.title, self.description);
        let recent = self
            .recent_messages
            .iter()
            .take(10)
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(" ");
        text.push_str(&recent);
        text
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct ProjectAnalysis {
    /// 0..=100
    pub legitimacy_score: f64,
    pub scam_indicators: Vec<Indicator>,
    pub positive_indicators: Vec<Indicator>,
    pub risk_level: RiskLevel,
    pub tokenomics: Option<String>,
    pub roadmap: Option<String>,
    pub team: Option<String>,
    /// -1..=1
    pub sentiment: f64,
}

/// A community together with its analysis, ready to be rendered.
#[derive(Clone, Debug)]
pub struct CommunityReport {
    pub info: CommunityInfo,
    pub analysis: ProjectAnalysis,
    pub size: CommunitySize,
    pub discovered_at: DateTime<Utc>,
    pub fingerprint: String,
}

impl CommunityReport {
    pub fn new(info: CommunityInfo, analysis: ProjectAnalysis, discovered_at: DateTime<Utc>) -> Self {
        let size = CommunitySize::classify(info.member_count);
        let fingerprint = community_fingerprint(&info.title, &info.username);
        Self {
            info,
            analysis,
            size,
            discovered_at,
            fingerprint,
        }
    }
}

/// Stable id for a community (hex SHA-256 of title + username).
pub fn community_fingerprint(title: &str, username: &str) -> String {
    let digest = Sha256::digest(format!("{title}{username}").as_bytes());
    digest.iter().map(|b| format!("{b:02x}")).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_size_buckets_at_boundaries() {
        assert_eq!(CommunitySize::classify(1), CommunitySize::Micro);
        assert_eq!(CommunitySize::classify(30), CommunitySize::Micro);
        assert_eq!(CommunitySize::classify(31), CommunitySize::Small);
        assert_eq!(CommunitySize::classify(100), CommunitySize::MediumSmall);
        assert_eq!(CommunitySize::classify(101), CommunitySize::Medium);
        assert_eq!(CommunitySize::classify(200), CommunitySize::Medium);
        assert_eq!(CommunitySize::classify(201), CommunitySize::Growing);
        assert_eq!(CommunitySize::classify(500), CommunitySize::Growing);
        assert_eq!(CommunitySize::classify(501), CommunitySize::Large);
        assert_eq!(CommunitySize::classify(12_000), CommunitySize::Large);
        assert_eq!(CommunitySize::classify(0), CommunitySize::Micro);
    }

    #[test]
    fn size_labels() {
        assert_eq!(CommunitySize::MediumSmall.label(), "51-100");
        assert_eq!(CommunitySize::Growing.label(), "201-500");
        assert_eq!(CommunitySize::classify(12_000).label(), "500+");
    }

    #[test]
    fn corpus_uses_first_ten_messages() {
        let info = CommunityInfo {
            title: "Alpha".into(),
            description: "desc".into(),
            recent_messages: (0..15).map(|i| format!("m{i}")).collect(),
            ..Default::default()
        };
        let corpus = info.corpus();
        assert!(corpus.starts_with("Alpha desc m0"));
        assert!(corpus.contains("m9"));
        assert!(!corpus.contains("m10"));
    }

    #[test]
    fn fingerprint_is_stable_hex() {
        let a = community_fingerprint("Alpha", "alpha_chat");
        assert_eq!(a.len(), 64);
        assert_eq!(a, community_fingerprint("Alpha", "alpha_chat"));
        assert_ne!(a, community_fingerprint("Alpha", "other"));
    }

    #[test]
    fn risk_ordering_and_labels() {
        assert!(RiskLevel::Critical > RiskLevel::Low);
        assert!(RiskLevel::High.is_alarming());
        assert!(!RiskLevel::Medium.is_alarming());
        assert_eq!(RiskLevel::Critical.to_string(), "critical");
    }
}
