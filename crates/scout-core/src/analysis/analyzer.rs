use std::sync::Arc;

use chrono::{DateTime, Utc};

use super::{
    sentiment,
    signals::{self, count_kind, Indicator, IndicatorKind},
    CommunityInfo, ProjectAnalysis, RiskLevel,
};
use crate::{
    formatting::truncate_chars,
    ports::{Analyst, CompletionRequest},
};

const TOKENOMICS_PROMPT_CHARS: usize = 2000;
const TOKENOMICS_MAX_TOKENS: u32 = 200;
const TOKENOMICS_TEMPERATURE: f32 = 0.3;

/// Scores a community (or a pasted project description) for legitimacy.
///
/// The optional [`Analyst`] is only used for the tokenomics review; every
/// other signal is a local heuristic, so analysis never fails.
#[derive(Clone, Default)]
pub struct ProjectAnalyzer {
    analyst: Option<Arc<dyn Analyst>>,
}

impl ProjectAnalyzer {
    pub fn new(analyst: Option<Arc<dyn Analyst>>) -> Self {
        Self { analyst }
    }

    pub async fn analyze(&self, info: &CommunityInfo, now: DateTime<Utc>) -> ProjectAnalysis {
        let text = info.corpus();

        let scam_indicators = signals::detect_scam_indicators(&text);
        let positive_indicators = signals::detect_positive_indicators(&text);
        let legitimacy_score =
            legitimacy_score(&scam_indicators, &positive_indicators, info, now);
        let risk_level = risk_level(legitimacy_score, &scam_indicators);

        ProjectAnalysis {
            legitimacy_score,
            scam_indicators,
            positive_indicators,
            risk_level,
            tokenomics: Some(self.review_tokenomics(&text).await),
            roadmap: Some(roadmap_summary(&text)),
            team: Some(team_summary(&text)),
            sentiment: sentiment::compound(&text),
        }
    }

    /// Analyze free text as if it were a community with no metadata.
    pub async fn analyze_text(&self, text: &str, now: DateTime<Utc>) -> ProjectAnalysis {
        let info = CommunityInfo {
            description: text.to_string(),
            ..Default::default()
        };
        self.analyze(&info, now).await
    }

    async fn review_tokenomics(&self, text: &str) -> String {
        let Some(analyst) = &self.analyst else {
            return basic_tokenomics(text);
        };

        let prompt = format!(
            "Analyze the tokenomics of this crypto project based on the following text:\n\n\
             {}\n\n\
             Evaluate:\n\
             1. Token distribution fairness\n\
             2. Utility and purpose\n\
             3. Inflation/deflation mechanisms\n\
             4. Vesting schedules\n\
             5. Overall sustainability\n\n\
             Provide a brief assessment (max 200 words):",
            truncate_chars(text, TOKENOMICS_PROMPT_CHARS)
        );
        let req = CompletionRequest {
            system: None,
            prompt,
            max_tokens: TOKENOMICS_MAX_TOKENS,
            temperature: TOKENOMICS_TEMPERATURE,
        };

        match analyst.complete(req).await {
            Ok(review) if !review.trim().is_empty() => review.trim().to_string(),
            Ok(_) => basic_tokenomics(text),
            Err(e) => {
                tracing::warn!("tokenomics review failed, using heuristic: {e}");
                basic_tokenomics(text)
            }
        }
    }
}

pub fn legitimacy_score(
    scam: &[Indicator],
    positive: &[Indicator],
    info: &CommunityInfo,
    now: DateTime<Utc>,
) -> f64 {
    let mut score = 50.0;

    score -= 20.0 * count_kind(scam, IndicatorKind::HighRisk) as f64;
    score -= 10.0 * count_kind(scam, IndicatorKind::MediumRisk) as f64;
    score -= 5.0 * count_kind(scam, IndicatorKind::SuspiciousPattern) as f64;

    score += 8.0 * count_kind(positive, IndicatorKind::Positive) as f64;
    score += 12.0 * count_kind(positive, IndicatorKind::Team) as f64;
    score += 10.0 * count_kind(positive, IndicatorKind::Technical) as f64;

    if info.admin_count > 1 {
        score += 5.0;
    }
    if info.verified {
        score += 15.0;
    }
    if info.restricted {
        score -= 10.0;
    }
    if let Some(created) = info.creation_date {
        let days = (now - created).num_days();
        if days > 30 {
            score += (days as f64 / 10.0).min(10.0);
        }
    }

    score.clamp(0.0, 100.0)
}

pub fn risk_level(score: f64, scam: &[Indicator]) -> RiskLevel {
    if count_kind(scam, IndicatorKind::HighRisk) > 0 || score < 20.0 {
        RiskLevel::Critical
    } else if score < 40.0 {
        RiskLevel::High
    } else if score < 60.0 {
        RiskLevel::Medium
    } else {
        RiskLevel::Low
    }
}

fn join_or(parts: Vec<&str>, fallback: &str) -> String {
    if parts.is_empty() {
        fallback.to_string()
    } else {
        parts.join("; ")
    }
}

pub fn basic_tokenomics(text: &str) -> String {
    let t = text.to_lowercase();
    let mut parts = Vec::new();

    if t.contains("token") {
        parts.push("Token mentioned");
    }
    if t.contains("supply") {
        parts.push("Supply information present");
    }
    if t.contains("burn") || t.contains("deflationary") {
        parts.push("Deflationary mechanism");
    }
    if t.contains("stake") {
        parts.push("Staking utility");
    }
    if t.contains("governance") {
        parts.push("Governance utility");
    }
    if t.contains("unlimited supply") {
        parts.push("⚠️ Unlimited supply");
    }
    if t.contains("dev wallet") && t.contains("90%") {
        parts.push("⚠️ High dev allocation");
    }

    join_or(parts, "Limited tokenomics information")
}

pub fn roadmap_summary(text: &str) -> String {
    let t = text.to_lowercase();
    let mut parts = Vec::new();

    if t.contains("roadmap") {
        parts.push("Roadmap present");
    }
    if t.contains("q1") || t.contains("q2") || t.contains("quarter") {
        parts.push("Quarterly planning");
    }
    if t.contains("milestone") {
        parts.push("Clear milestones");
    }
    if t.contains("phase") {
        parts.push("Phased development");
    }
    if t.contains("mainnet") || t.contains("testnet") {
        parts.push("Network deployment planned");
    }
    if t.contains("moon") || t.contains("lambo") {
        parts.push("⚠️ Unrealistic expectations");
    }
    if t.contains("coming soon") && parts.is_empty() {
        parts.push("⚠️ Vague timeline");
    }

    join_or(parts, "No roadmap information")
}

pub fn team_summary(text: &str) -> String {
    let t = text.to_lowercase();
    let mut parts = Vec::new();

    if t.contains("team") {
        parts.push("Team mentioned");
    }
    if t.contains("founder") || t.contains("ceo") {
        parts.push("Leadership identified");
    }
    if t.contains("doxxed") {
        parts.push("Doxxed team");
    }
    if t.contains("anonymous") {
        parts.push("⚠️ Anonymous team");
    }
    if t.contains("linkedin") {
        parts.push("Professional profiles");
    }
    if t.contains("experience") || t.contains("background") {
        parts.push("Experience highlighted");
    }

    join_or(parts, "Limited team information")
}
