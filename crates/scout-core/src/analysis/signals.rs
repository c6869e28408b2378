//! Keyword and pattern signals used by the legitimacy scorer.

use std::{fmt, sync::OnceLock};

use regex::Regex;

pub const HIGH_RISK_PHRASES: &[&str] = &[
    "guaranteed profit",
    "risk-free",
    "100% safe",
    "get rich quick",
    "urgent",
    "limited time",
    "exclusive opportunity",
    "secret method",
    "financial freedom",
    "millionaire",
    "lamborghini",
    "to the moon",
    "pump",
    "dump",
    "shill",
    "exit scam",
    "rug pull",
];

pub const MEDIUM_RISK_PHRASES: &[&str] = &[
    "investment opportunity",
    "high returns",
    "passive income",
    "early investor",
    "presale",
    "private sale",
    "airdrop",
    "referral bonus",
    "pyramid",
    "matrix",
    "doubler",
];

const SUSPICIOUS_PATTERNS: &[&str] = &[
    r"\d+x profit",
    r"\d+% return",
    r"\$\d+k per",
    r"only \d+ spots",
    r"invest \$\d+ get \$\d+",
    r"\d+ btc",
    r"\d+ eth",
];

pub const POSITIVE_KEYWORDS: &[&str] = &[
    "whitepaper",
    "roadmap",
    "github",
    "audit",
    "doxxed team",
    "partnership",
    "testnet",
    "mainnet",
    "smart contract",
    "open source",
    "decentralized",
    "community driven",
    "development update",
    "milestone",
    "alpha",
    "beta",
];

pub const TEAM_KEYWORDS: &[&str] = &[
    "founder",
    "ceo",
    "cto",
    "developer",
    "advisor",
    "team member",
    "linkedin",
    "experience",
    "background",
];

pub const TECH_KEYWORDS: &[&str] = &[
    "consensus",
    "validator",
    "node",
    "blockchain",
    "protocol",
    "algorithm",
    "cryptography",
    "security",
    "scalability",
];

/// Words that mark a chat as crypto-related.
pub const CRYPTO_KEYWORDS: &[&str] = &[
    "defi", "nft", "dao", "web3", "crypto", "blockchain", "token", "coin", "dapp", "protocol",
    "yield", "farming", "staking", "metaverse", "gamefi", "bridge", "swap", "dex", "cex",
    "mining", "node", "validator", "ethereum", "bitcoin", "solana", "polygon", "avalanche", "bsc",
];

const HYPE_EMOJIS: &[char] = &['🚀', '💰', '💎', '🔥', '⚡'];
const MAX_HYPE_EMOJIS: usize = 10;
const MAX_INVITE_LINKS: usize = 3;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum IndicatorKind {
    HighRisk,
    MediumRisk,
    SuspiciousPattern,
    HypeEmojis,
    SuspiciousLinks,
    Positive,
    Team,
    Technical,
    Github,
    Audit,
    Documentation,
}

/// One detected signal, e.g. `HIGH RISK: rug pull`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Indicator {
    pub kind: IndicatorKind,
    pub detail: Option<String>,
}

impl Indicator {
    pub fn new(kind: IndicatorKind, detail: impl Into<String>) -> Self {
        Self {
            kind,
            detail: Some(detail.into()),
        }
    }

    pub fn bare(kind: IndicatorKind) -> Self {
        Self { kind, detail: None }
    }

    fn prefix(&self) -> &'static str {
        match self.kind {
            IndicatorKind::HighRisk => "HIGH RISK",
            IndicatorKind::MediumRisk => "MEDIUM RISK",
            IndicatorKind::SuspiciousPattern => "SUSPICIOUS PATTERN",
            IndicatorKind::HypeEmojis => "EXCESSIVE HYPE EMOJIS",
            IndicatorKind::SuspiciousLinks => "MULTIPLE SUSPICIOUS LINKS",
            IndicatorKind::Positive => "POSITIVE",
            IndicatorKind::Team => "TEAM",
            IndicatorKind::Technical => "TECHNICAL",
            IndicatorKind::Github => "GITHUB REPOSITORY",
            IndicatorKind::Audit => "SECURITY AUDIT",
            IndicatorKind::Documentation => "DOCUMENTATION",
        }
    }
}

impl fmt::Display for Indicator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.detail {
            Some(d) => write!(f, "{}: {}", self.prefix(), d),
            None => f.write_str(self.prefix()),
        }
    }
}

fn suspicious_patterns() -> &'static [Regex] {
    static PATTERNS: OnceLock<Vec<Regex>> = OnceLock::new();
    PATTERNS.get_or_init(|| {
        SUSPICIOUS_PATTERNS
            .iter()
            .filter_map(|p| Regex::new(p).ok())
            .collect()
    })
}

fn invite_link_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"t\.me/[a-zA-Z0-9_]+").expect("valid regex"))
}

fn keyword_hits(lower: &str, words: &[&str], kind: IndicatorKind, out: &mut Vec<Indicator>) {
    out.extend(
        words
            .iter()
            .filter(|w| lower.contains(*w))
            .map(|w| Indicator::new(kind, *w)),
    );
}

pub fn detect_scam_indicators(text: &str) -> Vec<Indicator> {
    let lower = text.to_lowercase();
    let mut out = Vec::new();

    keyword_hits(&lower, HIGH_RISK_PHRASES, IndicatorKind::HighRisk, &mut out);
    keyword_hits(&lower, MEDIUM_RISK_PHRASES, IndicatorKind::MediumRisk, &mut out);

    for re in suspicious_patterns() {
        out.extend(
            re.find_iter(&lower)
                .map(|m| Indicator::new(IndicatorKind::SuspiciousPattern, m.as_str())),
        );
    }

    let emojis = text.chars().filter(|c| HYPE_EMOJIS.contains(c)).count();
    if emojis > MAX_HYPE_EMOJIS {
        out.push(Indicator::bare(IndicatorKind::HypeEmojis));
    }

    if invite_link_re().find_iter(&lower).count() > MAX_INVITE_LINKS {
        out.push(Indicator::bare(IndicatorKind::SuspiciousLinks));
    }

    out
}

pub fn detect_positive_indicators(text: &str) -> Vec<Indicator> {
    let lower = text.to_lowercase();
    let mut out = Vec::new();

    keyword_hits(&lower, POSITIVE_KEYWORDS, IndicatorKind::Positive, &mut out);
    keyword_hits(&lower, TEAM_KEYWORDS, IndicatorKind::Team, &mut out);
    keyword_hits(&lower, TECH_KEYWORDS, IndicatorKind::Technical, &mut out);

    if lower.contains("github.com") {
        out.push(Indicator::bare(IndicatorKind::Github));
    }
    if ["audit", "certik", "peckshield"].iter().any(|w| lower.contains(w)) {
        out.push(Indicator::bare(IndicatorKind::Audit));
    }
    if lower.contains("whitepaper") || lower.contains("lite paper") {
        out.push(Indicator::bare(IndicatorKind::Documentation));
    }

    out
}

pub fn is_crypto_related(text: &str) -> bool {
    let lower = text.to_lowercase();
    CRYPTO_KEYWORDS.iter().any(|w| lower.contains(w))
}

pub fn count_kind(indicators: &[Indicator], kind: IndicatorKind) -> usize {
    indicators.iter().filter(|i| i.kind == kind).count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_high_and_medium_risk_phrases() {
        let found = detect_scam_indicators("Guaranteed PROFIT with our presale!");
        let labels: Vec<String> = found.iter().map(ToString::to_string).collect();
        assert!(labels.contains(&"HIGH RISK: guaranteed profit".to_string()));
        assert!(labels.contains(&"MEDIUM RISK: presale".to_string()));
    }

    #[test]
    fn flags_regex_patterns_with_match_text() {
        let found = detect_scam_indicators("Earn 100x profit, only 5 spots left, send 2 ETH");
        let labels: Vec<String> = found.iter().map(ToString::to_string).collect();
        assert!(labels.contains(&"SUSPICIOUS PATTERN: 100x profit".to_string()));
        assert!(labels.contains(&"SUSPICIOUS PATTERN: only 5 spots".to_string()));
        assert!(labels.contains(&"SUSPICIOUS PATTERN: 2 eth".to_string()));
    }

    #[test]
    fn emoji_threshold_is_strictly_greater_than_ten() {
        let ten = "🚀".repeat(10);
        assert!(count_kind(&detect_scam_indicators(&ten), IndicatorKind::HypeEmojis) == 0);
        let eleven = format!("{ten}💎");
        assert_eq!(count_kind(&detect_scam_indicators(&eleven), IndicatorKind::HypeEmojis), 1);
    }

    #[test]
    fn many_invite_links_are_suspicious() {
        let three = "t.me/a t.me/b t.me/c";
        assert_eq!(count_kind(&detect_scam_indicators(three), IndicatorKind::SuspiciousLinks), 0);
        let four = "t.me/a t.me/b t.me/c t.me/d";
        assert_eq!(count_kind(&detect_scam_indicators(four), IndicatorKind::SuspiciousLinks), 1);
    }

    #[test]
    fn positive_groups_and_extras() {
        let found = detect_positive_indicators(
            "Read the whitepaper, code at github.com/x, audited by CertiK. Our CTO built the consensus layer.",
        );
        assert!(count_kind(&found, IndicatorKind::Positive) >= 2);
        assert_eq!(count_kind(&found, IndicatorKind::Team), 1);
        assert_eq!(count_kind(&found, IndicatorKind::Technical), 1);
        assert_eq!(count_kind(&found, IndicatorKind::Github), 1);
        assert_eq!(count_kind(&found, IndicatorKind::Audit), 1);
        assert_eq!(count_kind(&found, IndicatorKind::Documentation), 1);
    }

    #[test]
    fn bare_indicator_display() {
        let i = Indicator::bare(IndicatorKind::Github);
        assert_eq!(i.to_string(), "GITHUB REPOSITORY");
    }

    #[test]
    fn crypto_detection() {
        assert!(is_crypto_related("Solana DeFi builders"));
        assert!(!is_crypto_related("Gardening tips"));
    }
}
