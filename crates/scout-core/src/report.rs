//! Telegram HTML renderings of every bot reply.

use chrono::{DateTime, Utc};

use crate::{
    analysis::{sentiment, CommunityReport, Indicator, ProjectAnalysis, RiskLevel},
    formatting::{
        convert_markdown_to_html, escape_html, format_thousands, humanize_label, one_line,
        truncate_chars,
    },
    research::{needs::GENERIC_PITCH, ComprehensiveAnalysis, JobOpportunity, Maturity, Urgency},
    sources::Tweet,
};

const TWEET_PREVIEW_CHARS: usize = 280;
const DESCRIPTION_PREVIEW_CHARS: usize = 400;
const COMMUNITY_PREVIEW_CHARS: usize = 300;

fn check(b: bool) -> &'static str {
    if b {
        "✅"
    } else {
        "❌"
    }
}

fn join_indicators(list: &[Indicator], n: usize) -> String {
    list.iter()
        .take(n)
        .map(|i| escape_html(&i.to_string()))
        .collect::<Vec<_>>()
        .join(", ")
}

fn sentiment_emoji(score: f64) -> &'static str {
    if score > 0.1 {
        "😊"
    } else if score > -0.1 {
        "😐"
    } else {
        "😟"
    }
}

pub fn format_duration(seconds: i64) -> String {
    let seconds = seconds.max(0);
    let hours = seconds / 3600;
    let mins = (seconds % 3600) / 60;
    let secs = seconds % 60;
    if hours > 0 {
        return format!("{hours}h {mins}m {secs}s");
    }
    if mins > 0 {
        return format!("{mins}m {secs}s");
    }
    format!("{secs}s")
}

pub fn help_text() -> String {
    "🔭 <b>Web3 Scout Bot</b>\n\n\
Aggregates Twitter, Telegram and AI analysis for crypto projects.\n\n\
<b>📋 Commands:</b>\n\
/tweets &lt;topic&gt; - Recent tweets on a topic\n\
/digest &lt;topic&gt; - AI summary of recent tweets\n\
/summarize &lt;text&gt; - Summarize text (or reply to a message)\n\
/analyze &lt;text&gt; - Legitimacy check of a project pitch (or reply)\n\
/community @username - Analyze a public Telegram community\n\
/research &lt;project&gt; - Full research with job opportunities\n\
/status - Bot and session status\n\
/help - Show this message\n\n\
<b>💡 Example:</b>\n\
<code>/research chainlink</code>"
        .to_string()
}

pub fn usage(command: &str, args: &str, example: &str) -> String {
    format!(
        "Usage: <code>/{command} {}</code>\nExample: <code>/{command} {}</code>",
        escape_html(args),
        escape_html(example)
    )
}

pub fn format_error(err: &impl std::fmt::Display) -> String {
    format!("❌ {}", escape_html(&err.to_string()))
}

pub fn format_tweets(topic: &str, tweets: &[Tweet]) -> String {
    if tweets.is_empty() {
        return format!("🐦 No recent tweets found for <b>{}</b>.", escape_html(topic));
    }

    let mut lines = vec![format!(
        "🐦 <b>Recent tweets: {}</b> ({})\n",
        escape_html(topic),
        tweets.len()
    )];
    for t in tweets {
        let when = t
            .created_at
            .map(|d| d.format(" · %Y-%m-%d %H:%M").to_string())
            .unwrap_or_default();
        lines.push(format!(
            "<b>@{}</b>{when}\n{}\n❤️ {} 🔁 {} · <a href=\"{}\">open</a>\n",
            escape_html(&t.author),
            escape_html(&truncate_chars(&one_line(&t.text), TWEET_PREVIEW_CHARS)),
            format_thousands(t.like_count),
            format_thousands(t.retweet_count),
            escape_html(&t.url()),
        ));
    }
    lines.join("\n")
}

/// Plain-text tweet list used as model input.
pub fn tweets_as_prompt(tweets: &[Tweet]) -> String {
    tweets
        .iter()
        .map(|t| format!("@{}: {}", t.author, one_line(&t.text)))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn format_digest(topic: &str, summary_markdown: &str, tweet_count: usize) -> String {
    format!(
        "📰 <b>Twitter digest: {}</b>\n<i>Based on {tweet_count} recent tweets</i>\n\n{}",
        escape_html(topic),
        convert_markdown_to_html(summary_markdown.trim())
    )
}

pub fn format_summary(summary_markdown: &str) -> String {
    format!(
        "📝 <b>Summary</b>\n\n{}",
        convert_markdown_to_html(summary_markdown.trim())
    )
}

fn analysis_details(a: &ProjectAnalysis, lines: &mut Vec<String>) {
    if a.risk_level.is_alarming() && !a.scam_indicators.is_empty() {
        lines.push(format!(
            "\n🚨 <b>WARNING SIGNS:</b> {}",
            join_indicators(&a.scam_indicators, 3)
        ));
    }
    if !a.positive_indicators.is_empty() {
        lines.push(format!(
            "\n✅ <b>POSITIVE SIGNS:</b> {}",
            join_indicators(&a.positive_indicators, 3)
        ));
    }

    lines.push("\n<b>🔍 DETAILED ANALYSIS:</b>".to_string());
    lines.push(format!(
        "💰 <b>Tokenomics:</b> {}",
        escape_html(a.tokenomics.as_deref().unwrap_or("Not analyzed"))
    ));
    lines.push(format!(
        "🗺️ <b>Roadmap:</b> {}",
        escape_html(a.roadmap.as_deref().unwrap_or("No roadmap info"))
    ));
    lines.push(format!(
        "👥 <b>Team:</b> {}",
        escape_html(a.team.as_deref().unwrap_or("Team info limited"))
    ));
}

fn score_lines(a: &ProjectAnalysis, lines: &mut Vec<String>) {
    lines.push(format!(
        "{} <b>Legitimacy Score:</b> {:.1}/100",
        a.risk_level.emoji(),
        a.legitimacy_score
    ));
    lines.push(format!(
        "🎯 <b>Risk Level:</b> {}",
        a.risk_level.as_str().to_uppercase()
    ));
    lines.push(format!(
        "{} <b>Sentiment:</b> {:.2} ({})",
        sentiment_emoji(a.sentiment),
        a.sentiment,
        sentiment::label(a.sentiment)
    ));
}

fn caution_footer(a: &ProjectAnalysis, lines: &mut Vec<String>) {
    if a.risk_level == RiskLevel::Critical {
        lines.push("\n⚠️ <b>PROCEED WITH EXTREME CAUTION</b> ⚠️".to_string());
    }
}

/// Reply for `/analyze`.
pub fn format_text_analysis(a: &ProjectAnalysis) -> String {
    let mut lines = vec!["🧪 <b>PROJECT LEGITIMACY CHECK</b>\n".to_string()];
    score_lines(a, &mut lines);
    analysis_details(a, &mut lines);
    caution_footer(a, &mut lines);
    lines.join("\n")
}

/// Reply for `/community`.
pub fn format_community_report(r: &CommunityReport) -> String {
    let info = &r.info;
    let a = &r.analysis;

    let link = info
        .invite_link
        .clone()
        .or_else(|| (!info.username.is_empty()).then(|| format!("https://t.me/{}", info.username)));

    let mut lines = vec![
        "📱 <b>TELEGRAM COMMUNITY REPORT</b>\n".to_string(),
        format!("<b>{}</b>", escape_html(&info.title)),
        format!(
            "👥 <b>Members:</b> {} ({})",
            format_thousands(u64::from(info.member_count)),
            r.size.label()
        ),
        format!(
            "🔗 <b>Link:</b> {}",
            link.map(|l| escape_html(&l)).unwrap_or_else(|| "Private".to_string())
        ),
        String::new(),
    ];
    score_lines(a, &mut lines);

    if !info.description.trim().is_empty() {
        lines.push("\n<b>📋 PROJECT OVERVIEW:</b>".to_string());
        lines.push(escape_html(&truncate_chars(
            info.description.trim(),
            COMMUNITY_PREVIEW_CHARS,
        )));
    }

    analysis_details(a, &mut lines);

    lines.push(String::new());
    lines.push(format!("👮 <b>Admins:</b> {}", info.admin_count));
    lines.push(format!(
        "📅 <b>Checked:</b> {}",
        r.discovered_at.format("%Y-%m-%d %H:%M UTC")
    ));
    lines.push(format!("🆔 <code>{}</code>", &r.fingerprint[..12.min(r.fingerprint.len())]));
    caution_footer(a, &mut lines);
    lines.join("\n")
}

pub fn format_research_placeholder(project: &str) -> String {
    format!(
        "🔍 <b>Researching {}...</b>\n\n\
This analysis can take up to a minute. Please wait...\n\n\
📊 Gathering data from multiple sources\n\
💼 Identifying job opportunities\n\
📝 Preparing pitch strategies",
        escape_html(project)
    )
}

fn bullet_labels(items: &[&str], icon: &str, empty: &str) -> String {
    if items.is_empty() {
        return empty.to_string();
    }
    items
        .iter()
        .take(4)
        .map(|s| format!("{icon} {}", humanize_label(s)))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Research message 1: overview and legitimacy.
pub fn format_overview(a: &ComprehensiveAnalysis) -> String {
    let l = &a.legitimacy;
    let mut lines = vec![
        "📊 <b>COMPREHENSIVE PROJECT RESEARCH</b>\n".to_string(),
        format!("<b>{}</b>", escape_html(&a.project_name.to_uppercase())),
        format!(
            "🌐 <b>Overall Maturity:</b> {}",
            humanize_label(a.needs.maturity.as_str())
        ),
        format!(
            "{} <b>Legitimacy Score:</b> {:.1}/100",
            l.risk_level.emoji(),
            l.legitimacy_score
        ),
        format!("🎯 <b>Risk Level:</b> {}", l.risk_level.as_str().to_uppercase()),
    ];

    if l.risk_level.is_alarming() && !l.scam_indicators.is_empty() {
        lines.push(format!(
            "\n🚨 <b>WARNING:</b> {}",
            join_indicators(&l.scam_indicators, 2)
        ));
    }

    lines.push("\n<b>📋 PROJECT DESCRIPTION:</b>".to_string());
    lines.push(escape_html(&truncate_chars(
        a.description.trim(),
        DESCRIPTION_PREVIEW_CHARS,
    )));

    if let Some(site) = &a.website {
        lines.push(format!("🔗 {}", escape_html(site)));
    }
    if let Some(cap) = a.market.market_cap_usd {
        lines.push(format!(
            "💵 <b>Market Cap:</b> ${}",
            format_thousands(cap.max(0.0).round() as u64)
        ));
    }

    lines.push("\n<b>💪 STRENGTHS:</b>".to_string());
    lines.push(bullet_labels(&a.needs.strengths, "✅", "None identified"));
    lines.push("\n<b>🔧 NEEDS IMPROVEMENT:</b>".to_string());
    lines.push(bullet_labels(&a.needs.improvement_areas, "❌", "None identified"));

    lines.push(String::new());
    lines.push(format!(
        "📅 <b>Research Date:</b> {}",
        a.researched_at.format("%Y-%m-%d %H:%M UTC")
    ));
    let sources = if a.sources.is_empty() {
        "None".to_string()
    } else {
        a.sources.join(", ")
    };
    lines.push(format!("📚 <b>Sources:</b> {}", escape_html(&sources)));
    for w in &a.warnings {
        lines.push(format!("⚠️ <i>{}</i>", escape_html(w)));
    }
    lines.join("\n")
}

/// Research message 2: per-dimension breakdown.
pub fn format_detailed(a: &ComprehensiveAnalysis) -> String {
    let s = &a.social;
    let t = &a.technical;
    let team = &a.team;
    let tok = &a.tokenomics;
    let c = &a.community;

    let missing = if s.missing_platforms.is_empty() {
        "None".to_string()
    } else {
        s.missing_platforms.join(", ")
    };
    let red_flags = if tok.red_flags.is_empty() {
        "None identified".to_string()
    } else {
        tok.red_flags.join(", ")
    };

    let mut lines = vec![
        "🔍 <b>DETAILED ANALYSIS BREAKDOWN</b>\n".to_string(),
        format!("<b>📱 SOCIAL MEDIA PRESENCE</b> ({}/100)", s.score),
        format!("• Missing Platforms: {missing}"),
        format!(
            "• Twitter: {} ({} followers)",
            check(s.twitter.present),
            format_thousands(s.twitter.audience)
        ),
        format!(
            "• Telegram: {} ({} members)",
            check(s.telegram.present),
            format_thousands(s.telegram.audience)
        ),
        format!("• Discord: {}", check(s.discord.present)),
    ];
    push_recommendations(&mut lines, &s.recommendations);

    lines.extend([
        String::new(),
        format!("<b>🔧 TECHNICAL FOUNDATION</b> ({}/100)", t.score),
        format!("• GitHub: {} ({} repos)", check(t.has_github()), t.github_repos),
        format!("• Whitepaper: {}", check(t.whitepaper)),
        format!(
            "• Smart Contracts: {}",
            if t.contracts_deployed {
                "✅ Deployed"
            } else {
                "❌ Not Found"
            }
        ),
        format!("• Security Audit: {}", check(t.contracts_audited)),
    ]);
    push_recommendations(&mut lines, &t.recommendations);

    lines.extend([
        String::new(),
        format!("<b>👥 TEAM TRANSPARENCY</b> ({}/100)", team.score),
        format!(
            "• Transparency Level: {}",
            humanize_label(team.transparency.as_str())
        ),
        format!("• LinkedIn Profiles: {}", team.linkedin_profiles),
        format!("• Public Backgrounds: {}", team.public_backgrounds),
    ]);
    push_recommendations(&mut lines, &team.recommendations);

    lines.extend([
        String::new(),
        format!("<b>💰 TOKENOMICS ANALYSIS</b> ({}/100)", tok.score),
        format!("• Burn Mechanism: {}", check(tok.burn_mechanism)),
        format!("• Staking: {}", check(tok.staking)),
        format!("• Governance: {}", check(tok.governance)),
        format!("• Red Flags: {red_flags}"),
    ]);
    push_recommendations(&mut lines, &tok.recommendations);

    lines.extend([
        String::new(),
        format!("<b>🫂 COMMUNITY HEALTH</b> ({}/100)", c.score),
        format!("• Size: {}", c.size.as_deref().unwrap_or("unknown")),
        format!("• Engagement: {}", c.engagement),
        format!("• Sentiment: {}", humanize_label(c.sentiment)),
    ]);
    push_recommendations(&mut lines, &c.recommendations);

    lines.join("\n")
}

fn push_recommendations(lines: &mut Vec<String>, recs: &[&str]) {
    if recs.is_empty() {
        return;
    }
    lines.push("<i>Recommendations:</i>".to_string());
    lines.extend(recs.iter().map(|r| format!("  ↳ {}", escape_html(r))));
}

fn format_pitch(job: &JobOpportunity) -> String {
    let Some(p) = job.pitch else {
        return GENERIC_PITCH.to_string();
    };
    let points = p
        .key_points
        .iter()
        .map(|k| format!("• {k}"))
        .collect::<Vec<_>>()
        .join("\n");
    format!(
        "<b>Pitch Strategy:</b> {}\n<b>Approach:</b> {}\n<b>Key Points to Highlight:</b>\n{points}\n\n\
<b>Pitch Template:</b>\n<i>\"Hi [Project Name] team! I've been following your project and see great potential. \
I noticed you could benefit from {} support. Here's how I can help:\n\
[Specific examples of what you can deliver]\n\
[Your relevant experience/portfolio]\n\
[Proposed timeline and deliverables]\n\
I'd love to discuss how we can grow [Project Name] together. When would be a good time for a brief call?\"</i>",
        escape_html(p.strategy),
        escape_html(p.approach),
        job.category.spoken(),
    )
}

/// Research message 3: job opportunities with pitch guidance.
pub fn format_jobs(a: &ComprehensiveAnalysis) -> String {
    let jobs = &a.needs.jobs;
    if jobs.is_empty() {
        return "💼 <b>JOB OPPORTUNITIES &amp; PITCH STRATEGIES</b>\n\n\
🎯 <b>No specific job opportunities identified.</b>\n\n\
This project appears to be well-staffed or mature. You can still reach out with:\n\
• General consultation offers\n\
• Specialized expertise in your field\n\
• Partnership proposals\n\
• Community contribution ideas"
            .to_string();
    }

    let mut lines = vec![
        "💼 <b>JOB OPPORTUNITIES &amp; PITCH STRATEGIES</b>\n".to_string(),
        format!("Found <b>{} opportunities</b> for this project:", jobs.len()),
    ];
    for job in jobs.iter().take(4) {
        lines.push(String::new());
        lines.push(format!(
            "<b>{} {} - {} PRIORITY</b>",
            job.urgency.emoji(),
            job.category.spoken().to_uppercase(),
            job.urgency.as_str().to_uppercase()
        ));
        lines.push(format!("📋 <b>Role:</b> {}", escape_html(job.description)));
        lines.push(format!("💰 <b>Budget:</b> {}", escape_html(job.estimated_budget)));
        lines.push(format!("⏰ <b>Commitment:</b> {}", escape_html(job.time_commitment)));
        lines.push("<b>Requirements:</b>".to_string());
        lines.extend(job.requirements.iter().map(|r| format!("• {}", escape_html(r))));
        lines.push("<b>🎯 HOW TO PITCH:</b>".to_string());
        lines.push(format_pitch(job));
    }

    lines.push(String::new());
    lines.push("<b>📧 GENERAL OUTREACH TIPS:</b>".to_string());
    lines.push("• Research recent project updates before reaching out".to_string());
    lines.push("• Start with value - show what you can deliver".to_string());
    lines.push("• Keep initial message concise (under 200 words)".to_string());
    lines.push("• Follow up professionally if no response in 1 week".to_string());
    lines.join("\n")
}

fn stage_advice(m: Maturity) -> &'static str {
    match m {
        Maturity::Early => {
            "<b>🌱 EARLY STAGE PROJECT</b>\n\
• High potential but also high risk\n\
• Focus on foundational roles (community, development)\n\
• Consider equity/token compensation\n\
• Be prepared for rapid changes"
        }
        Maturity::Developing => {
            "<b>📈 DEVELOPING PROJECT</b>\n\
• Good balance of opportunity and stability\n\
• Clear growth trajectory\n\
• Professional compensation likely available\n\
• Focus on scaling and optimization roles"
        }
        Maturity::Mature => {
            "<b>🏢 MATURE PROJECT</b>\n\
• Lower risk, potentially lower growth\n\
• Specialized roles and consulting opportunities\n\
• Competitive compensation\n\
• Focus on innovation and expansion roles"
        }
    }
}

/// Research message 4: action plan.
pub fn format_action_plan(a: &ComprehensiveAnalysis) -> String {
    let priority: Vec<String> = a
        .needs
        .jobs
        .iter()
        .take(3)
        .filter(|j| j.urgency == Urgency::High)
        .map(|j| {
            format!(
                "🔥 <b>{}</b> - Act within 48 hours",
                humanize_label(j.category.as_str())
            )
        })
        .collect();

    let mut lines = vec![
        "🎯 <b>ACTION PLAN &amp; NEXT STEPS</b>\n".to_string(),
        stage_advice(a.needs.maturity).to_string(),
        "\n<b>⚡ PRIORITY ACTIONS:</b>".to_string(),
    ];
    if priority.is_empty() {
        lines.push("• Research project updates and recent news".to_string());
    } else {
        lines.extend(priority);
    }
    lines.push("• Join their community channels to understand culture".to_string());
    lines.push("• Prepare portfolio/examples relevant to their needs".to_string());
    lines.push("• Draft personalized outreach messages".to_string());

    lines.push("\n<b>🔍 ADDITIONAL RESEARCH RECOMMENDED:</b>".to_string());
    lines.push("• Recent partnership announcements".to_string());
    lines.push("• Latest roadmap updates".to_string());
    lines.push("• Community sentiment analysis".to_string());
    lines.push("• Competitor landscape".to_string());
    lines.push("• Token price trends (if applicable)".to_string());

    lines.push("\n<b>📞 NEXT STEPS:</b>".to_string());
    lines.push("1. <b>Week 1:</b> Join communities, observe, contribute value".to_string());
    lines.push("2. <b>Week 2:</b> Reach out with specific proposals".to_string());
    lines.push("3. <b>Week 3:</b> Follow up and refine approach".to_string());
    lines.push("4. <b>Week 4:</b> Consider alternative angles if needed".to_string());

    lines.push(format!(
        "\n⏰ <b>Time-Sensitive Opportunities:</b> {}",
        a.needs.high_urgency_count()
    ));
    lines.push("\nUse <code>/research &lt;another project&gt;</code> to analyze more opportunities!".to_string());
    lines.join("\n")
}

/// The four research messages, in delivery order.
pub fn format_research(a: &ComprehensiveAnalysis) -> [String; 4] {
    [
        format_overview(a),
        format_detailed(a),
        format_jobs(a),
        format_action_plan(a),
    ]
}

#[derive(Clone, Debug)]
pub struct StatusInfo {
    pub session_name: String,
    pub bot_username: String,
    pub started_at: DateTime<Utc>,
    pub now: DateTime<Utc>,
    pub openai_model: String,
    pub tweet_search_limit: usize,
}

pub fn format_status(s: &StatusInfo) -> String {
    let uptime = (s.now - s.started_at).num_seconds();
    let lines = vec![
        "📊 <b>Bot Status</b>\n".to_string(),
        format!("✅ Session: <code>{}</code>", escape_html(&s.session_name)),
        format!("🤖 Bot: @{}", escape_html(&s.bot_username)),
        format!("⏱️ Uptime: {}", format_duration(uptime)),
        String::new(),
        "<b>🔌 Services</b>".to_string(),
        format!(
            "🐦 Twitter recent search (up to {} tweets)",
            s.tweet_search_limit
        ),
        format!("🧠 OpenAI <code>{}</code>", escape_html(&s.openai_model)),
        "🦎 CoinGecko project directory".to_string(),
        "📱 Telegram public chat lookup".to_string(),
    ];
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use super::*;
    use crate::{
        analysis::{CommunityInfo, ProjectAnalyzer},
        research::{
            needs::identify_needs, research_legitimacy, CommunityHealth, PlatformPresence,
            SocialPresence, TeamAnalysis, TechnicalAnalysis, TokenomicsReport,
        },
        sources::{MarketData, ProjectProfile},
    };

    fn now() -> DateTime<Utc> {
        DateTime::parse_from_rfc3339("2024-06-01T12:00:00Z")
            .unwrap()
            .with_timezone(&Utc)
    }

    fn bare_research(name: &str) -> ComprehensiveAnalysis {
        let profile = ProjectProfile {
            name: name.to_string(),
            description: "A <new> chain".into(),
            ..Default::default()
        };
        let social = SocialPresence::new(
            PlatformPresence::default(),
            PlatformPresence::default(),
            PlatformPresence::default(),
        );
        let technical = TechnicalAnalysis::from_profile(&profile);
        let team = TeamAnalysis::from_description(&profile.description);
        let needs = identify_needs(&social, &technical, &team, &MarketData::default());
        ComprehensiveAnalysis {
            legitimacy: research_legitimacy(&social, &technical, &team, &profile.description),
            community: CommunityHealth::new(None, &profile.description),
            tokenomics: TokenomicsReport::from_description(&profile.description),
            project_name: profile.name,
            description: profile.description,
            website: None,
            market: MarketData::default(),
            social,
            technical,
            team,
            needs,
            researched_at: now(),
            sources: Vec::new(),
            warnings: vec!["CoinGecko lookup failed".into()],
        }
    }

    #[test]
    fn tweets_are_escaped_and_linked() {
        let tweets = vec![Tweet {
            id: "42".into(),
            author: "alice".into(),
            text: "gm <frens>\n& more".into(),
            created_at: None,
            like_count: 1200,
            retweet_count: 3,
        }];
        let html = format_tweets("sol & eth", &tweets);
        assert!(html.contains("sol &amp; eth"));
        assert!(html.contains("gm &lt;frens&gt; &amp; more"));
        assert!(html.contains("❤️ 1,200 🔁 3"));
        assert!(html.contains("https://twitter.com/alice/status/42"));
        assert!(format_tweets("x", &[]).contains("No recent tweets"));
    }

    #[test]
    fn research_messages_render_all_sections() {
        let a = bare_research("ghostcoin");
        let [overview, detailed, jobs, plan] = format_research(&a);

        assert!(overview.contains("<b>GHOSTCOIN</b>"));
        assert!(overview.contains("🎯 <b>Risk Level:</b> CRITICAL"));
        assert!(overview.contains("🚨 <b>WARNING:</b> MEDIUM RISK: Anonymous team"));
        assert!(overview.contains("A &lt;new&gt; chain"));
        assert!(overview.contains("📚 <b>Sources:</b> None"));
        assert!(overview.contains("⚠️ <i>CoinGecko lookup failed</i>"));
        assert!(overview.contains("❌ Social Media Strategy"));
        assert!(overview.contains("<b>💪 STRENGTHS:</b>\nNone identified"));

        assert!(detailed.contains("• Missing Platforms: twitter, telegram"));
        assert!(detailed.contains("• Transparency Level: Anonymous"));
        assert!(detailed.contains(
            "• Discord: ❌\n<i>Recommendations:</i>\n  ↳ Establish Twitter presence"
        ));
        assert!(detailed.contains("  ↳ Publish detailed whitepaper explaining technology and tokenomics"));
        assert!(detailed.ends_with("  ↳ Increase community engagement through regular events and updates"));

        assert!(jobs.contains("Found <b>7 opportunities</b>"));
        assert!(jobs.contains("🔥 SOCIAL MEDIA - HIGH PRIORITY"));
        assert!(jobs.contains(GENERIC_PITCH));
        // only the first four jobs are detailed
        assert!(!jobs.contains("BUSINESS DEVELOPMENT - MEDIUM"));

        assert!(plan.contains("🌱 EARLY STAGE PROJECT"));
        assert!(plan.contains("🔥 <b>Social Media</b> - Act within 48 hours"));
        assert!(plan.contains("⏰ <b>Time-Sensitive Opportunities:</b> 3"));
    }

    #[tokio::test]
    async fn community_report_flags_critical_projects() {
        let info = CommunityInfo {
            title: "Pump <Club>".into(),
            username: "pumpclub".into(),
            member_count: 42,
            description: "Guaranteed profit, 100x profit!".into(),
            admin_count: 1,
            ..Default::default()
        };
        let analysis = ProjectAnalyzer::default().analyze(&info, now()).await;
        let report = CommunityReport::new(info, analysis, now());
        let html = format_community_report(&report);

        assert!(html.contains("<b>Pump &lt;Club&gt;</b>"));
        assert!(html.contains("👥 <b>Members:</b> 42 (31-50)"));
        assert!(html.contains("https://t.me/pumpclub"));
        assert!(html.contains("🚨 <b>WARNING SIGNS:</b> HIGH RISK: guaranteed profit"));
        assert!(html.contains("PROCEED WITH EXTREME CAUTION"));
        assert!(html.contains("📅 <b>Checked:</b> 2024-06-01 12:00 UTC"));
    }

    #[tokio::test]
    async fn large_communities_are_labelled_500_plus() {
        let info = CommunityInfo {
            title: "Big DAO".into(),
            username: "bigdao".into(),
            member_count: 12_000,
            ..Default::default()
        };
        let analysis = ProjectAnalyzer::default().analyze(&info, now()).await;
        let html = format_community_report(&CommunityReport::new(info, analysis, now()));
        assert!(html.contains("👥 <b>Members:</b> 12,000 (500+)"));
        assert!(!html.contains("201-500"));
    }

    #[test]
    fn status_shows_uptime_and_services() {
        let s = StatusInfo {
            session_name: "scout_session".into(),
            bot_username: "scout_bot".into(),
            started_at: now(),
            now: now() + Duration::seconds(3725),
            openai_model: "gpt-4o-mini".into(),
            tweet_search_limit: 10,
        };
        let html = format_status(&s);
        assert!(html.contains("<code>scout_session</code>"));
        assert!(html.contains("@scout_bot"));
        assert!(html.contains("1h 2m 5s"));
    }

    #[test]
    fn duration_formatting() {
        assert_eq!(format_duration(-5), "0s");
        assert_eq!(format_duration(59), "59s");
        assert_eq!(format_duration(61), "1m 1s");
    }

    #[test]
    fn help_mentions_every_command() {
        let h = help_text();
        for cmd in [
            "/tweets",
            "/digest",
            "/summarize",
            "/analyze",
            "/community",
            "/research",
            "/status",
            "/help",
        ] {
            assert!(h.contains(cmd), "help is missing {cmd}");
        }
    }
}
