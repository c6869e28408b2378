//! Command service: turns parsed chat commands into port calls and replies.

use std::sync::Arc;

use chrono::Utc;
use tokio_util::sync::CancellationToken;

use crate::{
    analysis::{signals::is_crypto_related, CommunityReport, ProjectAnalyzer},
    commands::{normalize_chat_handle, parse_command, Command},
    config::Config,
    domain::{ChatId, MessageRef, UserId},
    formatting::{escape_html, split_html_chunks, truncate_chars},
    messaging::{port::MessagingPort, types::ChatAction},
    ports::{Analyst, CommunityDirectory, CompletionRequest, ProjectDirectory, TweetSource},
    report,
    research::ProjectResearcher,
    session::SessionHandle,
    Error, Result,
};

const SUMMARY_INPUT_CHARS: usize = 12_000;

const SUMMARIZE_SYSTEM: &str = "You summarize text for a Telegram chat about web3 projects. \
Be concise, factual and neutral. Use short bullet points. Do not invent facts.";

const DIGEST_SYSTEM: &str = "You write short digests of recent tweets about a crypto topic. \
Group related tweets into themes, mention notable accounts, and flag obvious shilling or scam patterns.";

/// Incoming chat message as seen by the service.
#[derive(Clone, Debug)]
pub struct CommandRequest {
    pub chat_id: ChatId,
    pub from: Option<UserId>,
    pub text: String,
    /// Text of the replied-to message, if any.
    pub reply_text: Option<String>,
}

/// All outbound dependencies of the service.
#[derive(Clone)]
pub struct ServicePorts {
    pub messenger: Arc<dyn MessagingPort>,
    pub tweets: Arc<dyn TweetSource>,
    pub analyst: Arc<dyn Analyst>,
    pub projects: Arc<dyn ProjectDirectory>,
    pub communities: Arc<dyn CommunityDirectory>,
}

pub struct ScoutService {
    cfg: Arc<Config>,
    session: SessionHandle,
    messenger: Arc<dyn MessagingPort>,
    tweets: Arc<dyn TweetSource>,
    analyst: Arc<dyn Analyst>,
    communities: Arc<dyn CommunityDirectory>,
    analyzer: ProjectAnalyzer,
    researcher: ProjectResearcher,
}

impl ScoutService {
    pub fn new(cfg: Arc<Config>, session: SessionHandle, ports: ServicePorts) -> Self {
        let analyzer = ProjectAnalyzer::new(Some(ports.analyst.clone()));
        let researcher = ProjectResearcher::new(
            ports.projects,
            ports.tweets.clone(),
            ports.communities.clone(),
        );
        Self {
            cfg,
            session,
            messenger: ports.messenger,
            tweets: ports.tweets,
            analyst: ports.analyst,
            communities: ports.communities,
            analyzer,
            researcher,
        }
    }

    pub fn session(&self) -> &SessionHandle {
        &self.session
    }

    /// Handle one message. Only fatal errors are returned; everything else is
    /// reported to the originating chat.
    pub async fn handle(&self, req: CommandRequest, shutdown: &CancellationToken) -> Result<()> {
        let bot = &self.session.identity().username;
        let Some(cmd) = parse_command(&req.text, req.reply_text.as_deref(), bot) else {
            return Ok(());
        };
        let chat = req.chat_id;
        tracing::info!(
            chat_id = chat.0,
            user_id = req.from.map(|u| u.0),
            command = cmd.name(),
            "command received"
        );

        let outcome = tokio::select! {
            _ = shutdown.cancelled() => Err(Error::Cancelled),
            r = self.dispatch(chat, &cmd) => r,
        };

        match outcome {
            Ok(()) => Ok(()),
            Err(Error::Cancelled) => {
                tracing::info!(chat_id = chat.0, command = cmd.name(), "command cancelled");
                if let Err(send_err) = self
                    .messenger
                    .send_html(chat, "⏹️ Cancelled: the bot is shutting down.")
                    .await
                {
                    tracing::warn!(chat_id = chat.0, "failed to send cancellation notice: {send_err}");
                }
                Ok(())
            }
            Err(e) if e.is_fatal() => Err(e),
            Err(e) => {
                tracing::warn!(chat_id = chat.0, command = cmd.name(), "command failed: {e}");
                if let Err(send_err) = self.send(chat, &report::format_error(&e)).await {
                    tracing::warn!(chat_id = chat.0, "failed to report error: {send_err}");
                }
                Ok(())
            }
        }
    }

    async fn dispatch(&self, chat: ChatId, cmd: &Command) -> Result<()> {
        match cmd {
            Command::Start | Command::Help => self.send(chat, &report::help_text()).await,
            Command::Status => self.status(chat).await,
            Command::Tweets(topic) if topic.is_empty() => {
                self.send(chat, &report::usage("tweets", "<topic>", "solana airdrop"))
                    .await
            }
            Command::Tweets(topic) => self.tweets(chat, topic).await,
            Command::Digest(topic) if topic.is_empty() => {
                self.send(chat, &report::usage("digest", "<topic>", "ethereum restaking"))
                    .await
            }
            Command::Digest(topic) => self.digest(chat, topic).await,
            Command::Summarize(text) if text.is_empty() => {
                self.send(
                    chat,
                    &format!(
                        "{}\n…or reply to a message with <code>/summarize</code>.",
                        report::usage("summarize", "<text>", "paste a long announcement")
                    ),
                )
                .await
            }
            Command::Summarize(text) => self.summarize(chat, text).await,
            Command::Analyze(text) if text.is_empty() => {
                self.send(
                    chat,
                    &format!(
                        "{}\n…or reply to a project pitch with <code>/analyze</code>.",
                        report::usage("analyze", "<project description>", "Fair launch token with staking")
                    ),
                )
                .await
            }
            Command::Analyze(text) => self.analyze(chat, text).await,
            Command::Community(handle) => self.community(chat, handle).await,
            Command::Research(project) if project.is_empty() => {
                self.send(chat, &report::usage("research", "<project name>", "chainlink"))
                    .await
            }
            Command::Research(project) => self.research(chat, project).await,
            Command::Unknown(name) => {
                self.send(
                    chat,
                    &format!(
                        "Unknown command: /{}\nSend /help for the list of commands.",
                        escape_html(name)
                    ),
                )
                .await
            }
        }
    }

    /// Send HTML, split into Telegram-sized chunks.
    async fn send(&self, chat: ChatId, html: &str) -> Result<()> {
        for chunk in split_html_chunks(html, self.message_limit()) {
            self.messenger.send_html(chat, &chunk).await?;
        }
        Ok(())
    }

    /// Replace `msg` with the first chunk of `html` and send the rest as new messages.
    async fn replace(&self, msg: MessageRef, html: &str) -> Result<()> {
        let mut chunks = split_html_chunks(html, self.message_limit()).into_iter();
        if let Some(first) = chunks.next() {
            let edited = if self.messenger.capabilities().supports_edit {
                self.messenger.edit_html(msg, &first).await
            } else {
                Err(Error::External("edit not supported".to_string()))
            };
            if let Err(e) = edited {
                tracing::debug!("edit failed, sending instead: {e}");
                self.messenger.send_html(msg.chat_id, &first).await?;
            }
        }
        for chunk in chunks {
            self.messenger.send_html(msg.chat_id, &chunk).await?;
        }
        Ok(())
    }

    fn message_limit(&self) -> usize {
        self.cfg
            .telegram_safe_limit
            .min(self.messenger.capabilities().max_message_len)
    }

    async fn typing(&self, chat: ChatId) {
        let _ = self.messenger.send_chat_action(chat, ChatAction::Typing).await;
    }

    async fn status(&self, chat: ChatId) -> Result<()> {
        let info = report::StatusInfo {
            session_name: self.session.name().to_string(),
            bot_username: self.session.identity().username.clone(),
            started_at: self.session.started_at(),
            now: Utc::now(),
            openai_model: self.cfg.openai_model.clone(),
            tweet_search_limit: self.cfg.tweet_search_limit,
        };
        self.send(chat, &report::format_status(&info)).await
    }

    async fn tweets(&self, chat: ChatId, topic: &str) -> Result<()> {
        self.typing(chat).await;
        let tweets = self
            .tweets
            .search_recent(topic, self.cfg.tweet_search_limit)
            .await?;
        self.send(chat, &report::format_tweets(topic, &tweets)).await
    }

    async fn digest(&self, chat: ChatId, topic: &str) -> Result<()> {
        self.typing(chat).await;
        let tweets = self
            .tweets
            .search_recent(topic, self.cfg.tweet_search_limit)
            .await?;
        if tweets.is_empty() {
            return self.send(chat, &report::format_tweets(topic, &tweets)).await;
        }

        let prompt = format!(
            "Topic: {topic}\n\nRecent tweets:\n{}\n\nWrite a digest of at most 150 words.",
            truncate_chars(&report::tweets_as_prompt(&tweets), SUMMARY_INPUT_CHARS)
        );
        let summary = self
            .analyst
            .complete(CompletionRequest {
                system: Some(DIGEST_SYSTEM.to_string()),
                prompt,
                max_tokens: 400,
                temperature: 0.5,
            })
            .await?;
        self.send(chat, &report::format_digest(topic, &summary, tweets.len()))
            .await
    }

    async fn summarize(&self, chat: ChatId, text: &str) -> Result<()> {
        self.typing(chat).await;
        let summary = self
            .analyst
            .complete(CompletionRequest {
                system: Some(SUMMARIZE_SYSTEM.to_string()),
                prompt: format!(
                    "Summarize the following text:\n\n{}",
                    truncate_chars(text, SUMMARY_INPUT_CHARS)
                ),
                max_tokens: 300,
                temperature: 0.3,
            })
            .await?;
        self.send(chat, &report::format_summary(&summary)).await
    }

    async fn analyze(&self, chat: ChatId, text: &str) -> Result<()> {
        self.typing(chat).await;
        let analysis = self.analyzer.analyze_text(text, Utc::now()).await;
        self.send(chat, &report::format_text_analysis(&analysis)).await
    }

    async fn community(&self, chat: ChatId, raw: &str) -> Result<()> {
        let handle = normalize_chat_handle(raw);
        if handle.is_empty() {
            return self
                .send(chat, &report::usage("community", "@username", "@solana"))
                .await;
        }

        self.typing(chat).await;
        let Some(info) = self.communities.lookup(&handle).await? else {
            return self
                .send(
                    chat,
                    &format!(
                        "❌ Telegram chat @{} was not found or is not public.",
                        escape_html(&handle)
                    ),
                )
                .await;
        };

        let now = Utc::now();
        let not_crypto = !is_crypto_related(&info.corpus());
        let analysis = self.analyzer.analyze(&info, now).await;
        let report = CommunityReport::new(info, analysis, now);

        let mut html = report::format_community_report(&report);
        if not_crypto {
            html.push_str("\n\nℹ️ <i>This chat does not look crypto-related.</i>");
        }
        self.send(chat, &html).await
    }

    async fn research(&self, chat: ChatId, project: &str) -> Result<()> {
        let placeholder = self
            .messenger
            .send_html(chat, &report::format_research_placeholder(project))
            .await?;
        self.typing(chat).await;

        let analysis = self.researcher.research(project, Utc::now()).await;
        let [overview, detailed, jobs, plan] = report::format_research(&analysis);

        self.replace(placeholder, &overview).await?;
        for html in [detailed, jobs, plan] {
            self.send(chat, &html).await?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;
    use std::time::Duration;

    use async_trait::async_trait;

    use super::*;
    use crate::{
        analysis::CommunityInfo,
        domain::MessageId,
        messaging::types::MessagingCapabilities,
        session::BotIdentity,
        sources::{ProjectProfile, Tweet, TwitterProfile},
    };

    #[derive(Default)]
    struct FakeMessenger {
        fail: bool,
        next_id: Mutex<i32>,
        sends: Mutex<Vec<String>>,
        edits: Mutex<Vec<(MessageRef, String)>>,
    }

    impl FakeMessenger {
        fn sent(&self) -> Vec<String> {
            self.sends.lock().unwrap().clone()
        }

        fn edited(&self) -> Vec<(MessageRef, String)> {
            self.edits.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl MessagingPort for FakeMessenger {
        fn capabilities(&self) -> MessagingCapabilities {
            MessagingCapabilities {
                supports_edit: true,
                max_message_len: 4096,
            }
        }

        async fn send_html(&self, chat_id: ChatId, html: &str) -> Result<MessageRef> {
            self.sends.lock().unwrap().push(html.to_string());
            if self.fail {
                return Err(Error::api("telegram", "Forbidden: bot was blocked by the user"));
            }
            let mut id = self.next_id.lock().unwrap();
            *id += 1;
            Ok(MessageRef {
                chat_id,
                message_id: MessageId(*id),
            })
        }

        async fn edit_html(&self, msg: MessageRef, html: &str) -> Result<()> {
            self.edits.lock().unwrap().push((msg, html.to_string()));
            Ok(())
        }

        async fn send_chat_action(&self, _chat_id: ChatId, _action: ChatAction) -> Result<()> {
            Ok(())
        }
    }

    #[derive(Default)]
    struct FakeTweets {
        fail: bool,
        hang: bool,
    }

    #[async_trait]
    impl TweetSource for FakeTweets {
        async fn search_recent(&self, query: &str, limit: usize) -> Result<Vec<Tweet>> {
            if self.hang {
                tokio::time::sleep(Duration::from_secs(3600)).await;
            }
            if self.fail {
                return Err(Error::api("twitter", "401 Unauthorized"));
            }
            Ok((0..limit.min(2))
                .map(|i| Tweet {
                    id: i.to_string(),
                    author: "alice".into(),
                    text: format!("{query} update {i}"),
                    created_at: None,
                    like_count: 5,
                    retweet_count: 1,
                })
                .collect())
        }

        async fn profile(&self, _username: &str) -> Result<Option<TwitterProfile>> {
            Ok(None)
        }
    }

    #[derive(Default)]
    struct FakeAnalyst {
        prompts: Mutex<Vec<CompletionRequest>>,
    }

    #[async_trait]
    impl Analyst for FakeAnalyst {
        async fn complete(&self, req: CompletionRequest) -> Result<String> {
            self.prompts.lock().unwrap().push(req);
            Ok("**Key points**\n- first".to_string())
        }
    }

    struct FakeProjects;

    #[async_trait]
    impl ProjectDirectory for FakeProjects {
        async fn lookup(&self, _query: &str) -> Result<Option<ProjectProfile>> {
            Ok(None)
        }
    }

    struct FakeCommunities;

    #[async_trait]
    impl CommunityDirectory for FakeCommunities {
        async fn lookup(&self, handle: &str) -> Result<Option<CommunityInfo>> {
            if handle != "defi_builders" {
                return Ok(None);
            }
            Ok(Some(CommunityInfo {
                title: "DeFi Builders".into(),
                username: handle.to_string(),
                member_count: 80,
                description: "Open source DeFi protocol, audited, see our whitepaper".into(),
                admin_count: 3,
                ..Default::default()
            }))
        }
    }

    fn test_config() -> Arc<Config> {
        let env = [
            ("TELEGRAM_BOT_TOKEN", "123:abc"),
            ("TELEGRAM_API_ID", "12345"),
            ("TELEGRAM_API_HASH", "0123456789abcdef0123456789abcdef"),
            ("OPENAI_API_KEY", "sk-test"),
            ("TWITTER_BEARER_TOKEN", "bearer"),
            ("TELETHON_SESSION", "scout_session"),
        ];
        Arc::new(
            Config::from_lookup(|k| {
                env.iter()
                    .find(|(name, _)| *name == k)
                    .map(|(_, v)| v.to_string())
            })
            .unwrap(),
        )
    }

    struct Harness {
        service: ScoutService,
        messenger: Arc<FakeMessenger>,
        analyst: Arc<FakeAnalyst>,
    }

    fn harness(tweets: FakeTweets) -> Harness {
        harness_with(tweets, FakeMessenger::default())
    }

    fn harness_with(tweets: FakeTweets, messenger: FakeMessenger) -> Harness {
        let messenger = Arc::new(messenger);
        let analyst = Arc::new(FakeAnalyst::default());
        let session = SessionHandle::open(
            "scout_session",
            BotIdentity {
                id: 1,
                username: "scout_bot".into(),
            },
            Utc::now(),
        );
        let service = ScoutService::new(
            test_config(),
            session,
            ServicePorts {
                messenger: messenger.clone(),
                tweets: Arc::new(tweets),
                analyst: analyst.clone(),
                projects: Arc::new(FakeProjects),
                communities: Arc::new(FakeCommunities),
            },
        );
        Harness {
            service,
            messenger,
            analyst,
        }
    }

    fn req(text: &str) -> CommandRequest {
        CommandRequest {
            chat_id: ChatId(10),
            from: Some(UserId(20)),
            text: text.to_string(),
            reply_text: None,
        }
    }

    #[tokio::test]
    async fn plain_text_is_ignored() {
        let h = harness(FakeTweets::default());
        h.service
            .handle(req("just chatting"), &CancellationToken::new())
            .await
            .unwrap();
        assert!(h.messenger.sent().is_empty());
    }

    #[tokio::test]
    async fn help_and_unknown_commands() {
        let h = harness(FakeTweets::default());
        let token = CancellationToken::new();
        h.service.handle(req("/help"), &token).await.unwrap();
        h.service.handle(req("/subscribe"), &token).await.unwrap();
        let sent = h.messenger.sent();
        assert!(sent[0].contains("/research"));
        assert!(sent[1].starts_with("Unknown command: /subscribe"));
    }

    #[tokio::test]
    async fn missing_arguments_produce_usage() {
        let h = harness(FakeTweets::default());
        let token = CancellationToken::new();
        h.service.handle(req("/tweets"), &token).await.unwrap();
        h.service.handle(req("/community @"), &token).await.unwrap();
        let sent = h.messenger.sent();
        assert!(sent[0].starts_with("Usage: <code>/tweets &lt;topic&gt;</code>"));
        assert!(sent[1].starts_with("Usage: <code>/community @username</code>"));
    }

    #[tokio::test]
    async fn api_errors_are_reported_to_the_chat() {
        let h = harness(FakeTweets {
            fail: true,
            ..Default::default()
        });
        h.service
            .handle(req("/tweets solana"), &CancellationToken::new())
            .await
            .unwrap();
        assert_eq!(h.messenger.sent(), vec!["❌ twitter error: 401 Unauthorized"]);
    }

    #[tokio::test]
    async fn digest_sends_tweets_to_the_analyst() {
        let h = harness(FakeTweets::default());
        h.service
            .handle(req("/digest solana"), &CancellationToken::new())
            .await
            .unwrap();
        let prompts = h.analyst.prompts.lock().unwrap().clone();
        assert_eq!(prompts.len(), 1);
        assert!(prompts[0].prompt.contains("@alice: solana update 0"));
        let sent = h.messenger.sent();
        assert!(sent[0].contains("Twitter digest: solana"));
        assert!(sent[0].contains("<b>Key points</b>"));
    }

    #[tokio::test]
    async fn summarize_uses_reply_text() {
        let h = harness(FakeTweets::default());
        let mut r = req("/summarize");
        r.reply_text = Some("Mainnet launches next week with staking.".into());
        h.service.handle(r, &CancellationToken::new()).await.unwrap();
        let prompts = h.analyst.prompts.lock().unwrap().clone();
        assert!(prompts[0].prompt.contains("Mainnet launches next week"));
        assert!(h.messenger.sent()[0].starts_with("📝 <b>Summary</b>"));
    }

    #[tokio::test]
    async fn community_lookup_and_not_found() {
        let h = harness(FakeTweets::default());
        let token = CancellationToken::new();
        h.service
            .handle(req("/community @defi_builders"), &token)
            .await
            .unwrap();
        h.service.handle(req("/community @nobody"), &token).await.unwrap();
        let sent = h.messenger.sent();
        assert!(sent[0].contains("<b>DeFi Builders</b>"));
        assert!(sent[0].contains("(51-100)"));
        assert!(!sent[0].contains("crypto-related"));
        assert!(sent[1].contains("@nobody was not found"));
    }

    #[tokio::test]
    async fn research_edits_placeholder_then_sends_rest() {
        let h = harness(FakeTweets::default());
        h.service
            .handle(req("/research ghostcoin"), &CancellationToken::new())
            .await
            .unwrap();

        let sent = h.messenger.sent();
        assert!(sent[0].contains("Researching ghostcoin"));
        assert!(sent.iter().any(|s| s.contains("DETAILED ANALYSIS BREAKDOWN")));
        assert!(sent.iter().any(|s| s.contains("ACTION PLAN")));

        let edits = h.messenger.edited();
        assert_eq!(edits.len(), 1);
        assert_eq!(edits[0].0.message_id, MessageId(1));
        assert!(edits[0].1.contains("COMPREHENSIVE PROJECT RESEARCH"));
    }

    #[tokio::test]
    async fn shutdown_cancels_in_flight_commands() {
        let h = harness(FakeTweets {
            hang: true,
            ..Default::default()
        });
        let token = CancellationToken::new();
        let cancel = token.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(20)).await;
            cancel.cancel();
        });
        h.service.handle(req("/tweets solana"), &token).await.unwrap();
        assert_eq!(h.messenger.sent(), vec!["⏹️ Cancelled: the bot is shutting down."]);
    }

    #[tokio::test]
    async fn undeliverable_cancellation_notice_is_not_an_error() {
        let h = harness_with(
            FakeTweets {
                hang: true,
                ..Default::default()
            },
            FakeMessenger {
                fail: true,
                ..Default::default()
            },
        );
        let token = CancellationToken::new();
        token.cancel();
        h.service.handle(req("/tweets solana"), &token).await.unwrap();
        assert_eq!(h.messenger.sent(), vec!["⏹️ Cancelled: the bot is shutting down."]);
    }

    #[tokio::test]
    async fn commands_for_other_bots_are_ignored() {
        let h = harness(FakeTweets::default());
        let token = CancellationToken::new();
        h.service.handle(req("/help@other_bot"), &token).await.unwrap();
        h.service.handle(req("/subscribe@other_bot"), &token).await.unwrap();
        assert!(h.messenger.sent().is_empty());

        h.service.handle(req("/help@scout_bot"), &token).await.unwrap();
        assert_eq!(h.messenger.sent().len(), 1);
    }

    #[tokio::test]
    async fn status_reports_session() {
        let h = harness(FakeTweets::default());
        h.service
            .handle(req("/status"), &CancellationToken::new())
            .await
            .unwrap();
        let sent = h.messenger.sent();
        assert!(sent[0].contains("<code>scout_session</code>"));
        assert!(sent[0].contains("@scout_bot"));
        assert!(sent[0].contains("gpt-4o-mini"));
    }
}
