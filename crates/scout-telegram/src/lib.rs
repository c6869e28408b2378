//! Telegram adapter (teloxide).
//!
//! Implements the `scout-core` [`MessagingPort`] and [`CommunityDirectory`]
//! over the Telegram Bot API, plus the polling loop in [`router`].

use async_trait::async_trait;

use teloxide::{
    prelude::*,
    types::{Chat, ParseMode, Recipient},
    ApiError, RequestError,
};

pub mod handlers;
pub mod router;

use scout_core::{
    analysis::CommunityInfo,
    domain::{ChatId, MessageId, MessageRef},
    errors::Error,
    messaging::{
        port::MessagingPort,
        types::{ChatAction, MessagingCapabilities},
    },
    ports::CommunityDirectory,
    Result,
};

const SERVICE: &str = "telegram";

/// Hard limit of the Bot API for a single text message.
const TELEGRAM_MAX_MESSAGE_LEN: usize = 4096;

fn map_err(e: RequestError) -> Error {
    Error::api(SERVICE, e.to_string())
}

fn tg_chat(chat_id: ChatId) -> teloxide::types::ChatId {
    teloxide::types::ChatId(chat_id.0)
}

#[derive(Clone)]
pub struct TelegramMessenger {
    bot: Bot,
}

impl TelegramMessenger {
    pub fn new(bot: Bot) -> Self {
        Self { bot }
    }
}

#[async_trait]
impl MessagingPort for TelegramMessenger {
    fn capabilities(&self) -> MessagingCapabilities {
        MessagingCapabilities {
            supports_edit: true,
            max_message_len: TELEGRAM_MAX_MESSAGE_LEN,
        }
    }

    async fn send_html(&self, chat_id: ChatId, html: &str) -> Result<MessageRef> {
        let msg = self
            .bot
            .send_message(tg_chat(chat_id), html.to_string())
            .parse_mode(ParseMode::Html)
            .disable_web_page_preview(true)
            .await
            .map_err(map_err)?;

        Ok(MessageRef {
            chat_id,
            message_id: MessageId(msg.id.0),
        })
    }

    async fn edit_html(&self, msg: MessageRef, html: &str) -> Result<()> {
        self.bot
            .edit_message_text(
                tg_chat(msg.chat_id),
                teloxide::types::MessageId(msg.message_id.0),
                html.to_string(),
            )
            .parse_mode(ParseMode::Html)
            .disable_web_page_preview(true)
            .await
            .map_err(map_err)?;
        Ok(())
    }

    async fn send_chat_action(&self, chat_id: ChatId, action: ChatAction) -> Result<()> {
        let tg_action = match action {
            ChatAction::Typing => teloxide::types::ChatAction::Typing,
        };
        self.bot
            .send_chat_action(tg_chat(chat_id), tg_action)
            .await
            .map_err(map_err)?;
        Ok(())
    }
}

/// Public chat lookup through the Bot API.
///
/// The Bot API exposes neither message history nor creation date for chats
/// the bot is not a member of; the pinned message (if any) stands in for
/// recent messages.
#[derive(Clone)]
pub struct TelegramCommunityDirectory {
    bot: Bot,
}

impl TelegramCommunityDirectory {
    pub fn new(bot: Bot) -> Self {
        Self { bot }
    }
}

#[async_trait]
impl CommunityDirectory for TelegramCommunityDirectory {
    async fn lookup(&self, handle: &str) -> Result<Option<CommunityInfo>> {
        let username = handle.trim().trim_start_matches('@');
        if username.is_empty() {
            return Ok(None);
        }
        let recipient = Recipient::ChannelUsername(format!("@{username}"));

        let chat = match self.bot.get_chat(recipient.clone()).await {
            Ok(chat) => chat,
            Err(RequestError::Api(ApiError::ChatNotFound)) => return Ok(None),
            Err(e) => return Err(map_err(e)),
        };
        // A user account is not a community.
        if chat.is_private() {
            return Ok(None);
        }

        let member_count = match self.bot.get_chat_member_count(recipient.clone()).await {
            Ok(n) => n,
            Err(e) => {
                tracing::debug!(chat = %username, "member count unavailable: {e}");
                0
            }
        };
        let admin_count = match self.bot.get_chat_administrators(recipient).await {
            Ok(admins) => u32::try_from(admins.len()).unwrap_or(u32::MAX),
            Err(e) => {
                tracing::debug!(chat = %username, "administrators unavailable: {e}");
                0
            }
        };

        Ok(Some(community_from_chat(&chat, username, member_count, admin_count)))
    }
}

pub(crate) fn community_from_chat(
    chat: &Chat,
    fallback_username: &str,
    member_count: u32,
    admin_count: u32,
) -> CommunityInfo {
    let username = chat.username().unwrap_or(fallback_username).to_string();
    let recent_messages = chat
        .pinned_message
        .as_deref()
        .and_then(|m| m.text().or_else(|| m.caption()))
        .map(|t| vec![t.to_string()])
        .unwrap_or_default();

    CommunityInfo {
        title: chat.title().unwrap_or(&username).to_string(),
        username,
        member_count,
        description: chat.description().unwrap_or_default().to_string(),
        recent_messages,
        admin_count,
        creation_date: None,
        invite_link: chat.invite_link().map(str::to_string),
        verified: false,
        restricted: false,
    }
}
