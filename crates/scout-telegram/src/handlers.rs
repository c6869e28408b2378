//! Telegram update handlers.
//!
//! Updates are mapped into a [`CommandRequest`] and handed to the
//! [`ScoutService`](scout_core::service::ScoutService); everything else is ignored.

use std::sync::Arc;

use teloxide::{prelude::*, types::Message};

use scout_core::{
    domain::{ChatId, UserId},
    service::CommandRequest,
};

use crate::router::AppState;

/// Text or caption of a message, whichever is present.
fn body(msg: &Message) -> Option<&str> {
    msg.text().or_else(|| msg.caption())
}

pub fn command_request(msg: &Message) -> Option<CommandRequest> {
    let text = msg.text()?;
    if !text.starts_with('/') {
        return None;
    }
    Some(CommandRequest {
        chat_id: ChatId(msg.chat.id.0),
        from: msg.from().map(|u| UserId(u.id.0 as i64)),
        text: text.to_string(),
        reply_text: msg.reply_to_message().and_then(body).map(str::to_string),
    })
}

pub async fn handle_message(msg: Message, state: Arc<AppState>) -> ResponseResult<()> {
    let Some(req) = command_request(&msg) else {
        return Ok(());
    };

    if let Err(e) = state.service.handle(req, &state.shutdown).await {
        tracing::error!(chat_id = msg.chat.id.0, "fatal error, shutting down: {e}");
        state.record_fatal(e);
        state.shutdown.cancel();
    }
    Ok(())
}
