//! The live Telegram session for the lifetime of the process.

use chrono::{DateTime, Utc};

use crate::report::format_duration;

/// Identity reported by Telegram for the bot account.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BotIdentity {
    pub id: u64,
    pub username: String,
}

/// Session keyed by the configured session identifier.
///
/// Created once the bot identity has been verified; [`SessionHandle::close`]
/// is called when polling stops.
#[derive(Clone, Debug)]
pub struct SessionHandle {
    name: String,
    identity: BotIdentity,
    started_at: DateTime<Utc>,
}

impl SessionHandle {
    pub fn open(name: &str, identity: BotIdentity, now: DateTime<Utc>) -> Self {
        tracing::info!(
            session = %name,
            bot = %identity.username,
            bot_id = identity.id,
            "telegram session established"
        );
        Self {
            name: name.to_string(),
            identity,
            started_at: now,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn identity(&self) -> &BotIdentity {
        &self.identity
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    pub fn uptime_secs(&self, now: DateTime<Utc>) -> i64 {
        (now - self.started_at).num_seconds().max(0)
    }

    pub fn close(self, now: DateTime<Utc>) {
        tracing::info!(
            session = %self.name,
            uptime = %format_duration(self.uptime_secs(now)),
            "telegram session closed"
        );
    }
}
