/// Core error type for the scout bot.
///
/// Adapter crates map their specific errors into this type so the command
/// service can decide what is fatal (config, session) and what is reported
/// back to the chat (everything else).
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("config error: {0}")]
    Config(String),

    #[error("missing required environment variable(s): {}", .keys.join(", "))]
    MissingEnv { keys: Vec<String> },

    #[error("invalid environment variable {key}: {reason}")]
    InvalidEnv { key: String, reason: String },

    #[error("telegram session error: {0}")]
    Session(String),

    #[error("{service} error: {message}")]
    Api {
        service: &'static str,
        message: String,
    },

    #[error("external error: {0}")]
    External(String),

    #[error("cancelled")]
    Cancelled,
}

impl Error {
    pub fn api(service: &'static str, message: impl Into<String>) -> Self {
        Self::Api {
            service,
            message: message.into(),
        }
    }

    /// Errors that must stop the process instead of being reported to a chat.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::Config(_) | Self::MissingEnv { .. } | Self::InvalidEnv { .. } | Self::Session(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_env_lists_every_key() {
        let e = Error::MissingEnv {
            keys: vec!["OPENAI_API_KEY".into(), "TELETHON_SESSION".into()],
        };
        assert_eq!(
            e.to_string(),
            "missing required environment variable(s): OPENAI_API_KEY, TELETHON_SESSION"
        );
        assert!(e.is_fatal());
    }

    #[test]
    fn only_startup_and_session_errors_are_fatal() {
        let fatal = [
            Error::Config("bad".into()),
            Error::InvalidEnv {
                key: "TELEGRAM_API_ID".into(),
                reason: "not a number".into(),
            },
            Error::Session("getMe failed".into()),
        ];
        assert!(fatal.iter().all(Error::is_fatal));

        let reported = [
            Error::api("coingecko", "429"),
            Error::External("edit not supported".into()),
            Error::Cancelled,
        ];
        assert!(!reported.iter().any(Error::is_fatal));
    }

    #[test]
    fn api_errors_are_not_fatal() {
        let e = Error::api("twitter", "401 Unauthorized");
        assert_eq!(e.to_string(), "twitter error: 401 Unauthorized");
        assert!(!e.is_fatal());
    }
}
