use std::{env, fmt, time::Duration};

use crate::{errors::Error, Result};

pub const TELEGRAM_BOT_TOKEN: &str = "TELEGRAM_BOT_TOKEN";
pub const TELEGRAM_API_ID: &str = "TELEGRAM_API_ID";
pub const TELEGRAM_API_HASH: &str = "TELEGRAM_API_HASH";
pub const OPENAI_API_KEY: &str = "OPENAI_API_KEY";
pub const TWITTER_BEARER_TOKEN: &str = "TWITTER_BEARER_TOKEN";
pub const TELETHON_SESSION: &str = "TELETHON_SESSION";

/// Variables that must be present (and non-blank) for the bot to start.
pub const REQUIRED_VARS: [&str; 6] = [
    TELEGRAM_BOT_TOKEN,
    TELEGRAM_API_ID,
    TELEGRAM_API_HASH,
    OPENAI_API_KEY,
    TWITTER_BEARER_TOKEN,
    TELETHON_SESSION,
];

const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
const DEFAULT_OPENAI_MODEL: &str = "gpt-4o-mini";
const DEFAULT_TWITTER_BASE_URL: &str = "https://api.twitter.com/2";
const DEFAULT_COINGECKO_BASE_URL: &str = "https://api.coingecko.com/api/v3";

/// Process-lifetime credentials bundle.
///
/// Built once by [`Config::load`]; there are no setters, so every read
/// returns the same value for as long as the process runs.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    bot_token: String,
    api_id: i32,
    api_hash: String,
    openai_api_key: String,
    twitter_bearer_token: String,
    session_name: String,
}

impl Credentials {
    pub fn bot_token(&self) -> &str {
        &self.bot_token
    }

    pub fn api_id(&self) -> i32 {
        self.api_id
    }

    pub fn api_hash(&self) -> &str {
        &self.api_hash
    }

    pub fn openai_api_key(&self) -> &str {
        &self.openai_api_key
    }

    pub fn twitter_bearer_token(&self) -> &str {
        &self.twitter_bearer_token
    }

    pub fn session_name(&self) -> &str {
        &self.session_name
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("bot_token", &mask_secret(&self.bot_token))
            .field("api_id", &self.api_id)
            .field("api_hash", &mask_secret(&self.api_hash))
            .field("openai_api_key", &mask_secret(&self.openai_api_key))
            .field("twitter_bearer_token", &mask_secret(&self.twitter_bearer_token))
            .field("session_name", &self.session_name)
            .finish()
    }
}

/// Typed configuration: the credentials bundle plus optional tuning knobs.
#[derive(Clone, Debug)]
pub struct Config {
    credentials: Credentials,

    // Providers
    pub openai_model: String,
    pub openai_base_url: String,
    pub twitter_api_base_url: String,
    pub coingecko_api_base_url: String,
    pub http_timeout: Duration,

    // Behavior
    pub tweet_search_limit: usize,
    pub telegram_safe_limit: usize,
}

impl Config {
    /// Load from the process environment (plus `.env` if present; never overrides real env).
    pub fn load() -> Result<Self> {
        match dotenvy::dotenv() {
            Ok(path) => tracing::debug!(path = %path.display(), "loaded .env"),
            Err(e) if e.not_found() => {}
            Err(e) => tracing::warn!("ignoring unreadable .env: {e}"),
        }
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from an arbitrary key lookup. Blank values count as absent.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let get = |key: &str| lookup(key).and_then(non_empty);

        let missing: Vec<String> = REQUIRED_VARS
            .iter()
            .filter(|k| get(**k).is_none())
            .map(|k| k.to_string())
            .collect();
        if !missing.is_empty() {
            return Err(Error::MissingEnv { keys: missing });
        }

        let required = |key: &str| get(key).unwrap_or_default();

        let api_id = required(TELEGRAM_API_ID)
            .trim()
            .parse::<i32>()
            .ok()
            .filter(|id| *id > 0)
            .ok_or_else(|| Error::InvalidEnv {
                key: TELEGRAM_API_ID.to_string(),
                reason: "expected a positive integer".to_string(),
            })?;

        let api_hash = required(TELEGRAM_API_HASH).trim().to_string();
        if api_hash.len() != 32 || !api_hash.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(Error::InvalidEnv {
                key: TELEGRAM_API_HASH.to_string(),
                reason: "expected 32 hexadecimal characters".to_string(),
            });
        }

        let credentials = Credentials {
            bot_token: required(TELEGRAM_BOT_TOKEN).trim().to_string(),
            api_id,
            api_hash,
            openai_api_key: required(OPENAI_API_KEY).trim().to_string(),
            twitter_bearer_token: required(TWITTER_BEARER_TOKEN).trim().to_string(),
            session_name: required(TELETHON_SESSION).trim().to_string(),
        };

        let openai_model = get("OPENAI_MODEL").unwrap_or_else(|| DEFAULT_OPENAI_MODEL.to_string());
        let openai_base_url = base_url(get("OPENAI_BASE_URL"), DEFAULT_OPENAI_BASE_URL);
        let twitter_api_base_url = base_url(get("TWITTER_API_BASE_URL"), DEFAULT_TWITTER_BASE_URL);
        let coingecko_api_base_url =
            base_url(get("COINGECKO_API_BASE_URL"), DEFAULT_COINGECKO_BASE_URL);

        let http_timeout = Duration::from_secs(parse_num(get("HTTP_TIMEOUT_SECS")).unwrap_or(30));
        let tweet_search_limit = parse_num(get("TWEET_SEARCH_LIMIT")).unwrap_or(10).max(1);
        let telegram_safe_limit = parse_num(get("TELEGRAM_SAFE_LIMIT"))
            .unwrap_or(4000)
            .clamp(200, 4096);

        Ok(Self {
            credentials,
            openai_model,
            openai_base_url,
            twitter_api_base_url,
            coingecko_api_base_url,
            http_timeout,
            tweet_search_limit,
            telegram_safe_limit,
        })
    }

    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }
}

/// Mask a secret for logs: first 4 + `***` + last 4; short values are fully masked.
pub fn mask_secret(s: &str) -> String {
    let chars: Vec<char> = s.chars().collect();
    if chars.len() <= 11 {
        return "***".to_string();
    }
    let head: String = chars[..4].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{head}***{tail}")
}

fn base_url(v: Option<String>, default: &str) -> String {
    v.unwrap_or_else(|| default.to_string())
        .trim()
        .trim_end_matches('/')
        .to_string()
}

fn parse_num<T: std::str::FromStr>(v: Option<String>) -> Option<T> {
    v.and_then(|s| s.trim().parse::<T>().ok())
}

fn non_empty(s: String) -> Option<String> {
    if s.trim().is_empty() {
        None
    } else {
        Some(s)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn full_env() -> HashMap<&'static str, String> {
        HashMap::from([
            (TELEGRAM_BOT_TOKEN, "123456:ABC-DEF1234ghIkl-zyx57W2v1u123ew11".to_string()),
            (TELEGRAM_API_ID, "1234567".to_string()),
            (TELEGRAM_API_HASH, "0123456789abcdef0123456789abcdef".to_string()),
            (OPENAI_API_KEY, "sk-proj-1234567890abcdef".to_string()),
            (TWITTER_BEARER_TOKEN, "AAAAAAAAAAAAAAAAAAAAAbearer".to_string()),
            (TELETHON_SESSION, "scout_session".to_string()),
        ])
    }

    fn load(env: &HashMap<&'static str, String>) -> Result<Config> {
        Config::from_lookup(|k| env.get(k).cloned())
    }

    #[test]
    fn builds_bundle_when_all_required_vars_present() {
        let cfg = load(&full_env()).unwrap();
        let c = cfg.credentials();
        assert_eq!(c.api_id(), 1234567);
        assert_eq!(c.session_name(), "scout_session");
        assert_eq!(c.openai_api_key(), "sk-proj-1234567890abcdef");
        assert_eq!(cfg.openai_base_url, DEFAULT_OPENAI_BASE_URL);
        assert_eq!(cfg.tweet_search_limit, 10);
        assert_eq!(cfg.http_timeout, Duration::from_secs(30));
    }

    #[test]
    fn each_missing_var_is_named() {
        for key in REQUIRED_VARS {
            let mut env = full_env();
            env.remove(key);
            match load(&env) {
                Err(Error::MissingEnv { keys }) => assert_eq!(keys, vec![key.to_string()]),
                other => panic!("expected MissingEnv for {key}, got {other:?}"),
            }
        }
    }

    #[test]
    fn blank_value_counts_as_missing() {
        let mut env = full_env();
        env.insert(OPENAI_API_KEY, "   ".to_string());
        let err = load(&env).unwrap_err();
        assert!(err.to_string().contains(OPENAI_API_KEY));
    }

    #[test]
    fn reports_all_missing_vars_at_once() {
        let err = load(&HashMap::new()).unwrap_err();
        let msg = err.to_string();
        for key in REQUIRED_VARS {
            assert!(msg.contains(key), "{msg} should mention {key}");
        }
    }

    #[test]
    fn rejects_non_numeric_api_id() {
        let mut env = full_env();
        env.insert(TELEGRAM_API_ID, "abc".to_string());
        match load(&env) {
            Err(Error::InvalidEnv { key, .. }) => assert_eq!(key, TELEGRAM_API_ID),
            other => panic!("expected InvalidEnv, got {other:?}"),
        }
    }

    #[test]
    fn rejects_malformed_api_hash() {
        let mut env = full_env();
        env.insert(TELEGRAM_API_HASH, "not-a-hash".to_string());
        assert!(matches!(load(&env), Err(Error::InvalidEnv { .. })));
    }

    #[test]
    fn repeated_reads_are_identical() {
        let cfg = load(&full_env()).unwrap();
        let first = cfg.credentials().clone();
        for _ in 0..3 {
            assert_eq!(cfg.credentials(), &first);
            assert_eq!(cfg.credentials().bot_token(), first.bot_token());
        }
    }

    #[test]
    fn optional_overrides_are_applied() {
        let mut env = full_env();
        env.insert("OPENAI_BASE_URL", "http://localhost:9000/v1/".to_string());
        env.insert("TWEET_SEARCH_LIMIT", "25".to_string());
        env.insert("TELEGRAM_SAFE_LIMIT", "10".to_string());
        env.insert("HTTP_TIMEOUT_SECS", "nope".to_string());
        let cfg = load(&env).unwrap();
        assert_eq!(cfg.openai_base_url, "http://localhost:9000/v1");
        assert_eq!(cfg.tweet_search_limit, 25);
        assert_eq!(cfg.telegram_safe_limit, 200);
        assert_eq!(cfg.http_timeout, Duration::from_secs(30));
    }

    #[test]
    fn debug_output_masks_secrets() {
        let cfg = load(&full_env()).unwrap();
        let dbg = format!("{:?}", cfg.credentials());
        assert!(!dbg.contains("sk-proj-1234567890abcdef"));
        assert!(dbg.contains("sk-p***cdef"));
        assert!(dbg.contains("scout_session"));
    }

    #[test]
    fn mask_secret_short_values() {
        assert_eq!(mask_secret(""), "***");
        assert_eq!(mask_secret("sk-12345"), "***");
        assert_eq!(mask_secret("abcdefghijkl"), "abcd***ijkl");
    }
}
