//! Chat command parsing.

/// A recognized bot command. Arguments are trimmed; empty means "missing".
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    Start,
    Help,
    Tweets(String),
    Digest(String),
    Summarize(String),
    Analyze(String),
    Community(String),
    Research(String),
    Status,
    Unknown(String),
}

impl Command {
    pub fn name(&self) -> &str {
        match self {
            Self::Start => "start",
            Self::Help => "help",
            Self::Tweets(_) => "tweets",
            Self::Digest(_) => "digest",
            Self::Summarize(_) => "summarize",
            Self::Analyze(_) => "analyze",
            Self::Community(_) => "community",
            Self::Research(_) => "research",
            Self::Status => "status",
            Self::Unknown(name) => name,
        }
    }
}

/// A `/cmd@botname args` line, split into its parts.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CommandLine {
    /// Lowercase command name without the leading `/`.
    pub name: String,
    /// Bot the command is addressed to (`@botname` suffix), if any.
    pub target: Option<String>,
    /// Trimmed arguments.
    pub args: String,
}

impl CommandLine {
    /// Commands without a suffix are for every bot in the chat.
    pub fn is_for(&self, bot_username: &str) -> bool {
        self.target.as_deref().map_or(true, |t| {
            t.eq_ignore_ascii_case(bot_username.trim_start_matches('@'))
        })
    }
}

pub fn split_command(text: &str) -> Option<CommandLine> {
    let text = text.trim();
    if !text.starts_with('/') {
        return None;
    }

    let mut parts = text.splitn(2, char::is_whitespace);
    let first = parts.next().unwrap_or("").trim();
    let args = parts.next().unwrap_or("").trim().to_string();

    let (name, target) = match first.trim_start_matches('/').split_once('@') {
        Some((name, target)) => (name, Some(target.to_string())),
        None => (first.trim_start_matches('/'), None),
    };

    Some(CommandLine {
        name: name.to_lowercase(),
        target,
        args,
    })
}

/// Parse an incoming message for the bot named `bot_username`.
///
/// Commands addressed to another bot (`/help@other_bot`) yield `None`.
/// `reply_text` is the text of the message being replied to, used by
/// `/summarize` and `/analyze` when they have no argument.
pub fn parse_command(
    text: &str,
    reply_text: Option<&str>,
    bot_username: &str,
) -> Option<Command> {
    let line = split_command(text)?;
    if !line.is_for(bot_username) {
        return None;
    }
    let CommandLine { name: cmd, args, .. } = line;

    let or_reply = |args: String| {
        if args.is_empty() {
            reply_text.map(|r| r.trim().to_string()).unwrap_or_default()
        } else {
            args
        }
    };

    let parsed = match cmd.as_str() {
        "start" => Command::Start,
        "help" => Command::Help,
        "tweets" => Command::Tweets(args),
        "digest" => Command::Digest(args),
        "summarize" => Command::Summarize(or_reply(args)),
        "analyze" => Command::Analyze(or_reply(args)),
        "community" => Command::Community(args),
        "research" => Command::Research(args),
        "status" => Command::Status,
        _ => Command::Unknown(cmd),
    };
    Some(parsed)
}

/// `@name`, `name` or `https://t.me/name` → `name`.
pub fn normalize_chat_handle(raw: &str) -> String {
    let s = raw.trim();
    let s = s
        .strip_prefix("https://")
        .or_else(|| s.strip_prefix("http://"))
        .unwrap_or(s);
    let s = s
        .strip_prefix("t.me/")
        .or_else(|| s.strip_prefix("telegram.me/"))
        .unwrap_or(s);
    s.trim_start_matches('@')
        .split(['/', '?', ' '])
        .next()
        .unwrap_or("")
        .to_string()
}
