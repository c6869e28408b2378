//! Formatting utilities: Markdown → Telegram HTML, chunking, small text helpers.

use regex::Regex;

/// Escape HTML special characters for Telegram HTML parse mode.
pub fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// Convert a minimal markdown subset to Telegram-compatible HTML.
///
/// Telegram HTML supports only a small subset: `<b>`, `<i>`, `<code>`, `<pre>`, `<a href="...">`.
pub fn convert_markdown_to_html(input: &str) -> String {
    let (text, code_blocks) = extract_code_blocks(input);
    let (mut text, inline_codes) = extract_inline_codes(&text);

    // Escape the remaining text first.
    text = escape_html(&text);

    // Line-oriented transforms (avoid cross-line emphasis bugs).
    let mut lines = Vec::new();
    for line in text.split('\n') {
        let mut l = convert_header_line(line);
        l = replace_delimited(&l, "**", "<b>", "</b>");
        l = replace_delimited(&l, "__", "<b>", "</b>");
        l = replace_single_delim(&l, '_', "<i>", "</i>");
        l = replace_single_delim(&l, '*', "<b>", "</b>");
        lines.push(l);
    }
    text = lines.join("\n");

    // Blockquotes (after escaping, `>` becomes `&gt;`).
    text = convert_blockquotes(&text);

    // Bullet lists
    text = text
        .lines()
        .map(|line| {
            if let Some(rest) = line.strip_prefix("- ") {
                return format!("• {rest}");
            }
            if let Some(rest) = line.strip_prefix("* ") {
                return format!("• {rest}");
            }
            line.to_string()
        })
        .collect::<Vec<_>>()
        .join("\n");

    // Horizontal rules
    text = text
        .lines()
        .filter(|line| {
            let t = line.trim();
            !(t.len() >= 3 && t.chars().all(|c| c == '-' || c == '*'))
        })
        .collect::<Vec<_>>()
        .join("\n");

    // Links: [text](url) -> <a href="url">text</a>
    // No nested brackets.
    let link_re = Regex::new(r"\[([^\]]+)\]\(([^)]+)\)").expect("valid regex");
    text = link_re
        .replace_all(&text, r#"<a href="$2">$1</a>"#)
        .to_string();

    // Restore code blocks
    for (i, code) in code_blocks.iter().enumerate() {
        let escaped = escape_html(code);
        text = text.replace(
            &format!("\0CODEBLOCK{i}\0"),
            &format!("<pre>{escaped}</pre>"),
        );
    }

    // Restore inline code
    for (i, code) in inline_codes.iter().enumerate() {
        let escaped = escape_html(code);
        text = text.replace(
            &format!("\0INLINECODE{i}\0"),
            &format!("<code>{escaped}</code>"),
        );
    }

    // Collapse multiple newlines
    while text.contains("\n\n\n") {
        text = text.replace("\n\n\n", "\n\n");
    }

    text
}

fn extract_code_blocks(input: &str) -> (String, Vec<String>) {
    let mut blocks = Vec::new();
    let mut out = String::new();

    let mut i = 0usize;
    while let Some(rel) = input[i..].find("```") {
        let start = i + rel;
        out.push_str(&input[i..start]);

        let mut p = start + 3;
        // Optional language identifier: [A-Za-z0-9_]+
        while p < input.len() {
            let b = input.as_bytes()[p];
            if b.is_ascii_alphanumeric() || b == b'_' {
                p += 1;
            } else {
                break;
            }
        }
        // Optional single newline
        if p < input.len() && input.as_bytes()[p] == b'\n' {
            p += 1;
        }

        // Find closing fence
        if let Some(end_rel) = input[p..].find("```") {
            let end = p + end_rel;
            let code = input[p..end].to_string();
            let idx = blocks.len();
            blocks.push(code);
            out.push_str(&format!("\0CODEBLOCK{idx}\0"));
            i = end + 3;
            continue;
        }

        // Unclosed fence: append the rest and stop.
        out.push_str(&input[start..]);
        return (out, blocks);
    }

    out.push_str(&input[i..]);
    (out, blocks)
}

fn extract_inline_codes(input: &str) -> (String, Vec<String>) {
    let mut codes = Vec::new();
    let mut out = String::new();

    let mut i = 0usize;
    while let Some(rel) = input[i..].find('`') {
        let start = i + rel;
        out.push_str(&input[i..start]);

        let content_start = start + 1;
        if let Some(end_rel) = input[content_start..].find('`') {
            let end = content_start + end_rel;
            let code = input[content_start..end].to_string();
            let idx = codes.len();
            codes.push(code);
            out.push_str(&format!("\0INLINECODE{idx}\0"));
            i = end + 1;
            continue;
        }

        // Unclosed: append the rest and stop.
        out.push_str(&input[start..]);
        return (out, codes);
    }

    out.push_str(&input[i..]);
    (out, codes)
}

fn convert_header_line(line: &str) -> String {
    let bytes = line.as_bytes();
    let mut i = 0usize;
    while i < bytes.len() && bytes[i] == b'#' && i < 6 {
        i += 1;
    }
    if i == 0 {
        return line.to_string();
    }
    if i < bytes.len() && bytes[i] == b' ' {
        return format!("<b>{}</b>", &line[i + 1..]);
    }
    line.to_string()
}

fn replace_delimited(text: &str, delim: &str, open: &str, close: &str) -> String {
    let mut out = String::new();
    let mut i = 0usize;
    while let Some(rel) = text[i..].find(delim) {
        let start = i + rel;
        out.push_str(&text[i..start]);
        let content_start = start + delim.len();
        if let Some(end_rel) = text[content_start..].find(delim) {
            let end = content_start + end_rel;
            out.push_str(open);
            out.push_str(&text[content_start..end]);
            out.push_str(close);
            i = end + delim.len();
            continue;
        }
        out.push_str(&text[start..]);
        return out;
    }
    out.push_str(&text[i..]);
    out
}

fn replace_single_delim(text: &str, delim: char, open: &str, close: &str) -> String {
    let mut out = String::new();
    let chars: Vec<char> = text.chars().collect();
    let mut i = 0usize;

    while i < chars.len() {
        if chars[i] == delim {
            // Do not treat doubled delimiters as single.
            if (i > 0 && chars[i - 1] == delim) || (i + 1 < chars.len() && chars[i + 1] == delim) {
                out.push(delim);
                i += 1;
                continue;
            }

            // Find matching closing delimiter on the same line (no newlines here).
            let mut j = i + 1;
            while j < chars.len() {
                if chars[j] == '\n' {
                    break;
                }
                if chars[j] == delim
                    && !(j > 0 && chars[j - 1] == delim)
                    && !(j + 1 < chars.len() && chars[j + 1] == delim)
                {
                    out.push_str(open);
                    for c in &chars[i + 1..j] {
                        out.push(*c);
                    }
                    out.push_str(close);
                    i = j + 1;
                    break;
                }
                j += 1;
            }

            if j >= chars.len() || chars.get(j) != Some(&delim) {
                // No closing delimiter found.
                out.push(delim);
                i += 1;
            }
            continue;
        }

        out.push(chars[i]);
        i += 1;
    }

    out
}

fn convert_blockquotes(text: &str) -> String {
    let mut result: Vec<String> = Vec::new();
    let mut in_block = false;
    let mut block_lines: Vec<String> = Vec::new();

    for line in text.split('\n') {
        if line.starts_with("&gt; ") || line == "&gt;" {
            in_block = true;
            if line == "&gt;" {
                block_lines.push(String::new());
            } else {
                // Strip "&gt; "; "#" inside quotes renders badly on mobile clients.
                let content = line[5..].replace('#', "");
                block_lines.push(content);
            }
            continue;
        }

        if in_block {
            result.push(format!(
                "<blockquote>{}</blockquote>",
                block_lines.join("\n")
            ));
            block_lines.clear();
            in_block = false;
        }
        result.push(line.to_string());
    }

    if in_block {
        result.push(format!(
            "<blockquote>{}</blockquote>",
            block_lines.join("\n")
        ));
    }

    result.join("\n")
}

// ============== Text Helpers ==============

/// Truncate to `max` characters, appending `...` when something was cut.
pub fn truncate_chars(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    format!("{}...", text.chars().take(max).collect::<String>())
}

/// Collapse whitespace/newlines into single spaces.
pub fn one_line(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// `strong_social_media_presence` → `Strong Social Media Presence`.
pub fn humanize_label(label: &str) -> String {
    label
        .split(['_', ' '])
        .filter(|w| !w.is_empty())
        .map(|w| {
            let mut cs = w.chars();
            match cs.next() {
                Some(first) => first.to_uppercase().chain(cs).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// `1234567` → `1,234,567`.
pub fn format_thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

// ============== HTML Chunking ==============

#[derive(Clone, Debug)]
struct HtmlTag {
    name: String,
    open: String,
    close: String,
}

#[derive(Clone, Debug)]
enum HtmlToken<'a> {
    Tag(&'a str),
    Text(&'a str),
}

/// Split Telegram HTML into chunks of at most `limit` bytes.
///
/// Tags left open at a chunk boundary are closed at the end of that chunk and
/// reopened at the start of the next, so every chunk parses on its own.
pub fn split_html_chunks(html: &str, limit: usize) -> Vec<String> {
    if html.len() <= limit {
        return vec![html.to_string()];
    }

    let mut out: Vec<String> = Vec::new();
    let mut stack: Vec<HtmlTag> = Vec::new();
    let mut chunk = String::new();

    for token in tokenize_html(html) {
        match token {
            HtmlToken::Tag(t) => push_tag_token(&mut out, &mut chunk, &mut stack, t, limit),
            HtmlToken::Text(t) => push_text_token(&mut out, &mut chunk, &stack, t, limit),
        }
    }

    flush_chunk(&mut out, &mut chunk, &stack, limit);
    out
}

fn tokenize_html(mut s: &str) -> Vec<HtmlToken<'_>> {
    let mut out: Vec<HtmlToken<'_>> = Vec::new();
    while !s.is_empty() {
        let Some(start) = s.find('<') else {
            out.push(HtmlToken::Text(s));
            break;
        };
        if start > 0 {
            out.push(HtmlToken::Text(&s[..start]));
            s = &s[start..];
        }

        let Some(end) = s.find('>') else {
            out.push(HtmlToken::Text(s));
            break;
        };
        out.push(HtmlToken::Tag(&s[..=end]));
        s = &s[end + 1..];
    }
    out
}

fn push_tag_token(
    out: &mut Vec<String>,
    chunk: &mut String,
    stack: &mut Vec<HtmlTag>,
    tag: &str,
    limit: usize,
) {
    let action = parse_tag_action(tag);
    let mut after = stack.clone();
    apply_tag_action(&mut after, action.clone());
    let close_after = close_len(&after);

    if chunk.len() + tag.len() + close_after > limit && chunk.len() > open_len(stack) {
        flush_chunk(out, chunk, stack, limit);
        reopen_tags(chunk, stack);
    }
    if chunk.len() + tag.len() + close_after > limit {
        // Even an otherwise empty chunk cannot hold this tag; drop it.
        return;
    }

    chunk.push_str(tag);
    apply_tag_action(stack, action);
}

fn push_text_token(
    out: &mut Vec<String>,
    chunk: &mut String,
    stack: &[HtmlTag],
    mut text: &str,
    limit: usize,
) {
    while !text.is_empty() {
        let Some(available) = limit.checked_sub(close_len(stack)) else {
            return;
        };

        if chunk.len() >= available {
            flush_chunk(out, chunk, stack, limit);
            reopen_tags(chunk, stack);
            if chunk.len() >= available {
                return;
            }
            continue;
        }

        let room = available - chunk.len();
        let (mut head, mut tail) = split_text_prefix(text, room);
        if head.is_empty() {
            if chunk.len() > open_len(stack) {
                flush_chunk(out, chunk, stack, limit);
                reopen_tags(chunk, stack);
                continue;
            }
            // Not even one char (or entity) fits next to the reopened tags; emit it anyway.
            let next = entity_len(text)
                .or_else(|| text.char_indices().nth(1).map(|(i, _)| i))
                .unwrap_or(text.len());
            (head, tail) = text.split_at(next);
        }
        chunk.push_str(head);
        text = tail;

        if !text.is_empty() {
            flush_chunk(out, chunk, stack, limit);
            reopen_tags(chunk, stack);
        }
    }
}

fn flush_chunk(out: &mut Vec<String>, chunk: &mut String, stack: &[HtmlTag], limit: usize) {
    if chunk.len() <= open_len(stack) {
        // Only reopened tags, no content.
        chunk.clear();
        return;
    }

    let mut msg = String::with_capacity(chunk.len() + close_len(stack));
    msg.push_str(chunk);
    for t in stack.iter().rev() {
        msg.push_str(&t.close);
    }
    if msg.len() > limit {
        let (head, _) = split_utf8_prefix(&msg, limit);
        msg = head.to_string();
    }

    out.push(msg);
    chunk.clear();
}

fn reopen_tags(chunk: &mut String, stack: &[HtmlTag]) {
    for t in stack {
        chunk.push_str(&t.open);
    }
}

fn open_len(stack: &[HtmlTag]) -> usize {
    stack.iter().map(|t| t.open.len()).sum()
}

fn close_len(stack: &[HtmlTag]) -> usize {
    stack.iter().map(|t| t.close.len()).sum()
}

#[derive(Clone, Debug)]
enum TagAction {
    Open(HtmlTag),
    Close(String),
    Noop,
}

fn parse_tag_action(tag: &str) -> TagAction {
    let t = tag.trim();
    if let Some(rest) = t.strip_prefix("</") {
        let name = parse_tag_name(rest);
        return if name.is_empty() {
            TagAction::Noop
        } else {
            TagAction::Close(name)
        };
    }
    if t.ends_with("/>") {
        return TagAction::Noop;
    }

    let name = parse_tag_name(&t[1..]);
    if name.is_empty() {
        return TagAction::Noop;
    }
    let close = format!("</{name}>");
    TagAction::Open(HtmlTag {
        name,
        open: t.to_string(),
        close,
    })
}

fn parse_tag_name(after_lt: &str) -> String {
    after_lt
        .chars()
        .take_while(|c| c.is_ascii_alphanumeric() || *c == '-')
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

fn apply_tag_action(stack: &mut Vec<HtmlTag>, action: TagAction) {
    match action {
        TagAction::Open(t) => stack.push(t),
        TagAction::Close(name) => {
            while let Some(last) = stack.pop() {
                if last.name == name {
                    break;
                }
            }
        }
        TagAction::Noop => {}
    }
}

/// Split text at most `max_bytes` in, preferring the last newline, and never
/// inside a char or an HTML entity.
fn split_text_prefix(s: &str, max_bytes: usize) -> (&str, &str) {
    let (head, _) = split_utf8_prefix(s, max_bytes);
    if head.len() == s.len() {
        return (s, "");
    }
    let mut cut = head.len();
    if let Some(nl) = head.rfind('\n') {
        if nl > 0 {
            cut = nl + 1;
        }
    }
    if let Some(amp) = s[..cut].rfind('&') {
        if !s[amp..cut].contains(';') {
            cut = amp;
        }
    }
    s.split_at(cut)
}

/// Byte length of the entity `text` starts with, if any.
fn entity_len(text: &str) -> Option<usize> {
    if !text.starts_with('&') {
        return None;
    }
    text.char_indices()
        .take(12)
        .find(|(_, c)| *c == ';')
        .map(|(i, _)| i + 1)
}

fn split_utf8_prefix(s: &str, max_bytes: usize) -> (&str, &str) {
    if s.len() <= max_bytes {
        return (s, "");
    }
    let mut idx = max_bytes;
    while idx > 0 && !s.is_char_boundary(idx) {
        idx -= 1;
    }
    (&s[..idx], &s[idx..])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escapes_html() {
        let s = r#"<a href="x&y">"#;
        assert_eq!(escape_html(s), "&lt;a href=&quot;x&amp;y&quot;&gt;");
    }

    #[test]
    fn converts_code_blocks_without_touching_contents() {
        let md = "hi\n```js\nconst x = '<b>';\n```\nbye";
        let html = convert_markdown_to_html(md);
        assert!(html.contains("<pre>"));
        assert!(html.contains("const x = '&lt;b&gt;';"));
        assert!(!html.contains("<b>"));
    }

    #[test]
    fn converts_summary_style_markdown() {
        let md = "## Key points\n- **Staking** launched\n- see [site](https://example.com)";
        let html = convert_markdown_to_html(md);
        assert!(html.contains("<b>Key points</b>"));
        assert!(html.contains("• <b>Staking</b> launched"));
        assert!(html.contains(r#"<a href="https://example.com">site</a>"#));
    }

    #[test]
    fn splits_long_single_line_under_limit() {
        let limit = 50usize;
        let long = "x".repeat(200);
        let html = format!("Sources: <code>{long}</code>");

        let chunks = split_html_chunks(&html, limit);
        assert!(chunks.len() > 1);
        assert!(chunks.iter().all(|c| c.len() <= limit));
        for c in &chunks {
            assert_eq!(c.matches("<code>").count(), c.matches("</code>").count());
        }
    }

    #[test]
    fn prefers_newline_boundaries() {
        let html = format!("{}\n{}", "a".repeat(30), "b".repeat(30));
        let chunks = split_html_chunks(&html, 40);
        assert_eq!(chunks[0], format!("{}\n", "a".repeat(30)));
        assert_eq!(chunks[1], "b".repeat(30));
    }

    #[test]
    fn keeps_short_html_intact() {
        let html = "📊 <b>Hi</b>\n<code>x</code>";
        assert_eq!(split_html_chunks(html, 4000), vec![html.to_string()]);
    }

    #[test]
    fn never_splits_entities() {
        let html = format!("{}&amp;rest", "a".repeat(18));
        let chunks = split_html_chunks(&html, 20);
        assert!(chunks.iter().all(|c| !c.ends_with('&') && !c.ends_with("&am")));
        assert_eq!(chunks.concat(), html);
    }

    #[test]
    fn entity_at_token_start_moves_to_next_chunk() {
        let html = "<b>xxxxxxxxxx</b>&amp;yyyy";
        let chunks = split_html_chunks(html, 20);
        assert_eq!(chunks, vec!["<b>xxxxxxxxxx</b>", "&amp;yyyy"]);
        for c in &chunks {
            let tail = c.rsplit('&').next().unwrap_or("");
            assert!(!c.contains('&') || tail.contains(';'), "{c} ends inside an entity");
        }
    }

    #[test]
    fn text_helpers() {
        assert_eq!(truncate_chars("héllo world", 5), "héllo...");
        assert_eq!(truncate_chars("short", 10), "short");
        assert_eq!(one_line(" a\n b\t c "), "a b c");
        assert_eq!(
            humanize_label("strong_social_media_presence"),
            "Strong Social Media Presence"
        );
        assert_eq!(format_thousands(0), "0");
        assert_eq!(format_thousands(999), "999");
        assert_eq!(format_thousands(1_234_567), "1,234,567");
    }
}
