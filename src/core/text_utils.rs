//! Text manipulation utilities shared by the MMD parser and serializer.

use std::borrow::Cow;

/// Characters escaped with a backslash inside topic titles.
pub const MD_ESCAPED_CHARS: &str = "\\`*_{}[]()#<>+-.!";

/// Count how many times `chr` repeats at the start of `text`.
///
/// # Example
/// ```
/// use mmd::core::text_utils::count_prefix_chars;
///
/// assert_eq!(count_prefix_chars('#', "### Title"), 3);
/// assert_eq!(count_prefix_chars('#', "Title"), 0);
/// ```
pub fn count_prefix_chars(chr: char, text: &str) -> usize {
    text.chars().take_while(|c| *c == chr).count()
}

/// Length of the longest run of backticks in `text`.
pub fn max_backtick_run(text: &str) -> usize {
    let mut best = 0;
    let mut current = 0;
    for c in text.chars() {
        if c == '`' {
            current += 1;
            best = best.max(current);
        } else {
            current = 0;
        }
    }
    best
}

/// Check that a line consists only of `chr`, ignoring `\r` and a final `\n`.
///
/// An empty line never matches.
pub fn is_line_of(chr: char, line: &str) -> bool {
    let body = line.strip_suffix('\n').unwrap_or(line);
    let mut detected = false;
    for c in body.chars() {
        match c {
            '\r' => continue,
            c if c == chr => detected = true,
            _ => return false,
        }
    }
    detected
}

/// Replace line breaks (`\r\n`, `\n`, `\r`) with single spaces.
pub fn normalize_line_breaks(text: &str) -> Cow<'_, str> {
    if !text.contains(['\n', '\r']) {
        return Cow::Borrowed(text);
    }
    let mut result = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '\r' => {
                if chars.peek() == Some(&'\n') {
                    chars.next();
                }
                result.push(' ');
            }
            '\n' => result.push(' '),
            c => result.push(c),
        }
    }
    Cow::Owned(result)
}

/// Flatten text to what a `#` topic line reads back unchanged.
///
/// Line breaks and other control characters become spaces, then leading
/// whitespace is removed.
pub fn normalize_title(text: &str) -> String {
    let flat: String = normalize_line_breaks(text)
        .chars()
        .map(|c| if c.is_control() { ' ' } else { c })
        .collect();
    flat.trim_start().to_string()
}

/// Escape a topic title for a `#` line.
///
/// Markdown-sensitive characters get a backslash, line breaks become
/// `<br/>` and other control characters are dropped.
pub fn escape_markdown(text: &str) -> String {
    let mut result = String::with_capacity(text.len() * 2);
    for c in text.chars() {
        if c == '\n' {
            result.push_str("<br/>");
            continue;
        }
        if c.is_control() {
            continue;
        }
        if MD_ESCAPED_CHARS.contains(c) {
            result.push('\\');
        }
        result.push(c);
    }
    result
}

/// Reverse [`escape_markdown`]: `<br>` tags become `\n`, backslash escapes
/// of Markdown-sensitive characters are removed.
pub fn unescape_markdown(text: &str) -> String {
    let with_breaks = replace_br_tags(text);
    let mut result = String::with_capacity(with_breaks.len());
    let mut chars = with_breaks.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '\\' {
            if let Some(&next) = chars.peek() {
                if MD_ESCAPED_CHARS.contains(next) {
                    result.push(next);
                    chars.next();
                    continue;
                }
            }
        }
        result.push(c);
    }
    result
}

/// Replace `<br>`, `<br/>`, `< BR />`... with `\n`.
fn replace_br_tags(text: &str) -> Cow<'_, str> {
    if !text.contains('<') {
        return Cow::Borrowed(text);
    }
    let mut result = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(start) = rest.find('<') {
        result.push_str(&rest[..start]);
        let candidate = &rest[start..];
        match match_br_tag(candidate) {
            Some(len) => {
                result.push('\n');
                rest = &candidate[len..];
            }
            None => {
                result.push('<');
                rest = &candidate[1..];
            }
        }
    }
    result.push_str(rest);
    Cow::Owned(result)
}

/// Length of a `<br>` tag at the start of `text`, if there is one.
fn match_br_tag(text: &str) -> Option<usize> {
    let bytes = text.as_bytes();
    let mut pos = 1;
    let skip_spaces = |mut pos: usize| {
        while pos < bytes.len() && bytes[pos].is_ascii_whitespace() {
            pos += 1;
        }
        pos
    };
    pos = skip_spaces(pos);
    if bytes.len() < pos + 2 || !bytes[pos..pos + 2].eq_ignore_ascii_case(b"br") {
        return None;
    }
    pos = skip_spaces(pos + 2);
    if bytes.get(pos) == Some(&b'/') {
        pos += 1;
    }
    (bytes.get(pos) == Some(&b'>')).then_some(pos + 1)
}

/// Escape text for the inside of a `<pre>` block.
pub fn escape_pre_text(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '"' => result.push_str("&quot;"),
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            c => result.push(c),
        }
    }
    result
}

/// Wrap text into an escaped `<pre>` block.
pub fn make_pre_block(text: &str) -> String {
    format!("<pre>{}</pre>", escape_pre_text(text))
}

/// Extract and unescape the body of a `<pre>...</pre>` token.
///
/// Returns `None` if the token is not wrapped in `<pre>` markers.
pub fn unwrap_pre_block(token: &str) -> Option<String> {
    let body = token.strip_prefix("<pre>")?.strip_suffix("</pre>")?;
    Some(htmlize::unescape(body).into_owned())
}

/// Fence an attribute value with backticks.
///
/// The fence is one backtick longer than the longest run inside the value.
/// Values starting or ending with a backtick, or padded with spaces on both
/// sides, get one extra space on each side so that [`strip_code_span_padding`]
/// restores them exactly.
pub fn make_code_span(value: &str) -> String {
    let fence = "`".repeat(max_backtick_run(value) + 1);
    let pad = value.starts_with('`') || value.ends_with('`') || needs_padding_strip(value);
    if pad {
        format!("{fence} {value} {fence}")
    } else {
        format!("{fence}{value}{fence}")
    }
}

/// Remove the single space padding added by [`make_code_span`].
pub fn strip_code_span_padding(value: &str) -> &str {
    if needs_padding_strip(value) {
        &value[1..value.len() - 1]
    } else {
        value
    }
}

fn needs_padding_strip(value: &str) -> bool {
    value.len() >= 2
        && value.starts_with(' ')
        && value.ends_with(' ')
        && value.bytes().any(|b| b != b' ')
}
