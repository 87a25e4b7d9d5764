//! Attribute line parsing
//!
//! ```text
//! > key=`value`,other=``va`lue``
//! ```
//!
//! A value is fenced by a run of N backticks and ends at the next run of
//! exactly N backticks. A value padded with one space on each side (and not
//! only spaces) loses that padding.

use crate::core::text_utils::strip_code_span_padding;

/// Result of reading one attribute line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttributeLine {
    /// `key=`value`` pairs; `malformed` describes where reading stopped early
    Pairs {
        pairs: Vec<(String, String)>,
        malformed: Option<String>,
    },
    /// A lone key whose value follows on the next lines
    BareKey(String),
}

/// Parse the text of an `ATTRIBUTE` token, including the `>` marker
pub fn parse_attribute_line(line: &str) -> AttributeLine {
    let body = line.trim_start();
    let body = body.strip_prefix('>').unwrap_or(body);
    let body = body.trim_end_matches(['\n', '\r']);

    let trimmed = body.trim();
    if !trimmed.is_empty()
        && !trimmed.contains(['=', '`', ','])
        && !trimmed.contains(char::is_whitespace)
    {
        return AttributeLine::BareKey(trimmed.to_string());
    }

    let mut pairs = Vec::new();
    let mut rest = body;
    loop {
        rest = rest.trim_start_matches(|c: char| c.is_whitespace() || c == ',');
        if rest.is_empty() {
            break;
        }
        match parse_pair(rest) {
            Ok((key, value, remainder)) => {
                pairs.push((key, value));
                rest = remainder;
            }
            Err(message) => {
                return AttributeLine::Pairs {
                    pairs,
                    malformed: Some(message),
                };
            }
        }
    }

    let malformed = pairs
        .is_empty()
        .then(|| "attribute line without pairs".to_string());
    AttributeLine::Pairs { pairs, malformed }
}

fn parse_pair(text: &str) -> Result<(String, String, &str), String> {
    let key_end = text
        .find(|c: char| c == '=' || c.is_whitespace())
        .ok_or_else(|| format!("missing `=` after `{text}`"))?;
    let key = &text[..key_end];
    if key.is_empty() || key.contains(['`', ',']) {
        return Err(format!("invalid attribute key `{key}`"));
    }

    let rest = text[key_end..].trim_start();
    let rest = rest
        .strip_prefix('=')
        .ok_or_else(|| format!("missing `=` after key `{key}`"))?;
    let rest = rest.trim_start();

    let fence = rest.bytes().take_while(|b| *b == b'`').count();
    if fence == 0 {
        return Err(format!("value of `{key}` is not fenced with backticks"));
    }
    let value_start = &rest[fence..];
    let (value, remainder) = match find_fence(value_start, fence) {
        Some(close) => (
            strip_code_span_padding(&value_start[..close]),
            &value_start[close + fence..],
        ),
        // "``" is an empty value, not an open fence of two
        None if fence % 2 == 0 => ("", value_start),
        None => return Err(format!("unterminated value of `{key}`")),
    };
    Ok((key.to_string(), value.to_string(), remainder))
}

/// Offset of the next run of exactly `len` backticks
fn find_fence(text: &str, len: usize) -> Option<usize> {
    let bytes = text.as_bytes();
    let mut index = 0;
    while index < bytes.len() {
        if bytes[index] == b'`' {
            let run = bytes[index..].iter().take_while(|b| **b == b'`').count();
            if run == len {
                return Some(index);
            }
            index += run;
        } else {
            index += 1;
        }
    }
    None
}
