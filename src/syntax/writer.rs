//! MMD text writer
//!
//! Topics are written in pre-order. Each topic line is followed by its
//! attribute lines, its extras in [`ExtraType`](crate::model::ExtraType)
//! order and its code snippets, then by its children.

use std::fmt::Write as _;

use super::options::SerializeOptions;
use crate::core::text_utils::{
    escape_markdown, make_code_span, make_pre_block, normalize_line_breaks,
};
use crate::model::{Extra, MindMap, TopicId};

/// Write a map with the default options
pub fn serialize(map: &MindMap) -> String {
    serialize_with(map, &SerializeOptions::default())
}

/// Write a map as MMD text
pub fn serialize_with(map: &MindMap, options: &SerializeOptions) -> String {
    let mut writer = Writer {
        output: String::new(),
        eol: options.line_ending.as_str(),
    };
    writer.write_header(map, options);
    writer.write_topic(map, map.root(), 1);
    tracing::debug!(topics = map.topic_count(), bytes = writer.output.len(), "serialized mind map");
    writer.output
}

/// Whether a single-line extra body can be written without `<pre>`
///
/// The line must not be read back as any other token.
fn is_bare_body(body: &str) -> bool {
    let Some(first) = body.chars().next() else {
        return false;
    };
    !body.contains(['\n', '\r'])
        && !first.is_whitespace()
        && !first.is_control()
        && !body.starts_with(['#', '<'])
        && !body.starts_with("- ")
        && !body.starts_with("> ")
        && !body.starts_with("```")
}

struct Writer {
    output: String,
    eol: &'static str,
}

impl Writer {
    fn line(&mut self, text: &str) {
        self.output.push_str(text);
        self.output.push_str(self.eol);
    }

    fn write_header(&mut self, map: &MindMap, options: &SerializeOptions) {
        if let Some(header) = &options.header {
            let header = normalize_line_breaks(header);
            self.line(&header);
        }
        for (key, value) in map.document_attributes() {
            self.write_attribute(key, value);
        }
        let delimiter = options.delimiter();
        self.line(&delimiter);
    }

    fn write_attribute(&mut self, key: &str, value: &str) {
        let value = normalize_line_breaks(value);
        let line = format!("> {key}={}", make_code_span(&value));
        self.line(&line);
    }

    fn write_topic(&mut self, map: &MindMap, id: TopicId, level: usize) {
        let Ok(topic) = map.topic(id) else {
            tracing::warn!(topic = %id, "skipping unknown topic while serializing");
            return;
        };

        let title = escape_markdown(&normalize_line_breaks(topic.text()));
        let line = format!("{} {title}", "#".repeat(level));
        self.line(&line);

        for (key, value) in topic.attributes() {
            self.write_attribute(key, value);
        }
        for extra in topic.extras() {
            self.write_extra(extra);
        }
        for (language, body) in topic.code_snippets() {
            let _ = write!(self.output, "```{language}{}", self.eol);
            if !body.is_empty() {
                self.line(body);
            }
            self.line("```");
        }

        for child in topic.children() {
            self.write_topic(map, *child, level + 1);
        }
    }

    fn write_extra(&mut self, extra: &Extra) {
        let header = format!("- {}", extra.extra_type());
        self.line(&header);
        let body = extra.to_body();
        match extra {
            Extra::Note(_) => self.line(&make_pre_block(&body)),
            _ if is_bare_body(&body) => self.line(&body),
            _ => self.line(&make_pre_block(&body)),
        }
    }
}
