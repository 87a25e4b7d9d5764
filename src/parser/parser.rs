//! Recursive descent parser for MMD documents
//!
//! Rebuilds the topic tree from the `#` depth markers. Recoverable problems
//! become [`Diagnostic`]s; tokens cut off by the end of the input fail the
//! whole parse with a [`FormatError`].

use super::attributes::{AttributeLine, parse_attribute_line};
use super::cursor::TokenCursor;
use super::errors::{Diagnostic, DiagnosticCode, FormatError, ParseContext};
use super::lexer::{MindMapLexer, Token, tokenize};
use super::token_kind::TokenKind;
use crate::base::{LineCol, LineIndex, TextRange, TextSize};
use crate::core::text_utils::{count_prefix_chars, unescape_markdown, unwrap_pre_block};
use crate::model::{Extra, ExtraType, MindMap, TopicId};

/// Parse result: the map and any recoverable diagnostics
#[derive(Debug, Clone)]
pub struct Parse {
    pub map: MindMap,
    pub diagnostics: Vec<Diagnostic>,
}

impl Parse {
    /// Check if parsing finished without diagnostics
    pub fn ok(&self) -> bool {
        self.diagnostics.is_empty()
    }
}

/// Parse MMD text into a [`MindMap`]
pub fn parse(input: &str) -> Result<Parse, FormatError> {
    let line_index = LineIndex::new(input);
    let mut tokens = tokenize(input);
    let has_header = has_header_delimiter(&tokens);
    if !has_header {
        tracing::debug!("no header delimiter before the first topic, reading document as header-less body");
        tokens = MindMapLexer::with_state(input, TokenKind::WHITESPACE).collect();
    }

    if let Some(token) = tokens.iter().find(|t| !t.completed) {
        let offset = token.range.start();
        return Err(FormatError::UnterminatedToken {
            kind: token.kind,
            offset,
            position: line_index.line_col(offset),
        });
    }

    let mut parser = Parser::new(&tokens, &line_index);
    if has_header {
        parser.parse_header();
    }
    parser.parse_topics()?;
    Ok(parser.finish())
}

/// Check if a `---` line closes a header before any topic line
///
/// A dash line after a `#` line belongs to the body of a header-less
/// document, for example inside a `<pre>` note.
fn has_header_delimiter(tokens: &[Token<'_>]) -> bool {
    for token in tokens {
        match token.kind {
            TokenKind::HEAD_DELIMITER => return true,
            TokenKind::HEAD_LINE if token.text.trim_start().starts_with('#') => return false,
            _ => {}
        }
    }
    false
}

/// `#` count of a topic line
fn topic_level(text: &str) -> usize {
    count_prefix_chars('#', text.trim_start())
}

fn topic_title(text: &str) -> String {
    let text = text.trim_start();
    let title = text[topic_level(text)..]
        .trim_start()
        .trim_end_matches(['\n', '\r']);
    unescape_markdown(title)
}

fn line_text(text: &str) -> &str {
    text.trim_end_matches(['\n', '\r'])
}

/// The parser state
struct Parser<'t, 'a> {
    cursor: TokenCursor<'t, 'a>,
    line_index: &'t LineIndex,
    map: MindMap,
    diagnostics: Vec<Diagnostic>,
    has_root: bool,
}

impl<'t, 'a> Parser<'t, 'a> {
    fn new(tokens: &'t [Token<'a>], line_index: &'t LineIndex) -> Self {
        Self {
            cursor: TokenCursor::new(tokens),
            line_index,
            map: MindMap::new(),
            diagnostics: Vec::new(),
            has_root: false,
        }
    }

    fn finish(self) -> Parse {
        Parse {
            map: self.map,
            diagnostics: self.diagnostics,
        }
    }

    // =========================================================================
    // Diagnostics
    // =========================================================================

    fn report(
        &mut self,
        code: DiagnosticCode,
        message: impl Into<String>,
        range: TextRange,
        context: ParseContext,
    ) {
        self.push(Diagnostic::new(code, message, range, context));
    }

    /// Report with the code's default message
    fn report_code(&mut self, code: DiagnosticCode, range: TextRange, context: ParseContext) {
        self.push(Diagnostic::from_code(code, range, context));
    }

    fn push(&mut self, diagnostic: Diagnostic) {
        let code = diagnostic.code;
        let position = self.line_index.line_col(diagnostic.range.start());
        if code.loses_content() {
            tracing::warn!(code = %code, %position, "{}", diagnostic.message);
        } else {
            tracing::debug!(code = %code, %position, "{}", diagnostic.message);
        }
        self.diagnostics.push(diagnostic);
    }

    fn report_unknown(&mut self, token: &Token<'_>, context: ParseContext) {
        self.report(
            DiagnosticCode::UnknownLine,
            format!(
                "unrecognized line `{}`, expected {}",
                token.text.trim(),
                context.expected_description()
            ),
            token.range,
            context,
        );
    }

    fn position_error(&self, offset: TextSize) -> LineCol {
        self.line_index.line_col(offset)
    }

    // =========================================================================
    // Header
    // =========================================================================

    fn parse_header(&mut self) {
        while let Some(token) = self.cursor.bump() {
            match token.kind {
                TokenKind::HEAD_DELIMITER => return,
                TokenKind::ATTRIBUTE => {
                    let context = ParseContext::Header;
                    match parse_attribute_line(token.text) {
                        AttributeLine::Pairs { pairs, malformed } => {
                            for (key, value) in pairs {
                                if let Err(err) = self.map.set_document_attribute(&key, Some(&value)) {
                                    self.report(DiagnosticCode::MalformedAttribute, err.to_string(), token.range, context);
                                }
                            }
                            if let Some(message) = malformed {
                                self.report(DiagnosticCode::MalformedAttribute, message, token.range, context);
                            }
                        }
                        AttributeLine::BareKey(key) => {
                            let value = self.collect_bare_value(TokenKind::HEAD_LINE);
                            match value {
                                Some(value) => {
                                    if let Err(err) = self.map.set_document_attribute(&key, Some(&value)) {
                                        self.report(DiagnosticCode::MalformedAttribute, err.to_string(), token.range, context);
                                    }
                                }
                                None => self.report(
                                    DiagnosticCode::MalformedAttribute,
                                    format!("attribute `{key}` without value"),
                                    token.range,
                                    context,
                                ),
                            }
                        }
                    }
                }
                // head lines carry free text
                _ => {}
            }
        }
    }

    /// Lines following a lone `> key`, joined with `\n`
    fn collect_bare_value(&mut self, line_kind: TokenKind) -> Option<String> {
        let mut lines = Vec::new();
        loop {
            let checkpoint = self.cursor.checkpoint();
            match self.cursor.bump() {
                Some(token) if token.kind == line_kind => lines.push(line_text(token.text).trim()),
                Some(token) if token.kind == TokenKind::WHITESPACE => {}
                Some(_) => {
                    self.cursor.rewind(checkpoint);
                    break;
                }
                None => break,
            }
        }
        (!lines.is_empty()).then(|| lines.join("\n"))
    }

    // =========================================================================
    // Topics
    // =========================================================================

    fn parse_topics(&mut self) -> Result<(), FormatError> {
        let context = ParseContext::TopLevel;
        while let Some(token) = self.cursor.current() {
            match token.kind {
                TokenKind::TOPIC => {
                    let level = topic_level(token.text);
                    if level == 1 && !self.has_root {
                        self.cursor.bump();
                        self.has_root = true;
                        let root = self.map.root();
                        if let Ok(topic) = self.map.topic_mut(root) {
                            topic.set_text(topic_title(token.text));
                        }
                        tracing::trace!(level, "root topic");
                        self.parse_topic_body(root, 1)?;
                    } else {
                        self.cursor.bump();
                        let range = self.skip_subtree(token.range, 1);
                        self.report(
                            DiagnosticCode::DemotedTopic,
                            format!("topic `{}` outside the root", topic_title(token.text)),
                            range,
                            context,
                        );
                    }
                }
                TokenKind::WHITESPACE => {
                    self.cursor.bump();
                }
                _ => {
                    self.cursor.bump();
                    self.report_unknown(token, context);
                }
            }
        }
        Ok(())
    }

    /// Consume tokens up to the next topic of `max_level` or shallower
    fn skip_subtree(&mut self, start: TextRange, max_level: usize) -> TextRange {
        let mut range = start;
        while let Some(token) = self.cursor.current() {
            if token.kind == TokenKind::TOPIC && topic_level(token.text) <= max_level {
                break;
            }
            self.cursor.bump();
            range = range.cover(token.range);
        }
        range
    }

    /// Body of a topic at `level` (`#` count); stops before a topic of
    /// `level` or shallower
    fn parse_topic_body(&mut self, id: TopicId, level: usize) -> Result<(), FormatError> {
        let context = ParseContext::TopicBody;
        while let Some(token) = self.cursor.current() {
            match token.kind {
                TokenKind::TOPIC => {
                    let child_level = topic_level(token.text);
                    if child_level <= 1 {
                        self.cursor.bump();
                        self.report(
                            DiagnosticCode::ExtraRoot,
                            format!("additional root topic `{}`", topic_title(token.text)),
                            token.range,
                            context,
                        );
                    } else if child_level <= level {
                        return Ok(());
                    } else if child_level > level + 1 {
                        self.cursor.bump();
                        let range = self.skip_subtree(token.range, level + 1);
                        self.report(
                            DiagnosticCode::DemotedTopic,
                            format!(
                                "topic `{}` at level {child_level} under a topic at level {level}",
                                topic_title(token.text)
                            ),
                            range,
                            context,
                        );
                    } else {
                        self.cursor.bump();
                        match self.map.add_topic(id, topic_title(token.text)) {
                            Ok(child) => self.parse_topic_body(child, child_level)?,
                            Err(err) => {
                                let range = self.skip_subtree(token.range, level + 1);
                                self.report(DiagnosticCode::DemotedTopic, err.to_string(), range, context);
                            }
                        }
                    }
                }
                TokenKind::ATTRIBUTE => {
                    self.cursor.bump();
                    self.parse_topic_attributes(id, token);
                }
                TokenKind::EXTRA_TYPE => self.parse_extra_block(id)?,
                TokenKind::CODE_SNIPPET_START => self.parse_code_snippet(id)?,
                TokenKind::CODE_SNIPPET_END => {
                    self.cursor.bump();
                    self.report_code(DiagnosticCode::StrayCodeSnippetEnd, token.range, context);
                }
                TokenKind::WHITESPACE => {
                    self.cursor.bump();
                }
                _ => {
                    self.cursor.bump();
                    self.report_unknown(token, context);
                }
            }
        }
        Ok(())
    }

    fn parse_topic_attributes(&mut self, id: TopicId, token: &Token<'_>) {
        let context = ParseContext::TopicBody;
        let pairs = match parse_attribute_line(token.text) {
            AttributeLine::Pairs { pairs, malformed } => {
                if let Some(message) = malformed {
                    self.report(DiagnosticCode::MalformedAttribute, message, token.range, context);
                }
                pairs
            }
            AttributeLine::BareKey(key) => match self.collect_bare_value(TokenKind::UNKNOWN_LINE) {
                Some(value) => vec![(key, value)],
                None => {
                    self.report(
                        DiagnosticCode::MalformedAttribute,
                        format!("attribute `{key}` without value"),
                        token.range,
                        context,
                    );
                    Vec::new()
                }
            },
        };
        for (key, value) in pairs {
            if let Err(err) = self.map.set_attribute(id, &key, Some(&value)) {
                self.report(DiagnosticCode::MalformedAttribute, err.to_string(), token.range, context);
            }
        }
    }

    // =========================================================================
    // Extras
    // =========================================================================

    fn parse_extra_block(&mut self, id: TopicId) -> Result<(), FormatError> {
        let context = ParseContext::ExtraBlock;
        let Some(type_token) = self.cursor.eat(TokenKind::EXTRA_TYPE) else {
            return Ok(());
        };
        let name = type_token.text.trim_start().trim_start_matches('-').trim();
        let extra_type = ExtraType::parse(name);
        if extra_type.is_none() {
            self.report(
                DiagnosticCode::UnknownExtraType,
                format!("unknown extra type `{name}`"),
                type_token.range,
                context,
            );
        }

        let mut body: Option<(String, TextRange)> = None;
        loop {
            let checkpoint = self.cursor.checkpoint();
            let Some(token) = self.cursor.bump() else {
                break;
            };
            match token.kind {
                TokenKind::WHITESPACE => {}
                TokenKind::EXTRA_TEXT if body.is_none() => match unwrap_pre_block(token.text) {
                    Some(text) => body = Some((text, token.range)),
                    None => self.report(
                        DiagnosticCode::InvalidExtraBody,
                        "extra body is not a <pre> block",
                        token.range,
                        context,
                    ),
                },
                TokenKind::EXTRA_TEXT => {
                    self.report(
                        DiagnosticCode::ExcessExtraBody,
                        format!("second body for extra `{name}`"),
                        token.range,
                        context,
                    );
                    break;
                }
                TokenKind::UNKNOWN_LINE if body.is_none() => {
                    body = Some((line_text(token.text).to_string(), token.range));
                }
                kind if context.is_recovery_token(kind) => {
                    tracing::trace!(%kind, "extra block closed");
                    self.cursor.rewind(checkpoint);
                    break;
                }
                _ => self.report_unknown(token, context),
            }
        }

        let Some(extra_type) = extra_type else {
            return Ok(());
        };
        match body {
            Some((text, range)) => match Extra::from_body(extra_type, &text) {
                Some(extra) => match self.map.set_extra(id, extra) {
                    Ok(Some(previous)) => {
                        tracing::warn!(extra = %previous.extra_type(), topic = %id, "replaced duplicate extra");
                    }
                    Ok(None) => {}
                    Err(err) => self.report(DiagnosticCode::InvalidExtraBody, err.to_string(), range, context),
                },
                None => self.report(
                    DiagnosticCode::InvalidExtraBody,
                    format!("invalid {extra_type} body"),
                    range,
                    context,
                ),
            },
            None if self.cursor.at_eof() => {
                let offset = type_token.range.start();
                return Err(FormatError::MissingExtraBody {
                    extra: extra_type,
                    offset,
                    position: self.position_error(offset),
                });
            }
            None => self.report(
                DiagnosticCode::MissingExtraBody,
                format!("extra {extra_type} has no body"),
                type_token.range,
                context,
            ),
        }
        Ok(())
    }

    // =========================================================================
    // Code snippets
    // =========================================================================

    fn parse_code_snippet(&mut self, id: TopicId) -> Result<(), FormatError> {
        let context = ParseContext::CodeSnippet;
        let Some(start) = self.cursor.eat(TokenKind::CODE_SNIPPET_START) else {
            return Ok(());
        };
        let language = line_text(start.text).trim_start().trim_start_matches('`').trim();
        let body = self.cursor.eat(TokenKind::CODE_SNIPPET_BODY).map_or("", |t| {
            let text = t.text.strip_suffix('\n').unwrap_or(t.text);
            text.strip_suffix('\r').unwrap_or(text)
        });

        let Some(end) = self.cursor.eat(TokenKind::CODE_SNIPPET_END) else {
            let offset = start.range.start();
            return Err(FormatError::UnterminatedToken {
                kind: TokenKind::CODE_SNIPPET_START,
                offset,
                position: self.position_error(offset),
            });
        };

        let result = self
            .map
            .topic_mut(id)
            .and_then(|topic| topic.set_code_snippet(language, Some(body)));
        if let Err(err) = result {
            self.report(
                DiagnosticCode::UnknownLine,
                err.to_string(),
                start.range.cover(end.range),
                context,
            );
        }
        Ok(())
    }
}
