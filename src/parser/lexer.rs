//! Line-oriented lexer for MMD documents
//!
//! A hand-written state machine. The kind of the token being read doubles as
//! the lexer state, so a host can stop at any offset, remember
//! [`LexerPosition`], and resume later (see [`MindMapLexer::restore`]).
//!
//! ```text
//! HEAD_LINE ──(line of '-')──▶ HEAD_DELIMITER ──▶ WHITESPACE
//!                                                  │
//!      '#' ▶ TOPIC   '- ' ▶ EXTRA_TYPE   '> ' ▶ ATTRIBUTE
//!      '<pre>' ▶ EXTRA_TEXT   '```x' ▶ CODE_SNIPPET_START ▶ CODE_SNIPPET_BODY
//!      anything else ▶ UNKNOWN_LINE
//! ```

use text_size::{TextRange, TextSize};

use super::token_kind::TokenKind;

const PRE_OPEN: &[u8] = b"<pre>";
const PRE_CLOSE: &[u8] = b"</pre>";
const SNIPPET_FENCE: &[u8] = b"```";

/// A token with its kind, text, and position
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token<'a> {
    pub kind: TokenKind,
    pub text: &'a str,
    pub range: TextRange,
    /// `false` if the token was cut off by the end of the buffer
    pub completed: bool,
}

/// Resumable lexer state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LexerPosition {
    offset: usize,
    state: TokenKind,
    token_completed: bool,
}

impl LexerPosition {
    /// Position at `offset` that starts a fresh token in `state`
    pub fn new(offset: TextSize, state: TokenKind) -> Self {
        Self {
            offset: usize::from(offset),
            state,
            token_completed: true,
        }
    }

    pub fn offset(&self) -> TextSize {
        to_text_size(self.offset)
    }

    pub fn state(&self) -> TokenKind {
        self.state
    }

    pub fn is_token_completed(&self) -> bool {
        self.token_completed
    }
}

/// Cursor-style lexer over a borrowed buffer
#[derive(Debug, Clone)]
pub struct MindMapLexer<'a> {
    buffer: &'a str,
    end: usize,
    position: LexerPosition,
    token_start: usize,
    token_end: usize,
    token_kind: TokenKind,
}

impl<'a> MindMapLexer<'a> {
    /// Lexer over the whole buffer, starting in the header
    pub fn new(buffer: &'a str) -> Self {
        Self::with_state(buffer, TokenKind::HEAD_LINE)
    }

    /// Lexer over the whole buffer, starting in `initial`
    pub fn with_state(buffer: &'a str, initial: TokenKind) -> Self {
        let mut lexer = Self {
            buffer: "",
            end: 0,
            position: LexerPosition::new(TextSize::new(0), initial),
            token_start: 0,
            token_end: 0,
            token_kind: initial,
        };
        lexer.start(buffer, TextSize::new(0), to_text_size(buffer.len()), initial);
        lexer
    }

    /// Reset the lexer onto `buffer[start..end]` in the given state
    pub fn start(&mut self, buffer: &'a str, start: TextSize, end: TextSize, initial: TokenKind) {
        self.buffer = buffer;
        self.end = usize::from(end).min(buffer.len());
        self.position = LexerPosition::new(start, initial);
        self.token_start = self.position.offset;
        self.token_end = self.position.offset;
        self.token_kind = initial;
    }

    /// Move the end of the lexed region
    pub fn set_buffer_end(&mut self, end: TextSize) {
        self.end = usize::from(end).min(self.buffer.len());
    }

    pub fn buffer_end(&self) -> TextSize {
        to_text_size(self.end)
    }

    pub fn position(&self) -> LexerPosition {
        self.position
    }

    pub fn restore(&mut self, position: LexerPosition) {
        self.position = position;
    }

    /// Kind of the current token, `None` if the last advance produced nothing
    pub fn token_kind(&self) -> Option<TokenKind> {
        (self.token_start != self.token_end).then_some(self.token_kind)
    }

    pub fn token_range(&self) -> TextRange {
        TextRange::new(to_text_size(self.token_start), to_text_size(self.token_end))
    }

    pub fn token_text(&self) -> &'a str {
        self.buffer.get(self.token_start..self.token_end).unwrap_or("")
    }

    /// Read the next token
    pub fn advance(&mut self) {
        let mut completed = self.position.token_completed;
        if completed {
            self.token_start = self.position.offset;
        }
        let mut in_action = true;

        while in_action && !self.is_buffer_end() {
            match self.position.state {
                TokenKind::HEAD_LINE => {
                    completed = self.skip_to_next_line();
                    if completed && self.is_all_line_of(b'-') {
                        self.position.state = TokenKind::HEAD_DELIMITER;
                    }
                    in_action = false;
                }
                TokenKind::HEAD_DELIMITER => {
                    self.position.state = TokenKind::WHITESPACE;
                }
                TokenKind::WHITESPACE | TokenKind::CODE_SNIPPET_END => {
                    self.skip_whitespace();
                    if self.position.offset > self.token_start || self.is_buffer_end() {
                        completed = true;
                        in_action = false;
                        continue;
                    }
                    match self.read_byte() {
                        b'#' => self.position.state = TokenKind::TOPIC,
                        marker @ (b'-' | b'>') => {
                            let kind = if marker == b'>' {
                                TokenKind::ATTRIBUTE
                            } else {
                                TokenKind::EXTRA_TYPE
                            };
                            if self.is_buffer_end() {
                                self.position.state = kind;
                                completed = false;
                                in_action = false;
                            } else if self.peek_byte() == Some(b' ') {
                                self.position.offset += 1;
                                self.position.state = kind;
                            } else {
                                self.position.state = TokenKind::UNKNOWN_LINE;
                            }
                        }
                        b'<' if self.position.offset >= self.buffer.len() => {
                            self.position.state = TokenKind::UNKNOWN_LINE;
                            completed = true;
                            in_action = false;
                        }
                        b'<' => {
                            completed = false;
                            self.position.state = TokenKind::EXTRA_TEXT;
                        }
                        _ => self.position.state = TokenKind::UNKNOWN_LINE,
                    }
                }
                TokenKind::EXTRA_TEXT => {
                    if self.token_len() <= PRE_OPEN.len() && !self.token_may_start_with(PRE_OPEN) {
                        self.position.state = TokenKind::UNKNOWN_LINE;
                    } else if self.read_byte() == b'>'
                        && self.token_len() > PRE_OPEN.len()
                        && self.prev_bytes_are(PRE_CLOSE)
                    {
                        completed = true;
                        in_action = false;
                    }
                }
                TokenKind::CODE_SNIPPET_START => {
                    completed = self.seek_code_snippet_end();
                    if self.position.offset == self.token_start {
                        self.position.state = TokenKind::CODE_SNIPPET_END;
                    } else {
                        self.position.state = TokenKind::CODE_SNIPPET_BODY;
                        in_action = false;
                    }
                }
                TokenKind::ATTRIBUTE
                | TokenKind::EXTRA_TYPE
                | TokenKind::TOPIC
                | TokenKind::UNKNOWN_LINE
                | TokenKind::CODE_SNIPPET_BODY => {
                    completed = self.skip_to_next_line();
                    in_action = false;
                }
            }
        }

        self.position.token_completed = completed;
        self.token_kind = self.position.state;
        self.token_end = self.position.offset;

        if completed {
            match self.token_kind {
                TokenKind::HEAD_LINE => {
                    if self.token_bytes().starts_with(b"> ") {
                        self.token_kind = TokenKind::ATTRIBUTE;
                    }
                }
                TokenKind::UNKNOWN_LINE if self.token_bytes().starts_with(SNIPPET_FENCE) => {
                    self.token_kind = if self.is_fence_line(self.token_bytes()) {
                        TokenKind::CODE_SNIPPET_END
                    } else {
                        TokenKind::CODE_SNIPPET_START
                    };
                    self.position.state = self.token_kind;
                }
                _ => self.position.state = TokenKind::WHITESPACE,
            }
        }
    }

    // =========================================================================
    // Scanning helpers
    // =========================================================================

    fn is_buffer_end(&self) -> bool {
        self.position.offset >= self.end
    }

    fn token_len(&self) -> usize {
        self.position.offset - self.token_start
    }

    fn token_bytes(&self) -> &'a [u8] {
        self.buffer
            .as_bytes()
            .get(self.token_start..self.position.offset)
            .unwrap_or(&[])
    }

    fn read_byte(&mut self) -> u8 {
        let byte = self.buffer.as_bytes()[self.position.offset];
        self.position.offset += 1;
        byte
    }

    fn peek_byte(&self) -> Option<u8> {
        if self.is_buffer_end() {
            return None;
        }
        self.buffer.as_bytes().get(self.position.offset).copied()
    }

    /// Consume through the next `\n`; `false` if the line runs into a
    /// buffer end that is not the end of the text.
    fn skip_to_next_line(&mut self) -> bool {
        let rest = &self.buffer.as_bytes()[self.position.offset..self.end];
        match rest.iter().position(|b| *b == b'\n') {
            Some(index) => {
                self.position.offset += index + 1;
                true
            }
            None => {
                self.position.offset = self.end;
                self.end == self.buffer.len()
            }
        }
    }

    fn skip_whitespace(&mut self) {
        while !self.is_buffer_end() {
            let Some(chr) = self
                .buffer
                .get(self.position.offset..)
                .and_then(|rest| rest.chars().next())
            else {
                break;
            };
            let next = self.position.offset + chr.len_utf8();
            if !(chr.is_whitespace() || chr.is_control()) || next > self.end {
                break;
            }
            self.position.offset = next;
        }
    }

    /// Check the token read so far, plus the next byte, against `prefix`
    fn token_may_start_with(&self, prefix: &[u8]) -> bool {
        let bytes = self.buffer.as_bytes();
        let upto = (self.position.offset + 1).min(bytes.len());
        bytes[self.token_start..upto]
            .iter()
            .zip(prefix)
            .all(|(a, b)| a == b)
    }

    fn prev_bytes_are(&self, text: &[u8]) -> bool {
        self.position
            .offset
            .checked_sub(text.len())
            .is_some_and(|start| &self.buffer.as_bytes()[start..self.position.offset] == text)
    }

    fn is_all_line_of(&self, chr: u8) -> bool {
        let bytes = self.token_bytes();
        let body = bytes.strip_suffix(b"\n").unwrap_or(bytes);
        let mut detected = false;
        for byte in body {
            match *byte {
                b'\r' => continue,
                b if b == chr => detected = true,
                _ => return false,
            }
        }
        detected
    }

    /// A line holding exactly three backticks and optional trailing blanks
    fn is_fence_line(&self, line: &[u8]) -> bool {
        line.strip_prefix(SNIPPET_FENCE).is_some_and(|rest| {
            rest.iter()
                .all(|b| matches!(b, b' ' | b'\t' | b'\r' | b'\n'))
        })
    }

    fn is_line_start(&self) -> bool {
        self.position.offset == 0 || self.buffer.as_bytes()[self.position.offset - 1] == b'\n'
    }

    /// Move to the start of the line closing a code snippet
    fn seek_code_snippet_end(&mut self) -> bool {
        let bytes = self.buffer.as_bytes();
        let mut at_line_start = self.is_line_start();
        let mut line_start = self.position.offset;

        while line_start < self.end {
            let line_end = bytes[line_start..self.end]
                .iter()
                .position(|b| *b == b'\n')
                .map_or(self.end, |index| line_start + index + 1);
            if at_line_start && self.is_fence_line(&bytes[line_start..line_end]) {
                self.position.offset = line_start;
                return true;
            }
            at_line_start = true;
            line_start = line_end;
        }

        self.position.offset = self.end;
        false
    }
}

impl<'a> Iterator for MindMapLexer<'a> {
    type Item = Token<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.is_buffer_end() && !self.position.token_completed {
            return None;
        }
        self.advance();
        let kind = self.token_kind()?;
        let token = Token {
            kind,
            text: self.token_text(),
            range: self.token_range(),
            completed: self.position.token_completed,
        };
        tracing::trace!(kind = %token.kind, range = ?token.range, completed = token.completed, "token");
        Some(token)
    }
}

/// Tokenize an entire document, starting in the header
pub fn tokenize(input: &str) -> Vec<Token<'_>> {
    MindMapLexer::new(input).collect()
}

fn to_text_size(offset: usize) -> TextSize {
    TextSize::new(u32::try_from(offset).unwrap_or(u32::MAX))
}
