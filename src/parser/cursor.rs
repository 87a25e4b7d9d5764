//! Peekable cursor over a lexed token vector with explicit rewinding

use super::lexer::Token;
use super::token_kind::TokenKind;

/// Saved cursor position, see [`TokenCursor::rewind`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Checkpoint(usize);

#[derive(Debug)]
pub struct TokenCursor<'t, 'a> {
    tokens: &'t [Token<'a>],
    pos: usize,
}

impl<'t, 'a> TokenCursor<'t, 'a> {
    pub fn new(tokens: &'t [Token<'a>]) -> Self {
        Self { tokens, pos: 0 }
    }

    // =========================================================================
    // Token access
    // =========================================================================

    pub fn current(&self) -> Option<&'t Token<'a>> {
        self.tokens.get(self.pos)
    }

    pub fn current_kind(&self) -> Option<TokenKind> {
        self.current().map(|t| t.kind)
    }

    pub fn at(&self, kind: TokenKind) -> bool {
        self.current_kind() == Some(kind)
    }

    pub fn at_eof(&self) -> bool {
        self.pos >= self.tokens.len()
    }

    // =========================================================================
    // Token consumption
    // =========================================================================

    /// Return the current token and move past it
    pub fn bump(&mut self) -> Option<&'t Token<'a>> {
        let token = self.tokens.get(self.pos)?;
        self.pos += 1;
        Some(token)
    }

    pub fn eat(&mut self, kind: TokenKind) -> Option<&'t Token<'a>> {
        if self.at(kind) { self.bump() } else { None }
    }

    pub fn checkpoint(&self) -> Checkpoint {
        Checkpoint(self.pos)
    }

    pub fn rewind(&mut self, checkpoint: Checkpoint) {
        tracing::trace!(from = self.pos, to = checkpoint.0, "rewind token cursor");
        self.pos = checkpoint.0;
    }
}
