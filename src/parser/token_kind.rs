//! Token kinds produced by the MMD lexer
//!
//! Every kind doubles as a lexer state: the lexer remembers the kind of the
//! token it is about to produce, and editor hosts store that state as its
//! `u16` ordinal to restart lexing in the middle of a document.

use std::fmt;

/// All token kinds of the MMD format
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u16)]
#[allow(non_camel_case_types)]
pub enum TokenKind {
    // =========================================================================
    // HEADER
    // =========================================================================
    HEAD_LINE = 0,      // any line before the delimiter
    HEAD_DELIMITER,     // ---

    // =========================================================================
    // BODY
    // =========================================================================
    ATTRIBUTE,          // > key=`value`
    TOPIC,              // ## Title
    EXTRA_TYPE,         // - NOTE
    EXTRA_TEXT,         // <pre>...</pre>
    CODE_SNIPPET_START, // ```lang
    CODE_SNIPPET_BODY,
    CODE_SNIPPET_END,   // ```

    // =========================================================================
    // TRIVIA
    // =========================================================================
    WHITESPACE,
    UNKNOWN_LINE,
}

impl TokenKind {
    const ALL: [TokenKind; 11] = [
        Self::HEAD_LINE,
        Self::HEAD_DELIMITER,
        Self::ATTRIBUTE,
        Self::TOPIC,
        Self::EXTRA_TYPE,
        Self::EXTRA_TEXT,
        Self::CODE_SNIPPET_START,
        Self::CODE_SNIPPET_BODY,
        Self::CODE_SNIPPET_END,
        Self::WHITESPACE,
        Self::UNKNOWN_LINE,
    ];

    /// Stable numeric value of this kind, used to persist lexer states
    pub fn ordinal(self) -> u16 {
        self as u16
    }

    /// Restore a kind from [`TokenKind::ordinal`]
    pub fn from_ordinal(ordinal: u16) -> Option<Self> {
        Self::ALL.get(usize::from(ordinal)).copied()
    }

    pub fn is_trivia(self) -> bool {
        matches!(self, Self::WHITESPACE)
    }

    /// Kinds that belong to the header section
    pub fn is_header(self) -> bool {
        matches!(self, Self::HEAD_LINE | Self::HEAD_DELIMITER)
    }

    pub fn is_code_snippet(self) -> bool {
        matches!(
            self,
            Self::CODE_SNIPPET_START | Self::CODE_SNIPPET_BODY | Self::CODE_SNIPPET_END
        )
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::HEAD_LINE => "HEAD_LINE",
            Self::HEAD_DELIMITER => "HEAD_DELIMITER",
            Self::ATTRIBUTE => "ATTRIBUTE",
            Self::TOPIC => "TOPIC",
            Self::EXTRA_TYPE => "EXTRA_TYPE",
            Self::EXTRA_TEXT => "EXTRA_TEXT",
            Self::CODE_SNIPPET_START => "CODE_SNIPPET_START",
            Self::CODE_SNIPPET_BODY => "CODE_SNIPPET_BODY",
            Self::CODE_SNIPPET_END => "CODE_SNIPPET_END",
            Self::WHITESPACE => "WHITESPACE",
            Self::UNKNOWN_LINE => "UNKNOWN_LINE",
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
