//! Parse context tracking for context-aware diagnostics

use crate::parser::TokenKind;

/// Where in the document structure the parser currently is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParseContext {
    /// Before the `---` delimiter
    Header,
    /// After the delimiter, outside any topic
    TopLevel,
    /// Inside the body of a topic
    TopicBody,
    /// After an `- TYPE` line
    ExtraBlock,
    /// Between code snippet fences
    CodeSnippet,
}

impl ParseContext {
    /// Human-readable description of this context for messages
    pub fn description(&self) -> &'static str {
        match self {
            Self::Header => "in document header",
            Self::TopLevel => "at top level",
            Self::TopicBody => "in topic body",
            Self::ExtraBlock => "in extra block",
            Self::CodeSnippet => "in code snippet",
        }
    }

    /// Description of the content expected in this context
    pub fn expected_description(&self) -> &'static str {
        match self {
            Self::Header => "head lines, attributes or the `---` delimiter",
            Self::TopLevel => "the `#` root topic",
            Self::TopicBody => "attributes, extras, code snippets or child topics",
            Self::ExtraBlock => "one `<pre>` block or body line",
            Self::CodeSnippet => "snippet text and a closing ``` line",
        }
    }

    /// Tokens that close this context and are handed back to the caller
    pub fn recovery_tokens(&self) -> &'static [TokenKind] {
        match self {
            Self::Header => &[TokenKind::HEAD_DELIMITER],
            Self::TopLevel => &[TokenKind::TOPIC],
            Self::TopicBody => &[TokenKind::TOPIC],
            Self::ExtraBlock => &[
                TokenKind::TOPIC,
                TokenKind::EXTRA_TYPE,
                TokenKind::ATTRIBUTE,
                TokenKind::CODE_SNIPPET_START,
                TokenKind::CODE_SNIPPET_END,
            ],
            Self::CodeSnippet => &[TokenKind::CODE_SNIPPET_END],
        }
    }

    pub fn is_recovery_token(&self, kind: TokenKind) -> bool {
        self.recovery_tokens().contains(&kind)
    }
}
