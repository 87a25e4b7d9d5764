//! Lexer state machine tests.

use mmd::TextSize;
use mmd::parser::{LexerPosition, MindMapLexer, TokenKind, tokenize};
use rstest::rstest;

fn kinds(source: &str) -> Vec<TokenKind> {
    tokenize(source).iter().map(|t| t.kind).collect()
}

#[test]
fn test_sample_document_token_kinds() {
    use TokenKind::*;
    assert_eq!(
        kinds(crate::helpers::fixtures::SAMPLE_DOCUMENT),
        vec![
            HEAD_LINE,
            ATTRIBUTE,
            HEAD_DELIMITER,
            TOPIC,
            ATTRIBUTE,
            EXTRA_TYPE,
            EXTRA_TEXT,
            WHITESPACE,
            EXTRA_TYPE,
            UNKNOWN_LINE,
            CODE_SNIPPET_START,
            CODE_SNIPPET_BODY,
            CODE_SNIPPET_END,
            TOPIC,
            EXTRA_TYPE,
            UNKNOWN_LINE,
            TOPIC,
            TOPIC,
        ]
    );
}

#[test]
fn test_tokens_cover_input() {
    let source = crate::helpers::fixtures::SAMPLE_DOCUMENT;
    let joined: String = tokenize(source).iter().map(|t| t.text).collect();
    assert_eq!(joined, source);
}

#[rstest]
#[case("---\n# Title\n", TokenKind::TOPIC)]
#[case("---\n- NOTE\n", TokenKind::EXTRA_TYPE)]
#[case("---\n> k=`v`\n", TokenKind::ATTRIBUTE)]
#[case("---\n-NOTE\n", TokenKind::UNKNOWN_LINE)]
#[case("---\n>k\n", TokenKind::UNKNOWN_LINE)]
#[case("---\n<div>\n", TokenKind::UNKNOWN_LINE)]
#[case("---\nplain text\n", TokenKind::UNKNOWN_LINE)]
#[case("---\n<pre>x</pre>", TokenKind::EXTRA_TEXT)]
fn test_body_line_kind(#[case] source: &str, #[case] expected: TokenKind) {
    let tokens = tokenize(source);
    assert_eq!(tokens[0].kind, TokenKind::HEAD_DELIMITER);
    assert_eq!(tokens[1].kind, expected);
}

#[test]
fn test_head_lines_stay_in_header_state() {
    use TokenKind::*;
    assert_eq!(
        kinds("title\n# not a topic\n> a=`b`\n---\n"),
        vec![HEAD_LINE, HEAD_LINE, ATTRIBUTE, HEAD_DELIMITER]
    );
}

#[test]
fn test_extra_text_spans_lines() {
    let tokens = tokenize("---\n<pre>a\n# b\n- c</pre>\n");
    assert_eq!(tokens[1].kind, TokenKind::EXTRA_TEXT);
    assert_eq!(tokens[1].text, "<pre>a\n# b\n- c</pre>");
    assert!(tokens[1].completed);
}

#[test]
fn test_unterminated_extra_text_is_incomplete() {
    let tokens = tokenize("---\n<pre>never closed\n");
    let last = tokens.last().unwrap();
    assert_eq!(last.kind, TokenKind::EXTRA_TEXT);
    assert!(!last.completed);
}

#[test]
fn test_start_in_whitespace_state() {
    let kinds: Vec<_> = MindMapLexer::with_state("# A\n## B\n", TokenKind::WHITESPACE)
        .map(|t| t.kind)
        .collect();
    assert_eq!(kinds, vec![TokenKind::TOPIC, TokenKind::TOPIC]);
}

#[test]
fn test_restart_from_saved_position() {
    let source = "---\n# A\n## B\n";
    let mut lexer = MindMapLexer::new(source);
    lexer.advance();
    lexer.advance();
    assert_eq!(lexer.token_text(), "# A\n");
    let saved = lexer.position();

    lexer.advance();
    assert_eq!(lexer.token_text(), "## B\n");

    lexer.restore(saved);
    lexer.advance();
    assert_eq!(lexer.token_kind(), Some(TokenKind::TOPIC));
    assert_eq!(lexer.token_text(), "## B\n");
}

#[test]
fn test_start_with_ordinal_state() {
    let source = "---\n# A\n";
    let state = TokenKind::from_ordinal(TokenKind::WHITESPACE.ordinal()).unwrap();
    let position = LexerPosition::new(TextSize::from(4), state);
    assert_eq!(position.offset(), TextSize::from(4));

    let mut lexer = MindMapLexer::new(source);
    lexer.start(source, position.offset(), TextSize::of(source), position.state());
    lexer.advance();
    assert_eq!(lexer.token_kind(), Some(TokenKind::TOPIC));
    lexer.advance();
    assert_eq!(lexer.token_kind(), None);
}
