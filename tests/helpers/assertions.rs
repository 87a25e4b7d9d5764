//! Diagnostic assertion helpers.

use mmd::{DiagnosticCode, MindMap, Parse, parse};

/// Parse a document that must produce no diagnostics.
pub fn parse_clean(source: &str) -> MindMap {
    let parse = parse(source).unwrap_or_else(|err| panic!("parse failed: {err}"));
    assert!(
        parse.ok(),
        "Expected no diagnostics, got {}:\n{}",
        parse.diagnostics.len(),
        parse
            .diagnostics
            .iter()
            .map(|d| format!("  {}", d.format()))
            .collect::<Vec<_>>()
            .join("\n")
    );
    parse.map
}

/// Codes of all diagnostics, in report order.
pub fn diagnostic_codes(parse: &Parse) -> Vec<DiagnosticCode> {
    parse.diagnostics.iter().map(|d| d.code).collect()
}
