//! Lexer and parser tests
//!
//! - Token streams for each lexer state
//! - Tree reconstruction from `#` levels
//! - Diagnostics and hard failures

pub mod tests_lexer;
