//! HED String Parser
//!
//! Clean, fast parsing of HED annotation strings.
//! Focused solely on tokenization and AST construction.

pub mod ast;
pub mod lexer;

pub use ast::{HedItem, HedString, HedTag, SyntaxError};
pub use lexer::{tokenize, Token, TokenKind};

/// Parse a HED string into structured data
///
/// This is the main entry point for parsing. It tokenizes the input
/// and constructs the item tree. An empty or whitespace-only input is
/// a valid, empty HED string.
pub fn parse_hed_string(input: &str) -> Result<HedString, Vec<SyntaxError>> {
    let tokens = lexer::tokenize(input);
    ast::tokens_to_hed_string(tokens)
}
