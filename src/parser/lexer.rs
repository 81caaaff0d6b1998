//! HED String Lexer
//!
//! Fast, simple tokenization of HED strings.
//! Focus: split a string into tags, commas and parentheses with minimal fuss.

/// Token types in a HED string
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TokenKind {
    /// A tag path like "Event/Sensory-event" or "Red"
    Tag,
    /// Item separator ","
    Comma,
    /// Group opener "("
    OpenParen,
    /// Group closer ")"
    CloseParen,
}

/// A token with its text content
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
}

/// Tokenize a HED string into tokens
///
/// Tag text is trimmed; whitespace between delimiters is not significant.
/// No position tracking, just fast extraction of tokens from the input.
pub fn tokenize(input: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut pending = String::new();

    fn flush(pending: &mut String, tokens: &mut Vec<Token>) {
        let text = pending.trim();
        if !text.is_empty() {
            tokens.push(Token {
                kind: TokenKind::Tag,
                text: text.to_string(),
            });
        }
        pending.clear();
    }

    for ch in input.chars() {
        match ch {
            ',' => {
                flush(&mut pending, &mut tokens);
                tokens.push(Token {
                    kind: TokenKind::Comma,
                    text: ",".to_string(),
                });
            }
            '(' => {
                flush(&mut pending, &mut tokens);
                tokens.push(Token {
                    kind: TokenKind::OpenParen,
                    text: "(".to_string(),
                });
            }
            ')' => {
                flush(&mut pending, &mut tokens);
                tokens.push(Token {
                    kind: TokenKind::CloseParen,
                    text: ")".to_string(),
                });
            }
            _ => pending.push(ch),
        }
    }
    flush(&mut pending, &mut tokens);

    tokens
}
