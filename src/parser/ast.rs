//! Abstract Syntax Tree for HED strings
//!
//! Minimal types representing parsed HED structure.
//! No vocabulary knowledge here - pure data representation.

use crate::parser::lexer::{Token, TokenKind};

/// A parsed HED string: a sequence of top-level items
#[derive(Debug, Clone, PartialEq, Default)]
pub struct HedString {
    pub items: Vec<HedItem>,
}

impl HedString {
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// One item of a HED string: a tag or a parenthesized group
#[derive(Debug, Clone, PartialEq)]
pub enum HedItem {
    Tag(HedTag),
    Group(Vec<HedItem>),
}

/// A single tag path like "Event/Sensory-event" or "Def/MyDef"
#[derive(Debug, Clone, PartialEq)]
pub struct HedTag {
    /// Original text as written, whitespace-trimmed
    pub text: String,
}

impl HedTag {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    /// Slash-separated path components, trimmed
    pub fn components(&self) -> Vec<&str> {
        self.text.split('/').map(str::trim).collect()
    }

    /// Whether this is a `Def/<name>` reference
    pub fn is_def_reference(&self) -> bool {
        self.base().eq_ignore_ascii_case("Def")
    }

    /// Whether this is a `Definition/<name>` declaration
    pub fn is_definition(&self) -> bool {
        self.base().eq_ignore_ascii_case("Definition")
    }

    fn base(&self) -> &str {
        self.text.split('/').next().unwrap_or("").trim()
    }
}

/// Structural problems found while building the AST
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SyntaxError {
    /// Unmatched "(" or ")"
    UnbalancedParentheses,
    /// A comma with no tag or group before/after it
    EmptyTag,
}

/// One nesting level while building the tree
struct Frame {
    items: Vec<HedItem>,
    saw_item: bool,
    had_comma: bool,
}

impl Frame {
    fn new() -> Self {
        Self {
            items: Vec::new(),
            saw_item: false,
            had_comma: false,
        }
    }

    fn trailing_slot_is_empty(&self) -> bool {
        self.had_comma && !self.saw_item
    }
}

/// Convert tokens into a HED string tree
///
/// All structural errors are collected so a malformed string reports
/// everything wrong with it in one pass.
pub fn tokens_to_hed_string(tokens: Vec<Token>) -> Result<HedString, Vec<SyntaxError>> {
    let mut current = Frame::new();
    let mut parents: Vec<Frame> = Vec::new();
    let mut errors = Vec::new();

    for token in tokens {
        match token.kind {
            TokenKind::Tag => {
                current.items.push(HedItem::Tag(HedTag::new(token.text)));
                current.saw_item = true;
            }
            TokenKind::Comma => {
                if !current.saw_item {
                    errors.push(SyntaxError::EmptyTag);
                }
                current.saw_item = false;
                current.had_comma = true;
            }
            TokenKind::OpenParen => {
                parents.push(std::mem::replace(&mut current, Frame::new()));
            }
            TokenKind::CloseParen => match parents.pop() {
                Some(mut parent) => {
                    if current.trailing_slot_is_empty() {
                        errors.push(SyntaxError::EmptyTag);
                    }
                    parent.items.push(HedItem::Group(current.items));
                    parent.saw_item = true;
                    current = parent;
                }
                None => errors.push(SyntaxError::UnbalancedParentheses),
            },
        }
    }

    if !parents.is_empty() {
        errors.push(SyntaxError::UnbalancedParentheses);
    }

    if current.trailing_slot_is_empty() {
        errors.push(SyntaxError::EmptyTag);
    }
    let root = current;

    if errors.is_empty() {
        Ok(HedString { items: root.items })
    } else {
        Err(errors)
    }
}
