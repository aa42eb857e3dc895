//! # Changeset Markup
//!
//! Lenient tokenizer and element tree for tag-delimited content, used by
//! the markup-aware diff to keep edits scoped to open tags, inner content
//! and close tags.
//!
//! This is not an HTML parser: it never rejects input and never renders.
//! It only recovers enough nesting to know which chars belong to which
//! element.

pub mod ast;
pub mod parser;
pub mod tokenizer;

pub use ast::{Fragment, Node, NodeKind};
pub use parser::{parse, Parser};
pub use tokenizer::{classify_tag, tokenize, TagKind, Token, TokenKind};
