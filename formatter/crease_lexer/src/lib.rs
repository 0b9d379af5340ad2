//! Token source for the crease formatter.
//!
//! The "cooking" half of the two-layer lexer: pulls `(RawTag, len)` pairs
//! from [`crease_lexer_core`], attaches spans, resolves raw identifiers
//! against the keyword table, collapses leading trivia into per-token
//! whitespace attributes, and splits `>>` into two `>` tokens so the
//! annotator can treat nested template closers symmetrically.
//!
//! # Usage
//!
//! ```
//! use crease_lexer::{LexedTokenSource, TokenSource};
//! use crease_lexer_core::SourceBuffer;
//! use crease_ir::TokenKind;
//!
//! let buf = SourceBuffer::new("if (x)");
//! let mut source = LexedTokenSource::new(&buf);
//! assert_eq!(source.next_token().kind(), TokenKind::If);
//! assert_eq!(source.next_token().kind(), TokenKind::LParen);
//! ```

mod keywords;
mod token_source;

pub use keywords::keyword_kind;
pub use token_source::{LexedTokenSource, TokenSource};
