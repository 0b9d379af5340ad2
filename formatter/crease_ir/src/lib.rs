//! Shared token model for the crease formatter.
//!
//! Holds the types that cross the lexer/formatter boundary: byte [`Span`]s,
//! the closed [`TokenKind`] enumeration, plain [`Token`]s, and
//! [`FormatToken`]s carrying the leading-whitespace attributes the layout
//! engine edits.

mod span;
mod token;

pub use span::{Span, SpanError};
pub use token::{FormatToken, Token, TokenKind};
