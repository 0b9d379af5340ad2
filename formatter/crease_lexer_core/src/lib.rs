//! Low-level tokenizer for C-family source code.
//!
//! This crate is the "raw" half of crease's two-layer lexer architecture:
//!
//! - **`crease_lexer_core`** (this crate): produces `(RawTag, len)` pairs from
//!   raw bytes. Whitespace is preserved as tokens, comments are real tokens,
//!   and nothing is resolved against the keyword table.
//! - **`crease_lexer`**: "cooks" raw tokens into formatter-ready form with
//!   spans, keyword resolution, and leading-whitespace attribution.
//!
//! The raw scanner never fails: malformed input (unterminated literals,
//! stray bytes) is encoded as error *tags* whose text the formatter passes
//! through untouched.
//!
//! # Usage
//!
//! ```
//! use crease_lexer_core::{RawScanner, RawTag, SourceBuffer};
//!
//! let buf = SourceBuffer::new("int a;");
//! let mut scanner = RawScanner::new(buf.cursor());
//! let tok = scanner.next_token();
//! assert_eq!(tok.tag, RawTag::Ident);
//! assert_eq!(tok.len, 3);
//! ```

mod cursor;
mod raw_scanner;
mod source_buffer;
mod tag;

pub use cursor::Cursor;
pub use raw_scanner::RawScanner;
pub use source_buffer::SourceBuffer;
pub use tag::{RawTag, RawToken};
