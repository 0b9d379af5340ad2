//! crease formatter core.
//!
//! A whitespace-only reformatter for C-family source: it never inserts,
//! deletes, or reorders tokens — it only rewrites the whitespace between
//! them.
//!
//! # Quick Start
//!
//! ```
//! use crease_fmt::{format_source, FormatStyle};
//!
//! let formatted = format_source(&FormatStyle::llvm(), "int a=1+2;");
//! assert_eq!(formatted, "int a = 1 + 2;");
//! ```
//!
//! # Architecture
//!
//! Each logical line runs through a two-stage pipeline:
//!
//! 1. **Annotation** ([`Annotator`]): every token is classified by its
//!    syntactic role (template opener/closer, pointer-or-reference vs
//!    binary operator, constructor-initializer colon, ...) and given three
//!    whitespace decisions: space required before, break permitted before,
//!    break required before.
//! 2. **Layout** ([`LineLayout`]): a memoized depth-first search with an
//!    alpha-cutoff picks the break set that keeps every physical line
//!    within the column budget at the lowest penalty. Lines that fit
//!    whole skip the search.
//!
//! Upstream of the pipeline, [`LineParser`] groups the cooked token
//! stream into [`UnwrappedLine`]s with nesting levels. Downstream, the
//! edits accumulate in [`Replacements`] and are spliced back into the
//! source.
//!
//! The core never fails: structural errors fall back to preserving the
//! original indentation, and lines that cannot fit the budget still get
//! the least-bad layout.

pub mod annotation;
pub mod annotator;
pub mod formatter;
pub mod layout;
pub mod lines;
pub mod replacement;
pub mod style;

pub use annotation::{Annotation, TokenRole};
pub use annotator::Annotator;
pub use formatter::{format_source, reformat};
pub use layout::LineLayout;
pub use lines::{LineConsumer, LineParser, UnwrappedLine};
pub use replacement::{Replacement, Replacements};
pub use style::FormatStyle;
