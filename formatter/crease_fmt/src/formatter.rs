//! The formatting driver.
//!
//! Wires the pipeline together: lex, group into logical lines, filter by
//! the requested source ranges, annotate, lay out, and collect the
//! whitespace edits.

use crease_ir::Span;
use crease_lexer::LexedTokenSource;
use crease_lexer_core::SourceBuffer;
use tracing::debug;

use crate::annotator::Annotator;
use crate::layout::LineLayout;
use crate::lines::{LineParser, UnwrappedLine};
use crate::replacement::Replacements;
use crate::style::FormatStyle;

/// Reformat the regions of `buffer` covered by `ranges`.
///
/// Logical lines whose token span is disjoint from every requested range
/// are skipped. Returns the whitespace edits; apply them with
/// [`Replacements::apply`].
pub fn reformat(style: &FormatStyle, buffer: &SourceBuffer, ranges: &[Span]) -> Replacements {
    let mut token_source = LexedTokenSource::new(buffer);
    let mut lines: Vec<UnwrappedLine> = Vec::new();
    let structural_error = LineParser::new(style, &mut token_source, &mut lines).parse();

    let mut replacements = Replacements::new();
    for line in &lines {
        if line.tokens.is_empty() {
            continue;
        }
        let line_span = line_token_span(line);
        if !ranges.iter().any(|range| touches(*range, line_span)) {
            continue;
        }

        let annotations = Annotator::new(line, style, buffer).annotate();
        LineLayout::new(
            style,
            buffer,
            line,
            &annotations,
            &mut replacements,
            structural_error,
        )
        .format();
    }

    debug!(
        lines = lines.len(),
        edits = replacements.len(),
        structural_error,
        "reformat finished"
    );
    replacements
}

/// Reformat all of `source` with `style` and return the edited text.
pub fn format_source(style: &FormatStyle, source: &str) -> String {
    let buffer = SourceBuffer::new(source);
    let ranges = [Span::new(0, buffer.len())];
    reformat(style, &buffer, &ranges).apply(source)
}

/// Byte span from the line's first token to its last.
fn line_token_span(line: &UnwrappedLine) -> Span {
    let first = line.tokens[0].tok.span;
    let last = line.tokens[line.tokens.len() - 1].tok.span;
    first.merge(last)
}

/// Inclusive overlap test between a requested range and a line span.
fn touches(range: Span, line: Span) -> bool {
    range.start <= line.end && line.start <= range.end
}
