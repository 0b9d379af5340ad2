//! Layout of one annotated logical line.
//!
//! Places the first token from the line's nesting level (or its original
//! column on structural errors), then decides for every following token
//! whether to break before it. If the whole line fits within the column
//! budget it is committed directly; otherwise a memoized depth-first
//! search with an alpha-cutoff finds the break set with the lowest
//! penalty.
//!
//! The search state is a value type: current column, tokens consumed, and
//! three parallel stacks keyed by the bracket depth inside the line.
//! Copying it at each node is cheap — the stacks are bounded by the
//! deepest brackets on one line.

use crease_ir::{FormatToken, TokenKind};
use crease_lexer_core::SourceBuffer;
use rustc_hash::FxHashMap;
use tracing::trace;

use crate::annotation::{Annotation, TokenRole};
use crate::lines::UnwrappedLine;
use crate::replacement::Replacements;
use crate::style::FormatStyle;

/// Penalty charged per stack level for every line break.
const PENALTY_INDENT_LEVEL: u32 = 5;

/// Unreachable-layout marker.
const INFINITY: u32 = u32::MAX;

/// The mutable state while laying out a line.
///
/// The three stacks always have identical length: one entry per unclosed
/// `(`, `[`, or template opener, plus the base entry.
#[derive(Clone, PartialEq, Eq, Hash)]
struct LayoutState {
    /// The number of used columns in the current physical line.
    column: u32,
    /// The number of tokens already placed.
    consumed: u32,
    /// Per depth: the column a line break inside that depth lands on.
    indent: Vec<u32>,
    /// Per depth: the column of the most recent space.
    ///
    /// Used to continue e.g.
    /// `functionCall(Parameter, otherCall(` / `OtherParameter));`
    last_space: Vec<u32>,
    /// Per depth: the column of the first `<<` seen, 0 if none.
    /// Aligns chained stream inserters.
    first_less_less: Vec<u32>,
}

/// Lays out one annotated line, appending whitespace edits.
pub struct LineLayout<'a> {
    style: &'a FormatStyle,
    buffer: &'a SourceBuffer,
    line: &'a UnwrappedLine,
    annotations: &'a [Annotation],
    replacements: &'a mut Replacements,
    structural_error: bool,
    /// Memoized search results: post-placement state -> (penalty, the
    /// alpha bound it was computed under).
    memo: FxHashMap<LayoutState, (u32, u32)>,
}

impl<'a> LineLayout<'a> {
    pub fn new(
        style: &'a FormatStyle,
        buffer: &'a SourceBuffer,
        line: &'a UnwrappedLine,
        annotations: &'a [Annotation],
        replacements: &'a mut Replacements,
        structural_error: bool,
    ) -> Self {
        debug_assert_eq!(line.tokens.len(), annotations.len());
        Self {
            style,
            buffer,
            line,
            annotations,
            replacements,
            structural_error,
            memo: FxHashMap::default(),
        }
    }

    /// Lay out the line and emit its whitespace edits.
    pub fn format(&mut self) {
        let indent = self.format_first_token();

        let mut state = LayoutState {
            column: indent,
            consumed: 0,
            indent: vec![indent + 4],
            last_space: vec![indent],
            first_less_less: vec![0],
        };
        // The first token has been placed by format_first_token.
        self.move_to_next(&mut state);

        let n = self.line.tokens.len();

        // Single-line fast path: if everything fits without a mandatory
        // break, that is the optimum and the search is skipped. The
        // constructor-initializer colon only has to break when the line
        // does not fit.
        let mut fits_on_a_line = true;
        let mut columns = state.column;
        for i in 1..n {
            columns += u32::from(self.annotations[i].space_before) + self.line.tokens[i].tok.len();
            if columns > self.style.column_limit
                || (self.annotations[i].must_break_before
                    && self.annotations[i].role != TokenRole::CtorInitializerColon)
            {
                fits_on_a_line = false;
                break;
            }
        }

        for _ in 1..n {
            if fits_on_a_line {
                self.add_token(false, false, &mut state);
            } else {
                let no_break = self.calc_penalty(state.clone(), false, INFINITY);
                let with_break = self.calc_penalty(state.clone(), true, no_break);
                let newline = if no_break == INFINITY {
                    // Even an over-budget break beats an impossible
                    // continuation, but only where breaking is permitted.
                    self.annotations[state.consumed as usize].can_break_before
                } else {
                    with_break < no_break
                };
                trace!(
                    token = state.consumed,
                    no_break,
                    with_break,
                    newline,
                    "layout decision"
                );
                self.add_token(newline, false, &mut state);
            }
        }
    }

    /// Place the first token and return the line's indent.
    ///
    /// Falls back to the token's original source column when a structural
    /// error was reported or no whitespace was recorded; no edit is
    /// emitted in that case.
    fn format_first_token(&mut self) -> u32 {
        let token = self.line.tokens[0];
        let Some(whitespace) = token.whitespace else {
            return self.buffer.column_at(token.tok.span.start).saturating_sub(1);
        };
        if self.structural_error {
            return self.buffer.column_at(token.tok.span.start).saturating_sub(1);
        }

        let mut newlines = token
            .newlines_before
            .min(self.style.max_empty_lines_to_keep + 1);
        // Tokens not at the very start of the file stay on their own line.
        if newlines == 0 && whitespace.start != 0 {
            newlines = 1;
        }

        let mut indent = self.line.level * 2;
        if matches!(
            token.kind(),
            TokenKind::Public | TokenKind::Protected | TokenKind::Private
        ) && indent as i64 + i64::from(self.style.access_modifier_offset) >= 0
        {
            indent = (indent as i64 + i64::from(self.style.access_modifier_offset)) as u32;
        }

        self.replace_whitespace(&token, newlines, indent);
        indent
    }

    /// Place the next token, breaking before it if `newline` is set.
    ///
    /// When `dry_run` is set no edit is emitted — the search uses this to
    /// simulate placements on copied states.
    fn add_token(&mut self, newline: bool, dry_run: bool, state: &mut LayoutState) {
        let index = state.consumed as usize;
        let current = self.line.tokens[index];
        let previous = self.line.tokens[index - 1];
        let depth = state.indent.len() - 1;

        if newline {
            if current.kind() == TokenKind::Str && previous.kind() == TokenKind::Str {
                // Consecutive string literals stack left-aligned.
                state.column = state.column.saturating_sub(previous.tok.len());
            } else if current.kind() == TokenKind::Shl && state.first_less_less[depth] != 0 {
                state.column = state.first_less_less[depth];
            } else if depth != 0
                && (previous.kind() == TokenKind::Eq
                    || current.kind() == TokenKind::Arrow
                    || current.kind() == TokenKind::Dot)
            {
                // Indent 4 extra spaces after '=' as it continues an
                // expression; the top level already indents 4.
                state.column = state.indent[depth] + 4;
            } else {
                state.column = state.indent[depth];
            }

            if !dry_run {
                self.replace_whitespace(&current, 1, state.column);
            }

            state.last_space[depth] = state.indent[depth];
            if current.kind() == TokenKind::Colon
                && self.annotations[index].role != TokenRole::ConditionalColon
            {
                state.indent[depth] += 2;
            }
        } else {
            let mut spaces = u32::from(self.annotations[index].space_before);
            if self.annotations[index].role == TokenRole::LineComment {
                spaces = 2;
            }

            if !dry_run {
                self.replace_whitespace(&current, 0, spaces);
            }

            if previous.kind() == TokenKind::LParen
                || self.annotations[index - 1].role == TokenRole::TemplateOpener
            {
                state.indent[depth] = state.column;
            }

            state.column += spaces;
            // Top-level spaces are exempt; that mostly gives better
            // results.
            if spaces > 0 && depth != 0 {
                state.last_space[depth] = state.column;
            }
        }

        self.move_to_next(state);
    }

    /// Mark the next token as consumed and maintain the stacks.
    fn move_to_next(&self, state: &mut LayoutState) {
        let index = state.consumed as usize;
        let current = &self.line.tokens[index];
        let depth = state.indent.len() - 1;
        let role = self.annotations[index].role;

        if current.kind() == TokenKind::Shl && state.first_less_less[depth] == 0 {
            state.first_less_less[depth] = state.column;
        }

        state.column += current.tok.len();

        // An opening (, [ or template < adds a level to the stacks for
        // the tokens that follow.
        if matches!(current.kind(), TokenKind::LParen | TokenKind::LBracket)
            || role == TokenRole::TemplateOpener
        {
            let last = state.last_space.last().copied().unwrap_or(0);
            state.indent.push(4 + last);
            state.last_space.push(last);
            state.first_less_less.push(0);
        }

        // A closing ), ] or template > removes one. The base level stays:
        // unbalanced lines must not drain the stacks.
        if (matches!(current.kind(), TokenKind::RParen | TokenKind::RBracket)
            || role == TokenRole::TemplateCloser)
            && state.indent.len() > 1
        {
            state.indent.pop();
            state.last_space.pop();
            state.first_less_less.pop();
        }

        state.consumed += 1;
    }

    /// Penalty for breaking after the token at `index`.
    fn split_penalty(&self, index: usize) -> u32 {
        debug_assert!(index + 1 < self.line.tokens.len());
        let left = self.line.tokens[index].tok;
        let right = self.line.tokens[index + 1].tok;

        if matches!(left.kind, TokenKind::Semicolon | TokenKind::Comma) {
            return 0;
        }
        if matches!(
            left.kind,
            TokenKind::Eq | TokenKind::LParen | TokenKind::PipePipe | TokenKind::AmpAmp
        ) {
            return 2;
        }
        if matches!(right.kind, TokenKind::Arrow | TokenKind::Dot) {
            return 200;
        }
        3
    }

    /// Upper-bound estimate of the additional penalty from this decision
    /// onward, with an alpha-cutoff at `stop_at`.
    ///
    /// Returns [`INFINITY`] for layouts that are impossible (mandatory
    /// break skipped, forbidden break taken, column budget exceeded) or
    /// provably at least as bad as a known alternative.
    fn calc_penalty(&mut self, state: LayoutState, newline: bool, mut stop_at: u32) -> u32 {
        let mut state = state;

        // Past the end of the line: nothing more to pay.
        if state.consumed as usize >= self.line.tokens.len() {
            return 0;
        }

        let index = state.consumed as usize;
        if !newline && self.annotations[index].must_break_before {
            return INFINITY;
        }
        if newline && !self.annotations[index].can_break_before {
            return INFINITY;
        }

        let mut current_penalty = 0;
        if newline {
            current_penalty +=
                PENALTY_INDENT_LEVEL * state.indent.len() as u32 + self.split_penalty(index - 1);
        }

        self.add_token(newline, true, &mut state);

        // Exceeding the column budget is never acceptable.
        if state.column > self.style.column_limit {
            return INFINITY;
        }

        if stop_at <= current_penalty {
            return INFINITY;
        }
        stop_at -= current_penalty;

        if let Some(&(saved_result, saved_stop_at)) = self.memo.get(&state) {
            // A previous visit of this state is reusable if it finished
            // without hitting its cutoff, or if its cutoff was at least as
            // generous as ours.
            if saved_result != INFINITY {
                return saved_result + current_penalty;
            }
            if stop_at <= saved_stop_at {
                return INFINITY;
            }
        }

        let no_break = self.calc_penalty(state.clone(), false, stop_at);
        let with_break = self.calc_penalty(state.clone(), true, stop_at.min(no_break));
        let result = no_break.min(with_break);

        // Stored without current_penalty: that part depends on how the
        // state was reached.
        self.memo.insert(state, (result, stop_at));

        if result == INFINITY {
            INFINITY
        } else {
            result + current_penalty
        }
    }

    /// Replace the whitespace in front of `token`. Called once per token.
    fn replace_whitespace(&mut self, token: &FormatToken, newlines: u32, spaces: u32) {
        if let Some(whitespace) = token.whitespace {
            self.replacements.add(whitespace, newlines, spaces);
        }
    }
}
