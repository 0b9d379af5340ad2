//! Logical-line grouping.
//!
//! The line parser walks the cooked token stream and groups tokens into
//! [`UnwrappedLine`]s — maximal statement-like units carrying a nesting
//! level. It understands just enough block structure to assign levels:
//! statements end at `;`, braces open and close blocks, preprocessor
//! directives span one physical line, and labels get their own lines.
//!
//! The parser never fails. Unmatched braces set a structural-error flag,
//! which tells the layout engine to preserve original indentation instead
//! of recomputing it.

use crease_ir::{FormatToken, TokenKind};
use crease_lexer::TokenSource;
use tracing::debug;

use crate::style::FormatStyle;

/// An ordered, non-empty sequence of tokens plus a nesting level.
///
/// A logical line may exceed the column limit; breaking it into physical
/// lines is the layout engine's job.
#[derive(Clone, Debug)]
pub struct UnwrappedLine {
    /// The tokens of the line, in source order.
    pub tokens: Vec<FormatToken>,
    /// Nesting level: 0 at top scope, >= 1 inside blocks.
    pub level: u32,
}

/// Receives logical lines as the parser produces them.
pub trait LineConsumer {
    fn consume_line(&mut self, line: UnwrappedLine);
}

impl LineConsumer for Vec<UnwrappedLine> {
    fn consume_line(&mut self, line: UnwrappedLine) {
        self.push(line);
    }
}

/// Groups cooked tokens into logical lines.
pub struct LineParser<'a, S: TokenSource, C: LineConsumer> {
    style: &'a FormatStyle,
    source: &'a mut S,
    consumer: &'a mut C,
    /// One-token lookahead.
    current: FormatToken,
    /// Second lookahead slot, filled on demand by `peek`.
    peeked: Option<FormatToken>,
    line: Vec<FormatToken>,
    level: u32,
    error: bool,
}

impl<'a, S: TokenSource, C: LineConsumer> LineParser<'a, S, C> {
    pub fn new(style: &'a FormatStyle, source: &'a mut S, consumer: &'a mut C) -> Self {
        let current = source.next_token();
        Self {
            style,
            source,
            consumer,
            current,
            peeked: None,
            line: Vec::new(),
            level: 0,
            error: false,
        }
    }

    /// Parse the whole token stream into logical lines.
    ///
    /// Returns `true` if a structural error (unmatched brace) was found.
    pub fn parse(mut self) -> bool {
        loop {
            self.parse_level();
            if self.current.kind() == TokenKind::Eof {
                break;
            }
            // An unmatched `}` at the top level gets its own line.
            self.error = true;
            self.push_current();
            self.flush_line();
        }
        debug!(error = self.error, "grouped tokens into logical lines");
        self.error
    }

    /// Parse elements until EOF or a `}` belonging to the caller.
    fn parse_level(&mut self) {
        loop {
            match self.current.kind() {
                TokenKind::Eof | TokenKind::RBrace => return,
                _ => self.parse_structural_element(),
            }
        }
    }

    fn parse_structural_element(&mut self) {
        debug_assert!(self.line.is_empty());

        // Preprocessor directive: `#` opening a physical line, extending to
        // the last token on it. Always at column 0.
        if self.current.kind() == TokenKind::Hash && self.starts_physical_line() {
            self.parse_pp_directive();
            return;
        }

        // A comment with nothing after it on its physical line.
        if self.current.kind() == TokenKind::Comment && self.next_is_on_new_line() {
            self.push_current();
            self.flush_line();
            return;
        }

        // Access specifier labels: `public:` etc.
        if matches!(
            self.current.kind(),
            TokenKind::Public | TokenKind::Protected | TokenKind::Private
        ) && self.peek().kind() == TokenKind::Colon
        {
            self.push_current();
            self.push_current();
            self.attach_trailing_comments();
            self.flush_line();
            return;
        }

        // case / default labels.
        if matches!(self.current.kind(), TokenKind::Case | TokenKind::Default) {
            self.parse_case_label();
            return;
        }

        let starts_switch = self.current.kind() == TokenKind::Switch;
        // Semicolons and braces inside parens or brackets (for headers,
        // array subscripts) do not end the statement.
        let mut nesting = 0u32;
        loop {
            match self.current.kind() {
                TokenKind::Eof => {
                    self.flush_line();
                    return;
                }
                TokenKind::LParen | TokenKind::LBracket => {
                    nesting += 1;
                    self.push_current();
                }
                TokenKind::RParen | TokenKind::RBracket => {
                    nesting = nesting.saturating_sub(1);
                    self.push_current();
                }
                _ if nesting > 0 => self.push_current(),
                TokenKind::LBrace => {
                    if self.peek().kind() == TokenKind::RBrace {
                        // Empty block stays on the line: `{}` plus an
                        // optional trailing `;`.
                        self.push_current();
                        self.push_current();
                        if self.current.kind() == TokenKind::Semicolon {
                            self.push_current();
                        }
                        self.attach_trailing_comments();
                        self.flush_line();
                    } else {
                        self.parse_block(starts_switch);
                    }
                    return;
                }
                TokenKind::RBrace => {
                    // The closer belongs to the enclosing block (e.g. a
                    // braced initializer ended the statement). Whether it
                    // is matched is decided by the caller.
                    self.flush_line();
                    return;
                }
                TokenKind::Semicolon => {
                    self.push_current();
                    self.attach_trailing_comments();
                    self.flush_line();
                    return;
                }
                _ => self.push_current(),
            }
        }
    }

    /// Parse a braced block: the `{` ends the current line, the body is
    /// one level deeper, and the matching `}` gets its own line.
    ///
    /// Switch bodies add a level for the case labels when the style asks
    /// for indented case labels.
    fn parse_block(&mut self, is_switch: bool) {
        self.push_current(); // '{'
        self.attach_trailing_comments();
        self.flush_line();

        let prev_level = self.level;
        self.level += if is_switch && self.style.indent_case_labels {
            2
        } else {
            1
        };
        self.parse_level();
        self.level = prev_level;

        if self.current.kind() == TokenKind::RBrace {
            self.push_current();
            if self.current.kind() == TokenKind::Semicolon {
                self.push_current();
            }
            self.attach_trailing_comments();
            self.flush_line();
        } else {
            // EOF before the matching '}'.
            self.error = true;
            self.flush_line();
        }
    }

    /// A `case`/`default` label: tokens up to and including the `:`,
    /// flushed one level shallower than the statements it governs.
    fn parse_case_label(&mut self) {
        loop {
            match self.current.kind() {
                TokenKind::Colon => {
                    self.push_current();
                    break;
                }
                TokenKind::Eof
                | TokenKind::Semicolon
                | TokenKind::LBrace
                | TokenKind::RBrace => break,
                _ => self.push_current(),
            }
        }
        self.attach_trailing_comments();
        self.flush_line_at(self.level.saturating_sub(1));
    }

    fn parse_pp_directive(&mut self) {
        self.push_current(); // '#'
        while self.current.kind() != TokenKind::Eof && self.current.newlines_before == 0 {
            self.push_current();
        }
        self.flush_line_at(0);
    }

    /// Pull comments that share the physical line into the current line,
    /// so trailing comments stay attached to their statement.
    fn attach_trailing_comments(&mut self) {
        while self.current.kind() == TokenKind::Comment && self.current.newlines_before == 0 {
            self.push_current();
        }
    }

    fn starts_physical_line(&self) -> bool {
        self.current.newlines_before > 0
            || self.current.whitespace.map_or(false, |w| w.start == 0)
    }

    fn next_is_on_new_line(&mut self) -> bool {
        let next = self.peek();
        next.kind() == TokenKind::Eof || next.newlines_before > 0
    }

    fn peek(&mut self) -> &FormatToken {
        if self.peeked.is_none() {
            self.peeked = Some(self.source.next_token());
        }
        self.peeked.as_ref().unwrap_or(&self.current)
    }

    fn push_current(&mut self) {
        let next = match self.peeked.take() {
            Some(tok) => tok,
            None => self.source.next_token(),
        };
        self.line.push(std::mem::replace(&mut self.current, next));
    }

    fn flush_line(&mut self) {
        self.flush_line_at(self.level);
    }

    fn flush_line_at(&mut self, level: u32) {
        if self.line.is_empty() {
            return;
        }
        let tokens = std::mem::take(&mut self.line);
        self.consumer.consume_line(UnwrappedLine { tokens, level });
    }
}
