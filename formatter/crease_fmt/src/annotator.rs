//! Token annotation.
//!
//! Consumes one logical line and produces one [`Annotation`] per token, in
//! three fixed phases:
//!
//! 1. **Bracket matching**: a speculative recursive descent pairs
//!    parentheses, square brackets, and candidate template angles, and
//!    finds constructor-initializer and conditional colons. Angle parsing
//!    may fail and rewind — the cursor is just an index, so rewinding is
//!    an assignment.
//! 2. **Role refinement**: `*`/`&` are classified as unary, binary, or
//!    pointer/reference; `+`/`-`/`++`/`--`/`!` get unary-vs-binary
//!    treatment; comments are split into line and block comments by their
//!    text.
//! 3. **Whitespace flags**: for every token after the first, decide
//!    whether a break is permitted before it, whether a space is required
//!    before it, and whether a break is mandatory.
//!
//! The annotator never fails; speculative parsing recovers by rewinding.

use crease_ir::{FormatToken, Token, TokenKind};
use crease_lexer_core::SourceBuffer;

use crate::annotation::{Annotation, TokenRole};
use crate::lines::UnwrappedLine;
use crate::style::FormatStyle;

/// Operator kinds treated as infix binary operators by the break and
/// space rules. `&` is deliberately absent (it is usually a reference),
/// as are `<`/`>` (template candidates) and `<<` (stream inserter, which
/// has its own alignment handling in the layout engine).
pub(crate) fn is_binary_operator_kind(kind: TokenKind) -> bool {
    matches!(
        kind,
        TokenKind::Eq
            | TokenKind::EqEq
            | TokenKind::NotEq
            | TokenKind::Star
            | TokenKind::Plus
            | TokenKind::Slash
            | TokenKind::Minus
            | TokenKind::AmpAmp
            | TokenKind::Pipe
            | TokenKind::PipePipe
            | TokenKind::Percent
    )
}

/// Determines extra information about the tokens comprising a logical
/// line.
pub struct Annotator<'a> {
    line: &'a UnwrappedLine,
    style: &'a FormatStyle,
    buffer: &'a SourceBuffer,
}

impl<'a> Annotator<'a> {
    pub fn new(line: &'a UnwrappedLine, style: &'a FormatStyle, buffer: &'a SourceBuffer) -> Self {
        Self {
            line,
            style,
            buffer,
        }
    }

    /// Produce one annotation per token of the line.
    pub fn annotate(&self) -> Vec<Annotation> {
        let mut annotations = vec![Annotation::default(); self.line.tokens.len()];

        BracketMatcher::new(&self.line.tokens, &mut annotations).parse_line();
        self.determine_roles(&mut annotations);
        self.compute_whitespace_flags(&mut annotations);

        annotations
    }

    // ─── Phase 2: role refinement ─────────────────────────────────────

    fn determine_roles(&self, annotations: &mut [Annotation]) {
        let tokens = &self.line.tokens;
        let mut assignment_seen = false;

        for i in 0..tokens.len() {
            let kind = tokens[i].kind();
            if matches!(
                kind,
                TokenKind::Eq
                    | TokenKind::PlusEq
                    | TokenKind::MinusEq
                    | TokenKind::StarEq
                    | TokenKind::SlashEq
            ) {
                assignment_seen = true;
            }

            if matches!(kind, TokenKind::Star | TokenKind::Amp) {
                annotations[i].role = self.star_amp_usage(i, assignment_seen, annotations);
            } else if self.is_unary_operator(i, annotations) {
                annotations[i].role = TokenRole::UnaryOperator;
            } else if is_binary_operator_kind(kind) {
                annotations[i].role = TokenRole::BinaryOperator;
            } else if kind == TokenKind::Comment {
                let span = tokens[i].tok.span;
                let text = self.buffer.text(span.start, span.end);
                annotations[i].role = if text.starts_with(b"//") {
                    TokenRole::LineComment
                } else {
                    TokenRole::BlockComment
                };
            }
        }
    }

    /// Decide between unary operator, binary operator, and
    /// pointer-or-reference for a `*` or `&` token.
    fn star_amp_usage(
        &self,
        index: usize,
        assignment_seen: bool,
        annotations: &[Annotation],
    ) -> TokenRole {
        let tokens = &self.line.tokens;

        if index == 0
            || matches!(
                tokens[index - 1].kind(),
                TokenKind::LParen | TokenKind::Comma
            )
            || annotations[index - 1].role == TokenRole::BinaryOperator
        {
            return TokenRole::UnaryOperator;
        }

        let next_is_literal = index + 1 < tokens.len() && tokens[index + 1].tok.is_literal();
        if tokens[index - 1].tok.is_literal() || next_is_literal {
            return TokenRole::BinaryOperator;
        }

        // A pointer or reference type on the right-hand side of an
        // assignment is very unlikely.
        if assignment_seen {
            return TokenRole::BinaryOperator;
        }

        TokenRole::PointerOrReference
    }

    fn is_unary_operator(&self, index: usize, annotations: &[Annotation]) -> bool {
        let tokens = &self.line.tokens;
        let kind = tokens[index].kind();

        // '++', '--' and '!' are always unary.
        if matches!(
            kind,
            TokenKind::PlusPlus | TokenKind::MinusMinus | TokenKind::Bang
        ) {
            return true;
        }

        // '*' and '&' are handled by star_amp_usage; only '+' and '-'
        // remain.
        if !matches!(kind, TokenKind::Plus | TokenKind::Minus) {
            return false;
        }

        if index == 0 {
            return true;
        }
        if matches!(
            tokens[index - 1].kind(),
            TokenKind::Eq | TokenKind::LParen | TokenKind::Comma | TokenKind::LBracket
        ) {
            return true;
        }

        annotations[index - 1].role == TokenRole::BinaryOperator
    }

    // ─── Phase 3: whitespace flags ────────────────────────────────────

    fn compute_whitespace_flags(&self, annotations: &mut [Annotation]) {
        let tokens = &self.line.tokens;
        let n = tokens.len();

        for i in 1..n {
            annotations[i].can_break_before = self.can_break_between(i);

            let role = annotations[i].role;
            let prev_role = annotations[i - 1].role;
            let cur = tokens[i].tok;
            let prev = tokens[i - 1].tok;

            if role == TokenRole::CtorInitializerColon {
                annotations[i].must_break_before = true;
                annotations[i].space_before = true;
            } else if cur.kind == TokenKind::Colon {
                annotations[i].space_before =
                    tokens[0].kind() != TokenKind::Case && i != n - 1;
            } else if prev_role == TokenRole::UnaryOperator {
                annotations[i].space_before = false;
            } else if role == TokenRole::UnaryOperator {
                // No space after an opening delimiter, and none before a
                // postfix ++/-- (identifier or closer on the left).
                annotations[i].space_before = !matches!(
                    prev.kind,
                    TokenKind::LParen
                        | TokenKind::LBracket
                        | TokenKind::Ident
                        | TokenKind::RParen
                        | TokenKind::RBracket
                );
            } else if prev.kind == TokenKind::Gt && cur.kind == TokenKind::Gt {
                annotations[i].space_before = if role == TokenRole::TemplateCloser
                    && prev_role == TokenRole::TemplateCloser
                {
                    self.style.split_template_closing_greater
                } else {
                    false
                };
            } else if role == TokenRole::BinaryOperator || prev_role == TokenRole::BinaryOperator
            {
                annotations[i].space_before = true;
            } else if prev_role == TokenRole::TemplateCloser && cur.kind == TokenKind::LParen {
                annotations[i].space_before = false;
            } else if cur.kind == TokenKind::Lt && tokens[0].kind() == TokenKind::Hash {
                annotations[i].space_before = true;
            } else {
                annotations[i].space_before = self.space_required_between(prev, cur);
            }

            if prev_role == TokenRole::LineComment
                || (cur.kind == TokenKind::Str && prev.kind == TokenKind::Str)
            {
                annotations[i].must_break_before = true;
            }

            if annotations[i].must_break_before {
                annotations[i].can_break_before = true;
            }
        }
    }

    fn can_break_between(&self, i: usize) -> bool {
        let left = self.line.tokens[i - 1].tok;
        let right = self.line.tokens[i].tok;

        if matches!(
            right.kind,
            TokenKind::RParen | TokenKind::LBrace | TokenKind::Comment | TokenKind::Gt
        ) {
            return false;
        }
        if is_binary_operator_kind(left.kind)
            || matches!(right.kind, TokenKind::Shl | TokenKind::Arrow | TokenKind::Dot)
        {
            return true;
        }
        right.kind == TokenKind::Colon
            || matches!(
                left.kind,
                TokenKind::Comma
                    | TokenKind::Semicolon
                    | TokenKind::Eq
                    | TokenKind::AmpAmp
                    | TokenKind::PipePipe
                    | TokenKind::LBrace
            )
            || (left.kind == TokenKind::LParen && right.kind != TokenKind::RParen)
    }

    /// Pairwise spacing table. Evaluated in order; first match wins;
    /// defaults to a space.
    fn space_required_between(&self, left: Token, right: Token) -> bool {
        use TokenKind::*;

        if matches!(right.kind, RParen | Semicolon | Comma) {
            return false;
        }
        // Empty block: `{}`.
        if left.kind == LBrace && right.kind == RBrace {
            return false;
        }
        if left.kind == Template && right.kind == Lt {
            return true;
        }
        if left.kind == Arrow || right.kind == Arrow {
            return false;
        }
        if matches!(left.kind, Bang | Tilde) {
            return false;
        }
        if left.kind == Lt || matches!(right.kind, Gt | Lt) {
            return false;
        }
        if matches!(right.kind, Amp | Star) {
            return left.is_literal()
                || (!matches!(left.kind, Star | Amp)
                    && !self.style.pointer_and_reference_bind_to_type);
        }
        if matches!(left.kind, Amp | Star) {
            return right.is_literal() || self.style.pointer_and_reference_bind_to_type;
        }
        if right.kind == Star && left.kind == LParen {
            return false;
        }
        if left.kind == LBracket || right.kind == LBracket || right.kind == RBracket {
            return false;
        }
        if left.kind == ColonColon
            || (right.kind == ColonColon && (left.is_any_identifier() || left.kind == Gt))
        {
            return false;
        }
        if left.kind == Dot || right.kind == Dot {
            return false;
        }
        if left.kind == Colon || right.kind == Colon {
            return true;
        }
        if (matches!(left.kind, PlusPlus | MinusMinus) && right.is_any_identifier())
            || (left.is_any_identifier() && matches!(right.kind, PlusPlus | MinusMinus))
        {
            return false;
        }
        if left.kind == LParen {
            return false;
        }
        if left.kind == Hash {
            return false;
        }
        if right.kind == LParen {
            return !left.is_any_identifier() || is_if_for_while(left.kind);
        }
        true
    }
}

fn is_if_for_while(kind: TokenKind) -> bool {
    matches!(kind, TokenKind::If | TokenKind::For | TokenKind::While)
}

/// Speculative matcher for brackets, template angles, and ternaries.
///
/// Walks the line left to right with one cursor index. An angle group is
/// parsed optimistically; on failure the index is rewound so the tokens
/// inside are reinterpreted at the outer level.
struct BracketMatcher<'a> {
    tokens: &'a [FormatToken],
    annotations: &'a mut [Annotation],
    index: usize,
}

impl<'a> BracketMatcher<'a> {
    fn new(tokens: &'a [FormatToken], annotations: &'a mut [Annotation]) -> Self {
        Self {
            tokens,
            annotations,
            index: 0,
        }
    }

    fn parse_line(&mut self) {
        while self.index < self.tokens.len() {
            self.consume_token();
        }
    }

    fn consume_token(&mut self) {
        let current = self.index;
        self.next();
        match self.tokens[current].kind() {
            TokenKind::LParen => {
                self.parse_parens();
                // A colon right after the closing paren introduces a
                // constructor initializer list.
                if self.index < self.tokens.len()
                    && self.tokens[self.index].kind() == TokenKind::Colon
                {
                    self.annotations[self.index].role = TokenRole::CtorInitializerColon;
                    self.next();
                }
            }
            TokenKind::LBracket => {
                self.parse_square();
            }
            TokenKind::Lt => {
                if self.parse_angle() {
                    self.annotations[current].role = TokenRole::TemplateOpener;
                } else {
                    self.annotations[current].role = TokenRole::BinaryOperator;
                    self.index = current + 1;
                }
            }
            TokenKind::Gt => {
                // A '>' outside a successful angle group compares.
                self.annotations[current].role = TokenRole::BinaryOperator;
            }
            TokenKind::Operator => {
                if self.index < self.tokens.len()
                    && self.tokens[self.index].kind() != TokenKind::LParen
                {
                    self.annotations[self.index].role = TokenRole::OverloadedOperator;
                }
                self.next();
            }
            TokenKind::Question => {
                self.parse_conditional();
            }
            _ => {}
        }
    }

    /// Try to read the rest of an angle group after a `<`.
    ///
    /// Fails on tokens that make a template interpretation impossible.
    fn parse_angle(&mut self) -> bool {
        while self.index < self.tokens.len() {
            match self.tokens[self.index].kind() {
                TokenKind::Gt => {
                    self.annotations[self.index].role = TokenRole::TemplateCloser;
                    self.next();
                    return true;
                }
                TokenKind::RParen | TokenKind::RBracket => return false,
                TokenKind::PipePipe
                | TokenKind::AmpAmp
                | TokenKind::Question
                | TokenKind::Colon => return false,
                _ => self.consume_token(),
            }
        }
        false
    }

    fn parse_parens(&mut self) -> bool {
        while self.index < self.tokens.len() {
            match self.tokens[self.index].kind() {
                TokenKind::RParen => {
                    self.next();
                    return true;
                }
                TokenKind::RBracket => return false,
                _ => self.consume_token(),
            }
        }
        false
    }

    fn parse_square(&mut self) -> bool {
        while self.index < self.tokens.len() {
            match self.tokens[self.index].kind() {
                TokenKind::RBracket => {
                    self.next();
                    return true;
                }
                TokenKind::RParen => return false,
                _ => self.consume_token(),
            }
        }
        false
    }

    fn parse_conditional(&mut self) -> bool {
        while self.index < self.tokens.len() {
            match self.tokens[self.index].kind() {
                TokenKind::Colon => {
                    self.annotations[self.index].role = TokenRole::ConditionalColon;
                    self.next();
                    return true;
                }
                _ => self.consume_token(),
            }
        }
        false
    }

    fn next(&mut self) {
        self.index += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lines::{LineParser, UnwrappedLine};
    use crease_lexer::LexedTokenSource;

    /// Lex `source`, take its first logical line, and annotate it.
    fn annotate_first_line(
        style: &FormatStyle,
        source: &str,
    ) -> (UnwrappedLine, Vec<Annotation>) {
        let buffer = SourceBuffer::new(source);
        let mut token_source = LexedTokenSource::new(&buffer);
        let mut lines: Vec<UnwrappedLine> = Vec::new();
        LineParser::new(style, &mut token_source, &mut lines).parse();
        let line = lines.into_iter().next().expect("source has a line");
        let annotations = Annotator::new(&line, style, &buffer).annotate();
        (line, annotations)
    }

    fn roles(style: &FormatStyle, source: &str) -> Vec<TokenRole> {
        let (_, annotations) = annotate_first_line(style, source);
        annotations.iter().map(|a| a.role).collect()
    }

    #[test]
    fn angle_group_marks_template_pair() {
        let style = FormatStyle::llvm();
        // A < B < C > > ;
        let r = roles(&style, "A<B<C> >;");
        assert_eq!(r[1], TokenRole::TemplateOpener);
        assert_eq!(r[3], TokenRole::TemplateOpener);
        assert_eq!(r[5], TokenRole::TemplateCloser);
        assert_eq!(r[6], TokenRole::TemplateCloser);
    }

    #[test]
    fn failed_angle_rewinds_to_comparison() {
        let style = FormatStyle::llvm();
        // 'a < b && c > d' cannot be a template.
        let r = roles(&style, "bool x = a < b && c > d;");
        assert_eq!(r[4], TokenRole::BinaryOperator); // <
        assert_eq!(r[8], TokenRole::BinaryOperator); // >
    }

    #[test]
    fn angle_failure_on_closing_paren() {
        let style = FormatStyle::llvm();
        let r = roles(&style, "f(a < b);");
        assert_eq!(r[3], TokenRole::BinaryOperator); // <
    }

    #[test]
    fn ctor_initializer_colon_found() {
        let style = FormatStyle::llvm();
        let (line, annotations) = annotate_first_line(&style, "C() : a(1) {}");
        let colon_index = line
            .tokens
            .iter()
            .position(|t| t.kind() == TokenKind::Colon)
            .expect("has colon");
        assert_eq!(
            annotations[colon_index].role,
            TokenRole::CtorInitializerColon
        );
        assert!(annotations[colon_index].must_break_before);
        assert!(annotations[colon_index].can_break_before);
    }

    #[test]
    fn conditional_colon_found() {
        let style = FormatStyle::llvm();
        let r = roles(&style, "x = a ? b : c;");
        assert_eq!(r[5], TokenRole::ConditionalColon);
    }

    #[test]
    fn overloaded_operator_marked() {
        let style = FormatStyle::llvm();
        let r = roles(&style, "void operator<(S s);");
        assert_eq!(r[2], TokenRole::OverloadedOperator);
    }

    #[test]
    fn star_classification() {
        let style = FormatStyle::llvm();

        // Declaration: pointer.
        let r = roles(&style, "int *a;");
        assert_eq!(r[1], TokenRole::PointerOrReference);

        // After assignment: binary.
        let r = roles(&style, "a = b * c;");
        assert_eq!(r[3], TokenRole::BinaryOperator);

        // Next to a literal: binary.
        let r = roles(&style, "int x = a * 2;");
        assert_eq!(r[4], TokenRole::BinaryOperator);

        // After '(' or ',': unary (dereference).
        let r = roles(&style, "f(*p);");
        assert_eq!(r[2], TokenRole::UnaryOperator);
    }

    #[test]
    fn amp_classification() {
        let style = FormatStyle::llvm();
        let r = roles(&style, "int &a;");
        assert_eq!(r[1], TokenRole::PointerOrReference);
    }

    #[test]
    fn plus_minus_classification() {
        let style = FormatStyle::llvm();

        let r = roles(&style, "x = -1;");
        assert_eq!(r[2], TokenRole::UnaryOperator);

        let r = roles(&style, "x = a - 1;");
        assert_eq!(r[3], TokenRole::BinaryOperator);

        let r = roles(&style, "f(-a, -b);");
        assert_eq!(r[2], TokenRole::UnaryOperator);
        assert_eq!(r[5], TokenRole::UnaryOperator);
    }

    #[test]
    fn increment_and_not_are_unary() {
        let style = FormatStyle::llvm();
        let r = roles(&style, "++i;");
        assert_eq!(r[0], TokenRole::UnaryOperator);
        let r = roles(&style, "if (!a) b;");
        assert_eq!(r[2], TokenRole::UnaryOperator);
    }

    #[test]
    fn comment_roles_by_text() {
        let style = FormatStyle::llvm();
        let r = roles(&style, "// line");
        assert_eq!(r[0], TokenRole::LineComment);
        let r = roles(&style, "/* block */");
        assert_eq!(r[0], TokenRole::BlockComment);
    }

    #[test]
    fn adjacent_string_literals_must_break() {
        let style = FormatStyle::llvm();
        let (_, annotations) = annotate_first_line(&style, "f(\"a\" \"b\");");
        assert!(annotations[3].must_break_before);
        assert!(annotations[3].can_break_before);
    }

    #[test]
    fn token_after_line_comment_must_break() {
        let style = FormatStyle::llvm();
        let (_, annotations) = annotate_first_line(&style, "int a = // c\n    5;");
        // tokens: int a = // c 5 ;
        assert!(annotations[4].must_break_before);
    }

    #[test]
    fn no_break_before_closers_and_comments() {
        let style = FormatStyle::llvm();
        let (line, annotations) = annotate_first_line(&style, "f(a); // done");
        let rparen = line
            .tokens
            .iter()
            .position(|t| t.kind() == TokenKind::RParen)
            .expect("has rparen");
        assert!(!annotations[rparen].can_break_before);
        let comment = line.tokens.len() - 1;
        assert!(!annotations[comment].can_break_before);
    }

    #[test]
    fn break_permitted_after_binary_operator() {
        let style = FormatStyle::llvm();
        // a = b + c ;  — break allowed before 'b' (after '='), and before
        // 'c' (after '+'), but not before '+' itself.
        let (_, annotations) = annotate_first_line(&style, "a = b + c;");
        assert!(annotations[2].can_break_before); // b (left is '=')
        assert!(!annotations[3].can_break_before); // '+' (left is ident)
        assert!(annotations[4].can_break_before); // c (left is '+')
    }

    #[test]
    fn space_grid_simple_statement() {
        let style = FormatStyle::llvm();
        let (_, annotations) = annotate_first_line(&style, "int a=1+2;");
        let spaces: Vec<bool> = annotations.iter().skip(1).map(|a| a.space_before).collect();
        // int |a| = |1| + |2| ;
        assert_eq!(spaces, vec![true, true, true, true, true, false]);
    }

    #[test]
    fn postfix_increment_has_no_space() {
        let style = FormatStyle::llvm();
        let (_, annotations) = annotate_first_line(&style, "i++;");
        assert!(!annotations[1].space_before);
        let (_, annotations) = annotate_first_line(&style, "++i;");
        assert!(!annotations[1].space_before);
    }

    #[test]
    fn pointer_binding_follows_style() {
        let llvm = FormatStyle::llvm();
        let (_, annotations) = annotate_first_line(&llvm, "int *a;");
        assert!(annotations[1].space_before); // int *a
        assert!(!annotations[2].space_before);

        let google = FormatStyle::google();
        let (_, annotations) = annotate_first_line(&google, "int *a;");
        assert!(!annotations[1].space_before); // int* a
        assert!(annotations[2].space_before);
    }

    #[test]
    fn template_closer_spacing_follows_style() {
        let llvm = FormatStyle::llvm();
        let (_, annotations) = annotate_first_line(&llvm, "A<B<C> > x;");
        assert!(annotations[6].space_before); // '> >'

        let google = FormatStyle::google();
        let (_, annotations) = annotate_first_line(&google, "A<B<C> > x;");
        assert!(!annotations[6].space_before); // '>>'
    }

    #[test]
    fn include_angle_gets_space_after_directive_name() {
        let style = FormatStyle::llvm();
        let (_, annotations) = annotate_first_line(&style, "#include <vector>\n");
        // # include < vector >
        assert!(!annotations[1].space_before); // '#include'
        assert!(annotations[2].space_before); // 'include <'
        assert!(!annotations[3].space_before); // '<vector'
        assert!(!annotations[4].space_before); // 'vector>'
    }

    #[test]
    fn call_vs_keyword_parens() {
        let style = FormatStyle::llvm();
        let (_, annotations) = annotate_first_line(&style, "if (x) f(x);");
        assert!(annotations[1].space_before); // if (
        let (_, annotations) = annotate_first_line(&style, "f(x);");
        assert!(!annotations[1].space_before); // f(
    }

    #[test]
    fn case_line_colon_has_no_space() {
        let style = FormatStyle::llvm();
        let (line, annotations) = annotate_first_line(&style, "case 1: f();");
        assert_eq!(line.tokens[2].kind(), TokenKind::Colon);
        assert!(!annotations[2].space_before);
    }

    #[test]
    fn ternary_colon_keeps_spaces() {
        let style = FormatStyle::llvm();
        let (_, annotations) = annotate_first_line(&style, "x = a ? b : c;");
        assert!(annotations[5].space_before); // ':' mid-line
        assert!(annotations[6].space_before); // 'c' after ':'
    }
}
