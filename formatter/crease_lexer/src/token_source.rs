//! The token source: raw tokens in, format tokens out.
//!
//! Sits between the raw scanner and the unwrapped-line parser:
//!
//! ```text
//! source → RawScanner → (RawTag, len) → LexedTokenSource → FormatToken
//! ```
//!
//! Three jobs, per token request:
//!
//! 1. **Trivia collapsing**: whitespace and newline runs become attributes
//!    of the following token (leading-whitespace span, newline count).
//! 2. **Keyword resolution**: raw identifiers are retagged via the keyword
//!    table.
//! 3. **`>>` splitting**: a `>>` is returned as a `>` of length 1 and the
//!    second `>` is stashed for the next request. The stashed `>` carries
//!    an empty whitespace span at its own start, so re-lexing formatted
//!    output never produces phantom edits.

use crease_ir::{FormatToken, Span, Token, TokenKind};
use crease_lexer_core::{RawScanner, RawTag, SourceBuffer};

use crate::keywords::keyword_kind;

/// A stream of [`FormatToken`]s.
///
/// EOF is a valid terminal token and repeats forever; pulling tokens never
/// fails.
pub trait TokenSource {
    /// Produce the next token with its leading-whitespace attributes.
    fn next_token(&mut self) -> FormatToken;
}

/// Token source backed by the raw scanner.
pub struct LexedTokenSource<'src> {
    buffer: &'src SourceBuffer,
    scanner: RawScanner<'src>,
    /// Start offset of the `>>` whose second `>` is still pending.
    stashed_greater: Option<u32>,
}

impl<'src> LexedTokenSource<'src> {
    /// Create a token source over a source buffer.
    pub fn new(buffer: &'src SourceBuffer) -> Self {
        Self {
            buffer,
            scanner: RawScanner::new(buffer.cursor()),
            stashed_greater: None,
        }
    }

    /// The underlying source buffer.
    pub fn buffer(&self) -> &'src SourceBuffer {
        self.buffer
    }
}

impl TokenSource for LexedTokenSource<'_> {
    fn next_token(&mut self) -> FormatToken {
        // A pending `>` from a split `>>`: zero leading whitespace,
        // located one byte after the first half.
        if let Some(shr_start) = self.stashed_greater.take() {
            let start = shr_start + 1;
            return FormatToken {
                tok: Token::new(TokenKind::Gt, Span::new(start, start + 1)),
                newlines_before: 0,
                whitespace: Some(Span::point(start)),
            };
        }

        let whitespace_start = self.scanner.pos();
        let mut newlines_before = 0;
        let mut whitespace_len = 0;

        loop {
            let offset = self.scanner.pos();
            let raw = self.scanner.next_token();

            if raw.tag.is_trivia() {
                if raw.tag == RawTag::Newline {
                    newlines_before += 1;
                }
                whitespace_len += raw.len;
                continue;
            }

            let whitespace = Some(Span::new(whitespace_start, whitespace_start + whitespace_len));

            // Split `>>`: emit the first `>` now, stash the second.
            if raw.tag == RawTag::Shr {
                self.stashed_greater = Some(offset);
                return FormatToken {
                    tok: Token::new(TokenKind::Gt, Span::new(offset, offset + 1)),
                    newlines_before,
                    whitespace,
                };
            }

            let span = Span::new(offset, offset + raw.len);
            let kind = self.cook(raw.tag, span);
            return FormatToken {
                tok: Token::new(kind, span),
                newlines_before,
                whitespace,
            };
        }
    }
}

impl LexedTokenSource<'_> {
    /// Map a raw tag to its cooked kind, resolving identifiers against the
    /// keyword table.
    fn cook(&self, tag: RawTag, span: Span) -> TokenKind {
        match tag {
            RawTag::Ident => keyword_kind(self.buffer.text(span.start, span.end))
                .unwrap_or(TokenKind::Ident),
            RawTag::Int => TokenKind::Int,
            RawTag::Float => TokenKind::Float,
            RawTag::String => TokenKind::Str,
            RawTag::Char => TokenKind::Char,
            RawTag::LineComment | RawTag::BlockComment => TokenKind::Comment,
            RawTag::Plus => TokenKind::Plus,
            RawTag::Minus => TokenKind::Minus,
            RawTag::Star => TokenKind::Star,
            RawTag::Slash => TokenKind::Slash,
            RawTag::Percent => TokenKind::Percent,
            RawTag::Caret => TokenKind::Caret,
            RawTag::Ampersand => TokenKind::Amp,
            RawTag::Pipe => TokenKind::Pipe,
            RawTag::Tilde => TokenKind::Tilde,
            RawTag::Bang => TokenKind::Bang,
            RawTag::Equal => TokenKind::Eq,
            RawTag::Less => TokenKind::Lt,
            RawTag::Greater => TokenKind::Gt,
            RawTag::Dot => TokenKind::Dot,
            RawTag::Question => TokenKind::Question,
            RawTag::EqualEqual => TokenKind::EqEq,
            RawTag::BangEqual => TokenKind::NotEq,
            RawTag::LessEqual => TokenKind::LtEq,
            RawTag::GreaterEqual => TokenKind::GtEq,
            RawTag::AmpersandAmpersand => TokenKind::AmpAmp,
            RawTag::PipePipe => TokenKind::PipePipe,
            RawTag::Arrow => TokenKind::Arrow,
            RawTag::PlusPlus => TokenKind::PlusPlus,
            RawTag::MinusMinus => TokenKind::MinusMinus,
            RawTag::PlusEqual => TokenKind::PlusEq,
            RawTag::MinusEqual => TokenKind::MinusEq,
            RawTag::StarEqual => TokenKind::StarEq,
            RawTag::SlashEqual => TokenKind::SlashEq,
            RawTag::Shl => TokenKind::Shl,
            RawTag::ColonColon => TokenKind::ColonColon,
            RawTag::LeftParen => TokenKind::LParen,
            RawTag::RightParen => TokenKind::RParen,
            RawTag::LeftBracket => TokenKind::LBracket,
            RawTag::RightBracket => TokenKind::RBracket,
            RawTag::LeftBrace => TokenKind::LBrace,
            RawTag::RightBrace => TokenKind::RBrace,
            RawTag::Comma => TokenKind::Comma,
            RawTag::Colon => TokenKind::Colon,
            RawTag::Semicolon => TokenKind::Semicolon,
            RawTag::Hash => TokenKind::Hash,
            RawTag::Eof => TokenKind::Eof,
            RawTag::UnterminatedString
            | RawTag::UnterminatedChar
            | RawTag::UnterminatedBlockComment
            | RawTag::InvalidByte => TokenKind::Error,
            // `>>` is split before cooking; trivia never reaches here.
            RawTag::Shr | RawTag::Whitespace | RawTag::Newline => TokenKind::Error,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cook_all(source: &str) -> Vec<FormatToken> {
        let buf = SourceBuffer::new(source);
        let mut src = LexedTokenSource::new(&buf);
        let mut tokens = Vec::new();
        loop {
            let tok = src.next_token();
            let eof = tok.kind() == TokenKind::Eof;
            tokens.push(tok);
            if eof {
                break;
            }
        }
        tokens
    }

    fn kinds(source: &str) -> Vec<TokenKind> {
        cook_all(source)
            .iter()
            .map(|t| t.kind())
            .filter(|&k| k != TokenKind::Eof)
            .collect()
    }

    #[test]
    fn keywords_are_resolved() {
        assert_eq!(
            kinds("if (x) while"),
            vec![
                TokenKind::If,
                TokenKind::LParen,
                TokenKind::Ident,
                TokenKind::RParen,
                TokenKind::While,
            ]
        );
    }

    #[test]
    fn whitespace_becomes_attributes() {
        let tokens = cook_all("a  \n\n  b");
        assert_eq!(tokens[0].newlines_before, 0);
        assert_eq!(tokens[0].whitespace, Some(Span::new(0, 0)));

        let b = &tokens[1];
        assert_eq!(b.kind(), TokenKind::Ident);
        assert_eq!(b.newlines_before, 2);
        // Whitespace covers everything between the tokens.
        assert_eq!(b.whitespace, Some(Span::new(1, 7)));
        assert_eq!(b.tok.span, Span::new(7, 8));
    }

    #[test]
    fn greater_greater_splits_into_two() {
        let tokens = cook_all("A<B<C>> x");
        let kinds: Vec<_> = tokens.iter().map(|t| t.kind()).collect();
        assert_eq!(
            kinds,
            vec![
                TokenKind::Ident,
                TokenKind::Lt,
                TokenKind::Ident,
                TokenKind::Lt,
                TokenKind::Ident,
                TokenKind::Gt,
                TokenKind::Gt,
                TokenKind::Ident,
                TokenKind::Eof,
            ]
        );

        // First half: original position, length 1.
        let first = &tokens[5];
        assert_eq!(first.tok.span, Span::new(5, 6));

        // Second half: one byte later, empty whitespace, no newlines.
        let second = &tokens[6];
        assert_eq!(second.tok.span, Span::new(6, 7));
        assert_eq!(second.newlines_before, 0);
        assert_eq!(second.whitespace, Some(Span::point(6)));
    }

    #[test]
    fn shift_left_survives_cooking() {
        assert_eq!(
            kinds("a << b"),
            vec![TokenKind::Ident, TokenKind::Shl, TokenKind::Ident]
        );
    }

    #[test]
    fn comments_are_tokens() {
        assert_eq!(
            kinds("x; // trailing"),
            vec![TokenKind::Ident, TokenKind::Semicolon, TokenKind::Comment]
        );
    }

    #[test]
    fn eof_repeats_and_carries_trailing_whitespace() {
        let buf = SourceBuffer::new("x  ");
        let mut src = LexedTokenSource::new(&buf);
        src.next_token();
        let eof = src.next_token();
        assert_eq!(eof.kind(), TokenKind::Eof);
        assert_eq!(eof.whitespace, Some(Span::new(1, 3)));
        assert_eq!(src.next_token().kind(), TokenKind::Eof);
    }
}
