//! Per-token annotations.
//!
//! The annotator produces one [`Annotation`] per token of a logical line —
//! a flat array parallel to the token array. Each annotation carries the
//! token's syntactic role and the three whitespace decisions the layout
//! engine consumes.

/// Syntactic role of a token within its logical line.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum TokenRole {
    /// No special role.
    #[default]
    Unknown,
    /// `<` opening a template parameter/argument list.
    TemplateOpener,
    /// `>` closing a template parameter/argument list.
    TemplateCloser,
    /// Infix binary operator.
    BinaryOperator,
    /// Prefix or postfix unary operator.
    UnaryOperator,
    /// Operator token named in an `operator` declaration.
    OverloadedOperator,
    /// `*`/`&` forming part of a pointer or reference type.
    PointerOrReference,
    /// The `:` of a `?:` conditional expression.
    ConditionalColon,
    /// The `:` introducing a constructor initializer list.
    CtorInitializerColon,
    /// `//` comment.
    LineComment,
    /// `/* */` comment.
    BlockComment,
}

/// Annotation for one token of a logical line.
///
/// The token at index 0 never consults these flags — its placement is
/// computed separately from the line's nesting level or its original
/// source column.
#[derive(Clone, Copy, Debug, Default)]
pub struct Annotation {
    /// The token's syntactic role.
    pub role: TokenRole,
    /// A single space is required before this token.
    pub space_before: bool,
    /// A line break is permitted before this token.
    pub can_break_before: bool,
    /// A line break is required before this token.
    pub must_break_before: bool,
}
