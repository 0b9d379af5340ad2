//! Keyword resolution for raw identifiers.
//!
//! The raw scanner tags every identifier-shaped token as `Ident`; this
//! table retags the ones that are keywords. Plain `match` compiles to a
//! jump table over the first bytes and needs no extra dependencies.

use crease_ir::TokenKind;

/// Resolve an identifier's text against the keyword table.
///
/// Returns `None` for plain identifiers.
pub fn keyword_kind(text: &[u8]) -> Option<TokenKind> {
    let kind = match text {
        b"break" => TokenKind::Break,
        b"case" => TokenKind::Case,
        b"class" => TokenKind::Class,
        b"const" => TokenKind::Const,
        b"continue" => TokenKind::Continue,
        b"default" => TokenKind::Default,
        b"delete" => TokenKind::Delete,
        b"do" => TokenKind::Do,
        b"else" => TokenKind::Else,
        b"enum" => TokenKind::Enum,
        b"extern" => TokenKind::Extern,
        b"for" => TokenKind::For,
        b"if" => TokenKind::If,
        b"inline" => TokenKind::Inline,
        b"namespace" => TokenKind::Namespace,
        b"new" => TokenKind::New,
        b"operator" => TokenKind::Operator,
        b"private" => TokenKind::Private,
        b"protected" => TokenKind::Protected,
        b"public" => TokenKind::Public,
        b"return" => TokenKind::Return,
        b"sizeof" => TokenKind::Sizeof,
        b"static" => TokenKind::Static,
        b"struct" => TokenKind::Struct,
        b"switch" => TokenKind::Switch,
        b"template" => TokenKind::Template,
        b"typedef" => TokenKind::Typedef,
        b"typename" => TokenKind::Typename,
        b"union" => TokenKind::Union,
        b"using" => TokenKind::Using,
        b"virtual" => TokenKind::Virtual,
        b"while" => TokenKind::While,
        b"bool" => TokenKind::Bool,
        b"char" => TokenKind::CharType,
        b"double" => TokenKind::Double,
        b"float" => TokenKind::FloatType,
        b"int" => TokenKind::IntType,
        b"long" => TokenKind::Long,
        b"short" => TokenKind::Short,
        b"signed" => TokenKind::Signed,
        b"unsigned" => TokenKind::Unsigned,
        b"void" => TokenKind::Void,
        _ => return None,
    };
    Some(kind)
}
