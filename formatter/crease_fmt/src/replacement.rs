//! Whitespace edits.
//!
//! Every edit replaces the bytes of one token's leading-whitespace span
//! with newlines followed by spaces. Edits are whitespace-only by
//! construction: the formatter never touches token text.

use crease_ir::Span;

/// A single whitespace replacement: the bytes of `span` become
/// `'\n' * newlines` followed by `' ' * spaces`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Replacement {
    /// Byte range of the original whitespace being replaced.
    pub span: Span,
    /// Number of newlines in the replacement.
    pub newlines: u32,
    /// Number of spaces following the newlines.
    pub spaces: u32,
}

impl Replacement {
    /// Render the replacement text.
    pub fn text(&self) -> String {
        let mut text = String::with_capacity((self.newlines + self.spaces) as usize);
        for _ in 0..self.newlines {
            text.push('\n');
        }
        for _ in 0..self.spaces {
            text.push(' ');
        }
        text
    }

    /// Returns `true` if applying this replacement would leave `source`
    /// unchanged.
    pub fn is_identity(&self, source: &str) -> bool {
        source
            .as_bytes()
            .get(self.span.to_range())
            .map_or(false, |original| original == self.text().as_bytes())
    }
}

/// An ordered collection of whitespace replacements.
///
/// Replacements are produced in token-visit order; their source ranges are
/// pairwise disjoint by construction (one per token, each covering only
/// that token's leading whitespace).
#[derive(Clone, Debug, Default)]
pub struct Replacements {
    items: Vec<Replacement>,
}

impl Replacements {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a replacement.
    pub fn add(&mut self, span: Span, newlines: u32, spaces: u32) {
        self.items.push(Replacement {
            span,
            newlines,
            spaces,
        });
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Replacement> {
        self.items.iter()
    }

    /// Apply all replacements to `source`, returning the edited text.
    ///
    /// Ranges are sorted before splicing; overlapping ranges would indicate
    /// a formatter bug and are rejected in debug builds.
    pub fn apply(&self, source: &str) -> String {
        let mut sorted: Vec<&Replacement> = self.items.iter().collect();
        sorted.sort_by_key(|r| r.span.start);

        debug_assert!(
            sorted.windows(2).all(|w| w[0].span.end <= w[1].span.start),
            "replacement ranges must be disjoint"
        );

        // Assemble as bytes: token spans always lie on byte boundaries,
        // which need not be char boundaries for malformed input.
        let bytes = source.as_bytes();
        let mut out: Vec<u8> = Vec::with_capacity(bytes.len());
        let mut cursor = 0usize;
        for rep in sorted {
            let start = (rep.span.start as usize).min(bytes.len());
            let end = (rep.span.end as usize).min(bytes.len());
            if start < cursor {
                continue; // overlapping edit; skip rather than corrupt
            }
            out.extend_from_slice(&bytes[cursor..start]);
            out.extend_from_slice(rep.text().as_bytes());
            cursor = end;
        }
        out.extend_from_slice(&bytes[cursor..]);
        match String::from_utf8(out) {
            Ok(text) => text,
            Err(err) => String::from_utf8_lossy(err.as_bytes()).into_owned(),
        }
    }
}

impl<'a> IntoIterator for &'a Replacements {
    type Item = &'a Replacement;
    type IntoIter = std::slice::Iter<'a, Replacement>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}
