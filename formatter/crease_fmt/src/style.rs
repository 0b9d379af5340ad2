//! Formatting style.
//!
//! A plain struct of knobs consumed read-only by the annotator, the line
//! parser, and the layout engine. Two named presets are exposed.

/// Immutable formatting configuration.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FormatStyle {
    /// Column budget for a physical line.
    pub column_limit: u32,

    /// Maximum number of consecutive empty lines to keep.
    pub max_empty_lines_to_keep: u32,

    /// Bind `*`/`&` in declarations to the type (`int* a`) instead of the
    /// name (`int *a`).
    pub pointer_and_reference_bind_to_type: bool,

    /// Signed offset applied to the indent of `public`/`protected`/
    /// `private` labels. Only applied while the result stays non-negative.
    pub access_modifier_offset: i32,

    /// Keep a space between the closing `>`s of nested template lists
    /// (`A<B<C> >` rather than `A<B<C>>`).
    pub split_template_closing_greater: bool,

    /// Indent `case` labels one level inside `switch` blocks. Consumed by
    /// the line parser; the layout engine ignores it.
    pub indent_case_labels: bool,
}

impl FormatStyle {
    /// The LLVM coding-standards preset.
    pub fn llvm() -> Self {
        FormatStyle {
            column_limit: 80,
            max_empty_lines_to_keep: 1,
            pointer_and_reference_bind_to_type: false,
            access_modifier_offset: -2,
            split_template_closing_greater: true,
            indent_case_labels: false,
        }
    }

    /// The Google C++ style preset.
    pub fn google() -> Self {
        FormatStyle {
            column_limit: 80,
            max_empty_lines_to_keep: 1,
            pointer_and_reference_bind_to_type: true,
            access_modifier_offset: -1,
            split_template_closing_greater: false,
            indent_case_labels: true,
        }
    }
}

impl Default for FormatStyle {
    fn default() -> Self {
        Self::llvm()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn llvm_preset_values() {
        let style = FormatStyle::llvm();
        assert_eq!(style.column_limit, 80);
        assert_eq!(style.max_empty_lines_to_keep, 1);
        assert!(!style.pointer_and_reference_bind_to_type);
        assert_eq!(style.access_modifier_offset, -2);
        assert!(style.split_template_closing_greater);
        assert!(!style.indent_case_labels);
    }

    #[test]
    fn google_preset_values() {
        let style = FormatStyle::google();
        assert_eq!(style.column_limit, 80);
        assert_eq!(style.max_empty_lines_to_keep, 1);
        assert!(style.pointer_and_reference_bind_to_type);
        assert_eq!(style.access_modifier_offset, -1);
        assert!(!style.split_template_closing_greater);
        assert!(style.indent_case_labels);
    }
}
