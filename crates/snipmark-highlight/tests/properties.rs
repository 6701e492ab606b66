//! Property tests over arbitrary input.

use proptest::prelude::*;
use snipmark_highlight::{escape, highlight, is_blank};

/// Strips `<span class="...">` / `</span>` wrappers from rendered markup.
fn strip_spans(markup: &str) -> String {
    let mut out = String::with_capacity(markup.len());
    let mut rest = markup;
    while let Some(pos) = rest.find('<') {
        out.push_str(&rest[..pos]);
        let close = rest[pos..].find('>').map(|i| pos + i + 1).unwrap_or(rest.len());
        rest = &rest[close..];
    }
    out.push_str(rest);
    out
}

proptest! {
    #[test]
    fn stats_measure_raw_input(source in "(\\PC|\n){0,200}") {
        prop_assume!(!is_blank(&source));
        let result = highlight(&source);
        prop_assert_eq!(result.stats.chars, source.chars().count());
        prop_assert_eq!(result.stats.lines, source.matches('\n').count() + 1);
    }

    #[test]
    fn never_panics_on_arbitrary_text(source in any::<String>()) {
        let _ = highlight(&source);
    }

    #[test]
    fn text_is_preserved_without_operators(source in "[a-z0-9 (){}\\[\\]\"'.,;:\n“]{0,80}") {
        prop_assume!(!is_blank(&source));
        let result = highlight(&source);
        prop_assert_eq!(strip_spans(&result.markup), escape(&source));
    }

    #[test]
    fn markup_metacharacters_are_escaped(source in "[a-z<>& ]{1,60}") {
        prop_assume!(!is_blank(&source));
        let result = highlight(&source);
        prop_assert!(!result.markup.contains("&amp;amp;"));
        prop_assert!(!result.markup.contains("&amp;lt;"));
        prop_assert_eq!(
            strip_spans(&result.markup).matches("&lt;").count(),
            source.matches('<').count()
        );
    }

    #[test]
    fn blank_input_is_empty(source in "[ \t\n\u{FEFF}]{0,20}") {
        let result = highlight(&source);
        prop_assert!(result.markup.is_empty());
        prop_assert_eq!(result.stats.lines, 0);
        prop_assert_eq!(result.stats.chars, 0);
    }
}
