//! # Snipmark Highlight
//!
//! Classifies Workers-style JavaScript into lexical categories and renders
//! it as styled HTML markup.
//!
//! ## How It Works
//!
//! ```text
//! raw text ──► escape ──► pass pipeline (9 ordered passes) ──► render ──► markup
//!     │                          │
//!     └──────── lines/chars ─────┴── keyword/function counters ──► Stats
//! ```
//!
//! This is deliberately *not* a lexer. Each pass is a pattern match over
//! whatever text earlier passes left unclassified, so precedence between
//! overlapping token classes is simply pass order: a `//` inside a string
//! literal starts a comment, because comments are matched first.
//!
//! ## Learning: Total Functions
//!
//! `highlight` returns a plain value, not a `Result`. Unterminated strings
//! or comments just fail to match and stay plain text, so there is nothing
//! to report. The only fallible step is building a custom [`Vocabulary`].

mod escape;
mod pipeline;
mod render;
mod stats;
mod token;
mod vocabulary;

pub use escape::escape;
pub use pipeline::{run as run_passes, Pass, PassCounters};
pub use render::{render, render_page, STYLESHEET};
pub use stats::{InputStats, Stats};
pub use token::{Segment, SegmentStream, TokenClass};
pub use vocabulary::{Operator, Vocabulary, VocabularyError};

use serde::Serialize;

/// Result of highlighting one piece of source text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Highlighted {
    pub markup: String,
    pub stats: Stats,
}

/// Highlights text against a borrowed vocabulary.
#[derive(Debug, Clone, Copy)]
pub struct Highlighter<'v> {
    vocabulary: &'v Vocabulary,
}

impl<'v> Highlighter<'v> {
    pub fn new(vocabulary: &'v Vocabulary) -> Self {
        Self { vocabulary }
    }

    pub fn vocabulary(&self) -> &'v Vocabulary {
        self.vocabulary
    }

    /// Highlights `source`, producing markup and statistics.
    ///
    /// Blank input (see [`is_blank`]) short-circuits to empty markup and
    /// all-zero statistics without running any pass.
    pub fn highlight(&self, source: &str) -> Highlighted {
        if is_blank(source) {
            return Highlighted::default();
        }

        let escaped = escape(source);
        let (stream, counters) = pipeline::run(self.vocabulary, &escaped);
        let markup = render(&stream);
        let stats = Stats::collect(source, &counters);

        tracing::debug!(
            lines = stats.lines,
            chars = stats.chars,
            keywords = stats.keyword_count,
            functions = stats.function_count,
            "highlighted source"
        );

        Highlighted { markup, stats }
    }
}

impl Default for Highlighter<'static> {
    fn default() -> Self {
        Self::new(Vocabulary::builtin())
    }
}

/// Whether `source` holds nothing but whitespace and byte order marks.
pub fn is_blank(source: &str) -> bool {
    source
        .trim_matches(|c: char| c.is_whitespace() || c == '\u{FEFF}')
        .is_empty()
}

/// Highlights `source` with the built-in vocabulary.
pub fn highlight(source: &str) -> Highlighted {
    Highlighter::default().highlight(source)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_and_blank_input() {
        for source in ["", "   ", "\n\t \n", "\u{FEFF}", "\u{FEFF}\r\n "] {
            let result = highlight(source);
            assert_eq!(result.markup, "");
            assert_eq!(result.stats, Stats::default());
        }
    }

    #[test]
    fn test_function_call() {
        let result = highlight("foo(1, 2)");
        assert!(result.markup.starts_with(r#"<span class="function">foo</span>"#));
        assert_eq!(result.stats.function_count, 1);
        assert_eq!(result.stats.keyword_count, 0);
    }

    #[test]
    fn test_comment_only_line() {
        let result = highlight("// hello world return");
        assert_eq!(
            result.markup,
            r#"<span class="comment">// hello world return</span>"#
        );
        assert_eq!(result.stats.keyword_count, 0);
        assert_eq!(result.stats.function_count, 0);
    }

    #[test]
    fn test_single_keyword() {
        let result = highlight("let x");
        assert_eq!(result.markup, r#"<span class="keyword">let</span> x"#);
        assert_eq!(result.stats.keyword_count, 1);
    }

    #[test]
    fn test_no_double_escaping() {
        let result = highlight("a & b");
        assert!(!result.markup.contains("&amp;amp;"));
        assert_eq!(
            result.markup,
            r#"a <span class="operator">&amp;</span> b"#
        );
    }

    #[test]
    fn test_markup_never_contains_raw_input_tags() {
        let result = highlight("x = '<script>'");
        assert!(!result.markup.contains("<script>"));
        assert!(result.markup.contains("&lt;script&gt;"));
    }

    #[test]
    fn test_unsigned_shift_assign_is_one_operator() {
        let result = highlight("a >>>= b");
        assert_eq!(
            result.markup,
            r#"a <span class="operator">&gt;&gt;&gt;=</span> b"#
        );
    }

    #[test]
    fn test_workers_handler() {
        let source = "export default {\n  async fetch(request, env) {\n    return new Response(\"ok\");\n  }\n};";
        let result = highlight(source);

        assert_eq!(result.stats.lines, 5);
        assert_eq!(result.stats.chars, source.chars().count());
        // export default async return new
        assert_eq!(result.stats.keyword_count, 5);
        assert_eq!(result.stats.function_count, 0);
        assert!(result.markup.contains(r#"<span class="workers-specific">Response</span>"#));
        assert!(result.markup.contains(r#"<span class="string">"ok"</span>"#));
    }

    #[test]
    fn test_custom_vocabulary() {
        let vocab = Vocabulary::extended(&["of"], &[]).unwrap();
        let result = Highlighter::new(&vocab).highlight("for (const x of xs) {}");
        assert_eq!(result.stats.keyword_count, 3);
    }

    #[test]
    fn test_highlighted_serializes() {
        let json = serde_json::to_value(highlight("f()")).unwrap();
        assert_eq!(json["stats"]["functionCount"], 1);
        assert!(json["markup"].as_str().unwrap().contains("function"));
    }
}
