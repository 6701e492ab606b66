//! The ordered pass pipeline.
//!
//! Every pass takes the segment stream produced by the previous one and
//! rewrites its plain segments. Segments classified by an earlier pass are
//! sealed: a later pass can sit next to them but never inside them, so a
//! keyword inside a comment stays part of the comment.
//!
//! ```text
//! escaped text
//!   → line comments → block comments → strings → numbers
//!   → platform globals → keywords → function calls → brackets → operators
//! ```

use once_cell::sync::Lazy;
use regex::Regex;

use crate::token::{SegmentStream, TokenClass};
use crate::vocabulary::{is_ident_char, is_ident_start, Vocabulary};

static LINE_COMMENT: Lazy<Regex> = Lazy::new(|| Regex::new(r"//[^\r\n]*").unwrap());

static BLOCK_COMMENT: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)/\*.*?\*/").unwrap());

// One alternative per delimiter; each literal only closes on its own quote.
static STRING_LITERAL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#""(?:\\.|[^"\\])*"|'(?:\\.|[^'\\])*'|“(?:\\.|[^“\\])*“"#).unwrap()
});

static NUMBER: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b[0-9]+(?:\.[0-9]+)?\b").unwrap());

/// Counters accumulated while the passes run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PassCounters {
    /// Keyword wraps produced by the keyword pass
    pub keywords: usize,
    /// Identifier wraps produced by the function-call pass
    pub functions: usize,
}

/// One step of the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Pass {
    LineComments,
    BlockComments,
    Strings,
    Numbers,
    PlatformGlobals,
    Keywords,
    FunctionCalls,
    Brackets,
    Operators,
}

impl Pass {
    /// Execution order. Earlier passes take precedence over later ones.
    pub const ORDER: [Pass; 9] = [
        Pass::LineComments,
        Pass::BlockComments,
        Pass::Strings,
        Pass::Numbers,
        Pass::PlatformGlobals,
        Pass::Keywords,
        Pass::FunctionCalls,
        Pass::Brackets,
        Pass::Operators,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Pass::LineComments => "line-comments",
            Pass::BlockComments => "block-comments",
            Pass::Strings => "strings",
            Pass::Numbers => "numbers",
            Pass::PlatformGlobals => "platform-globals",
            Pass::Keywords => "keywords",
            Pass::FunctionCalls => "function-calls",
            Pass::Brackets => "brackets",
            Pass::Operators => "operators",
        }
    }

    /// Runs this pass over `stream`.
    pub fn apply(
        self,
        vocabulary: &Vocabulary,
        stream: SegmentStream,
        counters: &mut PassCounters,
    ) -> SegmentStream {
        match self {
            Pass::LineComments => stream.rewrite_plain(|text, out| {
                wrap_matches(text, &LINE_COMMENT, TokenClass::Comment, out);
            }),
            Pass::BlockComments => stream.rewrite_plain(|text, out| {
                wrap_matches(text, &BLOCK_COMMENT, TokenClass::Comment, out);
            }),
            Pass::Strings => stream.rewrite_plain(|text, out| {
                wrap_matches(text, &STRING_LITERAL, TokenClass::String, out);
            }),
            Pass::Numbers => stream.rewrite_plain(|text, out| {
                wrap_matches(text, &NUMBER, TokenClass::Number, out);
            }),
            Pass::PlatformGlobals => {
                let mut stream = stream;
                for global in vocabulary.platform_globals() {
                    stream = stream.rewrite_plain(|text, out| {
                        wrap_words(text, global, TokenClass::PlatformGlobal, out);
                    });
                }
                stream
            }
            Pass::Keywords => {
                let mut stream = stream;
                for keyword in vocabulary.keywords() {
                    stream = stream.rewrite_plain(|text, out| {
                        counters.keywords += wrap_words(text, keyword, TokenClass::Keyword, out);
                    });
                }
                stream
            }
            Pass::FunctionCalls => stream.rewrite_plain(|text, out| {
                counters.functions += wrap_calls(text, out);
            }),
            Pass::Brackets => stream.rewrite_plain(wrap_brackets),
            Pass::Operators => {
                let mut stream = stream;
                for operator in vocabulary.operators() {
                    stream = stream.rewrite_plain(|text, out| {
                        let mut last = 0;
                        for m in operator.pattern().find_iter(text) {
                            out.push_plain(&text[last..m.start()]);
                            out.push_plain(" ");
                            out.push_wrapped(TokenClass::Operator, operator.escaped());
                            out.push_plain(" ");
                            last = m.end();
                        }
                        out.push_plain(&text[last..]);
                    });
                }
                stream
            }
        }
    }
}

/// Runs every pass, in order, over already-escaped text.
pub fn run(vocabulary: &Vocabulary, escaped: &str) -> (SegmentStream, PassCounters) {
    let mut counters = PassCounters::default();
    let mut stream = SegmentStream::from_plain(escaped);

    for pass in Pass::ORDER {
        stream = pass.apply(vocabulary, stream, &mut counters);
        tracing::trace!(pass = pass.name(), segments = stream.len(), "pass complete");
    }

    (stream, counters)
}

/// Wraps every match of `pattern` as `class`. Returns the number of wraps.
fn wrap_matches(text: &str, pattern: &Regex, class: TokenClass, out: &mut SegmentStream) -> usize {
    let mut last = 0;
    let mut wrapped = 0;
    for m in pattern.find_iter(text) {
        out.push_plain(&text[last..m.start()]);
        out.push_wrapped(class, m.as_str());
        last = m.end();
        wrapped += 1;
    }
    out.push_plain(&text[last..]);
    wrapped
}

/// Wraps whole-word occurrences of `word` as `class`. Returns the number of wraps.
fn wrap_words(text: &str, word: &str, class: TokenClass, out: &mut SegmentStream) -> usize {
    let mut last = 0;
    let mut wrapped = 0;
    for (start, _) in text.match_indices(word) {
        let end = start + word.len();
        if !is_whole_word(text, start, end) {
            continue;
        }
        out.push_plain(&text[last..start]);
        out.push_wrapped(class, word);
        last = end;
        wrapped += 1;
    }
    out.push_plain(&text[last..]);
    wrapped
}

/// Whether `text[start..end]` is bounded by non-identifier characters.
///
/// A word directly after `&` is the body of an entity (`&lt;`, `&amp;`)
/// and never counts.
fn is_whole_word(text: &str, start: usize, end: usize) -> bool {
    let before_ok = text[..start]
        .chars()
        .next_back()
        .is_none_or(|c| !is_ident_char(c) && c != '&');
    let after_ok = text[end..].chars().next().is_none_or(|c| !is_ident_char(c));
    before_ok && after_ok
}

/// Wraps identifiers that are followed by optional whitespace and `(`.
///
/// Only the identifier is wrapped; the whitespace and parenthesis stay plain
/// for the bracket pass. Returns the number of wraps.
fn wrap_calls(text: &str, out: &mut SegmentStream) -> usize {
    let mut last = 0;
    let mut wrapped = 0;
    let mut prev: Option<char> = None;
    let mut chars = text.char_indices().peekable();

    while let Some((start, c)) = chars.next() {
        let starts_word = is_ident_start(c) && prev.is_none_or(|p| !is_ident_char(p) && p != '&');
        if !starts_word {
            prev = Some(c);
            continue;
        }

        let mut end = start + c.len_utf8();
        let mut tail = c;
        while let Some(&(i, next)) = chars.peek() {
            if !(next.is_ascii_alphanumeric() || next == '_' || next == '$') {
                break;
            }
            end = i + next.len_utf8();
            tail = next;
            chars.next();
        }
        prev = Some(tail);

        if text[end..].trim_start().starts_with('(') {
            out.push_plain(&text[last..start]);
            out.push_wrapped(TokenClass::FunctionName, &text[start..end]);
            last = end;
            wrapped += 1;
        }
    }

    out.push_plain(&text[last..]);
    wrapped
}

fn wrap_brackets(text: &str, out: &mut SegmentStream) {
    let mut last = 0;
    for (i, c) in text.char_indices() {
        if matches!(c, '{' | '}' | '(' | ')' | '[' | ']') {
            out.push_plain(&text[last..i]);
            out.push_wrapped(TokenClass::Bracket, &text[i..i + 1]);
            last = i + 1;
        }
    }
    out.push_plain(&text[last..]);
}
