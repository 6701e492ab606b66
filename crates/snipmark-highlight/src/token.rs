//! Token classes and the segment stream the passes rewrite.
//!
//! ## Learning: Segments Instead of Markup Strings
//!
//! Each pass conceptually turns text into "text with some spans wrapped".
//! Rather than splicing `<span>` tags into a `String` and letting the next
//! pass run its patterns over those tags, the stream keeps wrapped spans as
//! separate values. A pass only ever sees `PlainText` segments, so a
//! keyword pass can never match the `class` attribute of an earlier wrap.

use serde::Serialize;

/// Lexical category attached to a span of output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenClass {
    Comment,
    String,
    Number,
    PlatformGlobal,
    Keyword,
    FunctionName,
    Bracket,
    Operator,
    PlainText,
}

impl TokenClass {
    /// Returns the CSS class used when rendering this token, if it is wrapped at all.
    pub fn css_class(&self) -> Option<&'static str> {
        match self {
            TokenClass::Comment => Some("comment"),
            TokenClass::String => Some("string"),
            TokenClass::Number => Some("number"),
            TokenClass::PlatformGlobal => Some("workers-specific"),
            TokenClass::Keyword => Some("keyword"),
            TokenClass::FunctionName => Some("function"),
            TokenClass::Bracket => Some("bracket"),
            TokenClass::Operator => Some("operator"),
            TokenClass::PlainText => None,
        }
    }

    pub fn is_plain(&self) -> bool {
        matches!(self, TokenClass::PlainText)
    }
}

/// A run of escaped text carrying a single class label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    pub class: TokenClass,
    pub text: String,
}

impl Segment {
    pub fn new(class: TokenClass, text: impl Into<String>) -> Self {
        Self {
            class,
            text: text.into(),
        }
    }

    pub fn plain(text: impl Into<String>) -> Self {
        Self::new(TokenClass::PlainText, text)
    }
}

/// Ordered sequence of segments produced by the pass pipeline.
///
/// Adjacent plain segments are always merged and empty segments are
/// dropped, so a plain segment is never split by anything but a wrap.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SegmentStream {
    segments: Vec<Segment>,
}

impl SegmentStream {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a stream holding a single unclassified segment.
    pub fn from_plain(text: impl Into<String>) -> Self {
        let mut stream = Self::new();
        stream.push(Segment::plain(text));
        stream
    }

    /// Appends a segment, merging it into a preceding plain segment when possible.
    pub fn push(&mut self, segment: Segment) {
        if segment.text.is_empty() {
            return;
        }
        if segment.class.is_plain() {
            if let Some(last) = self.segments.last_mut() {
                if last.class.is_plain() {
                    last.text.push_str(&segment.text);
                    return;
                }
            }
        }
        self.segments.push(segment);
    }

    pub fn push_plain(&mut self, text: &str) {
        self.push(Segment::plain(text));
    }

    pub fn push_wrapped(&mut self, class: TokenClass, text: &str) {
        self.push(Segment::new(class, text));
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Segment> {
        self.segments.iter()
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Number of segments labelled with `class`.
    pub fn count(&self, class: TokenClass) -> usize {
        self.segments.iter().filter(|s| s.class == class).count()
    }

    /// Concatenated text of every segment, without any wrapping.
    pub fn text(&self) -> String {
        self.segments.iter().map(|s| s.text.as_str()).collect()
    }

    /// Rebuilds the stream, handing every plain segment to `rewrite`.
    ///
    /// Classified segments are copied through untouched; this is what gives
    /// earlier passes precedence over later ones.
    pub fn rewrite_plain<F>(self, mut rewrite: F) -> Self
    where
        F: FnMut(&str, &mut SegmentStream),
    {
        let mut out = SegmentStream::new();
        for segment in self.segments {
            if segment.class.is_plain() {
                rewrite(&segment.text, &mut out);
            } else {
                out.push(segment);
            }
        }
        out
    }
}

impl<'a> IntoIterator for &'a SegmentStream {
    type Item = &'a Segment;
    type IntoIter = std::slice::Iter<'a, Segment>;

    fn into_iter(self) -> Self::IntoIter {
        self.segments.iter()
    }
}
