//! Vocabulary tables: keywords, platform globals and operators.
//!
//! ## Learning: Build Once, Borrow Everywhere
//!
//! A `Vocabulary` compiles its operator patterns when it is constructed and
//! is never mutated afterwards. The pipeline only ever takes `&Vocabulary`,
//! so one instance can serve any number of concurrent highlight requests
//! without locking.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::escape::escape;

// ============================================================================
// Built-in tables
// ============================================================================

fn js_keywords() -> &'static [&'static str] {
    &[
        "break", "case", "catch", "class", "const", "continue", "debugger",
        "default", "delete", "do", "else", "export", "extends", "false",
        "finally", "for", "function", "if", "import", "in", "instanceof",
        "let", "new", "null", "return", "super", "switch", "this", "throw",
        "true", "try", "typeof", "var", "void", "while", "with", "yield",
        "async", "await",
    ]
}

fn workers_globals() -> &'static [&'static str] {
    &[
        "addEventListener", "removeEventListener", "fetch", "request",
        "response", "Request", "Response", "Headers", "URL", "URLSearchParams",
        "DurableObject", "KVNamespace", "R2Bucket", "Cache", "crypto",
        "console", "setTimeout", "clearTimeout", "setInterval",
        "clearInterval", "atob", "btoa", "WebSocket", "TransformStream",
        "ReadableStream", "WritableStream", "env", "ctx", "waitUntil",
    ]
}

fn js_operators() -> &'static [&'static str] {
    &[
        "+", "-", "*", "/", "==", "===", "!=", "!==", ">", "<", ">=", "<=",
        "&&", "||", "!", "++", "--", "%", "&", "|", "^", "~", "<<", ">>",
        ">>>", "+=", "-=", "*=", "/=", "%=", "&=", "|=", "^=", "<<=", ">>=",
        ">>>=",
    ]
}

static BUILTIN: Lazy<Vocabulary> = Lazy::new(|| {
    Vocabulary::new(js_keywords(), workers_globals(), js_operators())
        .expect("built-in vocabulary is valid")
});

// ============================================================================
// Vocabulary
// ============================================================================

/// An operator token together with its escaped spelling and match pattern.
#[derive(Debug, Clone)]
pub struct Operator {
    raw: String,
    escaped: String,
    pattern: Regex,
}

impl Operator {
    fn new(raw: &str) -> Result<Self, VocabularyError> {
        if raw.is_empty() || raw.chars().any(|c| is_ident_char(c) || c.is_whitespace() || c == ';') {
            return Err(VocabularyError::InvalidOperator(raw.to_string()));
        }
        let escaped = escape(raw);
        let pattern = Regex::new(&format!(r"\s*{}\s*", regex::escape(&escaped)))?;
        Ok(Self {
            raw: raw.to_string(),
            escaped,
            pattern,
        })
    }

    /// The operator as written in source.
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// The operator as it appears after escaping.
    pub fn escaped(&self) -> &str {
        &self.escaped
    }

    /// Matches the escaped operator plus any surrounding whitespace.
    pub fn pattern(&self) -> &Regex {
        &self.pattern
    }
}

/// Immutable word and operator tables consumed by the pipeline.
#[derive(Debug, Clone)]
pub struct Vocabulary {
    keywords: Vec<String>,
    platform_globals: Vec<String>,
    /// Sorted longest-first; ties keep their declaration order.
    operators: Vec<Operator>,
}

impl Vocabulary {
    /// Builds a vocabulary, validating every entry.
    ///
    /// Duplicate words are dropped (first occurrence wins) and operators are
    /// reordered so that no operator is tried after one of its prefixes.
    pub fn new<K, G, O>(keywords: K, platform_globals: G, operators: O) -> Result<Self, VocabularyError>
    where
        K: IntoIterator,
        K::Item: AsRef<str>,
        G: IntoIterator,
        G::Item: AsRef<str>,
        O: IntoIterator,
        O::Item: AsRef<str>,
    {
        let keywords = collect_words(keywords)?;
        let platform_globals = collect_words(platform_globals)?;

        let mut ops: Vec<Operator> = Vec::new();
        for op in operators {
            let op = op.as_ref();
            if ops.iter().any(|existing| existing.raw == op) {
                continue;
            }
            ops.push(Operator::new(op)?);
        }
        ops.sort_by_key(|op| std::cmp::Reverse(op.raw.chars().count()));

        Ok(Self {
            keywords,
            platform_globals,
            operators: ops,
        })
    }

    /// The process-wide default tables.
    pub fn builtin() -> &'static Vocabulary {
        &BUILTIN
    }

    /// The default tables plus extra keywords and platform globals.
    pub fn extended<S: AsRef<str>>(extra_keywords: &[S], extra_globals: &[S]) -> Result<Self, VocabularyError> {
        let keywords = js_keywords()
            .iter()
            .copied()
            .chain(extra_keywords.iter().map(AsRef::as_ref));
        let globals = workers_globals()
            .iter()
            .copied()
            .chain(extra_globals.iter().map(AsRef::as_ref));
        Self::new(keywords, globals, js_operators())
    }

    pub fn keywords(&self) -> &[String] {
        &self.keywords
    }

    pub fn platform_globals(&self) -> &[String] {
        &self.platform_globals
    }

    /// Operators in the order the operator pass tries them.
    pub fn operators(&self) -> &[Operator] {
        &self.operators
    }

    pub fn is_keyword(&self, word: &str) -> bool {
        self.keywords.iter().any(|k| k == word)
    }

    pub fn is_platform_global(&self, word: &str) -> bool {
        self.platform_globals.iter().any(|g| g == word)
    }
}

impl Default for Vocabulary {
    fn default() -> Self {
        BUILTIN.clone()
    }
}

fn collect_words<I>(words: I) -> Result<Vec<String>, VocabularyError>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    let mut out: Vec<String> = Vec::new();
    for word in words {
        let word = word.as_ref();
        if !is_identifier(word) {
            return Err(VocabularyError::InvalidWord(word.to_string()));
        }
        if !out.iter().any(|w| w == word) {
            out.push(word.to_string());
        }
    }
    Ok(out)
}

/// Characters that may continue a word for whole-word matching.
pub(crate) fn is_ident_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '$'
}

pub(crate) fn is_ident_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_' || c == '$'
}

fn is_identifier(word: &str) -> bool {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) if is_ident_start(first) => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
        }
        _ => false,
    }
}

/// Errors raised while building a vocabulary.
#[derive(Debug, thiserror::Error)]
pub enum VocabularyError {
    #[error("Not an identifier: {0:?}")]
    InvalidWord(String),

    #[error("Invalid operator: {0:?}")]
    InvalidOperator(String),

    #[error("Pattern error: {0}")]
    Pattern(#[from] regex::Error),
}
