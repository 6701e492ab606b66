//! Markup escaping.
//!
//! Runs once, before any pass. Every later pass works on escaped text, so
//! the only `&` characters left in the stream start one of the three
//! entities produced here.

/// Replaces `&`, `<` and `>` with their entity spellings.
pub fn escape(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len() + raw.len() / 8);
    for c in raw.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_metacharacters() {
        assert_eq!(escape("a < b && c > d"), "a &lt; b &amp;&amp; c &gt; d");
    }

    #[test]
    fn test_escape_leaves_other_text_alone() {
        assert_eq!(escape("const “x” = 'y';"), "const “x” = 'y';");
        assert_eq!(escape(""), "");
    }
}
