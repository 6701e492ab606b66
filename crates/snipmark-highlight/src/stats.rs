//! Summary statistics for a highlight request.

use serde::Serialize;
use std::fmt;

use crate::pipeline::PassCounters;

/// Per-request statistics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Stats {
    /// Newline-delimited segments of the raw input
    pub lines: usize,
    /// Characters (Unicode scalar values) of the raw input
    pub chars: usize,
    /// Keyword wraps produced by the keyword pass
    pub keyword_count: usize,
    /// Function-call wraps produced by the function-call pass
    pub function_count: usize,
}

impl Stats {
    /// Combines measurements of the raw input with the pass counters.
    pub fn collect(source: &str, counters: &PassCounters) -> Self {
        let input = InputStats::measure(source);
        Self {
            lines: input.lines,
            chars: input.chars,
            keyword_count: counters.keywords,
            function_count: counters.functions,
        }
    }
}

impl fmt::Display for Stats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} lines · {} chars · {} keywords · {} functions",
            self.lines, self.chars, self.keyword_count, self.function_count
        )
    }
}

/// Line and character counts of text that has not been highlighted.
///
/// Unlike [`Stats`], blank input is not special-cased: an empty string is
/// still one (empty) line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct InputStats {
    pub lines: usize,
    pub chars: usize,
}

impl InputStats {
    pub fn measure(source: &str) -> Self {
        Self {
            lines: source.split('\n').count(),
            chars: source.chars().count(),
        }
    }
}

impl fmt::Display for InputStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} lines · {} chars", self.lines, self.chars)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_input_stats() {
        assert_eq!(InputStats::measure(""), InputStats { lines: 1, chars: 0 });
        assert_eq!(InputStats::measure("a\nb\n"), InputStats { lines: 3, chars: 4 });
        assert_eq!(InputStats::measure("“é”").chars, 3);
    }

    #[test]
    fn test_collect_uses_counters() {
        let counters = PassCounters {
            keywords: 2,
            functions: 1,
        };
        let stats = Stats::collect("let x\nfoo()", &counters);
        assert_eq!(stats.lines, 2);
        assert_eq!(stats.chars, 11);
        assert_eq!(stats.keyword_count, 2);
        assert_eq!(stats.function_count, 1);
    }

    #[test]
    fn test_stats_json_field_names() {
        let json = serde_json::to_value(Stats::default()).unwrap();
        assert!(json.get("keywordCount").is_some());
        assert!(json.get("functionCount").is_some());
    }
}
