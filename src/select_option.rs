//! Select-option predicates for non-enumerable attribute values
//!
//! A select option stands in for an attribute value set too large or
//! continuous to enumerate. It pairs an operator with an inclusion mode:
//!
//! 1. Range and comparison: `Between`, `GreaterThan`, `LessThan`,
//!    `GreaterEqual`, `LessEqual`, `Equal`, `NotEqual`
//! 2. String predicates: `StartsWith`, `EndsWith`, `Contains`
//! 3. Regular expression: `Matches`, with optional `/pattern/flags` form
//!
//! `Exclude` inverts the operator's outcome. Operands must share the
//! candidate value's type; mixed-type predicates never match, in either
//! inclusion mode.

use dashmap::DashMap;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering as CmpOrdering;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::value::Value;

/// Comparison or pattern operator of a select option
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Operator {
    Between,
    GreaterThan,
    LessThan,
    GreaterEqual,
    LessEqual,
    Equal,
    NotEqual,
    StartsWith,
    EndsWith,
    Contains,
    Matches,
}

/// Whether the predicate includes or excludes the values it describes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Inclusion {
    Include,
    Exclude,
}

/// A range/pattern predicate over one candidate value.
///
/// Serializes with the profile wire keys `Operator`, `Option`, `Low` and
/// `High` (`High` only for `Between`).
///
/// # Examples
///
/// ```
/// use authcheck::{Inclusion, Operator, SelectOption, Value};
///
/// let range = SelectOption::between(Inclusion::Include, 4000000, 4999999);
/// assert!(range.matches(&Value::from(4000000)));
/// assert!(range.matches(&Value::from(4999999)));
/// assert!(!range.matches(&Value::from(5000000)));
///
/// let prefix = SelectOption::new(Operator::StartsWith, Inclusion::Include, "Hello");
/// assert!(prefix.matches(&Value::from("Hello there")));
/// assert!(!prefix.matches(&Value::from("hello there")));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectOption {
    #[serde(rename = "Operator")]
    pub operator: Operator,

    #[serde(rename = "Option")]
    pub option: Inclusion,

    #[serde(rename = "Low")]
    pub low: Value,

    /// Upper bound, only meaningful for `Between`
    #[serde(rename = "High", default, skip_serializing_if = "Option::is_none")]
    pub high: Option<Value>,
}

impl SelectOption {
    /// Creates a single-bound select option.
    pub fn new(operator: Operator, option: Inclusion, low: impl Into<Value>) -> Self {
        Self {
            operator,
            option,
            low: low.into(),
            high: None,
        }
    }

    /// Creates a `Between` select option with both bounds.
    pub fn between(option: Inclusion, low: impl Into<Value>, high: impl Into<Value>) -> Self {
        Self {
            operator: Operator::Between,
            option,
            low: low.into(),
            high: Some(high.into()),
        }
    }

    /// Evaluates this predicate against one candidate value.
    ///
    /// Pure and side-effect free; a `Matches` pattern is compiled on
    /// every call. The evaluator's hot path goes through a
    /// [`PatternCache`] instead.
    ///
    /// Degraded inputs never match, regardless of inclusion mode:
    /// mixed-type operands, a `Between` without `High`, a string
    /// predicate over a non-string value, or a `Matches` pattern that
    /// does not compile.
    pub fn matches(&self, value: &Value) -> bool {
        self.eval(value, |pattern, text| {
            compile_pattern(pattern).map(|re| re.is_match(text))
        })
    }

    /// `matches` with compiled patterns looked up in `cache`.
    pub(crate) fn matches_cached(&self, value: &Value, cache: &PatternCache) -> bool {
        self.eval(value, |pattern, text| cache.test(pattern, text))
    }

    fn eval<F>(&self, value: &Value, regex_test: F) -> bool
    where
        F: Fn(&str, &str) -> Option<bool>,
    {
        let base = match self.operator {
            Operator::Between => {
                let Some(high) = &self.high else {
                    return false;
                };
                match (value.compare(&self.low), value.compare(high)) {
                    (Some(lo), Some(hi)) => lo != CmpOrdering::Less && hi != CmpOrdering::Greater,
                    _ => return false,
                }
            }
            Operator::GreaterThan => match value.compare(&self.low) {
                Some(ord) => ord == CmpOrdering::Greater,
                None => return false,
            },
            Operator::LessThan => match value.compare(&self.low) {
                Some(ord) => ord == CmpOrdering::Less,
                None => return false,
            },
            Operator::GreaterEqual => match value.compare(&self.low) {
                Some(ord) => ord != CmpOrdering::Less,
                None => return false,
            },
            Operator::LessEqual => match value.compare(&self.low) {
                Some(ord) => ord != CmpOrdering::Greater,
                None => return false,
            },
            Operator::Equal => match value.compare(&self.low) {
                Some(ord) => ord == CmpOrdering::Equal,
                None => return false,
            },
            Operator::NotEqual => match value.compare(&self.low) {
                Some(ord) => ord != CmpOrdering::Equal,
                None => return false,
            },
            Operator::StartsWith => match (value.as_str(), self.low.as_str()) {
                (Some(v), Some(low)) => v.starts_with(low),
                _ => return false,
            },
            Operator::EndsWith => match (value.as_str(), self.low.as_str()) {
                (Some(v), Some(low)) => v.ends_with(low),
                _ => return false,
            },
            Operator::Contains => match (value.as_str(), self.low.as_str()) {
                (Some(v), Some(low)) => v.contains(low),
                _ => return false,
            },
            Operator::Matches => match (value.as_str(), self.low.as_str()) {
                (Some(v), Some(pattern)) => match regex_test(pattern, v) {
                    Some(matched) => matched,
                    None => return false,
                },
                _ => return false,
            },
        };

        match self.option {
            Inclusion::Include => base,
            Inclusion::Exclude => !base,
        }
    }
}

/// Splits a `/pattern/flags` form into pattern and flags.
///
/// Recognized trailing flags are `g`, `i`, `m`, `s`, `u`, `y`; anything
/// else means the whole string is a bare pattern with no flags.
fn split_delimited(raw: &str) -> (&str, &str) {
    if let Some(rest) = raw.strip_prefix('/') {
        if let Some(idx) = rest.rfind('/') {
            let (pattern, flags) = rest.split_at(idx);
            let flags = &flags[1..];
            if flags.chars().all(|c| matches!(c, 'g' | 'i' | 'm' | 's' | 'u' | 'y')) {
                return (pattern, flags);
            }
        }
    }
    (raw, "")
}

/// Compiles a select-option pattern, `None` when it does not compile.
///
/// `i`, `m` and `s` translate to inline regex flags. `g`, `u` and `y`
/// have no effect on a single-match test and are dropped.
fn compile_pattern(raw: &str) -> Option<Regex> {
    let (pattern, flags) = split_delimited(raw);
    let inline: String = flags.chars().filter(|c| matches!(c, 'i' | 'm' | 's')).collect();

    let full = if inline.is_empty() {
        pattern.to_string()
    } else {
        format!("(?{}){}", inline, pattern)
    };

    Regex::new(&full).ok()
}

/// Cache statistics for monitoring pattern compilation
#[derive(Debug, Clone, Default)]
pub struct CacheStats {
    pub size: usize,
    pub hit_count: u64,
    pub miss_count: u64,
    pub hit_rate: f64,
}

/// Compiled-pattern cache for `Matches` predicates.
///
/// Each distinct pattern is compiled once per cache; a pattern that does
/// not compile is remembered as a permanent non-match. Thread-safe.
#[derive(Debug, Default)]
pub struct PatternCache {
    compiled: DashMap<String, Option<Regex>>,
    hit_count: AtomicU64,
    miss_count: AtomicU64,
}

impl PatternCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Tests `text` against `pattern`, compiling and caching on first use.
    ///
    /// Returns `None` when the pattern does not compile.
    pub fn test(&self, pattern: &str, text: &str) -> Option<bool> {
        if let Some(entry) = self.compiled.get(pattern) {
            self.hit_count.fetch_add(1, Ordering::Relaxed);
            return entry.value().as_ref().map(|re| re.is_match(text));
        }

        self.miss_count.fetch_add(1, Ordering::Relaxed);
        let compiled = compile_pattern(pattern);
        if compiled.is_none() && crate::trace::trace_enabled() {
            tracing::warn!(
                pattern,
                "select option pattern does not compile; predicate will never match"
            );
        }
        let result = compiled.as_ref().map(|re| re.is_match(text));
        self.compiled.insert(pattern.to_string(), compiled);
        result
    }

    /// Current cache statistics
    pub fn stats(&self) -> CacheStats {
        let hit_count = self.hit_count.load(Ordering::Relaxed);
        let miss_count = self.miss_count.load(Ordering::Relaxed);
        let total = hit_count + miss_count;
        let hit_rate = if total > 0 {
            hit_count as f64 / total as f64
        } else {
            0.0
        };

        CacheStats {
            size: self.compiled.len(),
            hit_count,
            miss_count,
            hit_rate,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    fn number(operator: Operator, option: Inclusion) -> SelectOption {
        SelectOption::new(operator, option, 4000000)
    }

    #[test_case(4000000, true ; "low bound is included")]
    #[test_case(3999999, false ; "below low bound")]
    #[test_case(4999999, true ; "high bound is included")]
    #[test_case(5000000, false ; "above high bound")]
    fn test_between_include(value: i64, expected: bool) {
        let range = SelectOption::between(Inclusion::Include, 4000000, 4999999);
        assert_eq!(range.matches(&Value::from(value)), expected);
    }

    #[test_case(4000000, false ; "low bound excluded")]
    #[test_case(3999999, true ; "below low bound passes")]
    #[test_case(4999999, false ; "high bound excluded")]
    #[test_case(5000000, true ; "above high bound passes")]
    fn test_between_exclude(value: i64, expected: bool) {
        let range = SelectOption::between(Inclusion::Exclude, 4000000, 4999999);
        assert_eq!(range.matches(&Value::from(value)), expected);
    }

    #[test_case(Operator::GreaterThan, 4000000, false)]
    #[test_case(Operator::GreaterThan, 4000001, true)]
    #[test_case(Operator::LessThan, 4000000, false)]
    #[test_case(Operator::LessThan, 3999999, true)]
    #[test_case(Operator::GreaterEqual, 3999999, false)]
    #[test_case(Operator::GreaterEqual, 4000000, true)]
    #[test_case(Operator::LessEqual, 4000000, true)]
    #[test_case(Operator::LessEqual, 4000001, false)]
    #[test_case(Operator::Equal, 4000000, true)]
    #[test_case(Operator::Equal, 4000001, false)]
    #[test_case(Operator::NotEqual, 4000000, false)]
    #[test_case(Operator::NotEqual, 4000001, true)]
    fn test_comparison_include(operator: Operator, value: i64, expected: bool) {
        let option = number(operator, Inclusion::Include);
        assert_eq!(option.matches(&Value::from(value)), expected);
    }

    #[test_case(Operator::GreaterThan, 4000000, true)]
    #[test_case(Operator::GreaterThan, 4000001, false)]
    #[test_case(Operator::LessThan, 4000000, true)]
    #[test_case(Operator::LessThan, 3999999, false)]
    #[test_case(Operator::GreaterEqual, 3999999, true)]
    #[test_case(Operator::GreaterEqual, 4000000, false)]
    #[test_case(Operator::LessEqual, 4000000, false)]
    #[test_case(Operator::LessEqual, 4000001, true)]
    #[test_case(Operator::Equal, 4000000, false)]
    #[test_case(Operator::Equal, 4000001, true)]
    #[test_case(Operator::NotEqual, 4000000, true)]
    #[test_case(Operator::NotEqual, 4000001, false)]
    fn test_comparison_exclude(operator: Operator, value: i64, expected: bool) {
        let option = number(operator, Inclusion::Exclude);
        assert_eq!(option.matches(&Value::from(value)), expected);
    }

    #[test]
    fn test_string_comparisons_are_lexicographic() {
        let option = SelectOption::new(Operator::GreaterThan, Inclusion::Include, "m");
        assert!(option.matches(&Value::from("z")));
        assert!(!option.matches(&Value::from("a")));
    }

    #[test]
    fn test_starts_with() {
        let option = SelectOption::new(Operator::StartsWith, Inclusion::Include, "Hello");
        assert!(option.matches(&Value::from("Hello there")));
        assert!(!option.matches(&Value::from("hello there")));
        assert!(!option.matches(&Value::from("aaa Hello there")));
    }

    #[test]
    fn test_ends_with() {
        let option = SelectOption::new(Operator::EndsWith, Inclusion::Include, "Best Regards");
        assert!(option.matches(&Value::from(".... Best Regards")));
        assert!(!option.matches(&Value::from(".... Best Regards aaa")));
    }

    #[test]
    fn test_contains() {
        let option = SelectOption::new(Operator::Contains, Inclusion::Include, "good");
        assert!(option.matches(&Value::from("hello good bye")));
        assert!(!option.matches(&Value::from("hello goo bye")));
    }

    #[test]
    fn test_string_predicate_exclude() {
        let option = SelectOption::new(Operator::Contains, Inclusion::Exclude, "fuck");
        assert!(!option.matches(&Value::from("... fuck ...")));
        assert!(option.matches(&Value::from("... fuc ...")));
    }

    #[test]
    fn test_matches_with_flags() {
        let option = SelectOption::new(Operator::Matches, Inclusion::Include, "/go{2,}d/i");
        assert!(option.matches(&Value::from("hello GoOd bye")));
        assert!(option.matches(&Value::from(".. hello goodbye ..")));
        assert!(!option.matches(&Value::from("hello God bye")));
        assert!(!option.matches(&Value::from("hello Go0d bye")));
    }

    #[test]
    fn test_matches_exclude() {
        let option = SelectOption::new(Operator::Matches, Inclusion::Exclude, "/shit/i");
        assert!(!option.matches(&Value::from("... Shit ...")));
        assert!(!option.matches(&Value::from("... shit, Shit, SHIT ...")));
        assert!(option.matches(&Value::from("... Sh0t ...")));
    }

    #[test]
    fn test_matches_bare_pattern() {
        let option = SelectOption::new(Operator::Matches, Inclusion::Include, "^B[0-9]+$");
        assert!(option.matches(&Value::from("B42")));
        assert!(!option.matches(&Value::from("C42")));
    }

    #[test]
    fn test_unparseable_pattern_never_matches() {
        let option = SelectOption::new(Operator::Matches, Inclusion::Include, "(unclosed");
        assert!(!option.matches(&Value::from("anything")));

        // Degraded predicates stay non-matching under Exclude as well
        let option = SelectOption::new(Operator::Matches, Inclusion::Exclude, "(unclosed");
        assert!(!option.matches(&Value::from("anything")));
    }

    #[test]
    fn test_type_mismatch_fails_closed() {
        let range = SelectOption::between(Inclusion::Include, 4000000, 4999999);
        assert!(!range.matches(&Value::from("4500000")));

        // Exclude does not turn a type mismatch into a match
        let range = SelectOption::between(Inclusion::Exclude, 4000000, 4999999);
        assert!(!range.matches(&Value::from("4500000")));

        let not_equal = SelectOption::new(Operator::NotEqual, Inclusion::Include, 4000000);
        assert!(!not_equal.matches(&Value::from("different type")));

        let prefix = SelectOption::new(Operator::StartsWith, Inclusion::Include, 42);
        assert!(!prefix.matches(&Value::from("42nd street")));
    }

    #[test]
    fn test_between_without_high_never_matches() {
        let option = SelectOption::new(Operator::Between, Inclusion::Include, 4000000);
        assert!(!option.matches(&Value::from(4000000)));

        let option = SelectOption::new(Operator::Between, Inclusion::Exclude, 4000000);
        assert!(!option.matches(&Value::from(4000000)));
    }

    #[test]
    fn test_split_delimited() {
        assert_eq!(split_delimited("/go{2,}d/i"), ("go{2,}d", "i"));
        assert_eq!(split_delimited("/abc/"), ("abc", ""));
        assert_eq!(split_delimited("^B[0-9]+$"), ("^B[0-9]+$", ""));
        // No closing delimiter, or unknown flags: the whole string is the pattern
        assert_eq!(split_delimited("/abc"), ("/abc", ""));
        assert_eq!(split_delimited("/abc/xyz"), ("/abc/xyz", ""));
    }

    #[test]
    fn test_pattern_cache_counts_hits() {
        let cache = PatternCache::new();
        assert_eq!(cache.test("^A", "Apple"), Some(true));
        assert_eq!(cache.test("^A", "Banana"), Some(false));
        assert_eq!(cache.test("^A", "Avocado"), Some(true));

        let stats = cache.stats();
        assert_eq!(stats.size, 1);
        assert_eq!(stats.miss_count, 1);
        assert_eq!(stats.hit_count, 2);
        assert!(stats.hit_rate > 0.6);
    }

    #[test]
    fn test_pattern_cache_remembers_compile_failures() {
        let cache = PatternCache::new();
        assert_eq!(cache.test("(unclosed", "anything"), None);
        assert_eq!(cache.test("(unclosed", "anything"), None);

        let stats = cache.stats();
        assert_eq!(stats.size, 1);
        assert_eq!(stats.miss_count, 1);
        assert_eq!(stats.hit_count, 1);
    }

    #[test]
    fn test_serde_wire_format() {
        let json = r#"{"Operator":"Between","Option":"Include","Low":4000000,"High":4999999}"#;
        let option: SelectOption = serde_json::from_str(json).unwrap();
        assert_eq!(option, SelectOption::between(Inclusion::Include, 4000000, 4999999));

        // High stays absent for single-bound operators
        let single = SelectOption::new(Operator::GreaterThan, Inclusion::Exclude, 4000000);
        let json = serde_json::to_string(&single).unwrap();
        assert!(!json.contains("High"));
        assert_eq!(serde_json::from_str::<SelectOption>(&json).unwrap(), single);
    }
}
