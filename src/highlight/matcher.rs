//! Batch prefilter over many patterns
//!
//! A rule set asks one question per line before running any individual
//! highlighter: "which of these patterns could possibly match?". The answer
//! may over-approximate but must never miss a pattern that really matches.

use regex::bytes::{RegexBuilder, RegexSet, RegexSetBuilder};

/// One pattern handed to a multi-pattern matcher
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpressionPattern {
    /// Regex source, already escaped for literal highlighters
    pub pattern: String,
    pub case_sensitive: bool,
    /// Patterns that are not prefilter-eligible always report "maybe"
    pub is_prefilter: bool,
}

impl ExpressionPattern {
    /// Source with case folding expressed as an inline flag
    fn flagged_source(&self) -> String {
        if self.case_sensitive {
            self.pattern.clone()
        } else {
            format!("(?i:{})", self.pattern)
        }
    }
}

/// Batch matcher contract
///
/// Returns one flag per input pattern, in input order. `false` is a promise
/// that the pattern does not match `text`; `true` only means "maybe".
pub trait MultiPatternMatcher {
    fn match_patterns(&self, text: &[u8]) -> Vec<bool>;
}

/// Prefilter backed by a single `RegexSet`
#[derive(Debug, Clone)]
pub struct RegexSetPrefilter {
    patterns: Vec<ExpressionPattern>,
    /// Compiled set, `None` when the combined set could not be built
    set: Option<RegexSet>,
    /// Position of each input pattern inside `set`
    slots: Vec<Slot>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Slot {
    /// Index into the compiled set
    Set(usize),
    /// Always "maybe"
    Pass,
    /// Pattern does not compile, so it can never match
    Never,
}

impl RegexSetPrefilter {
    /// Build a prefilter over `patterns`
    pub fn new(patterns: Vec<ExpressionPattern>) -> Self {
        let mut sources = Vec::new();
        let mut slots = Vec::with_capacity(patterns.len());

        for pattern in &patterns {
            if !pattern.is_prefilter {
                slots.push(Slot::Pass);
                continue;
            }

            let source = pattern.flagged_source();
            if RegexBuilder::new(&source).build().is_err() {
                log::debug!("prefilter: pattern {:?} does not compile", pattern.pattern);
                slots.push(Slot::Never);
                continue;
            }

            slots.push(Slot::Set(sources.len()));
            sources.push(source);
        }

        let set = match RegexSetBuilder::new(&sources).build() {
            Ok(set) => Some(set),
            Err(e) => {
                log::warn!("prefilter disabled for {} patterns: {}", sources.len(), e);
                None
            }
        };

        Self { patterns, set, slots }
    }

    /// Patterns this prefilter was built from
    pub fn patterns(&self) -> &[ExpressionPattern] {
        &self.patterns
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }
}

impl MultiPatternMatcher for RegexSetPrefilter {
    fn match_patterns(&self, text: &[u8]) -> Vec<bool> {
        let hits = self.set.as_ref().map(|set| set.matches(text));

        self.slots
            .iter()
            .map(|slot| match (slot, &hits) {
                (Slot::Pass, _) => true,
                (Slot::Never, _) => false,
                (Slot::Set(index), Some(hits)) => hits.matched(*index),
                // No usable set: over-approximate rather than miss a match
                (Slot::Set(_), None) => true,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pattern(source: &str, case_sensitive: bool) -> ExpressionPattern {
        ExpressionPattern {
            pattern: source.to_string(),
            case_sensitive,
            is_prefilter: true,
        }
    }

    #[test]
    fn test_one_flag_per_pattern_in_order() {
        let prefilter = RegexSetPrefilter::new(vec![
            pattern("error", true),
            pattern("warn", true),
            pattern(r"\d+", true),
        ]);

        assert_eq!(prefilter.len(), 3);
        assert_eq!(
            prefilter.match_patterns(b"error at line 12"),
            vec![true, false, true]
        );
    }

    #[test]
    fn test_case_folding_is_per_pattern() {
        let prefilter = RegexSetPrefilter::new(vec![
            pattern("ERROR", true),
            pattern("ERROR", false),
        ]);

        assert_eq!(prefilter.match_patterns(b"error"), vec![false, true]);
    }

    #[test]
    fn test_invalid_pattern_does_not_poison_others() {
        let prefilter = RegexSetPrefilter::new(vec![
            pattern("(unclosed", true),
            pattern("closed", true),
        ]);

        assert_eq!(prefilter.match_patterns(b"closed (unclosed"), vec![false, true]);
    }

    #[test]
    fn test_non_prefilter_patterns_always_pass() {
        let mut skipped = pattern("never", true);
        skipped.is_prefilter = false;
        let prefilter = RegexSetPrefilter::new(vec![skipped]);

        assert_eq!(prefilter.match_patterns(b"anything"), vec![true]);
    }

    #[test]
    fn test_empty_prefilter() {
        let prefilter = RegexSetPrefilter::new(Vec::new());
        assert!(prefilter.is_empty());
        assert!(prefilter.match_patterns(b"text").is_empty());
    }
}
