//! Ordered, named collections of highlighters
//!
//! A `RuleSet` matches a line in two phases: a single batch prefilter pass
//! over every rule, then the full match of each rule the prefilter did not
//! rule out. Rules are visited from last to first, which gives whole-line
//! rules declared earlier the final say.

use uuid::Uuid;

use super::matcher::{MultiPatternMatcher, RegexSetPrefilter};
use super::rule::{HighlightedMatch, PatternRule};

/// Classification of a matched line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MatchKind {
    #[default]
    NoMatch,
    /// Only parts of the line are highlighted
    WordMatch,
    /// The whole line is highlighted
    LineMatch,
}

/// Coloured ranges collected while matching one line
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HighlightedMatchRanges {
    matches: Vec<HighlightedMatch>,
}

impl HighlightedMatchRanges {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_match(&mut self, m: HighlightedMatch) {
        self.matches.push(m);
    }

    pub fn add_matches(&mut self, matches: impl IntoIterator<Item = HighlightedMatch>) {
        self.matches.extend(matches);
    }

    pub fn clear(&mut self) {
        self.matches.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.matches.is_empty()
    }

    pub fn len(&self) -> usize {
        self.matches.len()
    }

    pub fn as_slice(&self) -> &[HighlightedMatch] {
        &self.matches
    }

    pub fn iter(&self) -> std::slice::Iter<'_, HighlightedMatch> {
        self.matches.iter()
    }
}

impl<'a> IntoIterator for &'a HighlightedMatchRanges {
    type Item = &'a HighlightedMatch;
    type IntoIter = std::slice::Iter<'a, HighlightedMatch>;

    fn into_iter(self) -> Self::IntoIter {
        self.matches.iter()
    }
}

/// Generate a fresh set identifier
pub fn generate_id() -> String {
    Uuid::new_v4().to_string()
}

/// A named, identified list of highlighters
#[derive(Debug, Clone)]
pub struct RuleSet {
    name: String,
    id: String,
    rules: Vec<PatternRule>,
    /// Combined prefilter, `None` until compiled or after a mutation
    compiled: Option<RegexSetPrefilter>,
}

impl PartialEq for RuleSet {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && self.id == other.id && self.rules == other.rules
    }
}

impl Eq for RuleSet {}

impl Default for RuleSet {
    fn default() -> Self {
        Self::new("Highlighters set")
    }
}

impl RuleSet {
    /// Create an empty set with a freshly generated id
    pub fn new(name: &str) -> Self {
        Self::with_id(name, &generate_id())
    }

    /// Create an empty set with a known id
    pub fn with_id(name: &str, id: &str) -> Self {
        Self {
            name: name.to_string(),
            id: id.to_string(),
            rules: Vec::new(),
            compiled: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: &str) {
        self.name = name.to_string();
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn rules(&self) -> &[PatternRule] {
        &self.rules
    }

    /// Mutable access to the rules; drops the compiled prefilter
    pub fn rules_mut(&mut self) -> &mut Vec<PatternRule> {
        self.compiled = None;
        &mut self.rules
    }

    pub fn set_rules(&mut self, rules: Vec<PatternRule>) {
        self.rules = rules;
        self.compiled = None;
    }

    pub fn push_rule(&mut self, rule: PatternRule) {
        self.rules.push(rule);
        self.compiled = None;
    }

    /// Insert a rule at `index`, or append when out of range
    pub fn insert_rule(&mut self, index: usize, rule: PatternRule) {
        let index = index.min(self.rules.len());
        self.rules.insert(index, rule);
        self.compiled = None;
    }

    pub fn remove_rule(&mut self, index: usize) -> Option<PatternRule> {
        if index >= self.rules.len() {
            return None;
        }
        self.compiled = None;
        Some(self.rules.remove(index))
    }

    /// Move a rule to a new position, changing its priority
    pub fn move_rule(&mut self, from: usize, to: usize) -> bool {
        if from >= self.rules.len() || to >= self.rules.len() {
            return false;
        }
        let rule = self.rules.remove(from);
        self.rules.insert(to, rule);
        self.compiled = None;
        true
    }

    pub fn clear(&mut self) {
        self.rules.clear();
        self.compiled = None;
    }

    /// Whether the combined prefilter is cached
    pub fn is_compiled(&self) -> bool {
        self.compiled.is_some()
    }

    /// Build the combined prefilter and compile every rule
    pub fn compile(&mut self) {
        let patterns = self.rules.iter().map(PatternRule::expression_pattern).collect();
        self.compiled = Some(RegexSetPrefilter::new(patterns));

        for rule in &mut self.rules {
            if !rule.is_compiled() {
                rule.compile();
            }
        }
    }

    /// Classify and colour one line
    ///
    /// Rules are visited from last to first. Match-only rules add their
    /// ranges; a whole-line rule discards everything collected so far and
    /// colours the full line with its base colours. The earliest declared
    /// whole-line rule therefore wins, while match-only ranges accumulate
    /// until a whole-line rule wipes them.
    pub fn match_line(&mut self, line: &str) -> (MatchKind, HighlightedMatchRanges) {
        let mut ranges = HighlightedMatchRanges::new();
        if self.rules.is_empty() {
            return (MatchKind::NoMatch, ranges);
        }

        if self.compiled.is_none() {
            self.compile();
        }
        let candidates = match &self.compiled {
            // Strings are already UTF-8, which is what the prefilter expects
            Some(prefilter) => prefilter.match_patterns(line.as_bytes()),
            None => vec![true; self.rules.len()],
        };

        let mut kind = MatchKind::NoMatch;
        for (rule, candidate) in self.rules.iter_mut().zip(candidates).rev() {
            if !candidate {
                continue;
            }

            let matches = rule.match_line(line);
            if matches.is_empty() {
                continue;
            }

            if rule.match_only_text() {
                if kind != MatchKind::LineMatch {
                    kind = MatchKind::WordMatch;
                }
                ranges.add_matches(matches);
            } else {
                kind = MatchKind::LineMatch;
                ranges.clear();
                ranges.add_match(HighlightedMatch::new(0, line.len(), rule.colors()));
            }
        }

        (kind, ranges)
    }
}
