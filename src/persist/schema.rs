//! Stored form of highlighters, sets and quick labels
//!
//! These are the serde shapes written into the settings document. Colours
//! are kept as `#AARRGGBB` strings so the file stays readable and a bad
//! colour never fails a whole entry.

use serde::{Deserialize, Serialize};

use crate::highlight::{Color, PatternRule, QuickLabel, RuleSet, DEFAULT_COLOR_VARIANCE};

/// Highest `FilterSet` version this build understands
pub const FILTER_SET_VERSION: i64 = 1;
/// Highest `HighlighterSet` version this build understands
pub const HIGHLIGHTER_SET_VERSION: i64 = 1;
/// Highest `HighlighterSetCollection` version this build understands
pub const COLLECTION_VERSION: i64 = 1;

pub const DEFAULT_SET_NAME: &str = "Highlighters set";

fn default_true() -> bool {
    true
}

fn default_variance() -> i64 {
    i64::from(DEFAULT_COLOR_VARIANCE)
}

/// One highlighter
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredHighlighter {
    #[serde(default)]
    pub regexp: String,
    #[serde(default)]
    pub ignore_case: bool,
    #[serde(default)]
    pub match_only: bool,
    #[serde(default = "default_true")]
    pub use_regex: bool,
    #[serde(default)]
    pub variate_colors: bool,
    #[serde(default = "default_variance")]
    pub color_variance: i64,
    #[serde(default)]
    pub fore_colour: String,
    #[serde(default)]
    pub back_colour: String,
}

impl From<&PatternRule> for StoredHighlighter {
    fn from(rule: &PatternRule) -> Self {
        Self {
            regexp: rule.pattern().to_string(),
            ignore_case: rule.ignore_case(),
            match_only: rule.match_only_text(),
            use_regex: rule.use_regex(),
            variate_colors: rule.variate_colors(),
            color_variance: i64::from(rule.color_variance()),
            fore_colour: rule.fore_color().to_hex_argb(),
            back_colour: rule.back_color().to_hex_argb(),
        }
    }
}

impl From<&StoredHighlighter> for PatternRule {
    fn from(stored: &StoredHighlighter) -> Self {
        let mut rule = PatternRule::new(
            &stored.regexp,
            stored.ignore_case,
            stored.match_only,
            Color::parse_or_default(&stored.fore_colour),
            Color::parse_or_default(&stored.back_colour),
        );
        rule.set_use_regex(stored.use_regex);
        rule.set_variate_colors(stored.variate_colors);
        rule.set_color_variance(stored.color_variance);
        rule
    }
}

/// One highlighter set
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredHighlighterSet {
    pub version: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default)]
    pub highlighters: Vec<StoredHighlighter>,
}

impl From<&RuleSet> for StoredHighlighterSet {
    fn from(set: &RuleSet) -> Self {
        Self {
            version: HIGHLIGHTER_SET_VERSION,
            name: Some(set.name().to_string()),
            id: Some(set.id().to_string()),
            highlighters: set.rules().iter().map(StoredHighlighter::from).collect(),
        }
    }
}

impl StoredHighlighterSet {
    /// Convert into a live set, generating an id when none was stored
    pub fn to_rule_set(&self) -> RuleSet {
        let name = self.name.as_deref().unwrap_or(DEFAULT_SET_NAME);
        let mut set = match self.id.as_deref() {
            Some(id) if !id.is_empty() => RuleSet::with_id(name, id),
            _ => RuleSet::new(name),
        };
        set.set_rules(self.highlighters.iter().map(PatternRule::from).collect());
        set
    }
}

/// The pre-highlighter "filters" block
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct StoredFilterSet {
    pub version: i64,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub filters: Vec<StoredHighlighter>,
}

/// One quick label
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredQuickLabel {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default)]
    pub fore_colour: String,
    #[serde(default)]
    pub back_colour: String,
    #[serde(default = "default_true")]
    pub cycle: bool,
}

impl From<&QuickLabel> for StoredQuickLabel {
    fn from(label: &QuickLabel) -> Self {
        Self {
            name: Some(label.name.clone()),
            fore_colour: label.colors.fore.to_hex_argb(),
            back_colour: label.colors.back.to_hex_argb(),
            cycle: label.use_in_cycle,
        }
    }
}

impl StoredQuickLabel {
    /// Convert the label stored in slot `index`
    pub fn to_quick_label(&self, index: usize) -> QuickLabel {
        let name = self.name.clone().unwrap_or_else(|| QuickLabel::default_name(index));
        QuickLabel::new(
            &name,
            Color::parse_or_default(&self.fore_colour),
            Color::parse_or_default(&self.back_colour),
            self.cycle,
        )
    }
}

/// The collection block as written by this build
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StoredCollection {
    pub version: i64,
    pub active_sets: Vec<String>,
    pub sets: Vec<StoredHighlighterSet>,
    pub quick: Vec<StoredQuickLabel>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_highlighter_defaults() {
        let stored: StoredHighlighter = toml::from_str(r#"regexp = "error""#).unwrap();
        assert!(stored.use_regex);
        assert!(!stored.match_only);
        assert_eq!(stored.color_variance, 15);

        let rule = PatternRule::from(&stored);
        assert_eq!(rule.pattern(), "error");
        assert_eq!(rule.fore_color(), Color::default());
    }

    #[test]
    fn test_bad_colour_does_not_fail_entry() {
        let stored: StoredHighlighter = toml::from_str(
            r##"
regexp = "x"
fore_colour = "purple-ish"
back_colour = "#ff102030"
"##,
        )
        .unwrap();

        let rule = PatternRule::from(&stored);
        assert_eq!(rule.fore_color(), Color::default());
        assert_eq!(rule.back_color(), Color::rgb(0x10, 0x20, 0x30));
    }

    #[test]
    fn test_variance_clamped_on_load() {
        let stored: StoredHighlighter = toml::from_str("color_variance = 400").unwrap();
        assert_eq!(PatternRule::from(&stored).color_variance(), 100);
    }

    #[test]
    fn test_set_without_id_gets_one() {
        let stored = StoredHighlighterSet {
            version: 1,
            name: None,
            id: None,
            highlighters: Vec::new(),
        };
        let set = stored.to_rule_set();
        assert_eq!(set.name(), DEFAULT_SET_NAME);
        assert!(!set.id().is_empty());
    }

    #[test]
    fn test_quick_label_default_name() {
        let stored: StoredQuickLabel = toml::from_str(r##"fore_colour = "#ff000000""##).unwrap();
        let label = stored.to_quick_label(4);
        assert_eq!(label.name, "Color label 5");
        assert!(label.use_in_cycle);
    }
}
