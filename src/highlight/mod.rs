//! Highlighting engine
//!
//! This module provides the rule-based highlighter used by the viewer:
//! - Colours and colour variation
//! - Single highlighter rules and their batch prefilter
//! - Ordered highlighter sets and the collection of active sets
//! - Quick labels

mod color;
mod collection;
mod labels;
mod matcher;
mod rule;
mod set;

pub use collection::RuleSetCollection;
pub use color::{Color, ColorPair};
pub use labels::{default_quick_labels, normalize_quick_labels, QuickLabel, QUICK_LABEL_COUNT};
pub use matcher::{ExpressionPattern, MultiPatternMatcher, RegexSetPrefilter};
pub use rule::{variation_factor, HighlightedMatch, PatternRule, DEFAULT_COLOR_VARIANCE};
pub use set::{generate_id, HighlightedMatchRanges, MatchKind, RuleSet};
