//! loglight - layered pattern highlighting for log viewers
//!
//! Lines are classified and coloured by user-defined highlighters grouped in
//! named sets. Any number of sets can be active at once; their rules are
//! combined in set order and matched with a batch prefilter followed by each
//! rule's own regex.

pub mod config;
pub mod display;
pub mod error;
pub mod highlight;
pub mod persist;

pub use config::Config;
pub use error::{HighlightError, Result};
pub use highlight::{
    Color, ColorPair, HighlightedMatch, HighlightedMatchRanges, MatchKind, PatternRule, QuickLabel,
    RuleSet, RuleSetCollection,
};
