//! Legacy highlighter blocks
//!
//! Before the collection block existed the settings held a single
//! `HighlighterSet`, and before that a `FilterSet` of "filters". Each old
//! shape is one variant here, and each transition is its own function so a
//! block is upgraded one version at a time.

use toml::{Table, Value};

use super::schema::{
    StoredFilterSet, StoredHighlighterSet, DEFAULT_SET_NAME, FILTER_SET_VERSION,
    HIGHLIGHTER_SET_VERSION,
};
use crate::highlight::generate_id;

/// Document key of the oldest block
pub const FILTER_SET_KEY: &str = "FilterSet";
/// Document key of the unwrapped single set
pub const HIGHLIGHTER_SET_KEY: &str = "HighlighterSet";

/// A legacy block found in the settings document
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LegacySchema {
    FilterSet(StoredFilterSet),
    HighlighterSet(StoredHighlighterSet),
}

impl LegacySchema {
    /// Document key the block was read from
    pub fn key(&self) -> &'static str {
        match self {
            Self::FilterSet(_) => FILTER_SET_KEY,
            Self::HighlighterSet(_) => HIGHLIGHTER_SET_KEY,
        }
    }

    /// Upgrade through every later shape up to a highlighter set
    pub fn into_highlighter_set(self) -> StoredHighlighterSet {
        match self {
            Self::FilterSet(filters) => filter_set_to_highlighter_set(filters),
            Self::HighlighterSet(set) => set,
        }
    }
}

/// `FilterSet` → `HighlighterSet`
pub fn filter_set_to_highlighter_set(filters: StoredFilterSet) -> StoredHighlighterSet {
    StoredHighlighterSet {
        version: HIGHLIGHTER_SET_VERSION,
        name: Some(filters.name.unwrap_or_else(|| DEFAULT_SET_NAME.to_string())),
        id: Some(filters.id.unwrap_or_else(generate_id)),
        highlighters: filters.filters,
    }
}

/// Read the legacy blocks present in `doc`, oldest first
///
/// Blocks without a version are treated as absent. Blocks written by a newer
/// build, or that fail to parse, are skipped whole and left in the document.
pub fn read_legacy_blocks(doc: &Table) -> Vec<LegacySchema> {
    let mut blocks = Vec::new();

    if let Some(block) = versioned_block(doc, FILTER_SET_KEY, FILTER_SET_VERSION) {
        match block.try_into::<StoredFilterSet>() {
            Ok(filters) => {
                log::info!("found old filters");
                blocks.push(LegacySchema::FilterSet(filters));
            }
            Err(e) => log::error!("cannot read {}: {}", FILTER_SET_KEY, e),
        }
    }

    if let Some(block) = versioned_block(doc, HIGHLIGHTER_SET_KEY, HIGHLIGHTER_SET_VERSION) {
        match block.try_into::<StoredHighlighterSet>() {
            Ok(set) => blocks.push(LegacySchema::HighlighterSet(set)),
            Err(e) => log::error!("cannot read {}: {}", HIGHLIGHTER_SET_KEY, e),
        }
    }

    blocks
}

/// The table at `key` if it carries a supported version
pub(super) fn versioned_block(doc: &Table, key: &str, supported: i64) -> Option<Value> {
    let block = doc.get(key)?.as_table()?;
    let version = match block.get("version").and_then(Value::as_integer) {
        Some(version) => version,
        None => {
            log::debug!("{} has no version, ignoring it", key);
            return None;
        }
    };

    if version > supported {
        log::error!("unknown version {} of {}, ignoring it", version, key);
        return None;
    }
    Some(Value::Table(block.clone()))
}
