//! Persistence of highlighter sets
//!
//! The settings document is a TOML table. The collection lives under
//! `HighlighterSetCollection`:
//!
//! ```text
//! [HighlighterSetCollection]
//! version = 1
//! active_sets = ["5c6e..."]
//!
//! [[HighlighterSetCollection.sets]]
//! version = 1
//! name = "Errors"
//! id = "5c6e..."
//!
//! [[HighlighterSetCollection.sets.highlighters]]
//! regexp = "ERROR"
//! fore_colour = "#ffff0000"
//! back_colour = "#ffffffff"
//!
//! [[HighlighterSetCollection.quick]]
//! name = "Color label 1"
//! fore_colour = "#ff001e80"
//! back_colour = "#ffa1b7ff"
//! cycle = true
//! ```
//!
//! Loading never fails: unreadable entries are skipped one by one and
//! blocks written by a newer build are ignored whole.

mod migrate;
mod schema;

use toml::{Table, Value};

use crate::error::Result;
use crate::highlight::{default_quick_labels, Color, QuickLabel, RuleSet, RuleSetCollection};

pub use migrate::{
    filter_set_to_highlighter_set, read_legacy_blocks, LegacySchema, FILTER_SET_KEY,
    HIGHLIGHTER_SET_KEY,
};
pub use schema::{
    StoredCollection, StoredFilterSet, StoredHighlighter, StoredHighlighterSet, StoredQuickLabel,
    COLLECTION_VERSION, DEFAULT_SET_NAME, FILTER_SET_VERSION, HIGHLIGHTER_SET_VERSION,
};

/// Document key of the collection block
pub const COLLECTION_KEY: &str = "HighlighterSetCollection";

/// Result of reading the settings document
#[derive(Debug)]
pub struct LoadOutcome {
    pub collection: RuleSetCollection,
    /// The document was rewritten in the current schema and should be saved
    pub migrated: bool,
}

/// Write `collection` into `doc` under the collection key
pub fn save_collection(collection: &RuleSetCollection, doc: &mut Table) -> Result<()> {
    log::info!("saving highlighter sets, v{}", COLLECTION_VERSION);

    let stored = StoredCollection {
        version: COLLECTION_VERSION,
        active_sets: collection.active_set_ids().to_vec(),
        sets: collection.sets().iter().map(StoredHighlighterSet::from).collect(),
        quick: collection.quick_labels().iter().map(StoredQuickLabel::from).collect(),
    };

    let block = Value::try_from(stored)?;
    doc.insert(COLLECTION_KEY.to_string(), block);
    Ok(())
}

/// Read the collection from `doc`, migrating legacy blocks
///
/// When a legacy block was imported the legacy keys are removed and the
/// collection is written back into `doc` in its current form.
pub fn load_collection(doc: &mut Table) -> LoadOutcome {
    log::debug!("loading highlighter sets");

    let block = read_collection_block(doc);
    let collection_rejected = doc.contains_key(COLLECTION_KEY) && block.is_none();
    let mut block = block.unwrap_or_default();

    let mut migrated = false;
    if let Some(current) = block.current.take() {
        // Older collections stored a single "current" set
        if !current.is_empty() && !block.active_ids.contains(&current) {
            block.active_ids.push(current);
        }
        migrated = true;
    }

    let mut collection =
        RuleSetCollection::from_parts(block.sets, block.active_ids, block.quick_labels);

    let mut consumed = Vec::new();
    for legacy in read_legacy_blocks(doc) {
        let key = legacy.key();
        let set = legacy.into_highlighter_set().to_rule_set();
        if set.is_empty() {
            // An empty filter block is still retired
            if key == FILTER_SET_KEY {
                consumed.push(key);
                migrated = true;
            }
            continue;
        }

        log::info!("importing old highlighter set {}", set.id());
        import_legacy_set(&mut collection, set);
        consumed.push(key);
        migrated = true;
    }

    log::info!("loaded {} highlighter sets", collection.sets().len());

    if migrated {
        if collection_rejected {
            log::warn!("not migrating legacy highlighters into an unsupported collection");
            return LoadOutcome {
                collection,
                migrated: false,
            };
        }

        for key in consumed {
            doc.remove(key);
        }
        if let Err(e) = save_collection(&collection, doc) {
            log::error!("cannot rewrite migrated highlighters: {}", e);
        }
    }

    LoadOutcome { collection, migrated }
}

/// Add an imported set and make it active
fn import_legacy_set(collection: &mut RuleSetCollection, set: RuleSet) {
    let id = set.id().to_string();
    if !collection.add_set(set) {
        log::warn!("legacy set {} already imported", id);
    }
    collection.activate_set(&id);
}

/// Parts of a collection block
#[derive(Debug, Default)]
struct CollectionBlock {
    sets: Vec<RuleSet>,
    active_ids: Vec<String>,
    current: Option<String>,
    quick_labels: Vec<QuickLabel>,
}

/// Read the collection block, entry by entry
///
/// Returns `None` when the block is absent or from a newer build.
fn read_collection_block(doc: &Table) -> Option<CollectionBlock> {
    let block = migrate::versioned_block(doc, COLLECTION_KEY, COLLECTION_VERSION)?;
    let block = block.as_table()?;
    let array = |key: &str| block.get(key).and_then(Value::as_array).cloned().unwrap_or_default();

    let mut sets = Vec::new();
    for (i, value) in array("sets").into_iter().enumerate() {
        match value.try_into::<StoredHighlighterSet>() {
            Ok(stored) if stored.version > HIGHLIGHTER_SET_VERSION => {
                log::error!(
                    "unknown version {} of highlighter set {}, ignoring it",
                    stored.version,
                    i
                );
            }
            Ok(stored) => sets.push(stored.to_rule_set()),
            Err(e) => log::error!("cannot read highlighter set {}: {}", i, e),
        }
    }

    let active_ids = array("active_sets")
        .iter()
        .filter_map(Value::as_str)
        .map(str::to_string)
        .collect();

    let current = block.get("current").and_then(Value::as_str).map(str::to_string);

    let defaults = default_quick_labels();
    let quick_labels = array("quick")
        .into_iter()
        .enumerate()
        .map(|(i, value)| match value.try_into::<StoredQuickLabel>() {
            Ok(stored) => stored.to_quick_label(i),
            Err(e) => {
                log::warn!("cannot read quick label {}, using default: {}", i, e);
                defaults.get(i).cloned().unwrap_or_else(|| {
                    let name = QuickLabel::default_name(i);
                    QuickLabel::new(&name, Color::default(), Color::default(), true)
                })
            }
        })
        .collect();

    Some(CollectionBlock {
        sets,
        active_ids,
        current,
        quick_labels,
    })
}
