//! Collection of highlighter sets
//!
//! The collection owns every `RuleSet`, the list of active set ids and the
//! quick label bank. Matching runs against a single combined set built from
//! the rules of every active set, in stored set order. Every mutator ends by
//! rebuilding that combined set so it is never observed stale.

use super::labels::{default_quick_labels, normalize_quick_labels, QuickLabel};
use super::set::{HighlightedMatchRanges, MatchKind, RuleSet};

/// All highlighter sets of a session
#[derive(Debug, Clone)]
pub struct RuleSetCollection {
    sets: Vec<RuleSet>,
    active_ids: Vec<String>,
    quick_labels: Vec<QuickLabel>,
    combined_active: RuleSet,
}

impl Default for RuleSetCollection {
    fn default() -> Self {
        Self::new()
    }
}

impl RuleSetCollection {
    /// Empty collection with the built-in quick labels
    pub fn new() -> Self {
        Self {
            sets: Vec::new(),
            active_ids: Vec::new(),
            quick_labels: default_quick_labels(),
            combined_active: RuleSet::with_id("Combined active set", ""),
        }
    }

    /// Assemble a collection from loaded parts
    ///
    /// Active ids that name no set, or repeat an earlier id, are dropped.
    pub fn from_parts(
        sets: Vec<RuleSet>,
        active_ids: Vec<String>,
        quick_labels: Vec<QuickLabel>,
    ) -> Self {
        let mut collection = Self {
            sets: Vec::new(),
            active_ids: Vec::new(),
            quick_labels: normalize_quick_labels(quick_labels),
            combined_active: RuleSet::with_id("Combined active set", ""),
        };

        for set in sets {
            if collection.has_set(set.id()) {
                log::warn!("dropping duplicate highlighter set id {}", set.id());
                continue;
            }
            collection.sets.push(set);
        }
        for id in active_ids {
            if collection.has_set(&id) && !collection.active_ids.contains(&id) {
                collection.active_ids.push(id);
            }
        }

        collection.update_combined_set();
        collection
    }

    pub fn sets(&self) -> &[RuleSet] {
        &self.sets
    }

    /// Replace every set, pruning active ids that no longer exist
    pub fn set_sets(&mut self, sets: Vec<RuleSet>) {
        self.sets = sets;
        let sets = &self.sets;
        self.active_ids.retain(|id| sets.iter().any(|s| s.id() == id));
        self.update_combined_set();
    }

    pub fn get_set(&self, id: &str) -> Option<&RuleSet> {
        self.sets.iter().find(|s| s.id() == id)
    }

    pub fn find_set_by_name(&self, name: &str) -> Option<&RuleSet> {
        self.sets.iter().find(|s| s.name() == name)
    }

    pub fn has_set(&self, id: &str) -> bool {
        self.sets.iter().any(|s| s.id() == id)
    }

    pub fn has_set_by_name(&self, name: &str) -> bool {
        self.sets.iter().any(|s| s.name() == name)
    }

    /// Append a set; returns false if its id is already present
    pub fn add_set(&mut self, set: RuleSet) -> bool {
        if self.has_set(set.id()) {
            log::warn!("highlighter set {} already exists", set.id());
            return false;
        }
        self.sets.push(set);
        self.update_combined_set();
        true
    }

    /// Replace the set with the same id
    pub fn update_set(&mut self, set: RuleSet) -> bool {
        match self.sets.iter_mut().find(|s| s.id() == set.id()) {
            Some(existing) => {
                *existing = set;
                self.update_combined_set();
                true
            }
            None => {
                log::warn!("cannot update unknown highlighter set {}", set.id());
                false
            }
        }
    }

    /// Remove a set and its active membership
    pub fn remove_set(&mut self, id: &str) -> Option<RuleSet> {
        let index = self.sets.iter().position(|s| s.id() == id)?;
        let removed = self.sets.remove(index);
        self.active_ids.retain(|active| active != id);
        self.update_combined_set();
        Some(removed)
    }

    pub fn active_set_ids(&self) -> &[String] {
        &self.active_ids
    }

    pub fn is_active(&self, id: &str) -> bool {
        self.active_ids.iter().any(|active| active == id)
    }

    /// Add a set to the active list
    ///
    /// Returns false without changing anything when the id is unknown or
    /// already active.
    pub fn activate_set(&mut self, id: &str) -> bool {
        log::info!("activating set {}", id);
        if !self.has_set(id) || self.is_active(id) {
            log::warn!("set {} not found or already active", id);
            return false;
        }

        self.active_ids.push(id.to_string());
        self.update_combined_set();
        true
    }

    pub fn deactivate_set(&mut self, id: &str) {
        log::info!("deactivating set {}", id);
        self.active_ids.retain(|active| active != id);
        self.update_combined_set();
    }

    pub fn deactivate_all(&mut self) {
        log::info!("deactivating all sets");
        self.active_ids.clear();
        self.update_combined_set();
    }

    /// Rebuild the combined set from the active sets, in stored set order
    pub fn update_combined_set(&mut self) {
        let rules = self
            .sets
            .iter()
            .filter(|set| self.active_ids.iter().any(|id| id == set.id()))
            .flat_map(|set| set.rules().iter().cloned())
            .collect();

        self.combined_active.set_rules(rules);
        self.combined_active.compile();
    }

    /// The set every line is matched against
    pub fn current_active_set(&self) -> &RuleSet {
        &self.combined_active
    }

    /// Classify and colour one line with the active highlighters
    pub fn match_line(&mut self, line: &str) -> (MatchKind, HighlightedMatchRanges) {
        self.combined_active.match_line(line)
    }

    pub fn quick_labels(&self) -> &[QuickLabel] {
        &self.quick_labels
    }

    /// Replace the quick labels, padding or truncating to the fixed count
    pub fn set_quick_labels(&mut self, labels: Vec<QuickLabel>) {
        self.quick_labels = normalize_quick_labels(labels);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::highlight::color::Color;
    use crate::highlight::labels::QUICK_LABEL_COUNT;
    use crate::highlight::rule::PatternRule;

    fn set_with(name: &str, patterns: &[&str]) -> RuleSet {
        let mut set = RuleSet::new(name);
        for pattern in patterns {
            let fore = Color::rgb(9, 9, 9);
            set.push_rule(PatternRule::new(pattern, false, true, fore, Color::default()));
        }
        set
    }

    fn combined_patterns(collection: &RuleSetCollection) -> Vec<String> {
        collection
            .current_active_set()
            .rules()
            .iter()
            .map(|r| r.pattern().to_string())
            .collect()
    }

    #[test]
    fn test_combined_follows_set_order_not_activation_order() {
        let first = set_with("first", &["a", "b"]);
        let second = set_with("second", &["c"]);
        let (first_id, second_id) = (first.id().to_string(), second.id().to_string());

        let mut collection = RuleSetCollection::new();
        collection.set_sets(vec![first, second]);
        assert!(collection.activate_set(&second_id));
        assert!(collection.activate_set(&first_id));

        assert_eq!(collection.active_set_ids(), &[second_id, first_id]);
        assert_eq!(combined_patterns(&collection), vec!["a", "b", "c"]);
        assert!(collection.current_active_set().is_compiled());
    }

    #[test]
    fn test_activate_unknown_or_duplicate_is_noop() {
        let set = set_with("only", &["x"]);
        let id = set.id().to_string();
        let mut collection = RuleSetCollection::new();
        collection.set_sets(vec![set]);

        assert!(!collection.activate_set("missing"));
        assert!(collection.activate_set(&id));
        assert!(!collection.activate_set(&id));
        assert_eq!(collection.active_set_ids().len(), 1);
    }

    #[test]
    fn test_deactivate() {
        let a = set_with("a", &["a"]);
        let b = set_with("b", &["b"]);
        let (a_id, b_id) = (a.id().to_string(), b.id().to_string());
        let mut collection = RuleSetCollection::new();
        collection.set_sets(vec![a, b]);
        collection.activate_set(&a_id);
        collection.activate_set(&b_id);

        collection.deactivate_set(&a_id);
        assert_eq!(combined_patterns(&collection), vec!["b"]);

        collection.deactivate_all();
        assert!(collection.active_set_ids().is_empty());
        assert!(collection.current_active_set().is_empty());
        assert_eq!(collection.match_line("a b").0, MatchKind::NoMatch);
    }

    #[test]
    fn test_set_sets_prunes_missing_active_ids() {
        let a = set_with("a", &["a"]);
        let b = set_with("b", &["b"]);
        let a_id = a.id().to_string();
        let b_id = b.id().to_string();
        let mut collection = RuleSetCollection::new();
        collection.set_sets(vec![a, b.clone()]);
        collection.activate_set(&a_id);
        collection.activate_set(&b_id);

        collection.set_sets(vec![b]);
        assert_eq!(collection.active_set_ids(), &[b_id]);
        assert_eq!(combined_patterns(&collection), vec!["b"]);
    }

    #[test]
    fn test_editing_recomputes_combined() {
        let a = set_with("a", &["a"]);
        let a_id = a.id().to_string();
        let mut collection = RuleSetCollection::new();
        assert!(collection.add_set(a.clone()));
        assert!(!collection.add_set(a.clone()));
        collection.activate_set(&a_id);

        let mut edited = a;
        edited.push_rule(PatternRule::new("z", false, true, Color::default(), Color::default()));
        assert!(collection.update_set(edited));
        assert_eq!(combined_patterns(&collection), vec!["a", "z"]);

        assert!(collection.remove_set(&a_id).is_some());
        assert!(collection.active_set_ids().is_empty());
        assert!(collection.current_active_set().is_empty());
    }

    #[test]
    fn test_match_line_uses_active_sets() {
        let a = set_with("a", &["disk"]);
        let a_id = a.id().to_string();
        let mut collection = RuleSetCollection::new();
        collection.set_sets(vec![a]);
        assert_eq!(collection.match_line("disk full").0, MatchKind::NoMatch);

        collection.activate_set(&a_id);
        let (kind, ranges) = collection.match_line("disk full");
        assert_eq!(kind, MatchKind::WordMatch);
        assert_eq!(ranges.len(), 1);
    }

    #[test]
    fn test_from_parts_cleans_membership() {
        let a = set_with("a", &["a"]);
        let a_id = a.id().to_string();
        let collection = RuleSetCollection::from_parts(
            vec![a.clone(), a],
            vec![a_id.clone(), "ghost".to_string(), a_id.clone()],
            Vec::new(),
        );

        assert_eq!(collection.sets().len(), 1);
        assert_eq!(collection.active_set_ids(), &[a_id]);
        assert_eq!(collection.quick_labels().len(), QUICK_LABEL_COUNT);
    }

    #[test]
    fn test_lookup_by_name() {
        let mut collection = RuleSetCollection::new();
        collection.set_sets(vec![set_with("errors", &["error"])]);
        assert!(collection.has_set_by_name("errors"));
        assert!(!collection.has_set_by_name("warnings"));
        assert_eq!(collection.find_set_by_name("errors").map(|s| s.len()), Some(1));
    }
}
