// 🔎 Filter Engine - Which items are visible for a (category, allergy) selection
// Pure functions over the catalog. The flow controller owns the selection and
// calls in here on every filter intent.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::catalog::{AllergyTag, CatalogStore, Category, MenuItem};

// ============================================================================
// FILTER SELECTION
// ============================================================================

/// Session-scoped filter state: exactly one category, any number of tags.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterSelection {
    pub category: Category,
    pub allergy_tags: BTreeSet<AllergyTag>,
}

impl FilterSelection {
    pub fn new() -> Self {
        FilterSelection {
            category: Category::default(),
            allergy_tags: BTreeSet::new(),
        }
    }

    /// Toggle a tag in or out of the selection (symmetric difference).
    /// Applying the same toggle twice restores the original selection.
    pub fn toggle_allergy(&mut self, tag: AllergyTag) {
        if !self.allergy_tags.remove(&tag) {
            self.allergy_tags.insert(tag);
        }
    }

    pub fn has_tag(&self, tag: AllergyTag) -> bool {
        self.allergy_tags.contains(&tag)
    }
}

impl Default for FilterSelection {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// MATCH POLICY
// ============================================================================

/// How selected allergy tags combine.
///
/// `AnyTag` is the shipped behavior: an item is visible if it carries at
/// least one selected tag (selecting Vegan + Nut-Free shows the union).
/// `AllTags` is the intersection variant, kept behind this switch pending
/// product confirmation - nothing in the binaries enables it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchPolicy {
    AnyTag,
    AllTags,
}

impl Default for MatchPolicy {
    fn default() -> Self {
        MatchPolicy::AnyTag
    }
}

// ============================================================================
// VISIBLE ITEMS
// ============================================================================

/// Compute the visible item list for a selection.
///
/// Category match is exact equality. An empty tag selection passes the
/// category list through unchanged - the allergy filter is opt-in. The
/// result preserves catalog order; no re-sorting. An empty result is a
/// normal outcome.
pub fn visible_items(
    store: &CatalogStore,
    selection: &FilterSelection,
    policy: MatchPolicy,
) -> Vec<MenuItem> {
    store
        .items_by_category(selection.category)
        .into_iter()
        .filter(|item| matches_tags(item, &selection.allergy_tags, policy))
        .cloned()
        .collect()
}

fn matches_tags(item: &MenuItem, selected: &BTreeSet<AllergyTag>, policy: MatchPolicy) -> bool {
    if selected.is_empty() {
        return true;
    }

    match policy {
        MatchPolicy::AnyTag => selected.iter().any(|tag| item.has_tag(*tag)),
        MatchPolicy::AllTags => selected.iter().all(|tag| item.has_tag(*tag)),
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn fixture() -> CatalogStore {
        use AllergyTag::*;
        CatalogStore::new(vec![
            MenuItem::new("r1", "Garden Rice", "img", Category::RiceBowl, vec![Vegan, GlutenFree]),
            MenuItem::new("r2", "Chicken Rice", "img", Category::RiceBowl, vec![NutFree]),
            MenuItem::new("r3", "Plain Rice", "img", Category::RiceBowl, vec![]),
            MenuItem::new("s1", "Green Salad", "img", Category::SaladBowl, vec![Vegan, NutFree]),
        ])
        .unwrap()
    }

    fn ids(items: &[MenuItem]) -> Vec<&str> {
        items.iter().map(|i| i.id.as_str()).collect()
    }

    #[test]
    fn test_empty_tag_selection_passes_category_through() {
        let store = fixture();
        let selection = FilterSelection {
            category: Category::RiceBowl,
            allergy_tags: BTreeSet::new(),
        };

        let visible = visible_items(&store, &selection, MatchPolicy::AnyTag);
        assert_eq!(ids(&visible), vec!["r1", "r2", "r3"]);
    }

    #[test]
    fn test_single_tag_filters_within_category() {
        let store = fixture();
        let mut selection = FilterSelection::new();
        selection.toggle_allergy(AllergyTag::Vegan);

        let visible = visible_items(&store, &selection, MatchPolicy::AnyTag);
        // s1 is vegan too, but it is in another category
        assert_eq!(ids(&visible), vec!["r1"]);
    }

    #[test]
    fn test_any_tag_is_union_not_intersection() {
        let store = fixture();
        let mut selection = FilterSelection::new();
        selection.toggle_allergy(AllergyTag::Vegan);
        selection.toggle_allergy(AllergyTag::NutFree);

        let visible = visible_items(&store, &selection, MatchPolicy::AnyTag);
        // r1 is vegan, r2 is nut-free; neither is both
        assert_eq!(ids(&visible), vec!["r1", "r2"]);
    }

    #[test]
    fn test_adding_a_tag_never_shrinks_the_result() {
        // OR-semantics are monotone: a previously-visible item stays visible
        let store = fixture();
        let mut selection = FilterSelection::new();
        selection.toggle_allergy(AllergyTag::Vegan);

        let before = visible_items(&store, &selection, MatchPolicy::AnyTag);
        selection.toggle_allergy(AllergyTag::NutFree);
        let after = visible_items(&store, &selection, MatchPolicy::AnyTag);

        for item in &before {
            assert!(after.contains(item), "{} disappeared after adding a tag", item.id);
        }
    }

    #[test]
    fn test_all_tags_is_intersection() {
        let store = fixture();
        let mut selection = FilterSelection::new();
        selection.category = Category::SaladBowl;
        selection.toggle_allergy(AllergyTag::Vegan);
        selection.toggle_allergy(AllergyTag::NutFree);

        let visible = visible_items(&store, &selection, MatchPolicy::AllTags);
        assert_eq!(ids(&visible), vec!["s1"]);

        // Same tags against RiceBowl: no item carries both
        selection.category = Category::RiceBowl;
        let visible = visible_items(&store, &selection, MatchPolicy::AllTags);
        assert!(visible.is_empty());
    }

    #[test]
    fn test_policy_irrelevant_with_no_tags() {
        let store = fixture();
        let selection = FilterSelection::new();

        let any = visible_items(&store, &selection, MatchPolicy::AnyTag);
        let all = visible_items(&store, &selection, MatchPolicy::AllTags);
        assert_eq!(any, all);
    }

    #[test]
    fn test_toggle_twice_is_involution() {
        let mut selection = FilterSelection::new();
        let original = selection.clone();

        selection.toggle_allergy(AllergyTag::SoyFree);
        assert!(selection.has_tag(AllergyTag::SoyFree));

        selection.toggle_allergy(AllergyTag::SoyFree);
        assert_eq!(selection, original);
    }

    #[test]
    fn test_empty_result_is_not_an_error() {
        let store = fixture();
        let selection = FilterSelection {
            category: Category::HummusBowl,
            allergy_tags: BTreeSet::new(),
        };

        let visible = visible_items(&store, &selection, MatchPolicy::AnyTag);
        assert!(visible.is_empty());
    }
}
