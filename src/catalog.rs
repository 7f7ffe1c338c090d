// 🍛 Menu Catalog - Immutable registry of menu items and their taxonomy
// Categories and allergy tags are closed sets known at build time.
// Items are injected at construction (list, JSON file, or canned defaults);
// after that the store is read-only for the process lifetime.

use anyhow::{bail, Context as AnyhowContext, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::Path;

// ============================================================================
// CATEGORY
// ============================================================================

/// Top-level menu grouping. Closed set - the seven MenuPro styles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    RiceBowl,
    SaladBowl,
    FriesBowl,
    Naanarito,
    PitaWrap,
    Naanadilla,
    HummusBowl,
}

impl Category {
    /// All categories in menu order (the order the tabs render in)
    pub const ALL: [Category; 7] = [
        Category::RiceBowl,
        Category::SaladBowl,
        Category::FriesBowl,
        Category::Naanarito,
        Category::PitaWrap,
        Category::Naanadilla,
        Category::HummusBowl,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::RiceBowl => "Rice Bowl",
            Category::SaladBowl => "Salad Bowl",
            Category::FriesBowl => "Fries Bowl",
            Category::Naanarito => "Naanarito",
            Category::PitaWrap => "Pita Wrap",
            Category::Naanadilla => "Naanadilla",
            Category::HummusBowl => "Hummus Bowl",
        }
    }
}

impl Default for Category {
    /// The menu opens on the first tab
    fn default() -> Self {
        Category::RiceBowl
    }
}

// ============================================================================
// ALLERGY TAG
// ============================================================================

/// Dietary/allergen attribute an item may carry.
/// Used only as a filter, never as a grouping key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum AllergyTag {
    GlutenFree,
    DairyFree,
    NutFree,
    Vegan,
    Vegetarian,
    SoyFree,
}

impl AllergyTag {
    pub const ALL: [AllergyTag; 6] = [
        AllergyTag::GlutenFree,
        AllergyTag::DairyFree,
        AllergyTag::NutFree,
        AllergyTag::Vegan,
        AllergyTag::Vegetarian,
        AllergyTag::SoyFree,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AllergyTag::GlutenFree => "Gluten-Free",
            AllergyTag::DairyFree => "Dairy-Free",
            AllergyTag::NutFree => "Nut-Free",
            AllergyTag::Vegan => "Vegan",
            AllergyTag::Vegetarian => "Vegetarian",
            AllergyTag::SoyFree => "Soy-Free",
        }
    }
}

// ============================================================================
// MENU ITEM
// ============================================================================

/// A single orderable item.
///
/// `id` is unique across the catalog. `category` is exactly one value,
/// `allergy_tags` may be empty. No price here - pricing belongs to the
/// renderer/ordering layer, the catalog only describes the item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MenuItem {
    pub id: String,
    pub name: String,
    pub image: String,
    pub category: Category,
    #[serde(default)]
    pub allergy_tags: Vec<AllergyTag>,
}

impl MenuItem {
    pub fn new(id: &str, name: &str, image: &str, category: Category, allergy_tags: Vec<AllergyTag>) -> Self {
        MenuItem {
            id: id.to_string(),
            name: name.to_string(),
            image: image.to_string(),
            category,
            allergy_tags,
        }
    }

    /// Does this item carry the given tag?
    pub fn has_tag(&self, tag: AllergyTag) -> bool {
        self.allergy_tags.contains(&tag)
    }
}

// ============================================================================
// CATALOG STORE
// ============================================================================

/// Read-only snapshot of the menu, constructed once at process start.
///
/// Items keep their insertion order; every query returns a subsequence of
/// `all_items()` in that order, so presentation output is deterministic.
#[derive(Debug)]
pub struct CatalogStore {
    items: Vec<MenuItem>,
}

impl CatalogStore {
    /// Build a store from an injected item list.
    ///
    /// Fails on duplicate ids - that is a data error in the catalog source,
    /// caught here before any session can observe it.
    pub fn new(items: Vec<MenuItem>) -> Result<Self> {
        {
            let mut seen = HashSet::new();
            for item in &items {
                if !seen.insert(item.id.as_str()) {
                    bail!("Duplicate menu item id: {}", item.id);
                }
            }
        }
        Ok(CatalogStore { items })
    }

    /// Load a catalog from a JSON file (a plain array of items)
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read catalog file: {:?}", path.as_ref()))?;

        let items: Vec<MenuItem> = serde_json::from_str(&content)
            .context("Failed to parse catalog JSON")?;

        CatalogStore::new(items)
    }

    /// The original MenuPro menu - one item per category
    pub fn with_defaults() -> Self {
        use AllergyTag::*;

        let items = vec![
            MenuItem::new(
                "1",
                "Rice Bowl",
                "https://images.unsplash.com/photo-1636401870585-a8852371e84a?w=800",
                Category::RiceBowl,
                vec![GlutenFree, DairyFree, Vegan, Vegetarian],
            ),
            MenuItem::new(
                "2",
                "Salad Bowl",
                "https://images.unsplash.com/photo-1604909052743-94e838986d24?w=800",
                Category::SaladBowl,
                vec![GlutenFree, Vegan, Vegetarian, NutFree, SoyFree],
            ),
            MenuItem::new(
                "3",
                "Fries Bowl",
                "https://images.unsplash.com/photo-1639744210631-209fce3e256c?w=800",
                Category::FriesBowl,
                vec![Vegetarian, NutFree],
            ),
            MenuItem::new(
                "4",
                "Naanarito",
                "https://images.unsplash.com/photo-1667608929017-e5aa9f642be8?w=800",
                Category::Naanarito,
                vec![NutFree, SoyFree],
            ),
            MenuItem::new(
                "5",
                "Pita Wrap",
                "https://images.unsplash.com/photo-1567234669003-dce7a7a88821?w=800",
                Category::PitaWrap,
                vec![DairyFree, NutFree],
            ),
            MenuItem::new(
                "6",
                "Naanadilla",
                "https://images.unsplash.com/photo-1628838233717-be047a0b54fb?w=800",
                Category::Naanadilla,
                vec![Vegetarian],
            ),
            MenuItem::new(
                "7",
                "Hummus Bowl",
                "https://images.unsplash.com/photo-1683725519288-eab9fa352335?w=800",
                Category::HummusBowl,
                vec![GlutenFree, DairyFree, Vegan, Vegetarian, SoyFree],
            ),
        ];

        // Defaults are hand-checked for unique ids
        CatalogStore::new(items).expect("default catalog is valid")
    }

    /// All items in insertion order (stable across calls)
    pub fn all_items(&self) -> &[MenuItem] {
        &self.items
    }

    /// Items of one category, preserving catalog order
    pub fn items_by_category(&self, category: Category) -> Vec<&MenuItem> {
        self.items.iter().filter(|item| item.category == category).collect()
    }

    /// Look up an item by id. Unknown id is an explicit None, not an error.
    pub fn find_by_id(&self, id: &str) -> Option<&MenuItem> {
        self.items.iter().find(|item| item.id == id)
    }

    /// Total item count
    pub fn count(&self) -> usize {
        self.items.len()
    }
}

impl Default for CatalogStore {
    fn default() -> Self {
        Self::with_defaults()
    }
}

// ============================================================================
// TESTS
// ============================================================================
