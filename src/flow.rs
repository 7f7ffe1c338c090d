// 📱 Session Flow - Screen-flow state machine for one diner session
// Scan → Browse → Item Detail → Cart. The session owns the filter selection
// and the selected item; presentation only sends intents and reads getters.
//
// Every intent is total: a (state, intent) pair with no listed transition is
// ignored, so late or duplicate UI events cannot corrupt the session.

use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::cart::{CartLine, CartSummary};
use crate::catalog::{AllergyTag, CatalogStore, Category, MenuItem};
use crate::filter::{visible_items, FilterSelection, MatchPolicy};

// ============================================================================
// SESSION STATE
// ============================================================================

/// The ordered screens of the ordering flow
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionState {
    Scanning,
    Browsing,
    ItemDetail,
    CartView,
}

impl SessionState {
    pub fn title(&self) -> &'static str {
        match self {
            SessionState::Scanning => "Scan to Order",
            SessionState::Browsing => "Menu",
            SessionState::ItemDetail => "Item",
            SessionState::CartView => "Your Cart",
        }
    }
}

// ============================================================================
// SESSION
// ============================================================================

/// One diner's session from scan to cart view.
///
/// Holds the only mutable state in the system: current screen, filter
/// selection, selected item, and cart lines. The catalog is a shared
/// read-only snapshot.
pub struct Session {
    id: String,
    store: Arc<CatalogStore>,
    policy: MatchPolicy,
    state: SessionState,
    selection: FilterSelection,
    selected_item: Option<MenuItem>,
    visible: Vec<MenuItem>,
    cart: Vec<CartLine>,
    // Screen that invoked view_cart, so back() can restore it
    cart_return_state: Option<SessionState>,
}

impl Session {
    pub fn new(store: Arc<CatalogStore>) -> Self {
        Session::with_policy(store, MatchPolicy::default())
    }

    pub fn with_policy(store: Arc<CatalogStore>, policy: MatchPolicy) -> Self {
        Session {
            id: uuid::Uuid::new_v4().to_string(),
            store,
            policy,
            state: SessionState::Scanning,
            selection: FilterSelection::new(),
            selected_item: None,
            visible: Vec::new(),
            cart: Vec::new(),
            cart_return_state: None,
        }
    }

    // ========================================================================
    // GETTERS (presentation reads these after every intent)
    // ========================================================================

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn session_state(&self) -> SessionState {
        self.state
    }

    /// Current filter result, in catalog order
    pub fn visible_items(&self) -> &[MenuItem] {
        &self.visible
    }

    pub fn selection(&self) -> &FilterSelection {
        &self.selection
    }

    /// Valid only in ItemDetail or later; None otherwise
    pub fn selected_item(&self) -> Option<&MenuItem> {
        self.selected_item.as_ref()
    }

    pub fn cart_lines(&self) -> &[CartLine] {
        &self.cart
    }

    pub fn cart_summary(&self) -> CartSummary {
        CartSummary::summarize(&self.cart)
    }

    // ========================================================================
    // INTENTS
    // ========================================================================

    /// Scanning → Browsing. Resets the selection to the default category
    /// with no allergy tags and publishes the first visible list.
    pub fn continue_from_scan(&mut self) {
        if self.state != SessionState::Scanning {
            return;
        }

        self.selection = FilterSelection::new();
        self.state = SessionState::Browsing;
        self.recompute_visible();
    }

    /// Switch category tab. Only meaningful while browsing.
    pub fn select_category(&mut self, category: Category) {
        if self.state != SessionState::Browsing {
            return;
        }

        self.selection.category = category;
        self.recompute_visible();
    }

    /// Toggle one allergy tag in the selection. Only meaningful while browsing.
    pub fn toggle_allergy(&mut self, tag: AllergyTag) {
        if self.state != SessionState::Browsing {
            return;
        }

        self.selection.toggle_allergy(tag);
        self.recompute_visible();
    }

    /// Browsing → ItemDetail. The id is validated against the store; a
    /// stale id from an outdated render is ignored.
    pub fn select_item(&mut self, item_id: &str) {
        if self.state != SessionState::Browsing {
            return;
        }

        if let Some(item) = self.store.find_by_id(item_id) {
            self.selected_item = Some(item.clone());
            self.state = SessionState::ItemDetail;
        }
    }

    /// ItemDetail → Browsing (drops the selected item), or
    /// CartView → whichever screen invoked view_cart.
    pub fn back(&mut self) {
        match self.state {
            SessionState::ItemDetail => {
                self.selected_item = None;
                self.state = SessionState::Browsing;
            }
            SessionState::CartView => {
                self.state = self.cart_return_state.take().unwrap_or(SessionState::Browsing);
            }
            SessionState::Scanning | SessionState::Browsing => {}
        }
    }

    /// Browsing/ItemDetail → CartView. Guarded no-op when the cart is empty -
    /// the affordance only exists once something is in the cart.
    pub fn view_cart(&mut self) {
        match self.state {
            SessionState::Browsing | SessionState::ItemDetail => {
                if self.cart_summary().is_empty() {
                    return;
                }
                self.cart_return_state = Some(self.state);
                self.state = SessionState::CartView;
            }
            SessionState::Scanning | SessionState::CartView => {}
        }
    }

    // ========================================================================
    // CART FEED
    // ========================================================================

    /// Append a cart line for the currently selected item. Pricing comes
    /// from the caller - the catalog carries no prices. Only meaningful
    /// on the item detail screen.
    pub fn add_to_cart(&mut self, quantity: u32, unit_price_cents: i64) {
        if self.state != SessionState::ItemDetail {
            return;
        }

        if let Some(item) = &self.selected_item {
            self.cart.push(CartLine::new(&item.id, quantity, unit_price_cents));
        }
    }

    pub fn clear_cart(&mut self) {
        self.cart.clear();
    }

    fn recompute_visible(&mut self) {
        self.visible = visible_items(&self.store, &self.selection, self.policy);
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    /// The two-category fixture: RiceBowl has one vegan item "A" and one
    /// non-vegan item "B"; SaladBowl has none.
    fn fixture() -> Arc<CatalogStore> {
        Arc::new(
            CatalogStore::new(vec![
                MenuItem::new("A", "A", "img", Category::RiceBowl, vec![AllergyTag::Vegan]),
                MenuItem::new("B", "B", "img", Category::RiceBowl, vec![]),
            ])
            .unwrap(),
        )
    }

    fn ids(items: &[MenuItem]) -> Vec<&str> {
        items.iter().map(|i| i.id.as_str()).collect()
    }

    #[test]
    fn test_session_starts_scanning_with_nothing_visible() {
        let session = Session::new(fixture());

        assert_eq!(session.session_state(), SessionState::Scanning);
        assert!(session.visible_items().is_empty());
        assert!(session.selected_item().is_none());
        assert!(session.cart_summary().is_empty());
    }

    #[test]
    fn test_only_continue_leaves_scanning() {
        let mut session = Session::new(fixture());

        // Every other intent is a no-op from Scanning
        session.select_category(Category::SaladBowl);
        session.toggle_allergy(AllergyTag::Vegan);
        session.select_item("A");
        session.back();
        session.view_cart();
        assert_eq!(session.session_state(), SessionState::Scanning);

        session.continue_from_scan();
        assert_eq!(session.session_state(), SessionState::Browsing);
    }

    #[test]
    fn test_continue_initializes_default_selection() {
        let mut session = Session::new(fixture());
        session.continue_from_scan();

        assert_eq!(session.selection().category, Category::RiceBowl);
        assert!(session.selection().allergy_tags.is_empty());
        assert_eq!(ids(session.visible_items()), vec!["A", "B"]);
    }

    #[test]
    fn test_duplicate_continue_is_ignored() {
        let mut session = Session::new(fixture());
        session.continue_from_scan();
        session.toggle_allergy(AllergyTag::Vegan);

        // A late duplicate scan event must not reset the filters
        session.continue_from_scan();
        assert!(session.selection().has_tag(AllergyTag::Vegan));
    }

    #[test]
    fn test_end_to_end_browse_flow() {
        let mut session = Session::new(fixture());

        session.continue_from_scan();
        assert_eq!(ids(session.visible_items()), vec!["A", "B"]);

        session.toggle_allergy(AllergyTag::Vegan);
        assert_eq!(ids(session.visible_items()), vec!["A"]);

        // Category switch keeps the vegan filter active
        session.select_category(Category::SaladBowl);
        assert!(session.visible_items().is_empty());
        assert!(session.selection().has_tag(AllergyTag::Vegan));
    }

    #[test]
    fn test_select_item_moves_to_detail() {
        let mut session = Session::new(fixture());
        session.continue_from_scan();

        session.select_item("A");
        assert_eq!(session.session_state(), SessionState::ItemDetail);
        assert_eq!(session.selected_item().unwrap().id, "A");
    }

    #[test]
    fn test_stale_item_id_is_ignored() {
        let mut session = Session::new(fixture());
        session.continue_from_scan();

        session.select_item("no-such-item");
        assert_eq!(session.session_state(), SessionState::Browsing);
        assert!(session.selected_item().is_none());
    }

    #[test]
    fn test_back_from_detail_drops_selection() {
        let mut session = Session::new(fixture());
        session.continue_from_scan();
        session.select_item("A");

        session.back();
        assert_eq!(session.session_state(), SessionState::Browsing);
        assert!(session.selected_item().is_none());
    }

    #[test]
    fn test_view_cart_with_empty_cart_is_a_no_op() {
        let mut session = Session::new(fixture());
        session.continue_from_scan();

        session.view_cart();
        assert_eq!(session.session_state(), SessionState::Browsing);
    }

    #[test]
    fn test_add_to_cart_only_in_item_detail() {
        let mut session = Session::new(fixture());
        session.continue_from_scan();

        // Browsing: no selected item, nothing to add
        session.add_to_cart(1, 995);
        assert!(session.cart_summary().is_empty());

        session.select_item("A");
        session.add_to_cart(2, 995);
        assert_eq!(session.cart_summary(), CartSummary { count: 2, total_cents: 1990 });
    }

    #[test]
    fn test_view_cart_and_back_round_trip_from_browsing() {
        let mut session = Session::new(fixture());
        session.continue_from_scan();
        session.select_item("A");
        session.add_to_cart(1, 995);
        session.back();
        assert_eq!(session.session_state(), SessionState::Browsing);

        session.view_cart();
        assert_eq!(session.session_state(), SessionState::CartView);

        session.back();
        assert_eq!(session.session_state(), SessionState::Browsing);
    }

    #[test]
    fn test_view_cart_and_back_round_trip_from_detail() {
        let mut session = Session::new(fixture());
        session.continue_from_scan();
        session.select_item("A");
        session.add_to_cart(1, 995);

        session.view_cart();
        assert_eq!(session.session_state(), SessionState::CartView);

        // Returns to the detail screen that invoked it, item still selected
        session.back();
        assert_eq!(session.session_state(), SessionState::ItemDetail);
        assert_eq!(session.selected_item().unwrap().id, "A");
    }

    #[test]
    fn test_cart_state_unaffected_by_navigation() {
        let mut session = Session::new(fixture());
        session.continue_from_scan();
        session.select_item("A");
        session.add_to_cart(3, 450);
        let summary = session.cart_summary();

        session.view_cart();
        session.back();
        session.back();
        session.select_category(Category::SaladBowl);

        assert_eq!(session.cart_summary(), summary);
    }

    #[test]
    fn test_filter_intents_ignored_outside_browsing() {
        let mut session = Session::new(fixture());
        session.continue_from_scan();
        session.select_item("A");

        session.select_category(Category::SaladBowl);
        session.toggle_allergy(AllergyTag::Vegan);

        // Detail screen: the selection is untouched
        assert_eq!(session.selection().category, Category::RiceBowl);
        assert!(session.selection().allergy_tags.is_empty());
    }

    #[test]
    fn test_session_with_all_tags_policy() {
        let mut session = Session::with_policy(fixture(), MatchPolicy::AllTags);
        session.continue_from_scan();

        session.toggle_allergy(AllergyTag::Vegan);
        session.toggle_allergy(AllergyTag::GlutenFree);

        // Intersection: "A" is vegan but not gluten-free
        assert!(session.visible_items().is_empty());
    }

    #[test]
    fn test_sessions_are_independent_over_shared_store() {
        let store = fixture();
        let mut a = Session::new(Arc::clone(&store));
        let mut b = Session::new(Arc::clone(&store));

        assert_ne!(a.id(), b.id());

        a.continue_from_scan();
        b.continue_from_scan();
        a.toggle_allergy(AllergyTag::Vegan);

        assert_eq!(ids(a.visible_items()), vec!["A"]);
        assert_eq!(ids(b.visible_items()), vec!["A", "B"]);
    }
}
