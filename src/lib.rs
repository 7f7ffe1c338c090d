// MenuPro Core - Catalog filtering and ordering-flow library
// Exposes all modules for use in the TUI, API server, and tests.
// Presentation lives in the binaries; the core never calls back into it.

pub mod catalog;
pub mod filter;
pub mod cart;
pub mod flow;

// Re-export commonly used types
pub use catalog::{AllergyTag, CatalogStore, Category, MenuItem};
pub use filter::{visible_items, FilterSelection, MatchPolicy};
pub use cart::{format_cents, CartLine, CartSummary};
pub use flow::{Session, SessionState};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
