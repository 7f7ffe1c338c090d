// Only compile UI module when TUI feature is enabled
#[cfg(feature = "tui")]
mod ui;

use anyhow::Result;
use std::env;
use std::sync::Arc;

use menupro::CatalogStore;

fn main() -> Result<()> {
    let args: Vec<String> = env::args().collect();

    // Optional catalog file argument; defaults to the built-in MenuPro menu
    let store = match args.get(1) {
        Some(path) => {
            println!("📂 Loading catalog from {}...", path);
            CatalogStore::from_file(path)?
        }
        None => CatalogStore::with_defaults(),
    };

    println!("✓ Catalog loaded: {} items\n", store.count());

    run_ui_mode(Arc::new(store))
}

#[cfg(feature = "tui")]
fn run_ui_mode(store: Arc<CatalogStore>) -> Result<()> {
    println!("🖥️  Starting MenuPro... (Press 'q' to quit)\n");

    let mut app = ui::App::new(store);
    ui::run_ui(&mut app)?;

    println!("\n✅ Session ended");

    Ok(())
}

#[cfg(not(feature = "tui"))]
fn run_ui_mode(_store: Arc<CatalogStore>) -> Result<()> {
    eprintln!("❌ TUI mode not available!");
    eprintln!("   Rebuild with: cargo build --features tui");
    eprintln!("   Or use the API: cargo run --bin menupro-server --features server");
    std::process::exit(1);
}
