// MenuPro Core - API Server
// HTTP transport for the session boundary: a renderer (web kiosk, phone
// page behind the QR code) creates a session, posts intents, and re-renders
// from the getters. The server stores nothing beyond live sessions.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tower_http::cors::CorsLayer;

use menupro::{
    format_cents, AllergyTag, CartLine, CatalogStore, Category, MenuItem, Session, SessionState,
};

/// Shared application state
#[derive(Clone)]
struct AppState {
    store: Arc<CatalogStore>,
    sessions: Arc<Mutex<HashMap<String, Session>>>,
}

/// API Response wrapper
#[derive(Serialize)]
struct ApiResponse<T> {
    success: bool,
    data: T,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl<T> ApiResponse<T> {
    fn ok(data: T) -> Self {
        Self {
            success: true,
            data,
            error: None,
        }
    }
}

impl ApiResponse<()> {
    fn err(message: &str) -> Self {
        Self {
            success: false,
            data: (),
            error: Some(message.to_string()),
        }
    }
}

/// One user intent, posted by the renderer
#[derive(Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum IntentRequest {
    ContinueFromScan,
    SelectCategory { category: Category },
    ToggleAllergy { tag: AllergyTag },
    SelectItem { item_id: String },
    Back,
    ViewCart,
    AddToCart { quantity: u32, unit_price_cents: i64 },
    ClearCart,
}

/// Session snapshot returned after creation and after every intent
#[derive(Serialize)]
struct SessionResponse {
    session_id: String,
    state: SessionState,
    category: Category,
    allergy_tags: Vec<AllergyTag>,
    selected_item: Option<MenuItem>,
    visible_items: Vec<MenuItem>,
    cart: CartResponse,
}

#[derive(Serialize)]
struct CartResponse {
    count: u32,
    total_cents: i64,
    total: String,
    lines: Vec<CartLine>,
}

impl SessionResponse {
    fn from_session(session: &Session) -> Self {
        let summary = session.cart_summary();

        Self {
            session_id: session.id().to_string(),
            state: session.session_state(),
            category: session.selection().category,
            allergy_tags: session.selection().allergy_tags.iter().copied().collect(),
            selected_item: session.selected_item().cloned(),
            visible_items: session.visible_items().to_vec(),
            cart: CartResponse {
                count: summary.count,
                total_cents: summary.total_cents,
                total: format_cents(summary.total_cents),
                lines: session.cart_lines().to_vec(),
            },
        }
    }
}

// ============================================================================
// API Handlers
// ============================================================================

/// GET /api/health - Health check
async fn health_check() -> impl IntoResponse {
    Json(ApiResponse::ok("OK"))
}

/// GET /api/menu - The full catalog (unfiltered, for renderer caches)
async fn get_menu(State(state): State<AppState>) -> impl IntoResponse {
    Json(ApiResponse::ok(state.store.all_items().to_vec()))
}

/// POST /api/sessions - Create a new diner session
async fn create_session(State(state): State<AppState>) -> impl IntoResponse {
    let session = Session::new(Arc::clone(&state.store));
    let response = SessionResponse::from_session(&session);

    let mut sessions = state.sessions.lock().unwrap();
    sessions.insert(session.id().to_string(), session);

    (StatusCode::CREATED, Json(ApiResponse::ok(response))).into_response()
}

/// GET /api/sessions/:id - Current session snapshot
async fn get_session(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> impl IntoResponse {
    let sessions = state.sessions.lock().unwrap();

    match sessions.get(&session_id) {
        Some(session) => {
            (StatusCode::OK, Json(ApiResponse::ok(SessionResponse::from_session(session))))
                .into_response()
        }
        None => (
            StatusCode::NOT_FOUND,
            Json(ApiResponse::err("Session not found")),
        )
            .into_response(),
    }
}

/// GET /api/sessions/:id/items - Current visible items only
async fn get_session_items(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> impl IntoResponse {
    let sessions = state.sessions.lock().unwrap();

    match sessions.get(&session_id) {
        Some(session) => {
            (StatusCode::OK, Json(ApiResponse::ok(session.visible_items().to_vec())))
                .into_response()
        }
        None => (
            StatusCode::NOT_FOUND,
            Json(ApiResponse::err("Session not found")),
        )
            .into_response(),
    }
}

/// POST /api/sessions/:id/intent - Apply one user intent
///
/// Intents the session ignores (wrong screen, stale item id, empty-cart
/// view_cart) still return 200 with the unchanged snapshot - fail-soft is
/// the core's contract, not an HTTP error.
async fn apply_intent(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
    Json(intent): Json<IntentRequest>,
) -> impl IntoResponse {
    let mut sessions = state.sessions.lock().unwrap();

    let Some(session) = sessions.get_mut(&session_id) else {
        return (
            StatusCode::NOT_FOUND,
            Json(ApiResponse::err("Session not found")),
        )
            .into_response();
    };

    match intent {
        IntentRequest::ContinueFromScan => session.continue_from_scan(),
        IntentRequest::SelectCategory { category } => session.select_category(category),
        IntentRequest::ToggleAllergy { tag } => session.toggle_allergy(tag),
        IntentRequest::SelectItem { item_id } => session.select_item(&item_id),
        IntentRequest::Back => session.back(),
        IntentRequest::ViewCart => session.view_cart(),
        IntentRequest::AddToCart {
            quantity,
            unit_price_cents,
        } => session.add_to_cart(quantity, unit_price_cents),
        IntentRequest::ClearCart => session.clear_cart(),
    }

    (StatusCode::OK, Json(ApiResponse::ok(SessionResponse::from_session(session))))
        .into_response()
}

/// DELETE-ish: POST /api/sessions/:id/end - Discard a session
async fn end_session(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> impl IntoResponse {
    let mut sessions = state.sessions.lock().unwrap();

    match sessions.remove(&session_id) {
        Some(_) => (StatusCode::OK, Json(ApiResponse::ok("ended"))).into_response(),
        None => (
            StatusCode::NOT_FOUND,
            Json(ApiResponse::err("Session not found")),
        )
            .into_response(),
    }
}

// ============================================================================
// Main Server
// ============================================================================

#[tokio::main]
async fn main() {
    println!("🌐 MenuPro Core - API Server");
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━");

    // Optional catalog file argument; defaults to the built-in menu
    let args: Vec<String> = std::env::args().collect();
    let store = match args.get(1) {
        Some(path) => CatalogStore::from_file(path).unwrap_or_else(|e| {
            eprintln!("❌ Failed to load catalog from {}: {}", path, e);
            std::process::exit(1);
        }),
        None => CatalogStore::with_defaults(),
    };

    println!("✓ Catalog loaded: {} items", store.count());

    // Create shared state
    let state = AppState {
        store: Arc::new(store),
        sessions: Arc::new(Mutex::new(HashMap::new())),
    };

    // Build API routes
    let api_routes = Router::new()
        .route("/health", get(health_check))
        .route("/menu", get(get_menu))
        .route("/sessions", post(create_session))
        .route("/sessions/:id", get(get_session))
        .route("/sessions/:id/items", get(get_session_items))
        .route("/sessions/:id/intent", post(apply_intent))
        .route("/sessions/:id/end", post(end_session))
        .with_state(state);

    // Build main router
    let app = Router::new()
        .nest("/api", api_routes)
        .layer(CorsLayer::permissive());

    // Start server
    let addr = "0.0.0.0:3000";
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    println!("\n🚀 Server running on http://localhost:3000");
    println!("   Create a session: POST http://localhost:3000/api/sessions");
    println!("\n   Press Ctrl+C to stop\n");

    axum::serve(listener, app)
        .await
        .expect("Failed to start server");
}
