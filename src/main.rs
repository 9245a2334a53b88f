use axum::{
    middleware::from_fn_with_state,
    routing::{delete, get, post, put},
    Router,
};
use serde_json::{json, Value};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use transtech_api::handlers::{admin, public};
use transtech_api::middleware::admin_gate::admin_gate;
use transtech_api::state::AppState;
use transtech_api::{config, database};

#[tokio::main]
async fn main() {
    // Load .env if present so cargo run picks up DATABASE_URL, IDENTITY_*, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt::init();

    let config = config::config();
    tracing::info!("Starting Transtech API in {:?} mode", config.environment);

    let state = AppState::from_config();
    let app = app(state);

    // Allow deployments to override the configured port via env
    let port = std::env::var("PORT")
        .ok()
        .and_then(|s| s.parse::<u16>().ok())
        .unwrap_or(config.http.port);

    let bind_addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .unwrap_or_else(|e| panic!("failed to bind {}: {}", bind_addr, e));

    tracing::info!("Transtech API listening on http://{}", bind_addr);

    axum::serve(listener, app).await.expect("server");
}

fn app(state: AppState) -> Router {
    Router::new()
        // Public
        .route("/", get(root))
        .route("/health", get(health))
        .merge(search_routes())
        .merge(catalog_routes())
        .merge(intake_routes())
        .merge(upload_routes())
        // Admin area (session/bootstrap endpoints bypass the gate and
        // check credentials themselves)
        .merge(admin_session_routes())
        .merge(admin_content_routes())
        // Global middleware; the gate matches /admin and /api/admin only
        .layer(from_fn_with_state(state.clone(), admin_gate))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn search_routes() -> Router<AppState> {
    Router::new().route("/api/search", get(public::search::search_get))
}

fn catalog_routes() -> Router<AppState> {
    use public::catalog;

    Router::new()
        .route("/api/categories", get(catalog::categories_get))
        .route("/api/categories/:slug", get(catalog::category_get))
        .route("/api/products", get(catalog::products_get))
        .route("/api/products/:slug", get(catalog::product_get))
        .route("/api/products/:slug/related", get(catalog::related_products_get))
        .route("/api/industries", get(catalog::industries_get))
        .route("/api/industries/:slug", get(catalog::industry_get))
}

fn intake_routes() -> Router<AppState> {
    use public::intake;

    Router::new()
        .route("/api/contact", post(intake::contact_post))
        .route("/api/quotations", post(intake::quotation_post))
        .route("/api/boq", post(intake::boq_post))
}

fn upload_routes() -> Router<AppState> {
    use admin::uploads;

    Router::new()
        .route("/api/uploads", post(uploads::upload_post))
        .route("/api/uploads/delete", post(uploads::delete_post))
        .route("/api/uploads/list", get(uploads::list_get))
}

fn admin_session_routes() -> Router<AppState> {
    use admin::{session, setup};

    Router::new()
        .route("/api/admin/session", post(session::session_post))
        .route("/api/admin/session-status", get(session::session_status_get))
        .route("/api/admin/logout", post(session::logout_post))
        .route("/api/admin/me", get(session::me_get))
        .route("/api/admin/setup", post(setup::setup_post))
        .route("/api/admin/setup-status", get(setup::setup_status_get))
}

fn admin_content_routes() -> Router<AppState> {
    use admin::{categories, industries, intake, products};

    Router::new()
        // Categories with nested brand/subcategory listings
        .route(
            "/api/admin/categories",
            get(categories::list_get).post(categories::create_post),
        )
        .route(
            "/api/admin/categories/:id",
            put(categories::update_put).delete(categories::delete_delete),
        )
        .route("/api/admin/categories/:id/brands", get(categories::brands_get))
        .route("/api/admin/categories/:id/subcategories", get(categories::subcategories_get))
        .route("/api/admin/brands", post(categories::brand_post))
        .route(
            "/api/admin/brands/:id",
            put(categories::brand_put).delete(categories::brand_delete),
        )
        .route("/api/admin/subcategories", post(categories::subcategory_post))
        .route(
            "/api/admin/subcategories/:id",
            put(categories::subcategory_put).delete(categories::subcategory_delete),
        )
        // Products
        .route("/api/admin/products/list", get(products::list_get))
        .route("/api/admin/products", post(products::create_post))
        .route(
            "/api/admin/products/:id",
            put(products::update_put).delete(products::delete_delete),
        )
        // Industries
        .route(
            "/api/admin/industries",
            get(industries::list_get).post(industries::create_post),
        )
        .route(
            "/api/admin/industries/:id",
            put(industries::update_put).delete(industries::delete_delete),
        )
        // Customer intake records
        .route("/api/admin/messages", get(intake::messages_get))
        .route("/api/admin/messages/:id", delete(intake::message_delete))
        .route("/api/admin/messages/:id/read", put(intake::message_read_put))
        .route("/api/admin/quotations", get(intake::quotations_get))
        .route("/api/admin/quotations/:id", delete(intake::quotation_delete))
        .route("/api/admin/boq", get(intake::boq_get))
        .route("/api/admin/boq/:id", delete(intake::boq_delete))
}

async fn root() -> axum::response::Json<Value> {
    let version = env!("CARGO_PKG_VERSION");

    axum::response::Json(json!({
        "success": true,
        "data": {
            "name": "Transtech API",
            "version": version,
            "description": "Catalog, search and quotation backend",
            "endpoints": {
                "search": "/api/search?q= (public, rate-limited)",
                "catalog": "/api/categories, /api/products, /api/industries (public)",
                "intake": "/api/contact, /api/quotations, /api/boq (public)",
                "uploads": "/api/uploads (proxy)",
                "admin": "/api/admin/* (gated; session via /api/admin/session)",
            }
        }
    }))
}

async fn health() -> impl axum::response::IntoResponse {
    let now = chrono::Utc::now();

    match database::manager::DatabaseManager::health_check().await {
        Ok(_) => (
            axum::http::StatusCode::OK,
            axum::response::Json(json!({
                "success": true,
                "data": {
                    "status": "ok",
                    "timestamp": now,
                    "database": "ok"
                }
            })),
        ),
        Err(e) => (
            axum::http::StatusCode::SERVICE_UNAVAILABLE,
            axum::response::Json(json!({
                "success": false,
                "error": "database unavailable",
                "data": {
                    "status": "degraded",
                    "timestamp": now,
                    "database_error": e.to_string()
                }
            })),
        ),
    }
}
