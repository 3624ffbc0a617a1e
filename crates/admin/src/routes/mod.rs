//! HTTP route handlers for the admin app.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                     - Health check
//!
//! # Products
//! GET  /products                   - Product listing with customized flag
//! GET  /products/{id}/customizer   - Load a configuration (skeleton if absent)
//! PUT  /products/{id}/customizer   - Validate and save a configuration
//!
//! # Pricing
//! POST /pricing/preview            - Live price preview (same engine as checkout)
//!
//! # Checkout
//! POST /checkout/draft-order       - Price server-side and create a draft order
//!
//! # Bulk editing
//! POST /bulk/blocks                - Add one block to many products
//! POST /bulk/general               - Patch general settings on many products
//! ```

pub mod bulk;
pub mod checkout;
pub mod pricing;
pub mod products;

use axum::{
    Router,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Build the admin router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/products", get(products::list))
        .route(
            "/products/{id}/customizer",
            get(products::show).put(products::save),
        )
        .route("/pricing/preview", post(pricing::preview))
        .route("/checkout/draft-order", post(checkout::create_draft_order))
        .route("/bulk/blocks", post(bulk::add_block))
        .route("/bulk/general", post(bulk::apply_general))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Liveness health check endpoint.
async fn health() -> &'static str {
    "ok"
}
