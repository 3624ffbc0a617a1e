//! Draft-order checkout proxy.
//!
//! Turns a customized selection into an invoiceable draft order. The price
//! is recomputed here from the persisted configuration - a client-supplied
//! price is never trusted - and the configuration/selections travel on the
//! line as custom attributes, the same convention the cart transform reads.

use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use customizer_core::block::Block;
use customizer_core::codec;
use customizer_core::pricing::compute_total_price;
use customizer_core::selection::SelectionMap;

use crate::error::{AppError, Result};
use crate::shopify::types::{DraftOrderAttribute, DraftOrderInput, DraftOrderLine};
use crate::state::AppState;

/// Draft-order request.
#[derive(Debug, Deserialize)]
pub struct DraftOrderRequest {
    pub product_id: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub selections: SelectionMap,
    #[serde(default = "default_quantity")]
    pub quantity: i64,
}

const fn default_quantity() -> i64 {
    1
}

/// Draft-order response.
#[derive(Debug, Serialize)]
pub struct DraftOrderResponse {
    pub invoice_url: String,
    pub total: f64,
}

/// Price the selections against the persisted configuration and create a
/// draft order with one custom line.
#[instrument(skip(state, request), fields(product_id = %request.product_id))]
pub async fn create_draft_order(
    State(state): State<AppState>,
    Json(request): Json<DraftOrderRequest>,
) -> Result<Json<DraftOrderResponse>> {
    if request.quantity < 1 {
        return Err(AppError::BadRequest("quantity must be at least 1".to_string()));
    }

    let blocks = state.shopify().get_customizer(&request.product_id).await?;
    if blocks.is_empty() {
        return Err(AppError::NotFound(format!(
            "product {} has no customizer configuration",
            request.product_id
        )));
    }

    let total = compute_total_price(&blocks, &request.selections);
    if total <= 0.0 {
        return Err(AppError::BadRequest(
            "selections do not produce a positive price".to_string(),
        ));
    }

    let title = blocks
        .iter()
        .find_map(Block::as_config)
        .map(|config| config.title.as_str())
        .filter(|title| !title.is_empty())
        .unwrap_or("Customized product")
        .to_string();

    let selections_json = serde_json::to_string(&request.selections)
        .map_err(|e| AppError::Internal(e.to_string()))?;

    let input = DraftOrderInput {
        email: request.email,
        line_items: vec![DraftOrderLine::Custom {
            title,
            original_unit_price: format!("{total:.2}"),
            quantity: request.quantity,
            custom_attributes: vec![
                DraftOrderAttribute {
                    key: "customizer_config".to_string(),
                    value: codec::to_json(&blocks),
                },
                DraftOrderAttribute {
                    key: "customizer_selections".to_string(),
                    value: selections_json,
                },
            ],
        }],
    };

    let invoice_url = state.shopify().create_draft_order(&input).await?;
    Ok(Json(DraftOrderResponse { invoice_url, total }))
}
