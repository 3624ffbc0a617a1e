//! Product and customizer-configuration route handlers.

use axum::{
    Json,
    extract::{Path, State},
};
use serde::Serialize;
use tracing::instrument;

use customizer_core::block::Block;
use customizer_core::{edit, validate};

use crate::error::{AppError, Result};
use crate::shopify::types::ProductSummary;
use crate::state::AppState;

/// How many products one listing page fetches.
const LISTING_PAGE_SIZE: i64 = 250;

/// A configuration response.
#[derive(Debug, Serialize)]
pub struct CustomizerResponse {
    pub product_id: String,
    pub blocks: Vec<Block>,
}

/// List products with their customized flag.
#[instrument(skip(state))]
pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<ProductSummary>>> {
    let products = state.shopify().list_products(LISTING_PAGE_SIZE).await?;
    Ok(Json(products))
}

/// Load a product's customizer configuration.
///
/// A product that has never been customized gets the default skeleton, so
/// the editor always opens on something editable.
#[instrument(skip(state))]
pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<CustomizerResponse>> {
    let mut blocks = state.shopify().get_customizer(&id).await?;
    if blocks.is_empty() {
        blocks = edit::default_structure();
    }
    Ok(Json(CustomizerResponse {
        product_id: id,
        blocks,
    }))
}

/// Validate and save a product's customizer configuration.
///
/// Validation failures respond 422 with the field-path error map and nothing
/// is persisted.
#[instrument(skip(state, blocks))]
pub async fn save(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(blocks): Json<Vec<Block>>,
) -> Result<Json<CustomizerResponse>> {
    let errors = validate::validate_blocks(&blocks);
    if !errors.is_empty() {
        return Err(AppError::Validation(errors));
    }

    state.shopify().set_customizer(&id, &blocks).await?;
    Ok(Json(CustomizerResponse {
        product_id: id,
        blocks,
    }))
}
