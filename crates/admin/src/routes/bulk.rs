//! Bulk-edit apply plumbing.
//!
//! Applies one edit across many products' configurations. Each product is
//! read, modified, validated-by-invariant, and written back independently;
//! one failure never aborts the batch, and the caller gets a per-product
//! result list.
//!
//! Which products to target is the caller's concern (the selection UI is
//! outside this app's scope) - these handlers just take the id list.

use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use customizer_core::block::Block;
use customizer_core::edit;

use crate::error::Result;
use crate::state::AppState;

/// Outcome of one product in a bulk run.
#[derive(Debug, Serialize)]
pub struct BulkResult {
    pub product_id: String,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skipped: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Bulk run response.
#[derive(Debug, Serialize)]
pub struct BulkResponse {
    pub message: String,
    pub results: Vec<BulkResult>,
}

impl BulkResponse {
    fn summarize(results: Vec<BulkResult>) -> Self {
        let succeeded = results.iter().filter(|r| r.success).count();
        let failed = results.len() - succeeded;
        Self {
            message: format!("{succeeded} products updated successfully. {failed} failed."),
            results,
        }
    }
}

// =============================================================================
// Add a block to many products
// =============================================================================

/// Request to add one block to many products.
#[derive(Debug, Deserialize)]
pub struct BulkAddBlockRequest {
    pub product_ids: Vec<String>,
    pub block: Block,
    /// The product the block was copied from; it already has it and is
    /// skipped.
    #[serde(default)]
    pub source_product_id: Option<String>,
}

/// Add one block to each targeted product's configuration.
#[instrument(skip(state, request), fields(products = request.product_ids.len()))]
pub async fn add_block(
    State(state): State<AppState>,
    Json(request): Json<BulkAddBlockRequest>,
) -> Result<Json<BulkResponse>> {
    let Some(block_id) = request.block.id().map(String::from) else {
        return Err(crate::error::AppError::BadRequest(
            "block must be a content block with an id".to_string(),
        ));
    };

    let mut results = Vec::with_capacity(request.product_ids.len());
    for product_id in &request.product_ids {
        if Some(product_id) == request.source_product_id.as_ref() {
            results.push(BulkResult {
                product_id: product_id.clone(),
                success: true,
                skipped: Some(true),
                error: None,
            });
            continue;
        }
        let outcome = add_block_to_product(&state, product_id, &request.block, &block_id).await;
        results.push(to_result(product_id, outcome));
    }

    Ok(Json(BulkResponse::summarize(results)))
}

async fn add_block_to_product(
    state: &AppState,
    product_id: &str,
    block: &Block,
    block_id: &str,
) -> std::result::Result<(), String> {
    let mut blocks = state
        .shopify()
        .get_customizer(product_id)
        .await
        .map_err(|e| e.to_string())?;

    if blocks.is_empty() {
        return Err("No customizer configuration found".to_string());
    }
    if blocks.iter().any(|b| b.id() == Some(block_id)) {
        return Err("Block with same id already exists".to_string());
    }

    blocks.push(block.clone());
    edit::sync_step_order(&mut blocks);

    state
        .shopify()
        .set_customizer(product_id, &blocks)
        .await
        .map_err(|e| e.to_string())
}

// =============================================================================
// Patch general settings on many products
// =============================================================================

/// Partial update of config-block settings. Only present fields change.
#[derive(Debug, Clone, Deserialize)]
pub struct GeneralSettingsPatch {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub enabled: Option<bool>,
    #[serde(default)]
    pub show_price: Option<bool>,
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(default)]
    pub unit_price: Option<f64>,
}

impl GeneralSettingsPatch {
    fn apply(&self, config: &mut customizer_core::block::ConfigBlock) {
        if let Some(title) = &self.title {
            config.title.clone_from(title);
        }
        if let Some(enabled) = self.enabled {
            config.enabled = enabled;
        }
        if let Some(show_price) = self.show_price {
            config.show_price = show_price;
        }
        if let Some(currency) = &self.currency {
            config.currency.clone_from(currency);
        }
        if let Some(unit_price) = self.unit_price {
            config.unit_price = unit_price;
        }
    }
}

/// Request to patch general settings on many products.
#[derive(Debug, Deserialize)]
pub struct BulkGeneralRequest {
    pub product_ids: Vec<String>,
    pub patch: GeneralSettingsPatch,
}

/// Apply a general-settings patch to each targeted product.
#[instrument(skip(state, request), fields(products = request.product_ids.len()))]
pub async fn apply_general(
    State(state): State<AppState>,
    Json(request): Json<BulkGeneralRequest>,
) -> Result<Json<BulkResponse>> {
    let mut results = Vec::with_capacity(request.product_ids.len());
    for product_id in &request.product_ids {
        let outcome = patch_product(&state, product_id, &request.patch).await;
        results.push(to_result(product_id, outcome));
    }
    Ok(Json(BulkResponse::summarize(results)))
}

async fn patch_product(
    state: &AppState,
    product_id: &str,
    patch: &GeneralSettingsPatch,
) -> std::result::Result<(), String> {
    let mut blocks = state
        .shopify()
        .get_customizer(product_id)
        .await
        .map_err(|e| e.to_string())?;

    if blocks.is_empty() {
        return Err("No customizer configuration found".to_string());
    }

    let config = blocks.iter_mut().find_map(|block| match block {
        Block::Config(config) => Some(config),
        _ => None,
    });
    match config {
        Some(config) => patch.apply(config),
        None => return Err("Configuration has no config block".to_string()),
    }

    state
        .shopify()
        .set_customizer(product_id, &blocks)
        .await
        .map_err(|e| e.to_string())
}

fn to_result(product_id: &str, outcome: std::result::Result<(), String>) -> BulkResult {
    match outcome {
        Ok(()) => BulkResult {
            product_id: product_id.to_string(),
            success: true,
            skipped: None,
            error: None,
        },
        Err(error) => BulkResult {
            product_id: product_id.to_string(),
            success: false,
            skipped: None,
            error: Some(error),
        },
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_patch_applies_only_present_fields() {
        let mut config = customizer_core::block::ConfigBlock {
            title: "Old".to_string(),
            enabled: true,
            currency: "USD".to_string(),
            unit_price: 10.0,
            ..Default::default()
        };
        let patch = GeneralSettingsPatch {
            title: None,
            enabled: None,
            show_price: None,
            currency: Some("EUR".to_string()),
            unit_price: Some(12.0),
        };
        patch.apply(&mut config);

        assert_eq!(config.title, "Old");
        assert!(config.enabled);
        assert_eq!(config.currency, "EUR");
        assert!((config.unit_price - 12.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_summarize_counts_outcomes() {
        let response = BulkResponse::summarize(vec![
            to_result("1", Ok(())),
            to_result("2", Err("No customizer configuration found".to_string())),
            to_result("3", Ok(())),
        ]);
        assert_eq!(response.message, "2 products updated successfully. 1 failed.");
        assert!(!response.results.get(1).unwrap().success);
    }
}
