//! Live price preview.
//!
//! The editor recomputes the total on every form change. The handler is the
//! server-side counterpart of that preview and runs the exact engine the
//! cart transform runs at checkout, so the number a merchant sees while
//! editing is the number a customer will be charged.

use axum::Json;
use serde::{Deserialize, Serialize};

use customizer_core::block::Block;
use customizer_core::pricing::{compute_total_price, format_total};
use customizer_core::selection::SelectionMap;

/// Preview request: a working-copy configuration plus the current
/// selections.
#[derive(Debug, Deserialize)]
pub struct PreviewRequest {
    #[serde(default)]
    pub config: Vec<Block>,
    #[serde(default)]
    pub selections: SelectionMap,
}

/// Preview response.
#[derive(Debug, Serialize)]
pub struct PreviewResponse {
    pub total: f64,
    pub formatted: String,
}

/// Compute a live price preview.
pub async fn preview(Json(request): Json<PreviewRequest>) -> Json<PreviewResponse> {
    let total = compute_total_price(&request.config, &request.selections);
    let currency = request
        .config
        .iter()
        .find_map(Block::as_config)
        .map(|config| config.currency.as_str())
        .unwrap_or_default();
    Json(PreviewResponse {
        total,
        formatted: format_total(total, currency),
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_preview_matches_engine() {
        let request: PreviewRequest = serde_json::from_value(json!({
            "config": [
                {"type": "config", "enabled": true, "unit_price": 10, "currency": "USD"},
                {"type": "area", "id": "size", "enabled": true},
            ],
            "selections": {"size": {"width": 5}},
        }))
        .unwrap();

        let Json(response) = preview(Json(request)).await;
        assert!((response.total - 50.0).abs() < 1e-9);
        assert_eq!(response.formatted, "50.00 USD");
    }

    #[tokio::test]
    async fn test_preview_fails_closed_on_empty_body() {
        let request: PreviewRequest = serde_json::from_value(json!({})).unwrap();
        let Json(response) = preview(Json(request)).await;
        assert!(response.total.abs() < f64::EPSILON);
        assert_eq!(response.formatted, "0.00");
    }
}
