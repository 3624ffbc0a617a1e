//! `price` - evaluate the pricing engine against files.

use std::path::Path;

use anyhow::Context;

use customizer_core::block::Block;
use customizer_core::codec;
use customizer_core::pricing::{compute_total_price, format_total};
use customizer_core::selection::SelectionMap;

/// Read both files and return the formatted total.
///
/// File-shape problems degrade the way the engine degrades everywhere else
/// (an unreadable configuration is empty, unreadable selections are none);
/// only an unreadable *file* is an error.
pub fn run(config_path: &Path, selections_path: &Path) -> anyhow::Result<String> {
    let config_json = std::fs::read_to_string(config_path)
        .with_context(|| format!("reading {}", config_path.display()))?;
    let selections_json = std::fs::read_to_string(selections_path)
        .with_context(|| format!("reading {}", selections_path.display()))?;
    Ok(evaluate(&config_json, &selections_json))
}

fn evaluate(config_json: &str, selections_json: &str) -> String {
    let blocks = codec::parse_blocks(config_json);
    let selections: SelectionMap = serde_json::from_str(selections_json).unwrap_or_default();
    let total = compute_total_price(&blocks, &selections);
    let currency = blocks
        .iter()
        .find_map(Block::as_config)
        .map(|config| config.currency.as_str())
        .unwrap_or_default();
    format_total(total, currency)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_evaluate_formats_with_currency() {
        let config = r#"[
            {"type": "config", "enabled": true, "unit_price": 10, "currency": "USD"},
            {"type": "area", "id": "size", "enabled": true}
        ]"#;
        let selections = r#"{"size": {"width": 5}}"#;
        assert_eq!(evaluate(config, selections), "50.00 USD");
    }

    #[test]
    fn test_evaluate_fails_closed() {
        assert_eq!(evaluate("not json", "also not json"), "0.00");
    }
}
