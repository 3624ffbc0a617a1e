//! Fail-safe JSON parsing and serialization for persisted configurations.
//!
//! Configurations live in a product metafield as a JSON string. The value
//! may be absent, the literal `"null"` Shopify returns for unset metafields,
//! or malformed after schema drift - and the editor must still open, so the
//! parse side never errors: anything that is not a JSON array reads as the
//! empty configuration.

use serde_json::Value;
use tracing::warn;

use crate::block::Block;

/// Parse a persisted configuration, falling back to empty on any problem.
#[must_use]
pub fn parse_blocks(json: &str) -> Vec<Block> {
    let trimmed = json.trim();
    if trimmed.is_empty() || trimmed == "null" {
        return Vec::new();
    }

    let value: Value = match serde_json::from_str(trimmed) {
        Ok(value) => value,
        Err(error) => {
            warn!(%error, "configuration metafield is not valid JSON");
            return Vec::new();
        }
    };

    let Value::Array(items) = value else {
        warn!("configuration metafield is not a JSON array");
        return Vec::new();
    };

    items
        .into_iter()
        .map(|item| {
            // Block has an untagged fallback variant, so this conversion only
            // fails on exotic shapes; those are preserved opaquely rather
            // than dropped.
            serde_json::from_value(item.clone()).unwrap_or_else(|_| Block::Other(item))
        })
        .collect()
}

/// Serialize a configuration for persistence (pretty-printed, the form the
/// metafield stores).
#[must_use]
pub fn to_json_pretty(blocks: &[Block]) -> String {
    serde_json::to_string_pretty(blocks).unwrap_or_else(|_| "[]".to_string())
}

/// Serialize a configuration compactly (the form cart-line attributes
/// carry).
#[must_use]
pub fn to_json(blocks: &[Block]) -> String {
    serde_json::to_string(blocks).unwrap_or_else(|_| "[]".to_string())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_and_null_parse_to_empty() {
        assert!(parse_blocks("").is_empty());
        assert!(parse_blocks("   ").is_empty());
        assert!(parse_blocks("null").is_empty());
    }

    #[test]
    fn test_non_array_parses_to_empty() {
        assert!(parse_blocks("{\"type\":\"config\"}").is_empty());
        assert!(parse_blocks("42").is_empty());
        assert!(parse_blocks("{{{").is_empty());
    }

    #[test]
    fn test_round_trip() {
        let json = r##"[
            {"type":"config","title":"Customizer","enabled":true,"unit_price":10,"step_order":[]},
            {"type":"picker","id":"color","title":"Color","enabled":true,"options":[
                {"label":"Red","value":"red","media":{"type":"hex","hex":"#ff0000"}}
            ]}
        ]"##;
        let blocks = parse_blocks(json);
        assert_eq!(blocks.len(), 2);

        let reparsed = parse_blocks(&to_json_pretty(&blocks));
        assert_eq!(reparsed.len(), 2);
        assert_eq!(reparsed.get(1).and_then(Block::id), Some("color"));
    }

    #[test]
    fn test_non_object_elements_are_preserved_opaquely() {
        let blocks = parse_blocks(r#"[{"type":"config","enabled":true}, "stray", 7]"#);
        assert_eq!(blocks.len(), 3);
        assert!(matches!(blocks.get(1), Some(Block::Other(_))));
        assert!(matches!(blocks.get(2), Some(Block::Other(_))));
    }
}
