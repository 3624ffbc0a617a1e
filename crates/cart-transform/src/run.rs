//! The cart transform run: recompute and pin each customized line's price.

use customizer_core::pricing::compute_total_price_json;
use tracing::{debug, warn};

use crate::types::{
    AttributeOutput, CartLineInput, CartTransformRunInput, CartTransformRunResult,
    ExpandOperation, ExpandedCartItem, ExpandedItemPrice, FixedPricePerUnit, Operation,
};

/// Line attribute carrying the serialized configuration.
pub const CONFIG_ATTRIBUTE: &str = "customizer_config";
/// Line attribute carrying the serialized selection map.
pub const SELECTIONS_ATTRIBUTE: &str = "customizer_selections";

/// Run the transform over every cart line.
///
/// Lines without both customizer attributes pass through untouched. A line
/// whose attributes do not price to a positive number also passes through -
/// the engine fails closed to zero on malformed data, and expanding a line
/// to a zero price would hand the product away. One bad line never affects
/// the others.
#[must_use]
pub fn cart_transform_run(input: &CartTransformRunInput) -> CartTransformRunResult {
    let operations: Vec<Operation> = input
        .cart
        .lines
        .iter()
        .filter_map(expand_line)
        .collect();
    debug!(lines = input.cart.lines.len(), operations = operations.len(), "cart transform run");
    CartTransformRunResult { operations }
}

fn attribute_value<'a>(line: &'a CartLineInput, key: &str) -> Option<&'a str> {
    line.attributes
        .iter()
        .find(|attribute| attribute.key == key)
        .and_then(|attribute| attribute.value.as_deref())
}

fn expand_line(line: &CartLineInput) -> Option<Operation> {
    let config_json = attribute_value(line, CONFIG_ATTRIBUTE)?;
    let selections_json = attribute_value(line, SELECTIONS_ATTRIBUTE)?;

    let customizer_price = compute_total_price_json(config_json, selections_json);
    // The cart reports the per-quantity amount in minor units; the
    // diagnostic attribute records it in major units.
    let original_price = line
        .cost
        .amount_per_quantity
        .amount
        .trim()
        .parse::<f64>()
        .unwrap_or_default()
        / 100.0;

    debug!(
        line = %line.id,
        customizer_price,
        original_price,
        "evaluated customized line"
    );

    if customizer_price <= 0.0 {
        warn!(line = %line.id, "customized line did not price to a positive amount; leaving it unchanged");
        return None;
    }

    let amount = format!("{customizer_price:.2}");
    Some(Operation {
        expand: ExpandOperation {
            cart_line_id: line.id.clone(),
            attributes: vec![
                attribute("_Customizer-Enabled", "true"),
                attribute("_Customizer-Config", config_json),
                attribute("_Customizer-Selections", selections_json),
                attribute("_Customizer-Price", &amount),
                attribute("_Original-Price", &format!("{original_price:.2}")),
            ],
            expanded_cart_items: vec![ExpandedCartItem {
                merchandise_id: line.merchandise.id.clone(),
                quantity: line.quantity,
                price: ExpandedItemPrice {
                    fixed_price_per_unit: FixedPricePerUnit { amount },
                },
            }],
        },
    })
}

fn attribute(key: &str, value: &str) -> AttributeOutput {
    AttributeOutput {
        key: key.to_string(),
        value: value.to_string(),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    fn line(attributes: Value) -> Value {
        json!({
            "id": "gid://shopify/CartLine/1",
            "quantity": 2,
            "attributes": attributes,
            "cost": {"amountPerQuantity": {"amount": "1500", "currencyCode": "USD"}},
            "merchandise": {"id": "gid://shopify/ProductVariant/42"},
        })
    }

    fn customized_attributes(width: Value) -> Value {
        let config = json!([
            {"type": "config", "enabled": true, "unit_price": 10},
            {"type": "area", "id": "size", "enabled": true},
        ]);
        let selections = json!({"size": {"width": width}});
        json!([
            {"key": "customizer_config", "value": config.to_string()},
            {"key": "customizer_selections", "value": selections.to_string()},
        ])
    }

    fn parse_input(lines: Vec<Value>) -> CartTransformRunInput {
        serde_json::from_value(json!({"cart": {"lines": lines}})).unwrap()
    }

    #[test]
    fn test_customized_line_is_expanded() {
        let input = parse_input(vec![line(customized_attributes(json!(5)))]);
        let result = cart_transform_run(&input);
        assert_eq!(result.operations.len(), 1);

        let expand = &result.operations.first().unwrap().expand;
        assert_eq!(expand.cart_line_id, "gid://shopify/CartLine/1");

        let item = expand.expanded_cart_items.first().unwrap();
        assert_eq!(item.merchandise_id, "gid://shopify/ProductVariant/42");
        assert_eq!(item.quantity, 2);
        assert_eq!(item.price.fixed_price_per_unit.amount, "50.00");
    }

    #[test]
    fn test_diagnostic_attributes() {
        let input = parse_input(vec![line(customized_attributes(json!(5)))]);
        let result = cart_transform_run(&input);
        let attributes = &result.operations.first().unwrap().expand.attributes;

        let get = |key: &str| {
            attributes
                .iter()
                .find(|a| a.key == key)
                .map(|a| a.value.as_str())
        };
        assert_eq!(get("_Customizer-Enabled"), Some("true"));
        assert_eq!(get("_Customizer-Price"), Some("50.00"));
        // 1500 minor units -> 15.00
        assert_eq!(get("_Original-Price"), Some("15.00"));
        assert!(get("_Customizer-Config").unwrap().contains("unit_price"));
        assert!(get("_Customizer-Selections").unwrap().contains("width"));
    }

    #[test]
    fn test_lines_without_attributes_pass_through() {
        let input = parse_input(vec![line(json!([]))]);
        assert!(cart_transform_run(&input).operations.is_empty());

        // One attribute of the pair is not enough.
        let input = parse_input(vec![line(json!([
            {"key": "customizer_config", "value": "[]"},
        ]))]);
        assert!(cart_transform_run(&input).operations.is_empty());
    }

    #[test]
    fn test_zero_price_line_is_left_unchanged() {
        // Width 0 prices to 0; the line must not be expanded at that price.
        let input = parse_input(vec![line(customized_attributes(json!(0)))]);
        assert!(cart_transform_run(&input).operations.is_empty());
    }

    #[test]
    fn test_malformed_line_does_not_affect_others() {
        let malformed = line(json!([
            {"key": "customizer_config", "value": "{{{ not json"},
            {"key": "customizer_selections", "value": "also not json"},
        ]));
        let good = line(customized_attributes(json!(3)));
        let input = parse_input(vec![malformed, good]);

        let result = cart_transform_run(&input);
        assert_eq!(result.operations.len(), 1);
        assert_eq!(
            result
                .operations
                .first()
                .unwrap()
                .expand
                .expanded_cart_items
                .first()
                .unwrap()
                .price
                .fixed_price_per_unit
                .amount,
            "30.00"
        );
    }

    #[test]
    fn test_result_serializes_camel_case() {
        let input = parse_input(vec![line(customized_attributes(json!(5)))]);
        let result = cart_transform_run(&input);
        let value = serde_json::to_value(&result).unwrap();

        let expand = value
            .pointer("/operations/0/expand")
            .unwrap()
            .as_object()
            .unwrap();
        assert!(expand.contains_key("cartLineId"));
        assert!(expand.contains_key("expandedCartItems"));
        assert!(value
            .pointer("/operations/0/expand/expandedCartItems/0/price/fixedPricePerUnit/amount")
            .is_some());
    }
}
