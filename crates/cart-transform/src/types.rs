//! Function API types.
//!
//! These mirror the cart-transform run input/result shapes the function
//! runtime exchanges as JSON. Field names are camelCase on the wire. Input
//! structs are deliberately narrow: only the fields this function reads are
//! declared, and unknown fields are ignored by serde's default behavior.

use serde::{Deserialize, Serialize};

/// Run input: the cart at checkout time.
#[derive(Debug, Clone, Deserialize)]
pub struct CartTransformRunInput {
    pub cart: CartInput,
}

/// The cart portion of the run input.
#[derive(Debug, Clone, Deserialize)]
pub struct CartInput {
    #[serde(default)]
    pub lines: Vec<CartLineInput>,
}

/// One cart line.
#[derive(Debug, Clone, Deserialize)]
pub struct CartLineInput {
    pub id: String,
    #[serde(default = "default_quantity")]
    pub quantity: i64,
    #[serde(default)]
    pub attributes: Vec<AttributeInput>,
    pub cost: CartLineCostInput,
    pub merchandise: MerchandiseInput,
}

const fn default_quantity() -> i64 {
    1
}

/// A line attribute key/value pair.
#[derive(Debug, Clone, Deserialize)]
pub struct AttributeInput {
    pub key: String,
    #[serde(default)]
    pub value: Option<String>,
}

/// Line cost as reported by the cart.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLineCostInput {
    pub amount_per_quantity: MoneyInput,
}

/// A money amount; the runtime serializes decimals as strings.
#[derive(Debug, Clone, Deserialize)]
pub struct MoneyInput {
    pub amount: String,
}

/// The merchandise backing a line.
#[derive(Debug, Clone, Deserialize)]
pub struct MerchandiseInput {
    pub id: String,
}

/// Run result: the operations to apply to the cart.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CartTransformRunResult {
    pub operations: Vec<Operation>,
}

/// One cart operation. Expand is the only kind this function emits.
#[derive(Debug, Clone, Serialize)]
pub struct Operation {
    pub expand: ExpandOperation,
}

/// Replace a line with priced component items.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpandOperation {
    pub cart_line_id: String,
    pub attributes: Vec<AttributeOutput>,
    pub expanded_cart_items: Vec<ExpandedCartItem>,
}

/// An attribute written onto the expanded line.
#[derive(Debug, Clone, Serialize)]
pub struct AttributeOutput {
    pub key: String,
    pub value: String,
}

/// One expanded component item.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpandedCartItem {
    pub merchandise_id: String,
    pub quantity: i64,
    pub price: ExpandedItemPrice,
}

/// Price override for an expanded item.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpandedItemPrice {
    pub fixed_price_per_unit: FixedPricePerUnit,
}

/// Fixed per-unit amount, serialized as a decimal string.
#[derive(Debug, Clone, Serialize)]
pub struct FixedPricePerUnit {
    pub amount: String,
}
