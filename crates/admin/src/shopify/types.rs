//! Typed GraphQL request/response shapes for the Admin API surface this app
//! uses.

use serde::{Deserialize, Serialize};

/// Standard GraphQL response envelope.
#[derive(Debug, Deserialize)]
pub struct GraphQLResponse<T> {
    pub data: Option<T>,
    #[serde(default)]
    pub errors: Vec<GraphQLError>,
}

/// One GraphQL-layer error.
#[derive(Debug, Deserialize)]
pub struct GraphQLError {
    pub message: String,
}

/// One mutation user error.
#[derive(Debug, Deserialize)]
pub struct UserError {
    #[serde(default)]
    pub field: Option<Vec<String>>,
    pub message: String,
}

// =============================================================================
// Product listing
// =============================================================================

#[derive(Debug, Deserialize)]
pub struct ProductsData {
    pub products: ProductConnection,
}

#[derive(Debug, Deserialize)]
pub struct ProductConnection {
    #[serde(default)]
    pub edges: Vec<ProductEdge>,
}

#[derive(Debug, Deserialize)]
pub struct ProductEdge {
    pub node: ProductListingNode,
}

#[derive(Debug, Deserialize)]
pub struct ProductListingNode {
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub handle: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub metafield: Option<MetafieldRef>,
}

/// Just enough of a metafield to know it exists.
#[derive(Debug, Deserialize)]
pub struct MetafieldRef {
    pub id: String,
}

/// Product row returned by the listing endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct ProductSummary {
    pub id: String,
    pub title: String,
    pub handle: String,
    pub status: String,
    /// Whether the product carries a customizer configuration.
    pub customized: bool,
}

// =============================================================================
// Single product + metafield value
// =============================================================================

#[derive(Debug, Deserialize)]
pub struct ProductData {
    pub product: Option<ProductNode>,
}

#[derive(Debug, Deserialize)]
pub struct ProductNode {
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub metafield: Option<MetafieldNode>,
}

#[derive(Debug, Deserialize)]
pub struct MetafieldNode {
    pub id: String,
    #[serde(default)]
    pub value: String,
}

// =============================================================================
// metafieldsSet
// =============================================================================

#[derive(Debug, Deserialize)]
pub struct MetafieldsSetData {
    #[serde(rename = "metafieldsSet")]
    pub metafields_set: MetafieldsSetPayload,
}

#[derive(Debug, Deserialize)]
pub struct MetafieldsSetPayload {
    #[serde(default)]
    pub metafields: Vec<SavedMetafield>,
    #[serde(default, rename = "userErrors")]
    pub user_errors: Vec<UserError>,
}

#[derive(Debug, Deserialize)]
pub struct SavedMetafield {
    pub id: String,
    #[serde(default)]
    pub key: String,
}

// =============================================================================
// draftOrderCreate
// =============================================================================

#[derive(Debug, Deserialize)]
pub struct DraftOrderCreateData {
    #[serde(rename = "draftOrderCreate")]
    pub draft_order_create: DraftOrderCreatePayload,
}

#[derive(Debug, Deserialize)]
pub struct DraftOrderCreatePayload {
    #[serde(default, rename = "draftOrder")]
    pub draft_order: Option<DraftOrderNode>,
    #[serde(default, rename = "userErrors")]
    pub user_errors: Vec<UserError>,
}

#[derive(Debug, Deserialize)]
pub struct DraftOrderNode {
    pub id: String,
    #[serde(default, rename = "invoiceUrl")]
    pub invoice_url: Option<String>,
}

/// Input for `draftOrderCreate`, serialized straight into the mutation
/// variables.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DraftOrderInput {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub line_items: Vec<DraftOrderLine>,
}

/// One draft-order line: a variant reference, or a custom-priced line.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum DraftOrderLine {
    #[serde(rename_all = "camelCase")]
    Variant { variant_id: String, quantity: i64 },
    #[serde(rename_all = "camelCase")]
    Custom {
        title: String,
        /// Decimal string, major units.
        original_unit_price: String,
        quantity: i64,
        #[serde(skip_serializing_if = "Vec::is_empty")]
        custom_attributes: Vec<DraftOrderAttribute>,
    },
}

/// A key/value attribute attached to a draft-order line.
#[derive(Debug, Clone, Serialize)]
pub struct DraftOrderAttribute {
    pub key: String,
    pub value: String,
}
