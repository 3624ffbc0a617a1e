//! Shopify Admin GraphQL client.
//!
//! The customizer needs four operations against the Admin API: list
//! products, read a product's customizer metafield, write it back, and
//! create a draft order. The GraphQL documents are small enough to keep as
//! hand-written constants with typed serde responses; HTTP goes over
//! `reqwest` with the access token header.
//!
//! The configuration lives in the `custom`/`options` metafield as a JSON
//! string; reads go through the fail-safe codec so a drifted or corrupted
//! value opens as an empty configuration instead of an error.

use std::sync::Arc;

use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use thiserror::Error;
use tracing::{debug, instrument};

use customizer_core::block::Block;
use customizer_core::codec;

use crate::config::AdminConfig;

pub mod types;

use types::{
    DraftOrderCreateData, DraftOrderInput, GraphQLResponse, MetafieldsSetData, ProductData,
    ProductSummary, ProductsData, UserError,
};

/// Metafield namespace holding customizer data.
pub const METAFIELD_NAMESPACE: &str = "custom";
/// Metafield key holding the configuration JSON.
pub const METAFIELD_KEY: &str = "options";

/// Errors from the Shopify Admin API boundary.
#[derive(Debug, Error)]
pub enum ShopifyError {
    /// HTTP transport failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Shopify answered with a non-success status.
    #[error("Shopify returned status {0}")]
    Status(u16),

    /// The GraphQL layer reported errors.
    #[error("GraphQL errors: {0}")]
    GraphQL(String),

    /// The mutation was rejected with user errors.
    #[error("Shopify user errors: {0}")]
    UserErrors(String),

    /// The response envelope carried no data.
    #[error("response missing data")]
    MissingData,

    /// The product does not exist (or is not visible to this token).
    #[error("product not found: {0}")]
    ProductNotFound(String),
}

const PRODUCTS_QUERY: &str = r"
query CustomizerProducts($first: Int!, $namespace: String!, $key: String!) {
  products(first: $first) {
    edges {
      node {
        id
        title
        handle
        status
        metafield(namespace: $namespace, key: $key) {
          id
        }
      }
    }
  }
}";

const PRODUCT_CUSTOMIZER_QUERY: &str = r"
query ProductCustomizer($id: ID!, $namespace: String!, $key: String!) {
  product(id: $id) {
    id
    title
    metafield(namespace: $namespace, key: $key) {
      id
      value
    }
  }
}";

const METAFIELDS_SET_MUTATION: &str = r"
mutation SetProductCustomizer($metafields: [MetafieldsSetInput!]!) {
  metafieldsSet(metafields: $metafields) {
    metafields {
      id
      key
    }
    userErrors {
      field
      message
    }
  }
}";

const DRAFT_ORDER_CREATE_MUTATION: &str = r"
mutation CreateCustomizerDraftOrder($input: DraftOrderInput!) {
  draftOrderCreate(input: $input) {
    draftOrder {
      id
      invoiceUrl
    }
    userErrors {
      field
      message
    }
  }
}";

/// Normalize a product reference to a GID. Accepts a bare numeric id or an
/// already-qualified `gid://` reference.
#[must_use]
pub fn product_gid(id: &str) -> String {
    if id.starts_with("gid://") {
        id.to_string()
    } else {
        format!("gid://shopify/Product/{id}")
    }
}

/// Shopify Admin API client.
#[derive(Clone)]
pub struct AdminClient {
    inner: Arc<AdminClientInner>,
}

struct AdminClientInner {
    client: reqwest::Client,
    endpoint: String,
    token: SecretString,
}

impl AdminClient {
    /// Create a client for the configured store.
    #[must_use]
    pub fn new(config: &AdminConfig) -> Self {
        Self::from_parts(config.graphql_endpoint(), config.admin_token.clone())
    }

    /// Create a client against an explicit endpoint (used by tests to point
    /// at a mock server).
    #[must_use]
    pub fn from_parts(endpoint: String, token: SecretString) -> Self {
        Self {
            inner: Arc::new(AdminClientInner {
                client: reqwest::Client::new(),
                endpoint,
                token,
            }),
        }
    }

    /// Execute a GraphQL document.
    async fn execute<T: DeserializeOwned>(
        &self,
        query: &str,
        variables: Value,
    ) -> Result<T, ShopifyError> {
        let response = self
            .inner
            .client
            .post(&self.inner.endpoint)
            .header("X-Shopify-Access-Token", self.inner.token.expose_secret())
            .json(&json!({ "query": query, "variables": variables }))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ShopifyError::Status(status.as_u16()));
        }

        let envelope: GraphQLResponse<T> = response.json().await?;
        if !envelope.errors.is_empty() {
            let messages: Vec<String> =
                envelope.errors.into_iter().map(|e| e.message).collect();
            return Err(ShopifyError::GraphQL(messages.join("; ")));
        }
        envelope.data.ok_or(ShopifyError::MissingData)
    }

    /// List products with a flag for whether each carries a customizer
    /// configuration.
    ///
    /// # Errors
    ///
    /// Returns `ShopifyError` on transport, status, or GraphQL failures.
    #[instrument(skip(self))]
    pub async fn list_products(&self, first: i64) -> Result<Vec<ProductSummary>, ShopifyError> {
        let data: ProductsData = self
            .execute(
                PRODUCTS_QUERY,
                json!({
                    "first": first,
                    "namespace": METAFIELD_NAMESPACE,
                    "key": METAFIELD_KEY,
                }),
            )
            .await?;

        Ok(data
            .products
            .edges
            .into_iter()
            .map(|edge| ProductSummary {
                id: edge.node.id,
                title: edge.node.title,
                handle: edge.node.handle,
                status: edge.node.status,
                customized: edge.node.metafield.is_some(),
            })
            .collect())
    }

    /// Read a product's customizer configuration.
    ///
    /// A product without the metafield (or with an unreadable value) yields
    /// an empty configuration - the editor decides whether to scaffold a
    /// skeleton.
    ///
    /// # Errors
    ///
    /// Returns `ShopifyError::ProductNotFound` when the product itself does
    /// not resolve; transport and GraphQL failures otherwise.
    #[instrument(skip(self))]
    pub async fn get_customizer(&self, product_id: &str) -> Result<Vec<Block>, ShopifyError> {
        let data: ProductData = self
            .execute(
                PRODUCT_CUSTOMIZER_QUERY,
                json!({
                    "id": product_gid(product_id),
                    "namespace": METAFIELD_NAMESPACE,
                    "key": METAFIELD_KEY,
                }),
            )
            .await?;

        let product = data
            .product
            .ok_or_else(|| ShopifyError::ProductNotFound(product_id.to_string()))?;

        let blocks = product
            .metafield
            .map(|metafield| codec::parse_blocks(&metafield.value))
            .unwrap_or_default();
        debug!(product = %product.id, blocks = blocks.len(), "loaded customizer configuration");
        Ok(blocks)
    }

    /// Write a product's customizer configuration (create-or-update).
    ///
    /// # Errors
    ///
    /// Returns `ShopifyError::UserErrors` when the mutation is rejected;
    /// transport and GraphQL failures otherwise.
    #[instrument(skip(self, blocks))]
    pub async fn set_customizer(
        &self,
        product_id: &str,
        blocks: &[Block],
    ) -> Result<(), ShopifyError> {
        let data: MetafieldsSetData = self
            .execute(
                METAFIELDS_SET_MUTATION,
                json!({
                    "metafields": [{
                        "ownerId": product_gid(product_id),
                        "namespace": METAFIELD_NAMESPACE,
                        "key": METAFIELD_KEY,
                        "type": "json",
                        "value": codec::to_json_pretty(blocks),
                    }],
                }),
            )
            .await?;

        reject_user_errors(&data.metafields_set.user_errors)?;
        debug!(product = product_id, blocks = blocks.len(), "saved customizer configuration");
        Ok(())
    }

    /// Create a draft order and return its invoice URL.
    ///
    /// # Errors
    ///
    /// Returns `ShopifyError::UserErrors` when the mutation is rejected, and
    /// `ShopifyError::MissingData` when no draft order comes back.
    #[instrument(skip(self, input))]
    pub async fn create_draft_order(
        &self,
        input: &DraftOrderInput,
    ) -> Result<String, ShopifyError> {
        let data: DraftOrderCreateData = self
            .execute(
                DRAFT_ORDER_CREATE_MUTATION,
                json!({ "input": input }),
            )
            .await?;

        reject_user_errors(&data.draft_order_create.user_errors)?;
        data.draft_order_create
            .draft_order
            .and_then(|order| order.invoice_url)
            .ok_or(ShopifyError::MissingData)
    }
}

fn reject_user_errors(user_errors: &[UserError]) -> Result<(), ShopifyError> {
    if user_errors.is_empty() {
        return Ok(());
    }
    let messages: Vec<String> = user_errors
        .iter()
        .map(|error| match &error.field {
            Some(field) if !field.is_empty() => format!("{}: {}", field.join("."), error.message),
            _ => error.message.clone(),
        })
        .collect();
    Err(ShopifyError::UserErrors(messages.join("; ")))
}
