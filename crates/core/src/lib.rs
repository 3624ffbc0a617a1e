//! Customizer Core - Configuration model and pricing engine.
//!
//! This crate provides the shared domain logic used across all customizer
//! components:
//! - `admin` - Embedded admin app (editor CRUD, live preview, bulk edit)
//! - `cart-transform` - Checkout-time price recomputation function
//! - `cli` - Command-line tools for evaluating and validating configurations
//!
//! # Architecture
//!
//! The core crate contains only data types and pure functions - no I/O, no
//! HTTP clients, no async. The price shown in the editor preview, the price
//! quoted on the storefront, and the price pinned at checkout all come from
//! the same [`pricing::compute_total_price`] function, so any divergence here
//! becomes a price mismatch a customer can see. Everything is deterministic
//! and fails closed to zero on malformed input.
//!
//! # Modules
//!
//! - [`block`] - The configuration model: a tagged union of block kinds
//! - [`selection`] - Customer selection values keyed by block id
//! - [`pricing`] - The pricing engine
//! - [`validate`] - Pre-persistence configuration validation
//! - [`edit`] - Structural editing operations (add/move/duplicate blocks)
//! - [`codec`] - Fail-safe metafield JSON parsing and serialization

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod block;
pub mod codec;
mod coerce;
pub mod edit;
pub mod pricing;
pub mod selection;
pub mod validate;

pub use block::{
    AreaBlock, Block, ConditionalGroup, ConfigBlock, GroupTrigger, InputBlock, InputSubtype,
    Media, OptionItem, PickerBlock, PricingMode, PricingRule,
};
pub use pricing::{compute_total_price, compute_total_price_json, format_total};
pub use selection::{DimensionSelection, SelectionMap, SelectionValue};
pub use validate::validate_blocks;
