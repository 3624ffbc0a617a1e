//! Customizer cart transform library.
//!
//! The storefront serializes the customizer configuration and the customer's
//! selections into cart-line attributes. At checkout this function
//! deserializes both, re-invokes the same pricing engine the editor preview
//! used, and expands each qualifying line with a fixed per-unit price. The
//! customer is charged what the engine says - never what the client claims.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod run;
pub mod types;

pub use run::{cart_transform_run, CONFIG_ATTRIBUTE, SELECTIONS_ATTRIBUTE};
pub use types::{CartTransformRunInput, CartTransformRunResult};
