//! Customer selections, keyed by block id.
//!
//! Selections arrive from the storefront form layer (and, at checkout, from
//! cart-line attributes), so a value may be a string, a number, a dimension
//! object, or junk. The map is supplied wholesale per evaluation; the engine
//! never persists or mutates it.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::coerce;

/// Mapping from block id (or nested item id) to the customer's choice.
pub type SelectionMap = HashMap<String, SelectionValue>;

/// One selection entry.
///
/// Variants are shape-disjoint, so untagged deserialization is unambiguous:
/// strings stay strings (a picker value of `"5"` must not become a number),
/// numbers come from number inputs, objects carry area dimensions. Anything
/// else is tolerated and reads as "no selection".
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SelectionValue {
    Text(String),
    Number(f64),
    Dimensions(DimensionSelection),
    Other(Value),
}

/// Entered dimensions for an area block.
///
/// The form layer submits these as strings, so both axes coerce leniently;
/// a garbage width reads as `0`, which the engine prices as "no valid width
/// yet".
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DimensionSelection {
    #[serde(default, deserialize_with = "coerce::lenient_f64")]
    pub width: f64,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "coerce::lenient_opt_f64"
    )]
    pub height: Option<f64>,
    #[serde(
        default,
        rename = "inputValue",
        skip_serializing_if = "Option::is_none"
    )]
    pub input_value: Option<String>,
}

impl SelectionValue {
    /// The selection as a picker option value: a non-empty string.
    ///
    /// An empty string is "no selection"; numbers never match option values
    /// (option values are strings, and matching is exact).
    #[must_use]
    pub fn as_picker_value(&self) -> Option<&str> {
        match self {
            Self::Text(s) if !s.is_empty() => Some(s),
            _ => None,
        }
    }

    /// The selection as a number, accepting numeric strings.
    ///
    /// Zero is a valid entry for a number input; an empty or non-numeric
    /// string is not.
    #[must_use]
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            Self::Text(s) => s.trim().parse::<f64>().ok().filter(|n| n.is_finite()),
            _ => None,
        }
    }

    /// Whether a value was actually entered (text-input rules fire on any
    /// present entry).
    #[must_use]
    pub fn is_present(&self) -> bool {
        match self {
            Self::Text(s) => !s.is_empty(),
            Self::Number(_) | Self::Dimensions(_) => true,
            Self::Other(_) => false,
        }
    }

    /// The entered width, or `0` when this is not a dimension selection.
    #[must_use]
    pub fn width(&self) -> f64 {
        match self {
            Self::Dimensions(d) => d.width,
            _ => 0.0,
        }
    }
}
