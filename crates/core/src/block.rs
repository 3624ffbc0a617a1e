//! The configuration model: an ordered sequence of typed blocks.
//!
//! A customizer configuration is a JSON array of heterogeneous blocks. The
//! block kind is discriminated by the `"type"` field; kinds this build does
//! not know deserialize into [`Block::Other`] and round-trip untouched, so a
//! newer app version can add kinds without older readers corrupting them.
//!
//! Two persistence realities shape the serde attributes here:
//!
//! - `enabled` defaults to **false**: a block that does not say it is enabled
//!   is invisible to pricing, matching checkout-time behavior.
//! - Unknown fields on every known block kind are captured in a flattened
//!   `extra` map so a round-trip through the editor never drops merchant data
//!   written by older or newer schema versions.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::coerce;

/// One unit of customizer configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Block {
    /// Global settings. At most one is meaningful; the first wins.
    #[serde(rename = "config")]
    Config(ConfigBlock),
    /// A list of selectable options, optionally with conditional sub-pickers.
    #[serde(rename = "picker")]
    Picker(PickerBlock),
    /// Free-form text or number entry.
    #[serde(rename = "input")]
    Input(InputBlock),
    /// Dimension entry; its width drives the final price scaling.
    #[serde(rename = "area")]
    Area(AreaBlock),
    /// A kind this build does not know. Preserved verbatim, ignored by
    /// pricing and validation.
    #[serde(untagged)]
    Other(Value),
}

impl Block {
    /// The block id, if this kind carries one (`config` and unknown kinds do
    /// not participate in the selection-map namespace).
    #[must_use]
    pub fn id(&self) -> Option<&str> {
        match self {
            Self::Picker(b) => Some(&b.id),
            Self::Input(b) => Some(&b.id),
            Self::Area(b) => Some(&b.id),
            Self::Config(_) | Self::Other(_) => None,
        }
    }

    /// The display title, if present.
    #[must_use]
    pub fn title(&self) -> Option<&str> {
        match self {
            Self::Config(b) => Some(&b.title),
            Self::Picker(b) => Some(&b.title),
            Self::Input(b) => Some(&b.title),
            Self::Area(b) => Some(&b.title),
            Self::Other(_) => None,
        }
    }

    /// Whether the block participates in pricing and display.
    ///
    /// Unknown kinds are never enabled.
    #[must_use]
    pub const fn is_enabled(&self) -> bool {
        match self {
            Self::Config(b) => b.enabled,
            Self::Picker(b) => b.enabled,
            Self::Input(b) => b.enabled,
            Self::Area(b) => b.enabled,
            Self::Other(_) => false,
        }
    }

    /// Borrow as a config block, if that is the kind.
    #[must_use]
    pub const fn as_config(&self) -> Option<&ConfigBlock> {
        match self {
            Self::Config(b) => Some(b),
            _ => None,
        }
    }

    /// Borrow as an area block, if that is the kind.
    #[must_use]
    pub const fn as_area(&self) -> Option<&AreaBlock> {
        match self {
            Self::Area(b) => Some(b),
            _ => None,
        }
    }

    /// Borrow as a picker block, if that is the kind.
    #[must_use]
    pub const fn as_picker(&self) -> Option<&PickerBlock> {
        match self {
            Self::Picker(b) => Some(b),
            _ => None,
        }
    }
}

/// Global customizer settings (kind = `config`).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConfigBlock {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub enabled: bool,
    /// Whether the storefront shows the computed price next to the form.
    #[serde(default)]
    pub show_price: bool,
    /// ISO 4217 code used as a display suffix; not part of the numeric
    /// contract.
    #[serde(default)]
    pub currency: String,
    /// Per-unit-width base rate. The one number the engine reads from here.
    #[serde(default, deserialize_with = "coerce::lenient_f64")]
    pub unit_price: f64,
    /// Flat base from the legacy pricing schema. Preserved for round-trip
    /// fidelity, never evaluated.
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "coerce::lenient_opt_f64"
    )]
    pub base_price: Option<f64>,
    /// Presentation order of content-block ids. Purely presentational.
    #[serde(default)]
    pub step_order: Vec<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A picker block (kind = `picker`): one choice among [`OptionItem`]s.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PickerBlock {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub enabled: bool,
    /// Gates evaluation of `nested`: groups are only consulted when set.
    #[serde(default, rename = "isNested")]
    pub is_nested: bool,
    /// Block-level rule; editor scaffolding carries one but option-level
    /// rules are what price a picker.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pricing: Option<PricingRule>,
    #[serde(default)]
    pub options: Vec<OptionItem>,
    /// Conditional sub-pickers, one level deep.
    #[serde(default)]
    pub nested: Vec<ConditionalGroup>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// One selectable choice within a picker.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OptionItem {
    #[serde(default)]
    pub label: String,
    /// Matched exactly against the selection-map entry for the picker.
    #[serde(default)]
    pub value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub media: Option<Media>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pricing: Option<PricingRule>,
    /// Legacy flat surcharge predating pricing rules. Read only when
    /// `pricing` is absent entirely.
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "coerce::lenient_opt_f64"
    )]
    pub added: Option<f64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Option swatch media.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Media {
    Hex {
        #[serde(default)]
        hex: String,
    },
    Url {
        #[serde(default)]
        url: String,
    },
}

/// A conditional group of sub-pickers shown when the parent picker's
/// selection equals the trigger value.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConditionalGroup {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub when: Option<GroupTrigger>,
    /// Sub-pickers with their own ids and options. Their own `nested` field,
    /// if any, is not pricing-relevant (nesting is one level deep).
    #[serde(default)]
    pub items: Vec<PickerBlock>,
}

/// Trigger for a conditional group.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GroupTrigger {
    #[serde(default, rename = "parentId")]
    pub parent_id: String,
    /// Compared against the parent picker's current selection. An empty
    /// trigger never matches.
    #[serde(default)]
    pub equals: String,
}

/// A free-form entry block (kind = `input`).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InputBlock {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub subtype: InputSubtype,
    #[serde(default)]
    pub placeholder: String,
    /// Entry bounds, enforced by the form layer only. Pricing never reads
    /// these.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub validation: Option<InputValidation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pricing: Option<PricingRule>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Input entry kinds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum InputSubtype {
    #[default]
    Text,
    Number,
    /// A subtype this build does not recognize; its pricing rule never
    /// fires.
    Unknown,
}

impl<'de> Deserialize<'de> for InputSubtype {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        Ok(match value.as_str() {
            Some("text") => Self::Text,
            // Older configurations wrote "float" for number entry.
            Some("number" | "float") => Self::Number,
            _ => Self::Unknown,
        })
    }
}

/// Display-layer entry bounds for an input block.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InputValidation {
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "coerce::lenient_opt_f64"
    )]
    pub min: Option<f64>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "coerce::lenient_opt_f64"
    )]
    pub max: Option<f64>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "coerce::lenient_opt_f64"
    )]
    pub step: Option<f64>,
    #[serde(
        default,
        rename = "maxLength",
        skip_serializing_if = "Option::is_none",
        deserialize_with = "coerce::lenient_opt_f64"
    )]
    pub max_length: Option<f64>,
}

/// A dimension-entry block (kind = `area`).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AreaBlock {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub enabled: bool,
    /// Display unit, e.g. "inch" or "cm".
    #[serde(default)]
    pub unit: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limits: Option<AreaLimits>,
    /// Legacy schemas stored per-area rates here; the canonical algorithm
    /// reads the rate from the config block instead. Preserved, not
    /// evaluated.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pricing: Option<PricingRule>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Width/height entry bounds for an area block. Form-layer only.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AreaLimits {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<DimensionRange>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<DimensionRange>,
}

/// Inclusive numeric bounds.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DimensionRange {
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "coerce::lenient_opt_f64"
    )]
    pub min: Option<f64>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "coerce::lenient_opt_f64"
    )]
    pub max: Option<f64>,
}

/// A pricing rule attached to an option or block.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PricingRule {
    #[serde(default)]
    pub mode: PricingMode,
    #[serde(default, deserialize_with = "coerce::lenient_f64")]
    pub value: f64,
    /// `unit` (default) or `order`. Carried for the data model; the canonical
    /// algorithm does not distinguish scopes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scope: Option<PricingScope>,
    /// Whether the storefront itemizes this rule. Presentation only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub show: Option<bool>,
}

/// How a rule's value combines into the price.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PricingMode {
    #[default]
    None,
    Added,
    Multiplier,
    /// A mode this build does not recognize; contributes nothing.
    Unknown,
}

impl<'de> Deserialize<'de> for PricingMode {
    // Merchant data drifts; an unrecognized or non-string mode must degrade
    // to an inert rule, never fail the surrounding block.
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        Ok(match value.as_str() {
            Some("none") => Self::None,
            Some("added") => Self::Added,
            Some("multiplier") => Self::Multiplier,
            _ => Self::Unknown,
        })
    }
}

/// Rule scope.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PricingScope {
    #[default]
    Unit,
    Order,
    Unknown,
}

impl<'de> Deserialize<'de> for PricingScope {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        Ok(match value.as_str() {
            Some("unit") => Self::Unit,
            Some("order") => Self::Order,
            _ => Self::Unknown,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_block_tag_discrimination() {
        let blocks: Vec<Block> = serde_json::from_value(json!([
            {"type": "config", "title": "Customizer", "enabled": true, "unit_price": 10},
            {"type": "picker", "id": "color", "enabled": true, "options": []},
            {"type": "input", "id": "qty", "enabled": true, "subtype": "number"},
            {"type": "area", "id": "size", "enabled": true, "unit": "inch"},
        ]))
        .unwrap();

        assert!(matches!(blocks.first(), Some(Block::Config(_))));
        assert!(matches!(blocks.get(1), Some(Block::Picker(_))));
        assert!(matches!(blocks.get(2), Some(Block::Input(_))));
        assert!(matches!(blocks.get(3), Some(Block::Area(_))));
    }

    #[test]
    fn test_unknown_kind_round_trips() {
        let raw = json!({"type": "divider", "id": "d1", "style": "thick"});
        let block: Block = serde_json::from_value(raw.clone()).unwrap();
        assert!(matches!(block, Block::Other(_)));
        assert!(!block.is_enabled());

        let back = serde_json::to_value(&block).unwrap();
        assert_eq!(back, raw);
    }

    #[test]
    fn test_unknown_fields_survive_round_trip() {
        let raw = json!({
            "type": "area",
            "id": "size",
            "enabled": true,
            "unit": "inch",
            "hasInputSection": true,
            "guideImageUrl": "https://example.com/guide.png",
        });
        let block: Block = serde_json::from_value(raw.clone()).unwrap();
        let back = serde_json::to_value(&block).unwrap();
        assert_eq!(back.get("hasInputSection"), raw.get("hasInputSection"));
        assert_eq!(back.get("guideImageUrl"), raw.get("guideImageUrl"));
    }

    #[test]
    fn test_missing_enabled_means_disabled() {
        let block: Block =
            serde_json::from_value(json!({"type": "picker", "id": "p", "options": []})).unwrap();
        assert!(!block.is_enabled());
    }

    #[test]
    fn test_lenient_numeric_fields() {
        let block: Block = serde_json::from_value(json!({
            "type": "config",
            "enabled": true,
            "unit_price": "12.5",
        }))
        .unwrap();
        let config = block.as_config().unwrap();
        assert!((config.unit_price - 12.5).abs() < f64::EPSILON);

        let block: Block = serde_json::from_value(json!({
            "type": "config",
            "enabled": true,
            "unit_price": "oops",
        }))
        .unwrap();
        assert!(block.as_config().unwrap().unit_price.abs() < f64::EPSILON);
    }

    #[test]
    fn test_legacy_added_coerces() {
        let option: OptionItem =
            serde_json::from_value(json!({"label": "Round", "value": "round", "added": "8"}))
                .unwrap();
        assert!((option.added.unwrap() - 8.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_unknown_pricing_mode_is_inert() {
        let rule: PricingRule =
            serde_json::from_value(json!({"mode": "percentage", "value": 10})).unwrap();
        assert_eq!(rule.mode, PricingMode::Unknown);
    }

    #[test]
    fn test_float_subtype_alias() {
        let input: InputBlock =
            serde_json::from_value(json!({"id": "n", "subtype": "float"})).unwrap();
        assert_eq!(input.subtype, InputSubtype::Number);

        let input: InputBlock =
            serde_json::from_value(json!({"id": "n", "subtype": "textarea"})).unwrap();
        assert_eq!(input.subtype, InputSubtype::Unknown);
    }

    #[test]
    fn test_media_discrimination() {
        let hex: Media = serde_json::from_value(json!({"type": "hex", "hex": "#000000"})).unwrap();
        assert!(matches!(hex, Media::Hex { .. }));
        let url: Media =
            serde_json::from_value(json!({"type": "url", "url": "https://x.test/a.png"})).unwrap();
        assert!(matches!(url, Media::Url { .. }));
    }
}
