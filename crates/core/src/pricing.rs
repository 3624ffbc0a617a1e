//! The pricing engine.
//!
//! `compute_total_price` is the one function that turns a configuration plus
//! a set of customer selections into a price. It runs in three places that
//! must agree to the cent: the editor's live preview, the storefront
//! checkout flow, and the cart-transform function. It is pure and total -
//! same inputs, same output, no exceptions, no mutation.
//!
//! The algorithm is the unit-price-times-width scheme:
//!
//! 1. Read `unit_price` from the first config block (0 when absent).
//! 2. Sum option/input contributions into an additive pool and a multiplier
//!    pool.
//! 3. `new_unit_price = (unit_price + added_sum) * factor`, where the factor
//!    is the multiplier sum when any multiplier rule fired, else 1. Multiple
//!    multiplier rules sum rather than compound: values 2 and 3 yield a
//!    factor of 5, not 6. That summation is pinned merchant-facing behavior;
//!    do not change it without product sign-off.
//! 4. With no enabled area block the total is `new_unit_price`. With one,
//!    the total is `width * new_unit_price` - and exactly 0 until the
//!    customer has entered a positive width, because a configuration that
//!    requires a dimension cannot be priced without it.
//!
//! Earlier schemes (flat `base_price`, per-square-meter area rates,
//! compounding multipliers) are distinct legacy schemas. Configurations
//! written under them need an explicit migration; this engine evaluates only
//! the current scheme.

use crate::block::{Block, InputBlock, InputSubtype, OptionItem, PickerBlock, PricingMode};
use crate::codec;
use crate::selection::{SelectionMap, SelectionValue};

/// Contribution pools accumulated while walking the configuration.
#[derive(Debug, Default)]
struct RuleSums {
    added: f64,
    multiplier: f64,
}

impl RuleSums {
    fn apply_rule(&mut self, mode: PricingMode, value: f64) {
        match mode {
            PricingMode::Added => self.added += value,
            PricingMode::Multiplier => self.multiplier += value,
            PricingMode::None | PricingMode::Unknown => {}
        }
    }

    /// Score one selected option: its rule, or the legacy flat `added`
    /// surcharge when no rule exists at all.
    fn apply_option(&mut self, option: &OptionItem) {
        match &option.pricing {
            Some(rule) => self.apply_rule(rule.mode, rule.value),
            None => self.added += option.added.unwrap_or(0.0),
        }
    }
}

/// Compute the total price for a configuration and a set of selections.
///
/// Missing selections contribute nothing; disabled blocks and their nested
/// content contribute nothing; selections that match no option contribute
/// nothing. Negative rule values flow through unguarded - a negative `added`
/// or `multiplier` is a legitimate merchant-authored discount, so the result
/// is not clamped.
#[must_use]
pub fn compute_total_price(blocks: &[Block], selections: &SelectionMap) -> f64 {
    let unit_price = blocks
        .iter()
        .find_map(Block::as_config)
        .map_or(0.0, |config| config.unit_price);

    let mut sums = RuleSums::default();
    for block in blocks {
        if !block.is_enabled() {
            continue;
        }
        match block {
            Block::Picker(picker) => score_picker(picker, selections, &mut sums),
            Block::Input(input) => score_input(input, selections, &mut sums),
            Block::Config(_) | Block::Area(_) | Block::Other(_) => {}
        }
    }

    let factor = if sums.multiplier == 0.0 {
        1.0
    } else {
        sums.multiplier
    };
    let new_unit_price = (unit_price + sums.added) * factor;

    let Some(area) = blocks
        .iter()
        .find_map(|block| block.as_area().filter(|area| area.enabled))
    else {
        return new_unit_price;
    };

    let width = selections.get(&area.id).map_or(0.0, SelectionValue::width);
    if width <= 0.0 {
        return 0.0;
    }
    width * new_unit_price
}

/// Score an enabled picker: the selected option, then - when the selection
/// triggers a conditional group - each enabled sub-picker in that group.
fn score_picker(picker: &PickerBlock, selections: &SelectionMap, sums: &mut RuleSums) {
    let Some(selected) = selections
        .get(&picker.id)
        .and_then(SelectionValue::as_picker_value)
    else {
        return;
    };

    if let Some(option) = picker.options.iter().find(|o| o.value == selected) {
        sums.apply_option(option);
    }

    if !picker.is_nested {
        return;
    }

    // Only the first group whose trigger matches the current selection is
    // evaluated. Every other group is skipped wholesale, so stale child
    // selections left in the map from a previous parent choice cannot leak
    // into the price.
    let group = picker.nested.iter().find(|group| {
        group
            .when
            .as_ref()
            .is_some_and(|when| !when.equals.is_empty() && when.equals == selected)
    });
    let Some(group) = group else {
        return;
    };

    for item in &group.items {
        if !item.enabled {
            continue;
        }
        let Some(sub_selected) = selections
            .get(&item.id)
            .and_then(SelectionValue::as_picker_value)
        else {
            continue;
        };
        if let Some(option) = item.options.iter().find(|o| o.value == sub_selected) {
            sums.apply_option(option);
        }
    }
}

/// Score an enabled input block.
///
/// Number entries scale the rule's value by the entered quantity; text
/// entries pass the rule through unscaled once anything was entered.
fn score_input(input: &InputBlock, selections: &SelectionMap, sums: &mut RuleSums) {
    let Some(rule) = &input.pricing else {
        return;
    };
    let Some(selection) = selections.get(&input.id) else {
        return;
    };

    match input.subtype {
        InputSubtype::Number => {
            let Some(quantity) = selection.as_number() else {
                return;
            };
            sums.apply_rule(rule.mode, rule.value * quantity);
        }
        InputSubtype::Text => {
            if selection.is_present() {
                sums.apply_rule(rule.mode, rule.value);
            }
        }
        InputSubtype::Unknown => {}
    }
}

/// Compute a price straight from serialized JSON, failing closed to `0`.
///
/// This is the boundary the cart-transform function and checkout flow use:
/// both receive the configuration and selections as attribute strings, and a
/// price that cannot be computed must never surface as an arbitrary number.
#[must_use]
pub fn compute_total_price_json(config_json: &str, selections_json: &str) -> f64 {
    let blocks = codec::parse_blocks(config_json);
    let selections: SelectionMap = serde_json::from_str(selections_json).unwrap_or_default();
    compute_total_price(&blocks, &selections)
}

/// Format a computed total for display: two decimals, currency code as a
/// suffix when one is configured.
#[must_use]
pub fn format_total(total: f64, currency: &str) -> String {
    if currency.is_empty() {
        format!("{total:.2}")
    } else {
        format!("{total:.2} {currency}")
    }
}
