//! Structural editing operations over a configuration.
//!
//! These are the sequence mutations behind the editor's add/remove/move/
//! duplicate controls. None of them touch pricing, but they uphold the one
//! invariant the engine depends on and cannot repair itself: ids and option
//! values stay unique within their scope. The engine silently matches the
//! first occurrence, so a collision introduced here would surface as a wrong
//! price much later.
//!
//! The `config` block is pinned: it is never removable, reorderable, or
//! duplicable.

use std::collections::HashSet;

use crate::block::{
    AreaBlock, Block, ConditionalGroup, ConfigBlock, DimensionRange, GroupTrigger, InputBlock,
    InputSubtype, Media, OptionItem, PickerBlock,
};

/// Content block kinds the editor can append.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockKind {
    Picker,
    Input,
    Area,
}

impl BlockKind {
    const fn slug(self) -> &'static str {
        match self {
            Self::Picker => "picker",
            Self::Input => "input",
            Self::Area => "area",
        }
    }
}

/// The skeleton a product gets on first open: one enabled config block.
#[must_use]
pub fn default_structure() -> Vec<Block> {
    vec![Block::Config(ConfigBlock {
        title: "Product Customizer".to_string(),
        enabled: true,
        show_price: true,
        currency: "USD".to_string(),
        unit_price: 0.0,
        ..Default::default()
    })]
}

/// Lowercase, whitespace to `-`, strip everything outside `[a-z0-9-]`.
#[must_use]
pub fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    let mut last_was_space = false;
    for c in text.trim().chars() {
        if c.is_whitespace() {
            if !last_was_space {
                slug.push('-');
            }
            last_was_space = true;
            continue;
        }
        last_was_space = false;
        let c = c.to_ascii_lowercase();
        if c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' {
            slug.push(c);
        }
    }
    slug
}

/// Every id in use across the configuration, nested item ids included.
fn existing_ids(blocks: &[Block]) -> HashSet<String> {
    let mut ids = HashSet::new();
    for block in blocks {
        if let Some(id) = block.id() {
            ids.insert(id.to_string());
        }
        if let Block::Picker(picker) = block {
            for group in &picker.nested {
                for item in &group.items {
                    ids.insert(item.id.clone());
                }
            }
        }
    }
    ids
}

/// Derive an id from `base` that collides with nothing in `taken`:
/// `base`, `base-2`, `base-3`, ...
fn disambiguate(taken: &HashSet<String>, base: &str) -> String {
    let base = if base.is_empty() { "block" } else { base };
    if !taken.contains(base) {
        return base.to_string();
    }
    let mut counter = 2;
    loop {
        let candidate = format!("{base}-{counter}");
        if !taken.contains(&candidate) {
            return candidate;
        }
        counter += 1;
    }
}

/// A fresh id for a new block, unique across the configuration.
#[must_use]
pub fn unique_id(blocks: &[Block], base: &str) -> String {
    disambiguate(&existing_ids(blocks), &slugify(base))
}

fn default_option(value: &str) -> OptionItem {
    OptionItem {
        label: "Option".to_string(),
        value: value.to_string(),
        media: Some(Media::Hex {
            hex: "#000000".to_string(),
        }),
        added: Some(0.0),
        ..Default::default()
    }
}

fn default_picker(id: String) -> PickerBlock {
    PickerBlock {
        id,
        title: "Picker".to_string(),
        enabled: true,
        options: vec![default_option("option-1")],
        ..Default::default()
    }
}

/// Build a new content block of the given kind with an id unique across the
/// configuration.
#[must_use]
pub fn default_block(blocks: &[Block], kind: BlockKind) -> Block {
    let id = unique_id(blocks, kind.slug());
    match kind {
        BlockKind::Picker => Block::Picker(default_picker(id)),
        BlockKind::Input => Block::Input(InputBlock {
            id,
            title: "Input".to_string(),
            enabled: true,
            subtype: InputSubtype::Text,
            ..Default::default()
        }),
        BlockKind::Area => Block::Area(AreaBlock {
            id,
            title: "Area".to_string(),
            enabled: true,
            unit: "inch".to_string(),
            limits: Some(crate::block::AreaLimits {
                width: Some(DimensionRange {
                    min: Some(20.0),
                    max: Some(120.0),
                }),
                height: None,
            }),
            ..Default::default()
        }),
    }
}

/// Append a new block of the given kind; returns its id.
pub fn add_block(blocks: &mut Vec<Block>, kind: BlockKind) -> String {
    let block = default_block(blocks, kind);
    let id = block.id().unwrap_or_default().to_string();
    blocks.push(block);
    id
}

fn config_index(blocks: &[Block]) -> Option<usize> {
    blocks.iter().position(|b| matches!(b, Block::Config(_)))
}

/// Remove the block at `index`. The config block is pinned; removing it (or
/// an out-of-range index) is a no-op returning `false`.
pub fn remove_block(blocks: &mut Vec<Block>, index: usize) -> bool {
    if index >= blocks.len() || Some(index) == config_index(blocks) {
        return false;
    }
    blocks.remove(index);
    true
}

/// Move the block at `from` to position `to`. Neither endpoint may be the
/// config block's position, and both must be in range.
pub fn move_block(blocks: &mut Vec<Block>, from: usize, to: usize) -> bool {
    let pinned = config_index(blocks);
    if from >= blocks.len() || to >= blocks.len() {
        return false;
    }
    if Some(from) == pinned || Some(to) == pinned {
        return false;
    }
    let block = blocks.remove(from);
    blocks.insert(to, block);
    true
}

/// Duplicate the block at `index`, inserting the clone right after it.
///
/// The clone gets a `-copy` id (disambiguated on collision), and so does
/// every nested sub-picker inside it - nested ids share the selection-map
/// namespace, so copying them verbatim would break the uniqueness invariant.
/// Returns the clone's id.
pub fn duplicate_block(blocks: &mut Vec<Block>, index: usize) -> Option<String> {
    if Some(index) == config_index(blocks) {
        return None;
    }
    let source = blocks.get(index)?;
    let mut clone = source.clone();

    let mut taken = existing_ids(blocks);
    let base = clone.id().map_or_else(|| "block".to_string(), String::from);
    let new_id = disambiguate(&taken, &format!("{base}-copy"));
    taken.insert(new_id.clone());

    match &mut clone {
        Block::Picker(picker) => {
            picker.id.clone_from(&new_id);
            for group in &mut picker.nested {
                for item in &mut group.items {
                    let item_id = disambiguate(&taken, &format!("{}-copy", item.id));
                    taken.insert(item_id.clone());
                    item.id = item_id;
                }
            }
        }
        Block::Input(input) => input.id.clone_from(&new_id),
        Block::Area(area) => area.id.clone_from(&new_id),
        Block::Config(_) | Block::Other(_) => return None,
    }

    blocks.insert(index + 1, clone);
    Some(new_id)
}

fn picker_at(blocks: &mut [Block], index: usize) -> Option<&mut PickerBlock> {
    match blocks.get_mut(index) {
        Some(Block::Picker(picker)) => Some(picker),
        _ => None,
    }
}

/// Append a default option to the picker at `block_index`; returns its
/// value.
pub fn add_option(blocks: &mut [Block], block_index: usize) -> Option<String> {
    let picker = picker_at(blocks, block_index)?;
    let taken: HashSet<String> = picker.options.iter().map(|o| o.value.clone()).collect();
    let value = disambiguate(&taken, &slugify(&format!("option-{}", picker.options.len() + 1)));
    picker.options.push(default_option(&value));
    Some(value)
}

/// Remove an option from the picker at `block_index`.
pub fn remove_option(blocks: &mut [Block], block_index: usize, option_index: usize) -> bool {
    let Some(picker) = picker_at(blocks, block_index) else {
        return false;
    };
    if option_index >= picker.options.len() {
        return false;
    }
    picker.options.remove(option_index);
    true
}

/// Append an empty conditional group (no trigger value yet) to the picker at
/// `block_index`.
pub fn add_nested_group(blocks: &mut [Block], block_index: usize) -> bool {
    let Some(picker) = picker_at(blocks, block_index) else {
        return false;
    };
    let parent_id = picker.id.clone();
    picker.nested.push(ConditionalGroup {
        when: Some(GroupTrigger {
            parent_id,
            equals: String::new(),
        }),
        items: Vec::new(),
    });
    true
}

/// Append a default sub-picker to a conditional group; returns its id.
pub fn add_nested_item(
    blocks: &mut [Block],
    block_index: usize,
    group_index: usize,
) -> Option<String> {
    let mut taken = existing_ids(blocks);
    let id = disambiguate(&taken, "picker");
    taken.insert(id.clone());

    let picker = picker_at(blocks, block_index)?;
    let group = picker.nested.get_mut(group_index)?;
    group.items.push(default_picker(id.clone()));
    Some(id)
}

/// Remove a sub-picker from a conditional group.
pub fn remove_nested_item(
    blocks: &mut [Block],
    block_index: usize,
    group_index: usize,
    item_index: usize,
) -> bool {
    let Some(picker) = picker_at(blocks, block_index) else {
        return false;
    };
    let Some(group) = picker.nested.get_mut(group_index) else {
        return false;
    };
    if item_index >= group.items.len() {
        return false;
    }
    group.items.remove(item_index);
    true
}

/// Rewrite the config block's `step_order` from the current content-block
/// order. No-op when the configuration has no config block.
pub fn sync_step_order(blocks: &mut [Block]) {
    let order: Vec<String> = blocks
        .iter()
        .filter_map(|block| block.id())
        .filter(|id| !id.is_empty())
        .map(String::from)
        .collect();
    for block in blocks {
        if let Block::Config(config) = block {
            config.step_order = order;
            return;
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Header Style"), "header-style");
        assert_eq!(slugify("  Grommet  Finish "), "grommet-finish");
        assert_eq!(slugify("Größe (cm)"), "gre-cm");
        assert_eq!(slugify(""), "");
    }

    #[test]
    fn test_default_structure_is_valid_and_priceable() {
        let blocks = default_structure();
        assert!(crate::validate::validate_blocks(&blocks).is_empty());
        let total =
            crate::pricing::compute_total_price(&blocks, &crate::selection::SelectionMap::new());
        assert!(total.abs() < f64::EPSILON);
    }

    #[test]
    fn test_add_block_assigns_unique_ids() {
        let mut blocks = default_structure();
        let first = add_block(&mut blocks, BlockKind::Picker);
        let second = add_block(&mut blocks, BlockKind::Picker);
        assert_eq!(first, "picker");
        assert_eq!(second, "picker-2");
        assert!(crate::validate::validate_blocks(&blocks).is_empty());
    }

    #[test]
    fn test_unique_id_counts_nested_items() {
        let mut blocks = default_structure();
        add_block(&mut blocks, BlockKind::Picker);
        add_nested_group(&mut blocks, 1);
        let nested_id = add_nested_item(&mut blocks, 1, 0).unwrap();
        assert_eq!(nested_id, "picker-2");
        // A later top-level picker must not collide with the nested id.
        let third = add_block(&mut blocks, BlockKind::Picker);
        assert_eq!(third, "picker-3");
    }

    #[test]
    fn test_config_block_is_pinned() {
        let mut blocks = default_structure();
        add_block(&mut blocks, BlockKind::Picker);
        add_block(&mut blocks, BlockKind::Area);

        assert!(!remove_block(&mut blocks, 0));
        assert!(!move_block(&mut blocks, 0, 2));
        assert!(!move_block(&mut blocks, 2, 0));
        assert!(duplicate_block(&mut blocks, 0).is_none());
        assert_eq!(blocks.len(), 3);

        assert!(move_block(&mut blocks, 1, 2));
        assert!(remove_block(&mut blocks, 2));
        assert_eq!(blocks.len(), 2);
    }

    #[test]
    fn test_duplicate_block_reids_clone_and_nested_items() {
        let mut blocks = default_structure();
        add_block(&mut blocks, BlockKind::Picker);
        add_nested_group(&mut blocks, 1);
        add_nested_item(&mut blocks, 1, 0);

        let clone_id = duplicate_block(&mut blocks, 1).unwrap();
        assert_eq!(clone_id, "picker-copy");
        assert!(crate::validate::validate_blocks(&blocks)
            .keys()
            .all(|k| !k.ends_with("-id")));

        // Duplicating again disambiguates further.
        let second_clone = duplicate_block(&mut blocks, 1).unwrap();
        assert_eq!(second_clone, "picker-copy-2");
    }

    #[test]
    fn test_option_values_stay_unique() {
        let mut blocks = default_structure();
        add_block(&mut blocks, BlockKind::Picker);
        let value = add_option(&mut blocks, 1).unwrap();
        assert_eq!(value, "option-2");
        let value = add_option(&mut blocks, 1).unwrap();
        assert_eq!(value, "option-3");
        assert!(remove_option(&mut blocks, 1, 1));
        assert!(!remove_option(&mut blocks, 0, 0));
    }

    #[test]
    fn test_sync_step_order() {
        let mut blocks = default_structure();
        add_block(&mut blocks, BlockKind::Picker);
        add_block(&mut blocks, BlockKind::Area);
        sync_step_order(&mut blocks);

        let config = blocks
            .iter()
            .find_map(crate::block::Block::as_config)
            .unwrap();
        assert_eq!(config.step_order, vec!["picker", "area"]);
    }

    #[test]
    fn test_nested_group_trigger_references_parent() {
        let mut blocks = default_structure();
        add_block(&mut blocks, BlockKind::Picker);
        assert!(add_nested_group(&mut blocks, 1));
        let picker = blocks.get(1).and_then(crate::block::Block::as_picker).unwrap();
        let when = picker.nested.first().unwrap().when.as_ref().unwrap();
        assert_eq!(when.parent_id, "picker");
        assert!(when.equals.is_empty());
    }
}
