//! Pre-persistence validation of a configuration.
//!
//! The editor blocks save while this map is non-empty. Keys are field paths
//! the form layer can anchor messages to: `{block}-title`, `{block}-id`,
//! `{block}-options`, `{block}-option-{option}-label`, and
//! `{block}-nested-{group}-{item}-...` for nested sub-pickers. An empty map
//! means the configuration is persistable.
//!
//! Validation is a separate concern from pricing: the engine tolerates
//! anything, but a merchant should not be able to save a configuration whose
//! ids collide, because the engine silently matches the first occurrence and
//! the collision would surface as a wrong price much later.

use std::collections::BTreeMap;

use crate::block::{Block, OptionItem, PickerBlock};

/// Field-path keyed validation errors. Empty means valid.
pub type ValidationErrors = BTreeMap<String, String>;

const MSG_TITLE_REQUIRED: &str = "Title is required";
const MSG_ID_REQUIRED: &str = "Id is required";
const MSG_ID_TAKEN: &str = "This id is already in use";
const MSG_OPTIONS_REQUIRED: &str = "At least one option is required";
const MSG_OPTION_LABEL_REQUIRED: &str = "Option label is required";
const MSG_OPTION_VALUE_REQUIRED: &str = "Option value is required";
const MSG_OPTION_VALUE_TAKEN: &str = "This value is already in use";

/// Validate a configuration for persistence.
///
/// Checks every content block (the `config` block and unknown kinds are
/// exempt): non-empty title and id, id uniqueness across the whole
/// configuration including nested sub-picker ids (they share the
/// selection-map namespace), at least one option per picker, option
/// labels/values present, and option values unique within one picker.
#[must_use]
pub fn validate_blocks(blocks: &[Block]) -> ValidationErrors {
    let mut errors = ValidationErrors::new();

    // Every (field path, id) pair in the configuration, nested ids included.
    let mut ids: Vec<(String, String)> = Vec::new();

    for (index, block) in blocks.iter().enumerate() {
        match block {
            Block::Config(_) | Block::Other(_) => {}
            Block::Picker(picker) => {
                check_common(&mut errors, index, &picker.title, &picker.id);
                ids.push((format!("{index}-id"), picker.id.clone()));
                check_options(&mut errors, &format!("{index}"), &picker.options);
                for (group_index, group) in picker.nested.iter().enumerate() {
                    for (item_index, item) in group.items.iter().enumerate() {
                        check_nested_item(
                            &mut errors,
                            &mut ids,
                            index,
                            group_index,
                            item_index,
                            item,
                        );
                    }
                }
            }
            Block::Input(input) => {
                check_common(&mut errors, index, &input.title, &input.id);
                ids.push((format!("{index}-id"), input.id.clone()));
            }
            Block::Area(area) => {
                check_common(&mut errors, index, &area.title, &area.id);
                ids.push((format!("{index}-id"), area.id.clone()));
            }
        }
    }

    flag_duplicate_ids(&mut errors, &ids);
    errors
}

fn check_common(errors: &mut ValidationErrors, index: usize, title: &str, id: &str) {
    if title.trim().is_empty() {
        errors.insert(format!("{index}-title"), MSG_TITLE_REQUIRED.to_string());
    }
    if id.trim().is_empty() {
        errors.insert(format!("{index}-id"), MSG_ID_REQUIRED.to_string());
    }
}

fn check_options(errors: &mut ValidationErrors, path: &str, options: &[OptionItem]) {
    if options.is_empty() {
        errors.insert(format!("{path}-options"), MSG_OPTIONS_REQUIRED.to_string());
        return;
    }
    for (option_index, option) in options.iter().enumerate() {
        if option.label.trim().is_empty() {
            errors.insert(
                format!("{path}-option-{option_index}-label"),
                MSG_OPTION_LABEL_REQUIRED.to_string(),
            );
        }
        if option.value.trim().is_empty() {
            errors.insert(
                format!("{path}-option-{option_index}-value"),
                MSG_OPTION_VALUE_REQUIRED.to_string(),
            );
        } else if options
            .iter()
            .enumerate()
            .any(|(other, o)| other != option_index && o.value == option.value)
        {
            // Selection matching is by exact value; a duplicate would make
            // the second option unreachable.
            errors.insert(
                format!("{path}-option-{option_index}-value"),
                MSG_OPTION_VALUE_TAKEN.to_string(),
            );
        }
    }
}

fn check_nested_item(
    errors: &mut ValidationErrors,
    ids: &mut Vec<(String, String)>,
    block_index: usize,
    group_index: usize,
    item_index: usize,
    item: &PickerBlock,
) {
    let path = format!("{block_index}-nested-{group_index}-{item_index}");
    if item.title.trim().is_empty() {
        errors.insert(format!("{path}-title"), MSG_TITLE_REQUIRED.to_string());
    }
    if item.id.trim().is_empty() {
        errors.insert(format!("{path}-id"), MSG_ID_REQUIRED.to_string());
    }
    ids.push((format!("{path}-id"), item.id.clone()));
    check_options(errors, &path, &item.options);
}

/// Flag every field whose id occurs more than once. All occurrences are
/// flagged so the merchant sees the collision from either side.
fn flag_duplicate_ids(errors: &mut ValidationErrors, ids: &[(String, String)]) {
    for (path, id) in ids {
        if id.trim().is_empty() {
            continue;
        }
        let occurrences = ids.iter().filter(|(_, other)| other == id).count();
        if occurrences > 1 {
            errors.insert(path.clone(), MSG_ID_TAKEN.to_string());
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    fn parse(value: serde_json::Value) -> Vec<Block> {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_valid_configuration_has_no_errors() {
        let blocks = parse(json!([
            {"type": "config", "title": "Customizer", "enabled": true, "unit_price": 10},
            {"type": "picker", "id": "color", "title": "Color", "enabled": true, "options": [
                {"label": "Red", "value": "red"},
                {"label": "Blue", "value": "blue"},
            ]},
            {"type": "area", "id": "size", "title": "Size", "enabled": true, "unit": "inch"},
        ]));
        assert!(validate_blocks(&blocks).is_empty());
    }

    #[test]
    fn test_missing_title_and_id() {
        let blocks = parse(json!([
            {"type": "input", "id": "", "title": "", "subtype": "text"},
        ]));
        let errors = validate_blocks(&blocks);
        assert_eq!(errors.get("0-title").unwrap(), "Title is required");
        assert_eq!(errors.get("0-id").unwrap(), "Id is required");
    }

    #[test]
    fn test_config_block_is_exempt() {
        // The config block has no id and an empty title on first open; that
        // must not block saving.
        let blocks = parse(json!([{"type": "config", "title": "", "enabled": true}]));
        assert!(validate_blocks(&blocks).is_empty());
    }

    #[test]
    fn test_duplicate_ids_flag_all_occurrences() {
        let blocks = parse(json!([
            {"type": "picker", "id": "color", "title": "Color", "options": [
                {"label": "Red", "value": "red"},
            ]},
            {"type": "input", "id": "color", "title": "Note", "subtype": "text"},
        ]));
        let errors = validate_blocks(&blocks);
        assert_eq!(errors.get("0-id").unwrap(), "This id is already in use");
        assert_eq!(errors.get("1-id").unwrap(), "This id is already in use");
    }

    #[test]
    fn test_nested_item_ids_share_the_namespace() {
        let blocks = parse(json!([
            {"type": "picker", "id": "header", "title": "Header", "isNested": true,
             "options": [{"label": "Grommet", "value": "grommet"}],
             "nested": [{"when": {"parentId": "header", "equals": "grommet"},
                         "items": [{"id": "finish", "title": "Finish",
                                    "options": [{"label": "Antique", "value": "antique"}]}]}]},
            {"type": "input", "id": "finish", "title": "Finish note", "subtype": "text"},
        ]));
        let errors = validate_blocks(&blocks);
        assert_eq!(
            errors.get("0-nested-0-0-id").unwrap(),
            "This id is already in use"
        );
        assert_eq!(errors.get("1-id").unwrap(), "This id is already in use");
    }

    #[test]
    fn test_picker_requires_options() {
        let blocks = parse(json!([
            {"type": "picker", "id": "color", "title": "Color", "options": []},
        ]));
        let errors = validate_blocks(&blocks);
        assert_eq!(
            errors.get("0-options").unwrap(),
            "At least one option is required"
        );
    }

    #[test]
    fn test_option_fields_required_and_unique() {
        let blocks = parse(json!([
            {"type": "picker", "id": "color", "title": "Color", "options": [
                {"label": "", "value": "red"},
                {"label": "Blue", "value": ""},
                {"label": "Crimson", "value": "red"},
            ]},
        ]));
        let errors = validate_blocks(&blocks);
        assert_eq!(
            errors.get("0-option-0-label").unwrap(),
            "Option label is required"
        );
        assert_eq!(
            errors.get("0-option-1-value").unwrap(),
            "Option value is required"
        );
        assert_eq!(
            errors.get("0-option-2-value").unwrap(),
            "This value is already in use"
        );
    }

    #[test]
    fn test_validation_does_not_mutate_input() {
        let blocks = parse(json!([
            {"type": "picker", "id": "color", "title": "Color", "options": []},
        ]));
        let before = serde_json::to_value(&blocks).unwrap();
        let _ = validate_blocks(&blocks);
        assert_eq!(serde_json::to_value(&blocks).unwrap(), before);
    }
}
