//! Integration tests for the @module category grammar.
//!
//! Covers bare and parameterized categories plus the known grammar
//! limitations (no escaping, empty-name entries).

use omni_manifest::{CategoryAttribute, ModuleCategory, parse_categories};

/// A single word is one bare category.
#[test]
fn test_bare_category() {
    let categories = parse_categories("alpha");
    assert_eq!(categories, vec![ModuleCategory::bare("alpha")]);
}

/// Positional and keyed attributes keep declaration order.
#[test]
fn test_positional_and_keyed_attributes() {
    let categories = parse_categories("beta(x,y=2)");
    assert_eq!(
        categories,
        vec![ModuleCategory::with_attributes(
            "beta",
            vec![
                CategoryAttribute::positional("x"),
                CategoryAttribute::keyed("y", "2"),
            ],
        )]
    );
}

/// Space-separated entries come back in order.
#[test]
fn test_multiple_categories_in_order() {
    let categories = parse_categories("a b(k=1)");
    assert_eq!(categories.len(), 2);
    assert_eq!(categories[0].name, "a");
    assert!(categories[0].is_bare());
    assert_eq!(categories[1].name, "b");
    assert_eq!(categories[1].attributes, vec![CategoryAttribute::keyed("k", "1")]);
}

/// Surrounding whitespace of the whole string is ignored.
#[test]
fn test_outer_whitespace_trimmed() {
    assert_eq!(
        parse_categories("  svc admin \t"),
        vec![ModuleCategory::bare("svc"), ModuleCategory::bare("admin")]
    );
}

/// Known limitation: the empty string yields one empty-named category.
#[test]
fn test_empty_string_yields_empty_named_category() {
    let categories = parse_categories("");
    assert_eq!(categories.len(), 1);
    assert_eq!(categories[0].name, "");
    assert!(categories[0].attributes.is_empty());
}

/// Known limitation: a `=` in a value is kept after the first split.
#[test]
fn test_equals_inside_value() {
    let categories = parse_categories("http(query=a=1)");
    assert_eq!(
        categories[0].attributes,
        vec![CategoryAttribute::keyed("query", "a=1")]
    );
}

/// Known limitation: text outside the parentheses of a matched entry is
/// dropped, since the entry shape is searched rather than anchored.
#[test]
fn test_unanchored_entry_shape() {
    let categories = parse_categories("x-job(nightly)");
    assert_eq!(categories[0].name, "job");
    assert_eq!(categories[0].positional().collect::<Vec<_>>(), vec!["nightly"]);
}

/// Entries that do not look like `name(args)` are bare, never errors.
#[test]
fn test_unparseable_shape_falls_back_to_bare() {
    for entry in ["job(", ")", "(x)", "=1"] {
        let categories = parse_categories(entry);
        assert_eq!(categories, vec![ModuleCategory::bare(entry)], "entry {entry}");
    }
}
