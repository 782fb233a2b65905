//! Integration tests for the form tree:
//! - path composition and lookup across anonymous groups
//! - array and object value propagation
//! - clone independence
//! - the end-to-end form scenario (object form with a scalar and an array field)

use form_tree::{
    ElementId, FieldConfig, FieldOption, FieldType, FormError, FormTree, Mode, TreeConfig,
};
use pretty_assertions::assert_eq;
use serde_json::{Value, json};

fn string_field(tree: &mut FormTree, name: &str) -> ElementId {
    tree.new_field(FieldConfig::named(FieldType::String, name))
        .expect("string field")
}

fn string_array(tree: &mut FormTree, name: &str) -> ElementId {
    let prototype = tree
        .new_field(FieldConfig::new(FieldType::String))
        .expect("prototype");
    tree.new_field(FieldConfig::named(FieldType::Array, name).prototype(prototype))
        .expect("array field")
}

fn child_values(tree: &FormTree, id: ElementId) -> Vec<Value> {
    tree.children(id)
        .iter()
        .map(|&child| tree.value(child).cloned().unwrap_or(Value::Null))
        .collect()
}

#[test]
fn form_scenario_name_and_tags() -> anyhow::Result<()> {
    let mut tree = FormTree::new();
    let form = tree.new_form(Some("form"));
    let name = string_field(&mut tree, "name");
    let tags = string_array(&mut tree, "tags");
    tree.add(form, &[name, tags])?;

    tree.set_value(form, json!({"name": "x", "tags": ["a", "b"]}))?;

    let found_name = tree.find_field(form, "name").expect("name field");
    assert_eq!(tree.value(found_name), Some(&json!("x")));

    let found_tags = tree.find_field(form, "tags").expect("tags field");
    assert_eq!(tree.children(found_tags).len(), 2);
    assert_eq!(child_values(&tree, found_tags), vec![json!("a"), json!("b")]);
    Ok(())
}

#[test]
fn path_round_trip_through_named_chain() -> anyhow::Result<()> {
    let mut tree = FormTree::new();
    let a = tree.new_element(Some("A"));
    let b = tree.new_element(Some("B"));
    let c = tree.new_element(Some("C"));
    tree.add(a, &[b])?;
    tree.add(b, &[c])?;

    assert_eq!(tree.path(c), "A.B.C");
    assert_eq!(tree.find(a, "B.C"), Some(c));

    tree.set_name(b, None)?;
    assert_eq!(tree.path(c), "A.C");
    assert_eq!(tree.find(a, "C"), Some(c));
    Ok(())
}

#[test]
fn find_matches_every_reachable_path() -> anyhow::Result<()> {
    let mut tree = FormTree::new();
    let root = tree.new_element(Some("root"));
    let group = tree.new_element(None);
    let contact = tree.new_element(Some("contact"));
    let email = string_field(&mut tree, "email");
    let phone = string_field(&mut tree, "phone");
    tree.add(root, &[group])?;
    tree.add(group, &[contact])?;
    tree.add(contact, &[email, phone])?;

    for id in [contact, email, phone] {
        let full = tree.path(id);
        let relative = full.strip_prefix("root.").expect("rooted path");
        assert_eq!(tree.find(root, relative), Some(id), "path {full}");
    }
    Ok(())
}

#[test]
fn find_field_ignores_plain_elements_with_same_name() -> anyhow::Result<()> {
    let mut tree = FormTree::new();
    let root = tree.new_form(None);
    let field = string_field(&mut tree, "dup");
    let plain = tree.new_element(Some("dup"));
    tree.add(root, &[field, plain])?;

    assert_eq!(tree.find(root, "dup"), Some(plain));
    assert_eq!(tree.find_field(root, "dup"), Some(field));
    Ok(())
}

#[test]
fn array_assignment_replaces_children() -> anyhow::Result<()> {
    let mut tree = FormTree::new();
    let numbers = tree
        .new_field(FieldConfig::new(FieldType::Number))
        .expect("prototype");
    let list = tree.new_field(FieldConfig::named(FieldType::Array, "list").prototype(numbers))?;

    tree.set_value(list, json!([1, 2, 3]))?;
    assert_eq!(child_values(&tree, list), vec![json!(1), json!(2), json!(3)]);

    tree.set_value(list, json!([9]))?;
    assert_eq!(child_values(&tree, list), vec![json!(9)]);
    Ok(())
}

#[test]
fn object_assignment_leaves_absent_keys_alone() -> anyhow::Result<()> {
    let mut tree = FormTree::new();
    let object = tree.new_field(FieldConfig::named(FieldType::Object, "obj"))?;
    let a = string_field(&mut tree, "a");
    let b = string_field(&mut tree, "b");
    tree.add(object, &[a, b])?;

    tree.set_value(object, json!({"a": 1, "b": 2}))?;
    assert_eq!(tree.value(tree.find_field(object, "a").unwrap()), Some(&json!(1)));
    assert_eq!(tree.value(tree.find_field(object, "b").unwrap()), Some(&json!(2)));

    tree.set_value(object, json!({"a": 5}))?;
    assert_eq!(tree.value(a), Some(&json!(5)));
    assert_eq!(tree.value(b), Some(&json!(2)));
    Ok(())
}

#[test]
fn clone_is_independent_both_ways() -> anyhow::Result<()> {
    let mut tree = FormTree::new();
    let form = tree.new_form(Some("form"));
    let name = string_field(&mut tree, "name");
    let tags = string_array(&mut tree, "tags");
    tree.set_options(
        name,
        vec![FieldOption::new("x", "X"), FieldOption::new("y", "Y")],
    )?;
    tree.add(form, &[name, tags])?;
    tree.set_value(form, json!({"name": "x", "tags": ["a"]}))?;

    let copy = tree.clone_subtree(form)?;
    let copy_name = tree.find_field(copy, "name").expect("cloned name");
    let copy_tags = tree.find_field(copy, "tags").expect("cloned tags");
    assert_eq!(tree.value(copy_name), Some(&json!("x")));
    assert_eq!(tree.options(copy_name), tree.options(name));

    tree.set_value(copy_name, json!("changed"))?;
    tree.set_value(copy_tags, json!(["p", "q", "r"]))?;
    assert_eq!(tree.value(name), Some(&json!("x")));
    assert_eq!(child_values(&tree, tags), vec![json!("a")]);

    tree.set_value(name, json!("original"))?;
    let extra = string_field(&mut tree, "extra");
    tree.add(form, &[extra])?;
    assert_eq!(tree.value(copy_name), Some(&json!("changed")));
    assert_eq!(tree.find(copy, "extra"), None);
    assert_eq!(tree.children(copy).len(), 2);
    Ok(())
}

#[test]
fn strict_mode_reports_instead_of_degrading() {
    let mut tree = FormTree::with_config(TreeConfig::strict());
    let list = tree
        .new_field(FieldConfig::named(FieldType::Array, "list"))
        .expect("array field");
    let holder = tree.new_element(None);
    let other = tree.new_element(None);
    let child = tree.new_element(Some("child"));
    tree.add(holder, &[child]).expect("first add");

    assert_eq!(
        tree.set_value(list, json!([1])),
        Err(FormError::MissingPrototype("list".into()))
    );
    assert_eq!(
        tree.add(other, &[child]),
        Err(FormError::AlreadyAttached {
            child,
            parent: holder
        })
    );

    // The lenient path is still reachable per call.
    tree.set_value_with(list, json!([1]), Mode::Lenient)
        .expect("lenient assignment");
    assert_eq!(tree.value(list), Some(&json!([1])));
}

#[test]
fn strict_tree_clones_values_stored_leniently() -> anyhow::Result<()> {
    let mut tree = FormTree::with_config(TreeConfig::strict());
    let list = tree.new_field(FieldConfig::named(FieldType::Array, "list"))?;
    let object = tree.new_field(FieldConfig::named(FieldType::Object, "obj"))?;
    tree.set_value_with(list, json!([1]), Mode::Lenient)?;
    tree.set_value_with(object, json!("text"), Mode::Lenient)?;

    let list_copy = tree.clone_subtree(list)?;
    let object_copy = tree.clone_subtree(object)?;

    assert_eq!(tree.value(list_copy), Some(&json!([1])));
    assert_eq!(tree.value(object_copy), Some(&json!("text")));
    assert_eq!(tree.mode(), Mode::Strict);
    Ok(())
}

#[test]
fn config_from_toml_drives_mode() -> anyhow::Result<()> {
    let config = TreeConfig::from_toml_str(
        r#"
        [form_tree]
        mode = "strict"
        dispose_replaced_children = false
        "#,
    )?;
    let tree = FormTree::with_config(config);
    assert_eq!(tree.mode(), Mode::Strict);
    assert!(!tree.config().dispose_replaced_children);
    Ok(())
}
