use serde_json::{Value as JsonValue, json};
use treechart_core::{Dataset, INVISIBLE_ROOT_NAME, SequentialKeys, TreeNode, normalize};

/// Drops engine bookkeeping so two copies with different keys compare by shape and payload.
fn strip_keys(v: &mut JsonValue) {
    match v {
        JsonValue::Object(map) => {
            map.shift_remove("_key");
            for (_k, val) in map.iter_mut() {
                strip_keys(val);
            }
        }
        JsonValue::Array(arr) => {
            for item in arr {
                strip_keys(item);
            }
        }
        _ => {}
    }
}

fn first_copy(data: JsonValue, keys: &mut SequentialKeys) -> TreeNode {
    let ds = Dataset::from_value(data).expect("dataset");
    let wrapper = normalize(Some(&ds), keys).expect("normalize");
    wrapper.top_level()[0].clone()
}

#[test]
fn normalizing_a_copy_reproduces_its_shape() {
    let source = json!({
        "name": "root",
        "title": "CEO",
        "meta": { "tags": ["a", "b"], "level": 1 },
        "children": [
            { "name": "a", "children": [{ "name": "a1", "score": 1.5 }] },
            { "name": "b", "_children": [{ "name": "b1" }] },
            { "name": "c", "children": null }
        ]
    });
    let mut keys = SequentialKeys::new();
    let once = first_copy(source, &mut keys);
    let twice = first_copy(once.to_value(), &mut keys);

    let mut once_value = once.to_value();
    let mut twice_value = twice.to_value();
    strip_keys(&mut once_value);
    strip_keys(&mut twice_value);
    assert_eq!(once_value, twice_value);
    assert_eq!(once.subtree_len(), twice.subtree_len());
    assert!(twice.visible_children()[1].is_collapsed());
}

#[test]
fn field_order_survives_the_copy() {
    let once = first_copy(
        json!({ "zeta": 1, "name": "r", "alpha": 2 }),
        &mut SequentialKeys::new(),
    );
    let fields: Vec<_> = once.payload().keys().map(String::as_str).collect();
    assert_eq!(fields, vec!["zeta", "name", "alpha"]);
}

#[test]
fn keys_are_never_reissued_by_one_generator() {
    let mut keys = SequentialKeys::new();
    let data = json!({ "name": "r", "children": [{ "name": "a" }] });
    let first = first_copy(data.clone(), &mut keys);
    let second = first_copy(data, &mut keys);
    assert_eq!(first.key().as_str(), "n0");
    assert_eq!(second.key().as_str(), "n2");
    assert_eq!(keys.issued(), 4);
}

#[test]
fn list_datasets_keep_reverse_order_and_lists_of_one_match_single_roots() {
    let ds = Dataset::from_value(json!([{ "name": "x" }, { "name": "y" }, { "name": "z" }]))
        .expect("dataset");
    let wrapper = normalize(Some(&ds), &mut SequentialKeys::new()).expect("normalize");
    let names: Vec<_> = wrapper.top_level().iter().filter_map(TreeNode::name).collect();
    assert_eq!(names, vec!["z", "y", "x"]);

    let single = first_copy(json!({ "name": "only" }), &mut SequentialKeys::new());
    let listed = first_copy(json!([{ "name": "only" }]), &mut SequentialKeys::new());
    assert_eq!(single, listed);
}

#[test]
fn datasets_using_the_reserved_root_name_are_rejected() {
    let ds = Dataset::from_value(json!([
        { "name": "a" },
        { "name": "b", "children": [{ "name": INVISIBLE_ROOT_NAME }] }
    ]))
    .expect("dataset");
    let err = normalize(Some(&ds), &mut SequentialKeys::new()).unwrap_err();
    assert!(err.to_string().contains(INVISIBLE_ROOT_NAME));
}
