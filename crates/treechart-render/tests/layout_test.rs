use regex::Regex;
use serde_json::{Value as JsonValue, json};
use treechart_core::{
    Dataset, Direction, INVISIBLE_ROOT_NAME, KeyGenerator, LinkStyle, RandomKeys, SequentialKeys,
    TreeConfig, normalize,
};
use treechart_render::{LayoutSnapshot, LinkJoiner, LinkKind, TreeLayout, layout_tree, path_for};

fn lay_out(data: JsonValue, keys: &mut dyn KeyGenerator) -> TreeLayout {
    let ds = Dataset::from_value(data).expect("dataset");
    let wrapper = normalize(Some(&ds), keys).expect("normalize");
    layout_tree(&wrapper, &TreeConfig::default())
}

fn sample() -> JsonValue {
    json!({
        "name": "CEO",
        "children": [
            { "name": "CTO", "children": [{ "name": "Dev" }, { "name": "Ops" }] },
            { "name": "CFO", "children": [{ "name": "Audit" }] },
            { "name": "COO" }
        ]
    })
}

fn name_of(layout: &TreeLayout, index: usize) -> &str {
    layout.nodes[index].name().unwrap_or_default()
}

#[test]
fn special_links_resolve_parent_once_and_every_child() {
    let layout = lay_out(
        json!({
            "id": 1,
            "identifier": "id",
            "links": [{ "parent": 1, "child": 2 }],
            "children": [{ "id": 2 }, { "id": 3 }]
        }),
        &mut SequentialKeys::new(),
    );

    let special: Vec<_> = layout
        .links
        .iter()
        .filter(|l| l.kind == LinkKind::Special)
        .collect();
    assert_eq!(special.len(), 1);
    assert_eq!(layout.source(special[0]).data["id"], json!(1));
    assert_eq!(layout.target(special[0]).data["id"], json!(2));
    assert!(
        layout
            .links
            .iter()
            .filter(|l| l.kind == LinkKind::Special)
            .all(|l| layout.target(l).data["id"] != json!(3))
    );
    // Special links come after every structural link.
    assert_eq!(layout.links.last().map(|l| l.kind), Some(LinkKind::Special));
    assert!(layout.nodes[0].data.get("identifier").is_none());
}

#[test]
fn special_links_fan_out_and_skip_unresolved_pairs() {
    let layout = lay_out(
        json!({
            "name": "root",
            "group": "a",
            "identifier": "group",
            "links": [
                { "parent": "a", "child": "b" },
                { "parent": "missing", "child": "b" },
                { "parent": "a", "child": "missing" }
            ],
            "children": [{ "name": "x", "group": "b" }, { "name": "y", "group": "b" }]
        }),
        &mut SequentialKeys::new(),
    );
    let special: Vec<_> = layout
        .links
        .iter()
        .filter(|l| l.kind == LinkKind::Special)
        .map(|l| (name_of(&layout, l.source), name_of(&layout, l.target)))
        .collect();
    assert_eq!(special, vec![("root", "x"), ("root", "y")]);
}

#[test]
fn depth_identifier_matches_node_level_attribute() {
    let layout = lay_out(
        json!({
            "name": "root",
            "identifier": "depth",
            "links": [{ "parent": 1, "child": "3" }],
            "children": [{ "name": "a", "children": [{ "name": "a1" }] }]
        }),
        &mut SequentialKeys::new(),
    );
    let special: Vec<_> = layout
        .links
        .iter()
        .filter(|l| l.kind == LinkKind::Special)
        .map(|l| (name_of(&layout, l.source), name_of(&layout, l.target)))
        .collect();
    assert_eq!(special, vec![("root", "a1")]);
}

#[test]
fn value_identifier_reads_node_data() {
    let layout = lay_out(
        json!({
            "name": "root",
            "value": 10,
            "identifier": "value",
            "links": [{ "parent": 10, "child": 30 }],
            "children": [{ "name": "a", "value": 20 }, { "name": "b", "value": "30" }]
        }),
        &mut SequentialKeys::new(),
    );
    let special: Vec<_> = layout
        .links
        .iter()
        .filter(|l| l.kind == LinkKind::Special)
        .map(|l| (name_of(&layout, l.source), name_of(&layout, l.target)))
        .collect();
    assert_eq!(special, vec![("root", "b")]);
}

#[test]
fn invisible_root_never_reaches_the_output() {
    for data in [
        sample(),
        json!([{ "name": "a" }, { "name": "b", "children": [{ "name": "b1" }] }]),
        json!([]),
    ] {
        let layout = lay_out(data, &mut SequentialKeys::new());
        assert!(
            layout
                .nodes
                .iter()
                .all(|n| n.name() != Some(INVISIBLE_ROOT_NAME))
        );
        for link in &layout.links {
            assert_ne!(layout.source(link).name(), Some(INVISIBLE_ROOT_NAME));
            assert_ne!(layout.target(link).name(), Some(INVISIBLE_ROOT_NAME));
        }
    }
}

#[test]
fn horizontal_paths_transpose_vertical_paths() {
    let layout = lay_out(sample(), &mut SequentialKeys::new());
    let pair = Regex::new(r"(-?[\d.]+),(-?[\d.]+)").expect("pair regex must compile");
    for style in [LinkStyle::Curve, LinkStyle::Straight] {
        for link in &layout.links {
            let vertical = path_for(&layout, link, style, Direction::Vertical);
            let horizontal = path_for(&layout, link, style, Direction::Horizontal);
            let transposed = pair.replace_all(&vertical, "$2,$1");
            assert_eq!(horizontal, transposed, "{style} {}", layout.link_key(link));
        }
    }
}

#[test]
fn sibling_subtrees_never_overlap_and_depth_grows_y() {
    let layout = lay_out(sample(), &mut SequentialKeys::new());
    for link in &layout.links {
        assert!(layout.target(link).y > layout.source(link).y);
    }
    let mut by_depth: std::collections::BTreeMap<usize, Vec<f64>> = Default::default();
    for n in &layout.nodes {
        by_depth.entry(n.depth).or_default().push(n.x);
    }
    for xs in by_depth.values() {
        for w in xs.windows(2) {
            assert!(w[1] - w[0] >= 100.0 - 1e-9, "{xs:?}");
        }
    }
}

#[test]
fn link_join_diffs_by_key_across_passes() {
    let ds = Dataset::from_value(sample()).expect("dataset");
    let mut wrapper = normalize(Some(&ds), &mut SequentialKeys::new()).expect("normalize");
    let mut joiner = LinkJoiner::new();

    let first = layout_tree(&wrapper, &TreeConfig::default());
    let join = joiner.join(&first, LinkStyle::Curve, Direction::Vertical);
    assert_eq!(join.enter.len(), first.links.len());
    assert!(join.update.is_empty() && join.exit.is_empty());
    assert!(join.enter.iter().all(|op| op.transition.from_opacity == Some(0.0)));

    // Collapse the CTO: its two links leave, everything else updates in place.
    let cto_path = first.nodes[1].path.clone();
    assert!(
        wrapper
            .root
            .descendant_mut(&cto_path)
            .expect("cto")
            .toggle_collapsed()
    );
    let second = layout_tree(&wrapper, &TreeConfig::default());
    let join = joiner.join(&second, LinkStyle::Curve, Direction::Vertical);
    assert!(join.enter.is_empty());
    assert_eq!(join.exit.len(), 2);
    assert!(join.exit.iter().all(|e| e.transition.duration_ms == 400));
    assert_eq!(join.update.len(), first.links.len() - 2);
    let exited: Vec<String> = join.exit.iter().map(|e| e.key.clone()).collect();

    // Expanding again re-enters the same keys.
    wrapper
        .root
        .descendant_mut(&cto_path)
        .expect("cto")
        .toggle_collapsed();
    let third = layout_tree(&wrapper, &TreeConfig::default());
    let join = joiner.join(&third, LinkStyle::Curve, Direction::Vertical);
    let entered: Vec<String> = join.enter.iter().map(|op| op.key.clone()).collect();
    assert_eq!(entered, exited);
    assert_eq!(join.update.len(), first.links.len() - 2);
}

#[test]
fn duplicate_link_keys_keep_the_first_occurrence() {
    let layout = lay_out(
        json!({
            "name": "r",
            "identifier": "name",
            "links": [{ "parent": "r", "child": "c" }],
            "children": [{ "name": "c" }]
        }),
        &mut SequentialKeys::new(),
    );
    assert_eq!(layout.links.len(), 2);
    let join = LinkJoiner::new().join(&layout, LinkStyle::Straight, Direction::Vertical);
    assert_eq!(join.enter.len(), 1);
}

#[test]
fn random_keys_produce_the_same_shape_as_sequential_keys() {
    let uuid = Regex::new(r"[0-9a-f]{8}-[0-9a-f]{4}-4[0-9a-f]{3}-[89ab][0-9a-f]{3}-[0-9a-f]{12}")
        .expect("uuid regex must compile");
    let seq = Regex::new(r"\bn\d+\b").expect("key regex must compile");

    let snapshot = |keys: &mut dyn KeyGenerator| {
        let layout = lay_out(sample(), keys);
        LayoutSnapshot::from_layout(&layout, LinkStyle::Curve, Direction::Vertical)
            .to_json(false)
            .expect("json")
    };
    let random = snapshot(&mut RandomKeys);
    let sequential = snapshot(&mut SequentialKeys::new());
    assert_eq!(
        uuid.replace_all(&random, "<key>"),
        seq.replace_all(&sequential, "<key>")
    );
}
