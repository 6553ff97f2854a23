use assert_cmd::prelude::*;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

fn repo_root() -> PathBuf {
    let manifest_dir = Path::new(env!("CARGO_MANIFEST_DIR"));
    manifest_dir
        .parent()
        .and_then(|p| p.parent())
        .expect("expected crates/<name> layout")
        .to_path_buf()
}

fn fixture(name: &str) -> PathBuf {
    let path = repo_root().join("fixtures").join(name);
    assert!(path.exists(), "fixture missing: {}", path.display());
    path
}

#[test]
fn cli_layout_prints_nodes_links_and_transform() {
    let exe = assert_cmd::cargo_bin!("treechart-cli");
    let output = Command::new(exe)
        .args(["layout", fixture("basic.json").to_string_lossy().as_ref()])
        .output()
        .expect("run cli");
    assert!(output.status.success(), "{output:?}");

    let json: Value = serde_json::from_slice(&output.stdout).expect("layout json");
    assert_eq!(json["transform"], "scale(1) translate(400px, -100px)");
    assert_eq!(json["direction"], "vertical");

    let names: Vec<_> = json["nodes"]
        .as_array()
        .expect("nodes")
        .iter()
        .map(|n| n["data"]["name"].as_str().unwrap_or_default().to_string())
        .collect();
    assert_eq!(names, vec!["CEO", "CTO", "CFO", "COO", "Dev", "Ops"]);

    let links = json["links"].as_array().expect("links");
    assert_eq!(links.len(), 6);
    let special = links.last().expect("special link");
    assert_eq!(special["kind"], "special");
    assert_eq!(special["key"], "n4-n3");
}

#[test]
fn cli_layout_applies_config_and_overrides() {
    let exe = assert_cmd::cargo_bin!("treechart-cli");
    let output = Command::new(exe)
        .args([
            "layout",
            "--pretty",
            "--config",
            fixture("options.json").to_string_lossy().as_ref(),
            "--link-style",
            "curve",
            fixture("basic.json").to_string_lossy().as_ref(),
        ])
        .output()
        .expect("run cli");
    assert!(output.status.success(), "{output:?}");

    let json: Value = serde_json::from_slice(&output.stdout).expect("layout json");
    assert_eq!(json["direction"], "horizontal");
    assert_eq!(json["linkStyle"], "curve");
    // nodeWidth - 200 across, half the viewport height down.
    assert_eq!(json["transform"], "scale(1) translate(-80px, 300px)");
    // Horizontal charts put depth on x: the root sits at one level height.
    assert_eq!(json["nodes"][0]["x"], 160.0);
}

#[test]
fn cli_renders_svg_to_file() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let out = tmp.path().join("out.svg");

    let exe = assert_cmd::cargo_bin!("treechart-cli");
    Command::new(exe)
        .args([
            "render",
            "--id",
            "org",
            "--out",
            out.to_string_lossy().as_ref(),
            fixture("basic.json").to_string_lossy().as_ref(),
        ])
        .assert()
        .success();

    let svg = fs::read_to_string(&out).expect("read svg");
    assert!(svg.starts_with(r#"<svg id="org""#));
    assert_eq!(svg.matches(r#"<path class="link""#).count(), 6);
    assert!(svg.contains(r#"class="node collapsed""#));
    assert!(svg.contains("<text>Ops</text>"));
}

#[test]
fn cli_rejects_unknown_flags_with_usage() {
    let exe = assert_cmd::cargo_bin!("treechart-cli");
    Command::new(exe)
        .args(["layout", "--direction", "diagonal"])
        .assert()
        .code(2);
}

#[test]
fn cli_reports_invalid_datasets() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let input = tmp.path().join("bad.json");
    fs::write(&input, "42").expect("write input");

    let exe = assert_cmd::cargo_bin!("treechart-cli");
    Command::new(exe)
        .args(["layout", input.to_string_lossy().as_ref()])
        .assert()
        .code(1);
}
