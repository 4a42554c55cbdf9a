mod common;

use assert_fs::prelude::*;
use predicates::prelude::*;
use serde_json::Value;
use std::process::Output;

async fn run(args: &[&str]) -> Output {
    tokio::process::Command::new(env!("CARGO_BIN_EXE_course_graph"))
        .args(args)
        .env_remove("GRAPH_MAX_DEPTH")
        .env("RUST_LOG", "warn")
        .output()
        .await
        .unwrap()
}

#[tokio::test]
async fn test_graph_command_prints_snapshot() {
    let temp = assert_fs::TempDir::new().unwrap();
    let export = common::piazza_export(temp.path());
    temp.child("mech2-piazza.zip")
        .assert(predicate::path::exists());

    let output = run(&["graph", "--platform", "piazza", "--path", export.to_str().unwrap()]).await;
    assert!(output.status.success());

    let snapshot: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(snapshot["nodes"].as_array().unwrap().len(), 5);
    assert_eq!(snapshot["edges"].as_array().unwrap().len(), 3);
    assert_eq!(snapshot["nodes"][0]["id"], "piazza_0");
    assert_eq!(snapshot["edges"][0]["source"], "piazza_0");
    assert_eq!(snapshot["edges"][0]["target"], "piazza_1");
}

#[tokio::test]
async fn test_retrieve_command_respects_depth() {
    let temp = assert_fs::TempDir::new().unwrap();
    let export = common::piazza_export(temp.path());
    let path = export.to_str().unwrap();

    let output = run(&["retrieve", "-p", "piazza", "--path", path, "--seed", "piazza_0"]).await;
    assert!(output.status.success());
    let docs: Vec<Value> = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(docs.len(), 1);
    assert_eq!(docs[0]["metadata"]["source"], "users.json");

    let output = run(&[
        "retrieve", "-p", "piazza", "--path", path, "--seed", "piazza_0", "--max-depth", "2",
    ])
    .await;
    assert!(output.status.success());
    let docs: Vec<Value> = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(docs.len(), 2);
    assert_eq!(docs[1]["metadata"]["source"], "class_content_flat.json");
}

#[tokio::test]
async fn test_retrieve_unknown_seed_fails() {
    let temp = assert_fs::TempDir::new().unwrap();
    let export = common::canvas_export(temp.path());

    let output = run(&[
        "retrieve",
        "-p",
        "canvas",
        "--path",
        export.to_str().unwrap(),
        "--seed",
        "canvas_99",
    ])
    .await;

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(predicate::str::contains("Artifact ID 'canvas_99' not found in graph").eval(&*stderr));
}

#[tokio::test]
async fn test_export_path_is_required() {
    let output = run(&["graph", "--platform", "canvas"]).await;

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(predicate::str::contains("--path is required").eval(&*stderr));
}
