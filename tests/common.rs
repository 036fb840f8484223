//! Common test utilities for building catalogs, graphs and definitions.
use recipe_graph::prelude::*;
use std::sync::Arc;

/// A small catalog shared by the integration tests.
///
/// - `ingest` (id 1): `input_file: file` -> `file: file (text/plain)`
/// - `transform` (id 2): `file: file`, `threshold: property?` -> `result: file`, `summary: property`
/// - `merge` (id 3): `left: file`, `right: file` -> `merged: files`
/// - `publish` (id 4): `files: files (text/plain only)` -> `receipt: property`
#[allow(dead_code)]
pub fn catalog() -> Catalog {
    let mut ingest = JobTypeSchema::new("ingest", "1.0")
        .with_id(1)
        .with_input("input_file", DataKind::File, true)
        .with_output("file", DataKind::File);
    ingest.output_data[0].media_type = Some("text/plain".to_string());

    let transform = JobTypeSchema::new("transform", "1.0")
        .with_id(2)
        .with_input("file", DataKind::File, true)
        .with_input("threshold", DataKind::Property, false)
        .with_output("result", DataKind::File)
        .with_output("summary", DataKind::Property);

    let merge = JobTypeSchema::new("merge", "1.0")
        .with_id(3)
        .with_input("left", DataKind::File, true)
        .with_input("right", DataKind::File, true)
        .with_output("merged", DataKind::Files);

    let mut publish = JobTypeSchema::new("publish", "1.0")
        .with_id(4)
        .with_input("files", DataKind::Files, true)
        .with_output("receipt", DataKind::Property);
    publish.input_data[0].media_types = vec!["text/plain".to_string()];

    Catalog::new(vec![ingest, transform, merge, publish]).expect("fixture catalog is valid")
}

/// Looks a fixture job type up by name.
#[allow(dead_code)]
pub fn schema(name: &str) -> Arc<JobTypeSchema> {
    catalog()
        .job_type_by_key(name, "1.0")
        .unwrap_or_else(|| panic!("no fixture job type named {}", name))
}

/// A graph holding the given fixture job types, each named after its type.
#[allow(dead_code)]
pub fn graph_with(names: &[&str]) -> RecipeGraph {
    let mut graph = RecipeGraph::new();
    for name in names {
        graph.add_node(schema(name)).expect("fixture names are unique");
    }
    graph
}

/// Like [`graph_with`] but with recipe input auto-wiring switched off.
#[allow(dead_code)]
pub fn graph_without_auto_wire(names: &[&str]) -> RecipeGraph {
    let mut graph = RecipeGraph::builder().auto_wire(AutoWire::Disabled).build();
    for name in names {
        graph.add_node(schema(name)).expect("fixture names are unique");
    }
    graph
}

/// `ingest` fed from the recipe input, `transform` fed from `ingest`.
#[allow(dead_code)]
pub const PIPELINE_JSON: &str = r#"{
    "version": "1.0",
    "input_data": [
        {"name": "input_file", "type": "file", "required": true}
    ],
    "jobs": [
        {
            "name": "ingest",
            "job_type_id": 1,
            "recipe_inputs": [{"job_input": "input_file", "recipe_input": "input_file"}]
        },
        {
            "name": "transform",
            "job_type": {"name": "transform", "version": "1.0"},
            "dependencies": [
                {"name": "ingest", "connections": [{"output": "file", "input": "file"}]}
            ]
        }
    ]
}"#;

/// Diamond: two transforms off `ingest`, merged, then published.
#[allow(dead_code)]
pub const DIAMOND_JSON: &str = r#"{
    "input_data": [{"name": "input_file", "type": "file"}],
    "jobs": [
        {"name": "publish", "job_type_id": 4,
         "dependencies": [{"name": "merge", "connections": [{"output": "merged", "input": "files"}]}]},
        {"name": "merge", "job_type_id": 3,
         "dependencies": [
            {"name": "left", "connections": [{"output": "result", "input": "left"}]},
            {"name": "right", "connections": [{"output": "result", "input": "right"}]}
         ]},
        {"name": "left", "job_type_id": 2,
         "dependencies": [{"name": "ingest", "connections": [{"output": "file", "input": "file"}]}]},
        {"name": "right", "job_type_id": 2,
         "dependencies": [{"name": "ingest", "connections": [{"output": "file", "input": "file"}]}]},
        {"name": "ingest", "job_type_id": 1,
         "recipe_inputs": [{"job_input": "input_file", "recipe_input": "input_file"}]}
    ]
}"#;

/// Loads one of the JSON fixtures against the fixture catalog.
#[allow(dead_code)]
pub fn load(json: &str) -> RecipeGraph {
    RecipeGraph::from_definition(json, &catalog()).expect("fixture definition loads")
}
