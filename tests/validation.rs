//! Integration tests for the explicit validate step.
mod common;
use common::{PIPELINE_JSON, graph_with, graph_without_auto_wire, load, schema};
use recipe_graph::prelude::*;

fn ids(report: &ValidationReport) -> Vec<&str> {
    report.warnings.iter().map(|w| w.id.as_str()).collect()
}

#[test]
fn test_complete_pipeline_has_no_warnings() {
    let report = validate(&load(PIPELINE_JSON));
    assert!(report.is_clean(), "unexpected warnings: {:?}", report.warnings);
}

#[test]
fn test_unmapped_required_input_is_a_warning_not_an_error() {
    let graph = graph_with(&["transform"]);
    let report = validate(&graph);
    // `threshold` is optional, so only `file` is reported
    assert_eq!(ids(&report), vec!["required_input"]);
    let warning = &report.warnings[0];
    assert_eq!(warning.job.as_deref(), Some("transform"));
    assert_eq!(warning.input.as_deref(), Some("file"));
}

#[test]
fn test_kind_mismatch_is_reported() {
    let mut graph = graph_with(&["transform"]);
    graph.add_node_named(schema("transform"), "downstream").unwrap();
    graph.map_input("downstream", "file", "transform", "summary").unwrap();

    let report = validate(&graph);
    let kinds = report.of_kind(WarningKind::DataKind);
    assert_eq!(kinds.len(), 1);
    assert_eq!(kinds[0].job.as_deref(), Some("downstream"));
}

#[test]
fn test_files_into_single_file_input() {
    let mut graph = graph_with(&["merge", "transform"]);
    graph.map_input("transform", "file", "merge", "merged").unwrap();
    let report = validate(&graph);
    assert_eq!(report.of_kind(WarningKind::MultipleFiles).len(), 1);
}

#[test]
fn test_single_file_into_files_input_is_fine() {
    let mut graph = graph_with(&["ingest", "publish"]);
    graph.map_input("publish", "files", "ingest", "file").unwrap();
    let report = validate(&graph);
    assert!(report.of_kind(WarningKind::MultipleFiles).is_empty());
    assert!(report.of_kind(WarningKind::DataKind).is_empty());
    // ingest's media type is accepted by publish
    assert!(report.of_kind(WarningKind::MediaType).is_empty());
}

#[test]
fn test_media_type_mismatch() {
    let mut graph = graph_with(&["transform", "publish"]);
    graph.add_node_named(schema("merge"), "merge").unwrap();
    graph.map_input("publish", "files", "merge", "merged").unwrap();
    // merge declares no media type, so there is nothing to reject
    assert!(validate(&graph).of_kind(WarningKind::MediaType).is_empty());

    let mut graph = graph_without_auto_wire(&["publish"]);
    let mut declaration = RecipeInputDeclaration::new("images", DataKind::Files, true);
    declaration.media_types = vec!["image/png".to_string(), "text/plain".to_string()];
    graph.add_recipe_input(declaration).unwrap();
    graph.map_recipe_input("publish", "files", "images").unwrap();

    let report = validate(&graph);
    let media = report.of_kind(WarningKind::MediaType);
    assert_eq!(media.len(), 1);
    assert_eq!(media[0].details, "Invalid media type for data input: files -> image/png");
}

#[test]
fn test_optional_recipe_input_feeding_required_job_input() {
    let mut graph = graph_without_auto_wire(&["ingest"]);
    graph
        .add_recipe_input(RecipeInputDeclaration::new("input_file", DataKind::File, false))
        .unwrap();
    graph.map_recipe_input("ingest", "input_file", "input_file").unwrap();

    let report = validate(&graph);
    assert_eq!(ids(&report), vec!["optional_source"]);
}

#[test]
fn test_unused_recipe_input() {
    let mut graph = graph_without_auto_wire(&["ingest"]);
    graph
        .add_recipe_input(RecipeInputDeclaration::new("spare", DataKind::Property, true))
        .unwrap();
    let report = validate(&graph);
    assert_eq!(report.of_kind(WarningKind::UnusedRecipeInput).len(), 1);
    assert_eq!(report.of_kind(WarningKind::RequiredInput).len(), 1);
}

#[test]
fn test_warnings_serialize_to_wire_shape() {
    let report = validate(&graph_with(&["transform"]));
    let json = serde_json::to_value(&report).unwrap();
    let warning = &json["warnings"][0];
    assert_eq!(warning["id"], "required_input");
    assert!(warning["details"].as_str().unwrap().contains("file"));
}
