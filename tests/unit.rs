//! Unit tests for the smaller public pieces: errors, catalogs, config and output.
mod common;
use common::{DIAMOND_JSON, PIPELINE_JSON, graph_with, load};
use recipe_graph::error::PortDirection;
use recipe_graph::prelude::*;
use recipe_graph::render::NodeKind;

#[test]
fn test_graph_error_display() {
    let cycle = GraphError::Cycle {
        path: vec!["a".to_string(), "b".to_string(), "a".to_string()],
    };
    assert_eq!(cycle.to_string(), "Dependency cycle: a -> b -> a");

    let port = GraphError::InvalidPort {
        job: "merge-2".to_string(),
        job_type: "merge".to_string(),
        direction: PortDirection::Input,
        port: "middle".to_string(),
    };
    assert_eq!(port.to_string(), "Job 'merge-2' (job type 'merge') has no input named 'middle'");

    assert_eq!(
        GraphError::ReservedName("start".to_string()).to_string(),
        "'start' is reserved and cannot be used as a job name"
    );
}

#[test]
fn test_editor_error_display() {
    let err = EditorError::NotPermitted {
        operation: "remove job",
        mode: "view".to_string(),
    };
    assert_eq!(err.to_string(), "'remove job' is not permitted in view mode");

    // graph errors pass through unchanged
    let err = EditorError::from(GraphError::UnknownNode("ghost".to_string()));
    assert_eq!(err.to_string(), "Job 'ghost' not found in the recipe");
}

#[test]
fn test_catalog_from_json() {
    let catalog = Catalog::from_json(
        r#"[
            {"id": 10, "name": "resize", "version": "2.1",
             "input_data": [{"name": "image", "type": "file", "media_types": ["image/png"]}],
             "output_data": [{"name": "thumbnail", "type": "file", "media_type": "image/png"}]},
            {"name": "notify", "version": "1.0",
             "input_data": [{"name": "message", "type": "property", "required": false}]}
        ]"#,
    )
    .unwrap();
    assert_eq!(catalog.len(), 2);

    let resize = catalog.job_type(10).unwrap();
    assert_eq!(resize.key().to_string(), "(resize, 2.1)");
    assert!(resize.input("image").unwrap().required);
    assert_eq!(resize.output("thumbnail").unwrap().media_type.as_deref(), Some("image/png"));

    let notify = catalog.job_type_by_key("notify", "1.0").unwrap();
    assert!(!notify.input("message").unwrap().required);
    assert_eq!(catalog.list_job_types()[1].name, "notify");
}

#[test]
fn test_catalog_rejects_duplicates_and_bad_json() {
    let err = Catalog::from_json(
        r#"[{"name": "a", "version": "1"}, {"name": "a", "version": "1"}]"#,
    )
    .unwrap_err();
    assert!(matches!(
        err,
        CatalogError::DuplicateJobType { ref name, ref version } if name == "a" && version == "1"
    ));

    assert!(matches!(Catalog::from_json("{}"), Err(CatalogError::JsonParseError(_))));
}

#[test]
fn test_graph_config_from_json() {
    assert_eq!(GraphConfig::default().auto_wire, AutoWire::FirstRecipeInput);
    let config = GraphConfig::from_json(r#"{"auto_wire": "first_recipe_input"}"#).unwrap();
    assert_eq!(config.auto_wire, AutoWire::FirstRecipeInput);
    let config = GraphConfig::from_json("{}").unwrap();
    assert_eq!(config.auto_wire, AutoWire::FirstRecipeInput);
    assert!(GraphConfig::from_json(r#"{"auto_wire": "sometimes"}"#).is_err());
}

#[test]
fn test_builder_version() {
    let graph = RecipeGraph::builder().version("2.0").build();
    assert_eq!(graph.version(), "2.0");
    assert!(graph.is_empty());
    assert_eq!(graph.to_definition().version, "2.0");
}

#[test]
fn test_visualize_lists_jobs_in_dependency_order() {
    let listing = visualize(&load(DIAMOND_JSON));
    assert!(listing.starts_with("======== RECIPE GRAPH (version 1.0) ========"));
    assert!(listing.contains("--- RECIPE INPUTS ---"));
    assert!(listing.contains("[01] ingest (ingest 1.0)"));
    assert!(listing.contains("[04] publish (publish 1.0)"));
    assert!(listing.contains("recipe.input_file"));
    assert!(listing.contains("left.file, right.file"));
    assert!(listing.contains("  start -> ingest"));
    assert!(listing.contains("  publish -> end"));
    assert!(listing.trim_end().ends_with("END OF GRAPH ================"));

    let ingest = listing.find("] ingest").unwrap();
    let merge = listing.find("] merge").unwrap();
    let publish = listing.find("] publish").unwrap();
    assert!(ingest < merge && merge < publish);
}

#[test]
fn test_visualize_marks_unmapped_inputs() {
    let listing = visualize(&graph_with(&["transform"]));
    assert!(!listing.contains("--- RECIPE INPUTS ---"));
    assert!(listing.contains("(unmapped)"));
}

#[test]
fn test_render_graph_serializes_for_renderer() {
    let view = RenderGraph::new(&load(PIPELINE_JSON));
    let kinds: Vec<NodeKind> = view.nodes.iter().map(|n| n.kind).collect();
    assert_eq!(kinds, vec![NodeKind::Start, NodeKind::Job, NodeKind::Job, NodeKind::End]);

    let json = serde_json::to_value(&view).unwrap();
    assert_eq!(json["nodes"][0]["kind"], "start");
    assert_eq!(json["nodes"][1]["class"], "nostatus");
    assert_eq!(json["edges"].as_array().unwrap().len(), 3);

    let event: RenderEvent = serde_json::from_str(r#"{"node": "ingest", "gesture": "activate"}"#).unwrap();
    assert_eq!(event, RenderEvent::activate("ingest"));
}
