//! Integration tests for loading and serializing recipe definitions.
mod common;
use common::{DIAMOND_JSON, PIPELINE_JSON, catalog, load};
use recipe_graph::prelude::*;

fn load_err(json: &str) -> DefinitionError {
    RecipeGraph::from_definition(json, &catalog()).unwrap_err()
}

#[test]
fn test_load_resolves_job_types_by_id_and_key() {
    let graph = load(PIPELINE_JSON);
    assert_eq!(graph.len(), 2);
    assert_eq!(graph.version(), "1.0");
    assert_eq!(graph.node("ingest").unwrap().schema().id, Some(1));
    assert_eq!(graph.node("transform").unwrap().schema().id, Some(2));
    assert_eq!(graph.recipe_inputs()[0].name, "input_file");
    assert_eq!(graph.start_link("ingest"), Some(StartLink::RecipeInputs));
    assert_eq!(graph.start_link("transform"), Some(StartLink::Dependencies));
}

#[test]
fn test_round_trip_is_structurally_equal() {
    for json in [PIPELINE_JSON, DIAMOND_JSON] {
        let original = RecipeTypeDefinition::from_json(json).unwrap();
        let graph = load(json);
        let serialized = graph.to_definition();
        assert!(
            serialized.is_structurally_equal(&original),
            "round trip changed the definition:\n{}",
            serialized.to_json_pretty().unwrap()
        );

        // and the serialized form loads back into the same shape
        let again = RecipeGraph::from_definition(serialized.clone(), &catalog()).unwrap();
        assert!(again.to_definition().is_structurally_equal(&serialized));
    }
}

#[test]
fn test_serialization_emits_both_job_type_references() {
    let definition = load(PIPELINE_JSON).to_definition();
    let transform = definition.job("transform").unwrap();
    assert_eq!(transform.job_type_id, Some(2));
    let key = transform.job_type.as_ref().unwrap();
    assert_eq!((key.name.as_str(), key.version.as_str()), ("transform", "1.0"));

    let json: serde_json::Value = serde_json::from_str(&definition.to_json_pretty().unwrap()).unwrap();
    assert_eq!(json["jobs"][1]["dependencies"][0]["connections"][0]["output"], "file");
    assert_eq!(json["input_data"][0]["type"], "file");
}

#[test]
fn test_document_envelope_loads() {
    let document = format!(r#"{{"id": 7, "name": "pipeline", "definition": {}}}"#, PIPELINE_JSON);
    let value: serde_json::Value = serde_json::from_str(&document).unwrap();
    let graph = RecipeGraph::from_definition(value, &catalog()).unwrap();
    assert_eq!(graph.len(), 2);
}

#[test]
fn test_builder_config_applies_to_loaded_graph() {
    let config = GraphConfig::from_json(r#"{"auto_wire": "disabled"}"#).unwrap();
    let mut graph = RecipeGraph::builder()
        .with_config(config)
        .load(r#"{"jobs": [{"name": "transform", "job_type_id": 2}]}"#, &catalog())
        .unwrap();
    assert_eq!(graph.config().auto_wire, AutoWire::Disabled);

    graph
        .add_recipe_input(RecipeInputDeclaration::new("input_file", DataKind::File, true))
        .unwrap();
    assert!(graph.is_start_fed("transform"));
}

#[test]
fn test_load_rejects_duplicate_job_names() {
    let err = load_err(
        r#"{"jobs": [{"name": "a", "job_type_id": 1}, {"name": "a", "job_type_id": 2}]}"#,
    );
    assert!(matches!(err, DefinitionError::Graph(GraphError::DuplicateName(ref n)) if n == "a"));
}

#[test]
fn test_load_rejects_duplicate_recipe_inputs() {
    let err = load_err(
        r#"{"input_data": [{"name": "in", "type": "file"}, {"name": "in", "type": "property"}], "jobs": []}"#,
    );
    assert!(matches!(err, DefinitionError::Graph(GraphError::DuplicateRecipeInput(_))));
}

#[test]
fn test_load_rejects_unknown_and_missing_job_types() {
    let err = load_err(r#"{"jobs": [{"name": "a", "job_type_id": 99}]}"#);
    assert_eq!(err.to_string(), "Job 'a' references unknown job type id 99");

    let err = load_err(r#"{"jobs": [{"name": "a", "job_type": {"name": "ingest", "version": "2.0"}}]}"#);
    assert_eq!(err.to_string(), "Job 'a' references unknown job type (ingest, 2.0)");

    let err = load_err(r#"{"jobs": [{"name": "a"}]}"#);
    assert!(matches!(err, DefinitionError::MissingJobType(ref n) if n == "a"));
}

#[test]
fn test_load_rejects_undefined_dependency() {
    let err = load_err(
        r#"{"jobs": [{"name": "a", "job_type_id": 2, "dependencies": [{"name": "ghost"}]}]}"#,
    );
    assert!(matches!(err, DefinitionError::Graph(GraphError::UnknownNode(ref n)) if n == "ghost"));
}

#[test]
fn test_load_rejects_cycles() {
    let err = load_err(
        r#"{"jobs": [
            {"name": "a", "job_type_id": 2, "dependencies": [{"name": "b"}]},
            {"name": "b", "job_type_id": 2, "dependencies": [{"name": "a"}]}
        ]}"#,
    );
    assert!(matches!(err, DefinitionError::Graph(GraphError::Cycle { .. })));

    let err = load_err(
        r#"{"jobs": [{"name": "a", "job_type_id": 2, "dependencies": [{"name": "a"}]}]}"#,
    );
    assert!(matches!(err, DefinitionError::Graph(GraphError::Cycle { .. })));
}

/// `count` transform jobs, each fed by the one before it. With `closed` the
/// first one is fed by the last.
fn chain_json(count: usize, closed: bool) -> String {
    let jobs: Vec<String> = (0..count)
        .map(|i| {
            let producer = match i {
                0 if closed => Some(count - 1),
                0 => None,
                _ => Some(i - 1),
            };
            let dependencies = producer.map_or(String::new(), |p| {
                format!(
                    r#", "dependencies": [{{"name": "j{}", "connections": [{{"output": "result", "input": "file"}}]}}]"#,
                    p
                )
            });
            format!(r#"{{"name": "j{}", "job_type_id": 2{}}}"#, i, dependencies)
        })
        .collect();
    format!(r#"{{"jobs": [{}]}}"#, jobs.join(","))
}

#[test]
fn test_load_handles_long_chains() {
    let graph = load(&chain_json(5000, false));
    assert_eq!(graph.len(), 5000);
    assert!(graph.validate_acyclic().is_ok());
    assert_eq!(graph.layers().unwrap()["j4999"], 5000);

    let err = load_err(&chain_json(5000, true));
    let path = match &err {
        DefinitionError::Graph(GraphError::Cycle { path }) => path,
        other => panic!("expected a cycle, got {}", other),
    };
    assert_eq!(path.len(), 5001);
    assert_eq!(path.first(), path.last());
}

#[test]
fn test_load_rejects_invalid_ports() {
    let err = load_err(
        r#"{"jobs": [
            {"name": "ingest", "job_type_id": 1},
            {"name": "transform", "job_type_id": 2,
             "dependencies": [{"name": "ingest", "connections": [{"output": "nope", "input": "file"}]}]}
        ]}"#,
    );
    assert!(matches!(
        err,
        DefinitionError::Graph(GraphError::InvalidPort { ref port, .. }) if port == "nope"
    ));
}

#[test]
fn test_load_rejects_duplicate_sources_for_one_input() {
    let err = load_err(
        r#"{"input_data": [{"name": "in", "type": "file"}],
            "jobs": [
            {"name": "ingest", "job_type_id": 1},
            {"name": "transform", "job_type_id": 2,
             "dependencies": [{"name": "ingest", "connections": [{"output": "file", "input": "file"}]}],
             "recipe_inputs": [{"job_input": "file", "recipe_input": "in"}]}
        ]}"#,
    );
    assert!(matches!(
        err,
        DefinitionError::Graph(GraphError::DuplicateInputSource { ref input, .. }) if input == "file"
    ));
}

#[test]
fn test_load_rejects_undefined_recipe_input() {
    let err = load_err(
        r#"{"jobs": [{"name": "ingest", "job_type_id": 1,
            "recipe_inputs": [{"job_input": "input_file", "recipe_input": "missing"}]}]}"#,
    );
    assert!(matches!(err, DefinitionError::Graph(GraphError::UnknownRecipeInput(_))));
}

#[test]
fn test_load_merges_repeated_dependency_entries() {
    let graph = load(
        r#"{"jobs": [
            {"name": "ingest", "job_type_id": 1},
            {"name": "merge", "job_type_id": 3, "dependencies": [
                {"name": "ingest", "connections": [{"output": "file", "input": "left"}]},
                {"name": "ingest", "connections": [{"output": "file", "input": "right"}]}
            ]}
        ]}"#,
    );
    let merge = graph.node("merge").unwrap();
    assert_eq!(merge.dependencies().len(), 1);
    assert_eq!(merge.dependency("ingest").unwrap().connections.len(), 2);
}

#[test]
fn test_malformed_json_fails_to_load() {
    let err = load_err("{not json");
    assert!(matches!(err, DefinitionError::JsonParseError(_)));
}
