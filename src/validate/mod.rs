//! The explicit validate step.
//!
//! Structural problems never get this far: the graph rejects them when they
//! are introduced. What remains is semantic incompleteness (inputs nothing
//! feeds, sources that do not fit the input they feed) which the editor
//! tolerates while a recipe is being built. [`validate`] reports these as
//! [`ValidationWarning`]s.

mod types;

pub use types::*;

use crate::graph::{InputMapping, InputSource, JobNode, RecipeGraph};
use crate::schema::{DataKind, InputDescriptor};
use ahash::AHashSet;
use tracing::debug;

/// What a source says about the data it delivers.
struct SourceData<'a> {
    kind: DataKind,
    media_types: &'a [String],
    optional: bool,
}

/// Runs every local check over `graph`.
pub fn validate(graph: &RecipeGraph) -> ValidationReport {
    let mut warnings = Vec::new();
    for node in graph.nodes() {
        // a node present in the graph always resolves
        let Ok(per_input) = graph.compute_input_sources(node.name()) else {
            continue;
        };
        for entry in per_input {
            check_input(graph, node, entry.input, &entry.sources, &mut warnings);
        }
    }

    let bound: AHashSet<&str> = graph
        .nodes()
        .flat_map(|n| n.recipe_inputs())
        .map(|b| b.recipe_input.as_str())
        .collect();
    for declaration in graph.recipe_inputs() {
        if !bound.contains(declaration.name.as_str()) {
            warnings.push(ValidationWarning::new(
                WarningKind::UnusedRecipeInput,
                format!("Recipe input {} is not used by any job", declaration.name),
            ));
        }
    }

    debug!(warnings = warnings.len(), "validated recipe graph");
    ValidationReport::from(warnings)
}

fn check_input(
    graph: &RecipeGraph,
    node: &JobNode,
    input: &InputDescriptor,
    sources: &[InputMapping],
    warnings: &mut Vec<ValidationWarning>,
) {
    let job = node.name();
    let warn = |kind: WarningKind, details: String| {
        ValidationWarning::new(kind, details).on_input(job, &input.name)
    };

    match sources.len() {
        0 if input.required => warnings.push(warn(
            WarningKind::RequiredInput,
            format!("Data input {} of job {} is required and was not provided", input.name, job),
        )),
        0 | 1 => {}
        n => warnings.push(warn(
            WarningKind::DuplicateSource,
            format!("Data input {} of job {} has {} sources", input.name, job, n),
        )),
    }

    for mapping in sources {
        let Some(source) = source_data(graph, mapping) else {
            continue;
        };
        if source.kind.is_file() != input.kind.is_file() {
            warnings.push(warn(
                WarningKind::DataKind,
                format!(
                    "Data input {} of job {} expects {} but {} provides {}",
                    input.name, job, input.kind, mapping.source, source.kind
                ),
            ));
            continue;
        }
        if source.kind == DataKind::Files && input.kind == DataKind::File {
            warnings.push(warn(
                WarningKind::MultipleFiles,
                format!("Data input {} of job {} only accepts a single file", input.name, job),
            ));
        }
        if source.optional && input.required {
            warnings.push(warn(
                WarningKind::OptionalSource,
                format!(
                    "Data input {} of job {} is required and data from {} is optional",
                    input.name, job, mapping.output
                ),
            ));
        }
        if !input.media_types.is_empty() {
            for media_type in source.media_types {
                if !input.media_types.contains(media_type) {
                    warnings.push(warn(
                        WarningKind::MediaType,
                        format!("Invalid media type for data input: {} -> {}", input.name, media_type),
                    ));
                }
            }
        }
    }
}

fn source_data<'a>(graph: &'a RecipeGraph, mapping: &InputMapping) -> Option<SourceData<'a>> {
    match &mapping.source {
        InputSource::Recipe => graph.recipe_input(&mapping.output).map(|d| SourceData {
            kind: d.kind,
            media_types: &d.media_types,
            optional: !d.required,
        }),
        InputSource::Job(producer) => {
            let output = graph.node(producer)?.schema().output(&mapping.output)?;
            Some(SourceData {
                kind: output.kind,
                media_types: output.media_type.as_slice(),
                optional: false,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{Connection, Dependency, RecipeInputBinding};
    use crate::recipe::RecipeInputDeclaration;
    use crate::schema::JobTypeSchema;
    use std::sync::Arc;

    #[test]
    fn test_two_sources_for_one_input() {
        let producer = JobTypeSchema::new("producer", "1.0").with_output("out", DataKind::File);
        let consumer = JobTypeSchema::new("consumer", "1.0").with_input("in", DataKind::File, true);
        let mut graph = RecipeGraph::builder().build();
        graph.add_node(Arc::new(producer)).unwrap();
        graph.add_node(Arc::new(consumer)).unwrap();
        graph
            .add_recipe_input(RecipeInputDeclaration::new("file", DataKind::File, true))
            .unwrap();
        graph.map_input("consumer", "in", "producer", "out").unwrap();

        // bypass the one-source rule the mutations enforce
        let node = &mut graph.nodes[1];
        node.recipe_inputs.push(RecipeInputBinding {
            job_input: "in".to_string(),
            recipe_input: "file".to_string(),
        });
        node.dependencies.push(Dependency {
            producer: "producer".to_string(),
            connections: vec![Connection {
                output: "out".to_string(),
                input: "in".to_string(),
            }],
        });

        let report = validate(&graph);
        let duplicates = report.of_kind(WarningKind::DuplicateSource);
        assert_eq!(duplicates.len(), 1);
        assert_eq!(duplicates[0].details, "Data input in of job consumer has 3 sources");
    }
}
