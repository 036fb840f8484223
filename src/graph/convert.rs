use super::node::{Connection, Dependency, JobNode, NodeId, RecipeInputBinding};
use super::{GraphBuilder, RecipeGraph};
use crate::error::{DefinitionError, GraphError};
use crate::recipe::{
    ConnectionDefinition, DependencyDefinition, IntoRecipeDefinition, JobDefinition,
    RecipeInputDefinition, RecipeTypeDefinition,
};
use crate::schema::{JobTypeCatalog, JobTypeSchema};
use ahash::AHashSet;
use std::sync::Arc;
use tracing::info;

impl GraphBuilder {
    /// Builds a graph from a serialized definition, resolving job types
    /// through `catalog`.
    ///
    /// Every structural rule the mutation operations enforce is checked here
    /// as well, since the definition may have been edited outside the graph.
    pub fn load(
        self,
        definition: impl IntoRecipeDefinition,
        catalog: &dyn JobTypeCatalog,
    ) -> Result<RecipeGraph, DefinitionError> {
        let definition = definition.into_definition()?;
        let mut graph = self.version(&definition.version).build();

        let mut declared = AHashSet::new();
        for input in &definition.input_data {
            if !declared.insert(input.name.as_str()) {
                return Err(GraphError::DuplicateRecipeInput(input.name.clone()).into());
            }
        }
        graph.recipe_inputs = definition.input_data.clone();

        for job in &definition.jobs {
            let schema = resolve_job_type(job, catalog)?;
            graph.check_new_name(&job.name)?;
            graph
                .index
                .insert(job.name.clone(), NodeId(graph.nodes.len()));
            graph.nodes.push(JobNode::new(&job.name, schema));
        }

        for (i, job) in definition.jobs.iter().enumerate() {
            let mut node = graph.nodes[i].clone();
            let mut bound = AHashSet::new();

            for dependency in &job.dependencies {
                if dependency.name == job.name {
                    return Err(GraphError::Cycle {
                        path: vec![job.name.clone(), job.name.clone()],
                    }
                    .into());
                }
                let producer = graph.id_of(&dependency.name)?;
                if node.dependency(&dependency.name).is_none() {
                    node.dependencies.push(Dependency::new(&dependency.name));
                }
                for connection in &dependency.connections {
                    graph.require_output(producer, &connection.output)?;
                    graph.require_input(NodeId(i), &connection.input)?;
                    if !bound.insert(connection.input.clone()) {
                        return Err(duplicate_source(job, &connection.input));
                    }
                    if let Some(target) = node.dependency_mut(&dependency.name) {
                        target.connections.push(Connection {
                            output: connection.output.clone(),
                            input: connection.input.clone(),
                        });
                    }
                }
            }

            for binding in &job.recipe_inputs {
                if !declared.contains(binding.recipe_input.as_str()) {
                    return Err(GraphError::UnknownRecipeInput(binding.recipe_input.clone()).into());
                }
                graph.require_input(NodeId(i), &binding.job_input)?;
                if !bound.insert(binding.job_input.clone()) {
                    return Err(duplicate_source(job, &binding.job_input));
                }
                node.recipe_inputs.push(RecipeInputBinding {
                    job_input: binding.job_input.clone(),
                    recipe_input: binding.recipe_input.clone(),
                });
            }

            graph.nodes[i] = node;
        }

        graph.reindex();
        graph.validate_acyclic()?;
        info!(
            jobs = graph.len(),
            recipe_inputs = graph.recipe_inputs.len(),
            "loaded recipe definition"
        );
        Ok(graph)
    }
}

impl RecipeGraph {
    /// Shortcut for `RecipeGraph::builder().load(definition, catalog)`.
    pub fn from_definition(
        definition: impl IntoRecipeDefinition,
        catalog: &dyn JobTypeCatalog,
    ) -> Result<Self, DefinitionError> {
        GraphBuilder::new().load(definition, catalog)
    }

    /// Serializes the graph back into the wire format.
    pub fn to_definition(&self) -> RecipeTypeDefinition {
        RecipeTypeDefinition {
            version: self.version.clone(),
            input_data: self.recipe_inputs.clone(),
            jobs: self
                .nodes
                .iter()
                .map(|node| JobDefinition {
                    name: node.name.clone(),
                    job_type_id: node.schema.id,
                    job_type: Some(node.schema.key()),
                    dependencies: node
                        .dependencies
                        .iter()
                        .map(|d| DependencyDefinition {
                            name: d.producer.clone(),
                            connections: d
                                .connections
                                .iter()
                                .map(|c| ConnectionDefinition {
                                    output: c.output.clone(),
                                    input: c.input.clone(),
                                })
                                .collect(),
                        })
                        .collect(),
                    recipe_inputs: node
                        .recipe_inputs
                        .iter()
                        .map(|b| RecipeInputDefinition {
                            job_input: b.job_input.clone(),
                            recipe_input: b.recipe_input.clone(),
                        })
                        .collect(),
                })
                .collect(),
        }
    }
}

fn resolve_job_type(
    job: &JobDefinition,
    catalog: &dyn JobTypeCatalog,
) -> Result<Arc<JobTypeSchema>, DefinitionError> {
    match (job.job_type_id, &job.job_type) {
        (Some(id), _) => catalog
            .job_type(id)
            .ok_or_else(|| DefinitionError::UnknownJobType {
                job: job.name.clone(),
                reference: format!("id {}", id),
            }),
        (None, Some(key)) => catalog
            .job_type_by_key(&key.name, &key.version)
            .ok_or_else(|| DefinitionError::UnknownJobType {
                job: job.name.clone(),
                reference: key.to_string(),
            }),
        (None, None) => Err(DefinitionError::MissingJobType(job.name.clone())),
    }
}

fn duplicate_source(job: &JobDefinition, input: &str) -> DefinitionError {
    GraphError::DuplicateInputSource {
        job: job.name.clone(),
        input: input.to_string(),
    }
    .into()
}
