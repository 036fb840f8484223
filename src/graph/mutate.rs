use super::{AutoWire, RecipeGraph};
use super::node::{
    Connection, Dependency, InputSource, JobNode, NodeId, RecipeInputBinding, StartLink,
};
use crate::error::GraphError;
use crate::recipe::RecipeInputDeclaration;
use crate::schema::{DataKind, InputDescriptor, JobTypeSchema};
use std::sync::Arc;
use tracing::{debug, warn};

impl RecipeGraph {
    /// Adds a job named after its job type.
    pub fn add_node(&mut self, schema: Arc<JobTypeSchema>) -> Result<&JobNode, GraphError> {
        let name = schema.name.clone();
        self.add_node_named(schema, &name)
    }

    /// Adds a job under an explicit name, for when the job type name is taken.
    pub fn add_node_named(
        &mut self,
        schema: Arc<JobTypeSchema>,
        name: &str,
    ) -> Result<&JobNode, GraphError> {
        self.check_new_name(name)?;

        let id = NodeId(self.nodes.len());
        self.nodes.push(JobNode::new(name, schema));
        self.index.insert(name.to_string(), id);
        self.consumers.push(Vec::new());
        debug!(job = name, "added job");
        Ok(&self.nodes[id.0])
    }

    /// Removes a job along with every dependency other jobs hold on it.
    ///
    /// Inputs that were fed by the removed job are left unbound.
    pub fn remove_node(&mut self, name: &str) -> Result<JobNode, GraphError> {
        let id = self.id_of(name)?;
        let removed = self.nodes.remove(id.0);
        for node in &mut self.nodes {
            node.dependencies.retain(|d| d.producer != name);
        }
        self.reindex();
        debug!(job = name, "removed job");
        Ok(removed)
    }

    /// Makes `consumer` depend on `producer`.
    ///
    /// Returns `false` when the dependency already existed.
    pub fn add_dependency(&mut self, consumer: &str, producer: &str) -> Result<bool, GraphError> {
        let consumer_id = self.id_of(consumer)?;
        let producer_id = self.id_of(producer)?;
        if self.nodes[consumer_id.0].dependency(producer).is_some() {
            return Ok(false);
        }
        self.check_new_edge(consumer_id, producer_id)?;

        self.nodes[consumer_id.0]
            .dependencies
            .push(Dependency::new(producer));
        self.consumers[producer_id.0].push(consumer_id);
        debug!(consumer, producer, "added dependency");
        Ok(true)
    }

    /// Drops the dependency of `consumer` on `producer` and all its connections.
    ///
    /// Returns `false` when there was no such dependency.
    pub fn remove_dependency(&mut self, consumer: &str, producer: &str) -> Result<bool, GraphError> {
        let consumer_id = self.id_of(consumer)?;
        let producer_id = self.id_of(producer)?;

        let node = &mut self.nodes[consumer_id.0];
        let before = node.dependencies.len();
        node.dependencies.retain(|d| d.producer != producer);
        if node.dependencies.len() == before {
            return Ok(false);
        }
        self.consumers[producer_id.0].retain(|&c| c != consumer_id);
        debug!(consumer, producer, "removed dependency");
        Ok(true)
    }

    /// Feeds `consumer_input` from `producer_output`.
    ///
    /// Creates the dependency when it is missing and replaces whatever source
    /// the input had before.
    pub fn map_input(
        &mut self,
        consumer: &str,
        consumer_input: &str,
        producer: &str,
        producer_output: &str,
    ) -> Result<(), GraphError> {
        let consumer_id = self.id_of(consumer)?;
        let producer_id = self.id_of(producer)?;
        self.require_input(consumer_id, consumer_input)?;
        self.require_output(producer_id, producer_output)?;
        let is_new_edge = self.nodes[consumer_id.0].dependency(producer).is_none();
        if is_new_edge {
            self.check_new_edge(consumer_id, producer_id)?;
        }

        let node = &mut self.nodes[consumer_id.0];
        node.detach_input(consumer_input);
        if is_new_edge {
            node.dependencies.push(Dependency::new(producer));
        }
        let connection = Connection {
            output: producer_output.to_string(),
            input: consumer_input.to_string(),
        };
        if let Some(dependency) = node.dependency_mut(producer) {
            dependency.connections.push(connection);
        }
        if is_new_edge {
            self.consumers[producer_id.0].push(consumer_id);
        }
        debug!(
            consumer,
            input = consumer_input,
            producer,
            output = producer_output,
            "mapped input"
        );
        Ok(())
    }

    /// The output-side form of [`RecipeGraph::map_input`].
    pub fn map_output(
        &mut self,
        producer: &str,
        producer_output: &str,
        consumer: &str,
        consumer_input: &str,
    ) -> Result<(), GraphError> {
        self.map_input(consumer, consumer_input, producer, producer_output)
    }

    /// Feeds `consumer_input` from a declared recipe input, replacing any previous source.
    pub fn map_recipe_input(
        &mut self,
        consumer: &str,
        consumer_input: &str,
        recipe_input: &str,
    ) -> Result<(), GraphError> {
        let consumer_id = self.id_of(consumer)?;
        if self.recipe_input(recipe_input).is_none() {
            return Err(GraphError::UnknownRecipeInput(recipe_input.to_string()));
        }
        self.require_input(consumer_id, consumer_input)?;

        let node = &mut self.nodes[consumer_id.0];
        node.detach_input(consumer_input);
        node.recipe_inputs.push(RecipeInputBinding {
            job_input: consumer_input.to_string(),
            recipe_input: recipe_input.to_string(),
        });
        debug!(consumer, input = consumer_input, recipe_input, "mapped recipe input");
        Ok(())
    }

    /// Removes the source of `input` on `consumer` that comes from `source`.
    ///
    /// `source` is either a producer job name or the `"recipe"` sentinel.
    /// The dependency edge itself is kept. Returns `false` when nothing matched.
    pub fn unmap_input(
        &mut self,
        consumer: &str,
        input: &str,
        source: impl Into<InputSource>,
    ) -> Result<bool, GraphError> {
        let consumer_id = self.id_of(consumer)?;
        let source = source.into();
        if let InputSource::Job(producer) = &source {
            self.id_of(producer)?;
        }

        let node = &mut self.nodes[consumer_id.0];
        let removed = match &source {
            InputSource::Recipe => {
                let before = node.recipe_inputs.len();
                node.recipe_inputs.retain(|b| b.job_input != input);
                before - node.recipe_inputs.len()
            }
            InputSource::Job(producer) => match node.dependency_mut(producer) {
                Some(dependency) => {
                    let before = dependency.connections.len();
                    dependency.connections.retain(|c| c.input != input);
                    before - dependency.connections.len()
                }
                None => 0,
            },
        };
        if removed > 0 {
            debug!(consumer, input, source = %source, "unmapped input");
        }
        Ok(removed > 0)
    }

    /// Declares a recipe input.
    ///
    /// When this is the first recipe input in use and the graph's
    /// [`AutoWire`] policy allows it, the input is also bound to a compatible
    /// input of every job hanging directly off start. Returns the names of
    /// the jobs that were wired this way.
    pub fn add_recipe_input(
        &mut self,
        declaration: RecipeInputDeclaration,
    ) -> Result<Vec<String>, GraphError> {
        if self.recipe_input(&declaration.name).is_some() {
            return Err(GraphError::DuplicateRecipeInput(declaration.name));
        }
        let first_in_use = self.nodes.iter().all(|n| n.recipe_inputs.is_empty());

        let mut wired = Vec::new();
        if first_in_use && self.config.auto_wire == AutoWire::FirstRecipeInput {
            for node in &mut self.nodes {
                if node.start_link() != StartLink::Implicit {
                    continue;
                }
                if let Some(input) = auto_wire_target(&node.schema.input_data, &declaration) {
                    node.recipe_inputs.push(RecipeInputBinding {
                        job_input: input.to_string(),
                        recipe_input: declaration.name.clone(),
                    });
                    wired.push(node.name.clone());
                }
            }
        }
        debug!(recipe_input = %declaration.name, wired = wired.len(), "added recipe input");
        self.recipe_inputs.push(declaration);
        Ok(wired)
    }

    /// Removes a recipe input declaration and every binding that used it.
    pub fn remove_recipe_input(&mut self, name: &str) -> Result<RecipeInputDeclaration, GraphError> {
        let position = self
            .recipe_inputs
            .iter()
            .position(|i| i.name == name)
            .ok_or_else(|| GraphError::UnknownRecipeInput(name.to_string()))?;
        let removed = self.recipe_inputs.remove(position);
        for node in &mut self.nodes {
            node.recipe_inputs.retain(|b| b.recipe_input != name);
        }
        debug!(recipe_input = name, "removed recipe input");
        Ok(removed)
    }

    /// Fails if an edge `producer -> consumer` would close a cycle.
    pub(crate) fn check_new_edge(&self, consumer: NodeId, producer: NodeId) -> Result<(), GraphError> {
        if let Some(mut path) = self.downstream_path(consumer, producer) {
            path.push(self.nodes[consumer.0].name.clone());
            warn!(path = ?path, "rejected dependency");
            return Err(GraphError::Cycle { path });
        }
        Ok(())
    }
}

/// Picks the job input a new recipe input should be auto-wired to: an input
/// with the same name if its kind fits, else the first input whose kind fits.
fn auto_wire_target<'a>(
    inputs: &'a [InputDescriptor],
    declaration: &RecipeInputDeclaration,
) -> Option<&'a str> {
    let fits = |input: &InputDescriptor| match (declaration.kind, input.kind) {
        (DataKind::Property, DataKind::Property) => true,
        (DataKind::File, DataKind::File | DataKind::Files) => true,
        (DataKind::Files, DataKind::Files) => true,
        _ => false,
    };
    inputs
        .iter()
        .find(|i| i.name == declaration.name && fits(i))
        .or_else(|| inputs.iter().find(|i| fits(i)))
        .map(|i| i.name.as_str())
}
