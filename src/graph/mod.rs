//! The recipe dependency graph.
//!
//! [`RecipeGraph`] owns the jobs of a recipe, their dependency edges and the
//! recipe-level input declarations. Every mutation is all-or-nothing: it
//! validates first and only then touches state, so a returned
//! [`GraphError`] always leaves the graph as it was.
//!
//! Jobs live in a node table indexed by position, with a name lookup and a
//! consumer adjacency index (producer -> jobs depending on it) rebuilt or
//! patched on every structural change. The virtual `start` and `end`
//! vertices are derived from that index rather than stored.

use crate::error::{GraphError, PortDirection};
use crate::recipe::RecipeInputDeclaration;
use crate::recipe::definition::DEFAULT_VERSION;
use ahash::AHashMap;
use serde::{Deserialize, Serialize};

mod convert;
mod mutate;
pub mod node;
mod query;
mod topology;

pub use node::*;
pub use query::{Dependent, InputMapping, InputSources, Vertex};

/// Names that identify virtual vertices or sentinels and can't name a job.
pub const RESERVED_NAMES: [&str; 3] = ["start", "end", InputSource::RECIPE];

/// Policy applied when the first recipe input is declared.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum AutoWire {
    /// Leave every job input unbound.
    Disabled,
    /// Bind the first recipe input to a compatible input of every job hanging
    /// directly off start.
    #[default]
    FirstRecipeInput,
}

/// Tunable behaviour of a graph.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(default)]
pub struct GraphConfig {
    pub auto_wire: AutoWire,
}

impl GraphConfig {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

/// Builds a [`RecipeGraph`], either empty or from a serialized definition.
#[derive(Debug, Default)]
pub struct GraphBuilder {
    config: GraphConfig,
    version: Option<String>,
}

impl GraphBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(mut self, config: GraphConfig) -> Self {
        self.config = config;
        self
    }

    pub fn auto_wire(mut self, policy: AutoWire) -> Self {
        self.config.auto_wire = policy;
        self
    }

    pub fn version(mut self, version: &str) -> Self {
        self.version = Some(version.to_string());
        self
    }

    /// An empty graph for a new recipe.
    pub fn build(self) -> RecipeGraph {
        RecipeGraph {
            version: self.version.unwrap_or_else(|| DEFAULT_VERSION.to_string()),
            nodes: Vec::new(),
            recipe_inputs: Vec::new(),
            index: AHashMap::new(),
            consumers: Vec::new(),
            config: self.config,
        }
    }
}

/// A recipe's jobs, their dependencies and its recipe-level inputs.
#[derive(Debug, Clone)]
pub struct RecipeGraph {
    pub(crate) version: String,
    pub(crate) nodes: Vec<JobNode>,
    pub(crate) recipe_inputs: Vec<RecipeInputDeclaration>,
    pub(crate) index: AHashMap<String, NodeId>,
    /// `consumers[p]` lists the jobs holding a dependency on job `p`.
    pub(crate) consumers: Vec<Vec<NodeId>>,
    pub(crate) config: GraphConfig,
}

impl Default for RecipeGraph {
    fn default() -> Self {
        Self::new()
    }
}

impl RecipeGraph {
    pub fn builder() -> GraphBuilder {
        GraphBuilder::new()
    }

    pub fn new() -> Self {
        GraphBuilder::new().build()
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn config(&self) -> &GraphConfig {
        &self.config
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn node(&self, name: &str) -> Option<&JobNode> {
        self.index.get(name).map(|id| &self.nodes[id.0])
    }

    /// Jobs in insertion order.
    pub fn nodes(&self) -> impl Iterator<Item = &JobNode> {
        self.nodes.iter()
    }

    pub fn recipe_inputs(&self) -> &[RecipeInputDeclaration] {
        &self.recipe_inputs
    }

    pub fn recipe_input(&self, name: &str) -> Option<&RecipeInputDeclaration> {
        self.recipe_inputs.iter().find(|i| i.name == name)
    }

    /// Returns `base` if no job uses it, otherwise the first free `base-N`.
    pub fn suggest_name(&self, base: &str) -> String {
        if !self.contains(base) && !RESERVED_NAMES.contains(&base) {
            return base.to_string();
        }
        (2..)
            .map(|n| format!("{}-{}", base, n))
            .find(|candidate| !self.contains(candidate))
            .unwrap_or_else(|| base.to_string())
    }

    pub(crate) fn id_of(&self, name: &str) -> Result<NodeId, GraphError> {
        self.index
            .get(name)
            .copied()
            .ok_or_else(|| GraphError::UnknownNode(name.to_string()))
    }

    pub(crate) fn require_input(&self, id: NodeId, input: &str) -> Result<(), GraphError> {
        let node = &self.nodes[id.0];
        match node.schema.input(input) {
            Some(_) => Ok(()),
            None => Err(GraphError::InvalidPort {
                job: node.name.clone(),
                job_type: node.schema.name.clone(),
                direction: PortDirection::Input,
                port: input.to_string(),
            }),
        }
    }

    pub(crate) fn require_output(&self, id: NodeId, output: &str) -> Result<(), GraphError> {
        let node = &self.nodes[id.0];
        match node.schema.output(output) {
            Some(_) => Ok(()),
            None => Err(GraphError::InvalidPort {
                job: node.name.clone(),
                job_type: node.schema.name.clone(),
                direction: PortDirection::Output,
                port: output.to_string(),
            }),
        }
    }

    pub(crate) fn check_new_name(&self, name: &str) -> Result<(), GraphError> {
        if RESERVED_NAMES.contains(&name) {
            return Err(GraphError::ReservedName(name.to_string()));
        }
        if self.contains(name) {
            return Err(GraphError::DuplicateName(name.to_string()));
        }
        Ok(())
    }

    /// Rebuilds the name lookup and the consumer index from the node table.
    pub(crate) fn reindex(&mut self) {
        self.index = self
            .nodes
            .iter()
            .enumerate()
            .map(|(i, n)| (n.name.clone(), NodeId(i)))
            .collect();
        self.consumers = vec![Vec::new(); self.nodes.len()];
        for (i, node) in self.nodes.iter().enumerate() {
            for dependency in &node.dependencies {
                if let Some(producer) = self.index.get(&dependency.producer) {
                    self.consumers[producer.0].push(NodeId(i));
                }
            }
        }
    }
}
