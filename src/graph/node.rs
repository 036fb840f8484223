use crate::schema::JobTypeSchema;
use std::fmt;
use std::sync::Arc;

/// Position of a job in the graph's node table.
///
/// Ids are only stable until the next node removal, so they never leave
/// the graph module.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub(crate) struct NodeId(pub(crate) usize);

/// Maps one producer output to one consumer input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Connection {
    pub output: String,
    pub input: String,
}

/// An incoming edge on a job: the producer it waits on and the data it takes from it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dependency {
    pub producer: String,
    pub connections: Vec<Connection>,
}

impl Dependency {
    pub(crate) fn new(producer: &str) -> Self {
        Self {
            producer: producer.to_string(),
            connections: Vec::new(),
        }
    }
}

/// Feeds a job input from a recipe-level input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecipeInputBinding {
    pub job_input: String,
    pub recipe_input: String,
}

/// How a job hangs off the virtual start vertex.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartLink {
    /// No dependencies and no recipe input bindings.
    Implicit,
    /// No dependencies, but fed by at least one recipe input.
    RecipeInputs,
    /// Fed by at least one other job.
    Dependencies,
}

/// Where the data for a job input comes from.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum InputSource {
    Recipe,
    Job(String),
}

impl InputSource {
    /// Textual sentinel used for recipe-level sources.
    pub const RECIPE: &'static str = "recipe";

    pub fn name(&self) -> &str {
        match self {
            InputSource::Recipe => Self::RECIPE,
            InputSource::Job(name) => name,
        }
    }
}

impl From<&str> for InputSource {
    fn from(value: &str) -> Self {
        if value == Self::RECIPE {
            InputSource::Recipe
        } else {
            InputSource::Job(value.to_string())
        }
    }
}

impl fmt::Display for InputSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One job instance within a recipe.
#[derive(Debug, Clone)]
pub struct JobNode {
    pub(crate) name: String,
    pub(crate) schema: Arc<JobTypeSchema>,
    pub(crate) dependencies: Vec<Dependency>,
    pub(crate) recipe_inputs: Vec<RecipeInputBinding>,
}

impl JobNode {
    pub(crate) fn new(name: &str, schema: Arc<JobTypeSchema>) -> Self {
        Self {
            name: name.to_string(),
            schema,
            dependencies: Vec::new(),
            recipe_inputs: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn schema(&self) -> &Arc<JobTypeSchema> {
        &self.schema
    }

    pub fn dependencies(&self) -> &[Dependency] {
        &self.dependencies
    }

    pub fn recipe_inputs(&self) -> &[RecipeInputBinding] {
        &self.recipe_inputs
    }

    pub fn dependency(&self, producer: &str) -> Option<&Dependency> {
        self.dependencies.iter().find(|d| d.producer == producer)
    }

    pub(crate) fn dependency_mut(&mut self, producer: &str) -> Option<&mut Dependency> {
        self.dependencies.iter_mut().find(|d| d.producer == producer)
    }

    pub fn start_link(&self) -> StartLink {
        match (self.dependencies.is_empty(), self.recipe_inputs.is_empty()) {
            (false, _) => StartLink::Dependencies,
            (true, true) => StartLink::Implicit,
            (true, false) => StartLink::RecipeInputs,
        }
    }

    /// True when the job has no source at all and hangs directly off start.
    pub fn is_start_fed(&self) -> bool {
        self.start_link() == StartLink::Implicit
    }

    /// Whether any connection or binding currently targets `input`.
    pub fn is_input_bound(&self, input: &str) -> bool {
        self.recipe_inputs.iter().any(|b| b.job_input == input)
            || self
                .dependencies
                .iter()
                .flat_map(|d| &d.connections)
                .any(|c| c.input == input)
    }

    /// Drops every connection and binding that targets `input`.
    pub(crate) fn detach_input(&mut self, input: &str) {
        for dependency in &mut self.dependencies {
            dependency.connections.retain(|c| c.input != input);
        }
        self.recipe_inputs.retain(|b| b.job_input != input);
    }
}
