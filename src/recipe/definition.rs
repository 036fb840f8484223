use crate::error::DefinitionError;
use crate::schema::{DataKind, JobTypeKey, job_type::default_required};
use itertools::Itertools;
use serde::{Deserialize, Serialize};

pub const DEFAULT_VERSION: &str = "1.0";

fn default_version() -> String {
    DEFAULT_VERSION.to_string()
}

/// The serialized form of a recipe type, as exchanged with the persistence gateway.
///
/// Missing optional sections deserialize to their defaults, so a bare
/// `{"jobs": []}` is a valid empty definition.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct RecipeTypeDefinition {
    #[serde(default = "default_version")]
    pub version: String,
    #[serde(default)]
    pub input_data: Vec<RecipeInputDeclaration>,
    #[serde(default)]
    pub jobs: Vec<JobDefinition>,
}

impl Default for RecipeTypeDefinition {
    fn default() -> Self {
        Self {
            version: default_version(),
            input_data: Vec::new(),
            jobs: Vec::new(),
        }
    }
}

/// A named input exposed at the recipe level.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct RecipeInputDeclaration {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: DataKind,
    #[serde(default = "default_required")]
    pub required: bool,
    /// Accepted media types for `file`/`files` inputs.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub media_types: Vec<String>,
}

impl RecipeInputDeclaration {
    pub fn new(name: &str, kind: DataKind, required: bool) -> Self {
        Self {
            name: name.to_string(),
            kind,
            required,
            media_types: Vec::new(),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct JobDefinition {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub job_type_id: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub job_type: Option<JobTypeKey>,
    #[serde(default)]
    pub dependencies: Vec<DependencyDefinition>,
    #[serde(default)]
    pub recipe_inputs: Vec<RecipeInputDefinition>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct DependencyDefinition {
    pub name: String,
    #[serde(default)]
    pub connections: Vec<ConnectionDefinition>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct ConnectionDefinition {
    pub output: String,
    pub input: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct RecipeInputDefinition {
    pub job_input: String,
    pub recipe_input: String,
}

/// A stored recipe type: identity and metadata wrapped around its definition.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct RecipeTypeDocument {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub definition: RecipeTypeDefinition,
}

/// Order-insensitive view of one job, used for structural comparison.
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord)]
struct CanonicalJob<'a> {
    name: &'a str,
    dependencies: Vec<(&'a str, Vec<&'a ConnectionDefinition>)>,
    recipe_inputs: Vec<&'a RecipeInputDefinition>,
}

impl RecipeTypeDefinition {
    pub fn from_json(json: &str) -> Result<Self, DefinitionError> {
        serde_json::from_str(json).map_err(|e| DefinitionError::JsonParseError(e.to_string()))
    }

    pub fn to_json_pretty(&self) -> Result<String, DefinitionError> {
        serde_json::to_string_pretty(self).map_err(|e| DefinitionError::JsonParseError(e.to_string()))
    }

    pub fn job(&self, name: &str) -> Option<&JobDefinition> {
        self.jobs.iter().find(|j| j.name == name)
    }

    /// Compares two definitions ignoring the order of independent lists.
    ///
    /// Jobs, dependencies, connections, recipe input declarations and
    /// recipe input bindings are compared as sets. Job type references are
    /// not compared, since the same job type can be referenced by id or by
    /// name and version.
    pub fn is_structurally_equal(&self, other: &Self) -> bool {
        self.version == other.version
            && self.canonical_inputs() == other.canonical_inputs()
            && self.canonical_jobs() == other.canonical_jobs()
    }

    fn canonical_inputs(&self) -> Vec<(&str, DataKind, bool, Vec<&String>)> {
        self.input_data
            .iter()
            .map(|i| {
                (
                    i.name.as_str(),
                    i.kind,
                    i.required,
                    i.media_types.iter().sorted().collect_vec(),
                )
            })
            .sorted()
            .collect_vec()
    }

    fn canonical_jobs(&self) -> Vec<CanonicalJob<'_>> {
        self.jobs
            .iter()
            .map(|job| CanonicalJob {
                name: &job.name,
                dependencies: job
                    .dependencies
                    .iter()
                    .map(|dep| (dep.name.as_str(), dep.connections.iter().sorted().collect_vec()))
                    .sorted()
                    .collect_vec(),
                recipe_inputs: job.recipe_inputs.iter().sorted().collect_vec(),
            })
            .sorted()
            .collect_vec()
    }
}
