use super::definition::{RecipeTypeDefinition, RecipeTypeDocument};
use crate::error::DefinitionError;

/// A trait for payloads that can be turned into a `RecipeTypeDefinition`.
///
/// This is the seam for feeding the graph from other sources: a REST
/// response that was already parsed into JSON, a stored recipe type
/// document, or your own configuration structs.
///
/// # Example
///
/// ```rust,no_run
/// use recipe_graph::error::DefinitionError;
/// use recipe_graph::recipe::{IntoRecipeDefinition, JobDefinition, RecipeTypeDefinition};
///
/// struct Pipeline { steps: Vec<(String, u64)> }
///
/// impl IntoRecipeDefinition for Pipeline {
///     fn into_definition(self) -> Result<RecipeTypeDefinition, DefinitionError> {
///         let jobs = self
///             .steps
///             .into_iter()
///             .map(|(name, job_type_id)| JobDefinition {
///                 name,
///                 job_type_id: Some(job_type_id),
///                 job_type: None,
///                 dependencies: vec![],
///                 recipe_inputs: vec![],
///             })
///             .collect();
///         Ok(RecipeTypeDefinition { jobs, ..Default::default() })
///     }
/// }
/// ```
pub trait IntoRecipeDefinition {
    fn into_definition(self) -> Result<RecipeTypeDefinition, DefinitionError>;
}

impl IntoRecipeDefinition for RecipeTypeDefinition {
    fn into_definition(self) -> Result<RecipeTypeDefinition, DefinitionError> {
        Ok(self)
    }
}

impl IntoRecipeDefinition for RecipeTypeDocument {
    fn into_definition(self) -> Result<RecipeTypeDefinition, DefinitionError> {
        Ok(self.definition)
    }
}

/// Accepts either a bare definition or a recipe type document carrying one
/// under `definition`.
impl IntoRecipeDefinition for serde_json::Value {
    fn into_definition(self) -> Result<RecipeTypeDefinition, DefinitionError> {
        let value = match self {
            serde_json::Value::Object(mut map) if map.contains_key("definition") => map
                .remove("definition")
                .unwrap_or(serde_json::Value::Null),
            other => other,
        };
        serde_json::from_value(value).map_err(|e| DefinitionError::JsonParseError(e.to_string()))
    }
}

impl IntoRecipeDefinition for &str {
    fn into_definition(self) -> Result<RecipeTypeDefinition, DefinitionError> {
        let value: serde_json::Value =
            serde_json::from_str(self).map_err(|e| DefinitionError::JsonParseError(e.to_string()))?;
        value.into_definition()
    }
}
