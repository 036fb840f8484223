//! Prelude module for convenient imports
//!
//! Re-exports the types most callers need to load, edit, validate and save
//! a recipe graph.
//!
//! # Example
//!
//! ```rust,no_run
//! use recipe_graph::prelude::*;
//!
//! # fn run_example() -> Result<()> {
//! let catalog = Catalog::from_json(&std::fs::read_to_string("path/to/job_types.json")?)?;
//! let definition = std::fs::read_to_string("path/to/recipe.json")?;
//!
//! let graph = RecipeGraph::from_definition(definition.as_str(), &catalog)?;
//! println!("{:?}", graph.topological_order()?);
//! # Ok(())
//! # }
//! ```

// Graph model
pub use crate::graph::{
    AutoWire, GraphBuilder, GraphConfig, InputSource, JobNode, RecipeGraph, StartLink, Vertex,
};

// Job types and the wire format
pub use crate::recipe::{IntoRecipeDefinition, RecipeInputDeclaration, RecipeTypeDefinition, RecipeTypeDocument};
pub use crate::schema::{Catalog, DataKind, JobTypeCatalog, JobTypeSchema};

// Validation and rendering
pub use crate::render::{RenderEvent, RenderGraph, visualize};
pub use crate::validate::{ValidationReport, ValidationWarning, WarningKind, validate};

// Editing and persistence
pub use crate::editor::{EditorMode, EditorSession};
pub use crate::gateway::{FileGateway, RecipeGateway};

// Error types
pub use crate::error::{CatalogError, DefinitionError, EditorError, GatewayError, GraphError};

// Result type alias for convenience
pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;
