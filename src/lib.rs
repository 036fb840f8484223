//! # recipe-graph - Recipe Dependency Graph Model
//!
//! **recipe-graph** models the jobs of a batch-processing recipe as a
//! directed acyclic graph. It owns the job nodes, the dependency edges
//! between them, the input/output connections those edges carry and the
//! recipe-level inputs, and it enforces the structural rules (unique names,
//! no cycles, valid ports, one source per input) on every edit.
//!
//! ## Core Workflow
//!
//! 1.  **Load the Catalog**: Put the available job types behind a `JobTypeCatalog`. The in-memory `Catalog` reads them from JSON.
//! 2.  **Build a Graph**: Load a serialized `RecipeTypeDefinition` with `RecipeGraph::from_definition`, or start from `RecipeGraph::new()`. Anything implementing `IntoRecipeDefinition` can be loaded.
//! 3.  **Edit**: Mutate the graph directly, or through an `EditorSession` that gates operations by editor mode and turns renderer clicks into edits.
//! 4.  **Validate and Save**: Run `validate` for non-fatal warnings, then serialize back with `to_definition` or save through a `RecipeGateway`.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use recipe_graph::prelude::*;
//!
//! fn main() -> Result<()> {
//!     let catalog = Catalog::new(vec![
//!         JobTypeSchema::new("ingest", "1.0")
//!             .with_id(1)
//!             .with_input("input_file", DataKind::File, true)
//!             .with_output("file", DataKind::File),
//!         JobTypeSchema::new("transform", "1.0")
//!             .with_id(2)
//!             .with_input("file", DataKind::File, true)
//!             .with_output("result", DataKind::File),
//!     ])?;
//!
//!     let definition = r#"{
//!         "input_data": [{"name": "input_file", "type": "file"}],
//!         "jobs": [
//!             {"name": "ingest", "job_type_id": 1,
//!              "recipe_inputs": [{"job_input": "input_file", "recipe_input": "input_file"}]},
//!             {"name": "transform", "job_type_id": 2}
//!         ]
//!     }"#;
//!     let mut graph = RecipeGraph::from_definition(definition, &catalog)?;
//!
//!     // Creates the ingest -> transform dependency on the way.
//!     graph.map_input("transform", "file", "ingest", "file")?;
//!     assert!(!graph.is_start_fed("transform"));
//!
//!     for warning in validate(&graph).warnings {
//!         println!("{}", warning);
//!     }
//!     println!("{}", visualize(&graph));
//!     println!("{}", graph.to_definition().to_json_pretty()?);
//!     Ok(())
//! }
//! ```

pub mod editor;
pub mod error;
pub mod gateway;
pub mod graph;
pub mod prelude;
pub mod recipe;
pub mod render;
pub mod schema;
pub mod validate;
