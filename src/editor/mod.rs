//! Editor session layered on top of a [`RecipeGraph`].
//!
//! The session owns the graph being edited, the current selection and the
//! [`EditorMode`]. It decides which graph operations the UI may invoke in
//! each mode, turns renderer clicks into graph mutations, and keeps at most
//! one save or validate request in flight.
//!
//! ```rust,no_run
//! use recipe_graph::prelude::*;
//! use std::sync::Arc;
//!
//! # fn main() -> Result<()> {
//! let ingest = Arc::new(JobTypeSchema::new("ingest", "1.0").with_output("file", DataKind::File));
//! let mut session = EditorSession::new("my-recipe", RecipeGraph::new());
//!
//! session.toggle_add_node()?;
//! let name = session.add_node(ingest)?;
//! assert_eq!(session.selected(), Some(name.as_str()));
//!
//! let mut gateway = FileGateway::new("recipes");
//! session.save(&mut gateway)?;
//! # Ok(())
//! # }
//! ```

mod events;
mod mode;
mod request;

pub use events::EditorOutcome;
pub use mode::{EditState, EditorMode};
pub use request::{PendingRequest, RequestKind, Ticket};

use crate::error::{EditorError, GraphError, PortDirection};
use crate::gateway::RecipeGateway;
use crate::graph::{GraphBuilder, InputSource, RecipeGraph};
use crate::recipe::{RecipeInputDeclaration, RecipeTypeDocument};
use crate::render::{NodeStatuses, RenderGraph};
use crate::schema::{JobTypeCatalog, JobTypeSchema};
use std::sync::Arc;
use tracing::{debug, info};

/// Identity of the recipe type being edited.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecipeMeta {
    pub id: Option<u64>,
    pub name: String,
    pub title: Option<String>,
    pub description: Option<String>,
}

pub struct EditorSession {
    meta: RecipeMeta,
    graph: RecipeGraph,
    mode: EditorMode,
    selected: Option<String>,
    statuses: NodeStatuses,
    /// Bumped by every successful mutation.
    revision: u64,
    saved_revision: u64,
    in_flight: Option<PendingRequest>,
    next_ticket: u64,
}

impl EditorSession {
    /// A session over a graph that has not been persisted yet.
    pub fn new(name: &str, graph: RecipeGraph) -> Self {
        Self {
            meta: RecipeMeta {
                name: name.to_string(),
                ..RecipeMeta::default()
            },
            graph,
            mode: EditorMode::View,
            selected: None,
            statuses: NodeStatuses::new(),
            revision: 0,
            saved_revision: 0,
            in_flight: None,
            next_ticket: 1,
        }
    }

    /// Loads recipe type `id` through `gateway` and opens it in view mode.
    pub fn open(
        gateway: &dyn RecipeGateway,
        catalog: &dyn JobTypeCatalog,
        id: u64,
        builder: GraphBuilder,
    ) -> Result<Self, EditorError> {
        let document = gateway.load(id)?;
        let graph = builder.load(document.definition, catalog)?;
        info!(id, name = %document.name, "opened recipe type");
        let mut session = Self::new(&document.name, graph);
        session.meta.id = document.id.or(Some(id));
        session.meta.title = document.title;
        session.meta.description = document.description;
        Ok(session)
    }

    pub fn graph(&self) -> &RecipeGraph {
        &self.graph
    }

    pub fn meta(&self) -> &RecipeMeta {
        &self.meta
    }

    pub fn mode(&self) -> &EditorMode {
        &self.mode
    }

    pub fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    /// Whether there are edits no completed save has covered.
    pub fn is_dirty(&self) -> bool {
        self.revision != self.saved_revision
    }

    /// Replaces the live status decorations. Structure is never touched.
    pub fn set_statuses(&mut self, statuses: NodeStatuses) {
        self.statuses = statuses;
    }

    /// The view for the next redraw.
    pub fn render(&self) -> RenderGraph {
        RenderGraph::decorated(&self.graph, &self.statuses, self.selected.as_deref())
    }

    /// The recipe type as it would be saved now.
    pub fn document(&self) -> RecipeTypeDocument {
        RecipeTypeDocument {
            id: self.meta.id,
            name: self.meta.name.clone(),
            title: self.meta.title.clone(),
            description: self.meta.description.clone(),
            definition: self.graph.to_definition(),
        }
    }

    /// View -> edit and back. Leaving edit mode drops any pending sub-state.
    pub fn toggle_edit(&mut self) -> Result<(), EditorError> {
        self.mode = match self.mode {
            EditorMode::View => EditorMode::Edit(EditState::Idle),
            EditorMode::Edit(_) => EditorMode::View,
            EditorMode::AddNode => return Err(self.not_permitted("toggle edit")),
        };
        debug!(mode = %self.mode, "editor mode changed");
        Ok(())
    }

    /// Enters add-node mode, or leaves it back to view mode.
    pub fn toggle_add_node(&mut self) -> Result<(), EditorError> {
        self.mode = match self.mode {
            EditorMode::AddNode => EditorMode::View,
            _ => EditorMode::AddNode,
        };
        debug!(mode = %self.mode, "editor mode changed");
        Ok(())
    }

    /// Places a job of type `schema`, renamed if its name is taken, selects
    /// it and switches to edit mode. Returns the name it got.
    pub fn add_node(&mut self, schema: Arc<JobTypeSchema>) -> Result<String, EditorError> {
        if self.mode != EditorMode::AddNode {
            return Err(self.not_permitted("add node"));
        }
        let name = self.graph.suggest_name(&schema.name);
        self.graph.add_node_named(schema, &name)?;
        self.edited();
        self.selected = Some(name.clone());
        self.mode = EditorMode::Edit(EditState::Idle);
        Ok(name)
    }

    /// Removes the selected job along with the dependencies on it.
    pub fn remove_selected(&mut self) -> Result<(), EditorError> {
        self.require_editing("remove job")?;
        let name = self.require_selected_job()?.to_string();
        self.graph.remove_node(&name)?;
        self.edited();
        self.selected = None;
        self.mode = EditorMode::Edit(EditState::Idle);
        Ok(())
    }

    /// Drops the selected job's dependency on `producer`.
    pub fn remove_dependency(&mut self, producer: &str) -> Result<bool, EditorError> {
        self.require_editing("remove dependency")?;
        let consumer = self.require_selected_job()?.to_string();
        let removed = self.graph.remove_dependency(&consumer, producer)?;
        if removed {
            self.edited();
        }
        Ok(removed)
    }

    /// Removes one source of `input` on the selected job.
    pub fn unmap_input(
        &mut self,
        input: &str,
        source: impl Into<InputSource>,
    ) -> Result<bool, EditorError> {
        self.require_editing("unmap input")?;
        let consumer = self.require_selected_job()?.to_string();
        let removed = self.graph.unmap_input(&consumer, input, source)?;
        if removed {
            self.edited();
        }
        Ok(removed)
    }

    pub fn add_recipe_input(
        &mut self,
        declaration: RecipeInputDeclaration,
    ) -> Result<Vec<String>, EditorError> {
        self.require_editing("add recipe input")?;
        let wired = self.graph.add_recipe_input(declaration)?;
        self.edited();
        Ok(wired)
    }

    pub fn remove_recipe_input(&mut self, name: &str) -> Result<(), EditorError> {
        self.require_editing("remove recipe input")?;
        self.graph.remove_recipe_input(name)?;
        self.edited();
        Ok(())
    }

    /// Toggles add-dependency mode for the selected job.
    pub fn toggle_add_dependency(&mut self) -> Result<(), EditorError> {
        let next = match self.mode {
            EditorMode::Edit(EditState::AddDependency) => EditState::Idle,
            EditorMode::Edit(EditState::Idle) => {
                self.require_selected_job()?;
                EditState::AddDependency
            }
            _ => return Err(self.not_permitted("add dependency")),
        };
        self.mode = EditorMode::Edit(next);
        Ok(())
    }

    /// Toggles add-input mode for `input` of the selected job.
    pub fn toggle_add_input(&mut self, input: &str) -> Result<(), EditorError> {
        let next = match &self.mode {
            EditorMode::Edit(EditState::AddInput { .. }) => EditState::Idle,
            EditorMode::Edit(EditState::Idle) => {
                self.require_port(input, PortDirection::Input)?;
                EditState::AddInput {
                    input: input.to_string(),
                    provider: None,
                }
            }
            _ => return Err(self.not_permitted("add input")),
        };
        self.mode = EditorMode::Edit(next);
        Ok(())
    }

    /// Toggles add-output mode for `output` of the selected job.
    pub fn toggle_add_output(&mut self, output: &str) -> Result<(), EditorError> {
        let next = match &self.mode {
            EditorMode::Edit(EditState::AddOutput { .. }) => EditState::Idle,
            EditorMode::Edit(EditState::Idle) => {
                self.require_port(output, PortDirection::Output)?;
                EditState::AddOutput {
                    output: output.to_string(),
                    receiver: None,
                }
            }
            _ => return Err(self.not_permitted("add output")),
        };
        self.mode = EditorMode::Edit(next);
        Ok(())
    }

    /// Completes add-input mode once a provider was clicked.
    ///
    /// `output` names a producer output, or a recipe input when the provider
    /// is `start`.
    pub fn choose_output(&mut self, output: &str) -> Result<(), EditorError> {
        let EditorMode::Edit(EditState::AddInput {
            input,
            provider: Some(provider),
        }) = &self.mode
        else {
            return Err(self.not_permitted("choose output"));
        };
        let (input, provider) = (input.clone(), provider.clone());
        let consumer = self.require_selected_job()?.to_string();
        if provider == "start" {
            self.graph.map_recipe_input(&consumer, &input, output)?;
        } else {
            self.graph.map_input(&consumer, &input, &provider, output)?;
        }
        self.edited();
        self.mode = EditorMode::Edit(EditState::Idle);
        Ok(())
    }

    /// Completes add-output mode once a receiver was clicked.
    pub fn choose_input(&mut self, input: &str) -> Result<(), EditorError> {
        let EditorMode::Edit(EditState::AddOutput {
            output,
            receiver: Some(receiver),
        }) = &self.mode
        else {
            return Err(self.not_permitted("choose input"));
        };
        let (output, receiver) = (output.clone(), receiver.clone());
        let producer = self.require_selected_job()?.to_string();
        self.graph.map_output(&producer, &output, &receiver, input)?;
        self.edited();
        self.mode = EditorMode::Edit(EditState::Idle);
        Ok(())
    }

    /// Abandons the current edit sub-state.
    pub fn cancel(&mut self) {
        if self.mode.is_editing() {
            self.mode = EditorMode::Edit(EditState::Idle);
        }
    }

    fn edited(&mut self) {
        self.revision += 1;
    }

    fn not_permitted(&self, operation: &'static str) -> EditorError {
        EditorError::NotPermitted {
            operation,
            mode: self.mode.to_string(),
        }
    }

    fn require_editing(&self, operation: &'static str) -> Result<(), EditorError> {
        if self.mode.is_editing() {
            Ok(())
        } else {
            Err(self.not_permitted(operation))
        }
    }

    /// The selected job; the virtual vertices don't count.
    fn require_selected_job(&self) -> Result<&str, EditorError> {
        match self.selected.as_deref() {
            Some(name) if self.graph.contains(name) => Ok(name),
            _ => Err(EditorError::NothingSelected),
        }
    }

    fn require_port(&self, port: &str, direction: PortDirection) -> Result<(), EditorError> {
        let name = self.require_selected_job()?;
        let Some(node) = self.graph.node(name) else {
            return Err(EditorError::NothingSelected);
        };
        let found = match direction {
            PortDirection::Input => node.schema().input(port).is_some(),
            PortDirection::Output => node.schema().output(port).is_some(),
        };
        if found {
            return Ok(());
        }
        Err(GraphError::InvalidPort {
            job: name.to_string(),
            job_type: node.schema().name.clone(),
            direction,
            port: port.to_string(),
        }
        .into())
    }
}
