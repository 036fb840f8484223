use super::{EditState, EditorMode, EditorSession};
use crate::error::{EditorError, GraphError};
use crate::graph::Vertex;
use crate::render::{Gesture, RenderEvent};
use tracing::debug;

/// What a renderer click did to the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditorOutcome {
    Selected(String),
    Deselected,
    /// A double click; the caller shows the job's details.
    Activated(String),
    DependencyAdded { consumer: String, producer: String },
    ProviderChosen(String),
    ReceiverChosen(String),
    /// The click had no meaning in the current mode.
    Ignored,
}

impl EditorSession {
    /// Routes a renderer click through the current mode.
    ///
    /// Clicking the selected job deselects it and drops any pending edit
    /// sub-state. Clicking another vertex either completes the pending edit
    /// step or moves the selection.
    pub fn handle_event(&mut self, event: &RenderEvent) -> Result<EditorOutcome, EditorError> {
        let vertex = event.vertex();
        match vertex {
            Vertex::End => return Ok(EditorOutcome::Ignored),
            Vertex::Job(name) if !self.graph.contains(name) => {
                return Err(GraphError::UnknownNode(name.to_string()).into());
            }
            _ => {}
        }
        let clicked = vertex.id().to_string();

        if event.gesture == Gesture::Activate {
            self.selected = Some(clicked.clone());
            return Ok(EditorOutcome::Activated(clicked));
        }

        if self.selected.as_deref() == Some(clicked.as_str()) {
            self.selected = None;
            self.cancel();
            return Ok(EditorOutcome::Deselected);
        }

        let outcome = match self.mode {
            EditorMode::Edit(EditState::AddDependency) => {
                if vertex == Vertex::Start {
                    return Ok(EditorOutcome::Ignored);
                }
                let consumer = self.require_selected_job()?.to_string();
                let added = self.graph.add_dependency(&consumer, &clicked)?;
                self.mode = EditorMode::Edit(EditState::Idle);
                if !added {
                    EditorOutcome::Ignored
                } else {
                    self.edited();
                    EditorOutcome::DependencyAdded {
                        consumer,
                        producer: clicked,
                    }
                }
            }
            EditorMode::Edit(EditState::AddInput { ref mut provider, .. }) => {
                *provider = Some(clicked.clone());
                EditorOutcome::ProviderChosen(clicked)
            }
            EditorMode::Edit(EditState::AddOutput { ref mut receiver, .. }) => {
                if vertex == Vertex::Start {
                    return Ok(EditorOutcome::Ignored);
                }
                *receiver = Some(clicked.clone());
                EditorOutcome::ReceiverChosen(clicked)
            }
            _ => {
                self.selected = Some(clicked.clone());
                EditorOutcome::Selected(clicked)
            }
        };
        debug!(node = %event.node, outcome = ?outcome, "handled render event");
        Ok(outcome)
    }
}
