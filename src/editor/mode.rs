use std::fmt;

/// Sub-state of [`EditorMode::Edit`].
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum EditState {
    #[default]
    Idle,
    /// The next job clicked becomes a producer of the selected job.
    AddDependency,
    /// Feeding `input` of the selected job. The clicked provider is held
    /// until an output (or recipe input, for `start`) is chosen.
    AddInput {
        input: String,
        provider: Option<String>,
    },
    /// Routing `output` of the selected job. The clicked receiver is held
    /// until one of its inputs is chosen.
    AddOutput {
        output: String,
        receiver: Option<String>,
    },
}

/// Editor mode. The graph itself is mode-agnostic; the session checks the
/// mode before forwarding an operation.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum EditorMode {
    #[default]
    View,
    AddNode,
    Edit(EditState),
}

impl EditorMode {
    pub fn is_editing(&self) -> bool {
        matches!(self, EditorMode::Edit(_))
    }

    pub fn edit_state(&self) -> Option<&EditState> {
        match self {
            EditorMode::Edit(state) => Some(state),
            _ => None,
        }
    }
}

impl fmt::Display for EditorMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EditorMode::View => write!(f, "view"),
            EditorMode::AddNode => write!(f, "add-node"),
            EditorMode::Edit(EditState::Idle) => write!(f, "edit"),
            EditorMode::Edit(EditState::AddDependency) => write!(f, "add-dependency"),
            EditorMode::Edit(EditState::AddInput { .. }) => write!(f, "add-input"),
            EditorMode::Edit(EditState::AddOutput { .. }) => write!(f, "add-output"),
        }
    }
}
