use thiserror::Error;

/// Structural violations raised by graph mutations.
///
/// A mutation that returns one of these leaves the graph exactly as it was.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GraphError {
    #[error("A job named '{0}' already exists in the recipe")]
    DuplicateName(String),

    #[error("'{0}' is reserved and cannot be used as a job name")]
    ReservedName(String),

    #[error("Job '{0}' not found in the recipe")]
    UnknownNode(String),

    #[error("Dependency cycle: {}", path.join(" -> "))]
    Cycle { path: Vec<String> },

    #[error("Job '{job}' (job type '{job_type}') has no {direction} named '{port}'")]
    InvalidPort {
        job: String,
        job_type: String,
        direction: PortDirection,
        port: String,
    },

    #[error("Recipe input '{0}' is not declared")]
    UnknownRecipeInput(String),

    #[error("A recipe input named '{0}' is already declared")]
    DuplicateRecipeInput(String),

    #[error("Job '{job}' has more than one source for input '{input}'")]
    DuplicateInputSource { job: String, input: String },
}

/// Which side of a job type a port name was looked up on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PortDirection {
    Input,
    Output,
}

impl std::fmt::Display for PortDirection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PortDirection::Input => write!(f, "input"),
            PortDirection::Output => write!(f, "output"),
        }
    }
}

/// Errors that can occur while turning a serialized definition into a graph.
#[derive(Error, Debug, Clone)]
pub enum DefinitionError {
    #[error("Failed to parse recipe definition JSON: {0}")]
    JsonParseError(String),

    #[error("Job '{job}' references unknown job type {reference}")]
    UnknownJobType { job: String, reference: String },

    #[error("Job '{0}' has no job type declaration")]
    MissingJobType(String),

    #[error("Invalid recipe definition: {0}")]
    Graph(#[from] GraphError),
}

/// Errors raised by a persistence gateway.
#[derive(Error, Debug)]
pub enum GatewayError {
    #[error("Recipe type {0} not found")]
    NotFound(u64),

    #[error("I/O error at '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Definition was rejected: {0}")]
    Rejected(String),
}

/// Errors raised by the editor session on top of the graph.
#[derive(Error, Debug)]
pub enum EditorError {
    #[error("'{operation}' is not permitted in {mode} mode")]
    NotPermitted {
        operation: &'static str,
        mode: String,
    },

    #[error("No job is selected")]
    NothingSelected,

    #[error("A save or validate request is already in flight")]
    RequestInFlight,

    #[error(transparent)]
    Graph(#[from] GraphError),

    #[error(transparent)]
    Definition(#[from] DefinitionError),

    #[error(transparent)]
    Gateway(#[from] GatewayError),
}

/// Errors that can occur while loading a job type catalog.
#[derive(Error, Debug, Clone)]
pub enum CatalogError {
    #[error("Failed to parse job type catalog JSON: {0}")]
    JsonParseError(String),

    #[error("Job type {name} {version} is listed more than once")]
    DuplicateJobType { name: String, version: String },

    #[error("Job type id {0} is used by more than one job type")]
    DuplicateJobTypeId(u64),
}
