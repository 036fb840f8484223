//! Validation warning types.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The checks the local validate step runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WarningKind {
    RequiredInput,
    DuplicateSource,
    DataKind,
    MultipleFiles,
    OptionalSource,
    MediaType,
    UnusedRecipeInput,
}

impl WarningKind {
    /// Wire id of the warning.
    pub fn id(self) -> &'static str {
        match self {
            WarningKind::RequiredInput => "required_input",
            WarningKind::DuplicateSource => "duplicate_source",
            WarningKind::DataKind => "data_kind",
            WarningKind::MultipleFiles => "multiple_files",
            WarningKind::OptionalSource => "optional_source",
            WarningKind::MediaType => "media_type",
            WarningKind::UnusedRecipeInput => "unused_recipe_input",
        }
    }
}

impl fmt::Display for WarningKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// A non-fatal finding about a recipe.
///
/// The wire shape is `{id, details}`. Warnings raised locally also carry the
/// job and input they are about; warnings coming back from a gateway may use
/// ids this crate does not know.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationWarning {
    pub id: String,
    pub details: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub job: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input: Option<String>,
}

impl ValidationWarning {
    pub fn new(kind: WarningKind, details: impl Into<String>) -> Self {
        Self {
            id: kind.id().to_string(),
            details: details.into(),
            job: None,
            input: None,
        }
    }

    pub(crate) fn on_input(mut self, job: &str, input: &str) -> Self {
        self.job = Some(job.to_string());
        self.input = Some(input.to_string());
        self
    }

    pub fn is(&self, kind: WarningKind) -> bool {
        self.id == kind.id()
    }
}

impl fmt::Display for ValidationWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.id, self.details)
    }
}

/// Result of a validate round, as returned by a gateway.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationReport {
    #[serde(default)]
    pub warnings: Vec<ValidationWarning>,
}

impl ValidationReport {
    pub fn is_clean(&self) -> bool {
        self.warnings.is_empty()
    }

    /// Appends `other`'s warnings, skipping any with the same id and details
    /// as one already present.
    pub fn merge(&mut self, other: ValidationReport) {
        for warning in other.warnings {
            let known = self
                .warnings
                .iter()
                .any(|w| w.id == warning.id && w.details == warning.details);
            if !known {
                self.warnings.push(warning);
            }
        }
    }

    pub fn of_kind(&self, kind: WarningKind) -> Vec<&ValidationWarning> {
        self.warnings.iter().filter(|w| w.is(kind)).collect()
    }
}

impl From<Vec<ValidationWarning>> for ValidationReport {
    fn from(warnings: Vec<ValidationWarning>) -> Self {
        Self { warnings }
    }
}
