use serde::{Deserialize, Serialize};
use std::fmt;

/// The kind of data carried by an input or output.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "lowercase")]
pub enum DataKind {
    Property,
    File,
    Files,
}

impl DataKind {
    /// Whether the kind carries file data (single or multiple).
    pub fn is_file(self) -> bool {
        matches!(self, DataKind::File | DataKind::Files)
    }
}

impl fmt::Display for DataKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataKind::Property => write!(f, "property"),
            DataKind::File => write!(f, "file"),
            DataKind::Files => write!(f, "files"),
        }
    }
}

pub(crate) fn default_required() -> bool {
    true
}

/// A named input declared by a job type.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct InputDescriptor {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: DataKind,
    #[serde(default = "default_required")]
    pub required: bool,
    /// Accepted media types. Empty means any media type is accepted.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub media_types: Vec<String>,
}

/// A named output produced by a job type.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct OutputDescriptor {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: DataKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub media_type: Option<String>,
}

/// Identifies a job type by name and version.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Hash)]
pub struct JobTypeKey {
    pub name: String,
    pub version: String,
}

impl fmt::Display for JobTypeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.name, self.version)
    }
}

/// The input/output interface of a job type, as supplied by the catalog.
///
/// Schemas are read-only once fetched; graphs share them behind an `Arc`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct JobTypeSchema {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    pub name: String,
    pub version: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon_code: Option<String>,
    #[serde(default)]
    pub input_data: Vec<InputDescriptor>,
    #[serde(default)]
    pub output_data: Vec<OutputDescriptor>,
}

impl JobTypeSchema {
    pub fn new(name: &str, version: &str) -> Self {
        Self {
            id: None,
            name: name.to_string(),
            version: version.to_string(),
            title: None,
            icon_code: None,
            input_data: Vec::new(),
            output_data: Vec::new(),
        }
    }

    pub fn with_id(mut self, id: u64) -> Self {
        self.id = Some(id);
        self
    }

    pub fn with_input(mut self, name: &str, kind: DataKind, required: bool) -> Self {
        self.input_data.push(InputDescriptor {
            name: name.to_string(),
            kind,
            required,
            media_types: Vec::new(),
        });
        self
    }

    pub fn with_output(mut self, name: &str, kind: DataKind) -> Self {
        self.output_data.push(OutputDescriptor {
            name: name.to_string(),
            kind,
            media_type: None,
        });
        self
    }

    pub fn key(&self) -> JobTypeKey {
        JobTypeKey {
            name: self.name.clone(),
            version: self.version.clone(),
        }
    }

    pub fn input(&self, name: &str) -> Option<&InputDescriptor> {
        self.input_data.iter().find(|i| i.name == name)
    }

    pub fn output(&self, name: &str) -> Option<&OutputDescriptor> {
        self.output_data.iter().find(|o| o.name == name)
    }

    /// Label shown by renderers: the title if present, otherwise the name.
    pub fn label(&self) -> &str {
        self.title.as_deref().unwrap_or(&self.name)
    }
}
