//! Persistence of recipe type definitions.

use crate::error::GatewayError;
use crate::graph::RecipeGraph;
use crate::recipe::{RecipeTypeDefinition, RecipeTypeDocument};
use crate::schema::JobTypeCatalog;
use crate::validate::{ValidationReport, validate};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Loads, saves and validates recipe type definitions.
///
/// Each call is a single request with no retry; a failed call leaves the
/// caller's graph untouched.
pub trait RecipeGateway {
    fn load(&self, id: u64) -> Result<RecipeTypeDocument, GatewayError>;

    /// Stores `document` and returns its id, assigning one when it has none.
    fn save(&mut self, document: &RecipeTypeDocument) -> Result<u64, GatewayError>;

    fn validate(&self, definition: &RecipeTypeDefinition) -> Result<ValidationReport, GatewayError>;
}

/// A gateway backed by a directory holding one `<id>.json` file per recipe type.
///
/// Given a catalog it validates the way a server would: the definition must
/// load into a graph, and the local warnings are reported. Without one,
/// validation accepts everything.
pub struct FileGateway {
    root: PathBuf,
    catalog: Option<Box<dyn JobTypeCatalog>>,
}

impl FileGateway {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            catalog: None,
        }
    }

    pub fn with_catalog(mut self, catalog: impl JobTypeCatalog + 'static) -> Self {
        self.catalog = Some(Box::new(catalog));
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, id: u64) -> PathBuf {
        self.root.join(format!("{}.json", id))
    }

    /// Ids of every stored recipe type, ascending.
    pub fn ids(&self) -> Result<Vec<u64>, GatewayError> {
        let entries = fs::read_dir(&self.root).map_err(|e| io_error(&self.root, e))?;
        let mut ids: Vec<u64> = entries
            .filter_map(Result::ok)
            .filter_map(|entry| {
                let path = entry.path();
                if path.extension()? != "json" {
                    return None;
                }
                path.file_stem()?.to_str()?.parse().ok()
            })
            .collect();
        ids.sort_unstable();
        Ok(ids)
    }
}

impl RecipeGateway for FileGateway {
    fn load(&self, id: u64) -> Result<RecipeTypeDocument, GatewayError> {
        let path = self.path_for(id);
        if !path.exists() {
            return Err(GatewayError::NotFound(id));
        }
        let json = fs::read_to_string(&path).map_err(|e| io_error(&path, e))?;
        let document = serde_json::from_str(&json)?;
        debug!(id, path = %path.display(), "loaded recipe type");
        Ok(document)
    }

    fn save(&mut self, document: &RecipeTypeDocument) -> Result<u64, GatewayError> {
        fs::create_dir_all(&self.root).map_err(|e| io_error(&self.root, e))?;
        let id = match document.id {
            Some(id) => id,
            None => self.ids()?.last().map_or(1, |last| last + 1),
        };
        let stored = RecipeTypeDocument {
            id: Some(id),
            ..document.clone()
        };
        let path = self.path_for(id);
        let json = serde_json::to_string_pretty(&stored)?;
        fs::write(&path, json).map_err(|e| io_error(&path, e))?;
        info!(id, name = %stored.name, "saved recipe type");
        Ok(id)
    }

    fn validate(&self, definition: &RecipeTypeDefinition) -> Result<ValidationReport, GatewayError> {
        let Some(catalog) = &self.catalog else {
            return Ok(ValidationReport::default());
        };
        let graph = RecipeGraph::from_definition(definition.clone(), catalog.as_ref())
            .map_err(|e| GatewayError::Rejected(e.to_string()))?;
        Ok(validate(&graph))
    }
}

fn io_error(path: &Path, source: std::io::Error) -> GatewayError {
    GatewayError::Io {
        path: path.display().to_string(),
        source,
    }
}
