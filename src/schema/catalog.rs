use super::job_type::JobTypeSchema;
use crate::error::CatalogError;
use ahash::AHashMap;
use std::sync::Arc;

/// Source of the job types that can be placed in a recipe.
///
/// Implement this on whatever fronts your job type registry (a REST client,
/// a database, a fixture file). The graph only ever reads from it.
pub trait JobTypeCatalog {
    /// All available job types, in catalog order.
    fn list_job_types(&self) -> Vec<Arc<JobTypeSchema>>;

    /// Looks a job type up by its numeric id.
    fn job_type(&self, id: u64) -> Option<Arc<JobTypeSchema>>;

    /// Looks a job type up by name and version.
    fn job_type_by_key(&self, name: &str, version: &str) -> Option<Arc<JobTypeSchema>>;
}

/// An in-memory catalog, typically loaded from a JSON array of job types.
#[derive(Debug, Default, Clone)]
pub struct Catalog {
    job_types: Vec<Arc<JobTypeSchema>>,
    by_id: AHashMap<u64, usize>,
    by_key: AHashMap<(String, String), usize>,
}

impl Catalog {
    pub fn new(job_types: Vec<JobTypeSchema>) -> Result<Self, CatalogError> {
        let mut catalog = Self::default();
        for job_type in job_types {
            catalog.insert(job_type)?;
        }
        Ok(catalog)
    }

    /// Parses a catalog from a JSON array of job type schemas.
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let job_types: Vec<JobTypeSchema> =
            serde_json::from_str(json).map_err(|e| CatalogError::JsonParseError(e.to_string()))?;
        Self::new(job_types)
    }

    pub fn insert(&mut self, job_type: JobTypeSchema) -> Result<Arc<JobTypeSchema>, CatalogError> {
        let key = (job_type.name.clone(), job_type.version.clone());
        if self.by_key.contains_key(&key) {
            return Err(CatalogError::DuplicateJobType {
                name: key.0,
                version: key.1,
            });
        }
        if let Some(id) = job_type.id {
            if self.by_id.contains_key(&id) {
                return Err(CatalogError::DuplicateJobTypeId(id));
            }
        }
        let index = self.job_types.len();
        if let Some(id) = job_type.id {
            self.by_id.insert(id, index);
        }
        self.by_key.insert(key, index);
        let job_type = Arc::new(job_type);
        self.job_types.push(Arc::clone(&job_type));
        Ok(job_type)
    }

    pub fn len(&self) -> usize {
        self.job_types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.job_types.is_empty()
    }
}

impl JobTypeCatalog for Catalog {
    fn list_job_types(&self) -> Vec<Arc<JobTypeSchema>> {
        self.job_types.clone()
    }

    fn job_type(&self, id: u64) -> Option<Arc<JobTypeSchema>> {
        self.by_id.get(&id).map(|&i| Arc::clone(&self.job_types[i]))
    }

    fn job_type_by_key(&self, name: &str, version: &str) -> Option<Arc<JobTypeSchema>> {
        self.by_key
            .get(&(name.to_string(), version.to_string()))
            .map(|&i| Arc::clone(&self.job_types[i]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::DataKind;

    #[test]
    fn test_lookup_by_id_and_key() {
        let catalog = Catalog::new(vec![
            JobTypeSchema::new("ingest", "1.0")
                .with_id(7)
                .with_output("file", DataKind::File),
            JobTypeSchema::new("ingest", "2.0"),
        ])
        .unwrap();

        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.job_type(7).unwrap().version, "1.0");
        assert!(catalog.job_type(8).is_none());
        assert!(catalog.job_type_by_key("ingest", "2.0").is_some());
        assert!(catalog.job_type_by_key("ingest", "3.0").is_none());
    }

    #[test]
    fn test_duplicate_job_type_is_rejected() {
        let result = Catalog::new(vec![
            JobTypeSchema::new("ingest", "1.0"),
            JobTypeSchema::new("ingest", "1.0"),
        ]);
        assert!(matches!(
            result,
            Err(CatalogError::DuplicateJobType { .. })
        ));
    }

    #[test]
    fn test_duplicate_job_type_id_is_rejected() {
        let mut catalog = Catalog::new(vec![JobTypeSchema::new("a", "1.0").with_id(5)]).unwrap();
        let result = catalog.insert(JobTypeSchema::new("b", "1.0").with_id(5));
        assert!(matches!(result, Err(CatalogError::DuplicateJobTypeId(5))));

        // the first registration still resolves and nothing was added
        assert_eq!(catalog.job_type(5).unwrap().name, "a");
        assert_eq!(catalog.len(), 1);
        assert!(catalog.job_type_by_key("b", "1.0").is_none());
    }

    #[test]
    fn test_from_json_defaults() {
        let json = r#"[{
            "id": 1, "name": "transform", "version": "1.0",
            "input_data": [{"name": "file", "type": "file", "media_types": ["image/png"]}],
            "output_data": [{"name": "out", "type": "files"}]
        }]"#;
        let catalog = Catalog::from_json(json).unwrap();
        let schema = catalog.job_type(1).unwrap();
        let input = schema.input("file").unwrap();
        assert!(input.required);
        assert_eq!(input.media_types, vec!["image/png".to_string()]);
        assert_eq!(schema.output("out").unwrap().kind, DataKind::Files);
    }
}
