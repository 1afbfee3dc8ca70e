//! College catalog: the static cutoff dataset, loaded once at startup and
//! shared read-only as `Arc<Catalog>`.

pub mod handlers;
pub mod matcher;
pub mod models;

use std::path::{Path, PathBuf};

use serde::Serialize;
use thiserror::Error;

pub use models::{Branch, CategoryCode, College, Suggestion};

/// Bundled catalog, used when `CATALOG_PATH` is not configured.
const BUILTIN_CATALOG: &str = include_str!("../../data/colleges.json");

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Failed to read catalog file {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed catalog document: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid {category} cutoff {value} for '{branch}' at '{college}'")]
    InvalidCutoff {
        college: String,
        branch: String,
        category: CategoryCode,
        value: f64,
    },
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct Catalog {
    colleges: Vec<College>,
}

impl Catalog {
    /// Builds a catalog from already-parsed colleges, enforcing the cutoff invariant.
    pub fn new(colleges: Vec<College>) -> Result<Self, CatalogError> {
        for college in &colleges {
            for branch in &college.branches {
                for (&category, &value) in &branch.cutoffs {
                    if !value.is_finite() || value < 0.0 {
                        return Err(CatalogError::InvalidCutoff {
                            college: college.name.clone(),
                            branch: branch.name.clone(),
                            category,
                            value,
                        });
                    }
                }
            }
        }
        Ok(Self { colleges })
    }

    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let colleges: Vec<College> = serde_json::from_str(json)?;
        Self::new(colleges)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&json)
    }

    pub fn builtin() -> Result<Self, CatalogError> {
        Self::from_json(BUILTIN_CATALOG)
    }

    pub fn colleges(&self) -> &[College] {
        &self.colleges
    }

    pub fn branch_count(&self) -> usize {
        self.colleges.iter().map(|c| c.branches.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.branch_count() == 0
    }
}
