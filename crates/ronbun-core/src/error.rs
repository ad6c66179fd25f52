//! Catalog lookup error types.
//!
//! Scoring itself never fails; these errors only arise when a caller asks
//! the prompt catalog for an institution it does not contain.

use thiserror::Error;

/// Errors that can occur when resolving a department in the prompt catalog.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CatalogError {
    /// No university matched by id or name.
    #[error("unknown university: {0}")]
    UnknownUniversity(String),

    /// The university exists but has no such faculty.
    #[error("unknown faculty '{faculty}' at {university}")]
    UnknownFaculty { university: String, faculty: String },

    /// The faculty exists but has no such department.
    #[error("unknown department '{department}' in {university} / {faculty}")]
    UnknownDepartment {
        university: String,
        faculty: String,
        department: String,
    },
}

impl CatalogError {
    /// The catalog level at which the lookup failed.
    pub fn level(&self) -> &'static str {
        match self {
            CatalogError::UnknownUniversity(_) => "university",
            CatalogError::UnknownFaculty { .. } => "faculty",
            CatalogError::UnknownDepartment { .. } => "department",
        }
    }
}
