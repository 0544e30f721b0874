use std::{collections::HashSet, fs, path::Path};

use serde::Deserialize;
use shared::domain::{BatchId, BatchSummary, SubjectId, SubjectSummary, TeacherId, TeacherSummary};

use crate::TimetableError;

const BUILTIN_CATALOG: &str = include_str!("../catalog.toml");

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct TeacherSubject {
    pub teacher_id: TeacherId,
    pub subject_id: SubjectId,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct BatchSubject {
    pub batch_id: BatchId,
    pub subject_id: SubjectId,
    pub classes_per_week: u32,
}

/// Read-only description of everything the scheduler places: batches,
/// subjects, teachers and the links between them.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Catalog {
    #[serde(default)]
    pub batches: Vec<BatchSummary>,
    #[serde(default)]
    pub subjects: Vec<SubjectSummary>,
    #[serde(default)]
    pub teachers: Vec<TeacherSummary>,
    #[serde(default)]
    pub teacher_subjects: Vec<TeacherSubject>,
    #[serde(default)]
    pub batch_subjects: Vec<BatchSubject>,
}

impl Catalog {
    pub fn builtin() -> Result<Self, TimetableError> {
        Self::from_toml_str(BUILTIN_CATALOG)
    }

    pub fn from_toml_str(raw: &str) -> Result<Self, TimetableError> {
        let catalog: Catalog = toml::from_str(raw)?;
        catalog.validate()?;
        Ok(catalog)
    }

    pub fn load(path: &Path) -> Result<Self, TimetableError> {
        let raw = fs::read_to_string(path).map_err(|source| TimetableError::CatalogIo {
            path: path.to_path_buf(),
            source,
        })?;
        let catalog = Self::from_toml_str(&raw)?;
        tracing::info!(
            path = %path.display(),
            batches = catalog.batches.len(),
            subjects = catalog.subjects.len(),
            teachers = catalog.teachers.len(),
            "loaded catalog"
        );
        Ok(catalog)
    }

    /// Loads `path` when given, the built-in catalog otherwise.
    pub fn load_or_builtin(path: Option<&Path>) -> Result<Self, TimetableError> {
        match path {
            Some(path) => Self::load(path),
            None => Self::builtin(),
        }
    }

    pub fn batch(&self, batch_id: &BatchId) -> Option<&BatchSummary> {
        self.batches.iter().find(|b| &b.batch_id == batch_id)
    }

    pub fn subject(&self, subject_id: SubjectId) -> Option<&SubjectSummary> {
        self.subjects.iter().find(|s| s.subject_id == subject_id)
    }

    pub fn teacher(&self, teacher_id: TeacherId) -> Option<&TeacherSummary> {
        self.teachers.iter().find(|t| t.teacher_id == teacher_id)
    }

    pub fn qualified_teachers(&self, subject_id: SubjectId) -> Vec<TeacherId> {
        self.teacher_subjects
            .iter()
            .filter(|link| link.subject_id == subject_id)
            .map(|link| link.teacher_id)
            .collect()
    }

    pub fn workload_for<'a>(
        &'a self,
        batch_id: &'a BatchId,
    ) -> impl Iterator<Item = &'a BatchSubject> + 'a {
        self.batch_subjects
            .iter()
            .filter(move |link| &link.batch_id == batch_id)
    }

    pub fn batch_ids(&self) -> Vec<BatchId> {
        self.batches.iter().map(|b| b.batch_id.clone()).collect()
    }

    fn validate(&self) -> Result<(), TimetableError> {
        let mut seen = HashSet::new();
        for batch in &self.batches {
            if batch.batch_id.is_unselected() {
                return Err(TimetableError::InvalidCatalog(format!(
                    "batch '{}' has an empty batch_id",
                    batch.batch_name
                )));
            }
            if !seen.insert(&batch.batch_id) {
                return Err(TimetableError::InvalidCatalog(format!(
                    "duplicate batch_id '{}'",
                    batch.batch_id
                )));
            }
        }

        for link in &self.teacher_subjects {
            if self.teacher(link.teacher_id).is_none() {
                return Err(TimetableError::InvalidCatalog(format!(
                    "teacher_subjects references unknown teacher {}",
                    link.teacher_id.0
                )));
            }
            if self.subject(link.subject_id).is_none() {
                return Err(TimetableError::InvalidCatalog(format!(
                    "teacher_subjects references unknown subject {}",
                    link.subject_id.0
                )));
            }
        }

        for link in &self.batch_subjects {
            if self.batch(&link.batch_id).is_none() {
                return Err(TimetableError::InvalidCatalog(format!(
                    "batch_subjects references unknown batch '{}'",
                    link.batch_id
                )));
            }
            if self.subject(link.subject_id).is_none() {
                return Err(TimetableError::InvalidCatalog(format!(
                    "batch_subjects references unknown subject {}",
                    link.subject_id.0
                )));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
#[path = "tests/catalog_tests.rs"]
mod tests;
