//! Batch timetables: catalog, scheduling, lookup sources and the view
//! controller that renders a week into a display region.

use std::path::PathBuf;

use shared::{domain::BatchId, error::ApiError};
use thiserror::Error;

pub mod catalog;
pub mod controller;
pub mod render;
pub mod scheduler;
pub mod source;

pub use catalog::Catalog;
pub use controller::{
    DisplayRegion, Notifier, SelectionControl, TimetableController, ViewOutcome,
    NO_SELECTION_MESSAGE,
};
pub use render::render_table;
pub use scheduler::{Schedule, ScheduleReport, Scheduler};
pub use source::{build_source, GeneratedTimetable, SampleTimetable, SourceKind, TimetableSource};

#[derive(Debug, Error)]
pub enum TimetableError {
    #[error("{}", NO_SELECTION_MESSAGE)]
    NoSelection,
    #[error("no timetable for batch '{0}'")]
    UnknownBatch(BatchId),
    #[error("unknown timetable source '{0}' (expected 'sample' or 'generated')")]
    UnknownSource(String),
    #[error("failed to parse catalog: {0}")]
    CatalogParse(#[from] toml::de::Error),
    #[error("invalid catalog: {0}")]
    InvalidCatalog(String),
    #[error("failed to read catalog '{}': {source}", .path.display())]
    CatalogIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl From<TimetableError> for ApiError {
    fn from(value: TimetableError) -> Self {
        let message = value.to_string();
        match value {
            TimetableError::NoSelection => ApiError::validation(message),
            TimetableError::UnknownBatch(_) => ApiError::not_found(message),
            _ => ApiError::internal(message),
        }
    }
}

/// Rejects an unselected batch before any lookup happens.
pub fn require_selection(batch_id: &BatchId) -> Result<&BatchId, TimetableError> {
    if batch_id.is_unselected() {
        return Err(TimetableError::NoSelection);
    }
    Ok(batch_id)
}
