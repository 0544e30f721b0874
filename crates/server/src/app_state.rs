use std::sync::Arc;

use shared::protocol::{group_by_department, DepartmentBatches};
use timetable::{Catalog, TimetableSource};

/// Immutable per-process state shared by every request.
#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) source: Arc<dyn TimetableSource>,
    pub(crate) departments: Vec<DepartmentBatches>,
}

impl AppState {
    pub(crate) fn new(catalog: &Catalog, source: Arc<dyn TimetableSource>) -> Self {
        Self {
            source,
            departments: group_by_department(&catalog.batches),
        }
    }
}
