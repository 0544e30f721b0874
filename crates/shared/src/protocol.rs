use serde::{Deserialize, Serialize};

use crate::domain::{BatchId, BatchSummary};

/// Form body of `POST /get_timetable` and query of `GET /timetable`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TimetableRequest {
    #[serde(default)]
    pub batch_id: Option<BatchId>,
}

impl TimetableRequest {
    pub fn selected(&self) -> BatchId {
        self.batch_id.clone().unwrap_or_else(|| BatchId::new(""))
    }
}

/// One filled slot of a batch's week.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleItem {
    pub day_of_week: String,
    pub period: u8,
    pub subject_name: String,
    #[serde(default)]
    pub teacher_name: Option<String>,
    #[serde(default)]
    pub time: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DepartmentBatches {
    pub department: String,
    pub batches: Vec<BatchSummary>,
}

/// Groups batches by department, departments and batch names in ascending
/// order.
pub fn group_by_department(batches: &[BatchSummary]) -> Vec<DepartmentBatches> {
    let mut sorted = batches.to_vec();
    sorted.sort_by(|a, b| {
        a.department
            .cmp(&b.department)
            .then_with(|| a.batch_name.cmp(&b.batch_name))
    });

    let mut groups: Vec<DepartmentBatches> = Vec::new();
    for batch in sorted {
        match groups.last_mut() {
            Some(group) if group.department == batch.department => group.batches.push(batch),
            _ => groups.push(DepartmentBatches {
                department: batch.department.clone(),
                batches: vec![batch],
            }),
        }
    }
    groups
}
