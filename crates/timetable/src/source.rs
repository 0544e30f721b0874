use std::{fmt, str::FromStr, sync::Arc};

use shared::{
    domain::{
        column_for_slot, day_label, slot_time, BatchId, TimetableRow, Week, SCHOOL_DAYS,
        TEACHING_SLOTS,
    },
    protocol::ScheduleItem,
};

use crate::{require_selection, Catalog, Schedule, Scheduler, TimetableError};

pub const FREE_SLOT_LABEL: &str = "Free";

/// Where a batch's week comes from.
pub trait TimetableSource: Send + Sync {
    fn week_for(&self, batch_id: &BatchId) -> Result<Week, TimetableError>;

    fn schedule_for(&self, batch_id: &BatchId) -> Result<Vec<ScheduleItem>, TimetableError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SourceKind {
    #[default]
    Sample,
    Generated,
}

impl FromStr for SourceKind {
    type Err = TimetableError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sample" => Ok(Self::Sample),
            "generated" => Ok(Self::Generated),
            other => Err(TimetableError::UnknownSource(other.to_string())),
        }
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sample => f.write_str("sample"),
            Self::Generated => f.write_str("generated"),
        }
    }
}

pub fn build_source(kind: SourceKind, catalog: &Catalog, seed: Option<u64>) -> Arc<dyn TimetableSource> {
    tracing::info!(source = %kind, ?seed, "building timetable source");
    match kind {
        SourceKind::Sample => Arc::new(SampleTimetable),
        SourceKind::Generated => Arc::new(GeneratedTimetable::generate(catalog.clone(), seed)),
    }
}

pub fn sample_week() -> Week {
    vec![
        TimetableRow::new("Monday", ["Maths", "Physics", "EVS", "Web Dev"]),
        TimetableRow::new("Tuesday", ["Graphics", "Maths", "EVS", "Physics"]),
        TimetableRow::new("Wednesday", ["Web Dev", "Physics", "Maths", "EVS"]),
        TimetableRow::new("Thursday", ["Maths", "Graphics", "EVS", "Physics"]),
        TimetableRow::new("Friday", ["Physics", "Maths", "Web Dev", "EVS"]),
    ]
}

/// Fixed week returned for every selected batch.
#[derive(Debug, Clone, Copy, Default)]
pub struct SampleTimetable;

impl TimetableSource for SampleTimetable {
    fn week_for(&self, batch_id: &BatchId) -> Result<Week, TimetableError> {
        require_selection(batch_id)?;
        Ok(sample_week())
    }

    fn schedule_for(&self, batch_id: &BatchId) -> Result<Vec<ScheduleItem>, TimetableError> {
        let week = self.week_for(batch_id)?;
        let mut items = Vec::with_capacity(week.len() * TEACHING_SLOTS.len());
        for row in &week {
            let [_, periods @ ..] = row.cells();
            for (subject, slot) in periods.into_iter().zip(TEACHING_SLOTS) {
                items.push(ScheduleItem {
                    day_of_week: row.day.clone(),
                    period: slot,
                    subject_name: subject.to_string(),
                    teacher_name: None,
                    time: slot_time(slot).map(str::to_string),
                });
            }
        }
        Ok(items)
    }
}

/// Per-batch weeks taken from a scheduler run over a catalog.
#[derive(Debug, Clone)]
pub struct GeneratedTimetable {
    catalog: Catalog,
    schedule: Schedule,
}

impl GeneratedTimetable {
    pub fn new(catalog: Catalog, schedule: Schedule) -> Self {
        Self { catalog, schedule }
    }

    pub fn generate(catalog: Catalog, seed: Option<u64>) -> Self {
        let (schedule, _) = Scheduler::seeded(&catalog, seed).schedule_all();
        Self::new(catalog, schedule)
    }

    pub fn schedule(&self) -> &Schedule {
        &self.schedule
    }

    fn known_batch<'b>(&self, batch_id: &'b BatchId) -> Result<&'b BatchId, TimetableError> {
        require_selection(batch_id)?;
        if self.catalog.batch(batch_id).is_none() {
            return Err(TimetableError::UnknownBatch(batch_id.clone()));
        }
        Ok(batch_id)
    }

    fn subject_name(&self, entry: &shared::domain::ScheduleEntry) -> String {
        self.catalog
            .subject(entry.subject_id)
            .map(|s| s.subject_name.clone())
            .unwrap_or_else(|| format!("Subject {}", entry.subject_id.0))
    }
}

impl TimetableSource for GeneratedTimetable {
    fn week_for(&self, batch_id: &BatchId) -> Result<Week, TimetableError> {
        let batch_id = self.known_batch(batch_id)?;

        let mut grid: Vec<[String; 4]> = SCHOOL_DAYS
            .iter()
            .map(|_| std::array::from_fn(|_| FREE_SLOT_LABEL.to_string()))
            .collect();
        for entry in self.schedule.for_batch(batch_id) {
            let day_index = entry.day.num_days_from_monday() as usize;
            if let (Some(cells), Some(column)) = (grid.get_mut(day_index), column_for_slot(entry.slot)) {
                cells[column] = self.subject_name(entry);
            }
        }

        Ok(SCHOOL_DAYS
            .iter()
            .zip(grid)
            .map(|(day, [p1, p2, p3, p4])| TimetableRow {
                day: day_label(*day).to_string(),
                period1: p1,
                period2: p2,
                period3: p3,
                period4: p4,
            })
            .collect())
    }

    fn schedule_for(&self, batch_id: &BatchId) -> Result<Vec<ScheduleItem>, TimetableError> {
        let batch_id = self.known_batch(batch_id)?;
        Ok(self
            .schedule
            .for_batch(batch_id)
            .into_iter()
            .map(|entry| ScheduleItem {
                day_of_week: day_label(entry.day).to_string(),
                period: entry.slot,
                subject_name: self.subject_name(entry),
                teacher_name: self.catalog.teacher(entry.teacher_id).map(|t| t.name.clone()),
                time: slot_time(entry.slot).map(str::to_string),
            })
            .collect())
    }
}

#[cfg(test)]
#[path = "tests/source_tests.rs"]
mod tests;
