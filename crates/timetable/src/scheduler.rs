//! Greedy randomized placement of weekly classes into free slots.
//!
//! Every class of a batch's workload is placed independently: the scheduler
//! collects each (day, slot) outside lunch where the batch is free and at
//! least one qualified teacher is free, draws one of those candidates at
//! random, and commits both the batch and the teacher to it. Classes that
//! cannot be placed are counted in the [`ScheduleReport`] and logged.

use std::collections::HashSet;

use chrono::Weekday;
use rand::{rngs::StdRng, seq::SliceRandom, Rng, SeedableRng};
use shared::domain::{
    BatchId, ScheduleEntry, TeacherId, LUNCH_SLOT, SCHOOL_DAYS, SLOTS_PER_DAY,
};

use crate::{Catalog, TimetableError};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Schedule {
    entries: Vec<ScheduleEntry>,
}

impl Schedule {
    pub fn new(entries: Vec<ScheduleEntry>) -> Self {
        Self { entries }
    }

    pub fn entries(&self) -> &[ScheduleEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries of one batch ordered by day, then slot.
    pub fn for_batch(&self, batch_id: &BatchId) -> Vec<&ScheduleEntry> {
        let mut entries: Vec<_> = self
            .entries
            .iter()
            .filter(|e| &e.batch_id == batch_id)
            .collect();
        entries.sort_by_key(|e| (e.day.num_days_from_monday(), e.slot));
        entries
    }

    pub fn remove_batch(&mut self, batch_id: &BatchId) {
        self.entries.retain(|e| &e.batch_id != batch_id);
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScheduleReport {
    pub placed: usize,
    pub skipped_no_teacher: usize,
    pub failed_no_slot: usize,
}

impl ScheduleReport {
    pub fn total(&self) -> usize {
        self.placed + self.skipped_no_teacher + self.failed_no_slot
    }
}

pub struct Scheduler<'a, R> {
    catalog: &'a Catalog,
    rng: R,
}

impl<'a> Scheduler<'a, StdRng> {
    /// Reproducible when `seed` is given, entropy-seeded otherwise.
    pub fn seeded(catalog: &'a Catalog, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self::new(catalog, rng)
    }
}

impl<'a, R: Rng> Scheduler<'a, R> {
    pub fn new(catalog: &'a Catalog, rng: R) -> Self {
        Self { catalog, rng }
    }

    /// Builds a fresh schedule for every batch in the catalog.
    pub fn schedule_all(&mut self) -> (Schedule, ScheduleReport) {
        tracing::info!(batches = self.catalog.batches.len(), "starting global timetable generation");
        let mut schedule = Schedule::default();
        let batch_ids = self.catalog.batch_ids();
        let report = self.place(&mut schedule, &batch_ids);
        tracing::info!(
            placed = report.placed,
            skipped = report.skipped_no_teacher,
            failed = report.failed_no_slot,
            "global timetable generation finished"
        );
        (schedule, report)
    }

    /// Replaces one batch's entries in `existing`, keeping the teacher
    /// commitments of every other batch.
    pub fn schedule_batch(
        &mut self,
        existing: &Schedule,
        batch_id: &BatchId,
    ) -> Result<(Schedule, ScheduleReport), TimetableError> {
        if self.catalog.batch(batch_id).is_none() {
            return Err(TimetableError::UnknownBatch(batch_id.clone()));
        }

        tracing::info!(batch_id = %batch_id, "starting targeted timetable generation");
        let mut schedule = existing.clone();
        schedule.remove_batch(batch_id);
        let report = self.place(&mut schedule, std::slice::from_ref(batch_id));
        tracing::info!(
            batch_id = %batch_id,
            placed = report.placed,
            skipped = report.skipped_no_teacher,
            failed = report.failed_no_slot,
            "targeted timetable generation finished"
        );
        Ok((schedule, report))
    }

    fn place(&mut self, schedule: &mut Schedule, batch_ids: &[BatchId]) -> ScheduleReport {
        let catalog = self.catalog;
        let mut teacher_busy: HashSet<(TeacherId, Weekday, u8)> = schedule
            .entries
            .iter()
            .map(|e| (e.teacher_id, e.day, e.slot))
            .collect();
        let mut batch_busy: HashSet<(BatchId, Weekday, u8)> = schedule
            .entries
            .iter()
            .filter(|e| batch_ids.contains(&e.batch_id))
            .map(|e| (e.batch_id.clone(), e.day, e.slot))
            .collect();

        let mut report = ScheduleReport::default();
        for batch_id in batch_ids {
            for link in catalog.workload_for(batch_id) {
                let subject_name = catalog
                    .subject(link.subject_id)
                    .map(|s| s.subject_name.as_str())
                    .unwrap_or("unknown subject");
                let qualified = catalog.qualified_teachers(link.subject_id);

                for _ in 0..link.classes_per_week {
                    if qualified.is_empty() {
                        tracing::warn!(subject = subject_name, "no teachers for subject; skipping");
                        report.skipped_no_teacher += 1;
                        continue;
                    }

                    let mut candidates = Vec::new();
                    for day in SCHOOL_DAYS {
                        for slot in 1..=SLOTS_PER_DAY {
                            if slot == LUNCH_SLOT
                                || batch_busy.contains(&(batch_id.clone(), day, slot))
                            {
                                continue;
                            }
                            let free: Vec<TeacherId> = qualified
                                .iter()
                                .copied()
                                .filter(|t| !teacher_busy.contains(&(*t, day, slot)))
                                .collect();
                            if let Some(teacher_id) = free.choose(&mut self.rng) {
                                candidates.push((day, slot, *teacher_id));
                            }
                        }
                    }

                    let Some(&(day, slot, teacher_id)) = candidates.choose(&mut self.rng) else {
                        tracing::warn!(
                            subject = subject_name,
                            batch_id = %batch_id,
                            "no valid slot found"
                        );
                        report.failed_no_slot += 1;
                        continue;
                    };

                    batch_busy.insert((batch_id.clone(), day, slot));
                    teacher_busy.insert((teacher_id, day, slot));
                    schedule.entries.push(ScheduleEntry {
                        batch_id: batch_id.clone(),
                        subject_id: link.subject_id,
                        teacher_id,
                        day,
                        slot,
                    });
                    report.placed += 1;
                }
            }
        }
        report
    }
}

#[cfg(test)]
#[path = "tests/scheduler_tests.rs"]
mod tests;
