//! View controller: selection, lookup and render, wired through three small
//! seams so the same flow drives the HTTP page model and the CLI.

use shared::domain::{BatchId, TimetableRow};

use crate::{render::render_table, TimetableSource};

pub const NO_SELECTION_MESSAGE: &str = "Please select a batch.";

/// The dropdown the batch is chosen from.
pub trait SelectionControl {
    fn current_value(&self) -> BatchId;
}

/// Blocking user-facing notification.
pub trait Notifier {
    fn notify(&mut self, message: &str);
}

/// Container whose inner markup is replaced by the rendered table.
pub trait DisplayRegion {
    fn replace_contents(&mut self, markup: String);
}

impl SelectionControl for BatchId {
    fn current_value(&self) -> BatchId {
        self.clone()
    }
}

impl SelectionControl for str {
    fn current_value(&self) -> BatchId {
        BatchId::new(self)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewOutcome {
    NotSelected,
    Rendered { batch_id: BatchId, rows: usize },
    Unavailable { batch_id: BatchId, message: String },
}

pub struct TimetableController<'a> {
    source: &'a dyn TimetableSource,
}

impl<'a> TimetableController<'a> {
    pub fn new(source: &'a dyn TimetableSource) -> Self {
        Self { source }
    }

    /// Handles one view trigger. Runs to completion and keeps nothing
    /// between calls.
    pub fn view<S, N, D>(&self, selection: &S, notifier: &mut N, display: &mut D) -> ViewOutcome
    where
        S: SelectionControl + ?Sized,
        N: Notifier + ?Sized,
        D: DisplayRegion + ?Sized,
    {
        let batch_id = selection.current_value();
        if batch_id.is_unselected() {
            tracing::debug!("view requested without a batch");
            notifier.notify(NO_SELECTION_MESSAGE);
            return ViewOutcome::NotSelected;
        }

        match self.source.week_for(&batch_id) {
            Ok(rows) => {
                self.render(&rows, display);
                tracing::debug!(batch_id = %batch_id, rows = rows.len(), "timetable rendered");
                ViewOutcome::Rendered {
                    batch_id,
                    rows: rows.len(),
                }
            }
            Err(error) => {
                tracing::warn!(batch_id = %batch_id, %error, "timetable lookup failed");
                let message = error.to_string();
                notifier.notify(&message);
                ViewOutcome::Unavailable { batch_id, message }
            }
        }
    }

    pub fn render<D>(&self, rows: &[TimetableRow], display: &mut D)
    where
        D: DisplayRegion + ?Sized,
    {
        display.replace_contents(render_table(rows));
    }
}

#[cfg(test)]
#[path = "tests/controller_tests.rs"]
mod tests;
