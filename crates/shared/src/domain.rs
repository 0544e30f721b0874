use chrono::Weekday;
use serde::{Deserialize, Serialize};

macro_rules! id_newtype {
    ($name:ident) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub struct $name(pub i64);
    };
}

id_newtype!(SubjectId);
id_newtype!(TeacherId);

/// Batch identifier as submitted by the batch dropdown. An empty value means
/// nothing was selected.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BatchId(pub String);

impl BatchId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_unselected(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl std::fmt::Display for BatchId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

pub const SCHOOL_DAYS: [Weekday; 5] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
];

pub const SLOTS_PER_DAY: u8 = 5;
pub const LUNCH_SLOT: u8 = 3;

/// Slots shown as "Period 1" through "Period 4", lunch excluded.
pub const TEACHING_SLOTS: [u8; 4] = [1, 2, 4, 5];

pub fn day_label(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}

pub fn slot_time(slot: u8) -> Option<&'static str> {
    match slot {
        1 => Some("09:30 - 10:20"),
        2 => Some("10:20 - 11:10"),
        3 => Some("11:10 - 12:00 (LUNCH)"),
        4 => Some("12:00 - 12:50"),
        5 => Some("12:50 - 01:40"),
        _ => None,
    }
}

/// Column index (0-based) of a teaching slot in a rendered week.
pub fn column_for_slot(slot: u8) -> Option<usize> {
    TEACHING_SLOTS.iter().position(|s| *s == slot)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimetableRow {
    pub day: String,
    pub period1: String,
    pub period2: String,
    pub period3: String,
    pub period4: String,
}

impl TimetableRow {
    pub fn new(day: &str, periods: [&str; 4]) -> Self {
        let [p1, p2, p3, p4] = periods;
        Self {
            day: day.to_string(),
            period1: p1.to_string(),
            period2: p2.to_string(),
            period3: p3.to_string(),
            period4: p4.to_string(),
        }
    }

    pub fn cells(&self) -> [&str; 5] {
        [
            self.day.as_str(),
            self.period1.as_str(),
            self.period2.as_str(),
            self.period3.as_str(),
            self.period4.as_str(),
        ]
    }
}

pub type Week = Vec<TimetableRow>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchSummary {
    pub batch_id: BatchId,
    pub batch_name: String,
    pub department: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubjectSummary {
    pub subject_id: SubjectId,
    pub subject_name: String,
    pub short_code: String,
    pub classes_per_week: u32,
    pub max_per_day: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeacherSummary {
    pub teacher_id: TeacherId,
    pub name: String,
    #[serde(default)]
    pub specialization: String,
    pub max_classes_per_week: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleEntry {
    pub batch_id: BatchId,
    pub subject_id: SubjectId,
    pub teacher_id: TeacherId,
    pub day: Weekday,
    pub slot: u8,
}
