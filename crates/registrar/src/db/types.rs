/// Row types for the course scheduling store
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Student {
    pub id: i64,
    pub student_id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Teacher {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subject {
    pub id: i64,
    pub code: String,
    pub name: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Classroom {
    pub id: i64,
    pub building: String,
    pub room_number: String,
    pub capacity: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A scheduled offering of a subject.
///
/// `current_enrollment` is maintained by store triggers and is never written
/// by the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    pub id: i64,
    pub subject_id: i64,
    pub teacher_id: i64,
    pub classroom_id: i64,
    pub section_code: String,
    pub start_time: String,
    pub duration_minutes: i64,
    pub max_enrollment: i64,
    pub current_enrollment: i64,
    pub days: Vec<Weekday>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Enrollment {
    pub id: i64,
    pub student_id: i64,
    pub section_id: i64,
    pub enrollment_date: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

/// One row of a student's schedule, joined from `student_schedule_view`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleItem {
    pub section_id: i64,
    pub subject_code: String,
    pub subject_name: String,
    pub section_code: String,
    pub teacher_first_name: String,
    pub teacher_last_name: String,
    pub building: String,
    pub room_number: String,
    pub start_time: String,
    pub end_time: String,
    pub duration_minutes: i64,
    pub days: Vec<Weekday>,
}

/// Ordering applied to a schedule read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScheduleOrder {
    /// By subject code, then section code.
    Listing,
    /// By first meeting day, then start time.
    Export,
}

/// A teaching day. Sections only meet Monday through Friday.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Weekday {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
}

#[derive(Debug, Error)]
#[error("Unknown weekday: {0}")]
pub struct UnknownWeekday(pub String);

impl Weekday {
    pub const ALL: [Weekday; 5] = [
        Weekday::Monday,
        Weekday::Tuesday,
        Weekday::Wednesday,
        Weekday::Thursday,
        Weekday::Friday,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Weekday::Monday => "monday",
            Weekday::Tuesday => "tuesday",
            Weekday::Wednesday => "wednesday",
            Weekday::Thursday => "thursday",
            Weekday::Friday => "friday",
        }
    }

    /// Short form used in printed schedules (e.g. "M", "Tu").
    pub fn abbreviation(self) -> &'static str {
        match self {
            Weekday::Monday => "M",
            Weekday::Tuesday => "Tu",
            Weekday::Wednesday => "W",
            Weekday::Thursday => "Th",
            Weekday::Friday => "F",
        }
    }

    /// Parses the comma-joined day list produced by the store's aggregations.
    /// A NULL aggregate (section without days) yields an empty list.
    pub fn parse_list(raw: Option<&str>) -> Result<Vec<Weekday>, UnknownWeekday> {
        match raw {
            None => Ok(Vec::new()),
            Some(s) if s.is_empty() => Ok(Vec::new()),
            Some(s) => s.split(',').map(str::parse).collect(),
        }
    }
}

impl FromStr for Weekday {
    type Err = UnknownWeekday;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Weekday::ALL
            .into_iter()
            .find(|day| day.as_str() == s)
            .ok_or_else(|| UnknownWeekday(s.to_string()))
    }
}

impl fmt::Display for Weekday {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
