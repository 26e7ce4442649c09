//! Request bodies accepted by the create endpoints.
//!
//! Every field defaults when absent so that a missing field is reported by
//! [`validate`](CreateSectionRequest::validate) with a field-level message
//! instead of a generic decode failure.

use chrono::{NaiveTime, Timelike};
use serde::{Deserialize, Serialize};

use super::types::Weekday;

pub const ALL_FIELDS_REQUIRED: &str = "All fields are required";
pub const INVALID_DURATION: &str = "Duration minutes must be either 50 or 80";
pub const INVALID_DAYS: &str = "Days must be monday, tuesday, wednesday, thursday, or friday";
pub const REPEATED_DAYS: &str = "Days must not repeat";
pub const INVALID_START_TIME: &str = "Start time must be a time of day as HH:MM or HH:MM:SS";

const START_TIME_FORMATS: [&str; 2] = ["%H:%M:%S", "%H:%M"];

fn blank(value: &str) -> bool {
    value.trim().is_empty()
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CreateStudentRequest {
    pub student_id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
}

impl CreateStudentRequest {
    pub fn validate(&self) -> Result<(), &'static str> {
        if blank(&self.student_id) || blank(&self.first_name) || blank(&self.last_name) || blank(&self.email) {
            return Err(ALL_FIELDS_REQUIRED);
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CreateTeacherRequest {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
}

impl CreateTeacherRequest {
    pub fn validate(&self) -> Result<(), &'static str> {
        if blank(&self.first_name) || blank(&self.last_name) || blank(&self.email) {
            return Err("First name, last name, and email are required");
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CreateSubjectRequest {
    pub code: String,
    pub name: String,
    pub description: String,
}

impl CreateSubjectRequest {
    pub fn validate(&self) -> Result<(), &'static str> {
        if blank(&self.code) || blank(&self.name) {
            return Err("Code and name are required");
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CreateClassroomRequest {
    pub building: String,
    pub room_number: String,
    pub capacity: i64,
}

impl CreateClassroomRequest {
    pub fn validate(&self) -> Result<(), &'static str> {
        if blank(&self.building) || blank(&self.room_number) || self.capacity <= 0 {
            return Err("Building, room number, and a positive capacity are required");
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CreateSectionRequest {
    pub subject_id: i64,
    pub teacher_id: i64,
    pub classroom_id: i64,
    pub section_code: String,
    pub start_time: String,
    pub duration_minutes: i64,
    pub max_enrollment: i64,
    pub days: Vec<String>,
}

/// The parts of a section request that are parsed rather than stored as sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionSlot {
    pub start_time: NaiveTime,
    /// In the order they were requested.
    pub days: Vec<Weekday>,
}

/// Parses `8:00`, `08:00` or `08:00:30`. Fractional and leap seconds are
/// rejected.
pub fn parse_start_time(raw: &str) -> Option<NaiveTime> {
    let raw = raw.trim();
    START_TIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveTime::parse_from_str(raw, fmt).ok())
        .filter(|time| time.nanosecond() == 0)
}

impl CreateSectionRequest {
    /// Checks the request and returns its parsed start time and days.
    pub fn validate(&self) -> Result<SectionSlot, &'static str> {
        if self.subject_id <= 0
            || self.teacher_id <= 0
            || self.classroom_id <= 0
            || blank(&self.section_code)
            || blank(&self.start_time)
            || self.duration_minutes <= 0
            || self.max_enrollment <= 0
            || self.days.is_empty()
        {
            return Err(ALL_FIELDS_REQUIRED);
        }

        if !matches!(self.duration_minutes, 50 | 80) {
            return Err(INVALID_DURATION);
        }

        let start_time = parse_start_time(&self.start_time).ok_or(INVALID_START_TIME)?;

        let mut days = Vec::with_capacity(self.days.len());
        for raw in &self.days {
            let day: Weekday = raw.parse().map_err(|_| INVALID_DAYS)?;
            if days.contains(&day) {
                return Err(REPEATED_DAYS);
            }
            days.push(day);
        }

        Ok(SectionSlot { start_time, days })
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EnrollmentRequest {
    pub student_id: i64,
    pub section_id: i64,
}

impl EnrollmentRequest {
    pub fn validate(&self) -> Result<(), &'static str> {
        if self.student_id <= 0 || self.section_id <= 0 {
            return Err("Student ID and section ID are required");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn section_request() -> CreateSectionRequest {
        CreateSectionRequest {
            subject_id: 1,
            teacher_id: 1,
            classroom_id: 1,
            section_code: "001".to_string(),
            start_time: "08:00:00".to_string(),
            duration_minutes: 50,
            max_enrollment: 30,
            days: vec!["friday".to_string(), "monday".to_string()],
        }
    }

    #[test]
    fn test_section_days_keep_request_order() {
        let slot = section_request().validate().unwrap();
        assert_eq!(slot.days, vec![Weekday::Friday, Weekday::Monday]);
        assert_eq!(slot.start_time, NaiveTime::from_hms_opt(8, 0, 0).unwrap());
    }

    #[test]
    fn test_start_time_accepts_clock_forms() {
        for (raw, expected) in [
            ("8:00", (8, 0, 0)),
            ("8:00:00", (8, 0, 0)),
            ("08:00", (8, 0, 0)),
            (" 14:30:15 ", (14, 30, 15)),
            ("23:59", (23, 59, 0)),
        ] {
            let (h, m, s) = expected;
            assert_eq!(
                parse_start_time(raw),
                NaiveTime::from_hms_opt(h, m, s),
                "{raw}"
            );
        }
    }

    #[test]
    fn test_start_time_rejects_non_times() {
        for raw in ["2460000.5", "08:00:00.750", "24:00", "quarter past eight", "8", "08:60"] {
            assert_eq!(parse_start_time(raw), None, "{raw}");

            let req = CreateSectionRequest {
                start_time: raw.to_string(),
                ..section_request()
            };
            assert_eq!(req.validate().unwrap_err(), INVALID_START_TIME, "{raw}");
        }
    }

    #[test]
    fn test_section_duration_must_be_50_or_80() {
        for minutes in [45, 60, 90] {
            let req = CreateSectionRequest {
                duration_minutes: minutes,
                ..section_request()
            };
            assert_eq!(req.validate().unwrap_err(), INVALID_DURATION);
        }

        let req = CreateSectionRequest {
            duration_minutes: 80,
            ..section_request()
        };
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_section_rejects_weekend_and_repeated_days() {
        let req = CreateSectionRequest {
            days: vec!["monday".to_string(), "saturday".to_string()],
            ..section_request()
        };
        assert_eq!(req.validate().unwrap_err(), INVALID_DAYS);

        let req = CreateSectionRequest {
            days: vec!["monday".to_string(), "monday".to_string()],
            ..section_request()
        };
        assert_eq!(req.validate().unwrap_err(), REPEATED_DAYS);
    }

    #[test]
    fn test_section_missing_fields() {
        let req: CreateSectionRequest = serde_json::from_str(r#"{"section_code":"001"}"#).unwrap();
        assert_eq!(req.validate().unwrap_err(), ALL_FIELDS_REQUIRED);

        let req = CreateSectionRequest {
            days: vec![],
            ..section_request()
        };
        assert_eq!(req.validate().unwrap_err(), ALL_FIELDS_REQUIRED);
    }

    #[test]
    fn test_student_fields_required() {
        let req: CreateStudentRequest =
            serde_json::from_str(r#"{"student_id":"2024001","first_name":"John","last_name":"Doe"}"#)
                .unwrap();
        assert_eq!(req.validate().unwrap_err(), ALL_FIELDS_REQUIRED);

        let req = CreateStudentRequest {
            email: "   ".to_string(),
            ..req
        };
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_classroom_capacity_must_be_positive() {
        let req = CreateClassroomRequest {
            building: "Science Building".to_string(),
            room_number: "101".to_string(),
            capacity: 0,
        };
        assert!(req.validate().is_err());
        assert!(CreateClassroomRequest { capacity: 40, ..req }.validate().is_ok());
    }

    #[test]
    fn test_subject_description_is_optional() {
        let req: CreateSubjectRequest =
            serde_json::from_str(r#"{"code":"CS101","name":"Intro"}"#).unwrap();
        assert!(req.validate().is_ok());
        assert_eq!(req.description, "");
    }

    #[test]
    fn test_enrollment_ids_required() {
        assert!(EnrollmentRequest { student_id: 1, section_id: 0 }.validate().is_err());
        assert!(EnrollmentRequest { student_id: 1, section_id: 2 }.validate().is_ok());
    }
}
