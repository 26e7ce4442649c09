//! Maps store errors onto API errors.
//!
//! [`translate`] is total: every [`DbError`] variant has an outcome for
//! every resource, so no store call site needs its own fallback.

use crate::db::{DbError, TriggerRejection};

use super::types::{ApiErrorType, ErrorKind};

/// The resource a failing store call was acting on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resource {
    Student,
    Teacher,
    Subject,
    Classroom,
    Section,
    Enrollment,
    Schedule,
}

impl Resource {
    fn not_found_message(self) -> &'static str {
        match self {
            Resource::Student | Resource::Schedule => "Student not found",
            Resource::Teacher => "Teacher not found",
            Resource::Subject => "Subject not found",
            Resource::Classroom => "Classroom not found",
            Resource::Section => "Section not found",
            Resource::Enrollment => "Enrollment not found",
        }
    }

    /// Message for a uniqueness violation, specific when the violated
    /// columns identify the constraint.
    fn duplicate_message(self, table: &str, columns: &[String]) -> &'static str {
        let columns: Vec<&str> = columns.iter().map(String::as_str).collect();

        match (self, table, columns.as_slice()) {
            (Resource::Student, "students", ["student_id"]) => {
                "A student with this student ID already exists"
            }
            (Resource::Student, "students", ["email"]) => "A student with this email already exists",
            (Resource::Teacher, "teachers", ["email"]) => "A teacher with this email already exists",
            (Resource::Subject, "subjects", ["code"]) => "A subject with this code already exists",
            (Resource::Classroom, "classrooms", ["building", "room_number"]) => {
                "A classroom with this building and room number already exists"
            }
            (Resource::Section, "sections", ["subject_id", "section_code"]) => {
                "A section with this subject and section code already exists"
            }
            (Resource::Enrollment, "enrollments", ["student_id", "section_id"]) => {
                "Student is already enrolled in this section"
            }
            _ => "A duplicate entry exists",
        }
    }

    fn constraint_message(self) -> &'static str {
        match self {
            Resource::Section => "Section details violate constraints. Check time limits and duration.",
            _ => "Request violates a data constraint",
        }
    }
}

/// Turns a store failure into the response the client sees.
///
/// `action` describes the attempted operation ("create student") and
/// prefixes the detail of internal errors.
pub fn translate(resource: Resource, action: &str, err: &DbError) -> ApiErrorType {
    match err {
        DbError::NotFound => ApiErrorType::not_found(resource.not_found_message()),
        DbError::UniqueViolation { table, columns } => {
            ApiErrorType::conflict(resource.duplicate_message(table, columns))
        }
        DbError::CheckViolation(_) => {
            ApiErrorType::new(ErrorKind::ConstraintViolation, resource.constraint_message())
        }
        DbError::Rejected(TriggerRejection::ScheduleConflict) => {
            ApiErrorType::conflict("Schedule conflict detected")
        }
        DbError::Rejected(TriggerRejection::SectionFull) => ApiErrorType::conflict("Section is full"),
        DbError::Transaction { .. } => ApiErrorType::internal(err.to_string()),
        DbError::ForeignKeyViolation | DbError::Poisoned | DbError::Sqlite(_) => {
            ApiErrorType::internal(format!("Failed to {action}: {err}"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::TxStage;

    fn unique(table: &str, columns: &[&str]) -> DbError {
        DbError::UniqueViolation {
            table: table.to_string(),
            columns: columns.iter().map(|c| c.to_string()).collect(),
        }
    }

    #[test]
    fn test_student_duplicates_are_specific() {
        let by_id = translate(Resource::Student, "create student", &unique("students", &["student_id"]));
        assert_eq!(by_id.kind, ErrorKind::Conflict);
        assert_eq!(by_id.message, "A student with this student ID already exists");

        let by_email = translate(Resource::Student, "create student", &unique("students", &["email"]));
        assert_eq!(by_email.message, "A student with this email already exists");

        let unknown = translate(Resource::Student, "create student", &unique("", &[]));
        assert_eq!(unknown.kind, ErrorKind::Conflict);
        assert_eq!(unknown.message, "A duplicate entry exists");
    }

    #[test]
    fn test_other_duplicates() {
        let cases = [
            (Resource::Teacher, unique("teachers", &["email"]), "A teacher with this email already exists"),
            (Resource::Subject, unique("subjects", &["code"]), "A subject with this code already exists"),
            (
                Resource::Classroom,
                unique("classrooms", &["building", "room_number"]),
                "A classroom with this building and room number already exists",
            ),
            (
                Resource::Section,
                unique("sections", &["subject_id", "section_code"]),
                "A section with this subject and section code already exists",
            ),
            (
                Resource::Enrollment,
                unique("enrollments", &["student_id", "section_id"]),
                "Student is already enrolled in this section",
            ),
        ];

        for (resource, err, expected) in cases {
            let translated = translate(resource, "create", &err);
            assert_eq!(translated.kind, ErrorKind::Conflict);
            assert_eq!(translated.message, expected);
        }
    }

    #[test]
    fn test_trigger_rejections_are_conflicts() {
        let full = translate(
            Resource::Enrollment,
            "enroll student",
            &DbError::Rejected(TriggerRejection::SectionFull),
        );
        assert_eq!(full, ApiErrorType::conflict("Section is full"));

        let clash = translate(
            Resource::Enrollment,
            "enroll student",
            &DbError::Rejected(TriggerRejection::ScheduleConflict),
        );
        assert_eq!(clash, ApiErrorType::conflict("Schedule conflict detected"));
    }

    #[test]
    fn test_check_violation_is_client_error() {
        let err = DbError::CheckViolation("duration_minutes IN (50, 80)".to_string());
        let translated = translate(Resource::Section, "create section", &err);
        assert_eq!(translated.kind, ErrorKind::ConstraintViolation);
        assert_eq!(translated.status(), axum::http::StatusCode::BAD_REQUEST);
        assert!(translated.message.starts_with("Section details violate constraints"));
    }

    #[test]
    fn test_not_found_messages() {
        assert_eq!(
            translate(Resource::Student, "fetch student", &DbError::NotFound),
            ApiErrorType::not_found("Student not found")
        );
        assert_eq!(
            translate(Resource::Enrollment, "drop section", &DbError::NotFound),
            ApiErrorType::not_found("Enrollment not found")
        );
    }

    #[test]
    fn test_everything_else_is_internal_with_detail() {
        let fk = translate(Resource::Enrollment, "enroll student", &DbError::ForeignKeyViolation);
        assert_eq!(fk.kind, ErrorKind::Internal);
        assert_eq!(fk.message, "Failed to enroll student: FOREIGN KEY constraint failed");

        let poisoned = translate(Resource::Teacher, "fetch teachers", &DbError::Poisoned);
        assert_eq!(poisoned.kind, ErrorKind::Internal);
        assert!(poisoned.message.starts_with("Failed to fetch teachers: "));

        let day = translate(
            Resource::Section,
            "create section",
            &DbError::Transaction {
                stage: TxStage::AddDay,
                source: rusqlite::Error::InvalidQuery,
            },
        );
        assert_eq!(day.kind, ErrorKind::Internal);
        assert!(day.message.starts_with("Failed to add section day: "));
    }
}
