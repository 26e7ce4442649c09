/// Database module for the course scheduling store

mod classrooms;
mod enrollments;
mod error;
mod requests;
mod sections;
mod students;
mod subjects;
mod teachers;
mod types;

pub use error::{DbError, TriggerRejection, TxStage, SCHEDULE_CONFLICT_MESSAGE, SECTION_FULL_MESSAGE};
pub use requests::*;
pub use types::*;

use rusqlite::types::Type;
use rusqlite::{Connection, Row};
use std::sync::{Mutex, MutexGuard};
use tracing::info;

const SCHEMA_SQL: &str = include_str!("../../../../sql/init_registrar.sql");

pub type DbResult<T> = Result<T, DbError>;

/// Owns the store connection. Every read goes back to the store; nothing
/// is cached here.
pub struct RegistrarDb {
    db: Mutex<Connection>,
}

impl RegistrarDb {
    /// Opens (or creates) the database at `db_path` and applies the schema.
    pub fn open(db_path: &str) -> DbResult<Self> {
        let conn = Connection::open(db_path)?;
        info!("Opened database at {}", db_path);
        Self::from_connection(conn)
    }

    /// Opens a private in-memory database with the schema applied.
    pub fn open_in_memory() -> DbResult<Self> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> DbResult<Self> {
        conn.execute_batch(SCHEMA_SQL)?;

        Ok(Self {
            db: Mutex::new(conn),
        })
    }

    fn conn(&self) -> DbResult<MutexGuard<'_, Connection>> {
        Ok(self.db.lock()?)
    }
}

/// Reads a comma-joined day aggregate from column `idx`.
fn days_column(row: &Row<'_>, idx: usize) -> rusqlite::Result<Vec<Weekday>> {
    let raw: Option<String> = row.get(idx)?;
    Weekday::parse_list(raw.as_deref())
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    pub(crate) fn slot(start: &str, days: &[Weekday]) -> SectionSlot {
        SectionSlot {
            start_time: parse_start_time(start).unwrap(),
            days: days.to_vec(),
        }
    }

    pub(crate) fn seeded() -> (RegistrarDb, i64, i64, i64) {
        let db = RegistrarDb::open_in_memory().unwrap();
        let teacher = db
            .create_teacher(&CreateTeacherRequest {
                first_name: "Sarah".to_string(),
                last_name: "Johnson".to_string(),
                email: "sarah.johnson@university.edu".to_string(),
            })
            .unwrap();
        let subject = db
            .create_subject(&CreateSubjectRequest {
                code: "CHEM101".to_string(),
                name: "General Chemistry 1".to_string(),
                description: "Introduction to general chemistry principles".to_string(),
            })
            .unwrap();
        let classroom = db
            .create_classroom(&CreateClassroomRequest {
                building: "Science Building".to_string(),
                room_number: "101".to_string(),
                capacity: 40,
            })
            .unwrap();
        (db, subject.id, teacher.id, classroom.id)
    }

    #[test]
    fn test_schema_is_reapplied_without_losing_data() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("university.db");
        let path = path.to_str().unwrap();

        {
            let db = RegistrarDb::open(path).unwrap();
            db.create_teacher(&CreateTeacherRequest {
                first_name: "Michael".to_string(),
                last_name: "Smith".to_string(),
                email: "michael.smith@university.edu".to_string(),
            })
            .unwrap();
        }

        let db = RegistrarDb::open(path).unwrap();
        let teachers = db.list_teachers().unwrap();
        assert_eq!(teachers.len(), 1);
        assert_eq!(teachers[0].email, "michael.smith@university.edu");
    }

    #[test]
    fn test_days_column_handles_null_aggregate() {
        let conn = Connection::open_in_memory().unwrap();
        let days = conn
            .query_row("SELECT NULL", [], |row| days_column(row, 0))
            .unwrap();
        assert!(days.is_empty());

        let err = conn
            .query_row("SELECT 'monday,sunday'", [], |row| days_column(row, 0))
            .unwrap_err();
        assert!(matches!(err, rusqlite::Error::FromSqlConversionFailure(0, _, _)));
    }
}
