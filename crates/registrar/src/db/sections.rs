//! Sections and their meeting days.
//!
//! A section row and its `section_days` rows are written in one transaction,
//! so a reader sees either the full day set or no section at all.

use rusqlite::{params, Row};
use tracing::debug;

use super::{
    days_column, CreateSectionRequest, DbError, DbResult, RegistrarDb, Section, SectionSlot, TxStage, Weekday,
};

const SECTION_SELECT: &str = "SELECT
        s.id, s.subject_id, s.teacher_id, s.classroom_id, s.section_code,
        s.start_time, s.duration_minutes, s.max_enrollment, s.current_enrollment,
        s.created_at, s.updated_at, d.days
    FROM sections s
    LEFT JOIN section_days_view d ON d.section_id = s.id";

const SECTION_INSERT: &str = "INSERT INTO sections (
        subject_id, teacher_id, classroom_id, section_code,
        start_time, duration_minutes, max_enrollment
    ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
    RETURNING id, subject_id, teacher_id, classroom_id, section_code,
        start_time, duration_minutes, max_enrollment, current_enrollment,
        created_at, updated_at";

fn section_from_row(row: &Row<'_>, days: Vec<Weekday>) -> rusqlite::Result<Section> {
    Ok(Section {
        id: row.get(0)?,
        subject_id: row.get(1)?,
        teacher_id: row.get(2)?,
        classroom_id: row.get(3)?,
        section_code: row.get(4)?,
        start_time: row.get(5)?,
        duration_minutes: row.get(6)?,
        max_enrollment: row.get(7)?,
        current_enrollment: row.get(8)?,
        days,
        created_at: row.get(9)?,
        updated_at: row.get(10)?,
    })
}

fn section_with_days(row: &Row<'_>) -> rusqlite::Result<Section> {
    let days = days_column(row, 11)?;
    section_from_row(row, days)
}

impl RegistrarDb {
    /// Gets all sections ordered by id, each with its days Monday first
    pub fn list_sections(&self) -> DbResult<Vec<Section>> {
        let db = self.conn()?;
        let mut stmt = db.prepare(&format!("{SECTION_SELECT} ORDER BY s.id"))?;

        let sections = stmt
            .query_map([], section_with_days)?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(sections)
    }

    pub fn get_section(&self, id: i64) -> DbResult<Section> {
        let db = self.conn()?;
        let section = db.query_row(&format!("{SECTION_SELECT} WHERE s.id = ?1"), [id], section_with_days)?;

        Ok(section)
    }

    /// Creates a section and its meeting days atomically.
    ///
    /// The start time and days come from `slot` (the request's own
    /// `start_time` and `days` strings are not consulted); the days are echoed
    /// back in the order given.
    pub fn create_section(&self, req: &CreateSectionRequest, slot: &SectionSlot) -> DbResult<Section> {
        let mut db = self.conn()?;
        let tx = db.transaction().map_err(DbError::transaction(TxStage::Begin))?;

        // Errors here are classified (unique, check, foreign key); dropping
        // `tx` on the way out rolls back.
        let mut section = tx.query_row(
            SECTION_INSERT,
            params![
                req.subject_id,
                req.teacher_id,
                req.classroom_id,
                req.section_code,
                slot.start_time.format("%H:%M:%S").to_string(),
                req.duration_minutes,
                req.max_enrollment,
            ],
            |row| section_from_row(row, Vec::new()),
        )?;

        for day in &slot.days {
            tx.execute(
                "INSERT INTO section_days (section_id, day) VALUES (?1, ?2)",
                params![section.id, day.as_str()],
            )
            .map_err(DbError::transaction(TxStage::AddDay))?;
        }

        tx.commit().map_err(DbError::transaction(TxStage::Commit))?;
        debug!("Committed section {} with {} days", section.id, slot.days.len());

        section.days = slot.days.clone();
        Ok(section)
    }
}

#[cfg(test)]
mod tests {
    use super::super::tests::{seeded, slot};
    use super::*;

    fn request(subject_id: i64, teacher_id: i64, classroom_id: i64) -> CreateSectionRequest {
        CreateSectionRequest {
            subject_id,
            teacher_id,
            classroom_id,
            section_code: "001".to_string(),
            start_time: "08:00:00".to_string(),
            duration_minutes: 50,
            max_enrollment: 30,
            days: vec![],
        }
    }

    #[test]
    fn test_created_section_echoes_requested_day_order() {
        let (db, subject, teacher, classroom) = seeded();
        let days = [Weekday::Friday, Weekday::Monday, Weekday::Wednesday];

        let created = db
            .create_section(&request(subject, teacher, classroom), &slot("8:05", &days))
            .unwrap();
        assert!(created.id > 0);
        assert_eq!(created.days, days.to_vec());
        assert_eq!(created.current_enrollment, 0);
        assert_eq!(created.start_time, "08:05:00");

        let fetched = db.get_section(created.id).unwrap();
        assert_eq!(
            fetched.days,
            vec![Weekday::Monday, Weekday::Wednesday, Weekday::Friday]
        );
        assert_eq!(fetched.created_at, created.created_at);
    }

    #[test]
    fn test_failed_day_insert_rolls_back_section() {
        let (db, subject, teacher, classroom) = seeded();

        // The second Monday collides with the (section_id, day) key.
        let err = db
            .create_section(
                &request(subject, teacher, classroom),
                &slot("08:00", &[Weekday::Monday, Weekday::Monday]),
            )
            .unwrap_err();
        assert!(matches!(
            err,
            DbError::Transaction {
                stage: TxStage::AddDay,
                ..
            }
        ));

        assert!(db.list_sections().unwrap().is_empty());

        // The same section can then be created cleanly.
        let created = db
            .create_section(&request(subject, teacher, classroom), &slot("08:00", &[Weekday::Monday]))
            .unwrap();
        assert_eq!(db.list_sections().unwrap(), vec![created]);
    }

    #[test]
    fn test_section_constraints_are_classified() {
        let (db, subject, teacher, classroom) = seeded();
        db.create_section(&request(subject, teacher, classroom), &slot("08:00", &[Weekday::Tuesday]))
            .unwrap();

        let duplicate = db
            .create_section(&request(subject, teacher, classroom), &slot("10:00", &[Weekday::Thursday]))
            .unwrap_err();
        assert!(matches!(duplicate, DbError::UniqueViolation { ref table, .. } if table == "sections"));

        let bad_duration = CreateSectionRequest {
            section_code: "003".to_string(),
            duration_minutes: 45,
            ..request(subject, teacher, classroom)
        };
        assert!(matches!(
            db.create_section(&bad_duration, &slot("08:00", &[Weekday::Monday])).unwrap_err(),
            DbError::CheckViolation(_)
        ));

        let missing_subject = CreateSectionRequest {
            section_code: "004".to_string(),
            ..request(subject + 100, teacher, classroom)
        };
        assert!(matches!(
            db.create_section(&missing_subject, &slot("08:00", &[Weekday::Monday])).unwrap_err(),
            DbError::ForeignKeyViolation
        ));

        assert_eq!(db.list_sections().unwrap().len(), 1);
    }

    #[test]
    fn test_section_must_end_by_midnight() {
        let (db, subject, teacher, classroom) = seeded();
        let late = CreateSectionRequest {
            duration_minutes: 80,
            ..request(subject, teacher, classroom)
        };

        assert!(matches!(
            db.create_section(&late, &slot("23:30", &[Weekday::Monday])).unwrap_err(),
            DbError::CheckViolation(_)
        ));

        // Ending exactly at midnight is allowed.
        let created = db.create_section(&late, &slot("22:40", &[Weekday::Monday])).unwrap();
        assert_eq!(created.start_time, "22:40:00");
        assert_eq!(db.list_sections().unwrap().len(), 1);
    }
}
