use rusqlite::Row;

use super::{CreateSubjectRequest, DbResult, RegistrarDb, Subject};

const SUBJECT_COLUMNS: &str = "id, code, name, description, created_at, updated_at";

fn subject_from_row(row: &Row<'_>) -> rusqlite::Result<Subject> {
    Ok(Subject {
        id: row.get(0)?,
        code: row.get(1)?,
        name: row.get(2)?,
        description: row.get(3)?,
        created_at: row.get(4)?,
        updated_at: row.get(5)?,
    })
}

impl RegistrarDb {
    /// Gets all subjects ordered by code
    pub fn list_subjects(&self) -> DbResult<Vec<Subject>> {
        let db = self.conn()?;
        let mut stmt = db.prepare(&format!("SELECT {SUBJECT_COLUMNS} FROM subjects ORDER BY code"))?;

        let subjects = stmt
            .query_map([], subject_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(subjects)
    }

    pub fn get_subject(&self, id: i64) -> DbResult<Subject> {
        let db = self.conn()?;
        let subject = db.query_row(
            &format!("SELECT {SUBJECT_COLUMNS} FROM subjects WHERE id = ?1"),
            [id],
            subject_from_row,
        )?;

        Ok(subject)
    }

    pub fn create_subject(&self, req: &CreateSubjectRequest) -> DbResult<Subject> {
        let db = self.conn()?;
        let subject = db.query_row(
            &format!(
                "INSERT INTO subjects (code, name, description)
                 VALUES (?1, ?2, ?3)
                 RETURNING {SUBJECT_COLUMNS}"
            ),
            (&req.code, &req.name, &req.description),
            subject_from_row,
        )?;

        Ok(subject)
    }
}
