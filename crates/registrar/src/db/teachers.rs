use rusqlite::Row;

use super::{CreateTeacherRequest, DbResult, RegistrarDb, Teacher};

const TEACHER_COLUMNS: &str = "id, first_name, last_name, email, created_at, updated_at";

fn teacher_from_row(row: &Row<'_>) -> rusqlite::Result<Teacher> {
    Ok(Teacher {
        id: row.get(0)?,
        first_name: row.get(1)?,
        last_name: row.get(2)?,
        email: row.get(3)?,
        created_at: row.get(4)?,
        updated_at: row.get(5)?,
    })
}

impl RegistrarDb {
    /// Gets all teachers ordered by last name, then first name
    pub fn list_teachers(&self) -> DbResult<Vec<Teacher>> {
        let db = self.conn()?;
        let mut stmt = db.prepare(&format!(
            "SELECT {TEACHER_COLUMNS} FROM teachers ORDER BY last_name, first_name, id"
        ))?;

        let teachers = stmt
            .query_map([], teacher_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(teachers)
    }

    pub fn get_teacher(&self, id: i64) -> DbResult<Teacher> {
        let db = self.conn()?;
        let teacher = db.query_row(
            &format!("SELECT {TEACHER_COLUMNS} FROM teachers WHERE id = ?1"),
            [id],
            teacher_from_row,
        )?;

        Ok(teacher)
    }

    pub fn create_teacher(&self, req: &CreateTeacherRequest) -> DbResult<Teacher> {
        let db = self.conn()?;
        let teacher = db.query_row(
            &format!(
                "INSERT INTO teachers (first_name, last_name, email)
                 VALUES (?1, ?2, ?3)
                 RETURNING {TEACHER_COLUMNS}"
            ),
            (&req.first_name, &req.last_name, &req.email),
            teacher_from_row,
        )?;

        Ok(teacher)
    }
}
