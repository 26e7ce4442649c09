use rusqlite::Row;

use super::{DbError, DbResult, Enrollment, EnrollmentRequest, RegistrarDb};

fn enrollment_from_row(row: &Row<'_>) -> rusqlite::Result<Enrollment> {
    Ok(Enrollment {
        id: row.get(0)?,
        student_id: row.get(1)?,
        section_id: row.get(2)?,
        enrollment_date: row.get(3)?,
        created_at: row.get(4)?,
    })
}

impl RegistrarDb {
    /// Enrolls a student in a section.
    ///
    /// Capacity and schedule conflicts are checked by store triggers and
    /// surface as [`DbError::Rejected`].
    pub fn enroll(&self, req: &EnrollmentRequest) -> DbResult<Enrollment> {
        let db = self.conn()?;
        let enrollment = db.query_row(
            "INSERT INTO enrollments (student_id, section_id)
             VALUES (?1, ?2)
             RETURNING id, student_id, section_id, enrollment_date, created_at",
            (req.student_id, req.section_id),
            enrollment_from_row,
        )?;

        Ok(enrollment)
    }

    /// Removes a student from a section. Returns [`DbError::NotFound`] when
    /// the pair was not enrolled.
    pub fn drop_enrollment(&self, student_id: i64, section_id: i64) -> DbResult<()> {
        let db = self.conn()?;
        let affected = db.execute(
            "DELETE FROM enrollments WHERE student_id = ?1 AND section_id = ?2",
            (student_id, section_id),
        )?;

        if affected == 0 {
            return Err(DbError::NotFound);
        }

        Ok(())
    }
}
