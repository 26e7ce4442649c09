//! Student rows and the per-student schedule projection.

use rusqlite::Row;

use super::{days_column, CreateStudentRequest, DbResult, RegistrarDb, ScheduleItem, ScheduleOrder, Student};

const STUDENT_COLUMNS: &str = "id, student_id, first_name, last_name, email, created_at, updated_at";

fn student_from_row(row: &Row<'_>) -> rusqlite::Result<Student> {
    Ok(Student {
        id: row.get(0)?,
        student_id: row.get(1)?,
        first_name: row.get(2)?,
        last_name: row.get(3)?,
        email: row.get(4)?,
        created_at: row.get(5)?,
        updated_at: row.get(6)?,
    })
}

fn schedule_item_from_row(row: &Row<'_>) -> rusqlite::Result<ScheduleItem> {
    Ok(ScheduleItem {
        section_id: row.get(0)?,
        subject_code: row.get(1)?,
        subject_name: row.get(2)?,
        section_code: row.get(3)?,
        teacher_first_name: row.get(4)?,
        teacher_last_name: row.get(5)?,
        building: row.get(6)?,
        room_number: row.get(7)?,
        start_time: row.get(8)?,
        end_time: row.get(9)?,
        duration_minutes: row.get(10)?,
        days: days_column(row, 11)?,
    })
}

impl RegistrarDb {
    /// Gets all students ordered by last name, then first name
    pub fn list_students(&self) -> DbResult<Vec<Student>> {
        let db = self.conn()?;
        let mut stmt = db.prepare(&format!(
            "SELECT {STUDENT_COLUMNS} FROM students ORDER BY last_name, first_name, id"
        ))?;

        let students = stmt
            .query_map([], student_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(students)
    }

    pub fn get_student(&self, id: i64) -> DbResult<Student> {
        let db = self.conn()?;
        let student = db.query_row(
            &format!("SELECT {STUDENT_COLUMNS} FROM students WHERE id = ?1"),
            [id],
            student_from_row,
        )?;

        Ok(student)
    }

    pub fn create_student(&self, req: &CreateStudentRequest) -> DbResult<Student> {
        let db = self.conn()?;
        let student = db.query_row(
            &format!(
                "INSERT INTO students (student_id, first_name, last_name, email)
                 VALUES (?1, ?2, ?3, ?4)
                 RETURNING {STUDENT_COLUMNS}"
            ),
            (&req.student_id, &req.first_name, &req.last_name, &req.email),
            student_from_row,
        )?;

        Ok(student)
    }

    /// Gets the sections a student is enrolled in. A student without
    /// enrollments (or an unknown student) has an empty schedule.
    pub fn student_schedule(&self, student_id: i64, order: ScheduleOrder) -> DbResult<Vec<ScheduleItem>> {
        let order_by = match order {
            ScheduleOrder::Listing => "subject_code, section_code",
            ScheduleOrder::Export => "first_day, start_time, subject_code",
        };

        let db = self.conn()?;
        let mut stmt = db.prepare(&format!(
            "SELECT section_id, subject_code, subject_name, section_code,
                    teacher_first_name, teacher_last_name, building, room_number,
                    start_time, end_time, duration_minutes, days
             FROM student_schedule_view
             WHERE student_id = ?1
             ORDER BY {order_by}"
        ))?;

        let items = stmt
            .query_map([student_id], schedule_item_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(items)
    }
}
