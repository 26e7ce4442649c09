use rusqlite::Row;

use super::{Classroom, CreateClassroomRequest, DbResult, RegistrarDb};

const CLASSROOM_COLUMNS: &str = "id, building, room_number, capacity, created_at, updated_at";

fn classroom_from_row(row: &Row<'_>) -> rusqlite::Result<Classroom> {
    Ok(Classroom {
        id: row.get(0)?,
        building: row.get(1)?,
        room_number: row.get(2)?,
        capacity: row.get(3)?,
        created_at: row.get(4)?,
        updated_at: row.get(5)?,
    })
}

impl RegistrarDb {
    /// Gets all classrooms ordered by building, then room number
    pub fn list_classrooms(&self) -> DbResult<Vec<Classroom>> {
        let db = self.conn()?;
        let mut stmt = db.prepare(&format!(
            "SELECT {CLASSROOM_COLUMNS} FROM classrooms ORDER BY building, room_number"
        ))?;

        let classrooms = stmt
            .query_map([], classroom_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(classrooms)
    }

    pub fn get_classroom(&self, id: i64) -> DbResult<Classroom> {
        let db = self.conn()?;
        let classroom = db.query_row(
            &format!("SELECT {CLASSROOM_COLUMNS} FROM classrooms WHERE id = ?1"),
            [id],
            classroom_from_row,
        )?;

        Ok(classroom)
    }

    pub fn create_classroom(&self, req: &CreateClassroomRequest) -> DbResult<Classroom> {
        let db = self.conn()?;
        let classroom = db.query_row(
            &format!(
                "INSERT INTO classrooms (building, room_number, capacity)
                 VALUES (?1, ?2, ?3)
                 RETURNING {CLASSROOM_COLUMNS}"
            ),
            (&req.building, &req.room_number, req.capacity),
            classroom_from_row,
        )?;

        Ok(classroom)
    }
}

#[cfg(test)]
mod tests {
    use super::super::DbError;
    use super::*;

    #[test]
    fn test_room_is_unique_per_building() {
        let db = RegistrarDb::open_in_memory().unwrap();
        let req = CreateClassroomRequest {
            building: "Science Building".to_string(),
            room_number: "101".to_string(),
            capacity: 40,
        };
        db.create_classroom(&req).unwrap();

        let other_building = CreateClassroomRequest {
            building: "Library".to_string(),
            ..req.clone()
        };
        db.create_classroom(&other_building).unwrap();

        match db.create_classroom(&req).unwrap_err() {
            DbError::UniqueViolation { table, columns } => {
                assert_eq!(table, "classrooms");
                assert_eq!(columns, vec!["building".to_string(), "room_number".to_string()]);
            }
            other => panic!("expected unique violation, got {other:?}"),
        }

        let rooms: Vec<_> = db
            .list_classrooms()
            .unwrap()
            .into_iter()
            .map(|c| c.building)
            .collect();
        assert_eq!(rooms, vec!["Library", "Science Building"]);
    }
}
