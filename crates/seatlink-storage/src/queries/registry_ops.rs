//! Master registry rows: colleges, courses, and course offerings.

use rusqlite::{params, Connection};
use seatlink_core::errors::StorageError;
use seatlink_core::types::{CollegeId, CourseLevel, MasterCollege, MasterCourse, Stream};

use crate::sql_err;

pub fn upsert_college(conn: &Connection, college: &MasterCollege) -> Result<(), StorageError> {
    conn.execute(
        "INSERT INTO master_colleges (id, name, address, state, stream)
         VALUES (?1, ?2, ?3, ?4, ?5)
         ON CONFLICT(id) DO UPDATE SET
             name = excluded.name,
             address = excluded.address,
             state = excluded.state,
             stream = excluded.stream",
        params![
            college.id.as_str(),
            college.name,
            college.address,
            college.state,
            college.stream.name(),
        ],
    )
    .map_err(sql_err)?;
    Ok(())
}

pub fn load_colleges(conn: &Connection) -> Result<Vec<MasterCollege>, StorageError> {
    let mut stmt = conn
        .prepare("SELECT id, name, address, state, stream FROM master_colleges ORDER BY id")
        .map_err(sql_err)?;
    let rows = stmt
        .query_map([], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, String>(3)?,
                row.get::<_, String>(4)?,
            ))
        })
        .map_err(sql_err)?;

    let mut colleges = Vec::new();
    for row in rows {
        let (id, name, address, state, stream) = row.map_err(sql_err)?;
        let stream = Stream::parse(&stream).ok_or_else(|| StorageError::InvalidRow {
            table: "master_colleges".to_string(),
            message: format!("unknown stream '{stream}' for college {id}"),
        })?;
        colleges.push(MasterCollege::new(id, name, address, state, stream));
    }
    Ok(colleges)
}

pub fn upsert_course(conn: &Connection, course: &MasterCourse) -> Result<(), StorageError> {
    conn.execute(
        "INSERT INTO master_courses (id, name, stream, level)
         VALUES (?1, ?2, ?3, ?4)
         ON CONFLICT(id) DO UPDATE SET
             name = excluded.name,
             stream = excluded.stream,
             level = excluded.level",
        params![course.id, course.name, course.stream.name(), course.level.name()],
    )
    .map_err(sql_err)?;
    Ok(())
}

pub fn load_courses(conn: &Connection) -> Result<Vec<MasterCourse>, StorageError> {
    let mut stmt = conn
        .prepare("SELECT id, name, stream, level FROM master_courses ORDER BY id")
        .map_err(sql_err)?;
    let rows = stmt
        .query_map([], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, String>(3)?,
            ))
        })
        .map_err(sql_err)?;

    let mut courses = Vec::new();
    for row in rows {
        let (id, name, stream, level) = row.map_err(sql_err)?;
        let stream = Stream::parse(&stream).ok_or_else(|| StorageError::InvalidRow {
            table: "master_courses".to_string(),
            message: format!("unknown stream '{stream}' for course {id}"),
        })?;
        let level = CourseLevel::parse(&level).ok_or_else(|| StorageError::InvalidRow {
            table: "master_courses".to_string(),
            message: format!("unknown level '{level}' for course {id}"),
        })?;
        courses.push(MasterCourse::new(id, name, stream, level));
    }
    Ok(courses)
}

pub fn insert_offering(
    conn: &Connection,
    college_id: &CollegeId,
    course_name: &str,
) -> Result<(), StorageError> {
    conn.execute(
        "INSERT OR IGNORE INTO college_courses (college_id, course_name) VALUES (?1, ?2)",
        params![college_id.as_str(), course_name],
    )
    .map_err(sql_err)?;
    Ok(())
}

pub fn load_offerings(conn: &Connection) -> Result<Vec<(CollegeId, String)>, StorageError> {
    let mut stmt = conn
        .prepare(
            "SELECT college_id, course_name FROM college_courses
             ORDER BY college_id, course_name",
        )
        .map_err(sql_err)?;
    let rows = stmt
        .query_map([], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
        })
        .map_err(sql_err)?;

    let mut offerings = Vec::new();
    for row in rows {
        let (college_id, course_name) = row.map_err(sql_err)?;
        offerings.push((CollegeId::new(college_id), course_name));
    }
    Ok(offerings)
}
