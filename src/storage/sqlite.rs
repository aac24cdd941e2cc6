use super::traits::Storage;
use crate::common::error::{CourseboardError, Result};
use crate::domain::*;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, Row};
use std::path::Path;
use std::str::FromStr;
use std::sync::Mutex;
use tracing::debug;
use uuid::Uuid;

/// SQLite-backed storage. The schema is created on open; UUIDs and RFC 3339
/// timestamps are stored as TEXT.
pub struct SqliteStorage {
    conn: Mutex<Connection>,
}

impl SqliteStorage {
    pub fn open<P: AsRef<Path>>(db_path: P) -> Result<Self> {
        if let Some(parent) = db_path.as_ref().parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let conn = Connection::open(db_path)?;
        conn.execute_batch(
            r#"
            PRAGMA journal_mode=WAL;
            CREATE TABLE IF NOT EXISTS courses (
                id          TEXT PRIMARY KEY,
                name        TEXT NOT NULL,
                short_desc  TEXT NOT NULL,
                full_desc   TEXT,
                author_id   TEXT,
                rating_sum  INTEGER NOT NULL DEFAULT 0,
                rating_num  INTEGER NOT NULL DEFAULT 0,
                created_at  TEXT NOT NULL
            );
            CREATE TABLE IF NOT EXISTS reviews (
                id          TEXT PRIMARY KEY,
                course_id   TEXT NOT NULL,
                user_id     TEXT NOT NULL,
                rating      INTEGER NOT NULL,
                text        TEXT NOT NULL,
                created_at  TEXT NOT NULL
            );
            CREATE INDEX IF NOT EXISTS idx_reviews_course ON reviews(course_id);
            CREATE TABLE IF NOT EXISTS users (
                id             TEXT PRIMARY KEY,
                login          TEXT NOT NULL UNIQUE,
                password_hash  TEXT NOT NULL,
                surname        TEXT,
                name           TEXT NOT NULL,
                patronymic     TEXT,
                role           TEXT NOT NULL,
                created_at     TEXT NOT NULL
            );
            CREATE TABLE IF NOT EXISTS visit_logs (
                id          TEXT PRIMARY KEY,
                path        TEXT NOT NULL,
                user_id     TEXT,
                created_at  TEXT NOT NULL
            );
            "#,
        )?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }
}

fn parse_timestamp(s: &str) -> Result<DateTime<Utc>> {
    Ok(DateTime::parse_from_rfc3339(s)?.with_timezone(&Utc))
}

fn parse_uuid(s: &str) -> Result<Uuid> {
    Ok(Uuid::parse_str(s)?)
}

fn course_from_row(row: &Row<'_>) -> Result<Course> {
    let id: String = row.get(0)?;
    let author_id: Option<String> = row.get(4)?;
    let created_at: String = row.get(7)?;
    Ok(Course {
        id: Some(parse_uuid(&id)?),
        name: row.get(1)?,
        short_desc: row.get(2)?,
        full_desc: row.get(3)?,
        author_id: author_id.as_deref().map(parse_uuid).transpose()?,
        rating_sum: row.get(5)?,
        rating_num: row.get(6)?,
        created_at: parse_timestamp(&created_at)?,
    })
}

fn review_from_row(row: &Row<'_>) -> Result<Review> {
    let id: String = row.get(0)?;
    let course_id: String = row.get(1)?;
    let user_id: String = row.get(2)?;
    let created_at: String = row.get(5)?;
    Ok(Review {
        id: Some(parse_uuid(&id)?),
        course_id: parse_uuid(&course_id)?,
        user_id: parse_uuid(&user_id)?,
        rating: row.get(3)?,
        text: row.get(4)?,
        created_at: parse_timestamp(&created_at)?,
    })
}

fn user_from_row(row: &Row<'_>) -> Result<User> {
    let id: String = row.get(0)?;
    let role: String = row.get(6)?;
    let created_at: String = row.get(7)?;
    Ok(User {
        id: Some(parse_uuid(&id)?),
        login: row.get(1)?,
        password_hash: row.get(2)?,
        surname: row.get(3)?,
        name: row.get(4)?,
        patronymic: row.get(5)?,
        role: Role::from_str(&role)?,
        created_at: parse_timestamp(&created_at)?,
    })
}

fn visit_log_from_row(row: &Row<'_>) -> Result<VisitLog> {
    let id: String = row.get(0)?;
    let user_id: Option<String> = row.get(2)?;
    let created_at: String = row.get(3)?;
    Ok(VisitLog {
        id: Some(parse_uuid(&id)?),
        path: row.get(1)?,
        user_id: user_id.as_deref().map(parse_uuid).transpose()?,
        created_at: parse_timestamp(&created_at)?,
    })
}

#[async_trait]
impl Storage for SqliteStorage {
    async fn create_course(&self, course: &mut Course) -> Result<()> {
        let id = Uuid::new_v4();
        course.id = Some(id);

        let conn = self.conn.lock().unwrap();
        conn.execute(
            "INSERT INTO courses (id, name, short_desc, full_desc, author_id, rating_sum, rating_num, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                id.to_string(),
                course.name,
                course.short_desc,
                course.full_desc,
                course.author_id.map(|a| a.to_string()),
                course.rating_sum,
                course.rating_num,
                course.created_at.to_rfc3339(),
            ],
        )?;

        debug!("Created course: {} with id {}", course.name, id);
        Ok(())
    }

    async fn get_course_by_id(&self, course_id: Uuid) -> Result<Option<Course>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(
            "SELECT id, name, short_desc, full_desc, author_id, rating_sum, rating_num, created_at
             FROM courses WHERE id = ?1",
        )?;
        let mut rows = stmt.query(params![course_id.to_string()])?;
        match rows.next()? {
            Some(row) => Ok(Some(course_from_row(row)?)),
            None => Ok(None),
        }
    }

    async fn update_course(&self, course: &Course) -> Result<()> {
        let course_id = course
            .id
            .ok_or_else(|| CourseboardError::MissingField("course id".to_string()))?;

        let conn = self.conn.lock().unwrap();
        conn.execute(
            "UPDATE courses
             SET name = ?2, short_desc = ?3, full_desc = ?4, author_id = ?5,
                 rating_sum = ?6, rating_num = ?7
             WHERE id = ?1",
            params![
                course_id.to_string(),
                course.name,
                course.short_desc,
                course.full_desc,
                course.author_id.map(|a| a.to_string()),
                course.rating_sum,
                course.rating_num,
            ],
        )?;

        debug!("Updated course: {} with id {}", course.name, course_id);
        Ok(())
    }

    async fn get_all_courses(
        &self,
        limit: Option<usize>,
        offset: Option<usize>,
    ) -> Result<Vec<Course>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(
            "SELECT id, name, short_desc, full_desc, author_id, rating_sum, rating_num, created_at
             FROM courses ORDER BY created_at LIMIT ?1 OFFSET ?2",
        )?;
        let mut rows = stmt.query(params![
            limit.map(|l| l as i64).unwrap_or(-1),
            offset.unwrap_or(0) as i64
        ])?;
        let mut courses = Vec::new();
        while let Some(row) = rows.next()? {
            courses.push(course_from_row(row)?);
        }
        Ok(courses)
    }

    async fn create_review(&self, review: &mut Review) -> Result<()> {
        let id = Uuid::new_v4();
        review.id = Some(id);

        let conn = self.conn.lock().unwrap();
        conn.execute(
            "INSERT INTO reviews (id, course_id, user_id, rating, text, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                id.to_string(),
                review.course_id.to_string(),
                review.user_id.to_string(),
                review.rating,
                review.text,
                review.created_at.to_rfc3339(),
            ],
        )?;

        debug!("Created review {} for course {}", id, review.course_id);
        Ok(())
    }

    async fn get_reviews_by_course(&self, course_id: Uuid) -> Result<Vec<Review>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(
            "SELECT id, course_id, user_id, rating, text, created_at
             FROM reviews WHERE course_id = ?1",
        )?;
        let mut rows = stmt.query(params![course_id.to_string()])?;
        let mut reviews = Vec::new();
        while let Some(row) = rows.next()? {
            reviews.push(review_from_row(row)?);
        }
        Ok(reviews)
    }

    async fn get_review_by_user_and_course(
        &self,
        user_id: Uuid,
        course_id: Uuid,
    ) -> Result<Option<Review>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(
            "SELECT id, course_id, user_id, rating, text, created_at
             FROM reviews WHERE user_id = ?1 AND course_id = ?2",
        )?;
        let mut rows = stmt.query(params![user_id.to_string(), course_id.to_string()])?;
        match rows.next()? {
            Some(row) => Ok(Some(review_from_row(row)?)),
            None => Ok(None),
        }
    }

    async fn create_user(&self, user: &mut User) -> Result<()> {
        let id = Uuid::new_v4();
        user.id = Some(id);

        let conn = self.conn.lock().unwrap();
        conn.execute(
            "INSERT INTO users (id, login, password_hash, surname, name, patronymic, role, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                id.to_string(),
                user.login,
                user.password_hash,
                user.surname,
                user.name,
                user.patronymic,
                user.role.as_str(),
                user.created_at.to_rfc3339(),
            ],
        )?;

        debug!("Created user: {} with id {}", user.login, id);
        Ok(())
    }

    async fn get_user_by_id(&self, user_id: Uuid) -> Result<Option<User>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(
            "SELECT id, login, password_hash, surname, name, patronymic, role, created_at
             FROM users WHERE id = ?1",
        )?;
        let mut rows = stmt.query(params![user_id.to_string()])?;
        match rows.next()? {
            Some(row) => Ok(Some(user_from_row(row)?)),
            None => Ok(None),
        }
    }

    async fn get_user_by_login(&self, login: &str) -> Result<Option<User>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(
            "SELECT id, login, password_hash, surname, name, patronymic, role, created_at
             FROM users WHERE login = ?1",
        )?;
        let mut rows = stmt.query(params![login])?;
        match rows.next()? {
            Some(row) => Ok(Some(user_from_row(row)?)),
            None => Ok(None),
        }
    }

    async fn get_all_users(&self) -> Result<Vec<User>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(
            "SELECT id, login, password_hash, surname, name, patronymic, role, created_at
             FROM users ORDER BY login",
        )?;
        let mut rows = stmt.query([])?;
        let mut users = Vec::new();
        while let Some(row) = rows.next()? {
            users.push(user_from_row(row)?);
        }
        Ok(users)
    }

    async fn create_visit_log(&self, visit: &mut VisitLog) -> Result<()> {
        let id = Uuid::new_v4();
        visit.id = Some(id);

        let conn = self.conn.lock().unwrap();
        conn.execute(
            "INSERT INTO visit_logs (id, path, user_id, created_at) VALUES (?1, ?2, ?3, ?4)",
            params![
                id.to_string(),
                visit.path,
                visit.user_id.map(|u| u.to_string()),
                visit.created_at.to_rfc3339(),
            ],
        )?;

        debug!("Logged visit to {}", visit.path);
        Ok(())
    }

    async fn get_visit_logs(
        &self,
        limit: Option<usize>,
        offset: Option<usize>,
    ) -> Result<Vec<VisitLog>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(
            "SELECT id, path, user_id, created_at
             FROM visit_logs ORDER BY created_at DESC LIMIT ?1 OFFSET ?2",
        )?;
        let mut rows = stmt.query(params![
            limit.map(|l| l as i64).unwrap_or(-1),
            offset.unwrap_or(0) as i64
        ])?;
        let mut visits = Vec::new();
        while let Some(row) = rows.next()? {
            visits.push(visit_log_from_row(row)?);
        }
        Ok(visits)
    }
}
