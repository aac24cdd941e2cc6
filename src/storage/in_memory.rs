use super::traits::Storage;
use crate::common::error::{CourseboardError, Result};
use crate::domain::*;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tracing::debug;
use uuid::Uuid;

/// In-memory storage implementation for development/testing
pub struct InMemoryStorage {
    courses: Arc<Mutex<HashMap<Uuid, Course>>>,
    reviews: Arc<Mutex<HashMap<Uuid, Review>>>,
    users: Arc<Mutex<HashMap<Uuid, User>>>,
    visit_logs: Arc<Mutex<HashMap<Uuid, VisitLog>>>,
}

impl Default for InMemoryStorage {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryStorage {
    pub fn new() -> Self {
        Self {
            courses: Arc::new(Mutex::new(HashMap::new())),
            reviews: Arc::new(Mutex::new(HashMap::new())),
            users: Arc::new(Mutex::new(HashMap::new())),
            visit_logs: Arc::new(Mutex::new(HashMap::new())),
        }
    }
}

#[async_trait]
impl Storage for InMemoryStorage {
    async fn create_course(&self, course: &mut Course) -> Result<()> {
        let id = Uuid::new_v4();
        course.id = Some(id);

        let mut courses = self.courses.lock().unwrap();
        courses.insert(id, course.clone());

        debug!("Created course: {} with id {}", course.name, id);
        Ok(())
    }

    async fn get_course_by_id(&self, course_id: Uuid) -> Result<Option<Course>> {
        let courses = self.courses.lock().unwrap();
        Ok(courses.get(&course_id).cloned())
    }

    async fn update_course(&self, course: &Course) -> Result<()> {
        let course_id = course
            .id
            .ok_or_else(|| CourseboardError::MissingField("course id".to_string()))?;

        let mut courses = self.courses.lock().unwrap();
        courses.insert(course_id, course.clone());

        debug!("Updated course: {} with id {}", course.name, course_id);
        Ok(())
    }

    async fn get_all_courses(
        &self,
        limit: Option<usize>,
        offset: Option<usize>,
    ) -> Result<Vec<Course>> {
        let courses = self.courses.lock().unwrap();
        let mut all: Vec<Course> = courses.values().cloned().collect();
        all.sort_by(|a, b| a.created_at.cmp(&b.created_at));

        let offset = offset.unwrap_or(0);
        let limit = limit.unwrap_or(usize::MAX);
        Ok(all.into_iter().skip(offset).take(limit).collect())
    }

    async fn create_review(&self, review: &mut Review) -> Result<()> {
        let id = Uuid::new_v4();
        review.id = Some(id);

        let mut reviews = self.reviews.lock().unwrap();
        reviews.insert(id, review.clone());

        debug!("Created review {} for course {}", id, review.course_id);
        Ok(())
    }

    async fn get_reviews_by_course(&self, course_id: Uuid) -> Result<Vec<Review>> {
        let reviews = self.reviews.lock().unwrap();
        Ok(reviews
            .values()
            .filter(|r| r.course_id == course_id)
            .cloned()
            .collect())
    }

    async fn get_review_by_user_and_course(
        &self,
        user_id: Uuid,
        course_id: Uuid,
    ) -> Result<Option<Review>> {
        let reviews = self.reviews.lock().unwrap();
        let review = reviews
            .values()
            .find(|r| r.user_id == user_id && r.course_id == course_id)
            .cloned();
        Ok(review)
    }

    async fn create_user(&self, user: &mut User) -> Result<()> {
        let id = Uuid::new_v4();
        user.id = Some(id);

        let mut users = self.users.lock().unwrap();
        users.insert(id, user.clone());

        debug!("Created user: {} with id {}", user.login, id);
        Ok(())
    }

    async fn get_user_by_id(&self, user_id: Uuid) -> Result<Option<User>> {
        let users = self.users.lock().unwrap();
        Ok(users.get(&user_id).cloned())
    }

    async fn get_user_by_login(&self, login: &str) -> Result<Option<User>> {
        let users = self.users.lock().unwrap();
        let user = users.values().find(|u| u.login == login).cloned();
        Ok(user)
    }

    async fn get_all_users(&self) -> Result<Vec<User>> {
        let users = self.users.lock().unwrap();
        let mut all: Vec<User> = users.values().cloned().collect();
        all.sort_by(|a, b| a.login.cmp(&b.login));
        Ok(all)
    }

    async fn create_visit_log(&self, visit: &mut VisitLog) -> Result<()> {
        let id = Uuid::new_v4();
        visit.id = Some(id);

        let mut visit_logs = self.visit_logs.lock().unwrap();
        visit_logs.insert(id, visit.clone());

        debug!("Logged visit to {}", visit.path);
        Ok(())
    }

    async fn get_visit_logs(
        &self,
        limit: Option<usize>,
        offset: Option<usize>,
    ) -> Result<Vec<VisitLog>> {
        let visit_logs = self.visit_logs.lock().unwrap();
        let mut all: Vec<VisitLog> = visit_logs.values().cloned().collect();
        // Newest first, matching the journal view
        all.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        let offset = offset.unwrap_or(0);
        let limit = limit.unwrap_or(usize::MAX);
        Ok(all.into_iter().skip(offset).take(limit).collect())
    }
}
