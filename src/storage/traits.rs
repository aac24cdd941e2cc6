use crate::common::error::Result;
use crate::domain::*;
use async_trait::async_trait;
use uuid::Uuid;

/// Storage trait for persisting domain data (courses, reviews, users, and visit logs)
#[async_trait]
pub trait Storage: Send + Sync {
    // Course operations
    async fn create_course(&self, course: &mut Course) -> Result<()>;
    async fn get_course_by_id(&self, course_id: Uuid) -> Result<Option<Course>>;
    async fn update_course(&self, course: &Course) -> Result<()>;
    async fn get_all_courses(
        &self,
        limit: Option<usize>,
        offset: Option<usize>,
    ) -> Result<Vec<Course>>;

    // Review operations
    async fn create_review(&self, review: &mut Review) -> Result<()>;
    async fn get_reviews_by_course(&self, course_id: Uuid) -> Result<Vec<Review>>;
    async fn get_review_by_user_and_course(
        &self,
        user_id: Uuid,
        course_id: Uuid,
    ) -> Result<Option<Review>>;

    // User operations
    async fn create_user(&self, user: &mut User) -> Result<()>;
    async fn get_user_by_id(&self, user_id: Uuid) -> Result<Option<User>>;
    async fn get_user_by_login(&self, login: &str) -> Result<Option<User>>;
    async fn get_all_users(&self) -> Result<Vec<User>>;

    // Visit log operations
    async fn create_visit_log(&self, visit: &mut VisitLog) -> Result<()>;
    async fn get_visit_logs(
        &self,
        limit: Option<usize>,
        offset: Option<usize>,
    ) -> Result<Vec<VisitLog>>;
}
