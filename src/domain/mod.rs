use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::common::error::CourseboardError;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Course {
    pub id: Option<Uuid>,
    pub name: String,
    pub short_desc: String,
    pub full_desc: Option<String>,
    pub author_id: Option<Uuid>,
    pub rating_sum: i64,
    pub rating_num: i64,
    pub created_at: DateTime<Utc>,
}

impl Course {
    /// Mean rating derived from the cached sum/count. Zero when the course
    /// has no reviews.
    pub fn rating(&self) -> f64 {
        if self.rating_num > 0 {
            self.rating_sum as f64 / self.rating_num as f64
        } else {
            0.0
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Review {
    pub id: Option<Uuid>,
    pub course_id: Uuid,
    pub user_id: Uuid,
    pub rating: i32,
    pub text: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    User,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::User => "user",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = CourseboardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(Role::Admin),
            "user" => Ok(Role::User),
            other => Err(CourseboardError::InvalidParameter(format!(
                "unknown role: {}",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Option<Uuid>,
    pub login: String,
    pub password_hash: String,
    pub surname: Option<String>,
    pub name: String,
    pub patronymic: Option<String>,
    pub role: Role,
    pub created_at: DateTime<Utc>,
}

/// One recorded page visit. `user_id` is absent for anonymous requests.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VisitLog {
    pub id: Option<Uuid>,
    pub path: String,
    pub user_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}
