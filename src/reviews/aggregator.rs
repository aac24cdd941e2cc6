use std::str::FromStr;
use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::common::error::{CourseboardError, Result};
use crate::domain::Review;
use crate::storage::Storage;

/// Ordering applied to a course's reviews before pagination.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortPolicy {
    /// Most recent first.
    #[default]
    Newest,
    /// Highest rating first, newest first within a rating.
    Positive,
    /// Lowest rating first, newest first within a rating.
    Negative,
}

impl FromStr for SortPolicy {
    type Err = CourseboardError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "newest" => Ok(SortPolicy::Newest),
            "positive" => Ok(SortPolicy::Positive),
            "negative" => Ok(SortPolicy::Negative),
            other => Err(CourseboardError::InvalidParameter(format!(
                "unknown sort policy: {}",
                other
            ))),
        }
    }
}

/// Orders reviews by the given policy. The sort is stable, so reviews with
/// identical keys keep their incoming order.
pub fn sort_reviews(mut reviews: Vec<Review>, policy: SortPolicy) -> Vec<Review> {
    match policy {
        SortPolicy::Newest => reviews.sort_by(|a, b| b.created_at.cmp(&a.created_at)),
        SortPolicy::Positive => reviews.sort_by(|a, b| {
            b.rating
                .cmp(&a.rating)
                .then_with(|| b.created_at.cmp(&a.created_at))
        }),
        SortPolicy::Negative => reviews.sort_by(|a, b| {
            a.rating
                .cmp(&b.rating)
                .then_with(|| b.created_at.cmp(&a.created_at))
        }),
    }
    reviews
}

/// Returns the 1-based `page` of size `page_size`. Pages past the end come
/// back empty rather than erroring.
pub fn paginate(reviews: Vec<Review>, page: usize, page_size: usize) -> Vec<Review> {
    let start = page.saturating_sub(1).saturating_mul(page_size);
    reviews.into_iter().skip(start).take(page_size).collect()
}

/// Review operations over a storage backend: inserting reviews and keeping a
/// course's cached rating sum/count reconciled with its review set.
pub struct ReviewAggregator {
    storage: Arc<dyn Storage>,
}

impl ReviewAggregator {
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self { storage }
    }

    /// Persists a new review with a fresh id and the current timestamp.
    ///
    /// The course aggregate is left untouched; callers run
    /// [`recompute_course_rating`](Self::recompute_course_rating) when they
    /// want the cached rating reconciled, which lets them batch writes.
    pub async fn add_review(
        &self,
        user_id: Uuid,
        course_id: Uuid,
        rating: i32,
        text: &str,
    ) -> Result<Review> {
        let mut review = Review {
            id: None,
            course_id,
            user_id,
            rating,
            text: text.to_string(),
            created_at: Utc::now(),
        };
        self.storage.create_review(&mut review).await?;
        debug!(
            "Added review for course {} by user {} with rating {}",
            course_id, user_id, rating
        );
        Ok(review)
    }

    /// Recomputes `rating_sum`/`rating_num` from the full review set and
    /// persists the course. A full reconciliation rather than an increment,
    /// so repeated calls with no intervening writes store the same values.
    pub async fn recompute_course_rating(&self, course_id: Uuid) -> Result<()> {
        let reviews = self.storage.get_reviews_by_course(course_id).await?;
        let rating_sum: i64 = reviews.iter().map(|r| r.rating as i64).sum();
        let rating_num = reviews.len() as i64;

        let Some(mut course) = self.storage.get_course_by_id(course_id).await? else {
            warn!("Skipping rating recompute for unknown course {}", course_id);
            return Ok(());
        };
        course.rating_sum = rating_sum;
        course.rating_num = rating_num;
        self.storage.update_course(&course).await?;

        debug!(
            "Recomputed rating for course {}: sum={} num={}",
            course_id, rating_sum, rating_num
        );
        Ok(())
    }

    /// One page of a course's reviews under the given sort policy.
    pub async fn reviews_for_course(
        &self,
        course_id: Uuid,
        policy: SortPolicy,
        page: usize,
        page_size: usize,
    ) -> Result<Vec<Review>> {
        let reviews = self.storage.get_reviews_by_course(course_id).await?;
        Ok(paginate(sort_reviews(reviews, policy), page, page_size))
    }

    /// The review a user left on a course, if any. One review per user per
    /// course is a convention rather than a stored constraint, so callers
    /// use this to decide whether to offer the review form.
    pub async fn user_review_for_course(
        &self,
        user_id: Uuid,
        course_id: Uuid,
    ) -> Result<Option<Review>> {
        self.storage
            .get_review_by_user_and_course(user_id, course_id)
            .await
    }
}
