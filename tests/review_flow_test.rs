use anyhow::Result;
use chrono::{Duration, Utc};
use std::sync::Arc;
use tempfile::tempdir;
use uuid::Uuid;

use courseboard::domain::{Course, Review, Role, User, VisitLog};
use courseboard::reviews::{ReviewAggregator, SortPolicy};
use courseboard::storage::{SqliteStorage, Storage};

async fn open_storage(dir: &std::path::Path) -> Result<Arc<SqliteStorage>> {
    Ok(Arc::new(SqliteStorage::open(dir.join("test.db"))?))
}

async fn seed_course(storage: &dyn Storage) -> Result<Uuid> {
    let mut course = Course {
        id: None,
        name: "Web Programming".to_string(),
        short_desc: "Forms, sessions, and reviews".to_string(),
        full_desc: None,
        author_id: None,
        rating_sum: 0,
        rating_num: 0,
        created_at: Utc::now(),
    };
    storage.create_course(&mut course).await?;
    Ok(course.id.unwrap())
}

#[tokio::test]
async fn add_reviews_then_recompute_reconciles_the_aggregate() -> Result<()> {
    let temp_dir = tempdir()?;
    let storage = open_storage(temp_dir.path()).await?;
    let aggregator = ReviewAggregator::new(storage.clone());

    let course_id = seed_course(storage.as_ref()).await?;

    aggregator
        .add_review(Uuid::new_v4(), course_id, 5, "excellent")
        .await?;
    aggregator
        .add_review(Uuid::new_v4(), course_id, 3, "decent")
        .await?;

    aggregator.recompute_course_rating(course_id).await?;

    let course = storage.get_course_by_id(course_id).await?.unwrap();
    assert_eq!(course.rating_sum, 8);
    assert_eq!(course.rating_num, 2);
    assert_eq!(course.rating(), 4.0);

    // Idempotent: a second recompute with no new reviews stores the same values
    aggregator.recompute_course_rating(course_id).await?;
    let course = storage.get_course_by_id(course_id).await?.unwrap();
    assert_eq!(course.rating_sum, 8);
    assert_eq!(course.rating_num, 2);

    Ok(())
}

#[tokio::test]
async fn sorting_and_pagination_over_the_sqlite_store() -> Result<()> {
    let temp_dir = tempdir()?;
    let storage = open_storage(temp_dir.path()).await?;
    let aggregator = ReviewAggregator::new(storage.clone());

    let course_id = seed_course(storage.as_ref()).await?;

    // Ratings [5, 2, 4] added in that order, one second apart
    let base = Utc::now();
    for (i, rating) in [5, 2, 4].into_iter().enumerate() {
        let mut review = Review {
            id: None,
            course_id,
            user_id: Uuid::new_v4(),
            rating,
            text: format!("review {}", i),
            created_at: base + Duration::seconds(i as i64),
        };
        storage.create_review(&mut review).await?;
    }

    let newest = aggregator
        .reviews_for_course(course_id, SortPolicy::Newest, 1, 10)
        .await?;
    let ratings: Vec<i32> = newest.iter().map(|r| r.rating).collect();
    assert_eq!(ratings, vec![4, 2, 5]);

    let positive = aggregator
        .reviews_for_course(course_id, SortPolicy::Positive, 1, 10)
        .await?;
    let ratings: Vec<i32> = positive.iter().map(|r| r.rating).collect();
    assert_eq!(ratings, vec![5, 4, 2]);

    let negative = aggregator
        .reviews_for_course(course_id, SortPolicy::Negative, 1, 10)
        .await?;
    let ratings: Vec<i32> = negative.iter().map(|r| r.rating).collect();
    assert_eq!(ratings, vec![2, 4, 5]);

    // Page 2 of size 2 holds only the last review in order; page 3 is empty
    let page2 = aggregator
        .reviews_for_course(course_id, SortPolicy::Newest, 2, 2)
        .await?;
    assert_eq!(page2.len(), 1);
    assert_eq!(page2[0].rating, 5);

    let page3 = aggregator
        .reviews_for_course(course_id, SortPolicy::Newest, 3, 2)
        .await?;
    assert!(page3.is_empty());

    Ok(())
}

#[tokio::test]
async fn user_review_lookup_finds_only_that_users_review() -> Result<()> {
    let temp_dir = tempdir()?;
    let storage = open_storage(temp_dir.path()).await?;
    let aggregator = ReviewAggregator::new(storage.clone());

    let course_id = seed_course(storage.as_ref()).await?;
    let reviewer = Uuid::new_v4();

    aggregator
        .add_review(reviewer, course_id, 4, "solid")
        .await?;
    aggregator
        .add_review(Uuid::new_v4(), course_id, 1, "not for me")
        .await?;

    let found = aggregator
        .user_review_for_course(reviewer, course_id)
        .await?;
    assert_eq!(found.unwrap().rating, 4);

    let missing = aggregator
        .user_review_for_course(Uuid::new_v4(), course_id)
        .await?;
    assert!(missing.is_none());

    Ok(())
}

#[tokio::test]
async fn users_round_trip_through_sqlite() -> Result<()> {
    let temp_dir = tempdir()?;
    let storage = open_storage(temp_dir.path()).await?;

    let mut user = User {
        id: None,
        login: "ivanov42".to_string(),
        password_hash: "hashed".to_string(),
        surname: Some("Ivanov".to_string()),
        name: "Ivan".to_string(),
        patronymic: None,
        role: Role::User,
        created_at: Utc::now(),
    };
    storage.create_user(&mut user).await?;
    let user_id = user.id.unwrap();

    let by_id = storage.get_user_by_id(user_id).await?.unwrap();
    assert_eq!(by_id.login, "ivanov42");
    assert_eq!(by_id.role, Role::User);

    let by_login = storage.get_user_by_login("ivanov42").await?.unwrap();
    assert_eq!(by_login.id, Some(user_id));

    assert!(storage.get_user_by_login("nobody").await?.is_none());

    Ok(())
}

#[tokio::test]
async fn course_listing_orders_by_creation_with_paging() -> Result<()> {
    let temp_dir = tempdir()?;
    let storage = open_storage(temp_dir.path()).await?;

    let base = Utc::now();
    for (i, name) in ["Databases", "Web Programming", "Networks"]
        .iter()
        .enumerate()
    {
        let mut course = Course {
            id: None,
            name: name.to_string(),
            short_desc: format!("{} basics", name),
            full_desc: None,
            author_id: None,
            rating_sum: 0,
            rating_num: 0,
            created_at: base + Duration::seconds(i as i64),
        };
        storage.create_course(&mut course).await?;
    }

    // Oldest first, in creation order
    let all = storage.get_all_courses(None, None).await?;
    let names: Vec<&str> = all.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["Databases", "Web Programming", "Networks"]);

    let first_page = storage.get_all_courses(Some(2), None).await?;
    assert_eq!(first_page.len(), 2);
    assert_eq!(first_page[0].name, "Databases");

    let second_page = storage.get_all_courses(Some(2), Some(2)).await?;
    assert_eq!(second_page.len(), 1);
    assert_eq!(second_page[0].name, "Networks");

    Ok(())
}

#[tokio::test]
async fn user_listing_orders_by_login() -> Result<()> {
    let temp_dir = tempdir()?;
    let storage = open_storage(temp_dir.path()).await?;

    for (login, role) in [("zykov", Role::User), ("admin", Role::Admin)] {
        let mut user = User {
            id: None,
            login: login.to_string(),
            password_hash: "hashed".to_string(),
            surname: None,
            name: login.to_string(),
            patronymic: None,
            role,
            created_at: Utc::now(),
        };
        storage.create_user(&mut user).await?;
    }

    let users = storage.get_all_users().await?;
    let logins: Vec<&str> = users.iter().map(|u| u.login.as_str()).collect();
    assert_eq!(logins, vec!["admin", "zykov"]);
    assert_eq!(users[0].role, Role::Admin);

    Ok(())
}

#[tokio::test]
async fn visit_logs_list_newest_first_with_paging() -> Result<()> {
    let temp_dir = tempdir()?;
    let storage = open_storage(temp_dir.path()).await?;

    let base = Utc::now();
    for (i, path) in ["/", "/login", "/reports"].iter().enumerate() {
        let mut visit = VisitLog {
            id: None,
            path: path.to_string(),
            user_id: None,
            created_at: base + Duration::seconds(i as i64),
        };
        storage.create_visit_log(&mut visit).await?;
    }

    let first_page = storage.get_visit_logs(Some(2), None).await?;
    assert_eq!(first_page.len(), 2);
    assert_eq!(first_page[0].path, "/reports");
    assert_eq!(first_page[1].path, "/login");

    let second_page = storage.get_visit_logs(Some(2), Some(2)).await?;
    assert_eq!(second_page.len(), 1);
    assert_eq!(second_page[0].path, "/");

    Ok(())
}
