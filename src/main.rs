use clap::{Parser, Subcommand};
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

use courseboard::config::Config;
use courseboard::domain::Course;
use courseboard::logging::init_logging;
use courseboard::reviews::{ReviewAggregator, SortPolicy};
use courseboard::storage::{SqliteStorage, Storage};
use courseboard::validation::phone;

#[derive(Parser)]
#[command(name = "courseboard")]
#[command(about = "Course review and user administration core")]
#[command(version = "0.1.0")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a phone number and print its canonical form
    Phone {
        /// Raw phone field input
        input: String,
    },
    /// Create a course
    AddCourse {
        #[arg(long)]
        name: String,
        #[arg(long)]
        short_desc: String,
    },
    /// Add a review for a course and reconcile its rating
    AddReview {
        #[arg(long)]
        course_id: Uuid,
        #[arg(long)]
        user_id: Uuid,
        #[arg(long)]
        rating: i32,
        #[arg(long)]
        text: String,
    },
    /// List one page of a course's reviews
    Reviews {
        #[arg(long)]
        course_id: Uuid,
        /// Sort policy: newest, positive, negative
        #[arg(long, default_value = "newest")]
        sort: String,
        #[arg(long, default_value_t = 1)]
        page: usize,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _guard = init_logging();

    let cli = Cli::parse();
    let config = Config::load()?;

    match cli.command {
        Commands::Phone { input } => match phone::normalize(&input) {
            Ok(formatted) => println!("{}", formatted),
            Err(reason) => println!("⚠️  {}", reason),
        },
        Commands::AddCourse { name, short_desc } => {
            let storage = SqliteStorage::open(&config.database.path)?;
            let mut course = Course {
                id: None,
                name,
                short_desc,
                full_desc: None,
                author_id: None,
                rating_sum: 0,
                rating_num: 0,
                created_at: chrono::Utc::now(),
            };
            storage.create_course(&mut course).await?;
            info!("Course created");
            println!("Created course {} ({})", course.name, course.id.unwrap());
        }
        Commands::AddReview {
            course_id,
            user_id,
            rating,
            text,
        } => {
            let storage: Arc<dyn Storage> = Arc::new(SqliteStorage::open(&config.database.path)?);
            let aggregator = ReviewAggregator::new(storage.clone());

            let review = aggregator
                .add_review(user_id, course_id, rating, &text)
                .await?;
            aggregator.recompute_course_rating(course_id).await?;

            info!("Review stored and rating reconciled");
            println!("Created review {}", review.id.unwrap());
            if let Some(course) = storage.get_course_by_id(course_id).await? {
                println!(
                    "Course rating: {:.1} ({} reviews)",
                    course.rating(),
                    course.rating_num
                );
            }
        }
        Commands::Reviews {
            course_id,
            sort,
            page,
        } => {
            let storage: Arc<dyn Storage> = Arc::new(SqliteStorage::open(&config.database.path)?);
            let aggregator = ReviewAggregator::new(storage);

            let policy: SortPolicy = sort.parse()?;
            let reviews = aggregator
                .reviews_for_course(course_id, policy, page, config.reviews.page_size)
                .await?;

            if reviews.is_empty() {
                println!("No reviews on page {}", page);
            }
            for review in reviews {
                println!(
                    "[{}] {}: {}",
                    review.rating,
                    review.created_at.format("%Y-%m-%d %H:%M"),
                    review.text
                );
            }
        }
    }

    Ok(())
}
