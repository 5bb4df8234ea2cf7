use std::sync::Arc;

use anyhow::Result;
use tracing::info;

mod application;
mod data;
mod domain;
mod infrastructure;
mod presentation;
mod server;

use application::comment_service::CommentService;
use application::feed_service::FeedService;
use application::interaction_service::InteractionService;
use application::post_service::PostService;
use data::repositories::local::image_store::LocalImageStore;
use data::repositories::postgres::comment_repository::PostgresCommentRepository;
use data::repositories::postgres::interaction_repository::PostgresInteractionRepository;
use data::repositories::postgres::post_repository::PostgresPostRepository;
use infrastructure::database::{create_pool, run_migrations};
use infrastructure::jwt::JwtService;
use infrastructure::logging::init_logging;
use infrastructure::settings::Settings;
use presentation::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let settings = Settings::from_env()?;

    init_logging(&settings.log_level)?;

    let pool = create_pool(&settings.database_url, settings.database_max_connections).await?;
    run_migrations(&pool).await?;

    let posts = PostgresPostRepository::new(pool.clone());
    let interactions = PostgresInteractionRepository::new(pool.clone());
    let comments = PostgresCommentRepository::new(pool);
    let images = LocalImageStore::new(&settings.image_storage_dir);

    let state = AppState::new(
        Arc::new(PostService::new(posts.clone(), images)),
        Arc::new(FeedService::new(
            posts.clone(),
            interactions.clone(),
            settings.feed_config(),
        )),
        Arc::new(InteractionService::new(posts.clone(), interactions)),
        Arc::new(CommentService::new(posts, comments)),
        Arc::new(JwtService::new(&settings.jwt_secret)),
    );

    info!(
        trending_window_days = settings.trending_window_days,
        image_storage_dir = %settings.image_storage_dir,
        "feed server configured"
    );
    server::run_http(&settings, state).await
}
