use std::sync::Arc;

use crate::application::comment_service::CommentService;
use crate::application::feed_service::FeedService;
use crate::application::interaction_service::InteractionService;
use crate::application::post_service::PostService;
use crate::data::repositories::local::image_store::LocalImageStore;
use crate::data::repositories::postgres::comment_repository::PostgresCommentRepository;
use crate::data::repositories::postgres::interaction_repository::PostgresInteractionRepository;
use crate::data::repositories::postgres::post_repository::PostgresPostRepository;
use crate::infrastructure::jwt::JwtService;

pub(crate) mod http;

pub(crate) type AppPostService = PostService<PostgresPostRepository, LocalImageStore>;
pub(crate) type AppFeedService = FeedService<PostgresPostRepository, PostgresInteractionRepository>;
pub(crate) type AppInteractionService =
    InteractionService<PostgresPostRepository, PostgresInteractionRepository>;
pub(crate) type AppCommentService = CommentService<PostgresPostRepository, PostgresCommentRepository>;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) post_service: Arc<AppPostService>,
    pub(crate) feed_service: Arc<AppFeedService>,
    pub(crate) interaction_service: Arc<AppInteractionService>,
    pub(crate) comment_service: Arc<AppCommentService>,
    pub(crate) jwt: Arc<JwtService>,
}

impl AppState {
    pub(crate) fn new(
        post_service: Arc<AppPostService>,
        feed_service: Arc<AppFeedService>,
        interaction_service: Arc<AppInteractionService>,
        comment_service: Arc<AppCommentService>,
        jwt: Arc<JwtService>,
    ) -> Self {
        Self {
            post_service,
            feed_service,
            interaction_service,
            comment_service,
            jwt,
        }
    }
}
