use axum::{Router, routing::get};

use crate::presentation::AppState;
use crate::presentation::http::handlers::feeds::{
    list_author_posts, list_liked_posts, list_saved_posts,
};

pub(crate) fn router() -> Router<AppState> {
    Router::new()
        .route("/{id}/posts", get(list_author_posts))
        .route("/{id}/liked-posts", get(list_liked_posts))
        .route("/{id}/saved-posts", get(list_saved_posts))
}
