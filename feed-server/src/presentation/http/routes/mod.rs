use axum::Router;

use crate::presentation::AppState;

pub(crate) mod comments;
pub(crate) mod feeds;
pub(crate) mod posts;
pub(crate) mod users;

pub(crate) fn router(state: AppState) -> Router<AppState> {
    Router::new()
        .nest("/api/feed", feeds::router())
        .nest("/api/posts", posts::router(state.clone()))
        .nest("/api/comments", comments::router(state))
        .nest("/api/users", users::router())
}
