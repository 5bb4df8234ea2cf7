use axum::Router;
use axum::middleware;
use axum::routing::{get, post, put};

use crate::presentation::AppState;
use crate::presentation::http::handlers::comments::{add_comment, list_comments};
use crate::presentation::http::handlers::feeds::list_recent_posts;
use crate::presentation::http::handlers::interactions::{
    interaction_status, like_post, liked_users, post_counts, save_post, unlike_post, unsave_post,
};
use crate::presentation::http::handlers::posts::{create_post, delete_post, get_post, update_post};
use crate::presentation::http::middleware::auth::jwt_auth_middleware;

pub(crate) fn router(state: AppState) -> Router<AppState> {
    let public = Router::new()
        .route("/", get(list_recent_posts))
        .route("/{id}", get(get_post))
        .route("/{id}/counts", get(post_counts))
        .route("/{id}/likes", get(liked_users))
        .route("/{id}/comments", get(list_comments));

    let protected = Router::new()
        .route("/", post(create_post))
        .route("/{id}", put(update_post).delete(delete_post))
        .route("/{id}/like", put(like_post).delete(unlike_post))
        .route("/{id}/save", put(save_post).delete(unsave_post))
        .route("/{id}/interaction", get(interaction_status))
        .route("/{id}/comments", post(add_comment))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            jwt_auth_middleware,
        ));

    public.merge(protected)
}
