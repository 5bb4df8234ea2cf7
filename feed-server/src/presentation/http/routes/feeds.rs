use axum::{Router, routing::get};

use crate::presentation::AppState;
use crate::presentation::http::handlers::feeds::{list_most_liked, list_most_saved, list_trending};

pub(crate) fn router() -> Router<AppState> {
    Router::new()
        .route("/trending", get(list_trending))
        .route("/most-liked", get(list_most_liked))
        .route("/most-saved", get(list_most_saved))
}
