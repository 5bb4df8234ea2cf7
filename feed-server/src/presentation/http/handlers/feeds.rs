use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::interactions::CountsDto;
use super::posts::PostDto;
use crate::application::feed_service::{FeedPage, PostView};
use crate::presentation::AppState;
use crate::presentation::http::app_error::AppResult;

/// Параметры страницы. Пустой `cursor` означает первую страницу, `limit`
/// проверяется сервисом против настроенного максимума.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub(crate) struct FeedQuery {
    pub(crate) cursor: Option<String>,
    pub(crate) limit: Option<u32>,
}

/// Пост и его счётчики одним плоским объектом.
#[derive(Debug, Serialize, ToSchema)]
pub(crate) struct PostViewDto {
    #[serde(flatten)]
    pub(crate) post: PostDto,
    #[serde(flatten)]
    pub(crate) counts: CountsDto,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) trending_score: Option<f64>,
}

/// `null` в `page` - пост удалён между выборкой и гидрацией.
#[derive(Debug, Serialize, ToSchema)]
pub(crate) struct FeedPageDto {
    pub(crate) page: Vec<Option<PostViewDto>>,
    pub(crate) is_done: bool,
    pub(crate) continue_cursor: String,
}

impl From<PostView> for PostViewDto {
    fn from(view: PostView) -> Self {
        Self {
            post: PostDto::from(view.post),
            counts: CountsDto::from(view.counts),
            trending_score: view.trending_score,
        }
    }
}

impl From<FeedPage> for FeedPageDto {
    fn from(page: FeedPage) -> Self {
        Self {
            page: page
                .page
                .into_iter()
                .map(|slot| slot.map(PostViewDto::from))
                .collect(),
            is_done: page.is_done,
            continue_cursor: page.continue_cursor,
        }
    }
}

type FeedResponse = AppResult<(StatusCode, Json<FeedPageDto>)>;

fn feed_response(page: FeedPage) -> FeedResponse {
    Ok((StatusCode::OK, Json(FeedPageDto::from(page))))
}

#[utoipa::path(
    get,
    path = "/api/feed/trending",
    tag = "feeds",
    params(
        ("cursor" = Option<String>, Query, description = "Id of the last post of the previous page"),
        ("limit" = Option<u32>, Query, description = "Page size")
    ),
    responses(
        (status = 200, description = "Trending posts of the recent window", body = FeedPageDto),
        (status = 400, description = "Validation error"),
        (status = 500, description = "Internal error")
    )
)]
pub(crate) async fn list_trending(
    State(state): State<AppState>,
    Query(query): Query<FeedQuery>,
) -> FeedResponse {
    let page = state
        .feed_service
        .list_trending(query.cursor.as_deref(), query.limit)
        .await?;
    feed_response(page)
}

#[utoipa::path(
    get,
    path = "/api/feed/most-liked",
    tag = "feeds",
    params(
        ("cursor" = Option<String>, Query, description = "Continuation cursor"),
        ("limit" = Option<u32>, Query, description = "Page size")
    ),
    responses(
        (status = 200, description = "Posts with at least one like, most liked first", body = FeedPageDto),
        (status = 400, description = "Validation error"),
        (status = 500, description = "Internal error")
    )
)]
pub(crate) async fn list_most_liked(
    State(state): State<AppState>,
    Query(query): Query<FeedQuery>,
) -> FeedResponse {
    let page = state
        .feed_service
        .list_most_liked(query.cursor.as_deref(), query.limit)
        .await?;
    feed_response(page)
}

#[utoipa::path(
    get,
    path = "/api/feed/most-saved",
    tag = "feeds",
    params(
        ("cursor" = Option<String>, Query, description = "Continuation cursor"),
        ("limit" = Option<u32>, Query, description = "Page size")
    ),
    responses(
        (status = 200, description = "Posts with at least one save, most saved first", body = FeedPageDto),
        (status = 400, description = "Validation error"),
        (status = 500, description = "Internal error")
    )
)]
pub(crate) async fn list_most_saved(
    State(state): State<AppState>,
    Query(query): Query<FeedQuery>,
) -> FeedResponse {
    let page = state
        .feed_service
        .list_most_saved(query.cursor.as_deref(), query.limit)
        .await?;
    feed_response(page)
}

#[utoipa::path(
    get,
    path = "/api/posts",
    tag = "posts",
    params(
        ("cursor" = Option<String>, Query, description = "Continuation cursor"),
        ("limit" = Option<u32>, Query, description = "Page size")
    ),
    responses(
        (status = 200, description = "Newest posts first", body = FeedPageDto),
        (status = 400, description = "Validation error"),
        (status = 500, description = "Internal error")
    )
)]
pub(crate) async fn list_recent_posts(
    State(state): State<AppState>,
    Query(query): Query<FeedQuery>,
) -> FeedResponse {
    let page = state
        .feed_service
        .list_recent(query.cursor.as_deref(), query.limit)
        .await?;
    feed_response(page)
}

#[utoipa::path(
    get,
    path = "/api/users/{id}/posts",
    tag = "users",
    params(
        ("id" = i64, Path, description = "Author id"),
        ("cursor" = Option<String>, Query, description = "Continuation cursor"),
        ("limit" = Option<u32>, Query, description = "Page size")
    ),
    responses(
        (status = 200, description = "Author's posts, newest first", body = FeedPageDto),
        (status = 400, description = "Validation error"),
        (status = 500, description = "Internal error")
    )
)]
pub(crate) async fn list_author_posts(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Query(query): Query<FeedQuery>,
) -> FeedResponse {
    let page = state
        .feed_service
        .list_by_author(id, query.cursor.as_deref(), query.limit)
        .await?;
    feed_response(page)
}

#[utoipa::path(
    get,
    path = "/api/users/{id}/liked-posts",
    tag = "users",
    params(
        ("id" = i64, Path, description = "User id"),
        ("cursor" = Option<String>, Query, description = "Continuation cursor"),
        ("limit" = Option<u32>, Query, description = "Page size")
    ),
    responses(
        (status = 200, description = "Posts the user liked", body = FeedPageDto),
        (status = 400, description = "Validation error"),
        (status = 500, description = "Internal error")
    )
)]
pub(crate) async fn list_liked_posts(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Query(query): Query<FeedQuery>,
) -> FeedResponse {
    let page = state
        .feed_service
        .list_liked_by(id, query.cursor.as_deref(), query.limit)
        .await?;
    feed_response(page)
}

#[utoipa::path(
    get,
    path = "/api/users/{id}/saved-posts",
    tag = "users",
    params(
        ("id" = i64, Path, description = "User id"),
        ("cursor" = Option<String>, Query, description = "Continuation cursor"),
        ("limit" = Option<u32>, Query, description = "Page size")
    ),
    responses(
        (status = 200, description = "Posts the user saved", body = FeedPageDto),
        (status = 400, description = "Validation error"),
        (status = 500, description = "Internal error")
    )
)]
pub(crate) async fn list_saved_posts(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Query(query): Query<FeedQuery>,
) -> FeedResponse {
    let page = state
        .feed_service
        .list_saved_by(id, query.cursor.as_deref(), query.limit)
        .await?;
    feed_response(page)
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::FeedPageDto;
    use crate::application::feed_service::{FeedPage, PostView};
    use crate::domain::interaction::EngagementCounts;
    use crate::domain::post::Post;

    #[test]
    fn feed_page_serializes_deleted_slots_as_null() {
        let post = Post::new(1, 2, "title", "content", "", None, Utc::now(), None)
            .expect("valid post");
        let page = FeedPage {
            page: vec![
                None,
                Some(PostView {
                    post,
                    counts: EngagementCounts {
                        like_count: 3,
                        save_count: 0,
                        comment_count: 1,
                    },
                    trending_score: None,
                }),
            ],
            is_done: false,
            continue_cursor: "1".to_string(),
        };

        let json = serde_json::to_value(FeedPageDto::from(page)).expect("serializable");

        assert!(json["page"][0].is_null());
        let view = &json["page"][1];
        assert_eq!(view["id"], 1);
        assert_eq!(view["title"], "title");
        assert_eq!(view["like_count"], 3);
        assert_eq!(view["save_count"], 0);
        assert_eq!(view["comment_count"], 1);
        assert!(view.get("post").is_none());
        assert!(view.get("counts").is_none());
        assert!(json["page"][1].get("trending_score").is_none());
        assert_eq!(json["is_done"], false);
        assert_eq!(json["continue_cursor"], "1");
    }
}
