use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::Serialize;
use utoipa::ToSchema;

use crate::application::interaction_service::{InteractionStatus, LikedUsers};
use crate::domain::interaction::EngagementCounts;
use crate::presentation::AppState;
use crate::presentation::http::app_error::AppResult;
use crate::presentation::http::middleware::auth::AuthenticatedUser;

#[derive(Debug, Serialize, ToSchema)]
pub(crate) struct CountsDto {
    pub(crate) like_count: i64,
    pub(crate) save_count: i64,
    pub(crate) comment_count: i64,
}

#[derive(Debug, Serialize, ToSchema)]
pub(crate) struct InteractionStatusDto {
    pub(crate) liked: bool,
    pub(crate) saved: bool,
}

#[derive(Debug, Serialize, ToSchema)]
pub(crate) struct LikedUsersDto {
    pub(crate) like_count: i64,
    pub(crate) user_ids: Vec<i64>,
}

impl From<EngagementCounts> for CountsDto {
    fn from(counts: EngagementCounts) -> Self {
        Self {
            like_count: counts.like_count,
            save_count: counts.save_count,
            comment_count: counts.comment_count,
        }
    }
}

impl From<InteractionStatus> for InteractionStatusDto {
    fn from(status: InteractionStatus) -> Self {
        Self {
            liked: status.liked,
            saved: status.saved,
        }
    }
}

impl From<LikedUsers> for LikedUsersDto {
    fn from(liked: LikedUsers) -> Self {
        Self {
            like_count: liked.like_count,
            user_ids: liked.user_ids,
        }
    }
}

#[utoipa::path(
    get,
    path = "/api/posts/{id}/counts",
    tag = "interactions",
    params(
        ("id" = i64, Path, description = "Post id")
    ),
    responses(
        (status = 200, description = "Engagement counters, zero when nobody interacted yet", body = CountsDto),
        (status = 404, description = "Post not found"),
        (status = 500, description = "Internal error")
    )
)]
pub(crate) async fn post_counts(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<(StatusCode, Json<CountsDto>)> {
    let counts = state.interaction_service.counts(id).await?;
    Ok((StatusCode::OK, Json(CountsDto::from(counts))))
}

#[utoipa::path(
    get,
    path = "/api/posts/{id}/likes",
    tag = "interactions",
    params(
        ("id" = i64, Path, description = "Post id")
    ),
    responses(
        (status = 200, description = "Users who liked the post", body = LikedUsersDto),
        (status = 404, description = "Post not found"),
        (status = 500, description = "Internal error")
    )
)]
pub(crate) async fn liked_users(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<(StatusCode, Json<LikedUsersDto>)> {
    let liked = state.interaction_service.liked_users(id).await?;
    Ok((StatusCode::OK, Json(LikedUsersDto::from(liked))))
}

#[utoipa::path(
    get,
    path = "/api/posts/{id}/interaction",
    tag = "interactions",
    security(
        ("bearer_auth" = [])
    ),
    params(
        ("id" = i64, Path, description = "Post id")
    ),
    responses(
        (status = 200, description = "Whether the caller liked or saved the post", body = InteractionStatusDto),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Post not found"),
        (status = 500, description = "Internal error")
    )
)]
pub(crate) async fn interaction_status(
    State(state): State<AppState>,
    auth: AuthenticatedUser,
    Path(id): Path<i64>,
) -> AppResult<(StatusCode, Json<InteractionStatusDto>)> {
    let status = state.interaction_service.status(id, auth.user_id).await?;
    Ok((StatusCode::OK, Json(InteractionStatusDto::from(status))))
}

#[utoipa::path(
    put,
    path = "/api/posts/{id}/like",
    tag = "interactions",
    security(
        ("bearer_auth" = [])
    ),
    params(
        ("id" = i64, Path, description = "Post id")
    ),
    responses(
        (status = 204, description = "Post liked (idempotent)"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Post not found"),
        (status = 500, description = "Internal error")
    )
)]
pub(crate) async fn like_post(
    State(state): State<AppState>,
    auth: AuthenticatedUser,
    Path(id): Path<i64>,
) -> AppResult<StatusCode> {
    state.interaction_service.like_post(id, auth.user_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    delete,
    path = "/api/posts/{id}/like",
    tag = "interactions",
    security(
        ("bearer_auth" = [])
    ),
    params(
        ("id" = i64, Path, description = "Post id")
    ),
    responses(
        (status = 204, description = "Like removed (idempotent)"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Post not found"),
        (status = 500, description = "Internal error")
    )
)]
pub(crate) async fn unlike_post(
    State(state): State<AppState>,
    auth: AuthenticatedUser,
    Path(id): Path<i64>,
) -> AppResult<StatusCode> {
    state
        .interaction_service
        .unlike_post(id, auth.user_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    put,
    path = "/api/posts/{id}/save",
    tag = "interactions",
    security(
        ("bearer_auth" = [])
    ),
    params(
        ("id" = i64, Path, description = "Post id")
    ),
    responses(
        (status = 204, description = "Post saved (idempotent)"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Post not found"),
        (status = 500, description = "Internal error")
    )
)]
pub(crate) async fn save_post(
    State(state): State<AppState>,
    auth: AuthenticatedUser,
    Path(id): Path<i64>,
) -> AppResult<StatusCode> {
    state.interaction_service.save_post(id, auth.user_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    delete,
    path = "/api/posts/{id}/save",
    tag = "interactions",
    security(
        ("bearer_auth" = [])
    ),
    params(
        ("id" = i64, Path, description = "Post id")
    ),
    responses(
        (status = 204, description = "Save removed (idempotent)"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Post not found"),
        (status = 500, description = "Internal error")
    )
)]
pub(crate) async fn unsave_post(
    State(state): State<AppState>,
    auth: AuthenticatedUser,
    Path(id): Path<i64>,
) -> AppResult<StatusCode> {
    state
        .interaction_service
        .unsave_post(id, auth.user_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
