use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::presentation::http::handlers::comments::{CommentDto, CommentTextDto, CreatedCommentDto};
use crate::presentation::http::handlers::feeds::{FeedPageDto, FeedQuery, PostViewDto};
use crate::presentation::http::handlers::interactions::{
    CountsDto, InteractionStatusDto, LikedUsersDto,
};
use crate::presentation::http::handlers::posts::{CreatePostDto, PostDto, UpdatePostDto};

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::presentation::http::handlers::feeds::list_trending,
        crate::presentation::http::handlers::feeds::list_most_liked,
        crate::presentation::http::handlers::feeds::list_most_saved,
        crate::presentation::http::handlers::feeds::list_recent_posts,
        crate::presentation::http::handlers::feeds::list_author_posts,
        crate::presentation::http::handlers::feeds::list_liked_posts,
        crate::presentation::http::handlers::feeds::list_saved_posts,
        crate::presentation::http::handlers::posts::get_post,
        crate::presentation::http::handlers::posts::create_post,
        crate::presentation::http::handlers::posts::update_post,
        crate::presentation::http::handlers::posts::delete_post,
        crate::presentation::http::handlers::interactions::post_counts,
        crate::presentation::http::handlers::interactions::liked_users,
        crate::presentation::http::handlers::interactions::interaction_status,
        crate::presentation::http::handlers::interactions::like_post,
        crate::presentation::http::handlers::interactions::unlike_post,
        crate::presentation::http::handlers::interactions::save_post,
        crate::presentation::http::handlers::interactions::unsave_post,
        crate::presentation::http::handlers::comments::list_comments,
        crate::presentation::http::handlers::comments::add_comment,
        crate::presentation::http::handlers::comments::update_comment,
        crate::presentation::http::handlers::comments::remove_comment
    ),
    components(
        schemas(
            FeedQuery,
            FeedPageDto,
            PostViewDto,
            PostDto,
            CreatePostDto,
            UpdatePostDto,
            CountsDto,
            InteractionStatusDto,
            LikedUsersDto,
            CommentDto,
            CommentTextDto,
            CreatedCommentDto
        )
    ),
    tags(
        (name = "feeds", description = "Ranked and chronological feeds"),
        (name = "posts", description = "Post endpoints"),
        (name = "interactions", description = "Likes, saves and counters"),
        (name = "comments", description = "Comment endpoints"),
        (name = "users", description = "Per-user feeds")
    ),
    modifiers(&SecurityAddon)
)]
pub(crate) struct ApiDoc;

pub(crate) struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let mut components = openapi.components.take().unwrap_or_default();
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
        openapi.components = Some(components);
    }
}

#[cfg(test)]
mod tests {
    use utoipa::OpenApi;

    use super::ApiDoc;

    #[test]
    fn openapi_documents_feed_routes_and_bearer_scheme() {
        let doc = ApiDoc::openapi();

        for path in [
            "/api/feed/trending",
            "/api/feed/most-liked",
            "/api/posts/{id}/like",
            "/api/comments/{id}",
            "/api/users/{id}/saved-posts",
        ] {
            assert!(doc.paths.paths.contains_key(path), "missing {path}");
        }
        let components = doc.components.expect("components must be present");
        assert!(components.security_schemes.contains_key("bearer_auth"));
    }
}
