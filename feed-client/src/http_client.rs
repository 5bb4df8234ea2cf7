use reqwest::{Client, Method, RequestBuilder};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use std::time::Duration;

use crate::error::{FeedClientError, FeedClientResult};
use crate::models::{
    Comment, EngagementCounts, FeedPage, InteractionStatus, LikedUsers, NewPost, PageRequest,
    Post, PostUpdate,
};

#[derive(Debug, Serialize)]
struct CommentTextDto<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct CreatedCommentDto {
    id: i64,
}

#[derive(Debug, Deserialize)]
struct ErrorResponseDto {
    error: Option<String>,
}

/// Лента, доступная без авторизации.
#[derive(Debug, Clone, Copy)]
pub(crate) enum PublicFeed {
    Trending,
    MostLiked,
    MostSaved,
    Recent,
    Author(i64),
    LikedBy(i64),
    SavedBy(i64),
}

impl PublicFeed {
    fn path(self) -> String {
        match self {
            Self::Trending => "/api/feed/trending".to_string(),
            Self::MostLiked => "/api/feed/most-liked".to_string(),
            Self::MostSaved => "/api/feed/most-saved".to_string(),
            Self::Recent => "/api/posts".to_string(),
            Self::Author(id) => format!("/api/users/{id}/posts"),
            Self::LikedBy(id) => format!("/api/users/{id}/liked-posts"),
            Self::SavedBy(id) => format!("/api/users/{id}/saved-posts"),
        }
    }
}

/// Отметка пользователя на посте, ставится `PUT` и снимается `DELETE`.
#[derive(Debug, Clone, Copy)]
pub(crate) enum Mark {
    Like,
    Save,
}

impl Mark {
    fn segment(self) -> &'static str {
        match self {
            Self::Like => "like",
            Self::Save => "save",
        }
    }
}

#[derive(Debug, Clone)]
/// HTTP-клиент для работы с REST API `feed-server`.
pub(crate) struct HttpClient {
    base_url: String,
    client: Client,
}

impl HttpClient {
    pub(crate) fn new(base_url: impl Into<String>) -> FeedClientResult<Self> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(5))
            .timeout(Duration::from_secs(15))
            .build()?;

        Ok(Self {
            base_url: base_url.into(),
            client,
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    fn request(&self, method: Method, path: &str, token: Option<&str>) -> RequestBuilder {
        let request = self.client.request(method, self.endpoint(path));
        match token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn decode_error(response: reqwest::Response) -> FeedClientError {
        let status = response.status();

        let message = match response.json::<ErrorResponseDto>().await {
            Ok(body) => body
                .error
                .unwrap_or_else(|| format!("http status {status}")),
            Err(_) => format!("http status {status}"),
        };
        FeedClientError::from_http_status(status, Some(message))
    }

    async fn send(request: RequestBuilder) -> FeedClientResult<reqwest::Response> {
        let response = request
            .send()
            .await
            .map_err(FeedClientError::from_reqwest)?;
        if !response.status().is_success() {
            return Err(Self::decode_error(response).await);
        }
        Ok(response)
    }

    async fn fetch<TRes: DeserializeOwned>(request: RequestBuilder) -> FeedClientResult<TRes> {
        Self::send(request)
            .await?
            .json::<TRes>()
            .await
            .map_err(FeedClientError::from_reqwest)
    }

    pub(crate) async fn create_post(&self, token: &str, post: &NewPost) -> FeedClientResult<Post> {
        Self::fetch(self.request(Method::POST, "/api/posts", Some(token)).json(post)).await
    }

    pub(crate) async fn get_post(&self, id: i64) -> FeedClientResult<Post> {
        Self::fetch(self.request(Method::GET, &format!("/api/posts/{id}"), None)).await
    }

    pub(crate) async fn update_post(
        &self,
        token: &str,
        id: i64,
        update: &PostUpdate,
    ) -> FeedClientResult<Post> {
        let request = self
            .request(Method::PUT, &format!("/api/posts/{id}"), Some(token))
            .json(update);
        Self::fetch(request).await
    }

    pub(crate) async fn delete_post(&self, token: &str, id: i64) -> FeedClientResult<()> {
        Self::send(self.request(Method::DELETE, &format!("/api/posts/{id}"), Some(token))).await?;
        Ok(())
    }

    pub(crate) async fn feed(
        &self,
        feed: PublicFeed,
        page: &PageRequest,
    ) -> FeedClientResult<FeedPage> {
        Self::fetch(self.request(Method::GET, &feed.path(), None).query(page)).await
    }

    pub(crate) async fn post_counts(&self, id: i64) -> FeedClientResult<EngagementCounts> {
        Self::fetch(self.request(Method::GET, &format!("/api/posts/{id}/counts"), None)).await
    }

    pub(crate) async fn liked_users(&self, id: i64) -> FeedClientResult<LikedUsers> {
        Self::fetch(self.request(Method::GET, &format!("/api/posts/{id}/likes"), None)).await
    }

    pub(crate) async fn interaction_status(
        &self,
        token: &str,
        id: i64,
    ) -> FeedClientResult<InteractionStatus> {
        let path = format!("/api/posts/{id}/interaction");
        Self::fetch(self.request(Method::GET, &path, Some(token))).await
    }

    /// `set == true` ставит отметку, `false` снимает; обе операции идемпотентны.
    pub(crate) async fn mark(
        &self,
        token: &str,
        id: i64,
        mark: Mark,
        set: bool,
    ) -> FeedClientResult<()> {
        let method = if set { Method::PUT } else { Method::DELETE };
        let path = format!("/api/posts/{id}/{}", mark.segment());
        Self::send(self.request(method, &path, Some(token))).await?;
        Ok(())
    }

    pub(crate) async fn list_comments(&self, post_id: i64) -> FeedClientResult<Vec<Comment>> {
        let path = format!("/api/posts/{post_id}/comments");
        Self::fetch(self.request(Method::GET, &path, None)).await
    }

    pub(crate) async fn add_comment(
        &self,
        token: &str,
        post_id: i64,
        text: &str,
    ) -> FeedClientResult<i64> {
        let path = format!("/api/posts/{post_id}/comments");
        let request = self
            .request(Method::POST, &path, Some(token))
            .json(&CommentTextDto { text });
        let created: CreatedCommentDto = Self::fetch(request).await?;
        Ok(created.id)
    }

    pub(crate) async fn update_comment(
        &self,
        token: &str,
        id: i64,
        text: &str,
    ) -> FeedClientResult<()> {
        let request = self
            .request(Method::PUT, &format!("/api/comments/{id}"), Some(token))
            .json(&CommentTextDto { text });
        Self::send(request).await?;
        Ok(())
    }

    pub(crate) async fn remove_comment(&self, token: &str, id: i64) -> FeedClientResult<()> {
        Self::send(self.request(Method::DELETE, &format!("/api/comments/{id}"), Some(token)))
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_normalizes_slashes() {
        let client = HttpClient::new("http://localhost:8080/").expect("client must build");
        let full = client.endpoint("/api/posts");
        assert_eq!(full, "http://localhost:8080/api/posts");
    }

    #[test]
    fn feed_paths_match_server_routes() {
        assert_eq!(PublicFeed::Trending.path(), "/api/feed/trending");
        assert_eq!(PublicFeed::Recent.path(), "/api/posts");
        assert_eq!(PublicFeed::Author(7).path(), "/api/users/7/posts");
        assert_eq!(PublicFeed::SavedBy(3).path(), "/api/users/3/saved-posts");
    }

    #[test]
    fn feed_page_decodes_deleted_slots() {
        let json = r#"{
            "page": [
                null,
                {
                    "id": 5,
                    "author_id": 1,
                    "title": "t",
                    "content": "c",
                    "image_url": "",
                    "created_at": "2024-05-01T10:00:00Z",
                    "updated_at": null,
                    "like_count": 2,
                    "save_count": 0,
                    "comment_count": 1,
                    "trending_score": 0.9
                }
            ],
            "is_done": false,
            "continue_cursor": "5"
        }"#;

        let page: FeedPage = serde_json::from_str(json).expect("valid feed page");

        assert_eq!(page.page.len(), 2);
        let posts: Vec<i64> = page.posts().map(|view| view.post.id).collect();
        assert_eq!(posts, vec![5]);
        let view = page.posts().next().expect("one live post");
        assert_eq!(view.counts.like_count, 2);
        assert_eq!(view.counts.comment_count, 1);
        assert_eq!(view.trending_score, Some(0.9));
        assert!(view.post.uploaded_image_key.is_none());
        assert_eq!(page.continue_cursor, "5");
    }

    #[test]
    fn page_request_follows_cursor_until_done() {
        let request = PageRequest {
            cursor: None,
            limit: Some(10),
        };
        let mut page = FeedPage {
            page: Vec::new(),
            is_done: false,
            continue_cursor: "1700000000000000.4".to_string(),
        };

        let next = request.after(&page).expect("more pages");
        assert_eq!(next.cursor.as_deref(), Some("1700000000000000.4"));
        assert_eq!(next.limit, Some(10));

        page.is_done = true;
        assert!(request.after(&page).is_none());
    }

    #[test]
    fn empty_page_request_serializes_without_params() {
        let query = serde_json::to_value(PageRequest::default()).expect("serializable");
        assert_eq!(query, serde_json::json!({}));
    }
}
