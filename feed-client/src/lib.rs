//! Клиентская библиотека для работы с feed-server по HTTP.
//!
//! `FeedClient` покрывает посты, ленты (тренды, самые залайканные и
//! сохранённые, хронологические), лайки, сохранения и комментарии.
//!
//! Токен выдаёт внешний провайдер идентичности; клиент только хранит его и
//! подставляет в защищённые операции.
#![warn(missing_docs)]

mod error;
mod http_client;
mod models;

pub use error::{FeedClientError, FeedClientResult};
pub use models::{
    Comment, EngagementCounts, FeedPage, InteractionStatus, LikedUsers, NewPost, PageRequest,
    Post, PostUpdate, PostView,
};

use http_client::{HttpClient, Mark, PublicFeed};

#[derive(Debug, Clone)]
/// Клиент feed-server.
pub struct FeedClient {
    http: HttpClient,
    token: Option<String>,
}

impl FeedClient {
    /// Создаёт клиент для сервера с базовым URL, например `http://127.0.0.1:8080`.
    pub fn new(base_url: impl Into<String>) -> FeedClientResult<Self> {
        Ok(Self {
            http: HttpClient::new(base_url)?,
            token: None,
        })
    }

    /// Устанавливает JWT-токен вручную.
    pub fn set_token(&mut self, token: impl Into<String>) {
        self.token = Some(token.into());
    }

    /// Возвращает текущий JWT-токен, если он установлен.
    pub fn get_token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    /// Очищает сохранённый JWT-токен.
    pub fn clear_token(&mut self) {
        self.token = None;
    }

    /// Создаёт новый пост. Требует токен.
    pub async fn create_post(&self, post: &NewPost) -> FeedClientResult<Post> {
        self.http.create_post(self.require_token()?, post).await
    }

    /// Возвращает пост по идентификатору.
    pub async fn get_post(&self, id: i64) -> FeedClientResult<Post> {
        self.http.get_post(id).await
    }

    /// Частично обновляет пост. Требует токен автора.
    pub async fn update_post(&self, id: i64, update: &PostUpdate) -> FeedClientResult<Post> {
        self.http
            .update_post(self.require_token()?, id, update)
            .await
    }

    /// Удаляет пост вместе с изображением, счётчиками и комментариями.
    /// Требует токен автора.
    pub async fn delete_post(&self, id: i64) -> FeedClientResult<()> {
        self.http.delete_post(self.require_token()?, id).await
    }

    /// Лента трендов за последние дни.
    pub async fn trending(&self, page: &PageRequest) -> FeedClientResult<FeedPage> {
        self.http.feed(PublicFeed::Trending, page).await
    }

    /// Посты с хотя бы одним лайком, самые залайканные первыми.
    pub async fn most_liked(&self, page: &PageRequest) -> FeedClientResult<FeedPage> {
        self.http.feed(PublicFeed::MostLiked, page).await
    }

    /// Посты с хотя бы одним сохранением, самые сохраняемые первыми.
    pub async fn most_saved(&self, page: &PageRequest) -> FeedClientResult<FeedPage> {
        self.http.feed(PublicFeed::MostSaved, page).await
    }

    /// Все посты, новые первыми.
    pub async fn recent(&self, page: &PageRequest) -> FeedClientResult<FeedPage> {
        self.http.feed(PublicFeed::Recent, page).await
    }

    /// Посты автора, новые первыми.
    pub async fn author_posts(
        &self,
        author_id: i64,
        page: &PageRequest,
    ) -> FeedClientResult<FeedPage> {
        self.http.feed(PublicFeed::Author(author_id), page).await
    }

    /// Посты, которые лайкнул пользователь.
    pub async fn liked_posts(&self, user_id: i64, page: &PageRequest) -> FeedClientResult<FeedPage> {
        self.http.feed(PublicFeed::LikedBy(user_id), page).await
    }

    /// Посты, которые сохранил пользователь.
    pub async fn saved_posts(&self, user_id: i64, page: &PageRequest) -> FeedClientResult<FeedPage> {
        self.http.feed(PublicFeed::SavedBy(user_id), page).await
    }

    /// Счётчики поста; нули, если с постом ещё никто не взаимодействовал.
    pub async fn post_counts(&self, id: i64) -> FeedClientResult<EngagementCounts> {
        self.http.post_counts(id).await
    }

    /// Пользователи, лайкнувшие пост.
    pub async fn liked_users(&self, id: i64) -> FeedClientResult<LikedUsers> {
        self.http.liked_users(id).await
    }

    /// Лайкнул ли и сохранил ли пост текущий пользователь. Требует токен.
    pub async fn interaction_status(&self, id: i64) -> FeedClientResult<InteractionStatus> {
        self.http
            .interaction_status(self.require_token()?, id)
            .await
    }

    /// Ставит лайк. Требует токен.
    pub async fn like(&self, id: i64) -> FeedClientResult<()> {
        self.http
            .mark(self.require_token()?, id, Mark::Like, true)
            .await
    }

    /// Снимает лайк. Требует токен.
    pub async fn unlike(&self, id: i64) -> FeedClientResult<()> {
        self.http
            .mark(self.require_token()?, id, Mark::Like, false)
            .await
    }

    /// Сохраняет пост. Требует токен.
    pub async fn save(&self, id: i64) -> FeedClientResult<()> {
        self.http
            .mark(self.require_token()?, id, Mark::Save, true)
            .await
    }

    /// Убирает пост из сохранённых. Требует токен.
    pub async fn unsave(&self, id: i64) -> FeedClientResult<()> {
        self.http
            .mark(self.require_token()?, id, Mark::Save, false)
            .await
    }

    /// Комментарии поста, старые первыми.
    pub async fn comments(&self, post_id: i64) -> FeedClientResult<Vec<Comment>> {
        self.http.list_comments(post_id).await
    }

    /// Добавляет комментарий и возвращает его идентификатор. Требует токен.
    pub async fn add_comment(&self, post_id: i64, text: &str) -> FeedClientResult<i64> {
        self.http
            .add_comment(self.require_token()?, post_id, text)
            .await
    }

    /// Меняет текст комментария. Требует токен автора.
    pub async fn update_comment(&self, id: i64, text: &str) -> FeedClientResult<()> {
        self.http
            .update_comment(self.require_token()?, id, text)
            .await
    }

    /// Удаляет комментарий. Требует токен автора.
    pub async fn remove_comment(&self, id: i64) -> FeedClientResult<()> {
        self.http.remove_comment(self.require_token()?, id).await
    }

    fn require_token(&self) -> FeedClientResult<&str> {
        self.token.as_deref().ok_or(FeedClientError::Unauthorized)
    }
}

#[cfg(test)]
mod tests {
    use super::{FeedClient, FeedClientError};

    #[tokio::test]
    async fn protected_calls_fail_fast_without_token() {
        let client = FeedClient::new("http://127.0.0.1:9").expect("client must build");

        let err = client.like(1).await.expect_err("token is required");
        assert!(matches!(err, FeedClientError::Unauthorized));
    }

    #[test]
    fn token_can_be_set_and_cleared() {
        let mut client = FeedClient::new("http://127.0.0.1:9").expect("client must build");
        client.set_token("abc");
        assert_eq!(client.get_token(), Some("abc"));
        client.clear_token();
        assert!(client.get_token().is_none());
    }
}
