use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::error::DomainError;
use crate::domain::pagination::KeysetCursor;
use crate::domain::post::Post;

#[derive(Debug, Clone)]
pub(crate) struct NewPost {
    pub(crate) author_id: i64,
    pub(crate) title: String,
    pub(crate) content: String,
    pub(crate) image_url: String,
    pub(crate) uploaded_image_key: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub(crate) struct PostPatch {
    pub(crate) title: Option<String>,
    pub(crate) content: Option<String>,
    pub(crate) image_url: Option<String>,
}

/// Выборка по индексу `(created_at, id)` от новых к старым.
///
/// `after.rank` - `created_at` в микросекундах.
#[derive(Debug, Clone, Copy)]
pub(crate) struct RecentQuery {
    pub(crate) author_id: Option<i64>,
    pub(crate) after: Option<KeysetCursor>,
    pub(crate) limit: usize,
}

#[async_trait]
pub(crate) trait PostRepository: Send + Sync {
    async fn create_post(&self, input: NewPost) -> Result<Post, DomainError>;
    async fn get_post(&self, id: i64) -> Result<Option<Post>, DomainError>;
    /// Отсутствующие id пропускаются, порядок результата не гарантируется.
    async fn get_posts(&self, ids: &[i64]) -> Result<Vec<Post>, DomainError>;
    async fn update_post_owned(
        &self,
        post_id: i64,
        owner_id: i64,
        patch: PostPatch,
    ) -> Result<Option<Post>, DomainError>;
    async fn delete_post(&self, id: i64) -> Result<bool, DomainError>;
    async fn list_recent(&self, query: RecentQuery) -> Result<Vec<Post>, DomainError>;
    /// Посты, созданные не раньше `since`, в порядке вставки.
    async fn list_created_since(&self, since: DateTime<Utc>) -> Result<Vec<Post>, DomainError>;
}
