use async_trait::async_trait;

use crate::domain::comment::Comment;
use crate::domain::error::DomainError;

#[derive(Debug, Clone)]
pub(crate) struct NewComment {
    pub(crate) post_id: i64,
    pub(crate) author_id: i64,
    pub(crate) text: String,
}

/// Комментарии учитываются в ledger поста: вставка и удаление строки
/// комментария и изменение ledger выполняются в одной транзакции.
#[async_trait]
pub(crate) trait CommentRepository: Send + Sync {
    async fn create_comment(&self, input: NewComment) -> Result<Comment, DomainError>;
    async fn get_comment(&self, id: i64) -> Result<Option<Comment>, DomainError>;
    async fn update_comment_text(&self, id: i64, text: String) -> Result<Option<Comment>, DomainError>;
    async fn delete_comment(&self, id: i64) -> Result<Option<Comment>, DomainError>;
    async fn list_for_post(&self, post_id: i64) -> Result<Vec<Comment>, DomainError>;
}
