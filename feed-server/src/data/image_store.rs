use async_trait::async_trait;

use crate::domain::error::DomainError;

/// Blob-хранилище загруженных изображений постов.
#[async_trait]
pub(crate) trait ImageStore: Send + Sync {
    /// Удаляет изображение по ключу; отсутствующий объект не считается ошибкой.
    async fn delete(&self, key: &str) -> Result<(), DomainError>;
}
