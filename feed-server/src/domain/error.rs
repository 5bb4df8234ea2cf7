use thiserror::Error;

/// Ошибки ленты, постов и леджера взаимодействий.
///
/// Деградация курсора трендов и проигранная гонка за строку леджера ошибками
/// не считаются и сюда не попадают.
#[derive(Debug, Error)]
pub(crate) enum DomainError {
    #[error("invalid {field}: {message}")]
    Validation {
        field: &'static str,
        message: &'static str,
    },

    #[error("{0} not found")]
    NotFound(String),

    #[error("only the author may change this resource")]
    Forbidden,

    /// Сбой хранилища или файлового хранилища изображений.
    #[error("storage failure: {0}")]
    Unexpected(String),
}

impl DomainError {
    pub(crate) fn post_not_found(post_id: i64) -> Self {
        Self::NotFound(format!("post {post_id}"))
    }

    pub(crate) fn comment_not_found(comment_id: i64) -> Self {
        Self::NotFound(format!("comment {comment_id}"))
    }
}
