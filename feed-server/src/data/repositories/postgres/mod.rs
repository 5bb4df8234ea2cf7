pub(crate) mod comment_repository;
pub(crate) mod interaction_repository;
pub(crate) mod post_repository;

use crate::domain::error::DomainError;

pub(crate) fn map_db_error(err: sqlx::Error) -> DomainError {
    if let sqlx::Error::Database(db_err) = &err
        && db_err.code().as_deref() == Some("23503")
    {
        return DomainError::NotFound("post".to_string());
    }
    DomainError::Unexpected(err.to_string())
}
