use thiserror::Error;

#[derive(Debug, Error)]
/// Ошибки клиентской библиотеки `feed-client`.
pub enum FeedClientError {
    /// Ошибка HTTP-транспорта (`reqwest`).
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// Требуется авторизация (отсутствует/некорректен токен).
    #[error("unauthorized")]
    Unauthorized,

    /// Операция разрешена только автору ресурса.
    #[error("forbidden")]
    Forbidden,

    /// Запрошенный ресурс не найден.
    #[error("not found")]
    NotFound,

    /// Некорректный запрос или ошибка валидации на сервере.
    #[error("invalid request: {0}")]
    InvalidRequest(String),
}

/// Результат операций `feed-client`.
pub type FeedClientResult<T> = Result<T, FeedClientError>;

impl FeedClientError {
    pub(crate) fn from_http_status(status: reqwest::StatusCode, message: Option<String>) -> Self {
        match status {
            reqwest::StatusCode::UNAUTHORIZED => Self::Unauthorized,
            reqwest::StatusCode::FORBIDDEN => Self::Forbidden,
            reqwest::StatusCode::NOT_FOUND => Self::NotFound,
            _ => {
                let message = message.unwrap_or_else(|| format!("http status {status}"));
                Self::InvalidRequest(message)
            }
        }
    }

    pub(crate) fn from_reqwest(err: reqwest::Error) -> Self {
        if let Some(status) = err.status() {
            return Self::from_http_status(status, None);
        }
        Self::Http(err)
    }
}

#[cfg(test)]
mod tests {
    use super::FeedClientError;

    #[test]
    fn statuses_map_to_variants() {
        assert!(matches!(
            FeedClientError::from_http_status(reqwest::StatusCode::UNAUTHORIZED, None),
            FeedClientError::Unauthorized
        ));
        assert!(matches!(
            FeedClientError::from_http_status(reqwest::StatusCode::FORBIDDEN, None),
            FeedClientError::Forbidden
        ));
        assert!(matches!(
            FeedClientError::from_http_status(reqwest::StatusCode::NOT_FOUND, None),
            FeedClientError::NotFound
        ));
    }

    #[test]
    fn other_statuses_keep_server_message() {
        let err = FeedClientError::from_http_status(
            reqwest::StatusCode::BAD_REQUEST,
            Some("invalid limit: must be within 1..=max page size".to_string()),
        );
        match err {
            FeedClientError::InvalidRequest(message) => assert!(message.contains("limit")),
            other => panic!("unexpected error: {other:?}"),
        }

        let err = FeedClientError::from_http_status(reqwest::StatusCode::REQUEST_TIMEOUT, None);
        assert!(matches!(err, FeedClientError::InvalidRequest(message) if message.contains("408")));
    }
}
