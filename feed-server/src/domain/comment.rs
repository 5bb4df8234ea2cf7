use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::error::DomainError;
use super::post::validate_positive_i64;

const MAX_COMMENT_CHARS: usize = 2000;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct Comment {
    pub(crate) id: i64,
    pub(crate) post_id: i64,
    pub(crate) author_id: i64,
    pub(crate) text: String,
    pub(crate) created_at: DateTime<Utc>,
    pub(crate) updated_at: Option<DateTime<Utc>>,
}

impl Comment {
    pub(crate) fn new(
        id: i64,
        post_id: i64,
        author_id: i64,
        text: impl Into<String>,
        created_at: DateTime<Utc>,
        updated_at: Option<DateTime<Utc>>,
    ) -> Result<Self, DomainError> {
        validate_positive_i64("id", id)?;
        validate_positive_i64("post_id", post_id)?;
        validate_positive_i64("author_id", author_id)?;
        let text = normalize_comment_text(&text.into())?;

        Ok(Self {
            id,
            post_id,
            author_id,
            text,
            created_at,
            updated_at,
        })
    }
}

pub(crate) fn normalize_comment_text(text: &str) -> Result<String, DomainError> {
    let text = text.trim();
    if text.is_empty() || text.chars().count() > MAX_COMMENT_CHARS {
        return Err(DomainError::Validation {
            field: "text",
            message: "must be 1..2000 chars",
        });
    }
    Ok(text.to_string())
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::{Comment, normalize_comment_text};

    #[test]
    fn comment_text_is_trimmed() {
        let text = normalize_comment_text("  nice shot  ").expect("must be valid");
        assert_eq!(text, "nice shot");
    }

    #[test]
    fn comment_text_length_is_checked() {
        assert!(normalize_comment_text("   ").is_err());
        assert!(normalize_comment_text(&"x".repeat(2001)).is_err());
        assert!(normalize_comment_text(&"x".repeat(2000)).is_ok());
    }

    #[test]
    fn comment_new_rejects_non_positive_post_id() {
        let result = Comment::new(1, 0, 5, "text", Utc::now(), None);
        assert!(result.is_err());
    }
}
