use tracing::info;

use crate::data::comment_repository::{CommentRepository, NewComment};
use crate::data::post_repository::PostRepository;
use crate::domain::comment::{Comment, normalize_comment_text};
use crate::domain::error::DomainError;

pub(crate) struct CommentService<P: PostRepository, C: CommentRepository> {
    posts: P,
    comments: C,
}

impl<P: PostRepository, C: CommentRepository> CommentService<P, C> {
    pub(crate) fn new(posts: P, comments: C) -> Self {
        Self { posts, comments }
    }

    pub(crate) async fn add_comment(
        &self,
        post_id: i64,
        author_id: i64,
        text: &str,
    ) -> Result<Comment, DomainError> {
        let text = normalize_comment_text(text)?;
        self.ensure_post_exists(post_id).await?;

        let comment = self
            .comments
            .create_comment(NewComment {
                post_id,
                author_id,
                text,
            })
            .await?;
        info!(comment_id = comment.id, post_id, author_id, "comment added");
        Ok(comment)
    }

    pub(crate) async fn update_comment(
        &self,
        actor_user_id: i64,
        comment_id: i64,
        text: &str,
    ) -> Result<Comment, DomainError> {
        let text = normalize_comment_text(text)?;
        self.get_owned(actor_user_id, comment_id).await?;

        self.comments
            .update_comment_text(comment_id, text)
            .await?
            .ok_or(DomainError::comment_not_found(comment_id))
    }

    pub(crate) async fn remove_comment(
        &self,
        actor_user_id: i64,
        comment_id: i64,
    ) -> Result<(), DomainError> {
        self.get_owned(actor_user_id, comment_id).await?;

        let removed = self
            .comments
            .delete_comment(comment_id)
            .await?
            .ok_or(DomainError::comment_not_found(comment_id))?;
        info!(comment_id, post_id = removed.post_id, "comment removed");
        Ok(())
    }

    pub(crate) async fn list_comments(&self, post_id: i64) -> Result<Vec<Comment>, DomainError> {
        self.ensure_post_exists(post_id).await?;
        self.comments.list_for_post(post_id).await
    }

    async fn get_owned(&self, actor_user_id: i64, comment_id: i64) -> Result<Comment, DomainError> {
        let comment = self
            .comments
            .get_comment(comment_id)
            .await?
            .ok_or(DomainError::comment_not_found(comment_id))?;

        if comment.author_id != actor_user_id {
            return Err(DomainError::Forbidden);
        }
        Ok(comment)
    }

    async fn ensure_post_exists(&self, post_id: i64) -> Result<(), DomainError> {
        self.posts
            .get_post(post_id)
            .await?
            .map(|_| ())
            .ok_or(DomainError::post_not_found(post_id))
    }
}
