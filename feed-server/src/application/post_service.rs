use tracing::{info, warn};

use crate::data::image_store::ImageStore;
use crate::data::post_repository::{NewPost, PostPatch, PostRepository};
use crate::domain::error::DomainError;
use crate::domain::post::{CreatePostRequest, Post, UpdatePostRequest};

pub(crate) struct PostService<R: PostRepository, S: ImageStore> {
    repo: R,
    images: S,
}

impl<R: PostRepository, S: ImageStore> PostService<R, S> {
    pub(crate) fn new(repo: R, images: S) -> Self {
        Self { repo, images }
    }

    pub(crate) async fn create_post(
        &self,
        author_id: i64,
        req: CreatePostRequest,
    ) -> Result<Post, DomainError> {
        let req = req.validate()?;

        let new_post = NewPost {
            author_id,
            title: req.title,
            content: req.content,
            image_url: req.image_url,
            uploaded_image_key: req.uploaded_image_key,
        };
        let post = self.repo.create_post(new_post).await?;
        info!(post_id = post.id, author_id, "post created");
        Ok(post)
    }

    pub(crate) async fn get_post(&self, id: i64) -> Result<Post, DomainError> {
        self.repo
            .get_post(id)
            .await?
            .ok_or(DomainError::post_not_found(id))
    }

    pub(crate) async fn update_post(
        &self,
        actor_user_id: i64,
        post_id: i64,
        req: UpdatePostRequest,
    ) -> Result<Post, DomainError> {
        let req = req.validate()?;
        self.get_owned(actor_user_id, post_id).await?;

        let patch = PostPatch {
            title: req.title,
            content: req.content,
            image_url: req.image_url,
        };
        self.repo
            .update_post_owned(post_id, actor_user_id, patch)
            .await?
            .ok_or(DomainError::post_not_found(post_id))
    }

    /// Удаляет пост вместе с загруженным изображением.
    ///
    /// Изображение удаляется первым: если хранилище недоступно, пост остаётся.
    pub(crate) async fn delete_post(
        &self,
        actor_user_id: i64,
        post_id: i64,
    ) -> Result<(), DomainError> {
        let post = self.get_owned(actor_user_id, post_id).await?;

        if let Some(key) = post.uploaded_image_key.as_deref() {
            if let Err(err) = self.images.delete(key).await {
                warn!(post_id, key, error = %err, "failed to delete post image");
                return Err(err);
            }
        }

        let deleted = self.repo.delete_post(post_id).await?;
        if !deleted {
            return Err(DomainError::post_not_found(post_id));
        }
        info!(post_id, "post deleted");
        Ok(())
    }

    async fn get_owned(&self, actor_user_id: i64, post_id: i64) -> Result<Post, DomainError> {
        let post = self.get_post(post_id).await?;
        if post.author_id != actor_user_id {
            return Err(DomainError::Forbidden);
        }
        Ok(post)
    }
}
