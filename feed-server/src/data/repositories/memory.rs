//! In-memory хранилище для тестов сервисов.
//!
//! Одна мьютекс-защищённая структура реализует все репозитории, так что
//! сервисы, собранные поверх клонов `MemoryStore`, видят общие данные.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::data::comment_repository::{CommentRepository, NewComment};
use crate::data::image_store::ImageStore;
use crate::data::interaction_repository::InteractionRepository;
use crate::data::post_repository::{NewPost, PostPatch, PostRepository, RecentQuery};
use crate::domain::comment::Comment;
use crate::domain::error::DomainError;
use crate::domain::interaction::{EngagementMetric, InteractionLedger, LedgerMutation, Membership};
use crate::domain::pagination::KeysetCursor;
use crate::domain::post::Post;

#[derive(Default)]
struct State {
    next_id: i64,
    posts: BTreeMap<i64, Post>,
    ledgers: BTreeMap<i64, InteractionLedger>,
    comments: BTreeMap<i64, Comment>,
    fail_next: Option<String>,
}

impl State {
    fn next_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }

    fn check_failure(&mut self) -> Result<(), DomainError> {
        match self.fail_next.take() {
            Some(message) => Err(DomainError::Unexpected(message)),
            None => Ok(()),
        }
    }

    fn apply(&mut self, post_id: i64, mutation: LedgerMutation) -> Option<InteractionLedger> {
        if !self.ledgers.contains_key(&post_id) {
            if !mutation.creates_ledger() {
                return None;
            }
            let mut ledger = InteractionLedger::empty(post_id, mutation.actor());
            ledger.id = self.next_id();
            self.ledgers.insert(post_id, ledger);
        }

        let ledger = self.ledgers.get_mut(&post_id)?;
        mutation.apply(ledger);
        Some(ledger.clone())
    }
}

#[derive(Clone, Default)]
pub(crate) struct MemoryStore {
    state: Arc<Mutex<State>>,
}

impl MemoryStore {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().expect("memory store mutex poisoned")
    }

    /// Вставляет пост с заданным временем создания.
    pub(crate) fn seed_post(&self, author_id: i64, title: &str, created_at: DateTime<Utc>) -> Post {
        self.seed_post_with_image(author_id, title, created_at, None)
    }

    pub(crate) fn seed_post_with_image(
        &self,
        author_id: i64,
        title: &str,
        created_at: DateTime<Utc>,
        uploaded_image_key: Option<&str>,
    ) -> Post {
        let mut state = self.lock();
        let id = state.next_id();
        let post = Post::new(
            id,
            author_id,
            title,
            "content",
            "",
            uploaded_image_key.map(str::to_string),
            created_at,
            None,
        )
        .expect("seed post must be valid");
        state.posts.insert(id, post.clone());
        post
    }

    /// Удаляет пост в обход сервиса, оставляя его ledger (гонка чтения после удаления).
    pub(crate) fn remove_post_only(&self, post_id: i64) {
        self.lock().posts.remove(&post_id);
    }

    pub(crate) fn ledger(&self, post_id: i64) -> Option<InteractionLedger> {
        self.lock().ledgers.get(&post_id).cloned()
    }

    pub(crate) fn comment_count(&self) -> usize {
        self.lock().comments.len()
    }

    /// Следующая операция над хранилищем завершится ошибкой.
    pub(crate) fn fail_next(&self, message: &str) {
        self.lock().fail_next = Some(message.to_string());
    }
}

#[async_trait]
impl PostRepository for MemoryStore {
    async fn create_post(&self, input: NewPost) -> Result<Post, DomainError> {
        let mut state = self.lock();
        state.check_failure()?;
        let id = state.next_id();
        let post = Post::new(
            id,
            input.author_id,
            input.title,
            input.content,
            input.image_url,
            input.uploaded_image_key,
            Utc::now(),
            None,
        )?;
        state.posts.insert(id, post.clone());
        Ok(post)
    }

    async fn get_post(&self, id: i64) -> Result<Option<Post>, DomainError> {
        let mut state = self.lock();
        state.check_failure()?;
        Ok(state.posts.get(&id).cloned())
    }

    async fn get_posts(&self, ids: &[i64]) -> Result<Vec<Post>, DomainError> {
        let mut state = self.lock();
        state.check_failure()?;
        Ok(ids
            .iter()
            .filter_map(|id| state.posts.get(id).cloned())
            .collect())
    }

    async fn update_post_owned(
        &self,
        post_id: i64,
        owner_id: i64,
        patch: PostPatch,
    ) -> Result<Option<Post>, DomainError> {
        let mut state = self.lock();
        state.check_failure()?;
        let Some(post) = state
            .posts
            .get_mut(&post_id)
            .filter(|post| post.author_id == owner_id)
        else {
            return Ok(None);
        };

        if let Some(title) = patch.title {
            post.title = title;
        }
        if let Some(content) = patch.content {
            post.content = content;
        }
        if let Some(image_url) = patch.image_url {
            post.image_url = image_url;
        }
        post.updated_at = Some(Utc::now());
        Ok(Some(post.clone()))
    }

    async fn delete_post(&self, id: i64) -> Result<bool, DomainError> {
        let mut state = self.lock();
        state.check_failure()?;
        let removed = state.posts.remove(&id).is_some();
        if removed {
            state.ledgers.remove(&id);
            state.comments.retain(|_, comment| comment.post_id != id);
        }
        Ok(removed)
    }

    async fn list_recent(&self, query: RecentQuery) -> Result<Vec<Post>, DomainError> {
        let mut state = self.lock();
        state.check_failure()?;
        let mut posts: Vec<Post> = state
            .posts
            .values()
            .filter(|post| query.author_id.is_none_or(|author| post.author_id == author))
            .filter(|post| {
                query.after.is_none_or(|cursor| {
                    (post.created_at.timestamp_micros(), post.id) < (cursor.rank, cursor.id)
                })
            })
            .cloned()
            .collect();
        posts.sort_by(|a, b| (b.created_at, b.id).cmp(&(a.created_at, a.id)));
        posts.truncate(query.limit);
        Ok(posts)
    }

    async fn list_created_since(&self, since: DateTime<Utc>) -> Result<Vec<Post>, DomainError> {
        let mut state = self.lock();
        state.check_failure()?;
        Ok(state
            .posts
            .values()
            .filter(|post| post.created_at >= since)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl InteractionRepository for MemoryStore {
    async fn find_by_post(&self, post_id: i64) -> Result<Option<InteractionLedger>, DomainError> {
        let mut state = self.lock();
        state.check_failure()?;
        Ok(state.ledgers.get(&post_id).cloned())
    }

    async fn find_by_posts(&self, post_ids: &[i64]) -> Result<Vec<InteractionLedger>, DomainError> {
        let mut state = self.lock();
        state.check_failure()?;
        Ok(post_ids
            .iter()
            .filter_map(|id| state.ledgers.get(id).cloned())
            .collect())
    }

    async fn apply(
        &self,
        post_id: i64,
        mutation: LedgerMutation,
    ) -> Result<Option<InteractionLedger>, DomainError> {
        let mut state = self.lock();
        state.check_failure()?;
        Ok(state.apply(post_id, mutation))
    }

    async fn list_by_engagement(
        &self,
        metric: EngagementMetric,
        after: Option<KeysetCursor>,
        limit: usize,
    ) -> Result<Vec<InteractionLedger>, DomainError> {
        let mut state = self.lock();
        state.check_failure()?;
        let mut ledgers: Vec<InteractionLedger> = state
            .ledgers
            .values()
            .filter(|ledger| ledger.metric(metric) >= 1)
            .filter(|ledger| {
                after.is_none_or(|cursor| {
                    (ledger.metric(metric), ledger.post_id) < (cursor.rank, cursor.id)
                })
            })
            .cloned()
            .collect();
        ledgers.sort_by(|a, b| {
            (b.metric(metric), b.post_id).cmp(&(a.metric(metric), a.post_id))
        });
        ledgers.truncate(limit);
        Ok(ledgers)
    }

    async fn list_by_member(
        &self,
        membership: Membership,
        user_id: i64,
        after_post_id: Option<i64>,
        limit: usize,
    ) -> Result<Vec<InteractionLedger>, DomainError> {
        let mut state = self.lock();
        state.check_failure()?;
        Ok(state
            .ledgers
            .values()
            .rev()
            .filter(|ledger| ledger.has_member(membership, user_id))
            .filter(|ledger| after_post_id.is_none_or(|after| ledger.post_id < after))
            .take(limit)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl CommentRepository for MemoryStore {
    async fn create_comment(&self, input: NewComment) -> Result<Comment, DomainError> {
        let mut state = self.lock();
        state.check_failure()?;
        if !state.posts.contains_key(&input.post_id) {
            return Err(DomainError::NotFound("post".to_string()));
        }
        let id = state.next_id();
        let comment = Comment::new(
            id,
            input.post_id,
            input.author_id,
            input.text,
            Utc::now(),
            None,
        )?;
        state.comments.insert(id, comment.clone());
        state.apply(comment.post_id, LedgerMutation::CommentAdded(comment.author_id));
        Ok(comment)
    }

    async fn get_comment(&self, id: i64) -> Result<Option<Comment>, DomainError> {
        let mut state = self.lock();
        state.check_failure()?;
        Ok(state.comments.get(&id).cloned())
    }

    async fn update_comment_text(
        &self,
        id: i64,
        text: String,
    ) -> Result<Option<Comment>, DomainError> {
        let mut state = self.lock();
        state.check_failure()?;
        let Some(comment) = state.comments.get_mut(&id) else {
            return Ok(None);
        };
        comment.text = text;
        comment.updated_at = Some(Utc::now());
        Ok(Some(comment.clone()))
    }

    async fn delete_comment(&self, id: i64) -> Result<Option<Comment>, DomainError> {
        let mut state = self.lock();
        state.check_failure()?;
        let Some(comment) = state.comments.remove(&id) else {
            return Ok(None);
        };
        state.apply(comment.post_id, LedgerMutation::CommentRemoved(comment.author_id));
        Ok(Some(comment))
    }

    async fn list_for_post(&self, post_id: i64) -> Result<Vec<Comment>, DomainError> {
        let mut state = self.lock();
        state.check_failure()?;
        Ok(state
            .comments
            .values()
            .filter(|comment| comment.post_id == post_id)
            .cloned()
            .collect())
    }
}

/// Запоминает ключи удалённых изображений.
#[derive(Clone, Default)]
pub(crate) struct MemoryImageStore {
    deleted: Arc<Mutex<Vec<String>>>,
    fail: Arc<Mutex<bool>>,
}

impl MemoryImageStore {
    pub(crate) fn deleted(&self) -> Vec<String> {
        self.deleted
            .lock()
            .expect("deleted mutex poisoned")
            .clone()
    }

    pub(crate) fn fail_deletes(&self) {
        *self.fail.lock().expect("fail mutex poisoned") = true;
    }
}

#[async_trait]
impl ImageStore for MemoryImageStore {
    async fn delete(&self, key: &str) -> Result<(), DomainError> {
        if *self.fail.lock().expect("fail mutex poisoned") {
            return Err(DomainError::Unexpected("blob storage unavailable".to_string()));
        }
        self.deleted
            .lock()
            .expect("deleted mutex poisoned")
            .push(key.to_string());
        Ok(())
    }
}
