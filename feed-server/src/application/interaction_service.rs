use tracing::debug;

use crate::data::interaction_repository::InteractionRepository;
use crate::data::post_repository::PostRepository;
use crate::domain::error::DomainError;
use crate::domain::interaction::{EngagementCounts, LedgerMutation, Membership};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct InteractionStatus {
    pub(crate) liked: bool,
    pub(crate) saved: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct LikedUsers {
    pub(crate) like_count: i64,
    pub(crate) user_ids: Vec<i64>,
}

pub(crate) struct InteractionService<P: PostRepository, I: InteractionRepository> {
    posts: P,
    interactions: I,
}

impl<P: PostRepository, I: InteractionRepository> InteractionService<P, I> {
    pub(crate) fn new(posts: P, interactions: I) -> Self {
        Self {
            posts,
            interactions,
        }
    }

    pub(crate) async fn like_post(&self, post_id: i64, user_id: i64) -> Result<(), DomainError> {
        self.mutate(post_id, LedgerMutation::Like(user_id)).await
    }

    pub(crate) async fn unlike_post(&self, post_id: i64, user_id: i64) -> Result<(), DomainError> {
        self.mutate(post_id, LedgerMutation::Unlike(user_id)).await
    }

    pub(crate) async fn save_post(&self, post_id: i64, user_id: i64) -> Result<(), DomainError> {
        self.mutate(post_id, LedgerMutation::Save(user_id)).await
    }

    pub(crate) async fn unsave_post(&self, post_id: i64, user_id: i64) -> Result<(), DomainError> {
        self.mutate(post_id, LedgerMutation::Unsave(user_id)).await
    }

    pub(crate) async fn counts(&self, post_id: i64) -> Result<EngagementCounts, DomainError> {
        self.ensure_post_exists(post_id).await?;
        Ok(self
            .interactions
            .find_by_post(post_id)
            .await?
            .map(|ledger| ledger.counts())
            .unwrap_or_default())
    }

    pub(crate) async fn status(
        &self,
        post_id: i64,
        user_id: i64,
    ) -> Result<InteractionStatus, DomainError> {
        self.ensure_post_exists(post_id).await?;
        let ledger = self.interactions.find_by_post(post_id).await?;

        Ok(InteractionStatus {
            liked: ledger
                .as_ref()
                .is_some_and(|ledger| ledger.has_member(Membership::Liked, user_id)),
            saved: ledger
                .as_ref()
                .is_some_and(|ledger| ledger.has_member(Membership::Saved, user_id)),
        })
    }

    pub(crate) async fn liked_users(&self, post_id: i64) -> Result<LikedUsers, DomainError> {
        self.ensure_post_exists(post_id).await?;
        let liked = match self.interactions.find_by_post(post_id).await? {
            Some(ledger) => LikedUsers {
                like_count: ledger.like_count,
                user_ids: ledger.liked_by,
            },
            None => LikedUsers {
                like_count: 0,
                user_ids: Vec::new(),
            },
        };
        Ok(liked)
    }

    async fn mutate(&self, post_id: i64, mutation: LedgerMutation) -> Result<(), DomainError> {
        self.ensure_post_exists(post_id).await?;
        let ledger = self.interactions.apply(post_id, mutation).await?;
        debug!(
            post_id,
            ?mutation,
            like_count = ledger.as_ref().map(|ledger| ledger.like_count),
            save_count = ledger.as_ref().map(|ledger| ledger.save_count),
            "ledger mutation applied"
        );
        Ok(())
    }

    async fn ensure_post_exists(&self, post_id: i64) -> Result<(), DomainError> {
        self.posts
            .get_post(post_id)
            .await?
            .map(|_| ())
            .ok_or(DomainError::post_not_found(post_id))
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::{InteractionService, InteractionStatus};
    use crate::data::repositories::memory::MemoryStore;
    use crate::domain::error::DomainError;
    use crate::domain::interaction::EngagementCounts;

    fn service(store: &MemoryStore) -> InteractionService<MemoryStore, MemoryStore> {
        InteractionService::new(store.clone(), store.clone())
    }

    #[tokio::test]
    async fn post_without_ledger_has_zero_counts() {
        let store = MemoryStore::new();
        let post = store.seed_post(1, "post", Utc::now());

        let counts = service(&store)
            .counts(post.id)
            .await
            .expect("counts must succeed");

        assert_eq!(counts, EngagementCounts::default());
        assert!(store.ledger(post.id).is_none());
    }

    #[tokio::test]
    async fn first_like_creates_ledger_owned_by_actor() {
        let store = MemoryStore::new();
        let post = store.seed_post(1, "post", Utc::now());

        service(&store)
            .like_post(post.id, 42)
            .await
            .expect("like must succeed");

        let ledger = store.ledger(post.id).expect("ledger must be created");
        assert_eq!(ledger.liked_by, vec![42]);
        assert_eq!(ledger.like_count, 1);
        assert_eq!(ledger.user_id, 42);
    }

    #[tokio::test]
    async fn like_twice_equals_like_once() {
        let store = MemoryStore::new();
        let post = store.seed_post(1, "post", Utc::now());
        let service = service(&store);

        service.like_post(post.id, 5).await.expect("like");
        let once = store.ledger(post.id);
        service.like_post(post.id, 5).await.expect("like again");

        assert_eq!(store.ledger(post.id), once);
    }

    #[tokio::test]
    async fn unlike_restores_previous_state() {
        let store = MemoryStore::new();
        let post = store.seed_post(1, "post", Utc::now());
        let service = service(&store);
        service.like_post(post.id, 1).await.expect("like");
        let before = store.ledger(post.id);

        service.like_post(post.id, 2).await.expect("like");
        service.unlike_post(post.id, 2).await.expect("unlike");

        assert_eq!(store.ledger(post.id), before);
    }

    #[tokio::test]
    async fn unlike_and_unsave_without_ledger_are_noops() {
        let store = MemoryStore::new();
        let post = store.seed_post(1, "post", Utc::now());
        let service = service(&store);

        service.unlike_post(post.id, 3).await.expect("unlike");
        service.unsave_post(post.id, 3).await.expect("unsave");

        assert!(store.ledger(post.id).is_none());
    }

    #[tokio::test]
    async fn unsave_at_zero_stays_zero() {
        let store = MemoryStore::new();
        let post = store.seed_post(1, "post", Utc::now());
        let service = service(&store);
        service.like_post(post.id, 1).await.expect("like");

        service.unsave_post(post.id, 1).await.expect("unsave");
        service.unsave_post(post.id, 1).await.expect("unsave");

        let ledger = store.ledger(post.id).expect("ledger must exist");
        assert_eq!(ledger.save_count, 0);
    }

    #[tokio::test]
    async fn status_reflects_membership() {
        let store = MemoryStore::new();
        let post = store.seed_post(1, "post", Utc::now());
        let service = service(&store);
        service.save_post(post.id, 9).await.expect("save");

        let status = service.status(post.id, 9).await.expect("status");
        assert_eq!(
            status,
            InteractionStatus {
                liked: false,
                saved: true
            }
        );

        let stranger = service.status(post.id, 10).await.expect("status");
        assert!(!stranger.liked && !stranger.saved);
    }

    #[tokio::test]
    async fn liked_users_lists_members() {
        let store = MemoryStore::new();
        let post = store.seed_post(1, "post", Utc::now());
        let service = service(&store);

        let empty = service.liked_users(post.id).await.expect("liked users");
        assert_eq!(empty.like_count, 0);
        assert!(empty.user_ids.is_empty());

        service.like_post(post.id, 4).await.expect("like");
        service.like_post(post.id, 6).await.expect("like");
        let liked = service.liked_users(post.id).await.expect("liked users");
        assert_eq!(liked.like_count, 2);
        assert_eq!(liked.user_ids, vec![4, 6]);
    }

    #[tokio::test]
    async fn mutations_on_missing_post_are_not_found() {
        let store = MemoryStore::new();
        let err = service(&store)
            .like_post(404, 1)
            .await
            .expect_err("missing post must fail");
        assert!(matches!(err, DomainError::NotFound(_)));
        assert!(store.ledger(404).is_none());
    }
}
