use std::collections::HashMap;

use chrono::Utc;
use tracing::debug;

use crate::data::interaction_repository::InteractionRepository;
use crate::data::post_repository::{PostRepository, RecentQuery};
use crate::domain::error::DomainError;
use crate::domain::interaction::{EngagementCounts, EngagementMetric, Membership};
use crate::domain::pagination::{KeysetCursor, Page, PageLimits, paginate_ranked};
use crate::domain::post::Post;
use crate::domain::ranking::{TrendingWindow, rank_trending};

#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct FeedConfig {
    pub(crate) window: TrendingWindow,
    pub(crate) limits: PageLimits,
}

#[derive(Debug, Clone)]
pub(crate) struct PostView {
    pub(crate) post: Post,
    pub(crate) counts: EngagementCounts,
    pub(crate) trending_score: Option<f64>,
}

/// Страница ленты. `None` - пост удалён между выборкой кандидатов и
/// гидрацией; слот сохраняется, фильтрует его вызывающая сторона.
pub(crate) type FeedPage = Page<Option<PostView>>;

pub(crate) struct FeedService<P: PostRepository, I: InteractionRepository> {
    posts: P,
    interactions: I,
    config: FeedConfig,
}

impl<P: PostRepository, I: InteractionRepository> FeedService<P, I> {
    pub(crate) fn new(posts: P, interactions: I, config: FeedConfig) -> Self {
        Self {
            posts,
            interactions,
            config,
        }
    }

    /// Тренды пересчитываются с нуля на каждый запрос; курсор - id последнего
    /// поста предыдущей страницы.
    pub(crate) async fn list_trending(
        &self,
        cursor: Option<&str>,
        limit: Option<u32>,
    ) -> Result<FeedPage, DomainError> {
        let page_size = self.config.limits.resolve(limit)?;
        let now = Utc::now();
        let window = self.config.window;

        let candidates = self
            .posts
            .list_created_since(window.starts_at(now))
            .await?;
        let candidate_ids: Vec<i64> = candidates.iter().map(|post| post.id).collect();
        let counts = self.counts_by_post(&candidate_ids).await?;

        let ranked = rank_trending(&candidates, &counts, now, window);
        debug!(
            candidates = ranked.len(),
            window_days = window.days(),
            "trending ranking computed"
        );

        let scores: HashMap<i64, f64> = ranked
            .iter()
            .map(|ranked| (ranked.post_id, ranked.score))
            .collect();
        let page = paginate_ranked(ranked, cursor, page_size, |ranked| {
            ranked.post_id.to_string()
        })
        .map(|ranked| ranked.post_id);

        self.hydrate_page(page, Some(&scores)).await
    }

    pub(crate) async fn list_most_liked(
        &self,
        cursor: Option<&str>,
        limit: Option<u32>,
    ) -> Result<FeedPage, DomainError> {
        self.list_by_engagement(EngagementMetric::Likes, cursor, limit)
            .await
    }

    pub(crate) async fn list_most_saved(
        &self,
        cursor: Option<&str>,
        limit: Option<u32>,
    ) -> Result<FeedPage, DomainError> {
        self.list_by_engagement(EngagementMetric::Saves, cursor, limit)
            .await
    }

    pub(crate) async fn list_recent(
        &self,
        cursor: Option<&str>,
        limit: Option<u32>,
    ) -> Result<FeedPage, DomainError> {
        self.list_recent_for(None, cursor, limit).await
    }

    pub(crate) async fn list_by_author(
        &self,
        author_id: i64,
        cursor: Option<&str>,
        limit: Option<u32>,
    ) -> Result<FeedPage, DomainError> {
        self.list_recent_for(Some(author_id), cursor, limit).await
    }

    pub(crate) async fn list_liked_by(
        &self,
        user_id: i64,
        cursor: Option<&str>,
        limit: Option<u32>,
    ) -> Result<FeedPage, DomainError> {
        self.list_by_member(Membership::Liked, user_id, cursor, limit)
            .await
    }

    pub(crate) async fn list_saved_by(
        &self,
        user_id: i64,
        cursor: Option<&str>,
        limit: Option<u32>,
    ) -> Result<FeedPage, DomainError> {
        self.list_by_member(Membership::Saved, user_id, cursor, limit)
            .await
    }

    async fn list_by_engagement(
        &self,
        metric: EngagementMetric,
        cursor: Option<&str>,
        limit: Option<u32>,
    ) -> Result<FeedPage, DomainError> {
        let page_size = self.config.limits.resolve(limit)?;
        let after = KeysetCursor::decode(cursor)?;

        let rows = self
            .interactions
            .list_by_engagement(metric, after, page_size + 1)
            .await?;
        let page = Page::from_overfetch(rows, page_size, |ledger| {
            KeysetCursor::new(ledger.metric(metric), ledger.post_id).encode()
        })
        .map(|ledger| ledger.post_id);

        self.hydrate_page(page, None).await
    }

    async fn list_recent_for(
        &self,
        author_id: Option<i64>,
        cursor: Option<&str>,
        limit: Option<u32>,
    ) -> Result<FeedPage, DomainError> {
        let page_size = self.config.limits.resolve(limit)?;
        let after = KeysetCursor::decode(cursor)?;

        let rows = self
            .posts
            .list_recent(RecentQuery {
                author_id,
                after,
                limit: page_size + 1,
            })
            .await?;
        let page = Page::from_overfetch(rows, page_size, |post| {
            KeysetCursor::new(post.created_at.timestamp_micros(), post.id).encode()
        })
        .map(|post| post.id);

        self.hydrate_page(page, None).await
    }

    async fn list_by_member(
        &self,
        membership: Membership,
        user_id: i64,
        cursor: Option<&str>,
        limit: Option<u32>,
    ) -> Result<FeedPage, DomainError> {
        let page_size = self.config.limits.resolve(limit)?;
        let after = KeysetCursor::decode(cursor)?;

        let rows = self
            .interactions
            .list_by_member(
                membership,
                user_id,
                after.map(|cursor| cursor.id),
                page_size + 1,
            )
            .await?;
        let page = Page::from_overfetch(rows, page_size, |ledger| {
            KeysetCursor::new(ledger.post_id, ledger.post_id).encode()
        })
        .map(|ledger| ledger.post_id);

        self.hydrate_page(page, None).await
    }

    async fn hydrate_page(
        &self,
        page: Page<i64>,
        scores: Option<&HashMap<i64, f64>>,
    ) -> Result<FeedPage, DomainError> {
        let views = self.hydrate(&page.page, scores).await?;
        Ok(Page {
            page: views,
            is_done: page.is_done,
            continue_cursor: page.continue_cursor,
        })
    }

    /// Превращает id кандидатов в view-модели, сохраняя порядок.
    async fn hydrate(
        &self,
        ids: &[i64],
        scores: Option<&HashMap<i64, f64>>,
    ) -> Result<Vec<Option<PostView>>, DomainError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let mut posts: HashMap<i64, Post> = self
            .posts
            .get_posts(ids)
            .await?
            .into_iter()
            .map(|post| (post.id, post))
            .collect();
        let counts = self.counts_by_post(ids).await?;

        let views: Vec<Option<PostView>> = ids
            .iter()
            .map(|id| {
                posts.remove(id).map(|post| PostView {
                    post,
                    counts: counts.get(id).copied().unwrap_or_default(),
                    trending_score: scores.and_then(|scores| scores.get(id).copied()),
                })
            })
            .collect();

        let missing = views.iter().filter(|view| view.is_none()).count();
        if missing > 0 {
            debug!(missing, "feed page references deleted posts");
        }
        Ok(views)
    }

    async fn counts_by_post(
        &self,
        post_ids: &[i64],
    ) -> Result<HashMap<i64, EngagementCounts>, DomainError> {
        Ok(self
            .interactions
            .find_by_posts(post_ids)
            .await?
            .into_iter()
            .map(|ledger| (ledger.post_id, ledger.counts()))
            .collect())
    }
}
