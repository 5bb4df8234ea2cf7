use async_trait::async_trait;

use crate::domain::error::DomainError;
use crate::domain::interaction::{EngagementMetric, InteractionLedger, LedgerMutation, Membership};
use crate::domain::pagination::KeysetCursor;

#[async_trait]
pub(crate) trait InteractionRepository: Send + Sync {
    async fn find_by_post(&self, post_id: i64) -> Result<Option<InteractionLedger>, DomainError>;
    async fn find_by_posts(&self, post_ids: &[i64]) -> Result<Vec<InteractionLedger>, DomainError>;

    /// Атомарно применяет мутацию к ledger поста.
    ///
    /// Чтение, вычисление нового состояния и запись выполняются как одна
    /// операция, поэтому конкурентные лайки не теряются. Отсутствующий ledger
    /// создаётся только для мутаций с `creates_ledger() == true`, иначе
    /// возвращается `None`.
    async fn apply(
        &self,
        post_id: i64,
        mutation: LedgerMutation,
    ) -> Result<Option<InteractionLedger>, DomainError>;

    /// Ledger с `metric >= 1` по убыванию `(metric, post_id)`.
    async fn list_by_engagement(
        &self,
        metric: EngagementMetric,
        after: Option<KeysetCursor>,
        limit: usize,
    ) -> Result<Vec<InteractionLedger>, DomainError>;

    /// Ledger, где пользователь входит в множество `membership`, по убыванию `post_id`.
    async fn list_by_member(
        &self,
        membership: Membership,
        user_id: i64,
        after_post_id: Option<i64>,
        limit: usize,
    ) -> Result<Vec<InteractionLedger>, DomainError>;
}
