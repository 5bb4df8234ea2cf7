use async_trait::async_trait;
use sqlx::{PgPool, Postgres, Transaction};
use tracing::debug;

use super::map_db_error;
use crate::data::interaction_repository::InteractionRepository;
use crate::domain::error::DomainError;
use crate::domain::interaction::{EngagementMetric, InteractionLedger, LedgerMutation, Membership};
use crate::domain::pagination::KeysetCursor;

const LEDGER_COLUMNS: &str = "id, post_id, user_id, liked_by, like_count, saved_by, save_count, comment_by, comment_count";

#[derive(Debug, Clone)]
pub(crate) struct PostgresInteractionRepository {
    pool: PgPool,
}

impl PostgresInteractionRepository {
    pub(crate) fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct LedgerRow {
    id: i64,
    post_id: i64,
    user_id: i64,
    liked_by: Vec<i64>,
    like_count: i64,
    saved_by: Vec<i64>,
    save_count: i64,
    comment_by: Vec<i64>,
    comment_count: i64,
}

impl From<LedgerRow> for InteractionLedger {
    fn from(row: LedgerRow) -> Self {
        Self {
            id: row.id,
            post_id: row.post_id,
            user_id: row.user_id,
            liked_by: row.liked_by,
            like_count: row.like_count,
            saved_by: row.saved_by,
            save_count: row.save_count,
            comment_by: row.comment_by,
            comment_count: row.comment_count,
        }
    }
}

#[async_trait]
impl InteractionRepository for PostgresInteractionRepository {
    async fn find_by_post(&self, post_id: i64) -> Result<Option<InteractionLedger>, DomainError> {
        let row = sqlx::query_as::<_, LedgerRow>(&format!(
            r#"
            SELECT {LEDGER_COLUMNS}
            FROM post_interactions
            WHERE post_id = $1
            "#
        ))
        .bind(post_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(row.map(InteractionLedger::from))
    }

    async fn find_by_posts(&self, post_ids: &[i64]) -> Result<Vec<InteractionLedger>, DomainError> {
        if post_ids.is_empty() {
            return Ok(Vec::new());
        }

        let rows = sqlx::query_as::<_, LedgerRow>(&format!(
            r#"
            SELECT {LEDGER_COLUMNS}
            FROM post_interactions
            WHERE post_id = ANY($1)
            "#
        ))
        .bind(post_ids)
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(rows.into_iter().map(InteractionLedger::from).collect())
    }

    async fn apply(
        &self,
        post_id: i64,
        mutation: LedgerMutation,
    ) -> Result<Option<InteractionLedger>, DomainError> {
        let mut tx = self.pool.begin().await.map_err(map_db_error)?;
        let ledger = apply_in_tx(&mut tx, post_id, mutation).await?;
        tx.commit().await.map_err(map_db_error)?;
        Ok(ledger)
    }

    async fn list_by_engagement(
        &self,
        metric: EngagementMetric,
        after: Option<KeysetCursor>,
        limit: usize,
    ) -> Result<Vec<InteractionLedger>, DomainError> {
        let column = metric_column(metric);
        let rows = sqlx::query_as::<_, LedgerRow>(&format!(
            r#"
            SELECT {LEDGER_COLUMNS}
            FROM post_interactions
            WHERE {column} >= 1
              AND ($1::BIGINT IS NULL OR ({column}, post_id) < ($1, $2))
            ORDER BY {column} DESC, post_id DESC
            LIMIT $3
            "#
        ))
        .bind(after.map(|cursor| cursor.rank))
        .bind(after.map(|cursor| cursor.id))
        .bind(limit as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(rows.into_iter().map(InteractionLedger::from).collect())
    }

    async fn list_by_member(
        &self,
        membership: Membership,
        user_id: i64,
        after_post_id: Option<i64>,
        limit: usize,
    ) -> Result<Vec<InteractionLedger>, DomainError> {
        let column = match membership {
            Membership::Liked => "liked_by",
            Membership::Saved => "saved_by",
        };
        let rows = sqlx::query_as::<_, LedgerRow>(&format!(
            r#"
            SELECT {LEDGER_COLUMNS}
            FROM post_interactions
            WHERE $1 = ANY({column})
              AND ($2::BIGINT IS NULL OR post_id < $2)
            ORDER BY post_id DESC
            LIMIT $3
            "#
        ))
        .bind(user_id)
        .bind(after_post_id)
        .bind(limit as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(rows.into_iter().map(InteractionLedger::from).collect())
    }
}

fn metric_column(metric: EngagementMetric) -> &'static str {
    match metric {
        EngagementMetric::Likes => "like_count",
        EngagementMetric::Saves => "save_count",
    }
}

/// Read-modify-write ledger внутри уже открытой транзакции.
///
/// `SELECT ... FOR UPDATE` держит блокировку строки до commit, так что
/// параллельные мутации одного поста выполняются последовательно.
pub(crate) async fn apply_in_tx(
    tx: &mut Transaction<'_, Postgres>,
    post_id: i64,
    mutation: LedgerMutation,
) -> Result<Option<InteractionLedger>, DomainError> {
    if mutation.creates_ledger() {
        sqlx::query(
            r#"
            INSERT INTO post_interactions (post_id, user_id)
            VALUES ($1, $2)
            ON CONFLICT (post_id) DO NOTHING
            "#,
        )
        .bind(post_id)
        .bind(mutation.actor())
        .execute(&mut **tx)
        .await
        .map_err(map_db_error)?;
    }

    let row = sqlx::query_as::<_, LedgerRow>(&format!(
        r#"
        SELECT {LEDGER_COLUMNS}
        FROM post_interactions
        WHERE post_id = $1
        FOR UPDATE
        "#
    ))
    .bind(post_id)
    .fetch_optional(&mut **tx)
    .await
    .map_err(map_db_error)?;

    let Some(row) = row else {
        debug!(post_id, ?mutation, "no ledger for post, mutation skipped");
        return Ok(None);
    };

    let mut ledger = InteractionLedger::from(row);
    if !mutation.apply(&mut ledger) {
        return Ok(Some(ledger));
    }

    sqlx::query(
        r#"
        UPDATE post_interactions
        SET liked_by = $2,
            like_count = $3,
            saved_by = $4,
            save_count = $5,
            comment_by = $6,
            comment_count = $7
        WHERE id = $1
        "#,
    )
    .bind(ledger.id)
    .bind(&ledger.liked_by)
    .bind(ledger.like_count)
    .bind(&ledger.saved_by)
    .bind(ledger.save_count)
    .bind(&ledger.comment_by)
    .bind(ledger.comment_count)
    .execute(&mut **tx)
    .await
    .map_err(map_db_error)?;

    Ok(Some(ledger))
}
