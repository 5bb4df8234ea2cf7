use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};

use super::interaction::EngagementCounts;
use super::post::Post;

const LIKE_WEIGHT: f64 = 0.5;
const SAVE_WEIGHT: f64 = 0.7;
const COMMENT_WEIGHT: f64 = 0.3;
const MILLIS_PER_DAY: f64 = 86_400_000.0;

/// Окно трендов: за его пределами посты не ранжируются, внутри него
/// популярность затухает экспоненциально.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct TrendingWindow {
    days: u32,
}

impl TrendingWindow {
    pub(crate) const DEFAULT_DAYS: u32 = 7;

    pub(crate) fn new(days: u32) -> Self {
        Self {
            days: if days > 0 { days } else { Self::DEFAULT_DAYS },
        }
    }

    pub(crate) fn days(&self) -> u32 {
        self.days
    }

    /// Окно шире диапазона дат chrono начинается с `MIN_UTC`.
    pub(crate) fn starts_at(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        Duration::try_days(i64::from(self.days))
            .and_then(|window| now.checked_sub_signed(window))
            .unwrap_or(DateTime::<Utc>::MIN_UTC)
    }

    fn millis(&self) -> f64 {
        f64::from(self.days) * MILLIS_PER_DAY
    }
}

impl Default for TrendingWindow {
    fn default() -> Self {
        Self::new(Self::DEFAULT_DAYS)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct RankedPost {
    pub(crate) post_id: i64,
    pub(crate) score: f64,
}

pub(crate) fn trending_score(
    counts: EngagementCounts,
    created_at: DateTime<Utc>,
    now: DateTime<Utc>,
    window: TrendingWindow,
) -> f64 {
    let engagement = counts.like_count as f64 * LIKE_WEIGHT
        + counts.save_count as f64 * SAVE_WEIGHT
        + counts.comment_count as f64 * COMMENT_WEIGHT;

    // пост «из будущего» (рассинхрон часов) не должен получать decay > 1
    let age_ms = (now - created_at).num_milliseconds().max(0) as f64;
    let decay = (-age_ms / window.millis()).exp();

    engagement * decay
}

/// Ранжирует кандидатов по убыванию trending score.
///
/// `candidates` должны идти в порядке вставки: сортировка стабильная, поэтому
/// при равных очках этот порядок сохраняется и пагинация детерминирована,
/// пока ledger не меняется. Пост без записи в `counts` считается постом с
/// нулевой активностью.
pub(crate) fn rank_trending(
    candidates: &[Post],
    counts: &HashMap<i64, EngagementCounts>,
    now: DateTime<Utc>,
    window: TrendingWindow,
) -> Vec<RankedPost> {
    let mut ranked: Vec<RankedPost> = candidates
        .iter()
        .map(|post| {
            let post_counts = counts.get(&post.id).copied().unwrap_or_default();
            RankedPost {
                post_id: post.id,
                score: trending_score(post_counts, post.created_at, now, window),
            }
        })
        .collect();

    ranked.sort_by(|a, b| b.score.total_cmp(&a.score));
    ranked
}
