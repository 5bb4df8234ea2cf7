use serde::{Deserialize, Serialize};

/// Денормализованный агрегат взаимодействий с постом.
///
/// Создаётся лениво первым лайком, сохранением или комментарием. Поле
/// `user_id` хранит первого пользователя, затронувшего пост, и для поиска не
/// используется: ledger адресуется только по `post_id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct InteractionLedger {
    pub(crate) id: i64,
    pub(crate) post_id: i64,
    pub(crate) user_id: i64,
    pub(crate) liked_by: Vec<i64>,
    pub(crate) like_count: i64,
    pub(crate) saved_by: Vec<i64>,
    pub(crate) save_count: i64,
    pub(crate) comment_by: Vec<i64>,
    pub(crate) comment_count: i64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct EngagementCounts {
    pub(crate) like_count: i64,
    pub(crate) save_count: i64,
    pub(crate) comment_count: i64,
}

/// Индексированная метрика для лент «самые залайканные / сохранённые».
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum EngagementMetric {
    Likes,
    Saves,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Membership {
    Liked,
    Saved,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LedgerMutation {
    Like(i64),
    Unlike(i64),
    Save(i64),
    Unsave(i64),
    CommentAdded(i64),
    CommentRemoved(i64),
}

impl InteractionLedger {
    /// Пустой ledger для поста, ещё не сохранённый в хранилище.
    pub(crate) fn empty(post_id: i64, actor_id: i64) -> Self {
        Self {
            id: 0,
            post_id,
            user_id: actor_id,
            liked_by: Vec::new(),
            like_count: 0,
            saved_by: Vec::new(),
            save_count: 0,
            comment_by: Vec::new(),
            comment_count: 0,
        }
    }

    pub(crate) fn counts(&self) -> EngagementCounts {
        EngagementCounts {
            like_count: self.like_count,
            save_count: self.save_count,
            comment_count: self.comment_count,
        }
    }

    pub(crate) fn metric(&self, metric: EngagementMetric) -> i64 {
        match metric {
            EngagementMetric::Likes => self.like_count,
            EngagementMetric::Saves => self.save_count,
        }
    }

    pub(crate) fn has_member(&self, membership: Membership, user_id: i64) -> bool {
        match membership {
            Membership::Liked => self.liked_by.contains(&user_id),
            Membership::Saved => self.saved_by.contains(&user_id),
        }
    }
}

impl LedgerMutation {
    pub(crate) fn actor(&self) -> i64 {
        match *self {
            Self::Like(user_id)
            | Self::Unlike(user_id)
            | Self::Save(user_id)
            | Self::Unsave(user_id)
            | Self::CommentAdded(user_id)
            | Self::CommentRemoved(user_id) => user_id,
        }
    }

    /// Удаляющие мутации над отсутствующим ledger ничего не делают.
    pub(crate) fn creates_ledger(&self) -> bool {
        matches!(
            self,
            Self::Like(_) | Self::Save(_) | Self::CommentAdded(_)
        )
    }

    /// Применяет мутацию и возвращает `true`, если состояние изменилось.
    pub(crate) fn apply(&self, ledger: &mut InteractionLedger) -> bool {
        match *self {
            Self::Like(user_id) => add_member(&mut ledger.liked_by, &mut ledger.like_count, user_id),
            Self::Unlike(user_id) => {
                remove_member(&mut ledger.liked_by, &mut ledger.like_count, user_id)
            }
            Self::Save(user_id) => add_member(&mut ledger.saved_by, &mut ledger.save_count, user_id),
            Self::Unsave(user_id) => {
                remove_member(&mut ledger.saved_by, &mut ledger.save_count, user_id)
            }
            Self::CommentAdded(user_id) => {
                ledger.comment_by.push(user_id);
                ledger.comment_count += 1;
                true
            }
            Self::CommentRemoved(user_id) => {
                if let Some(position) = ledger.comment_by.iter().position(|id| *id == user_id) {
                    ledger.comment_by.remove(position);
                }
                let next = (ledger.comment_count - 1).max(0);
                let changed = next != ledger.comment_count;
                ledger.comment_count = next;
                changed
            }
        }
    }
}

fn add_member(members: &mut Vec<i64>, count: &mut i64, user_id: i64) -> bool {
    if members.contains(&user_id) {
        return false;
    }
    members.push(user_id);
    *count += 1;
    true
}

// пользователь, которого нет в множестве, не уменьшает счётчик:
// иначе count разойдётся с |members|
fn remove_member(members: &mut Vec<i64>, count: &mut i64, user_id: i64) -> bool {
    let before = members.len();
    members.retain(|id| *id != user_id);
    if members.len() == before {
        return false;
    }
    *count = (*count - 1).max(0);
    true
}
