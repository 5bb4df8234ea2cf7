use tracing::debug;

use super::error::DomainError;

/// Одна страница ленты и токен продолжения.
///
/// `continue_cursor` пустой ровно тогда, когда `is_done == true`.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Page<T> {
    pub(crate) page: Vec<T>,
    pub(crate) is_done: bool,
    pub(crate) continue_cursor: String,
}

impl<T> Page<T> {
    /// Собирает страницу из выборки размером до `limit + 1`: лишняя строка
    /// только сигнализирует, что данные ещё есть, и в страницу не попадает.
    pub(crate) fn from_overfetch(
        mut rows: Vec<T>,
        limit: usize,
        cursor_of: impl Fn(&T) -> String,
    ) -> Self {
        let has_more = rows.len() > limit;
        rows.truncate(limit);
        finish(rows, !has_more, cursor_of)
    }

    pub(crate) fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            page: self.page.into_iter().map(f).collect(),
            is_done: self.is_done,
            continue_cursor: self.continue_cursor,
        }
    }
}

/// Режет ранжированную последовательность на страницу после `cursor`.
///
/// Курсор здесь - id последнего элемента предыдущей страницы. Если его больше
/// нет в последовательности (порядок изменился между запросами), отдаётся
/// первая страница: прогресс и завершение гарантируются, exactly-once при
/// конкурентных изменениях - нет.
pub(crate) fn paginate_ranked<T>(
    items: Vec<T>,
    cursor: Option<&str>,
    page_size: usize,
    id_of: impl Fn(&T) -> String,
) -> Page<T> {
    let start = match cursor.filter(|cursor| !cursor.is_empty()) {
        None => 0,
        Some(cursor) => match items.iter().position(|item| id_of(item) == cursor) {
            Some(index) => index + 1,
            None => {
                debug!(cursor, "cursor not found in ranking, restarting from first page");
                0
            }
        },
    };

    let total = items.len();
    let end = start.saturating_add(page_size).min(total);
    let is_done = end >= total;
    let page: Vec<T> = items
        .into_iter()
        .skip(start)
        .take(end.saturating_sub(start))
        .collect();

    finish(page, is_done, id_of)
}

fn finish<T>(page: Vec<T>, is_done: bool, cursor_of: impl Fn(&T) -> String) -> Page<T> {
    let continue_cursor = if is_done {
        String::new()
    } else {
        page.last().map(&cursor_of).unwrap_or_default()
    };

    Page {
        page,
        is_done,
        continue_cursor,
    }
}

/// Позиция в упорядоченном индексе: значение ключа сортировки и id строки.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct KeysetCursor {
    pub(crate) rank: i64,
    pub(crate) id: i64,
}

impl KeysetCursor {
    pub(crate) fn new(rank: i64, id: i64) -> Self {
        Self { rank, id }
    }

    pub(crate) fn encode(&self) -> String {
        format!("{}.{}", self.rank, self.id)
    }

    /// Пустой или отсутствующий курсор означает первую страницу.
    pub(crate) fn decode(raw: Option<&str>) -> Result<Option<Self>, DomainError> {
        let Some(raw) = raw.map(str::trim).filter(|raw| !raw.is_empty()) else {
            return Ok(None);
        };

        let malformed = || DomainError::Validation {
            field: "cursor",
            message: "malformed cursor",
        };

        let (rank, id) = raw.split_once('.').ok_or_else(malformed)?;
        let rank = rank.parse::<i64>().map_err(|_| malformed())?;
        let id = id.parse::<i64>().map_err(|_| malformed())?;

        Ok(Some(Self { rank, id }))
    }
}

/// Ограничения на размер страницы.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct PageLimits {
    pub(crate) default_size: u32,
    pub(crate) max_size: u32,
}

impl PageLimits {
    pub(crate) fn resolve(&self, requested: Option<u32>) -> Result<usize, DomainError> {
        let size = requested.unwrap_or(self.default_size);
        if size == 0 || size > self.max_size {
            return Err(DomainError::Validation {
                field: "limit",
                message: "must be within 1..=max page size",
            });
        }
        Ok(size as usize)
    }
}

impl Default for PageLimits {
    fn default() -> Self {
        Self {
            default_size: 30,
            max_size: 100,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{KeysetCursor, Page, PageLimits, paginate_ranked};
    use crate::domain::error::DomainError;

    fn ids(n: i64) -> Vec<i64> {
        (1..=n).collect()
    }

    fn page(items: Vec<i64>, cursor: Option<&str>, size: usize) -> Page<i64> {
        paginate_ranked(items, cursor, size, |id| id.to_string())
    }

    #[test]
    fn first_page_without_cursor() {
        let result = page(ids(5), None, 2);
        assert_eq!(result.page, vec![1, 2]);
        assert!(!result.is_done);
        assert_eq!(result.continue_cursor, "2");
    }

    #[test]
    fn cursor_continues_after_last_seen_item() {
        let result = page(ids(5), Some("2"), 2);
        assert_eq!(result.page, vec![3, 4]);
        assert!(!result.is_done);
        assert_eq!(result.continue_cursor, "4");
    }

    #[test]
    fn last_page_is_done_with_empty_cursor() {
        let result = page(ids(5), Some("4"), 2);
        assert_eq!(result.page, vec![5]);
        assert!(result.is_done);
        assert_eq!(result.continue_cursor, "");
    }

    #[test]
    fn exact_fit_marks_page_done() {
        let result = page(ids(4), Some("2"), 2);
        assert_eq!(result.page, vec![3, 4]);
        assert!(result.is_done);
        assert!(result.continue_cursor.is_empty());
    }

    #[test]
    fn unknown_cursor_falls_back_to_first_page() {
        let result = page(ids(5), Some("42"), 2);
        assert_eq!(result.page, vec![1, 2]);
        assert_eq!(result.continue_cursor, "2");
    }

    #[test]
    fn empty_sequence_is_done() {
        let result = page(Vec::new(), None, 10);
        assert!(result.page.is_empty());
        assert!(result.is_done);
        assert!(result.continue_cursor.is_empty());
    }

    #[test]
    fn traversal_visits_every_item_exactly_once() {
        let items = ids(23);
        let mut seen = Vec::new();
        let mut cursor: Option<String> = None;

        loop {
            let result = page(items.clone(), cursor.as_deref(), 5);
            seen.extend(result.page);
            if result.is_done {
                break;
            }
            cursor = Some(result.continue_cursor);
        }

        assert_eq!(seen, items);
    }

    #[test]
    fn overfetch_detects_more_rows() {
        let result = Page::from_overfetch(vec![10, 9, 8], 2, |id| id.to_string());
        assert_eq!(result.page, vec![10, 9]);
        assert!(!result.is_done);
        assert_eq!(result.continue_cursor, "9");

        let last = Page::from_overfetch(vec![7], 2, |id| id.to_string());
        assert!(last.is_done);
        assert!(last.continue_cursor.is_empty());
    }

    #[test]
    fn keyset_cursor_encodes_and_decodes() {
        let cursor = KeysetCursor::new(1_700_000_000_000_000, 42);
        let decoded = KeysetCursor::decode(Some(&cursor.encode())).expect("must decode");
        assert_eq!(decoded, Some(cursor));
    }

    #[test]
    fn keyset_cursor_treats_blank_as_first_page() {
        assert_eq!(KeysetCursor::decode(None).expect("none"), None);
        assert_eq!(KeysetCursor::decode(Some("  ")).expect("blank"), None);
    }

    #[test]
    fn keyset_cursor_rejects_garbage() {
        let err = KeysetCursor::decode(Some("abc")).expect_err("must reject");
        assert!(matches!(err, DomainError::Validation { field: "cursor", .. }));
        assert!(KeysetCursor::decode(Some("1.x")).is_err());
    }

    #[test]
    fn page_limits_apply_default_and_bounds() {
        let limits = PageLimits::default();
        assert_eq!(limits.resolve(None).expect("default"), 30);
        assert_eq!(limits.resolve(Some(100)).expect("max"), 100);
        assert!(limits.resolve(Some(0)).is_err());
        assert!(limits.resolve(Some(101)).is_err());
    }
}
