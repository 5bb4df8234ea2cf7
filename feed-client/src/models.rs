use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
/// Публичная модель поста.
pub struct Post {
    /// Идентификатор поста.
    pub id: i64,
    /// Идентификатор автора.
    pub author_id: i64,
    /// Заголовок поста.
    pub title: String,
    /// Содержимое поста.
    pub content: String,
    /// URL изображения (может быть пустым).
    pub image_url: String,
    /// Ключ загруженного изображения в хранилище сервера.
    #[serde(default)]
    pub uploaded_image_key: Option<String>,
    /// Дата и время создания поста (UTC).
    pub created_at: DateTime<Utc>,
    /// Дата и время последнего обновления, если пост редактировался.
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
/// Счётчики взаимодействий с постом.
pub struct EngagementCounts {
    /// Количество лайков.
    pub like_count: i64,
    /// Количество сохранений.
    pub save_count: i64,
    /// Количество комментариев.
    pub comment_count: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
/// Пост ленты вместе со счётчиками; на проводе это один плоский объект.
pub struct PostView {
    /// Сам пост.
    #[serde(flatten)]
    pub post: Post,
    /// Счётчики взаимодействий.
    #[serde(flatten)]
    pub counts: EngagementCounts,
    /// Оценка популярности; есть только в ленте трендов.
    #[serde(default)]
    pub trending_score: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
/// Страница ленты.
pub struct FeedPage {
    /// Элементы страницы; `None` означает пост, удалённый во время запроса.
    pub page: Vec<Option<PostView>>,
    /// `true`, если это последняя страница.
    pub is_done: bool,
    /// Курсор следующей страницы (пустой на последней).
    pub continue_cursor: String,
}

impl FeedPage {
    /// Итерирует только по существующим постам страницы.
    pub fn posts(&self) -> impl Iterator<Item = &PostView> {
        self.page.iter().flatten()
    }
}

#[derive(Debug, Clone, Default, Serialize)]
/// Параметры запроса страницы ленты.
pub struct PageRequest {
    /// Курсор, полученный с предыдущей страницы.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cursor: Option<String>,
    /// Размер страницы; по умолчанию используется серверный.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
}

impl PageRequest {
    /// Запрос страницы, следующей за `page`, или `None`, если лента закончилась.
    pub fn after(&self, page: &FeedPage) -> Option<Self> {
        (!page.is_done).then(|| Self {
            cursor: Some(page.continue_cursor.clone()),
            limit: self.limit,
        })
    }
}

#[derive(Debug, Clone, Default, Serialize)]
/// Данные нового поста.
pub struct NewPost {
    /// Заголовок (1..255 символов).
    pub title: String,
    /// Содержимое.
    pub content: String,
    /// URL изображения.
    pub image_url: String,
    /// Ключ загруженного изображения.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uploaded_image_key: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
/// Частичное обновление поста: отсутствующие поля не меняются.
pub struct PostUpdate {
    /// Новый заголовок.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Новое содержимое.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    /// Новый URL изображения.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
/// Отношение текущего пользователя к посту.
pub struct InteractionStatus {
    /// Пользователь лайкнул пост.
    pub liked: bool,
    /// Пользователь сохранил пост.
    pub saved: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
/// Пользователи, лайкнувшие пост.
pub struct LikedUsers {
    /// Количество лайков.
    pub like_count: i64,
    /// Идентификаторы пользователей.
    pub user_ids: Vec<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
/// Комментарий к посту.
pub struct Comment {
    /// Идентификатор комментария.
    pub id: i64,
    /// Идентификатор поста.
    pub post_id: i64,
    /// Идентификатор автора.
    pub author_id: i64,
    /// Текст комментария.
    pub text: String,
    /// Дата и время создания (UTC).
    pub created_at: DateTime<Utc>,
    /// Дата и время последнего редактирования.
    pub updated_at: Option<DateTime<Utc>>,
}
