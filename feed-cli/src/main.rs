use std::fs;
use std::io;
use std::path::Path;
use std::process;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use feed_client::{
    Comment, EngagementCounts, FeedClient, FeedClientError, FeedPage, NewPost, PageRequest, Post,
    PostUpdate,
};

const TOKEN_FILE: &str = ".feed_token";
const DEFAULT_SERVER: &str = "http://127.0.0.1:8080";

#[derive(Debug, Parser)]
#[command(name = "feed-cli", version, about = "CLI клиент для feed-server")]
struct Cli {
    /// Адрес сервера; по умолчанию берётся из FEED_SERVER.
    #[arg(long, global = true)]
    server: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Args)]
struct PageArgs {
    /// Курсор с предыдущей страницы.
    #[arg(long)]
    cursor: Option<String>,
    /// Размер страницы.
    #[arg(long)]
    limit: Option<u32>,
}

impl From<PageArgs> for PageRequest {
    fn from(args: PageArgs) -> Self {
        Self {
            cursor: args.cursor,
            limit: args.limit,
        }
    }
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Сохранить JWT, выданный провайдером идентичности.
    UseToken {
        #[arg(long)]
        token: String,
    },
    /// Создание поста (требует токен).
    Create {
        #[arg(long)]
        title: String,
        #[arg(long)]
        content: String,
        #[arg(long, default_value = "")]
        image_url: String,
        #[arg(long)]
        image_key: Option<String>,
    },
    /// Получение поста по id.
    Get {
        #[arg(long)]
        id: i64,
    },
    /// Обновление поста (требует токен); неуказанные поля не меняются.
    Update {
        #[arg(long)]
        id: i64,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        content: Option<String>,
        #[arg(long)]
        image_url: Option<String>,
    },
    /// Удаление поста (требует токен).
    Delete {
        #[arg(long)]
        id: i64,
    },
    /// Новые посты; с `--author` только посты автора.
    Recent {
        #[arg(long)]
        author: Option<i64>,
        #[command(flatten)]
        page: PageArgs,
    },
    /// Тренды за последние дни.
    Trending {
        #[command(flatten)]
        page: PageArgs,
    },
    /// Самые залайканные посты.
    MostLiked {
        #[command(flatten)]
        page: PageArgs,
    },
    /// Самые сохраняемые посты.
    MostSaved {
        #[command(flatten)]
        page: PageArgs,
    },
    /// Посты, которые лайкнул пользователь.
    Liked {
        #[arg(long)]
        user: i64,
        #[command(flatten)]
        page: PageArgs,
    },
    /// Посты, которые сохранил пользователь.
    Saved {
        #[arg(long)]
        user: i64,
        #[command(flatten)]
        page: PageArgs,
    },
    /// Счётчики поста и статус текущего пользователя, если есть токен.
    Counts {
        #[arg(long)]
        id: i64,
    },
    /// Лайк (требует токен).
    Like {
        #[arg(long)]
        id: i64,
    },
    /// Снять лайк (требует токен).
    Unlike {
        #[arg(long)]
        id: i64,
    },
    /// Сохранить пост (требует токен).
    Save {
        #[arg(long)]
        id: i64,
    },
    /// Убрать из сохранённых (требует токен).
    Unsave {
        #[arg(long)]
        id: i64,
    },
    /// Добавить комментарий (требует токен).
    Comment {
        #[arg(long)]
        post: i64,
        #[arg(long)]
        text: String,
    },
    /// Изменить свой комментарий (требует токен).
    EditComment {
        #[arg(long)]
        id: i64,
        #[arg(long)]
        text: String,
    },
    /// Удалить свой комментарий (требует токен).
    Uncomment {
        #[arg(long)]
        id: i64,
    },
    /// Комментарии поста.
    Comments {
        #[arg(long)]
        post: i64,
    },
}

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        eprintln!("Ошибка: {err}");
        process::exit(1);
    }
}

async fn run() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let server = resolve_server(cli.server, std::env::var("FEED_SERVER").ok());
    let mut client = FeedClient::new(server).map_err(map_client_error)?;

    if let Some(token) = load_token().context("не удалось прочитать .feed_token")? {
        client.set_token(token);
    }

    match cli.command {
        Command::UseToken { token } => {
            let token = parse_token_content(&token).context("токен не должен быть пустым")?;
            fs::write(TOKEN_FILE, token).context("не удалось сохранить токен")?;
            println!("Токен сохранён в {TOKEN_FILE}");
        }
        Command::Create {
            title,
            content,
            image_url,
            image_key,
        } => {
            let post = client
                .create_post(&NewPost {
                    title,
                    content,
                    image_url,
                    uploaded_image_key: image_key,
                })
                .await
                .map_err(map_client_error)?;
            print_post("Пост создан", &post);
        }
        Command::Get { id } => {
            let post = client.get_post(id).await.map_err(map_client_error)?;
            print_post("Пост", &post);
        }
        Command::Update {
            id,
            title,
            content,
            image_url,
        } => {
            let post = client
                .update_post(
                    id,
                    &PostUpdate {
                        title,
                        content,
                        image_url,
                    },
                )
                .await
                .map_err(map_client_error)?;
            print_post("Пост обновлён", &post);
        }
        Command::Delete { id } => {
            client.delete_post(id).await.map_err(map_client_error)?;
            println!("Пост удалён: id={id}");
        }
        Command::Recent { author, page } => {
            let page = PageRequest::from(page);
            let feed = match author {
                Some(author) => client.author_posts(author, &page).await,
                None => client.recent(&page).await,
            }
            .map_err(map_client_error)?;
            print_feed("Новые посты", &feed);
        }
        Command::Trending { page } => {
            let feed = client
                .trending(&page.into())
                .await
                .map_err(map_client_error)?;
            print_feed("Тренды", &feed);
        }
        Command::MostLiked { page } => {
            let feed = client
                .most_liked(&page.into())
                .await
                .map_err(map_client_error)?;
            print_feed("Самые залайканные", &feed);
        }
        Command::MostSaved { page } => {
            let feed = client
                .most_saved(&page.into())
                .await
                .map_err(map_client_error)?;
            print_feed("Самые сохраняемые", &feed);
        }
        Command::Liked { user, page } => {
            let feed = client
                .liked_posts(user, &page.into())
                .await
                .map_err(map_client_error)?;
            print_feed("Лайкнутые посты", &feed);
        }
        Command::Saved { user, page } => {
            let feed = client
                .saved_posts(user, &page.into())
                .await
                .map_err(map_client_error)?;
            print_feed("Сохранённые посты", &feed);
        }
        Command::Counts { id } => {
            let counts = client.post_counts(id).await.map_err(map_client_error)?;
            println!("id: {id}");
            println!("{}", format_counts(&counts));
            if client.get_token().is_some() {
                let status = client
                    .interaction_status(id)
                    .await
                    .map_err(map_client_error)?;
                println!("liked: {}, saved: {}", status.liked, status.saved);
            }
        }
        Command::Like { id } => {
            client.like(id).await.map_err(map_client_error)?;
            println!("Лайк поставлен: id={id}");
        }
        Command::Unlike { id } => {
            client.unlike(id).await.map_err(map_client_error)?;
            println!("Лайк снят: id={id}");
        }
        Command::Save { id } => {
            client.save(id).await.map_err(map_client_error)?;
            println!("Пост сохранён: id={id}");
        }
        Command::Unsave { id } => {
            client.unsave(id).await.map_err(map_client_error)?;
            println!("Пост убран из сохранённых: id={id}");
        }
        Command::Comment { post, text } => {
            let id = client
                .add_comment(post, &text)
                .await
                .map_err(map_client_error)?;
            println!("Комментарий добавлен: id={id}");
        }
        Command::EditComment { id, text } => {
            client
                .update_comment(id, &text)
                .await
                .map_err(map_client_error)?;
            println!("Комментарий обновлён: id={id}");
        }
        Command::Uncomment { id } => {
            client.remove_comment(id).await.map_err(map_client_error)?;
            println!("Комментарий удалён: id={id}");
        }
        Command::Comments { post } => {
            let comments = client.comments(post).await.map_err(map_client_error)?;
            print_comments(post, &comments);
        }
    }

    Ok(())
}

fn resolve_server(flag: Option<String>, env: Option<String>) -> String {
    let raw = flag
        .or(env)
        .filter(|server| !server.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_SERVER.to_string());
    normalize_server(raw.trim().to_string())
}

fn normalize_server(server: String) -> String {
    if server.starts_with("http://") || server.starts_with("https://") {
        return server;
    }

    format!("http://{server}")
}

fn parse_token_content(raw: &str) -> Option<String> {
    let token = raw.trim().to_string();
    if token.is_empty() {
        return None;
    }
    Some(token)
}

fn load_token() -> io::Result<Option<String>> {
    if !Path::new(TOKEN_FILE).exists() {
        return Ok(None);
    }

    let raw = fs::read_to_string(TOKEN_FILE)?;
    Ok(parse_token_content(&raw))
}

fn map_client_error(err: FeedClientError) -> anyhow::Error {
    let message = match err {
        FeedClientError::Unauthorized => {
            "требуется авторизация: сохраните токен через `feed-cli use-token --token ...`"
                .to_string()
        }
        FeedClientError::Forbidden => "операция доступна только автору".to_string(),
        FeedClientError::NotFound => "ресурс не найден".to_string(),
        FeedClientError::InvalidRequest(message) => format!("некорректный запрос: {message}"),
        FeedClientError::Http(err) => format!("ошибка HTTP: {err}"),
    };
    anyhow::anyhow!(message)
}

fn format_counts(counts: &EngagementCounts) -> String {
    format!(
        "likes: {}, saves: {}, comments: {}",
        counts.like_count, counts.save_count, counts.comment_count
    )
}

fn print_post(title: &str, post: &Post) {
    println!("{title}");
    println!("id: {}", post.id);
    println!("title: {}", post.title);
    println!("content: {}", post.content);
    println!("author_id: {}", post.author_id);
    if !post.image_url.is_empty() {
        println!("image_url: {}", post.image_url);
    }
    println!("created_at: {}", post.created_at);
    if let Some(updated_at) = post.updated_at {
        println!("updated_at: {updated_at}");
    }
}

fn print_feed(title: &str, feed: &FeedPage) {
    println!("{title}: {}", feed.posts().count());

    for slot in &feed.page {
        match slot {
            Some(view) => {
                let score = view
                    .trending_score
                    .map(|score| format!(", score={score:.3}"))
                    .unwrap_or_default();
                println!(
                    "- [{}] {} (author_id={}, {}{score})",
                    view.post.id,
                    view.post.title,
                    view.post.author_id,
                    format_counts(&view.counts)
                );
            }
            None => println!("- (пост удалён)"),
        }
    }

    if !feed.is_done {
        println!("Следующая страница: --cursor {}", feed.continue_cursor);
    }
}

fn print_comments(post_id: i64, comments: &[Comment]) {
    println!("Комментарии к посту {post_id}: {}", comments.len());
    for comment in comments {
        println!(
            "- [{}] author_id={}: {}",
            comment.id, comment.author_id, comment.text
        );
    }
}
