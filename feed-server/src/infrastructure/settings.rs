use std::str::FromStr;

use anyhow::{Context, Result, anyhow};

use crate::application::feed_service::FeedConfig;
use crate::domain::pagination::PageLimits;
use crate::domain::ranking::TrendingWindow;

const MAX_TRENDING_WINDOW_DAYS: u32 = 36_500;

#[derive(Debug, Clone)]
pub struct Settings {
    pub database_url: String,
    pub database_max_connections: u32,
    pub jwt_secret: String,
    pub http_addr: String,
    pub cors_origins: Vec<String>,
    pub log_level: String,
    pub http_request_body_limit_bytes: usize,
    pub http_request_timeout_secs: u64,
    pub image_storage_dir: String,
    pub trending_window_days: u32,
    pub feed_default_page_size: u32,
    pub feed_max_page_size: u32,
}

impl Settings {
    pub fn from_env() -> Result<Self> {
        let database_url = get_required("DATABASE_URL").context("DATABASE_URL is required")?;
        let jwt_secret = get_required("JWT_SECRET").context("JWT_SECRET is required")?;

        if jwt_secret.chars().count() < 32 {
            return Err(anyhow!("JWT_SECRET must be at least 32 characters"));
        }

        let http_addr = std::env::var("HTTP_ADDR").unwrap_or_else(|_| "0.0.0.0:8080".to_string());
        let cors_origins = parse_cors_origins(
            std::env::var("CORS_ORIGINS")
                .unwrap_or_else(|_| "http://localhost:8000,http://127.0.0.1:8000".to_string()),
        );
        let log_level = std::env::var("LOG_LEVEL")
            .or_else(|_| std::env::var("RUST_LOG"))
            .unwrap_or_else(|_| "info".to_string());
        let image_storage_dir =
            std::env::var("IMAGE_STORAGE_DIR").unwrap_or_else(|_| "./uploads".to_string());

        let database_max_connections = positive_env("DATABASE_MAX_CONNECTIONS", 10)?;
        let http_request_body_limit_bytes =
            positive_env("HTTP_REQUEST_BODY_LIMIT_BYTES", 1024 * 1024)?;
        let http_request_timeout_secs = positive_env("HTTP_REQUEST_TIMEOUT_SECS", 10)?;
        let trending_window_days = check_window_days(positive_env(
            "TRENDING_WINDOW_DAYS",
            TrendingWindow::DEFAULT_DAYS,
        )?)?;
        let feed_default_page_size = positive_env("FEED_DEFAULT_PAGE_SIZE", 30)?;
        let feed_max_page_size = positive_env("FEED_MAX_PAGE_SIZE", 100)?;

        if feed_default_page_size > feed_max_page_size {
            return Err(anyhow!(
                "FEED_DEFAULT_PAGE_SIZE must not exceed FEED_MAX_PAGE_SIZE"
            ));
        }

        Ok(Self {
            database_url,
            database_max_connections,
            jwt_secret,
            http_addr,
            cors_origins,
            log_level,
            http_request_body_limit_bytes,
            http_request_timeout_secs,
            image_storage_dir,
            trending_window_days,
            feed_default_page_size,
            feed_max_page_size,
        })
    }

    pub(crate) fn feed_config(&self) -> FeedConfig {
        FeedConfig {
            window: TrendingWindow::new(self.trending_window_days),
            limits: PageLimits {
                default_size: self.feed_default_page_size,
                max_size: self.feed_max_page_size,
            },
        }
    }
}

fn get_required(key: &str) -> Result<String> {
    let value = std::env::var(key)?;
    let value = value.trim().to_string();
    if value.is_empty() {
        return Err(anyhow!("{key} must not be empty"));
    }
    Ok(value)
}

fn parse_cors_origins(raw: String) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(str::to_string)
        .collect()
}

fn check_window_days(days: u32) -> Result<u32> {
    if days > MAX_TRENDING_WINDOW_DAYS {
        return Err(anyhow!(
            "TRENDING_WINDOW_DAYS must not exceed {MAX_TRENDING_WINDOW_DAYS}"
        ));
    }
    Ok(days)
}

fn positive_env<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr + PartialEq + Default + ToString,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    parse_positive(key, std::env::var(key).ok(), default)
}

fn parse_positive<T>(key: &str, raw: Option<String>, default: T) -> Result<T>
where
    T: FromStr + PartialEq + Default + ToString,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    let value = raw
        .unwrap_or_else(|| default.to_string())
        .trim()
        .parse::<T>()
        .with_context(|| format!("Failed to parse {key}, expecting positive integer"))?;

    if value == T::default() {
        return Err(anyhow!("{key} must be > 0"));
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::{
        MAX_TRENDING_WINDOW_DAYS, Settings, check_window_days, parse_cors_origins, parse_positive,
    };

    #[test]
    fn parse_positive_uses_default_when_unset() {
        let value: u64 = parse_positive("HTTP_REQUEST_TIMEOUT_SECS", None, 10).expect("default");
        assert_eq!(value, 10);
    }

    #[test]
    fn parse_positive_reads_trimmed_value() {
        let value: usize =
            parse_positive("HTTP_REQUEST_BODY_LIMIT_BYTES", Some(" 2048 ".to_string()), 1)
                .expect("value");
        assert_eq!(value, 2048);
    }

    #[test]
    fn parse_positive_rejects_zero_and_garbage() {
        assert!(parse_positive::<u32>("FEED_MAX_PAGE_SIZE", Some("0".to_string()), 100).is_err());
        assert!(parse_positive::<u32>("FEED_MAX_PAGE_SIZE", Some("-5".to_string()), 100).is_err());
        assert!(parse_positive::<u32>("FEED_MAX_PAGE_SIZE", Some("many".to_string()), 100).is_err());
    }

    #[test]
    fn trending_window_is_capped() {
        assert_eq!(check_window_days(7).expect("default window"), 7);
        assert_eq!(
            check_window_days(MAX_TRENDING_WINDOW_DAYS).expect("widest window"),
            MAX_TRENDING_WINDOW_DAYS
        );
        assert!(check_window_days(MAX_TRENDING_WINDOW_DAYS + 1).is_err());
        assert!(check_window_days(100_000_000).is_err());
    }

    #[test]
    fn parse_cors_origins_skips_blank_entries() {
        let origins = parse_cors_origins(" http://a.test , ,http://b.test,".to_string());
        assert_eq!(origins, vec!["http://a.test", "http://b.test"]);
    }

    #[test]
    fn feed_config_carries_window_and_limits() {
        let settings = Settings {
            database_url: "postgres://localhost/feed".to_string(),
            database_max_connections: 10,
            jwt_secret: "x".repeat(32),
            http_addr: "127.0.0.1:0".to_string(),
            cors_origins: Vec::new(),
            log_level: "info".to_string(),
            http_request_body_limit_bytes: 1024,
            http_request_timeout_secs: 10,
            image_storage_dir: "./uploads".to_string(),
            trending_window_days: 3,
            feed_default_page_size: 20,
            feed_max_page_size: 50,
        };

        let config = settings.feed_config();
        assert_eq!(config.window.days(), 3);
        assert_eq!(config.limits.default_size, 20);
        assert_eq!(config.limits.max_size, 50);
    }
}
