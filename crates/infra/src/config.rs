use std::str::FromStr;
use std::time::Duration;
use tickler_utils::create_random_secret;
use tracing::{info, warn};

#[derive(Debug, Clone)]
pub struct Config {
    /// Port for the application to run on. `0` picks a random free port
    pub port: usize,
    /// Token of the Telegram bot used to send messages
    pub telegram_bot_token: String,
    /// Public base url of this service. When present the Telegram webhook
    /// is registered on startup
    pub self_url: Option<String>,
    /// Secret Telegram has to send in the `X-Telegram-Bot-Api-Secret-Token`
    /// header of every webhook call
    pub webhook_secret: String,
    /// How often pending jobs are checked and dispatched
    pub jobs_interval: Duration,
    /// How often chats are checked for a due daily digest
    pub digest_interval: Duration,
    /// Maximum number of due jobs dispatched in one pass
    pub due_jobs_batch_limit: i64,
    /// Upper bound of a single storage operation
    pub storage_timeout: Duration,
    /// Upper bound of a single message dispatch
    pub dispatch_timeout: Duration,
    /// Number of workers handling inbound updates
    pub update_workers: usize,
    /// Capacity of the queue between the webhook and the update workers
    pub update_queue_capacity: usize,
}

impl Config {
    pub fn new() -> Self {
        let webhook_secret = match std::env::var("TG_WEBHOOK_SECRET") {
            Ok(secret) if !secret.is_empty() => secret,
            _ => {
                info!("Did not find TG_WEBHOOK_SECRET environment variable. Going to create one.");
                let secret = create_random_secret(32);
                info!("Webhook secret was generated and set to: {}", secret);
                secret
            }
        };
        let self_url = std::env::var("SELF_URL")
            .ok()
            .map(|url| url.trim_end_matches('/').to_string())
            .filter(|url| !url.is_empty());

        Self {
            port: parse_env("PORT", 5000),
            telegram_bot_token: std::env::var("TELEGRAM_BOT_TOKEN").unwrap_or_default(),
            self_url,
            webhook_secret,
            jobs_interval: Duration::from_secs(parse_positive_env("JOBS_INTERVAL_SECS", 60)),
            digest_interval: Duration::from_secs(parse_positive_env("DIGEST_INTERVAL_SECS", 30)),
            due_jobs_batch_limit: parse_positive_env("DUE_JOBS_BATCH_LIMIT", 200),
            storage_timeout: Duration::from_secs(parse_positive_env("STORAGE_TIMEOUT_SECS", 5)),
            dispatch_timeout: Duration::from_secs(parse_positive_env("DISPATCH_TIMEOUT_SECS", 10)),
            update_workers: parse_positive_env("UPDATE_WORKERS", 2),
            update_queue_capacity: parse_positive_env("UPDATE_QUEUE_CAPACITY", 100),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

/// Reads `key` from the environment, falling back to `default` when it is
/// missing or invalid.
fn parse_env<T: FromStr + std::fmt::Display>(key: &str, default: T) -> T {
    match std::env::var(key) {
        Ok(value) => parse_or(key, &value, default),
        Err(_) => default,
    }
}

/// Same as `parse_env`, but zero and negative values are invalid too
fn parse_positive_env<T>(key: &str, default: T) -> T
where
    T: FromStr + std::fmt::Display + PartialOrd + Default + Copy,
{
    match std::env::var(key) {
        Ok(value) => positive_or(key, &value, default),
        Err(_) => default,
    }
}

fn positive_or<T>(key: &str, value: &str, default: T) -> T
where
    T: FromStr + std::fmt::Display + PartialOrd + Default + Copy,
{
    let parsed = parse_or(key, value, default);
    if parsed > T::default() {
        return parsed;
    }
    warn!(
        "The given {}: {} must be greater than zero, falling back to the default: {}.",
        key, value, default
    );
    default
}

fn parse_or<T: FromStr + std::fmt::Display>(key: &str, value: &str, default: T) -> T {
    match value.trim().parse::<T>() {
        Ok(parsed) => parsed,
        Err(_) => {
            warn!(
                "The given {}: {} is not valid, falling back to the default: {}.",
                key, value, default
            );
            default
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_valid_values() {
        assert_eq!(parse_or("PORT", "8080", 5000usize), 8080);
        assert_eq!(parse_or("UPDATE_WORKERS", " 4 ", 2usize), 4);
    }

    #[test]
    fn falls_back_on_invalid_values() {
        assert_eq!(parse_or("PORT", "eighty", 5000usize), 5000);
        assert_eq!(parse_or("JOBS_INTERVAL_SECS", "-1", 60u64), 60);
        assert_eq!(parse_or("DUE_JOBS_BATCH_LIMIT", "", 200i64), 200);
    }

    #[test]
    fn falls_back_on_non_positive_values() {
        assert_eq!(positive_or("JOBS_INTERVAL_SECS", "0", 60u64), 60);
        assert_eq!(positive_or("DIGEST_INTERVAL_SECS", " 0 ", 30u64), 30);
        assert_eq!(positive_or("STORAGE_TIMEOUT_SECS", "0", 5u64), 5);
        assert_eq!(positive_or("DISPATCH_TIMEOUT_SECS", "0", 10u64), 10);
        assert_eq!(positive_or("UPDATE_QUEUE_CAPACITY", "0", 100usize), 100);
        assert_eq!(positive_or("DUE_JOBS_BATCH_LIMIT", "-5", 200i64), 200);
        assert_eq!(positive_or("DIGEST_INTERVAL_SECS", "15", 30u64), 15);
    }
}
