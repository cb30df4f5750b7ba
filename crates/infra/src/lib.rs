mod config;
mod repos;
mod services;
mod system;

pub use config::Config;
pub use repos::{IChatSettingsRepo, IJobRepo, IReminderRepo, ITimetableRepo, Repos};
pub use services::*;
use sqlx::migrate::MigrateError;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use system::RealSys;
pub use system::{ISys, StaticSys};

#[derive(Clone)]
pub struct BotContext {
    pub repos: Repos,
    pub config: Config,
    pub sys: Arc<dyn ISys>,
    pub messenger: Arc<dyn IMessenger>,
}

struct ContextParams {
    pub postgres_connection_string: String,
}

impl BotContext {
    async fn create(params: ContextParams) -> anyhow::Result<Self> {
        let repos = Repos::create_postgres(&params.postgres_connection_string).await?;
        let config = Config::new();
        let messenger =
            TelegramMessenger::new(config.telegram_bot_token.clone(), config.dispatch_timeout)?;
        Ok(Self {
            repos,
            config,
            sys: Arc::new(RealSys {}),
            messenger: Arc::new(messenger),
        })
    }

    /// Context backed by in-memory repositories and a recording messenger
    pub fn create_inmemory() -> Self {
        Self {
            repos: Repos::create_inmemory(),
            config: Config::new(),
            sys: Arc::new(RealSys {}),
            messenger: Arc::new(InMemoryMessenger::new()),
        }
    }

    /// Runs a storage operation within the configured storage timeout
    pub async fn storage<T, F>(&self, operation: F) -> anyhow::Result<T>
    where
        F: Future<Output = anyhow::Result<T>>,
    {
        bounded(self.config.storage_timeout, operation).await
    }

    /// Sends a message within the configured dispatch timeout
    pub async fn send(&self, chat_id: i64, text: &str) -> anyhow::Result<()> {
        bounded(
            self.config.dispatch_timeout,
            self.messenger.send_message(chat_id, text),
        )
        .await
    }
}

/// Fails with an error when `operation` does not finish within `limit`
pub async fn bounded<T, F>(limit: Duration, operation: F) -> anyhow::Result<T>
where
    F: Future<Output = anyhow::Result<T>>,
{
    match tokio::time::timeout(limit, operation).await {
        Ok(res) => res,
        Err(_) => Err(anyhow::anyhow!("Operation timed out after {:?}", limit)),
    }
}

/// Will setup the infrastructure context given the environment
pub async fn setup_context() -> anyhow::Result<BotContext> {
    BotContext::create(ContextParams {
        postgres_connection_string: get_psql_connection_string()?,
    })
    .await
}

fn get_psql_connection_string() -> anyhow::Result<String> {
    const PSQL_CONNECTION_STRING: &str = "DATABASE_URL";

    std::env::var(PSQL_CONNECTION_STRING)
        .map_err(|_| anyhow::anyhow!("{} env var to be present.", PSQL_CONNECTION_STRING))
}

pub async fn run_migration() -> anyhow::Result<()> {
    let pool = repos::connect_with_backoff(&get_psql_connection_string()?).await?;
    sqlx::migrate!()
        .run(&pool)
        .await
        .map_err(|e: MigrateError| anyhow::anyhow!("Migration failed: {}", e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn bounded_passes_results_through() {
        let res = bounded(Duration::from_secs(1), async { Ok(5) }).await;
        assert_eq!(res.unwrap(), 5);

        let res: anyhow::Result<()> =
            bounded(Duration::from_secs(1), async { Err(anyhow::anyhow!("boom")) }).await;
        assert_eq!(res.unwrap_err().to_string(), "boom");
    }

    #[tokio::test]
    async fn bounded_times_out() {
        let res = bounded(Duration::from_millis(10), async {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Ok(())
        })
        .await;
        assert!(res.is_err());
    }
}
