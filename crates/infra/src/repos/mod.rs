mod chat_settings;
mod job;
mod reminder;
mod shared;
mod timetable;

pub use chat_settings::IChatSettingsRepo;
use chat_settings::{InMemoryChatSettingsRepo, PostgresChatSettingsRepo};
pub use job::IJobRepo;
use job::{InMemoryJobRepo, PostgresJobRepo};
pub use reminder::IReminderRepo;
use reminder::{InMemoryReminderRepo, PostgresReminderRepo};
use sqlx::postgres::PgPoolOptions;
use std::sync::{Arc, Mutex};
use std::time::Duration;
pub use timetable::ITimetableRepo;
use timetable::{InMemoryTimetableRepo, PostgresTimetableRepo};
use tracing::{info, warn};

#[derive(Clone)]
pub struct Repos {
    pub chat_settings: Arc<dyn IChatSettingsRepo>,
    pub reminders: Arc<dyn IReminderRepo>,
    pub jobs: Arc<dyn IJobRepo>,
    pub timetable: Arc<dyn ITimetableRepo>,
}

/// Attempts to reach the database before giving up on startup
const DB_CONNECT_ATTEMPTS: u32 = 10;

impl Repos {
    pub async fn create_postgres(connection_string: &str) -> anyhow::Result<Self> {
        let pool = connect_with_backoff(connection_string).await?;
        Ok(Self {
            chat_settings: Arc::new(PostgresChatSettingsRepo::new(pool.clone())),
            reminders: Arc::new(PostgresReminderRepo::new(pool.clone())),
            jobs: Arc::new(PostgresJobRepo::new(pool.clone())),
            timetable: Arc::new(PostgresTimetableRepo::new(pool)),
        })
    }

    pub fn create_inmemory() -> Self {
        let reminders = Arc::new(Mutex::new(Vec::new()));
        Self {
            chat_settings: Arc::new(InMemoryChatSettingsRepo::new()),
            reminders: Arc::new(InMemoryReminderRepo::new(reminders.clone())),
            jobs: Arc::new(InMemoryJobRepo::new(reminders)),
            timetable: Arc::new(InMemoryTimetableRepo::new()),
        }
    }
}

/// The database may still be starting when the service boots, so connecting
/// is retried with an exponential backoff capped at 30 seconds.
pub(crate) async fn connect_with_backoff(connection_string: &str) -> anyhow::Result<sqlx::PgPool> {
    let mut delay = Duration::from_secs(1);
    let mut attempt = 1;
    loop {
        info!("DB CHECKING CONNECTION ... (attempt {})", attempt);
        match PgPoolOptions::new()
            .max_connections(5)
            .connect(connection_string)
            .await
        {
            Ok(pool) => {
                info!("DB CHECKING CONNECTION ... [done]");
                return Ok(pool);
            }
            Err(e) if attempt < DB_CONNECT_ATTEMPTS => {
                warn!(
                    "Unable to connect to the database: {:?}. Retrying in {:?}",
                    e, delay
                );
                tokio::time::sleep(delay).await;
                delay = std::cmp::min(delay * 2, Duration::from_secs(30));
                attempt += 1;
            }
            Err(e) => return Err(e.into()),
        }
    }
}
