use chrono::{DateTime, Utc};
use std::sync::Arc;
use tickler_api::Application;
use tickler_infra::{BotContext, Config, InMemoryMessenger, StaticSys};

pub struct TestApp {
    pub config: Config,
    pub address: String,
    pub ctx: BotContext,
    pub messenger: Arc<InMemoryMessenger>,
}

// Launch the application as a background task
pub async fn spawn_app(now: DateTime<Utc>) -> TestApp {
    let messenger = Arc::new(InMemoryMessenger::new());
    let mut ctx = BotContext::create_inmemory();
    ctx.config.port = 0; // Random port
    ctx.sys = Arc::new(StaticSys::new(now));
    ctx.messenger = messenger.clone();

    let config = ctx.config.clone();
    let application = Application::new(ctx.clone())
        .await
        .expect("Failed to build application.");

    let address = format!("http://localhost:{}/api/v1", application.port());
    let _ = actix_web::rt::spawn(async move {
        application
            .start()
            .await
            .expect("Expected application to start");
    });

    TestApp {
        config,
        address,
        ctx,
        messenger,
    }
}
