mod telemetry;

use telemetry::{get_subscriber, init_subscriber};
use tickler_api::Application;
use tickler_infra::{run_migration, setup_context, BotContext};
use tracing::{error, info};

async fn register_webhook(context: &BotContext) {
    let self_url = match &context.config.self_url {
        Some(url) => url,
        None => {
            info!("SELF_URL is not set, skipping webhook registration");
            return;
        }
    };

    let webhook_url = format!("{}/api/v1/webhook", self_url);
    match context
        .messenger
        .set_webhook(&webhook_url, &context.config.webhook_secret)
        .await
    {
        Ok(()) => info!(url = %webhook_url, "Telegram webhook registered"),
        Err(e) => error!(error = %e, "Unable to register the Telegram webhook"),
    }
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    openssl_probe::init_ssl_cert_env_vars();

    let subscriber = get_subscriber("tickler".into(), "info".into());
    init_subscriber(subscriber);

    run_migration()
        .await
        .expect("Failed to run database migrations");
    let context = setup_context()
        .await
        .expect("Failed to set up the application context");
    register_webhook(&context).await;

    let app = Application::new(context).await?;
    app.start().await
}
