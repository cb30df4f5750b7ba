mod chat;
mod error;
mod job_schedulers;
mod reminder;
mod shared;
mod status;
#[cfg(test)]
mod test_support;
mod timetable;
mod updates;
mod webhook;

use actix_web::{dev::Server, web, App, HttpServer};
use job_schedulers::{start_send_daily_digests_job, start_send_due_reminders_job};
use std::net::TcpListener;
use tickler_infra::BotContext;
use tokio_util::sync::CancellationToken;
use tracing::info;
use tracing_actix_web::TracingLogger;
use updates::{start_update_workers, UpdateQueue};

pub fn configure_server_api(cfg: &mut web::ServiceConfig) {
    status::configure_routes(cfg);
    webhook::configure_routes(cfg);
}

pub struct Application {
    server: Server,
    port: u16,
    token: CancellationToken,
}

impl Application {
    pub async fn new(context: BotContext) -> Result<Self, std::io::Error> {
        let token = CancellationToken::new();
        let (queue, receiver) = UpdateQueue::new(context.config.update_queue_capacity);

        let (server, port) = Application::configure_server(context.clone(), queue).await?;
        start_update_workers(
            context.clone(),
            receiver,
            context.config.update_workers,
            token.clone(),
        );
        Application::start_job_schedulers(context, token.clone());

        Ok(Self {
            server,
            port,
            token,
        })
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    fn start_job_schedulers(context: BotContext, token: CancellationToken) {
        start_send_due_reminders_job(context.clone(), token.clone());
        start_send_daily_digests_job(context, token);
    }

    async fn configure_server(
        context: BotContext,
        queue: UpdateQueue,
    ) -> Result<(Server, u16), std::io::Error> {
        let port = context.config.port;
        let address = format!("0.0.0.0:{}", port);
        let listener = TcpListener::bind(&address)?;
        let port = listener.local_addr()?.port();

        let context = web::Data::new(context);
        let queue = web::Data::new(queue);
        let server = HttpServer::new(move || {
            App::new()
                .wrap(TracingLogger::default())
                .app_data(context.clone())
                .app_data(queue.clone())
                .service(web::scope("/api/v1").configure(configure_server_api))
        })
        .listen(listener)?
        .workers(4)
        .run();

        Ok((server, port))
    }

    /// Serves until the server is stopped, then stops the update workers and
    /// the job schedulers
    pub async fn start(self) -> Result<(), std::io::Error> {
        let res = self.server.await;
        info!("Server stopped, stopping background jobs");
        self.token.cancel();
        res
    }
}
