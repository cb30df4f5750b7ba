mod command;

use crate::chat::{set_digest_time::set_digest_time_command, set_timezone::set_timezone_command};
use crate::reminder::{
    create_reminder::create_reminder_command, list_upcoming::list_upcoming_command,
};
use crate::timetable::timetable_command;
use command::Command;
use std::sync::Arc;
use tickler_api_structs::dtos::UpdateDTO;
use tickler_infra::BotContext;
use tokio::sync::{
    mpsc::{self, error::TrySendError},
    Mutex,
};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

pub const STORAGE_FAILURE_REPLY: &str = "Something went wrong on my side, please try again later.";

pub const HELP_TEXT: &str = "Hi! I am Tickler, I remind you of things.\n\
     Commands:\n\
     • /timezone Europe/Moscow: set your timezone\n\
     • /report 20:00: get a digest of tomorrow every evening\n\
     • /list today | week | all: show what is scheduled\n\
     • /timetable: keep a weekly timetable\n\
     Or just write something like \"tuesday 14:00 meeting\" or \"every monday 09:00 standup\" and I will remind you.";

/// The sending half of the bounded queue between the webhook and the update
/// workers
#[derive(Clone)]
pub struct UpdateQueue {
    sender: mpsc::Sender<UpdateDTO>,
}

impl UpdateQueue {
    pub fn new(capacity: usize) -> (Self, mpsc::Receiver<UpdateDTO>) {
        let (sender, receiver) = mpsc::channel(capacity.max(1));
        (Self { sender }, receiver)
    }

    /// Returns `false` when the update was dropped
    pub fn enqueue(&self, update: UpdateDTO) -> bool {
        match self.sender.try_send(update) {
            Ok(()) => true,
            Err(TrySendError::Full(update)) => {
                warn!(
                    update_id = update.update_id,
                    "Update queue is full, dropping update"
                );
                false
            }
            Err(TrySendError::Closed(update)) => {
                warn!(
                    update_id = update.update_id,
                    "Update workers are gone, dropping update"
                );
                false
            }
        }
    }
}

/// Spawns `workers` tasks that take turns receiving from the queue until
/// `token` is cancelled
pub fn start_update_workers(
    ctx: BotContext,
    receiver: mpsc::Receiver<UpdateDTO>,
    workers: usize,
    token: CancellationToken,
) {
    let receiver = Arc::new(Mutex::new(receiver));
    for worker in 0..workers.max(1) {
        let ctx = ctx.clone();
        let receiver = receiver.clone();
        let token = token.clone();
        actix_web::rt::spawn(async move {
            loop {
                let update = tokio::select! {
                    _ = token.cancelled() => break,
                    update = async { receiver.lock().await.recv().await } => update,
                };
                match update {
                    Some(update) => handle_update(&ctx, update).await,
                    None => break,
                }
            }
            info!(worker = worker, "Update worker stopped");
        });
    }
}

/// Answers a single update from a chat
pub async fn handle_update(ctx: &BotContext, update: UpdateDTO) {
    let (chat_id, text) = match update.text_message() {
        Some(message) => message,
        None => {
            debug!(update_id = update.update_id, "Ignoring update without text");
            return;
        }
    };

    if let Err(e) = ctx.storage(ctx.repos.chat_settings.ensure(chat_id)).await {
        error!(chat_id = chat_id, error = %e, "Unable to ensure chat settings");
    }

    let reply = match Command::parse(text) {
        Command::Help => HELP_TEXT.to_string(),
        Command::Timezone(args) => set_timezone_command(ctx, chat_id, args).await,
        Command::Report(args) => set_digest_time_command(ctx, chat_id, args).await,
        Command::List(args) => list_upcoming_command(ctx, chat_id, args).await,
        Command::Timetable(args) => timetable_command(ctx, chat_id, args).await,
        Command::Text(text) => create_reminder_command(ctx, chat_id, text).await,
    };

    if let Err(e) = ctx.send(chat_id, &reply).await {
        error!(chat_id = chat_id, error = %e, "Unable to reply to chat");
    }
}
