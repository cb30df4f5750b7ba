use crate::error::TicklerError;
use crate::updates::UpdateQueue;
use actix_web::{web, HttpRequest, HttpResponse};
use tickler_api_structs::receive_update::*;
use tickler_api_structs::SECRET_TOKEN_HEADER;
use tickler_infra::BotContext;

fn protect_webhook(http_req: &HttpRequest, ctx: &BotContext) -> Result<(), TicklerError> {
    let secret = http_req
        .headers()
        .get(SECRET_TOKEN_HEADER)
        .and_then(|secret| secret.to_str().ok());

    match secret {
        Some(secret) if secret == ctx.config.webhook_secret => Ok(()),
        Some(_) => Err(TicklerError::Forbidden(
            "Invalid webhook secret token".into(),
        )),
        None => Err(TicklerError::Forbidden(format!(
            "Missing the `{}` header",
            SECRET_TOKEN_HEADER
        ))),
    }
}

/// Accepts an update pushed by Telegram and hands it to the update workers.
/// Updates that do not fit into the queue are dropped but still
/// acknowledged, otherwise Telegram keeps redelivering them.
pub async fn receive_update_controller(
    http_req: HttpRequest,
    body: web::Bytes,
    ctx: web::Data<BotContext>,
    queue: web::Data<UpdateQueue>,
) -> Result<HttpResponse, TicklerError> {
    protect_webhook(&http_req, &ctx)?;

    let update: RequestBody = serde_json::from_slice(&body)
        .map_err(|e| TicklerError::BadClientData(format!("Malformed update: {}", e)))?;

    let accepted = queue.enqueue(update);
    Ok(HttpResponse::Ok().json(APIResponse { accepted }))
}
