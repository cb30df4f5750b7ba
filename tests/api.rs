mod helpers;

use chrono::{TimeZone, Utc};
use helpers::setup::spawn_app;
use helpers::utils::{text_update, wait_for_replies};
use tickler_api_structs::{get_service_health, receive_update, SECRET_TOKEN_HEADER};

fn now() -> chrono::DateTime<Utc> {
    // Monday 2025-03-10 10:00 in UTC+3
    Utc.with_ymd_and_hms(2025, 3, 10, 7, 0, 0).unwrap()
}

#[actix_web::test]
async fn test_status_ok() {
    let app = spawn_app(now()).await;
    let res = reqwest::get(format!("{}/live", app.address))
        .await
        .expect("Expected status endpoint to respond");

    assert!(res.status().is_success());
    let body = res
        .json::<get_service_health::APIResponse>()
        .await
        .expect("Expected json body");
    assert_eq!(body.message, "ok");
}

#[actix_web::test]
async fn test_webhook_rejects_wrong_secret() {
    let app = spawn_app(now()).await;
    let client = reqwest::Client::new();

    let res = client
        .post(format!("{}/webhook", app.address))
        .json(&text_update(1, 10, "/start"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status().as_u16(), 403);

    let res = client
        .post(format!("{}/webhook", app.address))
        .header(SECRET_TOKEN_HEADER, "not-the-secret")
        .json(&text_update(1, 10, "/start"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status().as_u16(), 403);
    assert!(app.messenger.sent().is_empty());
}

#[actix_web::test]
async fn test_webhook_rejects_malformed_update() {
    let app = spawn_app(now()).await;

    let res = reqwest::Client::new()
        .post(format!("{}/webhook", app.address))
        .header(SECRET_TOKEN_HEADER, app.config.webhook_secret.as_str())
        .header("Content-Type", "application/json")
        .body("{ not json")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status().as_u16(), 400);
}

#[actix_web::test]
async fn test_webhook_creates_reminder() {
    let app = spawn_app(now()).await;
    let client = reqwest::Client::new();

    for (update_id, text) in [(1, "/timezone UTC+3"), (2, "tomorrow 18:00 dentist")] {
        let res = client
            .post(format!("{}/webhook", app.address))
            .header(SECRET_TOKEN_HEADER, app.config.webhook_secret.as_str())
            .json(&text_update(update_id, 10, text))
            .send()
            .await
            .unwrap();
        assert!(res.status().is_success());
        let body = res.json::<receive_update::APIResponse>().await.unwrap();
        assert!(body.accepted);

        // Wait for each reply so the two updates are handled in order
        wait_for_replies(&app.messenger, 10, update_id as usize).await;
    }

    let replies = app.messenger.sent_to(10);
    assert_eq!(replies.len(), 2);
    assert_eq!(
        replies[1],
        "✅ Saved: dentist on Tue, 11 Mar 18:00. I will remind you 30 min before."
    );

    let settings = app.ctx.repos.chat_settings.find(10).await.unwrap().unwrap();
    assert_eq!(settings.timezone, "UTC+3");
    let reminders = app
        .ctx
        .repos
        .reminders
        .find_upcoming(10, now(), None, 50)
        .await
        .unwrap();
    assert_eq!(reminders.len(), 1);
    assert_eq!(reminders[0].message, "dentist");
}

#[actix_web::test]
async fn test_webhook_acknowledges_updates_without_text() {
    let app = spawn_app(now()).await;

    let res = reqwest::Client::new()
        .post(format!("{}/webhook", app.address))
        .header(SECRET_TOKEN_HEADER, app.config.webhook_secret.as_str())
        .json(&serde_json::json!({ "update_id": 7 }))
        .send()
        .await
        .unwrap();
    assert!(res.status().is_success());
}
