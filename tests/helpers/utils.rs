use serde_json::{json, Value};
use std::time::Duration;
use tickler_infra::InMemoryMessenger;

pub fn text_update(update_id: i64, chat_id: i64, text: &str) -> Value {
    json!({
        "update_id": update_id,
        "message": {
            "message_id": update_id,
            "date": 1741590000,
            "chat": { "id": chat_id, "type": "private" },
            "from": { "id": chat_id, "is_bot": false, "first_name": "Ann" },
            "text": text
        }
    })
}

/// Waits until `count` messages were sent to the chat or gives up after a second
pub async fn wait_for_replies(messenger: &InMemoryMessenger, chat_id: i64, count: usize) -> Vec<String> {
    for _ in 0..100 {
        let replies = messenger.sent_to(chat_id);
        if replies.len() >= count {
            return replies;
        }
        actix_web::rt::time::sleep(Duration::from_millis(10)).await;
    }
    messenger.sent_to(chat_id)
}
