use serde::{Deserialize, Serialize};

/// An incoming update from the Telegram Bot API. Only the parts the bot
/// acts upon are modelled, everything else is ignored.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct UpdateDTO {
    pub update_id: i64,
    #[serde(default)]
    pub message: Option<MessageDTO>,
    #[serde(default)]
    pub edited_message: Option<MessageDTO>,
}

impl UpdateDTO {
    /// The chat and the text of the update, if it carries a text message
    pub fn text_message(&self) -> Option<(i64, &str)> {
        let message = self.message.as_ref()?;
        let text = message.text.as_deref()?;
        Some((message.chat.id, text))
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct MessageDTO {
    pub message_id: i64,
    pub chat: ChatDTO,
    #[serde(default)]
    pub from: Option<UserDTO>,
    /// Unix time in seconds
    pub date: i64,
    #[serde(default)]
    pub text: Option<String>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ChatDTO {
    pub id: i64,
    #[serde(rename = "type")]
    pub kind: String,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct UserDTO {
    pub id: i64,
    #[serde(default)]
    pub is_bot: bool,
    pub first_name: String,
    #[serde(default)]
    pub username: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_text_update() {
        let raw = r#"{
            "update_id": 10,
            "message": {
                "message_id": 3,
                "from": {"id": 42, "is_bot": false, "first_name": "Ada", "language_code": "en"},
                "chat": {"id": 42, "first_name": "Ada", "type": "private"},
                "date": 1741590000,
                "text": "tomorrow 18:00 dentist"
            }
        }"#;
        let update: UpdateDTO = serde_json::from_str(raw).unwrap();
        assert_eq!(update.text_message(), Some((42, "tomorrow 18:00 dentist")));
    }

    #[test]
    fn updates_without_text_are_ignored() {
        let raw = r#"{
            "update_id": 11,
            "message": {
                "message_id": 4,
                "chat": {"id": 42, "type": "private"},
                "date": 1741590000,
                "sticker": {"file_id": "abc"}
            }
        }"#;
        let update: UpdateDTO = serde_json::from_str(raw).unwrap();
        assert_eq!(update.text_message(), None);

        let update: UpdateDTO =
            serde_json::from_str(r#"{"update_id": 12, "my_chat_member": {}}"#).unwrap();
        assert!(update.message.is_none());
    }
}
