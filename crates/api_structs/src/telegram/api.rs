use serde::{Deserialize, Serialize};

/// Envelope of every Telegram Bot API response
#[derive(Debug, Deserialize, Serialize)]
pub struct TelegramResponse<T> {
    pub ok: bool,
    #[serde(default)]
    pub description: Option<String>,
    pub result: Option<T>,
}

pub mod send_message {
    use super::*;

    #[derive(Debug, Deserialize, Serialize)]
    pub struct RequestBody {
        pub chat_id: i64,
        pub text: String,
    }
}

pub mod set_webhook {
    use super::*;

    #[derive(Debug, Deserialize, Serialize)]
    pub struct RequestBody {
        pub url: String,
        pub secret_token: String,
        pub allowed_updates: Vec<String>,
    }
}
