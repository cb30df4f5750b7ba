use serde::{Deserialize, Serialize};

/// Header Telegram puts the webhook secret in
pub const SECRET_TOKEN_HEADER: &str = "X-Telegram-Bot-Api-Secret-Token";

pub mod receive_update {
    use super::*;
    use crate::dtos::UpdateDTO;

    pub type RequestBody = UpdateDTO;

    #[derive(Debug, Deserialize, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct APIResponse {
        pub accepted: bool,
    }
}
