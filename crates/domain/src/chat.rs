use crate::shared::entity::Entity;
use crate::timezone::ChatTimezone;
use chrono::{NaiveDateTime, NaiveTime, Timelike};
use serde::{Deserialize, Serialize};

/// Timezone stored for a chat on first contact
pub const DEFAULT_TIMEZONE: &str = "UTC";

/// Per chat preferences. Created lazily on the first message from a chat.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatSettings {
    pub chat_id: i64,
    /// Raw timezone as the user typed it, resolved with `ChatTimezone::resolve`
    pub timezone: String,
    /// Local time of the daily digest, `None` when the digest is disabled
    pub digest_time: Option<NaiveTime>,
}

impl ChatSettings {
    pub fn new(chat_id: i64) -> Self {
        Self {
            chat_id,
            timezone: DEFAULT_TIMEZONE.to_string(),
            digest_time: None,
        }
    }

    pub fn zone(&self) -> ChatTimezone {
        ChatTimezone::resolve(&self.timezone)
    }
}

impl Entity for ChatSettings {
    fn id(&self) -> i64 {
        self.chat_id
    }
}

/// A chat with an enabled digest, as seen by the digest pass
#[derive(Debug, Clone, PartialEq)]
pub struct ChatDigestSlot {
    pub chat_id: i64,
    pub timezone: String,
    pub digest_time: NaiveTime,
}

impl ChatDigestSlot {
    pub fn zone(&self) -> ChatTimezone {
        ChatTimezone::resolve(&self.timezone)
    }

    /// Whether the local wall-clock is in the digest minute. Seconds are ignored.
    pub fn is_due(&self, local_now: &NaiveDateTime) -> bool {
        local_now.hour() == self.digest_time.hour()
            && local_now.minute() == self.digest_time.minute()
    }
}
