use super::IMessenger;
use anyhow::anyhow;
use std::collections::HashSet;
use std::sync::Mutex;

#[derive(Debug, Clone, PartialEq)]
pub struct SentMessage {
    pub chat_id: i64,
    pub text: String,
}

/// Records every message instead of delivering it. Chats can be made
/// unreachable to exercise dispatch failures.
#[derive(Default)]
pub struct InMemoryMessenger {
    sent: Mutex<Vec<SentMessage>>,
    unreachable: Mutex<HashSet<i64>>,
    webhook: Mutex<Option<String>>,
}

impl InMemoryMessenger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sent(&self) -> Vec<SentMessage> {
        self.sent
            .lock()
            .map(|sent| sent.clone())
            .unwrap_or_default()
    }

    pub fn sent_to(&self, chat_id: i64) -> Vec<String> {
        self.sent()
            .into_iter()
            .filter(|m| m.chat_id == chat_id)
            .map(|m| m.text)
            .collect()
    }

    pub fn set_unreachable(&self, chat_id: i64, unreachable: bool) {
        if let Ok(mut chats) = self.unreachable.lock() {
            if unreachable {
                chats.insert(chat_id);
            } else {
                chats.remove(&chat_id);
            }
        }
    }

    pub fn webhook(&self) -> Option<String> {
        self.webhook.lock().ok().and_then(|url| url.clone())
    }
}

#[async_trait::async_trait]
impl IMessenger for InMemoryMessenger {
    async fn send_message(&self, chat_id: i64, text: &str) -> anyhow::Result<()> {
        let unreachable = self
            .unreachable
            .lock()
            .map(|chats| chats.contains(&chat_id))
            .unwrap_or(false);
        if unreachable {
            return Err(anyhow!("Chat {} is unreachable", chat_id));
        }
        self.sent
            .lock()
            .map_err(|_| anyhow!("Messenger state is poisoned"))?
            .push(SentMessage {
                chat_id,
                text: text.to_string(),
            });
        Ok(())
    }

    async fn set_webhook(&self, url: &str, _secret: &str) -> anyhow::Result<()> {
        *self
            .webhook
            .lock()
            .map_err(|_| anyhow!("Messenger state is poisoned"))? = Some(url.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn records_messages_and_webhook() {
        let messenger = InMemoryMessenger::new();
        messenger.send_message(1, "hello").await.unwrap();
        messenger.set_webhook("https://bot.example/api/v1/webhook", "s3cret").await.unwrap();

        assert_eq!(
            messenger.sent(),
            vec![SentMessage {
                chat_id: 1,
                text: "hello".into(),
            }]
        );
        assert_eq!(
            messenger.webhook().as_deref(),
            Some("https://bot.example/api/v1/webhook")
        );
    }

    #[tokio::test]
    async fn unreachable_chats_fail() {
        let messenger = InMemoryMessenger::new();
        messenger.set_unreachable(2, true);
        assert!(messenger.send_message(2, "hello").await.is_err());
        assert!(messenger.sent_to(2).is_empty());

        messenger.set_unreachable(2, false);
        assert!(messenger.send_message(2, "hello").await.is_ok());
        assert_eq!(messenger.sent_to(2), vec!["hello".to_string()]);
    }
}
