//! InMemory Message Store 実装
//!
//! ドメイン層が定義する MessageStore trait の具体的な実装。
//! メッセージは作成順に `Vec` へ追記され、その順序がそのまま時系列順になります。
//!
//! 本番では外部の DBMS に置き換わる前提の実装です。

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use hibiki_shared::time::Clock;

use crate::domain::{
    ChatId, Message, MessageId, MessageStore, NewMessage, PrincipalId, StoreError, Timestamp,
};

/// インメモリ Message Store 実装
pub struct InMemoryMessageStore {
    clock: Arc<dyn Clock>,
    messages: Mutex<Vec<Message>>,
}

impl InMemoryMessageStore {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            clock,
            messages: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl MessageStore for InMemoryMessageStore {
    async fn create(&self, message: NewMessage) -> Result<Message, StoreError> {
        let created = Message {
            id: MessageId::generate(),
            content: message.content,
            kind: message.kind,
            sender_id: message.sender_id,
            chat_id: message.chat_id,
            attachment: message.attachment,
            reply_to_id: message.reply_to_id,
            is_read: false,
            created_at: Timestamp::new(self.clock.now_millis()),
        };

        let mut messages = self.messages.lock().await;
        messages.push(created.clone());
        tracing::debug!(
            "Message '{}' stored for chat '{}'",
            created.id,
            created.chat_id
        );
        Ok(created)
    }

    async fn list_page(
        &self,
        chat_id: &ChatId,
        page: u32,
        page_size: u32,
    ) -> Result<Vec<Message>, StoreError> {
        let skip = (page.max(1) as usize - 1) * page_size as usize;
        let messages = self.messages.lock().await;
        Ok(messages
            .iter()
            .rev()
            .filter(|m| &m.chat_id == chat_id)
            .skip(skip)
            .take(page_size as usize)
            .cloned()
            .collect())
    }

    async fn mark_read(&self, message_id: &MessageId) -> Result<(), StoreError> {
        let mut messages = self.messages.lock().await;
        let message = messages
            .iter_mut()
            .find(|m| &m.id == message_id)
            .ok_or_else(|| StoreError::NotFound(format!("message '{message_id}'")))?;
        message.is_read = true;
        Ok(())
    }

    async fn mark_chat_read(
        &self,
        chat_id: &ChatId,
        except_sender: &PrincipalId,
    ) -> Result<u64, StoreError> {
        let mut messages = self.messages.lock().await;
        let mut count = 0;
        for message in messages
            .iter_mut()
            .filter(|m| &m.chat_id == chat_id && &m.sender_id != except_sender && !m.is_read)
        {
            message.is_read = true;
            count += 1;
        }
        Ok(count)
    }

    async fn get_by_id(&self, message_id: &MessageId) -> Result<Option<Message>, StoreError> {
        let messages = self.messages.lock().await;
        Ok(messages.iter().find(|m| &m.id == message_id).cloned())
    }
}
