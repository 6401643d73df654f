//! UseCase: 既読処理
//!
//! - `mark_message`: 1 件のメッセージを既読にし、そのメッセージのルームへ `message-read` を配信
//! - `mark_chat`: 自分以外が送った未読メッセージをまとめて既読にし、`chat-read` を配信
//!
//! どちらも操作した接続だけを配信対象から除外します。同じ主体の他の接続には届くため、
//! 複数端末の既読状態が同期されます。

use std::sync::Arc;

use crate::domain::{
    ChatEvent, ChatId, ConnectionId, ConnectionRegistry, EventPayload, Message, MessageId,
    MessageStore, PrincipalId, StoreError,
};

use super::{DeliverEventUseCase, error::DeliveryError, principal::active_principal};

/// メッセージを既読にし、保存済みのメッセージを返す（配信先のルームを知るために引き直す）
pub(crate) async fn read_message(
    store: &dyn MessageStore,
    message_id: &MessageId,
) -> Result<Message, DeliveryError> {
    let not_found = || DeliveryError::NotFound(format!("Message '{message_id}'"));

    store.mark_read(message_id).await.map_err(|e| match e {
        StoreError::NotFound(_) => not_found(),
        other => DeliveryError::persistence("mark message as read", other),
    })?;

    store
        .get_by_id(message_id)
        .await
        .map_err(|e| DeliveryError::persistence("mark message as read", e))?
        .ok_or_else(not_found)
}

/// 自分以外が送った未読メッセージを既読にし、その件数を返す
pub(crate) async fn read_chat(
    store: &dyn MessageStore,
    chat_id: &ChatId,
    user_id: &PrincipalId,
) -> Result<u64, DeliveryError> {
    store
        .mark_chat_read(chat_id, user_id)
        .await
        .map_err(|e| DeliveryError::persistence("mark chat as read", e))
}

pub(crate) fn message_read(message: &Message, user_id: PrincipalId) -> ChatEvent {
    ChatEvent::to_room(
        message.chat_id.clone(),
        EventPayload::MessageRead {
            message_id: message.id.clone(),
            user_id,
            is_read: true,
        },
    )
}

pub(crate) fn chat_read(chat_id: ChatId, user_id: PrincipalId, messages_read: u64) -> ChatEvent {
    ChatEvent::to_room(
        chat_id.clone(),
        EventPayload::ChatRead {
            chat_id,
            user_id,
            messages_read,
        },
    )
}

/// 既読処理のユースケース
pub struct MarkReadUseCase {
    registry: Arc<dyn ConnectionRegistry>,
    message_store: Arc<dyn MessageStore>,
    deliver: Arc<DeliverEventUseCase>,
}

impl MarkReadUseCase {
    pub fn new(
        registry: Arc<dyn ConnectionRegistry>,
        message_store: Arc<dyn MessageStore>,
        deliver: Arc<DeliverEventUseCase>,
    ) -> Self {
        Self {
            registry,
            message_store,
            deliver,
        }
    }

    /// メッセージを既読にし、配信した接続数を返す
    pub async fn mark_message(
        &self,
        connection_id: &ConnectionId,
        message_id: &MessageId,
    ) -> Result<usize, DeliveryError> {
        let user_id = active_principal(self.registry.as_ref(), connection_id).await?;
        let message = read_message(self.message_store.as_ref(), message_id).await?;

        tracing::debug!("'{}' read message '{}'", user_id, message_id);
        let event = message_read(&message, user_id).excluding(connection_id.clone());
        Ok(self.deliver.execute(&event).await)
    }

    /// チャットの未読メッセージをまとめて既読にし、既読にした件数を返す
    pub async fn mark_chat(
        &self,
        connection_id: &ConnectionId,
        chat_id: &ChatId,
    ) -> Result<u64, DeliveryError> {
        let user_id = active_principal(self.registry.as_ref(), connection_id).await?;

        let messages_read = read_chat(self.message_store.as_ref(), chat_id, &user_id).await?;

        tracing::debug!(
            "'{}' read {} message(s) in chat '{}'",
            user_id,
            messages_read,
            chat_id
        );
        let event =
            chat_read(chat_id.clone(), user_id, messages_read).excluding(connection_id.clone());
        self.deliver.execute(&event).await;
        Ok(messages_read)
    }
}
