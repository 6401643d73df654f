//! UseCase: REST API からの既読処理
//!
//! リアルタイム接続を持たない既読の経路です。既読にしたあと `ChatNotifier` で
//! ルームの購読者全員に通知します（操作した接続がないため除外対象はありません）。

use std::sync::Arc;

use crate::domain::{ChatId, Message, MessageId, MessageStore, PrincipalId};

use super::{
    ChatNotifier,
    error::DeliveryError,
    mark_read::{chat_read, message_read, read_chat, read_message},
};

pub struct AcknowledgeReadUseCase {
    message_store: Arc<dyn MessageStore>,
    notifier: Arc<ChatNotifier>,
}

impl AcknowledgeReadUseCase {
    pub fn new(message_store: Arc<dyn MessageStore>, notifier: Arc<ChatNotifier>) -> Self {
        Self {
            message_store,
            notifier,
        }
    }

    /// メッセージを既読にし、更新後のメッセージを返す
    pub async fn mark_message(
        &self,
        user_id: PrincipalId,
        message_id: &MessageId,
    ) -> Result<Message, DeliveryError> {
        let message = read_message(self.message_store.as_ref(), message_id).await?;

        let route = self.notifier.notify(message_read(&message, user_id)).await;
        tracing::info!("Message '{}' marked as read ({:?})", message_id, route);
        Ok(message)
    }

    /// チャットの未読メッセージをまとめて既読にし、既読にした件数を返す
    pub async fn mark_chat(
        &self,
        user_id: PrincipalId,
        chat_id: &ChatId,
    ) -> Result<u64, DeliveryError> {
        let messages_read = read_chat(self.message_store.as_ref(), chat_id, &user_id).await?;

        let route = self
            .notifier
            .notify(chat_read(chat_id.clone(), user_id, messages_read))
            .await;
        tracing::info!(
            "{} message(s) in chat '{}' marked as read ({:?})",
            messages_read,
            chat_id,
            route
        );
        Ok(messages_read)
    }
}

#[cfg(test)]
mod tests {
    use hibiki_shared::time::FixedClock;

    use super::*;
    use crate::{
        domain::{EventKind, MessageKind, NewMessage, RoomMembership},
        infrastructure::{event_bus::BroadcastEventBus, repository::InMemoryMessageStore},
        usecase::test_support::{Harness, chat, drain, principal},
    };

    async fn seeded_store() -> (Arc<InMemoryMessageStore>, MessageId) {
        let store = Arc::new(InMemoryMessageStore::new(Arc::new(FixedClock::new(0))));
        let message = store
            .create(NewMessage {
                content: "hello".to_string(),
                kind: MessageKind::Text,
                sender_id: principal("bob"),
                chat_id: chat("chat1"),
                attachment: None,
                reply_to_id: None,
            })
            .await
            .unwrap();
        (store, message.id)
    }

    #[tokio::test]
    async fn test_mark_message_reaches_every_room_subscriber() {
        // テスト項目: REST からの既読でルームの購読者全員（既読にした本人の接続を含む）に message-read が届く
        // given (前提条件):
        let harness = Harness::new();
        let notifier = Arc::new(ChatNotifier::new(Arc::new(BroadcastEventBus::new(8))));
        notifier.attach(harness.deliver.clone()).await;
        let (store, message_id) = seeded_store().await;
        let usecase = AcknowledgeReadUseCase::new(store, notifier);
        let (alice, mut alice_rx) = harness.connect("alice").await;
        let (bob, mut bob_rx) = harness.connect("bob").await;
        harness.membership.join(chat("chat1"), alice).await;
        harness.membership.join(chat("chat1"), bob).await;

        // when (操作):
        let message = usecase
            .mark_message(principal("alice"), &message_id)
            .await
            .unwrap();

        // then (期待する結果):
        assert!(message.is_read);
        for rx in [&mut alice_rx, &mut bob_rx] {
            let frames = drain(rx);
            assert_eq!(frames.len(), 1);
            assert_eq!(frames[0]["event"], "message-read");
            assert_eq!(frames[0]["data"]["userId"], "alice");
        }
    }

    #[tokio::test]
    async fn test_mark_unknown_message_is_not_found() {
        // テスト項目: 存在しないメッセージは NotFound になり、何も通知されない
        // given (前提条件):
        let bus = BroadcastEventBus::new(8);
        let mut subscription = bus.subscribe(&[]);
        let (store, _) = seeded_store().await;
        let usecase =
            AcknowledgeReadUseCase::new(store, Arc::new(ChatNotifier::new(Arc::new(bus.clone()))));
        let unknown = MessageId::new("missing".to_string()).unwrap();

        // when (操作):
        let result = usecase.mark_message(principal("alice"), &unknown).await;

        // then (期待する結果):
        assert_eq!(
            result,
            Err(DeliveryError::NotFound("Message 'missing'".to_string()))
        );
        let published =
            tokio::time::timeout(std::time::Duration::from_millis(50), subscription.next()).await;
        assert!(published.is_err());
    }

    #[tokio::test]
    async fn test_mark_chat_before_attach_is_published_to_bus() {
        // テスト項目: 配信エンジン接続前のチャット既読は chat-read としてイベントバスに発行される
        // given (前提条件):
        let bus = BroadcastEventBus::new(8);
        let mut subscription = bus.subscribe(&[EventKind::ChatRead]);
        let (store, _) = seeded_store().await;
        let usecase =
            AcknowledgeReadUseCase::new(store, Arc::new(ChatNotifier::new(Arc::new(bus.clone()))));

        // when (操作):
        let messages_read = usecase.mark_chat(principal("alice"), &chat("chat1")).await;

        // then (期待する結果):
        assert_eq!(messages_read, Ok(1));
        let event = subscription.next().await.unwrap();
        assert_eq!(
            event.payload,
            chat_read(chat("chat1"), principal("alice"), 1).payload
        );
    }
}
