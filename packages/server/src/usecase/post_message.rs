//! UseCase: REST API からのメッセージ投稿
//!
//! リアルタイム接続を持たない書き込み経路です。永続化したあと `ChatNotifier` で通知します。
//! 通知の成否は投稿の結果に影響しません。

use std::sync::Arc;

use crate::domain::{Message, MessageDraft, MessageStore, PrincipalId};

use super::{ChatNotifier, error::DeliveryError};

pub struct PostMessageUseCase {
    message_store: Arc<dyn MessageStore>,
    notifier: Arc<ChatNotifier>,
}

impl PostMessageUseCase {
    pub fn new(message_store: Arc<dyn MessageStore>, notifier: Arc<ChatNotifier>) -> Self {
        Self {
            message_store,
            notifier,
        }
    }

    pub async fn execute(
        &self,
        sender_id: PrincipalId,
        draft: MessageDraft,
    ) -> Result<Message, DeliveryError> {
        let message = self
            .message_store
            .create(draft.into_new_message(sender_id))
            .await
            .map_err(|e| DeliveryError::persistence("create message", e))?;

        let route = self.notifier.notify_message_sent(message.clone()).await;
        tracing::info!(
            "Message '{}' posted to chat '{}' ({:?})",
            message.id,
            message.chat_id,
            route
        );
        Ok(message)
    }
}

#[cfg(test)]
mod tests {
    use hibiki_shared::time::FixedClock;

    use super::*;
    use crate::{
        domain::{EventPayload, MessageKind, MockMessageStore, RoomMembership, StoreError},
        infrastructure::{event_bus::BroadcastEventBus, repository::InMemoryMessageStore},
        usecase::{
            DeliveryRoute,
            test_support::{Harness, chat, drain, principal},
        },
    };

    fn draft(content: &str) -> MessageDraft {
        MessageDraft {
            content: content.to_string(),
            kind: MessageKind::Text,
            chat_id: chat("chat1"),
            attachment: None,
            reply_to_id: None,
        }
    }

    #[tokio::test]
    async fn test_posted_message_reaches_live_subscribers() {
        // テスト項目: REST で投稿されたメッセージがルームの購読者に newMessage として届く
        // given (前提条件):
        let harness = Harness::new();
        let notifier = Arc::new(ChatNotifier::new(Arc::new(BroadcastEventBus::new(8))));
        notifier.attach(harness.deliver.clone()).await;
        let store = Arc::new(InMemoryMessageStore::new(Arc::new(FixedClock::new(0))));
        let usecase = PostMessageUseCase::new(store, notifier);
        let (alice, mut alice_rx) = harness.connect("alice").await;
        harness.membership.join(chat("chat1"), alice).await;

        // when (操作):
        let message = usecase.execute(principal("bob"), draft("from rest")).await;

        // then (期待する結果):
        assert_eq!(message.unwrap().sender_id, principal("bob"));
        let frames = drain(&mut alice_rx);
        assert_eq!(frames.len(), 1);
        assert_eq!(frames[0]["event"], "newMessage");
        assert_eq!(frames[0]["data"]["content"], "from rest");
    }

    #[tokio::test]
    async fn test_post_before_attach_is_published_to_bus() {
        // テスト項目: 配信エンジン接続前の投稿はイベントバスに発行される
        // given (前提条件):
        let bus = BroadcastEventBus::new(8);
        let mut subscription = bus.subscribe(&[]);
        let notifier = Arc::new(ChatNotifier::new(Arc::new(bus.clone())));
        let store = Arc::new(InMemoryMessageStore::new(Arc::new(FixedClock::new(0))));
        let usecase = PostMessageUseCase::new(store, notifier.clone());

        // when (操作):
        let message = usecase
            .execute(principal("bob"), draft("early"))
            .await
            .unwrap();

        // then (期待する結果):
        let event = subscription.next().await.unwrap();
        assert_eq!(event.payload, EventPayload::NewMessage(message.clone()));
        assert_eq!(
            notifier.notify_message_sent(message).await,
            DeliveryRoute::EventBus(1)
        );
    }

    #[tokio::test]
    async fn test_post_store_failure_is_persistence_error() {
        // テスト項目: 永続化に失敗すると通知されずにエラーが返る
        // given (前提条件):
        let bus = BroadcastEventBus::new(8);
        let mut subscription = bus.subscribe(&[]);
        let mut store = MockMessageStore::new();
        store
            .expect_create()
            .returning(|_| Err(StoreError::Unavailable("down".to_string())));
        let usecase = PostMessageUseCase::new(
            Arc::new(store),
            Arc::new(ChatNotifier::new(Arc::new(bus.clone()))),
        );

        // when (操作):
        let result = usecase.execute(principal("bob"), draft("lost")).await;

        // then (期待する結果):
        assert_eq!(
            result.unwrap_err().client_message(),
            "Failed to create message"
        );
        let published =
            tokio::time::timeout(std::time::Duration::from_millis(50), subscription.next()).await;
        assert!(published.is_err());
    }
}
