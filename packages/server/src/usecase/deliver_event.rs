//! UseCase: イベント配信（Delivery Engine）
//!
//! すべてのチャットイベントはここを通ってクライアントに届きます。
//!
//! 1. `EventTarget` から配信先の接続を解決する（ルームは購読者のスナップショット）
//! 2. 除外指定された接続を取り除く
//! 3. ペイロードを 1 度だけ直列化し、MessagePusher でまとめて送信する
//!
//! 個々の接続への送信失敗は MessagePusher 側でログに記録してスキップされ、
//! 他の接続への配信は中断されません。

use std::sync::Arc;

use crate::domain::{
    ChatEvent, ConnectionId, ConnectionRegistry, EventPayload, EventTarget, MessagePusher,
    RoomMembership,
};

use super::error::DeliveryError;

/// イベント配信のユースケース
pub struct DeliverEventUseCase {
    registry: Arc<dyn ConnectionRegistry>,
    membership: Arc<dyn RoomMembership>,
    message_pusher: Arc<dyn MessagePusher>,
}

impl DeliverEventUseCase {
    pub fn new(
        registry: Arc<dyn ConnectionRegistry>,
        membership: Arc<dyn RoomMembership>,
        message_pusher: Arc<dyn MessagePusher>,
    ) -> Self {
        Self {
            registry,
            membership,
            message_pusher,
        }
    }

    /// イベントを配信し、送信できた接続数を返す
    pub async fn execute(&self, event: &ChatEvent) -> usize {
        let frame = match serde_json::to_string(&event.payload) {
            Ok(frame) => frame,
            Err(e) => {
                tracing::error!("Failed to serialize {:?} event: {}", event.kind(), e);
                return 0;
            }
        };

        let targets = self.resolve_targets(event).await;
        if targets.is_empty() {
            tracing::debug!("No delivery targets for {:?} event", event.kind());
            return 0;
        }

        match self.message_pusher.broadcast(targets, &frame).await {
            Ok(delivered) => {
                tracing::debug!(
                    "Delivered {:?} event to {} connection(s)",
                    event.kind(),
                    delivered
                );
                delivered
            }
            Err(e) => {
                tracing::warn!("Failed to deliver {:?} event: {}", event.kind(), e);
                0
            }
        }
    }

    /// 操作したクライアントに `error` イベントを返す
    pub async fn report_error(&self, connection_id: &ConnectionId, error: &DeliveryError) {
        tracing::warn!("Reporting error to connection '{}': {}", connection_id, error);
        let event = ChatEvent::to_connection(
            connection_id.clone(),
            EventPayload::Error {
                message: error.client_message(),
            },
        );
        self.execute(&event).await;
    }

    /// 配信先の接続を解決する
    async fn resolve_targets(&self, event: &ChatEvent) -> Vec<ConnectionId> {
        let candidates = match &event.target {
            EventTarget::Room(chat_id) => self.membership.subscribers(chat_id).await,
            EventTarget::Principal(principal_id) => {
                self.registry.connections_for(principal_id).await
            }
            EventTarget::Connection(connection_id) => [connection_id.clone()].into(),
            EventTarget::Everyone => self.registry.connected().await,
        };

        candidates
            .into_iter()
            .filter(|id| event.exclude.as_ref() != Some(id))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::{ChatId, PrincipalId},
        usecase::test_support::{Harness, chat, drain},
    };

    // ========================================
    // テスト作業記録
    // ========================================
    // 【何をテストするか】
    // - EventTarget ごとの配信先解決（Room / Principal / Connection / Everyone）
    // - 除外指定された接続に届かないこと
    // - 閉じた接続があっても他の接続には届くこと
    // ========================================

    fn typing(user: &str) -> EventPayload {
        EventPayload::UserTyping {
            user_id: PrincipalId::new(user.to_string()).unwrap(),
            is_typing: true,
        }
    }

    #[tokio::test]
    async fn test_room_event_reaches_only_room_subscribers() {
        // テスト項目: ルーム宛てのイベントはそのルームの購読者だけに届く
        // given (前提条件):
        let harness = Harness::new();
        let (alice, mut alice_rx) = harness.connect("alice").await;
        let (bob, mut bob_rx) = harness.connect("bob").await;
        let (_carol, mut carol_rx) = harness.connect("carol").await;
        harness.membership.join(chat("chat1"), alice).await;
        harness.membership.join(chat("chat1"), bob).await;

        // when (操作):
        let delivered = harness
            .deliver
            .execute(&ChatEvent::to_room(chat("chat1"), typing("alice")))
            .await;

        // then (期待する結果):
        assert_eq!(delivered, 2);
        assert_eq!(drain(&mut alice_rx).len(), 1);
        assert_eq!(drain(&mut bob_rx).len(), 1);
        assert!(drain(&mut carol_rx).is_empty());
    }

    #[tokio::test]
    async fn test_excluded_connection_is_skipped() {
        // テスト項目: 除外指定された接続には届かない
        // given (前提条件):
        let harness = Harness::new();
        let (alice, mut alice_rx) = harness.connect("alice").await;
        let (bob, mut bob_rx) = harness.connect("bob").await;
        harness.membership.join(chat("chat1"), alice.clone()).await;
        harness.membership.join(chat("chat1"), bob).await;

        // when (操作):
        let event = ChatEvent::to_room(chat("chat1"), typing("alice")).excluding(alice);
        let delivered = harness.deliver.execute(&event).await;

        // then (期待する結果):
        assert_eq!(delivered, 1);
        assert!(drain(&mut alice_rx).is_empty());
        let frames = drain(&mut bob_rx);
        assert_eq!(frames[0]["event"], "user-typing");
        assert_eq!(frames[0]["data"]["userId"], "alice");
    }

    #[tokio::test]
    async fn test_principal_event_reaches_every_connection_of_principal() {
        // テスト項目: 主体宛てのイベントはその主体のすべての接続に届く
        // given (前提条件):
        let harness = Harness::new();
        let (_phone, mut phone_rx) = harness.connect("alice").await;
        let (_laptop, mut laptop_rx) = harness.connect("alice").await;
        let (_bob, mut bob_rx) = harness.connect("bob").await;

        // when (操作):
        let event = ChatEvent::new(
            EventTarget::Principal(PrincipalId::new("alice".to_string()).unwrap()),
            typing("bob"),
        );
        let delivered = harness.deliver.execute(&event).await;

        // then (期待する結果):
        assert_eq!(delivered, 2);
        assert_eq!(drain(&mut phone_rx).len(), 1);
        assert_eq!(drain(&mut laptop_rx).len(), 1);
        assert!(drain(&mut bob_rx).is_empty());
    }

    #[tokio::test]
    async fn test_everyone_event_skips_closed_receiver() {
        // テスト項目: 受信側が閉じた接続があっても他の接続への配信は続く
        // given (前提条件):
        let harness = Harness::new();
        let (_alice, alice_rx) = harness.connect("alice").await;
        let (_bob, mut bob_rx) = harness.connect("bob").await;
        drop(alice_rx);

        // when (操作):
        let delivered = harness
            .deliver
            .execute(&ChatEvent::to_everyone(typing("carol")))
            .await;

        // then (期待する結果):
        assert_eq!(delivered, 1);
        assert_eq!(drain(&mut bob_rx).len(), 1);
    }

    #[tokio::test]
    async fn test_empty_room_delivers_nothing() {
        // テスト項目: 購読者のいないルームへの配信は 0 件
        // given (前提条件):
        let harness = Harness::new();

        // when (操作):
        let delivered = harness
            .deliver
            .execute(&ChatEvent::to_room(
                ChatId::new("nobody-here".to_string()).unwrap(),
                typing("alice"),
            ))
            .await;

        // then (期待する結果):
        assert_eq!(delivered, 0);
    }

    #[tokio::test]
    async fn test_report_error_pushes_error_frame_to_connection() {
        // テスト項目: report_error で対象の接続に error イベントが届く
        // given (前提条件):
        let harness = Harness::new();
        let (alice, mut alice_rx) = harness.connect("alice").await;

        // when (操作):
        harness
            .deliver
            .report_error(&alice, &DeliveryError::NotAuthenticated)
            .await;

        // then (期待する結果):
        let frames = drain(&mut alice_rx);
        assert_eq!(frames.len(), 1);
        assert_eq!(frames[0]["event"], "error");
        assert_eq!(frames[0]["data"]["message"], "User not authenticated");
    }
}
