//! UseCase テスト用の共通ヘルパー

use std::sync::Arc;

use tokio::sync::mpsc;

use crate::{
    domain::{ChatId, ConnectionId, ConnectionRegistry, MessagePusher, PrincipalId},
    infrastructure::{
        connection::{InMemoryConnectionRegistry, InMemoryRoomMembership},
        message_pusher::WebSocketMessagePusher,
    },
};

use super::DeliverEventUseCase;

pub(crate) fn chat(id: &str) -> ChatId {
    ChatId::new(id.to_string()).unwrap()
}

pub(crate) fn principal(id: &str) -> PrincipalId {
    PrincipalId::new(id.to_string()).unwrap()
}

/// 受信済みのフレームをすべて取り出して JSON として返す
pub(crate) fn drain(rx: &mut mpsc::UnboundedReceiver<String>) -> Vec<serde_json::Value> {
    let mut frames = Vec::new();
    while let Ok(frame) = rx.try_recv() {
        frames.push(serde_json::from_str(&frame).unwrap());
    }
    frames
}

/// インメモリ実装で組み立てた配信経路
pub(crate) struct Harness {
    pub registry: Arc<InMemoryConnectionRegistry>,
    pub membership: Arc<InMemoryRoomMembership>,
    pub pusher: Arc<WebSocketMessagePusher>,
    pub deliver: Arc<DeliverEventUseCase>,
}

impl Harness {
    pub fn new() -> Self {
        let registry = Arc::new(InMemoryConnectionRegistry::new());
        let membership = Arc::new(InMemoryRoomMembership::new());
        let pusher = Arc::new(WebSocketMessagePusher::new());
        let deliver = Arc::new(DeliverEventUseCase::new(
            registry.clone(),
            membership.clone(),
            pusher.clone(),
        ));
        Self {
            registry,
            membership,
            pusher,
            deliver,
        }
    }

    /// 認証済みの接続を 1 本作る（プレゼンス通知は行わない）
    pub async fn connect(&self, user: &str) -> (ConnectionId, mpsc::UnboundedReceiver<String>) {
        let connection_id = ConnectionId::generate();
        let (tx, rx) = mpsc::unbounded_channel();
        self.pusher
            .register_connection(connection_id.clone(), tx)
            .await;
        self.registry
            .admit(principal(user), connection_id.clone())
            .await;
        (connection_id, rx)
    }

    /// 未認証（Pending）の接続を 1 本作る
    pub async fn connect_pending(&self) -> (ConnectionId, mpsc::UnboundedReceiver<String>) {
        let connection_id = ConnectionId::generate();
        let (tx, rx) = mpsc::unbounded_channel();
        self.pusher
            .register_connection(connection_id.clone(), tx)
            .await;
        (connection_id, rx)
    }
}
