//! UseCase: 接続の切断処理
//!
//! ## 処理の流れ
//!
//! 1. Connection Registry から接続を削除し、主体の最後の接続だった場合は
//!    残っているすべての接続に `userStatusChanged`（offline）を配信（[`PresenceTracker`]）
//! 2. 参加中のすべてのルームから退出
//! 3. MessagePusher から送信チャンネルを登録解除
//!
//! 未認証のまま閉じた接続や、すでに削除済みの接続に対しては何も通知しません。

use std::sync::Arc;

use crate::domain::{ChatId, ConnectionId, MessagePusher, RoomMembership};

use super::PresenceTracker;

/// 切断処理の結果
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DisconnectOutcome {
    pub left_rooms: Vec<ChatId>,
    pub went_offline: bool,
}

/// 接続切断のユースケース
pub struct DisconnectConnectionUseCase {
    membership: Arc<dyn RoomMembership>,
    message_pusher: Arc<dyn MessagePusher>,
    presence: Arc<PresenceTracker>,
}

impl DisconnectConnectionUseCase {
    pub fn new(
        membership: Arc<dyn RoomMembership>,
        message_pusher: Arc<dyn MessagePusher>,
        presence: Arc<PresenceTracker>,
    ) -> Self {
        Self {
            membership,
            message_pusher,
            presence,
        }
    }

    pub async fn execute(&self, connection_id: &ConnectionId) -> DisconnectOutcome {
        let went_offline = self.presence.remove(connection_id).await.is_some();
        let left_rooms = self.membership.leave_all(connection_id).await;
        self.message_pusher
            .unregister_connection(connection_id)
            .await;
        tracing::info!(
            "Connection '{}' disconnected (left {} room(s))",
            connection_id,
            left_rooms.len()
        );

        DisconnectOutcome {
            left_rooms,
            went_offline,
        }
    }
}
