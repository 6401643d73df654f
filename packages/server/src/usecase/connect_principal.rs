//! UseCase: 認証済み接続の登録
//!
//! ## 処理の流れ
//!
//! 1. 送信チャンネルを MessagePusher に登録
//! 2. Connection Registry に接続を登録し、主体の最初の接続であれば
//!    他のすべての接続に `userStatusChanged`（online）を配信（[`PresenceTracker`]）
//!
//! 2 本目以降の接続ではプレゼンス通知を行いません。

use std::sync::Arc;

use crate::domain::{ConnectionId, MessagePusher, PrincipalId, PusherChannel};

use super::PresenceTracker;

/// 認証済み接続登録のユースケース
pub struct ConnectPrincipalUseCase {
    message_pusher: Arc<dyn MessagePusher>,
    presence: Arc<PresenceTracker>,
}

impl ConnectPrincipalUseCase {
    pub fn new(message_pusher: Arc<dyn MessagePusher>, presence: Arc<PresenceTracker>) -> Self {
        Self {
            message_pusher,
            presence,
        }
    }

    /// 接続を登録し、主体がオンラインになった場合は `true` を返す
    pub async fn execute(
        &self,
        principal_id: PrincipalId,
        connection_id: ConnectionId,
        sender: PusherChannel,
    ) -> bool {
        self.message_pusher
            .register_connection(connection_id.clone(), sender)
            .await;

        tracing::info!(
            "Principal '{}' connected via '{}'",
            principal_id,
            connection_id
        );
        self.presence.admit(principal_id, connection_id).await
    }
}
