//! UseCase: チャットルームからの退出
//!
//! 参加していないルームからの退出は何もしません（冪等）。

use std::sync::Arc;

use crate::domain::{ChatId, ConnectionId, RoomMembership};

pub struct LeaveChatUseCase {
    membership: Arc<dyn RoomMembership>,
}

impl LeaveChatUseCase {
    pub fn new(membership: Arc<dyn RoomMembership>) -> Self {
        Self { membership }
    }

    /// 購読を解除し、実際に解除された場合は `true` を返す
    pub async fn execute(&self, connection_id: &ConnectionId, chat_id: &ChatId) -> bool {
        let left = self.membership.leave(chat_id, connection_id).await;
        if left {
            tracing::info!("Connection '{}' left chat '{}'", connection_id, chat_id);
        } else {
            tracing::debug!(
                "Connection '{}' was not in chat '{}', nothing to leave",
                connection_id,
                chat_id
            );
        }
        left
    }
}
