//! UseCase: チャットルームへの参加
//!
//! ルームを購読したあと、直近のメッセージ履歴を `recentMessages` として
//! 参加した接続にだけ送ります。履歴は参加時点のスナップショットで、古い順に並べ替えて送ります。

use std::sync::Arc;

use crate::domain::{
    ChatEvent, ChatId, ConnectionId, ConnectionRegistry, EventPayload, MessageStore,
    RoomMembership,
};

use super::{DeliverEventUseCase, error::DeliveryError, principal::active_principal};

pub const DEFAULT_HISTORY_LIMIT: u32 = 50;

/// ルーム参加のユースケース
pub struct JoinChatUseCase {
    registry: Arc<dyn ConnectionRegistry>,
    membership: Arc<dyn RoomMembership>,
    message_store: Arc<dyn MessageStore>,
    deliver: Arc<DeliverEventUseCase>,
    history_limit: u32,
}

impl JoinChatUseCase {
    pub fn new(
        registry: Arc<dyn ConnectionRegistry>,
        membership: Arc<dyn RoomMembership>,
        message_store: Arc<dyn MessageStore>,
        deliver: Arc<DeliverEventUseCase>,
        history_limit: u32,
    ) -> Self {
        Self {
            registry,
            membership,
            message_store,
            deliver,
            history_limit,
        }
    }

    /// ルームに参加し、送信した履歴の件数を返す
    ///
    /// 履歴の取得に失敗しても購読は維持される。
    pub async fn execute(
        &self,
        connection_id: &ConnectionId,
        chat_id: ChatId,
    ) -> Result<usize, DeliveryError> {
        let principal_id = active_principal(self.registry.as_ref(), connection_id).await?;

        self.membership
            .join(chat_id.clone(), connection_id.clone())
            .await;
        tracing::info!(
            "'{}' joined chat '{}' via '{}'",
            principal_id,
            chat_id,
            connection_id
        );

        let mut messages = self
            .message_store
            .list_page(&chat_id, 1, self.history_limit)
            .await
            .map_err(|e| DeliveryError::persistence("load recent messages", e))?;
        if messages.is_empty() {
            return Ok(0);
        }

        messages.reverse();
        let count = messages.len();
        let event = ChatEvent::to_connection(
            connection_id.clone(),
            EventPayload::RecentMessages { chat_id, messages },
        );
        self.deliver.execute(&event).await;
        Ok(count)
    }
}
