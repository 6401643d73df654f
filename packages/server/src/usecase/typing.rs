//! UseCase: 入力中インジケーター
//!
//! 状態を持たない通知です。送信元の接続を除くルームの購読者に `user-typing` を配信します。
//! 未認証の接続からの通知は黙って破棄します。

use std::sync::Arc;

use crate::domain::{ChatEvent, ChatId, ConnectionId, ConnectionRegistry, EventPayload};

use super::DeliverEventUseCase;

pub struct TypingUseCase {
    registry: Arc<dyn ConnectionRegistry>,
    deliver: Arc<DeliverEventUseCase>,
}

impl TypingUseCase {
    pub fn new(registry: Arc<dyn ConnectionRegistry>, deliver: Arc<DeliverEventUseCase>) -> Self {
        Self { registry, deliver }
    }

    /// 配信した接続数を返す
    pub async fn execute(
        &self,
        connection_id: &ConnectionId,
        chat_id: ChatId,
        is_typing: bool,
    ) -> usize {
        let Some(user_id) = self.registry.lookup_principal(connection_id).await else {
            tracing::debug!(
                "Ignoring typing indicator from unauthenticated connection '{}'",
                connection_id
            );
            return 0;
        };

        let event = ChatEvent::to_room(chat_id, EventPayload::UserTyping { user_id, is_typing })
            .excluding(connection_id.clone());
        self.deliver.execute(&event).await
    }
}
