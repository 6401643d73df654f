//! UseCase: メッセージ送信処理
//!
//! ## 処理の流れ
//!
//! 1. 送信元の接続が認証済み（Active）であることを確認
//! 2. Message Store に永続化
//! 3. ルームの購読者全員（送信者を含む）に `newMessage` を配信
//!
//! 永続化に失敗した場合は配信しません。
//!
//! ## 順序
//!
//! 永続化から配信までを 1 つのロックで直列化しているため、
//! 購読者が受け取る順序は永続化が完了した順序と一致します。
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - SendMessageUseCase::execute() メソッド
//! - 送信者を含むルーム購読者への配信、永続化失敗時の配信抑止
//!
//! ### どのような状況を想定しているか
//! - 正常系：メッセージ送信と配信
//! - 異常系：未認証の接続、永続化の失敗
//! - エッジケース：連続した送信の順序

use std::sync::Arc;

use tokio::sync::Mutex;

use crate::domain::{ConnectionId, ConnectionRegistry, Message, MessageDraft, MessageStore};

use super::{
    DeliverEventUseCase, error::DeliveryError, notify_chat::message_created,
    principal::active_principal,
};

/// メッセージ送信のユースケース
pub struct SendMessageUseCase {
    registry: Arc<dyn ConnectionRegistry>,
    message_store: Arc<dyn MessageStore>,
    deliver: Arc<DeliverEventUseCase>,
    /// 永続化 → 配信 を直列化するロック
    sequencer: Mutex<()>,
}

impl SendMessageUseCase {
    pub fn new(
        registry: Arc<dyn ConnectionRegistry>,
        message_store: Arc<dyn MessageStore>,
        deliver: Arc<DeliverEventUseCase>,
    ) -> Self {
        Self {
            registry,
            message_store,
            deliver,
            sequencer: Mutex::new(()),
        }
    }

    /// メッセージ送信を実行
    ///
    /// # Returns
    ///
    /// * `Ok(Message)` - 永続化されたメッセージ
    /// * `Err(DeliveryError)` - 未認証、または永続化の失敗
    pub async fn execute(
        &self,
        connection_id: &ConnectionId,
        draft: MessageDraft,
    ) -> Result<Message, DeliveryError> {
        let sender_id = active_principal(self.registry.as_ref(), connection_id).await?;

        let _sequence = self.sequencer.lock().await;
        let message = self
            .message_store
            .create(draft.into_new_message(sender_id))
            .await
            .map_err(|e| DeliveryError::persistence("send message", e))?;
        tracing::info!(
            "Message '{}' from '{}' stored in chat '{}'",
            message.id,
            message.sender_id,
            message.chat_id
        );

        self.deliver.execute(&message_created(message.clone())).await;
        Ok(message)
    }
}
