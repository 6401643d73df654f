//! Repository trait 定義
//!
//! 永続化はこのコアの責務ではありません。メッセージとプレゼンスは外部ストアが所有し、
//! ドメイン層はここで定義するインターフェース越しにだけアクセスします。
//! 具体的な実装は Infrastructure 層が提供します（依存性の逆転）。

use async_trait::async_trait;

use super::{
    ChatId, Message, MessageId, NewMessage, PresenceStatus, PrincipalId, StoreError,
};

/// Message Store trait
///
/// `list_page` は新しい順（most-recent-first）で返す。`page` は 1 始まり。
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MessageStore: Send + Sync {
    /// メッセージを永続化し、保存されたメッセージを返す
    async fn create(&self, message: NewMessage) -> Result<Message, StoreError>;

    /// チャットのメッセージを新しい順に 1 ページ分取得
    async fn list_page(
        &self,
        chat_id: &ChatId,
        page: u32,
        page_size: u32,
    ) -> Result<Vec<Message>, StoreError>;

    /// メッセージを既読にする
    async fn mark_read(&self, message_id: &MessageId) -> Result<(), StoreError>;

    /// `except_sender` 以外が送信した未読メッセージをすべて既読にし、件数を返す
    async fn mark_chat_read(
        &self,
        chat_id: &ChatId,
        except_sender: &PrincipalId,
    ) -> Result<u64, StoreError>;

    /// ID でメッセージを取得
    async fn get_by_id(&self, message_id: &MessageId) -> Result<Option<Message>, StoreError>;
}

/// Presence Store trait
#[async_trait]
pub trait PresenceStore: Send + Sync {
    /// 主体のオンライン状態を更新
    async fn set_status(
        &self,
        principal_id: &PrincipalId,
        status: PresenceStatus,
    ) -> Result<(), StoreError>;
}
