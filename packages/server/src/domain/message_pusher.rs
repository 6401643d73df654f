//! MessagePusher trait 定義
//!
//! クライアントへの送信（通知）を抽象化します。
//! 送信チャンネルの生成は UI 層、送信は Infrastructure 層の責務です。

use async_trait::async_trait;
use tokio::sync::mpsc;

use super::{ConnectionId, MessagePushError};

/// 接続ごとの送信チャンネル（直列化済みフレームを流す）
pub type PusherChannel = mpsc::UnboundedSender<String>;

#[async_trait]
pub trait MessagePusher: Send + Sync {
    /// 接続の送信チャンネルを登録
    async fn register_connection(&self, connection_id: ConnectionId, sender: PusherChannel);

    /// 接続の送信チャンネルを登録解除
    async fn unregister_connection(&self, connection_id: &ConnectionId);

    /// 特定の接続にフレームを送信
    async fn push_to(&self, connection_id: &ConnectionId, content: &str)
    -> Result<(), MessagePushError>;

    /// 複数の接続に同じフレームを送信し、送信できた件数を返す
    ///
    /// 一部の送信失敗は許容する（ログに記録してスキップ）。1 回の呼び出し内の送信は
    /// 他の broadcast と交錯しない。
    async fn broadcast(
        &self,
        targets: Vec<ConnectionId>,
        content: &str,
    ) -> Result<usize, MessagePushError>;
}
