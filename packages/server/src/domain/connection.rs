//! 接続管理の trait 定義
//!
//! - `ConnectionRegistry`: どの主体がどの接続を持っているか
//! - `RoomMembership`: どの接続がどのルームを購読しているか
//!
//! どちらも共有される可変状態です。変更はここで定義する操作だけで行い、
//! 読み出し側にはスナップショットを返します。

use std::collections::HashSet;

use async_trait::async_trait;

use super::{ChatId, ConnectionId, PrincipalId};

/// 主体 ↔ 接続の双方向インデックス
///
/// すべての操作は互いに線形化可能であること。
#[async_trait]
pub trait ConnectionRegistry: Send + Sync {
    /// 接続を主体に登録する
    ///
    /// 同じ接続 ID に対しては冪等。主体の接続が 0 本から 1 本になったとき（online への遷移）
    /// `true` を返す。
    async fn admit(&self, principal_id: PrincipalId, connection_id: ConnectionId) -> bool;

    /// 接続をインデックスから削除する
    ///
    /// 主体の最後の接続だった場合（offline への遷移）だけ主体を返す。
    /// 未登録の接続の削除は何もしない。
    async fn remove(&self, connection_id: &ConnectionId) -> Option<PrincipalId>;

    async fn lookup_principal(&self, connection_id: &ConnectionId) -> Option<PrincipalId>;

    async fn connections_for(&self, principal_id: &PrincipalId) -> HashSet<ConnectionId>;

    /// 登録済みのすべての接続のスナップショット
    async fn connected(&self) -> HashSet<ConnectionId>;
}

/// ルーム → 購読している接続の集合
///
/// ルームは購読者が 1 つ以上いる間だけ存在する。
#[async_trait]
pub trait RoomMembership: Send + Sync {
    /// まだ購読していなかった場合 `true` を返す
    async fn join(&self, chat_id: ChatId, connection_id: ConnectionId) -> bool;

    /// 購読していた場合 `true` を返す。空になったルームは削除する
    async fn leave(&self, chat_id: &ChatId, connection_id: &ConnectionId) -> bool;

    /// すべてのルームから退出し、退出したルームを返す
    async fn leave_all(&self, connection_id: &ConnectionId) -> Vec<ChatId>;

    /// ルームの購読者の一貫したスナップショット
    async fn subscribers(&self, chat_id: &ChatId) -> HashSet<ConnectionId>;

    async fn rooms_of(&self, connection_id: &ConnectionId) -> HashSet<ChatId>;

    async fn room_count(&self) -> usize;
}
