//! Connection Registry / Room Membership の実装
//!
//! - `registry`: 主体 ⇄ 接続の双方向インデックス
//! - `membership`: ルーム ⇄ 接続の購読関係

pub mod membership;
pub mod registry;

pub use membership::InMemoryRoomMembership;
pub use registry::InMemoryConnectionRegistry;
