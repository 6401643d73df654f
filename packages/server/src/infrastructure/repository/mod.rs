//! Repository 実装
//!
//! - `inmemory`: プロセス内に保持する実装（開発・テスト用）

pub mod inmemory;

pub use inmemory::{InMemoryMessageStore, InMemoryPresenceStore};
