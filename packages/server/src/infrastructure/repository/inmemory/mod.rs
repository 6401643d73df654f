//! InMemory 実装

pub mod message;
pub mod presence;

pub use message::InMemoryMessageStore;
pub use presence::InMemoryPresenceStore;
