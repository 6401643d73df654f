//! Domain layer for the delivery core.
//!
//! This module contains the value objects, entities and chat event envelope,
//! plus the interfaces (traits) the use cases depend on. Concrete
//! implementations live in the infrastructure layer.

pub mod connection;
pub mod credential;
pub mod entity;
pub mod error;
pub mod event;
pub mod message_pusher;
pub mod repository;
pub mod value_object;

pub use connection::{ConnectionRegistry, RoomMembership};
pub use credential::CredentialVerifier;
pub use entity::{
    Attachment, Connection, ConnectionState, ConnectionTransitionError, Message, MessageDraft,
    MessageKind, NewMessage, PresenceStatus,
};
pub use error::{AuthError, MessagePushError, StoreError, ValueObjectError};
pub use event::{ChatEvent, EventKind, EventPayload, EventPublisher, EventTarget};
pub use message_pusher::{MessagePusher, PusherChannel};
pub use repository::{MessageStore, PresenceStore};
pub use value_object::{ChatId, ConnectionId, MessageId, PrincipalId, Timestamp};

#[cfg(test)]
pub use credential::MockCredentialVerifier;
#[cfg(test)]
pub use repository::MockMessageStore;
