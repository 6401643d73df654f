//! Chat events
//!
//! `ChatEvent` is the immutable envelope every producer hands to the delivery
//! path: what happened (`EventPayload`), who should see it (`EventTarget`),
//! and an optional connection to leave out of the fan-out.

use serde::Serialize;

use super::{
    entity::{Message, PresenceStatus},
    value_object::{ChatId, ConnectionId, MessageId, PrincipalId},
};

/// Kind of a chat event. Event bus subscriptions filter on this.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    MessageCreated,
    RecentMessages,
    MessageRead,
    ChatRead,
    Typing,
    PresenceChanged,
    Error,
}

/// Who receives an event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventTarget {
    /// Every connection subscribed to the room at delivery time.
    Room(ChatId),
    /// Every live connection of the principal.
    Principal(PrincipalId),
    /// A single connection.
    Connection(ConnectionId),
    /// Every active connection.
    Everyone,
}

/// Client-facing payload. Serialises to the `{"event": ..., "data": ...}` frame.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", content = "data")]
pub enum EventPayload {
    #[serde(rename = "newMessage")]
    NewMessage(Message),

    #[serde(rename = "recentMessages", rename_all = "camelCase")]
    RecentMessages {
        chat_id: ChatId,
        messages: Vec<Message>,
    },

    #[serde(rename = "message-read", rename_all = "camelCase")]
    MessageRead {
        message_id: MessageId,
        user_id: PrincipalId,
        is_read: bool,
    },

    #[serde(rename = "chat-read", rename_all = "camelCase")]
    ChatRead {
        chat_id: ChatId,
        user_id: PrincipalId,
        messages_read: u64,
    },

    #[serde(rename = "user-typing", rename_all = "camelCase")]
    UserTyping { user_id: PrincipalId, is_typing: bool },

    #[serde(rename = "userStatusChanged", rename_all = "camelCase")]
    UserStatusChanged {
        user_id: PrincipalId,
        status: PresenceStatus,
        timestamp: String,
    },

    #[serde(rename = "error")]
    Error { message: String },
}

impl EventPayload {
    pub fn kind(&self) -> EventKind {
        match self {
            Self::NewMessage(_) => EventKind::MessageCreated,
            Self::RecentMessages { .. } => EventKind::RecentMessages,
            Self::MessageRead { .. } => EventKind::MessageRead,
            Self::ChatRead { .. } => EventKind::ChatRead,
            Self::UserTyping { .. } => EventKind::Typing,
            Self::UserStatusChanged { .. } => EventKind::PresenceChanged,
            Self::Error { .. } => EventKind::Error,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatEvent {
    pub target: EventTarget,
    pub exclude: Option<ConnectionId>,
    pub payload: EventPayload,
}

impl ChatEvent {
    pub fn new(target: EventTarget, payload: EventPayload) -> Self {
        Self {
            target,
            exclude: None,
            payload,
        }
    }

    pub fn to_room(chat_id: ChatId, payload: EventPayload) -> Self {
        Self::new(EventTarget::Room(chat_id), payload)
    }

    pub fn to_connection(connection_id: ConnectionId, payload: EventPayload) -> Self {
        Self::new(EventTarget::Connection(connection_id), payload)
    }

    pub fn to_everyone(payload: EventPayload) -> Self {
        Self::new(EventTarget::Everyone, payload)
    }

    /// Leave `connection_id` out of the fan-out.
    pub fn excluding(mut self, connection_id: ConnectionId) -> Self {
        self.exclude = Some(connection_id);
        self
    }

    pub fn kind(&self) -> EventKind {
        self.payload.kind()
    }
}

/// Producer side of the process-wide event bus.
///
/// `publish` never blocks. It returns how many subscribers will observe the
/// event; zero means the event was dropped.
pub trait EventPublisher: Send + Sync {
    fn publish(&self, event: ChatEvent) -> usize;
}
