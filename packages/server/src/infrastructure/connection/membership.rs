//! InMemory Room Membership 実装
//!
//! room → subscribers と connection → rooms を同じ Mutex の内側で保持します。
//! 逆引きインデックスがあるため、切断時の `leave_all` は接続が参加しているルーム数に比例します。

use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{ChatId, ConnectionId, RoomMembership};

#[derive(Debug, Default)]
struct Rooms {
    subscribers: HashMap<ChatId, HashSet<ConnectionId>>,
    joined: HashMap<ConnectionId, HashSet<ChatId>>,
}

impl Rooms {
    fn unsubscribe(&mut self, chat_id: &ChatId, connection_id: &ConnectionId) -> bool {
        let Some(subscribers) = self.subscribers.get_mut(chat_id) else {
            return false;
        };
        let removed = subscribers.remove(connection_id);
        if subscribers.is_empty() {
            self.subscribers.remove(chat_id);
            tracing::debug!("Room '{}' dropped (no subscribers left)", chat_id);
        }
        removed
    }
}

/// インメモリ Room Membership 実装
#[derive(Debug, Default)]
pub struct InMemoryRoomMembership {
    rooms: Mutex<Rooms>,
}

impl InMemoryRoomMembership {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RoomMembership for InMemoryRoomMembership {
    async fn join(&self, chat_id: ChatId, connection_id: ConnectionId) -> bool {
        let mut rooms = self.rooms.lock().await;
        let inserted = rooms
            .subscribers
            .entry(chat_id.clone())
            .or_default()
            .insert(connection_id.clone());
        rooms.joined.entry(connection_id).or_default().insert(chat_id);
        inserted
    }

    async fn leave(&self, chat_id: &ChatId, connection_id: &ConnectionId) -> bool {
        let mut rooms = self.rooms.lock().await;
        let removed = rooms.unsubscribe(chat_id, connection_id);
        if let Some(joined) = rooms.joined.get_mut(connection_id) {
            joined.remove(chat_id);
            if joined.is_empty() {
                rooms.joined.remove(connection_id);
            }
        }
        removed
    }

    async fn leave_all(&self, connection_id: &ConnectionId) -> Vec<ChatId> {
        let mut rooms = self.rooms.lock().await;
        let Some(joined) = rooms.joined.remove(connection_id) else {
            return Vec::new();
        };
        let mut left = Vec::with_capacity(joined.len());
        for chat_id in joined {
            rooms.unsubscribe(&chat_id, connection_id);
            left.push(chat_id);
        }
        left
    }

    async fn subscribers(&self, chat_id: &ChatId) -> HashSet<ConnectionId> {
        let rooms = self.rooms.lock().await;
        rooms.subscribers.get(chat_id).cloned().unwrap_or_default()
    }

    async fn rooms_of(&self, connection_id: &ConnectionId) -> HashSet<ChatId> {
        let rooms = self.rooms.lock().await;
        rooms.joined.get(connection_id).cloned().unwrap_or_default()
    }

    async fn room_count(&self) -> usize {
        self.rooms.lock().await.subscribers.len()
    }
}
