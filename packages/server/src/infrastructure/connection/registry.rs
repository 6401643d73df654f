//! InMemory Connection Registry 実装
//!
//! principal → connections と connection → principal の双方向インデックスを
//! 1 つの Mutex の内側で保持します。両方向を同じクリティカルセクションで更新するため、
//! 片方だけが更新された状態が外部から観測されることはありません。

use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{ConnectionId, ConnectionRegistry, PrincipalId};

#[derive(Debug, Default)]
struct Index {
    by_principal: HashMap<PrincipalId, HashSet<ConnectionId>>,
    by_connection: HashMap<ConnectionId, PrincipalId>,
}

impl Index {
    /// 接続を取り除き、主体の最後の接続だった場合はその主体を返す
    fn detach(&mut self, connection_id: &ConnectionId) -> Option<PrincipalId> {
        let principal_id = self.by_connection.remove(connection_id)?;
        let now_empty = match self.by_principal.get_mut(&principal_id) {
            Some(connections) => {
                connections.remove(connection_id);
                connections.is_empty()
            }
            None => true,
        };
        if now_empty {
            self.by_principal.remove(&principal_id);
            Some(principal_id)
        } else {
            None
        }
    }
}

/// インメモリ Connection Registry 実装
#[derive(Debug, Default)]
pub struct InMemoryConnectionRegistry {
    index: Mutex<Index>,
}

impl InMemoryConnectionRegistry {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ConnectionRegistry for InMemoryConnectionRegistry {
    async fn admit(&self, principal_id: PrincipalId, connection_id: ConnectionId) -> bool {
        let mut index = self.index.lock().await;

        let existing_owner = index.by_connection.get(&connection_id).cloned();
        match existing_owner {
            Some(owner) if owner == principal_id => return false,
            // 別の主体で登録済みの接続は付け替える
            Some(_) => {
                index.detach(&connection_id);
            }
            None => {}
        }

        let connections = index.by_principal.entry(principal_id.clone()).or_default();
        let came_online = connections.is_empty();
        connections.insert(connection_id.clone());
        index.by_connection.insert(connection_id.clone(), principal_id.clone());

        tracing::debug!(
            "Connection '{}' admitted for principal '{}'",
            connection_id,
            principal_id
        );
        came_online
    }

    async fn remove(&self, connection_id: &ConnectionId) -> Option<PrincipalId> {
        let mut index = self.index.lock().await;
        let last = index.detach(connection_id);
        tracing::debug!("Connection '{}' removed from registry", connection_id);
        last
    }

    async fn lookup_principal(&self, connection_id: &ConnectionId) -> Option<PrincipalId> {
        let index = self.index.lock().await;
        index.by_connection.get(connection_id).cloned()
    }

    async fn connections_for(&self, principal_id: &PrincipalId) -> HashSet<ConnectionId> {
        let index = self.index.lock().await;
        index
            .by_principal
            .get(principal_id)
            .cloned()
            .unwrap_or_default()
    }

    async fn connected(&self) -> HashSet<ConnectionId> {
        let index = self.index.lock().await;
        index.by_connection.keys().cloned().collect()
    }
}
