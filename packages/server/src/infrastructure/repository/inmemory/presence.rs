//! InMemory Presence Store 実装

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{PresenceStatus, PresenceStore, PrincipalId, StoreError};

/// インメモリ Presence Store 実装
#[derive(Default)]
pub struct InMemoryPresenceStore {
    statuses: Mutex<HashMap<PrincipalId, PresenceStatus>>,
}

impl InMemoryPresenceStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// 記録されている状態を取得（未記録なら `None`）
    pub async fn status_of(&self, principal_id: &PrincipalId) -> Option<PresenceStatus> {
        self.statuses.lock().await.get(principal_id).copied()
    }
}

#[async_trait]
impl PresenceStore for InMemoryPresenceStore {
    async fn set_status(
        &self,
        principal_id: &PrincipalId,
        status: PresenceStatus,
    ) -> Result<(), StoreError> {
        self.statuses
            .lock()
            .await
            .insert(principal_id.clone(), status);
        Ok(())
    }
}
