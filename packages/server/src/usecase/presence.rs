//! プレゼンス（online / offline）の遷移
//!
//! Connection Registry への登録・削除と、Presence Store の更新、`userStatusChanged` の配信を
//! 1 つのロックの中で行います。ロックの外で遷移を判定すると、同じ主体の切断と再接続
//! （ページの再読み込みなど）が重なったときに、接続が残っているのに offline が
//! 最後に書き込まれ、配信されることがあります。

use std::sync::Arc;

use hibiki_shared::time::{Clock, millis_to_rfc3339};
use tokio::sync::Mutex;

use crate::domain::{
    ChatEvent, ConnectionId, ConnectionRegistry, EventPayload, PresenceStatus, PresenceStore,
    PrincipalId,
};

use super::DeliverEventUseCase;

/// 全接続向けのプレゼンス変更イベント
fn presence_changed(principal_id: PrincipalId, status: PresenceStatus, clock: &dyn Clock) -> ChatEvent {
    ChatEvent::to_everyone(EventPayload::UserStatusChanged {
        user_id: principal_id,
        status,
        timestamp: millis_to_rfc3339(clock.now_millis()),
    })
}

/// 主体単位のプレゼンス遷移を直列化する
pub struct PresenceTracker {
    registry: Arc<dyn ConnectionRegistry>,
    presence_store: Arc<dyn PresenceStore>,
    deliver: Arc<DeliverEventUseCase>,
    clock: Arc<dyn Clock>,
    transitions: Mutex<()>,
}

impl PresenceTracker {
    pub fn new(
        registry: Arc<dyn ConnectionRegistry>,
        presence_store: Arc<dyn PresenceStore>,
        deliver: Arc<DeliverEventUseCase>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            registry,
            presence_store,
            deliver,
            clock,
            transitions: Mutex::new(()),
        }
    }

    /// 接続を登録する。主体がオンラインになった場合は `true` を返す
    ///
    /// online は接続してきた本人を除くすべての接続に配信される。
    pub async fn admit(&self, principal_id: PrincipalId, connection_id: ConnectionId) -> bool {
        let _transition = self.transitions.lock().await;

        let came_online = self
            .registry
            .admit(principal_id.clone(), connection_id.clone())
            .await;
        if came_online {
            self.announce(principal_id, PresenceStatus::Online, Some(connection_id))
                .await;
        }
        came_online
    }

    /// 接続を削除する。主体の最後の接続だった場合はその主体を返す
    pub async fn remove(&self, connection_id: &ConnectionId) -> Option<PrincipalId> {
        let _transition = self.transitions.lock().await;

        let principal_id = self.registry.remove(connection_id).await?;
        self.announce(principal_id.clone(), PresenceStatus::Offline, None)
            .await;
        Some(principal_id)
    }

    /// Presence Store を更新してから配信する（ストアの失敗は配信を止めない）
    async fn announce(
        &self,
        principal_id: PrincipalId,
        status: PresenceStatus,
        exclude: Option<ConnectionId>,
    ) {
        if let Err(e) = self.presence_store.set_status(&principal_id, status).await {
            tracing::warn!(
                "Failed to record '{}' as {}: {}",
                principal_id,
                status.as_str(),
                e
            );
        }

        tracing::info!("Principal '{}' is now {}", principal_id, status.as_str());
        let mut event = presence_changed(principal_id, status, self.clock.as_ref());
        if let Some(connection_id) = exclude {
            event = event.excluding(connection_id);
        }
        self.deliver.execute(&event).await;
    }
}
