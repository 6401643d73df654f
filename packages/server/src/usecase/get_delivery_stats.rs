//! UseCase: 配信状態の取得（デバッグ用）

use std::sync::Arc;

use crate::domain::{ConnectionRegistry, RoomMembership};

/// 配信コアの現在の規模
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeliveryStats {
    /// 認証済みの接続数
    pub active_connections: usize,
    /// 購読者が 1 人以上いるルーム数
    pub rooms: usize,
}

pub struct GetDeliveryStatsUseCase {
    registry: Arc<dyn ConnectionRegistry>,
    membership: Arc<dyn RoomMembership>,
}

impl GetDeliveryStatsUseCase {
    pub fn new(registry: Arc<dyn ConnectionRegistry>, membership: Arc<dyn RoomMembership>) -> Self {
        Self {
            registry,
            membership,
        }
    }

    pub async fn execute(&self) -> DeliveryStats {
        DeliveryStats {
            active_connections: self.registry.connected().await.len(),
            rooms: self.membership.room_count().await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::usecase::test_support::{Harness, chat};

    #[tokio::test]
    async fn test_stats_count_active_connections_and_rooms() {
        // テスト項目: 認証済みの接続数と購読者のいるルーム数が返される
        // given (前提条件):
        let harness = Harness::new();
        let usecase =
            GetDeliveryStatsUseCase::new(harness.registry.clone(), harness.membership.clone());
        let (alice, _alice_rx) = harness.connect("alice").await;
        let (_bob, _bob_rx) = harness.connect("bob").await;
        let (_pending, _pending_rx) = harness.connect_pending().await;
        harness.membership.join(chat("chat1"), alice.clone()).await;
        harness.membership.join(chat("chat2"), alice).await;

        // when (操作):
        let stats = usecase.execute().await;

        // then (期待する結果):
        assert_eq!(
            stats,
            DeliveryStats {
                active_connections: 2,
                rooms: 2
            }
        );
    }
}
