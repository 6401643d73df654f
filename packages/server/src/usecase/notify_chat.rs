//! UseCase: 帯域外のイベント通知
//!
//! リアルタイム接続を経由しない処理（REST API など）から、チャットイベントを配信経路に流します。
//!
//! - 配信エンジンが接続済みであれば直接配信する（fast path）
//! - まだ接続されていなければイベントバスへ発行する（バスの購読側が後で配信する）
//!
//! どちらの経路でも、呼び出し元の処理は配信の成否に左右されません。

use std::sync::Arc;

use tokio::sync::RwLock;

use crate::domain::{ChatEvent, EventPayload, EventPublisher, Message};

use super::DeliverEventUseCase;

/// ルーム購読者全員向けの `newMessage` イベント
pub(crate) fn message_created(message: Message) -> ChatEvent {
    let chat_id = message.chat_id.clone();
    ChatEvent::to_room(chat_id, EventPayload::NewMessage(message))
}

/// 通知がどの経路で処理されたか
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeliveryRoute {
    /// 配信エンジンで直接配信した（値は送信できた接続数）
    FastPath(usize),
    /// イベントバスへ発行した（値はバスの購読者数）
    EventBus(usize),
}

pub struct ChatNotifier {
    engine: RwLock<Option<Arc<DeliverEventUseCase>>>,
    publisher: Arc<dyn EventPublisher>,
}

impl ChatNotifier {
    pub fn new(publisher: Arc<dyn EventPublisher>) -> Self {
        Self {
            engine: RwLock::new(None),
            publisher,
        }
    }

    /// 配信エンジンを接続する（サーバー起動時に 1 度だけ呼ばれる）
    pub async fn attach(&self, engine: Arc<DeliverEventUseCase>) {
        *self.engine.write().await = Some(engine);
        tracing::info!("Delivery engine attached to notifier");
    }

    pub async fn is_attached(&self) -> bool {
        self.engine.read().await.is_some()
    }

    pub async fn notify(&self, event: ChatEvent) -> DeliveryRoute {
        let engine = self.engine.read().await.clone();
        match engine {
            Some(engine) => DeliveryRoute::FastPath(engine.execute(&event).await),
            None => {
                tracing::debug!(
                    "Delivery engine not attached yet, publishing {:?} event to the bus",
                    event.kind()
                );
                DeliveryRoute::EventBus(self.publisher.publish(event))
            }
        }
    }

    /// 新規メッセージをチャットの購読者全員に通知
    pub async fn notify_message_sent(&self, message: Message) -> DeliveryRoute {
        self.notify(message_created(message)).await
    }
}
