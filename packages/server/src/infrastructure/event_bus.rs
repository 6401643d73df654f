//! プロセス内イベントバス
//!
//! すべての発行者が共有する容量付きの `tokio::sync::broadcast` チャンネルです。
//! 購読者はそれぞれ自分の受信側を持つため、遅い購読者や脱落した購読者が
//! 発行者や他の購読者を止めることはありません。
//! `capacity` 件を超えて遅れた購読者は上書きされたイベントを失い、そのまま受信を続けます。

use std::{collections::HashSet, sync::Arc};

use tokio::sync::broadcast::{self, error::RecvError};

use crate::domain::{ChatEvent, EventKind, EventPublisher};

pub const DEFAULT_EVENT_BUS_CAPACITY: usize = 1024;

#[derive(Debug, Clone)]
pub struct BroadcastEventBus {
    sender: broadcast::Sender<Arc<ChatEvent>>,
}

impl BroadcastEventBus {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    /// 指定した種別のイベントを購読する（空のスライスならすべて）
    ///
    /// 購読した時点より後に発行されたイベントだけを受け取る。
    pub fn subscribe(&self, kinds: &[EventKind]) -> EventSubscription {
        EventSubscription {
            receiver: self.sender.subscribe(),
            kinds: kinds.iter().copied().collect(),
        }
    }
}

impl Default for BroadcastEventBus {
    fn default() -> Self {
        Self::new(DEFAULT_EVENT_BUS_CAPACITY)
    }
}

impl EventPublisher for BroadcastEventBus {
    fn publish(&self, event: ChatEvent) -> usize {
        let kind = event.kind();
        match self.sender.send(Arc::new(event)) {
            Ok(receivers) => {
                tracing::debug!("Published {:?} event to {} subscriber(s)", kind, receivers);
                receivers
            }
            Err(_) => {
                tracing::warn!("No event bus subscriber for {:?} event, dropping it", kind);
                0
            }
        }
    }
}

pub struct EventSubscription {
    receiver: broadcast::Receiver<Arc<ChatEvent>>,
    kinds: HashSet<EventKind>,
}

impl EventSubscription {
    /// 次に一致するイベントを待つ。発行者がすべていなくなると `None` を返す
    pub async fn next(&mut self) -> Option<Arc<ChatEvent>> {
        loop {
            match self.receiver.recv().await {
                Ok(event) if self.kinds.is_empty() || self.kinds.contains(&event.kind()) => {
                    return Some(event);
                }
                Ok(_) => continue,
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!("Event bus subscriber lagged, {} event(s) skipped", skipped);
                }
                Err(RecvError::Closed) => return None,
            }
        }
    }
}
