//! UseCase 層
//!
//! 1 つの操作につき 1 つのユースケース構造体を置きます。
//! 依存はすべてドメイン層の trait（`Arc<dyn Trait>`）として受け取ります。

mod acknowledge_read;
mod authenticate_connection;
mod connect_principal;
mod deliver_event;
mod disconnect_connection;
mod error;
mod get_delivery_stats;
mod join_chat;
mod leave_chat;
mod list_messages;
mod mark_read;
mod notify_chat;
mod post_message;
mod presence;
mod principal;
mod send_message;
mod typing;

#[cfg(test)]
pub(crate) mod test_support;

pub use acknowledge_read::AcknowledgeReadUseCase;
pub use authenticate_connection::{AuthenticateConnectionUseCase, credential_from_handshake};
pub use connect_principal::ConnectPrincipalUseCase;
pub use deliver_event::DeliverEventUseCase;
pub use disconnect_connection::{DisconnectConnectionUseCase, DisconnectOutcome};
pub use error::DeliveryError;
pub use get_delivery_stats::{DeliveryStats, GetDeliveryStatsUseCase};
pub use join_chat::{DEFAULT_HISTORY_LIMIT, JoinChatUseCase};
pub use leave_chat::LeaveChatUseCase;
pub use list_messages::{DEFAULT_PAGE_SIZE, ListMessagesUseCase, MAX_PAGE_SIZE};
pub use mark_read::MarkReadUseCase;
pub use notify_chat::{ChatNotifier, DeliveryRoute};
pub use post_message::PostMessageUseCase;
pub use presence::PresenceTracker;
pub use send_message::SendMessageUseCase;
pub use typing::TypingUseCase;
