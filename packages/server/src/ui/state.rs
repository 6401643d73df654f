//! Shared application state.

use std::sync::Arc;

use hibiki_shared::time::Clock;

use crate::usecase::{
    AcknowledgeReadUseCase, AuthenticateConnectionUseCase, ChatNotifier, ConnectPrincipalUseCase,
    DeliverEventUseCase, DisconnectConnectionUseCase, GetDeliveryStatsUseCase, JoinChatUseCase,
    LeaveChatUseCase, ListMessagesUseCase, MarkReadUseCase, PostMessageUseCase,
    SendMessageUseCase, TypingUseCase,
};

/// Shared application state
pub struct AppState {
    /// AuthenticateConnectionUseCase（ハンドシェイク認証）
    pub authenticate_connection_usecase: Arc<AuthenticateConnectionUseCase>,
    /// ConnectPrincipalUseCase（認証済み接続の登録）
    pub connect_principal_usecase: Arc<ConnectPrincipalUseCase>,
    /// DisconnectConnectionUseCase（切断処理）
    pub disconnect_connection_usecase: Arc<DisconnectConnectionUseCase>,
    /// DeliverEventUseCase（配信エンジン）
    pub deliver_event_usecase: Arc<DeliverEventUseCase>,
    pub join_chat_usecase: Arc<JoinChatUseCase>,
    pub leave_chat_usecase: Arc<LeaveChatUseCase>,
    pub send_message_usecase: Arc<SendMessageUseCase>,
    pub mark_read_usecase: Arc<MarkReadUseCase>,
    pub typing_usecase: Arc<TypingUseCase>,
    /// PostMessageUseCase（REST からの投稿）
    pub post_message_usecase: Arc<PostMessageUseCase>,
    /// AcknowledgeReadUseCase（REST からの既読）
    pub acknowledge_read_usecase: Arc<AcknowledgeReadUseCase>,
    pub list_messages_usecase: Arc<ListMessagesUseCase>,
    pub get_delivery_stats_usecase: Arc<GetDeliveryStatsUseCase>,
    /// ChatNotifier（帯域外の通知経路）
    pub chat_notifier: Arc<ChatNotifier>,
    pub clock: Arc<dyn Clock>,
}
