//! Dependency wiring.
//!
//! Initialize dependencies in order:
//! 1. Stores / Registry / Membership / MessagePusher / EventBus
//! 2. UseCases
//! 3. AppState
//! 4. Server

use std::sync::Arc;

use hibiki_shared::time::{Clock, SystemClock};

use crate::{
    config::ServerConfig,
    infrastructure::{
        auth::JwtCredentialVerifier,
        connection::{InMemoryConnectionRegistry, InMemoryRoomMembership},
        event_bus::BroadcastEventBus,
        message_pusher::WebSocketMessagePusher,
        repository::{InMemoryMessageStore, InMemoryPresenceStore},
    },
    ui::{Server, state::AppState},
    usecase::{
        AcknowledgeReadUseCase, AuthenticateConnectionUseCase, ChatNotifier,
        ConnectPrincipalUseCase, DeliverEventUseCase, DisconnectConnectionUseCase,
        GetDeliveryStatsUseCase, JoinChatUseCase, LeaveChatUseCase, ListMessagesUseCase,
        MarkReadUseCase, PostMessageUseCase, PresenceTracker, SendMessageUseCase, TypingUseCase,
    },
};

/// インメモリ実装で組み立てたサーバーを返す
pub fn build_server(config: &ServerConfig) -> Server {
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);

    // 1. Infrastructure
    let registry = Arc::new(InMemoryConnectionRegistry::new());
    let membership = Arc::new(InMemoryRoomMembership::new());
    let message_pusher = Arc::new(WebSocketMessagePusher::new());
    let message_store = Arc::new(InMemoryMessageStore::new(clock.clone()));
    let presence_store = Arc::new(InMemoryPresenceStore::new());
    let verifier = Arc::new(JwtCredentialVerifier::new(config.jwt_secret.as_bytes()));
    let event_bus = BroadcastEventBus::new(config.event_bus_capacity);
    // 起動前に購読しておき、attach までに発行されたイベントをバッファする
    let event_subscription = event_bus.subscribe(&[]);

    // 2. UseCases
    let deliver = Arc::new(DeliverEventUseCase::new(
        registry.clone(),
        membership.clone(),
        message_pusher.clone(),
    ));
    let presence = Arc::new(PresenceTracker::new(
        registry.clone(),
        presence_store,
        deliver.clone(),
        clock.clone(),
    ));
    let chat_notifier = Arc::new(ChatNotifier::new(Arc::new(event_bus)));

    let app_state = Arc::new(AppState {
        authenticate_connection_usecase: Arc::new(AuthenticateConnectionUseCase::new(verifier)),
        connect_principal_usecase: Arc::new(ConnectPrincipalUseCase::new(
            message_pusher.clone(),
            presence.clone(),
        )),
        disconnect_connection_usecase: Arc::new(DisconnectConnectionUseCase::new(
            membership.clone(),
            message_pusher.clone(),
            presence,
        )),
        join_chat_usecase: Arc::new(JoinChatUseCase::new(
            registry.clone(),
            membership.clone(),
            message_store.clone(),
            deliver.clone(),
            config.history_limit,
        )),
        leave_chat_usecase: Arc::new(LeaveChatUseCase::new(membership.clone())),
        send_message_usecase: Arc::new(SendMessageUseCase::new(
            registry.clone(),
            message_store.clone(),
            deliver.clone(),
        )),
        mark_read_usecase: Arc::new(MarkReadUseCase::new(
            registry.clone(),
            message_store.clone(),
            deliver.clone(),
        )),
        typing_usecase: Arc::new(TypingUseCase::new(registry.clone(), deliver.clone())),
        post_message_usecase: Arc::new(PostMessageUseCase::new(
            message_store.clone(),
            chat_notifier.clone(),
        )),
        acknowledge_read_usecase: Arc::new(AcknowledgeReadUseCase::new(
            message_store.clone(),
            chat_notifier.clone(),
        )),
        list_messages_usecase: Arc::new(ListMessagesUseCase::new(message_store)),
        get_delivery_stats_usecase: Arc::new(GetDeliveryStatsUseCase::new(registry, membership)),
        deliver_event_usecase: deliver,
        chat_notifier,
        clock,
    });

    // 3. Server
    Server::new(app_state, event_subscription)
}
