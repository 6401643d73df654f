//! WebSocket connection handlers.
//!
//! 1 本の接続につき、受信ループと送信ループ（pusher_loop）の 2 タスクを動かします。
//! どちらかが終了した時点でもう一方も止め、切断処理を行います。

use std::sync::Arc;

use axum::{
    extract::{
        Query, State,
        ws::{CloseFrame, Message, WebSocket, WebSocketUpgrade, close_code},
    },
    http::{HeaderMap, header::AUTHORIZATION},
    response::IntoResponse,
};
use futures_util::{
    sink::SinkExt,
    stream::{SplitSink, StreamExt},
};
use hibiki_shared::time::Clock;
use serde::Deserialize;
use tokio::{sync::mpsc, task::JoinHandle};

use crate::{
    domain::{ChatId, Connection, ConnectionId, MessageDraft, MessageId, Timestamp},
    infrastructure::dto::websocket::ClientAction,
    ui::state::AppState,
    usecase::{DeliveryError, credential_from_handshake},
};

/// Query parameters for WebSocket connection
#[derive(Debug, Default, Deserialize)]
pub struct ConnectQuery {
    pub token: Option<String>,
}

/// 認証はアップグレード後に行う（失敗時はポリシー違反のクローズフレームで切断する）
pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
    Query(query): Query<ConnectQuery>,
    headers: HeaderMap,
) -> impl IntoResponse {
    let authorization = headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok());
    let credential = credential_from_handshake(query.token.as_deref(), authorization);

    ws.on_upgrade(move |socket| handle_socket(socket, state, credential))
}

/// Spawns a task that receives frames from the rx channel and pushes them to the WebSocket sender.
fn pusher_loop(
    mut rx: mpsc::UnboundedReceiver<String>,
    mut sender: SplitSink<WebSocket, Message>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(frame) = rx.recv().await {
            if let Err(e) = sender.send(Message::Text(frame.into())).await {
                tracing::debug!("WebSocket send failed, stopping pusher loop: {}", e);
                break;
            }
        }
    })
}

async fn handle_socket(mut socket: WebSocket, state: Arc<AppState>, credential: Option<String>) {
    let mut connection = Connection::accept(
        ConnectionId::generate(),
        Timestamp::new(state.clock.now_millis()),
    );

    // Auth Gate: 失敗した接続はイベントを一切発生させずに閉じる
    let principal_id = match state
        .authenticate_connection_usecase
        .execute(credential)
        .await
    {
        Ok(principal_id) => principal_id,
        Err(e) => {
            tracing::info!("Rejecting connection '{}': {}", connection.id, e);
            let close = CloseFrame {
                code: close_code::POLICY,
                reason: "authentication failed".into(),
            };
            if let Err(e) = socket.send(Message::Close(Some(close))).await {
                tracing::debug!("Failed to send close frame to '{}': {}", connection.id, e);
            }
            connection.close();
            return;
        }
    };

    if let Err(e) = connection.activate(principal_id.clone()) {
        tracing::error!("Connection '{}' could not be activated: {}", connection.id, e);
        return;
    }

    let (tx, rx) = mpsc::unbounded_channel();
    state
        .connect_principal_usecase
        .execute(principal_id, connection.id.clone(), tx)
        .await;

    let (sender, mut receiver) = socket.split();
    let send_task = pusher_loop(rx, sender);

    let state_clone = state.clone();
    let connection_id = connection.id.clone();
    let recv_task = tokio::spawn(async move {
        while let Some(msg) = receiver.next().await {
            let msg = match msg {
                Ok(msg) => msg,
                Err(e) => {
                    tracing::error!("WebSocket error on '{}': {}", connection_id, e);
                    break;
                }
            };

            match msg {
                Message::Text(text) => {
                    tracing::debug!("Received frame from '{}': {}", connection_id, text.as_str());
                    dispatch_frame(&state_clone, &connection_id, text.as_str()).await;
                }
                Message::Close(_) => {
                    tracing::info!("Connection '{}' requested close", connection_id);
                    break;
                }
                _ => {}
            }
        }
    });

    stop_together(recv_task, send_task, &connection.id).await;

    connection.close();
    tracing::debug!(
        "Connection '{}' was open for {} ms",
        connection.id,
        state.clock.now_millis() - connection.accepted_at.value()
    );
    state
        .disconnect_connection_usecase
        .execute(&connection.id)
        .await;
}

/// どちらかのタスクが終了したらもう一方を中断し、停止するまで待つ
///
/// 中断は要求にすぎないため、待たずに切断処理へ進むと処理中のフレームが
/// 切断処理のあとに Room Membership を書き換えることがある。
async fn stop_together(
    mut recv_task: JoinHandle<()>,
    mut send_task: JoinHandle<()>,
    connection_id: &ConnectionId,
) {
    let recv_finished = tokio::select! {
        _ = &mut recv_task => true,
        _ = &mut send_task => false,
    };
    let remaining = if recv_finished { send_task } else { recv_task };
    remaining.abort();
    match remaining.await {
        Err(e) if !e.is_cancelled() => {
            tracing::error!("Connection task for '{}' panicked: {}", connection_id, e);
        }
        _ => {}
    }
}

/// 1 フレームを解釈して処理する。失敗は `error` イベントで送信元に返し、接続は維持する
async fn dispatch_frame(state: &AppState, connection_id: &ConnectionId, frame: &str) {
    let action = match ClientAction::parse(frame) {
        Ok(action) => action,
        Err(e) => {
            tracing::warn!("Malformed frame from '{}': {}", connection_id, e);
            let error = DeliveryError::InvalidInput("malformed event frame".to_string());
            state
                .deliver_event_usecase
                .report_error(connection_id, &error)
                .await;
            return;
        }
    };

    let name = action.name();
    if let Err(e) = dispatch_action(state, connection_id, action).await {
        tracing::warn!("'{}' from '{}' failed: {}", name, connection_id, e);
        state
            .deliver_event_usecase
            .report_error(connection_id, &e)
            .await;
    }
}

async fn dispatch_action(
    state: &AppState,
    connection_id: &ConnectionId,
    action: ClientAction,
) -> Result<(), DeliveryError> {
    match action {
        ClientAction::JoinChat(payload) => {
            let chat_id = ChatId::try_from(payload)?;
            state
                .join_chat_usecase
                .execute(connection_id, chat_id)
                .await?;
        }
        ClientAction::LeaveChat(payload) => {
            let chat_id = ChatId::try_from(payload)?;
            state
                .leave_chat_usecase
                .execute(connection_id, &chat_id)
                .await;
        }
        ClientAction::SendMessage(payload) => {
            let draft = MessageDraft::try_from(payload)?;
            state
                .send_message_usecase
                .execute(connection_id, draft)
                .await?;
        }
        ClientAction::MarkMessageRead(payload) => {
            let message_id = MessageId::try_from(payload)?;
            state
                .mark_read_usecase
                .mark_message(connection_id, &message_id)
                .await?;
        }
        ClientAction::MarkChatRead(payload) => {
            let chat_id = ChatId::try_from(payload)?;
            state
                .mark_read_usecase
                .mark_chat(connection_id, &chat_id)
                .await?;
        }
        ClientAction::Typing(payload) => {
            let chat_id = ChatId::new(payload.chat_id)?;
            state
                .typing_usecase
                .execute(connection_id, chat_id, payload.is_typing)
                .await;
        }
    }
    Ok(())
}
