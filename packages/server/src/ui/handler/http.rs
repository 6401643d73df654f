//! HTTP API endpoint handlers.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, Query, State, rejection::JsonRejection},
    http::{HeaderMap, StatusCode, header::AUTHORIZATION},
};

use crate::{
    domain::{ChatId, Message, MessageDraft, MessageId, PrincipalId},
    infrastructure::dto::http::{
        ChatReadResponse, CreateMessageRequest, DeliveryStatsDto, ErrorResponse,
        ListMessagesQuery,
    },
    ui::state::AppState,
    usecase::{DeliveryError, credential_from_handshake},
};

type ApiError = (StatusCode, Json<ErrorResponse>);

fn api_error(status: StatusCode, message: impl Into<String>) -> ApiError {
    (status, Json(ErrorResponse::new(message)))
}

impl From<DeliveryError> for (StatusCode, Json<ErrorResponse>) {
    fn from(error: DeliveryError) -> Self {
        let status = match &error {
            DeliveryError::NotAuthenticated => StatusCode::UNAUTHORIZED,
            DeliveryError::NotFound(_) => StatusCode::NOT_FOUND,
            DeliveryError::Persistence { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            DeliveryError::InvalidInput(_) => StatusCode::BAD_REQUEST,
        };
        api_error(status, error.client_message())
    }
}

/// `Authorization: Bearer <token>` を検証して主体を返す
async fn authenticate(state: &AppState, headers: &HeaderMap) -> Result<PrincipalId, ApiError> {
    let authorization = headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok());
    state
        .authenticate_connection_usecase
        .execute(credential_from_handshake(None, authorization))
        .await
        .map_err(|e| {
            tracing::info!("Rejected API request: {}", e);
            api_error(StatusCode::UNAUTHORIZED, "User not authenticated")
        })
}

/// Health check endpoint
pub async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({"status": "ok"}))
}

/// Create a message outside of the live connection and announce it to the room
pub async fn post_message(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: Result<Json<CreateMessageRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Message>), ApiError> {
    let sender_id = authenticate(&state, &headers).await?;

    let Json(request) = body.map_err(|e| {
        tracing::debug!("Invalid message body: {}", e);
        api_error(StatusCode::BAD_REQUEST, format!("Invalid request: {}", e.body_text()))
    })?;
    let draft = MessageDraft::try_from(request).map_err(DeliveryError::from)?;

    let message = state.post_message_usecase.execute(sender_id, draft).await?;
    Ok((StatusCode::CREATED, Json(message)))
}

/// Get one page of a chat's history (most recent first)
pub async fn list_messages(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(chat_id): Path<String>,
    Query(query): Query<ListMessagesQuery>,
) -> Result<Json<Vec<Message>>, ApiError> {
    authenticate(&state, &headers).await?;

    let chat_id = ChatId::new(chat_id).map_err(DeliveryError::from)?;
    let messages = state
        .list_messages_usecase
        .execute(&chat_id, query.page, query.limit)
        .await?;
    Ok(Json(messages))
}

/// Mark one message as read and announce the receipt to its room
pub async fn mark_message_read(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(message_id): Path<String>,
) -> Result<Json<Message>, ApiError> {
    let user_id = authenticate(&state, &headers).await?;

    let message_id = MessageId::new(message_id).map_err(DeliveryError::from)?;
    let message = state
        .acknowledge_read_usecase
        .mark_message(user_id, &message_id)
        .await?;
    Ok(Json(message))
}

/// Mark every message from others in a chat as read
pub async fn mark_chat_read(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(chat_id): Path<String>,
) -> Result<Json<ChatReadResponse>, ApiError> {
    let user_id = authenticate(&state, &headers).await?;

    let chat_id = ChatId::new(chat_id).map_err(DeliveryError::from)?;
    let messages_read = state
        .acknowledge_read_usecase
        .mark_chat(user_id, &chat_id)
        .await?;
    Ok(Json(ChatReadResponse {
        chat_id,
        messages_read,
    }))
}

/// Debug endpoint to get current delivery state (for testing purposes)
pub async fn delivery_stats(State(state): State<Arc<AppState>>) -> Json<DeliveryStatsDto> {
    let stats = state.get_delivery_stats_usecase.execute().await;
    Json(stats.into())
}
