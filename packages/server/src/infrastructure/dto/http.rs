//! HTTP API DTOs

use serde::{Deserialize, Serialize};

use crate::{domain::ChatId, usecase::DeliveryStats};

use super::websocket::SendMessagePayload;

/// `POST /api/messages` のリクエストボディ（send-message と同じ形式）
pub type CreateMessageRequest = SendMessagePayload;

/// `GET /api/messages/{chatId}` のクエリパラメータ
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListMessagesQuery {
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}

/// `POST /api/messages/chat/{chatId}/read` のレスポンス
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatReadResponse {
    pub chat_id: ChatId,
    pub messages_read: u64,
}

/// `GET /debug/delivery` のレスポンス
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryStatsDto {
    pub active_connections: usize,
    pub rooms: usize,
}

impl From<DeliveryStats> for DeliveryStatsDto {
    fn from(stats: DeliveryStats) -> Self {
        Self {
            active_connections: stats.active_connections,
            rooms: stats.rooms,
        }
    }
}
