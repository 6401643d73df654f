//! WebSocket DTOs
//!
//! クライアントからは `{"event": <name>, "data": <payload>}` 形式のテキストフレームが届きます。
//! サーバーから送るフレームはドメインの `EventPayload` がそのまま直列化されます。

use serde::Deserialize;

/// クライアントが送るアクション
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "event", content = "data")]
pub enum ClientAction {
    #[serde(rename = "join-chat")]
    JoinChat(ChatRefPayload),

    #[serde(rename = "leave-chat")]
    LeaveChat(ChatRefPayload),

    #[serde(rename = "send-message")]
    SendMessage(SendMessagePayload),

    #[serde(rename = "mark-message-read")]
    MarkMessageRead(MessageRefPayload),

    #[serde(rename = "mark-chat-read")]
    MarkChatRead(ChatRefPayload),

    #[serde(rename = "typing")]
    Typing(TypingPayload),
}

impl ClientAction {
    /// テキストフレームをアクションとして解釈する
    pub fn parse(frame: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(frame)
    }

    /// ログ出力用のイベント名
    pub fn name(&self) -> &'static str {
        match self {
            Self::JoinChat(_) => "join-chat",
            Self::LeaveChat(_) => "leave-chat",
            Self::SendMessage(_) => "send-message",
            Self::MarkMessageRead(_) => "mark-message-read",
            Self::MarkChatRead(_) => "mark-chat-read",
            Self::Typing(_) => "typing",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatRefPayload {
    pub chat_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageRefPayload {
    pub message_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendMessagePayload {
    pub content: String,
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    pub chat_id: String,
    #[serde(default)]
    pub file_url: Option<String>,
    #[serde(default)]
    pub file_name: Option<String>,
    #[serde(default)]
    pub file_size: Option<u64>,
    #[serde(default)]
    pub reply_to_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypingPayload {
    pub chat_id: String,
    pub is_typing: bool,
}
