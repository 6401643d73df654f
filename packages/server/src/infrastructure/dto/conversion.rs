//! Conversion logic between DTOs and domain models.
//!
//! クライアントから届いた生の文字列はここで検証済みの Value Object に変換されます。

use crate::domain::{
    Attachment, ChatId, MessageDraft, MessageId, MessageKind, ValueObjectError,
};
use crate::infrastructure::dto::websocket as dto;

// ========================================
// DTO → Domain Model
// ========================================

impl TryFrom<dto::SendMessagePayload> for MessageDraft {
    type Error = ValueObjectError;

    fn try_from(payload: dto::SendMessagePayload) -> Result<Self, Self::Error> {
        let reply_to_id = payload.reply_to_id.map(MessageId::new).transpose()?;
        Ok(Self {
            content: payload.content,
            kind: payload
                .kind
                .as_deref()
                .map(MessageKind::from)
                .unwrap_or_default(),
            chat_id: ChatId::new(payload.chat_id)?,
            attachment: Attachment::from_parts(
                payload.file_url,
                payload.file_name,
                payload.file_size,
            ),
            reply_to_id,
        })
    }
}

impl TryFrom<dto::ChatRefPayload> for ChatId {
    type Error = ValueObjectError;

    fn try_from(payload: dto::ChatRefPayload) -> Result<Self, Self::Error> {
        ChatId::new(payload.chat_id)
    }
}

impl TryFrom<dto::MessageRefPayload> for MessageId {
    type Error = ValueObjectError;

    fn try_from(payload: dto::MessageRefPayload) -> Result<Self, Self::Error> {
        MessageId::new(payload.message_id)
    }
}
