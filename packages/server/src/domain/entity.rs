//! Entities
//!
//! - `Message` / `NewMessage`: 外部 Message Store が所有するメッセージ
//! - `Connection`: 1 本のライブ接続とそのライフサイクル（Pending → Active → Closed）
//! - `PresenceStatus`: 主体のオンライン状態

use serde::{Serialize, Serializer};

use hibiki_shared::time::millis_to_rfc3339;

use super::value_object::{ChatId, ConnectionId, MessageId, PrincipalId, Timestamp};

/// メッセージ種別
///
/// 既知の種別以外の文字列もそのまま保持する（ストアが種別の正当性を判断する）。
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum MessageKind {
    #[default]
    Text,
    Image,
    File,
    Audio,
    Other(String),
}

impl MessageKind {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Text => "text",
            Self::Image => "image",
            Self::File => "file",
            Self::Audio => "audio",
            Self::Other(kind) => kind,
        }
    }
}

impl From<&str> for MessageKind {
    fn from(value: &str) -> Self {
        match value {
            "text" => Self::Text,
            "image" => Self::Image,
            "file" => Self::File,
            "audio" => Self::Audio,
            other => Self::Other(other.to_string()),
        }
    }
}

impl Serialize for MessageKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// 添付ファイルのメタデータ
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Attachment {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_size: Option<u64>,
}

impl Attachment {
    /// いずれかのフィールドが指定されていれば `Some` を返す
    pub fn from_parts(
        file_url: Option<String>,
        file_name: Option<String>,
        file_size: Option<u64>,
    ) -> Option<Self> {
        if file_url.is_none() && file_name.is_none() && file_size.is_none() {
            return None;
        }
        Some(Self {
            file_url,
            file_name,
            file_size,
        })
    }
}

/// Message Store に渡す作成要求
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewMessage {
    pub content: String,
    pub kind: MessageKind,
    pub sender_id: PrincipalId,
    pub chat_id: ChatId,
    pub attachment: Option<Attachment>,
    pub reply_to_id: Option<MessageId>,
}

/// クライアントから届いた送信内容（送信者は接続から決まる）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageDraft {
    pub content: String,
    pub kind: MessageKind,
    pub chat_id: ChatId,
    pub attachment: Option<Attachment>,
    pub reply_to_id: Option<MessageId>,
}

impl MessageDraft {
    pub fn into_new_message(self, sender_id: PrincipalId) -> NewMessage {
        NewMessage {
            content: self.content,
            kind: self.kind,
            sender_id,
            chat_id: self.chat_id,
            attachment: self.attachment,
            reply_to_id: self.reply_to_id,
        }
    }
}

/// 永続化済みメッセージ
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub id: MessageId,
    pub content: String,
    #[serde(rename = "type")]
    pub kind: MessageKind,
    pub sender_id: PrincipalId,
    pub chat_id: ChatId,
    #[serde(flatten)]
    pub attachment: Option<Attachment>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reply_to_id: Option<MessageId>,
    pub is_read: bool,
    #[serde(serialize_with = "serialize_timestamp")]
    pub created_at: Timestamp,
}

fn serialize_timestamp<S: Serializer>(value: &Timestamp, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&millis_to_rfc3339(value.value()))
}

/// 主体のプレゼンス
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PresenceStatus {
    Online,
    Offline,
}

impl PresenceStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Online => "online",
            Self::Offline => "offline",
        }
    }
}

/// 接続の状態
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectionState {
    /// トランスポートは開いているが未認証
    Pending,
    /// 認証済みで Registry に登録されている
    Active(PrincipalId),
    /// 終端状態
    Closed,
}

/// 状態遷移の誤り
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid connection transition from {from} to {to}")]
pub struct ConnectionTransitionError {
    pub from: &'static str,
    pub to: &'static str,
}

/// 1 本のライブ接続
#[derive(Debug, Clone)]
pub struct Connection {
    pub id: ConnectionId,
    pub accepted_at: Timestamp,
    state: ConnectionState,
}

impl Connection {
    /// トランスポート受付時に Pending 状態で生成
    pub fn accept(id: ConnectionId, accepted_at: Timestamp) -> Self {
        Self {
            id,
            accepted_at,
            state: ConnectionState::Pending,
        }
    }

    pub fn state(&self) -> &ConnectionState {
        &self.state
    }

    pub fn principal(&self) -> Option<&PrincipalId> {
        match &self.state {
            ConnectionState::Active(principal) => Some(principal),
            _ => None,
        }
    }

    pub fn is_active(&self) -> bool {
        matches!(self.state, ConnectionState::Active(_))
    }

    /// ハンドシェイク成功時: Pending → Active
    pub fn activate(&mut self, principal: PrincipalId) -> Result<(), ConnectionTransitionError> {
        if self.state != ConnectionState::Pending {
            return Err(ConnectionTransitionError {
                from: state_name(&self.state),
                to: "active",
            });
        }
        self.state = ConnectionState::Active(principal);
        Ok(())
    }

    /// 切断時: 任意の状態 → Closed
    ///
    /// 直前の状態を返す。すでに Closed の場合は `None`。
    pub fn close(&mut self) -> Option<ConnectionState> {
        if self.state == ConnectionState::Closed {
            return None;
        }
        Some(std::mem::replace(&mut self.state, ConnectionState::Closed))
    }
}

fn state_name(state: &ConnectionState) -> &'static str {
    match state {
        ConnectionState::Pending => "pending",
        ConnectionState::Active(_) => "active",
        ConnectionState::Closed => "closed",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn principal(id: &str) -> PrincipalId {
        PrincipalId::new(id.to_string()).unwrap()
    }

    #[test]
    fn test_connection_lifecycle_pending_active_closed() {
        // テスト項目: 接続は Pending → Active → Closed の順に遷移する
        // given (前提条件):
        let mut connection = Connection::accept(ConnectionId::generate(), Timestamp::new(1000));
        assert_eq!(connection.state(), &ConnectionState::Pending);

        // when (操作):
        connection.activate(principal("alice")).unwrap();
        let previous = connection.close();

        // then (期待する結果):
        assert_eq!(previous, Some(ConnectionState::Active(principal("alice"))));
        assert_eq!(connection.state(), &ConnectionState::Closed);
        assert!(connection.principal().is_none());
    }

    #[test]
    fn test_connection_cannot_activate_twice() {
        // テスト項目: Active な接続を再度 Active にすることはできない
        // given (前提条件):
        let mut connection = Connection::accept(ConnectionId::generate(), Timestamp::new(1000));
        connection.activate(principal("alice")).unwrap();

        // when (操作):
        let result = connection.activate(principal("bob"));

        // then (期待する結果):
        assert_eq!(
            result,
            Err(ConnectionTransitionError {
                from: "active",
                to: "active"
            })
        );
        assert_eq!(connection.principal(), Some(&principal("alice")));
    }

    #[test]
    fn test_closed_connection_cannot_be_activated() {
        // テスト項目: Closed は終端状態である
        // given (前提条件):
        let mut connection = Connection::accept(ConnectionId::generate(), Timestamp::new(1000));
        connection.close();

        // when (操作):
        let result = connection.activate(principal("alice"));
        let second_close = connection.close();

        // then (期待する結果):
        assert!(result.is_err());
        assert!(second_close.is_none());
    }

    #[test]
    fn test_message_serializes_with_camel_case_fields() {
        // テスト項目: Message がクライアント向けの camelCase JSON に変換される
        // given (前提条件):
        let message = Message {
            id: MessageId::new("m1".to_string()).unwrap(),
            content: "hi".to_string(),
            kind: MessageKind::File,
            sender_id: principal("alice"),
            chat_id: ChatId::new("chat1".to_string()).unwrap(),
            attachment: Attachment::from_parts(
                Some("https://cdn.example/a.png".to_string()),
                Some("a.png".to_string()),
                Some(42),
            ),
            reply_to_id: None,
            is_read: false,
            created_at: Timestamp::new(1672531200000),
        };

        // when (操作):
        let json = serde_json::to_value(&message).unwrap();

        // then (期待する結果):
        assert_eq!(json["type"], "file");
        assert_eq!(json["senderId"], "alice");
        assert_eq!(json["chatId"], "chat1");
        assert_eq!(json["fileName"], "a.png");
        assert_eq!(json["fileSize"], 42);
        assert_eq!(json["isRead"], false);
        assert_eq!(json["createdAt"], "2023-01-01T00:00:00.000Z");
        assert!(json.get("replyToId").is_none());
    }

    #[test]
    fn test_attachment_from_parts_returns_none_when_empty() {
        // テスト項目: すべて未指定の場合は添付なしとして扱われる
        // given (前提条件):

        // when (操作):
        let attachment = Attachment::from_parts(None, None, None);

        // then (期待する結果):
        assert!(attachment.is_none());
    }

    #[test]
    fn test_message_kind_keeps_unknown_values() {
        // テスト項目: 未知のメッセージ種別はそのまま保持される
        // given (前提条件):
        let raw = "sticker";

        // when (操作):
        let kind = MessageKind::from(raw);

        // then (期待する結果):
        assert_eq!(kind, MessageKind::Other("sticker".to_string()));
        assert_eq!(kind.as_str(), "sticker");
    }
}
