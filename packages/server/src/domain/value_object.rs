//! Value Objects
//!
//! 識別子はすべて検証済みの文字列ラッパーとして表現します。
//! 生成時に不正な値（空文字列、空白のみ、長すぎる値）を拒否するため、
//! 一度生成された値はドメイン内で常に有効です。

use std::fmt;

use serde::{Deserialize, Serialize};

use super::error::ValueObjectError;

/// 識別子の最大長（バイト）
pub const MAX_ID_LENGTH: usize = 128;

fn validate_id(kind: &'static str, value: &str) -> Result<(), ValueObjectError> {
    if value.trim().is_empty() {
        return Err(ValueObjectError::Empty(kind));
    }
    if value.len() > MAX_ID_LENGTH {
        return Err(ValueObjectError::TooLong {
            kind,
            max: MAX_ID_LENGTH,
            actual: value.len(),
        });
    }
    Ok(())
}

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident, $kind:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(try_from = "String", into = "String")]
        pub struct $name(String);

        impl $name {
            /// 検証して新しい値を作成
            pub fn new(value: String) -> Result<Self, ValueObjectError> {
                validate_id($kind, &value)?;
                Ok(Self(value))
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl TryFrom<String> for $name {
            type Error = ValueObjectError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl From<$name> for String {
            fn from(value: $name) -> Self {
                value.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

string_id!(
    /// 1 本のライブなトランスポート（WebSocket 接続）の識別子
    ConnectionId,
    "connection id"
);

string_id!(
    /// 認証済みの主体（ユーザー）の識別子
    PrincipalId,
    "principal id"
);

string_id!(
    /// チャット（ルーム）の識別子。チャット自体は外部ストレージが所有する
    ChatId,
    "chat id"
);

string_id!(
    /// 永続化されたメッセージの識別子
    MessageId,
    "message id"
);

impl ConnectionId {
    /// 新しい接続 ID を払い出す（UUID v4）
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }
}

impl MessageId {
    /// 新しいメッセージ ID を払い出す（UUID v4）
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }
}

/// Unix タイムスタンプ（ミリ秒, UTC）
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Timestamp(i64);

impl Timestamp {
    pub fn new(millis: i64) -> Self {
        Self(millis)
    }

    pub fn value(&self) -> i64 {
        self.0
    }
}
