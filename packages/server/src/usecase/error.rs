//! UseCase 層のエラー
//!
//! クライアントへは `error` イベントとして報告されます（`client_message`）。
//! 永続化に失敗した操作は対応するブロードキャストを行いません。

use thiserror::Error;

use crate::domain::{StoreError, ValueObjectError};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DeliveryError {
    /// ハンドシェイクを完了していない接続からの操作
    #[error("connection is not authenticated")]
    NotAuthenticated,

    /// 参照されたルーム・メッセージ・主体が存在しない
    #[error("{0} not found")]
    NotFound(String),

    /// 外部ストアの失敗
    #[error("failed to {action}: {reason}")]
    Persistence { action: &'static str, reason: String },

    /// 入力値が不正
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

impl DeliveryError {
    pub fn persistence(action: &'static str, error: StoreError) -> Self {
        Self::Persistence {
            action,
            reason: error.to_string(),
        }
    }

    /// `error` イベントでクライアントに返すメッセージ
    pub fn client_message(&self) -> String {
        match self {
            Self::NotAuthenticated => "User not authenticated".to_string(),
            Self::NotFound(what) => format!("{what} not found"),
            Self::Persistence { action, .. } => format!("Failed to {action}"),
            Self::InvalidInput(reason) => format!("Invalid request: {reason}"),
        }
    }
}

impl From<ValueObjectError> for DeliveryError {
    fn from(error: ValueObjectError) -> Self {
        Self::InvalidInput(error.to_string())
    }
}
