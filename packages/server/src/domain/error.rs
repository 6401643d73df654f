//! Domain errors.

use thiserror::Error;

/// Value Object の生成エラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValueObjectError {
    #[error("{0} must not be empty")]
    Empty(&'static str),

    #[error("{kind} is too long (max {max} bytes, got {actual})")]
    TooLong {
        kind: &'static str,
        max: usize,
        actual: usize,
    },
}

/// 接続時の認証エラー（接続試行に対して常に致命的）
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    /// ハンドシェイクに資格情報が含まれていない
    #[error("missing credential")]
    MissingCredential,

    /// 署名や構造が不正
    #[error("invalid credential: {0}")]
    InvalidCredential(String),

    /// 有効期限切れ
    #[error("credential expired")]
    Expired,
}

/// 外部ストア（Message Store / Presence Store）のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("{0} not found")]
    NotFound(String),

    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// MessagePusher のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MessagePushError {
    #[error("Connection '{0}' not found")]
    ConnectionNotFound(String),

    #[error("Failed to push message: {0}")]
    PushFailed(String),
}
