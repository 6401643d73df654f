//! 資格情報検証の trait 定義（Auth Gate から利用）

use async_trait::async_trait;

use super::{AuthError, PrincipalId};

/// Bearer トークンを検証し、発行先の主体を返す
///
/// 接続試行ごとに 1 回だけ呼ばれる。実装側でリトライしないこと。
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CredentialVerifier: Send + Sync {
    async fn verify(&self, token: &str) -> Result<PrincipalId, AuthError>;
}
