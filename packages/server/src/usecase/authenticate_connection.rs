//! UseCase: 接続の認証（Auth Gate）
//!
//! ハンドシェイクで提示された資格情報を検証し、接続を主体に結び付けます。
//! 資格情報はクエリパラメータ `token` を優先し、無ければ `Authorization` ヘッダーを使います。

use std::sync::Arc;

use crate::domain::{AuthError, CredentialVerifier, PrincipalId};

const BEARER_PREFIX: &str = "Bearer ";

/// ハンドシェイクの入力から資格情報を取り出す
pub fn credential_from_handshake(
    query_token: Option<&str>,
    authorization: Option<&str>,
) -> Option<String> {
    let query_token = query_token.map(str::trim).filter(|t| !t.is_empty());
    if let Some(token) = query_token {
        return Some(token.to_string());
    }

    authorization
        .map(|value| value.strip_prefix(BEARER_PREFIX).unwrap_or(value).trim())
        .filter(|t| !t.is_empty())
        .map(str::to_string)
}

/// 接続認証のユースケース
pub struct AuthenticateConnectionUseCase {
    verifier: Arc<dyn CredentialVerifier>,
}

impl AuthenticateConnectionUseCase {
    pub fn new(verifier: Arc<dyn CredentialVerifier>) -> Self {
        Self { verifier }
    }

    /// 資格情報を検証し、認証された主体を返す
    pub async fn execute(&self, credential: Option<String>) -> Result<PrincipalId, AuthError> {
        let Some(credential) = credential else {
            tracing::info!("Handshake rejected: no credential presented");
            return Err(AuthError::MissingCredential);
        };

        match self.verifier.verify(&credential).await {
            Ok(principal_id) => {
                tracing::debug!("Handshake authenticated as '{}'", principal_id);
                Ok(principal_id)
            }
            Err(e) => {
                tracing::info!("Handshake rejected: {}", e);
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::MockCredentialVerifier;

    #[test]
    fn test_query_token_takes_precedence_over_header() {
        // テスト項目: クエリパラメータの token がヘッダーより優先される
        // given (前提条件):
        let query = Some("from-query");
        let header = Some("Bearer from-header");

        // when (操作):
        let credential = credential_from_handshake(query, header);

        // then (期待する結果):
        assert_eq!(credential.as_deref(), Some("from-query"));
    }

    #[test]
    fn test_bearer_prefix_is_stripped_from_header() {
        // テスト項目: Authorization ヘッダーの Bearer プレフィックスが取り除かれる
        // given (前提条件):
        let header = Some("Bearer abc.def.ghi");

        // when (操作):
        let credential = credential_from_handshake(None, header);

        // then (期待する結果):
        assert_eq!(credential.as_deref(), Some("abc.def.ghi"));
    }

    #[test]
    fn test_blank_inputs_yield_no_credential() {
        // テスト項目: 空の token や空のヘッダーは資格情報なしとして扱われる
        // given (前提条件):

        // when (操作):
        let credential = credential_from_handshake(Some("  "), Some("Bearer "));

        // then (期待する結果):
        assert!(credential.is_none());
    }

    #[tokio::test]
    async fn test_missing_credential_is_rejected_without_verifying() {
        // テスト項目: 資格情報が無い場合は検証せずに拒否される
        // given (前提条件):
        let mut verifier = MockCredentialVerifier::new();
        verifier.expect_verify().never();
        let usecase = AuthenticateConnectionUseCase::new(Arc::new(verifier));

        // when (操作):
        let result = usecase.execute(None).await;

        // then (期待する結果):
        assert_eq!(result, Err(AuthError::MissingCredential));
    }

    #[tokio::test]
    async fn test_valid_credential_yields_principal() {
        // テスト項目: 検証に成功すると主体が返される
        // given (前提条件):
        let mut verifier = MockCredentialVerifier::new();
        verifier
            .expect_verify()
            .withf(|token| token.to_string() == "good")
            .times(1)
            .returning(|_| Ok(PrincipalId::new("alice".to_string()).unwrap()));
        let usecase = AuthenticateConnectionUseCase::new(Arc::new(verifier));

        // when (操作):
        let result = usecase.execute(Some("good".to_string())).await;

        // then (期待する結果):
        assert_eq!(result, Ok(PrincipalId::new("alice".to_string()).unwrap()));
    }

    #[tokio::test]
    async fn test_verifier_error_is_propagated() {
        // テスト項目: 検証失敗のエラーがそのまま返される
        // given (前提条件):
        let mut verifier = MockCredentialVerifier::new();
        verifier
            .expect_verify()
            .returning(|_| Err(AuthError::Expired));
        let usecase = AuthenticateConnectionUseCase::new(Arc::new(verifier));

        // when (操作):
        let result = usecase.execute(Some("stale".to_string())).await;

        // then (期待する結果):
        assert_eq!(result, Err(AuthError::Expired));
    }
}
