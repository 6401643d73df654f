//! HS256 JWT による資格情報の検証
//!
//! `sub` クレームを主体 ID として扱います。`exp` は必須です。

use async_trait::async_trait;
use jsonwebtoken::{Algorithm, DecodingKey, Validation, errors::ErrorKind};
use serde::Deserialize;

use crate::domain::{AuthError, CredentialVerifier, PrincipalId};

#[derive(Debug, Deserialize)]
struct Claims {
    sub: String,
}

/// 共有鍵で署名された JWT を検証する CredentialVerifier 実装
pub struct JwtCredentialVerifier {
    key: DecodingKey,
    validation: Validation,
}

impl JwtCredentialVerifier {
    pub fn new(secret: &[u8]) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_required_spec_claims(&["exp", "sub"]);
        Self {
            key: DecodingKey::from_secret(secret),
            validation,
        }
    }
}

#[async_trait]
impl CredentialVerifier for JwtCredentialVerifier {
    async fn verify(&self, token: &str) -> Result<PrincipalId, AuthError> {
        let data = jsonwebtoken::decode::<Claims>(token, &self.key, &self.validation)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => AuthError::Expired,
                _ => AuthError::InvalidCredential(e.to_string()),
            })?;

        PrincipalId::new(data.claims.sub)
            .map_err(|e| AuthError::InvalidCredential(format!("bad subject: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::{EncodingKey, Header};
    use serde::Serialize;

    const SECRET: &[u8] = b"test-secret";

    #[derive(Serialize)]
    struct TestClaims<'a> {
        sub: &'a str,
        exp: i64,
    }

    fn token(secret: &[u8], sub: &str, exp_offset_secs: i64) -> String {
        let exp = chrono::Utc::now().timestamp() + exp_offset_secs;
        jsonwebtoken::encode(
            &Header::new(Algorithm::HS256),
            &TestClaims { sub, exp },
            &EncodingKey::from_secret(secret),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_valid_token_resolves_principal() {
        // テスト項目: 正しい署名のトークンから主体が得られる
        // given (前提条件):
        let verifier = JwtCredentialVerifier::new(SECRET);

        // when (操作):
        let result = verifier.verify(&token(SECRET, "alice", 3600)).await;

        // then (期待する結果):
        assert_eq!(result, Ok(PrincipalId::new("alice".to_string()).unwrap()));
    }

    #[tokio::test]
    async fn test_wrong_signature_is_invalid() {
        // テスト項目: 別の鍵で署名されたトークンは拒否される
        // given (前提条件):
        let verifier = JwtCredentialVerifier::new(SECRET);

        // when (操作):
        let result = verifier.verify(&token(b"other-secret", "alice", 3600)).await;

        // then (期待する結果):
        assert!(matches!(result, Err(AuthError::InvalidCredential(_))));
    }

    #[tokio::test]
    async fn test_expired_token_is_reported_as_expired() {
        // テスト項目: 期限切れのトークンは Expired として報告される
        // given (前提条件):
        let verifier = JwtCredentialVerifier::new(SECRET);

        // when (操作):
        let result = verifier.verify(&token(SECRET, "alice", -3600)).await;

        // then (期待する結果):
        assert_eq!(result, Err(AuthError::Expired));
    }

    #[tokio::test]
    async fn test_malformed_token_is_invalid() {
        // テスト項目: JWT として解釈できない文字列は拒否される
        // given (前提条件):
        let verifier = JwtCredentialVerifier::new(SECRET);

        // when (操作):
        let result = verifier.verify("not-a-jwt").await;

        // then (期待する結果):
        assert!(matches!(result, Err(AuthError::InvalidCredential(_))));
    }

    #[tokio::test]
    async fn test_blank_subject_is_invalid() {
        // テスト項目: sub が空のトークンは拒否される
        // given (前提条件):
        let verifier = JwtCredentialVerifier::new(SECRET);

        // when (操作):
        let result = verifier.verify(&token(SECRET, " ", 3600)).await;

        // then (期待する結果):
        assert!(matches!(result, Err(AuthError::InvalidCredential(_))));
    }
}
