//! 接続から認証済みの主体を引く共通処理

use crate::domain::{ConnectionId, ConnectionRegistry, PrincipalId};

use super::error::DeliveryError;

/// 接続が Active であればその主体を返す
pub(crate) async fn active_principal(
    registry: &dyn ConnectionRegistry,
    connection_id: &ConnectionId,
) -> Result<PrincipalId, DeliveryError> {
    registry
        .lookup_principal(connection_id)
        .await
        .ok_or(DeliveryError::NotAuthenticated)
}
