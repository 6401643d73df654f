//! Data Transfer Objects (DTOs)
//!
//! DTOs are organized by protocol:
//! - `websocket`: クライアントから届くアクションフレーム
//! - `http`: REST API のリクエスト / レスポンス
//! - `conversion`: DTO → ドメインモデルの変換

pub mod conversion;
pub mod http;
pub mod websocket;
