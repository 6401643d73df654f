//! Infrastructure 層
//!
//! ドメイン層が定義する trait の具体的な実装と、外部との入出力形式（DTO）を提供します。

pub mod auth;
pub mod connection;
pub mod dto;
pub mod event_bus;
pub mod message_pusher;
pub mod repository;
