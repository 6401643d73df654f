//! Request handlers.

mod http;
mod websocket;

pub use http::{
    delivery_stats, health_check, list_messages, mark_chat_read, mark_message_read, post_message,
};
pub use websocket::websocket_handler;
