//! Server configuration.
//!
//! 値はバイナリのコマンドライン引数（環境変数フォールバック付き）から組み立てられます。

use crate::{infrastructure::event_bus::DEFAULT_EVENT_BUS_CAPACITY, usecase::DEFAULT_HISTORY_LIMIT};

pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 8080;

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// HS256 の署名鍵
    pub jwt_secret: String,
    /// join 時に送る履歴の最大件数
    pub history_limit: u32,
    pub event_bus_capacity: usize,
}

impl ServerConfig {
    /// 署名鍵以外をデフォルト値で埋める
    pub fn new(jwt_secret: impl Into<String>) -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            jwt_secret: jwt_secret.into(),
            history_limit: DEFAULT_HISTORY_LIMIT,
            event_bus_capacity: DEFAULT_EVENT_BUS_CAPACITY,
        }
    }
}
