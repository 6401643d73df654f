//! Server execution logic.

use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
};
use tokio::{net::TcpListener, task::JoinHandle};
use tower_http::trace::TraceLayer;

use crate::{infrastructure::event_bus::EventSubscription, usecase::DeliverEventUseCase};

use super::{
    handler::{
        delivery_stats, health_check, list_messages, mark_chat_read, mark_message_read,
        post_message, websocket_handler,
    },
    signal::shutdown_signal,
    state::AppState,
};

pub type ServerError = Box<dyn std::error::Error + Send + Sync>;

/// Real-time delivery server
///
/// # Example
///
/// ```ignore
/// let server = wiring::build_server(&config);
/// server.run("127.0.0.1".to_string(), 8080).await?;
/// ```
pub struct Server {
    app_state: Arc<AppState>,
    /// 起動前に購読しておいたイベントバス（起動直後に発行されたイベントも取りこぼさない）
    event_subscription: EventSubscription,
}

impl Server {
    pub fn new(app_state: Arc<AppState>, event_subscription: EventSubscription) -> Self {
        Self {
            app_state,
            event_subscription,
        }
    }

    /// Build the router with every endpoint
    pub fn router(app_state: Arc<AppState>) -> Router {
        Router::new()
            // WebSocket エンドポイント
            .route("/ws", get(websocket_handler))
            // HTTP エンドポイント
            .route("/api/health", get(health_check))
            .route("/api/messages", post(post_message))
            // `{id}` はチャット ID（GET）またはメッセージ ID（既読）
            .route("/api/messages/{id}", get(list_messages))
            .route("/api/messages/{id}/read", post(mark_message_read))
            .route("/api/messages/chat/{chat_id}/read", post(mark_chat_read))
            .route("/debug/delivery", get(delivery_stats))
            .layer(TraceLayer::new_for_http())
            .with_state(app_state)
    }

    /// Serve on an already bound listener until a shutdown signal arrives
    pub async fn serve(self, listener: TcpListener) -> Result<(), ServerError> {
        let engine = self.app_state.deliver_event_usecase.clone();
        self.app_state.chat_notifier.attach(engine.clone()).await;
        let bus_listener = spawn_bus_listener(self.event_subscription, engine);

        let app = Self::router(self.app_state);

        tracing::info!(
            "Hibiki delivery server listening on {}",
            listener.local_addr()?
        );
        tracing::info!("Press Ctrl+C to shutdown gracefully");

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        bus_listener.abort();
        tracing::info!("Server shutdown complete");
        Ok(())
    }

    /// Bind to `host:port` and serve
    ///
    /// # Errors
    ///
    /// Returns an error if the server fails to bind to the specified address or
    /// if there's an error during server execution.
    pub async fn run(self, host: String, port: u16) -> Result<(), ServerError> {
        let bind_addr = format!("{}:{}", host, port);
        let listener = TcpListener::bind(&bind_addr).await?;
        tracing::info!("Connect to: ws://{}/ws?token=<jwt>", bind_addr);
        self.serve(listener).await
    }
}

/// イベントバスに流れたイベントを配信エンジンに渡すタスク
fn spawn_bus_listener(
    mut subscription: EventSubscription,
    engine: Arc<DeliverEventUseCase>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(event) = subscription.next().await {
            engine.execute(&event).await;
        }
        tracing::info!("Event bus closed, bus listener stopped");
    })
}
