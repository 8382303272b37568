//! Main server implementation
//!
//! `MixerServer` wires the injected mixer control and media library into the
//! axum router and owns the listener lifecycle.

use axum::Router;
use axum::routing::{get, post};
use std::future::Future;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use shared::{ProcessId, process_info};

use crate::error::{MixerError, MixerResult};
use crate::traits::{MediaLibrary, MixerControl};
use crate::web::handlers::{AppContext, add_song, get_songs, get_status};

/// HTTP server with dependency injection
pub struct MixerServer<M, L> {
    context: AppContext<M, L>,
    static_dir: Option<PathBuf>,
}

impl<M, L> MixerServer<M, L>
where
    M: MixerControl + 'static,
    L: MediaLibrary + 'static,
{
    pub fn new(mixer: Arc<M>, library: Arc<L>) -> Self {
        Self {
            context: AppContext::new(mixer, library),
            static_dir: None,
        }
    }

    /// Serve `/` and unmatched paths from a directory (fluent API)
    pub fn with_static_dir(mut self, static_dir: Option<PathBuf>) -> Self {
        self.static_dir = static_dir;
        self
    }

    /// Build the axum router with all routes
    pub fn build_router(&self) -> Router {
        let api = Router::new()
            .route("/v1/mixer/getSongs", get(get_songs::<M, L>))
            .route("/v1/mixer/addSong", post(add_song::<M, L>))
            .route("/v1/mixer/status", get(get_status::<M, L>))
            .with_state(self.context.clone());

        let router = match &self.static_dir {
            Some(dir) => api.fallback_service(ServeDir::new(dir)),
            None => api,
        };

        router.layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
    }

    /// Bind and serve until `shutdown` resolves
    pub async fn run<F>(&self, addr: SocketAddr, shutdown: F) -> MixerResult<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let listener = TcpListener::bind(addr)
            .await
            .map_err(|e| MixerError::ServerStartup(format!("Failed to bind to {addr}: {e}")))?;

        self.serve(listener, shutdown).await
    }

    /// Serve on an already bound listener until `shutdown` resolves
    pub async fn serve<F>(&self, listener: TcpListener, shutdown: F) -> MixerResult<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let local_addr = listener
            .local_addr()
            .map_err(|e| MixerError::ServerStartup(e.to_string()))?;
        process_info!(ProcessId::current(), "🌐 Mixing service listening on http://{}", local_addr);

        axum::serve(listener, self.build_router())
            .with_graceful_shutdown(shutdown)
            .await
            .map_err(|e| MixerError::ServerStartup(format!("Server error: {e}")))
    }
}
