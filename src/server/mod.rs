//! Media server lifecycle
//!
//! [`Server`] owns the catalog, binds the listener and runs the accept loop
//! on its own task. A server goes `Created → Started → Stopped` and cannot
//! be restarted.

pub mod gate;
pub mod listener;
pub mod shutdown;

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tokio_util::task::TaskTracker;

use crate::config::Config;
use crate::http::connection::ConnectionContext;
use crate::http::streamer::RangeStreamer;
use crate::media::{CatalogError, ListingRenderer, MediaCatalog, TemplateRenderer};
use gate::ConnectionGate;
use shutdown::Shutdown;

/// Time given to in-flight transfers to notice the cleared running flag
/// before their sockets are torn down.
pub const SHUTDOWN_GRACE: Duration = Duration::from_millis(100);

#[derive(Debug, Error)]
pub enum ServerError {
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error("failed to load listing template {path}: {source}")]
    Template {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to bind to {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: std::io::Error,
    },

    #[error("server already started")]
    AlreadyStarted,

    #[error("server has been stopped")]
    Stopped,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServerState {
    Created,
    Started,
    Stopped,
}

pub struct Server {
    config: Config,
    catalog: Arc<MediaCatalog>,
    renderer: Arc<dyn ListingRenderer>,
    gate: ConnectionGate,
    shutdown: Shutdown,
    tracker: TaskTracker,
    state: ServerState,
    accept_task: Option<JoinHandle<()>>,
    local_addr: Option<SocketAddr>,
}

impl Server {
    /// Builds the catalog and loads the listing template.
    ///
    /// Uses the template file from the config if one is set, otherwise the
    /// built-in page.
    pub fn new(config: Config) -> Result<Self, ServerError> {
        let renderer: Arc<dyn ListingRenderer> = match &config.template {
            Some(path) => Arc::new(TemplateRenderer::from_file(path).map_err(|source| {
                ServerError::Template {
                    path: path.clone(),
                    source,
                }
            })?),
            None => Arc::new(TemplateRenderer::default()),
        };
        Self::with_renderer(config, renderer)
    }

    /// Like [`new`](Self::new) with a caller-supplied listing renderer.
    pub fn with_renderer(
        config: Config,
        renderer: Arc<dyn ListingRenderer>,
    ) -> Result<Self, ServerError> {
        let catalog = MediaCatalog::build(&config.media_dir)?;

        Ok(Self {
            gate: ConnectionGate::new(config.max_connections),
            config,
            catalog: Arc::new(catalog),
            renderer,
            shutdown: Shutdown::new(),
            tracker: TaskTracker::new(),
            state: ServerState::Created,
            accept_task: None,
            local_addr: None,
        })
    }

    /// Binds the listener and launches the accept loop, returning as soon
    /// as the loop is running.
    ///
    /// # Errors
    ///
    /// [`ServerError::Bind`] if the address cannot be bound, or a state
    /// error if the server was already started or stopped.
    pub async fn start(&mut self) -> Result<SocketAddr, ServerError> {
        match self.state {
            ServerState::Created => {}
            ServerState::Started => return Err(ServerError::AlreadyStarted),
            ServerState::Stopped => return Err(ServerError::Stopped),
        }

        let addr = self.config.listen_addr();
        let listener = TcpListener::bind(addr)
            .await
            .map_err(|source| ServerError::Bind { addr, source })?;
        let local_addr = listener
            .local_addr()
            .map_err(|source| ServerError::Bind { addr, source })?;

        let ctx = Arc::new(ConnectionContext {
            catalog: Arc::clone(&self.catalog),
            renderer: Arc::clone(&self.renderer),
            streamer: RangeStreamer::new(self.shutdown.clone(), self.config.server_name.clone()),
            server_name: self.config.server_name.clone(),
        });

        self.accept_task = Some(tokio::spawn(listener::run(
            listener,
            self.gate.clone(),
            ctx,
            self.shutdown.clone(),
            self.tracker.clone(),
        )));
        self.local_addr = Some(local_addr);
        self.state = ServerState::Started;

        if self.catalog.is_empty() {
            tracing::warn!(root = %self.catalog.root().display(), "No media files found");
        }
        tracing::info!(
            address = %local_addr,
            media = self.catalog.len(),
            max_connections = self.gate.capacity(),
            "Server started"
        );
        Ok(local_addr)
    }

    /// Stops the server.
    ///
    /// Clears the running flag, waits [`SHUTDOWN_GRACE`] for transfers to
    /// notice, then cancels the accept loop and every connection still open.
    /// Returns once all connection tasks have finished, so no socket or file
    /// handle outlives this call. Stopping twice is a no-op.
    pub async fn stop(&mut self) {
        if self.state == ServerState::Stopped {
            return;
        }
        let was_started = self.state == ServerState::Started;
        self.state = ServerState::Stopped;

        self.shutdown.begin();
        if was_started {
            tokio::time::sleep(SHUTDOWN_GRACE).await;
        }
        self.shutdown.force();
        self.gate.close();

        if let Some(task) = self.accept_task.take() {
            if let Err(e) = task.await {
                tracing::error!(error = %e, "Accept loop terminated abnormally");
            }
        }

        self.tracker.close();
        self.tracker.wait().await;

        tracing::info!("Server stopped");
    }

    pub fn state(&self) -> ServerState {
        self.state
    }

    pub fn catalog(&self) -> &MediaCatalog {
        &self.catalog
    }

    /// Address actually bound, once started.
    pub fn local_addr(&self) -> Option<SocketAddr> {
        self.local_addr
    }

    /// Connections currently holding a gate permit.
    pub fn active_connections(&self) -> usize {
        self.gate.active()
    }
}
