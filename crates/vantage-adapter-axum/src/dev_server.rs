use std::net::{SocketAddr, TcpListener as StdTcpListener};

use anyhow::Context;
use axum::http::header::CONTENT_TYPE;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Router;
use log::LevelFilter;
use simple_logger::SimpleLogger;
use tokio::runtime::Builder as RuntimeBuilder;
use tokio::signal;
use vantage_core::manifest::Manifest;
use vantage_core::ResolverConfig;

use crate::extract::Resolved;
use crate::request::SignalSource;
use crate::service::ContextLayer;

/// Configuration used when running the context inspection server.
#[derive(Clone)]
pub struct AxumDevServerConfig {
    pub addr: SocketAddr,
    pub enable_ctrl_c: bool,
}

impl Default for AxumDevServerConfig {
    fn default() -> Self {
        Self {
            addr: SocketAddr::from(([127, 0, 0, 1], 8787)),
            enable_ctrl_c: true,
        }
    }
}

/// Blocking server that answers every request with its resolved context as JSON.
pub struct AxumDevServer {
    resolver: ResolverConfig,
    source: SignalSource,
    config: AxumDevServerConfig,
}

impl AxumDevServer {
    pub fn new(resolver: ResolverConfig) -> Self {
        Self::with_config(resolver, AxumDevServerConfig::default())
    }

    pub fn with_config(resolver: ResolverConfig, config: AxumDevServerConfig) -> Self {
        Self {
            resolver,
            source: SignalSource::default(),
            config,
        }
    }

    #[must_use]
    pub fn with_script_name(mut self, script_name: impl Into<String>) -> Self {
        self.source.script_name = Some(script_name.into());
        self
    }

    pub fn run(self) -> anyhow::Result<()> {
        let runtime = RuntimeBuilder::new_multi_thread()
            .enable_all()
            .build()
            .context("failed to build tokio runtime")?;

        runtime.block_on(async move { self.run_async().await })
    }

    pub async fn run_async(self) -> anyhow::Result<()> {
        let listener = StdTcpListener::bind(self.config.addr)
            .with_context(|| format!("failed to bind dev server to {}", self.config.addr))?;
        listener
            .set_nonblocking(true)
            .context("failed to set listener to non-blocking")?;

        let listener = tokio::net::TcpListener::from_std(listener)
            .context("failed to adopt std listener into tokio")?;

        self.serve_with_listener(listener).await
    }

    pub async fn serve_with_listener(self, listener: tokio::net::TcpListener) -> anyhow::Result<()> {
        let AxumDevServer {
            resolver,
            mut source,
            config,
        } = self;

        let local_addr = listener
            .local_addr()
            .context("failed to read listener address")?;
        source.local_addr = Some(local_addr);
        log::info!("vantage inspection server listening on http://{}", local_addr);

        let router = inspection_router(ContextLayer::new(resolver).with_source(source));
        let make_service = router.into_make_service_with_connect_info::<SocketAddr>();

        let server = axum::serve(listener, make_service);
        if config.enable_ctrl_c {
            let shutdown = async {
                let _ = signal::ctrl_c().await;
            };
            server
                .with_graceful_shutdown(shutdown)
                .await
                .context("axum server error")?;
        } else {
            server.await.context("axum server error")?;
        }

        Ok(())
    }
}

/// Router that echoes the resolved context of every request.
pub fn inspection_router(layer: ContextLayer) -> Router {
    Router::new().fallback(inspect).layer(layer)
}

async fn inspect(Resolved(context): Resolved) -> Response {
    match context.to_json() {
        Ok(body) => ([(CONTENT_TYPE, "application/json")], body).into_response(),
        Err(err) => {
            log::error!("failed to serialise request context: {}", err);
            (StatusCode::INTERNAL_SERVER_ERROR, "failed to serialise request context").into_response()
        }
    }
}

/// Initialise `simple_logger` with the manifest's `[logging]` section.
pub fn init_logger(manifest: &Manifest) {
    let logging = manifest.logging();
    let level: LevelFilter = logging.level.into();
    let level = if logging.echo_stdout {
        level
    } else {
        LevelFilter::Off
    };

    SimpleLogger::new().with_level(level).init().ok();
}
