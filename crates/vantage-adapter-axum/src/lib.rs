//! Axum adapter: resolves a request context for every inbound Axum/Hyper request.

#[cfg(feature = "axum")]
mod context;
#[cfg(feature = "axum")]
mod dev_server;
#[cfg(feature = "axum")]
mod extract;
#[cfg(feature = "axum")]
mod request;
#[cfg(feature = "axum")]
mod response;
#[cfg(feature = "axum")]
mod service;

#[cfg(feature = "axum")]
pub use context::AxumRequestContext;
#[cfg(feature = "axum")]
pub use dev_server::{init_logger, inspection_router, AxumDevServer, AxumDevServerConfig};
#[cfg(feature = "axum")]
pub use extract::Resolved;
#[cfg(feature = "axum")]
pub use request::{signals_from_parts, signals_from_request, SignalSource};
#[cfg(feature = "axum")]
pub use response::ContextRejection;
#[cfg(feature = "axum")]
pub use service::{ContextLayer, ContextService};
