//! Request context resolution: who called, over which scheme, host and port,
//! and which logical route they asked for.

pub mod config;
pub mod context;
pub mod error;
pub mod host;
pub mod ip;
pub mod manifest;
pub mod port;
pub mod probe;
pub mod resolver;
pub mod route;
pub mod scheme;
pub mod signals;
pub mod time;
pub mod url;

pub use config::ResolverConfig;
pub use context::RequestContext;
pub use error::ContextError;
pub use host::HostOverride;
pub use resolver::Resolver;
pub use scheme::Scheme;
pub use signals::Signals;
pub use url::UrlBuilder;
