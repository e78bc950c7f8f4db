use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "vantage", about = "Vantage CLI")]
pub struct Args {
    /// Manifest to load (default: $VANTAGE_MANIFEST, then ./vantage.toml if present)
    #[arg(long, global = true)]
    pub manifest: Option<PathBuf>,
    #[command(subcommand)]
    pub cmd: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Resolve the request context from the process environment and print it as JSON
    Inspect(ResolveArgs),
    /// Print the absolute URL for a route
    Url {
        route: String,
        /// Treat the route as a dotted path (`assets.css` becomes `assets/css`)
        #[arg(long)]
        dotted: bool,
        #[command(flatten)]
        resolve: ResolveArgs,
    },
    /// Run the context inspection server
    Serve {
        /// Listen address (overrides `[server] addr`)
        #[arg(long)]
        addr: Option<String>,
    },
}

#[derive(clap::Args, Debug, Default)]
pub struct ResolveArgs {
    /// Host override (overrides `[host] name`)
    #[arg(long = "host")]
    pub host: Option<String>,
    /// Make the host override win over request headers
    #[arg(long, requires = "host")]
    pub required: bool,
    /// Extra signal as KEY=VALUE, applied on top of the environment
    #[arg(long = "signal", value_parser = parse_signal)]
    pub signals: Vec<(String, String)>,
    /// Ignore the process environment and use only --signal values
    #[arg(long)]
    pub no_env: bool,
}

fn parse_signal(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() => {
            Ok((key.trim().to_string(), value.to_string()))
        }
        _ => Err(format!("expected KEY=VALUE, got `{raw}`")),
    }
}
