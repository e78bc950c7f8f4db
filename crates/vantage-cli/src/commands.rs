use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use vantage_adapter_axum::{AxumDevServer, AxumDevServerConfig};
use vantage_core::manifest::{Manifest, ManifestLoader, MANIFEST_ENV, MANIFEST_FILE};
use vantage_core::{Resolver, ResolverConfig, Signals};

use crate::args::ResolveArgs;

/// Loads the manifest named on the command line, by `VANTAGE_MANIFEST`, or
/// `./vantage.toml` when present. Without any of them an empty manifest is used.
pub fn load_manifest(explicit: Option<&Path>) -> Result<ManifestLoader> {
    let path = match explicit {
        Some(path) => Some(path.to_path_buf()),
        None => std::env::var_os(MANIFEST_ENV)
            .map(PathBuf::from)
            .or_else(|| {
                let local = PathBuf::from(MANIFEST_FILE);
                local.is_file().then_some(local)
            }),
    };

    match path {
        Some(path) => {
            log::debug!("loading manifest from {}", path.display());
            ManifestLoader::from_path(&path)
                .with_context(|| format!("failed to load manifest {}", path.display()))
        }
        None => ManifestLoader::load_from_str("").context("failed to build default manifest"),
    }
}

pub fn resolver_config(manifest: &Manifest, args: &ResolveArgs) -> Result<ResolverConfig> {
    let mut config = manifest
        .resolver_config()
        .context("invalid [host] section in manifest")?;
    if let Some(host) = &args.host {
        config
            .set_override(host, args.required)
            .context("invalid --host value")?;
    }
    Ok(config)
}

pub fn collect_signals(manifest: &Manifest, args: &ResolveArgs) -> Signals {
    let mut signals = if args.no_env {
        Signals::new()
    } else {
        Signals::from_env()
    };
    if let Some(script_name) = &manifest.app.script_name {
        if !signals.contains(vantage_core::signals::keys::SCRIPT_NAME) {
            signals.insert(vantage_core::signals::keys::SCRIPT_NAME, script_name.as_str());
        }
    }
    for (key, value) in &args.signals {
        signals.insert(key.as_str(), value.as_str());
    }
    signals
}

pub fn inspect(manifest: &Manifest, args: &ResolveArgs) -> Result<String> {
    let config = resolver_config(manifest, args)?;
    let signals = collect_signals(manifest, args);
    let context = Resolver::new(&signals, &config)
        .capture_current_context()
        .context("failed to resolve request context")?;
    serde_json::to_string_pretty(&context).context("failed to serialise request context")
}

pub fn url(manifest: &Manifest, route: &str, dotted: bool, args: &ResolveArgs) -> Result<String> {
    let config = resolver_config(manifest, args)?;
    let signals = collect_signals(manifest, args);
    let resolver = Resolver::new(&signals, &config);
    let url = if dotted {
        resolver.subdir_url(route)
    } else {
        resolver.build_absolute_url(route)
    };
    url.context("failed to build url")
}

pub fn serve(manifest: &Manifest, addr: Option<&str>) -> Result<()> {
    let resolver = manifest
        .resolver_config()
        .context("invalid [host] section in manifest")?;
    if !resolver.clone().install() {
        log::warn!("resolver configuration was already installed");
    }

    let mut config = AxumDevServerConfig::default();
    if let Some(addr) = addr.or(manifest.server.addr.as_deref()) {
        config.addr = addr
            .parse()
            .with_context(|| format!("invalid server address `{addr}`"))?;
    }

    let mut server = AxumDevServer::with_config(resolver, config);
    if let Some(script_name) = &manifest.app.script_name {
        server = server.with_script_name(script_name.as_str());
    }
    server.run()
}
