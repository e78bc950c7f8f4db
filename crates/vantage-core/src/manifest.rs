use log::LevelFilter;
use serde::Deserialize;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use validator::{Validate, ValidationError};

use crate::config::ResolverConfig;
use crate::error::ContextError;

/// Default manifest file name looked up by the command line tool.
pub const MANIFEST_FILE: &str = "vantage.toml";

/// Environment variable that points the command line tool at a manifest.
pub const MANIFEST_ENV: &str = "VANTAGE_MANIFEST";

pub struct ManifestLoader {
    manifest: Arc<Manifest>,
}

impl ManifestLoader {
    pub fn load_from_str(contents: &str) -> Result<Self, io::Error> {
        let manifest = parse_manifest(contents)?;
        Ok(Self {
            manifest: Arc::new(manifest),
        })
    }

    pub fn from_path(path: &Path) -> Result<Self, io::Error> {
        let contents = std::fs::read_to_string(path)?;
        let mut manifest = parse_manifest(&contents)?;
        let cwd = std::env::current_dir()?;
        manifest.root = Some(resolve_root_path(path, &cwd));
        Ok(Self {
            manifest: Arc::new(manifest),
        })
    }

    pub fn manifest(&self) -> &Manifest {
        &self.manifest
    }

    pub fn shared(&self) -> Arc<Manifest> {
        Arc::clone(&self.manifest)
    }
}

fn parse_manifest(contents: &str) -> Result<Manifest, io::Error> {
    let manifest: Manifest = toml::from_str(contents)
        .map_err(|err| io::Error::new(io::ErrorKind::InvalidData, err))?;
    manifest
        .validate()
        .map_err(|err| io::Error::new(io::ErrorKind::InvalidData, err.to_string()))?;
    Ok(manifest)
}

fn resolve_root_path(path: &Path, cwd: &Path) -> PathBuf {
    match path.parent() {
        Some(parent) if parent.as_os_str().is_empty() => cwd.to_path_buf(),
        Some(parent) if parent.is_relative() => cwd.join(parent),
        Some(parent) => parent.to_path_buf(),
        None => cwd.to_path_buf(),
    }
}

#[derive(Debug, Default, Deserialize, Validate)]
pub struct Manifest {
    #[serde(default)]
    #[validate(nested)]
    pub app: ManifestApp,
    #[serde(default)]
    #[validate(nested)]
    pub host: Option<ManifestHost>,
    #[serde(default)]
    #[validate(nested)]
    pub server: ManifestServer,
    #[serde(default)]
    pub logging: ManifestLogging,
    #[serde(skip)]
    pub(crate) root: Option<PathBuf>,
}

impl Manifest {
    pub fn root(&self) -> Option<&Path> {
        self.root.as_deref()
    }

    /// Builds the resolver configuration described by `[host]`.
    pub fn resolver_config(&self) -> Result<ResolverConfig, ContextError> {
        let mut config = ResolverConfig::new();
        if let Some(host) = &self.host {
            config.set_override(&host.name, host.required)?;
        }
        Ok(config)
    }

    pub fn logging(&self) -> ResolvedLoggingConfig {
        ResolvedLoggingConfig::from_manifest(&self.logging)
    }
}

#[derive(Debug, Default, Deserialize, Validate)]
pub struct ManifestApp {
    #[serde(default)]
    #[validate(length(min = 1))]
    pub name: Option<String>,
    /// Script path reported to the resolvers when the transport has none,
    /// e.g. `/blog/index.php` for an application mounted below `/blog`.
    #[serde(default)]
    #[validate(length(min = 1))]
    pub script_name: Option<String>,
}

#[derive(Clone, Debug, Deserialize, Validate)]
pub struct ManifestHost {
    #[validate(custom(function = "validate_not_blank"))]
    pub name: String,
    #[serde(default)]
    pub required: bool,
}

#[derive(Debug, Default, Deserialize, Validate)]
pub struct ManifestServer {
    #[serde(default)]
    #[validate(length(min = 1))]
    pub addr: Option<String>,
}

#[derive(Debug, Default, Deserialize, Clone)]
pub struct ManifestLogging {
    #[serde(default)]
    pub level: Option<LogLevel>,
    #[serde(default)]
    pub echo_stdout: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedLoggingConfig {
    pub level: LogLevel,
    pub echo_stdout: bool,
}

impl Default for ResolvedLoggingConfig {
    fn default() -> Self {
        Self {
            level: LogLevel::Info,
            echo_stdout: true,
        }
    }
}

impl ResolvedLoggingConfig {
    fn from_manifest(cfg: &ManifestLogging) -> Self {
        let mut resolved = Self::default();
        if let Some(level) = cfg.level {
            resolved.level = level;
        }
        if let Some(echo_stdout) = cfg.echo_stdout {
            resolved.echo_stdout = echo_stdout;
        }
        resolved
    }
}

fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank"));
    }
    Ok(())
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Default)]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
    Off,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Trace => "trace",
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
            Self::Off => "off",
        }
    }
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Trace => LevelFilter::Trace,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Off => LevelFilter::Off,
        }
    }
}

impl<'de> Deserialize<'de> for LogLevel {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let value = String::deserialize(deserializer)?;
        match value.trim().to_ascii_lowercase().as_str() {
            "trace" => Ok(Self::Trace),
            "debug" => Ok(Self::Debug),
            "info" => Ok(Self::Info),
            "warn" => Ok(Self::Warn),
            "error" => Ok(Self::Error),
            "off" => Ok(Self::Off),
            other => Err(serde::de::Error::custom(format!(
                "logging level must be trace, debug, info, warn, error, or off (got `{}`)",
                other
            ))),
        }
    }
}
