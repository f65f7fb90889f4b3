//! Server configuration.
//!
//! The port comes from the first command-line argument. An optional second
//! argument names a YAML file that overrides the served root, the index file
//! name and the per-connection timeouts.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

/// Ports at or below this value are rejected.
pub const MIN_PORT_EXCLUSIVE: i64 = 1024;
/// Ports at or above this value are rejected.
pub const MAX_PORT_EXCLUSIVE: i64 = 65535;

pub const DEFAULT_ROOT: &str = ".";
pub const DEFAULT_INDEX: &str = "index.html";

pub const USAGE: &str = "usage: fileserve <port> [config.yaml]";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing port argument")]
    MissingPort,

    #[error("`{0}` is not a valid port number")]
    InvalidPort(String),

    #[error("port {0} is out of range, expected 1024 < port < 65535")]
    PortOutOfRange(i64),

    #[error("unexpected argument `{0}`")]
    UnexpectedArgument(String),

    #[error("failed to read config file {path}")]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}")]
    ParseFile {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
}

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    /// Directory request targets are resolved against.
    pub root: PathBuf,
    /// File served when the requested path cannot be opened.
    pub index: String,
    pub read_timeout: Option<Duration>,
    pub write_timeout: Option<Duration>,
}

/// Optional overrides read from a YAML file.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileOverrides {
    pub root: Option<PathBuf>,
    pub index: Option<String>,
    pub read_timeout_secs: Option<u64>,
    pub write_timeout_secs: Option<u64>,
}

impl Config {
    /// Builds a config with defaults for everything but the port.
    pub fn new(port: u16) -> Self {
        Self {
            port,
            root: PathBuf::from(DEFAULT_ROOT),
            index: DEFAULT_INDEX.to_string(),
            read_timeout: None,
            write_timeout: None,
        }
    }

    /// Builds the config from process arguments, excluding the program name.
    pub fn from_args<I, S>(args: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut args = args.into_iter().map(Into::into);

        let port = parse_port(&args.next().ok_or(ConfigError::MissingPort)?)?;
        let mut config = Config::new(port);

        if let Some(path) = args.next() {
            let overrides = FileOverrides::load(Path::new(&path))?;
            config.apply(overrides);
        }

        if let Some(extra) = args.next() {
            return Err(ConfigError::UnexpectedArgument(extra));
        }

        Ok(config)
    }

    pub fn apply(&mut self, overrides: FileOverrides) {
        if let Some(root) = overrides.root {
            self.root = root;
        }
        if let Some(index) = overrides.index {
            self.index = index;
        }
        if let Some(secs) = overrides.read_timeout_secs {
            self.read_timeout = Some(Duration::from_secs(secs));
        }
        if let Some(secs) = overrides.write_timeout_secs {
            self.write_timeout = Some(Duration::from_secs(secs));
        }
    }

    /// Address the listener binds to. All interfaces, like a plain server socket.
    pub fn listen_addr(&self) -> String {
        format!("0.0.0.0:{}", self.port)
    }
}

impl FileOverrides {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::ReadFile {
            path: path.to_path_buf(),
            source,
        })?;

        Self::from_yaml_str(&raw).map_err(|source| ConfigError::ParseFile {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn from_yaml_str(raw: &str) -> Result<Self, serde_yaml::Error> {
        // An empty document means "no overrides".
        if raw.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(raw)
    }
}

/// Parses a listening port, accepting only 1024 < port < 65535.
pub fn parse_port(raw: &str) -> Result<u16, ConfigError> {
    let value: i64 = raw
        .trim()
        .parse()
        .map_err(|_| ConfigError::InvalidPort(raw.to_string()))?;

    if value <= MIN_PORT_EXCLUSIVE || value >= MAX_PORT_EXCLUSIVE {
        return Err(ConfigError::PortOutOfRange(value));
    }

    u16::try_from(value).map_err(|_| ConfigError::PortOutOfRange(value))
}
