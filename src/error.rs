//! Crate-wide error types for the few fallible boundary operations.
//!
//! Hot-path chunk and mesh code never returns `Result`: out-of-range reads
//! resolve to AIR, unknown block types resolve to AIR, and asset failures
//! are logged and skipped rather than propagated (see SPEC_FULL.md §7).
//! `EngineError` exists only for the startup/asset-loading boundary.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("unknown block display id: {0}")]
    UnknownDisplayId(String),
    #[error("block model error: {0}")]
    Model(#[from] ModelError),
}

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("model asset not found: {0}")]
    Missing(PathBuf),
    #[error("model asset malformed ({path}): {source}")]
    Malformed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("texture reference {0:?} does not resolve to a concrete path")]
    UnresolvedTexture(String),
    #[error("model parent cycle detected at {0}")]
    ParentCycle(String),
}

#[derive(Debug, Error)]
pub enum EngineError {
    #[error(transparent)]
    Registry(#[from] RegistryError),
    #[error(transparent)]
    Model(#[from] ModelError),
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {0:?}: {1}")]
    Io(PathBuf, #[source] std::io::Error),
    #[error("failed to parse config file {0:?}: {1}")]
    Parse(PathBuf, #[source] toml::de::Error),
}
