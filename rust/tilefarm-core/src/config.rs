// rust/tilefarm-core/src/config.rs

//! Configuration management for the tile coordinator.
//!
//! This module provides configuration parsing from TOML files, environment
//! variable overrides, and validation of configuration values.

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::str::FromStr;

use crate::error::{Result, TilefarmError};
use crate::tiles::TileGrid;

/// Tile edge length used when none is configured.
pub const DEFAULT_TILE_SIZE: u32 = 32;

// Top-level coordinator configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CoordinatorConfig {
    /// Fixed seed for the tile shuffle. A fresh random order is used when absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
    pub server: ServerConfig,
    pub image: ImageConfig,
    pub cluster: ClusterConfig,
    pub status: StatusConfig,
}

// Listener options.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    // Address to bind to.
    pub address: String,
    // Port to listen on.
    pub port: u16,
}

/// Target image geometry.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ImageConfig {
    /// Image width in pixels.
    pub width: u32,
    /// Image height in pixels.
    pub height: u32,
    /// Edge length of a square tile in pixels.
    pub tile_size: u32,
}

/// Declared cluster shape. Tiles are withheld until every thread has said hello.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ClusterConfig {
    pub machines: u32,
    pub threads_per_machine: u32,
}

// Status reporter options.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StatusConfig {
    // Interval between progress lines in milliseconds.
    pub interval_ms: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            address: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

impl Default for ImageConfig {
    fn default() -> Self {
        Self {
            width: 0,
            height: 0,
            tile_size: DEFAULT_TILE_SIZE,
        }
    }
}

impl Default for StatusConfig {
    fn default() -> Self {
        Self { interval_ms: 2000 }
    }
}

impl ClusterConfig {
    /// Number of worker threads expected to register across the cluster.
    pub fn expected_workers(&self) -> u64 {
        u64::from(self.machines) * u64::from(self.threads_per_machine)
    }
}

impl FromStr for CoordinatorConfig {
    type Err = TilefarmError;

    /// Parse configuration from a TOML string.
    fn from_str(s: &str) -> Result<Self> {
        toml::from_str(s)
            .map_err(|e| TilefarmError::config_with_source("failed to parse TOML config", e))
    }
}

impl CoordinatorConfig {
    // Load configuration from a TOML file.
    //
    // # Errors
    //
    // Returns an error if the file cannot be read or parsed. Validation is
    // left to the caller so that command-line values can be layered on top.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| TilefarmError::io(path, "failed to read config file", e))?;
        content.parse()
    }

    // Apply environment variable overrides.
    //
    // Environment variables are prefixed with `TILEFARM_` and use underscores
    // to separate nested fields, e.g. `TILEFARM_IMAGE_TILE_SIZE` overrides
    // `image.tile_size`. Values that fail to parse are ignored.
    #[must_use]
    pub fn with_env_overrides(mut self) -> Self {
        // Server overrides
        if let Ok(val) = std::env::var("TILEFARM_SERVER_ADDRESS") {
            self.server.address = val;
        }
        if let Ok(val) = std::env::var("TILEFARM_SERVER_PORT") {
            if let Ok(v) = val.parse() {
                self.server.port = v;
            }
        }

        // Image overrides
        if let Ok(val) = std::env::var("TILEFARM_IMAGE_WIDTH") {
            if let Ok(v) = val.parse() {
                self.image.width = v;
            }
        }
        if let Ok(val) = std::env::var("TILEFARM_IMAGE_HEIGHT") {
            if let Ok(v) = val.parse() {
                self.image.height = v;
            }
        }
        if let Ok(val) = std::env::var("TILEFARM_IMAGE_TILE_SIZE") {
            if let Ok(v) = val.parse() {
                self.image.tile_size = v;
            }
        }

        // Cluster overrides
        if let Ok(val) = std::env::var("TILEFARM_CLUSTER_MACHINES") {
            if let Ok(v) = val.parse() {
                self.cluster.machines = v;
            }
        }
        if let Ok(val) = std::env::var("TILEFARM_CLUSTER_THREADS_PER_MACHINE") {
            if let Ok(v) = val.parse() {
                self.cluster.threads_per_machine = v;
            }
        }

        if let Ok(val) = std::env::var("TILEFARM_STATUS_INTERVAL_MS") {
            if let Ok(v) = val.parse() {
                self.status.interval_ms = v;
            }
        }
        if let Ok(val) = std::env::var("TILEFARM_SEED") {
            if let Ok(v) = val.parse() {
                self.seed = Some(v);
            }
        }

        self
    }

    /// Tile grid described by the image section.
    pub fn grid(&self) -> TileGrid {
        TileGrid::new(self.image.width, self.image.height, self.image.tile_size)
    }

    // Validate all configuration values.
    //
    // # Errors
    //
    // Returns an error if any configuration value is invalid.
    pub fn validate(&self) -> Result<()> {
        if self.server.address.is_empty() {
            return Err(TilefarmError::config("server.address must not be empty"));
        }

        if self.image.tile_size == 0 {
            return Err(TilefarmError::config(
                "image.tile_size must be greater than 0",
            ));
        }
        if self.image.width == 0 {
            return Err(TilefarmError::config("image.width must be greater than 0"));
        }
        if self.image.height == 0 {
            return Err(TilefarmError::config("image.height must be greater than 0"));
        }

        let (_, _, total_tiles) = self.grid().grid_dimensions();
        if total_tiles > u64::from(u32::MAX) {
            return Err(TilefarmError::config(format!(
                "image of {}x{} with tile_size {} has too many tiles",
                self.image.width, self.image.height, self.image.tile_size
            )));
        }

        if self.status.interval_ms == 0 {
            return Err(TilefarmError::config(
                "status.interval_ms must be greater than 0",
            ));
        }

        Ok(())
    }
}
