//! Demo configuration, read from a RON file.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use reflux_logging::reflux_info;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::source::ScriptedSource;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse config {path:?}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: ron::error::SpannedError,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DemoConfig {
    /// Simulated latency of every add, in milliseconds.
    pub load_delay_ms: u64,
    /// Fail every n-th add. `None` never fails.
    pub fail_every: Option<u32>,
    /// Text placed before the item number.
    pub item_prefix: String,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            load_delay_ms: 250,
            fail_every: None,
            item_prefix: "Item".to_string(),
        }
    }
}

impl DemoConfig {
    pub fn load_delay(&self) -> Duration {
        Duration::from_millis(self.load_delay_ms)
    }

    pub fn source(&self) -> ScriptedSource {
        let source = ScriptedSource::new(self.item_prefix.clone());
        match self.fail_every {
            Some(every) => source.failing_every(every),
            None => source,
        }
    }
}

/// Reads the config at `path`. A missing file yields the defaults.
pub fn load_config(path: &Path) -> Result<DemoConfig, ConfigError> {
    let content = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            reflux_info!("No config at {:?}, using defaults", path);
            return Ok(DemoConfig::default());
        }
        Err(source) => {
            return Err(ConfigError::Read {
                path: path.to_path_buf(),
                source,
            })
        }
    };

    let config = ron::from_str(&content).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    reflux_info!("Loaded config from {:?}", path);
    Ok(config)
}
