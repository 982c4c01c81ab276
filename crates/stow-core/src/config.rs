use std::path::Path;

use serde::Deserialize;

use crate::error::ConfigError;
use crate::size::DEFAULT_SIZE_THRESHOLD_BYTES;

/// Top-level client configuration, deserializable from TOML.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    pub offload: OffloadConfig,
    pub queue: QueueConfig,
    pub aws: AwsConfig,
}

/// When and where message bodies are offloaded.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct OffloadConfig {
    /// Destination bucket. Required for sending, optional otherwise.
    pub bucket_name: Option<String>,
    pub always_use_object_store: bool,
    /// Messages whose body plus attributes reach this many bytes are offloaded.
    pub size_threshold_bytes: usize,
}

/// Queue addressing used by command-line tooling.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct QueueConfig {
    pub queue_url: Option<String>,
}

/// AWS SDK overrides. Empty values fall back to the default provider chain.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct AwsConfig {
    pub region: Option<String>,
    /// Custom endpoint (LocalStack, ElasticMQ, MinIO).
    pub endpoint_url: Option<String>,
}

impl Default for OffloadConfig {
    fn default() -> Self {
        Self {
            bucket_name: None,
            always_use_object_store: false,
            size_threshold_bytes: DEFAULT_SIZE_THRESHOLD_BYTES,
        }
    }
}

impl ClientConfig {
    /// Read and parse a TOML config file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        toml::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.display().to_string(),
            source,
        })
    }
}
