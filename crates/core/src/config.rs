use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::size::SizeSpec;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    Load(#[from] figment::Error),
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ResizerConfig {
    pub server: ServerConfig,
    pub storage: StorageSettings,
    /// Predefined size table, keyed by lower-case size name.
    pub sizes: HashMap<String, SizeSpec>,
    pub cache: ClientCacheConfig,
}

impl Default for ResizerConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            storage: StorageSettings::default(),
            sizes: default_sizes(),
            cache: ClientCacheConfig::default(),
        }
    }
}

impl ResizerConfig {
    /// Load configuration from a TOML file with `FERROPIX_`-prefixed
    /// environment overrides. Falls back to default config locations when no
    /// path is given.
    pub fn load(config_path: Option<&Path>) -> Result<Self, ConfigError> {
        use figment::{
            providers::{Env, Format, Serialized, Toml},
            Figment,
        };

        let mut figment = Figment::from(Serialized::defaults(ResizerConfig::default()));

        if let Some(path) = config_path {
            figment = figment.merge(Toml::file(path));
        } else {
            figment = figment
                .merge(Toml::file("ferropix.toml"))
                .merge(Toml::file("config/ferropix.toml"));
        }

        figment = figment.merge(Env::prefixed("FERROPIX_").split("__"));

        Ok(figment.extract()?)
    }

    /// The predefined-size table with names normalized to lower-case, ready
    /// for case-insensitive lookup.
    pub fn size_table(&self) -> HashMap<String, SizeSpec> {
        self.sizes
            .iter()
            .map(|(name, spec)| {
                let key = name.to_lowercase();
                let mut spec = spec.clone();
                spec.name.get_or_insert_with(|| key.clone());
                (key, spec)
            })
            .collect()
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub cors_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            cors_origins: vec!["*".to_string()],
        }
    }
}

/// Storage section of the core config. The server crate converts this into
/// the storage crate's own config type when it builds the object store.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct StorageSettings {
    pub backend: StorageBackendKind,
    pub local: LocalStorageSettings,
    pub s3: S3StorageSettings,
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            backend: StorageBackendKind::Local,
            local: LocalStorageSettings::default(),
            s3: S3StorageSettings::default(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackendKind {
    Local,
    S3,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LocalStorageSettings {
    pub base_path: PathBuf,
}

impl Default for LocalStorageSettings {
    fn default() -> Self {
        Self {
            base_path: PathBuf::from("data/media"),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct S3StorageSettings {
    pub region: String,
    pub access_key_id: Option<String>,
    pub secret_access_key: Option<String>,
    /// Custom endpoint for S3-compatible services (MinIO, R2).
    pub endpoint: Option<String>,
}

impl Default for S3StorageSettings {
    fn default() -> Self {
        Self {
            region: "us-east-1".to_string(),
            access_key_id: None,
            secret_access_key: None,
            endpoint: None,
        }
    }
}

/// Client cache policy handed to the transport layer; the core never reads
/// it beyond emitting the header value.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ClientCacheConfig {
    pub max_age_secs: u64,
}

impl Default for ClientCacheConfig {
    fn default() -> Self {
        Self {
            max_age_secs: 5 * 24 * 60 * 60, // five days
        }
    }
}

fn default_sizes() -> HashMap<String, SizeSpec> {
    let mut sizes = HashMap::new();
    sizes.insert("original".to_string(), SizeSpec::original());
    sizes.insert(
        "thumbnail".to_string(),
        SizeSpec::named("thumbnail", 150, 150),
    );
    sizes
}
