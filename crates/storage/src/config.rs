use std::path::PathBuf;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::{LocalObjectStore, ObjectStore, S3ObjectStore, StorageResult};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum StorageType {
    Local {
        path: PathBuf,
    },
    S3 {
        region: String,
        access_key_id: Option<String>,
        secret_access_key: Option<String>,
        endpoint: Option<String>,
    },
}

impl Default for StorageType {
    fn default() -> Self {
        Self::Local {
            path: PathBuf::from("data/media"),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StorageConfig {
    #[serde(flatten)]
    pub storage_type: StorageType,
}

impl StorageConfig {
    /// Create an object store from the configuration.
    pub fn create_store(&self) -> StorageResult<Arc<dyn ObjectStore>> {
        match &self.storage_type {
            StorageType::Local { path } => Ok(Arc::new(LocalObjectStore::new(path.clone()))),

            StorageType::S3 {
                region,
                access_key_id,
                secret_access_key,
                endpoint,
            } => {
                let mut config_builder = aws_sdk_s3::config::Builder::new()
                    .behavior_version(aws_sdk_s3::config::BehaviorVersion::latest())
                    .region(aws_sdk_s3::config::Region::new(region.clone()));

                // Set custom endpoint if provided (for S3-compatible services
                // like MinIO or R2).
                if let Some(endpoint_url) = endpoint {
                    config_builder = config_builder.endpoint_url(endpoint_url);
                }

                // Set credentials if provided.
                if let (Some(access_key), Some(secret_key)) = (access_key_id, secret_access_key) {
                    let credentials = aws_sdk_s3::config::Credentials::new(
                        access_key,
                        secret_key,
                        None,
                        None,
                        "ferropix-config",
                    );
                    config_builder = config_builder.credentials_provider(credentials);
                }

                let config = config_builder.build();
                let client = aws_sdk_s3::Client::from_conf(config);

                Ok(Arc::new(S3ObjectStore::new(client, region.clone())))
            }
        }
    }
}
