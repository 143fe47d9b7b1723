//! Configured catalog: the source's declaration of which streams it emits
//! and the JSON Schema each stream's records follow.

use std::io::Read;
use std::path::Path;

use serde::Deserialize;
use serde_json::Value;

use crate::config::RegistryConfig;
use crate::error::{Result, SchemaError};
use crate::registry::SchemaRegistry;
use crate::stream::StreamKey;

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ConfiguredCatalog {
    pub streams: Vec<ConfiguredStream>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ConfiguredStream {
    pub stream: CatalogStream,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CatalogStream {
    pub name: String,
    #[serde(default)]
    pub namespace: Option<String>,
    pub json_schema: Value,
}

impl CatalogStream {
    pub fn key(&self) -> StreamKey {
        StreamKey::new(self.namespace.as_deref(), self.name.as_str())
    }
}

impl ConfiguredCatalog {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Read a configured catalog from disk, bounded by `config`.
pub fn load_catalog(path: &Path, config: &RegistryConfig) -> Result<ConfiguredCatalog> {
    let file = std::fs::File::open(path).map_err(|err| {
        SchemaError::LoadFailed(format!("failed opening catalog {}: {err}", path.display()))
    })?;
    let metadata = file
        .metadata()
        .map_err(|err| SchemaError::LoadFailed(err.to_string()))?;

    if metadata.len() > config.max_catalog_file_size as u64 {
        return Err(SchemaError::LoadFailed(format!(
            "catalog file too large ({} bytes): {}",
            metadata.len(),
            path.display()
        )));
    }

    let max_bytes = config.max_catalog_file_size;
    let read_limit = u64::try_from(max_bytes.saturating_add(1)).unwrap_or(u64::MAX);
    let mut content = String::new();
    file.take(read_limit)
        .read_to_string(&mut content)
        .map_err(|err| {
            SchemaError::LoadFailed(format!("failed reading catalog {}: {err}", path.display()))
        })?;
    if content.len() > max_bytes {
        return Err(SchemaError::LoadFailed(format!(
            "catalog file too large while reading: {}",
            path.display()
        )));
    }

    ConfiguredCatalog::from_json(&content)
}

impl SchemaRegistry {
    /// Build a registry holding every stream the catalog declares.
    pub fn from_catalog(catalog: &ConfiguredCatalog, config: RegistryConfig) -> Result<Self> {
        if catalog.streams.len() > config.max_streams {
            return Err(SchemaError::LoadFailed(format!(
                "stream count exceeds configured max ({}): {}",
                config.max_streams,
                catalog.streams.len()
            )));
        }

        let mut registry = Self::with_config(config);
        for configured in &catalog.streams {
            registry.register_value(configured.stream.key(), &configured.stream.json_schema)?;
        }

        tracing::debug!(streams = registry.len(), "built schema registry from catalog");
        Ok(registry)
    }

    /// Load a catalog file and build a registry from it.
    pub fn from_catalog_file(path: &Path, config: RegistryConfig) -> Result<Self> {
        let catalog = load_catalog(path, &config)?;
        Self::from_catalog(&catalog, config)
    }
}
