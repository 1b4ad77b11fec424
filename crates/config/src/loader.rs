//! Configuration loader implementation

use crate::error::{ConfigError, Result};
use crate::schema::{Config, ConfigDocument};
use anyhow::Context;
use figment::{
    providers::{Format, Yaml},
    Figment,
};
use std::io;
use std::path::Path;
use tracing::{debug, info};

const STRING_ORIGIN: &str = "<string>";
const BYTES_ORIGIN: &str = "<bytes>";

/// Configuration loader for the single YAML configuration file
pub struct ConfigLoader;

impl ConfigLoader {
    /// Read, parse and resolve the configuration file at `config_path`
    pub fn load<P: AsRef<Path>>(config_path: P) -> Result<Config> {
        let config_path = config_path.as_ref();
        let bytes = Self::read(config_path)?;
        let document = Self::decode(&bytes, &config_path.display().to_string())?;

        info!(path = %config_path.display(), "Configuration loaded");
        Ok(document.resolve())
    }

    /// Load configuration from string (for testing)
    pub fn load_from_str(yaml_content: &str) -> Result<Config> {
        Self::decode(yaml_content.as_bytes(), STRING_ORIGIN).map(ConfigDocument::resolve)
    }

    /// Read the raw bytes of the configuration file
    pub fn read<P: AsRef<Path>>(config_path: P) -> Result<Vec<u8>> {
        let config_path = config_path.as_ref();

        if config_path.as_os_str().is_empty() {
            return Err(ConfigError::Read {
                path: config_path.to_path_buf(),
                source: io::Error::new(io::ErrorKind::InvalidInput, "configuration path is empty"),
            });
        }

        let bytes = std::fs::read(config_path).map_err(|source| ConfigError::Read {
            path: config_path.to_path_buf(),
            source,
        })?;

        debug!(path = %config_path.display(), bytes = bytes.len(), "Read configuration file");
        Ok(bytes)
    }

    /// Decode raw bytes into a configuration document
    pub fn parse(bytes: &[u8]) -> Result<ConfigDocument> {
        Self::decode(bytes, BYTES_ORIGIN)
    }

    fn decode(bytes: &[u8], origin: &str) -> Result<ConfigDocument> {
        let parse_error = |source: figment::Error| ConfigError::Parse {
            origin: origin.to_string(),
            source,
        };

        let text = std::str::from_utf8(bytes)
            .map_err(|e| parse_error(figment::Error::from(format!("invalid UTF-8: {}", e))))?;

        // A blank file is a document with every element missing
        if text.trim().is_empty() {
            return Ok(ConfigDocument::default());
        }

        Figment::from(Yaml::string(text))
            .extract()
            .map_err(parse_error)
    }

    /// Fully populated sample document
    pub fn example() -> ConfigDocument {
        ConfigDocument {
            grpc_port: "50051".to_string(),
            gemini_model: "gemini-1.5-flash".to_string(),
            batch_size: 10,
            batch_timeout_ms: 2000,
            google_api_key: "YOUR_GOOGLE_API_KEY".to_string(),
            use_internal_db: false,
            external_product_url: "http://localhost:8081/products".to_string(),
            seed_file: "data/products.csv".to_string(),
            web_server_port: "8080".to_string(),
            image_dir: "images".to_string(),
            store_name: "Storefront".to_string(),
            store_address: "1 Market Street".to_string(),
            store_city: "Springfield".to_string(),
            store_country: "USA".to_string(),
            order_confirmation_callback: "http://localhost:5000/orders/confirmed".to_string(),
        }
    }

    /// Create example configuration file
    pub fn write_example<P: AsRef<Path>>(path: P) -> anyhow::Result<()> {
        let yaml_content = serde_yaml::to_string(&Self::example())
            .context("Failed to serialize example configuration")?;

        std::fs::write(path.as_ref(), yaml_content)
            .with_context(|| format!("Failed to write example configuration to {}", path.as_ref().display()))?;

        Ok(())
    }
}
