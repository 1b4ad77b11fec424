//! Configuration schema definitions

use serde::{de, Deserialize, Deserializer, Serialize};
use std::fmt;
use std::time::Duration;

/// Configuration document as stored on disk
///
/// The file is a flat mapping keyed by the element names below. Absent
/// elements decode to their zero value and unknown elements are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfigDocument {
    /// gRPC listener port
    #[serde(rename = "GrpcPort", deserialize_with = "string_or_number")]
    pub grpc_port: String,
    /// Generative model identifier
    #[serde(rename = "GeminiModel")]
    pub gemini_model: String,
    /// Items per processing batch
    #[serde(rename = "BatchSize")]
    pub batch_size: u32,
    /// Batch timeout in milliseconds
    #[serde(rename = "BatchTimeout")]
    pub batch_timeout_ms: u64,
    /// Google API credential
    #[serde(rename = "GoogleApiKey")]
    pub google_api_key: String,
    /// Serve products from the internal store instead of the external source
    #[serde(rename = "UseInternalDB")]
    pub use_internal_db: bool,
    /// External product source URL
    #[serde(rename = "ExternalProductURL")]
    pub external_product_url: String,
    /// CSV seed file for the internal store
    #[serde(rename = "SeedFile")]
    pub seed_file: String,
    /// Static image server port
    #[serde(rename = "WebServerPort", deserialize_with = "string_or_number")]
    pub web_server_port: String,
    /// Static image server root directory
    #[serde(rename = "ImageDir")]
    pub image_dir: String,
    #[serde(rename = "StoreName")]
    pub store_name: String,
    #[serde(rename = "StoreAddress")]
    pub store_address: String,
    #[serde(rename = "StoreCity")]
    pub store_city: String,
    #[serde(rename = "StoreCountry")]
    pub store_country: String,
    /// URL invoked when an order is confirmed
    #[serde(rename = "OrderConfirmationCallback")]
    pub order_confirmation_callback: String,
}

impl ConfigDocument {
    /// Resolve the document into the snapshot handed to the rest of the process
    pub fn resolve(self) -> Config {
        Config {
            grpc_port: self.grpc_port,
            gemini_model: self.gemini_model,
            batch_size: self.batch_size,
            batch_timeout: Duration::from_millis(self.batch_timeout_ms),
            google_api_key: self.google_api_key,
            use_internal_db: self.use_internal_db,
            external_product_url: self.external_product_url,
            seed_file: self.seed_file,
            web_server: WebServerConfig {
                port: self.web_server_port,
                image_dir: self.image_dir,
            },
            store: StoreConfig {
                name: self.store_name,
                address: self.store_address,
                city: self.store_city,
                country: self.store_country,
            },
            order_confirmation_callback: self.order_confirmation_callback,
        }
    }
}

impl From<ConfigDocument> for Config {
    fn from(document: ConfigDocument) -> Self {
        document.resolve()
    }
}

/// Resolved configuration snapshot
///
/// Immutable once built. Components take a `&Config` (or the published
/// `&'static Config`) and read fields directly.
#[derive(Clone, PartialEq, Eq)]
pub struct Config {
    pub grpc_port: String,
    pub gemini_model: String,
    pub batch_size: u32,
    pub batch_timeout: Duration,
    pub google_api_key: String,
    pub use_internal_db: bool,
    pub external_product_url: String,
    pub seed_file: String,
    pub web_server: WebServerConfig,
    pub store: StoreConfig,
    pub order_confirmation_callback: String,
}

/// Static image server configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WebServerConfig {
    pub port: String,
    pub image_dir: String,
}

/// Store identity printed on receipts
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    pub name: String,
    pub address: String,
    pub city: String,
    pub country: String,
}

/// Where the product catalog comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProductSource<'a> {
    /// Internal store, seeded from `seed_file`
    Internal,
    /// External catalog at the given URL
    External(&'a str),
}

impl Config {
    /// Zero-valued snapshot, observed before anything is published
    pub const EMPTY: Config = Config {
        grpc_port: String::new(),
        gemini_model: String::new(),
        batch_size: 0,
        batch_timeout: Duration::ZERO,
        google_api_key: String::new(),
        use_internal_db: false,
        external_product_url: String::new(),
        seed_file: String::new(),
        web_server: WebServerConfig::EMPTY,
        store: StoreConfig::EMPTY,
        order_confirmation_callback: String::new(),
    };

    /// The active product source.
    ///
    /// `use_internal_db` wins when both it and an external URL are set.
    pub fn product_source(&self) -> ProductSource<'_> {
        if self.use_internal_db {
            ProductSource::Internal
        } else {
            ProductSource::External(&self.external_product_url)
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::EMPTY
    }
}

// Keeps the API key out of logs.
impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("grpc_port", &self.grpc_port)
            .field("gemini_model", &self.gemini_model)
            .field("batch_size", &self.batch_size)
            .field("batch_timeout", &self.batch_timeout)
            .field("google_api_key", &mask_secret(&self.google_api_key))
            .field("use_internal_db", &self.use_internal_db)
            .field("external_product_url", &self.external_product_url)
            .field("seed_file", &self.seed_file)
            .field("web_server", &self.web_server)
            .field("store", &self.store)
            .field("order_confirmation_callback", &self.order_confirmation_callback)
            .finish()
    }
}

impl WebServerConfig {
    pub const EMPTY: WebServerConfig = WebServerConfig {
        port: String::new(),
        image_dir: String::new(),
    };
}

impl Default for WebServerConfig {
    fn default() -> Self {
        Self::EMPTY
    }
}

impl StoreConfig {
    pub const EMPTY: StoreConfig = StoreConfig {
        name: String::new(),
        address: String::new(),
        city: String::new(),
        country: String::new(),
    };

    /// Non-empty identity lines in receipt order
    pub fn receipt_lines(&self) -> Vec<&str> {
        [&self.name, &self.address, &self.city, &self.country]
            .into_iter()
            .map(String::as_str)
            .filter(|line| !line.is_empty())
            .collect()
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self::EMPTY
    }
}

/// Render a secret for display without revealing it
pub fn mask_secret(secret: &str) -> &'static str {
    if secret.is_empty() {
        "<unset>"
    } else {
        "<redacted>"
    }
}

/// Accept ports written either as strings or as bare integers
fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    struct StringOrNumber;

    impl<'de> de::Visitor<'de> for StringOrNumber {
        type Value = String;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("a string or an integer")
        }

        fn visit_str<E: de::Error>(self, value: &str) -> Result<String, E> {
            Ok(value.to_string())
        }

        fn visit_string<E: de::Error>(self, value: String) -> Result<String, E> {
            Ok(value)
        }

        fn visit_u64<E: de::Error>(self, value: u64) -> Result<String, E> {
            Ok(value.to_string())
        }

        fn visit_i64<E: de::Error>(self, value: i64) -> Result<String, E> {
            Ok(value.to_string())
        }

        fn visit_unit<E: de::Error>(self) -> Result<String, E> {
            Ok(String::new())
        }

        fn visit_none<E: de::Error>(self) -> Result<String, E> {
            Ok(String::new())
        }
    }

    deserializer.deserialize_any(StringOrNumber)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_converts_batch_timeout() {
        let document = ConfigDocument {
            batch_timeout_ms: 5000,
            ..Default::default()
        };

        let config = document.resolve();
        assert_eq!(config.batch_timeout, Duration::from_secs(5));
    }

    #[test]
    fn test_resolve_copies_fields_verbatim() {
        let document = ConfigDocument {
            grpc_port: "not-a-port".to_string(),
            web_server_port: "8080".to_string(),
            image_dir: "./images".to_string(),
            store_name: "Corner Shop".to_string(),
            store_country: "Norway".to_string(),
            ..Default::default()
        };

        let config = Config::from(document);
        assert_eq!(config.grpc_port, "not-a-port");
        assert_eq!(config.web_server.port, "8080");
        assert_eq!(config.web_server.image_dir, "./images");
        assert_eq!(config.store.name, "Corner Shop");
        assert_eq!(config.store.country, "Norway");
    }

    #[test]
    fn test_empty_matches_default_document() {
        assert_eq!(ConfigDocument::default().resolve(), Config::EMPTY);
        assert_eq!(Config::default(), Config::EMPTY);
    }

    #[test]
    fn test_product_source() {
        let mut config = Config {
            external_product_url: "https://catalog.example.com".to_string(),
            ..Config::EMPTY
        };
        assert_eq!(
            config.product_source(),
            ProductSource::External("https://catalog.example.com")
        );

        config.use_internal_db = true;
        assert_eq!(config.product_source(), ProductSource::Internal);
    }

    #[test]
    fn test_receipt_lines_skip_empty() {
        let store = StoreConfig {
            name: "Corner Shop".to_string(),
            address: String::new(),
            city: "Bergen".to_string(),
            country: "Norway".to_string(),
        };
        assert_eq!(store.receipt_lines(), vec!["Corner Shop", "Bergen", "Norway"]);
        assert!(StoreConfig::EMPTY.receipt_lines().is_empty());
    }

    #[test]
    fn test_debug_masks_api_key() {
        let config = Config {
            google_api_key: "AIza-secret".to_string(),
            ..Config::EMPTY
        };
        let rendered = format!("{:?}", config);
        assert!(!rendered.contains("AIza-secret"));
        assert!(rendered.contains("<redacted>"));
    }
}
