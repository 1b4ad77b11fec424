//! Advisory configuration checks
//!
//! Nothing here rejects a configuration. Loading accepts every well-formed
//! document; the checks only surface values the consuming services are
//! likely to trip over so they can be logged at startup.

use crate::schema::Config;

/// Configuration validator
pub struct ConfigValidator;

impl ConfigValidator {
    /// Inspect a resolved configuration
    pub fn validate(config: &Config) -> ValidationReport {
        let mut report = ValidationReport::new();

        Self::validate_ports(config, &mut report);
        Self::validate_model(config, &mut report);
        Self::validate_batching(config, &mut report);
        Self::validate_product_source(config, &mut report);
        Self::validate_store(config, &mut report);
        Self::validate_callback(config, &mut report);

        report
    }

    fn validate_ports(config: &Config, report: &mut ValidationReport) {
        if config.grpc_port.is_empty() {
            report.add_warning("GrpcPort", "gRPC port is not set");
        } else if config.grpc_port.parse::<u16>().is_err() {
            report.add_warning("GrpcPort", &format!("gRPC port '{}' is not a valid port number", config.grpc_port));
        }

        let web_port = &config.web_server.port;
        if !web_port.is_empty() && web_port.parse::<u16>().is_err() {
            report.add_warning("WebServerPort", &format!("Web server port '{}' is not a valid port number", web_port));
        }

        if !web_port.is_empty() && *web_port == config.grpc_port {
            report.add_warning("WebServerPort", "Web server port and gRPC port are the same");
        }

        if !web_port.is_empty() && config.web_server.image_dir.is_empty() {
            report.add_warning("ImageDir", "Web server port is set but no image directory is configured");
        }
    }

    fn validate_model(config: &Config, report: &mut ValidationReport) {
        if config.gemini_model.is_empty() {
            report.add_warning("GeminiModel", "No model configured");
        }

        if config.google_api_key.is_empty() {
            report.add_warning("GoogleApiKey", "No API key configured, model requests will be rejected");
        }
    }

    fn validate_batching(config: &Config, report: &mut ValidationReport) {
        if config.batch_size == 0 {
            report.add_warning("BatchSize", "Batch size is 0");
        }

        if config.batch_timeout.is_zero() {
            report.add_warning("BatchTimeout", "Batch timeout is 0, batches will flush immediately");
        }
    }

    fn validate_product_source(config: &Config, report: &mut ValidationReport) {
        if config.use_internal_db {
            if config.seed_file.is_empty() {
                report.add_warning("SeedFile", "Internal database selected but no seed file configured");
            }
            if !config.external_product_url.is_empty() {
                report.add_warning(
                    "ExternalProductURL",
                    "Internal database selected, external product URL is inactive",
                );
            }
        } else if config.external_product_url.is_empty() {
            report.add_warning("ExternalProductURL", "External product source selected but no URL configured");
        } else if !is_http_url(&config.external_product_url) {
            report.add_warning("ExternalProductURL", "External product URL should start with http:// or https://");
        }
    }

    fn validate_store(config: &Config, report: &mut ValidationReport) {
        if config.store.name.is_empty() {
            report.add_warning("StoreName", "Receipts will be printed without a store name");
        }
    }

    fn validate_callback(config: &Config, report: &mut ValidationReport) {
        let callback = &config.order_confirmation_callback;
        if !callback.is_empty() && !is_http_url(callback) {
            report.add_warning(
                "OrderConfirmationCallback",
                "Order confirmation callback should start with http:// or https://",
            );
        }
    }
}

fn is_http_url(url: &str) -> bool {
    url.starts_with("http://") || url.starts_with("https://")
}

/// Validation report containing advisory warnings
#[derive(Debug, Clone)]
pub struct ValidationReport {
    pub warnings: Vec<ValidationIssue>,
}

/// A single advisory finding
#[derive(Debug, Clone)]
pub struct ValidationIssue {
    pub field: String,
    pub message: String,
}

impl ValidationReport {
    pub fn new() -> Self {
        Self { warnings: Vec::new() }
    }

    pub fn add_warning(&mut self, field: &str, message: &str) {
        self.warnings.push(ValidationIssue {
            field: field.to_string(),
            message: message.to_string(),
        });
    }

    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    /// Whether a warning was raised for `field`
    pub fn mentions(&self, field: &str) -> bool {
        self.warnings.iter().any(|issue| issue.field == field)
    }

    pub fn summary(&self) -> String {
        format!("Validation: {} warnings", self.warnings.len())
    }
}

impl Default for ValidationReport {
    fn default() -> Self {
        Self::new()
    }
}
