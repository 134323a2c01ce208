// Configuration module entry point
// Layers built-in defaults, an optional config file and RECINTOS_* environment variables

mod state;
mod types;

use std::net::SocketAddr;

use crate::dataset::{ReadOptions, DEFAULT_NA_VALUES};

// Re-export public types
pub use state::AppState;
pub use types::{
    Config, DatasetConfig, HttpConfig, LogLevel, LoggingConfig, PerformanceConfig,
    ResourcesConfig, ServerConfig,
};

/// Default config file name (extension resolved by the config crate)
pub const DEFAULT_CONFIG_PATH: &str = "config";

type Builder = config::ConfigBuilder<config::builder::DefaultState>;

impl Config {
    /// Load configuration from specified file path (without extension)
    /// Default config file is "config.toml" when no path specified
    pub fn load_from(config_path: &str) -> Result<Self, config::ConfigError> {
        let settings = Self::defaults_builder()?
            .add_source(config::File::with_name(config_path).required(false))
            .add_source(
                config::Environment::with_prefix("RECINTOS")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let cfg: Self = settings.try_deserialize()?;
        cfg.validate().map_err(config::ConfigError::Message)?;
        Ok(cfg)
    }

    /// Built-in defaults only, without reading files or the environment
    pub fn defaults() -> Result<Self, config::ConfigError> {
        Self::defaults_builder()?.build()?.try_deserialize()
    }

    fn defaults_builder() -> Result<Builder, config::ConfigError> {
        config::Config::builder()
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 5000)?
            .set_default("server.debug", false)?
            .set_default("dataset.path", "GeoRecintos_Scz.xlsx - Hoja1.csv")?
            .set_default("dataset.delimiter", ",")?
            .set_default("dataset.required_columns", vec!["latitud", "longitud"])?
            .set_default("dataset.na_values", DEFAULT_NA_VALUES.to_vec())?
            .set_default("dataset.infer_types", false)?
            .set_default("resources.template_dir", "templates")?
            .set_default("resources.index_file", "index.html")?
            .set_default("resources.static_dir", "static")?
            .set_default("resources.static_prefix", "/static/")?
            .set_default("logging.level", "info")?
            .set_default("logging.access_log", true)?
            .set_default("logging.access_log_format", "combined")?
            .set_default("performance.keep_alive_timeout", 75)?
            .set_default("performance.read_timeout", 30)?
            .set_default("performance.write_timeout", 30)?
            .set_default("http.server_name", "recintos")?
            .set_default("http.enable_cors", false)?
            .set_default("http.max_body_size", 1_048_576) // 1MB
    }

    /// Check values the type system cannot express
    pub fn validate(&self) -> Result<(), String> {
        self.dataset.delimiter_byte()?;
        self.get_socket_addr()?;
        if self.server.workers == Some(0) {
            return Err("server.workers must be at least 1".to_string());
        }
        if !self.resources.static_prefix.starts_with('/') {
            return Err(format!(
                "resources.static_prefix must start with '/', got '{}'",
                self.resources.static_prefix
            ));
        }
        match self.logging.access_log_format.as_str() {
            "combined" | "common" | "json" => Ok(()),
            other => Err(format!(
                "logging.access_log_format must be combined, common or json, got '{other}'"
            )),
        }
    }

    pub fn get_socket_addr(&self) -> Result<SocketAddr, String> {
        format!("{}:{}", self.server.host, self.server.port)
            .parse()
            .map_err(|e| format!("Invalid address: {e}"))
    }

    /// Log threshold after applying debug mode
    pub fn effective_log_level(&self) -> LogLevel {
        if self.server.debug {
            LogLevel::Debug
        } else {
            self.logging.level
        }
    }

    /// CSV reader options derived from the dataset section
    pub fn read_options(&self) -> Result<ReadOptions, String> {
        Ok(ReadOptions {
            delimiter: self.dataset.delimiter_byte()?,
            required_columns: self.dataset.required_columns.clone(),
            na_values: self.dataset.na_values.iter().cloned().collect(),
            infer_types: self.dataset.infer_types,
        })
    }
}
