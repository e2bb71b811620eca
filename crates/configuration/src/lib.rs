use crate::error::ConfigError;
use std::path::Path;

// Declare the modules that make up this crate.
pub mod error;
pub mod logging;
pub mod settings;

// Re-export the core types to provide a clean public API.
pub use logging::init_tracing;
pub use settings::{
    DashboardConfig, LoggingConfig, MetricWindow, OffloadConfig, ServerConfig, Settings,
    UpstreamConfig,
};

/// The file looked up when no explicit path is given (`vendas.toml`).
pub const DEFAULT_CONFIG_NAME: &str = "vendas";

/// Loads the application configuration.
///
/// Sources, lowest precedence first: built-in defaults, the optional
/// `vendas.toml` in the working directory, then `VENDAS__SECTION__KEY`
/// environment variables (e.g. `VENDAS__UPSTREAM__TIMEOUT_SECS=5`).
pub fn load_config() -> Result<Settings, ConfigError> {
    load_config_from(None)
}

/// Same as `load_config`, but reads `path` (which must exist) instead of `vendas.toml`.
pub fn load_config_from(path: Option<&Path>) -> Result<Settings, ConfigError> {
    let file = match path {
        Some(path) => config::File::from(path).required(true),
        None => config::File::with_name(DEFAULT_CONFIG_NAME).required(false),
    };

    let builder = config::Config::builder()
        .add_source(file)
        .add_source(
            config::Environment::with_prefix("VENDAS")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    let settings = builder.try_deserialize::<Settings>()?;
    validate(&settings)?;

    Ok(settings)
}

fn validate(settings: &Settings) -> Result<(), ConfigError> {
    if settings.upstream.timeout_secs == 0 {
        return Err(ConfigError::ValidationError(
            "upstream.timeout_secs must be greater than zero".to_string(),
        ));
    }
    if settings.upstream.lookup_timeout_secs == 0 {
        return Err(ConfigError::ValidationError(
            "upstream.lookup_timeout_secs must be greater than zero".to_string(),
        ));
    }
    if settings.offload.workers == 0 || settings.offload.queue_capacity == 0 {
        return Err(ConfigError::ValidationError(
            "offload.workers and offload.queue_capacity must be at least 1".to_string(),
        ));
    }
    for (name, url) in [
        ("products_url", &settings.upstream.products_url),
        ("customers_url", &settings.upstream.customers_url),
        ("sales_url", &settings.upstream.sales_url),
    ] {
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(ConfigError::ValidationError(format!(
                "upstream.{} must be an http(s) URL, got '{}'",
                name, url
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_config(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn defaults_match_the_reference_deployment() {
        let settings = Settings::default();
        assert_eq!(settings.upstream.timeout_secs, 10);
        assert_eq!(settings.upstream.products_url, "http://localhost:3001");
        assert_eq!(settings.server.dashboard.port(), 3000);
        assert_eq!(settings.dashboard.window, MetricWindow::Lifetime);
        assert!(validate(&settings).is_ok());
    }

    #[test]
    fn file_overrides_only_what_it_names() {
        let file = write_config(
            r#"
            [upstream]
            timeout_secs = 3
            sales_url = "http://vendas:3003"

            [dashboard]
            window = "current_month"
            "#,
        );
        let settings = load_config_from(Some(file.path())).unwrap();

        assert_eq!(settings.upstream.timeout_secs, 3);
        assert_eq!(settings.upstream.sales_url, "http://vendas:3003");
        assert_eq!(settings.upstream.products_url, "http://localhost:3001");
        assert_eq!(settings.dashboard.window, MetricWindow::CurrentMonth);
        assert_eq!(settings.offload.workers, 2);
    }

    #[test]
    fn zero_timeout_is_rejected() {
        let file = write_config("[upstream]\ntimeout_secs = 0\n");
        let err = load_config_from(Some(file.path())).unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(_)));
    }

    #[test]
    fn non_http_upstream_is_rejected() {
        let file = write_config("[upstream]\ncustomers_url = \"localhost:3002\"\n");
        let err = load_config_from(Some(file.path())).unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(msg) if msg.contains("customers_url")));
    }
}
