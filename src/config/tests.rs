#[cfg(test)]
mod config_tests {
    use crate::config::{
        default_busy_timeout_ms, default_database_url, default_host, default_log_level,
        default_max_connections, default_max_request_size, default_port, default_service_name,
        default_timeout, AuthConfig, Config, ConfigError, ServerConfig, DEVELOPMENT_API_KEY,
    };
    use std::time::Duration;

    fn settings(overrides: &[(&str, &str)]) -> config::Config {
        overrides
            .iter()
            .fold(config::Config::builder(), |builder, (key, value)| {
                builder.set_override(*key, *value).unwrap()
            })
            .build()
            .unwrap()
    }

    #[test]
    fn test_config_defaults() {
        let config = Config::from_settings(&settings(&[])).unwrap();

        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 5000);
        assert_eq!(config.server.request_timeout_seconds, 30);
        assert_eq!(config.server.max_request_size, 1024 * 1024);
        assert_eq!(config.database.database_url, "sqlite://cafes.db");
        assert_eq!(config.database.max_connections, 5);
        assert_eq!(config.auth.api_key, DEVELOPMENT_API_KEY);
        assert_eq!(config.observability.service_name, "cafe-api");
        assert!(config.observability.otlp_endpoint.is_none());
        assert!(!config.observability.enable_json_logging);
    }

    #[test]
    fn test_config_overrides() {
        let config = Config::from_settings(&settings(&[
            ("port", "8081"),
            ("database_url", "sqlite::memory:"),
            ("max_connections", "1"),
            ("api_key", "s3cret"),
            ("otlp_endpoint", "http://collector:4317"),
            ("log_level", "debug"),
            ("enable_json_logging", "true"),
        ]))
        .unwrap();

        assert_eq!(config.server.port, 8081);
        assert_eq!(config.database.database_url, "sqlite::memory:");
        assert_eq!(config.database.max_connections, 1);
        assert_eq!(config.auth.api_key, "s3cret");
        assert_eq!(
            config.observability.otlp_endpoint.as_deref(),
            Some("http://collector:4317")
        );
        assert_eq!(config.observability.log_level, "debug");
        assert!(config.observability.enable_json_logging);
    }

    #[test]
    fn test_config_validation_failures() {
        for (key, value) in [
            ("port", "0"),
            ("request_timeout_seconds", "0"),
            ("database_url", " "),
            ("max_connections", "0"),
            ("api_key", ""),
        ] {
            let result = Config::from_settings(&settings(&[(key, value)]));
            assert!(
                matches!(result, Err(ConfigError::ValidationError { .. })),
                "expected validation error for {}={:?}",
                key,
                value
            );
        }
    }

    #[test]
    fn test_config_load_error() {
        let result = Config::from_settings(&settings(&[("port", "not-a-port")]));
        assert!(matches!(result, Err(ConfigError::LoadError { .. })));
    }

    #[test]
    fn test_server_config_request_timeout() {
        let config = ServerConfig {
            host: "localhost".to_string(),
            port: 5000,
            request_timeout_seconds: 45,
            max_request_size: 1024,
        };

        assert_eq!(config.request_timeout(), Duration::from_secs(45));
    }

    #[test]
    fn test_auth_config_debug_redacts_key() {
        let config = AuthConfig {
            api_key: "do-not-print".to_string(),
        };

        let debug = format!("{:?}", config);
        assert!(!debug.contains("do-not-print"));
        assert!(debug.contains("<redacted>"));
    }

    #[test]
    fn test_config_error_display() {
        let error = ConfigError::ValidationError {
            message: "Invalid configuration".to_string(),
        };
        assert_eq!(error.to_string(), "Validation error: Invalid configuration");
    }

    #[test]
    fn test_default_values() {
        assert_eq!(default_host(), "0.0.0.0");
        assert_eq!(default_port(), 5000);
        assert_eq!(default_timeout(), 30);
        assert_eq!(default_max_request_size(), 1024 * 1024);
        assert_eq!(default_database_url(), "sqlite://cafes.db");
        assert_eq!(default_max_connections(), 5);
        assert_eq!(default_busy_timeout_ms(), 5000);
        assert_eq!(default_service_name(), "cafe-api");
        assert_eq!(default_log_level(), "info");
    }
}
