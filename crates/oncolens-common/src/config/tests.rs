#[cfg(test)]
mod tests {
    use super::super::*;
    use crate::error::OncoLensError;

    #[test]
    fn test_defaults_point_at_local_backend() {
        let config = Config::default();
        assert_eq!(config.backend.base_url, "http://localhost:8000");
        assert_eq!(config.backend.public_url(), "http://localhost:8000");
        assert_eq!(config.backend.timeout_secs, 30);
        assert!(config.backend.probe_images);
        assert_eq!(config.server.bind, "127.0.0.1:3001");
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let config = Config::from_toml(
            r#"
            [backend]
            base_url = "http://api:8000"
            public_url = "https://api.example.org"
            "#,
        )
        .unwrap();
        assert_eq!(config.backend.base_url, "http://api:8000");
        assert_eq!(config.backend.public_url(), "https://api.example.org");
        assert_eq!(config.backend.timeout_secs, default_timeout_secs());
        assert_eq!(config.server.bind, default_bind());
    }

    #[test]
    fn test_empty_toml_is_default() {
        let config = Config::from_toml("").unwrap();
        assert_eq!(config.backend.base_url, default_base_url());
    }

    #[test]
    fn test_validate_rejects_bad_url_and_zero_timeout() {
        let mut config = Config::default();
        config.backend.base_url = "localhost:8000".into();
        assert!(matches!(config.validate(), Err(OncoLensError::Config(_))));

        let mut config = Config::default();
        config.backend.timeout_secs = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_malformed_toml_is_config_error() {
        let err = Config::from_toml("[backend\nbase_url = 1").unwrap_err();
        assert!(matches!(err, OncoLensError::Config(_)));
    }
}
