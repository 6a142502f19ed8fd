use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use std::path::Path;

use super::{types::EngineConfig, ConfigError};

/// Load configuration from file with environment variable overrides
pub fn load_config(path: &Path) -> Result<EngineConfig, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::FileNotFound(path.display().to_string()));
    }

    let config: EngineConfig = Figment::new()
        .merge(Toml::file(path))
        .merge(Env::prefixed("TALENTSCOUT_").split("__"))
        .extract()
        .map_err(|e| ConfigError::ParseError(e.to_string()))?;

    Ok(config)
}

/// Load configuration from TOML string (useful for testing)
pub fn load_config_from_str(toml_str: &str) -> Result<EngineConfig, ConfigError> {
    toml::from_str(toml_str).map_err(|e| ConfigError::ParseError(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_load_config_from_str_valid() {
        let toml = r#"
[heap]
capacity = 25
admission_threshold = 4.0

[budget]
page_limit_max = 10
"#;
        let config = load_config_from_str(toml).unwrap();
        assert_eq!(config.heap.capacity, 25);
        assert_eq!(config.budget.page_limit_max, 10);
        // Untouched sections fall back to defaults
        assert_eq!(config.evaluation.batch_size, 6);
    }

    #[test]
    fn test_load_config_from_str_all_defaults() {
        let config = load_config_from_str("").unwrap();
        assert_eq!(config.heap.capacity, 50);
        assert!((config.heap.admission_threshold - 3.0).abs() < 1e-9);
        assert_eq!(config.budget.page_limit_initial, 3);
        assert!((config.evaluation.quality_threshold - 7.0).abs() < 1e-9);
        assert_eq!(config.fallback.max_attempts, 3);
    }

    #[test]
    fn test_load_config_from_str_malformed() {
        let result = load_config_from_str("heap = \"not a table\"");
        assert!(result.is_err());
        let err = result.unwrap_err();
        assert!(matches!(err, ConfigError::ParseError(_)));
    }

    #[test]
    fn test_load_config_file_not_found() {
        let result = load_config(Path::new("/nonexistent/config.toml"));
        assert!(result.is_err());
        let err = result.unwrap_err();
        assert!(matches!(err, ConfigError::FileNotFound(_)));
    }

    #[test]
    fn test_load_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        writeln!(
            temp_file,
            r#"
[budget]
page_limit_initial = 2
page_limit_max = 4

[fallback]
max_attempts = 5
"#
        )
        .unwrap();

        let config = load_config(temp_file.path()).unwrap();
        assert_eq!(config.budget.page_limit_initial, 2);
        assert_eq!(config.budget.page_limit_max, 4);
        assert_eq!(config.fallback.max_attempts, 5);
    }
}
