//! Integration tests for config

#[cfg(test)]
mod tests {
    use dlock_config::*;
    use dlock_errors::{ConfigError, Error};
    use std::io::Write;
    use std::sync::Mutex;
    use tempfile::NamedTempFile;

    // Mutex to ensure env var tests don't run concurrently
    static ENV_TEST_MUTEX: Mutex<()> = Mutex::new(());

    const ENV_VARS: [&str; 4] = [
        "DLOCK_ALGORITHM",
        "DLOCK_REQUEST_BOUNDS",
        "DLOCK_RECOVERY",
        "DLOCK_MAX_SEARCH",
    ];

    fn clear_env() {
        for var in ENV_VARS {
            std::env::remove_var(var);
        }
    }

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.detection.algorithm, AlgorithmChoice::Auto);
        assert_eq!(config.detection.request_bounds, RequestBoundsPolicy::Warn);
        assert!(config.recovery.enabled);
        assert!(config.recovery.include_preemption);
        assert_eq!(config.recovery.max_search_processes, 16);
    }

    #[test]
    fn test_load_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        writeln!(
            temp_file,
            r#"
[detection]
algorithm = "matrix"
request_bounds = "reject"

[recovery]
max_search_processes = 8
        "#
        )
        .unwrap();

        let config = Config::load_from_file(temp_file.path()).unwrap();
        assert_eq!(config.detection.algorithm, AlgorithmChoice::Matrix);
        assert_eq!(config.detection.request_bounds, RequestBoundsPolicy::Reject);
        assert_eq!(config.recovery.max_search_processes, 8);
        // unspecified fields keep their defaults
        assert!(config.recovery.enabled);
        assert!(config.recovery.include_preemption);
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let mut temp_file = NamedTempFile::new().unwrap();
        writeln!(temp_file, "[recovery]\nenabled = false").unwrap();

        let config = Config::load_from_file(temp_file.path()).unwrap();
        assert!(!config.recovery.enabled);
        assert_eq!(config.detection, DetectionConfig::default());
    }

    #[test]
    fn test_invalid_toml() {
        let mut temp_file = NamedTempFile::new().unwrap();
        writeln!(temp_file, "[detection\nalgorithm = ").unwrap();

        let err = Config::load_from_file(temp_file.path()).unwrap_err();
        assert!(matches!(err, Error::Config(ConfigError::ParseError { .. })));
    }

    #[test]
    fn test_missing_file() {
        let err = Config::load_or_default(Some(std::path::Path::new(
            "/nonexistent/dlock/config.toml",
        )))
        .unwrap_err();
        assert!(matches!(err, Error::Config(ConfigError::NotFound { .. })));
    }

    #[test]
    fn test_save_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut config = Config::default();
        config.detection.algorithm = AlgorithmChoice::Wfg;
        config.recovery.max_search_processes = 4;
        config.save_to(&path).unwrap();

        assert_eq!(Config::load_from_file(&path).unwrap(), config);
    }

    #[test]
    fn test_merge_env() {
        let _guard = ENV_TEST_MUTEX.lock().unwrap();
        clear_env();

        std::env::set_var("DLOCK_ALGORITHM", "wfg");
        std::env::set_var("DLOCK_RECOVERY", "no");
        std::env::set_var("DLOCK_MAX_SEARCH", "5");

        let mut config = Config::default();
        config.merge_env().unwrap();

        assert_eq!(config.detection.algorithm, AlgorithmChoice::Wfg);
        assert!(!config.recovery.enabled);
        assert_eq!(config.recovery.max_search_processes, 5);

        clear_env();
    }

    #[test]
    fn test_invalid_env_value() {
        let _guard = ENV_TEST_MUTEX.lock().unwrap();
        clear_env();

        std::env::set_var("DLOCK_REQUEST_BOUNDS", "sometimes");

        let mut config = Config::default();
        let err = config.merge_env().unwrap_err();
        assert!(matches!(
            err,
            Error::Config(ConfigError::InvalidValue { ref field, .. }) if field == "DLOCK_REQUEST_BOUNDS"
        ));

        clear_env();
    }
}
