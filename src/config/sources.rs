use super::models::Config;
use config::{ConfigError, Environment, File};
use std::env;
use std::path::PathBuf;

const CONFIG_ENV_VAR: &str = "AUDITSCAN_CONFIG";
const DEFAULT_CONFIG_PATH: &str = "config/auditscan.toml";
const ENV_PREFIX: &str = "AUDITSCAN";
const ENV_SEPARATOR: &str = "__";

/// Load configuration with priority (lowest to highest):
/// 1. Defaults (embedded in structs)
/// 2. TOML file (if exists)
/// 3. `.env` file (via dotenvy)
/// 4. System environment variables
pub fn load() -> Result<Config, ConfigError> {
    // A missing .env is fine
    let _ = dotenvy::dotenv();

    let config_path = env::var(CONFIG_ENV_VAR)
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(DEFAULT_CONFIG_PATH));

    load_from_sources(config_path)
}

/// Load configuration from a specific path plus environment overrides
pub fn load_from_sources(config_path: PathBuf) -> Result<Config, ConfigError> {
    load_with_environment(config_path, environment())
}

// AUDITSCAN__SERVER__BIND_ADDR -> server.bind_addr
// AUDITSCAN__CORS__ALLOWED_ORIGINS=https://a.example,https://b.example
fn environment() -> Environment {
    Environment::with_prefix(ENV_PREFIX)
        .separator(ENV_SEPARATOR)
        .try_parsing(true)
        .list_separator(",")
        .with_list_parse_key("cors.allowed_origins")
        .with_list_parse_key("cors.allowed_methods")
        .with_list_parse_key("cors.allowed_headers")
}

fn load_with_environment(config_path: PathBuf, env: Environment) -> Result<Config, ConfigError> {
    let mut builder = config::Config::builder();

    if config_path.exists() {
        tracing::info!("Loading configuration from: {}", config_path.display());
        builder = builder.add_source(File::from(config_path).required(false));
    } else {
        tracing::warn!(
            "Configuration file not found at {}, using defaults and environment overrides",
            config_path.display()
        );
    }

    builder = builder.add_source(env);

    let config = builder.build()?;
    config.try_deserialize()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audit::IdentifierPrecedence;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_load_defaults_only() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("nonexistent.toml");

        let config = load_from_sources(config_path).unwrap();
        assert_eq!(config.server.bind_addr.to_string(), "0.0.0.0:8080");
        assert_eq!(config.cors.allowed_methods, vec!["*"]);
    }

    #[test]
    fn test_load_from_toml() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("test.toml");

        let toml_content = r#"
[server]
bind_addr = "127.0.0.1:9000"
max_upload_bytes = "2MB"

[cors]
allowed_origins = ["https://shop.example"]
allowed_methods = ["GET", "POST"]

[audit]
identifier_precedence = "image"
lookup_timeout_ms = 750

[audit.image]
max_width = 4096
max_height = 2048
max_alloc = "64MB"
        "#;

        fs::write(&config_path, toml_content).unwrap();

        let config = load_from_sources(config_path).unwrap();
        assert_eq!(config.server.bind_addr.to_string(), "127.0.0.1:9000");
        assert_eq!(config.server.max_upload_bytes.as_u64(), 2 * 1024 * 1024);
        assert_eq!(config.cors.allowed_origins, vec!["https://shop.example"]);
        assert_eq!(config.cors.allowed_methods, vec!["GET", "POST"]);
        assert_eq!(config.cors.allowed_headers, vec!["*"]);
        assert_eq!(config.audit.identifier_precedence, IdentifierPrecedence::Image);
        assert_eq!(config.audit.lookup_timeout_ms, 750);
        assert_eq!(config.audit.image.max_height, 2048);
        assert_eq!(config.audit.image.max_alloc.as_u64(), 64 * 1024 * 1024);
    }

    fn fake_env(vars: &[(&str, &str)]) -> Environment {
        let map: config::Map<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        environment().source(Some(map))
    }

    #[test]
    fn test_env_overrides_toml_and_splits_lists() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("test.toml");
        fs::write(
            &config_path,
            "[server]\nbind_addr = \"127.0.0.1:9000\"\n\n[cors]\nallowed_origins = [\"https://shop.example\"]\n",
        )
        .unwrap();

        let env = fake_env(&[
            ("AUDITSCAN__CORS__ALLOWED_ORIGINS", "https://a.example,https://b.example"),
            ("AUDITSCAN__CORS__ALLOWED_METHODS", "GET,POST"),
            ("AUDITSCAN__AUDIT__LOOKUP_TIMEOUT_MS", "900"),
            ("UNRELATED__CORS__ALLOWED_HEADERS", "x-ignored"),
        ]);
        let config = load_with_environment(config_path, env).unwrap();

        assert_eq!(
            config.cors.allowed_origins,
            vec!["https://a.example", "https://b.example"]
        );
        assert_eq!(config.cors.allowed_methods, vec!["GET", "POST"]);
        assert_eq!(config.cors.allowed_headers, vec!["*"]);
        assert_eq!(config.audit.lookup_timeout_ms, 900);
        assert_eq!(config.server.bind_addr.to_string(), "127.0.0.1:9000");
    }

    #[test]
    fn test_single_env_origin_is_one_entry() {
        let temp_dir = TempDir::new().unwrap();
        let env = fake_env(&[("AUDITSCAN__CORS__ALLOWED_ORIGINS", "https://a.example")]);

        let config = load_with_environment(temp_dir.path().join("none.toml"), env).unwrap();
        assert_eq!(config.cors.allowed_origins, vec!["https://a.example"]);
    }

    #[test]
    fn test_malformed_toml_is_an_error() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("broken.toml");
        fs::write(&config_path, "[server\nbind_addr = ").unwrap();

        assert!(load_from_sources(config_path).is_err());
    }
}
