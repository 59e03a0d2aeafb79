use figment::providers::{Env, Format, Yaml};
use figment::Figment;
use schemars::{schema_for, JsonSchema};
use serde::{Deserialize, Serialize};

use super::logging::LoggingConfig;

/// Environment variables with this prefix override file values,
/// e.g. `SESSIONKIT_BOOTSTRAP__USE_MOCK_DATA=true`.
pub const ENV_PREFIX: &str = "SESSIONKIT_";

/// A top-level enum for versioned configurations.
#[derive(Deserialize, Serialize, JsonSchema)]
#[serde(tag = "version")]
pub enum Config {
    #[serde(rename = "1.0.0")]
    ConfigV1(ConfigV1),
}

/// Main config for v1.0.0.
#[derive(Deserialize, Serialize, Debug, Clone, JsonSchema)]
pub struct ConfigV1 {
    pub api: ApiConfig,
    #[serde(default)]
    pub bootstrap: BootstrapConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Where the authentication endpoints live.
#[derive(Deserialize, Serialize, Debug, Clone, JsonSchema)]
pub struct ApiConfig {
    pub base_url: String,
    #[serde(default = "default_refresh_path")]
    pub refresh_path: String,
    #[serde(default = "default_logout_path")]
    pub logout_path: String,
    #[serde(default = "default_timeout_in_ms")]
    pub timeout_in_ms: u64,
}

/// Startup sequence settings.
#[derive(Deserialize, Serialize, Debug, Clone, JsonSchema)]
pub struct BootstrapConfig {
    /// Register canned responses before the refresh call instead of hitting the network.
    #[serde(default)]
    pub use_mock_data: bool,
    /// Minimum time the loading screen stays visible.
    #[serde(default = "default_min_splash_ms")]
    pub min_splash_ms: u64,
}

impl Default for BootstrapConfig {
    fn default() -> Self {
        Self {
            use_mock_data: false,
            min_splash_ms: default_min_splash_ms(),
        }
    }
}

fn default_refresh_path() -> String {
    "/api/auth/refresh".to_string()
}

fn default_logout_path() -> String {
    "/api/auth/logout".to_string()
}

fn default_timeout_in_ms() -> u64 {
    10_000
}

fn default_min_splash_ms() -> u64 {
    3_000
}

/// Extract a v1 config from an already assembled figment.
pub fn extract_config(figment: Figment) -> Result<ConfigV1, figment::Error> {
    match figment.extract::<Config>()? {
        Config::ConfigV1(c) => Ok(c),
    }
    // handle configuration migration between versions here when necessary
}

/// Load config from a YAML file, with `SESSIONKIT_*` environment overrides.
pub fn load_config(path: &str) -> Result<ConfigV1, figment::Error> {
    let figment = Figment::new()
        .merge(Yaml::file(path))
        .merge(Env::prefixed(ENV_PREFIX).split("__"));
    extract_config(figment)
}

/// Print the JSON schema for the configuration to stdout.
pub fn print_schema() -> Result<(), serde_json::Error> {
    let schema = schema_for!(Config);
    println!("{}", serde_json::to_string_pretty(&schema)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL: &str = r#"
version: "1.0.0"
api:
  base_url: "http://localhost:8080"
"#;

    #[test]
    fn test_defaults_fill_optional_sections() {
        let config = extract_config(Figment::new().merge(Yaml::string(MINIMAL)))
            .expect("minimal config should parse");

        assert_eq!(config.api.base_url, "http://localhost:8080");
        assert_eq!(config.api.refresh_path, "/api/auth/refresh");
        assert_eq!(config.api.logout_path, "/api/auth/logout");
        assert!(!config.bootstrap.use_mock_data);
        assert_eq!(config.bootstrap.min_splash_ms, 3000);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_full_config() {
        let yaml = r#"
version: "1.0.0"
api:
  base_url: "https://example.org"
  refresh_path: "/auth/refresh"
  logout_path: "/auth/logout"
  timeout_in_ms: 500
bootstrap:
  use_mock_data: true
  min_splash_ms: 1200
logging:
  level: "debug"
  format: "json"
"#;
        let config = extract_config(Figment::new().merge(Yaml::string(yaml)))
            .expect("config should parse");

        assert_eq!(config.api.refresh_path, "/auth/refresh");
        assert_eq!(config.api.timeout_in_ms, 500);
        assert!(config.bootstrap.use_mock_data);
        assert_eq!(config.bootstrap.min_splash_ms, 1200);
        assert_eq!(config.logging.format, "json");
    }

    #[test]
    fn test_unknown_version_is_rejected() {
        let yaml = r#"
version: "9.9.9"
api:
  base_url: "http://localhost"
"#;
        assert!(extract_config(Figment::new().merge(Yaml::string(yaml))).is_err());
    }

    #[test]
    fn test_load_config_applies_env_overrides() {
        figment::Jail::expect_with(|jail| {
            jail.create_file("config.yaml", MINIMAL)?;
            jail.set_env("SESSIONKIT_BOOTSTRAP__USE_MOCK_DATA", "true");
            jail.set_env("SESSIONKIT_BOOTSTRAP__MIN_SPLASH_MS", "5");

            let config = load_config("config.yaml")?;

            assert_eq!(config.api.base_url, "http://localhost:8080");
            assert!(config.bootstrap.use_mock_data);
            assert_eq!(config.bootstrap.min_splash_ms, 5);
            Ok(())
        });
    }

    #[test]
    fn test_load_config_missing_file_fails() {
        figment::Jail::expect_with(|_jail| {
            assert!(load_config("absent.yaml").is_err());
            Ok(())
        });
    }
}
