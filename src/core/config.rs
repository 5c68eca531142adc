//! # Configuration
//!
//! Centralizes all settings with a clear override hierarchy:
//! defaults → config file → env vars → CLI flags.
//!
//! Config lives at `~/.waypost/config.toml`. If missing on first run, a
//! commented-out default is generated so users can discover all options.

use log::LevelFilter;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use super::policy::{HostPolicy, NavigationPolicy};

// ============================================================================
// Config Structs (all fields Option<T> for sparse TOML)
// ============================================================================

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct WaypostConfig {
    #[serde(default)]
    pub navigation: NavigationConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct NavigationConfig {
    pub strict_destinations: Option<bool>,
    pub host_policy: Option<HostPolicy>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct LoggingConfig {
    pub level: Option<String>,
    pub file: Option<String>,
}

/// Values given on the command line. `None` / `false` means not specified.
#[derive(Debug, Default, Clone)]
pub struct CliOverrides {
    pub host_policy: Option<HostPolicy>,
    pub strict: bool,
    pub log_file: Option<String>,
    pub log_level: Option<String>,
}

// ============================================================================
// Defaults
// ============================================================================

pub const DEFAULT_LOG_LEVEL: LevelFilter = LevelFilter::Debug;
pub const DEFAULT_LOG_FILE: &str = "waypost.log";

// ============================================================================
// Resolved Config (concrete values, no Options)
// ============================================================================

#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub policy: NavigationPolicy,
    pub log_level: LevelFilter,
    pub log_file: PathBuf,
    /// Ignored values, reported once the logger is up.
    pub warnings: Vec<String>,
}

// ============================================================================
// Error Type
// ============================================================================

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "config I/O error: {e}"),
            ConfigError::Parse(e) => write!(f, "config parse error: {e}"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Io(e) => Some(e),
            ConfigError::Parse(e) => Some(e),
        }
    }
}

// ============================================================================
// Loading
// ============================================================================

/// Returns the path to `~/.waypost/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(".waypost").join("config.toml"))
}

/// Where the loaded config came from. Loading runs before the logger exists,
/// so the caller logs this once logging is set up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    File(PathBuf),
    /// No file existed; a commented-out default was written here.
    Generated(PathBuf),
    /// Built-in defaults, with the reason no file was used.
    Defaults(String),
}

impl fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigSource::File(path) => write!(f, "loaded config from {}", path.display()),
            ConfigSource::Generated(path) => {
                write!(f, "no config file found, generated default at {}", path.display())
            }
            ConfigSource::Defaults(reason) => write!(f, "using default config: {reason}"),
        }
    }
}

/// Load config from `~/.waypost/config.toml`.
///
/// If the file doesn't exist, generates a commented-out default and
/// returns `WaypostConfig::default()`. If it exists but is malformed,
/// returns `ConfigError::Parse`.
pub fn load_config() -> Result<(WaypostConfig, ConfigSource), ConfigError> {
    let Some(path) = config_path() else {
        let reason = "could not determine home directory".to_string();
        return Ok((WaypostConfig::default(), ConfigSource::Defaults(reason)));
    };
    load_config_from(&path)
}

/// Load config from an explicit path, generating the default file if absent.
pub fn load_config_from(path: &Path) -> Result<(WaypostConfig, ConfigSource), ConfigError> {
    if !path.exists() {
        let source = match generate_default_config(path) {
            Ok(()) => ConfigSource::Generated(path.to_path_buf()),
            Err(e) => ConfigSource::Defaults(format!("failed to write default config: {e}")),
        };
        return Ok((WaypostConfig::default(), source));
    }

    let contents = fs::read_to_string(path).map_err(ConfigError::Io)?;
    let config: WaypostConfig = toml::from_str(&contents).map_err(ConfigError::Parse)?;
    Ok((config, ConfigSource::File(path.to_path_buf())))
}

/// Generates a commented-out default config file at the given path.
fn generate_default_config(path: &Path) -> std::io::Result<()> {
    let default_content = r#"# Waypost Configuration
# All settings are optional. Defaults are used for anything not specified.
# Override hierarchy: defaults → this file → env vars → CLI flags.

# [navigation]
# strict_destinations = false   # true: routing a screen where no target serves it is an error
# host_policy = "replace"       # "replace" or "reject" when a modal is already open

# [logging]
# level = "debug"               # "off", "error", "warn", "info", "debug", "trace"
# file = "waypost.log"
"#;

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, default_content)
}

// ============================================================================
// Resolution
// ============================================================================

/// Resolve the final config by collapsing: defaults → config file → env vars → CLI.
pub fn resolve(config: &WaypostConfig, cli: &CliOverrides) -> ResolvedConfig {
    resolve_with_env(config, cli, |key| std::env::var(key).ok())
}

fn resolve_with_env(
    config: &WaypostConfig,
    cli: &CliOverrides,
    env: impl Fn(&str) -> Option<String>,
) -> ResolvedConfig {
    let mut warnings = Vec::new();

    // Host policy: CLI → env → config → default
    let host_policy = cli
        .host_policy
        .or_else(|| {
            env("WAYPOST_HOST_POLICY").and_then(|v| {
                let parsed = HostPolicy::parse(&v);
                if parsed.is_none() {
                    warnings.push(format!("Ignoring unknown WAYPOST_HOST_POLICY value: {v}"));
                }
                parsed
            })
        })
        .or(config.navigation.host_policy)
        .unwrap_or_default();

    // Strict destinations: CLI flag only ever turns it on
    let strict_destinations = cli.strict
        || env("WAYPOST_STRICT_DESTINATIONS")
            .and_then(|v| parse_bool(&v))
            .or(config.navigation.strict_destinations)
            .unwrap_or(false);

    // Log level: CLI → env → config → default
    let log_level = cli
        .log_level
        .clone()
        .or_else(|| env("WAYPOST_LOG_LEVEL"))
        .or_else(|| config.logging.level.clone())
        .and_then(|level| match level.parse::<LevelFilter>() {
            Ok(level) => Some(level),
            Err(_) => {
                warnings.push(format!("Ignoring unknown log level: {level}"));
                None
            }
        })
        .unwrap_or(DEFAULT_LOG_LEVEL);

    // Log file: CLI → config → default
    let log_file = cli
        .log_file
        .clone()
        .or_else(|| config.logging.file.clone())
        .unwrap_or_else(|| DEFAULT_LOG_FILE.to_string());

    ResolvedConfig {
        policy: NavigationPolicy {
            strict_destinations,
            host_policy,
        },
        log_level,
        log_file: PathBuf::from(log_file),
        warnings,
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    #[test]
    fn test_default_config_parses() {
        let config = WaypostConfig::default();
        assert!(config.navigation.host_policy.is_none());
        assert!(config.logging.file.is_none());
    }

    #[test]
    fn test_resolve_uses_defaults_when_empty() {
        let resolved = resolve_with_env(&WaypostConfig::default(), &CliOverrides::default(), no_env);
        assert_eq!(resolved.policy, NavigationPolicy::default());
        assert_eq!(resolved.log_level, DEFAULT_LOG_LEVEL);
        assert_eq!(resolved.log_file, PathBuf::from(DEFAULT_LOG_FILE));
    }

    #[test]
    fn test_resolve_config_values_override_defaults() {
        let config = WaypostConfig {
            navigation: NavigationConfig {
                strict_destinations: Some(true),
                host_policy: Some(HostPolicy::Reject),
            },
            logging: LoggingConfig {
                level: Some("warn".to_string()),
                file: Some("/tmp/nav.log".to_string()),
            },
        };
        let resolved = resolve_with_env(&config, &CliOverrides::default(), no_env);
        assert_eq!(resolved.policy, NavigationPolicy::strict());
        assert_eq!(resolved.log_level, LevelFilter::Warn);
        assert_eq!(resolved.log_file, PathBuf::from("/tmp/nav.log"));
    }

    #[test]
    fn test_env_overrides_config_and_cli_overrides_env() {
        let config = WaypostConfig {
            navigation: NavigationConfig {
                strict_destinations: Some(true),
                host_policy: Some(HostPolicy::Replace),
            },
            ..Default::default()
        };
        let env: HashMap<&str, &str> = HashMap::from([
            ("WAYPOST_HOST_POLICY", "reject"),
            ("WAYPOST_STRICT_DESTINATIONS", "off"),
            ("WAYPOST_LOG_LEVEL", "info"),
        ]);
        let lookup = |key: &str| env.get(key).map(|v| v.to_string());

        let resolved = resolve_with_env(&config, &CliOverrides::default(), lookup);
        assert_eq!(resolved.policy.host_policy, HostPolicy::Reject);
        assert!(!resolved.policy.strict_destinations);
        assert_eq!(resolved.log_level, LevelFilter::Info);

        let cli = CliOverrides {
            host_policy: Some(HostPolicy::Replace),
            strict: true,
            log_level: Some("trace".to_string()),
            ..Default::default()
        };
        let resolved = resolve_with_env(&config, &cli, lookup);
        assert_eq!(resolved.policy.host_policy, HostPolicy::Replace);
        assert!(resolved.policy.strict_destinations);
        assert_eq!(resolved.log_level, LevelFilter::Trace);
    }

    #[test]
    fn test_unknown_values_fall_through() {
        let config = WaypostConfig {
            logging: LoggingConfig {
                level: Some("loud".to_string()),
                ..Default::default()
            },
            ..Default::default()
        };
        let lookup = |key: &str| (key == "WAYPOST_HOST_POLICY").then(|| "stack".to_string());
        let resolved = resolve_with_env(&config, &CliOverrides::default(), lookup);
        assert_eq!(resolved.policy.host_policy, HostPolicy::Replace);
        assert_eq!(resolved.log_level, DEFAULT_LOG_LEVEL);
        assert_eq!(resolved.warnings.len(), 2);
        assert!(resolved.warnings[0].contains("stack"));
        assert!(resolved.warnings[1].contains("loud"));
    }

    #[test]
    fn test_toml_round_trip() {
        let toml_str = r#"
[navigation]
strict_destinations = true
host_policy = "reject"

[logging]
level = "info"
file = "nav.log"
"#;
        let config: WaypostConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.navigation.strict_destinations, Some(true));
        assert_eq!(config.navigation.host_policy, Some(HostPolicy::Reject));
        assert_eq!(config.logging.level.as_deref(), Some("info"));
        assert_eq!(config.logging.file.as_deref(), Some("nav.log"));
    }

    #[test]
    fn test_sparse_toml_parses() {
        // Only override one thing; everything else stays default
        let toml_str = r#"
[navigation]
host_policy = "replace"
"#;
        let config: WaypostConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.navigation.host_policy, Some(HostPolicy::Replace));
        assert!(config.navigation.strict_destinations.is_none());
        assert!(config.logging.level.is_none());
    }

    #[test]
    fn test_bad_host_policy_is_parse_error() {
        let result: Result<WaypostConfig, _> = toml::from_str("[navigation]\nhost_policy = \"stack\"\n");
        assert!(result.is_err());
    }

    #[test]
    fn test_missing_file_generates_commented_default() {
        let dir = std::env::temp_dir().join(format!("waypost-config-{}", uuid::Uuid::new_v4()));
        let path = dir.join("config.toml");

        let (config, source) = load_config_from(&path).unwrap();
        assert!(config.navigation.host_policy.is_none());
        assert_eq!(source, ConfigSource::Generated(path.clone()));
        let generated = fs::read_to_string(&path).unwrap();
        assert!(generated.contains("# host_policy = \"replace\""));

        // The generated file is all comments, so it loads as defaults.
        let (reloaded, source) = load_config_from(&path).unwrap();
        assert!(reloaded.navigation.strict_destinations.is_none());
        assert_eq!(source, ConfigSource::File(path.clone()));
        let _ = fs::remove_dir_all(dir);
    }

    #[test]
    fn test_malformed_file_is_parse_error() {
        let dir = std::env::temp_dir().join(format!("waypost-config-{}", uuid::Uuid::new_v4()));
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("config.toml");
        fs::write(&path, "[navigation\n").unwrap();

        assert!(matches!(load_config_from(&path), Err(ConfigError::Parse(_))));
        let _ = fs::remove_dir_all(dir);
    }
}
