//! Process-wide configuration for SVG templates
//!
//! A [`TemplateConfig`] is loaded once (from TOML or built in code) and then
//! shared read-only by every render. Keys missing from the TOML file keep
//! their defaults:
//!
//! ```toml
//! base_path = "assets/svg/"
//! extension = "svg"
//! default_extra_classes = ["icon"]
//! default_extra_attribute = "role/img"
//! fetch_timeout_secs = 10
//! ```

use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

/// Environment variable that selects TLS verification for remote assets
pub const ENVIRONMENT_VAR: &str = "SS_ENVIRONMENT_TYPE";

/// The only environment value that keeps certificate verification on
pub const LIVE_ENVIRONMENT: &str = "live";

const DEFAULT_BASE_PATH: &str = "mysite/svg/";
const DEFAULT_EXTENSION: &str = "svg";
const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(30);

/// Errors that can occur when loading or validating configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Failed to parse config TOML: {0}")]
    ParseError(#[from] toml::de::Error),
    #[error("Invalid extra attribute {value:?}: expected exactly one '/' between a non-empty name and its value")]
    InvalidAttribute { value: String },
}

/// Decide whether remote fetches verify certificates for an environment value
pub fn verify_tls_for(environment: Option<&str>) -> bool {
    environment == Some(LIVE_ENVIRONMENT)
}

/// A single `name="value"` attribute applied to the root element
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtraAttribute {
    pub name: String,
    pub value: String,
}

impl ExtraAttribute {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }

    /// Parse the `name/value` form used in configuration files
    ///
    /// The value may be empty, the name may not, and there must be exactly
    /// one `/`.
    pub fn parse(raw: &str) -> Result<Self, ConfigError> {
        let invalid = || ConfigError::InvalidAttribute {
            value: raw.to_string(),
        };

        let (name, value) = raw.split_once('/').ok_or_else(invalid)?;
        if name.trim().is_empty() || value.contains('/') {
            return Err(invalid());
        }

        Ok(Self::new(name.trim(), value))
    }
}

impl fmt::Display for ExtraAttribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.name, self.value)
    }
}

/// Static configuration consumed by every render
#[derive(Debug, Clone)]
pub struct TemplateConfig {
    /// Process base directory that local asset paths are built under
    pub root_dir: PathBuf,
    /// Asset directory relative to `root_dir`
    pub base_path: String,
    /// Extension appended to names that have none
    pub extension: String,
    /// Classes every request starts with
    pub default_extra_classes: Vec<String>,
    /// Attribute every request starts with
    pub default_extra_attribute: Option<ExtraAttribute>,
    /// Whether remote fetches verify certificates and hostnames
    pub verify_tls: bool,
    /// Upper bound on a single remote fetch
    pub fetch_timeout: Duration,
    /// Indent element-only content when serializing
    pub pretty_print: bool,
}

/// TOML structure for deserializing configuration
#[derive(Deserialize, Default)]
#[serde(deny_unknown_fields)]
struct TomlConfig {
    root_dir: Option<PathBuf>,
    base_path: Option<String>,
    extension: Option<String>,
    default_extra_classes: Option<Vec<String>>,
    default_extra_attribute: Option<String>,
    verify_tls: Option<bool>,
    fetch_timeout_secs: Option<u64>,
    pretty_print: Option<bool>,
}

impl Default for TemplateConfig {
    fn default() -> Self {
        let environment = std::env::var(ENVIRONMENT_VAR).ok();
        Self::for_environment(environment.as_deref())
    }
}

impl TemplateConfig {
    /// Create a configuration with defaults, reading the environment once
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a configuration with defaults for an explicit environment value
    pub fn for_environment(environment: Option<&str>) -> Self {
        Self {
            root_dir: std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
            base_path: DEFAULT_BASE_PATH.to_string(),
            extension: DEFAULT_EXTENSION.to_string(),
            default_extra_classes: Vec::new(),
            default_extra_attribute: None,
            verify_tls: verify_tls_for(environment),
            fetch_timeout: DEFAULT_FETCH_TIMEOUT,
            pretty_print: false,
        }
    }

    /// Load configuration from a TOML file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_str(&content)
    }

    /// Load configuration from a TOML string
    pub fn from_str(content: &str) -> Result<Self, ConfigError> {
        let parsed: TomlConfig = toml::from_str(content)?;
        let defaults = Self::default();

        let default_extra_attribute = parsed
            .default_extra_attribute
            .as_deref()
            .map(ExtraAttribute::parse)
            .transpose()?;

        Ok(TemplateConfig {
            root_dir: parsed.root_dir.unwrap_or(defaults.root_dir),
            base_path: parsed.base_path.unwrap_or(defaults.base_path),
            extension: parsed.extension.unwrap_or(defaults.extension),
            default_extra_classes: parsed.default_extra_classes.unwrap_or_default(),
            default_extra_attribute,
            verify_tls: parsed.verify_tls.unwrap_or(defaults.verify_tls),
            fetch_timeout: parsed
                .fetch_timeout_secs
                .map(Duration::from_secs)
                .unwrap_or(defaults.fetch_timeout),
            pretty_print: parsed.pretty_print.unwrap_or(defaults.pretty_print),
        })
    }

    /// Set the process base directory
    pub fn with_root_dir(mut self, root_dir: impl Into<PathBuf>) -> Self {
        self.root_dir = root_dir.into();
        self
    }

    /// Set the asset directory
    pub fn with_base_path(mut self, base_path: impl Into<String>) -> Self {
        self.base_path = base_path.into();
        self
    }

    /// Set the default file extension
    pub fn with_extension(mut self, extension: impl Into<String>) -> Self {
        self.extension = extension.into();
        self
    }

    /// Add a class every request starts with
    pub fn with_default_class(mut self, class: impl Into<String>) -> Self {
        self.default_extra_classes.push(class.into());
        self
    }

    /// Set the attribute every request starts with
    pub fn with_default_attribute(mut self, attribute: ExtraAttribute) -> Self {
        self.default_extra_attribute = Some(attribute);
        self
    }

    /// Force TLS verification on or off
    pub fn with_verify_tls(mut self, verify: bool) -> Self {
        self.verify_tls = verify;
        self
    }

    /// Set the remote fetch timeout
    pub fn with_fetch_timeout(mut self, timeout: Duration) -> Self {
        self.fetch_timeout = timeout;
        self
    }

    /// Set whether to pretty-print output
    pub fn with_pretty_print(mut self, pretty: bool) -> Self {
        self.pretty_print = pretty;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_verify_tls_only_when_live() {
        assert!(verify_tls_for(Some("live")));
        assert!(!verify_tls_for(Some("dev")));
        assert!(!verify_tls_for(Some("Live")));
        assert!(!verify_tls_for(Some("")));
        assert!(!verify_tls_for(None));
    }

    #[test]
    fn test_default_config() {
        let config = TemplateConfig::for_environment(Some("dev"));
        assert_eq!(config.base_path, "mysite/svg/");
        assert_eq!(config.extension, "svg");
        assert!(config.default_extra_classes.is_empty());
        assert_eq!(config.default_extra_attribute, None);
        assert!(!config.verify_tls);
        assert_eq!(config.fetch_timeout, Duration::from_secs(30));
        assert!(!config.pretty_print);
    }

    #[test]
    fn test_builder_pattern() {
        let config = TemplateConfig::for_environment(None)
            .with_root_dir("/srv/site")
            .with_base_path("assets/svg/")
            .with_extension("xml")
            .with_default_class("icon")
            .with_default_attribute(ExtraAttribute::new("role", "img"))
            .with_verify_tls(true)
            .with_fetch_timeout(Duration::from_secs(5))
            .with_pretty_print(true);

        assert_eq!(config.root_dir, PathBuf::from("/srv/site"));
        assert_eq!(config.base_path, "assets/svg/");
        assert_eq!(config.extension, "xml");
        assert_eq!(config.default_extra_classes, vec!["icon".to_string()]);
        assert_eq!(
            config.default_extra_attribute,
            Some(ExtraAttribute::new("role", "img"))
        );
        assert!(config.verify_tls);
        assert_eq!(config.fetch_timeout, Duration::from_secs(5));
        assert!(config.pretty_print);
    }

    #[test]
    fn test_parse_toml() {
        let toml_str = r#"
root_dir = "/srv/site"
base_path = "assets/svg/"
extension = "svg"
default_extra_classes = ["icon", "inline"]
default_extra_attribute = "aria-hidden/true"
verify_tls = true
fetch_timeout_secs = 5
"#;
        let config = TemplateConfig::from_str(toml_str).expect("Should parse");
        assert_eq!(config.root_dir, PathBuf::from("/srv/site"));
        assert_eq!(config.base_path, "assets/svg/");
        assert_eq!(
            config.default_extra_classes,
            vec!["icon".to_string(), "inline".to_string()]
        );
        assert_eq!(
            config.default_extra_attribute,
            Some(ExtraAttribute::new("aria-hidden", "true"))
        );
        assert!(config.verify_tls);
        assert_eq!(config.fetch_timeout, Duration::from_secs(5));
    }

    #[test]
    fn test_parse_empty_toml_keeps_defaults() {
        let config = TemplateConfig::from_str("").expect("Should parse");
        assert_eq!(config.base_path, "mysite/svg/");
        assert_eq!(config.extension, "svg");
        assert_eq!(config.fetch_timeout, Duration::from_secs(30));
    }

    #[test]
    fn test_parse_toml_rejects_malformed_attribute() {
        let result = TemplateConfig::from_str(r#"default_extra_attribute = "role""#);
        assert!(matches!(result, Err(ConfigError::InvalidAttribute { .. })));
    }

    #[test]
    fn test_invalid_toml_error() {
        let invalid = "this is not valid toml {{{{";
        assert!(matches!(
            TemplateConfig::from_str(invalid),
            Err(ConfigError::ParseError(_))
        ));
    }

    #[test]
    fn test_unknown_key_is_rejected() {
        assert!(TemplateConfig::from_str("base_pth = \"x\"").is_err());
    }

    #[test]
    fn test_extra_attribute_parse() {
        assert_eq!(
            ExtraAttribute::parse("data-icon/home").unwrap(),
            ExtraAttribute::new("data-icon", "home")
        );
        // empty value is allowed
        assert_eq!(
            ExtraAttribute::parse("hidden/").unwrap(),
            ExtraAttribute::new("hidden", "")
        );
        assert!(ExtraAttribute::parse("novalue").is_err());
        assert!(ExtraAttribute::parse("/value").is_err());
        assert!(ExtraAttribute::parse("a/b/c").is_err());
    }

    #[test]
    fn test_extra_attribute_display_round_trips() {
        let attr = ExtraAttribute::new("role", "img");
        assert_eq!(attr.to_string(), "role/img");
        assert_eq!(ExtraAttribute::parse(&attr.to_string()).unwrap(), attr);
    }
}
