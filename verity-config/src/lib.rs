//! Loader for workspace configuration with YAML + environment overlays.
//!
//! Sources are merged in the order they are added; `VERITY__`-prefixed
//! environment variables are applied last (`VERITY__SEARCH__TIMEOUT_SECS=5`
//! sets `search.timeout_secs`). After merging, `${VAR}` references inside
//! string values are expanded. Every section has defaults, so an empty
//! document yields the stock pipeline configuration.
use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use serde_json::Value;
use std::path::{Path, PathBuf};
use verity_common::defaults;

pub use verity_common::observability::{LogFormat, LoggingSettings};

const MAXIMUM_ENV_EXPANSION_DEPTH: usize = 8;

/// File name looked up in the working directory and the user config dir.
pub const DEFAULT_CONFIG_FILE: &str = "verity.yaml";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct VerityConfig {
    pub version: Option<String>,
    pub trust: TrustSettings,
    pub browser: BrowserSettings,
    pub extraction: ExtractionSettings,
    pub search: SearchSettings,
    pub classifier: ClassifierSettings,
    pub limits: LimitSettings,
    pub logging: LoggingSettings,
}

/// Allow-list of domains whose content is presumed reliable.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TrustSettings {
    pub domains: Vec<String>,
}

impl Default for TrustSettings {
    fn default() -> Self {
        Self {
            domains: defaults::owned(defaults::TRUSTED_DOMAINS),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BrowserSettings {
    /// WebDriver endpoint (chromedriver by default).
    pub webdriver_url: String,
    pub headless: bool,
    pub navigation_timeout_secs: u64,
    pub user_agents: Vec<String>,
}

impl Default for BrowserSettings {
    fn default() -> Self {
        Self {
            webdriver_url: defaults::WEBDRIVER_URL.into(),
            headless: true,
            navigation_timeout_secs: defaults::NAVIGATION_TIMEOUT_SECS,
            user_agents: defaults::owned(defaults::USER_AGENTS),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ExtractionSettings {
    /// CSS selectors tried in order to find the main content scope.
    pub scope_selectors: Vec<String>,
    /// Elements whose whole subtree is ignored.
    pub noise_tags: Vec<String>,
}

impl Default for ExtractionSettings {
    fn default() -> Self {
        Self {
            scope_selectors: defaults::owned(defaults::SCOPE_SELECTORS),
            noise_tags: defaults::owned(defaults::NOISE_TAGS),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SearchSettings {
    pub base_url: String,
    pub path: String,
    pub timeout_secs: u64,
    pub retries: usize,
    pub max_query_chars: usize,
    /// CSS selectors tried in order to find the top result link.
    pub result_selectors: Vec<String>,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            base_url: defaults::SEARCH_BASE_URL.into(),
            path: defaults::SEARCH_PATH.into(),
            timeout_secs: defaults::SEARCH_TIMEOUT_SECS,
            retries: defaults::SEARCH_RETRIES,
            max_query_chars: defaults::SEARCH_MAX_QUERY_CHARS,
            result_selectors: defaults::owned(defaults::RESULT_SELECTORS),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ClassifierSettings {
    pub trusted_baseline: u8,
    pub untrusted_baseline: u8,
    pub corroboration_keywords: Vec<String>,
    pub corroboration_boost: u8,
    pub confidence_cap: u8,
    pub doubt_keywords: Vec<String>,
    pub doubt_confidence: u8,
}

impl Default for ClassifierSettings {
    fn default() -> Self {
        Self {
            trusted_baseline: defaults::TRUSTED_BASELINE,
            untrusted_baseline: defaults::UNTRUSTED_BASELINE,
            corroboration_keywords: defaults::owned(defaults::CORROBORATION_KEYWORDS),
            corroboration_boost: defaults::CORROBORATION_BOOST,
            confidence_cap: defaults::CONFIDENCE_CAP,
            doubt_keywords: defaults::owned(defaults::DOUBT_KEYWORDS),
            doubt_confidence: defaults::DOUBT_CONFIDENCE,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LimitSettings {
    pub max_content_chars: usize,
    pub related_query_chars: usize,
    pub max_error_chars: usize,
}

impl Default for LimitSettings {
    fn default() -> Self {
        Self {
            max_content_chars: defaults::MAX_CONTENT_CHARS,
            related_query_chars: defaults::RELATED_QUERY_CHARS,
            max_error_chars: defaults::MAX_ERROR_CHARS,
        }
    }
}

/// Per-user fallback location: `<config_dir>/verity/verity.yaml`.
pub fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("verity").join(DEFAULT_CONFIG_FILE))
}

fn expand_env_in_value(v: &mut Value) {
    match v {
        Value::String(s) => {
            if s.contains('$') {
                let mut cur = std::mem::take(s);
                for _ in 0..MAXIMUM_ENV_EXPANSION_DEPTH {
                    let expanded = match shellexpand::env(&cur) {
                        Ok(cow) => cow.into_owned(),
                        Err(_) => cur.clone(),
                    };
                    if expanded == cur {
                        break;
                    }
                    cur = expanded;
                }
                *s = cur;
            }
        }
        Value::Array(arr) => arr.iter_mut().for_each(expand_env_in_value),
        Value::Object(obj) => obj.values_mut().for_each(expand_env_in_value),
        _ => {}
    }
}

/// Builder hides the `config` crate wiring (YAML + env overrides).
pub struct VerityConfigLoader {
    builder: config::ConfigBuilder<config::builder::DefaultState>,
}

impl Default for VerityConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl VerityConfigLoader {
    /// Start with no files; `VERITY__` env overrides are applied on [`load`](Self::load).
    ///
    /// ```
    /// use verity_config::VerityConfigLoader;
    ///
    /// let config = VerityConfigLoader::new()
    ///     .with_yaml_str("version: '1'")
    ///     .load()
    ///     .expect("valid config");
    ///
    /// assert_eq!(config.version.as_deref(), Some("1"));
    /// assert_eq!(config.limits.max_content_chars, 1000);
    /// ```
    pub fn new() -> Self {
        Self {
            builder: Config::builder(),
        }
    }

    /// Attach a YAML/TOML/JSON file; the `config` crate infers format by suffix.
    pub fn with_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.builder = self
            .builder
            .add_source(File::from(path.as_ref()).required(true));
        self
    }

    /// Attach a file that may be missing, so deployments can rely purely on
    /// environment variables.
    pub fn with_optional_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.builder = self
            .builder
            .add_source(File::from(path.as_ref()).required(false));
        self
    }

    /// Allow tests/CLI to merge inline YAML snippets.
    ///
    /// ```
    /// use verity_config::VerityConfigLoader;
    ///
    /// let cfg = VerityConfigLoader::new()
    ///     .with_yaml_str(
    ///         r#"
    /// trust:
    ///   domains: ["example.org"]
    /// search:
    ///   timeout_secs: 3
    /// "#,
    ///     )
    ///     .load()
    ///     .unwrap();
    ///
    /// assert_eq!(cfg.trust.domains, vec!["example.org".to_string()]);
    /// assert_eq!(cfg.search.timeout_secs, 3);
    /// assert_eq!(cfg.search.max_query_chars, 100);
    /// ```
    pub fn with_yaml_str(mut self, yaml: &str) -> Self {
        self.builder = self
            .builder
            .add_source(File::from_str(yaml, config::FileFormat::Yaml));
        self
    }

    /// Consume the builder and deserialize the merged sources into strongly typed config.
    pub fn load(self) -> Result<VerityConfig, ConfigError> {
        let cfg = self
            .builder
            .add_source(
                Environment::with_prefix("VERITY")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let mut v: Value = cfg.try_deserialize()?;
        expand_env_in_value(&mut v);

        let typed: VerityConfig =
            serde_json::from_value(v).map_err(|e| ConfigError::Message(e.to_string()))?;

        Ok(typed)
    }
}
