use anyhow::{Context, Result};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use verity_check::{Pipeline, PipelineLimits, TrustPolicy, VerdictRules};
use verity_config::{
    DEFAULT_CONFIG_FILE, LogFormat, LoggingSettings, VerityConfig, VerityConfigLoader, user_config_path,
};
use verity_drivers::browser::fingerprint::UserAgentPool;
use verity_web::{ContentExtractor, ExtractionRules, FantocciniRenderer, NewsSearchFinder, NewsSearchOptions};

/// Explicit `--config` must exist; otherwise `./verity.yaml`, then the per-user
/// file, are read when present. Env overrides always apply.
pub fn load_config(explicit: Option<&Path>) -> Result<VerityConfig> {
    let loader = VerityConfigLoader::new();
    let loader = match explicit {
        Some(path) => loader.with_file(path),
        None if Path::new(DEFAULT_CONFIG_FILE).exists() => loader.with_optional_file(DEFAULT_CONFIG_FILE),
        None => match user_config_path() {
            Some(path) => loader.with_optional_file(path),
            None => loader,
        },
    };
    loader.load().context("failed to load configuration")
}

/// The `logging` section with the CLI `--log-format` applied on top.
pub fn log_settings(cfg: &VerityConfig, format_override: Option<LogFormat>) -> LoggingSettings {
    LoggingSettings {
        format: format_override.unwrap_or(cfg.logging.format),
        ..cfg.logging.clone()
    }
}

pub fn trust_policy(cfg: &VerityConfig) -> TrustPolicy {
    TrustPolicy::new(&cfg.trust.domains)
}

pub fn verdict_rules(cfg: &VerityConfig) -> VerdictRules {
    let c = &cfg.classifier;
    VerdictRules {
        trusted_baseline: c.trusted_baseline,
        untrusted_baseline: c.untrusted_baseline,
        corroboration_keywords: c.corroboration_keywords.clone(),
        corroboration_boost: c.corroboration_boost,
        confidence_cap: c.confidence_cap,
        doubt_keywords: c.doubt_keywords.clone(),
        doubt_confidence: c.doubt_confidence,
    }
}

/// Assemble the pipeline. Nothing here touches the network; selector and
/// endpoint mistakes surface as errors before any request runs.
pub fn build_pipeline(cfg: &VerityConfig) -> Result<Pipeline> {
    let agents = UserAgentPool::new(cfg.browser.user_agents.iter().cloned());
    if agents.is_empty() {
        tracing::warn!("no usable user agents configured; using the built-in fallback");
    }
    let user_agents = agents.len();
    let agents = Arc::new(agents);

    let renderer = FantocciniRenderer::new(
        cfg.browser.webdriver_url.clone(),
        cfg.browser.headless,
        Duration::from_secs(cfg.browser.navigation_timeout_secs),
    );
    let rules = ExtractionRules::new(&cfg.extraction.scope_selectors, &cfg.extraction.noise_tags)
        .context("invalid extraction selectors")?;
    let extractor = ContentExtractor::new(Arc::new(renderer), agents.clone(), rules);

    let search = &cfg.search;
    let finder = NewsSearchFinder::new(
        NewsSearchOptions {
            base_url: search.base_url.clone(),
            path: search.path.clone(),
            timeout: Duration::from_secs(search.timeout_secs),
            retries: search.retries,
            max_query_chars: search.max_query_chars,
            result_selectors: search.result_selectors.clone(),
        },
        agents,
    )
    .context("invalid news search settings")?;

    let limits = PipelineLimits {
        max_content_chars: cfg.limits.max_content_chars,
        related_query_chars: cfg.limits.related_query_chars,
        max_error_chars: cfg.limits.max_error_chars,
    };

    tracing::debug!(
        webdriver = %cfg.browser.webdriver_url,
        search = %search.base_url,
        trusted_domains = cfg.trust.domains.len(),
        user_agents,
        "pipeline assembled"
    );

    Ok(Pipeline::new(extractor, Arc::new(finder))
        .with_trust(trust_policy(cfg))
        .with_rules(verdict_rules(cfg))
        .with_limits(limits))
}
