use url::Url;
use verity_common::defaults;

/// Immutable allow-list of trusted domains.
///
/// A host is trusted when it equals an entry or is a subdomain of one. One
/// leading `www.` is ignored on both sides.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrustPolicy {
    domains: Vec<String>,
}

impl Default for TrustPolicy {
    fn default() -> Self {
        Self::new(defaults::TRUSTED_DOMAINS)
    }
}

impl TrustPolicy {
    pub fn new<I>(domains: I) -> Self
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        let domains = domains
            .into_iter()
            .map(|d| normalize_host(d.as_ref()))
            .filter(|d| !d.is_empty())
            .collect();
        Self { domains }
    }

    pub fn domains(&self) -> &[String] {
        &self.domains
    }

    /// Fail-closed: unparseable URLs and URLs without a host are untrusted.
    ///
    /// ```
    /// use verity_check::TrustPolicy;
    ///
    /// let policy = TrustPolicy::default();
    /// assert!(policy.is_trusted("https://news.pagasa.dost.gov.ph/bulletin"));
    /// assert!(!policy.is_trusted("https://fake-dost.gov.ph.evil.com"));
    /// assert!(!policy.is_trusted("not a url"));
    /// ```
    pub fn is_trusted(&self, url: &str) -> bool {
        let Ok(parsed) = Url::parse(url.trim()) else {
            return false;
        };
        let Some(host) = parsed.host_str() else {
            return false;
        };
        let host = normalize_host(host);
        if host.is_empty() {
            return false;
        }
        self.domains.iter().any(|d| {
            host == *d
                || host
                    .strip_suffix(d.as_str())
                    .is_some_and(|prefix| prefix.ends_with('.'))
        })
    }
}

fn normalize_host(raw: &str) -> String {
    let lowered = raw.trim().trim_matches('.').to_ascii_lowercase();
    match lowered.strip_prefix("www.") {
        Some(rest) => rest.to_string(),
        None => lowered,
    }
}
