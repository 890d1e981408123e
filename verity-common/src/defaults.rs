//! Stock values for every tunable in the pipeline.
//!
//! Configuration defaults and the library `Default` impls both read from
//! here, so a file-less run and a directly constructed pipeline agree.

/// Domains whose content starts from the trusted baseline.
pub const TRUSTED_DOMAINS: &[&str] = &[
    "dost.gov.ph",
    "phivolcs.dost.gov.ph",
    "pagasa.dost.gov.ph",
    "ndrrmc.gov.ph",
    "pna.gov.ph",
    "gov.ph",
    "who.int",
    "cdc.gov",
    "un.org",
];

pub const WEBDRIVER_URL: &str = "http://localhost:9515";
pub const NAVIGATION_TIMEOUT_SECS: u64 = 30;

pub const USER_AGENTS: &[&str] = &[
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 13_5) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.6 Safari/605.1.15",
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/118.0.5993.90 Safari/537.36",
];

/// Candidate main-content scopes, most specific first.
pub const SCOPE_SELECTORS: &[&str] = &[
    "article",
    "main",
    "div.content, div.article, div.post, div.entry-content",
    "div#content, div#main-content",
];

/// Subtrees that never contribute text.
pub const NOISE_TAGS: &[&str] = &["script", "style", "nav", "footer", "header", "iframe"];

pub const SEARCH_BASE_URL: &str = "https://www.bing.com/";
pub const SEARCH_PATH: &str = "news/search";
pub const SEARCH_TIMEOUT_SECS: u64 = 10;
pub const SEARCH_RETRIES: usize = 0;
pub const SEARCH_MAX_QUERY_CHARS: usize = 100;
pub const RESULT_SELECTORS: &[&str] = &["a.title", ".news-card a"];

pub const TRUSTED_BASELINE: u8 = 85;
pub const UNTRUSTED_BASELINE: u8 = 50;
pub const CORROBORATION_KEYWORDS: &[&str] = &["verified", "confirmed"];
pub const CORROBORATION_BOOST: u8 = 10;
pub const CONFIDENCE_CAP: u8 = 95;
pub const DOUBT_KEYWORDS: &[&str] = &["unverified", "rumor"];
pub const DOUBT_CONFIDENCE: u8 = 75;

pub const MAX_CONTENT_CHARS: usize = 1000;
pub const RELATED_QUERY_CHARS: usize = 150;
pub const MAX_ERROR_CHARS: usize = 200;

/// Owned copy of a constant list, for settings structs.
pub fn owned(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}
