use crate::error::SetupError;
use crate::extract::parse_selector;
use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use scraper::{Html, Selector};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::sync::Arc;
use std::time::Duration;
use url::Url;
use verity_common::defaults;
use verity_common::text::truncate_chars;
use verity_drivers::browser::fingerprint::UserAgentSource;
use verity_http::{HttpClient, RequestOpts};

const NOT_FOUND_TITLE: &str = "No related article found";

/// Top news-search hit for a content excerpt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelatedArticle {
    pub title: String,
    pub url: String,
}

impl RelatedArticle {
    /// The value returned whenever a lookup fails or finds nothing.
    pub fn not_found() -> Self {
        Self {
            title: NOT_FOUND_TITLE.to_string(),
            url: String::new(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.url.is_empty() && self.title == NOT_FOUND_TITLE
    }
}

/// Looks up one article related to a query. Never fails; failures degrade to
/// [`RelatedArticle::not_found`].
#[async_trait::async_trait]
pub trait RelatedArticleFinder: Send + Sync {
    async fn find_related(&self, query: &str) -> RelatedArticle;
}

#[derive(Debug, Clone)]
pub struct NewsSearchOptions {
    pub base_url: String,
    pub path: String,
    pub timeout: Duration,
    pub retries: usize,
    pub max_query_chars: usize,
    /// Tried in order; the first element with a usable `href` is the result.
    pub result_selectors: Vec<String>,
}

impl Default for NewsSearchOptions {
    fn default() -> Self {
        Self {
            base_url: defaults::SEARCH_BASE_URL.to_string(),
            path: defaults::SEARCH_PATH.to_string(),
            timeout: Duration::from_secs(defaults::SEARCH_TIMEOUT_SECS),
            retries: defaults::SEARCH_RETRIES,
            max_query_chars: defaults::SEARCH_MAX_QUERY_CHARS,
            result_selectors: defaults::owned(defaults::RESULT_SELECTORS),
        }
    }
}

/// Scrapes the result page of an HTML news-search endpoint.
pub struct NewsSearchFinder {
    http: HttpClient,
    path: String,
    max_query_chars: usize,
    selectors: Vec<Selector>,
    agents: Arc<dyn UserAgentSource>,
}

impl NewsSearchFinder {
    pub fn new(opts: NewsSearchOptions, agents: Arc<dyn UserAgentSource>) -> Result<Self, SetupError> {
        let http = HttpClient::new(&opts.base_url)?
            .with_timeout(opts.timeout)
            .with_retries(opts.retries);
        let selectors = opts
            .result_selectors
            .iter()
            .map(|s| parse_selector(s))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            http,
            path: opts.path,
            max_query_chars: opts.max_query_chars,
            selectors,
            agents,
        })
    }

    fn headers(&self) -> Option<HeaderMap> {
        let agent = self.agents.pick();
        match HeaderValue::from_str(&agent) {
            Ok(v) => {
                let mut headers = HeaderMap::new();
                headers.insert(USER_AGENT, v);
                Some(headers)
            }
            Err(e) => {
                tracing::debug!(target: "web.news", error = %e, "user agent not a valid header; sending default");
                None
            }
        }
    }
}

#[async_trait::async_trait]
impl RelatedArticleFinder for NewsSearchFinder {
    async fn find_related(&self, query: &str) -> RelatedArticle {
        let query = truncate_chars(query.trim(), self.max_query_chars);
        if query.is_empty() {
            tracing::debug!(target: "web.news", "blank query; skipping search");
            return RelatedArticle::not_found();
        }

        let opts = RequestOpts {
            headers: self.headers(),
            query: Some(vec![("q", Cow::Borrowed(query))]),
            ..Default::default()
        };
        let body = match self.http.get_text(&self.path, opts).await {
            Ok(body) => body,
            Err(e) => {
                tracing::warn!(target: "web.news", error = %e, "news search failed");
                return RelatedArticle::not_found();
            }
        };

        match first_result(&body, &self.selectors, self.http.base()) {
            Some(article) => {
                tracing::debug!(target: "web.news", url = %article.url, "related article found");
                article
            }
            None => {
                tracing::debug!(target: "web.news", body_bytes = body.len(), "no result matched");
                RelatedArticle::not_found()
            }
        }
    }
}

/// First element across `selectors` (in order) carrying a non-empty `href`.
/// Relative links are resolved against `base`.
pub(crate) fn first_result(html: &str, selectors: &[Selector], base: &Url) -> Option<RelatedArticle> {
    let doc = Html::parse_document(html);
    selectors.iter().find_map(|sel| {
        doc.select(sel).find_map(|el| {
            let href = el.value().attr("href")?.trim();
            if href.is_empty() {
                return None;
            }
            let url = base.join(href).map(String::from).unwrap_or_else(|_| href.to_string());
            let title = el.text().collect::<Vec<_>>().join(" ");
            let title = title.split_whitespace().collect::<Vec<_>>().join(" ");
            Some(RelatedArticle {
                title: if title.is_empty() { url.clone() } else { title },
                url,
            })
        })
    })
}
