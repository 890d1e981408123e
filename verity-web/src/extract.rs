use crate::browser::PageRenderer;
use crate::error::{FetchError, SetupError};
use scraper::{ElementRef, Html, Node, Selector};
use std::sync::Arc;
use url::Url;
use verity_common::defaults;
use verity_drivers::browser::fingerprint::UserAgentSource;

/// Compiled selectors driving [`extract_main_text`].
#[derive(Debug, Clone)]
pub struct ExtractionRules {
    scopes: Vec<Selector>,
    noise: Vec<String>,
    paragraph: Selector,
}

impl ExtractionRules {
    /// Compile the scope cascade and noise tag list. Scope selectors are tried
    /// in the given order; noise tags are matched by element name.
    pub fn new<S, N>(scope_selectors: S, noise_tags: N) -> Result<Self, SetupError>
    where
        S: IntoIterator,
        S::Item: AsRef<str>,
        N: IntoIterator,
        N::Item: AsRef<str>,
    {
        let scopes = scope_selectors
            .into_iter()
            .map(|s| parse_selector(s.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;
        let noise = noise_tags
            .into_iter()
            .map(|t| t.as_ref().trim().to_ascii_lowercase())
            .filter(|t| !t.is_empty())
            .collect();
        Ok(Self {
            scopes,
            noise,
            paragraph: parse_selector("p")?,
        })
    }

    /// Stock cascade from [`defaults::SCOPE_SELECTORS`] and [`defaults::NOISE_TAGS`].
    pub fn standard() -> Result<Self, SetupError> {
        Self::new(defaults::SCOPE_SELECTORS, defaults::NOISE_TAGS)
    }

    fn is_noise(&self, node: &Node) -> bool {
        node.as_element()
            .is_some_and(|e| self.noise.iter().any(|n| n == e.name()))
    }

    /// True when the node or any ancestor is a noise element.
    fn under_noise<'a>(&self, mut chain: impl Iterator<Item = &'a Node>) -> bool {
        chain.any(|n| self.is_noise(n))
    }

    fn element_hidden(&self, el: ElementRef<'_>) -> bool {
        let node = *el;
        self.under_noise(std::iter::once(node.value()).chain(node.ancestors().map(|a| a.value())))
    }
}

pub(crate) fn parse_selector(raw: &str) -> Result<Selector, SetupError> {
    Selector::parse(raw).map_err(|e| SetupError::Selector {
        selector: raw.to_string(),
        reason: e.to_string(),
    })
}

/// Isolate the readable main text of a rendered page.
///
/// The first scope selector with a visible match wins; without one the whole
/// document is the scope. Paragraphs in scope are joined by newlines. When no
/// paragraph carries text, every visible text node of the document is used
/// instead. The result is passed through [`normalize_lines`].
pub fn extract_main_text(html: &str, rules: &ExtractionRules) -> String {
    let doc = Html::parse_document(html);

    let scope = rules
        .scopes
        .iter()
        .find_map(|sel| doc.select(sel).find(|el| !rules.element_hidden(*el)))
        .unwrap_or_else(|| doc.root_element());

    let paragraphs: Vec<String> = scope
        .select(&rules.paragraph)
        .filter(|p| !rules.element_hidden(*p))
        .map(|p| visible_text(p, rules).concat().trim().to_string())
        .filter(|t| !t.is_empty())
        .collect();

    let text = if paragraphs.is_empty() {
        visible_text(doc.root_element(), rules)
            .into_iter()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .collect::<Vec<_>>()
            .join("\n")
    } else {
        paragraphs.join("\n")
    };

    normalize_lines(&text)
}

/// Text nodes below `root` that are not inside a noise subtree, in document order.
fn visible_text<'a>(root: ElementRef<'a>, rules: &ExtractionRules) -> Vec<&'a str> {
    root.descendants()
        .filter_map(|node| {
            let text = node.value().as_text()?;
            let hidden = rules.under_noise(node.ancestors().map(|a| a.value()));
            (!hidden).then_some(&**text)
        })
        .collect()
}

/// Trim every line and drop the empty ones. Idempotent.
pub fn normalize_lines(text: &str) -> String {
    text.lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Renders a URL in an isolated browser session and returns its main text.
#[derive(Clone)]
pub struct ContentExtractor {
    renderer: Arc<dyn PageRenderer>,
    agents: Arc<dyn UserAgentSource>,
    rules: Arc<ExtractionRules>,
}

impl ContentExtractor {
    pub fn new(
        renderer: Arc<dyn PageRenderer>,
        agents: Arc<dyn UserAgentSource>,
        rules: ExtractionRules,
    ) -> Self {
        Self {
            renderer,
            agents,
            rules: Arc::new(rules),
        }
    }

    pub async fn extract(&self, url: &str) -> Result<String, FetchError> {
        let parsed = parse_target(url)?;
        let user_agent = self.agents.pick();

        let html = match self.renderer.render(&parsed, &user_agent).await {
            Ok(html) => html,
            Err(e) => {
                tracing::warn!(target: "web.extract", url = %parsed, error = %e, "render failed");
                return Err(e);
            }
        };

        let checksum = blake3::hash(html.as_bytes()).to_hex();
        let text = extract_main_text(&html, &self.rules);
        tracing::info!(
            target: "web.extract",
            url = %parsed,
            html_bytes = html.len(),
            html_blake3 = %checksum,
            text_chars = text.chars().count(),
            "page extracted"
        );
        Ok(text)
    }
}

fn parse_target(raw: &str) -> Result<Url, FetchError> {
    let url = Url::parse(raw.trim()).map_err(|e| FetchError::InvalidUrl {
        url: raw.to_string(),
        reason: e.to_string(),
    })?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(FetchError::InvalidUrl {
            url: raw.to_string(),
            reason: format!("unsupported scheme {other}"),
        }),
    }
}
