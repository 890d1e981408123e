mod common;

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use serde_json::json;
use url::Url;
use verity_check::{Pipeline, ValidatedRequest, Verdict, VerificationRequest};
use verity_drivers::browser::fingerprint::FixedUserAgent;
use verity_web::{
    ContentExtractor, ExtractionRules, FetchError, NewsSearchFinder, NewsSearchOptions, PageRenderer,
    RelatedArticle, RelatedArticleFinder,
};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

enum Page {
    Html(&'static str),
    NavigationError(String),
}

/// Renderer that counts how often a page was requested.
struct FakeRenderer {
    page: Page,
    opened: AtomicUsize,
}

impl FakeRenderer {
    fn new(page: Page) -> Arc<Self> {
        Arc::new(Self {
            page,
            opened: AtomicUsize::new(0),
        })
    }
}

#[async_trait::async_trait]
impl PageRenderer for FakeRenderer {
    async fn render(&self, _url: &Url, _user_agent: &str) -> Result<String, FetchError> {
        self.opened.fetch_add(1, Ordering::SeqCst);
        match &self.page {
            Page::Html(html) => Ok(html.to_string()),
            Page::NavigationError(msg) => Err(FetchError::Navigation(msg.clone())),
        }
    }
}

struct RecordingFinder {
    queries: Mutex<Vec<String>>,
}

impl RecordingFinder {
    fn new() -> Arc<Self> {
        Arc::new(Self {
            queries: Mutex::new(Vec::new()),
        })
    }

    fn queries(&self) -> Vec<String> {
        self.queries.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl RelatedArticleFinder for RecordingFinder {
    async fn find_related(&self, query: &str) -> RelatedArticle {
        self.queries.lock().unwrap().push(query.to_string());
        RelatedArticle {
            title: "Related".into(),
            url: "https://news.example/related".into(),
        }
    }
}

fn extractor(renderer: Arc<FakeRenderer>) -> ContentExtractor {
    ContentExtractor::new(
        renderer,
        Arc::new(FixedUserAgent("pipeline-test".into())),
        ExtractionRules::standard().unwrap(),
    )
}

fn pipeline(renderer: Arc<FakeRenderer>, finder: Arc<RecordingFinder>) -> Pipeline {
    Pipeline::new(extractor(renderer), finder)
}

fn text(t: &str) -> ValidatedRequest {
    ValidatedRequest::Text(t.to_string())
}

fn url(u: &str) -> ValidatedRequest {
    ValidatedRequest::Url(u.to_string())
}

#[test]
fn empty_request_never_reaches_pipeline() {
    let err = VerificationRequest { text: None, url: None }.validate();
    assert!(err.is_err());
    assert!(err.unwrap_err().to_string().starts_with("Invalid request"));
}

#[tokio::test]
async fn corroborated_text_without_url() {
    common::init_test_tracing();
    let renderer = FakeRenderer::new(Page::Html("<p>unused</p>"));
    let finder = RecordingFinder::new();
    let result = pipeline(renderer.clone(), finder.clone())
        .verify(text("This has been verified by officials."))
        .await;

    assert_eq!(result.verdict, Verdict::NeedsReview);
    assert_eq!(result.confidence, 60);
    assert!(!result.is_trusted_source);
    assert_eq!(result.source_url, None);
    assert_eq!(finder.queries(), vec!["This has been verified by officials.".to_string()]);
    assert_eq!(renderer.opened.load(Ordering::SeqCst), 0);

    let value = serde_json::to_value(&result).unwrap();
    assert!(value.get("source_url").is_none());
    assert_eq!(
        value["related_article"],
        json!({"title": "Related", "url": "https://news.example/related"})
    );
}

#[tokio::test]
async fn rumor_text_is_misleading() {
    common::init_test_tracing();
    let result = pipeline(FakeRenderer::new(Page::Html("")), RecordingFinder::new())
        .verify(text("This is an unverified rumor."))
        .await;
    assert_eq!(result.verdict, Verdict::Misleading);
    assert_eq!(result.confidence, 75);
    assert_eq!(
        result.explanation,
        "This information may contain inaccuracies or misleading elements."
    );
}

#[tokio::test]
async fn trusted_url_with_empty_content_is_unable() {
    common::init_test_tracing();
    let renderer = FakeRenderer::new(Page::Html("<html><body><script>x()</script></body></html>"));
    let finder = RecordingFinder::new();
    let result = pipeline(renderer.clone(), finder.clone())
        .verify(url("https://pagasa.dost.gov.ph/advisory"))
        .await;

    assert_eq!(result.verdict, Verdict::UnableToVerify);
    assert_eq!(result.confidence, 0);
    assert_eq!(result.explanation, "No content to analyze.");
    assert!(result.is_trusted_source);
    assert!(finder.queries().is_empty());
    assert_eq!(
        serde_json::to_value(&result).unwrap(),
        json!({
            "verdict": "unable_to_verify",
            "confidence": 0,
            "explanation": "No content to analyze.",
            "related_article": {},
            "is_trusted_source": true,
            "source_url": "https://pagasa.dost.gov.ph/advisory"
        })
    );
    assert_eq!(renderer.opened.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn fetch_failure_reports_bounded_diagnostic() {
    common::init_test_tracing();
    let renderer = FakeRenderer::new(Page::NavigationError("net::ERR_NAME_NOT_RESOLVED ".repeat(40)));
    let finder = RecordingFinder::new();
    let result = pipeline(renderer.clone(), finder.clone())
        .verify(url("https://www.who.int/missing"))
        .await;

    assert_eq!(result.verdict, Verdict::UnableToVerify);
    assert_eq!(result.confidence, 0);
    assert!(result.is_trusted_source);
    assert_eq!(result.related_article, None);
    assert_eq!(result.source_url.as_deref(), Some("https://www.who.int/missing"));

    let prefix = "Could not fetch content from URL: ";
    let detail = result.explanation.strip_prefix(prefix).unwrap();
    assert!(detail.starts_with("Failed to fetch URL: net::ERR_NAME_NOT_RESOLVED"));
    assert_eq!(detail.chars().count(), 200);

    assert!(finder.queries().is_empty());
    assert_eq!(renderer.opened.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn invalid_url_is_unable_and_untrusted() {
    common::init_test_tracing();
    let renderer = FakeRenderer::new(Page::Html("<p>x</p>"));
    let result = pipeline(renderer.clone(), RecordingFinder::new())
        .verify(url("not a url"))
        .await;
    assert_eq!(result.verdict, Verdict::UnableToVerify);
    assert!(!result.is_trusted_source);
    assert!(result.explanation.starts_with("Could not fetch content from URL: Failed to fetch URL: "));
    assert_eq!(renderer.opened.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn trusted_article_is_classified_from_extracted_text() {
    common::init_test_tracing();
    let renderer = FakeRenderer::new(Page::Html(
        r#"<html><body><nav><p>Home</p></nav>
        <article><p>PHIVOLCS confirmed a magnitude 5 quake.</p><p>No damage reported.</p></article>
        </body></html>"#,
    ));
    let finder = RecordingFinder::new();
    let result = pipeline(renderer, finder.clone())
        .verify(
            VerificationRequest {
                text: Some("ignored when a URL is present".into()),
                url: Some("https://phivolcs.dost.gov.ph/news/1".into()),
            }
            .validate()
            .unwrap(),
        )
        .await;

    assert_eq!(result.verdict, Verdict::LikelyAccurate);
    assert_eq!(result.confidence, 95);
    assert!(result.is_trusted_source);
    assert_eq!(
        finder.queries(),
        vec!["PHIVOLCS confirmed a magnitude 5 quake.\nNo damage reported.".to_string()]
    );
}

#[tokio::test]
async fn classifier_only_sees_bounded_prefix() {
    common::init_test_tracing();
    let finder = RecordingFinder::new();
    let long = format!("{} rumor", "a".repeat(1000));
    let result = pipeline(FakeRenderer::new(Page::Html("")), finder.clone())
        .verify(text(&long))
        .await;

    assert_eq!(result.verdict, Verdict::NeedsReview);
    assert_eq!(result.confidence, 50);
    let queries = finder.queries();
    assert_eq!(queries.len(), 1);
    assert_eq!(queries[0].chars().count(), 150);
}

#[tokio::test]
async fn whitespace_text_has_nothing_to_analyze() {
    common::init_test_tracing();
    let finder = RecordingFinder::new();
    let result = pipeline(FakeRenderer::new(Page::Html("")), finder.clone())
        .verify(text(" \n\t "))
        .await;
    assert_eq!(result.verdict, Verdict::UnableToVerify);
    assert_eq!(result.explanation, "No content to analyze.");
    assert!(!result.is_trusted_source);
    assert!(finder.queries().is_empty());
}

#[tokio::test]
async fn search_outage_still_yields_verdict() {
    common::init_test_tracing();
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/news/search"))
        .respond_with(ResponseTemplate::new(503))
        .expect(1)
        .mount(&server)
        .await;

    let finder = NewsSearchFinder::new(
        NewsSearchOptions {
            base_url: server.uri(),
            timeout: Duration::from_secs(2),
            ..Default::default()
        },
        Arc::new(FixedUserAgent("pipeline-test".into())),
    )
    .unwrap();
    let pipeline = Pipeline::new(extractor(FakeRenderer::new(Page::Html(""))), Arc::new(finder));

    let result = pipeline.verify(text("Officials confirmed the evacuation.")).await;
    assert_eq!(result.verdict, Verdict::NeedsReview);
    assert_eq!(result.confidence, 60);
    assert_eq!(result.related_article, Some(RelatedArticle::not_found()));
}

#[tokio::test]
async fn pipeline_serves_concurrent_requests() {
    common::init_test_tracing();
    let finder = RecordingFinder::new();
    let shared = Arc::new(pipeline(FakeRenderer::new(Page::Html("")), finder.clone()));

    let handles: Vec<_> = ["first claim", "second rumor", "third confirmed"]
        .into_iter()
        .map(|claim| {
            let p = shared.clone();
            tokio::spawn(async move { p.verify(text(claim)).await })
        })
        .collect();

    let mut verdicts = Vec::new();
    for h in handles {
        verdicts.push(h.await.unwrap().verdict);
    }
    assert_eq!(
        verdicts,
        vec![Verdict::NeedsReview, Verdict::Misleading, Verdict::NeedsReview]
    );
    assert_eq!(finder.queries().len(), 3);
}
