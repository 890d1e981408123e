use crate::error::FetchError;
use std::time::Duration;
use tokio::time::Instant;
use url::Url;
use verity_drivers::browser::driver::{DriverOptions, VerityDriver};

/// Upper bound on releasing a session once rendering has finished.
const CLOSE_GRACE: Duration = Duration::from_secs(10);

/// Produces the fully rendered HTML of a page.
///
/// Implementations must not share cookies or storage between calls, and must
/// release any session they open before returning.
#[async_trait::async_trait]
pub trait PageRenderer: Send + Sync {
    async fn render(&self, url: &Url, user_agent: &str) -> Result<String, FetchError>;
}

/// Concrete renderer backed by a fantoccini WebDriver session per call.
#[derive(Debug, Clone)]
pub struct FantocciniRenderer {
    pub webdriver_url: String,
    pub headless: bool,
    pub navigation_timeout: Duration,
}

impl FantocciniRenderer {
    pub fn new(webdriver_url: impl Into<String>, headless: bool, navigation_timeout: Duration) -> Self {
        Self {
            webdriver_url: webdriver_url.into(),
            headless,
            navigation_timeout,
        }
    }
}

#[async_trait::async_trait]
impl PageRenderer for FantocciniRenderer {
    /// Session setup and navigation share one deadline of `navigation_timeout`.
    async fn render(&self, url: &Url, user_agent: &str) -> Result<String, FetchError> {
        let opts = DriverOptions {
            webdriver_url: self.webdriver_url.clone(),
            headless: self.headless,
            user_agent: user_agent.to_string(),
            page_load_timeout: self.navigation_timeout,
        };
        let deadline = Instant::now() + self.navigation_timeout;

        let driver = match tokio::time::timeout_at(deadline, VerityDriver::connect(&opts)).await {
            Ok(Ok(driver)) => driver,
            Ok(Err(e)) => return Err(FetchError::Session(format!("{e:#}"))),
            Err(_) => {
                tracing::warn!(
                    target: "web.browser",
                    webdriver = %self.webdriver_url,
                    "webdriver did not open a session before the deadline"
                );
                return Err(FetchError::Timeout(self.navigation_timeout));
            }
        };

        let result = match tokio::time::timeout_at(deadline, driver.render(url.as_str())).await {
            Ok(Ok(html)) => Ok(html),
            Ok(Err(e)) => Err(FetchError::Navigation(format!("{e:#}"))),
            Err(_) => Err(FetchError::Timeout(self.navigation_timeout)),
        };

        // Close runs on every path; a stalled driver gets a short grace period
        match tokio::time::timeout(CLOSE_GRACE, driver.close()).await {
            Ok(Ok(())) => {}
            Ok(Err(e)) => {
                tracing::warn!(target: "web.browser", url = %url, error = %e, "browser session close failed");
            }
            Err(_) => {
                tracing::warn!(target: "web.browser", url = %url, "browser session close timed out");
            }
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const SESSION: &str = "/session/verity-1";

    fn page() -> Url {
        Url::parse("https://news.example/story").unwrap()
    }

    fn renderer(webdriver_url: String, timeout: Duration) -> FantocciniRenderer {
        FantocciniRenderer::new(webdriver_url, true, timeout)
    }

    /// WebDriver endpoint that opens `verity-1` and expects exactly one close.
    async fn webdriver() -> MockServer {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/session"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "value": { "sessionId": "verity-1", "capabilities": {} }
            })))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path(format!("{SESSION}/timeouts")))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "value": null })))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path(format!("{SESSION}/url")))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "value": "about:blank" })))
            .mount(&server)
            .await;
        Mock::given(method("DELETE"))
            .and(path(SESSION))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "value": null })))
            .expect(1)
            .mount(&server)
            .await;
        server
    }

    #[tokio::test]
    async fn rendered_source_is_returned_and_session_closed() {
        let server = webdriver().await;
        Mock::given(method("POST"))
            .and(path(format!("{SESSION}/url")))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "value": null })))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path(format!("{SESSION}/source")))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "value": "<html><body><p>Rendered</p></body></html>"
            })))
            .mount(&server)
            .await;

        let html = renderer(server.uri(), Duration::from_secs(5))
            .render(&page(), "verity-test")
            .await
            .unwrap();
        assert!(html.contains("<p>Rendered</p>"));
    }

    #[tokio::test]
    async fn navigation_error_still_closes_session() {
        let server = webdriver().await;
        Mock::given(method("POST"))
            .and(path(format!("{SESSION}/url")))
            .respond_with(ResponseTemplate::new(500).set_body_json(json!({
                "value": {
                    "error": "unknown error",
                    "message": "net::ERR_NAME_NOT_RESOLVED",
                    "stacktrace": ""
                }
            })))
            .mount(&server)
            .await;

        let err = renderer(server.uri(), Duration::from_secs(5))
            .render(&page(), "verity-test")
            .await
            .unwrap_err();
        assert!(matches!(err, FetchError::Navigation(_)), "got {err:?}");
        assert!(err.to_string().starts_with("Failed to fetch URL: navigation to"));
    }

    #[tokio::test]
    async fn navigation_timeout_still_closes_session() {
        let server = webdriver().await;
        Mock::given(method("POST"))
            .and(path(format!("{SESSION}/url")))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({ "value": null }))
                    .set_delay(Duration::from_secs(3)),
            )
            .mount(&server)
            .await;

        let err = tokio::time::timeout(
            Duration::from_secs(15),
            renderer(server.uri(), Duration::from_secs(1)).render(&page(), "verity-test"),
        )
        .await
        .expect("render finishes")
        .unwrap_err();
        assert!(matches!(err, FetchError::Timeout(_)), "got {err:?}");
    }

    #[tokio::test]
    async fn silent_webdriver_is_bounded_by_navigation_timeout() {
        // Accepts connections and never answers
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let held = tokio::spawn(async move {
            let mut sockets = Vec::new();
            while let Ok((socket, _)) = listener.accept().await {
                sockets.push(socket);
            }
        });

        let started = Instant::now();
        let err = tokio::time::timeout(
            Duration::from_secs(5),
            renderer(format!("http://{addr}"), Duration::from_secs(1)).render(&page(), "verity-test"),
        )
        .await
        .expect("render returns before the outer guard")
        .unwrap_err();

        assert!(matches!(err, FetchError::Timeout(d) if d == Duration::from_secs(1)), "got {err:?}");
        assert!(started.elapsed() < Duration::from_secs(3));
        held.abort();
    }
}
