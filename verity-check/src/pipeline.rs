use crate::classify::{Classification, VerdictRules};
use crate::model::{ValidatedRequest, Verdict, VerificationResult};
use crate::trust::TrustPolicy;
use std::sync::Arc;
use tracing::Instrument;
use uuid::Uuid;
use verity_common::defaults;
use verity_common::text::{truncate_chars, truncated};
use verity_web::{ContentExtractor, RelatedArticleFinder};

/// Character budgets applied while a request moves through the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PipelineLimits {
    /// Prefix of the content handed to the classifier.
    pub max_content_chars: usize,
    /// Prefix of the classified content used as the search query.
    pub related_query_chars: usize,
    /// Bound on the fetch diagnostic echoed in the explanation.
    pub max_error_chars: usize,
}

impl Default for PipelineLimits {
    fn default() -> Self {
        Self {
            max_content_chars: defaults::MAX_CONTENT_CHARS,
            related_query_chars: defaults::RELATED_QUERY_CHARS,
            max_error_chars: defaults::MAX_ERROR_CHARS,
        }
    }
}

/// Where a run ended up after resolving its content.
enum Resolved {
    Content(String),
    Unable(String),
}

/// Resolve content, classify, find a related article, assemble the result.
///
/// Stateless between calls; share it behind an `Arc` to serve requests
/// concurrently.
pub struct Pipeline {
    extractor: ContentExtractor,
    finder: Arc<dyn RelatedArticleFinder>,
    trust: TrustPolicy,
    rules: VerdictRules,
    limits: PipelineLimits,
}

impl Pipeline {
    pub fn new(extractor: ContentExtractor, finder: Arc<dyn RelatedArticleFinder>) -> Self {
        Self {
            extractor,
            finder,
            trust: TrustPolicy::default(),
            rules: VerdictRules::default(),
            limits: PipelineLimits::default(),
        }
    }

    pub fn with_trust(mut self, trust: TrustPolicy) -> Self {
        self.trust = trust;
        self
    }

    pub fn with_rules(mut self, rules: VerdictRules) -> Self {
        self.rules = rules;
        self
    }

    pub fn with_limits(mut self, limits: PipelineLimits) -> Self {
        self.limits = limits;
        self
    }

    pub fn trust(&self) -> &TrustPolicy {
        &self.trust
    }

    /// Run one request to completion. Every failure is folded into the
    /// returned result; nothing here is retried.
    pub async fn verify(&self, request: ValidatedRequest) -> VerificationResult {
        let request_id = Uuid::new_v4();
        let span = tracing::info_span!(target: "verity.pipeline", "verify", %request_id);
        self.run(request).instrument(span).await
    }

    async fn run(&self, request: ValidatedRequest) -> VerificationResult {
        let source_url = request.url().map(str::to_string);
        let is_trusted = source_url
            .as_deref()
            .is_some_and(|u| self.trust.is_trusted(u));

        tracing::debug!(
            target: "verity.pipeline",
            stage = "resolving_content",
            has_url = source_url.is_some(),
            is_trusted,
            "pipeline stage"
        );
        let content = match self.resolve(request).await {
            Resolved::Content(content) => content,
            Resolved::Unable(explanation) => {
                tracing::info!(
                    target: "verity.pipeline",
                    verdict = %Verdict::UnableToVerify,
                    %explanation,
                    "verification finished"
                );
                return VerificationResult {
                    verdict: Verdict::UnableToVerify,
                    confidence: 0,
                    explanation,
                    related_article: None,
                    is_trusted_source: is_trusted,
                    source_url,
                };
            }
        };

        let content = truncate_chars(&content, self.limits.max_content_chars);
        tracing::debug!(
            target: "verity.pipeline",
            stage = "classifying",
            content_chars = content.chars().count(),
            "pipeline stage"
        );
        let Classification {
            verdict,
            confidence,
            explanation,
        } = self.rules.classify(content, is_trusted);

        tracing::debug!(target: "verity.pipeline", stage = "finding_related", "pipeline stage");
        let query = truncate_chars(content, self.limits.related_query_chars);
        let related = self.finder.find_related(query).await;

        tracing::info!(
            target: "verity.pipeline",
            %verdict,
            confidence,
            is_trusted,
            related_found = !related.is_not_found(),
            "verification finished"
        );
        VerificationResult {
            verdict,
            confidence,
            explanation: explanation.to_string(),
            related_article: Some(related),
            is_trusted_source: is_trusted,
            source_url,
        }
    }

    async fn resolve(&self, request: ValidatedRequest) -> Resolved {
        let content = match request {
            ValidatedRequest::Url(url) => match self.extractor.extract(&url).await {
                Ok(text) => text,
                Err(e) => {
                    let message = truncated(&e.to_string(), self.limits.max_error_chars);
                    return Resolved::Unable(format!("Could not fetch content from URL: {message}"));
                }
            },
            ValidatedRequest::Text(text) => text,
        };

        if content.trim().is_empty() {
            Resolved::Unable("No content to analyze.".to_string())
        } else {
            Resolved::Content(content)
        }
    }
}
