use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use verity_common::{Result, VerityError};
use verity_web::RelatedArticle;

/// Inbound request as received at the boundary. At least one field must be set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationRequest {
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
}

/// A request that passed boundary validation. The URL wins when both are
/// given, and the text is dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidatedRequest {
    Url(String),
    Text(String),
}

impl VerificationRequest {
    /// Reject requests carrying neither `text` nor `url`. Empty strings count
    /// as absent.
    ///
    /// ```
    /// use verity_check::{ValidatedRequest, VerificationRequest};
    ///
    /// let req = VerificationRequest { text: Some("claim".into()), url: Some(String::new()) };
    /// assert_eq!(req.validate().unwrap(), ValidatedRequest::Text("claim".into()));
    ///
    /// assert!(VerificationRequest::default().validate().is_err());
    /// ```
    pub fn validate(self) -> Result<ValidatedRequest> {
        let text = self.text.filter(|t| !t.is_empty());
        match (self.url.filter(|u| !u.is_empty()), text) {
            (Some(url), _) => Ok(ValidatedRequest::Url(url)),
            (None, Some(text)) => Ok(ValidatedRequest::Text(text)),
            (None, None) => Err(VerityError::InvalidRequest(
                "either text or url must be provided".into(),
            )),
        }
    }
}

impl ValidatedRequest {
    pub fn url(&self) -> Option<&str> {
        match self {
            ValidatedRequest::Url(url) => Some(url),
            ValidatedRequest::Text(_) => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    LikelyAccurate,
    NeedsReview,
    Misleading,
    UnableToVerify,
}

impl Verdict {
    pub fn as_str(&self) -> &'static str {
        match self {
            Verdict::LikelyAccurate => "likely_accurate",
            Verdict::NeedsReview => "needs_review",
            Verdict::Misleading => "misleading",
            Verdict::UnableToVerify => "unable_to_verify",
        }
    }
}

impl std::fmt::Display for Verdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of one verification run.
///
/// `related_article` is `None` on the unable-to-verify paths and serializes as
/// `{}`; `source_url` is left out of the JSON when no URL was supplied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VerificationResult {
    pub verdict: Verdict,
    pub confidence: u8,
    pub explanation: String,
    #[serde(serialize_with = "related_or_empty")]
    pub related_article: Option<RelatedArticle>,
    pub is_trusted_source: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_url: Option<String>,
}

fn related_or_empty<S: Serializer>(
    related: &Option<RelatedArticle>,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    match related {
        Some(article) => article.serialize(serializer),
        None => serializer.serialize_map(Some(0))?.end(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn url_takes_precedence_over_text() {
        let req = VerificationRequest {
            text: Some("claim".into()),
            url: Some("https://example.com".into()),
        };
        assert_eq!(
            req.validate().unwrap(),
            ValidatedRequest::Url("https://example.com".into())
        );
    }

    #[test]
    fn empty_request_is_rejected() {
        let err = VerificationRequest {
            text: Some(String::new()),
            url: None,
        }
        .validate()
        .unwrap_err();
        assert!(matches!(err, VerityError::InvalidRequest(_)));
    }

    #[test]
    fn request_json_accepts_missing_and_null_fields() {
        let req: VerificationRequest = serde_json::from_str(r#"{"url": null, "text": "hi"}"#).unwrap();
        assert_eq!(req.validate().unwrap(), ValidatedRequest::Text("hi".into()));
        let req: VerificationRequest = serde_json::from_str("{}").unwrap();
        assert!(req.validate().is_err());
    }

    #[test]
    fn unable_result_serializes_empty_related_article() {
        let result = VerificationResult {
            verdict: Verdict::UnableToVerify,
            confidence: 0,
            explanation: "No content to analyze.".into(),
            related_article: None,
            is_trusted_source: true,
            source_url: Some("https://who.int/x".into()),
        };
        assert_eq!(
            serde_json::to_value(&result).unwrap(),
            json!({
                "verdict": "unable_to_verify",
                "confidence": 0,
                "explanation": "No content to analyze.",
                "related_article": {},
                "is_trusted_source": true,
                "source_url": "https://who.int/x"
            })
        );
    }

    #[test]
    fn text_only_result_omits_source_url() {
        let result = VerificationResult {
            verdict: Verdict::NeedsReview,
            confidence: 50,
            explanation: "x".into(),
            related_article: Some(RelatedArticle::not_found()),
            is_trusted_source: false,
            source_url: None,
        };
        let value = serde_json::to_value(&result).unwrap();
        assert!(value.get("source_url").is_none());
        assert_eq!(value["verdict"], "needs_review");
        assert_eq!(value["related_article"]["title"], "No related article found");
    }
}
