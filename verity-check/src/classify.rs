use crate::model::Verdict;
use verity_common::defaults;

/// Result of running [`VerdictRules::classify`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Classification {
    pub verdict: Verdict,
    pub confidence: u8,
    pub explanation: &'static str,
}

/// Keyword heuristics behind a verdict. Built once and never mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerdictRules {
    pub trusted_baseline: u8,
    pub untrusted_baseline: u8,
    /// Raise confidence when any of these appears.
    pub corroboration_keywords: Vec<String>,
    pub corroboration_boost: u8,
    pub confidence_cap: u8,
    /// Force `misleading` when any of these appears.
    pub doubt_keywords: Vec<String>,
    pub doubt_confidence: u8,
}

impl Default for VerdictRules {
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

impl VerdictRules {
    /// Rule cascade, applied in order with the last applicable rule winning:
    ///
    /// 1. baseline from the trust decision
    /// 2. corroboration keywords add the boost, capped
    /// 3. doubt keywords override to `misleading`
    ///
    /// Matching is case-insensitive substring search, so `unverified` fires
    /// both rule 2 and rule 3; rule 3 decides the outcome.
    pub fn classify(&self, content: &str, is_trusted: bool) -> Classification {
        let lowered = content.to_lowercase();

        let (mut verdict, mut confidence) = if is_trusted {
            (Verdict::LikelyAccurate, self.trusted_baseline)
        } else {
            (Verdict::NeedsReview, self.untrusted_baseline)
        };

        if contains_any(&lowered, &self.corroboration_keywords) {
            confidence = confidence
                .saturating_add(self.corroboration_boost)
                .min(self.confidence_cap);
        }

        if contains_any(&lowered, &self.doubt_keywords) {
            verdict = Verdict::Misleading;
            confidence = self.doubt_confidence;
        }

        Classification {
            verdict,
            confidence: confidence.min(100),
            explanation: explanation_for(verdict),
        }
    }
}

fn contains_any(haystack: &str, needles: &[String]) -> bool {
    needles
        .iter()
        .map(|n| n.trim().to_lowercase())
        .any(|n| !n.is_empty() && haystack.contains(&n))
}

/// Fixed human-readable text for each verdict.
pub fn explanation_for(verdict: Verdict) -> &'static str {
    match verdict {
        Verdict::LikelyAccurate => "This information comes from a trusted source and appears accurate.",
        Verdict::NeedsReview => "This claim requires further verification from authoritative sources.",
        Verdict::Misleading => "This information may contain inaccuracies or misleading elements.",
        Verdict::UnableToVerify => "Unable to access or verify the content.",
    }
}
