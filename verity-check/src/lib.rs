//! Verification core: request model, source trust, verdict rules, and the
//! pipeline that ties extraction, classification, and related-article lookup
//! together.
//!
//! ```
//! use verity_check::{TrustPolicy, Verdict, VerdictRules};
//!
//! let trust = TrustPolicy::default();
//! assert!(trust.is_trusted("https://www.who.int/news"));
//!
//! let c = VerdictRules::default().classify("Officials confirmed the report.", true);
//! assert_eq!(c.verdict, Verdict::LikelyAccurate);
//! assert_eq!(c.confidence, 95);
//! ```

pub mod classify;
pub mod model;
pub mod pipeline;
pub mod trust;

pub use classify::{Classification, VerdictRules, explanation_for};
pub use model::{ValidatedRequest, Verdict, VerificationRequest, VerificationResult};
pub use pipeline::{Pipeline, PipelineLimits};
pub use trust::TrustPolicy;
