//! Web acquisition for the verification pipeline.
//!
//! - Page rendering trait and Fantoccini-backed implementation (`browser`)
//! - Main-content extraction from rendered HTML (`extract`)
//! - Related news article lookup against a search engine (`news`)
//! - Typed errors for the above (`error`)

pub mod browser;
pub mod error;
pub mod extract;
pub mod news;

pub use browser::{FantocciniRenderer, PageRenderer};
pub use error::{FetchError, SetupError};
pub use extract::{ContentExtractor, ExtractionRules};
pub use news::{NewsSearchFinder, NewsSearchOptions, RelatedArticle, RelatedArticleFinder};
