//! Screening questionnaire: per-domain scoring and follow-up assessment rules.
//!
//! Answers are summed per clinical domain using the question-to-domain table,
//! then each domain total is compared against its configured threshold. Both
//! steps are pure; the only I/O is obtaining the [`ScreenerCatalog`] through a
//! [`CatalogSource`].

pub mod catalog;
pub mod domain;
pub mod form;
pub mod router;
pub mod rules;
pub mod scoring;
pub mod service;

#[cfg(test)]
mod tests;

pub use catalog::{
    CatalogError, CatalogSource, JsonDirectoryCatalog, PreloadedCatalog, ScreenerCatalog,
};
pub use domain::{
    Answer, AssessmentRule, AssessmentRules, DomainMappingEntry, DomainScores,
    QuestionDomainMapping, ScreenerSubmission, ScreeningOutcome, SubmissionStatus,
};
pub use form::{AnswerOption, Form, FormError, FormQuestion, REQUIRED_FORM_KEYS};
pub use router::screener_router;
pub use rules::determine_assessments;
pub use scoring::compute_domain_scores;
pub use service::{ScreenerService, ScreenerServiceError};
