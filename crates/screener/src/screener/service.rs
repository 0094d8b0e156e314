use std::sync::Arc;

use tracing::debug;

use super::catalog::{CatalogError, CatalogSource};
use super::domain::{ScreenerSubmission, ScreeningOutcome, SubmissionStatus};
use super::form::Form;
use super::rules::determine_assessments;
use super::scoring::compute_domain_scores;

/// Service composing the catalog with the scoring engine and rule evaluator.
pub struct ScreenerService<S> {
    catalog: Arc<S>,
}

impl<S> ScreenerService<S>
where
    S: CatalogSource + 'static,
{
    pub fn new(catalog: Arc<S>) -> Self {
        Self { catalog }
    }

    /// Score a submission and recommend follow-up assessments.
    pub fn submit(
        &self,
        submission: &ScreenerSubmission,
    ) -> Result<ScreeningOutcome, ScreenerServiceError> {
        let catalog = self.catalog.load()?;

        let domain_scores = compute_domain_scores(&submission.answers, &catalog.domain_mapping);
        let results = determine_assessments(&domain_scores, &catalog.assessment_rules);

        debug!(
            answers = submission.answers.len(),
            domains = domain_scores.len(),
            recommended = results.len(),
            "screener submission scored"
        );

        Ok(ScreeningOutcome {
            status: SubmissionStatus::Success,
            domain_scores,
            results,
        })
    }

    /// The questionnaire as configured.
    pub fn form(&self) -> Result<Form, ScreenerServiceError> {
        let catalog = self.catalog.load()?;
        Ok(catalog.form.clone())
    }
}

/// Error raised by the screener service.
#[derive(Debug, thiserror::Error)]
pub enum ScreenerServiceError {
    #[error(transparent)]
    Catalog(#[from] CatalogError),
    #[error("screener task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}
