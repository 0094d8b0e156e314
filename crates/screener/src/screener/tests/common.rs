use std::fs;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use axum::response::Response;
use serde_json::{json, Value};
use tempfile::TempDir;

use crate::screener::catalog::{
    CatalogError, CatalogSource, ScreenerCatalog, ASSESSMENT_RULES_FILE, DOMAIN_MAPPING_FILE,
    FORM_FILE,
};
use crate::screener::domain::{
    Answer, AssessmentRule, AssessmentRules, DomainMappingEntry, DomainScores,
    QuestionDomainMapping, ScreenerSubmission,
};
use crate::screener::form::Form;
use crate::screener::{screener_router, PreloadedCatalog, ScreenerService};

pub(crate) fn answers(pairs: &[(&str, i64)]) -> Vec<Answer> {
    pairs
        .iter()
        .map(|(question_id, value)| Answer::new(*question_id, *value))
        .collect()
}

pub(crate) fn submission(pairs: &[(&str, i64)]) -> ScreenerSubmission {
    ScreenerSubmission {
        answers: answers(pairs),
    }
}

pub(crate) fn scores(pairs: &[(&str, i64)]) -> DomainScores {
    pairs
        .iter()
        .map(|(domain, score)| (domain.to_string(), i128::from(*score)))
        .collect()
}

pub(crate) fn sample_mapping() -> QuestionDomainMapping {
    [
        ("question_a", "depression"),
        ("question_b", "depression"),
        ("question_c", "mania"),
        ("question_d", "mania"),
        ("question_e", "anxiety"),
        ("question_f", "anxiety"),
        ("question_g", "anxiety"),
        ("question_h", "substance_use"),
    ]
    .into_iter()
    .map(|(question_id, domain)| DomainMappingEntry {
        question_id: question_id.to_string(),
        domain: domain.to_string(),
    })
    .collect()
}

pub(crate) fn sample_rules() -> AssessmentRules {
    [
        ("depression", 2, "PHQ-9"),
        ("mania", 2, "ASRM"),
        ("anxiety", 2, "PHQ-9"),
        ("substance_use", 1, "ASSIST"),
    ]
    .into_iter()
    .map(|(domain, threshold, assessment)| {
        (
            domain.to_string(),
            AssessmentRule {
                threshold,
                assessment: assessment.to_string(),
            },
        )
    })
    .collect()
}

pub(crate) fn sample_form() -> Form {
    let answers: Vec<Value> = [
        "Not at all",
        "Rare, less than a day or two",
        "Several days",
        "More than half the days",
        "Nearly every day",
    ]
    .into_iter()
    .zip(0..)
    .map(|(title, value)| json!({"title": title, "value": value}))
    .collect();

    let questions: Vec<Value> = sample_mapping()
        .entries()
        .iter()
        .map(|entry| {
            json!({
                "question_id": entry.question_id,
                "title": format!("Prompt for {}", entry.question_id),
            })
        })
        .collect();

    Form::try_from(json!({
        "id": "abcd-123",
        "name": "BPDS",
        "disorder": "Cross-Cutting",
        "full_name": "Blueprint Diagnostic Screener",
        "content": {
            "display_name": "BDS",
            "sections": [{
                "type": "standard",
                "title": "During the past TWO (2) WEEKS",
                "answers": answers,
                "questions": questions,
            }],
        },
    }))
    .expect("sample form is complete")
}

pub(crate) fn sample_catalog() -> ScreenerCatalog {
    ScreenerCatalog::new(sample_mapping(), sample_rules(), sample_form())
}

pub(crate) fn build_service() -> ScreenerService<PreloadedCatalog> {
    ScreenerService::new(Arc::new(PreloadedCatalog::new(sample_catalog())))
}

pub(crate) fn screener_router_with_service<S>(service: ScreenerService<S>) -> axum::Router
where
    S: CatalogSource + 'static,
{
    screener_router(Arc::new(service))
}

/// Source that always fails as if `assessment_rules.json` were unreadable.
pub(crate) struct UnavailableCatalog;

impl CatalogSource for UnavailableCatalog {
    fn load(&self) -> Result<Arc<ScreenerCatalog>, CatalogError> {
        Err(CatalogError::Read {
            resource: "assessment_rules.json",
            path: "/nonexistent/assessment_rules.json".into(),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "file not found"),
        })
    }
}

/// Counts loads so tests can assert how often the catalog is consulted.
#[derive(Default)]
pub(crate) struct CountingCatalog {
    pub(crate) loads: AtomicUsize,
}

impl CatalogSource for CountingCatalog {
    fn load(&self) -> Result<Arc<ScreenerCatalog>, CatalogError> {
        self.loads.fetch_add(1, Ordering::Relaxed);
        Ok(Arc::new(sample_catalog()))
    }
}

/// Temporary directory holding catalog resources for a single test.
pub(crate) struct ScratchDir {
    inner: TempDir,
}

impl ScratchDir {
    pub(crate) fn new(prefix: &str) -> Self {
        let inner = tempfile::Builder::new()
            .prefix(prefix)
            .tempdir()
            .expect("temp dir created");
        Self { inner }
    }

    pub(crate) fn path(&self) -> &Path {
        self.inner.path()
    }

    pub(crate) fn write(&self, name: &str, contents: &str) {
        fs::write(self.inner.path().join(name), contents).expect("resource written");
    }
}

/// Writes `catalog` into `dir` as the three JSON resources.
pub(crate) fn write_catalog(dir: &ScratchDir, catalog: &ScreenerCatalog) {
    dir.write(
        DOMAIN_MAPPING_FILE,
        &serde_json::to_string(&catalog.domain_mapping).expect("mapping serializes"),
    );
    dir.write(
        ASSESSMENT_RULES_FILE,
        &serde_json::to_string(&catalog.assessment_rules).expect("rules serialize"),
    );
    dir.write(
        FORM_FILE,
        &serde_json::to_string(&catalog.form).expect("form serializes"),
    );
}

pub(crate) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
