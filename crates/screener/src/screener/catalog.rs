use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::de::DeserializeOwned;
use tracing::warn;

use super::domain::{AssessmentRules, QuestionDomainMapping};
use super::form::Form;

pub const DOMAIN_MAPPING_FILE: &str = "domain_mapping.json";
pub const ASSESSMENT_RULES_FILE: &str = "assessment_rules.json";
pub const FORM_FILE: &str = "form.json";

/// Immutable questionnaire configuration shared by every request.
#[derive(Debug, Clone, PartialEq)]
pub struct ScreenerCatalog {
    pub domain_mapping: QuestionDomainMapping,
    pub assessment_rules: AssessmentRules,
    pub form: Form,
}

impl ScreenerCatalog {
    pub fn new(
        domain_mapping: QuestionDomainMapping,
        assessment_rules: AssessmentRules,
        form: Form,
    ) -> Self {
        Self {
            domain_mapping,
            assessment_rules,
            form,
        }
    }

    /// Reads the three JSON resources from `dir`, failing on the first one
    /// that is missing or malformed.
    pub fn from_dir(dir: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let dir = dir.as_ref();
        let domain_mapping = read_resource(dir, DOMAIN_MAPPING_FILE)?;
        let assessment_rules = read_resource(dir, ASSESSMENT_RULES_FILE)?;
        let form = read_resource(dir, FORM_FILE)?;

        Ok(Self::new(domain_mapping, assessment_rules, form))
    }
}

fn read_resource<T: DeserializeOwned>(
    dir: &Path,
    resource: &'static str,
) -> Result<T, CatalogError> {
    let path = dir.join(resource);
    let raw = fs::read(&path).map_err(|source| CatalogError::Read {
        resource,
        path: path.clone(),
        source,
    })?;

    serde_json::from_slice(&raw).map_err(|source| CatalogError::Parse {
        resource,
        path,
        source,
    })
}

/// Failure to obtain one of the configuration resources.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("Failed to load {resource}: {source}")]
    Read {
        resource: &'static str,
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to load {resource}: {source}")]
    Parse {
        resource: &'static str,
        path: PathBuf,
        source: serde_json::Error,
    },
}

impl CatalogError {
    pub fn resource(&self) -> &'static str {
        match self {
            CatalogError::Read { resource, .. } | CatalogError::Parse { resource, .. } => resource,
        }
    }
}

/// Supplies the catalog to the service. Implementations decide when the
/// underlying resources are read.
pub trait CatalogSource: Send + Sync {
    fn load(&self) -> Result<Arc<ScreenerCatalog>, CatalogError>;
}

/// Catalog read once up front and handed out for the life of the process.
#[derive(Debug, Clone)]
pub struct PreloadedCatalog {
    catalog: Arc<ScreenerCatalog>,
}

impl PreloadedCatalog {
    pub fn new(catalog: ScreenerCatalog) -> Self {
        Self {
            catalog: Arc::new(catalog),
        }
    }

    pub fn from_dir(dir: impl AsRef<Path>) -> Result<Self, CatalogError> {
        ScreenerCatalog::from_dir(dir).map(Self::new)
    }
}

impl CatalogSource for PreloadedCatalog {
    fn load(&self) -> Result<Arc<ScreenerCatalog>, CatalogError> {
        Ok(Arc::clone(&self.catalog))
    }
}

/// Reads the resources from disk on every call so edits take effect without
/// a restart.
#[derive(Debug, Clone)]
pub struct JsonDirectoryCatalog {
    dir: PathBuf,
}

impl JsonDirectoryCatalog {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

impl CatalogSource for JsonDirectoryCatalog {
    fn load(&self) -> Result<Arc<ScreenerCatalog>, CatalogError> {
        ScreenerCatalog::from_dir(&self.dir)
            .map(Arc::new)
            .inspect_err(|err| {
                warn!(resource = err.resource(), error = %err, "catalog reload failed");
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::screener::tests::common::{sample_catalog, write_catalog, ScratchDir};

    #[test]
    fn from_dir_reads_all_resources() {
        let dir = ScratchDir::new("catalog-complete");
        let expected = sample_catalog();
        write_catalog(&dir, &expected);

        let loaded = ScreenerCatalog::from_dir(dir.path()).expect("catalog loads");

        assert_eq!(loaded, expected);
        assert_eq!(
            loaded.domain_mapping.domain_for("question_h"),
            Some("substance_use")
        );
    }

    #[test]
    fn missing_resource_is_named_in_the_error() {
        let dir = ScratchDir::new("catalog-missing");
        dir.write(
            DOMAIN_MAPPING_FILE,
            r#"[{"question_id": "question_a", "domain": "depression"}]"#,
        );

        let err = ScreenerCatalog::from_dir(dir.path()).expect_err("rules file is absent");

        assert!(matches!(err, CatalogError::Read { .. }));
        assert_eq!(err.resource(), ASSESSMENT_RULES_FILE);
        assert!(err
            .to_string()
            .starts_with("Failed to load assessment_rules.json"));
    }

    #[test]
    fn malformed_resource_reports_parse_error() {
        let dir = ScratchDir::new("catalog-malformed");
        write_catalog(&dir, &sample_catalog());
        dir.write(ASSESSMENT_RULES_FILE, r#"{"depression": {"threshold": "two"}}"#);

        let err = ScreenerCatalog::from_dir(dir.path()).expect_err("rules are malformed");

        assert!(matches!(err, CatalogError::Parse { .. }));
        assert_eq!(err.resource(), ASSESSMENT_RULES_FILE);
    }

    #[test]
    fn duplicate_question_ids_resolve_to_the_last_row() {
        let mapping: QuestionDomainMapping = serde_json::from_str(
            r#"[
                {"question_id": "question_a", "domain": "depression"},
                {"question_id": "question_a", "domain": "anxiety"}
            ]"#,
        )
        .expect("mapping parses");

        assert_eq!(mapping.entries().len(), 2);
        assert_eq!(mapping.domain_for("question_a"), Some("anxiety"));
    }

    #[test]
    fn preloaded_catalog_shares_one_instance() {
        let source = PreloadedCatalog::new(sample_catalog());

        let first = source.load().expect("preloaded");
        let second = source.load().expect("preloaded");

        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn directory_catalog_picks_up_edits() {
        let dir = ScratchDir::new("catalog-reload");
        write_catalog(&dir, &sample_catalog());
        let source = JsonDirectoryCatalog::new(dir.path());

        let before = source.load().expect("initial load");
        assert_eq!(before.assessment_rules["mania"].threshold, 2);

        dir.write(
            ASSESSMENT_RULES_FILE,
            r#"{"mania": {"threshold": 5, "assessment": "ASRM"}}"#,
        );
        let after = source.load().expect("reload");

        assert_eq!(after.assessment_rules["mania"].threshold, 5);
        assert_eq!(after.assessment_rules.len(), 1);
    }
}
