use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

/// A single answered question as submitted by the respondent.
///
/// `value` is taken as-is: the questionnaire offers 0..=4 but nothing here
/// enforces that range. It must fit in an `i64`; larger JSON integers are
/// rejected when the request body is deserialized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Answer {
    pub question_id: String,
    pub value: i64,
}

impl Answer {
    pub fn new(question_id: impl Into<String>, value: i64) -> Self {
        Self {
            question_id: question_id.into(),
            value,
        }
    }
}

/// Request body accepted by the submit operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScreenerSubmission {
    pub answers: Vec<Answer>,
}

/// Per-domain totals for one submission. Only domains hit by at least one
/// mapped answer are present.
///
/// Totals are `i128` so that summing any realistic number of `i64` answers is
/// exact and therefore independent of answer order.
pub type DomainScores = BTreeMap<String, i128>;

/// One row of `domain_mapping.json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DomainMappingEntry {
    pub question_id: String,
    pub domain: String,
}

/// Ordered question-to-domain table with a lookup index built at construction.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QuestionDomainMapping {
    entries: Vec<DomainMappingEntry>,
    index: HashMap<String, String>,
}

impl QuestionDomainMapping {
    pub fn new(entries: Vec<DomainMappingEntry>) -> Self {
        // Later rows overwrite earlier ones for a repeated question id.
        let index = entries
            .iter()
            .map(|entry| (entry.question_id.clone(), entry.domain.clone()))
            .collect();
        Self { entries, index }
    }

    pub fn domain_for(&self, question_id: &str) -> Option<&str> {
        self.index.get(question_id).map(String::as_str)
    }

    pub fn entries(&self) -> &[DomainMappingEntry] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<DomainMappingEntry> for QuestionDomainMapping {
    fn from_iter<I: IntoIterator<Item = DomainMappingEntry>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl Serialize for QuestionDomainMapping {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        self.entries.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for QuestionDomainMapping {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        Vec::<DomainMappingEntry>::deserialize(deserializer).map(Self::new)
    }
}

/// Threshold and follow-up instrument configured for a single domain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssessmentRule {
    pub threshold: i64,
    pub assessment: String,
}

impl AssessmentRule {
    /// The threshold is an inclusive lower bound.
    pub fn is_triggered_by(&self, score: i128) -> bool {
        score >= i128::from(self.threshold)
    }
}

/// `assessment_rules.json`: at most one rule per domain.
pub type AssessmentRules = BTreeMap<String, AssessmentRule>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubmissionStatus {
    Success,
}

/// Response body of the submit operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScreeningOutcome {
    pub status: SubmissionStatus,
    pub domain_scores: DomainScores,
    pub results: Vec<String>,
}
