use std::collections::BTreeSet;

use super::domain::{AssessmentRules, DomainScores};

/// Recommends the follow-up assessments whose domain threshold was reached.
///
/// A score equal to the threshold triggers the rule. Domains without a rule are
/// ignored. Names are deduplicated and returned in lexicographic order.
pub fn determine_assessments(scores: &DomainScores, rules: &AssessmentRules) -> Vec<String> {
    let recommended: BTreeSet<&str> = scores
        .iter()
        .filter_map(|(domain, score)| {
            rules
                .get(domain)
                .filter(|rule| rule.is_triggered_by(*score))
                .map(|rule| rule.assessment.as_str())
        })
        .collect();

    recommended.into_iter().map(str::to_string).collect()
}
