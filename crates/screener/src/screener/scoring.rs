use super::domain::{Answer, DomainScores, QuestionDomainMapping};

/// Sums answer values per domain.
///
/// Answers whose question id is not in `mapping` are skipped without error and
/// leave no trace in the result. Repeated question ids all count.
pub fn compute_domain_scores(answers: &[Answer], mapping: &QuestionDomainMapping) -> DomainScores {
    let mut scores = DomainScores::new();

    for answer in answers {
        let Some(domain) = mapping.domain_for(&answer.question_id) else {
            continue;
        };

        *scores.entry(domain.to_string()).or_insert(0) += i128::from(answer.value);
    }

    scores
}
