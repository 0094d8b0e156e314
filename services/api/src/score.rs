use clap::Args;
use screener::config::AppConfig;
use screener::error::AppError;
use screener::screener::{
    Form, PreloadedCatalog, ScreenerService, ScreenerSubmission, ScreeningOutcome,
};
use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

#[derive(Args, Debug)]
pub(crate) struct ScoreArgs {
    /// JSON file shaped like the submit request: {"answers": [{"question_id", "value"}]}
    #[arg(long)]
    pub(crate) answers: PathBuf,
    /// Directory holding the screener JSON resources (defaults to SCREENER_DATA_DIR)
    #[arg(long)]
    pub(crate) data_dir: Option<PathBuf>,
    /// Print the HTTP response body instead of a readable summary
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args, Debug, Default)]
pub(crate) struct FormArgs {
    /// Directory holding the screener JSON resources (defaults to SCREENER_DATA_DIR)
    #[arg(long)]
    pub(crate) data_dir: Option<PathBuf>,
    /// List question ids and prompts instead of printing the raw form
    #[arg(long)]
    pub(crate) questions: bool,
}

pub(crate) fn run_score(args: ScoreArgs) -> Result<(), AppError> {
    let ScoreArgs {
        answers,
        data_dir,
        json,
    } = args;

    let service = offline_service(data_dir)?;
    let outcome = score_file(&service, &answers)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&outcome)?);
    } else {
        print!("{}", render_outcome(&outcome));
    }

    Ok(())
}

pub(crate) fn run_form(args: FormArgs) -> Result<(), AppError> {
    let FormArgs {
        data_dir,
        questions,
    } = args;

    let form = offline_service(data_dir)?.form()?;

    if questions {
        print!("{}", render_questions(&form));
    } else {
        println!("{}", serde_json::to_string_pretty(&form)?);
    }

    Ok(())
}

fn offline_service(
    data_dir: Option<PathBuf>,
) -> Result<ScreenerService<PreloadedCatalog>, AppError> {
    let data_dir = match data_dir {
        Some(dir) => dir,
        None => AppConfig::load()?.catalog.data_dir,
    };
    let catalog = PreloadedCatalog::from_dir(data_dir)?;
    Ok(ScreenerService::new(Arc::new(catalog)))
}

pub(crate) fn score_file(
    service: &ScreenerService<PreloadedCatalog>,
    path: &Path,
) -> Result<ScreeningOutcome, AppError> {
    let raw = fs::read(path)?;
    let submission: ScreenerSubmission = serde_json::from_slice(&raw)?;
    Ok(service.submit(&submission)?)
}

pub(crate) fn render_outcome(outcome: &ScreeningOutcome) -> String {
    let mut out = String::new();

    if outcome.domain_scores.is_empty() {
        out.push_str("Domain scores: none (no answers matched a domain)\n");
    } else {
        out.push_str("Domain scores\n");
        for (domain, score) in &outcome.domain_scores {
            let _ = writeln!(out, "- {domain}: {score}");
        }
    }

    if outcome.results.is_empty() {
        out.push_str("\nRecommended assessments: none\n");
    } else {
        out.push_str("\nRecommended assessments\n");
        for assessment in &outcome.results {
            let _ = writeln!(out, "- {assessment}");
        }
    }

    out
}

fn render_questions(form: &Form) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{} ({})",
        form.full_name().unwrap_or_default(),
        form.display_name().unwrap_or_default()
    );
    for question in form.questions() {
        let _ = writeln!(out, "- {}: {}", question.question_id, question.title);
    }
    out
}
