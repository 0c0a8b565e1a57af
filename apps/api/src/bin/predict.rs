//! Command-line prediction: `predict <score> <coverLetter>`.
//!
//! Prints the bare label on success, or a single `Error: ...` line otherwise.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{error::ErrorKind, Parser};

use applicant_fit::errors::AppError;
use applicant_fit::pipeline::store::{self, DEFAULT_MODEL_PATH};
use applicant_fit::prediction::input::{predict_raw, RawScore};
use applicant_fit::telemetry::init_tracing;

#[derive(Parser, Debug)]
#[command(
    name = "predict",
    version,
    about = "Classify an applicant as Fit / Moderate / Not Fit"
)]
struct Args {
    /// Applicant score from 0 to 100, optionally with a trailing "%"
    #[arg(allow_hyphen_values = true)]
    score: Option<String>,

    /// Cover letter text
    #[arg(allow_hyphen_values = true)]
    cover_letter: Option<String>,

    /// Path to the trained model artifact
    #[arg(long, env = "MODEL_PATH", default_value = DEFAULT_MODEL_PATH)]
    model: PathBuf,
}

fn run(args: Args) -> Result<String, AppError> {
    let (Some(score), Some(cover_letter)) = (args.score, args.cover_letter) else {
        return Err(AppError::Validation(
            "Missing input arguments. Expected: <score> <coverLetter>".to_string(),
        ));
    };

    let model = store::load(&args.model)?;
    predict_raw(&model, &RawScore::Text(score), &cover_letter)
}

/// First line of a clap error, without the `error: ` prefix.
fn usage_error_line(e: &clap::Error) -> String {
    let rendered = e.to_string();
    let first = rendered.lines().next().unwrap_or_default();
    first.strip_prefix("error: ").unwrap_or(first).to_string()
}

fn main() -> ExitCode {
    dotenvy::dotenv().ok();

    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            e.exit()
        }
        Err(e) => {
            println!("Error: {}", usage_error_line(&e));
            return ExitCode::FAILURE;
        }
    };

    init_tracing("warn");

    match run(args) {
        Ok(label) => {
            println!("{label}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            println!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use applicant_fit::errors::ModelError;
    use applicant_fit::pipeline::dataset::builtin_examples;
    use applicant_fit::pipeline::forest::ForestParams;
    use applicant_fit::pipeline::FitPipeline;

    fn args(score: Option<&str>, cover_letter: Option<&str>, model: PathBuf) -> Args {
        Args {
            score: score.map(str::to_string),
            cover_letter: cover_letter.map(str::to_string),
            model,
        }
    }

    fn saved_model(dir: &tempfile::TempDir) -> PathBuf {
        let path = dir.path().join("model.json");
        let model = FitPipeline::train(&builtin_examples(), &ForestParams::default()).unwrap();
        store::save(&path, &model).unwrap();
        path
    }

    #[test]
    fn test_cli_parses_positionals() {
        let argv = ["predict", "85%", "I know Rust", "--model", "m.json"];
        let parsed = Args::try_parse_from(argv).unwrap();
        assert_eq!(parsed.score.as_deref(), Some("85%"));
        assert_eq!(parsed.cover_letter.as_deref(), Some("I know Rust"));
        assert_eq!(parsed.model, PathBuf::from("m.json"));
    }

    #[test]
    fn test_cli_accepts_negative_score_as_value() {
        let parsed = Args::try_parse_from(["predict", "-5", "text"]).unwrap();
        assert_eq!(parsed.score.as_deref(), Some("-5"));
    }

    #[test]
    fn test_cli_accepts_cover_letter_starting_with_dash() {
        let parsed = Args::try_parse_from(["predict", "90", "-5 years of Rust"]).unwrap();
        assert_eq!(parsed.cover_letter.as_deref(), Some("-5 years of Rust"));

        let parsed =
            Args::try_parse_from(["predict", "90", "-- not a flag, just my letter"]).unwrap();
        assert_eq!(
            parsed.cover_letter.as_deref(),
            Some("-- not a flag, just my letter")
        );
    }

    #[test]
    fn test_usage_error_names_offending_argument() {
        let err = Args::try_parse_from(["predict", "90", "text", "extra"]).unwrap_err();
        let line = usage_error_line(&err);
        assert!(line.contains("extra"), "got {line:?}");
        assert!(!line.contains('\n'));
        assert!(!line.starts_with("error:"));
    }

    #[test]
    fn test_cli_scenarios() {
        let dir = tempfile::tempdir().unwrap();
        let path = saved_model(&dir);

        let label = run(args(
            Some("90"),
            Some("I have 5 years of experience in MERN stack."),
            path.clone(),
        ))
        .unwrap();
        assert_eq!(label, "Fit");

        let label = run(args(Some("30%"), Some("I have no experience."), path.clone())).unwrap();
        assert_eq!(label, "Not Fit");

        let err = run(args(Some("150"), Some("anything"), path)).unwrap_err();
        assert_eq!(err.to_string(), "Score must be between 0 and 100.");
    }

    #[test]
    fn test_missing_arguments_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = saved_model(&dir);
        let err = run(args(Some("90"), None, path)).unwrap_err();
        assert!(err.to_string().contains("Missing input arguments"));
    }

    #[test]
    fn test_missing_artifact_refuses_to_run() {
        let dir = tempfile::tempdir().unwrap();
        let err = run(args(Some("90"), Some("text"), dir.path().join("none.json"))).unwrap_err();
        assert!(matches!(err, AppError::Model(ModelError::ArtifactMissing(_))));
    }
}
