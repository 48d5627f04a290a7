use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use libtest_mimic::{Arguments, Failed, Trial};
use phonerr_rs::{
    align, batch_error_rate, rate_or_sentinel, Arrow, EvalConfig, EvalError, EvaluatorBuilder,
    LabelSet,
};
use serde::Deserialize;

const SUITE_NAME: &str = "error_rate_reference_cases";
const RATE_TOLERANCE: f64 = 1e-12;

#[derive(Debug, Deserialize)]
struct ReferenceCase {
    id: String,
    refs: Vec<String>,
    hyps: Vec<String>,
    #[serde(default)]
    labels: Option<Vec<String>>,
    /// Expected arrows of the first utterance pair.
    #[serde(default)]
    alignment: Option<Vec<(String, String)>>,
    expected: Expected,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Expected {
    Rate { rate: f64 },
    Error { error: String },
}

fn main() {
    let args = Arguments::from_args();
    let repo_root = PathBuf::from(env!("CARGO_MANIFEST_DIR"));

    let cases = match load_cases(&repo_root.join("test-data/error_rate_cases.json")) {
        Ok(cases) => cases,
        Err(err) => {
            run_setup_failure(&args, err);
            return;
        }
    };
    if cases.is_empty() {
        run_setup_failure(
            &args,
            "No cases found in test-data/error_rate_cases.json.".to_string(),
        );
        return;
    }

    let tests = cases
        .into_iter()
        .map(|case| {
            let test_name = format!("{SUITE_NAME}::{}", case.id);
            Trial::test(test_name, move || run_reference_case(&case).map_err(Failed::from))
        })
        .collect();
    libtest_mimic::run(&args, tests).exit();
}

fn run_setup_failure(args: &Arguments, message: String) {
    let test = Trial::test(format!("{SUITE_NAME}::setup"), move || {
        Err(Failed::from(message))
    });
    libtest_mimic::run(args, vec![test]).exit();
}

fn run_reference_case(case: &ReferenceCase) -> Result<(), String> {
    let refs = tokenize(&case.refs);
    let hyps = tokenize(&case.hyps);
    let labels = case.labels.as_ref().map(|labels| LabelSet::new(labels.iter()));

    if let Some(expected) = case.alignment.as_ref() {
        compare_alignment(case, &refs, &hyps, expected)?;
    }

    let free = rate_or_sentinel(batch_error_rate(&hyps, &refs, labels.as_ref()));
    compare_outcome(case, "batch_error_rate", free)?;

    let evaluator = EvaluatorBuilder::new(EvalConfig::default()).build();
    let pipelined = rate_or_sentinel(evaluator.error_rate(&hyps, &refs, labels.as_ref()));
    compare_outcome(case, "Evaluator::error_rate", pipelined)
}

fn compare_alignment(
    case: &ReferenceCase,
    refs: &[Vec<String>],
    hyps: &[Vec<String>],
    expected: &[(String, String)],
) -> Result<(), String> {
    let (Some(reference), Some(hypothesis)) = (refs.first(), hyps.first()) else {
        return Err(format!("{}: alignment fixture needs one utterance", case.id));
    };
    let observed = align(reference, hypothesis)
        .map_err(|err| format!("{}: align() failed: {err}", case.id))?;
    let expected: Vec<Arrow> = expected
        .iter()
        .map(|(reference, hypothesis)| {
            Arrow::new(reference.as_str(), hypothesis.as_str())
                .map_err(|err| format!("{}: bad fixture arrow: {err}", case.id))
        })
        .collect::<Result<_, _>>()?;
    if observed != expected {
        return Err(format!(
            "{}: alignment mismatch (expected [{}], got [{}])",
            case.id,
            render(&expected),
            render(&observed)
        ));
    }
    Ok(())
}

fn compare_outcome(
    case: &ReferenceCase,
    source: &str,
    observed: Result<f64, EvalError>,
) -> Result<(), String> {
    match (&case.expected, observed) {
        (Expected::Rate { rate }, Ok(value)) => {
            if (rate - value).abs() > RATE_TOLERANCE {
                return Err(format!(
                    "{}: {source} expected rate {rate}, got {value}",
                    case.id
                ));
            }
            Ok(())
        }
        (Expected::Error { error }, Err(err)) => {
            if error_name(&err) != error.as_str() {
                return Err(format!(
                    "{}: {source} expected {error} error, got {err}",
                    case.id
                ));
            }
            Ok(())
        }
        (Expected::Rate { rate }, Err(err)) => Err(format!(
            "{}: {source} expected rate {rate}, got error: {err}",
            case.id
        )),
        (Expected::Error { error }, Ok(value)) => Err(format!(
            "{}: {source} expected {error} error, got rate {value}",
            case.id
        )),
    }
}

fn error_name(err: &EvalError) -> &'static str {
    match err {
        EvalError::Io { .. } => "io",
        EvalError::Json { .. } => "json",
        EvalError::InvalidInput { .. } => "invalid_input",
        EvalError::UndefinedRate { .. } => "undefined_rate",
        EvalError::EmptyAfterFilter { .. } => "empty_after_filter",
    }
}

fn render(alignment: &[Arrow]) -> String {
    alignment
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

fn tokenize(lines: &[String]) -> Vec<Vec<String>> {
    lines
        .iter()
        .map(|line| line.split_whitespace().map(str::to_string).collect())
        .collect()
}

fn load_cases(path: &Path) -> Result<Vec<ReferenceCase>, String> {
    if !path.exists() {
        return Err(format!(
            "Missing reference case fixture. Missing path: {}",
            path.display()
        ));
    }
    let file = File::open(path)
        .map_err(|err| format!("Failed to open fixture '{}': {err}", path.display()))?;
    serde_json::from_reader(BufReader::new(file))
        .map_err(|err| format!("Failed to parse fixture '{}': {err}", path.display()))
}
