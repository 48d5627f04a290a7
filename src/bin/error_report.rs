use std::fs;
use std::path::{Path, PathBuf};

use clap::{Parser, ValueEnum};
use phonerr_rs::{
    build_report, EvalConfig, EvaluationReport, EvaluatorBuilder, LabelSet, ReportOptions,
};
use tracing_subscriber::EnvFilter;

#[path = "error_report/json_report_formatter.rs"]
mod json_report_formatter;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum ErrorTypeScope {
    /// Cluster over every token.
    All,
    /// Cluster over phone tokens only.
    Phones,
    /// Cluster over tone tokens only.
    Tones,
}

#[derive(Debug, Parser)]
#[command(name = "error_report")]
#[command(about = "Score recognized phone/tone sequences against references")]
struct Args {
    /// Recognized sequences, one whitespace-tokenized utterance per line.
    #[arg(long, env = "PHONERR_HYPS")]
    hyps: PathBuf,
    /// Reference sequences, line-aligned with --hyps.
    #[arg(long, env = "PHONERR_REFS")]
    refs: PathBuf,
    /// JSON file with `phones`, `tones` and optionally `confusion_min_count`.
    #[arg(long, env = "PHONERR_CONFIG")]
    config: Option<PathBuf>,
    /// Report path; the report goes to stdout when omitted.
    #[arg(long, env = "PHONERR_OUT")]
    out: Option<PathBuf>,
    /// Symbol to report per-symbol rates for; repeatable.
    #[arg(long = "symbol", env = "PHONERR_SYMBOLS", value_delimiter = ',')]
    symbols: Vec<String>,
    #[arg(
        long,
        env = "PHONERR_ERROR_TYPES",
        value_enum,
        default_value_t = ErrorTypeScope::All
    )]
    error_types: ErrorTypeScope,
    /// Overrides the config's confusion row threshold.
    #[arg(long, env = "PHONERR_CONFUSION_MIN_COUNT")]
    confusion_min_count: Option<usize>,
}

fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    if let Err(err) = run() {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), String> {
    let args = Args::parse();

    let mut config = match args.config.as_ref() {
        Some(path) => {
            require_path_exists(path, "Missing --config path.")?;
            EvalConfig::load(path).map_err(|err| err.to_string())?
        }
        None => EvalConfig::default(),
    };
    if let Some(min_count) = args.confusion_min_count {
        config.confusion_min_count = min_count;
    }

    let hyps = load_token_lines(&args.hyps, "--hyps")?;
    let refs = load_token_lines(&args.refs, "--refs")?;
    if hyps.len() != refs.len() {
        return Err(format!(
            "'{}' has {} lines but '{}' has {}; hypotheses and references must pair line by line.",
            args.hyps.display(),
            hyps.len(),
            args.refs.display(),
            refs.len()
        ));
    }
    if refs.is_empty() {
        return Err("No utterances to score.".to_string());
    }

    let error_type_labels = scope_labels(args.error_types, &config);
    let evaluator = EvaluatorBuilder::new(config).build();
    let options = ReportOptions {
        symbols: args.symbols,
        error_type_labels,
    };
    let report = build_report(&evaluator, &hyps, &refs, &options).map_err(|err| err.to_string())?;
    log_summary(&report);

    match args.out.as_ref() {
        Some(path) => {
            json_report_formatter::write_report(path, &report)?;
            tracing::info!(path = %path.display(), "wrote error report");
            Ok(())
        }
        None => json_report_formatter::print_report(&report),
    }
}

fn scope_labels(scope: ErrorTypeScope, config: &EvalConfig) -> Option<LabelSet> {
    match scope {
        ErrorTypeScope::All => None,
        ErrorTypeScope::Phones => Some(config.phones.clone()),
        ErrorTypeScope::Tones => Some(config.tones.clone()),
    }
}

fn load_token_lines(path: &Path, flag: &str) -> Result<Vec<Vec<String>>, String> {
    require_path_exists(path, &format!("Missing {flag} path."))?;
    let contents = fs::read_to_string(path)
        .map_err(|err| format!("Failed to read {flag} file '{}': {err}", path.display()))?;
    Ok(contents
        .lines()
        .map(|line| line.split_whitespace().map(str::to_string).collect())
        .collect())
}

fn log_summary(report: &EvaluationReport) {
    tracing::info!(
        utterances = report.meta.utterance_count,
        ler = ?report.rates.label_error_rate,
        per = ?report.rates.phone_error_rate,
        ter = ?report.rates.tone_error_rate,
        undefined = report.rates.notes.len(),
        error_types = report.error_types.ranked.len(),
        "scored batch"
    );
}

fn require_path_exists(path: &Path, message: &str) -> Result<(), String> {
    if path.exists() {
        return Ok(());
    }
    Err(format!("{message} Missing path: {}", path.display()))
}
