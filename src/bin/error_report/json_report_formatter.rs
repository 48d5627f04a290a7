use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::Path;

use phonerr_rs::EvaluationReport;

/// Writes `report` as pretty JSON to `path`, creating missing parent directories.
pub fn write_report(path: &Path, report: &EvaluationReport) -> Result<(), String> {
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|err| {
            format!(
                "Failed to create report directory '{}': {err}",
                parent.display()
            )
        })?;
    }

    let file = File::create(path)
        .map_err(|err| format!("Failed to create report file '{}': {err}", path.display()))?;
    write_json(BufWriter::new(file), report)
        .map_err(|err| format!("Failed to write report '{}': {err}", path.display()))
}

pub fn print_report(report: &EvaluationReport) -> Result<(), String> {
    write_json(io::stdout().lock(), report)
        .map_err(|err| format!("Failed to write report to stdout: {err}"))
}

fn write_json<W: Write>(mut writer: W, report: &EvaluationReport) -> io::Result<()> {
    serde_json::to_writer_pretty(&mut writer, report)?;
    writeln!(writer)?;
    writer.flush()
}
