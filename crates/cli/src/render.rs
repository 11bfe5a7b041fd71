//! Plain-text output for terminal use; `--json` bypasses this module.

use vault_core::models::{BatchRetagSummary, ClassificationResult, FileRecord, RetagOutcome};

pub fn file_line(file: &FileRecord) -> String {
    let tags = if file.tags.is_empty() {
        "-".to_string()
    } else {
        file.tags.join(", ")
    };
    format!(
        "{:>6}  {:<18}  {}  [{}]",
        file.id, file.category, file.file_name, tags
    )
}

pub fn classification_line(file_id: i64, result: &ClassificationResult) -> String {
    let mut line = format!(
        "file {}: {} [{}]",
        file_id,
        result.category,
        result.tags.join(", ")
    );
    if let Some(err) = &result.error {
        line.push_str(&format!(" (error: {err})"));
    }
    line
}

pub fn summary_line(summary: &BatchRetagSummary) -> String {
    let mut line = format!("retag: tagged {} of {}", summary.tagged, summary.total);
    if let Some(err) = &summary.first_error {
        line.push_str(&format!(", first error: {err}"));
    }
    line
}

pub fn retag_line(outcome: &RetagOutcome) -> String {
    match outcome {
        RetagOutcome::Success(summary) => summary_line(summary),
        RetagOutcome::Failure(reason) => format!("retag failed: {reason}"),
    }
}
