//! Line-count limits for source files.

use crate::error::{EngineError, Result};
use crate::types::FileSizeStatus;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

pub const DEFAULT_WARNING_LIMIT: usize = 700;
pub const DEFAULT_HARD_LIMIT: usize = 1000;

/// Path reported when content was checked in memory
pub const IN_MEMORY_PATH: &str = "memory";

/// Per-file verdict against the limits
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SizeVerdict {
    Safe,
    Warning,
    Violation,
}

impl SizeVerdict {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Safe => "safe",
            Self::Warning => "warning",
            Self::Violation => "violation",
        }
    }
}

/// Line-count thresholds; `warning < hard`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SizeLimits {
    pub warning: usize,
    pub hard: usize,
}

impl Default for SizeLimits {
    fn default() -> Self {
        Self {
            warning: DEFAULT_WARNING_LIMIT,
            hard: DEFAULT_HARD_LIMIT,
        }
    }
}

impl SizeLimits {
    pub fn validate(&self) -> std::result::Result<(), String> {
        if self.warning == 0 || self.hard == 0 {
            return Err("file size limits must be > 0".to_string());
        }
        if self.warning >= self.hard {
            return Err(format!(
                "warning limit ({}) must be below hard limit ({})",
                self.warning, self.hard
            ));
        }
        Ok(())
    }

    pub fn verdict(&self, line_count: usize) -> SizeVerdict {
        if line_count >= self.hard {
            SizeVerdict::Violation
        } else if line_count >= self.warning {
            SizeVerdict::Warning
        } else {
            SizeVerdict::Safe
        }
    }
}

/// What to measure. Content wins over path when both are present.
#[derive(Debug, Clone, Default)]
pub struct FileSizeInput<'a> {
    pub file_path: Option<&'a str>,
    pub file_content: Option<&'a str>,
    pub limits: SizeLimits,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileSizeReport {
    pub file_path: String,
    pub line_count: usize,
    pub status: SizeVerdict,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required_action: Option<String>,
}

/// Newline-split line count; the empty string is one (empty) line.
pub fn count_lines(content: &str) -> usize {
    content.split('\n').count()
}

pub fn check(input: &FileSizeInput<'_>) -> Result<FileSizeReport> {
    let (file_path, line_count) = match (input.file_content, input.file_path) {
        (Some(content), path) => (
            path.unwrap_or(IN_MEMORY_PATH).to_string(),
            count_lines(content),
        ),
        (None, Some(path)) => (path.to_string(), count_file_lines(Path::new(path))?),
        (None, None) => {
            return Err(EngineError::missing_input(
                "either filePath or fileContent must be provided",
            ))
        }
    };

    Ok(report(file_path, line_count, &input.limits))
}

/// Measure a file on disk
pub fn check_path(path: &Path, limits: &SizeLimits) -> Result<FileSizeReport> {
    let line_count = count_file_lines(path)?;
    Ok(report(path.display().to_string(), line_count, limits))
}

fn count_file_lines(path: &Path) -> Result<usize> {
    let content = fs::read_to_string(path).map_err(|source| EngineError::FileRead {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(count_lines(&content))
}

fn report(file_path: String, line_count: usize, limits: &SizeLimits) -> FileSizeReport {
    let status = limits.verdict(line_count);
    let required_action = match status {
        SizeVerdict::Violation => Some(format!(
            "MANDATORY REFACTORING: File exceeds hard limit of {} lines. Cannot add new code without refactoring.",
            limits.hard
        )),
        SizeVerdict::Warning => Some(format!(
            "Warning: File approaching limit ({line_count}/{}). Consider refactoring soon.",
            limits.hard
        )),
        SizeVerdict::Safe => None,
    };

    FileSizeReport {
        file_path,
        line_count,
        status,
        required_action,
    }
}

/// Plain-text summary: File / Lines / Status / Action
pub fn status_summary(report: &FileSizeReport) -> String {
    let mut summary = format!(
        "File: {}\nLines: {}\nStatus: {}\n",
        report.file_path,
        report.line_count,
        report.status.as_str().to_uppercase()
    );
    if let Some(action) = &report.required_action {
        summary.push_str(&format!("Action: {action}\n"));
    }
    summary
}

/// Request-level status of a set of files. Unreadable files are skipped.
pub fn aggregate_status(paths: &[String], limits: &SizeLimits) -> FileSizeStatus {
    let mut status = FileSizeStatus::Safe;
    for path in paths {
        match check_path(Path::new(path), limits) {
            Ok(report) => match report.status {
                SizeVerdict::Violation => return FileSizeStatus::Violation,
                SizeVerdict::Warning => status = FileSizeStatus::Approaching,
                SizeVerdict::Safe => {}
            },
            Err(err) => log::debug!("size probe skipped {path}: {err}"),
        }
    }
    status
}
