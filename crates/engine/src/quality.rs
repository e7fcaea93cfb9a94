//! Staged quality gates.
//!
//! Every evaluation builds a five-part [`QualityMetrics`] breakdown, folds it
//! into one weighted score and derives a stage-specific status. Each sub-score
//! comes from a [`MetricScorer`], so measured analyzers can replace the fixed
//! placeholders without touching the aggregation.

use crate::error::{EngineError, Result};
use crate::file_size::{check_path, SizeLimits, SizeVerdict};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

/// Score at or above which a gate passes
pub const PASS_THRESHOLD: u32 = 70;
/// Score at or above which the pre stage passes with warnings
pub const WARN_THRESHOLD: u32 = 50;
/// Lines added in one change before the during stage warns
pub const LARGE_CHANGE_LINES: u64 = 100;
/// Sub-score for a file that could not be read
pub const UNREADABLE_FILE_SCORE: f64 = 50.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    Pre,
    During,
    Post,
}

impl Stage {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pre => "pre",
            Self::During => "during",
            Self::Post => "post",
        }
    }

    /// Tag recorded in `passed_gates`
    pub const fn gate_tag(self) -> &'static str {
        match self {
            Self::Pre => "pre-implementation",
            Self::During => "during-implementation",
            Self::Post => "post-implementation",
        }
    }
}

impl FromStr for Stage {
    type Err = EngineError;

    fn from_str(raw: &str) -> Result<Self> {
        match raw.trim() {
            "pre" => Ok(Self::Pre),
            "during" => Ok(Self::During),
            "post" => Ok(Self::Post),
            other => Err(EngineError::UnknownStage(other.to_string())),
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ScoreStatus {
    Excellent,
    Good,
    Acceptable,
    NeedsImprovement,
    Poor,
}

impl ScoreStatus {
    pub fn from_score(score: f64) -> Self {
        if score >= 90.0 {
            Self::Excellent
        } else if score >= 80.0 {
            Self::Good
        } else if score >= 70.0 {
            Self::Acceptable
        } else if score >= 50.0 {
            Self::NeedsImprovement
        } else {
            Self::Poor
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Excellent => "excellent",
            Self::Good => "good",
            Self::Acceptable => "acceptable",
            Self::NeedsImprovement => "needs-improvement",
            Self::Poor => "poor",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Critical,
    Warning,
    Info,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QualityIssue {
    #[serde(rename = "type")]
    pub kind: String,
    pub severity: Severity,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QualityScore {
    /// 0..=100
    pub score: f64,
    /// 0..=1
    pub weight: f64,
    pub status: ScoreStatus,
    #[serde(default)]
    pub issues: Vec<QualityIssue>,
}

impl QualityScore {
    /// Score with its status bucket derived from the value
    pub fn new(score: f64, weight: f64) -> Self {
        Self {
            score,
            weight,
            status: ScoreStatus::from_score(score),
            issues: Vec::new(),
        }
    }

    fn has_critical(&self) -> bool {
        self.issues
            .iter()
            .any(|issue| issue.severity == Severity::Critical)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QualityMetrics {
    pub file_size: QualityScore,
    pub cleanliness: QualityScore,
    pub maintainability: QualityScore,
    pub performance: QualityScore,
    pub documentation: QualityScore,
}

impl QualityMetrics {
    pub fn iter(&self) -> impl Iterator<Item = &QualityScore> {
        [
            &self.file_size,
            &self.cleanliness,
            &self.maintainability,
            &self.performance,
            &self.documentation,
        ]
        .into_iter()
    }

    pub fn total_weight(&self) -> f64 {
        self.iter().map(|metric| metric.weight).sum()
    }

    /// Rounded weighted sum of the five sub-scores
    pub fn overall_score(&self) -> u32 {
        let weighted: f64 = self.iter().map(|metric| metric.score * metric.weight).sum();
        weighted.round().clamp(0.0, 100.0) as u32
    }

    fn apply(&mut self, overrides: &MetricOverrides) {
        let slots = [
            (&mut self.file_size, &overrides.file_size),
            (&mut self.cleanliness, &overrides.cleanliness),
            (&mut self.maintainability, &overrides.maintainability),
            (&mut self.performance, &overrides.performance),
            (&mut self.documentation, &overrides.documentation),
        ];
        for (slot, replacement) in slots {
            if let Some(replacement) = replacement {
                *slot = replacement.clone();
            }
        }
    }
}

/// Externally measured sub-scores; each present field replaces the computed one
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricOverrides {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_size: Option<QualityScore>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cleanliness: Option<QualityScore>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub maintainability: Option<QualityScore>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub performance: Option<QualityScore>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub documentation: Option<QualityScore>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangeSummary {
    #[serde(default)]
    pub lines_added: Option<u64>,
    #[serde(default)]
    pub files_modified: Option<u64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GateStatus {
    Passed,
    PassedWithWarnings,
    Failed,
    Blocked,
}

impl GateStatus {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Passed => "passed",
            Self::PassedWithWarnings => "passed-with-warnings",
            Self::Failed => "failed",
            Self::Blocked => "blocked",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QualityGateResult {
    pub overall_score: u32,
    pub status: GateStatus,
    pub breakdown: QualityMetrics,
    pub blockers: Vec<String>,
    pub warnings: Vec<String>,
    pub recommendations: Vec<String>,
    pub passed_gates: Vec<String>,
}

/// Produces one sub-score for a set of files
pub trait MetricScorer: Send + Sync {
    fn score(&self, files: &[String]) -> QualityScore;
}

/// Constant placeholder score
#[derive(Debug, Clone, Copy)]
pub struct FixedScorer {
    pub score: f64,
    pub weight: f64,
}

impl MetricScorer for FixedScorer {
    fn score(&self, _files: &[String]) -> QualityScore {
        QualityScore::new(self.score, self.weight)
    }
}

/// Mean per-file score against the line-count limits
#[derive(Debug, Clone, Copy)]
pub struct FileSizeScorer {
    pub limits: SizeLimits,
    pub weight: f64,
}

impl FileSizeScorer {
    const fn verdict_score(verdict: SizeVerdict) -> f64 {
        match verdict {
            SizeVerdict::Safe => 100.0,
            SizeVerdict::Warning => 70.0,
            SizeVerdict::Violation => 0.0,
        }
    }
}

impl MetricScorer for FileSizeScorer {
    fn score(&self, files: &[String]) -> QualityScore {
        if files.is_empty() {
            return QualityScore::new(100.0, self.weight);
        }

        let mut total = 0.0;
        let mut issues = Vec::new();
        for file in files {
            let report = match check_path(Path::new(file), &self.limits) {
                Ok(report) => report,
                Err(err) => {
                    log::warn!("quality gate could not read {file}: {err}; using neutral score");
                    total += UNREADABLE_FILE_SCORE;
                    continue;
                }
            };
            total += Self::verdict_score(report.status);

            let (kind, severity, fallback) = match report.status {
                SizeVerdict::Violation => (
                    "file-size-violation",
                    Severity::Critical,
                    "File exceeds hard limit",
                ),
                SizeVerdict::Warning => (
                    "file-size-warning",
                    Severity::Warning,
                    "File approaching limit",
                ),
                SizeVerdict::Safe => continue,
            };
            issues.push(QualityIssue {
                kind: kind.to_string(),
                severity,
                message: report
                    .required_action
                    .unwrap_or_else(|| fallback.to_string()),
                file: Some(file.clone()),
            });
        }

        let mut score = QualityScore::new(total / files.len() as f64, self.weight);
        score.issues = issues;
        score
    }
}

/// Inputs of one gate run
#[derive(Debug, Clone, Copy)]
pub struct GateInput<'a> {
    pub stage: Stage,
    pub files: &'a [String],
    pub changes: ChangeSummary,
    pub overrides: Option<&'a MetricOverrides>,
}

impl<'a> GateInput<'a> {
    pub fn new(stage: Stage, files: &'a [String]) -> Self {
        Self {
            stage,
            files,
            changes: ChangeSummary::default(),
            overrides: None,
        }
    }
}

/// Weighted five-metric gate evaluator
pub struct QualityGates {
    limits: SizeLimits,
    file_size: Box<dyn MetricScorer>,
    cleanliness: Box<dyn MetricScorer>,
    maintainability: Box<dyn MetricScorer>,
    performance: Box<dyn MetricScorer>,
    documentation: Box<dyn MetricScorer>,
}

impl Default for QualityGates {
    fn default() -> Self {
        Self::new(SizeLimits::default())
    }
}

impl QualityGates {
    pub fn new(limits: SizeLimits) -> Self {
        Self {
            limits,
            file_size: Box::new(FileSizeScorer { limits, weight: 0.25 }),
            cleanliness: Box::new(FixedScorer { score: 90.0, weight: 0.25 }),
            maintainability: Box::new(FixedScorer { score: 85.0, weight: 0.2 }),
            performance: Box::new(FixedScorer { score: 80.0, weight: 0.15 }),
            documentation: Box::new(FixedScorer { score: 75.0, weight: 0.15 }),
        }
    }

    /// Replace the cleanliness placeholder with a measured scorer
    pub fn with_cleanliness(mut self, scorer: Box<dyn MetricScorer>) -> Self {
        self.cleanliness = scorer;
        self
    }

    pub fn limits(&self) -> SizeLimits {
        self.limits
    }

    pub fn evaluate(&self, input: GateInput<'_>) -> QualityGateResult {
        let mut breakdown = match input.stage {
            Stage::During => Self::during_breakdown(),
            Stage::Pre | Stage::Post => self.measured_breakdown(input.files),
        };
        if let Some(overrides) = input.overrides {
            breakdown.apply(overrides);
        }

        let overall_score = breakdown.overall_score();
        let mut blockers = Vec::new();
        let mut warnings = Vec::new();
        let mut recommendations = Vec::new();

        let status = match input.stage {
            Stage::Pre => {
                if breakdown.file_size.has_critical() {
                    blockers.push(format!(
                        "File size exceeds hard limit ({} lines)",
                        self.limits.hard
                    ));
                }
                if breakdown.cleanliness.has_critical() {
                    warnings.push("Unused imports detected".to_string());
                }
                if overall_score < PASS_THRESHOLD {
                    recommendations
                        .push("Overall quality score is below acceptable threshold".to_string());
                }

                if !blockers.is_empty() {
                    GateStatus::Blocked
                } else if overall_score >= PASS_THRESHOLD {
                    GateStatus::Passed
                } else if overall_score >= WARN_THRESHOLD {
                    GateStatus::PassedWithWarnings
                } else {
                    GateStatus::Failed
                }
            }
            Stage::During => {
                if input.changes.lines_added.unwrap_or(0) > LARGE_CHANGE_LINES {
                    warnings.push(
                        "Large number of lines added, consider breaking into smaller changes"
                            .to_string(),
                    );
                }
                GateStatus::Passed
            }
            Stage::Post => {
                if breakdown.file_size.status == ScoreStatus::Poor {
                    blockers.push("File size quality is poor, refactoring required".to_string());
                }
                if overall_score < PASS_THRESHOLD {
                    warnings.push(format!(
                        "Final quality score below target threshold ({PASS_THRESHOLD})"
                    ));
                }

                // No passed-with-warnings tier after implementation.
                if !blockers.is_empty() {
                    GateStatus::Blocked
                } else if overall_score >= PASS_THRESHOLD {
                    GateStatus::Passed
                } else {
                    GateStatus::Failed
                }
            }
        };

        log::debug!(
            "quality gate {} over {} files: score {overall_score}, {}",
            input.stage,
            input.files.len(),
            status.as_str()
        );

        QualityGateResult {
            overall_score,
            status,
            breakdown,
            blockers,
            warnings,
            recommendations,
            passed_gates: vec![input.stage.gate_tag().to_string()],
        }
    }

    fn measured_breakdown(&self, files: &[String]) -> QualityMetrics {
        QualityMetrics {
            file_size: self.file_size.score(files),
            cleanliness: self.cleanliness.score(files),
            maintainability: self.maintainability.score(files),
            performance: self.performance.score(files),
            documentation: self.documentation.score(files),
        }
    }

    fn during_breakdown() -> QualityMetrics {
        QualityMetrics {
            file_size: QualityScore::new(90.0, 0.25),
            cleanliness: QualityScore::new(95.0, 0.25),
            maintainability: QualityScore::new(85.0, 0.2),
            performance: QualityScore::new(80.0, 0.15),
            documentation: QualityScore::new(75.0, 0.15),
        }
    }
}
