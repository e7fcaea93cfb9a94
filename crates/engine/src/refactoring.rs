//! Extraction-strategy ranking for oversized files.

use serde::{Deserialize, Serialize};

/// Size a refactored file should end up at
pub const TARGET_SIZE: usize = 500;
/// Share of the required reduction the chosen strategies must cover
const COVERAGE: f64 = 0.9;
/// Number of strategies summed by the combined fallback
const COMBINED_TOP: usize = 3;

pub const COMBINED_STRATEGY: &str = "combined-strategy";
pub const MANUAL_REFACTORING: &str = "manual-refactoring";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Effort {
    Low,
    Medium,
    High,
}

impl Effort {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

struct Template {
    name: &'static str,
    description: &'static str,
    effort: Effort,
    /// Share of the current size, in percent
    share: usize,
    prefix: &'static str,
    suffix: &'static str,
}

const TEMPLATES: [Template; 6] = [
    Template {
        name: "component-splitting",
        description: "Split large component into smaller, focused components",
        effort: Effort::Medium,
        share: 40,
        prefix: "",
        suffix: "Components",
    },
    Template {
        name: "utility-extraction",
        description: "Extract utility functions into separate module",
        effort: Effort::Low,
        share: 20,
        prefix: "",
        suffix: "Utils",
    },
    Template {
        name: "hook-extraction",
        description: "Extract custom hooks and business logic",
        effort: Effort::Medium,
        share: 30,
        prefix: "use",
        suffix: "Hook",
    },
    Template {
        name: "service-separation",
        description: "Separate API calls and data fetching into service layer",
        effort: Effort::Medium,
        share: 25,
        prefix: "",
        suffix: "Service",
    },
    Template {
        name: "type-extraction",
        description: "Move type definitions to separate types file",
        effort: Effort::Low,
        share: 10,
        prefix: "",
        suffix: "Types",
    },
    Template {
        name: "constants-extraction",
        description: "Extract constants and configuration",
        effort: Effort::Low,
        share: 5,
        prefix: "",
        suffix: "Constants",
    },
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefactoringStrategy {
    pub name: String,
    pub description: String,
    pub estimated_effort: Effort,
    /// Approximate lines the strategy can move out of the file
    pub applicable_lines: usize,
    #[serde(default)]
    pub new_files: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefactoringRecommendation {
    pub file_path: String,
    pub current_size: usize,
    pub target_size: usize,
    pub strategies: Vec<RefactoringStrategy>,
    pub recommended_strategy: String,
    pub estimated_savings: usize,
    pub message: String,
}

pub fn recommend(
    file_path: &str,
    current_size: usize,
    violations: &[String],
) -> RefactoringRecommendation {
    let strategies = strategies_for(file_path, current_size);
    let recommended = pick(&strategies, reduction_needed(current_size));
    let estimated_savings = savings(&strategies, &recommended);
    let message = render_message(current_size, &strategies, &recommended, violations);

    log::debug!("refactoring {file_path} ({current_size} lines): {recommended}");

    RefactoringRecommendation {
        file_path: file_path.to_string(),
        current_size,
        target_size: TARGET_SIZE,
        strategies,
        recommended_strategy: recommended,
        estimated_savings,
        message,
    }
}

/// Candidate strategies in declaration order; zero-line estimates are dropped.
pub fn strategies_for(file_path: &str, current_size: usize) -> Vec<RefactoringStrategy> {
    let (stem, extension) = split_file_name(file_path);

    TEMPLATES
        .iter()
        .map(|t| RefactoringStrategy {
            name: t.name.to_string(),
            description: t.description.to_string(),
            estimated_effort: t.effort,
            applicable_lines: percent_of(current_size, t.share),
            new_files: vec![format!("{}{stem}{}{extension}", t.prefix, t.suffix)],
        })
        .filter(|s| s.applicable_lines > 0)
        .collect()
}

/// `size * percent / 100` rounded down, without overflowing for any `size`
fn percent_of(size: usize, percent: usize) -> usize {
    size / 100 * percent + size % 100 * percent / 100
}

fn reduction_needed(current_size: usize) -> i128 {
    current_size as i128 - TARGET_SIZE as i128
}

/// Stem and dotted extension of the last path segment. Both `/` and `\`
/// separate segments regardless of the host.
fn split_file_name(file_path: &str) -> (&str, &str) {
    let name = file_path.rsplit(['/', '\\']).next().unwrap_or(file_path);
    match name.rfind('.') {
        Some(dot) if dot > 0 => name.split_at(dot),
        _ => (name, ""),
    }
}

fn ranked(strategies: &[RefactoringStrategy]) -> Vec<&RefactoringStrategy> {
    let mut sorted: Vec<&RefactoringStrategy> = strategies.iter().collect();
    sorted.sort_by(|a, b| b.applicable_lines.cmp(&a.applicable_lines));
    sorted
}

/// Greedy coverage: walk strategies by size and stop once the running total
/// reaches 90% of the reduction. The last strategy added is the answer.
fn pick(strategies: &[RefactoringStrategy], target_reduction: i128) -> String {
    if strategies.is_empty() {
        return MANUAL_REFACTORING.to_string();
    }

    let bar = target_reduction as f64 * COVERAGE;
    let mut cumulative = 0usize;
    for strategy in ranked(strategies) {
        cumulative = cumulative.saturating_add(strategy.applicable_lines);
        if cumulative as f64 >= bar {
            return strategy.name.clone();
        }
    }
    COMBINED_STRATEGY.to_string()
}

fn savings(strategies: &[RefactoringStrategy], recommended: &str) -> usize {
    if recommended == COMBINED_STRATEGY {
        return ranked(strategies)
            .iter()
            .take(COMBINED_TOP)
            .fold(0usize, |total, s| total.saturating_add(s.applicable_lines));
    }
    strategies
        .iter()
        .find(|s| s.name == recommended)
        .map_or(0, |s| s.applicable_lines)
}

fn render_message(
    current_size: usize,
    strategies: &[RefactoringStrategy],
    recommended: &str,
    violations: &[String],
) -> String {
    let mut message = format!(
        "Refactoring Recommendation:\nCurrent: {current_size} lines | Target: {TARGET_SIZE} lines\nReduction needed: {} lines\n\n",
        reduction_needed(current_size)
    );

    match recommended {
        COMBINED_STRATEGY => {
            message.push_str("Recommended: Apply multiple strategies\nTop strategies:\n");
            for (i, s) in ranked(strategies).iter().take(COMBINED_TOP).enumerate() {
                message.push_str(&format!(
                    "  {}. {}: ~{} lines ({} effort)\n",
                    i + 1,
                    s.name,
                    s.applicable_lines,
                    s.estimated_effort.as_str()
                ));
            }
        }
        MANUAL_REFACTORING => {
            message.push_str(
                "Recommended: Manual refactoring required\nConsider architecture-level changes\n",
            );
        }
        name => {
            if let Some(s) = strategies.iter().find(|s| s.name == name) {
                message.push_str(&format!(
                    "Recommended Strategy: {}\nDescription: {}\nEstimated savings: ~{} lines\nEffort: {}\n",
                    s.name,
                    s.description,
                    s.applicable_lines,
                    s.estimated_effort.as_str()
                ));
            }
        }
    }

    if !violations.is_empty() {
        message.push_str("\nViolations:\n");
        for violation in violations {
            message.push_str(&format!("  - {violation}\n"));
        }
    }
    message
}
