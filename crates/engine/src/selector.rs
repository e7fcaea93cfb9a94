//! Rule-set selection.
//!
//! Selection walks [`SELECTION_TABLE`] top to bottom and stops at the first
//! predicate that holds; the final row always matches, so every analysis maps to
//! exactly one rule set.

use crate::catalog::{RuleSetDefinition, RuleSetId, CATALOG};
use crate::types::{Complexity, ContextAnalysis, FileSizeStatus, ProjectType, UserIntent};
use serde::{Deserialize, Serialize};

/// One row of the precedence chain
pub struct SelectionRule {
    pub outcome: RuleSetId,
    pub when: fn(&ContextAnalysis) -> bool,
}

pub static SELECTION_TABLE: [SelectionRule; 5] = [
    SelectionRule {
        outcome: RuleSetId::SizeViolation,
        when: |a| a.file_size_status == FileSizeStatus::Violation,
    },
    SelectionRule {
        outcome: RuleSetId::Emergency,
        when: |a| a.project_type == ProjectType::Debugging,
    },
    SelectionRule {
        outcome: RuleSetId::EducationMode,
        when: |a| a.user_intent == UserIntent::Learning && a.complexity == Complexity::Complex,
    },
    SelectionRule {
        outcome: RuleSetId::ComplexProject,
        when: |a| a.complexity == Complexity::Complex,
    },
    SelectionRule {
        outcome: RuleSetId::SimpleTask,
        when: |_| true,
    },
];

/// Map an analysis to its rule set
#[must_use]
pub fn select(analysis: &ContextAnalysis) -> RuleSetId {
    SELECTION_TABLE
        .iter()
        .find(|rule| (rule.when)(analysis))
        .map_or(RuleSetId::SimpleTask, |rule| rule.outcome)
}

/// Advisory lines surfaced with a selection. They carry no control-flow weight.
pub fn recommendations(analysis: &ContextAnalysis, selected: RuleSetId) -> Vec<String> {
    let fixed: &[&str] = match selected {
        RuleSetId::SimpleTask => &["Direct implementation without MCP tools for speed"],
        RuleSetId::ComplexProject => &[
            "Use MCP tools for architecture planning",
            "Perform detailed codebase analysis",
        ],
        RuleSetId::EducationMode => &[
            "Provide detailed Turkish explanations",
            "Include step-by-step code examples",
        ],
        RuleSetId::Emergency => &[
            "Minimal changes with strict validation",
            "Document emergency modifications",
        ],
        RuleSetId::SizeViolation => &[
            "Mandatory refactoring required",
            "Consider component extraction strategies",
        ],
    };

    let mut lines: Vec<String> = fixed.iter().map(|line| (*line).to_string()).collect();
    if let Some(platform) = analysis.platform {
        lines.push(format!("Platform: {platform}"));
    }
    if analysis.file_size_status == FileSizeStatus::Approaching {
        lines.push("Warning: File size approaching limit, consider refactoring soon".to_string());
    }
    lines
}

/// Outcome of a catalog lookup. A miss is reported with `is_loaded = false`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleSetLoad {
    pub rule_set_id: String,
    pub name: String,
    pub description: String,
    pub components: Vec<String>,
    pub priority: u8,
    pub is_loaded: bool,
    pub message: String,
}

/// Priority reported for ids outside the catalog
pub const NOT_FOUND_PRIORITY: u8 = 99;

impl RuleSetLoad {
    fn loaded(def: &RuleSetDefinition) -> Self {
        Self {
            rule_set_id: def.id.as_str().to_string(),
            name: def.name.to_string(),
            description: def.description.to_string(),
            components: def.components.iter().map(|c| (*c).to_string()).collect(),
            priority: def.priority,
            is_loaded: true,
            message: format!(
                "Successfully loaded {} rule set with {} components",
                def.name,
                def.components.len()
            ),
        }
    }

    fn not_found(raw_id: &str) -> Self {
        Self {
            rule_set_id: raw_id.to_string(),
            name: "Unknown".to_string(),
            description: "Rule set not found".to_string(),
            components: Vec::new(),
            priority: NOT_FOUND_PRIORITY,
            is_loaded: false,
            message: format!("Rule set {raw_id} does not exist"),
        }
    }
}

/// Look a rule set up by its wire id (`SET_001`..`SET_005`)
pub fn load_by_id(raw_id: &str) -> RuleSetLoad {
    match RuleSetId::parse(raw_id) {
        Some(id) => RuleSetLoad::loaded(id.definition()),
        None => {
            log::debug!("rule set lookup miss: {raw_id}");
            RuleSetLoad::not_found(raw_id)
        }
    }
}

/// Partial context accepted by auto selection; absent axes take analyzer defaults
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PartialContext {
    #[serde(default)]
    pub complexity: Option<Complexity>,
    #[serde(default)]
    pub user_intent: Option<UserIntent>,
    #[serde(default)]
    pub project_type: Option<ProjectType>,
    #[serde(default)]
    pub file_size_status: Option<FileSizeStatus>,
}

impl PartialContext {
    pub fn to_analysis(self) -> ContextAnalysis {
        let base = ContextAnalysis::baseline();
        ContextAnalysis {
            complexity: self.complexity.unwrap_or(base.complexity),
            user_intent: self.user_intent.unwrap_or(base.user_intent),
            project_type: self.project_type.unwrap_or(base.project_type),
            file_size_status: self.file_size_status.unwrap_or(base.file_size_status),
            ..base
        }
    }
}

/// Select from a partial context and load the result
pub fn load_auto(context: PartialContext) -> RuleSetLoad {
    RuleSetLoad::loaded(select(&context.to_analysis()).definition())
}

/// The whole catalog, in declaration order
pub fn list_all() -> &'static [RuleSetDefinition] {
    &CATALOG
}

/// Components of a rule set; empty for unknown ids
pub fn components(raw_id: &str) -> Vec<String> {
    RuleSetId::parse(raw_id)
        .map(|id| id.definition().components.iter().map(|c| (*c).to_string()).collect())
        .unwrap_or_default()
}
