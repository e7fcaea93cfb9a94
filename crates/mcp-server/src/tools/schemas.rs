//! Tool parameter schemas. Field names follow the camelCase wire format of
//! the engine requests they convert into.

use rmcp::schemars;
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, Serialize, schemars::JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeContextRequest {
    /// The user's request, verbatim
    #[schemars(description = "The user's request, verbatim (English or Turkish)")]
    pub user_query: String,

    #[schemars(description = "Files the request targets; more than two marks the task complex")]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_files: Option<Vec<String>>,

    #[schemars(description = "Optional project hints: type (new|existing|debugging|refactoring), language, framework")]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_info: Option<ProjectInfoParams>,

    #[schemars(description = "Externally measured size status: safe | approaching | violation")]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_size_status: Option<String>,

    #[schemars(description = "Measure targetFiles against the configured line limits (ignored when fileSizeStatus is set)")]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub check_file_sizes: Option<bool>,
}

#[derive(Debug, Deserialize, Serialize, schemars::JsonSchema)]
pub struct ProjectInfoParams {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub project_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub framework: Option<String>,
}

#[derive(Debug, Deserialize, Serialize, schemars::JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct FileSizeRequest {
    #[schemars(description = "File to measure")]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_path: Option<String>,

    #[schemars(description = "Inline content to measure; wins over filePath")]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_content: Option<String>,

    #[schemars(description = "Warning threshold in lines (default: configured, 700)")]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub warning_limit: Option<usize>,

    #[schemars(description = "Hard threshold in lines (default: configured, 1000)")]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hard_limit: Option<usize>,
}

#[derive(Debug, Deserialize, Serialize, schemars::JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct QualityGateRequest {
    #[schemars(description = "Development stage: pre | during | post")]
    pub stage: String,

    #[schemars(description = "Files under evaluation (pre/post stages measure their size)")]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub files: Option<Vec<String>>,

    #[schemars(description = "Change summary for the during stage")]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub changes: Option<ChangeParams>,

    #[schemars(description = "Externally measured sub-scores keyed by metric (fileSize, cleanliness, maintainability, performance, documentation); each replaces the computed one")]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_metrics: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize, Serialize, schemars::JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ChangeParams {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lines_added: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub files_modified: Option<u64>,
}

#[derive(Debug, Deserialize, Serialize, schemars::JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct RuleSetRequest {
    #[schemars(description = "SET_001..SET_005, or 'auto' (default) to select from context")]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rule_set_id: Option<String>,

    #[schemars(description = "Partial context for auto selection; missing fields take analyzer defaults")]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<RuleContextParams>,
}

#[derive(Debug, Deserialize, Serialize, schemars::JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct RuleContextParams {
    #[schemars(description = "simple | moderate | complex")]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub complexity: Option<String>,
    #[schemars(description = "implementation | learning | fix | optimize")]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_intent: Option<String>,
    #[schemars(description = "new | existing | debugging | refactoring")]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_type: Option<String>,
    #[schemars(description = "safe | approaching | violation")]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_size_status: Option<String>,
}

#[derive(Debug, Deserialize, Serialize, schemars::JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct RefactoringRequest {
    #[schemars(description = "File to split; its stem and extension name the new files")]
    pub file_path: String,

    #[schemars(description = "Current line count")]
    pub current_size: usize,

    #[schemars(description = "Known violations to list in the recommendation")]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub violations: Option<Vec<String>>,
}

#[derive(Debug, Deserialize, Serialize, schemars::JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct GuideRequest {
    #[schemars(description = "Topic to explain")]
    pub topic: String,

    #[schemars(description = "Depth: simple | moderate | complex")]
    pub complexity: String,

    #[schemars(description = "Explanation language: tr | en | de | fr (default: preferred language)")]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct PreferencesRequest {
    #[schemars(description = "show (default) | set | reset")]
    #[serde(default)]
    pub op: Option<String>,

    #[schemars(description = "Dotted key, e.g. fileSizeLimit.warning or language.userCommunication")]
    #[serde(default)]
    pub key: Option<String>,

    #[schemars(description = "Value for set; parsed as JSON when possible, else stored as a string")]
    #[serde(default)]
    pub value: Option<String>,
}
