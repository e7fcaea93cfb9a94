//! MCP tools for the rules engine
//!
//! Every tool builds a [`RulesEngine`] over a fresh preferences snapshot, so a
//! preference change made by another process is visible on the next call.

use anyhow::{Context as AnyhowContext, Result};
use rmcp::handler::server::tool::ToolRouter;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::{CallToolResult, Content, Implementation, ServerCapabilities, ServerInfo};
use rmcp::{tool, tool_handler, tool_router, ErrorData as McpError, ServerHandler};
use rules_engine::consent::passed_message;
use rules_engine::platform::editor_from_env;
use rules_engine::quality::PASS_THRESHOLD;
use rules_engine::refactoring::TARGET_SIZE;
use rules_engine::{PreferencesStore, Reported, RulesEngine};
use rules_protocol::{Capabilities, CapabilitiesServer, DefaultLimits};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::json;
use std::sync::Arc;

mod schemas;

pub use schemas::*;

/// Tool names in registration order
pub const TOOL_NAMES: [&str; 11] = [
    "analyze_context",
    "check_file_size",
    "run_quality_gates",
    "load_rule_set",
    "list_rule_sets",
    "suggest_refactoring",
    "educational_guide",
    "gatekeeper_check",
    "safe_mode",
    "preferences",
    "capabilities",
];

/// Rules MCP Service
#[derive(Clone)]
pub struct RulesService {
    /// Shared preferences
    store: Arc<PreferencesStore>,
    /// Tool router
    tool_router: ToolRouter<Self>,
}

impl RulesService {
    pub fn new() -> Self {
        Self::with_store(PreferencesStore::open_default())
    }

    pub fn with_store(store: PreferencesStore) -> Self {
        Self {
            store: Arc::new(store),
            tool_router: Self::tool_router(),
        }
    }

    fn engine(&self) -> RulesEngine {
        RulesEngine::from_env(self.store.reload())
    }
}

impl Default for RulesService {
    fn default() -> Self {
        Self::new()
    }
}

#[tool_handler]
impl ServerHandler for RulesService {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some("Dynamic rules for coding agents. Call 'analyze_context' with the user's request first to select a rule set, 'check_file_size' before editing a file, 'run_quality_gates' before (pre), while (during) and after (post) implementing, and 'suggest_refactoring' when a file exceeds the line limit.".into()),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation::from_build_env(),
            ..Default::default()
        }
    }
}

/// Convert tool parameters into the engine request with the same wire shape
fn engine_request<P: Serialize, R: DeserializeOwned>(params: &P) -> Result<R> {
    let value = serde_json::to_value(params).context("Invalid tool arguments")?;
    serde_json::from_value(value).context("Invalid tool arguments")
}

fn error_result(err: impl std::fmt::Display) -> CallToolResult {
    CallToolResult::error(vec![Content::text(format!("Error: {err:#}"))])
}

fn json_result<T: Serialize>(data: &T) -> CallToolResult {
    CallToolResult::success(vec![Content::text(
        serde_json::to_string_pretty(data).unwrap_or_default(),
    )])
}

/// Structured data first, localized report second
fn reported_result<T: Serialize>(reported: &Reported<T>) -> CallToolResult {
    CallToolResult::success(vec![
        Content::text(serde_json::to_string_pretty(&reported.data).unwrap_or_default()),
        Content::text(reported.report.clone()),
    ])
}

#[tool_router]
impl RulesService {
    /// Classify a request and select its rule set
    #[tool(
        description = "Analyze a coding request (project type, complexity, intent, file count, file-size status, platform) and select one of five rule sets. Call this first for every request."
    )]
    pub async fn analyze_context(
        &self,
        Parameters(request): Parameters<AnalyzeContextRequest>,
    ) -> Result<CallToolResult, McpError> {
        let request: rules_engine::ClassifyRequest = match engine_request(&request) {
            Ok(r) => r,
            Err(e) => return Ok(error_result(e)),
        };
        Ok(reported_result(&self.engine().classify(&request)))
    }

    /// Check a file against the line limits
    #[tool(
        description = "Count the lines of a file (or inline content) and report safe / warning / violation against the configured limits."
    )]
    pub async fn check_file_size(
        &self,
        Parameters(request): Parameters<FileSizeRequest>,
    ) -> Result<CallToolResult, McpError> {
        let request: rules_engine::FileSizeRequest = match engine_request(&request) {
            Ok(r) => r,
            Err(e) => return Ok(error_result(e)),
        };
        match self.engine().check_file_size(&request) {
            Ok(reported) => Ok(reported_result(&reported)),
            Err(e) => Ok(error_result(e)),
        }
    }

    /// Run a stage quality gate
    #[tool(
        description = "Score the work for a development stage (pre, during, post) across file size, cleanliness, maintainability, performance and documentation, and return the gate status."
    )]
    pub async fn run_quality_gates(
        &self,
        Parameters(request): Parameters<QualityGateRequest>,
    ) -> Result<CallToolResult, McpError> {
        let request: rules_engine::QualityGateRequest = match engine_request(&request) {
            Ok(r) => r,
            Err(e) => return Ok(error_result(e)),
        };
        match self.engine().run_quality_gates(&request) {
            Ok(reported) => Ok(reported_result(&reported)),
            Err(e) => Ok(error_result(e)),
        }
    }

    /// Load a rule set by id or by context
    #[tool(
        description = "Load a rule set by id (SET_001..SET_005) or pick one automatically from a partial context. Unknown ids return isLoaded=false."
    )]
    pub async fn load_rule_set(
        &self,
        Parameters(request): Parameters<RuleSetRequest>,
    ) -> Result<CallToolResult, McpError> {
        let request: rules_engine::RuleSetRequest = match engine_request(&request) {
            Ok(r) => r,
            Err(e) => return Ok(error_result(e)),
        };
        Ok(reported_result(&self.engine().load_rule_set(&request)))
    }

    /// List the rule set catalog
    #[tool(description = "List all five rule sets with their components and priorities.")]
    pub async fn list_rule_sets(&self) -> Result<CallToolResult, McpError> {
        Ok(json_result(&self.engine().list_rule_sets()))
    }

    /// Recommend how to split an oversized file
    #[tool(
        description = "Rank extraction strategies (component, hook, service, utility, type, constants) for an oversized file and recommend the one that brings it back toward 500 lines."
    )]
    pub async fn suggest_refactoring(
        &self,
        Parameters(request): Parameters<RefactoringRequest>,
    ) -> Result<CallToolResult, McpError> {
        let request: rules_engine::RefactoringRequest = match engine_request(&request) {
            Ok(r) => r,
            Err(e) => return Ok(error_result(e)),
        };
        Ok(reported_result(&self.engine().suggest_refactoring(&request)))
    }

    /// Tiered learning material
    #[tool(
        description = "Generate an explanation, code example, steps, resources and related concepts for a topic at the given depth."
    )]
    pub async fn educational_guide(
        &self,
        Parameters(request): Parameters<GuideRequest>,
    ) -> Result<CallToolResult, McpError> {
        let request: rules_engine::GuideRequest = match engine_request(&request) {
            Ok(r) => r,
            Err(e) => return Ok(error_result(e)),
        };
        Ok(json_result(&self.engine().guide(&request)))
    }

    /// Consent gate on its own
    #[tool(
        description = "Check whether the push-consent gate lets requests through (MCP_REQUIRE_GITHUB_CONSENT / GITHUB_PUSH_ALLOWED)."
    )]
    pub async fn gatekeeper_check(&self) -> Result<CallToolResult, McpError> {
        let engine = self.engine();
        let decision = engine.gatekeeper_check();
        let report = decision
            .message
            .clone()
            .unwrap_or_else(|| passed_message(engine.locale()).to_string());
        Ok(reported_result(&Reported {
            data: json!({ "blocked": !decision.passed, "passed": decision.passed }),
            report,
        }))
    }

    /// Safe-mode fallback behaviors
    #[tool(description = "Return the safe-mode fallback behaviors from the user's preferences.")]
    pub async fn safe_mode(&self) -> Result<CallToolResult, McpError> {
        Ok(json_result(&self.engine().safe_mode()))
    }

    /// Read or change preferences
    #[tool(
        description = "Show, set (dotted key) or reset the user preferences. Limits must keep 0 < warning < hard."
    )]
    pub async fn preferences(
        &self,
        Parameters(request): Parameters<PreferencesRequest>,
    ) -> Result<CallToolResult, McpError> {
        let op = request.op.as_deref().unwrap_or("show");
        let outcome = match op {
            "show" => match request.key.as_deref() {
                Some(key) => self
                    .store
                    .reload()
                    .get_dotted(key)
                    .map(|value| json!({ "key": key, "value": value })),
                None => serde_json::to_value(self.store.reload().as_ref()).map_err(Into::into),
            },
            "set" => match (request.key.as_deref(), request.value.as_deref()) {
                (Some(key), Some(value)) => self
                    .store
                    .set(key, value)
                    .and_then(|prefs| serde_json::to_value(prefs.as_ref()).map_err(Into::into)),
                _ => return Ok(error_result("set requires key and value")),
            },
            "reset" => self
                .store
                .reset()
                .and_then(|prefs| serde_json::to_value(prefs.as_ref()).map_err(Into::into)),
            other => {
                return Ok(error_result(format!(
                    "unknown op '{other}' (expected show, set or reset)"
                )))
            }
        };
        match outcome {
            Ok(value) => Ok(json_result(&value)),
            Err(e) => Ok(error_result(e)),
        }
    }

    /// Server capabilities
    #[tool(description = "Server version, default limits, tool list and the recommended first call.")]
    pub async fn capabilities(&self) -> Result<CallToolResult, McpError> {
        let prefs = self.store.reload();
        let limits = prefs.size_limits();
        let caps = Capabilities::new(
            CapabilitiesServer {
                name: "rules-mcp".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
            },
            DefaultLimits {
                warning_lines: limits.warning,
                hard_lines: limits.hard,
                refactor_target_lines: TARGET_SIZE,
                pass_score: PASS_THRESHOLD,
                language: prefs.language.user_communication.as_str().to_string(),
            },
            &TOOL_NAMES,
        )
        .with_editor(editor_from_env());
        Ok(json_result(&caps))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rules_engine::Preferences;

    fn service() -> RulesService {
        RulesService::with_store(PreferencesStore::detached(Preferences::default()))
    }

    fn first_text(result: &CallToolResult) -> &str {
        result
            .content
            .first()
            .and_then(|c| c.as_text())
            .map(|t| t.text.as_str())
            .unwrap_or_default()
    }

    #[test]
    fn params_convert_into_engine_requests() {
        let params = AnalyzeContextRequest {
            user_query: "fix it".to_string(),
            target_files: None,
            project_info: Some(ProjectInfoParams {
                project_type: Some("legacy".to_string()),
                language: None,
                framework: None,
            }),
            file_size_status: None,
            check_file_sizes: None,
        };
        let err = engine_request::<_, rules_engine::ClassifyRequest>(&params).unwrap_err();
        assert!(format!("{err:#}").contains("unknown variant"));

        let params = AnalyzeContextRequest {
            project_info: None,
            file_size_status: Some("approaching".to_string()),
            ..params
        };
        let request: rules_engine::ClassifyRequest = engine_request(&params).unwrap();
        assert!(request.target_files.is_empty());
        assert_eq!(
            request.file_size_status,
            Some(rules_engine::FileSizeStatus::Approaching)
        );
    }

    #[test]
    fn current_metrics_alias_reaches_overrides() {
        let params = QualityGateRequest {
            stage: "post".to_string(),
            files: None,
            changes: None,
            current_metrics: Some(json!({
                "documentation": { "score": 10.0, "weight": 0.15, "status": "poor", "issues": [] }
            })),
        };
        let request: rules_engine::QualityGateRequest = engine_request(&params).unwrap();
        let overrides = request.overrides.unwrap();
        assert_eq!(overrides.documentation.unwrap().score, 10.0);
    }

    #[tokio::test]
    async fn tool_errors_are_results_not_faults() {
        let result = service()
            .run_quality_gates(Parameters(QualityGateRequest {
                stage: "review".to_string(),
                files: None,
                changes: None,
                current_metrics: None,
            }))
            .await
            .unwrap();
        assert_eq!(result.is_error, Some(true));
        assert_eq!(first_text(&result), "Error: Unknown quality gate stage: review");
    }

    #[tokio::test]
    async fn preferences_set_is_validated() {
        let service = service();
        let ok = service
            .preferences(Parameters(PreferencesRequest {
                op: Some("set".to_string()),
                key: Some("language.userCommunication".to_string()),
                value: Some("en".to_string()),
            }))
            .await
            .unwrap();
        assert_ne!(ok.is_error, Some(true));
        assert_eq!(service.engine().locale(), rules_engine::Locale::En);

        let rejected = service
            .preferences(Parameters(PreferencesRequest {
                op: Some("set".to_string()),
                key: Some("fileSizeLimit.warning".to_string()),
                value: Some("5000".to_string()),
            }))
            .await
            .unwrap();
        assert_eq!(rejected.is_error, Some(true));
    }
}
