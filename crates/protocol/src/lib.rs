//! Wire types shared by the CLI command API and the MCP server.

use anyhow::Result;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

pub const CAPABILITIES_SCHEMA_VERSION: u32 = 1;
pub const COMMAND_API_VERSION: &str = "v1";
pub const MCP_API_VERSION: &str = "v1";

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, JsonSchema)]
pub struct ToolNextAction {
    pub tool: String,
    pub args: serde_json::Value,
    pub reason: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, JsonSchema)]
pub struct ErrorEnvelope {
    pub code: String,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub next_actions: Vec<ToolNextAction>,
}

/// Effective thresholds a client can expect without passing overrides
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, JsonSchema)]
pub struct DefaultLimits {
    pub warning_lines: usize,
    pub hard_lines: usize,
    pub refactor_target_lines: usize,
    pub pass_score: u32,
    pub language: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, JsonSchema)]
pub struct CapabilitiesServer {
    pub name: String,
    pub version: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, JsonSchema)]
pub struct CapabilitiesVersions {
    pub command_api: String,
    pub mcp: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, JsonSchema)]
pub struct Capabilities {
    pub schema_version: u32,
    pub server: CapabilitiesServer,
    pub versions: CapabilitiesVersions,
    pub defaults: DefaultLimits,
    pub tools: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub editor: Option<String>,
    pub start_route: ToolNextAction,
}

impl Capabilities {
    pub fn new(server: CapabilitiesServer, defaults: DefaultLimits, tools: &[&str]) -> Self {
        Self {
            schema_version: CAPABILITIES_SCHEMA_VERSION,
            server,
            versions: CapabilitiesVersions {
                command_api: COMMAND_API_VERSION.to_string(),
                mcp: MCP_API_VERSION.to_string(),
            },
            defaults,
            tools: tools.iter().map(|tool| (*tool).to_string()).collect(),
            editor: None,
            start_route: ToolNextAction {
                tool: "analyze_context".to_string(),
                args: serde_json::json!({ "userQuery": "<describe the task>" }),
                reason: "Classify the request first; the selected rule set drives the rest."
                    .to_string(),
            },
        }
    }

    pub fn with_editor(mut self, editor: Option<&str>) -> Self {
        self.editor = editor.map(str::to_string);
        self
    }
}

pub fn serialize_json<T: Serialize>(value: &T) -> Result<String> {
    serde_json::to_string(value).map_err(Into::into)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn defaults() -> DefaultLimits {
        DefaultLimits {
            warning_lines: 700,
            hard_lines: 1000,
            refactor_target_lines: 500,
            pass_score: 70,
            language: "tr".to_string(),
        }
    }

    #[test]
    fn capabilities_start_with_classification() {
        let caps = Capabilities::new(
            CapabilitiesServer {
                name: "rules-mcp".to_string(),
                version: "0.1.0".to_string(),
            },
            defaults(),
            &["analyze_context", "run_quality_gates"],
        )
        .with_editor(Some("cursor"));

        assert_eq!(caps.schema_version, CAPABILITIES_SCHEMA_VERSION);
        assert_eq!(caps.start_route.tool, "analyze_context");
        assert_eq!(caps.tools, vec!["analyze_context", "run_quality_gates"]);

        let value = serde_json::to_value(&caps).unwrap();
        assert_eq!(value["editor"], "cursor");
        assert_eq!(value["defaults"]["hard_lines"], 1000);
        assert_eq!(value["versions"]["command_api"], "v1");
    }

    #[test]
    fn error_envelope_omits_empty_fields() {
        let envelope = ErrorEnvelope {
            code: "missing_input".to_string(),
            message: "filePath or fileContent required".to_string(),
            details: None,
            hint: None,
            next_actions: Vec::new(),
        };
        assert_eq!(
            serialize_json(&envelope).unwrap(),
            r#"{"code":"missing_input","message":"filePath or fileContent required"}"#
        );
    }
}
