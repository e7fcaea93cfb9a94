use anyhow::Result;
use rules_engine::{EngineError, Reported};
use rules_protocol::{ErrorEnvelope, ToolNextAction};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

#[derive(Debug, Deserialize)]
pub struct CommandRequest {
    pub action: CommandAction,
    #[serde(default = "empty_payload")]
    pub payload: Value,
}

fn empty_payload() -> Value {
    Value::Object(Default::default())
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum CommandAction {
    Classify,
    QualityGates,
    Refactor,
    CheckFileSize,
    LoadRuleSet,
    ListRuleSets,
    Guide,
    Gatekeeper,
    SafeMode,
    Preferences,
    Capabilities,
}

impl CommandAction {
    pub const ALL: [CommandAction; 11] = [
        CommandAction::Classify,
        CommandAction::QualityGates,
        CommandAction::Refactor,
        CommandAction::CheckFileSize,
        CommandAction::LoadRuleSet,
        CommandAction::ListRuleSets,
        CommandAction::Guide,
        CommandAction::Gatekeeper,
        CommandAction::SafeMode,
        CommandAction::Preferences,
        CommandAction::Capabilities,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            CommandAction::Classify => "classify",
            CommandAction::QualityGates => "quality_gates",
            CommandAction::Refactor => "refactor",
            CommandAction::CheckFileSize => "check_file_size",
            CommandAction::LoadRuleSet => "load_rule_set",
            CommandAction::ListRuleSets => "list_rule_sets",
            CommandAction::Guide => "guide",
            CommandAction::Gatekeeper => "gatekeeper",
            CommandAction::SafeMode => "safe_mode",
            CommandAction::Preferences => "preferences",
            CommandAction::Capabilities => "capabilities",
        }
    }
}

/// Payload of the `preferences` action
#[derive(Debug, Default, Deserialize)]
pub struct PreferencesPayload {
    #[serde(default)]
    pub op: PreferencesOp,
    #[serde(default)]
    pub key: Option<String>,
    /// Raw value; parsed as JSON when possible
    #[serde(default)]
    pub value: Option<String>,
}

#[derive(Debug, Default, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PreferencesOp {
    #[default]
    Show,
    Set,
    Reset,
}

#[derive(Debug, Serialize)]
pub struct CommandResponse {
    pub status: CommandStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorEnvelope>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub hints: Vec<Hint>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub next_actions: Vec<ToolNextAction>,
    #[serde(default)]
    pub data: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub report: Option<String>,
}

impl CommandResponse {
    pub fn is_error(&self) -> bool {
        matches!(self.status, CommandStatus::Error)
    }
}

#[derive(Debug, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum CommandStatus {
    Ok,
    Error,
}

#[derive(Debug, Serialize, Clone)]
pub struct Hint {
    #[serde(rename = "type")]
    pub kind: HintKind,
    pub text: String,
}

#[allow(dead_code)]
#[derive(Debug, Serialize, Clone)]
#[serde(rename_all = "snake_case")]
pub enum HintKind {
    Info,
    Action,
    Warn,
}

#[derive(Debug, Clone)]
pub struct ErrorClassification {
    pub code: String,
    pub hint: Option<String>,
    pub hints: Vec<Hint>,
    pub next_actions: Vec<ToolNextAction>,
}

pub struct CommandOutcome {
    pub data: Value,
    pub report: Option<String>,
    pub hints: Vec<Hint>,
}

impl CommandOutcome {
    pub fn from_value<T: Serialize>(value: T) -> Result<Self> {
        Ok(Self {
            data: serde_json::to_value(value)?,
            report: None,
            hints: Vec::new(),
        })
    }

    pub fn from_reported<T: Serialize>(reported: Reported<T>) -> Result<Self> {
        Ok(Self {
            data: serde_json::to_value(reported.data)?,
            report: Some(reported.report),
            hints: Vec::new(),
        })
    }

    pub fn with_report(mut self, report: impl Into<String>) -> Self {
        self.report = Some(report.into());
        self
    }
}

pub fn parse_payload<T: DeserializeOwned>(payload: Value) -> Result<T> {
    serde_json::from_value(payload).map_err(Into::into)
}

/// Map a failure to a stable code plus recovery hints.
///
/// Engine errors carry their own code; anything else is classified from the
/// rendered message.
pub fn classify_error(err: &anyhow::Error, action: Option<CommandAction>) -> ErrorClassification {
    let message = format!("{err:#}");
    let mut hints = Vec::new();
    let mut next_actions = Vec::new();
    let mut code = err
        .downcast_ref::<EngineError>()
        .map_or("internal", EngineError::code)
        .to_string();

    if code == "internal"
        && (err.downcast_ref::<serde_json::Error>().is_some()
            || message.contains("missing field")
            || message.contains("unknown variant")
            || message.contains("invalid type"))
    {
        code = "invalid_request".to_string();
        hints.push(Hint {
            kind: HintKind::Action,
            text: "Payload does not match the action's request shape; field names are camelCase."
                .to_string(),
        });
    }

    match code.as_str() {
        "unknown_stage" => {
            hints.push(Hint {
                kind: HintKind::Action,
                text: "Use payload.stage = pre | during | post.".to_string(),
            });
            next_actions.push(ToolNextAction {
                tool: CommandAction::QualityGates.as_str().to_string(),
                args: json!({ "stage": "pre" }),
                reason: "Retry with a supported stage.".to_string(),
            });
        }
        "missing_input" => {
            let text = if action == Some(CommandAction::CheckFileSize) {
                "Provide payload.filePath or payload.fileContent."
            } else {
                "A required payload field is missing."
            };
            hints.push(Hint {
                kind: HintKind::Action,
                text: text.to_string(),
            });
        }
        "config_error" => {
            hints.push(Hint {
                kind: HintKind::Warn,
                text: "Preferences rejected: keep 0 < fileSizeLimit.warning < fileSizeLimit.hard, or run `dynamic-rules config reset`."
                    .to_string(),
            });
            next_actions.push(ToolNextAction {
                tool: CommandAction::Preferences.as_str().to_string(),
                args: json!({ "op": "show" }),
                reason: "Inspect the current preferences.".to_string(),
            });
        }
        "file_unreadable" => {
            hints.push(Hint {
                kind: HintKind::Warn,
                text: "Check that the path exists and is readable from the working directory."
                    .to_string(),
            });
        }
        _ => {}
    }

    let hint = hints.first().map(|h| h.text.clone());
    ErrorClassification {
        code,
        hint,
        hints,
        next_actions,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn engine_errors_keep_their_code() {
        let err = anyhow::Error::new(EngineError::UnknownStage("review".to_string()));
        let classification = classify_error(&err, Some(CommandAction::QualityGates));
        assert_eq!(classification.code, "unknown_stage");
        assert_eq!(classification.next_actions[0].tool, "quality_gates");
        assert!(classification.hint.is_some());
    }

    #[test]
    fn payload_mismatch_is_invalid_request() {
        let err = parse_payload::<rules_engine::RefactoringRequest>(json!({ "filePath": 3 }))
            .unwrap_err();
        assert_eq!(classify_error(&err, None).code, "invalid_request");
    }

    #[test]
    fn unknown_failures_are_internal() {
        let err = anyhow::anyhow!("something broke");
        let classification = classify_error(&err, None);
        assert_eq!(classification.code, "internal");
        assert!(classification.hints.is_empty());
    }

    #[test]
    fn action_names_round_trip_through_serde() {
        for action in CommandAction::ALL {
            let parsed: CommandAction =
                serde_json::from_value(Value::String(action.as_str().to_string())).unwrap();
            assert_eq!(parsed, action);
        }
    }
}
