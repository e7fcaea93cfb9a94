pub mod domain;
mod services;

pub use domain::{
    classify_error, CommandAction, CommandRequest, CommandResponse, CommandStatus, Hint, HintKind,
    PreferencesOp, PreferencesPayload,
};

use rules_engine::PreferencesStore;
use rules_protocol::ErrorEnvelope;

pub struct CommandHandler<'a> {
    store: &'a PreferencesStore,
}

impl<'a> CommandHandler<'a> {
    pub fn new(store: &'a PreferencesStore) -> Self {
        Self { store }
    }

    pub fn execute(&self, request: CommandRequest) -> CommandResponse {
        let CommandRequest { action, payload } = request;
        log::debug!("command action={}", action.as_str());

        match services::route(self.store, action, payload) {
            Ok(outcome) => CommandResponse {
                status: CommandStatus::Ok,
                message: None,
                error: None,
                hints: outcome.hints,
                next_actions: Vec::new(),
                data: outcome.data,
                report: outcome.report,
            },
            Err(err) => error_response(&err, Some(action)),
        }
    }
}

pub fn error_response(err: &anyhow::Error, action: Option<CommandAction>) -> CommandResponse {
    let message = format!("{err:#}");
    let classification = classify_error(err, action);
    let error = ErrorEnvelope {
        code: classification.code,
        message: message.clone(),
        details: None,
        hint: classification.hint,
        next_actions: classification.next_actions.clone(),
    };
    CommandResponse {
        status: CommandStatus::Error,
        message: Some(message),
        error: Some(error),
        hints: classification.hints,
        next_actions: classification.next_actions,
        data: serde_json::Value::Null,
        report: None,
    }
}

pub fn execute(request: CommandRequest, store: &PreferencesStore) -> CommandResponse {
    CommandHandler::new(store).execute(request)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rules_engine::Preferences;
    use serde_json::json;

    fn run(store: &PreferencesStore, raw: serde_json::Value) -> CommandResponse {
        let request: CommandRequest = serde_json::from_value(raw).unwrap();
        execute(request, store)
    }

    fn english() -> PreferencesStore {
        let prefs = Preferences::default()
            .with_dotted("language.userCommunication", "en")
            .unwrap();
        PreferencesStore::detached(prefs)
    }

    #[test]
    fn quality_gates_action_returns_data_and_report() {
        let response = run(
            &english(),
            json!({ "action": "quality_gates", "payload": { "stage": "during" } }),
        );
        assert!(!response.is_error());
        assert_eq!(response.data["overallScore"], 87);
        assert_eq!(response.data["status"], "passed");
        assert!(response.report.unwrap().contains("QUALITY GATE REPORT"));
    }

    #[test]
    fn unknown_stage_becomes_error_envelope() {
        let response = run(
            &english(),
            json!({ "action": "quality_gates", "payload": { "stage": "review" } }),
        );
        assert!(response.is_error());
        let error = response.error.unwrap();
        assert_eq!(error.code, "unknown_stage");
        assert_eq!(error.message, "Unknown quality gate stage: review");
    }

    #[test]
    fn missing_rule_set_is_not_an_error() {
        let response = run(
            &english(),
            json!({ "action": "load_rule_set", "payload": { "ruleSetId": "SET_404" } }),
        );
        assert!(!response.is_error());
        assert_eq!(response.data["isLoaded"], false);
        assert_eq!(response.data["priority"], 99);
    }

    #[test]
    fn preferences_set_updates_the_store() {
        let store = english();
        let response = run(
            &store,
            json!({
                "action": "preferences",
                "payload": { "op": "set", "key": "fileSizeLimit.warning", "value": "600" }
            }),
        );
        assert!(!response.is_error());
        assert_eq!(store.snapshot().file_size_limit.warning, 600);

        let rejected = run(
            &store,
            json!({
                "action": "preferences",
                "payload": { "op": "set", "key": "fileSizeLimit.hard", "value": "10" }
            }),
        );
        assert_eq!(rejected.error.unwrap().code, "config_error");
        assert_eq!(store.snapshot().file_size_limit.hard, 1000);
    }

    #[test]
    fn capabilities_list_every_action() {
        let response = run(&english(), json!({ "action": "capabilities" }));
        let tools = response.data["tools"].as_array().unwrap();
        assert_eq!(tools.len(), CommandAction::ALL.len());
        assert_eq!(response.data["defaults"]["warning_lines"], 700);
    }
}
