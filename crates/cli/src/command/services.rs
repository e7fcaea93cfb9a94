use super::domain::{
    parse_payload, CommandAction, CommandOutcome, Hint, HintKind, PreferencesOp,
    PreferencesPayload,
};
use anyhow::{Context as AnyhowContext, Result};
use rules_engine::consent::passed_message;
use rules_engine::platform::editor_from_env;
use rules_engine::quality::PASS_THRESHOLD;
use rules_engine::refactoring::TARGET_SIZE;
use rules_engine::{
    ClassifyOutcome, ClassifyRequest, EngineError, FileSizeRequest, GuideRequest, Preferences,
    PreferencesStore, QualityGateRequest, RefactoringRequest, RuleSetRequest, RulesEngine,
};
use rules_protocol::{Capabilities, CapabilitiesServer, DefaultLimits};
use serde_json::{json, Value};

pub fn route(
    store: &PreferencesStore,
    action: CommandAction,
    payload: Value,
) -> Result<CommandOutcome> {
    let engine = RulesEngine::from_env(store.snapshot());

    match action {
        CommandAction::Classify => classify(&engine, payload),
        CommandAction::QualityGates => {
            let request: QualityGateRequest = parse_payload(payload)?;
            CommandOutcome::from_reported(engine.run_quality_gates(&request)?)
        }
        CommandAction::Refactor => {
            let request: RefactoringRequest = parse_payload(payload)?;
            CommandOutcome::from_reported(engine.suggest_refactoring(&request))
        }
        CommandAction::CheckFileSize => {
            let request: FileSizeRequest = parse_payload(payload)?;
            CommandOutcome::from_reported(engine.check_file_size(&request)?)
        }
        CommandAction::LoadRuleSet => {
            let request: RuleSetRequest = parse_payload(payload)?;
            CommandOutcome::from_reported(engine.load_rule_set(&request))
        }
        CommandAction::ListRuleSets => {
            let locale = engine.locale();
            let report = engine
                .list_rule_sets()
                .iter()
                .map(|def| {
                    format!(
                        "{} {} (priority {})",
                        def.id,
                        def.localized_name(locale),
                        def.priority
                    )
                })
                .collect::<Vec<_>>()
                .join("\n");
            Ok(CommandOutcome::from_value(engine.list_rule_sets())?.with_report(report))
        }
        CommandAction::Guide => {
            let request: GuideRequest = parse_payload(payload)?;
            CommandOutcome::from_value(engine.guide(&request))
        }
        CommandAction::Gatekeeper => {
            let decision = engine.gatekeeper_check();
            let report = decision
                .message
                .clone()
                .unwrap_or_else(|| passed_message(engine.locale()).to_string());
            Ok(CommandOutcome::from_value(decision)?.with_report(report))
        }
        CommandAction::SafeMode => CommandOutcome::from_value(engine.safe_mode()),
        CommandAction::Preferences => preferences(store, parse_payload(payload)?),
        CommandAction::Capabilities => capabilities(engine.preferences()),
    }
}

fn classify(engine: &RulesEngine, payload: Value) -> Result<CommandOutcome> {
    let request: ClassifyRequest = parse_payload(payload)?;
    if request.user_query.trim().is_empty() {
        return Err(EngineError::missing_input("userQuery").into());
    }

    let reported = engine.classify(&request);
    let blocked = matches!(reported.data, ClassifyOutcome::Blocked(_));
    let mut outcome = CommandOutcome::from_reported(reported)?;
    if blocked {
        outcome.hints.push(Hint {
            kind: HintKind::Warn,
            text: "Set GITHUB_PUSH_ALLOWED=1 once the user has granted consent.".to_string(),
        });
    }
    Ok(outcome)
}

fn preferences(store: &PreferencesStore, payload: PreferencesPayload) -> Result<CommandOutcome> {
    let location = store
        .path()
        .map(|path| path.display().to_string())
        .unwrap_or_else(|| "memory".to_string());

    match payload.op {
        PreferencesOp::Show => {
            let prefs = store.snapshot();
            match payload.key.as_deref() {
                Some(key) => {
                    let value = prefs.get_dotted(key)?;
                    CommandOutcome::from_value(json!({ "key": key, "value": value }))
                }
                None => CommandOutcome::from_value(prefs.as_ref()),
            }
        }
        PreferencesOp::Set => {
            let key = payload
                .key
                .ok_or_else(|| EngineError::missing_input("key"))?;
            let value = payload
                .value
                .ok_or_else(|| EngineError::missing_input("value"))?;
            let updated = store
                .set(&key, &value)
                .with_context(|| format!("Failed to update config key {key}"))?;
            Ok(CommandOutcome::from_value(updated.as_ref())?
                .with_report(format!("{key} updated ({location})")))
        }
        PreferencesOp::Reset => {
            let prefs = store.reset().context("Failed to reset config")?;
            Ok(CommandOutcome::from_value(prefs.as_ref())?
                .with_report(format!("preferences reset to defaults ({location})")))
        }
    }
}

fn capabilities(prefs: &Preferences) -> Result<CommandOutcome> {
    let limits = prefs.size_limits();
    let actions = CommandAction::ALL.map(CommandAction::as_str);
    let caps = Capabilities::new(
        CapabilitiesServer {
            name: "dynamic-rules".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        },
        DefaultLimits {
            warning_lines: limits.warning,
            hard_lines: limits.hard,
            refactor_target_lines: TARGET_SIZE,
            pass_score: PASS_THRESHOLD,
            language: prefs.language.user_communication.as_str().to_string(),
        },
        &actions,
    )
    .with_editor(editor_from_env());
    CommandOutcome::from_value(caps)
}
