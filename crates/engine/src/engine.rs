//! Request-level entry points shared by the CLI and the MCP server.
//!
//! A [`RulesEngine`] owns one preferences snapshot, the platform probe and the
//! consent flags for the lifetime of a request. Each operation returns its
//! structured result together with a report in the user's locale.

use crate::analyzer::{AnalysisInput, ContextAnalyzer};
use crate::catalog::{RuleSetDefinition, RuleSetId};
use crate::consent::{ConsentDecision, ConsentFlags};
use crate::error::Result;
use crate::file_size::{self, FileSizeInput, FileSizeReport, SizeLimits};
use crate::guide::{self, EducationalContent};
use crate::preferences::{Language, Preferences};
use crate::platform::{PlatformProbe, SystemProbe};
use crate::quality::{
    ChangeSummary, GateInput, MetricOverrides, QualityGateResult, QualityGates, Stage,
};
use crate::refactoring::{self, RefactoringRecommendation};
use crate::report::{self, Locale};
use crate::selector::{self, PartialContext, RuleSetLoad};
use crate::types::{Complexity, ContextAnalysis, FileSizeStatus, ProjectInfo};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Structured result plus its human-readable rendering
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Reported<T> {
    pub data: T,
    pub report: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassifyRequest {
    pub user_query: String,
    #[serde(default)]
    pub target_files: Vec<String>,
    #[serde(default)]
    pub project_info: Option<ProjectInfo>,
    /// Externally measured status; wins over `check_file_sizes`
    #[serde(default)]
    pub file_size_status: Option<FileSizeStatus>,
    /// Measure `target_files` against the configured limits
    #[serde(default)]
    pub check_file_sizes: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassificationResult {
    pub selected_rule_set: RuleSetId,
    pub loaded_components: Vec<String>,
    pub recommendations: Vec<String>,
    pub context_analysis: ContextAnalysis,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockedRequest {
    pub blocked: bool,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ClassifyOutcome {
    Blocked(BlockedRequest),
    Classified(ClassificationResult),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QualityGateRequest {
    pub stage: String,
    #[serde(default)]
    pub files: Vec<String>,
    #[serde(default)]
    pub changes: ChangeSummary,
    #[serde(default, alias = "currentMetrics")]
    pub overrides: Option<MetricOverrides>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefactoringRequest {
    pub file_path: String,
    pub current_size: usize,
    #[serde(default)]
    pub violations: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileSizeRequest {
    #[serde(default)]
    pub file_path: Option<String>,
    #[serde(default)]
    pub file_content: Option<String>,
    #[serde(default)]
    pub warning_limit: Option<usize>,
    #[serde(default)]
    pub hard_limit: Option<usize>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleSetRequest {
    /// `SET_00n`, `auto` or absent
    #[serde(default)]
    pub rule_set_id: Option<String>,
    #[serde(default)]
    pub context: PartialContext,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GuideRequest {
    pub topic: String,
    pub complexity: Complexity,
    /// Overrides the preferred language
    #[serde(default)]
    pub language: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SafeModeStatus {
    pub safe_mode: bool,
    pub behaviors: Vec<String>,
}

pub struct RulesEngine {
    prefs: Arc<Preferences>,
    probe: Arc<dyn PlatformProbe>,
    consent: ConsentFlags,
}

impl RulesEngine {
    pub fn new(
        prefs: Arc<Preferences>,
        probe: Arc<dyn PlatformProbe>,
        consent: ConsentFlags,
    ) -> Self {
        Self {
            prefs,
            probe,
            consent,
        }
    }

    /// Engine over the live environment: working-directory probe and consent
    /// flags read from the process environment.
    pub fn from_env(prefs: Arc<Preferences>) -> Self {
        Self::new(prefs, Arc::new(SystemProbe::from_cwd()), ConsentFlags::from_env())
    }

    pub fn preferences(&self) -> &Preferences {
        &self.prefs
    }

    pub fn locale(&self) -> Locale {
        self.prefs.locale()
    }

    /// Consent gate on its own
    pub fn gatekeeper_check(&self) -> ConsentDecision {
        self.consent.check(self.locale())
    }

    pub fn classify(&self, request: &ClassifyRequest) -> Reported<ClassifyOutcome> {
        let decision = self.gatekeeper_check();
        if !decision.passed {
            let message = decision.message.unwrap_or_default();
            return Reported {
                report: message.clone(),
                data: ClassifyOutcome::Blocked(BlockedRequest {
                    blocked: true,
                    message,
                }),
            };
        }

        let file_size_status = request.file_size_status.or_else(|| {
            request.check_file_sizes.then(|| {
                file_size::aggregate_status(&request.target_files, &self.prefs.size_limits())
            })
        });
        let input = AnalysisInput {
            project_info: request.project_info.as_ref(),
            file_size_status,
            ..AnalysisInput::new(&request.user_query, &request.target_files)
        };
        let analysis = ContextAnalyzer::analyze(input, self.probe.as_ref());
        let selected = selector::select(&analysis);
        log::debug!(
            "classified {:?} as {selected} ({}, {}, {})",
            request.user_query,
            analysis.project_type.as_str(),
            analysis.complexity.as_str(),
            analysis.user_intent.as_str()
        );

        let result = ClassificationResult {
            selected_rule_set: selected,
            loaded_components: selector::components(selected.as_str()),
            recommendations: selector::recommendations(&analysis, selected),
            context_analysis: analysis,
        };
        Reported {
            report: report::context_report(&result, self.locale()),
            data: ClassifyOutcome::Classified(result),
        }
    }

    pub fn load_rule_set(&self, request: &RuleSetRequest) -> Reported<RuleSetLoad> {
        let load = match request.rule_set_id.as_deref().map(str::trim) {
            None | Some("") => selector::load_auto(request.context),
            Some(id) if id.eq_ignore_ascii_case("auto") => selector::load_auto(request.context),
            Some(id) => selector::load_by_id(id),
        };
        Reported {
            report: report::rule_set_report(&load, self.locale()),
            data: load,
        }
    }

    pub fn list_rule_sets(&self) -> &'static [RuleSetDefinition] {
        selector::list_all()
    }

    pub fn run_quality_gates(
        &self,
        request: &QualityGateRequest,
    ) -> Result<Reported<QualityGateResult>> {
        let stage: Stage = request.stage.parse()?;
        let gates = QualityGates::new(self.prefs.size_limits());
        let input = GateInput {
            changes: request.changes,
            overrides: request.overrides.as_ref(),
            ..GateInput::new(stage, &request.files)
        };
        let result = gates.evaluate(input);
        Ok(Reported {
            report: report::quality_report(&result, self.locale()),
            data: result,
        })
    }

    pub fn suggest_refactoring(
        &self,
        request: &RefactoringRequest,
    ) -> Reported<RefactoringRecommendation> {
        let recommendation = refactoring::recommend(
            &request.file_path,
            request.current_size,
            &request.violations,
        );
        Reported {
            report: recommendation.message.clone(),
            data: recommendation,
        }
    }

    pub fn check_file_size(&self, request: &FileSizeRequest) -> Result<Reported<FileSizeReport>> {
        let defaults = self.prefs.size_limits();
        let limits = SizeLimits {
            warning: request.warning_limit.unwrap_or(defaults.warning),
            hard: request.hard_limit.unwrap_or(defaults.hard),
        };
        let input = FileSizeInput {
            file_path: request.file_path.as_deref(),
            file_content: request.file_content.as_deref(),
            limits,
        };
        let checked = file_size::check(&input)?;
        Ok(Reported {
            report: report::file_size_report(&checked, self.locale()),
            data: checked,
        })
    }

    pub fn guide(&self, request: &GuideRequest) -> EducationalContent {
        let locale = request
            .language
            .as_deref()
            .and_then(Language::parse)
            .map_or_else(|| self.locale(), Language::locale);
        guide::generate(&request.topic, request.complexity, locale)
    }

    pub fn safe_mode(&self) -> SafeModeStatus {
        SafeModeStatus {
            safe_mode: true,
            behaviors: self.prefs.safe_mode.behaviors.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EngineError;
    use crate::platform::{Platform, StaticProbe};
    use pretty_assertions::assert_eq;

    fn engine_with(prefs: Preferences, consent: ConsentFlags) -> RulesEngine {
        let probe = StaticProbe {
            platform: Some(Platform::Linux),
            has_vcs_repo: Some(false),
        };
        RulesEngine::new(Arc::new(prefs), Arc::new(probe), consent)
    }

    fn english() -> Preferences {
        Preferences::default()
            .with_dotted("language.userCommunication", "en")
            .unwrap()
    }

    fn engine() -> RulesEngine {
        engine_with(english(), ConsentFlags::default())
    }

    fn classified(outcome: ClassifyOutcome) -> ClassificationResult {
        match outcome {
            ClassifyOutcome::Classified(result) => result,
            ClassifyOutcome::Blocked(blocked) => panic!("unexpected block: {}", blocked.message),
        }
    }

    #[test]
    fn classify_runs_the_whole_pipeline() {
        let request = ClassifyRequest {
            user_query: "Explain the architecture of the plugin system".to_string(),
            ..Default::default()
        };
        let reported = engine().classify(&request);
        let result = classified(reported.data);
        assert_eq!(result.selected_rule_set, RuleSetId::EducationMode);
        assert_eq!(
            result.loaded_components,
            vec!["language-rules", "educational-approach", "clean-code-standards"]
        );
        assert_eq!(result.recommendations.last().unwrap(), "Platform: linux");
        assert!(reported.report.starts_with("🔍 CONTEXT ANALYSIS REPORT"));
    }

    #[test]
    fn consent_block_short_circuits() {
        let consent = ConsentFlags {
            required: true,
            granted: false,
        };
        let reported = engine_with(Preferences::default(), consent).classify(&ClassifyRequest {
            user_query: "fix the bug".to_string(),
            ..Default::default()
        });
        assert_eq!(
            reported.data,
            ClassifyOutcome::Blocked(BlockedRequest {
                blocked: true,
                message: "🛑 İŞLEM DURDURULDU\n🔒 GitHub izni bulunmuyor.".to_string(),
            })
        );
        let value = serde_json::to_value(&reported.data).unwrap();
        assert_eq!(value["blocked"], true);
    }

    #[test]
    fn measured_file_sizes_feed_selection() {
        let dir = tempfile::tempdir().unwrap();
        let big = dir.path().join("big.ts");
        std::fs::write(&big, vec!["x"; 1001].join("\n")).unwrap();

        let mut request = ClassifyRequest {
            user_query: "add a button".to_string(),
            target_files: vec![big.display().to_string()],
            ..Default::default()
        };
        let result = classified(engine().classify(&request).data);
        assert_eq!(result.selected_rule_set, RuleSetId::SimpleTask);

        request.check_file_sizes = true;
        let result = classified(engine().classify(&request).data);
        assert_eq!(result.selected_rule_set, RuleSetId::SizeViolation);
        assert_eq!(result.context_analysis.file_size_status, FileSizeStatus::Violation);

        request.file_size_status = Some(FileSizeStatus::Safe);
        let result = classified(engine().classify(&request).data);
        assert_eq!(result.selected_rule_set, RuleSetId::SimpleTask);
    }

    #[test]
    fn load_rule_set_by_id_or_auto() {
        let engine = engine();
        let explicit = engine.load_rule_set(&RuleSetRequest {
            rule_set_id: Some("SET_005".to_string()),
            ..Default::default()
        });
        assert!(explicit.data.is_loaded);
        assert_eq!(explicit.data.name, "Size Violation");

        let auto = engine.load_rule_set(&RuleSetRequest {
            rule_set_id: Some("auto".to_string()),
            context: PartialContext {
                complexity: Some(Complexity::Complex),
                ..Default::default()
            },
        });
        assert_eq!(auto.data.rule_set_id, "SET_002");

        let missing = engine.load_rule_set(&RuleSetRequest {
            rule_set_id: Some("SET_777".to_string()),
            ..Default::default()
        });
        assert!(!missing.data.is_loaded);
        assert_eq!(missing.report, "❌ Rule set SET_777 not found");
    }

    #[test]
    fn quality_gates_reject_unknown_stage() {
        let err = engine()
            .run_quality_gates(&QualityGateRequest {
                stage: "review".to_string(),
                ..Default::default()
            })
            .unwrap_err();
        assert!(matches!(err, EngineError::UnknownStage(_)));
        assert_eq!(err.code(), "unknown_stage");
    }

    #[test]
    fn quality_gates_report_in_preferred_language() {
        let reported = engine_with(Preferences::default(), ConsentFlags::default())
            .run_quality_gates(&QualityGateRequest {
                stage: "pre".to_string(),
                ..Default::default()
            })
            .unwrap();
        assert_eq!(reported.data.overall_score, 88);
        assert!(reported.report.starts_with("✅ KALİTE GATE RAPORU"));
    }

    #[test]
    fn preference_limits_drive_file_checks() {
        let prefs = english()
            .with_dotted("fileSizeLimit", r#"{"warning":2,"hard":4}"#)
            .unwrap();
        let engine = engine_with(prefs, ConsentFlags::default());
        let reported = engine
            .check_file_size(&FileSizeRequest {
                file_content: Some("a\nb\nc".to_string()),
                ..Default::default()
            })
            .unwrap();
        assert_eq!(reported.data.status, file_size::SizeVerdict::Warning);

        let overridden = engine
            .check_file_size(&FileSizeRequest {
                file_content: Some("a\nb\nc".to_string()),
                hard_limit: Some(3),
                ..Default::default()
            })
            .unwrap();
        assert_eq!(overridden.data.status, file_size::SizeVerdict::Violation);

        let err = engine.check_file_size(&FileSizeRequest::default()).unwrap_err();
        assert_eq!(err.code(), "missing_input");
    }

    #[test]
    fn refactoring_report_is_the_message() {
        let reported = engine().suggest_refactoring(&RefactoringRequest {
            file_path: "src/App.tsx".to_string(),
            current_size: 1000,
            violations: Vec::new(),
        });
        assert_eq!(reported.data.recommended_strategy, "hook-extraction");
        assert_eq!(reported.report, reported.data.message);
    }

    #[test]
    fn guide_language_overrides_preferences() {
        let engine = engine_with(Preferences::default(), ConsentFlags::default());
        let request = GuideRequest {
            topic: "traits".to_string(),
            complexity: Complexity::Moderate,
            language: Some("en".to_string()),
        };
        assert!(engine.guide(&request).explanation.starts_with("This is a moderate traits"));

        let request = GuideRequest {
            language: None,
            ..request
        };
        assert!(engine.guide(&request).explanation.starts_with("Bu orta seviye"));
    }

    #[test]
    fn safe_mode_lists_behaviors() {
        let status = engine().safe_mode();
        assert!(status.safe_mode);
        assert_eq!(status.behaviors[0], "no_github_push_without_consent");
    }

    #[test]
    fn identical_requests_give_identical_results() {
        let request = ClassifyRequest {
            user_query: "optimize the rendering performance".to_string(),
            target_files: vec!["a.ts".to_string(), "b.ts".to_string()],
            ..Default::default()
        };
        let engine = engine();
        let first = serde_json::to_string(&engine.classify(&request)).unwrap();
        let second = serde_json::to_string(&engine.classify(&request)).unwrap();
        assert_eq!(first, second);
    }
}
