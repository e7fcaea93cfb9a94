//! # Rules Engine
//!
//! Picks a behavioral rule set for a coding request and reports supporting
//! quality metadata.
//!
//! ## Architecture
//!
//! ```text
//! Request (query, target files, hints)
//!     │
//!     ├──> Consent gate (environment flags, once per request)
//!     │
//!     ├──> ContextAnalyzer → ContextAnalysis
//!     │    ├─> project type / complexity / intent keyword scans
//!     │    └─> file-count bucket, file-size status, platform probe
//!     │
//!     └──> Selector (ordered decision table) → RuleSetId → Catalog entry
//!
//! Independently:
//!     QualityGates (stage, files) → weighted five-metric score
//!     refactoring::recommend (path, size) → ranked extraction strategy
//! ```
//!
//! All decision paths are synchronous and share no mutable state; the only
//! process-wide value is the preferences snapshot, passed in explicitly.
//!
//! ## Example
//!
//! ```rust
//! use std::sync::Arc;
//! use rules_engine::{
//!     ClassifyOutcome, ClassifyRequest, ConsentFlags, Preferences, RuleSetId, RulesEngine,
//!     StaticProbe,
//! };
//!
//! let engine = RulesEngine::new(
//!     Arc::new(Preferences::default()),
//!     Arc::new(StaticProbe::default()),
//!     ConsentFlags::default(),
//! );
//! let request = ClassifyRequest {
//!     user_query: "fix the login bug".to_string(),
//!     ..Default::default()
//! };
//! match engine.classify(&request).data {
//!     ClassifyOutcome::Classified(result) => {
//!         assert_eq!(result.selected_rule_set, RuleSetId::Emergency);
//!     }
//!     ClassifyOutcome::Blocked(blocked) => panic!("{}", blocked.message),
//! }
//! ```

pub mod analyzer;
pub mod catalog;
pub mod consent;
mod engine;
mod error;
pub mod file_size;
pub mod guide;
pub mod platform;
pub mod preferences;
pub mod quality;
pub mod refactoring;
pub mod report;
pub mod selector;
mod types;

pub use analyzer::{AnalysisInput, ContextAnalyzer};
pub use catalog::{RuleSetDefinition, RuleSetId, CATALOG};
pub use consent::{ConsentDecision, ConsentFlags};
pub use engine::{
    BlockedRequest, ClassificationResult, ClassifyOutcome, ClassifyRequest, FileSizeRequest,
    GuideRequest, QualityGateRequest, RefactoringRequest, Reported, RuleSetRequest, RulesEngine,
    SafeModeStatus,
};
pub use error::{EngineError, Result};
pub use file_size::{FileSizeReport, SizeLimits, SizeVerdict};
pub use guide::EducationalContent;
pub use platform::{Platform, PlatformProbe, StaticProbe, SystemProbe};
pub use preferences::{config_path, Language, Preferences, PreferencesStore};
pub use quality::{GateStatus, QualityGateResult, QualityGates, Stage};
pub use refactoring::RefactoringRecommendation;
pub use report::Locale;
pub use selector::{PartialContext, RuleSetLoad};
pub use types::{
    Complexity, ContextAnalysis, FileCount, FileSizeStatus, ProjectInfo, ProjectType, UserIntent,
};
