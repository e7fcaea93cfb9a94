use crate::platform::PlatformProbe;
use crate::types::{
    Complexity, ContextAnalysis, FileCount, FileSizeStatus, ProjectInfo, ProjectType, UserIntent,
};

// Keyword tables blend English and Turkish; matching is lower-cased substring search.
const DEBUGGING_KEYWORDS: &[&str] = &["bug", "hata", "fix", "düzelt"];
const REFACTORING_KEYWORDS: &[&str] = &["refactor", "yeniden yapılandır"];
const NEW_PROJECT_KEYWORDS: &[&str] = &["new", "yeni"];

const COMPLEX_KEYWORDS: &[&str] = &[
    "architecture",
    "mimari",
    "multiple",
    "birkaç",
    "several",
    "complex",
    "karmaşık",
    "state management",
    "performance",
    "optimization",
    "optimizasyon",
];

const SIMPLE_KEYWORDS: &[&str] = &[
    "simple", "basit", "quick", "hızlı", "easy", "kolay", "minor", "küçük", "add", "ekle",
];

const LEARNING_KEYWORDS: &[&str] = &["learn", "öğren", "explain", "açıkla"];
const OPTIMIZE_KEYWORDS: &[&str] = &["optimize", "optimiz", "improve", "iyileştir"];
const FIX_KEYWORDS: &[&str] = &["fix", "düzelt", "bug", "hata"];

/// More than this many target files forces `Complexity::Complex`.
const COMPLEX_FILE_THRESHOLD: usize = 2;

/// Raw signals of one request
#[derive(Debug, Clone, Copy)]
pub struct AnalysisInput<'a> {
    pub query: &'a str,
    pub target_files: &'a [String],
    pub project_info: Option<&'a ProjectInfo>,
    /// Externally measured file-size status; `Safe` when absent
    pub file_size_status: Option<FileSizeStatus>,
}

impl<'a> AnalysisInput<'a> {
    pub fn new(query: &'a str, target_files: &'a [String]) -> Self {
        Self {
            query,
            target_files,
            project_info: None,
            file_size_status: None,
        }
    }
}

/// Heuristic request classifier. Never fails: missing signal resolves to the
/// documented default of each axis.
pub struct ContextAnalyzer;

impl ContextAnalyzer {
    #[must_use]
    pub fn analyze(input: AnalysisInput<'_>, probe: &dyn PlatformProbe) -> ContextAnalysis {
        let query = input.query.to_lowercase();

        ContextAnalysis {
            project_type: Self::project_type(&query, input.project_info),
            complexity: Self::complexity(&query, input.target_files.len()),
            user_intent: Self::user_intent(&query),
            file_count: FileCount::from_len(input.target_files.len()),
            file_size_status: input.file_size_status.unwrap_or_default(),
            platform: probe.platform(),
            has_git_hub_repo: probe.has_vcs_repo(),
        }
    }

    /// Explicit hint wins; then debugging → refactoring → new → existing.
    pub fn project_type(query: &str, hint: Option<&ProjectInfo>) -> ProjectType {
        if let Some(kind) = hint.and_then(|info| info.project_type) {
            return kind;
        }
        if contains_any(query, DEBUGGING_KEYWORDS) {
            ProjectType::Debugging
        } else if contains_any(query, REFACTORING_KEYWORDS) {
            ProjectType::Refactoring
        } else if contains_any(query, NEW_PROJECT_KEYWORDS) {
            ProjectType::New
        } else {
            ProjectType::Existing
        }
    }

    /// File count overrides keywords; complex keywords are checked before simple ones.
    pub fn complexity(query: &str, target_file_count: usize) -> Complexity {
        if target_file_count > COMPLEX_FILE_THRESHOLD || contains_any(query, COMPLEX_KEYWORDS) {
            Complexity::Complex
        } else if contains_any(query, SIMPLE_KEYWORDS) {
            Complexity::Simple
        } else {
            Complexity::Moderate
        }
    }

    pub fn user_intent(query: &str) -> UserIntent {
        if contains_any(query, LEARNING_KEYWORDS) {
            UserIntent::Learning
        } else if contains_any(query, OPTIMIZE_KEYWORDS) {
            UserIntent::Optimize
        } else if contains_any(query, FIX_KEYWORDS) {
            UserIntent::Fix
        } else {
            UserIntent::Implementation
        }
    }
}

fn contains_any(haystack: &str, needles: &[&str]) -> bool {
    needles.iter().any(|needle| haystack.contains(needle))
}
