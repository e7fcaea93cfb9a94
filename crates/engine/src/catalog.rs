//! Static rule-set catalog.
//!
//! The catalog is closed: exactly five entries, fixed at compile time. Which
//! entry applies to a request is decided by the ordered table in
//! [`crate::selector`]; the [`TriggerHints`] carried here are documentation only
//! and never consulted for dispatch.

use crate::report::Locale;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum RuleSetId {
    #[serde(rename = "SET_001")]
    SimpleTask,
    #[serde(rename = "SET_002")]
    ComplexProject,
    #[serde(rename = "SET_003")]
    EducationMode,
    #[serde(rename = "SET_004")]
    Emergency,
    #[serde(rename = "SET_005")]
    SizeViolation,
}

impl RuleSetId {
    pub const ALL: [RuleSetId; 5] = [
        Self::SimpleTask,
        Self::ComplexProject,
        Self::EducationMode,
        Self::Emergency,
        Self::SizeViolation,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::SimpleTask => "SET_001",
            Self::ComplexProject => "SET_002",
            Self::EducationMode => "SET_003",
            Self::Emergency => "SET_004",
            Self::SizeViolation => "SET_005",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        Self::ALL
            .into_iter()
            .find(|id| id.as_str().eq_ignore_ascii_case(raw))
    }

    pub fn definition(self) -> &'static RuleSetDefinition {
        match self {
            Self::SimpleTask => &CATALOG[0],
            Self::ComplexProject => &CATALOG[1],
            Self::EducationMode => &CATALOG[2],
            Self::Emergency => &CATALOG[3],
            Self::SizeViolation => &CATALOG[4],
        }
    }
}

impl fmt::Display for RuleSetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Nominal applicability, kept for readers of the catalog
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TriggerHints {
    #[serde(skip_serializing_if = "no_values")]
    pub project_type: &'static [&'static str],
    #[serde(skip_serializing_if = "no_values")]
    pub complexity: &'static [&'static str],
    #[serde(skip_serializing_if = "no_values")]
    pub user_intent: &'static [&'static str],
    #[serde(skip_serializing_if = "no_values")]
    pub file_size_status: &'static [&'static str],
}

fn no_values(values: &&'static [&'static str]) -> bool {
    values.is_empty()
}

const NO_HINTS: TriggerHints = TriggerHints {
    project_type: &[],
    complexity: &[],
    user_intent: &[],
    file_size_status: &[],
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleSetDefinition {
    pub id: RuleSetId,
    pub name: &'static str,
    pub description: &'static str,
    /// Ordered capability tags; never empty
    pub components: &'static [&'static str],
    /// Lower value wins
    pub priority: u8,
    pub trigger_hints: TriggerHints,
}

impl RuleSetDefinition {
    pub fn localized_name(&self, locale: Locale) -> &'static str {
        match locale {
            Locale::En => self.name,
            Locale::Tr => match self.id {
                RuleSetId::SimpleTask => "Basit Görev",
                RuleSetId::ComplexProject => "Karmaşık Proje",
                RuleSetId::EducationMode => "Öğretim Modu",
                RuleSetId::Emergency => "Acil Durum",
                RuleSetId::SizeViolation => "Boyut İhlali",
            },
        }
    }
}

pub static CATALOG: [RuleSetDefinition; 5] = [
    RuleSetDefinition {
        id: RuleSetId::SimpleTask,
        name: "Simple Task",
        description: "Single file, small change",
        components: &[
            "language-rules",
            "file-size-enforcement",
            "clean-code-standards",
            "simple-task-handling",
        ],
        priority: 4,
        trigger_hints: TriggerHints {
            complexity: &["simple"],
            ..NO_HINTS
        },
    },
    RuleSetDefinition {
        id: RuleSetId::ComplexProject,
        name: "Complex Project",
        description: "Multiple files, new feature",
        components: &[
            "language-rules",
            "file-size-enforcement",
            "clean-code-standards",
            "complex-project-management",
            "codebase-analysis",
            "mcp-tool-usage",
        ],
        priority: 3,
        trigger_hints: TriggerHints {
            complexity: &["complex"],
            ..NO_HINTS
        },
    },
    RuleSetDefinition {
        id: RuleSetId::EducationMode,
        name: "Education Mode",
        description: "User is focused on learning",
        components: &[
            "language-rules",
            "educational-approach",
            "clean-code-standards",
        ],
        priority: 2,
        trigger_hints: TriggerHints {
            user_intent: &["learning"],
            complexity: &["complex"],
            ..NO_HINTS
        },
    },
    RuleSetDefinition {
        id: RuleSetId::Emergency,
        name: "Emergency",
        description: "Critical bug fix",
        components: &[
            "language-rules",
            "file-size-enforcement",
            "emergency-protocols",
            "clean-code-standards",
        ],
        priority: 1,
        trigger_hints: TriggerHints {
            project_type: &["debugging"],
            ..NO_HINTS
        },
    },
    RuleSetDefinition {
        id: RuleSetId::SizeViolation,
        name: "Size Violation",
        description: "File beyond the 700-line limit detected",
        components: &[
            "language-rules",
            "file-size-enforcement",
            "codebase-analysis",
        ],
        priority: 0,
        trigger_hints: TriggerHints {
            file_size_status: &["violation"],
            ..NO_HINTS
        },
    },
];

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::HashSet;

    #[test]
    fn catalog_is_closed_and_indexed_by_id() {
        assert_eq!(CATALOG.len(), 5);
        for id in RuleSetId::ALL {
            assert_eq!(id.definition().id, id);
        }
        let ids: HashSet<_> = CATALOG.iter().map(|def| def.id).collect();
        assert_eq!(ids.len(), 5);
    }

    #[test]
    fn priorities_are_distinct_and_size_violation_wins() {
        let priorities: HashSet<_> = CATALOG.iter().map(|def| def.priority).collect();
        assert_eq!(priorities.len(), 5);
        assert_eq!(RuleSetId::SizeViolation.definition().priority, 0);
        assert_eq!(RuleSetId::SimpleTask.definition().priority, 4);
    }

    #[test]
    fn every_entry_has_components() {
        for def in &CATALOG {
            assert!(!def.components.is_empty(), "{} has no components", def.id);
            assert_eq!(def.components[0], "language-rules");
        }
    }

    #[test]
    fn ids_round_trip_through_strings() {
        for id in RuleSetId::ALL {
            assert_eq!(RuleSetId::parse(id.as_str()), Some(id));
            let json = serde_json::to_string(&id).unwrap();
            assert_eq!(json, format!("\"{}\"", id.as_str()));
        }
        assert_eq!(RuleSetId::parse(" set_004 "), Some(RuleSetId::Emergency));
        assert_eq!(RuleSetId::parse("SET_999"), None);
    }

    #[test]
    fn turkish_names_are_available() {
        assert_eq!(
            RuleSetId::Emergency.definition().localized_name(Locale::Tr),
            "Acil Durum"
        );
        assert_eq!(
            RuleSetId::Emergency.definition().localized_name(Locale::En),
            "Emergency"
        );
    }
}
