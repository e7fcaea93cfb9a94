use crate::platform::Platform;
use serde::de::{self, Deserializer};
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};
use std::fmt;

/// What kind of work the request is about
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectType {
    New,
    Existing,
    Debugging,
    Refactoring,
}

impl ProjectType {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::New => "new",
            Self::Existing => "existing",
            Self::Debugging => "debugging",
            Self::Refactoring => "refactoring",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Complexity {
    Simple,
    Moderate,
    Complex,
}

impl Complexity {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Simple => "simple",
            Self::Moderate => "moderate",
            Self::Complex => "complex",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserIntent {
    Implementation,
    Learning,
    Fix,
    Optimize,
}

impl UserIntent {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Implementation => "implementation",
            Self::Learning => "learning",
            Self::Fix => "fix",
            Self::Optimize => "optimize",
        }
    }
}

/// File-size status of the request as a whole (safe / approaching / violation)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FileSizeStatus {
    #[default]
    Safe,
    Approaching,
    Violation,
}

impl FileSizeStatus {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Safe => "safe",
            Self::Approaching => "approaching",
            Self::Violation => "violation",
        }
    }
}

/// Bucketed number of target files.
///
/// Serialized as `0`, `1`, `"few"` (2–3) or `"many"` (more than 3).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FileCount {
    Zero,
    One,
    Few,
    Many,
}

impl FileCount {
    pub const fn from_len(len: usize) -> Self {
        match len {
            0 => Self::Zero,
            1 => Self::One,
            2..=3 => Self::Few,
            _ => Self::Many,
        }
    }
}

impl fmt::Display for FileCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Zero => f.write_str("0"),
            Self::One => f.write_str("1"),
            Self::Few => f.write_str("few"),
            Self::Many => f.write_str("many"),
        }
    }
}

impl Serialize for FileCount {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Zero => serializer.serialize_u8(0),
            Self::One => serializer.serialize_u8(1),
            Self::Few => serializer.serialize_str("few"),
            Self::Many => serializer.serialize_str("many"),
        }
    }
}

impl<'de> Deserialize<'de> for FileCount {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match serde_json::Value::deserialize(deserializer)? {
            serde_json::Value::Number(n) if n.as_u64() == Some(0) => Ok(Self::Zero),
            serde_json::Value::Number(n) if n.as_u64() == Some(1) => Ok(Self::One),
            serde_json::Value::String(s) if s == "few" => Ok(Self::Few),
            serde_json::Value::String(s) if s == "many" => Ok(Self::Many),
            other => Err(de::Error::custom(format!("invalid file count: {other}"))),
        }
    }
}

/// Structured classification of a single request.
///
/// Every field is derived from the current request's inputs only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContextAnalysis {
    pub project_type: ProjectType,
    pub complexity: Complexity,
    pub user_intent: UserIntent,
    pub file_count: FileCount,
    pub file_size_status: FileSizeStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub platform: Option<Platform>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub has_git_hub_repo: Option<bool>,
}

impl ContextAnalysis {
    /// Analysis with every axis at its documented default
    pub const fn baseline() -> Self {
        Self {
            project_type: ProjectType::Existing,
            complexity: Complexity::Moderate,
            user_intent: UserIntent::Implementation,
            file_count: FileCount::Zero,
            file_size_status: FileSizeStatus::Safe,
            platform: None,
            has_git_hub_repo: None,
        }
    }
}

/// Optional explicit hints supplied alongside the query
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectInfo {
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub project_type: Option<ProjectType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub framework: Option<String>,
}
