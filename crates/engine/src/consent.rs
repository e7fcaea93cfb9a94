//! Environment-driven push-permission gate, checked once per request.

use crate::report::Locale;
use serde::{Deserialize, Serialize};
use std::env;

/// When truthy, requests are blocked unless [`CONSENT_GRANTED_ENV`] is truthy too
pub const CONSENT_REQUIRED_ENV: &str = "MCP_REQUIRE_GITHUB_CONSENT";
pub const CONSENT_GRANTED_ENV: &str = "GITHUB_PUSH_ALLOWED";

const BLOCKED_TR: &str = "🛑 İŞLEM DURDURULDU\n🔒 GitHub izni bulunmuyor.";
const BLOCKED_EN: &str = "Request blocked: GitHub permission missing.";
const PASSED_TR: &str = "✅ İzin kontrolü geçti";
const PASSED_EN: &str = "✅ Consent check passed";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConsentFlags {
    pub required: bool,
    pub granted: bool,
}

impl ConsentFlags {
    pub fn from_env() -> Self {
        Self {
            required: env_truthy(CONSENT_REQUIRED_ENV),
            granted: env_truthy(CONSENT_GRANTED_ENV),
        }
    }

    pub fn check(self, locale: Locale) -> ConsentDecision {
        if self.required && !self.granted {
            log::info!("request blocked: push consent required but not granted");
            return ConsentDecision {
                passed: false,
                message: Some(blocked_message(locale).to_string()),
            };
        }
        ConsentDecision {
            passed: true,
            message: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConsentDecision {
    pub passed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

pub const fn blocked_message(locale: Locale) -> &'static str {
    match locale {
        Locale::Tr => BLOCKED_TR,
        Locale::En => BLOCKED_EN,
    }
}

pub const fn passed_message(locale: Locale) -> &'static str {
    match locale {
        Locale::Tr => PASSED_TR,
        Locale::En => PASSED_EN,
    }
}

fn env_truthy(var: &str) -> bool {
    env::var(var).map(|v| is_truthy(&v)).unwrap_or(false)
}

fn is_truthy(value: &str) -> bool {
    let value = value.trim();
    value == "1" || value.eq_ignore_ascii_case("true")
}
