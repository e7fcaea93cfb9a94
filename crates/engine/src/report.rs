//! Human-readable reports in the two supported locales.

use crate::catalog::RuleSetId;
use crate::engine::ClassificationResult;
use crate::file_size::FileSizeReport;
use crate::quality::{GateStatus, QualityGateResult, QualityScore};
use crate::selector::RuleSetLoad;
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    Tr,
    En,
}

impl Locale {
    /// `tr` selects Turkish; any other tag reports in English
    pub fn from_tag(tag: &str) -> Self {
        if tag.trim().eq_ignore_ascii_case("tr") {
            Self::Tr
        } else {
            Self::En
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Tr => "tr",
            Self::En => "en",
        }
    }
}

struct QualityLabels {
    title: &'static str,
    overall: &'static str,
    breakdown: &'static str,
    metrics: [&'static str; 5],
    issues: &'static str,
    warnings: &'static str,
    recommendations: &'static str,
    result: &'static str,
}

const QUALITY_TR: QualityLabels = QualityLabels {
    title: "✅ KALİTE GATE RAPORU",
    overall: "📊 Genel Skor",
    breakdown: "🎯 KALİTE BREAKDOWN:",
    metrics: [
        "📏 Dosya Boyutu",
        "🧹 Kod Temizliği",
        "🔧 Sürdürülebilirlik",
        "⚡ Performans",
        "📚 Dokümantasyon",
    ],
    issues: "🔍 TESPİT EDİLEN SORUNLAR:",
    warnings: "⚠️ UYARILAR:",
    recommendations: "💡 İYİLEŞTİRME ÖNERİLERİ:",
    result: "✅ SONUÇ",
};

const QUALITY_EN: QualityLabels = QualityLabels {
    title: "✅ QUALITY GATE REPORT",
    overall: "📊 Overall Score",
    breakdown: "🎯 QUALITY BREAKDOWN:",
    metrics: [
        "📏 File Size",
        "🧹 Cleanliness",
        "🔧 Maintainability",
        "⚡ Performance",
        "📚 Documentation",
    ],
    issues: "🔍 ISSUES FOUND:",
    warnings: "⚠️ WARNINGS:",
    recommendations: "💡 RECOMMENDATIONS:",
    result: "✅ RESULT",
};

fn status_label(status: GateStatus, locale: Locale) -> &'static str {
    match (locale, status) {
        (Locale::Tr, GateStatus::Passed) => "BAŞARILI",
        (Locale::Tr, GateStatus::PassedWithWarnings) => "UYARILI",
        (Locale::Tr, GateStatus::Failed) => "BAŞARISIZ",
        (Locale::Tr, GateStatus::Blocked) => "BLOKE",
        (Locale::En, GateStatus::Passed) => "PASSED",
        (Locale::En, GateStatus::PassedWithWarnings) => "WARNINGS",
        (Locale::En, GateStatus::Failed) => "FAILED",
        (Locale::En, GateStatus::Blocked) => "BLOCKED",
    }
}

fn verdict(status: GateStatus, locale: Locale) -> &'static str {
    match (locale, status) {
        (Locale::Tr, GateStatus::Passed) => "İmplementasyon onaylandı",
        (Locale::Tr, GateStatus::Blocked) => "İmplementasyon bloke edildi",
        (Locale::Tr, _) => "Düzeltme gerekli",
        (Locale::En, GateStatus::Passed) => "Implementation approved",
        (Locale::En, GateStatus::Blocked) => "Implementation blocked",
        (Locale::En, _) => "Fixes required",
    }
}

fn numbered(out: &mut String, heading: &str, items: &[String]) {
    if items.is_empty() {
        return;
    }
    let _ = writeln!(out, "\n{heading}");
    for (i, item) in items.iter().enumerate() {
        let _ = writeln!(out, "   {}. {item}", i + 1);
    }
}

pub fn quality_report(result: &QualityGateResult, locale: Locale) -> String {
    let labels = match locale {
        Locale::Tr => &QUALITY_TR,
        Locale::En => &QUALITY_EN,
    };

    let mut out = String::new();
    let _ = writeln!(out, "{}", labels.title);
    let _ = writeln!(
        out,
        "{}: {}/100 ({})",
        labels.overall,
        result.overall_score,
        status_label(result.status, locale)
    );

    let _ = writeln!(out, "\n{}", labels.breakdown);
    let metrics: [&QualityScore; 5] = [
        &result.breakdown.file_size,
        &result.breakdown.cleanliness,
        &result.breakdown.maintainability,
        &result.breakdown.performance,
        &result.breakdown.documentation,
    ];
    for (label, metric) in labels.metrics.iter().zip(metrics) {
        let _ = writeln!(
            out,
            "   {label}: {}/100 - {}",
            metric.score,
            metric.status.as_str().to_uppercase()
        );
    }

    numbered(&mut out, labels.issues, &result.blockers);
    numbered(&mut out, labels.warnings, &result.warnings);
    numbered(&mut out, labels.recommendations, &result.recommendations);

    let _ = write!(
        out,
        "\n{}: {}",
        labels.result,
        verdict(result.status, locale)
    );
    out
}

pub fn context_report(result: &ClassificationResult, locale: Locale) -> String {
    let analysis = &result.context_analysis;
    let name = result.selected_rule_set.definition().localized_name(locale);
    let components = result.loaded_components.join(", ");

    let mut out = String::new();
    match locale {
        Locale::Tr => {
            out.push_str("🔍 CONTEXT ANALİZ RAPORU\n\n");
            let _ = writeln!(out, "🎯 Seçilen Kural Seti: {} ({name})", result.selected_rule_set);
            let _ = writeln!(out, "📦 Yüklenen Componentler: {components}\n");
            out.push_str("📊 Analiz Detayları:\n");
            let _ = writeln!(out, "   • Proje Tipi: {}", analysis.project_type.as_str());
            let _ = writeln!(out, "   • Karmaşıklık: {}", analysis.complexity.as_str());
            let _ = writeln!(out, "   • Kullanıcı Niyeti: {}", analysis.user_intent.as_str());
            let _ = writeln!(out, "   • Dosya Sayısı: {}", analysis.file_count);
            let _ = writeln!(
                out,
                "   • Dosya Boyutu Durumu: {}",
                analysis.file_size_status.as_str()
            );
        }
        Locale::En => {
            out.push_str("🔍 CONTEXT ANALYSIS REPORT\n\n");
            let _ = writeln!(out, "🎯 Selected Rule Set: {} ({name})", result.selected_rule_set);
            let _ = writeln!(out, "📦 Loaded Components: {components}\n");
            out.push_str("📊 Analysis Details:\n");
            let _ = writeln!(out, "   • Project Type: {}", analysis.project_type.as_str());
            let _ = writeln!(out, "   • Complexity: {}", analysis.complexity.as_str());
            let _ = writeln!(out, "   • User Intent: {}", analysis.user_intent.as_str());
            let _ = writeln!(out, "   • File Count: {}", analysis.file_count);
            let _ = writeln!(
                out,
                "   • File Size Status: {}",
                analysis.file_size_status.as_str()
            );
        }
    }
    if let Some(platform) = analysis.platform {
        let _ = writeln!(out, "   • Platform: {platform}");
    }

    let heading = match locale {
        Locale::Tr => "💡 Öneriler:",
        Locale::En => "💡 Recommendations:",
    };
    numbered(&mut out, heading, &result.recommendations);
    out
}

pub fn file_size_report(report: &FileSizeReport, locale: Locale) -> String {
    match locale {
        Locale::En => crate::file_size::status_summary(report),
        Locale::Tr => {
            let mut out = format!(
                "Dosya: {}\nSatır: {}\nDurum: {}\n",
                report.file_path,
                report.line_count,
                report.status.as_str().to_uppercase()
            );
            if let Some(action) = &report.required_action {
                let _ = writeln!(out, "Aksiyon: {action}");
            }
            out
        }
    }
}

pub fn rule_set_report(load: &RuleSetLoad, locale: Locale) -> String {
    if !load.is_loaded {
        return match locale {
            Locale::Tr => format!("❌ {} kural seti bulunamadı", load.rule_set_id),
            Locale::En => format!("❌ Rule set {} not found", load.rule_set_id),
        };
    }

    let name = RuleSetId::parse(&load.rule_set_id)
        .map_or(load.name.as_str(), |id| id.definition().localized_name(locale));
    let components = load.components.join(", ");
    match locale {
        Locale::Tr => format!(
            "📦 {} ({name}) yüklendi, {} component: {components}",
            load.rule_set_id,
            load.components.len()
        ),
        Locale::En => format!(
            "📦 Loaded {} ({name}) with {} components: {components}",
            load.rule_set_id,
            load.components.len()
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::file_size::{check, FileSizeInput};
    use crate::platform::Platform;
    use crate::quality::{GateInput, QualityGates, Stage};
    use crate::selector::load_by_id;
    use crate::types::{Complexity, ContextAnalysis};
    use pretty_assertions::assert_eq;

    #[test]
    fn locale_tags() {
        assert_eq!(Locale::from_tag("tr"), Locale::Tr);
        assert_eq!(Locale::from_tag("TR"), Locale::Tr);
        assert_eq!(Locale::from_tag("de"), Locale::En);
        assert_eq!(Locale::from_tag(""), Locale::En);
    }

    #[test]
    fn english_quality_report_layout() {
        let result = QualityGates::default().evaluate(GateInput::new(Stage::Pre, &[]));
        let report = quality_report(&result, Locale::En);
        assert_eq!(
            report,
            "✅ QUALITY GATE REPORT\n\
             📊 Overall Score: 88/100 (PASSED)\n\
             \n\
             🎯 QUALITY BREAKDOWN:\n   \
             📏 File Size: 100/100 - EXCELLENT\n   \
             🧹 Cleanliness: 90/100 - EXCELLENT\n   \
             🔧 Maintainability: 85/100 - GOOD\n   \
             ⚡ Performance: 80/100 - GOOD\n   \
             📚 Documentation: 75/100 - ACCEPTABLE\n\
             \n\
             ✅ RESULT: Implementation approved"
        );
    }

    #[test]
    fn turkish_quality_report_lists_problems() {
        let files = vec!["missing.ts".to_string()];
        let mut result = QualityGates::default().evaluate(GateInput::new(Stage::Post, &files));
        result.status = GateStatus::Blocked;
        result.blockers.push("File size quality is poor, refactoring required".to_string());

        let report = quality_report(&result, Locale::Tr);
        assert!(report.starts_with("✅ KALİTE GATE RAPORU\n📊 Genel Skor: 75/100 (BLOKE)\n"));
        assert!(report.contains("📏 Dosya Boyutu: 50/100 - NEEDS-IMPROVEMENT\n"));
        assert!(report.contains(
            "🔍 TESPİT EDİLEN SORUNLAR:\n   1. File size quality is poor, refactoring required\n"
        ));
        assert!(report.ends_with("✅ SONUÇ: İmplementasyon bloke edildi"));
    }

    #[test]
    fn context_report_in_both_locales() {
        let result = ClassificationResult {
            selected_rule_set: RuleSetId::ComplexProject,
            loaded_components: vec!["language-rules".to_string(), "mcp-tool-usage".to_string()],
            recommendations: vec!["Platform: linux".to_string()],
            context_analysis: ContextAnalysis {
                complexity: Complexity::Complex,
                platform: Some(Platform::Linux),
                ..ContextAnalysis::baseline()
            },
        };

        let en = context_report(&result, Locale::En);
        assert!(en.contains("🎯 Selected Rule Set: SET_002 (Complex Project)\n"));
        assert!(en.contains("📦 Loaded Components: language-rules, mcp-tool-usage\n\n"));
        assert!(en.contains("   • Complexity: complex\n"));
        assert!(en.contains("   • File Count: 0\n"));
        assert!(en.contains("   • Platform: linux\n"));
        assert!(en.ends_with("💡 Recommendations:\n   1. Platform: linux\n"));

        let tr = context_report(&result, Locale::Tr);
        assert!(tr.starts_with("🔍 CONTEXT ANALİZ RAPORU\n\n🎯 Seçilen Kural Seti: SET_002 (Karmaşık Proje)\n"));
        assert!(tr.contains("   • Karmaşıklık: complex\n"));
    }

    #[test]
    fn file_size_report_localizes_labels() {
        let input = FileSizeInput {
            file_content: Some("a\nb"),
            ..Default::default()
        };
        let report = check(&input).unwrap();
        assert_eq!(
            file_size_report(&report, Locale::Tr),
            "Dosya: memory\nSatır: 2\nDurum: SAFE\n"
        );
        assert_eq!(
            file_size_report(&report, Locale::En),
            "File: memory\nLines: 2\nStatus: SAFE\n"
        );
    }

    #[test]
    fn rule_set_lines() {
        assert_eq!(
            rule_set_report(&load_by_id("SET_003"), Locale::En),
            "📦 Loaded SET_003 (Education Mode) with 3 components: \
             language-rules, educational-approach, clean-code-standards"
        );
        assert_eq!(
            rule_set_report(&load_by_id("SET_404"), Locale::Tr),
            "❌ SET_404 kural seti bulunamadı"
        );
    }
}
