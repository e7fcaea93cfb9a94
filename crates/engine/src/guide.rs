//! Tiered learning material for education-mode requests.

use crate::report::Locale;
use crate::types::Complexity;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EducationalContent {
    /// In the user's language
    pub explanation: String,
    /// Always English
    pub code_example: String,
    pub step_by_step: Vec<String>,
    pub resources: Vec<String>,
    pub related_concepts: Vec<String>,
}

struct Tier {
    explanation_tr: &'static str,
    explanation_en: &'static str,
    code: &'static str,
    steps_tr: &'static [&'static str],
    steps_en: &'static [&'static str],
    resources: &'static [&'static str],
    related: &'static [&'static str],
}

const SIMPLE: Tier = Tier {
    explanation_tr: "Bu basit bir {topic} konusudur. Temel kavramları ve pratik kullanımını öğrenelim.",
    explanation_en: "This is a simple {topic} topic. Let's learn the basic concepts and practical usage.",
    code: "// Simple {topic} example\n\
           const example = {\n  basic: 'concept',\n  works: true\n};",
    steps_tr: &[
        "İlk adım: Temel yapıyı anlayın",
        "İkinci adım: Basit örnekle deneyin",
        "Üçüncü adım: Kendi projenizde kullanın",
    ],
    steps_en: &[
        "Step 1: Understand the basic structure",
        "Step 2: Try with a simple example",
        "Step 3: Apply in your own project",
    ],
    resources: &[
        "Official documentation",
        "Getting started guide",
        "Basic examples repository",
    ],
    related: &["fundamentals", "basics"],
};

const MODERATE: Tier = Tier {
    explanation_tr: "Bu orta seviye bir {topic} konusudur. Daha detaylı bilgi ve pratik örnekler içerir.",
    explanation_en: "This is a moderate {topic} topic with more detailed information and practical examples.",
    code: "// Moderate complexity {topic} example\n\
           interface Config {\n  property: string;\n  validate(): boolean;\n}\n\n\
           class Implementation implements Config {\n  property = 'value';\n\n  \
           validate() {\n    return this.property.length > 0;\n  }\n}",
    steps_tr: &[
        "İlk adım: Yapı ve pattern'leri inceleyin",
        "İkinci adım: Middleware ve interceptors ekleyin",
        "Üçüncü adım: Error handling ekleyin",
        "Dördüncü adım: Test edin ve optimize edin",
    ],
    steps_en: &[
        "Step 1: Examine structure and patterns",
        "Step 2: Add middleware and interceptors",
        "Step 3: Implement error handling",
        "Step 4: Test and optimize",
    ],
    resources: &[
        "Advanced documentation",
        "Design patterns",
        "Best practices guide",
        "Community examples",
    ],
    related: &["patterns", "architecture", "best-practices"],
};

const COMPLEX: Tier = Tier {
    explanation_tr: "Bu karmaşık bir {topic} konusudur. Derinlemesine anlayış ve uygulama gerektirir.",
    explanation_en: "This is a complex {topic} topic requiring in-depth understanding and application.",
    code: "// Complex {topic} example with advanced patterns\n\n\
           // 1. Base configuration\n\
           interface AdvancedConfig extends BaseConfig {\n  middleware: Middleware[];\n  \
           transformers: Transformer[];\n  validators: Validator[];\n}\n\n\
           // 2. Implementation with design patterns\n\
           class AdvancedImplementation implements AdvancedConfig {\n  constructor(\n    \
           private middleware: Middleware[],\n    private transformers: Transformer[],\n    \
           private validators: Validator[]\n  ) {}\n\n  \
           async process(data: unknown): Promise<ProcessedData> {\n    \
           // Complex processing logic\n  }\n}",
    steps_tr: &[
        "İlk adım: Mimariyi ve tasarım desenlerini inceleyin",
        "İkinci adım: Dependency injection kurun",
        "Üçüncü adım: Observer pattern ekleyin",
        "Dördüncü adım: Async operations yönetin",
        "Beşinci adım: Comprehensive testing yapın",
        "Altıncı adım: Performance optimization ekleyin",
    ],
    steps_en: &[
        "Step 1: Examine architecture and design patterns",
        "Step 2: Set up dependency injection",
        "Step 3: Add observer pattern",
        "Step 4: Manage async operations",
        "Step 5: Implement comprehensive testing",
        "Step 6: Add performance optimization",
    ],
    resources: &[
        "Architecture deep dive",
        "Design patterns catalog",
        "Advanced techniques",
        "Performance optimization",
        "Security best practices",
        "Enterprise examples",
    ],
    related: &[
        "architecture",
        "design-patterns",
        "dependency-injection",
        "observers",
        "async-patterns",
        "performance",
    ],
};

fn owned(items: &[&str]) -> Vec<String> {
    items.iter().map(|item| (*item).to_string()).collect()
}

pub fn generate(topic: &str, complexity: Complexity, locale: Locale) -> EducationalContent {
    let tier = match complexity {
        Complexity::Simple => &SIMPLE,
        Complexity::Moderate => &MODERATE,
        Complexity::Complex => &COMPLEX,
    };
    let (explanation, steps) = match locale {
        Locale::Tr => (tier.explanation_tr, tier.steps_tr),
        Locale::En => (tier.explanation_en, tier.steps_en),
    };

    EducationalContent {
        explanation: explanation.replace("{topic}", topic),
        code_example: tier.code.replace("{topic}", topic),
        step_by_step: owned(steps),
        resources: owned(tier.resources),
        related_concepts: owned(tier.related),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn tiers_grow_with_complexity() {
        let simple = generate("closures", Complexity::Simple, Locale::En);
        let moderate = generate("closures", Complexity::Moderate, Locale::En);
        let complex = generate("closures", Complexity::Complex, Locale::En);
        assert_eq!(simple.step_by_step.len(), 3);
        assert_eq!(moderate.step_by_step.len(), 4);
        assert_eq!(complex.step_by_step.len(), 6);
        assert_eq!(complex.related_concepts.len(), 6);
    }

    #[test]
    fn explanation_is_localized_but_code_is_not() {
        let tr = generate("async", Complexity::Simple, Locale::Tr);
        let en = generate("async", Complexity::Simple, Locale::En);
        assert_eq!(
            tr.explanation,
            "Bu basit bir async konusudur. Temel kavramları ve pratik kullanımını öğrenelim."
        );
        assert_eq!(tr.step_by_step[0], "İlk adım: Temel yapıyı anlayın");
        assert_eq!(tr.code_example, en.code_example);
        assert!(en.code_example.starts_with("// Simple async example\nconst example = {"));
    }
}
