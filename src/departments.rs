//! Department rules and the catalog of known departments.
//!
//! A [`DepartmentRule`] holds the system prompt for one department. The
//! [`DepartmentRegistry`] starts with the `saude` rule and grows lazily: the
//! first enhancement for an unknown code synthesizes a rule from the shared
//! template and stores it. Rules are never replaced or removed.
//!
//! [`DEPARTMENTS`] lists the codes the migration team works with. Any other
//! code is still accepted.

use crate::prompts::{render_department_prompt, SAUDE_DISPLAY_NAME};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, warn};

/// Prompt rule for one department.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DepartmentRule {
    /// Department code; also the registry key.
    pub name: String,
    pub prompt: String,
}

impl DepartmentRule {
    /// Rule rendered from the shared template, with the display name
    /// derived from the code by [`display_name`].
    pub fn synthesize(code: &str) -> Self {
        Self {
            name: code.to_string(),
            prompt: render_department_prompt(code, &display_name(code)),
        }
    }
}

/// Display name derived from a department code: the first character
/// upper-cased, the rest left as is (`saude` → `Saude`, `sema-df` → `Sema-df`).
pub fn display_name(code: &str) -> String {
    let mut chars = code.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Append-only registry of department rules, safe to share across tasks.
pub struct DepartmentRegistry {
    rules: RwLock<HashMap<String, Arc<DepartmentRule>>>,
}

impl Default for DepartmentRegistry {
    fn default() -> Self {
        let registry = Self::empty();
        registry.register(DepartmentRule {
            name: "saude".to_string(),
            prompt: render_department_prompt("saude", SAUDE_DISPLAY_NAME),
        });
        registry
    }
}

impl DepartmentRegistry {
    /// Registry with the pre-registered `saude` rule.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with no rules at all.
    pub fn empty() -> Self {
        Self {
            rules: RwLock::new(HashMap::new()),
        }
    }

    /// Store `rule` under its name unless that name is already taken.
    ///
    /// Returns `true` when the rule was inserted. An existing rule always
    /// wins.
    pub fn register(&self, rule: DepartmentRule) -> bool {
        let mut rules = self.rules.write();
        if rules.contains_key(&rule.name) {
            return false;
        }
        rules.insert(rule.name.clone(), Arc::new(rule));
        true
    }

    pub fn get(&self, code: &str) -> Option<Arc<DepartmentRule>> {
        self.rules.read().get(code).cloned()
    }

    /// Rule for `code`, synthesizing and storing it on first use.
    ///
    /// Concurrent first calls for the same code all receive the rule that
    /// was stored first.
    pub fn get_or_synthesize(&self, code: &str) -> Arc<DepartmentRule> {
        if let Some(rule) = self.get(code) {
            return rule;
        }

        if find_department(code).is_none() {
            warn!("Department '{}' is not in the catalog; using a generated prompt", code);
        }

        let mut rules = self.rules.write();
        Arc::clone(rules.entry(code.to_string()).or_insert_with(|| {
            debug!("Synthesized prompt rule for department '{}'", code);
            Arc::new(DepartmentRule::synthesize(code))
        }))
    }

    pub fn len(&self) -> usize {
        self.rules.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.read().is_empty()
    }
}

/// A known department: path code and the label shown to operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Department {
    pub code: &'static str,
    pub label: &'static str,
}

const fn dept(code: &'static str, label: &'static str) -> Department {
    Department { code, label }
}

/// Departments whose pages are being migrated.
pub const DEPARTMENTS: &[Department] = &[
    dept("smdf", "Secretaria da Mulher"),
    dept("sedes", "Secretaria de Desenvolvimento Social"),
    dept("segov", "Segov"),
    dept("seec", "Economia"),
    dept("defesacivil", "Defesa Civil"),
    dept("casamilitar", "Casa Militar"),
    dept("esg", "Esg"),
    dept("semob", "Semob"),
    dept("esporte", "SELDF"),
    dept("secec", "Secec"),
    dept("seac", "Seac"),
    dept("sepd", "Sepd"),
    dept("vice", "Vice"),
    dept("sefjdf", "Sefjdf"),
    dept("sema-df", "Sema"),
    dept("educacao", "Educação"),
    dept("so", "Obras e Infraestrutura"),
    dept("sedet", "SEDET"),
    dept("setur", "Turismo"),
    dept("seduh", "Seduh"),
    dept("undf", "Universidade"),
    dept("slu", "SLU"),
    dept("seagri", "Seagri"),
    dept("fhb", "FHB"),
    dept("dflegal", "DF Legal"),
    dept("saude", "Saúde"),
    dept("der", "DER"),
];

/// Catalog entry for `code`. Matching is case-sensitive.
pub fn find_department(code: &str) -> Option<&'static Department> {
    DEPARTMENTS.iter().find(|d| d.code == code)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn saude_is_preregistered() {
        let registry = DepartmentRegistry::new();
        assert_eq!(registry.len(), 1);
        let rule = registry.get("saude").unwrap();
        assert!(rule.prompt.contains("Secretaria de Saúde"));
    }

    #[test]
    fn saude_rule_is_not_overwritten() {
        let registry = DepartmentRegistry::new();
        let replaced = registry.register(DepartmentRule {
            name: "saude".into(),
            prompt: "outro".into(),
        });
        assert!(!replaced);
        assert_ne!(registry.get("saude").unwrap().prompt, "outro");
        assert_ne!(registry.get_or_synthesize("saude").prompt, "outro");
    }

    #[test]
    fn get_or_synthesize_is_idempotent() {
        let registry = DepartmentRegistry::new();
        let first = registry.get_or_synthesize("seec");
        let second = registry.get_or_synthesize("seec");
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(registry.len(), 2);
        assert!(first.prompt.contains("Secretaria de Seec."));
        assert!(first.prompt.contains("/documents/d/seec/"));
    }

    #[test]
    fn unknown_codes_are_accepted() {
        let registry = DepartmentRegistry::empty();
        let rule = registry.get_or_synthesize("nova-secretaria");
        assert_eq!(rule.name, "nova-secretaria");
        assert!(rule.prompt.contains("Secretaria de Nova-secretaria."));
    }

    #[test]
    fn display_name_capitalizes_first_char_only() {
        assert_eq!(display_name("saude"), "Saude");
        assert_eq!(display_name("sema-df"), "Sema-df");
        assert_eq!(display_name("educacao"), "Educacao");
        assert_eq!(display_name("DER"), "DER");
        assert_eq!(display_name(""), "");
    }

    #[test]
    fn catalog_has_unique_codes() {
        assert_eq!(DEPARTMENTS.len(), 27);
        for (i, d) in DEPARTMENTS.iter().enumerate() {
            assert!(
                DEPARTMENTS[i + 1..].iter().all(|o| o.code != d.code),
                "duplicate code {}",
                d.code
            );
        }
    }

    #[test]
    fn catalog_lookup_is_case_sensitive() {
        assert_eq!(find_department("dflegal").unwrap().label, "DF Legal");
        assert!(find_department("DFLEGAL").is_none());
    }

    #[test]
    fn registry_is_shareable_across_threads() {
        let registry = Arc::new(DepartmentRegistry::new());
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let registry = Arc::clone(&registry);
                std::thread::spawn(move || registry.get_or_synthesize("der"))
            })
            .collect();
        let rules: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        for rule in &rules[1..] {
            assert!(Arc::ptr_eq(&rules[0], rule));
        }
        assert_eq!(registry.len(), 2);
    }
}
