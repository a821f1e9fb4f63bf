//! 风格指南：按场景提供术语表与禁用词，用于结果标注（不影响校验结论）。
//!
//! Style guide collaborator.
//!
//! A [`StyleGuide`] holds one [`SceneGuide`] per scene (e.g. `"finance"`, `"general"`).
//! [`StyleGuide::lint`] annotates text with [`PolicyHit`]s for banned terms and for glossary
//! terms that have a canonical replacement. Hits are annotations only; they never change
//! whether a candidate is accepted.
//!
//! ```rust
//! use ai_polish::style_guide::StyleGuide;
//!
//! let guide = StyleGuide::from_yaml_str(r#"
//! scenes:
//!   finance:
//!     tone: [formal]
//!     glossary: { "APP": "应用程序" }
//!     banned_terms: ["稳赚"]
//! "#).unwrap();
//!
//! let hits = guide.lint("稳赚的APP", "finance");
//! assert_eq!(hits.len(), 2);
//! ```

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::path::Path;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneGuide {
    pub tone: Vec<String>,
    /// `term -> canonical`
    pub glossary: BTreeMap<String, String>,
    pub banned_terms: Vec<String>,
    pub rules: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StyleGuide {
    pub scenes: HashMap<String, SceneGuide>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PolicyHitKind {
    Banned,
    Glossary,
}

/// A style-guide annotation on a piece of text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolicyHit {
    pub kind: PolicyHitKind,
    pub term: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
}

impl StyleGuide {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_yaml_str(yaml: &str) -> crate::Result<Self> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    pub fn from_path(path: impl AsRef<Path>) -> crate::Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&raw)
    }

    pub fn with_scene(mut self, name: impl Into<String>, scene: SceneGuide) -> Self {
        self.scenes.insert(name.into(), scene);
        self
    }

    pub fn scene(&self, name: &str) -> Option<&SceneGuide> {
        self.scenes.get(name)
    }

    /// Glossary for a scene, empty when the scene is unknown.
    pub fn glossary(&self, scene: &str) -> BTreeMap<String, String> {
        self.scene(scene)
            .map(|s| s.glossary.clone())
            .unwrap_or_default()
    }

    /// Banned terms first, then glossary terms, each in declaration order.
    pub fn lint(&self, text: &str, scene: &str) -> Vec<PolicyHit> {
        let Some(guide) = self.scene(scene) else {
            return Vec::new();
        };
        let lower = text.to_lowercase();
        let mut hits = Vec::new();

        for term in &guide.banned_terms {
            if !term.is_empty() && lower.contains(&term.to_lowercase()) {
                hits.push(PolicyHit {
                    kind: PolicyHitKind::Banned,
                    term: term.clone(),
                    suggestion: None,
                });
            }
        }
        for (term, canonical) in &guide.glossary {
            if !term.is_empty() && text.contains(term.as_str()) {
                hits.push(PolicyHit {
                    kind: PolicyHitKind::Glossary,
                    term: term.clone(),
                    suggestion: Some(canonical.clone()),
                });
            }
        }
        hits
    }
}
