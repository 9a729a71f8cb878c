//! Selector catalog data shapes (spec.md §3's "versioned map").
//!
//! Scanning/inference logic lives in `waymark-selectors`; this module only
//! defines the serializable shape shared between the scanner, the renderer,
//! and the on-disk catalog file.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectorEntry {
    pub id: String,
    pub description: String,
    pub test_id: Option<String>,
    pub role: Option<String>,
    pub name: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ComponentEntry {
    #[serde(default)]
    pub selectors: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PageEntry {
    #[serde(default)]
    pub components: Vec<String>,
    #[serde(default)]
    pub selectors: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CssDebtPriority {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CssUsage {
    pub file: String,
    pub line: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CssDebtEntry {
    pub selector: String,
    pub usages: Vec<CssUsage>,
    pub priority: CssDebtPriority,
    pub reason: String,
}

/// `{selectors, components, pages, testIds, cssDebt}` (spec.md §3).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SelectorCatalog {
    pub version: u32,
    #[serde(default)]
    pub selectors: BTreeMap<String, SelectorEntry>,
    #[serde(default)]
    pub components: BTreeMap<String, ComponentEntry>,
    #[serde(default)]
    pub pages: BTreeMap<String, PageEntry>,
    #[serde(default)]
    pub test_ids: Vec<String>,
    #[serde(default)]
    pub css_debt: Vec<CssDebtEntry>,
}

impl SelectorCatalog {
    #[must_use]
    pub fn has_test_id(&self, test_id: &str) -> bool {
        self.test_ids.iter().any(|t| t == test_id)
    }
}
