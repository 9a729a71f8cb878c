//! `WaymarkContext`: the process-wide glossary/pattern/LLKB/selector-catalog
//! caches, built once per CLI invocation and threaded by reference through
//! the rest of the pipeline (spec.md §5's three process-wide caches).

use std::cell::RefCell;
use std::path::{Path, PathBuf};

use anyhow::Context as _;
use waymark_core::glossary::Glossary;
use waymark_core::pattern_catalog::{catalog, PatternRecord};
use waymark_llkb::LlkbStore;
use waymark_selectors::{scan_source_tree, ScanOptions};
use waymark_types::SelectorCatalog;
use waymark_utils::atomic_write::atomic_write;

const DEFAULT_LLKB_RELATIVE_PATH: &str = ".waymark/learned-patterns.json";

pub struct WaymarkContext {
    root: PathBuf,
    config: waymark_config::WaymarkConfig,
    glossary: Glossary,
    pattern_records: Vec<PatternRecord>,
    llkb: Option<LlkbStore>,
    selector_catalog: RefCell<Option<SelectorCatalog>>,
}

impl WaymarkContext {
    /// Loads config from the fixed search list, builds the glossary (merged
    /// with an extension file when `llkb.glossaryPath` names one), builds the
    /// pattern catalog once, and opens the LLKB store if enabled. Nothing is
    /// scanned eagerly: the selector catalog is loaded lazily on first use.
    pub fn load(root: impl Into<PathBuf>) -> anyhow::Result<Self> {
        let root = root.into();
        let config = waymark_config::load_config(&root).context("loading waymark config")?;

        let glossary = match &config.llkb.glossary_path {
            Some(rel) => {
                let path = root.join(rel);
                let extension = std::fs::read_to_string(&path)
                    .with_context(|| format!("reading glossary extension at {}", path.display()))?;
                Glossary::with_extension(&extension)
            }
            None => Glossary::default_only(),
        };

        let llkb = if config.llkb.enabled {
            let rel = config
                .llkb
                .config_path
                .clone()
                .unwrap_or_else(|| DEFAULT_LLKB_RELATIVE_PATH.to_string());
            Some(LlkbStore::new(root.join(rel)))
        } else {
            None
        };

        Ok(Self {
            root,
            config,
            glossary,
            pattern_records: catalog(),
            llkb,
            selector_catalog: RefCell::new(None),
        })
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    #[must_use]
    pub fn config(&self) -> &waymark_config::WaymarkConfig {
        &self.config
    }

    #[must_use]
    pub fn glossary(&self) -> &Glossary {
        &self.glossary
    }

    #[must_use]
    pub fn pattern_records(&self) -> &[PatternRecord] {
        &self.pattern_records
    }

    #[must_use]
    pub fn llkb(&self) -> Option<&LlkbStore> {
        self.llkb.as_ref()
    }

    fn catalog_path(&self) -> PathBuf {
        self.root.join(&self.config.paths.catalog)
    }

    /// Returns the cached selector catalog, loading it from disk on first
    /// call. A missing catalog file is not an error: it means the tree has
    /// never been scanned yet, so callers get an empty catalog.
    pub fn selector_catalog(&self) -> anyhow::Result<SelectorCatalog> {
        if let Some(cached) = self.selector_catalog.borrow().as_ref() {
            return Ok(cached.clone());
        }

        let path = self.catalog_path();
        let loaded = if path.exists() {
            let raw = std::fs::read_to_string(&path)
                .with_context(|| format!("reading selector catalog at {}", path.display()))?;
            serde_json::from_str(&raw).context("parsing selector catalog JSON")?
        } else {
            SelectorCatalog { version: 1, ..Default::default() }
        };

        *self.selector_catalog.borrow_mut() = Some(loaded.clone());
        Ok(loaded)
    }

    /// Re-scans the source tree under `scan_root`, persists the result
    /// atomically to `paths.catalog`, and invalidates the in-memory cache in
    /// favor of the freshly written one (spec.md §5: caches invalidated on
    /// write).
    pub fn refresh_selector_catalog(&self, scan_root: impl Into<PathBuf>) -> anyhow::Result<SelectorCatalog> {
        let options = ScanOptions::new(scan_root.into());
        let fresh = scan_source_tree(&options).context("scanning source tree for selectors")?;

        let bytes = serde_json::to_vec_pretty(&fresh).context("serializing selector catalog")?;
        let path = self.catalog_path();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("creating selector catalog directory {}", parent.display()))?;
        }
        atomic_write(&path, &bytes).with_context(|| format!("writing selector catalog to {}", path.display()))?;

        *self.selector_catalog.borrow_mut() = Some(fresh.clone());
        Ok(fresh)
    }
}
