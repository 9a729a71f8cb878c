//! Persistent LLKB store: a JSON file of learned patterns with a 5-second
//! in-process TTL cache and Wilson-score confidence (spec.md §4.6).
//!
//! Grounded on the teacher's `context::fact_store::FactStore` persistent-
//! store shape (open/store/query API over one backing store) combined with
//! `waymark_utils::atomic_write`'s temp-file-then-rename write path. Does
//! NOT use `rusqlite` like the teacher's fact store: spec.md fixes the
//! on-disk format as a single JSON file, not a database (see `DESIGN.md`).

use std::cell::RefCell;
use std::path::{Path, PathBuf};
use std::time::{Instant, SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use waymark_core::glossary::Glossary;
use waymark_core::step_mapper::{LlkbHit, LlkbLookup};
use waymark_types::{wilson_lower_bound, JourneyId, LearnedPattern, PatternId, Primitive};
use waymark_utils::atomic_write::atomic_write;
use waymark_utils::ttl_cache::TtlCache;

use crate::errors::LlkbError;

const CACHE_TTL_SECS: u64 = 5;
const STORE_SCHEMA_VERSION: u32 = 1;

/// `{version, lastUpdated, patterns}` (spec.md §6's "Learned-patterns file").
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LlkbFile {
    version: u32,
    last_updated: i64,
    patterns: Vec<LearnedPattern>,
}

/// Thresholds for [`LlkbStore::prune_patterns`] (spec.md §4.6).
#[derive(Debug, Clone, Copy)]
pub struct PruneOptions {
    pub max_age_days: u32,
    pub min_confidence: f64,
    pub min_success: u32,
}

impl Default for PruneOptions {
    fn default() -> Self {
        Self {
            max_age_days: 90,
            min_confidence: 0.3,
            min_success: 1,
        }
    }
}

/// Promotion thresholds for [`LlkbStore::get_promotable_patterns`] (spec.md §4.6).
const PROMOTION_MIN_CONFIDENCE: f64 = 0.9;
const PROMOTION_MIN_SUCCESS: u32 = 5;

pub struct LlkbStore {
    path: PathBuf,
    glossary: Glossary,
    cache: RefCell<TtlCache<Vec<LearnedPattern>>>,
}

impl LlkbStore {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            glossary: Glossary::default_only(),
            cache: RefCell::new(TtlCache::new(std::time::Duration::from_secs(CACHE_TTL_SECS))),
        }
    }

    fn read_from_disk(&self) -> Result<Vec<LearnedPattern>, LlkbError> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        let raw = std::fs::read_to_string(&self.path)
            .map_err(|e| LlkbError::io(self.path.display().to_string(), e.to_string()))?;
        let file: LlkbFile = serde_json::from_str(&raw)
            .map_err(|e| LlkbError::io(self.path.display().to_string(), e.to_string()))?;
        Ok(file.patterns)
    }

    fn write_to_disk(&self, patterns: &[LearnedPattern]) -> Result<(), LlkbError> {
        let file = LlkbFile {
            version: STORE_SCHEMA_VERSION,
            last_updated: now_epoch_secs(),
            patterns: patterns.to_vec(),
        };
        let bytes = serde_json::to_vec_pretty(&file)
            .map_err(|e| LlkbError::io(self.path.display().to_string(), e.to_string()))?;
        atomic_write(&self.path, &bytes)
            .map_err(|e| LlkbError::io(self.path.display().to_string(), e.to_string()))
    }

    /// Cached patterns snapshot, refreshed from disk when the 5s TTL has lapsed.
    fn snapshot(&self) -> Result<Vec<LearnedPattern>, LlkbError> {
        let now = Instant::now();
        if let Some(cached) = self.cache.borrow().get(now) {
            return Ok(cached.clone());
        }
        let loaded = self.read_from_disk()?;
        self.cache.borrow_mut().set(now, loaded.clone());
        Ok(loaded)
    }

    /// Append-then-rewrite: write the full pattern list and invalidate the cache.
    fn persist(&self, patterns: Vec<LearnedPattern>) -> Result<(), LlkbError> {
        self.write_to_disk(&patterns)?;
        self.cache.borrow_mut().invalidate();
        Ok(())
    }

    #[must_use]
    fn normalize(&self, text: &str) -> String {
        self.glossary.normalize_step_text(text)
    }

    /// `matchLlkbPattern(text, {minConfidence})` (spec.md §4.6): the first
    /// non-promoted pattern whose `normalizedText` equals `normalizeStepText(text)`
    /// and whose confidence meets the threshold.
    pub fn match_llkb_pattern(
        &self,
        text: &str,
        min_confidence: f64,
    ) -> Result<Option<LearnedPattern>, LlkbError> {
        let normalized = self.normalize(text);
        let patterns = self.snapshot()?;
        Ok(patterns
            .into_iter()
            .find(|p| !p.promoted_to_core && p.normalized_text == normalized && p.confidence >= min_confidence))
    }

    /// Create-or-update a learned pattern for `text`, incrementing its
    /// success count and recomputing confidence (spec.md §4.6).
    pub fn record_pattern_success(
        &self,
        text: &str,
        primitive: Primitive,
        journey_id: JourneyId,
    ) -> Result<LearnedPattern, LlkbError> {
        let normalized = self.normalize(text);
        let mut patterns = self.snapshot()?;
        let now = now_epoch_secs();

        let updated = match patterns.iter_mut().find(|p| p.normalized_text == normalized) {
            Some(existing) => {
                existing.success_count += 1;
                existing.confidence = wilson_lower_bound(existing.success_count, existing.total_observations());
                existing.mapped_primitive = primitive;
                existing.last_used = now;
                if !existing.source_journeys.contains(&journey_id) {
                    existing.source_journeys.push(journey_id);
                }
                existing.clone()
            }
            None => {
                let fresh = LearnedPattern {
                    id: pattern_id_for(&normalized),
                    original_text: text.to_string(),
                    normalized_text: normalized,
                    mapped_primitive: primitive,
                    confidence: wilson_lower_bound(1, 1),
                    success_count: 1,
                    fail_count: 0,
                    source_journeys: vec![journey_id],
                    last_used: now,
                    created_at: now,
                    promoted_to_core: false,
                    promoted_at: None,
                };
                patterns.push(fresh.clone());
                fresh
            }
        };

        self.persist(patterns)?;
        Ok(updated)
    }

    /// Increment `failCount` and recompute confidence for the pattern matching
    /// `text`, if one exists. A failure against a never-seen pattern is a
    /// no-op: there is nothing to decay (spec.md §4.6).
    pub fn record_pattern_failure(
        &self,
        text: &str,
        journey_id: JourneyId,
    ) -> Result<Option<LearnedPattern>, LlkbError> {
        let normalized = self.normalize(text);
        let mut patterns = self.snapshot()?;

        let Some(existing) = patterns.iter_mut().find(|p| p.normalized_text == normalized) else {
            return Ok(None);
        };
        existing.fail_count += 1;
        existing.confidence = wilson_lower_bound(existing.success_count, existing.total_observations());
        existing.last_used = now_epoch_secs();
        if !existing.source_journeys.contains(&journey_id) {
            existing.source_journeys.push(journey_id);
        }
        let updated = existing.clone();

        self.persist(patterns)?;
        Ok(Some(updated))
    }

    /// Confidence ≥ 0.9 AND successCount ≥ 5 AND ≥ 2 distinct source
    /// journeys AND not already promoted (spec.md §4.6).
    pub fn get_promotable_patterns(&self) -> Result<Vec<LearnedPattern>, LlkbError> {
        let patterns = self.snapshot()?;
        Ok(patterns
            .into_iter()
            .filter(|p| p.is_promotable(PROMOTION_MIN_CONFIDENCE, PROMOTION_MIN_SUCCESS))
            .collect())
    }

    /// Mark patterns promoted — hidden from runtime matching from then on.
    /// Per spec.md §9's Open Question decision, promotion is advisory only:
    /// this never publishes a pattern into the compiled-in catalog.
    pub fn promote(&self, pattern_id: &PatternId) -> Result<bool, LlkbError> {
        let mut patterns = self.snapshot()?;
        let Some(pattern) = patterns.iter_mut().find(|p| &p.id == pattern_id) else {
            return Ok(false);
        };
        pattern.promoted_to_core = true;
        pattern.promoted_at = Some(now_epoch_secs());
        self.persist(patterns)?;
        Ok(true)
    }

    /// Every promoted pattern, for an explicit export step — the advisory
    /// promotion target left underspecified by spec.md §9.
    pub fn export_promoted(&self) -> Result<Vec<LearnedPattern>, LlkbError> {
        let patterns = self.snapshot()?;
        Ok(patterns.into_iter().filter(|p| p.promoted_to_core).collect())
    }

    /// Remove patterns below the given thresholds. Promoted patterns are
    /// always retained regardless of age or confidence (spec.md §4.6).
    pub fn prune_patterns(&self, options: PruneOptions) -> Result<usize, LlkbError> {
        let patterns = self.snapshot()?;
        let now = now_epoch_secs();
        let max_age_secs = i64::from(options.max_age_days) * 86_400;

        let (keep, pruned): (Vec<_>, Vec<_>) = patterns.into_iter().partition(|p| {
            p.promoted_to_core
                || (p.confidence >= options.min_confidence
                    && p.success_count >= options.min_success
                    && now.saturating_sub(p.last_used) <= max_age_secs)
        });

        if !pruned.is_empty() {
            self.persist(keep)?;
        }
        Ok(pruned.len())
    }
}

impl LlkbLookup for LlkbStore {
    fn match_llkb_pattern(&self, normalized_text: &str, min_confidence: f64) -> Option<LlkbHit> {
        // `normalized_text` arrives already glossary-normalized by the step
        // mapper; re-normalizing here is idempotent and keeps this impl
        // self-consistent if ever called directly with raw step text.
        let pattern = Self::match_llkb_pattern(self, normalized_text, min_confidence)
            .ok()
            .flatten()?;
        Some(LlkbHit {
            pattern_id: pattern.id,
            primitive: pattern.mapped_primitive,
            confidence: pattern.confidence,
        })
    }
}

fn pattern_id_for(normalized_text: &str) -> PatternId {
    let mut hasher = Sha256::new();
    hasher.update(normalized_text.as_bytes());
    let digest = hasher.finalize();
    let hex: String = digest.iter().take(6).map(|b| format!("{b:02x}")).collect();
    PatternId::new(format!("pat-{hex}"))
}

fn now_epoch_secs() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn journey(id: &str) -> JourneyId {
        JourneyId::new(id).expect("valid id")
    }

    fn click_primitive() -> Primitive {
        Primitive::Click {
            locator: waymark_types::LocatorSpec::new(waymark_types::LocatorStrategy::Label, "Accept"),
        }
    }

    #[test]
    fn record_success_then_match_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let store = LlkbStore::new(dir.path().join("learned-patterns.json"));

        store
            .record_pattern_success("User accepts terms", click_primitive(), journey("JRN-0001"))
            .unwrap();

        let hit = store.match_llkb_pattern("User accepts terms", 0.0).unwrap();
        assert!(hit.is_some());
    }

    #[test]
    fn confidence_never_decreases_on_success_at_fixed_fail_count() {
        let dir = tempfile::tempdir().unwrap();
        let store = LlkbStore::new(dir.path().join("learned-patterns.json"));

        let mut prev = 0.0;
        for _ in 0..10 {
            let pattern = store
                .record_pattern_success("Archive the record", click_primitive(), journey("JRN-0001"))
                .unwrap();
            assert!(pattern.confidence >= prev);
            prev = pattern.confidence;
        }
    }

    #[test]
    fn confidence_never_increases_on_failure_at_fixed_success_count() {
        let dir = tempfile::tempdir().unwrap();
        let store = LlkbStore::new(dir.path().join("learned-patterns.json"));
        store
            .record_pattern_success("Archive the record", click_primitive(), journey("JRN-0001"))
            .unwrap();

        let mut prev = 1.0;
        for _ in 0..10 {
            let pattern = store
                .record_pattern_failure("Archive the record", journey("JRN-0001"))
                .unwrap()
                .unwrap();
            assert!(pattern.confidence <= prev);
            prev = pattern.confidence;
        }
    }

    #[test]
    fn promoted_pattern_is_invisible_to_match() {
        let dir = tempfile::tempdir().unwrap();
        let store = LlkbStore::new(dir.path().join("learned-patterns.json"));
        let pattern = store
            .record_pattern_success("Archive the record", click_primitive(), journey("JRN-0001"))
            .unwrap();

        store.promote(&pattern.id).unwrap();
        let hit = store.match_llkb_pattern("Archive the record", 0.0).unwrap();
        assert!(hit.is_none());
    }

    #[test]
    fn promotable_requires_two_distinct_journeys() {
        let dir = tempfile::tempdir().unwrap();
        let store = LlkbStore::new(dir.path().join("learned-patterns.json"));
        for _ in 0..6 {
            store
                .record_pattern_success("Archive the record", click_primitive(), journey("JRN-0001"))
                .unwrap();
        }
        assert!(store.get_promotable_patterns().unwrap().is_empty());

        store
            .record_pattern_success("Archive the record", click_primitive(), journey("JRN-0002"))
            .unwrap();
        assert_eq!(store.get_promotable_patterns().unwrap().len(), 1);
    }

    #[test]
    fn prune_removes_stale_low_confidence_patterns_but_keeps_promoted() {
        let dir = tempfile::tempdir().unwrap();
        let store = LlkbStore::new(dir.path().join("learned-patterns.json"));
        let weak = store
            .record_pattern_success("Do a rare thing", click_primitive(), journey("JRN-0001"))
            .unwrap();
        store.record_pattern_failure("Do a rare thing", journey("JRN-0001")).unwrap();
        store.promote(&weak.id).unwrap();

        let pruned = store
            .prune_patterns(PruneOptions {
                max_age_days: 0,
                min_confidence: 0.99,
                min_success: 100,
            })
            .unwrap();
        assert_eq!(pruned, 0, "promoted pattern must survive pruning");
    }

    #[test]
    fn cache_serves_stale_reads_within_ttl_without_touching_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("learned-patterns.json");
        let store = LlkbStore::new(&path);
        store
            .record_pattern_success("Archive the record", click_primitive(), journey("JRN-0001"))
            .unwrap();

        std::fs::remove_file(&path).unwrap();
        let hit = store.match_llkb_pattern("Archive the record", 0.0).unwrap();
        assert!(hit.is_some(), "TTL cache should still serve the in-memory snapshot");
    }
}
