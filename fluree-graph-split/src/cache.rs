//! Per-job prefix table cache.
//!
//! Many readers work on the same file; the first to ask for a file's table
//! builds it and every other reader blocks on the same cell and shares the
//! result. The cache is an explicit object owned by the job, not a global.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::SystemTime;

use once_cell::sync::OnceCell;
use parking_lot::Mutex;
use rustc_hash::FxHashMap;

use crate::config::{PrefixScanMode, SplitConfig};
use crate::error::Result;
use crate::format::{FormatKind, FormatRules};
use crate::prefix::PrefixTable;
use crate::source::ByteSource;

/// Identity of a file as seen by the builder.
///
/// A file that changes size or modification time gets a new entry, as does
/// a different format, scan window or mode.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct FileKey {
    pub path: PathBuf,
    pub format: FormatKind,
    pub len: u64,
    pub modified: Option<SystemTime>,
    pub max_scan: u64,
    pub mode: PrefixScanMode,
}

impl FileKey {
    pub fn new(
        source: &dyn ByteSource,
        format: FormatKind,
        max_scan: u64,
        mode: PrefixScanMode,
    ) -> Self {
        Self {
            path: source.path().to_path_buf(),
            format,
            len: source.len(),
            modified: source.modified(),
            max_scan: match mode {
                PrefixScanMode::Leading => max_scan,
                PrefixScanMode::FullFile => source.len(),
            },
            mode,
        }
    }
}

type Slot = Arc<OnceCell<Arc<PrefixTable>>>;

/// Build-once cache of prefix tables, keyed by [`FileKey`].
#[derive(Default)]
pub struct PrefixTableCache {
    slots: Mutex<FxHashMap<FileKey, Slot>>,
}

impl PrefixTableCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// The table for `source`, building it on first request.
    ///
    /// Concurrent callers for the same key wait for one build. A failed
    /// build leaves the slot empty, so a later call retries.
    pub fn get_or_build(
        &self,
        source: &mut dyn ByteSource,
        rules: &'static FormatRules,
        config: &SplitConfig,
    ) -> Result<Arc<PrefixTable>> {
        let max_scan = config.max_prefix_scan_bytes(rules.kind);
        let key = FileKey::new(source, rules.kind, max_scan, config.prefix_scan_mode);

        // Hold the map lock only long enough to find the slot.
        let slot = {
            let mut slots = self.slots.lock();
            Arc::clone(slots.entry(key.clone()).or_default())
        };

        if let Some(table) = slot.get() {
            tracing::debug!(path = %key.path.display(), "prefix table cache hit");
            return Ok(Arc::clone(table));
        }

        let table = slot.get_or_try_init(|| {
            tracing::debug!(path = %key.path.display(), "prefix table cache miss");
            PrefixTable::build(source, rules, max_scan, config.prefix_scan_mode).map(Arc::new)
        })?;
        Ok(Arc::clone(table))
    }

    /// Cached table for `path`, if any entry for it has been built.
    pub fn get(&self, path: &Path) -> Option<Arc<PrefixTable>> {
        let slots = self.slots.lock();
        slots
            .iter()
            .filter(|(key, _)| key.path == path)
            .find_map(|(_, slot)| slot.get().cloned())
    }

    /// Number of built tables.
    pub fn len(&self) -> usize {
        self.slots
            .lock()
            .values()
            .filter(|slot| slot.get().is_some())
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        self.slots.lock().clear();
    }
}

impl std::fmt::Debug for PrefixTableCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PrefixTableCache")
            .field("tables", &self.len())
            .finish()
    }
}
