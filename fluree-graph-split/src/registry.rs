//! Reader factories and the split job.
//!
//! Readers are created through factory functions registered per
//! (format, record) pair. A [`SplitJob`] bundles the configuration, the
//! prefix table cache and the registry that all readers of one job share.

use std::path::Path;
use std::sync::Arc;

use rustc_hash::FxHashMap;

use crate::cache::PrefixTableCache;
use crate::config::SplitConfig;
use crate::error::{Result, SplitError};
use crate::format::{FormatKind, RecordKind};
use crate::prefix::PrefixTable;
use crate::range::FragmentPlan;
use crate::reader::RecordReader;
use crate::source::{ByteSource, FileSource};

/// Creates a reader for one file of a job.
pub type ReaderFactory = fn(&Path, &SplitJob) -> Result<RecordReader>;

fn turtle_triples(path: &Path, job: &SplitJob) -> Result<RecordReader> {
    job.new_reader(path, FormatKind::Turtle, RecordKind::Triple)
}

fn trig_quads(path: &Path, job: &SplitJob) -> Result<RecordReader> {
    job.new_reader(path, FormatKind::Trig, RecordKind::Quad)
}

fn trig_datasets(path: &Path, job: &SplitJob) -> Result<RecordReader> {
    job.new_reader(path, FormatKind::Trig, RecordKind::Dataset)
}

/// Factories keyed by (format, record).
#[derive(Clone)]
pub struct ReaderRegistry {
    factories: FxHashMap<(FormatKind, RecordKind), ReaderFactory>,
}

impl ReaderRegistry {
    /// A registry with no factories.
    pub fn empty() -> Self {
        Self {
            factories: FxHashMap::default(),
        }
    }

    /// Turtle triples, TriG quads and TriG datasets.
    pub fn with_defaults() -> Self {
        let mut registry = Self::empty();
        registry.register(FormatKind::Turtle, RecordKind::Triple, turtle_triples);
        registry.register(FormatKind::Trig, RecordKind::Quad, trig_quads);
        registry.register(FormatKind::Trig, RecordKind::Dataset, trig_datasets);
        registry
    }

    pub fn register(&mut self, format: FormatKind, record: RecordKind, factory: ReaderFactory) {
        self.factories.insert((format, record), factory);
    }

    pub fn contains(&self, format: FormatKind, record: RecordKind) -> bool {
        self.factories.contains_key(&(format, record))
    }

    /// Registered pairs, sorted.
    pub fn supported(&self) -> Vec<(FormatKind, RecordKind)> {
        let mut pairs: Vec<_> = self.factories.keys().copied().collect();
        pairs.sort_by_key(|(f, r)| (f.as_str(), r.as_str()));
        pairs
    }

    pub fn create(
        &self,
        format: FormatKind,
        record: RecordKind,
        path: &Path,
        job: &SplitJob,
    ) -> Result<RecordReader> {
        let factory = self
            .factories
            .get(&(format, record))
            .ok_or(SplitError::UnsupportedRecord { format, record })?;
        factory(path, job)
    }
}

impl Default for ReaderRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

impl std::fmt::Debug for ReaderRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReaderRegistry")
            .field("supported", &self.supported())
            .finish()
    }
}

/// Shared state of one split job.
///
/// Cloning is cheap; clones share the cache.
#[derive(Clone, Debug, Default)]
pub struct SplitJob {
    config: Arc<SplitConfig>,
    cache: Arc<PrefixTableCache>,
    registry: Arc<ReaderRegistry>,
}

impl SplitJob {
    pub fn new(config: SplitConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config: Arc::new(config),
            cache: Arc::new(PrefixTableCache::new()),
            registry: Arc::new(ReaderRegistry::with_defaults()),
        })
    }

    pub fn with_registry(mut self, registry: ReaderRegistry) -> Self {
        self.registry = Arc::new(registry);
        self
    }

    pub fn config(&self) -> &SplitConfig {
        &self.config
    }

    pub fn cache(&self) -> &Arc<PrefixTableCache> {
        &self.cache
    }

    pub fn registry(&self) -> &ReaderRegistry {
        &self.registry
    }

    /// A reader from the registry.
    pub fn reader(
        &self,
        path: impl AsRef<Path>,
        format: FormatKind,
        record: RecordKind,
    ) -> Result<RecordReader> {
        self.registry.create(format, record, path.as_ref(), self)
    }

    /// A reader that bypasses the registry.
    pub fn new_reader(
        &self,
        path: &Path,
        format: FormatKind,
        record: RecordKind,
    ) -> Result<RecordReader> {
        RecordReader::new(
            path,
            format,
            record,
            Arc::clone(&self.config),
            Arc::clone(&self.cache),
        )
    }

    /// The prefix table of `path`, through the job's cache.
    pub fn prefix_table(&self, path: impl AsRef<Path>, format: FormatKind) -> Result<Arc<PrefixTable>> {
        let mut source = FileSource::open(path.as_ref())?;
        self.prefix_table_of(&mut source, format)
    }

    pub fn prefix_table_of(
        &self,
        source: &mut dyn ByteSource,
        format: FormatKind,
    ) -> Result<Arc<PrefixTable>> {
        self.cache.get_or_build(source, format.rules(), &self.config)
    }

    /// Plan `n` fragments of `path`.
    pub fn plan(&self, path: impl AsRef<Path>, format: FormatKind, n: usize) -> Result<FragmentPlan> {
        let mut source = FileSource::open(path.as_ref())?;
        self.plan_of(&mut source, format, n)
    }

    pub fn plan_of(
        &self,
        source: &mut dyn ByteSource,
        format: FormatKind,
        n: usize,
    ) -> Result<FragmentPlan> {
        let table = self.prefix_table_of(source, format)?;
        FragmentPlan::compute(source, format.rules(), &table, n, &self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::MemorySource;

    #[test]
    fn test_default_pairs() {
        let registry = ReaderRegistry::with_defaults();
        assert_eq!(
            registry.supported(),
            vec![
                (FormatKind::Trig, RecordKind::Dataset),
                (FormatKind::Trig, RecordKind::Quad),
                (FormatKind::Turtle, RecordKind::Triple),
            ]
        );
        assert!(!registry.contains(FormatKind::Turtle, RecordKind::Quad));
    }

    #[test]
    fn test_unregistered_pair() {
        let job = SplitJob::default();
        let err = job
            .reader("x.ttl", FormatKind::Turtle, RecordKind::Quad)
            .unwrap_err();
        assert!(matches!(
            err,
            SplitError::UnsupportedRecord {
                format: FormatKind::Turtle,
                record: RecordKind::Quad
            }
        ));

        let job = SplitJob::default().with_registry(ReaderRegistry::empty());
        assert!(job
            .reader("x.ttl", FormatKind::Turtle, RecordKind::Triple)
            .is_err());
    }

    #[test]
    fn test_readers_share_cache() {
        let doc = "@prefix ex: <http://ex.org/> .\nex:a ex:p ex:b .\nex:c ex:p ex:d .\n";
        let job = SplitJob::default();
        let len = doc.len() as u64;

        for range in [0..len / 2, len / 2..len] {
            let mut reader = job
                .reader("mem.ttl", FormatKind::Turtle, RecordKind::Triple)
                .unwrap()
                .with_source(Box::new(MemorySource::from_text("mem.ttl", doc)));
            reader.initialize(range).unwrap();
        }
        assert_eq!(job.cache().len(), 1);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = SplitConfig {
            probe_statements: 0,
            ..SplitConfig::default()
        };
        assert!(matches!(SplitJob::new(config), Err(SplitError::Config(_))));
    }
}
