//! Split large Turtle and TriG files into independently parseable fragments.
//!
//! A framework hands out arbitrary byte ranges of a file. For each range this
//! crate:
//!
//! 1. builds (once per file and job) a [`PrefixTable`] from the file's
//!    leading `@prefix` / `@base` declarations,
//! 2. moves both edges of the range onto statement boundaries,
//! 3. prepends the serialized table to the range's bytes, and
//! 4. parses the result, handing out triples, quads or datasets keyed by
//!    their position in the file.
//!
//! Adjacent ranges yield adjacent fragments, so every statement of the file
//! is read by exactly one reader.
//!
//! # Example
//!
//! ```
//! use fluree_graph_split::{FormatKind, MemorySource, RecordKind, SplitJob};
//!
//! let doc = "@prefix ex: <http://ex.org/> .\nex:a ex:p ex:b .\nex:c ex:p ex:d .\n";
//! let job = SplitJob::default();
//!
//! let mut statements = 0;
//! for range in [0..20, 20..doc.len() as u64] {
//!     let mut reader = job
//!         .reader("doc.ttl", FormatKind::Turtle, RecordKind::Triple)?
//!         .with_source(Box::new(MemorySource::from_text("doc.ttl", doc)));
//!     let mut more = reader.initialize(range)?;
//!     while more {
//!         statements += 1;
//!         more = reader.advance()?;
//!     }
//! }
//! assert_eq!(statements, 2);
//! # Ok::<(), fluree_graph_split::SplitError>(())
//! ```

pub mod assemble;
pub mod cache;
pub mod config;
pub mod error;
pub mod format;
pub mod parser;
pub mod prefix;
pub mod range;
pub mod reader;
pub mod registry;
pub mod scan;
pub mod source;

pub use assemble::{assemble, Fragment, FragmentAssembler};
pub use cache::{FileKey, PrefixTableCache};
pub use config::{FormatConfig, PrefixScanMode, SplitConfig};
pub use error::{Result, ScanError, SplitError};
pub use format::{FormatKind, FormatRules, RecordKind, TRIG, TURTLE};
pub use parser::{StatementParser, StatementStream, TurtleStatementParser};
pub use prefix::{build_prefix_table, Binding, LaterDeclaration, PrefixTable};
pub use range::{plan_ranges, BoundaryResolver, FragmentPlan, PlannedFragment};
pub use reader::{Record, ReaderState, RecordReader};
pub use registry::{ReaderFactory, ReaderRegistry, SplitJob};
pub use scan::{find_boundary, BoundaryScanner, Direction};
pub use source::{ByteSource, FileSource, MemorySource};
