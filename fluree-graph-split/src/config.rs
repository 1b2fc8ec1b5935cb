//! Split configuration.
//!
//! Every field has a default, so an empty TOML document (or no file at all)
//! yields a working configuration:
//!
//! ```toml
//! prefix_scan_mode = "leading"
//! max_boundary_scan_bytes = 67108864
//! probe_statements = 2
//! probe_lookahead_bytes = 262144
//! read_buffer_bytes = 65536
//!
//! [turtle]
//! max_prefix_scan_bytes = 1048576
//!
//! [trig]
//! max_prefix_scan_bytes = 1048576
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Result, SplitError};
use crate::format::FormatKind;

/// Default size of the leading window scanned for prefix declarations.
pub const DEFAULT_PREFIX_SCAN_BYTES: u64 = 1024 * 1024; // 1 MB

/// Default limit on how far past a requested offset a boundary may lie.
pub const DEFAULT_MAX_BOUNDARY_SCAN_BYTES: u64 = 64 * 1024 * 1024; // 64 MB

/// Default read size; boundary windows grow in steps of this size.
pub const DEFAULT_READ_BUFFER_BYTES: usize = 64 * 1024; // 64 KB

pub const DEFAULT_PROBE_STATEMENTS: usize = 2;

/// Default distance a boundary probe lexes before accepting without evidence.
pub const DEFAULT_PROBE_LOOKAHEAD_BYTES: usize = 256 * 1024; // 256 KB

/// Where prefix declarations are collected from.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PrefixScanMode {
    /// Only the leading declaration block, within the scan window
    #[default]
    Leading,
    /// Every declaration in the file
    FullFile,
}

/// Per-format settings.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormatConfig {
    pub max_prefix_scan_bytes: u64,
}

impl Default for FormatConfig {
    fn default() -> Self {
        Self {
            max_prefix_scan_bytes: DEFAULT_PREFIX_SCAN_BYTES,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SplitConfig {
    pub turtle: FormatConfig,
    pub trig: FormatConfig,
    pub prefix_scan_mode: PrefixScanMode,
    pub max_boundary_scan_bytes: u64,
    /// Statements that must lex cleanly after a boundary candidate
    pub probe_statements: usize,
    /// Bytes past a candidate a probe may lex looking for the literal or
    /// graph block that would contain it
    pub probe_lookahead_bytes: usize,
    pub read_buffer_bytes: usize,
}

impl Default for SplitConfig {
    fn default() -> Self {
        Self {
            turtle: FormatConfig::default(),
            trig: FormatConfig::default(),
            prefix_scan_mode: PrefixScanMode::default(),
            max_boundary_scan_bytes: DEFAULT_MAX_BOUNDARY_SCAN_BYTES,
            probe_statements: DEFAULT_PROBE_STATEMENTS,
            probe_lookahead_bytes: DEFAULT_PROBE_LOOKAHEAD_BYTES,
            read_buffer_bytes: DEFAULT_READ_BUFFER_BYTES,
        }
    }
}

impl SplitConfig {
    /// Parse a TOML document.
    pub fn from_toml_str(s: &str) -> Result<Self> {
        let config: SplitConfig =
            toml::from_str(s).map_err(|e| SplitError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        Self::from_toml_str(&text).map_err(|e| match e {
            SplitError::Config(msg) => SplitError::Config(format!("{}: {msg}", path.display())),
            other => other,
        })
    }

    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| SplitError::Config(e.to_string()))
    }

    pub fn validate(&self) -> Result<()> {
        if self.read_buffer_bytes == 0 {
            return Err(SplitError::Config(
                "read_buffer_bytes must be greater than zero".to_string(),
            ));
        }
        if self.probe_statements == 0 {
            return Err(SplitError::Config(
                "probe_statements must be at least 1".to_string(),
            ));
        }
        if self.max_boundary_scan_bytes < self.read_buffer_bytes as u64 {
            return Err(SplitError::Config(format!(
                "max_boundary_scan_bytes ({}) is smaller than read_buffer_bytes ({})",
                self.max_boundary_scan_bytes, self.read_buffer_bytes
            )));
        }
        Ok(())
    }

    pub fn format(&self, format: FormatKind) -> &FormatConfig {
        match format {
            FormatKind::Turtle => &self.turtle,
            FormatKind::Trig => &self.trig,
        }
    }

    pub fn format_mut(&mut self, format: FormatKind) -> &mut FormatConfig {
        match format {
            FormatKind::Turtle => &mut self.turtle,
            FormatKind::Trig => &mut self.trig,
        }
    }

    pub fn max_prefix_scan_bytes(&self, format: FormatKind) -> u64 {
        self.format(format).max_prefix_scan_bytes
    }

    /// Builder-style override of one format's prefix scan window.
    pub fn with_prefix_scan_bytes(mut self, format: FormatKind, bytes: u64) -> Self {
        self.format_mut(format).max_prefix_scan_bytes = bytes;
        self
    }

    pub fn with_prefix_scan_mode(mut self, mode: PrefixScanMode) -> Self {
        self.prefix_scan_mode = mode;
        self
    }
}
