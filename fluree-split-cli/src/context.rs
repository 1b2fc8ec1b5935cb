use crate::cli::InputArgs;
use crate::detect::detect_format;
use crate::error::{CliError, CliResult};
use fluree_graph_split::{FormatKind, PrefixScanMode, SplitConfig, SplitJob};
use std::path::{Path, PathBuf};

/// Everything a command needs to work on one input file.
pub struct InputContext {
    pub path: PathBuf,
    pub format: FormatKind,
    pub job: SplitJob,
}

/// Load the configuration file, or the defaults when none is given.
pub fn load_config(config_path: Option<&Path>) -> CliResult<SplitConfig> {
    match config_path {
        Some(path) => {
            if !path.is_file() {
                return Err(CliError::Config(format!(
                    "config file not found: {}",
                    path.display()
                )));
            }
            Ok(SplitConfig::load(path)?)
        }
        None => Ok(SplitConfig::default()),
    }
}

/// Resolve the input file, its format and a job configured for it.
///
/// Command-line overrides take precedence over the configuration file.
pub fn resolve_input(input: &InputArgs, config_path: Option<&Path>) -> CliResult<InputContext> {
    if !input.file.is_file() {
        return Err(CliError::Input(format!(
            "file not found: {}",
            input.file.display()
        )));
    }
    let format = detect_format(&input.file, input.format.map(FormatKind::from))?;

    let mut config = load_config(config_path)?;
    if let Some(bytes) = input.prefix_scan_bytes {
        config = config.with_prefix_scan_bytes(format, bytes);
    }
    if input.full_file_prefixes {
        config = config.with_prefix_scan_mode(PrefixScanMode::FullFile);
    }

    tracing::debug!(
        path = %input.file.display(),
        %format,
        prefix_scan_bytes = config.max_prefix_scan_bytes(format),
        mode = ?config.prefix_scan_mode,
        "resolved input"
    );

    Ok(InputContext {
        path: input.file.clone(),
        format,
        job: SplitJob::new(config)?,
    })
}
