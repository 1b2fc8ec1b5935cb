//! fluree-split CLI library.
//!
//! The `fluree-split` binary stands in for a distributed framework: it
//! plans byte ranges of a file, runs one reader per range on worker threads
//! and prints what they produce. The command handlers live here so they
//! can be driven without the binary.

pub mod cli;
pub mod commands;
pub mod context;
pub mod detect;
pub mod error;
pub mod output;

use cli::{Cli, Commands};
use context::resolve_input;
use detect::record_kind;

/// Dispatch a parsed [`Cli`] to the appropriate command handler.
pub fn run(cli: Cli) -> error::CliResult<()> {
    let config_path = cli.config.as_deref();

    match cli.command {
        Commands::Prefixes { input, output } => {
            let ctx = resolve_input(&input, config_path)?;
            commands::prefixes::run(&ctx, output)
        }

        Commands::Plan {
            input,
            fragments,
            output,
        } => {
            let ctx = resolve_input(&input, config_path)?;
            commands::plan::run(&ctx, fragments, output)
        }

        Commands::Read {
            input,
            start,
            end,
            record,
            output,
        } => {
            let ctx = resolve_input(&input, config_path)?;
            let record = record_kind(ctx.format, record)?;
            commands::read::run(&ctx, start, end, record, output)
        }

        Commands::Run {
            input,
            fragments,
            threads,
            record,
            output,
        } => {
            let ctx = resolve_input(&input, config_path)?;
            let record = record_kind(ctx.format, record)?;
            commands::run::run(&ctx, fragments, threads, record, output)
        }

        Commands::Config => commands::config_cmd::run(config_path),
    }
}
