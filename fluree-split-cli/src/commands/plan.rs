use crate::cli::TableOutput;
use crate::context::InputContext;
use crate::error::{CliError, CliResult};
use crate::output;

pub fn run(ctx: &InputContext, fragments: usize, format: TableOutput) -> CliResult<()> {
    if fragments == 0 {
        return Err(CliError::Usage("--fragments must be at least 1".into()));
    }
    let plan = ctx.job.plan(&ctx.path, ctx.format, fragments)?;
    match format {
        TableOutput::Table => println!("{}", output::plan(&plan)),
        TableOutput::Json => println!("{}", output::json(&plan)?),
    }
    Ok(())
}
