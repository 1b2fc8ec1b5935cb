use crate::cli::TableOutput;
use crate::context::InputContext;
use crate::error::CliResult;
use crate::output;

pub fn run(ctx: &InputContext, format: TableOutput) -> CliResult<()> {
    let table = ctx.job.prefix_table(&ctx.path, ctx.format)?;
    match format {
        TableOutput::Table => {
            if table.is_empty() && table.base().is_none() {
                println!("(no prefix declarations)");
                println!("data starts at byte {}", table.data_start());
            } else {
                println!("{}", output::prefix_table(&table));
            }
        }
        TableOutput::Json => println!("{}", output::json(&*table)?),
    }
    Ok(())
}
