use clap::{Args, Subcommand};
use serde_json::{json, Value};

use crate::commands::{list_offset, record_row};
use crate::config::Context;

#[derive(Subcommand)]
pub enum HistoryCommand {
    /// List saved calculations, oldest first
    List,
    /// Delete one saved calculation
    Remove(RemoveArgs),
    /// Delete all saved calculations
    Clear,
}

#[derive(Args)]
pub struct RemoveArgs {
    /// Position in the list, starting at 1
    #[arg(long)]
    pub index: usize,
}

pub fn run_history(cmd: HistoryCommand, ctx: &Context) -> Result<Value, Box<dyn std::error::Error>> {
    let mut history = ctx.history();
    match cmd {
        HistoryCommand::List => {
            let rows = history
                .list()?
                .iter()
                .enumerate()
                .map(|(i, r)| record_row(i + 1, r))
                .collect::<Result<Vec<_>, _>>()?;
            Ok(Value::Array(rows))
        }
        HistoryCommand::Remove(args) => {
            let removed = history.remove(list_offset(args.index)?)?;
            let remaining = history.list()?.len();
            Ok(json!({
                "removed": removed.category.label(),
                "total_payment": removed.total_payment,
                "remaining": remaining,
            }))
        }
        HistoryCommand::Clear => {
            let cleared = history.clear()?;
            Ok(json!({ "cleared": cleared }))
        }
    }
}
