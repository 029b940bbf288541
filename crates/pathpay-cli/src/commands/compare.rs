use chrono::Utc;
use clap::{Args, Subcommand, ValueEnum};
use serde_json::{json, Value};

use pathpay_core::amortization::amortize;
use pathpay_core::storage::{LoanRecord, RankBy, COMPARE_CAPACITY};

use crate::commands::{list_offset, record_row, LoanArgs};
use crate::config::Context;

#[derive(Subcommand)]
pub enum CompareCommand {
    /// Calculate a loan and add it to the compare list
    Add(AddArgs),
    /// Show the compare list with best/moderate/least cost-effective tags
    List(ListArgs),
    /// Remove one loan from the compare list
    Remove(RemoveArgs),
    /// Empty the compare list
    Clear,
}

#[derive(Args)]
pub struct AddArgs {
    /// Name shown for this loan in the compare list
    #[arg(long, default_value = "")]
    pub title: String,

    #[command(flatten)]
    pub loan: LoanArgs,
}

#[derive(Args)]
pub struct ListArgs {
    /// Figure to rank on
    #[arg(long, value_enum, default_value_t = RankByArg::TotalPayment)]
    pub rank_by: RankByArg,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum RankByArg {
    #[value(alias = "payment")]
    TotalPayment,
    #[value(alias = "interest")]
    TotalInterest,
}

impl From<RankByArg> for RankBy {
    fn from(arg: RankByArg) -> Self {
        match arg {
            RankByArg::TotalPayment => RankBy::TotalPayment,
            RankByArg::TotalInterest => RankBy::TotalInterest,
        }
    }
}

#[derive(Args)]
pub struct RemoveArgs {
    /// Position in the list, starting at 1
    #[arg(long)]
    pub index: usize,
}

pub fn run_compare(cmd: CompareCommand, ctx: &Context) -> Result<Value, Box<dyn std::error::Error>> {
    let mut compare = ctx.compare();
    match cmd {
        CompareCommand::Add(args) => {
            let category = args.loan.category(ctx)?;
            let input = args.loan.to_input(ctx)?;
            let result = amortize(&input)?;
            let record = LoanRecord::from_calculation(category, &input, &result, Utc::now())
                .with_title(args.title);
            let title = record.display_title().to_string();
            let count = compare.add(record)?;
            Ok(json!({
                "added": title,
                "count": count,
                "capacity": COMPARE_CAPACITY,
            }))
        }
        CompareCommand::List(args) => {
            let by = RankBy::from(args.rank_by);
            let mut rows = Vec::new();
            for (i, ranked) in compare.ranked(by)?.iter().enumerate() {
                let mut row = record_row(i + 1, &ranked.record)?;
                if let Value::Object(ref mut map) = row {
                    map.insert("rank".into(), Value::from(ranked.rank + 1));
                    map.insert(
                        "tag".into(),
                        ranked.tag.map(|t| Value::from(t.label())).unwrap_or(Value::Null),
                    );
                }
                rows.push(row);
            }
            Ok(Value::Array(rows))
        }
        CompareCommand::Remove(args) => {
            let removed = compare.remove(list_offset(args.index)?)?;
            let remaining = compare.list()?.len();
            Ok(json!({
                "removed": removed.display_title(),
                "remaining": remaining,
            }))
        }
        CompareCommand::Clear => {
            let cleared = compare.clear()?;
            Ok(json!({ "cleared": cleared }))
        }
    }
}
