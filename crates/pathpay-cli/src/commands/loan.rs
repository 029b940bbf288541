use chrono::Utc;
use clap::Args;
use serde_json::{json, Value};

use pathpay_core::amortization::calendar::format_display_date;
use pathpay_core::amortization::{amortize, calculate_loan};
use pathpay_core::storage::LoanRecord;

use crate::commands::LoanArgs;
use crate::config::Context;

#[derive(Args)]
pub struct CalculateArgs {
    #[command(flatten)]
    pub loan: LoanArgs,

    /// Append the calculation to history
    #[arg(long)]
    pub save: bool,
}

#[derive(Args)]
pub struct ScheduleArgs {
    #[command(flatten)]
    pub loan: LoanArgs,
}

pub fn run_calculate(args: CalculateArgs, ctx: &Context) -> Result<Value, Box<dyn std::error::Error>> {
    let category = args.loan.category(ctx)?;
    let input = args.loan.to_input(ctx)?;
    let output = calculate_loan(&input)?;

    let saved = if args.save {
        let record = LoanRecord::from_calculation(category, &input, &output.result, Utc::now());
        Some(ctx.history().add(record)?)
    } else {
        None
    };

    let mut value = serde_json::to_value(&output)?;
    if let Some(Value::Object(result)) = value.get_mut("result") {
        result.remove("schedule");
        result.insert("category".into(), Value::from(category.label()));
        if let Some(position) = saved {
            result.insert("history_entry".into(), Value::from(position));
        }
    }
    Ok(value)
}

pub fn run_schedule(args: ScheduleArgs, ctx: &Context) -> Result<Value, Box<dyn std::error::Error>> {
    let input = args.loan.to_input(ctx)?;
    let result = amortize(&input)?;

    let rows: Vec<Value> = result
        .schedule
        .iter()
        .map(|row| {
            json!({
                "period": row.period,
                "due_date": format_display_date(row.due_date),
                "payment": row.payment,
                "interest": row.interest,
                "principal": row.principal,
                "remaining_balance": row.remaining_balance,
            })
        })
        .collect();

    Ok(Value::Array(rows))
}
