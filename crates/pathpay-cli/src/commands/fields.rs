use clap::Args;
use serde_json::{json, Value};

use pathpay_core::forms::LoanField;

#[derive(Args)]
pub struct FieldsArgs {
    /// Field to explain (amount, term, rate, loan-type, repayment-type, start-date)
    pub name: Option<String>,
}

pub fn run_fields(args: FieldsArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let fields = match args.name.as_deref() {
        Some(name) => vec![name.parse::<LoanField>()?],
        None => LoanField::ALL.to_vec(),
    };

    let rows = fields
        .into_iter()
        .map(|f| {
            json!({
                "field": f.key(),
                "title": f.title(),
                "help": f.help(),
            })
        })
        .collect();
    Ok(Value::Array(rows))
}
