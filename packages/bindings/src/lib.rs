use napi::Result as NapiResult;
use napi_derive::napi;

use pathpay_core::amortization::{self, LoanInput};
use pathpay_core::forms::LoanForm;

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

// ---------------------------------------------------------------------------
// Engine
// ---------------------------------------------------------------------------

#[napi]
pub fn amortize(input_json: String) -> NapiResult<String> {
    let input: LoanInput = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = amortization::amortize(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn calculate_loan(input_json: String) -> NapiResult<String> {
    let input: LoanInput = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = amortization::calculate_loan(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Forms
// ---------------------------------------------------------------------------

/// Form text to engine input; `"null"` while a required field is blank.
#[napi]
pub fn form_to_input(form_json: String) -> NapiResult<String> {
    let form: LoanForm = serde_json::from_str(&form_json).map_err(to_napi_error)?;
    let input = form.to_input().map_err(to_napi_error)?;
    serde_json::to_string(&input).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Compare list
// ---------------------------------------------------------------------------

#[napi]
pub fn rank_compare_list(records_json: String, rank_by: Option<String>) -> NapiResult<String> {
    use pathpay_core::storage::{rank_records, LoanRecord, RankBy};

    let records: Vec<LoanRecord> = serde_json::from_str(&records_json).map_err(to_napi_error)?;
    let by: RankBy = match rank_by {
        Some(raw) => raw.parse().map_err(to_napi_error)?,
        None => RankBy::default(),
    };
    serde_json::to_string(&rank_records(records, by)).map_err(to_napi_error)
}
