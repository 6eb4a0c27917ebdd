//! Command handlers for the Nurture CLI.

pub mod ask;
pub mod corpus;
pub mod empathize;
pub mod search;

pub use ask::AskCommand;
pub use corpus::CorpusCommand;
pub use empathize::EmpathizeCommand;
pub use search::SearchCommand;

use nurture_core::{AppError, AppResult, ErrorResult};

/// Print a pipeline failure as JSON on stdout and turn it back into an error
/// so the process exits non-zero.
pub(crate) fn report_failure(failure: ErrorResult) -> AppResult<()> {
    let payload = serde_json::to_string_pretty(&failure)?;
    println!("{}", payload);
    Err(AppError::Other(failure.message))
}
