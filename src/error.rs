use thiserror::Error;

/// Structural failures of the input table.
///
/// Dirty cells never end up here: they are recovered per record by the
/// normalizer. An `EngineError` means the caller handed over a table that
/// does not follow the column contract at all.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    #[error("required column `{column}` is missing from the match table")]
    MissingColumn { column: &'static str },
}
