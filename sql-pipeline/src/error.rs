use std::fmt;

use ai_llm_service::AiLlmError;
use thiserror::Error;

/// Stage of the structured query pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Generate,
    Extract,
    Validate,
    Execute,
    Summarize,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Stage::Generate => "generate",
            Stage::Extract => "extract",
            Stage::Validate => "validate",
            Stage::Execute => "execute",
            Stage::Summarize => "summarize",
        })
    }
}

pub const NO_QUERY_APOLOGY: &str =
    "Sorry, the LLM is unable to generate the SQL query for the question";
pub const EXECUTION_APOLOGY: &str = "Sorry, there was a problem executing the SQL query.";
pub const UNSAFE_QUERY_APOLOGY: &str =
    "Sorry, only read-only questions about the catalog can be answered.";

#[derive(Debug, Error)]
pub enum SqlError {
    /// The generation reply had no `<SQL>` region (or an empty one).
    #[error("no SQL statement found in the model reply")]
    NoQueryGenerated,

    /// The generation reply had more than one `<SQL>` region.
    #[error("expected one SQL statement, the model reply contained {0}")]
    MultipleQueries(usize),

    /// The statement does not start with `SELECT`.
    #[error("refusing to run a non-SELECT statement: `{0}`")]
    UnsafeQuery(String),

    /// The catalog backend rejected or failed the statement.
    #[error("catalog query failed: {0}")]
    QueryExecution(String),

    /// Completion backend failed; not converted to an apology.
    #[error(transparent)]
    Llm(#[from] AiLlmError),
}

impl SqlError {
    /// Fixed user-facing sentence for pipeline failures.
    ///
    /// Service failures have no apology; they are propagated instead.
    pub fn apology(&self) -> Option<&'static str> {
        match self {
            SqlError::NoQueryGenerated | SqlError::MultipleQueries(_) => Some(NO_QUERY_APOLOGY),
            SqlError::UnsafeQuery(_) => Some(UNSAFE_QUERY_APOLOGY),
            SqlError::QueryExecution(_) => Some(EXECUTION_APOLOGY),
            SqlError::Llm(_) => None,
        }
    }
}

impl From<rusqlite::Error> for SqlError {
    fn from(e: rusqlite::Error) -> Self {
        SqlError::QueryExecution(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, SqlError>;
