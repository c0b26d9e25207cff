use crate::error::{Result, SqlError};

/// Accepts a statement only when, trimmed and uppercased, it starts with `SELECT`.
///
/// Returns the trimmed statement.
pub fn validate_read_only(statement: &str) -> Result<&str> {
    let trimmed = statement.trim();
    if trimmed.to_uppercase().starts_with("SELECT") {
        Ok(trimmed)
    } else {
        Err(SqlError::UnsafeQuery(trimmed.chars().take(50).collect()))
    }
}
