//! `<SQL>…</SQL>` tag protocol.

use std::sync::LazyLock;

use regex::Regex;

use crate::error::{Result, SqlError};

/// Shortest `<SQL>…</SQL>` body; `.` also matches newlines.
static SQL_TAG: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"(?s)<SQL>(.*?)</SQL>").ok());

/// Raw generation reply and the statement found in it.
///
/// `extracted_statement` is present only when the reply holds exactly one
/// non-empty tag region.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedQuery {
    pub raw_text: String,
    pub extracted_statement: Option<String>,
    /// Number of tag regions found.
    pub regions: usize,
}

impl GeneratedQuery {
    pub fn parse(raw_text: impl Into<String>) -> Self {
        let raw_text = raw_text.into();
        let regions = tag_regions(&raw_text);
        let extracted_statement = match regions.as_slice() {
            [only] if !only.trim().is_empty() => Some(only.trim().to_string()),
            _ => None,
        };
        Self {
            regions: regions.len(),
            extracted_statement,
            raw_text,
        }
    }

    /// The single statement, or the extraction failure.
    pub fn statement(&self) -> Result<&str> {
        match (self.regions, self.extracted_statement.as_deref()) {
            (1, Some(stmt)) => Ok(stmt),
            (n, _) if n > 1 => Err(SqlError::MultipleQueries(n)),
            _ => Err(SqlError::NoQueryGenerated),
        }
    }
}

/// Every non-overlapping tag body, left to right. An unterminated opening
/// tag contributes nothing.
fn tag_regions(text: &str) -> Vec<&str> {
    let Some(re) = SQL_TAG.as_ref() else {
        return Vec::new();
    };
    re.captures_iter(text)
        .filter_map(|c| c.get(1).map(|m| m.as_str()))
        .collect()
}

/// Extracts the single statement from a generation reply.
pub fn extract_statement(raw_text: &str) -> Result<String> {
    GeneratedQuery::parse(raw_text).statement().map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_multiline_statement() {
        let raw = "Here you go:\n<SQL>\nSELECT * FROM product\nWHERE LOWER(brand) LIKE LOWER('%puma%')\n</SQL>\nthanks";
        assert_eq!(
            extract_statement(raw).unwrap(),
            "SELECT * FROM product\nWHERE LOWER(brand) LIKE LOWER('%puma%')"
        );
    }

    #[test]
    fn missing_or_empty_tags_mean_no_query() {
        for raw in [
            "SELECT * FROM product",
            "<SQL>SELECT * FROM product",
            "<SQL>   </SQL>",
            "",
        ] {
            let g = GeneratedQuery::parse(raw);
            assert_eq!(g.extracted_statement, None, "{raw:?}");
            assert!(matches!(g.statement(), Err(SqlError::NoQueryGenerated)), "{raw:?}");
        }
    }

    #[test]
    fn more_than_one_region_is_rejected() {
        let g = GeneratedQuery::parse("<SQL>SELECT 1</SQL> or <SQL>SELECT 2</SQL>");
        assert_eq!(g.regions, 2);
        assert!(matches!(g.statement(), Err(SqlError::MultipleQueries(2))));
    }

    #[test]
    fn unterminated_tag_after_a_complete_one_is_ignored() {
        let g = GeneratedQuery::parse("<SQL>SELECT 1</SQL> and <SQL>SELECT 2");
        assert_eq!(g.regions, 1);
        assert_eq!(g.statement().unwrap(), "SELECT 1");
    }

    #[test]
    fn tag_pattern_compiles() {
        assert!(SQL_TAG.is_some());
    }

    #[test]
    fn match_is_non_greedy() {
        let g = GeneratedQuery::parse("<SQL>SELECT 1</SQL></SQL>");
        assert_eq!(g.statement().unwrap(), "SELECT 1");
    }
}
