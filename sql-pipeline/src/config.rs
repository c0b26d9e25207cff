use std::path::PathBuf;

/// Catalog location and pipeline knobs.
#[derive(Debug, Clone, PartialEq)]
pub struct SqlConfig {
    /// SQLite catalog file (`CATALOG_DB_PATH`).
    pub db_path: PathBuf,
    /// Rows handed to the summarizer at most (`SQL_MAX_ROWS`).
    pub max_rows: usize,
    /// Temperature for both completions.
    pub temperature: f32,
}

impl Default for SqlConfig {
    fn default() -> Self {
        Self {
            db_path: PathBuf::from("resources/catalog.sqlite"),
            max_rows: 50,
            temperature: 0.2,
        }
    }
}

impl SqlConfig {
    /// Reads `CATALOG_DB_PATH` and `SQL_MAX_ROWS`; blank or unparsable values
    /// keep the defaults.
    pub fn from_lookup(env: &dyn Fn(&str) -> Option<String>) -> Self {
        let d = Self::default();
        let db_path = env("CATALOG_DB_PATH")
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .map(PathBuf::from)
            .unwrap_or(d.db_path);
        let max_rows = env("SQL_MAX_ROWS")
            .and_then(|v| v.trim().parse::<usize>().ok())
            .filter(|n| *n > 0)
            .unwrap_or(d.max_rows);
        Self {
            db_path,
            max_rows,
            ..d
        }
    }

    pub fn from_env() -> Self {
        Self::from_lookup(&|k| std::env::var(k).ok())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_overrides() {
        let cfg = SqlConfig::from_lookup(&|k| match k {
            "CATALOG_DB_PATH" => Some("/data/shoes.db".into()),
            "SQL_MAX_ROWS" => Some(" 5 ".into()),
            _ => None,
        });
        assert_eq!(cfg.db_path, PathBuf::from("/data/shoes.db"));
        assert_eq!(cfg.max_rows, 5);
        assert_eq!(cfg.temperature, 0.2);

        let bad = SqlConfig::from_lookup(&|k| (k == "SQL_MAX_ROWS").then(|| "lots".into()));
        assert_eq!(bad, SqlConfig::default());
    }
}
