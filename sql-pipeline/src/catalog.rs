//! Read-only access to the `product` catalog.

use std::{
    fmt,
    path::{Path, PathBuf},
    str::FromStr,
};

use async_trait::async_trait;
use rusqlite::{Connection, OpenFlags, types::ValueRef};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};
use tracing::{debug, trace};

use crate::error::{Result, SqlError};

/// Rows returned by one statement, in backend order.
///
/// Each row is a column-ordered mapping of column name to value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResultSet {
    pub columns: Vec<String>,
    pub rows: Vec<Map<String, Value>>,
    /// More rows were available than the caller asked for.
    pub truncated: bool,
}

impl ResultSet {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Every `product` column was selected, so rows carry whole records.
    pub fn has_record_shape(&self) -> bool {
        CatalogRecord::COLUMNS
            .iter()
            .all(|c| self.columns.iter().any(|have| have == c))
    }

    /// Rows decoded as full catalog records, or `None` when the statement did
    /// not select the whole record shape (aggregates, projections).
    pub fn records(&self) -> Option<Vec<CatalogRecord>> {
        self.rows
            .iter()
            .map(|r| serde_json::from_value(Value::Object(r.clone())).ok())
            .collect()
    }
}

/// Store the pipeline executes validated statements against.
#[async_trait]
pub trait CatalogStore: Send + Sync {
    /// Runs `statement`, keeping at most `max_rows` rows.
    async fn query(&self, statement: &str, max_rows: usize) -> Result<ResultSet>;
}

/// SQLite catalog file, opened read-only for every query.
#[derive(Debug, Clone)]
pub struct SqliteCatalog {
    path: PathBuf,
}

impl SqliteCatalog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl CatalogStore for SqliteCatalog {
    async fn query(&self, statement: &str, max_rows: usize) -> Result<ResultSet> {
        let path = self.path.clone();
        let sql = statement.to_string();
        let rs = tokio::task::spawn_blocking(move || run_blocking(&path, &sql, max_rows))
            .await
            .map_err(|e| SqlError::QueryExecution(format!("catalog worker failed: {e}")))??;
        debug!(
            rows = rs.rows.len(),
            columns = rs.columns.len(),
            truncated = rs.truncated,
            "catalog query finished"
        );
        Ok(rs)
    }
}

fn run_blocking(path: &Path, sql: &str, max_rows: usize) -> Result<ResultSet> {
    let conn = Connection::open_with_flags(
        path,
        OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
    )?;
    let mut stmt = conn.prepare(sql)?;
    let columns: Vec<String> = stmt.column_names().into_iter().map(String::from).collect();

    let mut rows = stmt.query([])?;
    let mut out = Vec::new();
    let mut truncated = false;
    while let Some(row) = rows.next()? {
        if out.len() == max_rows {
            truncated = true;
            break;
        }
        let mut map = Map::with_capacity(columns.len());
        for (i, name) in columns.iter().enumerate() {
            map.insert(name.clone(), json_value(row.get_ref(i)?));
        }
        out.push(map);
    }
    trace!(rows = out.len(), "rows materialized");

    Ok(ResultSet {
        columns,
        rows: out,
        truncated,
    })
}

fn json_value(v: ValueRef<'_>) -> Value {
    match v {
        ValueRef::Null => Value::Null,
        ValueRef::Integer(i) => Value::from(i),
        ValueRef::Real(f) => Number::from_f64(f).map_or(Value::Null, Value::Number),
        ValueRef::Text(t) => Value::String(String::from_utf8_lossy(t).into_owned()),
        ValueRef::Blob(b) => Value::String(format!("<{} bytes>", b.len())),
    }
}

/// Target audience of a catalog item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", rename_all = "lowercase")]
pub enum Gender {
    Men,
    Women,
    Unisex,
    Kids,
}

impl FromStr for Gender {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "men" => Ok(Gender::Men),
            "women" => Ok(Gender::Women),
            "unisex" => Ok(Gender::Unisex),
            "kids" => Ok(Gender::Kids),
            other => Err(format!("unknown gender `{other}`")),
        }
    }
}

impl TryFrom<String> for Gender {
    type Error = String;

    fn try_from(s: String) -> std::result::Result<Self, Self::Error> {
        s.parse()
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Gender::Men => "Men",
            Gender::Women => "Women",
            Gender::Unisex => "Unisex",
            Gender::Kids => "Kids",
        })
    }
}

/// One row of the `product` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogRecord {
    pub title: String,
    pub brand: String,
    pub gender: Gender,
    pub mrp: i64,
    /// Fraction in `[0, 1]`.
    pub discount_percent: f64,
    pub price_after_discount: i64,
    pub star_rating: Option<f64>,
    pub num_ratings: Option<i64>,
    pub product_link: String,
    pub scraped_on: String,
}

impl CatalogRecord {
    /// Column names of the `product` table, in schema order.
    pub const COLUMNS: [&'static str; 10] = [
        "title",
        "brand",
        "gender",
        "mrp",
        "discount_percent",
        "price_after_discount",
        "star_rating",
        "num_ratings",
        "product_link",
        "scraped_on",
    ];
}
