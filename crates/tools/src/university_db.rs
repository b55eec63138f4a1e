//! University database tools: raw SQL queries and schema description over
//! the SQLite file holding students, courses, offerings and transcripts.
//!
//! Both tools share one lazily connected pool; nothing touches the file
//! until the first call.

use async_trait::async_trait;
use serde_json::{Value, json};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions, SqliteRow};
use sqlx::{Column, Row, TypeInfo, ValueRef};
use std::sync::Arc;
use switchyard_config::DatabaseConfig;
use switchyard_core::error::ToolError;
use switchyard_core::tool::{ParamSpec, Tool, ToolOutput};
use tracing::{debug, warn};

/// Handle to the university database.
pub struct UniversityDb {
    pool: SqlitePool,
    sample_rows: u32,
}

/// Result set of a query: column names plus rows as JSON arrays.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct QueryResult {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Value>>,
}

impl UniversityDb {
    /// Create a handle for the configured file. Must be called inside a
    /// tokio runtime.
    pub fn open(config: &DatabaseConfig) -> Self {
        let options = SqliteConnectOptions::new()
            .filename(&config.path)
            .read_only(config.read_only)
            .create_if_missing(false);

        let pool = SqlitePoolOptions::new()
            .max_connections(4)
            .connect_lazy_with(options);

        Self {
            pool,
            sample_rows: config.schema_sample_rows,
        }
    }

    /// Run one SQL statement. Column names are only known when at least
    /// one row comes back.
    pub async fn query(&self, sql: &str) -> Result<QueryResult, sqlx::Error> {
        let rows = sqlx::query(sql).fetch_all(&self.pool).await?;

        let columns = rows
            .first()
            .map(|row| row.columns().iter().map(|c| c.name().to_string()).collect())
            .unwrap_or_default();

        let rows = rows.iter().map(row_values).collect();
        Ok(QueryResult { columns, rows })
    }

    /// Describe every user table: columns with declared types, then a few
    /// sample rows.
    pub async fn describe(&self) -> Result<String, sqlx::Error> {
        let tables: Vec<String> = sqlx::query_scalar(
            "SELECT name FROM sqlite_master WHERE type = 'table' AND name NOT LIKE 'sqlite_%' ORDER BY name",
        )
        .fetch_all(&self.pool)
        .await?;

        let mut schema = String::new();
        for table in &tables {
            let ident = quote_ident(table);

            let columns = sqlx::query(&format!("PRAGMA table_info({ident})"))
                .fetch_all(&self.pool)
                .await?;
            let columns: Vec<String> = columns
                .iter()
                .map(|c| {
                    let name: String = c.try_get_unchecked("name").unwrap_or_default();
                    let ty: String = c.try_get_unchecked("type").unwrap_or_default();
                    format!("{name} ({ty})")
                })
                .collect();
            schema.push_str(&format!("Table `{table}` columns: {}.\n", columns.join(", ")));

            if self.sample_rows == 0 {
                continue;
            }
            let sample = sqlx::query(&format!("SELECT * FROM {ident} LIMIT {}", self.sample_rows))
                .fetch_all(&self.pool)
                .await?;
            if !sample.is_empty() {
                schema.push_str(&format!("Sample data from {table}:\n"));
                for row in &sample {
                    schema.push_str(&format!("  {}\n", Value::Array(row_values(row))));
                }
                schema.push('\n');
            }
        }

        debug!(tables = tables.len(), "Described university database");
        Ok(schema)
    }
}

fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

fn row_values(row: &SqliteRow) -> Vec<Value> {
    (0..row.len()).map(|idx| cell(row, idx)).collect()
}

/// Decode one cell by its runtime storage class.
fn cell(row: &SqliteRow, idx: usize) -> Value {
    let kind = match row.try_get_raw(idx) {
        Ok(raw) if raw.is_null() => return Value::Null,
        Ok(raw) => raw.type_info().name().to_ascii_uppercase(),
        Err(_) => return Value::Null,
    };

    let decoded = match kind.as_str() {
        "INTEGER" | "BIGINT" | "INT8" | "BOOLEAN" => row.try_get_unchecked::<i64, _>(idx).map(Value::from),
        "REAL" | "NUMERIC" => row.try_get_unchecked::<f64, _>(idx).map(Value::from),
        "BLOB" => row
            .try_get_unchecked::<Vec<u8>, _>(idx)
            .map(|bytes| Value::from(format!("<{} bytes>", bytes.len()))),
        _ => row.try_get_unchecked::<String, _>(idx).map(Value::from),
    };
    decoded.unwrap_or(Value::Null)
}

/// `query_university_db(sql_query: str)`
pub struct QueryDbTool {
    db: Arc<UniversityDb>,
}

impl QueryDbTool {
    pub fn new(db: Arc<UniversityDb>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl Tool for QueryDbTool {
    fn name(&self) -> &str {
        "query_university_db"
    }

    fn description(&self) -> &str {
        "Run a SQL query against the university SQLite database (students, programs, \
         courses, offerings, schedules, transcripts). Returns the column names and rows, \
         or an error message if the query failed."
    }

    fn parameters(&self) -> Vec<ParamSpec> {
        vec![ParamSpec::required("sql_query", "str")]
    }

    async fn execute(&self, arguments: Value) -> Result<ToolOutput, ToolError> {
        let sql = arguments["sql_query"]
            .as_str()
            .ok_or_else(|| ToolError::InvalidArguments("Missing 'sql_query' argument".into()))?;

        debug!(sql, "Querying university database");
        match self.db.query(sql).await {
            Ok(result) => Ok(ToolOutput::Data(json!(result))),
            Err(e) => {
                warn!(error = %e, "Database query failed");
                Ok(ToolOutput::Data(json!({ "error": e.to_string() })))
            }
        }
    }
}

/// `get_db_schema()`
pub struct DbSchemaTool {
    db: Arc<UniversityDb>,
}

impl DbSchemaTool {
    pub fn new(db: Arc<UniversityDb>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl Tool for DbSchemaTool {
    fn name(&self) -> &str {
        "get_db_schema"
    }

    fn description(&self) -> &str {
        "Describe the university database: every table with its columns and types, \
         plus a few sample rows. Call this before writing a query you are unsure about."
    }

    async fn execute(&self, _arguments: Value) -> Result<ToolOutput, ToolError> {
        match self.db.describe().await {
            Ok(schema) => Ok(ToolOutput::text(schema)),
            Err(e) => {
                warn!(error = %e, "Schema description failed");
                Ok(ToolOutput::Data(json!({ "error": e.to_string() })))
            }
        }
    }
}
