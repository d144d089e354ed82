//! Postgres SqlStore
//!
//! Executes extracted SQL as-is over a shared `PgPool`. Statements are not
//! cached server-side since nearly every one is unique model output.

use async_trait::async_trait;
use serde_json::{json, Value as JsonValue};
use sqlx::postgres::{PgRow, PgTypeKind};
use sqlx::{Column, PgPool, Row, TypeInfo};
use uuid::Uuid;

use crate::error::QueryResult;
use crate::executor::{Record, SqlStore};
use crate::extract::ExtractedSql;

/// Postgres-backed store
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SqlStore for PgStore {
    async fn fetch_rows(&self, sql: &ExtractedSql) -> QueryResult<Vec<Record>> {
        let rows = sqlx::query(sql.as_str())
            .persistent(false)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.iter().map(row_to_json).collect())
    }

    async fn execute_statement(&self, sql: &ExtractedSql) -> QueryResult<u64> {
        let done = sqlx::query(sql.as_str())
            .persistent(false)
            .execute(&self.pool)
            .await?;
        Ok(done.rows_affected())
    }
}

/// Convert a database row to a JSON record keyed by column name
///
/// Enum columns render as their label and one-dimensional arrays of the
/// scalar types as JSON arrays. Any other type is read as text; values that
/// still fail to decode become `null`.
pub fn row_to_json(row: &PgRow) -> Record {
    let mut map = Record::new();

    for column in row.columns() {
        let name = column.name();
        let ordinal = column.ordinal();
        let type_info = column.type_info();
        let type_name = type_info.name();

        if matches!(type_info.kind(), PgTypeKind::Enum(_)) {
            let label = row
                .try_get_unchecked::<Option<String>, _>(ordinal)
                .ok()
                .flatten();
            map.insert(name.to_string(), label.map_or(JsonValue::Null, JsonValue::String));
            continue;
        }

        let value: Option<JsonValue> = match type_name {
            "UUID" => row
                .try_get::<Option<Uuid>, _>(ordinal)
                .ok()
                .flatten()
                .map(|u| json!(u.to_string())),
            "TEXT" | "VARCHAR" | "BPCHAR" | "NAME" => row
                .try_get::<Option<String>, _>(ordinal)
                .ok()
                .flatten()
                .map(|s| json!(s)),
            "INT2" => row
                .try_get::<Option<i16>, _>(ordinal)
                .ok()
                .flatten()
                .map(|i| json!(i)),
            "INT4" => row
                .try_get::<Option<i32>, _>(ordinal)
                .ok()
                .flatten()
                .map(|i| json!(i)),
            "INT8" => row
                .try_get::<Option<i64>, _>(ordinal)
                .ok()
                .flatten()
                .map(|i| json!(i)),
            "FLOAT4" => row
                .try_get::<Option<f32>, _>(ordinal)
                .ok()
                .flatten()
                .map(|f| json!(f)),
            "FLOAT8" => row
                .try_get::<Option<f64>, _>(ordinal)
                .ok()
                .flatten()
                .map(|f| json!(f)),
            "NUMERIC" => row
                .try_get::<Option<rust_decimal::Decimal>, _>(ordinal)
                .ok()
                .flatten()
                .map(|d| json!(d.to_string())),
            "BOOL" => row
                .try_get::<Option<bool>, _>(ordinal)
                .ok()
                .flatten()
                .map(|b| json!(b)),
            "JSONB" | "JSON" => row.try_get::<Option<JsonValue>, _>(ordinal).ok().flatten(),
            "TIMESTAMPTZ" => row
                .try_get::<Option<chrono::DateTime<chrono::Utc>>, _>(ordinal)
                .ok()
                .flatten()
                .map(|dt| json!(dt.to_rfc3339())),
            "TIMESTAMP" => row
                .try_get::<Option<chrono::NaiveDateTime>, _>(ordinal)
                .ok()
                .flatten()
                .map(|dt| json!(dt.to_string())),
            "DATE" => row
                .try_get::<Option<chrono::NaiveDate>, _>(ordinal)
                .ok()
                .flatten()
                .map(|d| json!(d.to_string())),
            "TEXT[]" | "VARCHAR[]" | "_TEXT" | "_VARCHAR" => row
                .try_get::<Option<Vec<String>>, _>(ordinal)
                .ok()
                .flatten()
                .map(|v| json!(v)),
            "INT2[]" | "_INT2" => row
                .try_get::<Option<Vec<i16>>, _>(ordinal)
                .ok()
                .flatten()
                .map(|v| json!(v)),
            "INT4[]" | "_INT4" => row
                .try_get::<Option<Vec<i32>>, _>(ordinal)
                .ok()
                .flatten()
                .map(|v| json!(v)),
            "INT8[]" | "_INT8" => row
                .try_get::<Option<Vec<i64>>, _>(ordinal)
                .ok()
                .flatten()
                .map(|v| json!(v)),
            "FLOAT8[]" | "_FLOAT8" => row
                .try_get::<Option<Vec<f64>>, _>(ordinal)
                .ok()
                .flatten()
                .map(|v| json!(v)),
            "BOOL[]" | "_BOOL" => row
                .try_get::<Option<Vec<bool>>, _>(ordinal)
                .ok()
                .flatten()
                .map(|v| json!(v)),
            "UUID[]" | "_UUID" => row
                .try_get::<Option<Vec<Uuid>>, _>(ordinal)
                .ok()
                .flatten()
                .map(|v| json!(v.iter().map(Uuid::to_string).collect::<Vec<_>>())),
            // citext and domains over text carry text on the wire; other
            // binary encodings show up as control bytes and are dropped
            _ => row
                .try_get_unchecked::<Option<String>, _>(ordinal)
                .ok()
                .flatten()
                .filter(|s| !s.chars().any(|c| c.is_control() && !c.is_whitespace()))
                .map(|s| json!(s)),
        };

        map.insert(name.to_string(), value.unwrap_or(JsonValue::Null));
    }

    map
}
