//! tokio-postgres transport.
//!
//! Binds compiled [`Statement`]s through a prepared statement and exposes the
//! result set as a [`Cursor`]. Use [`Config::postgres`](crate::Config::postgres)
//! so placeholders come out as `$1, $2, ...`.
//!
//! ```ignore
//! let config = Config::postgres();
//! let stmt = Builder::new(&config).find(&Query::new("users").limit(10));
//!
//! let mut cursor = quarry::postgres::query(&client, &stmt).await?;
//! let mut users: Vec<User> = Vec::new();
//! quarry::scan_all(&mut cursor, &mut users)?;
//! ```

use crate::builder::Statement;
use crate::cursor::Cursor;
use crate::error::{OrmError, OrmResult};
use crate::scan::Scanner;
use crate::value::Value;
use bytes::BytesMut;
use chrono::{DateTime, NaiveDateTime, Utc};
use std::error::Error;
use tokio_postgres::types::{FromSql, IsNull, ToSql, Type};
use tokio_postgres::{Row, Statement as Prepared};
use uuid::Uuid;

impl ToSql for Value {
    fn to_sql(
        &self,
        ty: &Type,
        out: &mut BytesMut,
    ) -> Result<IsNull, Box<dyn Error + Sync + Send>> {
        match self {
            Value::Null => Ok(IsNull::Yes),
            Value::Bool(v) => v.to_sql_checked(ty, out),
            Value::Int(v) => match *ty {
                Type::INT2 => i16::try_from(*v)?.to_sql_checked(ty, out),
                Type::INT4 => i32::try_from(*v)?.to_sql_checked(ty, out),
                Type::OID => u32::try_from(*v)?.to_sql_checked(ty, out),
                Type::FLOAT4 => (exact_float(*v, F32_EXACT, ty)? as f32).to_sql_checked(ty, out),
                Type::FLOAT8 => (exact_float(*v, F64_EXACT, ty)? as f64).to_sql_checked(ty, out),
                _ => v.to_sql_checked(ty, out),
            },
            Value::Float(v) => match *ty {
                Type::FLOAT4 => (*v as f32).to_sql_checked(ty, out),
                _ => v.to_sql_checked(ty, out),
            },
            Value::Text(v) => v.to_sql_checked(ty, out),
            Value::Bytes(v) => v.to_sql_checked(ty, out),
            Value::Timestamp(v) => match *ty {
                Type::TIMESTAMP => v.naive_utc().to_sql_checked(ty, out),
                _ => v.to_sql_checked(ty, out),
            },
            Value::Uuid(v) => v.to_sql_checked(ty, out),
            Value::Json(v) => v.to_sql_checked(ty, out),
        }
    }

    // The variant decides; mismatches are reported by the inner encoder.
    fn accepts(_ty: &Type) -> bool {
        true
    }

    tokio_postgres::types::to_sql_checked!();
}

// Largest magnitudes stored without rounding: the mantissa widths of f32 and f64.
const F32_EXACT: i64 = 1 << 24;
const F64_EXACT: i64 = 1 << 53;

fn exact_float(v: i64, limit: i64, ty: &Type) -> Result<i64, Box<dyn Error + Sync + Send>> {
    if v.unsigned_abs() > limit.unsigned_abs() {
        return Err(format!("integer {v} cannot be stored exactly as {ty}").into());
    }
    Ok(v)
}

/// A client or transaction able to run prepared statements.
pub trait GenericClient: Send + Sync {
    fn prepare_statement(
        &self,
        sql: &str,
    ) -> impl std::future::Future<Output = OrmResult<Prepared>> + Send;

    fn query_prepared(
        &self,
        stmt: &Prepared,
        params: &[&(dyn ToSql + Sync)],
    ) -> impl std::future::Future<Output = OrmResult<Vec<Row>>> + Send;

    fn execute_prepared(
        &self,
        stmt: &Prepared,
        params: &[&(dyn ToSql + Sync)],
    ) -> impl std::future::Future<Output = OrmResult<u64>> + Send;
}

impl GenericClient for tokio_postgres::Client {
    async fn prepare_statement(&self, sql: &str) -> OrmResult<Prepared> {
        Ok(tokio_postgres::Client::prepare(self, sql).await?)
    }

    async fn query_prepared(
        &self,
        stmt: &Prepared,
        params: &[&(dyn ToSql + Sync)],
    ) -> OrmResult<Vec<Row>> {
        Ok(tokio_postgres::Client::query(self, stmt, params).await?)
    }

    async fn execute_prepared(
        &self,
        stmt: &Prepared,
        params: &[&(dyn ToSql + Sync)],
    ) -> OrmResult<u64> {
        Ok(tokio_postgres::Client::execute(self, stmt, params).await?)
    }
}

impl GenericClient for tokio_postgres::Transaction<'_> {
    async fn prepare_statement(&self, sql: &str) -> OrmResult<Prepared> {
        Ok(tokio_postgres::Transaction::prepare(self, sql).await?)
    }

    async fn query_prepared(
        &self,
        stmt: &Prepared,
        params: &[&(dyn ToSql + Sync)],
    ) -> OrmResult<Vec<Row>> {
        Ok(tokio_postgres::Transaction::query(self, stmt, params).await?)
    }

    async fn execute_prepared(
        &self,
        stmt: &Prepared,
        params: &[&(dyn ToSql + Sync)],
    ) -> OrmResult<u64> {
        Ok(tokio_postgres::Transaction::execute(self, stmt, params).await?)
    }
}

fn params(args: &[Value]) -> Vec<&(dyn ToSql + Sync)> {
    args.iter().map(|arg| arg as &(dyn ToSql + Sync)).collect()
}

/// Run `statement` and buffer its rows into a cursor.
pub async fn query(conn: &impl GenericClient, statement: &Statement) -> OrmResult<PgCursor> {
    let prepared = conn.prepare_statement(&statement.sql).await?;
    let rows = conn
        .query_prepared(&prepared, &params(&statement.args))
        .await?;

    tracing::debug!(target: "quarry.sql", sql = %statement.sql, rows = rows.len(), "query");

    let columns = prepared
        .columns()
        .iter()
        .map(|column| (column.name().to_string(), column.type_().clone()))
        .collect();
    Ok(PgCursor::new(columns, rows))
}

/// Run `statement` and return the number of affected rows.
pub async fn execute(conn: &impl GenericClient, statement: &Statement) -> OrmResult<u64> {
    let prepared = conn.prepare_statement(&statement.sql).await?;
    let affected = conn
        .execute_prepared(&prepared, &params(&statement.args))
        .await?;

    tracing::debug!(target: "quarry.sql", sql = %statement.sql, affected, "execute");
    Ok(affected)
}

/// Cursor over rows fetched by tokio-postgres.
pub struct PgCursor {
    columns: Vec<(String, Type)>,
    rows: std::vec::IntoIter<Row>,
    current: Option<Row>,
}

impl PgCursor {
    pub fn new(columns: Vec<(String, Type)>, rows: Vec<Row>) -> Self {
        Self {
            columns,
            rows: rows.into_iter(),
            current: None,
        }
    }

    /// Column metadata is taken from the first row; no rows means no columns.
    pub fn from_rows(rows: Vec<Row>) -> Self {
        let columns = rows
            .first()
            .map(|row| {
                row.columns()
                    .iter()
                    .map(|column| (column.name().to_string(), column.type_().clone()))
                    .collect()
            })
            .unwrap_or_default();
        Self::new(columns, rows)
    }
}

impl Cursor for PgCursor {
    fn fields(&mut self) -> OrmResult<Vec<String>> {
        Ok(self.columns.iter().map(|(name, _)| name.clone()).collect())
    }

    fn next(&mut self) -> bool {
        self.current = self.rows.next();
        self.current.is_some()
    }

    fn scan(&mut self, targets: &mut [&mut dyn Scanner]) -> OrmResult<()> {
        let row = self
            .current
            .as_ref()
            .ok_or_else(|| OrmError::cursor("scan called without a current row"))?;
        if targets.len() != row.len() {
            return Err(OrmError::cursor(format!(
                "expected {} scan targets, got {}",
                row.len(),
                targets.len()
            )));
        }

        for (index, target) in targets.iter_mut().enumerate() {
            let value = decode_column(row, index)?;
            let name = row.columns()[index].name();
            target.scan(value).map_err(|err| err.at(name))?;
        }
        Ok(())
    }

    fn close(&mut self) -> OrmResult<()> {
        self.rows = Vec::new().into_iter();
        self.current = None;
        Ok(())
    }
}

fn take<'r, T>(row: &'r Row, index: usize) -> Result<Value, tokio_postgres::Error>
where
    T: FromSql<'r>,
    Value: From<T>,
{
    Ok(row
        .try_get::<_, Option<T>>(index)?
        .map_or(Value::Null, Value::from))
}

fn decode_column(row: &Row, index: usize) -> OrmResult<Value> {
    let column = &row.columns()[index];
    let decoded = match *column.type_() {
        Type::BOOL => take::<bool>(row, index),
        Type::INT2 => take::<i16>(row, index),
        Type::INT4 => take::<i32>(row, index),
        Type::INT8 => take::<i64>(row, index),
        Type::OID => take::<u32>(row, index),
        Type::FLOAT4 => take::<f32>(row, index),
        Type::FLOAT8 => take::<f64>(row, index),
        Type::TEXT | Type::VARCHAR | Type::BPCHAR | Type::NAME | Type::UNKNOWN => {
            take::<String>(row, index)
        }
        Type::BYTEA => take::<Vec<u8>>(row, index),
        Type::TIMESTAMPTZ => take::<DateTime<Utc>>(row, index),
        Type::TIMESTAMP => take::<NaiveDateTime>(row, index),
        Type::UUID => take::<Uuid>(row, index),
        Type::JSON | Type::JSONB => take::<serde_json::Value>(row, index),
        ref other => {
            return Err(OrmError::decode(
                column.name(),
                format!("unsupported column type {other}"),
            ));
        }
    };
    decoded.map_err(|err| OrmError::decode(column.name(), err.to_string()))
}
