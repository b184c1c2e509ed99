//! Batch partitioning for multi-row INSERT statements.
//!
//! The remote query engine caps the number of bound parameters in a single
//! statement. Rows are packed into as few statements as possible, each
//! holding at most `batch_limit / column_count` rows.

use serde::Serialize;

use gallery_common::{Error, Result};

use crate::models::InsertRow;
use crate::template::{validate_target, TemplateCache};
use crate::value::{Row, SqlValue};

/// Bound-parameter limit of a single D1 statement.
pub const BATCH_PARAM_LIMIT: usize = 100;

/// A parameterized statement ready to send.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Statement {
    pub sql: String,
    pub params: Vec<SqlValue>,
}

impl Statement {
    pub fn new(sql: impl Into<String>, params: Vec<SqlValue>) -> Self {
        Self {
            sql: sql.into(),
            params,
        }
    }

    /// A statement without bound parameters.
    pub fn raw(sql: impl Into<String>) -> Self {
        Self::new(sql, Vec::new())
    }
}

/// Ordered statements produced by the planner.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct StatementPlan {
    statements: Vec<Statement>,
}

impl StatementPlan {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, statement: Statement) {
        self.statements.push(statement);
    }

    /// Append every statement of `other`, keeping its order.
    pub fn extend(&mut self, other: StatementPlan) {
        self.statements.extend(other.statements);
    }

    pub fn len(&self) -> usize {
        self.statements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.statements.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Statement> {
        self.statements.iter()
    }

    pub fn statements(&self) -> &[Statement] {
        &self.statements
    }

    /// Total bound parameters across all statements.
    pub fn param_count(&self) -> usize {
        self.statements.iter().map(|s| s.params.len()).sum()
    }
}

impl From<Vec<Statement>> for StatementPlan {
    fn from(statements: Vec<Statement>) -> Self {
        Self { statements }
    }
}

impl IntoIterator for StatementPlan {
    type Item = Statement;
    type IntoIter = std::vec::IntoIter<Statement>;

    fn into_iter(self) -> Self::IntoIter {
        self.statements.into_iter()
    }
}

impl<'a> IntoIterator for &'a StatementPlan {
    type Item = &'a Statement;
    type IntoIter = std::slice::Iter<'a, Statement>;

    fn into_iter(self) -> Self::IntoIter {
        self.statements.iter()
    }
}

/// Maximum rows per statement for a table with `column_count` columns.
///
/// # Errors
///
/// Returns [`Error::InvalidArgument`] for an empty column set and
/// [`Error::Configuration`] when not even one row fits under `batch_limit`.
pub fn capacity(column_count: usize, batch_limit: usize) -> Result<usize> {
    if column_count == 0 {
        return Err(Error::invalid_argument("column set must not be empty"));
    }
    let capacity = batch_limit / column_count;
    if capacity < 1 {
        return Err(Error::configuration(format!(
            "{} columns exceed the limit of {} bound parameters per statement",
            column_count, batch_limit
        )));
    }
    Ok(capacity)
}

/// Partition `rows` into INSERT statements for `table`.
///
/// See [`partition_with_cache`]; this variant uses a throwaway cache.
pub fn partition<I>(table: &str, columns: &[&str], rows: I, batch_limit: usize) -> Result<StatementPlan>
where
    I: IntoIterator<Item = Row>,
    I::IntoIter: ExactSizeIterator,
{
    let mut cache = TemplateCache::new();
    partition_with_cache(table, columns, rows, batch_limit, &mut cache)
}

/// Partition `rows` into INSERT statements for `table`, reusing templates
/// from `cache`.
///
/// Rows keep their relative order and each row lands in exactly one
/// statement. Every statement but the last holds exactly `capacity` rows.
/// An empty input yields an empty plan.
///
/// # Errors
///
/// * [`Error::Configuration`] if a single row does not fit under `batch_limit`
/// * [`Error::InvalidArgument`] for an invalid table/column set or a row
///   whose length differs from the column count
pub fn partition_with_cache<I>(
    table: &str,
    columns: &[&str],
    rows: I,
    batch_limit: usize,
    cache: &mut TemplateCache,
) -> Result<StatementPlan>
where
    I: IntoIterator<Item = Row>,
    I::IntoIter: ExactSizeIterator,
{
    validate_target(table, columns)?;
    let width = columns.len();
    let capacity = capacity(width, batch_limit)?;

    let rows = rows.into_iter();
    let total = rows.len();
    let mut plan = StatementPlan::new();
    let mut params: Vec<SqlValue> = Vec::with_capacity(capacity.min(total) * width);
    let mut rows_in_group = 0usize;

    for (idx, row) in rows.enumerate() {
        if row.len() != width {
            return Err(Error::invalid_argument(format!(
                "row {} of table {} has {} values, expected {}",
                idx,
                table,
                row.len(),
                width
            )));
        }
        params.extend(row);
        rows_in_group += 1;

        // Both conditions can hold on the last row of an exactly-full group;
        // that still closes one statement.
        let group_full = (idx + 1) % capacity == 0;
        let last_row = idx + 1 == total;
        if group_full || last_row {
            let sql = cache.get_or_build(table, columns, rows_in_group)?;
            plan.push(Statement::new(sql, std::mem::take(&mut params)));
            rows_in_group = 0;
        }
    }

    tracing::debug!(
        "Planned {} rows for table {} into {} statements ({} rows per statement)",
        total,
        table,
        plan.len(),
        capacity
    );

    Ok(plan)
}

/// Planner bound to one table's column set and parameter limit.
#[derive(Debug, Clone)]
pub struct BatchPlanner {
    table: &'static str,
    columns: &'static [&'static str],
    batch_limit: usize,
}

impl BatchPlanner {
    pub fn new(table: &'static str, columns: &'static [&'static str]) -> Self {
        Self {
            table,
            columns,
            batch_limit: BATCH_PARAM_LIMIT,
        }
    }

    /// Planner for the table an [`InsertRow`] model maps to.
    pub fn for_table<T: InsertRow>() -> Self {
        Self::new(T::TABLE, T::COLUMNS)
    }

    #[must_use]
    pub fn with_batch_limit(mut self, batch_limit: usize) -> Self {
        self.batch_limit = batch_limit;
        self
    }

    pub fn table(&self) -> &str {
        self.table
    }

    pub fn columns(&self) -> &[&'static str] {
        self.columns
    }

    pub fn batch_limit(&self) -> usize {
        self.batch_limit
    }

    /// Rows per statement under this planner's limit.
    pub fn capacity(&self) -> Result<usize> {
        capacity(self.columns.len(), self.batch_limit)
    }

    /// Plan raw rows.
    pub fn plan(&self, rows: Vec<Row>) -> Result<StatementPlan> {
        partition(self.table, self.columns, rows, self.batch_limit)
    }

    /// Plan raw rows, sharing templates through `cache`.
    pub fn plan_cached(&self, rows: Vec<Row>, cache: &mut TemplateCache) -> Result<StatementPlan> {
        partition_with_cache(self.table, self.columns, rows, self.batch_limit, cache)
    }

    /// Plan typed records.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] if `T` maps to a different table.
    pub fn plan_records<T: InsertRow>(&self, records: &[T]) -> Result<StatementPlan> {
        if T::TABLE != self.table || T::COLUMNS != self.columns {
            return Err(Error::invalid_argument(format!(
                "records for table {} cannot be planned into table {}",
                T::TABLE,
                self.table
            )));
        }
        let rows: Vec<Row> = records.iter().map(T::values).collect();
        self.plan(rows)
    }
}
