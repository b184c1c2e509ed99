//! Gallery table definitions.
//!
//! The remote store has no migration tracking; every definition uses
//! `CREATE TABLE IF NOT EXISTS` and can be sent repeatedly. Tables are
//! listed in dependency order.

use crate::batch::{Statement, StatementPlan};

/// A single table with its DDL.
pub struct TableDefinition {
    pub name: &'static str,
    pub sql: &'static str,
}

/// All gallery tables, parents before children.
pub const TABLES: &[TableDefinition] = &[
    TableDefinition {
        name: "photo",
        sql: include_str!("001_photo.sql"),
    },
    TableDefinition {
        name: "collection",
        sql: include_str!("002_collection.sql"),
    },
    TableDefinition {
        name: "photo_collection",
        sql: include_str!("003_photo_collection.sql"),
    },
];

/// One unparameterized statement per table, in dependency order.
pub fn create_table_statements() -> StatementPlan {
    TABLES
        .iter()
        .map(|t| Statement::raw(t.sql.trim()))
        .collect::<Vec<_>>()
        .into()
}

/// Collapse multi-line SQL onto one line for log output.
pub fn single_line(sql: &str) -> String {
    sql.lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}
