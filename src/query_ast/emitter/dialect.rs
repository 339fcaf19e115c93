//! Database dialect trait for SQL emission
//!
//! Each dialect decides how identifiers are quoted, how booleans are spelled
//! and how the row limit is expressed. Everything else is shared.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::super::ast::JoinKind;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dialect {
    #[default]
    #[serde(alias = "postgres", alias = "postgresql")]
    Ansi,
    MySql,
    Sqlite,
    MsSql,
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Dialect::Ansi => write!(f, "ansi"),
            Dialect::MySql => write!(f, "mysql"),
            Dialect::Sqlite => write!(f, "sqlite"),
            Dialect::MsSql => write!(f, "mssql"),
        }
    }
}

impl FromStr for Dialect {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ansi" | "postgres" | "postgresql" => Ok(Dialect::Ansi),
            "mysql" => Ok(Dialect::MySql),
            "sqlite" => Ok(Dialect::Sqlite),
            "mssql" | "sqlserver" => Ok(Dialect::MsSql),
            other => Err(format!("unknown dialect '{}' (expected ansi, postgres, mysql, sqlite or mssql)", other)),
        }
    }
}

/// Trait for database-specific SQL dialect
pub trait SqlDialect: Send + Sync {
    fn dialect(&self) -> Dialect;

    /// Quote one identifier segment (no dots).
    fn quote_ident(&self, ident: &str) -> String;

    /// Quote a string literal
    fn quote_string(&self, s: &str) -> String {
        format!("'{}'", s.replace('\'', "''"))
    }

    fn emit_boolean(&self, value: bool) -> String {
        if value { "TRUE" } else { "FALSE" }.to_string()
    }

    /// A boolean literal standing alone as a condition: WHERE, ON, or an AND/OR operand.
    fn emit_boolean_condition(&self, value: bool) -> String {
        self.emit_boolean(value)
    }

    fn emit_null(&self) -> String {
        "NULL".to_string()
    }

    /// Text placed right after `SELECT` (used for `TOP n`).
    fn emit_select_prefix(&self, _limit: Option<u64>) -> Option<String> {
        None
    }

    /// Trailing limit clause, including its leading space.
    fn emit_limit(&self, limit: u64) -> String {
        format!(" LIMIT {}", limit)
    }

    fn emit_join_kind(&self, kind: &JoinKind) -> &'static str {
        match kind {
            JoinKind::Inner => "INNER JOIN",
            JoinKind::Left => "LEFT JOIN",
            JoinKind::Right => "RIGHT JOIN",
            JoinKind::Full => "FULL JOIN",
        }
    }
}

/// ANSI SQL / PostgreSQL dialect (the default)
pub struct AnsiDialect;

impl SqlDialect for AnsiDialect {
    fn dialect(&self) -> Dialect {
        Dialect::Ansi
    }

    fn quote_ident(&self, ident: &str) -> String {
        format!("\"{}\"", ident.replace('"', "\"\""))
    }
}

/// MySQL dialect
pub struct MySqlDialect;

impl SqlDialect for MySqlDialect {
    fn dialect(&self) -> Dialect {
        Dialect::MySql
    }

    fn quote_ident(&self, ident: &str) -> String {
        format!("`{}`", ident.replace('`', "``"))
    }
}

/// SQLite dialect
pub struct SqliteDialect;

impl SqlDialect for SqliteDialect {
    fn dialect(&self) -> Dialect {
        Dialect::Sqlite
    }

    fn quote_ident(&self, ident: &str) -> String {
        format!("`{}`", ident.replace('`', "``"))
    }
}

/// MS SQL Server dialect
pub struct MssqlDialect;

impl SqlDialect for MssqlDialect {
    fn dialect(&self) -> Dialect {
        Dialect::MsSql
    }

    fn quote_ident(&self, ident: &str) -> String {
        format!("[{}]", ident.replace(']', "]]"))
    }

    fn emit_boolean(&self, value: bool) -> String {
        if value { "1" } else { "0" }.to_string()
    }

    fn emit_boolean_condition(&self, value: bool) -> String {
        if value { "(1 = 1)" } else { "(1 = 0)" }.to_string()
    }

    fn emit_select_prefix(&self, limit: Option<u64>) -> Option<String> {
        limit.map(|n| format!("TOP {}", n))
    }

    fn emit_limit(&self, _limit: u64) -> String {
        // Expressed as TOP after SELECT instead.
        String::new()
    }
}

/// Get dialect implementation for a dialect name
pub fn get_dialect(dialect: &Dialect) -> Box<dyn SqlDialect> {
    match dialect {
        Dialect::Ansi => Box::new(AnsiDialect),
        Dialect::MySql => Box::new(MySqlDialect),
        Dialect::Sqlite => Box::new(SqliteDialect),
        Dialect::MsSql => Box::new(MssqlDialect),
    }
}
