//! Query AST layer: JSON query description -> typed AST -> optimized AST -> SQL text.
//!
//! Each stage is a pure function over owned values and can be used on its own;
//! [`plan_query`] chains them.

pub mod ast;
pub mod display;
pub mod emitter;
pub mod errors;
pub mod eval;
pub mod optimizer;
pub mod parser;

pub use ast::*;
pub use emitter::dialect::Dialect;
pub use emitter::{compile_to_sql, compile_with_dialect};
pub use errors::*;
pub use optimizer::{optimize, optimize_expr, optimize_select};
pub use parser::{parse_expr, parse_query, parse_query_str};

use emitter::dialect::get_dialect;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlanOptions {
    pub optimize: bool,
    pub dialect: Dialect,
}

impl Default for PlanOptions {
    fn default() -> Self { Self { optimize: true, dialect: Dialect::Ansi } }
}

/// Parse, optionally optimize, and return the statement that would be compiled.
pub fn build_plan(raw: &serde_json::Value, optimize: bool) -> Result<SelectStmt, QueryAstError> {
    let stmt = parse_query(raw)?;
    Ok(if optimize { optimize_select(&stmt) } else { stmt })
}

/// Full pipeline: JSON query -> SQL statement text.
pub fn plan_query(raw: &serde_json::Value, opts: &PlanOptions) -> Result<String, QueryAstError> {
    let stmt = build_plan(raw, opts.optimize)?;
    let dialect = get_dialect(&opts.dialect);
    compile_with_dialect(&Node::Select(stmt), dialect.as_ref())
}
