//! Compile JSON query descriptions into SQL.
//!
//! The pipeline lives in [`query_ast`]: parse a `serde_json::Value` into a
//! typed AST, run the rewrite rules, then emit SQL for a dialect.
//! [`config`] and [`format`] carry the planner settings and pretty printing
//! used by the binary.

pub mod config;
pub mod format;
pub mod query_ast;

#[cfg(feature = "cli")]
pub mod cli;

pub use config::PlannerConfig;
pub use query_ast::{PlanOptions, QueryAstError, build_plan, plan_query};
