//! Command-line surface: read a JSON query file, plan it, print SQL.
//!
//! `main` only parses arguments, sets up logging and maps errors to exit codes;
//! everything else lives here so it can be driven from tests.

use clap::Parser;
use std::fmt;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::config::{ConfigError, PlannerConfig};
use crate::format::pretty_sql;
use crate::query_ast::{Dialect, QueryAstError, build_plan, display::explain_select, plan_query};

/// Compile a JSON query description into a SQL SELECT statement.
#[derive(Parser, Debug)]
#[command(name = "query-planner", version, about)]
pub struct CliArgs {
    /// Path to the JSON query file (`-` reads stdin).
    #[arg(value_name = "QUERY_FILE")]
    pub query_file: PathBuf,

    /// Disable optimization.
    #[arg(long = "no-opt")]
    pub no_opt: bool,

    /// SQL dialect: ansi, postgres, mysql, sqlite, mssql.
    #[arg(long = "dialect", value_name = "DIALECT")]
    pub dialect: Option<Dialect>,

    /// Print multi-line SQL instead of a single line.
    #[arg(long = "pretty")]
    pub pretty: bool,

    /// Print the planned AST instead of SQL.
    #[arg(long = "explain")]
    pub explain: bool,

    /// AST output format for --explain: text, json.
    #[arg(long = "explain-format", value_name = "FORMAT", default_value = "text")]
    pub explain_format: ExplainFormat,

    /// Config file (default: ~/.query-planner/config.json).
    #[arg(long = "config", value_name = "FILE")]
    pub config: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExplainFormat {
    /// Indented tree.
    Text,
    /// Pretty-printed JSON of the AST.
    Json,
}

impl fmt::Display for ExplainFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExplainFormat::Text => write!(f, "text"),
            ExplainFormat::Json => write!(f, "json"),
        }
    }
}

impl FromStr for ExplainFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(ExplainFormat::Text),
            "json" => Ok(ExplainFormat::Json),
            other => Err(format!("unknown explain format '{}' (expected text or json)", other)),
        }
    }
}

#[derive(thiserror::Error, Debug)]
pub enum CliError {
    #[error("Error reading file {}: {source}", path.display())] Io { path: PathBuf, source: std::io::Error },
    #[error("Error reading file {}: {source}", path.display())] Json { path: PathBuf, source: serde_json::Error },
    #[error("Error processing query: {0}")] Plan(#[from] QueryAstError),
    #[error("Error loading config: {0}")] Config(#[from] ConfigError),
    #[error("Error writing output: {0}")] Output(std::io::Error),
    #[error("Error serializing plan: {0}")] Serialize(serde_json::Error),
}

/// Resolve config for this invocation: file/env first, then flags on top.
pub fn resolve_config(args: &CliArgs) -> Result<PlannerConfig, CliError> {
    let mut cfg = PlannerConfig::load(args.config.as_deref())?;
    if args.no_opt {
        cfg.optimize = false;
    }
    if let Some(d) = args.dialect {
        cfg.dialect = d;
    }
    if args.pretty {
        cfg.pretty = true;
    }
    Ok(cfg)
}

pub fn read_query(path: &Path) -> Result<serde_json::Value, CliError> {
    let content = if path == Path::new("-") {
        let mut buf = String::new();
        std::io::stdin().read_to_string(&mut buf).map(|_| buf)
    } else {
        std::fs::read_to_string(path)
    }
    .map_err(|source| CliError::Io { path: path.to_path_buf(), source })?;
    serde_json::from_str(&content).map_err(|source| CliError::Json { path: path.to_path_buf(), source })
}

/// Run one planner invocation, writing the result (plus a trailing newline) to `out`.
pub fn run(args: &CliArgs, cfg: &PlannerConfig, out: &mut dyn Write) -> Result<(), CliError> {
    let raw = read_query(&args.query_file)?;
    let rendered = render(&raw, args.explain.then_some(args.explain_format), cfg)?;
    writeln!(out, "{}", rendered).map_err(CliError::Output)
}

/// Plan `raw` and render it as SQL, or as the AST when `explain` is set.
pub fn render(raw: &serde_json::Value, explain: Option<ExplainFormat>, cfg: &PlannerConfig) -> Result<String, CliError> {
    let Some(format) = explain else {
        let sql = plan_query(raw, &cfg.plan_options())?;
        return Ok(if cfg.pretty { pretty_sql(&sql) } else { sql });
    };
    let stmt = build_plan(raw, cfg.optimize)?;
    match format {
        ExplainFormat::Text => Ok(explain_select(&stmt).trim_end().to_string()),
        ExplainFormat::Json => serde_json::to_string_pretty(&stmt).map_err(CliError::Serialize),
    }
}
