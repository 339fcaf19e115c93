//! Typed query AST produced by the parser and consumed by the optimizer and emitter.
//!
//! Every node is an owned value. Rewrites build new nodes; nothing here exposes
//! interior mutability, so a tree can be shared freely once built.

use serde::Serialize;

/// A constant value carried by [`Expr::Literal`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Scalar {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
}

impl Scalar {
    pub fn is_true(&self) -> bool { matches!(self, Scalar::Bool(true)) }
    pub fn is_false(&self) -> bool { matches!(self, Scalar::Bool(false)) }
}

impl From<bool> for Scalar { fn from(v: bool) -> Self { Scalar::Bool(v) } }
impl From<i64> for Scalar { fn from(v: i64) -> Self { Scalar::Int(v) } }
impl From<i32> for Scalar { fn from(v: i32) -> Self { Scalar::Int(v as i64) } }
impl From<f64> for Scalar { fn from(v: f64) -> Self { Scalar::Float(v) } }
impl From<&str> for Scalar { fn from(v: &str) -> Self { Scalar::Str(v.to_string()) } }
impl From<String> for Scalar { fn from(v: String) -> Self { Scalar::Str(v) } }
impl<T: Into<Scalar>> From<Option<T>> for Scalar {
    fn from(v: Option<T>) -> Self { v.map(Into::into).unwrap_or(Scalar::Null) }
}

/// Boolean combinators. Both are commutative, which the optimizer relies on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum LogicOperator { And, Or }

impl LogicOperator {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogicOperator::And => "AND",
            LogicOperator::Or => "OR",
        }
    }

    /// Case-insensitive; returns `None` for anything that is not AND/OR.
    pub fn parse(op: &str) -> Option<Self> {
        match op.to_ascii_uppercase().as_str() {
            "AND" => Some(LogicOperator::And),
            "OR" => Some(LogicOperator::Or),
            _ => None,
        }
    }
}

/// Operators the optimizer can evaluate and the emitter knows how to spell.
///
/// [`Expr::BinaryOp`] keeps its operator as the raw string so unknown operators
/// survive untouched; this enum is only a lookup over that string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryOperator { Eq, NotEq, Lt, Gt, LtEq, GtEq, Plus, Minus, Multiply, Divide, And, Or }

impl BinaryOperator {
    /// Resolve a symbol or alias (`eq`, `neq`, `lt`, `gt`, `lte`, `gte`), ignoring case.
    pub fn parse(op: &str) -> Option<Self> {
        use BinaryOperator::*;
        Some(match op.to_ascii_lowercase().as_str() {
            "=" | "eq" => Eq,
            "!=" | "neq" => NotEq,
            "<" | "lt" => Lt,
            ">" | "gt" => Gt,
            "<=" | "lte" => LtEq,
            ">=" | "gte" => GtEq,
            "+" => Plus,
            "-" => Minus,
            "*" => Multiply,
            "/" => Divide,
            "and" => And,
            "or" => Or,
            _ => return None,
        })
    }

    pub fn sql_symbol(&self) -> &'static str {
        use BinaryOperator::*;
        match self {
            Eq => "=",
            NotEq => "!=",
            Lt => "<",
            Gt => ">",
            LtEq => "<=",
            GtEq => ">=",
            Plus => "+",
            Minus => "-",
            Multiply => "*",
            Divide => "/",
            And => "AND",
            Or => "OR",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Expr {
    Literal { value: Scalar },
    Identifier { name: String },
    BinaryOp { left: Box<Expr>, op: String, right: Box<Expr> },
    LogicOp { left: Box<Expr>, op: LogicOperator, right: Box<Expr> },
}

impl Expr {
    pub fn lit(value: impl Into<Scalar>) -> Self { Expr::Literal { value: value.into() } }
    pub fn col(name: impl Into<String>) -> Self { Expr::Identifier { name: name.into() } }

    pub fn binary(left: Expr, op: impl Into<String>, right: Expr) -> Self {
        Expr::BinaryOp { left: Box::new(left), op: op.into(), right: Box::new(right) }
    }

    pub fn logic(left: Expr, op: LogicOperator, right: Expr) -> Self {
        Expr::LogicOp { left: Box::new(left), op, right: Box::new(right) }
    }

    pub fn and(left: Expr, right: Expr) -> Self { Self::logic(left, LogicOperator::And, right) }
    pub fn or(left: Expr, right: Expr) -> Self { Self::logic(left, LogicOperator::Or, right) }

    pub fn as_literal(&self) -> Option<&Scalar> {
        match self {
            Expr::Literal { value } => Some(value),
            _ => None,
        }
    }

    pub fn is_literal_true(&self) -> bool { self.as_literal().is_some_and(Scalar::is_true) }
    pub fn is_literal_false(&self) -> bool { self.as_literal().is_some_and(Scalar::is_false) }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum JoinKind {
    #[default]
    Inner,
    Left,
    Right,
    Full,
}

impl JoinKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            JoinKind::Inner => "INNER",
            JoinKind::Left => "LEFT",
            JoinKind::Right => "RIGHT",
            JoinKind::Full => "FULL",
        }
    }

    pub fn parse(kind: &str) -> Option<Self> {
        match kind.to_ascii_uppercase().as_str() {
            "INNER" => Some(JoinKind::Inner),
            "LEFT" => Some(JoinKind::Left),
            "RIGHT" => Some(JoinKind::Right),
            "FULL" => Some(JoinKind::Full),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Join {
    pub kind: JoinKind,
    pub table: String,
    pub on: Expr,
}

impl Join {
    pub fn new(kind: JoinKind, table: impl Into<String>, on: Expr) -> Self {
        Self { kind, table: table.into(), on }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }

    pub fn parse(dir: &str) -> Option<Self> {
        match dir.to_ascii_uppercase().as_str() {
            "ASC" => Some(SortDirection::Asc),
            "DESC" => Some(SortDirection::Desc),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Sort {
    pub field: String,
    pub direction: SortDirection,
}

impl Sort {
    pub fn asc(field: impl Into<String>) -> Self { Self { field: field.into(), direction: SortDirection::Asc } }
    pub fn desc(field: impl Into<String>) -> Self { Self { field: field.into(), direction: SortDirection::Desc } }
}

/// Statement root. `columns` empty means `*`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SelectStmt {
    pub table: String,
    pub columns: Vec<String>,
    pub joins: Vec<Join>,
    #[serde(rename = "where")]
    pub filter: Option<Expr>,
    pub group_by: Vec<String>,
    pub order_by: Vec<Sort>,
    pub limit: Option<u64>,
}

impl SelectStmt {
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            columns: Vec::new(),
            joins: Vec::new(),
            filter: None,
            group_by: Vec::new(),
            order_by: Vec::new(),
            limit: None,
        }
    }

    pub fn with_columns<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.columns = columns.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_join(mut self, join: Join) -> Self { self.joins.push(join); self }
    pub fn with_filter(mut self, filter: Expr) -> Self { self.filter = Some(filter); self }

    pub fn with_group_by<I, S>(mut self, group_by: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.group_by = group_by.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_order_by(mut self, sort: Sort) -> Self { self.order_by.push(sort); self }
    pub fn with_limit(mut self, limit: u64) -> Self { self.limit = Some(limit); self }

    /// True when the projection should be emitted as `*`.
    pub fn selects_all(&self) -> bool {
        self.columns.is_empty() || (self.columns.len() == 1 && self.columns[0] == "*")
    }
}

/// Anything the optimizer and emitter accept.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Node {
    Select(SelectStmt),
    Expr(Expr),
    Join(Join),
    Sort(Sort),
}

impl Node {
    pub fn kind_name(&self) -> &'static str {
        match self {
            Node::Select(_) => "SelectStmt",
            Node::Expr(Expr::Literal { .. }) => "Literal",
            Node::Expr(Expr::Identifier { .. }) => "Identifier",
            Node::Expr(Expr::BinaryOp { .. }) => "BinaryOp",
            Node::Expr(Expr::LogicOp { .. }) => "LogicOp",
            Node::Join(_) => "Join",
            Node::Sort(_) => "Sort",
        }
    }
}

impl From<SelectStmt> for Node { fn from(v: SelectStmt) -> Self { Node::Select(v) } }
impl From<Expr> for Node { fn from(v: Expr) -> Self { Node::Expr(v) } }
impl From<Join> for Node { fn from(v: Join) -> Self { Node::Join(v) } }
impl From<Sort> for Node { fn from(v: Sort) -> Self { Node::Sort(v) } }

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn binary_operator_aliases_resolve_case_insensitively() {
        assert_eq!(BinaryOperator::parse("EQ"), Some(BinaryOperator::Eq));
        assert_eq!(BinaryOperator::parse("gte"), Some(BinaryOperator::GtEq));
        assert_eq!(BinaryOperator::parse("!="), Some(BinaryOperator::NotEq));
        assert_eq!(BinaryOperator::parse("LIKE"), None);
    }

    #[test]
    fn selects_all_for_empty_or_star() {
        assert!(SelectStmt::new("t").selects_all());
        assert!(SelectStmt::new("t").with_columns(["*"]).selects_all());
        assert!(!SelectStmt::new("t").with_columns(["id"]).selects_all());
    }
}
