//! Canonical text form of AST nodes.
//!
//! The same rendering serves two purposes: it is the ordering key the optimizer
//! uses to put commutative operands in a fixed order, and it is what `explain`
//! prints. It has to stay deterministic.

use std::fmt;

use super::ast::{Expr, Join, Node, Scalar, SelectStmt, Sort};

/// Shortest round-trip float text that always keeps a fraction or exponent (`1.0`, `2.5`, `1e100`).
pub fn format_float(v: f64) -> String { format!("{:?}", v) }

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Null => write!(f, "NULL"),
            Scalar::Bool(true) => write!(f, "TRUE"),
            Scalar::Bool(false) => write!(f, "FALSE"),
            Scalar::Int(v) => write!(f, "{}", v),
            Scalar::Float(v) => write!(f, "{}", format_float(*v)),
            Scalar::Str(s) => write!(f, "'{}'", s.replace('\'', "''")),
        }
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Literal { value } => write!(f, "Literal({})", value),
            Expr::Identifier { name } => write!(f, "Identifier({:?})", name),
            Expr::BinaryOp { left, op, right } => write!(f, "BinaryOp({} {:?} {})", left, op, right),
            Expr::LogicOp { left, op, right } => write!(f, "LogicOp({} {} {})", left, op.as_str(), right),
        }
    }
}

impl fmt::Display for Join {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Join({} {} ON {})", self.kind.as_str(), self.table, self.on)
    }
}

impl fmt::Display for Sort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Sort({} {})", self.field, self.direction.as_str())
    }
}

impl fmt::Display for SelectStmt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(&explain_select(self)) }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Node::Select(s) => s.fmt(f),
            Node::Expr(e) => e.fmt(f),
            Node::Join(j) => j.fmt(f),
            Node::Sort(s) => s.fmt(f),
        }
    }
}

/// Ordering key for commutative operands.
pub fn canonical_key(expr: &Expr) -> String { expr.to_string() }

/// Multi-line, indented rendering of a statement.
pub fn explain_select(stmt: &SelectStmt) -> String {
    let mut out = String::new();
    out.push_str(&format!("SelectStmt table={}\n", stmt.table));
    if stmt.selects_all() {
        out.push_str("  columns=*\n");
    } else {
        out.push_str(&format!("  columns=[{}]\n", stmt.columns.join(", ")));
    }
    for j in &stmt.joins {
        out.push_str(&format!("  join kind={} table={}\n", j.kind.as_str(), j.table));
        fmt_expr_tree(&j.on, 2, &mut out);
    }
    if let Some(w) = &stmt.filter {
        out.push_str("  where\n");
        fmt_expr_tree(w, 2, &mut out);
    }
    if !stmt.group_by.is_empty() {
        out.push_str(&format!("  group_by=[{}]\n", stmt.group_by.join(", ")));
    }
    if !stmt.order_by.is_empty() {
        let items = stmt.order_by.iter().map(|s| format!("{} {}", s.field, s.direction.as_str())).collect::<Vec<_>>();
        out.push_str(&format!("  order_by=[{}]\n", items.join(", ")));
    }
    if let Some(n) = stmt.limit {
        out.push_str(&format!("  limit={}\n", n));
    }
    out
}

fn fmt_expr_tree(expr: &Expr, indent: usize, out: &mut String) {
    let pad = "  ".repeat(indent);
    match expr {
        Expr::Literal { value } => out.push_str(&format!("{pad}Literal {}\n", value)),
        Expr::Identifier { name } => out.push_str(&format!("{pad}Identifier {}\n", name)),
        Expr::BinaryOp { left, op, right } => {
            out.push_str(&format!("{pad}BinaryOp {}\n", op));
            fmt_expr_tree(left, indent + 1, out);
            fmt_expr_tree(right, indent + 1, out);
        }
        Expr::LogicOp { left, op, right } => {
            out.push_str(&format!("{pad}LogicOp {}\n", op.as_str()));
            fmt_expr_tree(left, indent + 1, out);
            fmt_expr_tree(right, indent + 1, out);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query_ast::ast::{JoinKind, SortDirection};

    #[test]
    fn canonical_form_is_nested_and_unambiguous() {
        let e = Expr::and(Expr::binary(Expr::col("age"), ">", Expr::lit(18)), Expr::lit("it's"));
        assert_eq!(canonical_key(&e), r#"LogicOp(BinaryOp(Identifier("age") ">" Literal(18)) AND Literal('it''s'))"#);
    }

    #[test]
    fn names_that_look_like_syntax_keep_distinct_keys() {
        let a = Expr::binary(Expr::col("x"), "=", Expr::col("y) = Literal(1"));
        let b = Expr::binary(Expr::col("x) = Identifier(y"), "=", Expr::lit(1));
        assert_ne!(canonical_key(&a), canonical_key(&b));
        let c = Expr::binary(Expr::col("a"), "= Identifier(b) =", Expr::col("c"));
        let d = Expr::binary(Expr::col("a) = Identifier(b"), "=", Expr::col("c"));
        assert_ne!(canonical_key(&c), canonical_key(&d));
    }

    #[test]
    fn floats_keep_their_fraction() {
        assert_eq!(Scalar::Float(1.0).to_string(), "1.0");
        assert_eq!(Scalar::Float(2.5).to_string(), "2.5");
        assert_ne!(canonical_key(&Expr::lit(1)), canonical_key(&Expr::lit(1.0)));
    }

    #[test]
    fn explain_lists_every_clause() {
        let stmt = SelectStmt::new("users")
            .with_columns(["id"])
            .with_join(Join::new(JoinKind::Left, "posts", Expr::binary(Expr::col("users.id"), "=", Expr::col("posts.user_id"))))
            .with_filter(Expr::binary(Expr::col("age"), ">", Expr::lit(18)))
            .with_group_by(["dept"])
            .with_order_by(Sort { field: "id".into(), direction: SortDirection::Desc })
            .with_limit(5);
        let text = explain_select(&stmt);
        assert!(text.starts_with("SelectStmt table=users\n"));
        assert!(text.contains("  join kind=LEFT table=posts\n"));
        assert!(text.contains("    BinaryOp >\n      Identifier age\n      Literal 18\n"));
        assert!(text.contains("  order_by=[id DESC]\n"));
        assert!(text.ends_with("  limit=5\n"));
    }
}
