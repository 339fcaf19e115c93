use super::{
    ast::{BinaryOperator, Expr, Join, Node, Scalar, SelectStmt, Sort},
    display::format_float,
    errors::QueryAstError,
};

pub mod dialect;
use dialect::{AnsiDialect, SqlDialect};

/// Compile with the default (ANSI / PostgreSQL) dialect.
pub fn compile_to_sql(node: &Node) -> Result<String, QueryAstError> {
    compile_with_dialect(node, &AnsiDialect)
}

pub fn compile_with_dialect(node: &Node, dialect: &dyn SqlDialect) -> Result<String, QueryAstError> {
    let emitter = SqlEmitter { dialect };
    let sql = match node {
        Node::Select(stmt) => emitter.emit_select(stmt)?,
        Node::Expr(expr) => emitter.emit_expr(expr)?,
        Node::Join(join) => emitter.emit_join(join)?,
        Node::Sort(sort) => emitter.emit_sort(sort)?,
    };
    log::debug!("emitted {} as {} SQL: {}", node.kind_name(), dialect.dialect(), sql);
    Ok(sql)
}

struct SqlEmitter<'a> {
    dialect: &'a dyn SqlDialect,
}

impl SqlEmitter<'_> {
    fn emit_select(&self, stmt: &SelectStmt) -> Result<String, QueryAstError> {
        let cols = if stmt.selects_all() {
            "*".to_string()
        } else {
            stmt.columns
                .iter()
                .map(|c| self.emit_column(c))
                .collect::<Result<Vec<_>, _>>()?
                .join(", ")
        };
        let mut sql = String::from("SELECT ");
        if let Some(prefix) = self.dialect.emit_select_prefix(stmt.limit) {
            sql.push_str(&prefix);
            sql.push(' ');
        }
        sql.push_str(&format!("{} FROM {}", cols, self.emit_column(&stmt.table)?));
        for join in &stmt.joins {
            sql.push(' ');
            sql.push_str(&self.emit_join(join)?);
        }
        if let Some(w) = &stmt.filter {
            sql.push_str(&format!(" WHERE {}", self.emit_condition(w)?));
        }
        if !stmt.group_by.is_empty() {
            let grp = stmt
                .group_by
                .iter()
                .map(|g| self.emit_column(g))
                .collect::<Result<Vec<_>, _>>()?
                .join(", ");
            sql.push_str(&format!(" GROUP BY {}", grp));
        }
        if !stmt.order_by.is_empty() {
            let order = stmt
                .order_by
                .iter()
                .map(|s| self.emit_sort(s))
                .collect::<Result<Vec<_>, _>>()?
                .join(", ");
            sql.push_str(&format!(" ORDER BY {}", order));
        }
        if let Some(l) = stmt.limit {
            sql.push_str(&self.dialect.emit_limit(l));
        }
        sql.push(';');
        Ok(sql)
    }

    fn emit_join(&self, join: &Join) -> Result<String, QueryAstError> {
        Ok(format!(
            "{} {} ON {}",
            self.dialect.emit_join_kind(&join.kind),
            self.emit_column(&join.table)?,
            self.emit_condition(&join.on)?
        ))
    }

    fn emit_sort(&self, sort: &Sort) -> Result<String, QueryAstError> {
        Ok(format!("{} {}", self.emit_column(&sort.field)?, sort.direction.as_str()))
    }

    fn emit_expr(&self, expr: &Expr) -> Result<String, QueryAstError> {
        Ok(match expr {
            Expr::Literal { value } => self.emit_literal(value)?,
            Expr::Identifier { name } => self.emit_column(name)?,
            Expr::BinaryOp { left, op, right } => {
                let op = op.trim();
                if op.is_empty() {
                    return Err(QueryAstError::unsupported("BinaryOp with an empty operator"));
                }
                match BinaryOperator::parse(op) {
                    Some(logic @ (BinaryOperator::And | BinaryOperator::Or)) => {
                        format!("({} {} {})", self.emit_condition(left)?, logic.sql_symbol(), self.emit_condition(right)?)
                    }
                    known => {
                        let op = known.map(|o| o.sql_symbol()).unwrap_or(op);
                        format!("({} {} {})", self.emit_expr(left)?, op, self.emit_expr(right)?)
                    }
                }
            }
            Expr::LogicOp { left, op, right } => {
                format!("({} {} {})", self.emit_condition(left)?, op.as_str(), self.emit_condition(right)?)
            }
        })
    }

    /// An expression in predicate position. Boolean literals go through the dialect.
    fn emit_condition(&self, expr: &Expr) -> Result<String, QueryAstError> {
        match expr {
            Expr::Literal { value: Scalar::Bool(b) } => Ok(self.dialect.emit_boolean_condition(*b)),
            other => self.emit_expr(other),
        }
    }

    fn emit_literal(&self, value: &Scalar) -> Result<String, QueryAstError> {
        Ok(match value {
            Scalar::Null => self.dialect.emit_null(),
            Scalar::Bool(b) => self.dialect.emit_boolean(*b),
            Scalar::Int(i) => i.to_string(),
            Scalar::Float(f) if !f.is_finite() => {
                return Err(QueryAstError::unsupported(format!("non-finite numeric literal {}", f)));
            }
            Scalar::Float(f) => format_float(*f),
            Scalar::Str(s) => self.dialect.quote_string(s),
        })
    }

    /// Quote a possibly dotted name segment by segment; `*` stays bare.
    fn emit_column(&self, name: &str) -> Result<String, QueryAstError> {
        if name.is_empty() {
            return Err(QueryAstError::unsupported("empty identifier"));
        }
        if name == "*" {
            return Ok("*".into());
        }
        Ok(name
            .split('.')
            .map(|p| if p == "*" { "*".to_string() } else { self.dialect.quote_ident(p) })
            .collect::<Vec<_>>()
            .join("."))
    }
}
