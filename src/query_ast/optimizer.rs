//! Bottom-up rewrite of the AST.
//!
//! Rules, applied at every operator node after its children are rewritten:
//! 1. constant folding (`BinaryOp` over two literals)
//! 2. canonical operand order (`LogicOp`)
//! 3. boolean simplification (`LogicOp`)
//!
//! The rewrite is total: anything it cannot simplify comes back unchanged.

use super::{
    ast::{Expr, Join, LogicOperator, Node, Scalar, SelectStmt},
    display::canonical_key,
    eval::evaluate_binary,
};

pub fn optimize(node: &Node) -> Node {
    match node {
        Node::Select(stmt) => Node::Select(optimize_select(stmt)),
        Node::Expr(expr) => Node::Expr(optimize_expr(expr)),
        Node::Join(join) => Node::Join(optimize_join(join)),
        Node::Sort(sort) => Node::Sort(sort.clone()),
    }
}

pub fn optimize_select(stmt: &SelectStmt) -> SelectStmt {
    let filter = stmt.filter.as_ref().map(optimize_expr).filter(|w| {
        let always_true = w.is_literal_true();
        if always_true {
            log::trace!("dropping always-true WHERE on {}", stmt.table);
        }
        !always_true
    });
    let joins = stmt.joins.iter().map(optimize_join).collect::<Vec<_>>();

    let out = SelectStmt {
        table: stmt.table.clone(),
        columns: stmt.columns.clone(),
        joins,
        filter,
        group_by: stmt.group_by.clone(),
        order_by: stmt.order_by.clone(),
        limit: stmt.limit,
    };
    if out != *stmt {
        log::debug!("optimized statement on {}", stmt.table);
    }
    out
}

fn optimize_join(join: &Join) -> Join {
    Join { kind: join.kind, table: join.table.clone(), on: optimize_expr(&join.on) }
}

pub fn optimize_expr(expr: &Expr) -> Expr {
    match expr {
        Expr::Literal { .. } | Expr::Identifier { .. } => expr.clone(),
        Expr::BinaryOp { left, op, right } => {
            let l = optimize_expr(left);
            let r = optimize_expr(right);
            if let (Expr::Literal { value: lv }, Expr::Literal { value: rv }) = (&l, &r)
                && let Some(value) = evaluate_binary(op, lv, rv)
            {
                log::trace!("folded {} {} {} => {}", lv, op, rv, value);
                return Expr::Literal { value };
            }
            Expr::binary(l, op.clone(), r)
        }
        Expr::LogicOp { left, op, right } => {
            let mut l = optimize_expr(left);
            let mut r = optimize_expr(right);
            if canonical_key(&l) > canonical_key(&r) {
                std::mem::swap(&mut l, &mut r);
            }
            simplify_logic(*op, l, r)
        }
    }
}

fn simplify_logic(op: LogicOperator, l: Expr, r: Expr) -> Expr {
    let out = match op {
        LogicOperator::And => {
            if l.is_literal_true() {
                r
            } else if r.is_literal_true() {
                l
            } else if l.is_literal_false() || r.is_literal_false() {
                Expr::lit(Scalar::Bool(false))
            } else if l == r {
                l
            } else {
                return Expr::logic(l, op, r);
            }
        }
        LogicOperator::Or => {
            if l.is_literal_true() || r.is_literal_true() {
                Expr::lit(Scalar::Bool(true))
            } else if l.is_literal_false() {
                r
            } else if r.is_literal_false() {
                l
            } else if l == r {
                l
            } else {
                return Expr::logic(l, op, r);
            }
        }
    };
    log::trace!("simplified {} => {}", op.as_str(), out);
    out
}
