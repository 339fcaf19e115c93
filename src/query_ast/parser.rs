use serde_json::{Map, Value};

use super::{
    ast::{Expr, Join, JoinKind, LogicOperator, Scalar, SelectStmt, Sort, SortDirection},
    errors::QueryAstError,
};

const KNOWN_KEYS: &[&str] = &["table", "columns", "joins", "where", "group_by", "order_by", "limit"];

/// Parse JSON text into a statement.
pub fn parse_query_str(raw: &str) -> Result<SelectStmt, QueryAstError> {
    let value: Value = serde_json::from_str(raw)?;
    parse_query(&value)
}

/// Convert a JSON query description into a [`SelectStmt`].
pub fn parse_query(raw: &Value) -> Result<SelectStmt, QueryAstError> {
    let obj = raw.as_object().ok_or_else(|| QueryAstError::malformed(format!("query must be a JSON object, got {}", json_kind(raw))))?;

    for key in obj.keys().filter(|k| !KNOWN_KEYS.contains(&k.as_str())) {
        log::debug!("ignoring unknown query key '{}'", key);
    }

    let table = match obj.get("table") {
        None | Some(Value::Null) => return Err(QueryAstError::MissingTable),
        Some(Value::String(s)) if s.is_empty() => return Err(QueryAstError::MissingTable),
        Some(Value::String(s)) => s.clone(),
        Some(other) => return Err(QueryAstError::malformed(format!("'table' must be a string, got {}", json_kind(other)))),
    };

    let columns = string_list(obj, "columns")?;

    let filter = match obj.get("where") {
        None | Some(Value::Null) => None,
        Some(w) => Some(parse_expr(w)?),
    };

    let mut joins = Vec::new();
    for (idx, j) in array_field(obj, "joins")?.iter().enumerate() {
        joins.push(parse_join(j, idx)?);
    }

    let group_by = string_list(obj, "group_by")?;

    let mut order_by = Vec::new();
    for (idx, o) in array_field(obj, "order_by")?.iter().enumerate() {
        order_by.push(parse_sort(o, idx)?);
    }

    let limit = match obj.get("limit") {
        None | Some(Value::Null) => None,
        Some(v) => Some(v.as_u64().ok_or_else(|| QueryAstError::malformed(format!("'limit' must be a non-negative integer, got {}", v)))?),
    };

    let stmt = SelectStmt { table, columns, joins, filter, group_by, order_by, limit };
    log::debug!(
        "parsed query: table={} columns={} joins={} where={} order_by={} limit={:?}",
        stmt.table,
        stmt.columns.len(),
        stmt.joins.len(),
        stmt.filter.is_some(),
        stmt.order_by.len(),
        stmt.limit
    );
    Ok(stmt)
}

/// Parse one expression. Bare scalars are always literals; identifiers must be spelled `{"col": ...}`.
pub fn parse_expr(raw: &Value) -> Result<Expr, QueryAstError> {
    if let Some(value) = scalar_from_json(raw) {
        return Ok(Expr::Literal { value });
    }
    let obj = match raw {
        Value::Object(obj) => obj,
        other => return Err(QueryAstError::UnknownExpressionFormat(other.to_string())),
    };

    if let Some(col) = obj.get("col") {
        return match col {
            Value::String(name) if !name.is_empty() => Ok(Expr::Identifier { name: name.clone() }),
            other => Err(QueryAstError::malformed(format!("'col' must be a non-empty string, got {}", other))),
        };
    }
    if let Some(lit) = obj.get("literal") {
        let value = scalar_from_json(lit).ok_or_else(|| QueryAstError::malformed(format!("'literal' must be a scalar, got {}", json_kind(lit))))?;
        return Ok(Expr::Literal { value });
    }
    if let Some(op) = obj.get("op") {
        let op = match op {
            Value::String(s) if !s.trim().is_empty() => s.trim().to_uppercase(),
            other => return Err(QueryAstError::malformed(format!("'op' must be a non-empty string, got {}", other))),
        };
        let left = parse_expr(operand(obj, &op, "left")?)?;
        let right = parse_expr(operand(obj, &op, "right")?)?;
        return Ok(match LogicOperator::parse(&op) {
            Some(logic) => Expr::logic(left, logic, right),
            None => Expr::binary(left, op, right),
        });
    }
    Err(QueryAstError::UnknownExpressionFormat(raw.to_string()))
}

fn operand<'a>(obj: &'a Map<String, Value>, op: &str, side: &str) -> Result<&'a Value, QueryAstError> {
    obj.get(side).ok_or_else(|| QueryAstError::malformed(format!("operator '{}' is missing its '{}' operand", op, side)))
}

fn parse_join(raw: &Value, idx: usize) -> Result<Join, QueryAstError> {
    let obj = raw.as_object().ok_or_else(|| QueryAstError::malformed(format!("joins[{}] must be an object", idx)))?;
    let kind = match obj.get("type") {
        None | Some(Value::Null) => JoinKind::default(),
        Some(Value::String(s)) => JoinKind::parse(s).ok_or_else(|| QueryAstError::malformed(format!("joins[{}]: unknown join type '{}'", idx, s)))?,
        Some(other) => return Err(QueryAstError::malformed(format!("joins[{}]: 'type' must be a string, got {}", idx, json_kind(other)))),
    };
    let table = match obj.get("table") {
        Some(Value::String(s)) if !s.is_empty() => s.clone(),
        _ => return Err(QueryAstError::malformed(format!("joins[{}] must specify a table", idx))),
    };
    let on = obj.get("on").ok_or_else(|| QueryAstError::malformed(format!("joins[{}] must specify an 'on' condition", idx)))?;
    Ok(Join { kind, table, on: parse_expr(on)? })
}

fn parse_sort(raw: &Value, idx: usize) -> Result<Sort, QueryAstError> {
    match raw {
        Value::String(field) if !field.is_empty() => Ok(Sort { field: field.clone(), direction: SortDirection::Asc }),
        Value::Object(obj) => {
            let field = match obj.get("field") {
                Some(Value::String(s)) if !s.is_empty() => s.clone(),
                _ => return Err(QueryAstError::malformed(format!("order_by[{}] must specify a field", idx))),
            };
            let direction = match obj.get("direction") {
                None | Some(Value::Null) => SortDirection::default(),
                Some(Value::String(d)) => SortDirection::parse(d).ok_or_else(|| QueryAstError::malformed(format!("order_by[{}]: unknown direction '{}'", idx, d)))?,
                Some(other) => return Err(QueryAstError::malformed(format!("order_by[{}]: 'direction' must be a string, got {}", idx, json_kind(other)))),
            };
            Ok(Sort { field, direction })
        }
        other => Err(QueryAstError::malformed(format!("order_by[{}] must be a field name or an object, got {}", idx, json_kind(other)))),
    }
}

fn array_field<'a>(obj: &'a Map<String, Value>, key: &str) -> Result<&'a [Value], QueryAstError> {
    match obj.get(key) {
        None | Some(Value::Null) => Ok(&[]),
        Some(Value::Array(items)) => Ok(items.as_slice()),
        Some(other) => Err(QueryAstError::malformed(format!("'{}' must be an array, got {}", key, json_kind(other)))),
    }
}

fn string_list(obj: &Map<String, Value>, key: &str) -> Result<Vec<String>, QueryAstError> {
    array_field(obj, key)?
        .iter()
        .enumerate()
        .map(|(idx, v)| match v {
            Value::String(s) if !s.is_empty() => Ok(s.clone()),
            other => Err(QueryAstError::malformed(format!("{}[{}] must be a non-empty string, got {}", key, idx, other))),
        })
        .collect()
}

fn scalar_from_json(v: &Value) -> Option<Scalar> {
    match v {
        Value::Null => Some(Scalar::Null),
        Value::Bool(b) => Some(Scalar::Bool(*b)),
        Value::Number(n) => match n.as_i64() {
            Some(i) => Some(Scalar::Int(i)),
            None => n.as_f64().map(Scalar::Float),
        },
        Value::String(s) => Some(Scalar::Str(s.clone())),
        Value::Array(_) | Value::Object(_) => None,
    }
}

fn json_kind(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn minimal_query_has_empty_clauses() {
        let stmt = parse_query(&json!({"table": "users", "columns": ["id", "name"]})).unwrap();
        assert_eq!(stmt.table, "users");
        assert_eq!(stmt.columns, vec!["id", "name"]);
        assert!(stmt.joins.is_empty());
        assert!(stmt.filter.is_none());
        assert!(stmt.group_by.is_empty());
        assert!(stmt.order_by.is_empty());
        assert!(stmt.limit.is_none());
    }

    #[test]
    fn columns_default_to_all() {
        let stmt = parse_query(&json!({"table": "users"})).unwrap();
        assert!(stmt.columns.is_empty());
        assert!(stmt.selects_all());
    }

    #[test]
    fn missing_or_empty_table_is_rejected() {
        assert!(matches!(parse_query(&json!({"columns": ["id"]})), Err(QueryAstError::MissingTable)));
        assert!(matches!(parse_query(&json!({"table": ""})), Err(QueryAstError::MissingTable)));
        assert!(matches!(parse_query(&json!({"table": 5})), Err(QueryAstError::MalformedQuery(_))));
        assert!(matches!(parse_query(&json!(["users"])), Err(QueryAstError::MalformedQuery(_))));
    }

    #[test]
    fn bare_strings_are_literals_not_identifiers() {
        assert_eq!(parse_expr(&json!("age")).unwrap(), Expr::lit("age"));
        assert_eq!(parse_expr(&json!({"col": "age"})).unwrap(), Expr::col("age"));
        assert_eq!(parse_expr(&json!({"literal": 3})).unwrap(), Expr::lit(3));
        assert_eq!(parse_expr(&json!(null)).unwrap(), Expr::lit(Scalar::Null));
        assert_eq!(parse_expr(&json!(2.5)).unwrap(), Expr::lit(2.5));
    }

    #[test]
    fn op_objects_split_into_logic_and_binary() {
        let e = parse_expr(&json!({
            "op": "and",
            "left": {"op": "gt", "left": {"col": "age"}, "right": 18},
            "right": {"op": "=", "left": {"col": "active"}, "right": true}
        }))
        .unwrap();
        let expected = Expr::and(
            Expr::binary(Expr::col("age"), "GT", Expr::lit(18)),
            Expr::binary(Expr::col("active"), "=", Expr::lit(true)),
        );
        assert_eq!(e, expected);
    }

    #[test]
    fn col_takes_precedence_over_other_keys() {
        let e = parse_expr(&json!({"col": "x", "literal": 1, "op": "+"})).unwrap();
        assert_eq!(e, Expr::col("x"));
    }

    #[test]
    fn unknown_shapes_are_rejected() {
        assert!(matches!(parse_expr(&json!({"column": "x"})), Err(QueryAstError::UnknownExpressionFormat(_))));
        assert!(matches!(parse_expr(&json!([1, 2])), Err(QueryAstError::UnknownExpressionFormat(_))));
        assert!(matches!(parse_expr(&json!({"op": "="})), Err(QueryAstError::MalformedQuery(_))));
        assert!(matches!(parse_expr(&json!({"literal": [1]})), Err(QueryAstError::MalformedQuery(_))));
    }

    #[test]
    fn joins_default_to_inner() {
        let stmt = parse_query(&json!({
            "table": "a",
            "joins": [
                {"table": "b", "on": {"op": "=", "left": {"col": "a.id"}, "right": {"col": "b.a_id"}}},
                {"type": "left", "table": "c", "on": true}
            ]
        }))
        .unwrap();
        assert_eq!(stmt.joins[0].kind, JoinKind::Inner);
        assert_eq!(stmt.joins[1].kind, JoinKind::Left);
        assert_eq!(stmt.joins[1].on, Expr::lit(true));
    }

    #[test]
    fn bad_joins_are_rejected() {
        let no_on = json!({"table": "a", "joins": [{"table": "b"}]});
        assert!(matches!(parse_query(&no_on), Err(QueryAstError::MalformedQuery(_))));
        let bad_kind = json!({"table": "a", "joins": [{"type": "CROSS", "table": "b", "on": true}]});
        assert!(matches!(parse_query(&bad_kind), Err(QueryAstError::MalformedQuery(_))));
    }

    #[test]
    fn order_by_accepts_strings_and_objects() {
        let stmt = parse_query(&json!({
            "table": "t",
            "order_by": ["name", {"field": "created_at", "direction": "desc"}, {"field": "id"}]
        }))
        .unwrap();
        assert_eq!(stmt.order_by, vec![Sort::asc("name"), Sort::desc("created_at"), Sort::asc("id")]);
    }

    #[test]
    fn group_by_and_limit_are_type_checked() {
        let stmt = parse_query(&json!({"table": "t", "group_by": ["dept"], "limit": 10})).unwrap();
        assert_eq!(stmt.group_by, vec!["dept"]);
        assert_eq!(stmt.limit, Some(10));
        assert!(parse_query(&json!({"table": "t", "limit": -1})).is_err());
        assert!(parse_query(&json!({"table": "t", "limit": "10"})).is_err());
        assert!(parse_query(&json!({"table": "t", "group_by": "dept"})).is_err());
    }

    #[test]
    fn null_where_means_no_filter() {
        let stmt = parse_query(&json!({"table": "t", "where": null})).unwrap();
        assert!(stmt.filter.is_none());
        let stmt = parse_query(&json!({"table": "t", "where": false})).unwrap();
        assert_eq!(stmt.filter, Some(Expr::lit(false)));
    }

    #[test]
    fn parse_from_text() {
        let stmt = parse_query_str(r#"{"table": "users", "limit": 3}"#).unwrap();
        assert_eq!(stmt.limit, Some(3));
        assert!(matches!(parse_query_str("{not json"), Err(QueryAstError::Json(_))));
    }
}
