#[derive(thiserror::Error, Debug)]
pub enum QueryAstError {
    #[error("Query must specify a table")] MissingTable,
    #[error("Unknown expression format: {0}")] UnknownExpressionFormat(String),
    #[error("malformed query: {0}")] MalformedQuery(String),
    #[error("unsupported node: {0}")] UnsupportedNode(String),
    #[error("invalid query JSON: {0}")] Json(#[from] serde_json::Error),
}

impl QueryAstError {
    pub(crate) fn malformed(msg: impl Into<String>) -> Self { QueryAstError::MalformedQuery(msg.into()) }
    pub(crate) fn unsupported(msg: impl Into<String>) -> Self { QueryAstError::UnsupportedNode(msg.into()) }
}
