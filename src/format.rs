use sqlformat::{FormatOptions, Indent, QueryParams};

// Centralized sqlformat options for human-readable output
pub fn default_sqlformat_options() -> FormatOptions<'static> {
    FormatOptions {
        joins_as_top_level: true,
        indent: Indent::Spaces(2),
        uppercase: Some(true),
        lines_between_queries: 1,
        max_inline_block: 50,
        ..Default::default()
    }
}

/// Multi-line rendering of an emitted statement. Identifier and literal text is not touched.
pub fn pretty_sql(sql: &str) -> String {
    let trimmed = sql.trim();
    if trimmed.is_empty() {
        return String::new();
    }
    sqlformat::format(trimmed, &QueryParams::None, &default_sqlformat_options())
}
