//! SQL identifier quoting utilities
//!
//! Ledger and pointer table names come from configuration, so every piece of
//! bookkeeping SQL quotes them instead of interpolating raw text.

/// Quote a SQL identifier to prevent injection.
///
/// Wraps the identifier in double quotes and escapes any embedded double quotes
/// by doubling them, following the SQL standard.
///
/// # Examples
/// ```
/// use strata_core::sql_utils::quote_ident;
/// assert_eq!(quote_ident("strata_migrations"), r#""strata_migrations""#);
/// assert_eq!(quote_ident(r#"my"table"#), r#""my""table""#);
/// ```
pub fn quote_ident(ident: &str) -> String {
    format!("\"{}\"", ident.replace('"', "\"\""))
}

/// Quote a potentially schema-qualified name (e.g. `meta.strata_migrations`).
///
/// Splits on `.` and individually quotes each component.
///
/// # Examples
/// ```
/// use strata_core::sql_utils::quote_qualified;
/// assert_eq!(quote_qualified("ledger"), r#""ledger""#);
/// assert_eq!(quote_qualified("meta.ledger"), r#""meta"."ledger""#);
/// ```
pub fn quote_qualified(name: &str) -> String {
    name.split('.')
        .map(quote_ident)
        .collect::<Vec<_>>()
        .join(".")
}

/// Split a potentially schema-qualified table name into (schema, table).
///
/// Uses the last `.` as the separator. Returns `None` for the schema when the
/// name is unqualified.
///
/// # Examples
/// ```
/// use strata_core::sql_utils::split_qualified_name;
/// assert_eq!(split_qualified_name("ledger"), (None, "ledger"));
/// assert_eq!(split_qualified_name("meta.ledger"), (Some("meta"), "ledger"));
/// ```
pub fn split_qualified_name(name: &str) -> (Option<&str>, &str) {
    match name.rfind('.') {
        Some(pos) => (Some(&name[..pos]), &name[pos + 1..]),
        None => (None, name),
    }
}
