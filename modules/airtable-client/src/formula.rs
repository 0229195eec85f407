//! Helpers for building Airtable formula strings.

/// Escape a value for use inside a single-quoted formula string literal.
pub fn escape(value: &str) -> String {
    value.replace('\\', "\\\\").replace('\'', "\\'")
}

/// `{field}='value'`
pub fn field_equals(field: &str, value: &str) -> String {
    format!("{{{field}}}='{}'", escape(value))
}

/// `SEARCH('needle',{field})>0` (case-insensitive in Airtable).
pub fn field_contains(field: &str, needle: &str) -> String {
    format!("SEARCH('{}',{{{field}}})>0", escape(needle))
}

/// `OR(a, b, ...)`. An empty list yields `FALSE()`.
pub fn or(clauses: &[String]) -> String {
    if clauses.is_empty() {
        return "FALSE()".to_string();
    }
    format!("OR({})", clauses.join(", "))
}
