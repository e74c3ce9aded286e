//! SQL generation for the per-model CRUD statements.
//!
//! Statements are written with the portable `?` placeholder. Drivers rewrite
//! it into their native marker right before execution.

/// The portable parameter placeholder.
pub const PLACEHOLDER: char = '?';

/// Quote an identifier with backticks, doubling embedded backticks.
pub fn quote_identifier(name: &str) -> String {
    format!("`{}`", name.replace('`', "``"))
}

/// A comma-joined list of `count` portable placeholders.
///
/// `placeholders(3)` is `"?, ?, ?"`; `placeholders(0)` is empty.
pub fn placeholders(count: usize) -> String {
    vec!["?"; count].join(", ")
}

fn column_list(columns: &[&str]) -> String {
    columns
        .iter()
        .map(|c| quote_identifier(c))
        .collect::<Vec<_>>()
        .join(", ")
}

/// `select `pk`, `a`, `b` from `table``
pub(crate) fn select_template(table: &str, primary_key: &str, columns: &[&str]) -> String {
    let mut all = Vec::with_capacity(columns.len() + 1);
    all.push(primary_key);
    all.extend_from_slice(columns);
    format!(
        "select {} from {}",
        column_list(&all),
        quote_identifier(table)
    )
}

/// `insert into `table` (`a`, `b`, `pk`) values (?, ?, ?)`
///
/// The primary key goes last, matching the argument order used when saving.
pub(crate) fn insert_template(table: &str, primary_key: &str, columns: &[&str]) -> String {
    let mut all = Vec::with_capacity(columns.len() + 1);
    all.extend_from_slice(columns);
    all.push(primary_key);
    format!(
        "insert into {} ({}) values ({})",
        quote_identifier(table),
        column_list(&all),
        placeholders(all.len())
    )
}

/// `update `table` set `a`=?, `b`=? where `pk`=?`
pub(crate) fn update_template(table: &str, primary_key: &str, columns: &[&str]) -> String {
    let assignments = columns
        .iter()
        .map(|c| format!("{}={}", quote_identifier(c), PLACEHOLDER))
        .collect::<Vec<_>>()
        .join(", ");
    format!(
        "update {} set {} where {}={}",
        quote_identifier(table),
        assignments,
        quote_identifier(primary_key),
        PLACEHOLDER
    )
}

/// `delete from `table` where `pk`=?`
pub(crate) fn delete_template(table: &str, primary_key: &str) -> String {
    format!(
        "delete from {} where {}={}",
        quote_identifier(table),
        quote_identifier(primary_key),
        PLACEHOLDER
    )
}
