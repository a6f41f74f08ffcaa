//! Output column definitions

use super::dates::DatePattern;
use crate::frame::ColumnExpr;

/// Nested array field every output row comes from
pub const HISTORY_FIELD: &str = "history";

/// Top-level fields carried next to each history item
///
/// Empty: parent fields such as `caseId` are not propagated.
const BASE_COLUMNS: [&str; 0] = [];

/// Output column names, in CSV order
pub const OUTPUT_COLUMNS: [&str; 8] = [
    "department_name",
    "created_on",
    "end_date_history_item",
    "milestone_name",
    "unit_local",
    "credential",
    "user_name",
    "location",
];

/// Columns selected before exploding: the base columns plus the history array
pub fn base_columns() -> Vec<ColumnExpr> {
    BASE_COLUMNS
        .iter()
        .map(|name| ColumnExpr::keep(*name))
        .chain(std::iter::once(ColumnExpr::keep(HISTORY_FIELD)))
        .collect()
}

/// Columns projected from each exploded history item
pub fn history_columns(input: &DatePattern, output: &DatePattern) -> Vec<ColumnExpr> {
    let item = |field: &str| format!("{HISTORY_FIELD}.{field}");
    let date = |field: &str, alias: &str| {
        ColumnExpr::date(item(field), alias, input.clone(), output.clone())
    };

    vec![
        ColumnExpr::text(item("departmentName"), "department_name"),
        date("createdOn", "created_on"),
        date("endDate", "end_date_history_item"),
        ColumnExpr::text(item("milestoneName"), "milestone_name"),
        ColumnExpr::text(item("unitLocal"), "unit_local"),
        ColumnExpr::text(item("credential"), "credential"),
        ColumnExpr::text(item("userName"), "user_name"),
        ColumnExpr::text(item("location"), "location"),
    ]
}
