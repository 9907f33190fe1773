//! Exact-match lookups over a loaded table.
//!
//! A miss is an empty table, never an error.

use crate::record::UserTable;

/// Every row whose UserID equals `user_id` (case-sensitive).
///
/// The same id may hold access to several systems, so more than one row can
/// come back.
pub fn find_by_user_id(table: &UserTable, user_id: &str) -> UserTable {
    table.select(|r| r.user_id == user_id)
}

/// Every row whose System equals `system` (case-sensitive)
pub fn find_by_system(table: &UserTable, system: &str) -> UserTable {
    table.select(|r| r.system == system)
}

/// Distinct System values in first-seen order
pub fn systems(table: &UserTable) -> Vec<&str> {
    let mut seen: Vec<&str> = Vec::new();
    for record in table {
        if !seen.contains(&record.system.as_str()) {
            seen.push(&record.system);
        }
    }
    seen
}
