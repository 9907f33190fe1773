//! Plain-text renderings of user tables: the inactivity report and the
//! on-screen listings used by the terminal front end.

use std::fs;
use std::path::Path;

use log::info;

use crate::error::ReportWriteError;
use crate::inactivity::InactivityThreshold;
use crate::record::{UserRecord, UserTable};

/// Title line of every report
pub const REPORT_TITLE: &str = "Analytical Report";

/// Body used when nothing is inactive
pub const NO_INACTIVE_USERS: &str = "No inactive users found.";

/// Heading placed above the inactive-user table
pub const INACTIVE_LIST_HEADING: &str = "List of inactive users:";

/// Column separator in fixed-width tables
const COLUMN_GAP: &str = "  ";

/// Builds the inactivity report.
///
/// # Arguments
///
/// * `table` - Every loaded record
/// * `inactive` - Output of [`crate::inactivity::find_inactive`] over `table`
/// * `threshold` - The window `inactive` was computed with
///
/// # Returns
///
/// * `String` - Report text, newline-terminated
pub fn format_report(table: &UserTable, inactive: &UserTable, threshold: InactivityThreshold) -> String {
    let mut out = String::new();
    out.push_str(REPORT_TITLE);
    out.push('\n');
    out.push_str(&format!("Total users: {}\n", table.len()));
    out.push_str(&format!(
        "Inactive users (not active for more than {} days): {}\n",
        threshold.as_days(),
        inactive.len()
    ));
    out.push('\n');

    if inactive.is_empty() {
        out.push_str(NO_INACTIVE_USERS);
        out.push('\n');
    } else {
        out.push_str(INACTIVE_LIST_HEADING);
        out.push('\n');
        out.push_str(&render_table(
            &["UserID", "First Name", "Last Name", "System", "LastLogin"],
            inactive.iter().map(|r| {
                vec![
                    r.user_id.clone(),
                    r.first_name.clone(),
                    r.last_name.clone(),
                    r.system.clone(),
                    r.last_login_date(),
                ]
            }),
        ));
    }

    out
}

/// Writes `text` to `path`, replacing any previous report there.
///
/// Missing parent directories are created.
pub fn write_report(text: &str, path: impl AsRef<Path>) -> Result<(), ReportWriteError> {
    let path = path.as_ref();
    let wrap = |source| ReportWriteError {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(wrap)?;
    }
    fs::write(path, text).map_err(wrap)?;

    info!("Report written to {} ({} bytes)", path.display(), text.len());
    Ok(())
}

/// One line per access row of a single user, as shown by a UserID search
pub fn format_user_lines(rows: &UserTable) -> Vec<String> {
    rows.iter()
        .map(|r| {
            format!(
                "  - System: {}, Role: {}, Last Login: {}",
                r.system,
                r.role,
                r.last_login_date()
            )
        })
        .collect()
}

/// Fixed-column listing of the users of one system
pub fn format_system_listing(rows: &UserTable) -> String {
    render_table(
        &["UserID", "First Name", "Last Name", "Role", "LastLogin"],
        rows.iter().map(system_listing_row),
    )
}

fn system_listing_row(r: &UserRecord) -> Vec<String> {
    vec![
        r.user_id.clone(),
        r.first_name.clone(),
        r.last_name.clone(),
        r.role.clone(),
        r.last_login_date(),
    ]
}

/// Renders a header plus rows as left-aligned columns sized to their widest cell
fn render_table<I>(headers: &[&str], rows: I) -> String
where
    I: IntoIterator<Item = Vec<String>>,
{
    let rows: Vec<Vec<String>> = rows.into_iter().collect();

    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut out = String::new();
    let header_cells: Vec<String> = headers.iter().map(|h| h.to_string()).collect();
    for cells in std::iter::once(&header_cells).chain(rows.iter()) {
        let line = cells
            .iter()
            .zip(&widths)
            .map(|(cell, &w)| format!("{:<w$}", cell, w = w))
            .collect::<Vec<_>>()
            .join(COLUMN_GAP);
        out.push_str(line.trim_end());
        out.push('\n');
    }
    out
}
