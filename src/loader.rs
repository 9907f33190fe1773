//! CSV loading.
//!
//! Reads a header-first CSV into a [`UserTable`], resolving the required
//! columns by name once and then filling typed records row by row.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::{ReaderBuilder, StringRecord, Trim};
use log::{debug, info, warn};
use serde::Deserialize;

use crate::error::DataLoadError;
use crate::record::{UserRecord, UserTable, parse_last_login};

/// What to do with a LastLogin value that is empty or unparseable
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MissingLoginPolicy {
    /// Keep the row with no login date; it is always reported as inactive
    #[default]
    Inactive,
    /// Fail the whole load
    Reject,
}

/// Required columns with their accepted header spellings
const COLUMN_USER_ID: &[&str] = &["UserID"];
const COLUMN_FIRST_NAME: &[&str] = &["First Name", "FirstName"];
const COLUMN_LAST_NAME: &[&str] = &["Last Name", "LastName"];
const COLUMN_SYSTEM: &[&str] = &["System"];
const COLUMN_ROLE: &[&str] = &["Role"];
const COLUMN_LAST_LOGIN: &[&str] = &["LastLogin"];

/// Position of every required column within a CSV header row
#[derive(Debug, Clone, Copy)]
struct ColumnIndex {
    user_id: usize,
    first_name: usize,
    last_name: usize,
    system: usize,
    role: usize,
    last_login: usize,
}

impl ColumnIndex {
    /// Resolves columns by name, collecting every missing one before failing
    fn resolve(headers: &StringRecord, path: &Path) -> Result<Self, DataLoadError> {
        let names: Vec<&str> = headers
            .iter()
            .enumerate()
            .map(|(i, name)| if i == 0 { name.trim_start_matches('\u{feff}') } else { name })
            .collect();

        let mut missing = Vec::new();
        let mut find = |aliases: &[&str]| -> usize {
            match names.iter().position(|name| aliases.contains(name)) {
                Some(idx) => idx,
                None => {
                    missing.push(aliases[0].to_string());
                    usize::MAX
                }
            }
        };

        let index = ColumnIndex {
            user_id: find(COLUMN_USER_ID),
            first_name: find(COLUMN_FIRST_NAME),
            last_name: find(COLUMN_LAST_NAME),
            system: find(COLUMN_SYSTEM),
            role: find(COLUMN_ROLE),
            last_login: find(COLUMN_LAST_LOGIN),
        };

        if missing.is_empty() {
            Ok(index)
        } else {
            Err(DataLoadError::MissingColumns {
                path: path.to_path_buf(),
                columns: missing,
            })
        }
    }
}

/// Loads a user-access CSV file.
///
/// # Arguments
///
/// * `path` - CSV file with a header row
/// * `policy` - How to treat LastLogin values that do not parse
///
/// # Returns
///
/// * `Result<UserTable, DataLoadError>` - The full table, or the first failure
pub fn load(path: impl AsRef<Path>, policy: MissingLoginPolicy) -> Result<UserTable, DataLoadError> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| DataLoadError::Unreadable {
        path: path.to_path_buf(),
        source,
    })?;

    let table = load_from_reader(file, path, policy)?;
    info!("Loaded {} user records from {}", table.len(), path.display());
    Ok(table)
}

/// Same as [`load`], reading from any byte source; `path` is only used in errors
pub fn load_from_reader<R: Read>(
    input: R,
    path: &Path,
    policy: MissingLoginPolicy,
) -> Result<UserTable, DataLoadError> {
    let malformed = |source: csv::Error| DataLoadError::Malformed {
        path: path.to_path_buf(),
        source,
    };

    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(false)
        .trim(Trim::Headers)
        .from_reader(input);

    let headers = reader.headers().map_err(malformed)?.clone();
    let columns = ColumnIndex::resolve(&headers, path)?;

    let mut records = Vec::new();
    let mut unparsed = 0usize;

    for (idx, row) in reader.records().enumerate() {
        let row = row.map_err(malformed)?;
        // header is line 1
        let row_number = idx + 2;
        let field = |col: usize| row.get(col).unwrap_or_default().to_string();

        let raw_login = row.get(columns.last_login).unwrap_or_default();
        let last_login = parse_last_login(raw_login);
        if last_login.is_none() {
            match policy {
                MissingLoginPolicy::Reject => {
                    return Err(DataLoadError::InvalidLastLogin {
                        path: path.to_path_buf(),
                        row: row_number,
                        value: raw_login.to_string(),
                    });
                }
                MissingLoginPolicy::Inactive => {
                    warn!(
                        "Row {}: LastLogin {:?} not recognised, treating user as inactive",
                        row_number, raw_login
                    );
                    unparsed += 1;
                }
            }
        }

        records.push(UserRecord {
            user_id: field(columns.user_id),
            first_name: field(columns.first_name),
            last_name: field(columns.last_name),
            system: field(columns.system),
            role: field(columns.role),
            last_login,
        });
    }

    debug!(
        "{} rows read from {}, {} without a usable LastLogin",
        records.len(),
        path.display(),
        unparsed
    );
    Ok(UserTable::new(records))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn load_str(csv: &str, policy: MissingLoginPolicy) -> Result<UserTable, DataLoadError> {
        load_from_reader(csv.as_bytes(), Path::new("inline.csv"), policy)
    }

    #[test]
    fn loads_typed_records() {
        let csv = "UserID,First Name,Last Name,System,Role,LastLogin\n\
                   U1,Ada,Lovelace,HR,Admin,2024-01-15 09:00:00\n\
                   U2,Alan,Turing,CRM,User,2024-02-01\n";
        let table = load_str(csv, MissingLoginPolicy::Inactive).unwrap();

        assert_eq!(table.len(), 2);
        let first = &table.records()[0];
        assert_eq!(first.user_id, "U1");
        assert_eq!(first.first_name, "Ada");
        assert_eq!(first.last_name, "Lovelace");
        assert_eq!(first.system, "HR");
        assert_eq!(first.role, "Admin");
        assert_eq!(first.last_login_date(), "2024-01-15");
    }

    #[test]
    fn column_order_and_aliases_are_free() {
        let csv = "LastLogin,Role,System,LastName,FirstName,UserID,Department\n\
                   2024-01-15,Admin,HR,Lovelace,Ada,U1,Finance\n";
        let table = load_str(csv, MissingLoginPolicy::Inactive).unwrap();
        let record = &table.records()[0];
        assert_eq!(record.user_id, "U1");
        assert_eq!(record.first_name, "Ada");
        assert_eq!(record.system, "HR");
    }

    #[test]
    fn headers_are_trimmed_and_bom_stripped() {
        let csv = "\u{feff}UserID , First Name,Last Name,System,Role, LastLogin\n\
                   U1,Ada,Lovelace,HR,Admin,2024-01-15\n";
        let table = load_str(csv, MissingLoginPolicy::Inactive).unwrap();
        assert_eq!(table.records()[0].user_id, "U1");
    }

    #[test]
    fn quoted_fields_keep_commas() {
        let csv = "UserID,First Name,Last Name,System,Role,LastLogin\n\
                   U1,\"Ada, Countess\",Lovelace,\"HR, EU\",Admin,2024-01-15\n";
        let table = load_str(csv, MissingLoginPolicy::Inactive).unwrap();
        assert_eq!(table.records()[0].first_name, "Ada, Countess");
        assert_eq!(table.records()[0].system, "HR, EU");
    }

    #[test]
    fn missing_columns_are_all_reported() {
        let csv = "UserID,First Name,System\nU1,Ada,HR\n";
        match load_str(csv, MissingLoginPolicy::Inactive) {
            Err(DataLoadError::MissingColumns { columns, .. }) => {
                assert_eq!(columns, vec!["Last Name", "Role", "LastLogin"]);
            }
            other => panic!("expected MissingColumns, got {:?}", other),
        }
    }

    #[test]
    fn ragged_rows_are_malformed() {
        let csv = "UserID,First Name,Last Name,System,Role,LastLogin\n\
                   U1,Ada,Lovelace,HR,Admin\n";
        assert!(matches!(
            load_str(csv, MissingLoginPolicy::Inactive),
            Err(DataLoadError::Malformed { .. })
        ));
    }

    #[test]
    fn invalid_utf8_cell_is_malformed() {
        let mut bytes = b"UserID,First Name,Last Name,System,Role,LastLogin\nU1,".to_vec();
        bytes.extend_from_slice(b"\xff");
        bytes.extend_from_slice(b",Lovelace,HR,Admin,2024-03-05\n");

        let err = load_from_reader(&bytes[..], Path::new("inline.csv"), MissingLoginPolicy::Inactive)
            .unwrap_err();
        assert!(matches!(err, DataLoadError::Malformed { .. }));
    }

    #[test]
    fn empty_input_has_no_columns() {
        assert!(matches!(
            load_str("", MissingLoginPolicy::Inactive),
            Err(DataLoadError::MissingColumns { .. })
        ));
    }

    #[test]
    fn header_only_gives_empty_table() {
        let csv = "UserID,First Name,Last Name,System,Role,LastLogin\n";
        let table = load_str(csv, MissingLoginPolicy::Inactive).unwrap();
        assert!(table.is_empty());
    }

    #[test]
    fn unparseable_login_kept_as_missing() {
        let csv = "UserID,First Name,Last Name,System,Role,LastLogin\n\
                   U1,Ada,Lovelace,HR,Admin,not a date\n\
                   U2,Alan,Turing,HR,User,\n";
        let table = load_str(csv, MissingLoginPolicy::Inactive).unwrap();
        assert_eq!(table.len(), 2);
        assert!(table.iter().all(|r| r.last_login.is_none()));
    }

    #[test]
    fn unparseable_login_rejected_under_strict_policy() {
        let csv = "UserID,First Name,Last Name,System,Role,LastLogin\n\
                   U1,Ada,Lovelace,HR,Admin,2024-01-15\n\
                   U2,Alan,Turing,HR,User,soon\n";
        match load_str(csv, MissingLoginPolicy::Reject) {
            Err(DataLoadError::InvalidLastLogin { row, value, .. }) => {
                assert_eq!(row, 3);
                assert_eq!(value, "soon");
            }
            other => panic!("expected InvalidLastLogin, got {:?}", other),
        }
    }

    #[test]
    fn nonexistent_file_is_unreadable() {
        assert!(matches!(
            load("/definitely/not/here/users.csv", MissingLoginPolicy::Inactive),
            Err(DataLoadError::Unreadable { .. })
        ));
    }
}
