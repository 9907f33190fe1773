//! Typed rows of the user-access dataset.
//!
//! Every column the tool relies on is a named field, populated once at load
//! time. `last_login` is `None` when the source text was empty or could not be
//! parsed; such a record is never considered active.

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime};

/// Layouts carrying a numeric UTC offset (`+0200` or `+02:00`)
const OFFSET_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S%.f%z", "%Y-%m-%dT%H:%M:%S%.f%z"];

/// Date-time layouts tried in order when a value carries no UTC offset
const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
    "%Y/%m/%d %H:%M:%S",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
];

/// Date-only layouts, interpreted as midnight
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y", "%d.%m.%Y"];

/// Rendering used wherever a missing LastLogin has to be shown
pub const MISSING_LOGIN_LABEL: &str = "never";

/// One row of the dataset
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserRecord {
    /// Opaque identifier; the same id may appear once per system
    pub user_id: String,
    pub first_name: String,
    pub last_name: String,
    /// Software or platform this access row concerns
    pub system: String,
    pub role: String,
    pub last_login: Option<NaiveDateTime>,
}

impl UserRecord {
    /// Date portion of the last login, or [`MISSING_LOGIN_LABEL`]
    pub fn last_login_date(&self) -> String {
        match self.last_login {
            Some(ts) => ts.date().format("%Y-%m-%d").to_string(),
            None => MISSING_LOGIN_LABEL.to_string(),
        }
    }
}

/// Ordered sequence of records sharing one schema.
///
/// Filters and lookups return new tables and never touch the one they read.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserTable {
    records: Vec<UserRecord>,
}

impl UserTable {
    pub fn new(records: Vec<UserRecord>) -> Self {
        Self { records }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[UserRecord] {
        &self.records
    }

    pub fn iter(&self) -> std::slice::Iter<'_, UserRecord> {
        self.records.iter()
    }

    /// Rows matching `predicate`, in their original order
    pub fn select<F>(&self, mut predicate: F) -> UserTable
    where
        F: FnMut(&UserRecord) -> bool,
    {
        self.records
            .iter()
            .filter(|record| predicate(record))
            .cloned()
            .collect()
    }
}

impl FromIterator<UserRecord> for UserTable {
    fn from_iter<I: IntoIterator<Item = UserRecord>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a UserTable {
    type Item = &'a UserRecord;
    type IntoIter = std::slice::Iter<'a, UserRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

/// Parses a free-text LastLogin value into local wall-clock time.
///
/// Returns `None` for empty or unrecognised input.
pub fn parse_last_login(raw: &str) -> Option<NaiveDateTime> {
    let text = raw.trim();
    if text.is_empty() {
        return None;
    }

    if let Some(ts) = DateTime::parse_from_rfc3339(text).ok().or_else(|| {
        OFFSET_FORMATS
            .iter()
            .find_map(|fmt| DateTime::parse_from_str(text, fmt).ok())
    }) {
        return Some(ts.with_timezone(&Local).naive_local());
    }

    if let Some(ts) = DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(text, fmt).ok())
    {
        return Some(ts);
    }

    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(text, fmt).ok())
        .and_then(|date| date.and_hms_opt(0, 0, 0))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, min, s)
            .unwrap()
    }

    #[test]
    fn parses_common_layouts() {
        assert_eq!(
            parse_last_login("2024-03-05 14:30:00"),
            Some(at(2024, 3, 5, 14, 30, 0))
        );
        assert_eq!(
            parse_last_login("2024-03-05T14:30:00.250"),
            Some(at(2024, 3, 5, 14, 30, 0) + chrono::Duration::milliseconds(250))
        );
        assert_eq!(
            parse_last_login("2024-03-05 14:30"),
            Some(at(2024, 3, 5, 14, 30, 0))
        );
        assert_eq!(
            parse_last_login("2024-03-05T14:30"),
            Some(at(2024, 3, 5, 14, 30, 0))
        );
        assert_eq!(
            parse_last_login("03/05/2024 08:00:00"),
            Some(at(2024, 3, 5, 8, 0, 0))
        );
    }

    #[test]
    fn date_only_means_midnight() {
        assert_eq!(parse_last_login("2024-03-05"), Some(at(2024, 3, 5, 0, 0, 0)));
        assert_eq!(parse_last_login("2024/03/05"), Some(at(2024, 3, 5, 0, 0, 0)));
        assert_eq!(parse_last_login("05.03.2024"), Some(at(2024, 3, 5, 0, 0, 0)));
        assert_eq!(parse_last_login("  2024-03-05  "), Some(at(2024, 3, 5, 0, 0, 0)));
    }

    #[test]
    fn offset_values_are_accepted() {
        let utc = |text: &str| {
            DateTime::parse_from_rfc3339(text)
                .unwrap()
                .with_timezone(&Local)
                .naive_local()
        };
        let noon_thirty = Some(utc("2024-03-05T12:30:00Z"));

        assert_eq!(
            parse_last_login("2024-03-05T14:30:00Z"),
            Some(utc("2024-03-05T14:30:00Z"))
        );
        assert_eq!(parse_last_login("2024-03-05T14:30:00+02:00"), noon_thirty);
        assert_eq!(parse_last_login("2024-03-05 14:30:00+02:00"), noon_thirty);
        assert_eq!(parse_last_login("2024-03-05 14:30:00+0200"), noon_thirty);
        assert_eq!(parse_last_login("2024-03-05T14:30:00+0200"), noon_thirty);
        assert_eq!(
            parse_last_login("2024-03-05T14:30:00.000-0100"),
            Some(utc("2024-03-05T15:30:00Z"))
        );
    }

    #[test]
    fn garbage_is_missing() {
        assert_eq!(parse_last_login(""), None);
        assert_eq!(parse_last_login("   "), None);
        assert_eq!(parse_last_login("yesterday"), None);
        assert_eq!(parse_last_login("2024-13-45"), None);
    }

    #[test]
    fn missing_login_renders_label() {
        let record = UserRecord {
            user_id: "U1".into(),
            first_name: "Ada".into(),
            last_name: "Lovelace".into(),
            system: "HR".into(),
            role: "Admin".into(),
            last_login: None,
        };
        assert_eq!(record.last_login_date(), MISSING_LOGIN_LABEL);

        let seen = UserRecord {
            last_login: Some(at(2023, 12, 31, 23, 59, 0)),
            ..record
        };
        assert_eq!(seen.last_login_date(), "2023-12-31");
    }

    #[test]
    fn select_preserves_order_and_source() {
        let table: UserTable = ["A", "B", "C", "D"]
            .iter()
            .map(|id| UserRecord {
                user_id: id.to_string(),
                first_name: String::new(),
                last_name: String::new(),
                system: if *id == "B" { "CRM".into() } else { "HR".into() },
                role: String::new(),
                last_login: None,
            })
            .collect();

        let hr = table.select(|r| r.system == "HR");
        let ids: Vec<&str> = hr.iter().map(|r| r.user_id.as_str()).collect();
        assert_eq!(ids, vec!["A", "C", "D"]);
        assert_eq!(table.len(), 4);
    }
}
