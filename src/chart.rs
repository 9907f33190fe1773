//! Per-system counts of inactive users and their plain-text bar chart.

use std::collections::HashMap;

use crate::record::UserTable;

/// Title printed above the chart
pub const CHART_TITLE: &str = "Inactive Users by System";

/// Default bar length, in characters, of the largest count
pub const DEFAULT_BAR_WIDTH: usize = 40;

/// Longest bar ever drawn; wider requests are clamped
pub const MAX_BAR_WIDTH: usize = 500;

/// Counts rows per distinct System value.
///
/// Sorted by count descending, ties broken by ascending system name, so the
/// chart is identical for identical input.
pub fn count_by_system(inactive: &UserTable) -> Vec<(String, usize)> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for record in inactive {
        *counts.entry(record.system.as_str()).or_insert(0) += 1;
    }

    let mut counts_vec: Vec<(String, usize)> = counts
        .into_iter()
        .map(|(system, count)| (system.to_string(), count))
        .collect();
    counts_vec.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    counts_vec
}

/// Renders counts as horizontal bars scaled so the largest is `bar_width` long.
///
/// Every non-zero count gets at least one bar character. `bar_width` is
/// clamped to `1..=MAX_BAR_WIDTH`.
pub fn render_bar_chart(counts: &[(String, usize)], bar_width: usize) -> String {
    let bar_width = bar_width.clamp(1, MAX_BAR_WIDTH);
    let mut out = String::new();
    out.push_str(CHART_TITLE);
    out.push('\n');
    out.push_str(&"=".repeat(CHART_TITLE.len()));
    out.push('\n');

    if counts.is_empty() {
        out.push_str("(no inactive users)\n");
        return out;
    }

    let label_width = counts
        .iter()
        .map(|(system, _)| system.chars().count())
        .max()
        .unwrap_or(0)
        .max("System".len());
    let max_count = counts.iter().map(|(_, c)| *c).max().unwrap_or(0);

    for (system, count) in counts {
        let bar_len = scaled_bar_len(*count, max_count, bar_width);
        out.push_str(&format!(
            "{:<lw$} | {} {}\n",
            system,
            "#".repeat(bar_len),
            count,
            lw = label_width
        ));
    }
    out.push_str(&format!("{:<lw$}   Number of Inactive Users\n", "System", lw = label_width));
    out
}

/// `ceil(count * bar_width / max_count)`, at least 1 for a non-zero count
fn scaled_bar_len(count: usize, max_count: usize, bar_width: usize) -> usize {
    if max_count == 0 || count == 0 {
        return 0;
    }
    let scaled = (count as u128 * bar_width as u128).div_ceil(max_count as u128);
    usize::try_from(scaled).unwrap_or(bar_width).clamp(1, bar_width)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::UserRecord;

    fn inactive(systems: &[&str]) -> UserTable {
        systems
            .iter()
            .enumerate()
            .map(|(i, system)| UserRecord {
                user_id: format!("U{i}"),
                first_name: String::new(),
                last_name: String::new(),
                system: system.to_string(),
                role: String::new(),
                last_login: None,
            })
            .collect()
    }

    #[test]
    fn counts_sorted_by_count_then_name() {
        let table = inactive(&["HR", "ERP", "CRM", "HR", "ERP", "Mail", "HR"]);
        assert_eq!(
            count_by_system(&table),
            vec![
                ("HR".to_string(), 3),
                ("ERP".to_string(), 2),
                ("CRM".to_string(), 1),
                ("Mail".to_string(), 1),
            ]
        );
    }

    #[test]
    fn counts_sum_to_table_length() {
        let table = inactive(&["A", "B", "A", "C", "C", "C", "D"]);
        let counts = count_by_system(&table);
        assert_eq!(counts.iter().map(|(_, c)| c).sum::<usize>(), table.len());
        assert_eq!(counts.len(), 4);
    }

    #[test]
    fn empty_input_has_no_groups() {
        assert!(count_by_system(&UserTable::default()).is_empty());
    }

    #[test]
    fn bars_scale_to_largest() {
        let counts = vec![("HR".to_string(), 4), ("CRM".to_string(), 1)];
        let chart = render_bar_chart(&counts, 8);
        let lines: Vec<&str> = chart.lines().collect();
        assert_eq!(lines[0], CHART_TITLE);
        assert_eq!(lines[2], "HR     | ######## 4");
        assert_eq!(lines[3], "CRM    | ## 1");
        assert_eq!(lines[4], "System   Number of Inactive Users");
    }

    #[test]
    fn oversized_width_is_clamped() {
        let counts = vec![("HR".to_string(), 2), ("CRM".to_string(), 1)];
        let chart = render_bar_chart(&counts, usize::MAX);
        let hr = chart.lines().find(|l| l.starts_with("HR")).unwrap();
        assert_eq!(hr.matches('#').count(), MAX_BAR_WIDTH);
        let crm = chart.lines().find(|l| l.starts_with("CRM")).unwrap();
        assert_eq!(crm.matches('#').count(), MAX_BAR_WIDTH / 2);
    }

    #[test]
    fn huge_counts_do_not_overflow() {
        assert_eq!(scaled_bar_len(usize::MAX, usize::MAX, MAX_BAR_WIDTH), MAX_BAR_WIDTH);
        assert_eq!(scaled_bar_len(1, usize::MAX, MAX_BAR_WIDTH), 1);
        assert_eq!(scaled_bar_len(0, 5, MAX_BAR_WIDTH), 0);
    }

    #[test]
    fn empty_chart_says_so() {
        let chart = render_bar_chart(&[], DEFAULT_BAR_WIDTH);
        assert!(chart.contains("(no inactive users)"));
    }
}
