//! Fixed-column tables for resource collections.

use std::fmt::Debug;

use chrono::{DateTime, Utc};
use comfy_table::presets::NOTHING;
use comfy_table::{ColumnConstraint, Table, Width};
use conveyor_telemetry::RenderLog;
use serde::Serialize;

/// Column width cap for the default table.
pub(crate) const NARROW_MAX_WIDTH: u16 = 50;
/// Column width cap for the wide table.
pub(crate) const WIDE_MAX_WIDTH: u16 = 200;

/// Column layout and ordering key for a resource kind.
pub(crate) trait Tabular: Serialize + Debug {
    /// Singular noun used in log messages.
    const KIND: &'static str;

    /// Numeric identifier used for display ordering.
    fn sort_key(&self) -> i64;

    /// Column headers for the narrow or wide layout.
    fn header(wide: bool) -> &'static [&'static str];

    /// Cell values matching [`Tabular::header`]; timestamps are rendered relative to `now`.
    fn row(&self, wide: bool, now: DateTime<Utc>) -> Vec<String>;
}

/// Stable sort by ascending identifier so the oldest entry prints first.
pub(crate) fn sort_by_number<T: Tabular>(mut items: Vec<T>) -> Vec<T> {
    items.sort_by_key(T::sort_key);
    items
}

pub(crate) fn build_table<T: Tabular>(
    items: &[T],
    wide: bool,
    now: DateTime<Utc>,
    log: &dyn RenderLog,
) -> Table {
    let layout = if wide { "wide table" } else { "table" };
    log.debug(&format!("creating {layout} for {} {}(s)", items.len(), T::KIND));

    let mut table = Table::new();
    table.load_preset(NOTHING);
    table.set_header(T::header(wide).to_vec());

    for item in items {
        log.trace(&format!(
            "adding {} {} to {layout}",
            T::KIND,
            item.sort_key()
        ));
        table.add_row(item.row(wide, now));
    }

    let max_width = if wide { WIDE_MAX_WIDTH } else { NARROW_MAX_WIDTH };
    for column in table.column_iter_mut() {
        column
            .set_padding((0, 2))
            .set_constraint(ColumnConstraint::UpperBoundary(Width::Fixed(max_width)));
    }

    table
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use conveyor_api_models::Build;
    use conveyor_telemetry::MemoryLog;
    use conveyor_test_support::fixtures::{self, NOW};

    fn now() -> DateTime<Utc> {
        Utc.timestamp_opt(NOW, 0).single().expect("valid timestamp")
    }

    fn statuses(builds: &[Build]) -> Vec<(i64, &str)> {
        builds.iter().map(|b| (b.number(), b.status())).collect()
    }

    #[test]
    fn sort_orders_ascending() {
        let sorted = sort_by_number(vec![
            fixtures::build(3, "success"),
            fixtures::build(1, "success"),
            fixtures::build(2, "success"),
        ]);
        let numbers: Vec<i64> = sorted.iter().map(Build::number).collect();
        assert_eq!(numbers, vec![1, 2, 3]);
    }

    #[test]
    fn sort_is_stable_for_equal_ids() {
        let sorted = sort_by_number(vec![
            fixtures::build(2, "first"),
            fixtures::build(0, "a"),
            fixtures::build(2, "second"),
            fixtures::build(0, "b"),
            fixtures::build(2, "third"),
        ]);
        assert_eq!(
            statuses(&sorted),
            vec![(0, "a"), (0, "b"), (2, "first"), (2, "second"), (2, "third")]
        );
    }

    #[test]
    fn sort_is_idempotent_and_keeps_fields() {
        let input = vec![
            fixtures::build(5, "failure"),
            fixtures::build(4, "success"),
            fixtures::build(5, "killed"),
        ];
        let once = sort_by_number(input.clone());
        let twice = sort_by_number(once.clone());
        assert_eq!(once, twice);
        for build in &input {
            assert!(once.contains(build));
        }
    }

    #[test]
    fn table_logs_through_injected_sink() {
        let log = MemoryLog::default();
        let builds = vec![fixtures::build(1, "success"), fixtures::build(2, "success")];
        let _ = build_table(&builds, false, now(), &log);

        assert_eq!(log.debug_messages(), vec!["creating table for 2 build(s)"]);
        assert_eq!(log.entries().len(), 3);
    }

    #[test]
    fn narrow_columns_wrap_long_cells() {
        let mut build = fixtures::build(1, "success");
        build.branch = Some("b".repeat(120));
        let table = build_table(&[build], false, now(), &MemoryLog::default());
        let text = table.to_string();

        assert!(!text.contains(&"b".repeat(120)));
        assert_eq!(text.matches('b').count(), 120);
    }

    #[test]
    fn wide_columns_keep_long_cells_intact() {
        let mut build = fixtures::build(1, "success");
        build.branch = Some("b".repeat(120));
        let table = build_table(&[build], true, now(), &MemoryLog::default());

        assert!(table.to_string().contains(&"b".repeat(120)));
    }
}
