use comfy_table::{Cell, CellAlignment, Table, presets};

use crate::core::report::HourlyRow;

/// Build the monospaced hourly price table for the long report.
///
/// The table is sent inside a `<pre>` block, so it must not carry any terminal styling.
#[must_use]
pub fn build_hourly_table(rows: &[HourlyRow]) -> Table {
    let mut table = Table::new();
    table.load_preset(presets::NOTHING);
    for row in rows {
        table.add_row(vec![
            Cell::new(row.emoji),
            Cell::new(&row.hour),
            Cell::new(row.price).set_alignment(CellAlignment::Right),
        ]);
    }
    for column in table.column_iter_mut() {
        column.set_padding((0, 1));
    }
    table
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quantity::rate::KilowattHourRate;

    #[test]
    fn test_build_hourly_table() {
        let rows = [
            HourlyRow { emoji: "✅", hour: "00".to_string(), price: KilowattHourRate(0.23) },
            HourlyRow { emoji: "💶", hour: "01".to_string(), price: KilowattHourRate(-0.05) },
        ];
        let rendered = build_hourly_table(&rows).to_string();
        let lines: Vec<_> = rendered.lines().collect();
        assert_eq!(lines.len(), 2, "{rendered}");
        assert!(lines[0].starts_with("✅ 00"), "{rendered}");
        assert!(lines[0].contains("€\u{a0}0,23"), "{rendered}");
        assert!(lines[1].contains("€\u{a0}-0,05"), "{rendered}");
    }

    #[test]
    fn test_build_hourly_table_empty() {
        assert!(build_hourly_table(&[]).to_string().trim().is_empty());
    }
}
