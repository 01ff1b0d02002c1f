//! CSV export for sweep rows.

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use crate::sweep::SweepRow;

/// Column header for CSV sweep export.
const HEADER: &str = "index,red_pct,green_pct,blue_pct,white_pct,\
                       red_w,green_w,blue_w,white_w,\
                       step_sum_w,embedded_base_sum_w,shared_base_w,\
                       requested_w,total_w,power_limited,efficiency_pct";

/// Exports sweep rows to a CSV file at the given path.
///
/// Writes a header row followed by one data row per sweep point. Produces
/// deterministic output for identical inputs.
///
/// # Errors
///
/// Returns an `io::Error` if file creation or writing fails.
pub fn export_csv(rows: &[SweepRow], path: &Path) -> io::Result<()> {
    let file = File::create(path)?;
    let buf = io::BufWriter::new(file);
    write_csv(rows, buf)
}

/// Writes sweep rows as CSV to any writer.
///
/// # Errors
///
/// Returns an `io::Error` if writing fails.
pub fn write_csv(rows: &[SweepRow], writer: impl Write) -> io::Result<()> {
    let mut wtr = csv::WriterBuilder::new().from_writer(writer);

    wtr.write_record(HEADER.split(',').map(str::trim))?;

    for row in rows {
        let pct = &row.channels;
        let r = &row.result;
        let w = &r.channel_wattages;
        wtr.write_record(&[
            row.index.to_string(),
            format!("{:.2}", pct.red),
            format!("{:.2}", pct.green),
            format!("{:.2}", pct.blue),
            format!("{:.2}", pct.white),
            w.red.to_string(),
            w.green.to_string(),
            w.blue.to_string(),
            w.white.to_string(),
            r.step_sum.to_string(),
            r.embedded_base_sum.to_string(),
            r.shared_base.to_string(),
            r.requested_wattage.to_string(),
            r.total_wattage.to_string(),
            r.power_limited.to_string(),
            r.efficiency.to_string(),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FixtureConfig;
    use crate::sweep::{SweepPlan, run_sweep};

    fn rows(n: usize) -> Vec<SweepRow> {
        let table = FixtureConfig::wrgb2_pro()
            .build_table()
            .expect("preset should build");
        run_sweep(
            &table,
            &SweepPlan::Random {
                samples: n,
                seed: 42,
            },
        )
    }

    #[test]
    fn header_columns() {
        let mut buf = Vec::new();
        write_csv(&rows(1), &mut buf).ok();
        let output = String::from_utf8(buf).ok();
        let first_line = output.as_deref().unwrap_or("").lines().next().unwrap_or("");
        assert_eq!(
            first_line,
            "index,red_pct,green_pct,blue_pct,white_pct,red_w,green_w,blue_w,white_w,\
             step_sum_w,embedded_base_sum_w,shared_base_w,requested_w,total_w,\
             power_limited,efficiency_pct"
        );
    }

    #[test]
    fn row_count_matches_sweep_size() {
        let mut buf = Vec::new();
        write_csv(&rows(24), &mut buf).ok();
        let output = String::from_utf8(buf).ok();
        let lines: Vec<&str> = output.as_deref().unwrap_or("").lines().collect();
        // 1 header + 24 data rows
        assert_eq!(lines.len(), 25);
    }

    #[test]
    fn deterministic_output() {
        let mut buf1 = Vec::new();
        let mut buf2 = Vec::new();
        write_csv(&rows(5), &mut buf1).ok();
        write_csv(&rows(5), &mut buf2).ok();
        assert_eq!(buf1, buf2);
    }

    #[test]
    fn rows_are_parseable() {
        let mut buf = Vec::new();
        write_csv(&rows(3), &mut buf).ok();

        let mut rdr = csv::ReaderBuilder::new().from_reader(buf.as_slice());
        let headers = rdr.headers().cloned().ok();
        assert_eq!(headers.as_ref().map(csv::StringRecord::len), Some(16));

        let mut row_count = 0;
        for record in rdr.records() {
            let rec = record.ok();
            assert!(rec.is_some(), "every row should parse");
            let rec = rec.unwrap();
            for i in 1..14 {
                let val: Result<f64, _> = rec[i].parse();
                assert!(val.is_ok(), "column {i} should parse as f64");
            }
            let limited: Result<bool, _> = rec[14].parse();
            assert!(limited.is_ok(), "power_limited column should parse as bool");
            let eff: Result<u8, _> = rec[15].parse();
            assert!(eff.is_ok_and(|e| e <= 100));
            row_count += 1;
        }
        assert_eq!(row_count, 3);
    }
}
