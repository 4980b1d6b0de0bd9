//! Writes [`TimeFrame`]s back to CSV through polars.

use std::fs::{self, File};
use std::path::Path;

use anyhow::{Context, Result};
use duck_core::TimeFrame;
use polars::prelude::*;

use crate::importers::format_timestamp;

/// Polars view of a frame, with the index as a leading string column.
pub fn frame_to_polars(frame: &TimeFrame, index_name: &str) -> Result<DataFrame> {
    let mut series = Vec::with_capacity(frame.width() + 1);
    let index: Vec<String> = frame.index().iter().map(format_timestamp).collect();
    series.push(Series::new(index_name, index));
    for (i, name) in frame.columns().iter().enumerate() {
        series.push(Series::new(name.as_str(), frame.column_at(i).to_vec()));
    }
    DataFrame::new(series).context("assembling output frame")
}

pub fn write_frame_csv(frame: &TimeFrame, path: &Path, index_name: &str) -> Result<()> {
    let mut df = frame_to_polars(frame, index_name)?;
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).with_context(|| format!("creating {}", parent.display()))?;
    }
    let mut file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
    CsvWriter::new(&mut file)
        .finish(&mut df)
        .context("writing CSV file")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::importers::{frame_from_polars, read_csv_bytes};
    use chrono::NaiveDate;

    #[test]
    fn exported_csv_reads_back_with_missing_cells() {
        let day = |d| {
            NaiveDate::from_ymd_opt(2020, 3, d)
                .unwrap()
                .and_hms_opt(0, 0, 0)
                .unwrap()
        };
        let frame = TimeFrame::from_rows(
            vec![day(1), day(2)],
            vec!["00:00".into(), "01:00".into()],
            vec![vec![Some(20000.0), None], vec![Some(19500.5), Some(18000.0)]],
        )
        .unwrap();

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out").join("duck.csv");
        write_frame_csv(&frame, &path, "date").unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.starts_with("date,00:00,01:00"));

        let df = read_csv_bytes(text.into_bytes()).unwrap();
        let back = frame_from_polars(&df, "date").unwrap();
        assert_eq!(back, frame);
    }
}
