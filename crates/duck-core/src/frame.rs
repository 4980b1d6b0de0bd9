//! Time-indexed numeric table.
//!
//! [`TimeFrame`] is a column-major table with a timestamp row index and
//! string column labels. Missing values are `None`. Arithmetic between two
//! frames aligns on both axes, see [`TimeFrame::sub_aligned`].

use std::collections::{BTreeSet, HashMap, HashSet};

use chrono::{Datelike, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::calendar::{DateRange, MonthSet};
use crate::error::{DuckError, DuckResult};

/// How two frames are reconciled before elementwise arithmetic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Alignment {
    /// Union of rows and columns; unmatched cells become missing values.
    #[default]
    Outer,
    /// Column sets must match; only rows present on both sides are kept.
    Strict,
}

/// Labels present on only one side of an alignment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AlignmentReport {
    pub left_only_columns: Vec<String>,
    pub right_only_columns: Vec<String>,
    pub left_only_rows: usize,
    pub right_only_rows: usize,
}

impl AlignmentReport {
    pub fn is_exact(&self) -> bool {
        self.left_only_columns.is_empty()
            && self.right_only_columns.is_empty()
            && self.left_only_rows == 0
            && self.right_only_rows == 0
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TimeFrame {
    index: Vec<NaiveDateTime>,
    columns: Vec<String>,
    data: Vec<Vec<Option<f64>>>,
}

impl TimeFrame {
    /// Builds a frame from column-major data.
    ///
    /// Every column must have one value per index entry and column labels
    /// must be unique.
    pub fn new(
        index: Vec<NaiveDateTime>,
        columns: Vec<String>,
        data: Vec<Vec<Option<f64>>>,
    ) -> DuckResult<Self> {
        if columns.len() != data.len() {
            return Err(DuckError::Shape(format!(
                "{} column labels for {} data columns",
                columns.len(),
                data.len()
            )));
        }
        if let Some((name, col)) = columns
            .iter()
            .zip(&data)
            .find(|(_, col)| col.len() != index.len())
        {
            return Err(DuckError::Shape(format!(
                "column '{name}' has {} values, index has {}",
                col.len(),
                index.len()
            )));
        }
        let mut seen = HashSet::new();
        if let Some(dup) = columns.iter().find(|c| !seen.insert(c.as_str())) {
            return Err(DuckError::Shape(format!("duplicate column '{dup}'")));
        }
        Ok(Self {
            index,
            columns,
            data,
        })
    }

    /// Builds a frame from row-major values, mostly useful in tests.
    pub fn from_rows(
        index: Vec<NaiveDateTime>,
        columns: Vec<String>,
        rows: Vec<Vec<Option<f64>>>,
    ) -> DuckResult<Self> {
        if rows.len() != index.len() {
            return Err(DuckError::Shape(format!(
                "{} rows for an index of {}",
                rows.len(),
                index.len()
            )));
        }
        let mut data = vec![Vec::with_capacity(rows.len()); columns.len()];
        for (i, row) in rows.into_iter().enumerate() {
            if row.len() != columns.len() {
                return Err(DuckError::Shape(format!(
                    "row {i} has {} values, expected {}",
                    row.len(),
                    columns.len()
                )));
            }
            for (col, value) in data.iter_mut().zip(row) {
                col.push(value);
            }
        }
        Self::new(index, columns, data)
    }

    pub fn height(&self) -> usize {
        self.index.len()
    }

    pub fn width(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    pub fn index(&self) -> &[NaiveDateTime] {
        &self.index
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn column(&self, name: &str) -> Option<&[Option<f64>]> {
        self.columns
            .iter()
            .position(|c| c == name)
            .map(|i| self.data[i].as_slice())
    }

    pub fn column_at(&self, idx: usize) -> &[Option<f64>] {
        &self.data[idx]
    }

    pub fn get(&self, row: usize, col: usize) -> Option<f64> {
        self.data.get(col).and_then(|c| c.get(row)).copied().flatten()
    }

    /// Values of one row, in column order.
    pub fn row(&self, row: usize) -> Vec<Option<f64>> {
        self.data.iter().map(|col| col[row]).collect()
    }

    pub fn rows(&self) -> impl Iterator<Item = (NaiveDateTime, Vec<Option<f64>>)> + '_ {
        self.index
            .iter()
            .enumerate()
            .map(move |(i, ts)| (*ts, self.row(i)))
    }

    /// New frame holding the rows whose timestamp satisfies `keep`.
    pub fn filter_rows<F>(&self, keep: F) -> TimeFrame
    where
        F: Fn(&NaiveDateTime) -> bool,
    {
        let selected: Vec<usize> = self
            .index
            .iter()
            .enumerate()
            .filter(|(_, ts)| keep(ts))
            .map(|(i, _)| i)
            .collect();
        self.take_rows(&selected)
    }

    pub fn filter_dates(&self, range: &DateRange) -> TimeFrame {
        self.filter_rows(|ts| range.contains(ts))
    }

    pub fn filter_months(&self, months: &MonthSet) -> TimeFrame {
        self.filter_rows(|ts| months.contains_date(ts))
    }

    pub fn select_year(&self, year: i32) -> TimeFrame {
        self.filter_rows(|ts| ts.year() == year)
    }

    /// Distinct calendar years present in the index, ascending.
    pub fn years(&self) -> Vec<i32> {
        self.index
            .iter()
            .map(|ts| ts.year())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    fn take_rows(&self, rows: &[usize]) -> TimeFrame {
        TimeFrame {
            index: rows.iter().map(|&i| self.index[i]).collect(),
            columns: self.columns.clone(),
            data: self
                .data
                .iter()
                .map(|col| rows.iter().map(|&i| col[i]).collect())
                .collect(),
        }
    }

    /// Elementwise `self - rhs` after aligning rows on timestamp and columns
    /// on label.
    ///
    /// With [`Alignment::Outer`] the result spans the union of both
    /// indexes and column sets; any cell missing on either side is `None`.
    /// Identical indexes (or column sets) keep `self`'s order, otherwise the
    /// union is sorted. [`Alignment::Strict`] rejects differing column sets
    /// and keeps only timestamps present in both frames.
    pub fn sub_aligned(
        &self,
        rhs: &TimeFrame,
        alignment: Alignment,
    ) -> DuckResult<(TimeFrame, AlignmentReport)> {
        let left_rows = index_positions(&self.index, "left")?;
        let right_rows = index_positions(&rhs.index, "right")?;

        let left_cols: HashSet<&str> = self.columns.iter().map(String::as_str).collect();
        let right_cols: HashSet<&str> = rhs.columns.iter().map(String::as_str).collect();

        let report = AlignmentReport {
            left_only_columns: self
                .columns
                .iter()
                .filter(|c| !right_cols.contains(c.as_str()))
                .cloned()
                .collect(),
            right_only_columns: rhs
                .columns
                .iter()
                .filter(|c| !left_cols.contains(c.as_str()))
                .cloned()
                .collect(),
            left_only_rows: self
                .index
                .iter()
                .filter(|ts| !right_rows.contains_key(ts))
                .count(),
            right_only_rows: rhs
                .index
                .iter()
                .filter(|ts| !left_rows.contains_key(ts))
                .count(),
        };

        let same_set = report.left_only_columns.is_empty() && report.right_only_columns.is_empty();
        if !same_set && alignment == Alignment::Strict {
            return Err(DuckError::Alignment(format!(
                "column sets differ (left only: [{}], right only: [{}])",
                report.left_only_columns.join(", "),
                report.right_only_columns.join(", ")
            )));
        }
        // Identical labels keep their order; anything else is the sorted union.
        let columns: Vec<String> = if self.columns == rhs.columns {
            self.columns.clone()
        } else {
            left_cols
                .union(&right_cols)
                .map(|c| c.to_string())
                .collect::<BTreeSet<_>>()
                .into_iter()
                .collect()
        };

        let index: Vec<NaiveDateTime> = if self.index == rhs.index {
            self.index.clone()
        } else {
            match alignment {
                Alignment::Outer => self
                    .index
                    .iter()
                    .chain(&rhs.index)
                    .copied()
                    .collect::<BTreeSet<_>>()
                    .into_iter()
                    .collect(),
                Alignment::Strict => self
                    .index
                    .iter()
                    .filter(|ts| right_rows.contains_key(ts))
                    .copied()
                    .collect::<BTreeSet<_>>()
                    .into_iter()
                    .collect(),
            }
        };

        let data = columns
            .iter()
            .map(|name| {
                let lhs = self.column(name);
                let other = rhs.column(name);
                index
                    .iter()
                    .map(|ts| {
                        let a = lhs.zip(left_rows.get(ts)).and_then(|(col, &i)| col[i]);
                        let b = other.zip(right_rows.get(ts)).and_then(|(col, &i)| col[i]);
                        a.zip(b).map(|(a, b)| a - b)
                    })
                    .collect()
            })
            .collect();

        Ok((
            TimeFrame {
                index,
                columns,
                data,
            },
            report,
        ))
    }
}

fn index_positions<'a>(
    index: &'a [NaiveDateTime],
    side: &str,
) -> DuckResult<HashMap<&'a NaiveDateTime, usize>> {
    let mut positions = HashMap::with_capacity(index.len());
    for (i, ts) in index.iter().enumerate() {
        if positions.insert(ts, i).is_some() {
            return Err(DuckError::Shape(format!(
                "duplicate timestamp {ts} in {side} index"
            )));
        }
    }
    Ok(positions)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn day(y: i32, m: u32, d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
    }

    fn cols(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    fn frame(index: Vec<NaiveDateTime>, names: &[&str], rows: Vec<Vec<f64>>) -> TimeFrame {
        let rows = rows
            .into_iter()
            .map(|r| r.into_iter().map(Some).collect())
            .collect();
        TimeFrame::from_rows(index, cols(names), rows).unwrap()
    }

    #[test]
    fn new_rejects_ragged_columns() {
        let err = TimeFrame::new(
            vec![day(2020, 1, 1)],
            cols(&["a"]),
            vec![vec![Some(1.0), Some(2.0)]],
        )
        .unwrap_err();
        assert!(matches!(err, DuckError::Shape(_)));
    }

    #[test]
    fn new_rejects_duplicate_labels() {
        let err = TimeFrame::new(
            vec![day(2020, 1, 1)],
            cols(&["a", "a"]),
            vec![vec![Some(1.0)], vec![Some(2.0)]],
        )
        .unwrap_err();
        assert!(err.to_string().contains("duplicate column"));
    }

    #[test]
    fn subtraction_is_exact_when_aligned() {
        let idx = vec![day(2020, 3, 1), day(2020, 3, 2)];
        let load = frame(
            idx.clone(),
            &["00:00", "01:00"],
            vec![vec![100.0, 90.0], vec![80.0, 70.0]],
        );
        let solar = frame(idx.clone(), &["00:00", "01:00"], vec![vec![10.0, 20.0], vec![0.0, 5.5]]);

        let (duck, report) = load.sub_aligned(&solar, Alignment::Outer).unwrap();
        assert!(report.is_exact());
        assert_eq!(duck.index(), idx.as_slice());
        assert_eq!(duck.columns(), &cols(&["00:00", "01:00"])[..]);
        assert_eq!(duck.get(0, 0), Some(90.0));
        assert_eq!(duck.get(0, 1), Some(70.0));
        assert_eq!(duck.get(1, 0), Some(80.0));
        assert_eq!(duck.get(1, 1), Some(64.5));
    }

    #[test]
    fn outer_alignment_fills_missing_cells() {
        let load = frame(
            vec![day(2020, 3, 1), day(2020, 3, 2)],
            &["b", "a"],
            vec![vec![10.0, 1.0], vec![20.0, 2.0]],
        );
        let solar = frame(
            vec![day(2020, 3, 2), day(2020, 3, 3)],
            &["a", "c"],
            vec![vec![1.0, 5.0], vec![1.0, 5.0]],
        );

        let (duck, report) = load.sub_aligned(&solar, Alignment::Outer).unwrap();
        assert_eq!(report.left_only_columns, cols(&["b"]));
        assert_eq!(report.right_only_columns, cols(&["c"]));
        assert_eq!(report.left_only_rows, 1);
        assert_eq!(report.right_only_rows, 1);

        assert_eq!(duck.columns(), &cols(&["a", "b", "c"])[..]);
        assert_eq!(duck.height(), 3);
        // only (2020-03-02, a) exists on both sides
        assert_eq!(duck.column("a").unwrap(), &[None, Some(1.0), None]);
        assert!(duck.column("b").unwrap().iter().all(Option::is_none));
        assert!(duck.column("c").unwrap().iter().all(Option::is_none));
    }

    #[test]
    fn strict_alignment_rejects_column_mismatch() {
        let idx = vec![day(2020, 3, 1)];
        let load = frame(idx.clone(), &["a", "b"], vec![vec![1.0, 2.0]]);
        let solar = frame(idx, &["a"], vec![vec![1.0]]);
        let err = load.sub_aligned(&solar, Alignment::Strict).unwrap_err();
        assert!(matches!(err, DuckError::Alignment(_)));
    }

    #[test]
    fn reordered_columns_come_back_sorted() {
        let idx = vec![day(2020, 3, 1)];
        let load = frame(idx.clone(), &["b", "a"], vec![vec![10.0, 1.0]]);
        let solar = frame(idx, &["a", "b"], vec![vec![0.5, 4.0]]);
        for alignment in [Alignment::Outer, Alignment::Strict] {
            let (duck, report) = load.sub_aligned(&solar, alignment).unwrap();
            assert!(report.is_exact());
            assert_eq!(duck.columns(), &cols(&["a", "b"])[..]);
            assert_eq!(duck.row(0), vec![Some(0.5), Some(6.0)]);
        }
    }

    #[test]
    fn strict_alignment_intersects_rows() {
        let load = frame(
            vec![day(2020, 3, 1), day(2020, 3, 2)],
            &["a"],
            vec![vec![5.0], vec![6.0]],
        );
        let solar = frame(vec![day(2020, 3, 2)], &["a"], vec![vec![1.0]]);
        let (duck, _) = load.sub_aligned(&solar, Alignment::Strict).unwrap();
        assert_eq!(duck.index(), &[day(2020, 3, 2)]);
        assert_eq!(duck.get(0, 0), Some(5.0));
    }

    #[test]
    fn duplicate_timestamps_are_rejected() {
        let load = frame(
            vec![day(2020, 3, 1), day(2020, 3, 1)],
            &["a"],
            vec![vec![5.0], vec![6.0]],
        );
        let solar = frame(vec![day(2020, 3, 1)], &["a"], vec![vec![1.0]]);
        assert!(load.sub_aligned(&solar, Alignment::Outer).is_err());
    }

    #[test]
    fn subtraction_does_not_mutate_inputs() {
        let idx = vec![day(2020, 3, 1)];
        let load = frame(idx.clone(), &["a"], vec![vec![5.0]]);
        let solar = frame(idx, &["a"], vec![vec![1.0]]);
        let before = (load.clone(), solar.clone());
        let first = load.sub_aligned(&solar, Alignment::Outer).unwrap().0;
        let second = load.sub_aligned(&solar, Alignment::Outer).unwrap().0;
        assert_eq!(first, second);
        assert_eq!((load, solar), before);
    }

    #[test]
    fn select_year_excludes_other_years() {
        let df = frame(
            vec![day(2019, 3, 1), day(2020, 3, 1), day(2020, 4, 1), day(2021, 3, 1)],
            &["a"],
            vec![vec![1.0], vec![2.0], vec![3.0], vec![4.0]],
        );
        let sel = df.select_year(2020);
        assert_eq!(sel.height(), 2);
        assert_eq!(sel.column("a").unwrap(), &[Some(2.0), Some(3.0)]);
        assert_eq!(df.years(), vec![2019, 2020, 2021]);
    }

    #[test]
    fn month_and_date_filters_compose() {
        let df = frame(
            vec![day(2020, 2, 28), day(2020, 3, 1), day(2020, 7, 15), day(2020, 7, 16)],
            &["a"],
            vec![vec![1.0], vec![2.0], vec![3.0], vec![4.0]],
        );
        let range = DateRange::daily(
            NaiveDate::from_ymd_opt(2017, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2020, 7, 15).unwrap(),
        )
        .unwrap();
        let months = MonthSet::new(3..=7).unwrap();
        let out = df.filter_dates(&range).filter_months(&months);
        assert_eq!(out.index(), &[day(2020, 3, 1), day(2020, 7, 15)]);
    }
}
