//! Bounded-window neighbor-sampling imputation.
//!
//! Each missing cell is filled with a value drawn uniformly at random from
//! its nearest non-missing neighbors: at most one candidate from the rows
//! above and one from the rows below, each found within a bounded window.
//! When neither direction yields a candidate, the draw falls back to all
//! non-missing values anywhere in the column. A column with no non-missing
//! value at all is left untouched.
//!
//! Columns are processed independently, top to bottom, over a single
//! mutable buffer: a fill made at row `i` is visible as a candidate to
//! every missing cell processed after it in the same column.

use crate::error::Result;
use crate::missing::count_missing;
use crate::report::{ColumnFill, ImputationReport};
use polars::prelude::*;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use tracing::debug;

/// Fills missing cells from randomly chosen nearby rows.
///
/// The random source is an injected capability: construct with
/// [`NeighborImputer::with_seed`] for reproducible runs, or
/// [`NeighborImputer::with_rng`] to supply any [`Rng`] (tests inject a
/// fixed-sequence source and assert exact fills).
pub struct NeighborImputer<R: Rng = StdRng> {
    window: usize,
    rng: R,
}

impl NeighborImputer<StdRng> {
    /// Create an imputer with a fresh entropy-seeded random source.
    pub fn new(window: usize) -> Self {
        Self {
            window: window.max(1),
            rng: StdRng::from_entropy(),
        }
    }

    /// Create an imputer with a seeded random source for reproducible runs.
    pub fn with_seed(window: usize, seed: u64) -> Self {
        Self {
            window: window.max(1),
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl<R: Rng> NeighborImputer<R> {
    /// Create an imputer over a caller-provided random source.
    pub fn with_rng(window: usize, rng: R) -> Self {
        Self {
            window: window.max(1),
            rng,
        }
    }

    /// Fill every missing cell in the dataset, in place.
    ///
    /// Row count and column set are unchanged; only cell values change.
    /// After the pass, every column that held at least one non-missing
    /// value holds none, while an entirely-missing column stays as it was.
    pub fn impute(&mut self, df: &mut DataFrame) -> Result<ImputationReport> {
        let missing_before = count_missing(df);
        let column_names: Vec<String> = df
            .get_column_names()
            .into_iter()
            .map(|s| s.to_string())
            .collect();

        let mut columns = Vec::with_capacity(column_names.len());
        let mut total_replaced = 0;

        for col_name in &column_names {
            let series = df.column(col_name)?.as_materialized_series().clone();

            if series.null_count() == 0 {
                columns.push(ColumnFill {
                    column: col_name.clone(),
                    replaced: 0,
                });
                continue;
            }

            let (filled, replaced) = self.impute_series(&series)?;
            if replaced > 0 {
                df.replace(col_name, filled)?;
                debug!("Replaced {} missing values in '{}'", replaced, col_name);
            }

            total_replaced += replaced;
            columns.push(ColumnFill {
                column: col_name.clone(),
                replaced,
            });
        }

        Ok(ImputationReport {
            columns,
            total_replaced,
            missing_before,
            missing_after: count_missing(df),
        })
    }

    /// Impute one column, preserving its dtype.
    ///
    /// The column is materialized into a typed buffer, filled in ascending
    /// row order, and rebuilt. Integer and float families go through their
    /// widest member and are cast back afterwards; any exotic dtype is
    /// handled over its string rendering.
    fn impute_series(&mut self, series: &Series) -> Result<(Series, usize)> {
        let name = series.name().clone();
        let dtype = series.dtype().clone();

        let (filled, replaced) = match &dtype {
            DataType::String => {
                let str_series = series.str()?;
                let mut buf: Vec<Option<String>> = str_series
                    .into_iter()
                    .map(|v| v.map(str::to_string))
                    .collect();
                let replaced = fill_buffer(&mut buf, self.window, &mut self.rng);
                (Series::new(name, buf), replaced)
            }
            DataType::Float32 | DataType::Float64 => {
                let cast = series.cast(&DataType::Float64)?;
                let mut buf: Vec<Option<f64>> = cast.f64()?.into_iter().collect();
                let replaced = fill_buffer(&mut buf, self.window, &mut self.rng);
                (Series::new(name, buf), replaced)
            }
            DataType::Int8 | DataType::Int16 | DataType::Int32 | DataType::Int64 => {
                let cast = series.cast(&DataType::Int64)?;
                let mut buf: Vec<Option<i64>> = cast.i64()?.into_iter().collect();
                let replaced = fill_buffer(&mut buf, self.window, &mut self.rng);
                (Series::new(name, buf), replaced)
            }
            DataType::UInt8 | DataType::UInt16 | DataType::UInt32 | DataType::UInt64 => {
                let cast = series.cast(&DataType::UInt64)?;
                let mut buf: Vec<Option<u64>> = cast.u64()?.into_iter().collect();
                let replaced = fill_buffer(&mut buf, self.window, &mut self.rng);
                (Series::new(name, buf), replaced)
            }
            DataType::Boolean => {
                let mut buf: Vec<Option<bool>> = series.bool()?.into_iter().collect();
                let replaced = fill_buffer(&mut buf, self.window, &mut self.rng);
                (Series::new(name, buf), replaced)
            }
            other => {
                debug!("Imputing '{}' over its string rendering ({})", name, other);
                let cast = series.cast(&DataType::String)?;
                let mut buf: Vec<Option<String>> = cast
                    .str()?
                    .into_iter()
                    .map(|v| v.map(str::to_string))
                    .collect();
                let replaced = fill_buffer(&mut buf, self.window, &mut self.rng);
                (Series::new(name, buf), replaced)
            }
        };

        let filled = if filled.dtype() != &dtype && dtype.is_primitive_numeric() {
            filled.cast(&dtype)?
        } else {
            filled
        };

        Ok((filled, replaced))
    }
}

/// Fill missing slots in a single column buffer, in ascending row order.
///
/// For the missing slot at index `i`, the nearest non-missing value within
/// `window` rows above and the nearest within `window` rows below form a
/// candidate set of up to two values; one is drawn uniformly at random.
/// With no in-window candidate, the draw is over every currently
/// non-missing value in the buffer, which includes fills made earlier in
/// this same pass. Returns the number of slots filled.
fn fill_buffer<T: Clone, R: Rng>(values: &mut [Option<T>], window: usize, rng: &mut R) -> usize {
    let len = values.len();
    let mut replaced = 0;

    for i in 0..len {
        if values[i].is_some() {
            continue;
        }

        let mut candidates: Vec<T> = Vec::with_capacity(2);

        // Nearest non-missing value above, at most `window` rows away
        let lo = i.saturating_sub(window);
        if let Some(above) = values[lo..i].iter().rev().flatten().next() {
            candidates.push(above.clone());
        }

        // Nearest non-missing value below, at most `window` rows away
        if i + 1 < len {
            let hi = usize::min(i + window, len - 1);
            if let Some(below) = values[i + 1..=hi].iter().flatten().next() {
                candidates.push(below.clone());
            }
        }

        let chosen = if candidates.is_empty() {
            // Column-wide fallback over every currently non-missing value
            let pool: Vec<&T> = values.iter().flatten().collect();
            pool.choose(rng).map(|v| (*v).clone())
        } else {
            candidates.choose(rng).cloned()
        };

        if let Some(value) = chosen {
            values[i] = Some(value);
            replaced += 1;
        }
    }

    replaced
}
