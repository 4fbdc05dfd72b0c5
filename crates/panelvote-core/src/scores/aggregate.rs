//! Score aggregation
//!
//! All functions are pure and operate on unrounded `f64` values. Rounding
//! happens only in [`round_average`] / [`round_weighted`] and the display
//! helpers, never before further arithmetic.

use std::collections::BTreeMap;

use serde::Serialize;

use super::record::ScoreRecord;
use crate::criteria::Criterion;

/// Arithmetic mean of one criterion across all records (0 for no records)
pub fn average_of(records: &[ScoreRecord], criterion: Criterion) -> f64 {
    if records.is_empty() {
        return 0.0;
    }
    let sum: f64 = records.iter().map(|r| r.value(criterion)).sum();
    sum / records.len() as f64
}

/// Weighted total of a single record; missing scores count as 0
pub fn weighted_score(record: &ScoreRecord) -> f64 {
    Criterion::ALL
        .iter()
        .map(|&c| c.weight() * record.value(c))
        .sum()
}

/// Mean of [`weighted_score`] over all records (0 for no records)
pub fn weighted_grand_average(records: &[ScoreRecord]) -> f64 {
    if records.is_empty() {
        return 0.0;
    }
    let sum: f64 = records.iter().map(weighted_score).sum();
    sum / records.len() as f64
}

/// Weighted sum of the per-criterion averages.
///
/// By linearity this equals [`weighted_grand_average`].
pub fn weighted_sum_of_averages(records: &[ScoreRecord]) -> f64 {
    Criterion::ALL
        .iter()
        .map(|&c| c.weight() * average_of(records, c))
        .sum()
}

/// Round to one decimal (criterion averages)
pub fn round_average(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Round to two decimals (weighted values)
pub fn round_weighted(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

pub fn display_average(value: f64) -> String {
    format!("{:.1}", value)
}

pub fn display_weighted(value: f64) -> String {
    format!("{:.2}", value)
}

/// Aggregate view over a collection of records
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    pub panelists: usize,
    pub averages: BTreeMap<Criterion, f64>,
    /// Plain sum of the four averages (the "total" column of the results row)
    pub sum_of_averages: f64,
    pub weighted_sum_of_averages: f64,
    pub weighted_grand_average: f64,
}

impl Summary {
    pub fn from_records(records: &[ScoreRecord]) -> Self {
        let averages: BTreeMap<Criterion, f64> = Criterion::ALL
            .iter()
            .map(|&c| (c, average_of(records, c)))
            .collect();
        let sum_of_averages = averages.values().sum();

        Self {
            panelists: records.len(),
            averages,
            sum_of_averages,
            weighted_sum_of_averages: weighted_sum_of_averages(records),
            weighted_grand_average: weighted_grand_average(records),
        }
    }

    pub fn average(&self, criterion: Criterion) -> f64 {
        self.averages.get(&criterion).copied().unwrap_or(0.0)
    }

    /// Copy for presentation: averages to one decimal, weighted values to two
    pub fn rounded(&self) -> Self {
        Self {
            panelists: self.panelists,
            averages: self
                .averages
                .iter()
                .map(|(&c, &avg)| (c, round_average(avg)))
                .collect(),
            sum_of_averages: round_average(self.sum_of_averages),
            weighted_sum_of_averages: round_weighted(self.weighted_sum_of_averages),
            weighted_grand_average: round_weighted(self.weighted_grand_average),
        }
    }
}

/// One row of the results table
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResultRow {
    /// "Panelist N" unless names are revealed
    pub label: String,
    pub scores: BTreeMap<Criterion, Option<u8>>,
    pub total: u32,
    pub weighted: f64,
}

/// Build table rows in record order. Labels are anonymized as
/// `Panelist N` (1-based) unless `show_names` is set.
pub fn result_rows(records: &[ScoreRecord], show_names: bool) -> Vec<ResultRow> {
    records
        .iter()
        .enumerate()
        .map(|(index, record)| {
            let label = if show_names && !record.panelist_name.is_empty() {
                record.panelist_name.clone()
            } else {
                format!("Panelist {}", index + 1)
            };
            ResultRow {
                label,
                scores: Criterion::ALL
                    .iter()
                    .map(|&c| (c, record.score(c)))
                    .collect(),
                total: record.scores().values().map(|&s| u32::from(s)).sum(),
                weighted: weighted_score(record),
            }
        })
        .collect()
}
