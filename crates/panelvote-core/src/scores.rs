//! Score records and their aggregation

pub mod aggregate;
pub mod record;

pub use aggregate::{
    average_of, display_average, display_weighted, result_rows, round_average, round_weighted,
    weighted_grand_average, weighted_score, weighted_sum_of_averages, ResultRow, Summary,
};
pub use record::ScoreRecord;
