//! Output formats and terminal rendering
//!
//! - human: aligned tables for terminal use
//! - json: stable, machine-readable JSON

use std::fmt::{self, Write as _};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::criteria::Criterion;
use crate::error::PanelError;
use crate::game_state::GameState;
use crate::scores::{
    display_average, display_weighted, result_rows, round_weighted, ResultRow, ScoreRecord, Summary,
};
use crate::sync::ViewPhase;

/// Output format for panelvote commands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable output (default)
    #[default]
    Human,
    /// JSON output for machine consumption
    Json,
}

impl FromStr for OutputFormat {
    type Err = PanelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "human" => Ok(OutputFormat::Human),
            "json" => Ok(OutputFormat::Json),
            other => Err(PanelError::UnknownFormat(other.to_string())),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Human => write!(f, "human"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}

const LABEL_WIDTH: usize = 14;
const COLUMN_WIDTH: usize = 15;

/// Results table plus summary row.
///
/// Values are computed unrounded and rounded once here for presentation:
/// averages to one decimal, weighted values to two.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResultsView {
    pub rows: Vec<ResultRow>,
    pub summary: Summary,
}

impl ResultsView {
    pub fn new(records: &[ScoreRecord], show_names: bool) -> Self {
        let rows = result_rows(records, show_names)
            .into_iter()
            .map(|row| ResultRow {
                weighted: round_weighted(row.weighted),
                ..row
            })
            .collect();
        Self {
            rows,
            summary: Summary::from_records(records).rounded(),
        }
    }

    pub fn render_human(&self) -> String {
        let mut out = String::new();
        let _ = write!(out, "{:<LABEL_WIDTH$}", "");
        for criterion in Criterion::ALL {
            let _ = write!(
                out,
                "{:>COLUMN_WIDTH$}",
                format!("{} %{}", criterion.label(), criterion.weight_percent())
            );
        }
        let _ = writeln!(out, "{:>8}{:>10}", "Toplam", "Ağırlıklı");

        for row in &self.rows {
            let _ = write!(out, "{:<LABEL_WIDTH$}", row.label);
            for criterion in Criterion::ALL {
                let cell = row
                    .scores
                    .get(&criterion)
                    .copied()
                    .flatten()
                    .map(|s| s.to_string())
                    .unwrap_or_else(|| "-".to_string());
                let _ = write!(out, "{:>COLUMN_WIDTH$}", cell);
            }
            let _ = writeln!(out, "{:>8}{:>10}", row.total, display_weighted(row.weighted));
        }

        let _ = write!(out, "{:<LABEL_WIDTH$}", "Ortalama");
        for criterion in Criterion::ALL {
            let _ = write!(
                out,
                "{:>COLUMN_WIDTH$}",
                display_average(self.summary.average(criterion))
            );
        }
        let _ = writeln!(
            out,
            "{:>8}{:>10}",
            display_average(self.summary.sum_of_averages),
            display_weighted(self.summary.weighted_sum_of_averages)
        );
        let _ = writeln!(
            out,
            "\n{} panelist(s), weighted grand average {}",
            self.summary.panelists,
            display_weighted(self.summary.weighted_grand_average)
        );
        out
    }
}

/// One-screen description of the game state
pub fn render_state(state: &GameState) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Phase: {}", ViewPhase::from_state(state));
    for criterion in Criterion::ALL {
        let status = if state.is_open(criterion) {
            "open"
        } else {
            "closed"
        };
        let _ = writeln!(out, "  {:<16} {}", criterion.id(), status);
    }
    let _ = writeln!(
        out,
        "Results: {}",
        if state.results_published {
            "published"
        } else {
            "not published"
        }
    );
    out
}
