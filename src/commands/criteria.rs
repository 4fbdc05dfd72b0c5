//! `panelvote criteria` - list criteria, weights and the rubric

use serde_json::json;

use crate::cli::OutputFormat;
use crate::commands::dispatch::CommandContext;
use panelvote_core::criteria::{rubric, Criterion};
use panelvote_core::error::Result;

pub fn execute(ctx: &CommandContext) -> Result<()> {
    match ctx.format() {
        OutputFormat::Json => {
            let criteria: Vec<_> = Criterion::ALL
                .iter()
                .map(|c| {
                    json!({
                        "id": c.id(),
                        "label": c.label(),
                        "weight": c.weight(),
                    })
                })
                .collect();
            let output = json!({
                "criteria": criteria,
                "rubric": rubric(),
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Human => {
            println!("Criteria:");
            for criterion in Criterion::ALL {
                println!(
                    "  {:<16} {:<20} %{}",
                    criterion.id(),
                    criterion.label(),
                    criterion.weight_percent()
                );
            }
            if !ctx.quiet() {
                println!();
                println!("Rubric:");
                for level in rubric() {
                    println!("  {} {:<17} {}", level.score, level.label, level.description);
                }
            }
        }
    }
    Ok(())
}
