//! # Binaa CLI Application
//!
//! Terminal interface for construction cost estimates.
//!
//! ## Status
//!
//! Interactive demo: prompts for brick wall geometry, estimates against
//! the seeded Baghdad catalog, and prints the breakdown plus the JSON
//! response for API/LLM use.

use std::io::{self, BufRead, Write};
use std::sync::Arc;

use cost_core::audit::{CalculationLogger, InMemoryAuditSink};
use cost_core::calculations::{BrickInput, EstimateRequest, EstimateResponse};
use cost_core::catalog::default_catalog;
use cost_core::engine::Estimator;
use tracing_subscriber::EnvFilter;

fn prompt_f64(label: &str, default: f64) -> f64 {
    print!("{} [{}]: ", label, default);

    let mut line = String::new();
    let read_ok = io::stdout().flush().is_ok() && io::stdin().lock().read_line(&mut line).is_ok();
    if !read_ok {
        return default;
    }

    line.trim().parse().unwrap_or(default)
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("cost_core=info")),
        )
        .with_target(false)
        .compact()
        .init();

    println!("Binaa CLI - Construction Cost Estimator");
    println!("=======================================");
    println!();
    println!("Brick wall estimate (seeded Baghdad prices)...");
    println!();

    let wall_area = prompt_f64("Enter wall area (m2)", 100.0);
    let openings = prompt_f64("Enter openings area (m2)", 10.0);
    let waste = prompt_f64("Enter waste fraction", 0.07);

    let mut input = BrickInput::new(wall_area, openings);
    input.label = "CLI-Demo".to_string();
    input.waste_pct = waste;

    let sink = Arc::new(InMemoryAuditSink::new());
    let estimator = Estimator::new(Arc::new(default_catalog().clone()))
        .with_logger(CalculationLogger::spawn(sink));

    let request = EstimateRequest::Brick(input);
    match estimator.estimate(&request, None) {
        Ok(response) => {
            println!();
            println!("═══════════════════════════════════════");
            println!("  BRICK WALL ESTIMATE");
            println!("═══════════════════════════════════════");

            if let EstimateResponse::Brick(result) = &response {
                println!();
                println!("Quantities:");
                println!("  Net area:     {:.1} m2", result.net_area_m2);
                println!("  Raw bricks:   {}", result.raw_bricks);
                println!("  Total bricks: {} (waste included)", result.total_bricks);
                println!(
                    "  Duration:     {} day(s) with {} workers",
                    result.estimated_work_days, result.crew_workers
                );
                println!();
                println!("Costs ({}):", result.breakdown.currency);
                for line in &result.breakdown.lines {
                    println!("  {:<12} {:>14.0}", line.label, line.amount);
                }
                println!("  {:<12} {:>14.0}", "TOTAL", result.breakdown.total_cost);
                if let Some(per_m2) = result.cost_per_m2() {
                    println!("  {:<12} {:>14.0}", "per m2", per_m2);
                }
            }

            println!();
            println!("JSON Output (for API/LLM use):");
            if let Ok(json) = serde_json::to_string_pretty(&response) {
                println!("{}", json);
            }
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            if let Ok(json) = serde_json::to_string_pretty(&e) {
                eprintln!();
                eprintln!("Error JSON:");
                eprintln!("{}", json);
            }
        }
    }
}
