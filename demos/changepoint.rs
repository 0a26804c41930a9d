//! Changepoint Detection example using PELT.
//!
//! Run with: cargo run --example changepoint [config.json]
//!
//! Set `RUST_LOG=debug` to see solver diagnostics.

use std::error::Error;
use std::fs;

use pelt_changepoint::changepoint::{
    pelt_detect, solve, CostKind, NormalMeanCost, Penalty, PeltConfig, PeltSolver,
};

const DEFAULT_CONFIG: &str = r#"{
    "cost_fn": "normal_mean",
    "penalty": { "manual": 5.0 },
    "min_segment_length": 2
}"#;

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();

    println!("=== Changepoint Detection Example ===\n");

    println!("PELT (Pruned Exact Linear Time) algorithm detects points");
    println!("where the statistical properties of a series change.\n");

    // 1. Clear Level Shift
    println!("--- Clear Level Shift ---");

    let mut series1: Vec<f64> = vec![10.0; 30];
    series1.extend(vec![50.0; 30]);
    series1.extend(vec![25.0; 30]);

    println!("Data: [10.0 × 30] + [50.0 × 30] + [25.0 × 30]");
    println!("Expected changepoints: 30, 60\n");

    let boundaries = solve(&series1, None)?;
    println!("Boundaries (BIC penalty): {:?}", boundaries);

    // 2. Configuration from JSON
    println!("\n--- Configuration ---");

    let config_text = match std::env::args().nth(1) {
        Some(path) => fs::read_to_string(&path)
            .map_err(|e| format!("Failed to read config {path}: {e}"))?,
        None => DEFAULT_CONFIG.to_string(),
    };
    let config: PeltConfig = serde_json::from_str(&config_text)?;
    println!("Config: {:?}", config);

    let result1 = pelt_detect(&series1, &config)?;
    println!("Detected changepoints: {:?}", result1.changepoints);
    println!("Number of changepoints: {}", result1.n_changepoints);
    println!("Segments: {:?}", result1.segments);
    println!("Segment means: {:?}", result1.segment_means(&series1));
    println!("Result JSON: {}", serde_json::to_string(&result1)?);

    // 3. Effect of Penalty Parameter
    println!("\n--- Effect of Penalty Parameter ---");

    let series2: Vec<f64> = (0..100)
        .map(|i| {
            let level = if i < 50 { 10.0 } else { 13.0 };
            level + ((i * 37 + 11) % 17) as f64 * 0.2 - 1.6
        })
        .collect();

    println!("\nData: [~10.0 × 50] + [~13.0 × 50] with deterministic wobble");
    println!("True changepoint: 50\n");

    // Unit variance so the penalty is on the raw sum-of-squares scale
    let model = NormalMeanCost::new(&series2, Some(1.0))?;

    println!("{:<15} {:>25} {:>8}", "Penalty", "Changepoints", "Count");
    println!("{:-<50}", "");

    for penalty in [0.5, 1.0, 2.0, 5.0, 10.0, 50.0, 500.0] {
        let solver = PeltSolver::new(PeltConfig::default().penalty(penalty))?;
        let result = solver.solve(&model)?;
        println!(
            "{:<15.1} {:>25} {:>8}",
            penalty,
            format!("{:?}", result.changepoints),
            result.n_changepoints
        );
    }

    // 4. BIC and AIC Penalties
    println!("\n--- Information Criterion Penalties ---");

    for penalty in [Penalty::Bic, Penalty::Aic] {
        let solver = PeltSolver::new(PeltConfig::default().penalty_kind(penalty))?;
        let result = solver.solve(&model)?;
        println!(
            "{:?} (value {:.2}): changepoints {:?}, {} cost evaluations, {} pruned",
            penalty,
            result.penalty,
            result.changepoints,
            result.stats.cost_evaluations,
            result.stats.candidates_pruned
        );
    }

    // 5. Different Cost Functions
    println!("\n--- Cost Functions ---");

    // Variance change
    let mut series3: Vec<f64> = (0..50)
        .map(|i| 10.0 + 0.5 * (i as f64 * 1.3).sin())
        .collect();
    series3.extend((0..50).map(|i| 10.0 + 5.0 * (i as f64 * 1.3).sin()));

    println!("Data: Low variance (50) → High variance (50)");

    for kind in [CostKind::NormalMean, CostKind::NormalMeanVar, CostKind::NormalVar] {
        let config = PeltConfig::default().cost_function(kind).penalty(10.0);
        let result = pelt_detect(&series3, &config)?;
        println!("  {:?}: {:?}", kind, result.changepoints);
    }

    // Count data
    let mut counts: Vec<f64> = (0..40).map(|i| (2 + i % 3) as f64).collect();
    counts.extend((0..40).map(|i| (9 + i % 4) as f64));

    let config = PeltConfig::default().cost_function(CostKind::Poisson);
    let result = pelt_detect(&counts, &config)?;
    println!("  Poisson counts (rate ~3 → ~10.5): {:?}", result.changepoints);

    // 6. Minimum Segment Length
    println!("\n--- Minimum Segment Length ---");

    let mut series4: Vec<f64> = vec![0.0; 5];
    series4.extend(vec![100.0; 45]);
    series4.extend(vec![0.0; 50]);

    println!("Data: Short segment (5) followed by longer segments");

    let model4 = NormalMeanCost::new(&series4, Some(1.0))?;
    for min_len in [2, 10] {
        let solver =
            PeltSolver::new(PeltConfig::default().penalty(5.0).min_segment_length(min_len))?;
        let result = solver.solve(&model4)?;
        println!("\nMin segment = {}:", min_len);
        println!("  Changepoints: {:?}", result.changepoints);
    }

    // 7. Error Handling
    println!("\n--- Invalid Input ---");

    for (label, outcome) in [
        ("empty series", solve(&[], None)),
        ("single sample", solve(&[1.0], None)),
        ("negative penalty", solve(&[1.0, 2.0, 3.0], Some(-1.0))),
    ] {
        match outcome {
            Ok(boundaries) => println!("  {label}: unexpected {boundaries:?}"),
            Err(e) => println!("  {label}: {:?} error: {e}", e.kind()),
        }
    }

    Ok(())
}
