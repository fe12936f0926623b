// SPDX-License-Identifier: PMPL-1.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell

//! # Metalcycle CLI
//!
//! Command-line front end for the metalcycle assessment engine:
//! run assessments, compare scenarios, and benchmark results against
//! industry references.

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use metalcycle_engine::benchmark::{load_benchmark_table, starter_benchmarks, write_starter_benchmarks};
use metalcycle_engine::factors::{load_factor_table, starter_table, write_starter_table};
use metalcycle_engine::{
    benchmark_result, compare_scenarios, compute_assessment, load_config, write_default_config,
    BenchmarkReport, FactorTable, MetricDirections, ScenarioComparison,
};
use metalcycle_metrics::{AssessmentInput, AssessmentResult};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

#[derive(Parser)]
#[command(name = "metalcycle")]
#[command(about = "Metals life-cycle impact & circularity assessment", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Assess a single scenario file
    Assess {
        /// Scenario input file (YAML or JSON)
        input: PathBuf,

        /// Emission-factor table file
        #[arg(long, default_value = ".metalcycle/factors.yml")]
        factors: PathBuf,

        /// Engine configuration file
        #[arg(long, default_value = ".metalcycle/config.yml")]
        config: PathBuf,

        /// Output format (text, json, yaml)
        #[arg(short, long, default_value = "text")]
        format: String,

        /// Write output to file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Compare two scenario files, B against baseline A
    Compare {
        /// Baseline scenario file
        baseline: PathBuf,

        /// Alternative scenario file
        alternative: PathBuf,

        /// Emission-factor table file
        #[arg(long, default_value = ".metalcycle/factors.yml")]
        factors: PathBuf,

        /// Engine configuration file
        #[arg(long, default_value = ".metalcycle/config.yml")]
        config: PathBuf,

        /// Output format (text, json, yaml)
        #[arg(short, long, default_value = "text")]
        format: String,

        /// Write output to file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Benchmark a scenario against industry references
    Benchmark {
        /// Scenario input file (YAML or JSON)
        input: PathBuf,

        /// Emission-factor table file
        #[arg(long, default_value = ".metalcycle/factors.yml")]
        factors: PathBuf,

        /// Benchmark reference table file
        #[arg(long, default_value = ".metalcycle/benchmarks.yml")]
        benchmarks: PathBuf,

        /// Engine configuration file
        #[arg(long, default_value = ".metalcycle/config.yml")]
        config: PathBuf,

        /// Output format (text, json, yaml)
        #[arg(short, long, default_value = "text")]
        format: String,

        /// Write output to file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Write starter configuration, factor, and benchmark files
    Init {
        /// Directory to initialize
        #[arg(long, default_value = ".metalcycle")]
        dir: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(log_level)
        .init();

    match cli.command {
        Commands::Assess {
            input,
            factors,
            config,
            format,
            output,
        } => {
            info!("Assessing scenario: {}", input.display());
            let result = run_assessment(&input, &factors, &config)?;
            emit(&result, &format, output.as_deref(), print_result)?;
        }

        Commands::Compare {
            baseline,
            alternative,
            factors,
            config,
            format,
            output,
        } => {
            info!(
                "Comparing {} against baseline {}",
                alternative.display(),
                baseline.display()
            );
            let a = run_assessment(&baseline, &factors, &config)?;
            let b = run_assessment(&alternative, &factors, &config)?;
            let comparison = compare_scenarios(&a, &b, &MetricDirections::default());
            emit(&comparison, &format, output.as_deref(), print_comparison)?;
        }

        Commands::Benchmark {
            input,
            factors,
            benchmarks,
            config,
            format,
            output,
        } => {
            info!("Benchmarking scenario: {}", input.display());
            let result = run_assessment(&input, &factors, &config)?;
            let table = if benchmarks.exists() {
                load_benchmark_table(&benchmarks)
                    .with_context(|| format!("loading benchmarks from {}", benchmarks.display()))?
            } else {
                debug!("Benchmark table not found, using built-in references");
                starter_benchmarks()
            };
            let report = benchmark_result(&result, &table)?;
            emit(&report, &format, output.as_deref(), print_benchmark)?;
        }

        Commands::Init { dir } => {
            init_workspace(&dir)?;
            println!("Initialized {}", dir.display());
        }
    }

    Ok(())
}

/// Load, validate, and assess one scenario file
fn run_assessment(
    input_path: &Path,
    factors_path: &Path,
    config_path: &Path,
) -> Result<AssessmentResult> {
    let input = load_input(input_path)?;

    if let Err(issues) = input.validate() {
        bail!(
            "invalid scenario {}: {}",
            input_path.display(),
            issues.join("; ")
        );
    }

    let factors = load_factors(factors_path)?;
    let config = load_config(config_path)
        .with_context(|| format!("loading config from {}", config_path.display()))?;

    compute_assessment(&input, &factors, &config)
        .with_context(|| format!("assessing {}", input_path.display()))
}

/// Parse a scenario file as JSON or YAML by extension
fn load_input(path: &Path) -> Result<AssessmentInput> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("reading scenario file {}", path.display()))?;

    let input: AssessmentInput = if path.extension().map(|e| e == "json").unwrap_or(false) {
        serde_json::from_str(&content)
            .with_context(|| format!("parsing scenario JSON {}", path.display()))?
    } else {
        serde_yaml::from_str(&content)
            .with_context(|| format!("parsing scenario YAML {}", path.display()))?
    };

    Ok(input)
}

fn load_factors(path: &Path) -> Result<FactorTable> {
    if path.exists() {
        load_factor_table(path)
            .with_context(|| format!("loading factor table from {}", path.display()))
    } else {
        debug!("Factor table not found at {}, using starter table", path.display());
        Ok(starter_table())
    }
}

/// Write starter config, factor, and benchmark files
fn init_workspace(dir: &Path) -> Result<()> {
    write_default_config(&dir.join("config.yml")).context("writing default config")?;
    write_starter_table(&dir.join("factors.yml")).context("writing starter factor table")?;
    write_starter_benchmarks(&dir.join("benchmarks.yml"))
        .context("writing starter benchmark table")?;
    Ok(())
}

/// Emit a value in the requested format, to stdout or a file
fn emit<T: Serialize>(
    value: &T,
    format: &str,
    output: Option<&Path>,
    print_text: fn(&T),
) -> Result<()> {
    let text = match format {
        "json" => serde_json::to_string_pretty(value)?,
        "yaml" => serde_yaml::to_string(value)?,
        "text" => {
            print_text(value);
            return Ok(());
        }
        other => {
            eprintln!("Unsupported format: {}", other);
            return Ok(());
        }
    };

    match output {
        Some(path) => {
            fs::write(path, &text)?;
            eprintln!("Output written to: {}", path.display());
        }
        None => {
            println!("{}", text);
        }
    }

    Ok(())
}

fn print_result(result: &AssessmentResult) {
    println!("\nAssessment: {} ({})", result.name, result.metal);
    println!("   Computed: {}", result.computed_at.format("%Y-%m-%d %H:%M UTC"));

    println!("\n   Per-tonne footprint:");
    println!("     CO2:      {:.2} t", result.co2_tonnes_per_tonne);
    println!("     Energy:   {:.0} kWh", result.energy_kwh_per_tonne);
    println!("     Water:    {:.0} L", result.water_litres_per_tonne);

    println!("\n   Hotspots:");
    for hotspot in &result.hotspots {
        println!(
            "     {:<18} {:.2} t  ({:.1}%)",
            hotspot.stage, hotspot.co2_tonnes, hotspot.share_pct
        );
    }

    let score = result.circularity_score;
    println!("\n   Circularity: {:.1}/100 ({})", score.0, score.band());
    let b = &result.circularity_breakdown;
    println!("     Recycled content:       {:.1}", b.recycled_content);
    println!("     End-of-life recovery:   {:.1}", b.end_of_life_recovery);
    println!("     Resource efficiency:    {:.1}", b.resource_efficiency);
    println!("     Design for circularity: {:.1}", b.design_for_circularity);

    if !result.recommendations.is_empty() {
        println!("\n   Recommendations:");
        for rec in &result.recommendations {
            println!(
                "     {}. {} [{}]",
                rec.rank, rec.title, rec.feasibility
            );
            println!(
                "        -{:.2} t CO2, cost {:+.1}%  {}",
                rec.estimated_co2_reduction_tonnes, rec.estimated_cost_change_pct, rec.description
            );
        }
    }

    println!("\nAssessment complete");
}

fn print_comparison(comparison: &ScenarioComparison) {
    println!("\nScenario comparison (positive = B improves on A):");
    for delta in &comparison.deltas {
        let marker = if delta.improvement { "+" } else { " " };
        println!(
            "   {} {:<20} A: {:>10.1}  B: {:>10.1}  delta: {:+.1}%",
            marker, delta.metric, delta.value_a, delta.value_b, delta.delta_pct
        );
    }
    for failure in &comparison.failures {
        println!("   ! {:<20} baseline is zero, delta undefined", failure.metric);
    }
}

fn print_benchmark(report: &BenchmarkReport) {
    println!("\nBenchmark against {} industry references:", report.metal);
    for delta in &report.deltas {
        let verdict = if delta.improvement { "ahead" } else { "behind" };
        println!(
            "   {:<20} reference: {:>10.1}  yours: {:>10.1}  {:+.1}% ({})",
            delta.metric, delta.value_a, delta.value_b, delta.delta_pct, verdict
        );
    }
    for failure in &report.failures {
        println!("   ! {:<20} reference is zero, delta undefined", failure.metric);
    }
}
