use clap::{Args, Parser, Subcommand};
use rn_app::{
    AppResult, ConfigOverrides, RunReport, RunRequest, dataset_service, load_report, run_service,
};
use std::path::{Path, PathBuf};
use tracing::Level;

#[derive(Parser)]
#[command(name = "rn-cli")]
#[command(about = "rivernet CLI - river network topology and gauge calibration", long_about = None)]
struct Cli {
    /// Log per-pass and per-gauge detail
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate dataset file syntax and contents
    Validate {
        /// Path to the dataset (.yaml, .yml or .json)
        dataset_path: PathBuf,
    },
    /// Resolve the network and propagate gauges
    Run {
        /// Path to the dataset (.yaml, .yml or .json)
        dataset_path: PathBuf,
        /// Write the JSON run report here
        #[arg(short, long)]
        output: Option<PathBuf>,
        #[command(flatten)]
        overrides: OverrideArgs,
    },
    /// Print the counts and issues of a saved run report
    Summary {
        /// Path to a JSON run report
        report_path: PathBuf,
    },
}

#[derive(Args)]
struct OverrideArgs {
    /// Endpoint matching distance (0 = exact)
    #[arg(long)]
    tolerance: Option<f64>,
    /// Maximum station snapping distance
    #[arg(long, conflicts_with = "no_snap")]
    snap_distance: Option<f64>,
    /// Only link stations that name their reach
    #[arg(long)]
    no_snap: bool,
    /// Compute upstream lengths on one thread
    #[arg(long)]
    sequential: bool,
    /// Cap on resolver passes
    #[arg(long)]
    max_iterations: Option<usize>,
}

impl From<OverrideArgs> for ConfigOverrides {
    fn from(args: OverrideArgs) -> Self {
        ConfigOverrides {
            touch_tolerance: args.tolerance,
            station_snap_distance: args.snap_distance,
            disable_snapping: args.no_snap,
            sequential: args.sequential,
            max_iterations: args.max_iterations,
        }
    }
}

fn main() -> AppResult<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_max_level(if cli.verbose { Level::DEBUG } else { Level::INFO })
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Validate { dataset_path } => cmd_validate(&dataset_path),
        Commands::Run {
            dataset_path,
            output,
            overrides,
        } => cmd_run(&dataset_path, output.as_deref(), overrides.into()),
        Commands::Summary { report_path } => cmd_summary(&report_path),
    }
}

fn cmd_validate(dataset_path: &Path) -> AppResult<()> {
    println!("Validating dataset: {}", dataset_path.display());
    let dataset = dataset_service::load_dataset(dataset_path)?;
    let summary = dataset_service::summarize(&dataset);
    println!("✓ Dataset is valid: {}", summary.name);
    println!("  Reaches: {}", summary.reach_count);
    println!("  Outlets: {}", summary.outlet_count);
    println!("  Stations: {}", summary.station_count);
    Ok(())
}

fn cmd_run(dataset_path: &Path, output: Option<&Path>, overrides: ConfigOverrides) -> AppResult<()> {
    println!("Running dataset: {}", dataset_path.display());

    let request = RunRequest {
        dataset_path,
        overrides,
        output_path: output,
    };
    let report = run_service::execute(&request)?;

    print_summary(&report);
    if let Some(path) = output {
        println!("✓ Report written to {}", path.display());
    }
    Ok(())
}

fn cmd_summary(report_path: &Path) -> AppResult<()> {
    let report = load_report(report_path)?;
    print_summary(&report);
    Ok(())
}

fn print_summary(report: &RunReport) {
    let counts = &report.counts;
    println!("\nRun Summary: {}", report.name);
    println!("  Nodes: {}", counts.nodes);
    println!("  Reaches: {} ({} resolved)", counts.reaches, counts.resolved);
    println!("  Gauged reaches: {}", counts.gauged);
    println!("  Calibrated reaches: {}", counts.calibrated);
    println!("  Resolver passes: {}", report.issues.iterations);

    let issues = &report.issues;
    if counts.issues == 0 {
        println!("  Issues: none");
        return;
    }
    println!("  Issues: {}", counts.issues);
    if issues.hit_iteration_limit {
        println!("    resolver stopped at its pass limit");
    }
    for id in &issues.unresolved {
        println!("    unresolved reach {}", id);
    }
    for id in &issues.degenerate {
        println!("    degenerate reach {}", id);
    }
    for a in &issues.ambiguous {
        println!(
            "    ambiguous {} of reach {} at ({:.3}, {:.3}): {} candidate nodes",
            a.end,
            a.reach,
            a.x,
            a.y,
            a.candidates.len()
        );
    }
    for m in &issues.missing_references {
        println!("    station {} names unknown reach {}", m.station, m.reach);
    }
    for u in &issues.unmatched_stations {
        match (&u.nearest_reach, u.distance) {
            (Some(reach), Some(d)) => println!(
                "    station {} not linked (nearest reach {} at {:.1})",
                u.station, reach, d
            ),
            _ => println!("    station {} not linked", u.station),
        }
    }
    for d in &issues.duplicate_gauges {
        println!(
            "    station {} duplicates gauge on reach {} (kept {})",
            d.station, d.reach, d.kept
        );
    }
}
