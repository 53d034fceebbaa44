//! Command-line front end: read a planning snapshot, print route suggestions.

use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use log::{error, info};

use school_routes::{
    GuidedLocalSearchEngine, OptimizationType, RoutePlanner, RoutingSnapshot, Settings,
};

#[derive(Debug, Parser)]
#[command(name = "school-routes", version, about = "Suggest school-bus routes")]
struct Args {
    /// Snapshot with school location, vehicles, pickup points and students (JSON)
    #[arg(short, long)]
    input: PathBuf,

    /// Settings document (JSON); defaults are used for missing keys
    #[arg(short, long)]
    settings: Option<PathBuf>,

    /// Search time limit in seconds
    #[arg(long)]
    time_limit: Option<u64>,

    /// Optimisation objective
    #[arg(long, value_parser = parse_objective)]
    objective: Option<OptimizationType>,

    /// Bound route duration by the configured maximum
    #[arg(long)]
    time_windows: bool,

    /// Re-plan an existing route instead of generating fresh suggestions
    #[arg(long)]
    route_id: Option<u64>,

    /// Write the response here instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,
}

fn parse_objective(value: &str) -> Result<OptimizationType, String> {
    match value {
        "distance" => Ok(OptimizationType::Distance),
        "time" => Ok(OptimizationType::Time),
        "cost" => Ok(OptimizationType::Cost),
        other => Err(format!(
            "unknown objective `{}` (expected distance, time or cost)",
            other
        )),
    }
}

fn load_settings(args: &Args) -> Result<Settings, Box<dyn std::error::Error>> {
    let mut settings = match &args.settings {
        Some(path) => serde_json::from_str(&fs::read_to_string(path)?)?,
        None => Settings::default(),
    };

    if let Some(seconds) = args.time_limit {
        settings = settings.with_time_limit_seconds(seconds);
    }
    if let Some(objective) = args.objective {
        settings = settings.with_optimization_type(objective);
    }
    if args.time_windows {
        settings = settings.with_time_windows(true);
    }

    Ok(settings)
}

fn run(args: &Args) -> Result<bool, Box<dyn std::error::Error>> {
    let settings = load_settings(args)?;
    info!("Loading snapshot from: {}", args.input.display());
    let snapshot = RoutingSnapshot::from_file(&args.input)?;

    let planner = RoutePlanner::new(snapshot, GuidedLocalSearchEngine::new(), settings);
    let response = match args.route_id {
        Some(route_id) => planner.optimize_existing_route(route_id),
        None => planner.generate_route_suggestions(),
    };

    let json = serde_json::to_string_pretty(&response)?;
    match &args.output {
        Some(path) => {
            fs::write(path, json)?;
            info!("Saved response to: {}", path.display());
        }
        None => println!("{}", json),
    }

    Ok(response.success)
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    match run(&args) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(2),
        Err(err) => {
            error!("{}", err);
            ExitCode::FAILURE
        }
    }
}
