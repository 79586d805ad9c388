//! Waypoint Planner - Command Line Interface
//!
//! Plans a route between two points of a point set through `k` waypoints.

use clap::{Args, Parser, Subcommand, ValueEnum};
use waypoint_planner::benchmark::{Benchmark, BenchmarkConfig};
use waypoint_planner::heuristics::aco::ACOConfig;
use waypoint_planner::kernel::KernelChoice;
use waypoint_planner::planner::{Algorithm as PlannerAlgorithm, WaypointPlanner};
use waypoint_planner::point_set::PointSet;

use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "waypoint-planner")]
#[command(version = "1.0")]
#[command(about = "Plans short routes through a bounded number of waypoints")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build one route
    Plan {
        #[command(flatten)]
        input: InputArgs,

        /// Algorithm to use
        #[arg(short, long, value_enum, default_value = "aco")]
        algorithm: Algorithm,

        #[command(flatten)]
        aco: AcoArgs,

        /// Output route to JSON file
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// Compare greedy against repeated ACO runs
    Compare {
        #[command(flatten)]
        input: InputArgs,

        #[command(flatten)]
        aco: AcoArgs,

        /// Number of ACO runs
        #[arg(short, long, default_value = "5")]
        runs: usize,

        /// Output directory for CSV results
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Describe a point set
    Analyze {
        #[command(flatten)]
        input: InputArgs,
    },
}

#[derive(Args)]
struct InputArgs {
    /// Point file (`x y` or `x,y` per line)
    #[arg(short, long, conflicts_with = "random")]
    points: Option<PathBuf>,

    /// Generate this many random points instead of reading a file
    #[arg(long)]
    random: Option<usize>,

    /// Side of the square random points are drawn from
    #[arg(long, default_value = "10000")]
    extent: i32,

    /// Index of the start point
    #[arg(long, default_value = "0")]
    start: usize,

    /// Index of the end point
    #[arg(long, default_value = "1")]
    end: usize,

    /// Route size, start and end included
    #[arg(short, default_value = "100")]
    k: usize,

    /// Native kernel library; falls back to the built-in kernel if unusable
    #[arg(long)]
    kernel: Option<PathBuf>,
}

#[derive(Args)]
struct AcoArgs {
    /// Ants per iteration
    #[arg(long, default_value = "20")]
    ants: usize,

    /// Number of iterations
    #[arg(long, default_value = "100")]
    iterations: usize,

    /// Pheromone importance
    #[arg(long, default_value = "1.0")]
    alpha: f64,

    /// Inverse-distance importance
    #[arg(long, default_value = "5.0")]
    beta: f64,

    /// Fraction of pheromone evaporated per iteration
    #[arg(long, default_value = "0.5")]
    evaporation_rate: f64,

    /// Pheromone deposit factor
    #[arg(long, default_value = "100.0")]
    pheromone_deposit: f64,

    /// Random seed
    #[arg(short, long, default_value = "42")]
    seed: u64,

    /// Build ants on a single thread
    #[arg(long)]
    sequential: bool,
}

impl AcoArgs {
    fn to_config(&self) -> ACOConfig {
        ACOConfig {
            num_ants: self.ants,
            num_iterations: self.iterations,
            alpha: self.alpha,
            beta: self.beta,
            evaporation_rate: self.evaporation_rate,
            pheromone_deposit: self.pheromone_deposit,
            seed: self.seed,
            parallel: !self.sequential,
            ..Default::default()
        }
    }
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum, Debug)]
enum Algorithm {
    /// Cheapest detours in nearest-neighbor order
    Greedy,
    /// Ant Colony Optimization
    Aco,
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Plan { input, algorithm, aco, output, verbose } => {
            plan_route(&input, algorithm, &aco, output, verbose);
        }

        Commands::Compare { input, aco, runs, output } => {
            compare_algorithms(&input, &aco, runs, output);
        }

        Commands::Analyze { input } => {
            analyze_points(&input);
        }
    }
}

fn load_points(input: &InputArgs) -> PointSet {
    let result = match (&input.points, input.random) {
        (Some(path), _) => PointSet::from_file(path),
        (None, Some(n)) => Ok(PointSet::random(n, input.extent, 0)),
        (None, None) => Err("either --points or --random is required".to_string()),
    };

    match result {
        Ok(set) => set,
        Err(e) => {
            eprintln!("Error loading points: {}", e);
            std::process::exit(1);
        }
    }
}

fn build_planner(input: &InputArgs, set: &PointSet) -> WaypointPlanner {
    let (start, end) = match (set.get(input.start), set.get(input.end)) {
        (Some(s), Some(e)) => (s, e),
        _ => {
            eprintln!(
                "Start/end index out of range ({} points, start={}, end={})",
                set.len(),
                input.start,
                input.end
            );
            std::process::exit(1);
        }
    };

    let choice = match &input.kernel {
        Some(library) => KernelChoice::Native { library: library.clone() },
        None => KernelChoice::Reference,
    };

    WaypointPlanner::with_kernel(&set.points, start, end, input.k, &choice)
}

fn plan_route(
    input: &InputArgs,
    algorithm: Algorithm,
    aco: &AcoArgs,
    output: Option<PathBuf>,
    verbose: bool,
) {
    let set = load_points(input);
    let planner = build_planner(input, &set);

    if verbose {
        println!("{}", set.statistics());
        println!("Candidates: {}", planner.problem().candidates.len());
        println!("Kernel: {}", planner.kernel_name());
    }

    let algorithm = match algorithm {
        Algorithm::Greedy => PlannerAlgorithm::Greedy,
        Algorithm::Aco => PlannerAlgorithm::Aco,
    };

    println!("Planning with {:?}...", algorithm);
    let route = match planner.plan(algorithm, aco.to_config()) {
        Ok(route) => route,
        Err(e) => {
            eprintln!("Planning failed: {}", e);
            std::process::exit(1);
        }
    };

    println!("\n========== Results ==========");
    println!("Algorithm: {}", route.algorithm);
    println!("Length: {:.2}", route.length);
    println!("Waypoints: {}", route.waypoint_count());
    println!("Time: {:.4}s", route.computation_time);
    if let Some(iter) = route.iterations {
        println!("Iterations: {}", iter);
    }

    if verbose {
        println!("\n{}", route);
    }

    if let Some(out_path) = output {
        let written = serde_json::to_string_pretty(&route)
            .map_err(|e| e.to_string())
            .and_then(|json| std::fs::write(&out_path, json).map_err(|e| e.to_string()));
        match written {
            Ok(()) => println!("\nRoute saved to {:?}", out_path),
            Err(e) => {
                eprintln!("Failed to write output: {}", e);
                std::process::exit(1);
            }
        }
    }
}

fn compare_algorithms(input: &InputArgs, aco: &AcoArgs, runs: usize, output: Option<PathBuf>) {
    let set = load_points(input);
    let planner = build_planner(input, &set);

    println!(
        "Comparing algorithms on {} ({} candidates, k={})...\n",
        set.name,
        planner.problem().candidates.len(),
        input.k
    );

    let mut benchmark = Benchmark::new(BenchmarkConfig {
        num_runs: runs,
        aco: aco.to_config(),
    });
    benchmark.run(&planner, &set.name);

    println!("{}", benchmark.generate_report());

    if let Some(dir) = output {
        if let Err(e) = std::fs::create_dir_all(&dir) {
            eprintln!("Failed to create output directory: {}", e);
            std::process::exit(1);
        }

        let results_path = dir.join("results.csv");
        let stats_path = dir.join("statistics.csv");
        let exported = benchmark
            .export_to_csv(&results_path)
            .and_then(|_| benchmark.export_statistics_csv(&stats_path));
        match exported {
            Ok(()) => println!("Results exported to {:?} and {:?}", results_path, stats_path),
            Err(e) => {
                eprintln!("Failed to export results: {}", e);
                std::process::exit(1);
            }
        }
    }
}

fn analyze_points(input: &InputArgs) {
    let set = load_points(input);

    println!("========== Point Set Analysis ==========\n");
    println!("{}", set.statistics());

    if let (Some(start), Some(end)) = (set.get(input.start), set.get(input.end)) {
        let planner = WaypointPlanner::new(&set.points, start, end, input.k);
        println!("Start: {}  End: {}", start, end);
        println!("Candidates: {}", planner.problem().candidates.len());

        match planner.greedy_path() {
            Ok(path) => println!("Greedy estimate (k={}): {:.2}", input.k, path.length()),
            Err(e) => println!("Greedy estimate unavailable: {}", e),
        }
    }
}
