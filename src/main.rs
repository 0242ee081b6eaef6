//! Genetic Search CLI - Evolve a phrase from a JSON run file.

#[cfg(feature = "dhat-heap")]
#[global_allocator]
static ALLOC: dhat::Alloc = dhat::Alloc;

use std::fs;
use std::path::PathBuf;

use genetic_search::{
    compute::EvolutionEngine,
    domains::{PhraseConfig, PhraseDomain},
};

fn main() {
    #[cfg(feature = "dhat-heap")]
    let _profiler = dhat::Profiler::new_heap();

    env_logger::init();

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        eprintln!("Usage: {} <run.json>", args[0]);
        eprintln!();
        eprintln!("Evolve a phrase toward the target described in a JSON run file.");
        eprintln!();
        eprintln!("Arguments:");
        eprintln!("  run.json  Path to the run configuration file");
        eprintln!();
        eprintln!("Example configuration is generated with --example flag.");
        std::process::exit(1);
    }

    if args[1] == "--example" {
        print_example_config();
        return;
    }

    let config_path = PathBuf::from(&args[1]);

    // Load configuration
    let config_str = fs::read_to_string(&config_path).unwrap_or_else(|e| {
        eprintln!("Error reading config file: {}", e);
        std::process::exit(1);
    });

    let config: PhraseConfig = serde_json::from_str(&config_str).unwrap_or_else(|e| {
        eprintln!("Error parsing config: {}", e);
        std::process::exit(1);
    });

    let domain = config.domain().unwrap_or_else(|e| {
        eprintln!("Invalid phrase: {}", e);
        std::process::exit(1);
    });

    println!("Genetic Search");
    println!("==============");
    println!("Target: {:?}", config.target);
    println!("Population: {}", config.evolution.population_size);
    println!("Max iterations: {:?}", config.evolution.max_iterations);
    println!("Acceptable score: {:?}", config.evolution.acceptable_score);
    println!();

    let mut engine = EvolutionEngine::new(config.evolution.clone(), domain).unwrap_or_else(|e| {
        eprintln!("Invalid configuration: {}", e);
        std::process::exit(1);
    });

    println!("Running evolution...");
    let budget = config.evolution.max_iterations.unwrap_or(1000);
    let report_every = (budget / 10).max(1);

    let result = engine
        .run_with_callback(|progress, best| {
            if progress.generation % report_every == 0 {
                println!(
                    "  Generation {}: best={:.0} avg={:.1} {:?}",
                    progress.generation,
                    progress.best_fitness,
                    progress.avg_fitness,
                    PhraseDomain::decode(&best.genome)
                );
            }
        })
        .unwrap_or_else(|e| {
            eprintln!("Evolution failed: {}", e);
            std::process::exit(1);
        });

    println!();
    println!("Result:");
    println!("  Best phrase: {:?}", PhraseDomain::decode(&result.best.genome));
    println!("  Score: {:.0}", result.stats.best_fitness);
    println!("  Stop reason: {:?}", result.stats.stop_reason);
    println!("  Generations: {}", result.stats.generations);
    println!("  Evaluations: {}", result.stats.total_evaluations);
    println!(
        "Time: {:.2}s ({:.1} generations/s)",
        result.stats.elapsed_seconds,
        result.stats.generations as f64 / result.stats.elapsed_seconds.max(f64::EPSILON)
    );
}

fn print_example_config() {
    let config = PhraseConfig::default();

    println!("Example configuration (run.json):");
    match serde_json::to_string_pretty(&config) {
        Ok(json) => println!("{}", json),
        Err(e) => eprintln!("Error serializing config: {}", e),
    }
}
