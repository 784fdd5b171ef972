use clap::Parser;

use safe_interval_pathfinding::batch::BatchRunner;
use safe_interval_pathfinding::config::Config;
use safe_interval_pathfinding::replay;
use safe_interval_pathfinding::scenario::Scenario;

fn main() {
    let config = Config::parse();

    println!("Starting safe interval path planning...");
    println!("Algorithm: {}", config.algorithm);

    if config.no_visualization || config.batch_mode {
        println!("Visualization disabled - running in fast mode");
    } else {
        println!("Visualization enabled with {}ms delay", config.delay_ms);
        println!("Press Ctrl+C to stop the replay");
    }

    if config.quiet {
        println!("Quiet mode enabled - minimal output");
    }

    println!();

    if config.batch_mode {
        let mut batch = BatchRunner::new(config.clone());
        match batch.run() {
            Ok(()) => {
                if !config.quiet {
                    batch.print_summary();
                }
            }
            Err(e) => {
                eprintln!("Batch sweep failed: {}", e);
                std::process::exit(1);
            }
        }
        return;
    }

    let scenario = match config.scenario.as_str() {
        "demo" => Scenario::demo(),
        "random" => {
            // Resolve the seed up front so a lucky layout can be re-run.
            let seed = config.seed.unwrap_or_else(rand::random::<u64>);
            println!("Scenario seed: {} (for reproducibility)", seed);
            Scenario::random(&config, Some(seed))
        }
        _ => panic!("Select 'demo' or 'random' for scenario"),
    };

    println!(
        "Scenario: Grid {}x{}, Walls: {}, Obstacle windows: {}",
        scenario.width,
        scenario.height,
        scenario.walls.len(),
        scenario.obstacles.len()
    );
    println!("Start: {:?}, Goal: {:?}", scenario.start, scenario.goal);
    println!("Horizon: {}", scenario.max_time);
    println!();

    // Small delay before starting (only if visualization is enabled)
    if !config.no_visualization {
        std::thread::sleep(std::time::Duration::from_millis(1000));
    }

    if config.algorithm == "all" {
        let runs = replay::run_planners(&scenario, config.quiet);
        replay::print_comparison(&runs);
    } else {
        replay::run_single(&scenario, &config);
    }
}
