use crate::config::Config;
use crate::replay::{run_planners, PlannerRun};
use crate::scenario::Scenario;
use std::collections::HashMap;
use std::fs::OpenOptions;
use std::io::Write;
use std::time::{Duration, Instant};

/// One planner run on one generated scenario, flattened for CSV output.
#[derive(Debug, Clone)]
pub struct BatchRecord {
    pub scenario_id: usize,
    pub planner: &'static str,
    pub width: usize,
    pub height: usize,
    pub num_walls: usize,
    pub num_obstacles: usize,
    pub max_time: u32,
    pub seed: u64,
    pub found: bool,
    pub path_cells: usize,
    pub makespan: u32,
    pub wait_time: u32,
    pub collisions: usize,
    pub route_efficiency: f64,
    pub generated: usize,
    pub expanded: usize,
    pub duplicates: usize,
    pub planning_time_us: u64,
}

#[derive(Debug, Default, Clone)]
struct PlannerAggregate {
    runs: usize,
    found: usize,
    collision_free: usize,
    total_makespan: u64,
    total_efficiency: f64,
    total_planning_us: u64,
}

pub struct BatchRunner {
    config: Config,
    results: Vec<BatchRecord>,
    // Running totals per planner, updated as records are pushed. The summary
    // reads these, not `results`, which is cleared at every flush.
    summary: HashMap<&'static str, PlannerAggregate>,
    start_time: Instant,
    batch_size: usize,
    total_results_written: usize,
}

impl BatchRunner {
    pub fn new(config: Config) -> Self {
        BatchRunner {
            config,
            results: Vec::new(),
            summary: HashMap::new(),
            start_time: Instant::now(),
            batch_size: 100,
            total_results_written: 0,
        }
    }

    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size;
        self
    }

    pub fn records_written(&self) -> usize {
        self.total_results_written
    }

    pub fn run(&mut self) -> Result<(), String> {
        if self.config.min_walls > self.config.max_walls {
            return Err(format!(
                "min_walls {} exceeds max_walls {}",
                self.config.min_walls, self.config.max_walls
            ));
        }
        if self.config.min_obstacles > self.config.max_obstacles {
            return Err(format!(
                "min_obstacles {} exceeds max_obstacles {}",
                self.config.min_obstacles, self.config.max_obstacles
            ));
        }

        self.start_time = Instant::now();
        self.initialize_csv_file()?;

        let base_seed = self.config.seed.unwrap_or_else(rand::random::<u64>);

        if !self.config.quiet {
            println!("=== BATCH SWEEP STARTED ===");
            println!("Grid: {}x{}", self.config.width, self.config.height);
            println!(
                "Walls range: {} to {}",
                self.config.min_walls, self.config.max_walls
            );
            println!(
                "Obstacles range: {} to {}",
                self.config.min_obstacles, self.config.max_obstacles
            );
            println!("Scenarios per configuration: {}", self.config.runs_per_config);
            println!("Horizon: {}", self.config.max_time);
            println!("Timeout: {} seconds", self.config.timeout_seconds);
            println!("Base seed: {}", base_seed);
            println!("Output file: {}", self.config.output_file);
            println!();
        }

        let total_configurations = self.count_total_configurations();
        let total_scenarios = total_configurations * self.config.runs_per_config;

        if !self.config.quiet {
            println!("Total configurations to test: {}", total_configurations);
            println!("Total scenarios to plan: {}", total_scenarios);
            println!();
        }

        let mut configuration_count = 0;
        let mut completed_scenarios = 0;
        let mut scenario_counter: u64 = 0;
        let timeout_duration = Duration::from_secs(self.config.timeout_seconds);

        let mut last_progress_report = Instant::now();
        let progress_interval = Duration::from_secs(10);

        for num_walls in self.config.min_walls..=self.config.max_walls {
            for num_obstacles in self.config.min_obstacles..=self.config.max_obstacles {
                configuration_count += 1;

                if self.start_time.elapsed() > timeout_duration {
                    if !self.config.quiet {
                        println!(
                            "Timeout reached after {} configurations",
                            configuration_count - 1
                        );
                    }
                    break;
                }

                if !self.config.quiet {
                    println!(
                        "Configuration {}/{}: {} walls, {} obstacles",
                        configuration_count, total_configurations, num_walls, num_obstacles
                    );
                }

                let completed = self.run_configuration(
                    num_walls,
                    num_obstacles,
                    base_seed,
                    &mut scenario_counter,
                )?;
                completed_scenarios += completed;

                if self.results.len() >= self.batch_size {
                    self.flush_results_to_csv()?;
                }

                // Progress lands on stdout every 10 seconds regardless of
                // quiet mode; long sweeps should not look hung.
                if last_progress_report.elapsed() > progress_interval {
                    let progress_percentage =
                        (completed_scenarios as f64 / total_scenarios as f64) * 100.0;
                    let elapsed = self.start_time.elapsed();
                    let estimated_total = if completed_scenarios > 0 {
                        elapsed.mul_f64(total_scenarios as f64 / completed_scenarios as f64)
                    } else {
                        Duration::from_secs(0)
                    };
                    let remaining = estimated_total.saturating_sub(elapsed);

                    println!(
                        "Progress: {:.1}% ({}/{}) - Elapsed: {:.1}s - ETA: {:.1}s - Records written: {}",
                        progress_percentage,
                        completed_scenarios,
                        total_scenarios,
                        elapsed.as_secs_f64(),
                        remaining.as_secs_f64(),
                        self.total_results_written
                    );
                    last_progress_report = Instant::now();
                }
            }

            if self.start_time.elapsed() > timeout_duration {
                break;
            }
        }

        if !self.results.is_empty() {
            self.flush_results_to_csv()?;
        }

        if !self.config.quiet {
            println!("\n=== BATCH SWEEP COMPLETED ===");
            println!("Total records written: {}", self.total_results_written);
            println!("Results saved to: {}", self.config.output_file);
            println!("Total time: {:.2?}", self.start_time.elapsed());
        } else {
            println!(
                "Batch sweep completed: {} records in {:.1}s -> {}",
                self.total_results_written,
                self.start_time.elapsed().as_secs_f64(),
                self.config.output_file
            );
        }

        Ok(())
    }

    fn count_total_configurations(&self) -> usize {
        let wall_count = (self.config.max_walls - self.config.min_walls) + 1;
        let obstacle_count = (self.config.max_obstacles - self.config.min_obstacles) + 1;
        wall_count * obstacle_count
    }

    fn run_configuration(
        &mut self,
        num_walls: usize,
        num_obstacles: usize,
        base_seed: u64,
        scenario_counter: &mut u64,
    ) -> Result<usize, String> {
        let mut run_config = self.config.clone();
        run_config.num_walls = num_walls;
        run_config.num_obstacles = num_obstacles;

        let timeout_duration = Duration::from_secs(self.config.timeout_seconds);
        let mut completed_count = 0;

        for scenario_id in 0..self.config.runs_per_config {
            if self.start_time.elapsed() > timeout_duration {
                return Ok(completed_count);
            }

            let seed = base_seed.wrapping_add(*scenario_counter);
            *scenario_counter += 1;

            let scenario = Scenario::random(&run_config, Some(seed));
            for run in run_planners(&scenario, true) {
                let record = self.make_record(scenario_id, seed, &run_config, &run);
                self.push_record(record);
            }

            completed_count += 1;
        }

        if self.results.len() >= self.batch_size {
            self.flush_results_to_csv()?;
        }
        Ok(completed_count)
    }

    fn make_record(
        &self,
        scenario_id: usize,
        seed: u64,
        run_config: &Config,
        run: &PlannerRun,
    ) -> BatchRecord {
        BatchRecord {
            scenario_id,
            planner: run.name,
            width: self.config.width,
            height: self.config.height,
            num_walls: run_config.num_walls,
            num_obstacles: run_config.num_obstacles,
            max_time: self.config.max_time,
            seed,
            found: run.steps.is_some(),
            path_cells: run.path_stats.as_ref().map_or(0, |s| s.path_cells),
            makespan: run.path_stats.as_ref().map_or(0, |s| s.makespan),
            wait_time: run.path_stats.as_ref().map_or(0, |s| s.wait_time),
            collisions: run.outcome.as_ref().map_or(0, |o| o.collisions.len()),
            route_efficiency: run.path_stats.as_ref().map_or(0.0, |s| s.route_efficiency),
            generated: run.search_stats.generated,
            expanded: run.search_stats.expanded,
            duplicates: run.search_stats.duplicates,
            planning_time_us: run.planning_time.as_micros() as u64,
        }
    }

    fn push_record(&mut self, record: BatchRecord) {
        let aggregate = self.summary.entry(record.planner).or_default();
        aggregate.runs += 1;
        if record.found {
            aggregate.found += 1;
            aggregate.total_makespan += record.makespan as u64;
            aggregate.total_efficiency += record.route_efficiency;
            if record.collisions == 0 {
                aggregate.collision_free += 1;
            }
        }
        aggregate.total_planning_us += record.planning_time_us;

        self.results.push(record);
    }

    fn initialize_csv_file(&self) -> Result<(), String> {
        let mut file = std::fs::File::create(&self.config.output_file)
            .map_err(|e| format!("Failed to create output file: {}", e))?;

        writeln!(file, "scenario_id,planner,width,height,num_walls,num_obstacles,max_time,seed,found,path_cells,makespan,wait_time,collisions,route_efficiency,generated,expanded,duplicates,planning_time_us")
            .map_err(|e| format!("Failed to write header: {}", e))?;

        if !self.config.quiet {
            println!("Initialized CSV file: {}", self.config.output_file);
        }
        Ok(())
    }

    fn flush_results_to_csv(&mut self) -> Result<(), String> {
        if self.results.is_empty() {
            return Ok(());
        }

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.config.output_file)
            .map_err(|e| format!("Failed to open output file for appending: {}", e))?;

        for result in &self.results {
            writeln!(
                file,
                "{},{},{},{},{},{},{},{},{},{},{},{},{},{:.6},{},{},{},{}",
                result.scenario_id,
                result.planner,
                result.width,
                result.height,
                result.num_walls,
                result.num_obstacles,
                result.max_time,
                result.seed,
                result.found,
                result.path_cells,
                result.makespan,
                result.wait_time,
                result.collisions,
                result.route_efficiency,
                result.generated,
                result.expanded,
                result.duplicates,
                result.planning_time_us
            )
            .map_err(|e| format!("Failed to write data row: {}", e))?;
        }

        self.total_results_written += self.results.len();
        if !self.config.quiet {
            println!(
                "Flushed {} results to CSV (total: {})",
                self.results.len(),
                self.total_results_written
            );
        }
        self.results.clear();
        Ok(())
    }

    pub fn print_summary(&self) {
        if self.summary.is_empty() {
            println!("No results to summarize.");
            return;
        }

        println!("\n=== BATCH SWEEP SUMMARY ===");

        for (planner, aggregate) in &self.summary {
            println!("\n{} Planner Results:", planner);
            let found_rate = (aggregate.found as f64 / aggregate.runs as f64) * 100.0;
            println!(
                "  Paths found: {}/{} ({:.1}%)",
                aggregate.found, aggregate.runs, found_rate
            );

            if aggregate.found > 0 {
                println!(
                    "  Collision-free replays: {}/{}",
                    aggregate.collision_free, aggregate.found
                );
                println!(
                    "  Average makespan: {:.1}",
                    aggregate.total_makespan as f64 / aggregate.found as f64
                );
                println!(
                    "  Average efficiency: {:.3}",
                    aggregate.total_efficiency / aggregate.found as f64
                );
            }
            println!(
                "  Average planning time: {:.1}us",
                aggregate.total_planning_us as f64 / aggregate.runs as f64
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use std::fs;

    fn sweep_config(output_file: String) -> Config {
        let mut config = Config::parse_from(["test"]);
        config.width = 6;
        config.height = 6;
        config.max_time = 20;
        config.min_walls = 2;
        config.max_walls = 2;
        config.min_obstacles = 1;
        config.max_obstacles = 1;
        config.runs_per_config = 2;
        config.seed = Some(5);
        config.quiet = true;
        config.output_file = output_file;
        config
    }

    fn temp_csv(tag: &str) -> String {
        std::env::temp_dir()
            .join(format!("sipp_batch_{}_{}.csv", tag, std::process::id()))
            .to_string_lossy()
            .into_owned()
    }

    #[test]
    fn test_sweep_writes_header_and_rows() {
        let path = temp_csv("rows");
        let config = sweep_config(path.clone());
        let mut runner = BatchRunner::new(config);
        runner.run().unwrap();

        let contents = fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert!(lines[0].starts_with("scenario_id,planner,width,height"));
        // 1 configuration, 2 scenarios, 2 planners each.
        assert_eq!(lines.len(), 5);
        assert_eq!(runner.records_written(), 4);
        assert!(runner.results.is_empty());

        fs::remove_file(&path).ok();
    }

    #[test]
    fn test_small_batch_size_flushes_incrementally() {
        let path = temp_csv("flush");
        let mut config = sweep_config(path.clone());
        config.max_walls = 3; // two configurations
        let mut runner = BatchRunner::new(config).with_batch_size(2);
        runner.run().unwrap();

        let contents = fs::read_to_string(&path).unwrap();
        assert_eq!(contents.lines().count(), 9);
        assert_eq!(runner.records_written(), 8);

        fs::remove_file(&path).ok();
    }

    #[test]
    fn test_summary_survives_the_final_flush() {
        let path = temp_csv("summary");
        let config = sweep_config(path.clone());
        let mut runner = BatchRunner::new(config);
        runner.run().unwrap();

        // Results were flushed but the aggregates keep counting.
        assert!(runner.results.is_empty());
        let sipp = runner.summary.get("sipp").unwrap();
        assert_eq!(sipp.runs, 2);
        runner.print_summary();

        fs::remove_file(&path).ok();
    }

    #[test]
    fn test_rejects_inverted_sweep_bounds() {
        let path = temp_csv("bounds");
        let mut config = sweep_config(path.clone());
        config.min_walls = 10;
        config.max_walls = 5;
        let err = BatchRunner::new(config).run().unwrap_err();
        assert!(err.contains("min_walls"));
    }

    #[test]
    fn test_seeded_sweep_is_reproducible() {
        let path_a = temp_csv("repro_a");
        let path_b = temp_csv("repro_b");
        BatchRunner::new(sweep_config(path_a.clone())).run().unwrap();
        BatchRunner::new(sweep_config(path_b.clone())).run().unwrap();

        // Strip the wall-clock planning time column before comparing.
        let strip = |contents: String| -> Vec<String> {
            contents
                .lines()
                .map(|line| {
                    let mut fields: Vec<&str> = line.split(',').collect();
                    fields.pop();
                    fields.join(",")
                })
                .collect()
        };
        let rows_a = strip(fs::read_to_string(&path_a).unwrap());
        let rows_b = strip(fs::read_to_string(&path_b).unwrap());
        assert_eq!(rows_a, rows_b);

        fs::remove_file(&path_a).ok();
        fs::remove_file(&path_b).ok();
    }
}
