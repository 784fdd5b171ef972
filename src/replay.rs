use crate::algorithms::a_star::AStarBaseline;
use crate::algorithms::common::{PathStep, PathfindingAlgorithm};
use crate::algorithms::sipp::SippPlanner;
use crate::config::Config;
use crate::grid::Position;
use crate::scenario::Scenario;
use crate::statistics::{PathStats, SearchStats};
use std::thread;
use std::time::{Duration, Instant};

/// A step that entered a cell while an occupancy window covered it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Collision {
    pub position: Position,
    pub time: u32,
}

/// What happened when a timed path was walked through its scenario.
#[derive(Debug, Clone)]
pub struct ReplayOutcome {
    pub reached_goal: bool,
    pub collisions: Vec<Collision>,
    pub final_time: u32,
}

/// One planner's results on a scenario, for the comparison table.
pub struct PlannerRun {
    pub name: &'static str,
    pub steps: Option<Vec<PathStep>>,
    pub outcome: Option<ReplayOutcome>,
    pub path_stats: Option<PathStats>,
    pub search_stats: SearchStats,
    pub planning_time: Duration,
}

/// Walk a timed path against the scenario's occupancy windows.
///
/// Each step is judged at its arrival time, the same conflict model the
/// planner uses. Time the agent spends idling before a move is not checked,
/// so a plan that waits out a window over its own cell replays clean.
pub fn verify(scenario: &Scenario, steps: &[PathStep]) -> ReplayOutcome {
    let collisions: Vec<Collision> = steps
        .iter()
        .filter(|step| {
            scenario
                .obstacles
                .iter()
                .any(|obs| obs.blocks(step.position, step.arrival_time))
        })
        .map(|step| Collision {
            position: step.position,
            time: step.arrival_time,
        })
        .collect();

    ReplayOutcome {
        reached_goal: steps.last().map_or(false, |step| step.position == scenario.goal),
        collisions,
        final_time: steps.last().map_or(0, |step| step.arrival_time),
    }
}

fn clear_screen() {
    print!("\x1B[2J\x1B[1;1H");
}

/// Animate a timed path tick by tick. Between a step's arrival and the next
/// step's arrival the agent sits on its cell, which is exactly how implicit
/// waits play out.
pub fn play(scenario: &Scenario, steps: &[PathStep], name: &str, delay_ms: u64) {
    if steps.is_empty() {
        return;
    }
    let grid = scenario.build_grid();
    let final_time = steps.last().map_or(0, |step| step.arrival_time);

    let mut cursor = 0;
    for time in 0..=final_time {
        while cursor + 1 < steps.len() && steps[cursor + 1].arrival_time <= time {
            cursor += 1;
        }
        let agent = steps[cursor].position;
        let occupied = scenario.occupied_at(time);

        clear_screen();
        println!("=== PATH REPLAY ===");
        println!(
            "Planner: {} | Time: {} / {} | Position: ({}, {})",
            name, time, final_time, agent.x, agent.y
        );
        println!("Occupied cells right now: {}", occupied.len());
        grid.print_grid(scenario.start, scenario.goal, Some(agent), &occupied);
        thread::sleep(Duration::from_millis(delay_ms));
    }
}

/// Run every planner on the same scenario and replay each result.
pub fn run_planners(scenario: &Scenario, quiet: bool) -> Vec<PlannerRun> {
    let grid = scenario.build_grid();
    let optimal_path_length = AStarBaseline::new()
        .find_path(
            &grid,
            scenario.start,
            scenario.goal,
            &[],
            scenario.max_time,
        )
        .map_or(0, |path| path.len());

    let mut planners: Vec<Box<dyn PathfindingAlgorithm>> =
        vec![Box::new(SippPlanner::new()), Box::new(AStarBaseline::new())];

    let mut runs = Vec::new();
    for (i, planner) in planners.iter_mut().enumerate() {
        let name = planner.name();
        if !quiet {
            println!("Running planner {} of 2: {}", i + 1, name);
        }

        let started = Instant::now();
        let steps = planner.find_timed_path(
            &grid,
            scenario.start,
            scenario.goal,
            &scenario.obstacles,
            scenario.max_time,
        );
        let planning_time = started.elapsed();

        let outcome = steps.as_deref().map(|steps| verify(scenario, steps));
        let path_stats = steps
            .as_deref()
            .map(|steps| PathStats::from_steps(steps, optimal_path_length));

        if !quiet {
            match (&steps, &outcome) {
                (Some(steps), Some(outcome)) => println!(
                    "Completed: {} - Makespan: {}, Collisions: {}",
                    name,
                    steps.last().map_or(0, |s| s.arrival_time),
                    outcome.collisions.len()
                ),
                _ => println!("Completed: {} - No path found", name),
            }
        }

        runs.push(PlannerRun {
            name,
            steps,
            outcome,
            path_stats,
            search_stats: planner.search_stats(),
            planning_time,
        });
    }

    runs
}

/// Print comparison results in a nice table format
pub fn print_comparison(runs: &[PlannerRun]) {
    println!("\n=== PLANNER COMPARISON RESULTS ===");
    println!();

    println!(
        "{:<10} {:<7} {:<10} {:<7} {:<7} {:<12} {:<12} {:<10} {:<12}",
        "Planner",
        "Found",
        "Makespan",
        "Moves",
        "Waits",
        "Efficiency",
        "Collisions",
        "Expanded",
        "Plan Time"
    );
    println!("{}", "-".repeat(92));

    for run in runs {
        let found_str = if run.steps.is_some() { "✓" } else { "✗" };
        let (makespan_str, moves_str, waits_str, efficiency_str) = match &run.path_stats {
            Some(stats) => (
                stats.makespan.to_string(),
                stats.moves.to_string(),
                stats.wait_time.to_string(),
                format!("{:.3}", stats.route_efficiency),
            ),
            None => ("-".into(), "-".into(), "-".into(), "-".into()),
        };
        let collisions_str = run
            .outcome
            .as_ref()
            .map_or("-".into(), |o| o.collisions.len().to_string());
        let plan_time_str = format!("{:.2?}", run.planning_time);

        println!(
            "{:<10} {:<7} {:<10} {:<7} {:<7} {:<12} {:<12} {:<10} {:<12}",
            run.name,
            found_str,
            makespan_str,
            moves_str,
            waits_str,
            efficiency_str,
            collisions_str,
            run.search_stats.expanded,
            plan_time_str
        );
    }

    println!();
    println!("=== REPLAY ANALYSIS ===");
    for run in runs {
        match &run.outcome {
            Some(outcome) if outcome.collisions.is_empty() && outcome.reached_goal => {
                println!(
                    "{}: reached the goal at time {} without entering an occupied cell",
                    run.name, outcome.final_time
                );
            }
            Some(outcome) => {
                for collision in &outcome.collisions {
                    println!(
                        "{}: entered ({}, {}) at time {} while an occupancy window covered it",
                        run.name, collision.position.x, collision.position.y, collision.time
                    );
                }
                if !outcome.reached_goal {
                    println!("{}: replay ended away from the goal", run.name);
                }
            }
            None => println!("{}: no path found", run.name),
        }
    }
}

/// Plan one scenario with the configured planner and report the result.
pub fn run_single(scenario: &Scenario, config: &Config) {
    let grid = scenario.build_grid();
    let mut planner: Box<dyn PathfindingAlgorithm> = match config.algorithm.as_str() {
        "sipp" => Box::new(SippPlanner::new()),
        "astar" => Box::new(AStarBaseline::new()),
        _ => panic!("Select 'sipp', 'astar', or 'all' for algorithm"),
    };

    let started = Instant::now();
    let steps = planner.find_timed_path(
        &grid,
        scenario.start,
        scenario.goal,
        &scenario.obstacles,
        scenario.max_time,
    );
    let planning_time = started.elapsed();

    match steps {
        Some(steps) => {
            println!("Path found:");
            for step in &steps {
                println!(
                    "  ({}, {}) at time {}",
                    step.position.x, step.position.y, step.arrival_time
                );
            }
            println!();

            let optimal_path_length = AStarBaseline::new()
                .find_path(
                    &grid,
                    scenario.start,
                    scenario.goal,
                    &[],
                    scenario.max_time,
                )
                .map_or(0, |path| path.len());
            print!("{}", PathStats::from_steps(&steps, optimal_path_length));
            print!("{}", planner.search_stats());
            println!("Planning time: {:.2?}", planning_time);

            let outcome = verify(scenario, &steps);
            if outcome.collisions.is_empty() {
                println!("Replay clean: no occupancy conflicts");
            } else {
                for collision in &outcome.collisions {
                    println!(
                        "Collision at ({}, {}) at time {}",
                        collision.position.x, collision.position.y, collision.time
                    );
                }
            }

            if !config.no_visualization {
                play(scenario, &steps, planner.name(), config.delay_ms);
            }
        }
        None => println!("No path found!"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::obstacle::DynamicObstacle;
    use std::collections::HashSet;

    fn corridor_scenario() -> Scenario {
        Scenario {
            width: 3,
            height: 1,
            walls: HashSet::new(),
            obstacles: vec![DynamicObstacle::new(1, 0, 0, 3)],
            start: Position { x: 0, y: 0 },
            goal: Position { x: 2, y: 0 },
            max_time: 10,
        }
    }

    fn step(x: usize, y: usize, arrival_time: u32) -> PathStep {
        PathStep {
            position: Position { x, y },
            arrival_time,
        }
    }

    #[test]
    fn test_verify_flags_entry_into_an_occupied_cell() {
        let scenario = corridor_scenario();
        let steps = vec![step(0, 0, 0), step(1, 0, 1), step(2, 0, 2)];
        let outcome = verify(&scenario, &steps);
        assert_eq!(
            outcome.collisions,
            vec![Collision {
                position: Position { x: 1, y: 0 },
                time: 1,
            }]
        );
        assert!(outcome.reached_goal);
        assert_eq!(outcome.final_time, 2);
    }

    #[test]
    fn test_verify_accepts_a_plan_that_waits_out_the_window() {
        let scenario = corridor_scenario();
        let steps = vec![step(0, 0, 0), step(1, 0, 4), step(2, 0, 5)];
        let outcome = verify(&scenario, &steps);
        assert!(outcome.collisions.is_empty());
        assert!(outcome.reached_goal);
        assert_eq!(outcome.final_time, 5);
    }

    #[test]
    fn test_verify_reports_a_truncated_path() {
        let scenario = corridor_scenario();
        let steps = vec![step(0, 0, 0), step(1, 0, 4)];
        let outcome = verify(&scenario, &steps);
        assert!(!outcome.reached_goal);
    }

    #[test]
    fn test_verify_of_empty_path() {
        let scenario = corridor_scenario();
        let outcome = verify(&scenario, &[]);
        assert!(!outcome.reached_goal);
        assert!(outcome.collisions.is_empty());
        assert_eq!(outcome.final_time, 0);
    }

    #[test]
    fn test_interval_planner_replays_clean_where_baseline_collides() {
        let scenario = corridor_scenario();
        let runs = run_planners(&scenario, true);
        assert_eq!(runs.len(), 2);

        let sipp = runs.iter().find(|run| run.name == "sipp").unwrap();
        let astar = runs.iter().find(|run| run.name == "astar").unwrap();

        let sipp_outcome = sipp.outcome.as_ref().unwrap();
        assert!(sipp_outcome.reached_goal);
        assert!(sipp_outcome.collisions.is_empty());

        // The time-blind baseline walks straight into the window.
        let astar_outcome = astar.outcome.as_ref().unwrap();
        assert!(!astar_outcome.collisions.is_empty());
    }

    #[test]
    fn test_run_planners_on_the_demo_scenario() {
        let scenario = Scenario::demo();
        let runs = run_planners(&scenario, true);

        let sipp = runs.iter().find(|run| run.name == "sipp").unwrap();
        let outcome = sipp.outcome.as_ref().unwrap();
        assert!(outcome.reached_goal);
        assert!(outcome.collisions.is_empty());
        assert!(sipp.search_stats.expanded > 0);

        let stats = sipp.path_stats.as_ref().unwrap();
        assert_eq!(stats.makespan, outcome.final_time);
        assert!(stats.optimal_path_length > 0);
    }
}
