use clap::Parser;

#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Config {
    /// Which scenario to plan: "demo" for the fixed 5x5 layout, "random"
    /// for a generated one.
    #[arg(long, default_value = "demo")]
    pub scenario: String,

    #[arg(long, default_value_t = 20)]
    pub width: usize,

    #[arg(long, default_value_t = 20)]
    pub height: usize,

    #[arg(long, default_value_t = 40)]
    pub num_walls: usize,

    #[arg(long, default_value_t = 15)]
    pub num_obstacles: usize,

    /// Planning horizon; occupancy windows and arrivals live in [0, max_time].
    #[arg(long, default_value_t = 60)]
    pub max_time: u32,

    /// "sipp", "astar", or "all" to compare both on one scenario.
    #[arg(long, default_value = "sipp")]
    pub algorithm: String,

    /// Seed for random scenario generation. Random scenarios with the same
    /// seed and dimensions are identical.
    #[arg(long)]
    pub seed: Option<u64>,

    #[arg(long, default_value_t = 50)]
    pub delay_ms: u64,

    #[arg(long, default_value_t = false)]
    pub no_visualization: bool,

    /// Suppress per-step output; final results are still printed.
    #[arg(long, default_value_t = false)]
    pub quiet: bool,

    /// Run a parameter sweep and write one CSV row per planner run.
    #[arg(long, default_value_t = false)]
    pub batch_mode: bool,

    #[arg(long, default_value_t = 5)]
    pub runs_per_config: usize,

    #[arg(long, default_value_t = 20)]
    pub min_walls: usize,

    #[arg(long, default_value_t = 60)]
    pub max_walls: usize,

    #[arg(long, default_value_t = 5)]
    pub min_obstacles: usize,

    #[arg(long, default_value_t = 25)]
    pub max_obstacles: usize,

    /// Abort the batch sweep after this many seconds.
    #[arg(long, default_value_t = 300)]
    pub timeout_seconds: u64,

    #[arg(long, default_value = "batch_results.csv")]
    pub output_file: String,
}
