use clap::Parser;

#[derive(Parser, Clone)]
#[command(
    display_name = "MOA Processor",
    author = "Mutual Opponent Adjustment",
    long_about = "Fits opponent-adjusted player ratings from per-game matchup data"
)]
pub struct Args {
    /// Path to a JSON array of raw game records. When omitted, a built-in
    /// sample schedule is used.
    #[arg(short, long, env, help = "Path to a JSON file of raw game records")]
    pub records: Option<String>,

    /// Positions to fit
    #[arg(short, long, num_args = 1.., default_values = ["WR", "RB"], value_parser = ["WR", "RB"])]
    pub positions: Vec<String>,

    /// Iteration cap for the coordinate-descent solve
    #[arg(long, default_value_t = 100)]
    pub max_iter: usize,

    /// Convergence tolerance on the largest per-iteration rating change
    #[arg(long, default_value_t = 1e-4)]
    pub tol: f64,

    /// Reference week for recency weighting; games this week keep full
    /// weight. Defaults to the latest week found in the records.
    #[arg(long)]
    pub reference_week: Option<i32>,

    /// Matchups lighter than this are dropped before fitting
    #[arg(long, default_value_t = 0.0)]
    pub min_weight: f64,

    /// Log level (trace, debug, info, warn, error)
    #[arg(
        short,
        long,
        env = "RUST_LOG",
        default_value = "info",
        value_parser = ["trace", "debug", "info", "warn", "error"],
        help = "Sets the logging verbosity"
    )]
    pub log_level: String
}
