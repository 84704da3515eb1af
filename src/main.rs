use clap::Parser;
use std::path::PathBuf;
use tabular_dp::common::utils::action_label;
use tabular_dp::config::*;
use tabular_dp::runner::*;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about = "Solve gridworld MDPs by dynamic programming", long_about = None)]
struct Args {
    #[arg(short, long, value_enum, default_value_t = Preset::SmallLake)]
    env: Preset,

    #[arg(short, long, value_enum, default_value_t = Algorithm::Both)]
    algorithm: Algorithm,

    /// JSON config file; replaces the preset.
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[arg(long)]
    gamma: Option<f64>,

    #[arg(long)]
    theta: Option<f64>,

    #[arg(long)]
    max_iterations: Option<usize>,

    /// Slip probability (frozen lake presets only).
    #[arg(long, default_value_t = DEFAULT_SLIP)]
    slip: f64,

    #[arg(long, default_value_t = DEFAULT_MAX_STEPS)]
    max_steps: usize,

    #[arg(long)]
    seed: Option<u64>,

    /// Play one episode with the solved policy.
    #[arg(long)]
    play: bool,

    /// Write the solved policy and value as JSON.
    #[arg(long)]
    save: Option<PathBuf>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => Config::from_file(path)?,
        None => Config {
            env: args.env.env_config(args.slip, args.max_steps, args.seed),
            solver: SolverConfig::default(),
        },
    };
    SolverOverrides {
        gamma: args.gamma,
        theta: args.theta,
        max_iterations: args.max_iterations,
    }
    .apply(&mut config.solver);

    let seed = args.seed.or(config.env.seed());
    let (reports, playback) = run(&config, args.algorithm, args.play, seed)?;

    for report in &reports {
        println!(
            "## {}\nTheta: {}, Converged: {}, Number of iterations: {}",
            report.title, config.solver.theta, report.converged, report.iterations
        );
        println!("{}", report.rendered);
    }

    if let Some(playback) = &playback {
        for e in &playback.events {
            println!("s: {:>3}  a: {}  r: {:+.1}", e.s, action_label(e.a), e.r);
        }
        println!("{}", playback.rendered);
        println!(
            "Finished episode in {} steps with total reward {}",
            playback.events.len(),
            playback.total_reward()
        );
    }

    if let (Some(path), Some(report)) = (&args.save, reports.first()) {
        report.solution.save(path)?;
        info!(path = %path.display(), "saved solution");
    }

    Ok(())
}
