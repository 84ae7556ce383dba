use clap::{Parser, ValueEnum};
use planet_walk_core::{MovementInput, PlanetSimulation, SimulationConfig, Walker};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

/// Scripted keyboard input for the player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Pattern {
    /// No keys held
    Idle,
    /// Forward held the whole run
    Forward,
    /// Forward and right held, walking a loop
    Circle,
    /// Forward held, switching between left and right every second
    Zigzag,
}

impl Pattern {
    fn input(self, elapsed: f64) -> MovementInput {
        match self {
            Pattern::Idle => MovementInput::IDLE,
            Pattern::Forward => MovementInput::FORWARD,
            Pattern::Circle => MovementInput {
                right: true,
                ..MovementInput::FORWARD
            },
            Pattern::Zigzag => {
                let left = (elapsed.floor() as u64 & 1) == 0;
                MovementInput {
                    left,
                    right: !left,
                    ..MovementInput::FORWARD
                }
            }
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "planet-walk-demo")]
#[command(about = "Headless planet walk simulation", long_about = None)]
struct Args {
    /// Number of ticks to run
    #[arg(short, long, default_value_t = 600)]
    ticks: u64,

    /// Seconds per tick
    #[arg(long, default_value_t = 1.0 / 60.0)]
    dt: f32,

    /// Wanderer RNG seed (random when omitted)
    #[arg(short, long)]
    seed: Option<u64>,

    /// Use the low quality (slower walking) preset
    #[arg(long)]
    low: bool,

    /// JSON configuration file; command line flags override it
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Player input pattern
    #[arg(short, long, value_enum, default_value_t = Pattern::Forward)]
    pattern: Pattern,

    /// Print a report every N ticks
    #[arg(short, long, default_value_t = 60)]
    report_every: u64,

    /// Emit one JSON frame snapshot per report instead of a table
    #[arg(long)]
    json: bool,
}

fn load_config(args: &Args) -> Result<SimulationConfig, planet_walk_core::ConfigError> {
    let mut config = match &args.config {
        Some(path) => SimulationConfig::load(path)?,
        None => SimulationConfig::default(),
    };
    if args.low {
        config.quality = planet_walk_core::Quality::Low;
    }
    if let Some(seed) = args.seed {
        config.wanderer.seed = Some(seed);
    }
    Ok(config)
}

fn print_row(sim: &PlanetSimulation) {
    let player = sim.pose(Walker::Player).position;
    let wanderer = sim.pose(Walker::Wanderer).position;
    let camera = sim.camera_pose().position;
    println!(
        "{:>6} | {:>7.2} | ({:>6.2}, {:>6.2}, {:>6.2}) {:>+8.5} | ({:>6.2}, {:>6.2}, {:>6.2}) {:>4} | {:>2}/{:<2} | ({:>6.2}, {:>6.2}, {:>6.2})",
        sim.tick(),
        sim.elapsed(),
        player.x,
        player.y,
        player.z,
        sim.agent(Walker::Player).surface_error(),
        wanderer.x,
        wanderer.y,
        wanderer.z,
        sim.wander_controller().retarget_count(),
        sim.trail(Walker::Player).len(),
        sim.trail(Walker::Wanderer).len(),
        camera.x,
        camera.y,
        camera.z,
    );
}

fn report(sim: &PlanetSimulation, json: bool) -> Result<(), serde_json::Error> {
    if json {
        println!("{}", sim.snapshot().to_json_line()?);
    } else {
        print_row(sim);
    }
    Ok(())
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let config = match load_config(&args) {
        Ok(config) => config,
        Err(e) => {
            error!("{e}");
            return ExitCode::FAILURE;
        }
    };

    let mut sim = match PlanetSimulation::new(config) {
        Ok(sim) => sim,
        Err(e) => {
            error!("{e}");
            return ExitCode::FAILURE;
        }
    };

    info!(
        ticks = args.ticks,
        dt = args.dt,
        pattern = ?args.pattern,
        "Running planet walk"
    );

    if !args.json {
        println!("  Tick |  Time(s) | Player position         SurfErr | Wanderer position       Rtgt | Steps | Camera");
    }

    let report_every = args.report_every.max(1);
    let mut since_report = 0;
    for _ in 0..args.ticks {
        let input = args.pattern.input(sim.elapsed());
        sim.update(&input, args.dt);

        since_report += 1;
        if since_report >= report_every {
            since_report = 0;
            if let Err(e) = report(&sim, args.json) {
                error!("Failed to write snapshot: {e}");
                return ExitCode::FAILURE;
            }
        }
    }

    info!(
        ticks = sim.tick(),
        elapsed = sim.elapsed(),
        retargets = sim.wander_controller().retarget_count(),
        "Finished"
    );
    ExitCode::SUCCESS
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zigzag_alternates_each_second() {
        let first = Pattern::Zigzag.input(0.5);
        let second = Pattern::Zigzag.input(1.5);
        assert!(first.forward && first.left && !first.right);
        assert!(second.forward && second.right && !second.left);
    }

    #[test]
    fn test_flags_override_config() {
        let args = Args::parse_from([
            "demo-headless",
            "--low",
            "--seed",
            "4",
            "--pattern",
            "circle",
        ]);
        let config = load_config(&args).unwrap();
        assert_eq!(config.quality, planet_walk_core::Quality::Low);
        assert_eq!(config.wanderer.seed, Some(4));
        assert_eq!(args.pattern, Pattern::Circle);
    }
}
