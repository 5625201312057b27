//! Fish School entry point
//!
//! Native builds run the simulation headless and report on the school; the
//! browser build is driven from JavaScript through `fish_school::web`.

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use std::path::PathBuf;

    use anyhow::{Context, Result};
    use clap::Parser;
    use glam::Vec2;

    use fish_school::Settings;
    use fish_school::outline::curvature;
    use fish_school::sim::{School, TickInput, tick};

    #[derive(Parser, Debug)]
    #[command(
        name = "fish-school",
        version,
        about = "Run a flocking fish school headless"
    )]
    struct Cli {
        /// JSON settings file; flags below override it.
        #[arg(long, env = "FISH_SCHOOL_CONFIG")]
        config: Option<PathBuf>,
        /// Number of fish.
        #[arg(long)]
        population: Option<usize>,
        /// Run seed.
        #[arg(long)]
        seed: Option<u64>,
        /// Number of ticks to simulate.
        #[arg(long, default_value_t = 600)]
        ticks: u64,
        /// Milliseconds simulated per tick.
        #[arg(long)]
        frame_ms: Option<f32>,
        /// World width.
        #[arg(long)]
        width: Option<f32>,
        /// World height.
        #[arg(long)]
        height: Option<f32>,
        /// Threat position as `x,y`, registered at `--threat-tick`.
        #[arg(long, value_parser = parse_point)]
        threat: Option<Vec2>,
        /// Tick at which the threat appears.
        #[arg(long, default_value_t = 0)]
        threat_tick: u64,
        /// Print the final school as JSON.
        #[arg(long)]
        snapshot: bool,
    }

    fn parse_point(s: &str) -> Result<Vec2, String> {
        let (x, y) = s
            .split_once(',')
            .ok_or_else(|| format!("expected x,y but got {s:?}"))?;
        let x: f32 = x.trim().parse().map_err(|e| format!("bad x: {e}"))?;
        let y: f32 = y.trim().parse().map_err(|e| format!("bad y: {e}"))?;
        Ok(Vec2::new(x, y))
    }

    fn resolve_settings(cli: &Cli) -> Result<Settings> {
        let mut settings = match &cli.config {
            Some(path) => Settings::load(path)?,
            None => Settings::default(),
        };
        if let Some(population) = cli.population {
            settings.population = population;
        }
        if cli.seed.is_some() {
            settings.seed = cli.seed;
        }
        if let Some(frame_ms) = cli.frame_ms {
            settings.frame_ms = frame_ms;
        }
        if let Some(width) = cli.width {
            settings.width = width;
        }
        if let Some(height) = cli.height {
            settings.height = height;
        }
        settings.validate()?;
        Ok(settings)
    }

    pub fn run() -> Result<()> {
        env_logger::init();
        let cli = Cli::parse();
        let settings = resolve_settings(&cli)?;
        let bounds = settings.bounds()?;
        let seed = settings.seed.unwrap_or_else(rand::random);

        log::info!("Fish School (native) starting with seed {}", seed);
        let mut school = School::populate(seed, settings.steering, settings.population, bounds);

        let base = TickInput {
            bounds,
            ..Default::default()
        };
        for t in 0..cli.ticks {
            match cli.threat {
                Some(threat) if t == cli.threat_tick => {
                    let input = TickInput {
                        threats: vec![threat],
                        ..base.clone()
                    };
                    tick(&mut school, &input, settings.frame_ms);
                }
                _ => tick(&mut school, &base, settings.frame_ms),
            }
        }

        let fleeing = school
            .fishes()
            .iter()
            .filter(|f| f.fleeing().is_some())
            .count();
        let outside = school
            .fishes()
            .iter()
            .filter(|f| !bounds.contains(f.position()))
            .count();
        let mean_curvature = if school.is_empty() {
            0.0
        } else {
            school
                .fishes()
                .iter()
                .map(|f| curvature(f.chunks()).abs())
                .sum::<f32>()
                / school.len() as f32
        };
        log::info!(
            "Ran {} ticks ({:.1} s simulated): {} fish, {} fleeing, {} outside bounds, mean |curvature| {:.4}",
            school.time_ticks,
            school.elapsed_ms / 1000.0,
            school.len(),
            fleeing,
            outside,
            mean_curvature
        );

        if cli.snapshot {
            let json =
                serde_json::to_string_pretty(&school).context("failed to serialize school")?;
            println!("{json}");
        }
        Ok(())
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> anyhow::Result<()> {
    native::run()
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is fish_school::web::start, this is just to satisfy the compiler
}
