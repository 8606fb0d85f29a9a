use std::f64::consts::PI;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use plotters::style::{register_font, FontStyle};
use swarm_canvas::prelude::*;
use tracing::{info, warn};

/// Noisy velocity-model swarm driven around a square path.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Number of simulated robots
    #[arg(short = 'n', long, default_value_t = 1000)]
    robots: usize,

    /// Seed for the process noise; random if omitted
    #[arg(short, long)]
    seed: Option<u64>,

    /// Simulation time step [s]
    #[arg(long, default_value_t = 0.01)]
    dt: f64,

    /// Simulated seconds between snapshots
    #[arg(long, default_value_t = 2.0)]
    draw_interval: f64,

    /// Keep only the latest snapshot instead of the whole trail
    #[arg(long)]
    no_trail: bool,

    /// TTF font used for the caption
    #[arg(long)]
    font: Option<PathBuf>,

    /// Caption drawn under the logo
    #[arg(long, default_value = "")]
    caption: String,

    /// Image pasted in the top-left corner
    #[arg(long)]
    logo: Option<PathBuf>,

    #[arg(short, long, default_value = DEFAULT_OUTPUT)]
    output: PathBuf,
}

/// One leg of the commanded path.
struct Leg {
    nu: f64,
    omega: f64,
    duration: f64,
    snapshots: bool,
}

fn main() -> Result<()> {
    init_tracing();
    let args = Args::parse();

    let mut canvas = background(&args)?;
    let mut swarm = Swarm::new(args.robots, Pose::default(), MotionNoise::default());
    let mut sampler = match args.seed {
        Some(seed) => NoiseSampler::new(seed),
        None => NoiseSampler::from_entropy(),
    };

    canvas.set_point_color(RGBColor(0, 0, 200));
    canvas.set_line_color(RGBColor(0, 180, 0));
    canvas.set_line_width(1)?;

    let turn = PI / 2.0 / 0.1;
    let legs = [
        Leg { nu: 1.0, omega: 0.0, duration: 6.0, snapshots: true },
        Leg { nu: 0.0, omega: 0.1, duration: turn, snapshots: false },
        Leg { nu: 1.0, omega: 0.0, duration: 6.0, snapshots: true },
        Leg { nu: 0.0, omega: 0.1, duration: turn, snapshots: false },
        Leg { nu: 1.0, omega: 0.0, duration: 13.0, snapshots: true },
    ];

    let draw_step = ((args.draw_interval / args.dt) as usize).max(1);
    for leg in legs.iter() {
        let steps = (leg.duration / args.dt).ceil() as usize;
        for i in 0..steps {
            swarm.one_step(leg.nu, leg.omega, args.dt, &mut sampler);
            if leg.snapshots && i % draw_step == 0 {
                if args.no_trail {
                    canvas.clear();
                }
                let visible = swarm.plot(&mut canvas);
                let (stat, _) = swarm.draw_statistic(&mut canvas)?;
                info!(
                    visible,
                    xg = stat.xg,
                    yg = stat.yg,
                    lambda = stat.lambda,
                    "snapshot"
                );
            }
        }
    }

    canvas.save(&args.output)?;
    info!(output = ?args.output, "wrote result");
    Ok(())
}

/// Static frame: window geometry, logo, caption and the commanded path.
fn background(args: &Args) -> Result<Canvas> {
    let config = CanvasConfig::default()
        .with_resolution(0.015)?
        .with_width(20.0)?
        .with_height(10.0)?
        .with_origin_from_left(10.0)?
        .with_origin_from_bottom(1.0)?;
    let mut canvas = Canvas::new(config);

    if let Some(path) = &args.logo {
        match load_rgb(path) {
            Ok(logo) => canvas.include_image(-10.0, 9.0, &logo),
            Err(e) => warn!("skipping logo: {}", e),
        }
    }

    if let Some(path) = &args.font {
        let bytes = std::fs::read(path)
            .with_context(|| format!("failed to read font {}", path.display()))?;
        let bytes: &'static [u8] = Box::leak(bytes.into_boxed_slice());
        register_font("sans-serif", FontStyle::Normal, bytes)
            .map_err(|_| anyhow::anyhow!("invalid font {}", path.display()))?;
        canvas.set_line_color(RGBColor(0, 0, 0));
        canvas.text(-10.0, 7.0, &args.caption)?;
    }

    canvas.set_line_width(2)?;
    canvas.set_line_color(RGBColor(180, 0, 0));
    canvas.line(0.0, 0.0, 6.0, 0.0)?;
    canvas.line(6.0, 0.0, 6.0, 6.0)?;
    canvas.line(6.0, 6.0, -6.0, 6.0)?;

    canvas.hold();
    Ok(canvas)
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();
}
