//! Comet Ring entry point
//!
//! Launches one comet per player and drives the engine from a repeating
//! timer until both comets have stopped.

use std::io;
use std::ops::ControlFlow;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};

use comet_ring::platform::{RepeatingTimer, TickClock};
use comet_ring::renderer::{ConsoleSink, FrameSink, NullSink, Palette, RingLayoutSink};
use comet_ring::sim::{Player, SimulationEngine};
use comet_ring::{RingConfig, Scoreboard};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// JSON config file (defaults are used when omitted)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Tick period in seconds
    #[arg(short, long)]
    interval: Option<f64>,

    /// Seed for launch speed jitter
    #[arg(long)]
    seed: Option<u64>,

    /// Launch speed jitter (+/- nodes per second)
    #[arg(long)]
    jitter: Option<f64>,

    /// How frames are drawn
    #[arg(short, long, value_enum, default_value = "line")]
    layout: Layout,

    /// Truecolor glyphs instead of palette digits (line layout)
    #[arg(long)]
    ansi: bool,

    /// Clear the terminal before each frame (line layout)
    #[arg(long)]
    clear: bool,

    /// Give up after this many ticks
    #[arg(long, default_value_t = 10_000)]
    max_ticks: u64,

    /// Start position of player one's comet
    #[arg(long, default_value_t = 0.0)]
    start_one: f64,

    /// Start position of player two's comet
    #[arg(long, default_value_t = 0.0)]
    start_two: f64,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum Layout {
    Line,
    Ring,
    Headless,
}

/// Everything one session mutates, owned by the timer callback
struct Session {
    engine: SimulationEngine,
    sink: Box<dyn FrameSink + Send>,
    clock: TickClock,
    scoreboard: Scoreboard,
    max_ticks: u64,
}

impl Session {
    fn step(&mut self) -> ControlFlow<()> {
        let elapsed = self.clock.elapsed();
        self.engine.tick(elapsed, self.sink.as_mut());
        self.scoreboard.record_all(&self.engine.drain_events());

        if self.engine.is_idle() {
            log::info!("All comets resolved after {} ticks", self.engine.tick_count());
            return ControlFlow::Break(());
        }
        if self.engine.tick_count() >= self.max_ticks {
            log::warn!("Stopping at tick limit ({})", self.max_ticks);
            return ControlFlow::Break(());
        }
        ControlFlow::Continue(())
    }
}

fn load_config(args: &Args) -> Result<RingConfig> {
    let mut config = match &args.config {
        Some(path) => RingConfig::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => RingConfig::default(),
    };

    if let Some(interval) = args.interval {
        config.tick_interval_secs = interval;
    }
    if let Some(seed) = args.seed {
        config.seed = seed;
    }
    if let Some(jitter) = args.jitter {
        config.launch_jitter = jitter;
    }
    config.validate().context("invalid configuration")?;
    Ok(config)
}

fn build_sink(args: &Args, config: &RingConfig) -> Box<dyn FrameSink + Send> {
    let palette = Palette::from_config(config);
    match args.layout {
        Layout::Line => Box::new(
            ConsoleSink::new(io::stdout(), palette)
                .with_ansi(args.ansi)
                .with_clear(args.clear),
        ),
        Layout::Ring => {
            let radius = (config.num_nodes as f32 / std::f32::consts::TAU).max(4.0);
            Box::new(RingLayoutSink::new(io::stdout(), palette, radius))
        }
        Layout::Headless => Box::new(NullSink),
    }
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let config = load_config(&args)?;
    let interval = Duration::from_secs_f64(config.tick_interval_secs);
    let sink = build_sink(&args, &config);

    let mut engine = SimulationEngine::new(config).context("building engine")?;
    log::info!(
        "Comet Ring starting ({} nodes, {} domes, tick {:?})",
        engine.ring().num_nodes(),
        engine.domes().len(),
        interval
    );
    engine.launch(Player::One, args.start_one);
    engine.launch(Player::Two, args.start_two);

    let session = Arc::new(Mutex::new(Session {
        engine,
        sink,
        clock: TickClock::new(),
        scoreboard: Scoreboard::new(),
        max_ticks: args.max_ticks,
    }));

    let worker = Arc::clone(&session);
    let mut timer = RepeatingTimer::start(interval, move || match worker.lock() {
        Ok(mut session) => session.step(),
        Err(_) => ControlFlow::Break(()),
    });
    timer.join();

    let session = session
        .lock()
        .map_err(|_| anyhow::anyhow!("session state poisoned"))?;
    for player in [Player::One, Player::Two] {
        let tally = session.scoreboard.tally(player);
        println!(
            "Player {}: {} hit(s), {} miss(es), {} dome(s) held",
            player.number(),
            tally.hits,
            tally.misses,
            session.scoreboard.domes_owned(player)
        );
    }
    match session.scoreboard.leader() {
        Some(player) => println!("Player {} leads", player.number()),
        None => println!("Tied"),
    }

    Ok(())
}
