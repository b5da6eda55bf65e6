//! Dot Dancer entry point
//!
//! Parses the command line, then either runs the interactive fixed-rate loop
//! in a raw-mode terminal or a headless batch of ticks.

use std::io::{self, Write};
use std::path::PathBuf;
use std::thread;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;

use dot_dancer::platform::{InputSlot, RawTerminal, spawn_reader};
use dot_dancer::sim::{SessionReport, Simulation};
use dot_dancer::{Game, Settings};

/// Intercept the dots before they reach you.
/// Keys: h strikes left, l strikes right, q quits.
#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// JSON settings file
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// RNG seed (random when omitted)
    #[arg(long)]
    seed: Option<u64>,

    /// Per-side spawn probability per tick
    #[arg(long, value_name = "P")]
    dot_probability: Option<f64>,

    /// Ticks per second
    #[arg(long, value_name = "HZ")]
    tick_hz: Option<u32>,

    /// Run this many ticks without a terminal or input, then report
    #[arg(long, value_name = "TICKS")]
    headless: Option<u64>,

    /// Print the session report as JSON
    #[arg(long)]
    json: bool,
}

impl Cli {
    fn settings(&self) -> Result<Settings> {
        let mut settings = match &self.config {
            Some(path) => Settings::load(path)
                .with_context(|| format!("failed to load settings from {}", path.display()))?,
            None => Settings::default(),
        };
        if let Some(seed) = self.seed {
            settings.seed = Some(seed);
        }
        if let Some(prob) = self.dot_probability {
            settings.dot_probability = prob;
        }
        if let Some(hz) = self.tick_hz {
            settings.tick_hz = hz;
        }
        settings.validate().context("invalid settings")?;
        Ok(settings)
    }
}

fn main() -> Result<()> {
    // Frames share the screen with stderr, so stay quiet unless asked
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    let settings = cli.settings()?;
    let seed = settings.resolve_seed();
    let mut sim = Simulation::with_settings(settings, seed);
    log::info!("Dot Dancer starting with seed {}", seed);

    let report = match cli.headless {
        Some(ticks) => run_headless(&mut sim, ticks),
        None => run_interactive(&mut sim)?,
    };

    print_report(&report, cli.json)
}

/// Tick without input and report
fn run_headless(sim: &mut Simulation, ticks: u64) -> SessionReport {
    for _ in 0..ticks {
        sim.tick();
    }
    sim.quit()
}

/// Fixed-rate loop: take the pending key, tick, redraw
fn run_interactive(sim: &mut Simulation) -> Result<SessionReport> {
    let interval = sim.settings.tick_interval();
    let mut term = RawTerminal::enter().context("failed to enter raw mode")?;

    let slot = InputSlot::new();
    spawn_reader(slot.clone()).context("failed to start input reader")?;

    let mut next_tick = Instant::now() + interval;
    loop {
        let now = Instant::now();
        if next_tick > now {
            thread::sleep(next_tick - now);
        }
        next_tick += interval;

        if !sim.apply_input(slot.take()) {
            break;
        }
        sim.tick();
        sim.draw(term.out()).context("failed to draw frame")?;
    }

    let report = sim.quit();
    drop(term);
    Ok(report)
}

fn print_report(report: &SessionReport, json: bool) -> Result<()> {
    let mut out = io::stdout().lock();
    if json {
        let text = serde_json::to_string_pretty(report).context("failed to encode report")?;
        writeln!(out, "{text}")?;
    } else {
        write!(out, "{report}")?;
    }
    out.flush()?;
    Ok(())
}
