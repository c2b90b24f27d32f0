// Headless bench: runs a world config along a scripted or generated pointer path,
// optionally in lockstep with a shadow world, and reports hashes and step timings.

mod driver;
mod perf;
mod shadow;

use std::path::PathBuf;
use std::time::Instant;

use anyhow::{anyhow, Result};
use clap::Parser;
use driver::{Driver, PointerPath};
use perf::StepTimer;
use shadow::{Eps, LockstepShadow, Verdict};
use tendril_core::{SpeedProfile, Viewport};
use tendril_io::{config_hash, hex32, load_config, load_script, FrameWriter};
use tendril_viz::DebugSettings;
use tendril_world::{SimWorld, World, WorldBuilder, WorldConfig, DEFAULT_SEED};

// ---------- tiny env helpers ----------
fn env_u32(key: &str, default: u32) -> u32 {
    std::env::var(key).ok().and_then(|s| s.parse::<u32>().ok()).unwrap_or(default)
}

#[derive(Parser, Debug)]
#[command(name = "tendril-bench", version, about = "Run a tendril world headless and report hashes and timings")]
struct Opts {
    /// World config JSON (overrides --preset)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Preset: spider | crawler | tentacles
    #[arg(long, default_value = "spider")]
    preset: String,

    /// Speed profile override
    #[arg(long)]
    profile: Option<SpeedProfile>,

    #[arg(long, default_value_t = DEFAULT_SEED)]
    seed: u64,

    /// Ticks to run (default: $TENDRIL_TICKS or 600)
    #[arg(long)]
    ticks: Option<u32>,

    #[arg(long, default_value_t = 800.0)]
    width: f32,

    #[arg(long, default_value_t = 600.0)]
    height: f32,

    /// Input script (JSON array of tick-stamped events); default is a generated pointer path
    #[arg(long)]
    script: Option<PathBuf>,

    /// Write every frame snapshot as JSONL here
    #[arg(long)]
    jsonl: Option<PathBuf>,

    /// Run a second world in lockstep and report the first diverging tick
    #[arg(long)]
    shadow: bool,

    /// Print step latency percentiles
    #[arg(long)]
    perf: bool,

    /// Log a debug block every N ticks (default: $TENDRIL_PRINT_EVERY or 0)
    #[arg(long)]
    print_every: Option<u32>,

    /// Dump the event ledger every N ticks into --ledger-dir
    #[arg(long, default_value_t = 0)]
    json_every: u32,

    #[arg(long, default_value = "out")]
    ledger_dir: PathBuf,
}

fn resolve_config(opt: &Opts) -> Result<WorldConfig> {
    let cfg = match &opt.config {
        Some(path) => load_config(path)?,
        None => WorldConfig::preset(&opt.preset)
            .ok_or_else(|| anyhow!("unknown preset {:?} (expected spider, crawler or tentacles)", opt.preset))?,
    };
    Ok(match opt.profile {
        Some(p) => cfg.with_profile(p),
        None => cfg,
    })
}

fn build_world(opt: &Opts, cfg: &WorldConfig, debug: DebugSettings) -> Result<World> {
    Ok(WorldBuilder::new()
        .with_config(cfg.clone())
        .with_seed(opt.seed)
        .with_viewport(opt.width, opt.height)
        .with_debug(debug)
        .with_ledger_dir(&opt.ledger_dir)
        .build()?)
}

/* ====================== MAIN ====================== */
fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let opt = Opts::parse();

    let ticks = opt.ticks.unwrap_or_else(|| env_u32("TENDRIL_TICKS", 600));
    let print_every = opt.print_every.unwrap_or_else(|| env_u32("TENDRIL_PRINT_EVERY", 0));
    let cfg = resolve_config(&opt)?;
    log::info!(
        "config {} groups={} appendages={} profile={} seed=0x{:x}",
        &hex32(config_hash(&cfg)?)[..16], cfg.groups.len(), cfg.appendage_count(), cfg.profile, opt.seed
    );

    let debug = DebugSettings {
        print_every,
        show_body: true,
        show_appendages: true,
        max_lines: 10,
        json_every: opt.json_every,
    };
    let mut world = build_world(&opt, &cfg, debug)?;
    // the shadow stays quiet; only the active world logs and dumps
    let mut shadow = if opt.shadow {
        Some(LockstepShadow::new(build_world(&opt, &cfg, DebugSettings::default())?, Eps { pos: 1.0e-3 }))
    } else {
        None
    };

    let mut driver = match &opt.script {
        Some(path) => Driver::Script { script: load_script(path)?, cursor: 0 },
        None => Driver::Pointer(PointerPath::new(opt.seed, Viewport::new(opt.width, opt.height))),
    };
    let mut frames = match &opt.jsonl {
        Some(path) => Some(FrameWriter::create(path)?),
        None => None,
    };

    let mut timer = StepTimer::with_capacity(ticks as usize);
    let mut reseeds = 0u32;
    let mut peak_stepping = 0u32;
    let mut worst_residual = 0.0f32;
    let mut near_ticks = 0u32;

    for tick in 0..ticks as u64 {
        let inputs = driver.inputs_for(tick);
        world.apply_inputs(&inputs);

        let t0 = Instant::now();
        let report = world.step_once();
        timer.record(t0.elapsed());

        reseeds += report.reseeded as u32;
        peak_stepping = peak_stepping.max(report.stepping);
        worst_residual = worst_residual.max(report.max_residual);

        if let Some(sh) = shadow.as_mut() {
            if sh.check(&inputs, &world, &report) == Verdict::Near {
                near_ticks += 1;
            }
        }
        if let Some(w) = frames.as_mut() {
            w.write(&world.snapshot())?;
        }
    }

    if let Some(w) = frames {
        let n = w.finish()?;
        if let Some(path) = &opt.jsonl {
            println!("frames:            {} -> {}", n, path.display());
        }
    }

    println!("--- RUN SUMMARY ({} ticks, gen {}) ---", ticks, world.generation());
    println!("reseeds:           {}", reseeds);
    println!("peak stepping:     {}/{}", peak_stepping, world.appendages().len());
    println!("worst residual:    {:.5}", worst_residual);
    println!("final hash:        {}", hex32(world.step_hash()));

    if let Some(sh) = &shadow {
        match sh.first_divergence() {
            None => println!("shadow:            exact for {} ticks", sh.eq_ticks()),
            Some(t) => println!("shadow:            DIVERGED at tick {} ({} exact, {} within eps)", t, sh.eq_ticks(), near_ticks),
        }
    }

    if opt.perf {
        let s = timer.summary();
        println!("step latency (ms): mean={:.4}  p50={:.4}  p95={:.4}  p99={:.4}", s.mean, s.p50, s.p95, s.p99);
    }

    if shadow.as_ref().is_some_and(|s| s.first_divergence().is_some()) {
        return Err(anyhow!("shadow world diverged"));
    }
    Ok(())
}
