use anyhow::{anyhow, Result};
use clap::Parser;
use std::path::PathBuf;
use tendril_core::SpeedProfile;
use tendril_io::{config_hash, hex32, write_config_json};
use tendril_world::WorldConfig;

#[derive(Parser, Debug)]
#[command(name = "cfg_make", version, about = "Write a preset world config to JSON for editing")]
struct Opts {
    /// Preset: spider | crawler | tentacles
    preset: String,

    /// Speed profile baked into the config
    #[arg(long, default_value = "normal")]
    profile: SpeedProfile,

    /// Output path (default: <preset>.world.json)
    #[arg(long)]
    out: Option<PathBuf>,

    /// Pretty-print JSON
    #[arg(long)]
    pretty: bool,
}

fn main() -> Result<()> {
    let opt = Opts::parse();
    let cfg = WorldConfig::preset(&opt.preset)
        .ok_or_else(|| anyhow!("unknown preset {:?} (expected spider, crawler or tentacles)", opt.preset))?
        .with_profile(opt.profile);

    let out = opt.out.unwrap_or_else(|| PathBuf::from(format!("{}.world.json", opt.preset.to_ascii_lowercase())));
    write_config_json(&cfg, &out, opt.pretty)?;

    println!("World config: {}", out.display());
    println!("  groups={} appendages={}", cfg.groups.len(), cfg.appendage_count());
    println!("  hash={}", hex32(config_hash(&cfg)?));
    Ok(())
}
