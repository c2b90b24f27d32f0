use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use tendril_io::{config_hash, hex32, load_config};

#[derive(Parser, Debug)]
#[command(name = "cfg_hash", version, about = "Validate world configs and print their stable hashes")]
struct Opts {
    /// One or more .world.json files
    #[arg(required = true)]
    inputs: Vec<PathBuf>,
}

fn main() -> Result<()> {
    let opt = Opts::parse();
    for path in &opt.inputs {
        let cfg = load_config(path)?;
        println!("{}  {}  (groups={}, appendages={}, profile={})",
                 hex32(config_hash(&cfg)?), path.display(),
                 cfg.groups.len(), cfg.appendage_count(), cfg.profile);
        for (i, g) in cfg.groups.iter().enumerate() {
            println!("  [{i}] {:>9} x{:<3} joints {}..={} rest {:.1}..{:.1} iters {}",
                     g.gait.name(), g.count, g.joints.min, g.joints.max,
                     g.rest_length.min, g.rest_length.max, g.iterations);
        }
    }
    Ok(())
}
