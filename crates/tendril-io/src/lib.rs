use anyhow::{bail, Context, Result};
use blake3::Hasher;
use std::fs;
use std::io::{BufWriter, Write};
use std::path::Path;
use tendril_world::{FrameSnapshot, Inputs, WorldConfig};

/// Stable blake3 hash of a config's canonical JSON encoding.
pub fn config_hash(cfg: &WorldConfig) -> Result<[u8; 32]> {
    let bytes = serde_json::to_vec(cfg).context("serializing config")?;
    let mut h = Hasher::new();
    h.update(b"TENDRILCFGv1\0");
    h.update(&(bytes.len() as u64).to_le_bytes());
    h.update(&bytes);
    Ok(*h.finalize().as_bytes())
}

/// Write config to JSON at `out_path`. If `pretty=true`, pretty-print JSON.
pub fn write_config_json(cfg: &WorldConfig, out_path: &Path, pretty: bool) -> Result<()> {
    let json = if pretty { serde_json::to_string_pretty(cfg)? } else { serde_json::to_string(cfg)? };
    fs::write(out_path, json).with_context(|| format!("writing {}", out_path.display()))?;
    Ok(())
}

/// Parse and validate a config.
pub fn parse_config(json: &str) -> Result<WorldConfig> {
    let cfg: WorldConfig = serde_json::from_str(json).context("parsing world config")?;
    cfg.validate().context("invalid world config")?;
    Ok(cfg)
}

pub fn load_config(path: &Path) -> Result<WorldConfig> {
    let s = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    parse_config(&s).with_context(|| format!("in {}", path.display()))
}

/// A script is a JSON array of `Inputs`, sorted by tick.
pub fn parse_script(json: &str) -> Result<Vec<Inputs>> {
    let script: Vec<Inputs> = serde_json::from_str(json).context("parsing input script")?;
    if let Some(w) = script.windows(2).find(|w| w[1].tick_index < w[0].tick_index) {
        bail!("input script out of order: tick {} after tick {}", w[1].tick_index, w[0].tick_index);
    }
    Ok(script)
}

pub fn load_script(path: &Path) -> Result<Vec<Inputs>> {
    let s = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    parse_script(&s).with_context(|| format!("in {}", path.display()))
}

/// Appends one `FrameSnapshot` per line.
pub struct FrameWriter<W: Write> {
    out: BufWriter<W>,
    frames: u64,
}

impl FrameWriter<fs::File> {
    pub fn create(path: &Path) -> Result<Self> {
        let f = fs::File::create(path).with_context(|| format!("creating {}", path.display()))?;
        Ok(Self::new(f))
    }
}

impl<W: Write> FrameWriter<W> {
    pub fn new(w: W) -> Self { Self { out: BufWriter::new(w), frames: 0 } }

    pub fn write(&mut self, frame: &FrameSnapshot) -> Result<()> {
        serde_json::to_writer(&mut self.out, frame).context("encoding frame")?;
        self.out.write_all(b"\n")?;
        self.frames += 1;
        Ok(())
    }

    pub fn frames(&self) -> u64 { self.frames }

    /// Flush and return the number of frames written.
    pub fn finish(mut self) -> Result<u64> {
        self.out.flush().context("flushing frames")?;
        Ok(self.frames)
    }
}

/// Utility: hex-encode a 32-byte hash.
pub fn hex32(x: [u8; 32]) -> String {
    let mut s = String::with_capacity(64);
    for b in &x {
        use std::fmt::Write;
        let _ = write!(s, "{:02x}", b);
    }
    s
}
