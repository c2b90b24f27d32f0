use std::collections::VecDeque;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tendril_core::{schedule_digest, StepStage};

#[derive(Default)]
pub struct ScheduleRecorder { stages: Vec<StepStage> }

impl ScheduleRecorder {
    pub fn new() -> Self { Self { stages: Vec::new() } }
    pub fn push(&mut self, s: StepStage) { self.stages.push(s); }
    pub fn clear(&mut self) { self.stages.clear(); }
    pub fn stages(&self) -> &[StepStage] { &self.stages }
    pub fn digest(&self) -> [u8; 32] { schedule_digest(&self.stages) }
}

/// Periodic console/JSONL output knobs. `0` disables a cadence.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DebugSettings {
    pub print_every: u32,
    pub show_body: bool,
    pub show_appendages: bool,
    pub max_lines: usize,
    pub json_every: u32,
}
impl Default for DebugSettings {
    fn default() -> Self {
        Self { print_every: 0, show_body: true, show_appendages: false, max_lines: 16, json_every: 0 }
    }
}

impl DebugSettings {
    #[inline]
    pub fn print_due(&self, tick: u64) -> bool { due(self.print_every, tick) }
    #[inline]
    pub fn json_due(&self, tick: u64) -> bool { due(self.json_every, tick) }
}

#[inline]
fn due(every: u32, tick: u64) -> bool { every != 0 && tick % every as u64 == 0 }

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LedgerEvent {
    Reseed { tick: u64, generation: u64, appendages: u32 },
    StepBegan { tick: u64, id: u32, from: [f32; 2], landing: [f32; 2] },
    StepLanded { tick: u64, id: u32, at: [f32; 2] },
    PhaseWrapped { tick: u64, group: u16, cycles: u64 },
}

impl LedgerEvent {
    pub fn tick(&self) -> u64 {
        match *self {
            LedgerEvent::Reseed { tick, .. }
            | LedgerEvent::StepBegan { tick, .. }
            | LedgerEvent::StepLanded { tick, .. }
            | LedgerEvent::PhaseWrapped { tick, .. } => tick,
        }
    }
}

/// Bounded event history; the oldest events fall off once `cap` is reached.
pub struct Ledger {
    cap: usize,
    events: VecDeque<LedgerEvent>,
    dropped: u64,
}

impl Ledger {
    pub fn new(cap: usize) -> Self {
        Self { cap: cap.max(1), events: VecDeque::with_capacity(cap.min(4096)), dropped: 0 }
    }

    pub fn push(&mut self, e: LedgerEvent) {
        if self.events.len() == self.cap {
            self.events.pop_front();
            self.dropped += 1;
        }
        self.events.push_back(e);
    }

    pub fn clear(&mut self) { self.events.clear(); }
    pub fn len(&self) -> usize { self.events.len() }
    pub fn is_empty(&self) -> bool { self.events.is_empty() }
    pub fn dropped(&self) -> u64 { self.dropped }
    pub fn iter(&self) -> impl Iterator<Item = &LedgerEvent> { self.events.iter() }

    /// One JSON object per line.
    pub fn write_jsonl<W: Write>(&self, mut w: W) -> io::Result<()> {
        for e in &self.events {
            serde_json::to_writer(&mut w, e)?;
            w.write_all(b"\n")?;
        }
        Ok(())
    }

    /// Dump to `<dir>/ledger_<tick>.jsonl`.
    pub fn dump_jsonl(&self, dir: &Path, tick: u64) -> io::Result<PathBuf> {
        fs::create_dir_all(dir)?;
        let path = dir.join(format!("ledger_{tick:08}.jsonl"));
        let f = fs::File::create(&path)?;
        self.write_jsonl(io::BufWriter::new(f))?;
        Ok(path)
    }
}
