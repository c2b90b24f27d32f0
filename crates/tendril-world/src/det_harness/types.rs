use serde::{Deserialize, Serialize};
use tendril_core::SpeedProfile;

/// What the harness expects from any sim world (`World` implements this).
pub trait SimWorld {
    fn step_once(&mut self) -> StepReport;
    fn generation(&self) -> u64;
    fn step_hash(&self) -> [u8; 32];
    fn apply_inputs(&mut self, inputs: &Inputs);
}

/// Minimal per-step report used for provenance and checks.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct StepReport {
    pub tick: u64,
    pub generation: u64,
    pub hash: [u8; 32],
    pub appendages: u32,
    pub stepping: u32,
    pub max_residual: f32,
    pub reseeded: bool,
}

/// On-disk inputs (tagged). Tags are stable.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InputEvent {
    SetTarget { x: f32, y: f32 },
    Resize { width: f32, height: f32 },
    SetProfile { profile: SpeedProfile },
}

/// Events to apply before stepping tick `tick_index`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Inputs {
    pub tick_index: u64,
    #[serde(default)]
    pub events: Vec<InputEvent>,
}
