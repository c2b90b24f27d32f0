use serde::{Deserialize, Serialize};
use tendril_articulation::RelaxMode;
use tendril_core::{BodyFrame, ConfigError, ProfileGains, StepCtx, Vec2};

mod step_gait;
mod phase_gait;
mod reach_gait;

pub use step_gait::{StepGait, StepParams};
pub use phase_gait::{PhaseBand, PhaseClock, PhaseParams, PhaseTick, PhasedLimb, REACH_END, DRAG_END};
pub use reach_gait::{ReachGait, ReachParams};

/// Everything a gait may look at for one frame. The body has already moved.
#[derive(Copy, Clone, Debug)]
pub struct GaitInput {
    pub body: BodyFrame,
    pub target: Vec2,
    pub ctx: StepCtx,
    pub gains: ProfileGains,
    pub phase: f32, // shared group phase; ignored by unphased gaits
}

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum GaitEvent {
    StepBegan { from: Vec2, landing: Vec2 },
    StepLanded { at: Vec2 },
}

/// Where the chain ends must be pinned this frame.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct GaitOutput {
    pub anchor: Vec2,
    pub tip: Vec2,
    pub event: Option<GaitEvent>,
}

/// Styling-relevant state exposed to the renderer.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "lowercase")]
pub enum GaitStatus {
    Planted,
    Stepping { progress: f32 },
    Phased { phase: f32, band: PhaseBand },
    Reaching,
}

impl GaitStatus {
    pub fn is_stepping(&self) -> bool { matches!(self, GaitStatus::Stepping { .. }) }
}

pub trait GaitPolicy {
    fn advance(&mut self, input: &GaitInput) -> GaitOutput;
    fn relax_mode(&self) -> RelaxMode;
    fn status(&self) -> GaitStatus;
}

/// Per-group gait selection, chosen at construction.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "gait", rename_all = "lowercase")]
pub enum GaitSpec {
    Stepping(StepParams),
    Phased(PhaseParams),
    Reaching(ReachParams),
}

impl GaitSpec {
    pub fn name(&self) -> &'static str {
        match self {
            GaitSpec::Stepping(_) => "stepping",
            GaitSpec::Phased(_) => "phased",
            GaitSpec::Reaching(_) => "reaching",
        }
    }
    pub fn validate(&self, group: usize) -> Result<(), ConfigError> {
        match self {
            GaitSpec::Stepping(p) => p.validate(group),
            GaitSpec::Phased(p) => p.validate(group),
            GaitSpec::Reaching(p) => p.validate(group),
        }
    }
    /// Phased groups move the body themselves instead of pursuing the target.
    pub fn drives_body(&self) -> bool { matches!(self, GaitSpec::Phased(_)) }
    /// Legged bodies track a heading so home offsets rotate with them.
    pub fn needs_heading(&self) -> bool { matches!(self, GaitSpec::Stepping(_)) }
}

/// One appendage's policy.
#[derive(Clone, Debug)]
pub enum Gait {
    Step(StepGait),
    Phased(PhasedLimb),
    Reach(ReachGait),
}

impl GaitPolicy for Gait {
    fn advance(&mut self, input: &GaitInput) -> GaitOutput {
        match self {
            Gait::Step(g) => g.advance(input),
            Gait::Phased(g) => g.advance(input),
            Gait::Reach(g) => g.advance(input),
        }
    }
    fn relax_mode(&self) -> RelaxMode {
        match self {
            Gait::Step(g) => g.relax_mode(),
            Gait::Phased(g) => g.relax_mode(),
            Gait::Reach(g) => g.relax_mode(),
        }
    }
    fn status(&self) -> GaitStatus {
        match self {
            Gait::Step(g) => g.status(),
            Gait::Phased(g) => g.status(),
            Gait::Reach(g) => g.status(),
        }
    }
}

/// Smoothstep ease `t^2 (3 - 2t)` on a clamped `t`.
#[inline]
pub fn smoothstep(t: f32) -> f32 {
    let t = clamp_unit(t);
    t * t * (3.0 - 2.0 * t)
}

/// Clamp to [0, 1]; non-finite values collapse to 0.
#[inline]
pub fn clamp_unit(x: f32) -> f32 {
    if x.is_finite() { x.clamp(0.0, 1.0) } else { 0.0 }
}

/// Small per-appendage sinusoidal perturbation; `offset` decorrelates limbs.
#[inline]
pub fn wobble(time: f32, frequency: f32, amplitude: f32, offset: f32) -> Vec2 {
    let a = time * frequency + offset;
    Vec2::new(a.sin(), (a * 1.37 + offset * 0.7).cos()) * amplitude
}

pub(crate) fn check_positive(group: usize, field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 { Ok(()) } else { Err(ConfigError::NonPositive { group, field, value }) }
}

pub(crate) fn check_unit(group: usize, field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && (0.0..=1.0).contains(&value) { Ok(()) } else { Err(ConfigError::OutOfUnitRange { group, field, value }) }
}
