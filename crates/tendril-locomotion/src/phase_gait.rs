use core::f32::consts::PI;
use serde::{Deserialize, Serialize};
use tendril_articulation::RelaxMode;
use tendril_core::{ConfigError, Vec2};

use crate::{check_positive, check_unit, clamp_unit, GaitInput, GaitOutput, GaitPolicy, GaitStatus};

/// End of the reach band.
pub const REACH_END: f32 = 0.5;
/// End of the drag (weight-shift) band.
pub const DRAG_END: f32 = 0.9;

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PhaseParams {
    pub reach_distance: f32, // peak tip distance from the body
    pub drag_fraction: f32,  // body share of remaining distance per drag frame
    pub deadzone: f32,       // phase only advances while the target is farther than this
    pub decay: f32,          // geometric phase decay toward 0 while idle
    pub offset_jitter: f32,  // random spread added to each limb's angular slot (radians)
}
impl Default for PhaseParams {
    fn default() -> Self {
        Self { reach_distance: 120.0, drag_fraction: 0.05, deadzone: 5.0, decay: 0.9, offset_jitter: 0.3 }
    }
}

impl PhaseParams {
    pub fn validate(&self, group: usize) -> Result<(), ConfigError> {
        check_positive(group, "reach_distance", self.reach_distance)?;
        check_unit(group, "drag_fraction", self.drag_fraction)?;
        check_unit(group, "decay", self.decay)?;
        if !(self.deadzone.is_finite() && self.deadzone >= 0.0) {
            return Err(ConfigError::NonPositive { group, field: "deadzone", value: self.deadzone });
        }
        if !(self.offset_jitter.is_finite() && self.offset_jitter >= 0.0) {
            return Err(ConfigError::NonPositive { group, field: "offset_jitter", value: self.offset_jitter });
        }
        Ok(())
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PhaseBand {
    Reach,
    Drag,
    Recover,
}

impl PhaseBand {
    pub fn of(phase: f32) -> Self {
        let p = clamp_unit(phase);
        if p < REACH_END { PhaseBand::Reach } else if p < DRAG_END { PhaseBand::Drag } else { PhaseBand::Recover }
    }
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct PhaseTick {
    pub phase: f32,
    pub band: PhaseBand,
    pub wrapped: bool,
}

/// The single phase counter shared by every limb of a phased group.
#[derive(Copy, Clone, Debug)]
pub struct PhaseClock {
    phase: f32,
    params: PhaseParams,
    cycles: u64,
}

impl PhaseClock {
    pub fn new(params: PhaseParams) -> Self { Self { phase: 0.0, params, cycles: 0 } }

    #[inline] pub fn phase(&self) -> f32 { self.phase }
    #[inline] pub fn band(&self) -> PhaseBand { PhaseBand::of(self.phase) }
    #[inline] pub fn cycles(&self) -> u64 { self.cycles }
    #[inline] pub fn params(&self) -> &PhaseParams { &self.params }

    /// Out-of-range values are clamped into [0, 1].
    pub fn set_phase(&mut self, phase: f32) { self.phase = clamp_unit(phase); }

    /// Advance by `rate` while the target is away from the body, otherwise decay
    /// back toward 0. Wraps at 1.
    pub fn step(&mut self, body_pos: Vec2, target: Vec2, rate: f32) -> PhaseTick {
        let mut p = clamp_unit(self.phase);
        let mut wrapped = false;
        if target.distance(body_pos) > self.params.deadzone {
            p += clamp_unit(rate);
            if p >= 1.0 {
                p -= p.floor();
                wrapped = true;
                self.cycles += 1;
            }
        } else {
            p *= self.params.decay;
        }
        self.phase = p;
        PhaseTick { phase: p, band: PhaseBand::of(p), wrapped }
    }
}

/// One limb of a phased group: sweeps out toward the target during the reach band,
/// holds its tip in world space while the body is dragged toward it.
#[derive(Clone, Debug)]
pub struct PhasedLimb {
    angle_offset: f32,
    reach_distance: f32,
    tip: Vec2,
    phase: f32,
}

impl PhasedLimb {
    pub fn new(angle_offset: f32, reach_distance: f32, body_pos: Vec2) -> Self {
        Self { angle_offset, reach_distance, tip: body_pos, phase: 0.0 }
    }

    #[inline] pub fn angle_offset(&self) -> f32 { self.angle_offset }
    #[inline] pub fn tip(&self) -> Vec2 { self.tip }
}

impl GaitPolicy for PhasedLimb {
    fn advance(&mut self, input: &GaitInput) -> GaitOutput {
        let body = input.body.pos;
        self.phase = clamp_unit(input.phase);
        if PhaseBand::of(self.phase) != PhaseBand::Drag {
            let to = input.target - body;
            let heading = to.y.atan2(to.x) + self.angle_offset;
            let extent = self.reach_distance * (self.phase * PI).sin();
            self.tip = body + Vec2::from_angle(heading) * extent;
        }
        GaitOutput { anchor: body, tip: self.tip, event: None }
    }

    fn relax_mode(&self) -> RelaxMode { RelaxMode::Bidirectional }

    fn status(&self) -> GaitStatus {
        GaitStatus::Phased { phase: self.phase, band: PhaseBand::of(self.phase) }
    }
}
