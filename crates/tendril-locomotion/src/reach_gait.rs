use serde::{Deserialize, Serialize};
use tendril_articulation::RelaxMode;
use tendril_core::{ConfigError, Vec2};

use crate::{check_positive, check_unit, wobble, GaitInput, GaitOutput, GaitPolicy, GaitStatus};

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ReachParams {
    pub smoothing: f32,        // per-frame lerp factor of the tip toward its goal
    pub wobble_amplitude: f32,
    pub wobble_frequency: f32, // rad/s
}
impl Default for ReachParams {
    fn default() -> Self { Self { smoothing: 0.1, wobble_amplitude: 12.0, wobble_frequency: 2.0 } }
}

impl ReachParams {
    pub fn validate(&self, group: usize) -> Result<(), ConfigError> {
        check_unit(group, "smoothing", self.smoothing)?;
        check_positive(group, "wobble_frequency", self.wobble_frequency)?;
        if !(self.wobble_amplitude.is_finite() && self.wobble_amplitude >= 0.0) {
            return Err(ConfigError::NonPositive { group, field: "wobble_amplitude", value: self.wobble_amplitude });
        }
        Ok(())
    }
}

/// Tentacle: the tip eases toward the target plus a private wobble and the rest of
/// the chain trails behind it.
#[derive(Clone, Debug)]
pub struct ReachGait {
    phase_offset: f32,
    params: ReachParams,
    tip: Vec2,
}

impl ReachGait {
    pub fn new(phase_offset: f32, params: ReachParams, start: Vec2) -> Self {
        Self { phase_offset, params, tip: start }
    }

    #[inline] pub fn tip(&self) -> Vec2 { self.tip }
    #[inline] pub fn phase_offset(&self) -> f32 { self.phase_offset }

    pub fn goal(&self, input: &GaitInput) -> Vec2 {
        let p = &self.params;
        input.target + wobble(input.ctx.time(), p.wobble_frequency, p.wobble_amplitude, self.phase_offset)
    }
}

impl GaitPolicy for ReachGait {
    fn advance(&mut self, input: &GaitInput) -> GaitOutput {
        let goal = self.goal(input);
        self.tip = self.tip.lerp(goal, self.params.smoothing);
        GaitOutput { anchor: input.body.pos, tip: self.tip, event: None }
    }

    fn relax_mode(&self) -> RelaxMode { RelaxMode::Trailing }

    fn status(&self) -> GaitStatus { GaitStatus::Reaching }
}
