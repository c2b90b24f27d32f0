use serde::{Deserialize, Serialize};
use tendril_core::{lerp_angle, BodyFrame, ConfigError, Vec2};

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PursuitParams {
    pub deadzone: f32,       // target this close to the body counts as "on" it
    pub decay: f32,          // geometric velocity decay while inside the deadzone
    pub turn_gain: f32,      // exponential heading interpolation per frame
    pub min_turn_speed: f32, // below this speed the heading is left alone
}
impl Default for PursuitParams {
    fn default() -> Self {
        Self { deadzone: 5.0, decay: 0.9, turn_gain: 0.1, min_turn_speed: 1.0e-3 }
    }
}

impl PursuitParams {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.deadzone.is_finite() && self.deadzone >= 0.0) {
            return Err(ConfigError::Pursuit { field: "deadzone", value: self.deadzone });
        }
        if !(0.0..=1.0).contains(&self.decay) {
            return Err(ConfigError::Pursuit { field: "decay", value: self.decay });
        }
        if !(0.0..=1.0).contains(&self.turn_gain) {
            return Err(ConfigError::Pursuit { field: "turn_gain", value: self.turn_gain });
        }
        if !(self.min_turn_speed.is_finite() && self.min_turn_speed >= 0.0) {
            return Err(ConfigError::Pursuit { field: "min_turn_speed", value: self.min_turn_speed });
        }
        Ok(())
    }
}

/// The point every appendage is anchored to.
#[derive(Copy, Clone, Debug)]
pub struct Body {
    pub pos: Vec2,
    pub vel: Vec2,
    pub angle: f32,
    pub oriented: bool, // only legged bodies track a heading
    pub params: PursuitParams,
}
impl Body {
    pub fn new(pos: Vec2, params: PursuitParams, oriented: bool) -> Self {
        Self { pos, vel: Vec2::ZERO, angle: 0.0, oriented, params }
    }

    pub fn frame(&self) -> BodyFrame {
        BodyFrame { pos: self.pos, vel: self.vel, angle: self.angle }
    }

    /// Back to rest at `pos`, heading reset.
    pub fn reset(&mut self, pos: Vec2) {
        self.pos = pos;
        self.vel = Vec2::ZERO;
        self.angle = 0.0;
    }

    #[inline]
    pub fn in_deadzone(&self, target: Vec2) -> bool {
        target.distance(self.pos) <= self.params.deadzone
    }

    /// One frame of damped pursuit: close `gain` of the gap, or coast to a stop
    /// inside the deadzone.
    pub fn pursue(&mut self, target: Vec2, gain: f32) {
        if self.in_deadzone(target) {
            self.vel *= self.params.decay;
        } else {
            self.vel = (target - self.pos) * gain;
            self.pos += self.vel;
        }
        self.turn();
    }

    /// Translate a fixed fraction of the remaining distance toward `target`
    /// (weight shift of the phased gait). Returns the displacement.
    pub fn drag_toward(&mut self, target: Vec2, fraction: f32) -> Vec2 {
        let mv = if self.in_deadzone(target) { Vec2::ZERO } else { (target - self.pos) * fraction };
        self.pos += mv;
        self.vel = mv;
        self.turn();
        mv
    }

    /// Planted frame: no translation, residual velocity decays.
    pub fn hold(&mut self) {
        self.vel *= self.params.decay;
    }

    fn turn(&mut self) {
        if !self.oriented || self.vel.length() <= self.params.min_turn_speed { return; }
        let heading = self.vel.y.atan2(self.vel.x);
        self.angle = lerp_angle(self.angle, heading, self.params.turn_gain);
    }
}
