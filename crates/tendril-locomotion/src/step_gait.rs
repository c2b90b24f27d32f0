use serde::{Deserialize, Serialize};
use tendril_articulation::RelaxMode;
use tendril_core::{BodyFrame, ConfigError, Vec2};

use crate::{check_positive, clamp_unit, smoothstep, GaitEvent, GaitInput, GaitOutput, GaitPolicy, GaitStatus};

/// Progress this close to 1 counts as landed (absorbs f32 accumulation error).
const PROGRESS_EPS: f32 = 1.0e-6;
/// Landings are kept this fraction of the leg's reach from the body.
const LANDING_REACH: f32 = 0.95;

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StepParams {
    pub step_threshold: f32,   // foot-to-home distance that triggers a step
    pub reach_multiplier: f32, // landing lead along body velocity (frames of travel)
    pub home_radius: f32,      // radial distance of home offsets from the body
}
impl Default for StepParams {
    fn default() -> Self { Self { step_threshold: 80.0, reach_multiplier: 10.0, home_radius: 60.0 } }
}

impl StepParams {
    pub fn validate(&self, group: usize) -> Result<(), ConfigError> {
        check_positive(group, "step_threshold", self.step_threshold)?;
        if !(self.reach_multiplier.is_finite() && self.reach_multiplier >= 0.0) {
            return Err(ConfigError::NonPositive { group, field: "reach_multiplier", value: self.reach_multiplier });
        }
        if !(self.home_radius.is_finite() && self.home_radius >= 0.0) {
            return Err(ConfigError::NonPositive { group, field: "home_radius", value: self.home_radius });
        }
        Ok(())
    }
}

#[derive(Copy, Clone, Debug, PartialEq)]
struct Swing {
    from: Vec2,
    landing: Vec2,
}

/// Independent PLANTED/STEPPING foot. The foot stays put in world space until the
/// body drags its home point more than `step_threshold` away, then swings to a
/// landing point projected ahead along the body velocity.
///
/// The swing interpolates from the foot position captured at lift-off, so the path
/// is a pure function of `progress`.
///
/// With a finite `reach` (the leg's full length) a planted foot never sits beyond it:
/// leaving reach triggers a step like crossing the threshold does, and the landing is
/// pulled back inside reach of wherever the body is when the foot comes down.
#[derive(Clone, Debug)]
pub struct StepGait {
    home_offset: Vec2, // body-local
    params: StepParams,
    reach: f32,
    foot: Vec2,
    progress: f32,
    swing: Option<Swing>,
}

impl StepGait {
    /// Planted at its world home for the given body.
    pub fn new(home_offset: Vec2, params: StepParams, body: &BodyFrame) -> Self {
        let mut g = Self { home_offset, params, reach: f32::INFINITY, foot: Vec2::ZERO, progress: 0.0, swing: None };
        g.foot = g.world_home(body);
        g
    }

    /// Limit planted feet and landings to `reach` from the body.
    pub fn with_reach(mut self, reach: f32) -> Self {
        if reach.is_finite() && reach > 0.0 { self.reach = reach; }
        self
    }

    pub fn world_home(&self, body: &BodyFrame) -> Vec2 {
        body.pos + Vec2::from_angle(body.angle).rotate(self.home_offset)
    }

    #[inline] pub fn foot(&self) -> Vec2 { self.foot }
    #[inline] pub fn progress(&self) -> f32 { self.progress }
    #[inline] pub fn is_stepping(&self) -> bool { self.swing.is_some() }
    #[inline] pub fn home_offset(&self) -> Vec2 { self.home_offset }
    #[inline] pub fn params(&self) -> &StepParams { &self.params }
    #[inline] pub fn reach(&self) -> f32 { self.reach }
    pub fn landing(&self) -> Option<Vec2> { self.swing.map(|s| s.landing) }

    /// Put the foot down at `p`, abandoning any swing in flight.
    pub fn plant_at(&mut self, p: Vec2) {
        self.foot = p;
        self.swing = None;
    }

    fn out_of_reach(&self, body: Vec2) -> bool { (self.foot - body).length() > self.reach }

    fn within_reach(&self, body: Vec2, p: Vec2) -> Vec2 {
        let off = p - body;
        let max = self.reach * LANDING_REACH;
        if off.length() > max { body + off.clamp_length_max(max) } else { p }
    }
}

impl GaitPolicy for StepGait {
    fn advance(&mut self, input: &GaitInput) -> GaitOutput {
        let body = &input.body;
        let mut event = None;
        match self.swing {
            None => {
                let home = self.world_home(body);
                if self.foot.distance(home) > self.params.step_threshold || self.out_of_reach(body.pos) {
                    let landing = self.within_reach(body.pos, home + body.vel * self.params.reach_multiplier);
                    log::trace!("step trigger: foot {:?} home {:?} landing {:?}", self.foot, home, landing);
                    self.swing = Some(Swing { from: self.foot, landing });
                    self.progress = 0.0;
                    event = Some(GaitEvent::StepBegan { from: self.foot, landing });
                }
            }
            Some(mut sw) => {
                sw.landing = self.within_reach(body.pos, sw.landing);
                self.swing = Some(sw);
                self.progress = clamp_unit(self.progress + input.gains.step_speed);
                if self.progress >= 1.0 - PROGRESS_EPS {
                    self.progress = 1.0;
                    self.foot = sw.landing;
                    self.swing = None;
                    event = Some(GaitEvent::StepLanded { at: sw.landing });
                } else {
                    self.foot = sw.from.lerp(sw.landing, smoothstep(self.progress));
                }
            }
        }
        GaitOutput { anchor: body.pos, tip: self.foot, event }
    }

    fn relax_mode(&self) -> RelaxMode { RelaxMode::Bidirectional }

    fn status(&self) -> GaitStatus {
        if self.swing.is_some() { GaitStatus::Stepping { progress: self.progress } } else { GaitStatus::Planted }
    }
}
