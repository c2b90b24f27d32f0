use tendril_world::{FrameSnapshot, Inputs, SimWorld, StepReport, World};

/// Tolerance for near-equality between active/shadow frames
#[derive(Copy, Clone, Debug)]
pub struct Eps {
    pub pos: f32, // world units
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Verdict {
    Exact,
    Near,
    Diverged,
}

/// Second world stepped in lockstep with the same inputs; every tick must hash
/// identically to the active world.
pub struct LockstepShadow {
    shadow: World,
    eps: Eps,
    eq_ticks: u64,
    first_divergence: Option<u64>,
}

impl LockstepShadow {
    pub fn new(shadow: World, eps: Eps) -> Self {
        Self { shadow, eps, eq_ticks: 0, first_divergence: None }
    }

    pub fn eq_ticks(&self) -> u64 { self.eq_ticks }
    pub fn first_divergence(&self) -> Option<u64> { self.first_divergence }

    /// Step the shadow with `inputs` and compare against the active world's
    /// post-step state.
    pub fn check(&mut self, inputs: &Inputs, active: &World, report: &StepReport) -> Verdict {
        self.shadow.apply_inputs(inputs);
        let mine = self.shadow.step_once();
        if mine.hash == report.hash {
            self.eq_ticks += 1;
            return Verdict::Exact;
        }
        if self.first_divergence.is_none() {
            self.first_divergence = Some(report.tick);
            log::warn!("shadow diverged at tick {}", report.tick);
        }
        if near_equal_frames(&active.snapshot(), &self.shadow.snapshot(), self.eps) {
            Verdict::Near
        } else {
            Verdict::Diverged
        }
    }
}

pub fn near_equal_frames(a: &FrameSnapshot, b: &FrameSnapshot, eps: Eps) -> bool {
    if a.appendages.len() != b.appendages.len() { return false; }
    if a.body.pos.distance(b.body.pos) > eps.pos { return false; }
    a.appendages.iter().zip(&b.appendages).all(|(x, y)| {
        x.joints.len() == y.joints.len()
            && x.joints.iter().zip(&y.joints).all(|(p, q)| p.distance(*q) <= eps.pos)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tendril_world::{InputEvent, WorldBuilder, WorldConfig};

    fn world(seed: u64) -> World {
        WorldBuilder::new().with_config(WorldConfig::crawler()).with_seed(seed).build().unwrap()
    }

    #[test]
    fn same_seed_stays_exact() {
        let mut active = world(4);
        let mut sh = LockstepShadow::new(world(4), Eps { pos: 1e-3 });
        for t in 0..120u64 {
            let inputs = Inputs { tick_index: t, events: vec![InputEvent::SetTarget { x: 50.0 + t as f32, y: 90.0 }] };
            active.apply_inputs(&inputs);
            let r = active.step_once();
            assert_eq!(sh.check(&inputs, &active, &r), Verdict::Exact);
        }
        assert_eq!(sh.eq_ticks(), 120);
        assert_eq!(sh.first_divergence(), None);
    }

    #[test]
    fn different_seed_is_reported() {
        let mut active = world(4);
        let mut sh = LockstepShadow::new(world(5), Eps { pos: 1e-3 });
        let inputs = Inputs::default();
        active.apply_inputs(&inputs);
        let r = active.step_once();
        assert_ne!(sh.check(&inputs, &active, &r), Verdict::Exact);
        assert_eq!(sh.first_divergence(), Some(1));
    }
}
