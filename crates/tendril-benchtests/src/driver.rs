use tendril_core::{vec2, Vec2, Viewport, XorShift64};
use tendril_world::{InputEvent, Inputs};

/// Synthetic pointer: a slow Lissajous orbit with an occasional jump to a
/// random point, which is what makes legs step and tentacles whip.
pub struct PointerPath {
    rng: XorShift64,
    center: Vec2,
    radius: Vec2,
    jump_chance: f32,
    jump: Option<(Vec2, u32)>, // target, ticks left
}

impl PointerPath {
    pub fn new(seed: u64, viewport: Viewport) -> Self {
        Self {
            rng: XorShift64::new(seed ^ 0x9E37_79B9_7F4A_7C15),
            center: viewport.center(),
            radius: vec2(viewport.width * 0.35, viewport.height * 0.35),
            jump_chance: 0.01,
            jump: None,
        }
    }

    pub fn at(&mut self, tick: u64) -> Vec2 {
        if let Some((p, left)) = self.jump {
            self.jump = if left > 1 { Some((p, left - 1)) } else { None };
            return p;
        }
        if self.rng.next_f32() < self.jump_chance {
            let p = self.center + vec2(self.rng.range_f32(-1.2, 1.2), self.rng.range_f32(-1.2, 1.2)) * self.radius;
            self.jump = Some((p, self.rng.range_u32(30, 90)));
            return p;
        }
        let t = tick as f32 / 60.0;
        self.center + vec2((t * 0.7).sin(), (t * 1.1).cos()) * self.radius
    }
}

pub enum Driver {
    Script { script: Vec<Inputs>, cursor: usize },
    Pointer(PointerPath),
}

impl Driver {
    /// Everything scheduled at or before `tick` that has not been handed out yet.
    pub fn inputs_for(&mut self, tick: u64) -> Inputs {
        match self {
            Driver::Script { script, cursor } => {
                let mut events = Vec::new();
                while let Some(next) = script.get(*cursor) {
                    if next.tick_index > tick { break; }
                    events.extend(next.events.iter().cloned());
                    *cursor += 1;
                }
                Inputs { tick_index: tick, events }
            }
            Driver::Pointer(path) => {
                let p = path.at(tick);
                Inputs { tick_index: tick, events: vec![InputEvent::SetTarget { x: p.x, y: p.y }] }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn script_events_are_released_at_their_tick() {
        let mut d = Driver::Script {
            script: vec![
                Inputs { tick_index: 0, events: vec![InputEvent::SetTarget { x: 1.0, y: 1.0 }] },
                Inputs { tick_index: 3, events: vec![InputEvent::SetTarget { x: 2.0, y: 2.0 }] },
                Inputs { tick_index: 3, events: vec![InputEvent::Resize { width: 10.0, height: 10.0 }] },
            ],
            cursor: 0,
        };
        assert_eq!(d.inputs_for(0).events.len(), 1);
        assert!(d.inputs_for(1).events.is_empty());
        assert!(d.inputs_for(2).events.is_empty());
        assert_eq!(d.inputs_for(3).events.len(), 2);
        assert!(d.inputs_for(4).events.is_empty());
    }

    #[test]
    fn generated_path_is_deterministic_and_finite() {
        let vp = Viewport::new(800.0, 600.0);
        let mut a = PointerPath::new(3, vp);
        let mut b = PointerPath::new(3, vp);
        for t in 0..2000 {
            let p = a.at(t);
            assert_eq!(p, b.at(t));
            assert!(p.is_finite());
        }
    }
}
