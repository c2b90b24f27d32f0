use std::sync::Arc;

use parking_lot::Mutex;
use tendril_core::{vec2, SpeedProfile, Vec2, Viewport};

#[derive(Clone, Debug, Default)]
struct Pending {
    target: Option<Vec2>,
    viewport: Option<Viewport>,
    profile: Option<SpeedProfile>,
    resize_generation: u64,
}

/// What the step sees of the host since the previous frame. Only the latest
/// value of each field survives.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct InputSnapshot {
    pub target: Option<Vec2>,
    pub viewport: Option<Viewport>,
    pub profile: Option<SpeedProfile>,
    pub resize_generation: u64,
}

impl InputSnapshot {
    pub fn is_empty(&self) -> bool {
        self.target.is_none() && self.viewport.is_none() && self.profile.is_none()
    }
}

/// Last-value-wins handoff between the host's event handlers and the frame
/// loop. Cloning shares the cell.
#[derive(Clone, Debug, Default)]
pub struct InputFeed {
    inner: Arc<Mutex<Pending>>,
}

impl InputFeed {
    pub fn new() -> Self { Self::default() }

    /// Pointer move. Non-finite coordinates are dropped.
    pub fn set_target(&self, x: f32, y: f32) {
        if !(x.is_finite() && y.is_finite()) { return; }
        self.inner.lock().target = Some(vec2(x, y));
    }

    pub fn resize(&self, width: f32, height: f32) {
        let mut p = self.inner.lock();
        p.viewport = Some(Viewport::new(width, height));
        p.resize_generation += 1;
    }

    pub fn set_profile(&self, profile: SpeedProfile) {
        self.inner.lock().profile = Some(profile);
    }

    /// Number of resize events ever written, including coalesced ones.
    pub fn resize_generation(&self) -> u64 { self.inner.lock().resize_generation }

    /// Drain pending values for one frame.
    pub fn take(&self) -> InputSnapshot {
        let mut p = self.inner.lock();
        InputSnapshot {
            target: p.target.take(),
            viewport: p.viewport.take(),
            profile: p.profile.take(),
            resize_generation: p.resize_generation,
        }
    }
}
