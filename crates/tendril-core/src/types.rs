use core::f32::consts::{PI, TAU};
use serde::{Deserialize, Serialize};
use crate::Scalar;

pub type Vec2 = glam::Vec2;

#[inline] pub fn vec2(x: Scalar, y: Scalar) -> Vec2 { Vec2::new(x, y) }

/// Body state as seen by gait policies for one frame.
#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct BodyFrame {
    pub pos: Vec2,
    pub vel: Vec2,
    pub angle: Scalar, // radians, only meaningful for oriented bodies
}

/// Host surface size in world units (pixels for a canvas host).
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Viewport { pub width: Scalar, pub height: Scalar }

impl Viewport {
    pub fn new(width: Scalar, height: Scalar) -> Self { Self { width, height } }
    pub fn center(&self) -> Vec2 { vec2(self.width * 0.5, self.height * 0.5) }
    pub fn is_valid(&self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width >= 0.0 && self.height >= 0.0
    }
}

/// Wrap an angle into (-PI, PI].
#[inline]
pub fn wrap_angle(a: Scalar) -> Scalar {
    let mut r = a % TAU;
    if r <= -PI { r += TAU; }
    if r > PI { r -= TAU; }
    r
}

/// Exponential turn toward `to` along the shortest arc.
#[inline]
pub fn lerp_angle(from: Scalar, to: Scalar, t: Scalar) -> Scalar {
    wrap_angle(from + wrap_angle(to - from) * t)
}
