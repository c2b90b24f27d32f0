use serde::{Deserialize, Serialize};
use tendril_core::{Scalar, Vec2};

/// Below this inter-joint distance the offset direction is meaningless and the
/// solver falls back to the chain axis.
pub const MIN_SEPARATION: Scalar = 1.0e-3;

/// Interior joints closer than this fraction of the rest length to the anchor->tip line
/// count as lying on it.
const STRAIGHT_FRAC: Scalar = 0.05;
/// Residual (fraction of rest) above which a straight chain is re-laid as an arc; the
/// sweeps only move joints along the line they already sit on.
const UNBEND_FRAC: Scalar = 0.01;
/// Spans this close to full extension are laid out straight.
const TAUT_FRAC: Scalar = 1.0e-5;
const ARC_BISECT_STEPS: u32 = 48;

/// How a chain is pulled back to its rest length.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RelaxMode {
    /// Anchor->tip then tip->anchor sweeps with both ends pinned.
    Bidirectional,
    /// Single tip->anchor sweep at full correction, anchor re-pinned last.
    Trailing,
}

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SolverParams {
    pub iterations: u32,
    pub stiffness: Scalar, // fraction of the length error corrected per visit (0.5 = half)
}

impl Default for SolverParams {
    fn default() -> Self { Self { iterations: 3, stiffness: 0.5 } }
}

/// Ordered joints with a fixed rest length between neighbours. Joint 0 is the anchor.
#[derive(Clone, Debug, PartialEq)]
pub struct Chain {
    joints: Vec<Vec2>,
    rest: Scalar,
    bend: Scalar, // +1 bulges to the left of anchor->tip, -1 to the right
}

impl Chain {
    /// All joints collapsed onto `origin`. `None` for fewer than two joints or a
    /// rest length that is not finite and positive.
    pub fn new(origin: Vec2, joint_count: usize, rest: Scalar) -> Option<Self> {
        if joint_count < 2 || !(rest.is_finite() && rest > 0.0) { return None; }
        Some(Self { joints: vec![origin; joint_count], rest, bend: 1.0 })
    }

    pub fn from_points(points: Vec<Vec2>, rest: Scalar) -> Option<Self> {
        if points.len() < 2 || !(rest.is_finite() && rest > 0.0) { return None; }
        Some(Self { joints: points, rest, bend: 1.0 })
    }

    /// Side a straight chain folds toward when it has no bend of its own to follow.
    pub fn with_bend(mut self, side: Scalar) -> Self {
        self.bend = if side < 0.0 { -1.0 } else { 1.0 };
        self
    }

    #[inline] pub fn joints(&self) -> &[Vec2] { &self.joints }
    #[inline] pub fn len(&self) -> usize { self.joints.len() }
    #[inline] pub fn is_empty(&self) -> bool { self.joints.is_empty() }
    #[inline] pub fn rest_length(&self) -> Scalar { self.rest }
    #[inline] pub fn bend(&self) -> Scalar { self.bend }
    #[inline] pub fn anchor(&self) -> Vec2 { self.joints[0] }
    #[inline] pub fn tip(&self) -> Vec2 { self.joints[self.joints.len() - 1] }
    #[inline] pub fn segment_count(&self) -> usize { self.joints.len() - 1 }
    #[inline] pub fn total_length(&self) -> Scalar { self.rest * self.segment_count() as Scalar }

    pub fn segment_lengths(&self) -> impl ExactSizeIterator<Item = Scalar> + '_ {
        self.joints.windows(2).map(|w| w[0].distance(w[1]))
    }

    /// Worst |segment - rest| over the chain.
    pub fn residual(&self) -> Scalar {
        self.segment_lengths().fold(0.0, |m, l| m.max((l - self.rest).abs()))
    }

    pub fn is_finite(&self) -> bool { self.joints.iter().all(|j| j.is_finite()) }

    /// Closest point to `target` the tip can occupy while the chain is fully extended.
    pub fn reachable(&self, anchor: Vec2, target: Vec2) -> Vec2 {
        let off = target - anchor;
        let d = off.length();
        let total = self.total_length();
        if d > total && d > MIN_SEPARATION { anchor + off * (total / d) } else { target }
    }

    /// Relax toward uniform segment length with the anchor pinned to `anchor` and the
    /// tip pinned to `tip_target` (or its reachable projection). Returns the residual.
    pub fn relax(&mut self, anchor: Vec2, tip_target: Vec2, mode: RelaxMode, params: SolverParams) -> Scalar {
        match mode {
            RelaxMode::Bidirectional => self.relax_bidirectional(anchor, tip_target, params),
            RelaxMode::Trailing      => self.relax_trailing(anchor, tip_target),
        }
        self.residual()
    }

    fn relax_bidirectional(&mut self, anchor: Vec2, tip_target: Vec2, params: SolverParams) {
        let n = self.joints.len();
        let axis = fallback_axis(anchor, tip_target);
        let k = params.stiffness.clamp(0.0, 1.0);
        let tip = self.reachable(anchor, tip_target);

        // endpoints are written once; the sweeps only visit interior joints
        self.joints[0] = anchor;
        self.joints[n - 1] = tip;
        if n > 2 && self.residual() > UNBEND_FRAC * self.rest {
            let dir = self.line_dir(axis);
            if self.is_straight(dir) {
                self.lay_arc(dir);
            }
        }
        for _ in 0..params.iterations {
            for i in 1..n - 1 { self.pull(i, i - 1, axis, k); }
            for i in (1..n - 1).rev() { self.pull(i, i + 1, -axis, k); }
        }
    }

    // iterations do not apply: a full-correction sweep is already exact for every
    // segment but the first
    fn relax_trailing(&mut self, anchor: Vec2, tip_target: Vec2) {
        let n = self.joints.len();
        let axis = fallback_axis(anchor, tip_target);
        self.joints[n - 1] = tip_target;
        for i in (1..n - 1).rev() { self.pull(i, i + 1, -axis, 1.0); }
        self.joints[0] = anchor;
    }

    /// Move joint `i` a fraction `k` of the way to rest distance from joint `toward`.
    #[inline]
    fn pull(&mut self, i: usize, toward: usize, fallback: Vec2, k: Scalar) {
        let p = self.joints[i];
        let o = self.joints[toward];
        let off = p - o;
        let d = off.length();
        let dir = if d > MIN_SEPARATION { off / d } else { fallback };
        let goal = o + dir * self.rest;
        self.joints[i] = p + (goal - p) * k;
    }

    /// Direction of the anchor->tip line, or of the farthest joint when the ends coincide.
    fn line_dir(&self, axis: Vec2) -> Vec2 {
        let anchor = self.anchor();
        let span = self.tip() - anchor;
        if span.length() > MIN_SEPARATION { return span.normalize(); }
        let far = self.joints.iter().map(|j| *j - anchor).fold(Vec2::ZERO, |m, o| {
            if o.length_squared() > m.length_squared() { o } else { m }
        });
        if far.length() > MIN_SEPARATION { far.normalize() } else { axis }
    }

    fn is_straight(&self, dir: Vec2) -> bool {
        let anchor = self.anchor();
        let tol = STRAIGHT_FRAC * self.rest;
        self.joints[1..self.joints.len() - 1].iter().all(|j| dir.perp_dot(*j - anchor).abs() <= tol)
    }

    /// Re-lay the interior joints on the circular arc of equal chords that spans the
    /// pinned endpoints. The arc bulges to the side the joints already lean toward, or
    /// to `bend` when they do not lean at all.
    fn lay_arc(&mut self, dir: Vec2) {
        let n = self.joints.len();
        let anchor = self.anchor();
        let segs = (n - 1) as Scalar;
        let span = (self.tip() - anchor).length();
        let theta = arc_turn(segs, self.rest, span);

        let lean: Scalar = self.joints[1..n - 1].iter().map(|j| dir.perp_dot(*j - anchor)).sum();
        let side = if lean.abs() > MIN_SEPARATION { lean.signum() } else { self.bend };

        let mut heading = side * (segs - 1.0) * theta * 0.5;
        let mut p = anchor;
        for i in 1..n - 1 {
            p += Vec2::from_angle(heading).rotate(dir) * self.rest;
            self.joints[i] = p;
            heading -= side * theta;
        }
    }

    /// Discard the current pose and collapse every joint onto `p`.
    pub fn collapse_to(&mut self, p: Vec2) {
        for j in &mut self.joints { *j = p; }
    }
}

/// Turn per joint of a `segs`-chord arc of chord length `rest` whose ends are `span` apart.
/// Solves `rest * sin(segs*t/2) / sin(t/2) = span` on `(0, 2pi/segs)`, where the left side
/// falls monotonically from the full length to zero.
fn arc_turn(segs: Scalar, rest: Scalar, span: Scalar) -> Scalar {
    if span >= segs * rest * (1.0 - TAUT_FRAC) { return 0.0; }
    let (mut lo, mut hi) = (0.0, core::f32::consts::TAU / segs);
    for _ in 0..ARC_BISECT_STEPS {
        let mid = 0.5 * (lo + hi);
        let chord = rest * (segs * mid * 0.5).sin() / (mid * 0.5).sin();
        if chord > span { lo = mid; } else { hi = mid; }
    }
    0.5 * (lo + hi)
}

#[inline]
fn fallback_axis(anchor: Vec2, target: Vec2) -> Vec2 {
    let off = target - anchor;
    let d = off.length();
    if d > MIN_SEPARATION { off / d } else { Vec2::X }
}
