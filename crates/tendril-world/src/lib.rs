mod appendage;
mod config;
mod input;
mod snapshot;
pub mod det_harness;

pub use appendage::Appendage;
pub use config::{CountRange, GroupConfig, LengthRange, WorldConfig};
pub use det_harness::{InputEvent, Inputs, SimWorld, StepReport};
pub use input::{InputFeed, InputSnapshot};
pub use snapshot::{AppendageView, BodySnapshot, FrameSnapshot};

use core::f32::consts::TAU;
use std::path::PathBuf;

use tendril_articulation::{Chain, SolverParams};
use tendril_controllers::Body;
use tendril_core::{
    hash_f32, hash_vec2, seed_id, vec2, AppendageId, ConfigError, DeterminismContract, GroupId,
    ProfileGains, SeedDescriptor, SpeedProfile, StepCtx, StepHasher, StepStage, StepStats, Vec2,
    Viewport, XorShift64,
};
use tendril_locomotion::{
    Gait, GaitEvent, GaitInput, GaitOutput, GaitSpec, GaitStatus, PhaseBand, PhaseClock, PhasedLimb,
    ReachGait, StepGait,
};
use tendril_viz::{DebugSettings, Ledger, LedgerEvent, ScheduleRecorder};

pub const DEFAULT_SEED: u64 = 0xC0FFEE;
const LEDGER_CAPACITY: usize = 4096;

/* ---------------- Builder ---------------- */
pub struct WorldBuilder {
    config: WorldConfig,
    seed: u64,
    viewport: Viewport,
    debug: DebugSettings,
    ledger_capacity: usize,
    ledger_dir: PathBuf,
}

impl Default for WorldBuilder {
    fn default() -> Self { Self::new() }
}

impl WorldBuilder {
    pub fn new() -> Self {
        Self {
            config: WorldConfig::default(),
            seed: DEFAULT_SEED,
            viewport: Viewport::new(800.0, 600.0),
            debug: DebugSettings::default(),
            ledger_capacity: LEDGER_CAPACITY,
            ledger_dir: PathBuf::from("out"),
        }
    }

    pub fn with_config(mut self, config: WorldConfig) -> Self { self.config = config; self }
    pub fn with_seed(mut self, seed: u64) -> Self { self.seed = seed; self }
    pub fn with_profile(mut self, profile: SpeedProfile) -> Self { self.config.profile = profile; self }
    pub fn with_debug(mut self, debug: DebugSettings) -> Self { self.debug = debug; self }
    pub fn with_ledger_capacity(mut self, cap: usize) -> Self { self.ledger_capacity = cap; self }
    pub fn with_ledger_dir(mut self, dir: impl Into<PathBuf>) -> Self { self.ledger_dir = dir.into(); self }

    pub fn with_viewport(mut self, width: f32, height: f32) -> Self {
        self.viewport = Viewport::new(width, height);
        self
    }

    /// Validate everything up front; a built world never fails to step.
    pub fn build(self) -> Result<World, ConfigError> {
        self.config.validate()?;
        check_viewport(self.viewport)?;
        let center = self.viewport.center();
        let mut w = World {
            body: Body::new(center, self.config.pursuit, self.config.body_oriented()),
            config: self.config,
            seed: self.seed,
            viewport: self.viewport,
            contract: DeterminismContract::default_contract(),
            generation: 0,
            rng: XorShift64::new(self.seed),
            tick: 0,
            target: center,
            appendages: Vec::new(),
            clocks: Vec::new(),
            pins: Vec::new(),
            schedule: ScheduleRecorder::new(),
            debug: self.debug,
            ledger: Ledger::new(self.ledger_capacity),
            ledger_dir: self.ledger_dir,
            reseeded: false,
        };
        let (viewport, profile) = (w.viewport, w.config.profile);
        w.reseed(viewport, profile, 0)?;
        Ok(w)
    }
}

fn check_viewport(v: Viewport) -> Result<(), ConfigError> {
    if v.is_valid() { Ok(()) } else { Err(ConfigError::Viewport { width: v.width, height: v.height }) }
}

/* ---------------- World ---------------- */
pub struct World {
    config: WorldConfig,
    seed: u64,
    viewport: Viewport,
    contract: DeterminismContract,
    generation: u64, // 0 at build, +1 per reseed after it
    rng: XorShift64,
    tick: u64,

    body: Body,
    target: Vec2,
    appendages: Vec<Appendage>,
    clocks: Vec<Option<PhaseClock>>, // per group; Some for phased groups
    pins: Vec<GaitOutput>,           // scratch, one per appendage

    schedule: ScheduleRecorder,
    debug: DebugSettings,
    ledger: Ledger,
    ledger_dir: PathBuf,
    reseeded: bool, // since the last step
}

impl World {
    #[inline] pub fn tick_index(&self) -> u64 { self.tick }
    #[inline] pub fn generation(&self) -> u64 { self.generation }
    #[inline] pub fn seed(&self) -> u64 { self.seed }
    #[inline] pub fn viewport(&self) -> Viewport { self.viewport }
    #[inline] pub fn profile(&self) -> SpeedProfile { self.config.profile }
    #[inline] pub fn config(&self) -> &WorldConfig { &self.config }
    #[inline] pub fn contract(&self) -> &DeterminismContract { &self.contract }
    #[inline] pub fn body(&self) -> &Body { &self.body }
    #[inline] pub fn target(&self) -> Vec2 { self.target }
    #[inline] pub fn appendages(&self) -> &[Appendage] { &self.appendages }
    #[inline] pub fn ledger(&self) -> &Ledger { &self.ledger }

    pub fn set_debug(&mut self, cfg: DebugSettings) { self.debug = cfg; }

    /// Shared phase of a phased group.
    pub fn phase(&self, group: GroupId) -> Option<f32> {
        self.clocks.get(group.0 as usize)?.as_ref().map(|c| c.phase())
    }

    /// Pointer position. Non-finite coordinates are ignored.
    pub fn set_external_target(&mut self, x: f32, y: f32) {
        if x.is_finite() && y.is_finite() {
            self.target = vec2(x, y);
        }
    }

    /// Full reset: every appendage is discarded and reseeded at the new center.
    pub fn reset_viewport(&mut self, width: f32, height: f32) -> Result<(), ConfigError> {
        let v = Viewport::new(width, height);
        check_viewport(v)?;
        self.reseed(v, self.config.profile, self.generation + 1)
    }

    /// Profiles only change through a reseed; setting the current one is a no-op.
    pub fn set_profile(&mut self, profile: SpeedProfile) -> Result<(), ConfigError> {
        if profile == self.config.profile {
            return Ok(());
        }
        self.reseed(self.viewport, profile, self.generation + 1)
    }

    /// Apply one frame's worth of host input. Profile and resize are folded into a
    /// single reseed; the pointer is applied after it.
    pub fn apply_snapshot(&mut self, s: &InputSnapshot) {
        let mut profile = self.config.profile;
        let mut viewport = self.viewport;
        let mut reseed = false;
        if let Some(p) = s.profile {
            if p != profile {
                profile = p;
                reseed = true;
            }
        }
        if let Some(v) = s.viewport {
            if v.is_valid() {
                viewport = v;
                reseed = true;
            } else {
                log::warn!("ignoring invalid viewport {}x{}", v.width, v.height);
            }
        }
        if reseed {
            if let Err(e) = self.reseed(viewport, profile, self.generation + 1) {
                log::warn!("reseed failed: {e}");
            }
        }
        if let Some(t) = s.target {
            self.set_external_target(t.x, t.y);
        }
    }

    /// Drain the feed and step once.
    pub fn step_from(&mut self, feed: &InputFeed) -> StepStats {
        let s = feed.take();
        self.apply_snapshot(&s);
        self.step()
    }

    /// Lay out a fresh generation for `viewport`/`profile`. Nothing is committed
    /// unless every appendage builds.
    fn reseed(&mut self, viewport: Viewport, profile: SpeedProfile, generation: u64) -> Result<(), ConfigError> {
        let center = viewport.center();
        let mut rng = XorShift64::new(seed_id(&SeedDescriptor {
            seed: self.seed,
            viewport: [viewport.width, viewport.height],
        }));
        let body = Body::new(center, self.config.pursuit, self.config.body_oriented());
        let frame = body.frame();
        let mut appendages = Vec::new();
        let mut clocks = Vec::with_capacity(self.config.groups.len());

        let mut next_id = 0u32;
        for (gi, group) in self.config.groups.iter().enumerate() {
            let gid = GroupId(gi as u16);
            let solver = SolverParams { iterations: group.iterations, ..SolverParams::default() };
            clocks.push(match group.gait {
                GaitSpec::Phased(p) => Some(PhaseClock::new(p)),
                _ => None,
            });
            for k in 0..group.count {
                let joints = rng.range_u32(group.joints.min, group.joints.max);
                let rest = rng.range_f32(group.rest_length.min, group.rest_length.max);
                let side = if k % 2 == 0 { 1.0 } else { -1.0 };
                let chain = Chain::new(center, joints as usize, rest)
                    .ok_or_else(|| if joints < 2 {
                        ConfigError::JointCount { group: gi, min: group.joints.min, max: group.joints.max }
                    } else {
                        ConfigError::RestLength { group: gi, min: group.rest_length.min, max: group.rest_length.max }
                    })?
                    .with_bend(side);
                let slot = TAU * k as f32 / group.count as f32;
                let gait = match group.gait {
                    GaitSpec::Stepping(p) => {
                        let home = Vec2::from_angle(slot) * p.home_radius;
                        Gait::Step(StepGait::new(home, p, &frame).with_reach(chain.total_length()))
                    }
                    GaitSpec::Phased(p) => {
                        let jitter = rng.range_f32(-p.offset_jitter, p.offset_jitter);
                        Gait::Phased(PhasedLimb::new(slot + jitter, p.reach_distance, center))
                    }
                    GaitSpec::Reaching(p) => {
                        Gait::Reach(ReachGait::new(rng.range_f32(0.0, TAU), p, center))
                    }
                };
                appendages.push(Appendage::new(AppendageId(next_id), gid, chain, gait, solver));
                next_id += 1;
            }
        }

        self.viewport = viewport;
        self.config.profile = profile;
        self.generation = generation;
        self.rng = rng;
        self.body = body;
        self.target = center;
        self.appendages = appendages;
        self.clocks = clocks;
        self.pins.clear();
        self.reseeded = true;
        self.ledger.push(LedgerEvent::Reseed {
            tick: self.tick,
            generation: self.generation,
            appendages: next_id,
        });
        log::info!(
            "reseed gen={} viewport={}x{} profile={} appendages={}",
            self.generation, self.viewport.width, self.viewport.height, self.config.profile, next_id
        );
        Ok(())
    }

    /* ---------- Step ---------- */
    pub fn step(&mut self) -> StepStats {
        self.schedule.clear();
        if self.reseeded {
            self.schedule.push(StepStage::Reseed);
        }
        let ctx = StepCtx { dt: self.contract.fixed_dt, tick: self.tick };
        let gains = self.config.profile.gains();

        self.schedule.push(StepStage::AdvanceBody);
        self.advance_body(gains);

        self.schedule.push(StepStage::AdvanceGaits);
        let body = self.body.frame();
        self.pins.clear();
        for a in &mut self.appendages {
            let phase = match self.clocks.get(a.group().0 as usize) {
                Some(Some(c)) => c.phase(),
                _ => 0.0,
            };
            let out = a.advance(&GaitInput { body, target: self.target, ctx, gains, phase });
            match out.event {
                Some(GaitEvent::StepBegan { from, landing }) => {
                    log::debug!("tick {} appendage {} step began -> ({:.2},{:.2})", ctx.tick, a.id().0, landing.x, landing.y);
                    self.ledger.push(LedgerEvent::StepBegan {
                        tick: ctx.tick, id: a.id().0, from: from.to_array(), landing: landing.to_array(),
                    });
                }
                Some(GaitEvent::StepLanded { at }) => {
                    log::debug!("tick {} appendage {} landed", ctx.tick, a.id().0);
                    self.ledger.push(LedgerEvent::StepLanded { tick: ctx.tick, id: a.id().0, at: at.to_array() });
                }
                None => {}
            }
            self.pins.push(out);
        }

        self.schedule.push(StepStage::Relax);
        let mut max_residual = 0.0f32;
        let mut stepping = 0u32;
        for (a, pins) in self.appendages.iter_mut().zip(&self.pins) {
            max_residual = max_residual.max(a.relax(pins));
            if a.status().is_stepping() { stepping += 1; }
        }

        self.schedule.push(StepStage::Publish);
        let stats = StepStats {
            appendages: self.appendages.len() as u32,
            stepping,
            max_residual,
            reseeded: self.reseeded,
        };
        self.reseeded = false;

        if self.debug.print_due(self.tick) {
            self.log_debug_block(&stats);
        }
        if self.debug.json_due(self.tick) {
            if let Err(e) = self.ledger.dump_jsonl(&self.ledger_dir, self.tick) {
                log::warn!("ledger dump to {} failed: {e}", self.ledger_dir.display());
            }
        }
        self.tick += 1;
        stats
    }

    /// Phased groups move the body themselves: dragged while any group is in its
    /// drag band, held otherwise. Everything else pursues the target.
    fn advance_body(&mut self, gains: ProfileGains) {
        if !self.config.body_driven_by_gait() {
            self.body.pursue(self.target, gains.body_gain);
            return;
        }
        let mut drag = None;
        for (gi, clock) in self.clocks.iter_mut().enumerate() {
            let Some(clock) = clock else { continue };
            let t = clock.step(self.body.pos, self.target, gains.phase_rate);
            if t.wrapped {
                log::debug!("tick {} group {} phase wrapped (cycle {})", self.tick, gi, clock.cycles());
                self.ledger.push(LedgerEvent::PhaseWrapped { tick: self.tick, group: gi as u16, cycles: clock.cycles() });
            }
            if t.band == PhaseBand::Drag && drag.is_none() {
                drag = Some(clock.params().drag_fraction);
            }
        }
        match drag {
            Some(f) => { self.body.drag_toward(self.target, f); }
            None => self.body.hold(),
        }
    }

    pub fn step_hash(&self) -> [u8; 32] {
        let mut h = StepHasher::new();
        self.contract.hash_into(&mut h);
        h.update_bytes(&self.tick.to_le_bytes());
        h.update_bytes(&self.generation.to_le_bytes());
        h.update_bytes(&self.rng.state().to_le_bytes());
        h.update_bytes(&self.schedule.digest());
        hash_vec2(&mut h, &self.body.pos);
        hash_vec2(&mut h, &self.body.vel);
        hash_f32(&mut h, self.body.angle);
        hash_vec2(&mut h, &self.target);
        for c in self.clocks.iter().flatten() {
            hash_f32(&mut h, c.phase());
        }
        for a in &self.appendages {
            h.update_bytes(&a.id().0.to_le_bytes());
            for j in a.joints() { hash_vec2(&mut h, j); }
            match a.status() {
                GaitStatus::Planted => h.update_bytes(&[0]),
                GaitStatus::Stepping { progress } => { h.update_bytes(&[1]); hash_f32(&mut h, progress); }
                GaitStatus::Phased { phase, .. } => { h.update_bytes(&[2]); hash_f32(&mut h, phase); }
                GaitStatus::Reaching => h.update_bytes(&[3]),
            }
        }
        h.finalize()
    }

    pub fn snapshot(&self) -> FrameSnapshot {
        FrameSnapshot {
            tick: self.tick,
            generation: self.generation,
            profile: self.config.profile,
            target: self.target,
            body: BodySnapshot { pos: self.body.pos, vel: self.body.vel, angle: self.body.angle },
            appendages: self
                .appendages
                .iter()
                .map(|a| AppendageView {
                    id: a.id(),
                    group: a.group(),
                    joints: a.joints().to_vec(),
                    status: a.status(),
                })
                .collect(),
        }
    }

    /* ---------- Debug printer ---------- */
    fn log_debug_block(&self, stats: &StepStats) {
        log::info!(
            "--- tick {} gen={} profile={} stepping={}/{} residual={:.4} ---",
            self.tick, self.generation, self.config.profile, stats.stepping, stats.appendages, stats.max_residual
        );
        if self.debug.show_body {
            let b = &self.body;
            log::info!(
                "body pos=({:+.2},{:+.2}) vel=({:+.3},{:+.3}) angle={:+.3} target=({:+.2},{:+.2})",
                b.pos.x, b.pos.y, b.vel.x, b.vel.y, b.angle, self.target.x, self.target.y
            );
        }
        if self.debug.show_appendages {
            for a in self.appendages.iter().take(self.debug.max_lines) {
                let tip = a.chain().tip();
                log::info!("app {:3} g{} n={:2} tip=({:+.2},{:+.2}) {:?}", a.id().0, a.group().0, a.joints().len(), tip.x, tip.y, a.status());
            }
        }
    }
}

// ---- glue: adapt World to the harness surface ----
impl SimWorld for World {
    fn step_once(&mut self) -> StepReport {
        let stats = self.step();
        StepReport {
            tick: self.tick,
            generation: self.generation,
            hash: self.step_hash(),
            appendages: stats.appendages,
            stepping: stats.stepping,
            max_residual: stats.max_residual,
            reseeded: stats.reseeded,
        }
    }

    fn generation(&self) -> u64 { self.generation }
    fn step_hash(&self) -> [u8; 32] { World::step_hash(self) }

    fn apply_inputs(&mut self, inputs: &Inputs) {
        let mut s = InputSnapshot::default();
        for ev in &inputs.events {
            match *ev {
                InputEvent::SetTarget { x, y } => {
                    if x.is_finite() && y.is_finite() { s.target = Some(vec2(x, y)); }
                }
                InputEvent::Resize { width, height } => {
                    s.viewport = Some(Viewport::new(width, height));
                    s.resize_generation += 1;
                }
                InputEvent::SetProfile { profile } => s.profile = Some(profile),
            }
        }
        self.apply_snapshot(&s);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn world(config: WorldConfig) -> World {
        WorldBuilder::new().with_config(config).with_seed(7).build().unwrap()
    }

    #[test]
    fn build_seeds_every_joint_at_the_center() {
        let w = world(WorldConfig::spider());
        assert_eq!(w.appendages().len(), 8);
        assert_eq!(w.generation(), 0);
        assert_eq!(w.tick_index(), 0);
        let c = vec2(400.0, 300.0);
        assert_eq!(w.body().pos, c);
        for a in w.appendages() {
            let n = a.joints().len();
            assert!((4..=5).contains(&n));
            assert!(a.joints().iter().all(|j| *j == c));
            let r = a.chain().rest_length();
            assert!((30.0..40.0).contains(&r));
        }
        let ids: Vec<u32> = w.appendages().iter().map(|a| a.id().0).collect();
        assert_eq!(ids, (0..8).collect::<Vec<_>>());
    }

    #[test]
    fn build_rejects_bad_input_eagerly() {
        let bad = WorldConfig { groups: vec![], ..WorldConfig::spider() };
        assert!(matches!(WorldBuilder::new().with_config(bad).build(), Err(ConfigError::NoGroups)));
        let r = WorldBuilder::new().with_viewport(f32::NAN, 10.0).build();
        assert!(matches!(r, Err(ConfigError::Viewport { .. })));
    }

    #[test]
    fn invalid_resize_leaves_world_untouched() {
        let mut w = world(WorldConfig::tentacles());
        for _ in 0..10 { w.step(); }
        let before = w.step_hash();
        assert!(w.reset_viewport(-5.0, 100.0).is_err());
        assert_eq!(w.generation(), 0);
        assert_eq!(w.step_hash(), before);
    }

    #[test]
    fn non_finite_target_is_ignored() {
        let mut w = world(WorldConfig::tentacles());
        w.set_external_target(10.0, 20.0);
        w.set_external_target(f32::INFINITY, 0.0);
        assert_eq!(w.target(), vec2(10.0, 20.0));
    }

    #[test]
    fn pursuing_body_closes_on_the_target() {
        let mut w = world(WorldConfig::tentacles());
        w.set_external_target(700.0, 300.0);
        let s = w.step();
        assert!(s.reseeded);
        assert_abs_diff_eq!(w.body().pos.x, 400.0 + 300.0 * 0.05, epsilon = 1e-3);
        for _ in 0..300 { w.step(); }
        assert!(w.body().pos.distance(vec2(700.0, 300.0)) <= 5.0 + 1e-3);
        assert!(!w.step().reseeded);
    }

    #[test]
    fn phased_body_moves_only_while_dragging() {
        let mut w = world(WorldConfig::crawler());
        w.set_external_target(400.0, 0.0);
        let g = GroupId(0);
        let mut moved_outside_drag = false;
        for _ in 0..200 {
            let before = w.body().pos;
            w.step();
            let p = w.phase(g).unwrap();
            assert!((0.0..1.0).contains(&p));
            if PhaseBand::of(p) != PhaseBand::Drag && w.body().pos != before {
                moved_outside_drag = true;
            }
        }
        assert!(!moved_outside_drag);
        assert!(w.body().pos.y < 300.0);
        assert!(w.ledger().iter().any(|e| matches!(e, LedgerEvent::PhaseWrapped { .. })));
    }

    #[test]
    fn schedule_records_reseed_only_on_the_first_step_after_it() {
        let mut w = world(WorldConfig::spider());
        w.step();
        let first = w.schedule.stages().to_vec();
        assert_eq!(first.first(), Some(&StepStage::Reseed));
        assert_eq!(first.last(), Some(&StepStage::Publish));
        w.step();
        assert_eq!(w.schedule.stages().first(), Some(&StepStage::AdvanceBody));
    }

    #[test]
    fn profile_change_reseeds() {
        let mut w = world(WorldConfig::spider());
        for _ in 0..20 { w.step(); }
        w.set_profile(SpeedProfile::Fast).unwrap();
        assert_eq!(w.profile(), SpeedProfile::Fast);
        assert_eq!(w.generation(), 1);
        assert!(w.appendages().iter().all(|a| a.joints().iter().all(|j| *j == vec2(400.0, 300.0))));
    }

    #[test]
    fn setting_the_current_profile_keeps_the_world() {
        let mut w = world(WorldConfig::spider());
        for _ in 0..20 { w.step(); }
        let before = w.step_hash();
        w.set_profile(SpeedProfile::Normal).unwrap();
        assert_eq!(w.generation(), 0);
        assert_eq!(w.step_hash(), before);

        w.apply_snapshot(&InputSnapshot { profile: Some(SpeedProfile::Normal), ..InputSnapshot::default() });
        assert_eq!(w.generation(), 0);
        assert!(!w.step().reseeded);
    }

    #[test]
    fn failed_reseed_leaves_the_previous_generation_in_place() {
        let mut w = world(WorldConfig::spider());
        for _ in 0..15 { w.step(); }
        let before = w.step_hash();
        let count = w.appendages().len();

        w.config.groups[0].rest_length = LengthRange::new(-1.0, -1.0);
        let err = w.reset_viewport(1024.0, 768.0).unwrap_err();
        assert!(matches!(err, ConfigError::RestLength { group: 0, .. }));
        assert_eq!(w.viewport(), Viewport::new(800.0, 600.0));
        assert_eq!(w.generation(), 0);
        assert_eq!(w.appendages().len(), count);
        assert_eq!(w.step_hash(), before);

        w.config.groups[0].joints = CountRange::new(1, 1);
        w.config.groups[0].rest_length = LengthRange::new(30.0, 40.0);
        assert!(matches!(w.set_profile(SpeedProfile::Fast), Err(ConfigError::JointCount { group: 0, .. })));
        assert_eq!(w.profile(), SpeedProfile::Normal);
        assert_eq!(w.step_hash(), before);
    }

    #[test]
    fn stepping_legs_carry_their_chain_length_as_reach() {
        let w = world(WorldConfig::spider());
        for a in w.appendages() {
            match a.gait() {
                Gait::Step(g) => assert_eq!(g.reach(), a.chain().total_length()),
                other => panic!("unexpected gait {other:?}"),
            }
        }
        let sides: Vec<f32> = w.appendages().iter().map(|a| a.chain().bend()).collect();
        assert_eq!(&sides[..4], &[1.0, -1.0, 1.0, -1.0]);
    }

    #[test]
    fn snapshot_serializes_with_status_tags() {
        let mut w = world(WorldConfig::spider());
        w.step();
        let snap = w.snapshot();
        assert_eq!(snap.tick, 1);
        assert_eq!(snap.appendages.len(), 8);
        let v = serde_json::to_value(&snap).unwrap();
        assert_eq!(v["appendages"][0]["status"]["state"], "planted");
        assert_eq!(v["profile"], "normal");
    }
}
