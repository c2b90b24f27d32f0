use tendril_articulation::{Chain, SolverParams};
use tendril_core::{AppendageId, GroupId, Scalar, Vec2};
use tendril_locomotion::{Gait, GaitInput, GaitOutput, GaitPolicy, GaitStatus};

/// One chain plus the gait that pins its ends.
#[derive(Clone, Debug)]
pub struct Appendage {
    id: AppendageId,
    group: GroupId,
    chain: Chain,
    gait: Gait,
    solver: SolverParams,
}

impl Appendage {
    pub fn new(id: AppendageId, group: GroupId, chain: Chain, gait: Gait, solver: SolverParams) -> Self {
        Self { id, group, chain, gait, solver }
    }

    #[inline] pub fn id(&self) -> AppendageId { self.id }
    #[inline] pub fn group(&self) -> GroupId { self.group }
    #[inline] pub fn chain(&self) -> &Chain { &self.chain }
    #[inline] pub fn gait(&self) -> &Gait { &self.gait }
    #[inline] pub fn joints(&self) -> &[Vec2] { self.chain.joints() }
    #[inline] pub fn status(&self) -> GaitStatus { self.gait.status() }

    pub(crate) fn advance(&mut self, input: &GaitInput) -> GaitOutput { self.gait.advance(input) }

    /// Relax toward the pins produced by `advance`. A chain that somehow went
    /// non-finite is collapsed onto the anchor and relaxed again.
    pub(crate) fn relax(&mut self, pins: &GaitOutput) -> Scalar {
        let mode = self.gait.relax_mode();
        let r = self.chain.relax(pins.anchor, pins.tip, mode, self.solver);
        if r.is_finite() && self.chain.is_finite() {
            return r;
        }
        log::warn!("appendage {}: non-finite chain recovered at anchor", self.id.0);
        self.chain.collapse_to(pins.anchor);
        self.chain.relax(pins.anchor, pins.anchor, mode, self.solver)
    }
}
