/// Per-tick context passed into gait evaluations and the schedule.
#[derive(Copy, Clone, Debug, Default)]
pub struct StepCtx {
    pub dt: f32,
    pub tick: u64,
}

impl StepCtx {
    /// Simulated time derived from the tick so replays agree bit-for-bit.
    #[inline] pub fn time(&self) -> f32 { self.tick as f32 * self.dt }
}
