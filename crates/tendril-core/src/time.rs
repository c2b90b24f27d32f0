/// Per-step summary returned by `World::step`.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct StepStats {
    pub appendages: u32,
    pub stepping: u32,
    pub max_residual: f32, // worst |segment - rest| over all chains after relaxation
    pub reseeded: bool,
}
