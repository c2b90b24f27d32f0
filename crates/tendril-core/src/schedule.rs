use crate::StepHasher;

#[repr(u8)]
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum StepStage {
    Reseed = 1,
    AdvanceBody = 2,
    AdvanceGaits = 3,
    Relax = 4,
    Publish = 5,
}

pub fn schedule_digest(stages: &[StepStage]) -> [u8; 32] {
    let mut h = StepHasher::new();
    for s in stages { h.update_bytes(&[*s as u8]); }
    h.finalize()
}
