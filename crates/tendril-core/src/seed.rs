use crate::StepHasher;

/// Inputs that fully determine one seeding pass (segment counts, rest lengths,
/// angular offsets, wobble phases). Reseeding with the same descriptor rebuilds
/// the same layout.
#[derive(Clone, Debug)]
pub struct SeedDescriptor {
    pub seed: u64,
    pub viewport: [f32; 2],
}

/// Deterministic 64-bit rng seed derived from the descriptor.
/// (BLAKE3 -> first 8 bytes little-endian)
pub fn seed_id(desc: &SeedDescriptor) -> u64 {
    let mut h = StepHasher::new();
    h.update_bytes(&desc.seed.to_le_bytes());
    for f in desc.viewport {
        h.update_bytes(&f.to_le_bytes());
    }
    let bytes = h.finalize();
    u64::from_le_bytes([
        bytes[0], bytes[1], bytes[2], bytes[3],
        bytes[4], bytes[5], bytes[6], bytes[7],
    ])
}
