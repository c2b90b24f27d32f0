use blake3::Hasher;
use crate::types::Vec2;

pub struct StepHasher(Hasher);

impl StepHasher {
    pub fn new() -> Self { StepHasher(Hasher::new()) }
    pub fn update_bytes(&mut self, bytes: &[u8]) { self.0.update(bytes); }
    pub fn finalize(self) -> [u8; 32] { *self.0.finalize().as_bytes() }
}

impl Default for StepHasher {
    fn default() -> Self { Self::new() }
}

#[inline]
pub fn hash_vec2(h: &mut StepHasher, v: &Vec2) {
    for c in [v.x, v.y] { h.update_bytes(&c.to_le_bytes()); }
}

#[inline]
pub fn hash_f32(h: &mut StepHasher, x: f32) {
    h.update_bytes(&x.to_le_bytes());
}
