use crate::hash::{hash_f32, StepHasher};

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct DeterminismContract {
    pub fixed_dt: f32,
    pub float: &'static str,
    pub fma: bool,
    pub iterations: u32,
    pub stable_order: bool,
}

impl DeterminismContract {
    pub fn default_contract() -> Self {
        Self {
            fixed_dt: 1.0 / 60.0,
            float: "f32",
            fma: false,
            iterations: 3,
            stable_order: true,
        }
    }

    /// Fold every term into a step hash so runs under different contracts never compare equal.
    pub fn hash_into(&self, h: &mut StepHasher) {
        hash_f32(h, self.fixed_dt);
        h.update_bytes(self.float.as_bytes());
        h.update_bytes(&[self.fma as u8, self.stable_order as u8]);
        h.update_bytes(&self.iterations.to_le_bytes());
    }
}

impl Default for DeterminismContract {
    fn default() -> Self { Self::default_contract() }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn digest(c: &DeterminismContract) -> [u8; 32] {
        let mut h = StepHasher::new();
        c.hash_into(&mut h);
        h.finalize()
    }

    #[test]
    fn every_term_reaches_the_hash() {
        let base = DeterminismContract::default_contract();
        let d = digest(&base);
        assert_eq!(d, digest(&DeterminismContract::default()));
        assert_ne!(d, digest(&DeterminismContract { fixed_dt: 1.0 / 30.0, ..base }));
        assert_ne!(d, digest(&DeterminismContract { float: "f64", ..base }));
        assert_ne!(d, digest(&DeterminismContract { fma: true, ..base }));
        assert_ne!(d, digest(&DeterminismContract { iterations: 4, ..base }));
        assert_ne!(d, digest(&DeterminismContract { stable_order: false, ..base }));
    }
}
