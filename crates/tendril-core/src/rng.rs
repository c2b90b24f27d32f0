#[derive(Copy, Clone, Debug)]
pub struct XorShift64 { state: u64 }

impl XorShift64 {
    pub fn new(seed: u64) -> Self { Self { state: seed | 1 } }
    pub fn next_u32(&mut self) -> u32 {
        let mut x = self.state;
        x ^= x >> 12; x ^= x << 25; x ^= x >> 27;
        self.state = x;
        ((x.wrapping_mul(2685821657736338717)) >> 32) as u32
    }
    /// Uniform in [0, 1).
    pub fn next_f32(&mut self) -> f32 {
        (self.next_u32() >> 8) as f32 * (1.0 / (1u32 << 24) as f32)
    }
    /// Uniform in [lo, hi); returns `lo` for an empty range.
    pub fn range_f32(&mut self, lo: f32, hi: f32) -> f32 {
        if hi <= lo { return lo; }
        lo + (hi - lo) * self.next_f32()
    }
    /// Uniform in [lo, hi] (inclusive).
    pub fn range_u32(&mut self, lo: u32, hi: u32) -> u32 {
        if hi <= lo { return lo; }
        let span = (hi - lo) as u64 + 1;
        lo + ((self.next_u32() as u64 * span) >> 32) as u32
    }
    pub fn state(&self) -> u64 { self.state }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_same_stream() {
        let mut a = XorShift64::new(0xC0FFEE);
        let mut b = XorShift64::new(0xC0FFEE);
        for _ in 0..64 { assert_eq!(a.next_u32(), b.next_u32()); }
        assert_eq!(a.state(), b.state());
    }

    #[test]
    fn ranges_stay_in_bounds() {
        let mut r = XorShift64::new(7);
        for _ in 0..1000 {
            let f = r.range_f32(18.0, 26.0);
            assert!((18.0..26.0).contains(&f));
            let n = r.range_u32(4, 7);
            assert!((4..=7).contains(&n));
        }
        assert_eq!(r.range_u32(5, 5), 5);
        assert_eq!(r.range_f32(3.0, 3.0), 3.0);
    }

    #[test]
    fn inclusive_range_hits_both_ends() {
        let mut r = XorShift64::new(99);
        let mut seen = [false; 3];
        for _ in 0..500 { seen[(r.range_u32(2, 4) - 2) as usize] = true; }
        assert!(seen.iter().all(|s| *s));
    }
}
