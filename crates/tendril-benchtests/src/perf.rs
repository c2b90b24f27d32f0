use std::time::Duration;

/// simple percentile
pub fn pct(mut xs: Vec<f32>, p: f32) -> f32 {
    if xs.is_empty() { return 0.0; }
    xs.sort_by(|a, b| a.total_cmp(b));
    let k = ((xs.len() as f32 - 1.0) * p.clamp(0.0, 1.0)).round() as usize;
    xs[k]
}

#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct PerfSummary {
    pub ticks: usize,
    pub mean: f32,
    pub p50: f32,
    pub p95: f32,
    pub p99: f32,
}

/// Per-step wall-clock samples in milliseconds.
#[derive(Default)]
pub struct StepTimer { step_ms: Vec<f32> }

impl StepTimer {
    pub fn with_capacity(n: usize) -> Self { Self { step_ms: Vec::with_capacity(n) } }

    pub fn record(&mut self, d: Duration) { self.step_ms.push(d.as_secs_f64() as f32 * 1000.0); }

    pub fn summary(&self) -> PerfSummary {
        if self.step_ms.is_empty() { return PerfSummary::default(); }
        PerfSummary {
            ticks: self.step_ms.len(),
            mean: self.step_ms.iter().sum::<f32>() / self.step_ms.len() as f32,
            p50: pct(self.step_ms.clone(), 0.50),
            p95: pct(self.step_ms.clone(), 0.95),
            p99: pct(self.step_ms.clone(), 0.99),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn percentiles_pick_sorted_ranks() {
        let xs: Vec<f32> = (1..=100).rev().map(|i| i as f32).collect();
        assert_eq!(pct(xs.clone(), 0.0), 1.0);
        assert_eq!(pct(xs.clone(), 0.5), 51.0);
        assert_eq!(pct(xs.clone(), 0.95), 95.0);
        assert_eq!(pct(xs, 1.0), 100.0);
        assert_eq!(pct(Vec::new(), 0.5), 0.0);
    }

    #[test]
    fn summary_of_constant_samples() {
        let mut t = StepTimer::with_capacity(4);
        for _ in 0..4 { t.record(Duration::from_micros(500)); }
        let s = t.summary();
        assert_eq!(s.ticks, 4);
        assert!((s.mean - 0.5).abs() < 1e-4);
        assert_eq!(s.p50, s.p99);
    }
}
