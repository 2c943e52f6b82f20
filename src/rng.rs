use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Owns the single random stream every phase draws from.
pub struct RngManager {
    master: ChaCha8Rng,
}

impl RngManager {
    pub fn new(seed: u64) -> Self {
        Self {
            master: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Borrows the shared stream for one phase.
    pub fn shared(&mut self) -> SystemRng<'_> {
        SystemRng {
            inner: &mut self.master,
        }
    }
}

pub struct SystemRng<'a> {
    inner: &'a mut ChaCha8Rng,
}

impl<'a> SystemRng<'a> {
    /// Uniform draw in [0, 1).
    pub fn uniform(&mut self) -> f64 {
        self.inner.gen::<f64>()
    }

    /// Returns true with the given probability.
    pub fn chance(&mut self, probability: f64) -> bool {
        self.uniform() < probability
    }

    /// Gaussian draw via the Box-Muller transform.
    pub fn gaussian(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.uniform().max(f64::EPSILON);
        let u2 = self.uniform();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + z * std_dev
    }

    /// Picks an index with probability proportional to its weight.
    /// Returns `None` for an empty slice or a zero total.
    pub fn weighted_index(&mut self, weights: &[f64]) -> Option<usize> {
        let total: f64 = weights.iter().sum();
        if weights.is_empty() || !(total > 0.0) {
            return None;
        }
        let target = self.uniform() * total;
        let mut cumulative = 0.0;
        for (index, weight) in weights.iter().enumerate() {
            cumulative += weight;
            if target < cumulative {
                return Some(index);
            }
        }
        // float round-off can leave target == total
        weights.iter().rposition(|w| *w > 0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_same_stream() {
        let mut a = RngManager::new(42);
        let mut b = RngManager::new(42);
        for _ in 0..16 {
            assert_eq!(a.shared().uniform(), b.shared().uniform());
        }
    }

    #[test]
    fn stream_continues_across_borrows() {
        let mut manager = RngManager::new(7);
        let first = manager.shared().uniform();
        let second = manager.shared().uniform();
        assert_ne!(first, second);
    }

    #[test]
    fn gaussian_centres_on_mean() {
        let mut manager = RngManager::new(3);
        let mut rng = manager.shared();
        let n = 20_000;
        let mean: f64 = (0..n).map(|_| rng.gaussian(8.0, 1.5)).sum::<f64>() / n as f64;
        assert!((mean - 8.0).abs() < 0.05, "sample mean {mean}");
    }

    #[test]
    fn weighted_index_skips_zero_weights() {
        let mut manager = RngManager::new(11);
        let mut rng = manager.shared();
        for _ in 0..200 {
            assert_eq!(rng.weighted_index(&[0.0, 2.0, 0.0]), Some(1));
        }
        assert_eq!(rng.weighted_index(&[]), None);
        assert_eq!(rng.weighted_index(&[0.0, 0.0]), None);
    }
}
