//! Seeded pseudo-random value stream.
//!
//! This is deliberately the classic sine-hash generator: `frac(sin(s) * 10000)`
//! with an integer counter `s`. It is a poor statistical generator but a
//! compatibility contract: generated diagrams must be bit-for-bit reproducible
//! across reimplementations, so the formula must not be "improved". Callers
//! must also draw values in a fixed order; reordering draws changes every
//! subsequent value.

/// Deterministic pseudo-random source, stateful per generation pass.
#[derive(Clone, Debug)]
pub struct SeededRandom {
    state: i64,
}

impl SeededRandom {
    pub fn new(seed: i64) -> Self {
        Self { state: seed }
    }

    /// Next value in `[0, 1)`.
    pub fn random(&mut self) -> f64 {
        let v = (self.state as f64).sin() * 10000.0;
        self.state += 1;
        v - v.floor()
    }

    /// Uniform value in `[min, max)`.
    pub fn range(&mut self, min: f64, max: f64) -> f64 {
        min + self.random() * (max - min)
    }

    /// Uniformly chosen element, or `None` for an empty slice.
    pub fn choice<'a, T>(&mut self, items: &'a [T]) -> Option<&'a T> {
        if items.is_empty() {
            return None;
        }
        let idx = (self.random() * items.len() as f64).floor() as usize;
        items.get(idx.min(items.len() - 1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_seed_reproduces_known_sequence() {
        let mut rng = SeededRandom::new(1);
        let expected = [
            0.7098480789645691,
            0.9742682568175951,
            0.20008059867222983,
            0.9750469207183414,
            0.7572533686161478,
        ];
        for e in expected {
            assert!((rng.random() - e).abs() < 1e-9);
        }
    }

    #[test]
    fn same_seed_same_stream() {
        let mut a = SeededRandom::new(42);
        let mut b = SeededRandom::new(42);
        for _ in 0..100 {
            assert_eq!(a.random().to_bits(), b.random().to_bits());
        }
    }

    #[test]
    fn random_stays_in_unit_interval() {
        let mut rng = SeededRandom::new(-7);
        for _ in 0..1000 {
            let v = rng.random();
            assert!((0.0..1.0).contains(&v));
        }
    }

    #[test]
    fn range_respects_bounds() {
        let mut rng = SeededRandom::new(3);
        for _ in 0..100 {
            let v = rng.range(10.0, 20.0);
            assert!((10.0..20.0).contains(&v));
        }
    }

    #[test]
    fn choice_picks_existing_elements() {
        let mut rng = SeededRandom::new(9);
        let items = ["a", "b", "c"];
        for _ in 0..50 {
            let picked = rng.choice(&items).unwrap();
            assert!(items.contains(picked));
        }
        let empty: [u8; 0] = [];
        assert!(rng.choice(&empty).is_none());
    }
}
