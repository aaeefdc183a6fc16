//! Random sampling (`--sample N`, SPEC_FULL.md "Supplemented Features"):
//! draw `N` line indices with replacement from `[0, count)`, matching the
//! original's `[randint(0, count-1) for _ in range(N)]`, then keep only
//! the distinct positions — an RNG is injected so tests are deterministic.

use std::collections::BTreeSet;

use rand::Rng;

pub fn draw_sample_indices(count: u64, n: u64, rng: &mut impl Rng) -> BTreeSet<u64> {
    let mut indices = BTreeSet::new();
    if count == 0 {
        return indices;
    }
    for _ in 0..n {
        indices.insert(rng.gen_range(0..count));
    }
    indices
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn draws_indices_within_bounds() {
        let mut rng = StdRng::seed_from_u64(7);
        let sample = draw_sample_indices(100, 10, &mut rng);
        assert!(!sample.is_empty());
        assert!(sample.iter().all(|&i| i < 100));
    }

    #[test]
    fn empty_input_yields_empty_sample() {
        let mut rng = StdRng::seed_from_u64(7);
        assert!(draw_sample_indices(0, 10, &mut rng).is_empty());
    }

    #[test]
    fn same_seed_is_deterministic() {
        let mut rng_a = StdRng::seed_from_u64(42);
        let mut rng_b = StdRng::seed_from_u64(42);
        assert_eq!(draw_sample_indices(1000, 50, &mut rng_a), draw_sample_indices(1000, 50, &mut rng_b));
    }
}
