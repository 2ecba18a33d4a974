use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Seeded source of display orderings.
///
/// One shuffler drives every ordering of a session from a single PRNG
/// stream: the question order is drawn first, then each question's option
/// order in display-question order. Given the same seed, a reconstruction
/// therefore reproduces identical orders without storing randomness beyond
/// the seed itself.
#[derive(Debug, Clone)]
pub struct OrderShuffler {
    rng: StdRng,
}

impl OrderShuffler {
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Draws a Fisher-Yates permutation of `0..len` from the stream.
    pub fn order(&mut self, len: usize) -> Vec<usize> {
        let mut order: Vec<usize> = (0..len).collect();
        for i in (1..len).rev() {
            let j = self.rng.random_range(0..=i);
            order.swap(i, j);
        }
        order
    }
}

/// Returns a fresh random seed for sessions without an explicit one.
#[must_use]
pub fn random_seed() -> u64 {
    rand::random()
}

/// Returns true if `order` is a permutation of `0..len`.
#[must_use]
pub fn is_permutation(order: &[usize], len: usize) -> bool {
    if order.len() != len {
        return false;
    }
    let mut seen = vec![false; len];
    for &i in order {
        if i >= len || seen[i] {
            return false;
        }
        seen[i] = true;
    }
    true
}
