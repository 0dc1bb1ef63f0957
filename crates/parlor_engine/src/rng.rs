//! Random number source for shuffles, secrets and opponent fallbacks.
//!
//! Every random choice in the engine goes through a caller-supplied
//! [`rand::Rng`], so tests pin outcomes with a seeded [`StdRng`].

use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::{debug, instrument};

/// Creates the session RNG.
///
/// `Some(seed)` gives a reproducible sequence, `None` draws from OS entropy.
#[instrument]
pub fn session_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => {
            debug!(seed, "Using seeded RNG");
            StdRng::seed_from_u64(seed)
        }
        None => StdRng::from_os_rng(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::Rng;

    #[test]
    fn test_same_seed_same_sequence() {
        let mut a = session_rng(Some(7));
        let mut b = session_rng(Some(7));
        let xs: Vec<u32> = (0..8).map(|_| a.random()).collect();
        let ys: Vec<u32> = (0..8).map(|_| b.random()).collect();
        assert_eq!(xs, ys);
    }
}
