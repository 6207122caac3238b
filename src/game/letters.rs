use rand::RngExt;
use std::collections::HashSet;

use super::constants::{ALPHABET, BONUS_CATEGORIES};

/// Draw a letter uniformly at random from the alphabet minus `used`.
/// When every letter has been drawn the used set is cleared first, so the
/// same letter can only recur after a full pass through the alphabet.
/// The drawn letter is recorded in `used`.
pub fn draw_letter(used: &mut HashSet<char>) -> char {
    let mut pool: Vec<char> = ALPHABET.iter().copied().filter(|l| !used.contains(l)).collect();
    if pool.is_empty() {
        used.clear();
        pool = ALPHABET.to_vec();
    }

    let mut rng = rand::rng();
    let idx = rng.random_range(0..pool.len());
    // SAFETY: `idx` is produced by `random_range(0..len)` and the pool is
    // never empty here.
    #[allow(clippy::indexing_slicing)]
    let letter = pool[idx];
    used.insert(letter);
    letter
}

/// Pick a random bonus category name from the fixed pool.
pub fn random_bonus_category() -> &'static str {
    let mut rng = rand::rng();
    let idx = rng.random_range(0..BONUS_CATEGORIES.len());
    // SAFETY: `idx` is produced by `random_range(0..len)`.
    #[allow(clippy::indexing_slicing)]
    BONUS_CATEGORIES[idx]
}
