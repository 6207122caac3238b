// Game rules: the letter pool, category assembly, and the scoring pass.

pub mod constants;
pub mod letters;
pub mod scoring;

pub use constants::{ALPHABET, BONUS_CATEGORIES, DEFAULT_CATEGORIES};
pub use letters::draw_letter;
pub use scoring::{normalize_answer, score_round};
