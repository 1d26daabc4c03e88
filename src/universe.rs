use crate::code::Code;
use crate::config::GameConfig;
use itertools::Itertools;
use rand::Rng;

/// Enumerates every code of the configured length, in product order: the
/// last position varies fastest.
#[must_use]
pub fn generate_universe(config: &GameConfig) -> Vec<Code> {
    // Alphabet size is capped at MAX_COLORS, so every index fits in a u8.
    let colors = config.alphabet().len() as u8;
    (0..config.code_length())
        .map(|_| 0..colors)
        .multi_cartesian_product()
        .map(Code::new)
        .collect()
}

/// Draws a code uniformly at random over the whole alphabet.
pub fn random_code<R: Rng + ?Sized>(config: &GameConfig, rng: &mut R) -> Code {
    let colors = config.alphabet().len() as u8;
    (0..config.code_length())
        .map(|_| rng.gen_range(0..colors))
        .collect()
}
