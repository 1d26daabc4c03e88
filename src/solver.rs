use crate::code::{Code, Feedback, MAX_COLORS};
use crate::debug_log;
use crate::error::SolverError;
use std::sync::Arc;

/// Scores `guess` against `other`.
///
/// Exact matches are counted position by position. The remaining positions of
/// each code are tallied per color, and the color-only count is the sum over
/// colors of the smaller tally. The result is symmetric in its arguments.
///
/// Both codes must have the same length and use color indices below
/// `MAX_COLORS`.
#[must_use]
pub fn score(guess: &Code, other: &Code) -> Feedback {
    debug_assert_eq!(guess.len(), other.len(), "scored codes differ in length");
    let mut exact = 0u8;
    let mut guess_left = [0u8; MAX_COLORS];
    let mut other_left = [0u8; MAX_COLORS];

    for (&g, &o) in guess.colors().iter().zip(other.colors()) {
        if g == o {
            exact += 1;
        } else {
            guess_left[usize::from(g)] += 1;
            other_left[usize::from(o)] += 1;
        }
    }

    let color_only = guess_left
        .iter()
        .zip(other_left.iter())
        .map(|(&a, &b)| a.min(b))
        .sum();

    Feedback::scored(exact, color_only)
}

#[must_use]
pub fn is_consistent(guess: &Code, feedback: Feedback, candidate: &Code) -> bool {
    score(guess, candidate) == feedback
}

/// Decides whether a candidate survives an observation. The store only
/// relies on this contract, so an inference backend can replace plain
/// rescoring.
pub trait ConstraintEngine {
    fn is_consistent(&self, guess: &Code, feedback: Feedback, candidate: &Code) -> bool;
}

/// Brute force: rescore the guess against the candidate.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScoreMatching;

impl ConstraintEngine for ScoreMatching {
    fn is_consistent(&self, guess: &Code, feedback: Feedback, candidate: &Code) -> bool {
        is_consistent(guess, feedback, candidate)
    }
}

/// The universe of codes plus the subset still consistent with every
/// observation. Candidates are kept as indices into the universe, in
/// universe order.
#[derive(Debug, Clone)]
pub struct CandidateStore<E: ConstraintEngine = ScoreMatching> {
    universe: Arc<[Code]>,
    candidates: Vec<usize>,
    engine: E,
}

impl CandidateStore<ScoreMatching> {
    #[must_use]
    pub fn new(universe: Arc<[Code]>) -> Self {
        Self::with_engine(universe, ScoreMatching)
    }
}

impl<E: ConstraintEngine> CandidateStore<E> {
    pub fn with_engine(universe: Arc<[Code]>, engine: E) -> Self {
        let candidates = (0..universe.len()).collect();
        Self {
            universe,
            candidates,
            engine,
        }
    }

    #[must_use]
    pub fn universe(&self) -> &[Code] {
        &self.universe
    }

    #[must_use]
    pub fn universe_size(&self) -> usize {
        self.universe.len()
    }

    #[must_use]
    pub fn size(&self) -> usize {
        self.candidates.len()
    }

    #[must_use]
    pub fn is_exhausted(&self) -> bool {
        self.candidates.is_empty()
    }

    /// Universe indices of the remaining candidates.
    #[must_use]
    pub fn candidate_indices(&self) -> &[usize] {
        &self.candidates
    }

    pub fn candidates(&self) -> impl Iterator<Item = &Code> + '_ {
        self.candidates.iter().map(|&i| &self.universe[i])
    }

    #[must_use]
    pub fn contains(&self, code: &Code) -> bool {
        self.candidates().any(|c| c == code)
    }

    fn check_guess(&self, guess: &Code) -> Result<(), SolverError> {
        if let Some(first) = self.universe.first()
            && first.len() != guess.len()
        {
            return Err(SolverError::WrongLength {
                expected: first.len(),
                found: guess.len(),
            });
        }
        if let Some(&color) = guess
            .colors()
            .iter()
            .find(|&&c| usize::from(c) >= MAX_COLORS)
        {
            return Err(SolverError::UnknownColor {
                color: format!("#{color}"),
                valid: format!("indices below {MAX_COLORS}"),
            });
        }
        Ok(())
    }

    fn consistent_with(&self, guess: &Code, feedback: Feedback) -> Vec<usize> {
        self.candidates
            .iter()
            .copied()
            .filter(|&i| {
                self.engine
                    .is_consistent(guess, feedback, &self.universe[i])
            })
            .collect()
    }

    /// Keeps only the candidates consistent with `feedback` for `guess` and
    /// returns the new size.
    ///
    /// If that would remove every remaining candidate the store is left
    /// untouched and `SolverError::Contradiction` is returned. A guess that
    /// does not fit the universe is rejected the same way.
    pub fn filter(&mut self, guess: &Code, feedback: Feedback) -> Result<usize, SolverError> {
        self.check_guess(guess)?;
        let kept = self.consistent_with(guess, feedback);
        if kept.is_empty() && !self.candidates.is_empty() {
            return Err(SolverError::Contradiction {
                remaining: self.candidates.len(),
            });
        }

        debug_log!(
            "filter: {} -> {} candidates ({feedback})",
            self.candidates.len(),
            kept.len()
        );
        self.candidates = kept;
        Ok(self.candidates.len())
    }

    /// Like [`filter`](Self::filter) but commits the result even when it
    /// leaves nothing. The guess must already have passed `filter`'s checks.
    pub fn force_filter(&mut self, guess: &Code, feedback: Feedback) -> usize {
        self.candidates = self.consistent_with(guess, feedback);
        self.candidates.len()
    }

    pub fn reset(&mut self) {
        self.candidates = (0..self.universe.len()).collect();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;
    use crate::universe::generate_universe;
    use rstest::rstest;

    fn code(config: &GameConfig, input: &str) -> Code {
        config.parse_code(input).unwrap()
    }

    fn default_store() -> (GameConfig, CandidateStore) {
        let config = GameConfig::default();
        let universe: Arc<[Code]> = generate_universe(&config).into();
        (config, CandidateStore::new(universe))
    }

    #[rstest]
    #[case("azul azul rojo verde", "azul rojo verde negro", 1, 2)]
    #[case("azul rojo verde negro", "azul rojo verde negro", 4, 0)]
    #[case("azul azul azul azul", "rojo rojo rojo rojo", 0, 0)]
    #[case("azul azul rojo rojo", "rojo rojo azul azul", 0, 4)]
    #[case("azul azul azul rojo", "rojo azul blanco azul", 1, 2)]
    #[case("negro blanco negro blanco", "negro negro negro negro", 2, 0)]
    #[case("verde purpura azul rojo", "purpura verde rojo azul", 0, 4)]
    fn score_ok(
        #[case] guess: &str,
        #[case] secret: &str,
        #[case] exact: usize,
        #[case] color_only: usize,
    ) {
        let config = GameConfig::default();
        let feedback = score(&code(&config, guess), &code(&config, secret));
        assert_eq!(feedback, Feedback::new(exact, color_only, 4).unwrap());
    }

    #[test]
    fn test_score_properties_over_universe_sample() {
        let (config, store) = default_store();
        let length = config.code_length();
        let universe = store.universe();
        for a in universe.iter().step_by(37) {
            assert_eq!(score(a, a), Feedback::new(length, 0, length).unwrap());
            for b in universe.iter().step_by(11) {
                let ab = score(a, b);
                let ba = score(b, a);
                assert_eq!(ab, ba);
                assert!(ab.exact() <= length);
                assert!(ab.fits(length));
            }
        }
    }

    #[test]
    fn test_filter_keeps_secret_and_shrinks() {
        let (config, mut store) = default_store();
        let secret = code(&config, "azul rojo verde negro");
        let guess = code(&config, "azul azul rojo verde");
        let before = store.size();

        let after = store.filter(&guess, score(&guess, &secret)).unwrap();

        assert!(after < before);
        assert_eq!(after, store.size());
        assert!(store.contains(&secret));
        assert!(store.candidates().all(|c| is_consistent(&guess, score(&guess, &secret), c)));
    }

    #[test]
    fn test_size_is_idempotent() {
        let (_, store) = default_store();
        assert_eq!(store.size(), store.size());
        assert_eq!(store.size(), 1296);
    }

    #[test]
    fn test_contradiction_leaves_store_untouched() {
        let (config, mut store) = default_store();
        let secret = code(&config, "blanco blanco blanco blanco");
        let guess = code(&config, "blanco blanco blanco blanco");
        store
            .filter(&guess, Feedback::new(3, 0, 4).unwrap())
            .unwrap();
        let size = store.size();
        assert!(!store.contains(&secret));

        // Guessing the full-blanco code again: 3 exact is the only possibility
        // left, so claiming 0 exact contradicts every candidate.
        let result = store.filter(&guess, Feedback::new(0, 0, 4).unwrap());
        assert_eq!(result, Err(SolverError::Contradiction { remaining: size }));
        assert_eq!(store.size(), size);
    }

    #[test]
    fn test_force_filter_and_reset() {
        let (config, mut store) = default_store();
        let guess = code(&config, "rojo rojo rojo rojo");
        store
            .filter(&guess, Feedback::new(4, 0, 4).unwrap())
            .unwrap();
        assert_eq!(store.size(), 1);

        assert_eq!(store.force_filter(&guess, Feedback::new(0, 0, 4).unwrap()), 0);
        assert!(store.is_exhausted());

        store.reset();
        assert_eq!(store.size(), store.universe_size());
    }

    #[test]
    fn test_filter_rejects_mismatched_guess() {
        let (_, mut store) = default_store();
        let feedback = Feedback::new(2, 0, 4).unwrap();

        let short = Code::new(vec![0, 1]);
        assert_eq!(
            store.filter(&short, feedback),
            Err(SolverError::WrongLength {
                expected: 4,
                found: 2
            })
        );

        let off_range = Code::new(vec![0, 1, 2, 64]);
        assert!(matches!(
            store.filter(&off_range, feedback),
            Err(SolverError::UnknownColor { .. })
        ));
        assert_eq!(store.size(), 1296);
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "differ in length")]
    fn test_score_panics_on_length_mismatch_in_debug() {
        let _ = score(&Code::new(vec![0, 1, 2, 3]), &Code::new(vec![0, 1]));
    }

    struct RejectAll;

    impl ConstraintEngine for RejectAll {
        fn is_consistent(&self, _: &Code, _: Feedback, _: &Code) -> bool {
            false
        }
    }

    #[test]
    fn test_custom_engine_is_used() {
        let config = GameConfig::default();
        let universe: Arc<[Code]> = generate_universe(&config).into();
        let mut store = CandidateStore::with_engine(universe, RejectAll);
        let guess = code(&config, "azul azul azul azul");
        assert!(matches!(
            store.filter(&guess, Feedback::new(0, 0, 4).unwrap()),
            Err(SolverError::Contradiction { remaining: 1296 })
        ));
    }
}
