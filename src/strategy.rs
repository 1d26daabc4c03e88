use crate::code::{Code, Feedback};
use crate::config::{GameConfig, StrategyPolicy};
use crate::debug_log;
use crate::solver::{CandidateStore, ConstraintEngine, score};
use crate::universe::random_code;
use rand::Rng;
use rand::seq::SliceRandom;
use std::collections::HashMap;

/// Picks the next guess for the current candidate set.
///
/// - no candidates left: a random code over the whole alphabet
/// - nothing pruned yet: the configured opening
/// - at most `near_terminal` candidates: the first one
/// - at most `small` candidates: a random one
/// - otherwise: the sampled minimax of [`minimax_guess`]
pub fn next_guess<E, R>(store: &CandidateStore<E>, config: &GameConfig, rng: &mut R) -> Code
where
    E: ConstraintEngine,
    R: Rng + ?Sized,
{
    let policy = config.policy();
    let candidates = store.candidate_indices();
    let universe = store.universe();
    let size = candidates.len();

    if size == 0 {
        log::warn!("No candidates remain, guessing a random code");
        return random_code(config, rng);
    }

    if size == universe.len() {
        return config.opening().clone();
    }

    if size <= policy.near_terminal {
        return universe[candidates[0]].clone();
    }

    if size <= policy.small {
        if let Some(&i) = candidates.choose(rng) {
            return universe[i].clone();
        }
    }

    minimax_guess(store, policy, rng).unwrap_or_else(|| {
        candidates
            .choose(rng)
            .map_or_else(|| random_code(config, rng), |&i| universe[i].clone())
    })
}

/// Approximates the guess with the smallest worst-case remainder.
///
/// Up to `pool_size` guesses are drawn, from the candidates when there are at
/// most `pool_from_candidates` of them and from the whole universe otherwise.
/// Each guess is scored against its own sample of up to `witness_size`
/// candidates, and the guess whose largest feedback bucket is smallest wins.
/// Ties keep the earliest guess. Returns `None` when there is nothing to
/// evaluate.
pub fn minimax_guess<E, R>(
    store: &CandidateStore<E>,
    policy: &StrategyPolicy,
    rng: &mut R,
) -> Option<Code>
where
    E: ConstraintEngine,
    R: Rng + ?Sized,
{
    let candidates = store.candidate_indices();
    let universe = store.universe();
    let size = candidates.len();

    let pool_count = policy.pool_size.min(size);
    let pool: Vec<&Code> = if size <= policy.pool_from_candidates {
        candidates
            .choose_multiple(rng, pool_count)
            .map(|&i| &universe[i])
            .collect()
    } else {
        universe.choose_multiple(rng, pool_count).collect()
    };

    let witness_count = policy.witness_size.min(size);
    let best = smallest_worst_case(pool.into_iter().map(|guess| {
        let witnesses: Vec<&Code> = candidates
            .choose_multiple(rng, witness_count)
            .map(|&i| &universe[i])
            .collect();
        (guess, largest_bucket(guess, &witnesses))
    }));

    if let Some((guess, worst)) = best {
        debug_log!(
            "minimax: {size} candidates, picked {guess:?} with worst bucket {worst}/{witness_count}"
        );
    }

    best.map(|(guess, _)| guess.clone())
}

/// Returns the guess with the smallest worst bucket. On a tie the earlier
/// guess is kept.
fn smallest_worst_case<'a, I>(scored: I) -> Option<(&'a Code, usize)>
where
    I: IntoIterator<Item = (&'a Code, usize)>,
{
    let mut best: Option<(&Code, usize)> = None;
    for (guess, worst) in scored {
        if best.is_none_or(|(_, best_worst)| worst < best_worst) {
            best = Some((guess, worst));
        }
    }
    best
}

/// Groups `witnesses` by the feedback `guess` would get against each of them
/// and returns the size of the largest group.
#[must_use]
pub fn largest_bucket(guess: &Code, witnesses: &[&Code]) -> usize {
    let mut buckets: HashMap<Feedback, usize> = HashMap::new();
    let mut largest = 0;
    for witness in witnesses {
        let count = buckets.entry(score(guess, witness)).or_default();
        *count += 1;
        largest = largest.max(*count);
    }
    largest
}
