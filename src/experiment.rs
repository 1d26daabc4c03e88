use crate::error::SolverError;
use crate::game_state::Solver;
use crate::universe::random_code;
use chrono::{DateTime, Local};
use rand::Rng;
use std::collections::BTreeMap;
use std::time::{Duration, Instant};

const PROGRESS_EVERY: usize = 20;

/// Aggregate results of many automatic games.
#[derive(Debug, Clone)]
pub struct ExperimentReport {
    pub started_at: DateTime<Local>,
    pub elapsed: Duration,
    pub attempts_per_game: Vec<usize>,
    /// Mean candidate-set size at each attempt index, games that finished
    /// early contributing their last size.
    pub mean_space_per_attempt: Vec<f64>,
}

/// Space reduction between two consecutive attempt indices.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Reduction {
    pub attempt: usize,
    pub before: f64,
    pub after: f64,
    pub percent: f64,
}

impl ExperimentReport {
    #[must_use]
    pub fn games(&self) -> usize {
        self.attempts_per_game.len()
    }

    #[must_use]
    pub fn mean_attempts(&self) -> f64 {
        if self.attempts_per_game.is_empty() {
            return 0.;
        }
        self.attempts_per_game.iter().sum::<usize>() as f64 / self.games() as f64
    }

    #[must_use]
    pub fn min_attempts(&self) -> Option<usize> {
        self.attempts_per_game.iter().copied().min()
    }

    #[must_use]
    pub fn max_attempts(&self) -> Option<usize> {
        self.attempts_per_game.iter().copied().max()
    }

    /// Number of games solved in each attempt count.
    #[must_use]
    pub fn attempt_distribution(&self) -> BTreeMap<usize, usize> {
        let mut distribution = BTreeMap::new();
        for &attempts in &self.attempts_per_game {
            *distribution.entry(attempts).or_default() += 1;
        }
        distribution
    }

    /// Reductions between consecutive entries among the first `limit` attempt
    /// indices, so at most `limit - 1` of them.
    #[must_use]
    pub fn reductions(&self, limit: usize) -> Vec<Reduction> {
        let spaces = &self.mean_space_per_attempt;
        spaces[..limit.min(spaces.len())]
            .windows(2)
            .enumerate()
            .map(|(i, pair)| {
                let (before, after) = (pair[0], pair[1]);
                let percent = if before > 0. {
                    (1. - after / before) * 100.
                } else {
                    0.
                };
                Reduction {
                    attempt: i + 1,
                    before,
                    after,
                    percent,
                }
            })
            .collect()
    }
}

/// Plays `games` automatic games on random secrets.
pub fn run_experiment<R: Rng>(
    solver: &Solver,
    games: usize,
    rng: &mut R,
) -> Result<ExperimentReport, SolverError> {
    let started_at = Local::now();
    let start = Instant::now();
    let mut attempts_per_game = Vec::with_capacity(games);
    let mut histories = Vec::with_capacity(games);

    for i in 0..games {
        if i % PROGRESS_EVERY == 0 {
            log::info!("Game {i}/{games}");
        }
        let secret = random_code(solver.config(), rng);
        let outcome = solver.solve(&secret, &mut *rng)?;
        attempts_per_game.push(outcome.attempts);
        histories.push(outcome.history);
    }

    let elapsed = start.elapsed();
    log::info!("Experiment finished in {:.2}s", elapsed.as_secs_f64());

    Ok(ExperimentReport {
        started_at,
        elapsed,
        attempts_per_game,
        mean_space_per_attempt: mean_space_per_attempt(&histories),
    })
}

/// Averages histories index by index. Shorter histories are padded with
/// their last value so every game counts at every index.
#[must_use]
pub fn mean_space_per_attempt(histories: &[Vec<usize>]) -> Vec<f64> {
    let Some(longest) = histories.iter().map(Vec::len).max() else {
        return Vec::new();
    };

    (0..longest)
        .map(|j| {
            let total: usize = histories
                .iter()
                .map(|h| h.get(j).or_else(|| h.last()).copied().unwrap_or(0))
                .sum();
            total as f64 / histories.len() as f64
        })
        .collect()
}
