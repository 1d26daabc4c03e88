use crate::code::{Code, Feedback};
use crate::config::GameConfig;
use crate::error::SolverError;
use crate::solver::{CandidateStore, score};
use crate::universe::generate_universe;
use crate::{info_log, strategy};
use clap::ValueEnum;
use rand::Rng;
use std::sync::Arc;

/// What to do when feedback rules out every remaining candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum ContradictionPolicy {
    /// Drop the feedback and keep the current candidates.
    #[default]
    Ignore,
    /// Start over from the full universe, keeping the attempt count.
    Restart,
    /// Commit the empty candidate set; later guesses are random codes.
    Proceed,
    /// End the session.
    Abort,
}

/// Result of a solved session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SolveOutcome {
    pub attempts: usize,
    pub history: Vec<usize>,
    pub solution: Code,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GameOutcome {
    Solved(SolveOutcome),
    Exited,
    Aborted,
}

/// Holds the configuration and the universe, which is enumerated once and
/// shared by every session.
#[derive(Debug, Clone)]
pub struct Solver {
    config: Arc<GameConfig>,
    universe: Arc<[Code]>,
}

impl Solver {
    #[must_use]
    pub fn new(config: GameConfig) -> Self {
        let universe: Arc<[Code]> = generate_universe(&config).into();
        info_log!("Generated {} possible codes", universe.len());
        Self {
            config: Arc::new(config),
            universe,
        }
    }

    #[must_use]
    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    #[must_use]
    pub fn universe_size(&self) -> usize {
        self.universe.len()
    }

    pub fn new_session<R: Rng>(&self, rng: R) -> Session<R> {
        Session::new(
            Arc::clone(&self.config),
            CandidateStore::new(Arc::clone(&self.universe)),
            rng,
        )
    }

    /// Scores a guess against a known secret after checking both fit the
    /// configuration.
    pub fn score_against_secret(&self, guess: &Code, secret: &Code) -> Result<Feedback, SolverError> {
        self.config.check_code(guess)?;
        self.config.check_code(secret)?;
        Ok(score(guess, secret))
    }

    /// Plays a fresh session against `secret` until it is found.
    pub fn solve<R: Rng>(&self, secret: &Code, rng: R) -> Result<SolveOutcome, SolverError> {
        self.new_session(rng).solve_against(secret)
    }
}

/// One game: the candidates still possible, the search-space history and the
/// random source used for sampling.
#[derive(Debug)]
pub struct Session<R: Rng> {
    config: Arc<GameConfig>,
    store: CandidateStore,
    history: Vec<usize>,
    attempts: usize,
    rng: R,
}

impl<R: Rng> Session<R> {
    fn new(config: Arc<GameConfig>, store: CandidateStore, rng: R) -> Self {
        let history = vec![store.size()];
        Self {
            config,
            store,
            history,
            attempts: 0,
            rng,
        }
    }

    #[must_use]
    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    #[must_use]
    pub fn store(&self) -> &CandidateStore {
        &self.store
    }

    #[must_use]
    pub fn space_size(&self) -> usize {
        self.store.size()
    }

    /// Candidate-set size before the first guess and after every attempt.
    #[must_use]
    pub fn history(&self) -> &[usize] {
        &self.history
    }

    #[must_use]
    pub fn attempts(&self) -> usize {
        self.attempts
    }

    /// Back to the full universe with an empty history and no attempts.
    pub fn reset(&mut self) {
        self.store.reset();
        self.history = vec![self.store.size()];
        self.attempts = 0;
    }

    /// Proposes the next guess and counts it as an attempt.
    pub fn next_guess(&mut self) -> Code {
        self.attempts += 1;
        strategy::next_guess(&self.store, &self.config, &mut self.rng)
    }

    /// Narrows the candidates with the feedback received for `guess` and
    /// returns the new search-space size.
    ///
    /// On `Contradiction` nothing changes; see [`recover`](Self::recover).
    pub fn apply_feedback(&mut self, guess: &Code, feedback: Feedback) -> Result<usize, SolverError> {
        let code_length = self.config.code_length();
        self.config.check_code(guess)?;
        if !feedback.fits(code_length) {
            return Err(SolverError::InvalidFeedback {
                exact: feedback.exact() as i64,
                color_only: feedback.color_only() as i64,
                code_length,
            });
        }

        match self.store.filter(guess, feedback) {
            Ok(size) => {
                self.history.push(size);
                Ok(size)
            }
            Err(e) => {
                log::warn!(
                    "Feedback ({feedback}) for {} matches no remaining code",
                    self.config.alphabet().render(guess)
                );
                Err(e)
            }
        }
    }

    /// Applies the caller's decision after `apply_feedback` reported a
    /// contradiction. Returns the resulting search-space size, or `None`
    /// when the session should end.
    pub fn recover(
        &mut self,
        guess: &Code,
        feedback: Feedback,
        policy: ContradictionPolicy,
    ) -> Option<usize> {
        let size = match policy {
            ContradictionPolicy::Ignore => self.store.size(),
            ContradictionPolicy::Restart => {
                self.store.reset();
                self.store.size()
            }
            ContradictionPolicy::Proceed => self.store.force_filter(guess, feedback),
            ContradictionPolicy::Abort => return None,
        };
        info_log!("Recovered from contradiction with {policy:?}, {size} candidates");
        self.history.push(size);
        Some(size)
    }

    fn outcome(&self, solution: Code) -> SolveOutcome {
        SolveOutcome {
            attempts: self.attempts,
            history: self.history.clone(),
            solution,
        }
    }

    /// Automatic mode: starts over and plays against a known secret until an
    /// exact match.
    pub fn solve_against(&mut self, secret: &Code) -> Result<SolveOutcome, SolverError> {
        self.config.check_code(secret)?;
        self.reset();
        let code_length = self.config.code_length();

        loop {
            let guess = self.next_guess();
            let feedback = score(&guess, secret);
            if feedback.is_solved(code_length) {
                return Ok(self.outcome(guess));
            }
            // The secret is always consistent with its own feedback, so this
            // can never contradict.
            self.apply_feedback(&guess, feedback)?;
        }
    }
}

pub enum UserAction {
    Feedback(Feedback),
    Exit,
}

/// Front end for interactive mode: shows guesses and collects feedback from
/// whoever holds the secret.
pub trait GameInterface {
    fn display_welcome(&mut self, config: &GameConfig);
    fn display_guess(&mut self, attempt: usize, guess: &str);
    /// Returns `None` when input is exhausted.
    fn read_feedback(&mut self, code_length: usize) -> Option<UserAction>;
    fn display_space_size(&mut self, size: usize);
    fn display_contradiction(&mut self, error: &SolverError, policy: ContradictionPolicy);
    fn display_error(&mut self, error: &SolverError);
    fn display_solved(&mut self, attempts: usize);
    fn display_exit_message(&mut self);
}

/// Interactive mode: the session proposes guesses, the interface supplies
/// the feedback.
pub fn game_loop<R: Rng, I: GameInterface>(
    session: &mut Session<R>,
    interface: &mut I,
    policy: ContradictionPolicy,
) -> GameOutcome {
    session.reset();
    let code_length = session.config().code_length();
    interface.display_welcome(session.config());

    loop {
        let guess = session.next_guess();
        let rendered = session.config().alphabet().render(&guess);
        interface.display_guess(session.attempts(), &rendered);

        let feedback = match interface.read_feedback(code_length) {
            Some(UserAction::Feedback(feedback)) => feedback,
            Some(UserAction::Exit) | None => {
                interface.display_exit_message();
                return GameOutcome::Exited;
            }
        };

        if feedback.is_solved(code_length) {
            interface.display_solved(session.attempts());
            return GameOutcome::Solved(session.outcome(guess));
        }

        match session.apply_feedback(&guess, feedback) {
            Ok(size) => interface.display_space_size(size),
            Err(e @ SolverError::Contradiction { .. }) => {
                interface.display_contradiction(&e, policy);
                match session.recover(&guess, feedback, policy) {
                    Some(size) => interface.display_space_size(size),
                    None => return GameOutcome::Aborted,
                }
            }
            Err(e) => interface.display_error(&e),
        }
    }
}
