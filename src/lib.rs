// Library interface for mastermind-solver
// This allows integration tests to access internal modules

pub mod cli;
pub mod code;
pub mod config;
pub mod error;
pub mod experiment;
pub mod game_state;
pub mod logging;
pub mod solver;
pub mod strategy;
pub mod universe;

// Re-export commonly used items for easier testing
pub use code::{Alphabet, Code, Feedback};
pub use config::{GameConfig, StrategyPolicy};
pub use error::SolverError;
pub use game_state::{
    ContradictionPolicy, GameInterface, GameOutcome, Session, SolveOutcome, Solver, UserAction,
    game_loop,
};
pub use solver::{CandidateStore, ConstraintEngine, ScoreMatching, is_consistent, score};
pub use strategy::next_guess;
pub use universe::{generate_universe, random_code};
