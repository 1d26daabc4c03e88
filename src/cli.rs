use crate::code::{Alphabet, Feedback};
use crate::config::{DEFAULT_CODE_LENGTH, GameConfig};
use crate::error::SolverError;
use crate::experiment::{ExperimentReport, run_experiment};
use crate::game_state::{
    ContradictionPolicy, GameInterface, GameOutcome, SolveOutcome, Solver, UserAction, game_loop,
};
use crate::universe::random_code;
use clap::{Parser, Subcommand};
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::io::BufRead;
use std::time::Instant;

const REPORTED_REDUCTIONS: usize = 10;

/// Mastermind code-breaker CLI options
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Comma-separated color names (default: azul,rojo,blanco,negro,verde,purpura)
    #[arg(long, value_delimiter = ',', global = true)]
    pub colors: Option<Vec<String>>,

    /// Number of pegs in a code
    #[arg(short = 'l', long, default_value_t = DEFAULT_CODE_LENGTH, global = true)]
    pub length: usize,

    /// Opening guess, e.g. "azul azul rojo verde"
    #[arg(long, global = true)]
    pub opening: Option<String>,

    /// Seed the random source for reproducible runs
    #[arg(long, global = true)]
    pub seed: Option<u64>,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Solve a secret automatically, random if none is given
    Auto {
        /// Secret code, e.g. "azul rojo verde negro" or "azul, rojo, verde, negro"
        #[arg(short, long)]
        secret: Option<String>,
    },
    /// Keep a secret in mind and answer the solver's guesses
    Play {
        /// What to do when feedback contradicts every remaining code
        #[arg(long, value_enum, default_value_t = ContradictionPolicy::Ignore)]
        on_contradiction: ContradictionPolicy,
    },
    /// Play many automatic games and report search-space statistics
    Experiment {
        /// Number of games to play
        #[arg(short, long, default_value_t = 200)]
        games: usize,
    },
}

impl Default for Command {
    fn default() -> Self {
        Self::Play {
            on_contradiction: ContradictionPolicy::default(),
        }
    }
}

#[must_use]
pub fn parse_cli() -> Cli {
    Cli::parse()
}

/// Builds the game configuration from the command line. Without overrides
/// this is the classic 6-color, 4-peg game.
pub fn build_config(cli: &Cli) -> Result<GameConfig, SolverError> {
    let config = match &cli.colors {
        None if cli.length == DEFAULT_CODE_LENGTH => GameConfig::default(),
        None => GameConfig::new(Alphabet::default(), cli.length)?,
        Some(colors) => GameConfig::new(Alphabet::new(colors)?, cli.length)?,
    };

    match &cli.opening {
        Some(opening) => {
            let opening = config.parse_code(opening)?;
            config.with_opening(opening)
        }
        None => Ok(config),
    }
}

#[must_use]
pub fn make_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}

/// Automatic mode: solves the given (or a random) secret and prints how the
/// search space evolved.
pub fn run_auto(
    solver: &Solver,
    secret: Option<&str>,
    rng: &mut StdRng,
) -> Result<SolveOutcome, SolverError> {
    let alphabet = solver.config().alphabet();
    let secret = match secret {
        Some(input) => solver.config().parse_code(input)?,
        None => {
            let secret = random_code(solver.config(), rng);
            println!("Generated secret: {}", alphabet.render(&secret));
            secret
        }
    };

    println!("\nSolving...");
    let start = Instant::now();
    let outcome = solver.solve(&secret, &mut *rng)?;
    let elapsed = start.elapsed();

    println!(
        "\nSolution {} found in {} attempts!",
        alphabet.render(&outcome.solution),
        outcome.attempts
    );
    println!("Elapsed time: {:.2} seconds", elapsed.as_secs_f64());
    display_history(&outcome.history);
    Ok(outcome)
}

pub fn run_play<R: BufRead>(
    solver: &Solver,
    reader: R,
    policy: ContradictionPolicy,
    rng: StdRng,
) -> GameOutcome {
    let mut session = solver.new_session(rng);
    let mut interface = CliInterface::new(reader);
    game_loop(&mut session, &mut interface, policy)
}

pub fn run_experiment_report(
    solver: &Solver,
    games: usize,
    rng: &mut StdRng,
) -> Result<ExperimentReport, SolverError> {
    println!("Running {games} automatic games...");
    let report = run_experiment(solver, games, rng)?;
    display_experiment_report(&report);
    Ok(report)
}

// UI Input/Output functions

pub fn display_history(history: &[usize]) {
    println!("\nSearch space evolution:");
    for (i, size) in history.iter().enumerate() {
        println!("After attempt {i}: {size} possible codes");
    }
}

pub fn display_experiment_report(report: &ExperimentReport) {
    println!(
        "\n=== RESULTS OF {} AUTOMATIC GAMES (started {}) ===",
        report.games(),
        report.started_at.format("%Y-%m-%d %H:%M:%S")
    );
    println!("Completed in {:.2} seconds", report.elapsed.as_secs_f64());
    println!("Mean attempts needed: {:.2}", report.mean_attempts());
    if let (Some(min), Some(max)) = (report.min_attempts(), report.max_attempts()) {
        println!("Fewest attempts: {min}, most attempts: {max}");
    }

    println!("\nAttempts distribution:");
    for (attempts, games) in report.attempt_distribution() {
        println!("{attempts:>3}: {games}");
    }

    if let Some(initial) = report.mean_space_per_attempt.first() {
        println!("\nInitial search space: {initial:.0}");
    }
    for r in report.reductions(REPORTED_REDUCTIONS) {
        println!(
            "Reduction after attempt {}: {:.0} -> {:.0} ({:.1}%)",
            r.attempt, r.before, r.after, r.percent
        );
    }
}

pub fn display_welcome(config: &GameConfig) {
    println!("Welcome to the Mastermind solver!");
    println!(
        "Think of a secret code of {} pegs using these colors:",
        config.code_length()
    );
    println!("{}", config.alphabet().names().join(", "));
    println!("I will propose guesses and you tell me how close they are ('exit' quits).");
}

pub fn display_guess(attempt: usize, guess: &str) {
    println!("\nAttempt #{attempt}:");
    println!("My guess is: {guess}");
}

pub fn display_space_size(size: usize) {
    println!("Search space reduced to {size} possible codes.");
}

pub fn display_contradiction(error: &SolverError, policy: ContradictionPolicy) {
    println!("\nWARNING: {error}.");
    println!("There may be a mistake in the feedback you entered.");
    let action = match policy {
        ContradictionPolicy::Ignore => "Ignoring this feedback.",
        ContradictionPolicy::Restart => "Starting over with every possible code.",
        ContradictionPolicy::Proceed => "Continuing with no candidates left; guesses will be random.",
        ContradictionPolicy::Abort => "Giving up on this game.",
    };
    println!("{action}");
}

pub fn display_error(error: &SolverError) {
    println!("Error: {error}");
}

pub fn display_solved(attempts: usize) {
    println!("\nSolved in {attempts} attempts!");
}

pub fn display_exit_message() {
    println!("Exiting.");
}

enum CountInput {
    Value(i64),
    Exit,
}

/// Prompts until a count accepted by `valid` is typed. Returns `None` on
/// end of input.
fn read_count<R: BufRead>(
    reader: &mut R,
    prompt: &str,
    retry: &str,
    valid: impl Fn(i64) -> bool,
) -> Option<CountInput> {
    loop {
        println!("{prompt}");
        let mut input = String::new();
        match reader.read_line(&mut input) {
            Ok(0) | Err(_) => return None,
            Ok(_) => {}
        }
        let input = input.trim();
        if input.eq_ignore_ascii_case("exit") {
            return Some(CountInput::Exit);
        }
        match input.parse::<i64>() {
            Ok(n) if valid(n) => return Some(CountInput::Value(n)),
            Ok(_) => println!("{retry}"),
            Err(_) => println!("Please enter a valid number."),
        }
    }
}

pub fn read_feedback<R: BufRead>(reader: &mut R, code_length: usize) -> Option<UserAction> {
    let length = code_length as i64;

    let exact = match read_count(
        reader,
        &format!("Pegs with the right color in the right position (0-{length}):"),
        &format!("Please enter a value between 0 and {length}."),
        |n| (0..=length).contains(&n),
    )? {
        CountInput::Value(n) => n,
        CountInput::Exit => return Some(UserAction::Exit),
    };

    let color_only = match read_count(
        reader,
        &format!("Pegs with the right color in the wrong position (0-{length}):"),
        &format!("Please enter a valid value (the sum with exact pegs may not exceed {length})."),
        |n| (0..=length).contains(&n) && n + exact <= length,
    )? {
        CountInput::Value(n) => n,
        CountInput::Exit => return Some(UserAction::Exit),
    };

    match Feedback::from_raw(exact, color_only, code_length) {
        Ok(feedback) => Some(UserAction::Feedback(feedback)),
        Err(e) => {
            display_error(&e);
            None
        }
    }
}

/// Line-based console player: guesses and space sizes go to stdout, the two
/// peg counts of each answer are read from `reader`.
pub struct CliInterface<R: BufRead> {
    reader: R,
}

impl<R: BufRead> CliInterface<R> {
    pub fn new(reader: R) -> Self {
        Self { reader }
    }
}

impl<R: BufRead> GameInterface for CliInterface<R> {
    fn display_welcome(&mut self, config: &GameConfig) {
        display_welcome(config);
    }

    fn display_guess(&mut self, attempt: usize, guess: &str) {
        display_guess(attempt, guess);
    }

    fn read_feedback(&mut self, code_length: usize) -> Option<UserAction> {
        read_feedback(&mut self.reader, code_length)
    }

    fn display_space_size(&mut self, size: usize) {
        display_space_size(size);
    }

    fn display_contradiction(&mut self, error: &SolverError, policy: ContradictionPolicy) {
        display_contradiction(error, policy);
    }

    fn display_error(&mut self, error: &SolverError) {
        display_error(error);
    }

    fn display_solved(&mut self, attempts: usize) {
        display_solved(attempts);
    }

    fn display_exit_message(&mut self) {
        display_exit_message();
    }
}
