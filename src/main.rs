use mastermind_solver::cli::{
    Command, build_config, make_rng, parse_cli, run_auto, run_experiment_report, run_play,
};
use mastermind_solver::{GameOutcome, Solver, logging};
use std::io;
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = parse_cli();
    logging::init(cli.verbose);

    let config = match build_config(&cli) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{e}");
            return ExitCode::FAILURE;
        }
    };

    let solver = Solver::new(config);
    let mut rng = make_rng(cli.seed);
    println!(
        "Loaded {} possible codes ({} colors: {}).",
        solver.universe_size(),
        solver.config().alphabet().len(),
        solver.config().alphabet().names().join(", ")
    );

    let result = match cli.command.clone().unwrap_or_default() {
        Command::Auto { secret } => run_auto(&solver, secret.as_deref(), &mut rng).map(|_| ()),
        Command::Experiment { games } => {
            run_experiment_report(&solver, games, &mut rng).map(|_| ())
        }
        Command::Play { on_contradiction } => {
            let stdin = io::stdin();
            match run_play(&solver, stdin.lock(), on_contradiction, rng) {
                GameOutcome::Aborted => {
                    eprintln!("Game aborted after contradictory feedback.");
                    return ExitCode::FAILURE;
                }
                GameOutcome::Solved(_) | GameOutcome::Exited => Ok(()),
            }
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{e}");
            ExitCode::FAILURE
        }
    }
}
