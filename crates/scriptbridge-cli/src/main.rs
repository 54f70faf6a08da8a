//! # ScriptBridge CLI Entry Point
//!
//! ## Usage
//!
//! ```bash
//! # Evaluate an expression
//! scriptbridge eval '1 + 2'
//!
//! # Run a file with a pre-populated global
//! scriptbridge --set 'config={"retries": 3}' run script.js
//!
//! # Interactive session
//! scriptbridge repl --prompt 'js> '
//! ```
//!
//! Results go to stdout. An uncaught exception is printed to stderr as
//! `Uncaught <error>` and the process exits with status 1.

use anyhow::{Context as _, Result};
use argh::FromArgs;
use scriptbridge_cli::{apply_bindings, evaluate, run_repl, Outcome};
use scriptbridge_core::{Engine, EngineConfig, Session, SessionConfig};
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(FromArgs)]
/// ScriptBridge - run JavaScript through an embedded engine
struct Cli {
    /// pre-populate a global as name=<json>; may be repeated
    #[argh(option, long = "set")]
    set: Vec<String>,

    #[argh(subcommand)]
    command: Commands,
}

#[derive(FromArgs)]
#[argh(subcommand)]
enum Commands {
    Eval(EvalArgs),
    Run(RunArgs),
    Repl(ReplArgs),
}

#[derive(FromArgs)]
#[argh(subcommand, name = "eval")]
/// evaluate an expression and print the result
struct EvalArgs {
    /// source text to evaluate
    #[argh(positional)]
    expr: String,

    /// buffer size for the source, terminator included
    ///
    /// A hint smaller than the source length plus one truncates the script.
    #[argh(option, long = "length-hint")]
    length_hint: Option<usize>,
}

#[derive(FromArgs)]
#[argh(subcommand, name = "run")]
/// run a script file and print its completion value
struct RunArgs {
    /// path to the JavaScript file
    #[argh(positional)]
    file: PathBuf,
}

#[derive(FromArgs)]
#[argh(subcommand, name = "repl")]
/// start an interactive session
struct ReplArgs {
    /// prompt shown before each line
    #[argh(option, long = "prompt", default = "\"> \".into()")]
    prompt: String,

    /// do not bind each result to `_`
    #[argh(switch, long = "no-last-result")]
    no_last_result: bool,
}

fn main() -> Result<ExitCode> {
    let cli: Cli = argh::from_env();

    // Logs go to stderr so stdout only carries results.
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(io::stderr)
        .init();

    match cli.command {
        Commands::Eval(args) => {
            let config = EngineConfig::new().with_default_specifier("<eval>");
            let mut engine = Engine::with_config(config)?;
            apply_bindings(&mut engine, &cli.set)?;
            Ok(report(evaluate(&mut engine, &args.expr, args.length_hint)))
        }
        Commands::Run(args) => {
            let source = std::fs::read_to_string(&args.file)
                .with_context(|| format!("Failed to read script {}", args.file.display()))?;
            tracing::debug!(file = %args.file.display(), bytes = source.len(), "loaded script");

            let config = EngineConfig::new().with_default_specifier(args.file.display().to_string());
            let mut engine = Engine::with_config(config)?;
            apply_bindings(&mut engine, &cli.set)?;
            Ok(report(evaluate(&mut engine, &source, None)))
        }
        Commands::Repl(args) => {
            let mut config = SessionConfig::new().with_prompt(args.prompt);
            if args.no_last_result {
                config = config.without_last_result_binding();
            }

            let mut engine = Engine::new();
            apply_bindings(&mut engine, &cli.set)?;
            let mut session = Session::with_engine(engine, config)?;

            run_repl(&mut session, io::stdin().lock(), io::stdout().lock())?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn report(outcome: Outcome) -> ExitCode {
    if outcome.is_exception() {
        eprintln!("{}", outcome.render());
        ExitCode::FAILURE
    } else {
        println!("{}", outcome.render());
        ExitCode::SUCCESS
    }
}
