//! The `minishell` binary: a read-eval loop over stdin, following the same
//! shape as `yash_cli::main` — build an environment, install startup signal
//! dispositions, then loop reading, parsing, and executing lines — but
//! collapsed to this shell's synchronous, non-scripted scope (no rcfiles,
//! no positional arguments, no `-c`/`-s` switches).

mod config;

use config::Config;
use minishell_env::Env;
use minishell_semantics::{build_exec_pipeline, collect_heredocs, execute, SignalContext};
use minishell_syntax::{lex_line, parse};
use rustyline::error::ReadlineError;
use rustyline::{Config as RustylineConfig, DefaultEditor};
use tracing::{debug, warn};

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let config = Config::from_env();
    let mut env = Env::from_host_env("minishell");
    let _ = minishell_semantics::signal::install(SignalContext::Interactive);

    let mut editor = new_editor();
    load_history(&mut editor, &config);

    let status = run_loop(&mut editor, &config, &mut env);

    save_history(&mut editor, &config);
    std::process::exit(status as i32);
}

fn new_editor() -> DefaultEditor {
    let rl_config = RustylineConfig::builder().auto_add_history(true).build();
    DefaultEditor::with_config(rl_config).expect("failed to initialize line editor")
}

fn load_history(editor: &mut DefaultEditor, config: &Config) {
    if let Some(path) = &config.history_file {
        if let Err(e) = editor.load_history(path) {
            debug!(error = %e, "no previous history loaded");
        }
    }
}

fn save_history(editor: &mut DefaultEditor, config: &Config) {
    if let Some(path) = &config.history_file {
        if let Err(e) = editor.save_history(path) {
            warn!(error = %e, "failed to persist command history");
        }
    }
}

/// Runs the read-eval loop until EOF or `exit`, returning the final status.
fn run_loop(editor: &mut DefaultEditor, config: &Config, env: &mut Env) -> u8 {
    loop {
        match editor.readline(&config.primary_prompt) {
            Ok(line) => {
                if let Some(exit_status) = run_line(&line, config, env) {
                    return exit_status;
                }
            }
            Err(ReadlineError::Interrupted) => {
                env.last_status = 130;
            }
            Err(ReadlineError::Eof) => return env.last_status,
            Err(e) => {
                warn!(error = %e, "line editor error");
                return env.last_status;
            }
        }
    }
}

/// Parses and executes one line. Returns `Some(status)` if the shell should
/// exit (via the `exit` built-in), otherwise `None` after updating
/// `env.last_status`.
fn run_line(line: &str, config: &Config, env: &mut Env) -> Option<u8> {
    let tokens = match lex_line(line) {
        Ok(tokens) => tokens,
        Err(e) => {
            eprintln!("minishell: {e}");
            env.last_status = 2;
            return None;
        }
    };

    let mut pipeline = match parse(tokens) {
        Ok(Some(pipeline)) => pipeline,
        Ok(None) => return None,
        Err(e) => {
            eprintln!("minishell: {e}");
            env.last_status = 2;
            return None;
        }
    };

    if collect_heredocs(&mut pipeline, env, &config.secondary_prompt).is_err() {
        env.last_status = 130;
        return None;
    }

    let plan = build_exec_pipeline(&pipeline, env);
    execute_and_detect_exit(&plan, env)
}

/// Runs `plan` and reports whether it asked the shell to exit. `execute`
/// already applies a lone `exit` stage's redirections before dispatching
/// it (the same in-parent builtin path every other lone builtin takes), so
/// this just has to look at which `Outcome` came back.
fn execute_and_detect_exit(plan: &minishell_semantics::ExecPipeline, env: &mut Env) -> Option<u8> {
    match execute(plan, env) {
        minishell_builtin::Outcome::Exit(status) => Some(status),
        minishell_builtin::Outcome::Status(status) => {
            env.last_status = status;
            None
        }
    }
}
