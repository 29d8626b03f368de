//! Built-in command implementations and their dispatch contract.
//!
//! Each built-in is implemented in its own submodule named after the
//! utility, exposing a `run` function with the shape `(argv, env, out, err)
//! -> Outcome`, the same per-builtin-module convention `yash_builtin` uses.
//! We specify only the dispatch contract and the required semantics from
//! §4.5; the bodies below are the straightforward, spec-mandated behavior.

pub mod cd;
pub mod echo;
pub mod env_builtin;
pub mod exit;
pub mod export;
pub mod pwd;
pub mod unset;

use minishell_env::Env;
use std::io::Write;

/// What a built-in asks its caller to do afterward.
///
/// Distinguishing `Exit` from `Status` lets the same builtin body run
/// in-process (where `exit` must terminate the whole shell / REPL loop) or
/// inside a forked pipeline stage (where the caller just calls
/// `std::process::exit` with the code) without the builtin itself reaching
/// for `std::process::exit`, which would skip fd/resource cleanup on the
/// in-process path.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Outcome {
    Status(u8),
    Exit(u8),
}

impl Outcome {
    pub fn status(self) -> u8 {
        match self {
            Outcome::Status(s) | Outcome::Exit(s) => s,
        }
    }
}

/// Whether `name` names a built-in utility (case-sensitive, per §4.5).
pub fn is_builtin(name: &str) -> bool {
    matches!(
        name,
        "cd" | "echo" | "env" | "exit" | "export" | "pwd" | "unset"
    )
}

/// Runs the built-in named `argv[0]` against `env`, writing to `out`/`err`.
///
/// Panics if `argv` is empty or `argv[0]` is not a built-in; callers must
/// check [`is_builtin`] first (mirroring `yash_builtin`'s contract that
/// dispatch only ever happens after a successful name lookup).
pub fn dispatch(
    argv: &[String],
    env: &mut Env,
    out: &mut dyn Write,
    err: &mut dyn Write,
) -> Outcome {
    let args = &argv[1..];
    match argv[0].as_str() {
        "cd" => cd::run(args, env, out, err),
        "echo" => echo::run(args, out),
        "env" => env_builtin::run(args, env, out),
        "exit" => exit::run(args, env, err),
        "export" => export::run(args, env, out, err),
        "pwd" => pwd::run(args, out, err),
        "unset" => unset::run(args, env, err),
        other => panic!("{other} is not a built-in"),
    }
}
