//! The **`env`** built-in.
//!
//! Prints every `NAME=VALUE` pair in the environment whose name is marked
//! exported, one per line. Ignores arguments.

use crate::Outcome;
use minishell_env::Env;
use std::io::Write;

pub fn run(_args: &[String], env: &Env, out: &mut dyn Write) -> Outcome {
    for (name, value) in env.exported_iter() {
        let _ = writeln!(out, "{name}={value}");
    }
    Outcome::Status(0)
}
