//! The **`pwd`** built-in.
//!
//! Prints the current working directory followed by a newline. Ignores
//! arguments (the source spec does not define option handling beyond the
//! straightforward bodies we're told to treat as external collaborators).

use crate::Outcome;
use std::io::Write;

pub fn run(_args: &[String], out: &mut dyn Write, err: &mut dyn Write) -> Outcome {
    match std::env::current_dir() {
        Ok(path) => {
            let _ = writeln!(out, "{}", path.display());
            Outcome::Status(0)
        }
        Err(e) => {
            let _ = writeln!(err, "minishell: pwd: {e}");
            Outcome::Status(1)
        }
    }
}
