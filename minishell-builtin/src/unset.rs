//! The **`unset`** built-in.
//!
//! ```text
//! unset NAME...
//! ```
//!
//! Removes each valid name from the environment. An invalid name reports
//! an error and status 1 but does not stop the remaining names from being
//! processed.

use crate::Outcome;
use minishell_env::{is_valid_name, Env};
use std::io::Write;

pub fn run(args: &[String], env: &mut Env, err: &mut dyn Write) -> Outcome {
    let mut status = 0;
    for name in args {
        if is_valid_name(name) {
            env.unset(name);
        } else {
            let _ = writeln!(err, "minishell: unset: `{name}`: not a valid identifier");
            status = 1;
        }
    }
    Outcome::Status(status)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn removes_variable() {
        let mut env = Env::from_host_env("minishell");
        env.set("X", "y");
        let mut err = Vec::new();
        run(&["X".to_string()], &mut env, &mut err);
        assert_eq!(env.value("X"), None);
    }

    #[test]
    fn invalid_name_is_an_error_but_continues() {
        let mut env = Env::from_host_env("minishell");
        env.set("GOOD", "1");
        let mut err = Vec::new();
        let outcome = run(
            &["1BAD".to_string(), "GOOD".to_string()],
            &mut env,
            &mut err,
        );
        assert_eq!(outcome, Outcome::Status(1));
        assert_eq!(env.value("GOOD"), None);
    }
}
