//! The **`exit`** built-in.
//!
//! ```text
//! exit [n]
//! ```
//!
//! With no argument, exits with the last pipeline's status. With a numeric
//! argument, exits with `n mod 256`. A non-numeric argument or more than
//! one argument is a built-in error that does NOT terminate the shell.

use crate::Outcome;
use minishell_env::Env;
use std::io::Write;

pub fn run(args: &[String], env: &Env, err: &mut dyn Write) -> Outcome {
    match args {
        [] => Outcome::Exit(env.last_status),
        [n] => match n.parse::<i64>() {
            Ok(n) => Outcome::Exit(n.rem_euclid(256) as u8),
            Err(_) => {
                let _ = writeln!(err, "minishell: exit: numeric argument required");
                Outcome::Status(255)
            }
        },
        _ => {
            let _ = writeln!(err, "minishell: exit: too many arguments");
            Outcome::Status(1)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(a: &[&str]) -> Vec<String> {
        a.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn no_arg_uses_last_status() {
        let mut env = Env::from_host_env("minishell");
        env.last_status = 7;
        let mut err = Vec::new();
        assert_eq!(run(&args(&[]), &env, &mut err), Outcome::Exit(7));
    }

    #[test]
    fn numeric_argument_mods_256() {
        let env = Env::from_host_env("minishell");
        let mut err = Vec::new();
        assert_eq!(run(&args(&["258"]), &env, &mut err), Outcome::Exit(2));
    }

    #[test]
    fn non_numeric_argument_is_an_error_without_exiting() {
        let env = Env::from_host_env("minishell");
        let mut err = Vec::new();
        assert_eq!(run(&args(&["abc"]), &env, &mut err), Outcome::Status(255));
    }

    #[test]
    fn too_many_arguments_is_an_error_without_exiting() {
        let env = Env::from_host_env("minishell");
        let mut err = Vec::new();
        assert_eq!(run(&args(&["1", "2"]), &env, &mut err), Outcome::Status(1));
    }
}
