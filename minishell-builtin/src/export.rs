//! The **`export`** built-in.
//!
//! ```text
//! export [NAME[=VALUE]...]
//! ```
//!
//! With no arguments, prints every variable in sorted order as
//! `declare -x NAME=VALUE`. With arguments, each must be a valid name,
//! optionally followed by `=value`; an invalid name reports an error and
//! moves on to the remaining arguments rather than aborting. `NAME` with no
//! `=` marks an existing variable exported without changing its value, or
//! creates an empty exported variable if absent (§9: resolved this way).

use crate::Outcome;
use minishell_env::{split_assignment, Env};
use std::io::Write;

pub fn run(args: &[String], env: &mut Env, out: &mut dyn Write, err: &mut dyn Write) -> Outcome {
    if args.is_empty() {
        for (name, variable) in env.iter() {
            if variable.exported {
                let _ = writeln!(out, "declare -x {name}=\"{}\"", variable.value);
            }
        }
        return Outcome::Status(0);
    }

    let mut status = 0;
    for arg in args {
        match split_assignment(arg) {
            Ok((name, Some(value))) => {
                env.set(name, value.to_string());
                env.export(name);
            }
            Ok((name, None)) => env.export(name),
            Err(_) => {
                let _ = writeln!(err, "minishell: export: `{arg}`: not a valid identifier");
                status = 1;
            }
        }
    }
    Outcome::Status(status)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(a: &[&str]) -> Vec<String> {
        a.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn sets_and_exports_with_value() {
        let mut env = Env::from_host_env("minishell");
        let mut out = Vec::new();
        let mut err = Vec::new();
        run(&args(&["X=a b"]), &mut env, &mut out, &mut err);
        assert_eq!(env.value("X"), Some("a b"));
        assert!(env.get("X").unwrap().exported);
    }

    #[test]
    fn bare_name_marks_exported_without_changing_value() {
        let mut env = Env::from_host_env("minishell");
        env.set("X", "preset");
        let mut out = Vec::new();
        let mut err = Vec::new();
        run(&args(&["X"]), &mut env, &mut out, &mut err);
        assert_eq!(env.value("X"), Some("preset"));
        assert!(env.get("X").unwrap().exported);
    }

    #[test]
    fn bare_name_creates_empty_variable_if_absent() {
        let mut env = Env::from_host_env("minishell");
        env.unset("NEWVAR");
        let mut out = Vec::new();
        let mut err = Vec::new();
        run(&args(&["NEWVAR"]), &mut env, &mut out, &mut err);
        assert_eq!(env.value("NEWVAR"), Some(""));
        assert!(env.get("NEWVAR").unwrap().exported);
    }

    #[test]
    fn invalid_name_reports_error_and_continues() {
        let mut env = Env::from_host_env("minishell");
        let mut out = Vec::new();
        let mut err = Vec::new();
        let outcome = run(&args(&["1BAD", "GOOD=ok"]), &mut env, &mut out, &mut err);
        assert_eq!(outcome, Outcome::Status(1));
        assert_eq!(env.value("GOOD"), Some("ok"));
    }
}
