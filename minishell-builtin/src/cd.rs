//! The **`cd`** built-in.
//!
//! ```text
//! cd [path]
//! ```
//!
//! No argument or `~` changes to `$HOME` (an unset `HOME` is an error).
//! `-` changes to `$OLDPWD` and echoes the new directory, matching the
//! conventional `cd -` behavior. Any other argument is used as a literal
//! path. On success, `OLDPWD` is set to the prior working directory and
//! `PWD` to the new one.

use crate::Outcome;
use minishell_env::Env;
use std::io::Write;
use std::path::PathBuf;

enum Target {
    Path(PathBuf),
    Previous(PathBuf),
}

fn resolve(args: &[String], env: &Env) -> Result<Target, String> {
    let arg = args.first().map(String::as_str);
    match arg {
        None | Some("~") => match env.value("HOME") {
            Some(home) => Ok(Target::Path(PathBuf::from(home))),
            None => Err("HOME not set".to_string()),
        },
        Some("-") => match env.value("OLDPWD") {
            Some(oldpwd) => Ok(Target::Previous(PathBuf::from(oldpwd))),
            None => Err("OLDPWD not set".to_string()),
        },
        Some(path) => Ok(Target::Path(PathBuf::from(path))),
    }
}

pub fn run(args: &[String], env: &mut Env, out: &mut dyn Write, err: &mut dyn Write) -> Outcome {
    let target = match resolve(args, env) {
        Ok(target) => target,
        Err(message) => {
            let _ = writeln!(err, "minishell: cd: {message}");
            return Outcome::Status(1);
        }
    };

    let (path, echo) = match target {
        Target::Path(path) => (path, false),
        Target::Previous(path) => (path, true),
    };

    let prior_cwd = std::env::current_dir();

    if let Err(e) = std::env::set_current_dir(&path) {
        let _ = writeln!(err, "minishell: cd: {}: {e}", path.display());
        return Outcome::Status(1);
    }

    if echo {
        let _ = writeln!(out, "{}", path.display());
    }

    if let Ok(prior) = prior_cwd {
        env.set("OLDPWD", prior.to_string_lossy().into_owned());
    }
    if let Ok(new_cwd) = std::env::current_dir() {
        env.set("PWD", new_cwd.to_string_lossy().into_owned());
    }

    Outcome::Status(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cd_with_no_home_is_an_error() {
        let mut env = Env::from_host_env("minishell");
        env.unset("HOME");
        let mut out = Vec::new();
        let mut err = Vec::new();
        let outcome = run(&[], &mut env, &mut out, &mut err);
        assert_eq!(outcome, Outcome::Status(1));
        assert!(String::from_utf8(err).unwrap().contains("HOME not set"));
    }

    #[test]
    fn cd_round_trip_sets_oldpwd() {
        let dir_a = tempfile::tempdir().unwrap();
        let dir_b = std::fs::canonicalize(tempfile::tempdir().unwrap().into_path()).unwrap();
        let mut env = Env::from_host_env("minishell");
        let mut out = Vec::new();
        let mut err = Vec::new();

        run(
            &[dir_a.path().to_string_lossy().into_owned()],
            &mut env,
            &mut out,
            &mut err,
        );
        let a_canon = std::env::current_dir().unwrap();

        run(
            &[dir_b.to_string_lossy().into_owned()],
            &mut env,
            &mut out,
            &mut err,
        );
        run(&["-".to_string()], &mut env, &mut out, &mut err);

        assert_eq!(std::env::current_dir().unwrap(), a_canon);
        assert_eq!(env.value("OLDPWD").map(PathBuf::from), Some(dir_b));
    }
}
