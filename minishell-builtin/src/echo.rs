//! The **`echo`** built-in.
//!
//! ```text
//! echo [-n] args...
//! ```
//!
//! Joins `args` with a single space and writes them to standard output,
//! followed by a newline unless `-n` was given. A leading argument is
//! treated as the `-n` flag only if it is a run of one or more `n`s after
//! a single hyphen (`-n`, `-nn`, ...); anything else is an operand.

use crate::Outcome;
use std::io::Write;

fn is_n_flag(arg: &str) -> bool {
    arg.strip_prefix('-')
        .is_some_and(|rest| !rest.is_empty() && rest.chars().all(|c| c == 'n'))
}

pub fn run(args: &[String], out: &mut dyn Write) -> Outcome {
    let (suppress_newline, words) = match args.split_first() {
        Some((first, rest)) if is_n_flag(first) => (true, rest),
        _ => (false, args),
    };

    let line = words.join(" ");
    let _ = write!(out, "{line}");
    if !suppress_newline {
        let _ = writeln!(out);
    }
    Outcome::Status(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run_str(args: &[&str]) -> String {
        let mut out = Vec::new();
        run(&args.iter().map(|s| s.to_string()).collect::<Vec<_>>(), &mut out);
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn joins_with_spaces_and_trailing_newline() {
        assert_eq!(run_str(&["hello", "world"]), "hello world\n");
    }

    #[test]
    fn dash_n_suppresses_newline() {
        assert_eq!(run_str(&["-n", "hello"]), "hello");
    }

    #[test]
    fn dash_nn_is_also_the_flag() {
        assert_eq!(run_str(&["-nn", "hi"]), "hi");
    }

    #[test]
    fn dash_alone_is_not_the_flag() {
        assert_eq!(run_str(&["-", "hi"]), "- hi\n");
    }

    #[test]
    fn no_args_prints_blank_line() {
        assert_eq!(run_str(&[]), "\n");
    }
}
