//! Error kinds raised while expanding, redirecting, resolving, and
//! executing a pipeline (§7). Each is a `thiserror`-derived enum scoped to
//! the subsystem that raises it, matching the nested-error-enum convention
//! `yash_syntax::parser::Error`/`ErrorCause` uses to keep `Display`
//! formatting colocated with the variant that produces it.
//!
//! Every message this module formats is written with the `minishell: `
//! prefix required by §7; callers just need to `eprintln!("{error}")`.

use nix::errno::Errno;
use thiserror::Error;

/// A redirection could not be opened or wired up.
#[derive(Debug, Error)]
pub enum RedirError {
    #[error("minishell: {target}: {source}")]
    Open {
        target: String,
        #[source]
        source: std::io::Error,
    },
}

/// A command name could not be resolved to an executable.
#[derive(Debug, Error)]
pub enum ResolutionError {
    #[error("minishell: {0}: command not found")]
    NotFound(String),
    #[error("minishell: {0}: permission denied")]
    NotExecutable(String),
}

/// A syscall needed to set up the pipeline itself (fork, pipe, dup2)
/// failed. Fatal to the pipeline: the executor aborts setup, waits for
/// whatever children already exist, and reports `last_status = 1`.
#[derive(Debug, Error)]
pub enum SystemError {
    #[error("minishell: fork: {0}")]
    Fork(Errno),
    #[error("minishell: pipe: {0}")]
    Pipe(Errno),
    #[error("minishell: dup2: {0}")]
    Dup2(Errno),
}

/// Composes every error that can arise while applying a stage's
/// redirections, so `apply_redirs` and its callers only need one `Result`
/// type and a single `eprintln!("{error}")`, following the same
/// `#[from]`-conversion composition `yash_syntax::parser::Error` uses to
/// fold its own subsystem error causes into one reportable type.
#[derive(Debug, Error)]
pub enum ShellError {
    #[error(transparent)]
    Redir(#[from] RedirError),
    #[error(transparent)]
    System(#[from] SystemError),
}
