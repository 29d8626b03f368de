//! Reads heredoc bodies interactively before any pipeline stage is forked,
//! so a SIGINT during entry aborts cleanly in the parent (§4.4).
//!
//! Unlike the main REPL loop — which reads commands through the injected
//! line editor (`rustyline` in `minishell-cli`) — heredoc bodies are read
//! with a small raw-fd line reader over stdin directly. This lets a SIGINT
//! interrupt the blocking read with `EINTR` instead of being swallowed by
//! a line editor that disables signal-generating terminal input, matching
//! the HEREDOC row of the signal disposition table in §4.6.

use crate::expand::expand_line_no_split;
use crate::signal::{self, Context as SignalContext};
use minishell_env::Env;
use minishell_syntax::{Pipeline, RedirOp};
use nix::errno::Errno;
use std::io::Write;

/// The pipeline was aborted by SIGINT before any stage was forked.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Aborted;

/// Collects every heredoc body in `pipeline`, in pipeline order, filling
/// in each [`minishell_syntax::Redir::heredoc_body`]. Installs the HEREDOC
/// signal disposition for the duration and restores INTERACTIVE afterward.
pub fn collect_heredocs(
    pipeline: &mut Pipeline,
    env: &Env,
    secondary_prompt: &str,
) -> Result<(), Aborted> {
    let _ = signal::install(SignalContext::Heredoc);
    let result = collect_inner(pipeline, env, secondary_prompt);
    let _ = signal::install(SignalContext::Interactive);
    result
}

fn collect_inner(pipeline: &mut Pipeline, env: &Env, secondary_prompt: &str) -> Result<(), Aborted> {
    let mut reader = RawLineReader::new();

    for command in &mut pipeline.commands {
        for redir in &mut command.redirs {
            if redir.op != RedirOp::Heredoc {
                continue;
            }
            let delimiter = redir.target.raw_text();
            let expand_body = redir.target.is_entirely_unquoted();
            let mut lines = Vec::new();

            loop {
                print!("{secondary_prompt}");
                let _ = std::io::stdout().flush();
                match reader.next_line() {
                    ReadOutcome::Line(line) if line == delimiter => break,
                    ReadOutcome::Line(line) => lines.push(if expand_body {
                        expand_line_no_split(&line, env)
                    } else {
                        line
                    }),
                    ReadOutcome::Eof => break,
                    ReadOutcome::Interrupted => return Err(Aborted),
                }
            }

            let mut body = String::new();
            for line in &lines {
                body.push_str(line);
                body.push('\n');
            }
            redir.heredoc_body = Some(body);
        }
    }

    Ok(())
}

enum ReadOutcome {
    Line(String),
    Eof,
    Interrupted,
}

/// Reads newline-terminated lines from fd 0 a raw chunk at a time, so an
/// interrupted `read(2)` surfaces as [`ReadOutcome::Interrupted`] instead
/// of being retried transparently the way `std::io::Stdin` retries on
/// `EINTR`.
struct RawLineReader {
    pending: Vec<u8>,
}

impl RawLineReader {
    fn new() -> Self {
        RawLineReader { pending: Vec::new() }
    }

    fn next_line(&mut self) -> ReadOutcome {
        loop {
            if let Some(pos) = self.pending.iter().position(|&b| b == b'\n') {
                let line = self.pending.drain(..=pos).collect::<Vec<u8>>();
                let line = String::from_utf8_lossy(&line[..line.len() - 1]).into_owned();
                return ReadOutcome::Line(line);
            }

            let mut chunk = [0u8; 4096];
            match nix::unistd::read(libc::STDIN_FILENO, &mut chunk) {
                Ok(0) if self.pending.is_empty() => return ReadOutcome::Eof,
                Ok(0) => {
                    let line = String::from_utf8_lossy(&self.pending).into_owned();
                    self.pending.clear();
                    return ReadOutcome::Line(line);
                }
                Ok(n) => self.pending.extend_from_slice(&chunk[..n]),
                Err(Errno::EINTR) => {
                    if signal::take_sigint() {
                        return ReadOutcome::Interrupted;
                    }
                    // Interrupted by something other than SIGINT: keep reading.
                }
                Err(_) => return ReadOutcome::Eof,
            }
        }
    }
}
