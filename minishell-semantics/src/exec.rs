//! Runs an expanded pipeline (§4.5).
//!
//! A single built-in stage, and a single redirection-only stage with no
//! command at all, both run in the parent process with their redirections
//! applied to saved-and-restored fds, the same `EXEC_BUILTIN_MAIN`-style
//! fast path a real shell takes so a `cd`/`export`/`exit` (or a bare `>
//! out.txt`) actually mutates the shell's own state instead of a forked
//! copy of it. Everything else — external commands, or any pipeline with
//! more than one stage — forks one child per stage and wires them
//! together with pipes, following the fork/dup2/execve dance
//! `yash_env::system::real::System` wraps at the syscall level.

use crate::error::{RedirError, ResolutionError, ShellError, SystemError};
use crate::plan::{ExecCommand, ExecPipeline, ExecRedir};
use crate::signal::{self, Context as SignalContext};
use minishell_builtin as builtin;
use minishell_builtin::Outcome;
use minishell_env::Env;
use minishell_syntax::RedirOp;
use nix::errno::Errno;
use nix::fcntl::{self, OFlag};
use nix::sys::stat::Mode;
use nix::sys::wait::{waitpid, WaitStatus};
use nix::unistd::{self, ForkResult, Pid};
use std::ffi::CString;
use std::io::{self, Write};
use std::os::fd::RawFd;
use std::path::Path;
use tracing::{debug, trace};

/// Runs `plan` to completion and returns the outcome the caller should act
/// on. Only the in-parent builtin path can return `Outcome::Exit`: `exit`
/// run inside a forked stage just ends that child, the same as any other
/// process exit, so the forked path always reports a plain `Status`.
///
/// A pipeline of length zero (the empty line, or a line that was entirely a
/// comment-free no-op) never reaches this function; callers only call it
/// once the pipeline has at least one stage.
pub fn execute(plan: &ExecPipeline, env: &mut Env) -> Outcome {
    if plan.len() == 1 {
        let stage = &plan.stages[0];
        if is_lone_builtin(stage) {
            return run_builtin_in_parent(stage, env);
        }
        if stage.argv.is_empty() {
            return Outcome::Status(run_redirs_only_in_parent(stage));
        }
    }
    Outcome::Status(run_forked_pipeline(plan, env))
}

fn is_lone_builtin(stage: &ExecCommand) -> bool {
    stage
        .argv
        .first()
        .is_some_and(|name| builtin::is_builtin(name))
}

/// Runs a single built-in stage in the shell's own process. Redirections
/// are applied to fds 0/1/2 after saving the originals with `dup`, and
/// restored once the built-in returns, so the shell's own streams survive.
fn run_builtin_in_parent(stage: &ExecCommand, env: &mut Env) -> Outcome {
    let saved = match SavedFds::save() {
        Ok(saved) => saved,
        Err(e) => {
            eprintln!("minishell: {e}");
            return Outcome::Status(1);
        }
    };

    let outcome = match apply_redirs(&stage.redirs) {
        Ok(()) => {
            debug!(argv = ?stage.argv, "running built-in in parent process");
            let mut stdout = io::stdout();
            let mut stderr = io::stderr();
            builtin::dispatch(&stage.argv, env, &mut stdout, &mut stderr)
        }
        Err(e) => {
            eprintln!("{e}");
            Outcome::Status(1)
        }
    };

    saved.restore();
    outcome
}

/// Runs a single stage whose `argv` is empty (a bare `> out.txt`): nothing
/// to execute, but its redirections still take effect for their side
/// effects, in the parent process rather than a fork, per the same
/// lone-stage invariant `run_builtin_in_parent` follows.
fn run_redirs_only_in_parent(stage: &ExecCommand) -> u8 {
    let saved = match SavedFds::save() {
        Ok(saved) => saved,
        Err(e) => {
            eprintln!("minishell: {e}");
            return 1;
        }
    };

    let status = match apply_redirs(&stage.redirs) {
        Ok(()) => {
            debug!("applied redirection-only stage in parent process");
            0
        }
        Err(e) => {
            eprintln!("{e}");
            1
        }
    };

    saved.restore();
    status
}

/// Duplicates fds 0/1/2 so they can be restored after a parent-process
/// built-in's redirections are undone.
struct SavedFds {
    stdin: RawFd,
    stdout: RawFd,
    stderr: RawFd,
}

impl SavedFds {
    fn save() -> nix::Result<Self> {
        Ok(SavedFds {
            stdin: unistd::dup(0)?,
            stdout: unistd::dup(1)?,
            stderr: unistd::dup(2)?,
        })
    }

    fn restore(self) {
        if let Err(errno) = unistd::dup2(self.stdin, 0) {
            eprintln!("{}", SystemError::Dup2(errno));
        }
        if let Err(errno) = unistd::dup2(self.stdout, 1) {
            eprintln!("{}", SystemError::Dup2(errno));
        }
        if let Err(errno) = unistd::dup2(self.stderr, 2) {
            eprintln!("{}", SystemError::Dup2(errno));
        }
        let _ = unistd::close(self.stdin);
        let _ = unistd::close(self.stdout);
        let _ = unistd::close(self.stderr);
    }
}

/// Forks one child per stage, wires stdin/stdout through N-1 pipes, and
/// waits for all of them. Returns the status derived from the last stage.
fn run_forked_pipeline(plan: &ExecPipeline, env: &Env) -> u8 {
    let n = plan.len();
    let mut pipes = Vec::with_capacity(n.saturating_sub(1));
    for _ in 0..n.saturating_sub(1) {
        match unistd::pipe() {
            Ok(ends) => pipes.push(ends),
            Err(errno) => {
                eprintln!("{}", SystemError::Pipe(errno));
                for (r, w) in &pipes {
                    let _ = unistd::close(*r);
                    let _ = unistd::close(*w);
                }
                return 1;
            }
        }
    }
    trace!(stages = n, pipes = pipes.len(), "wired pipeline pipes");

    let mut children = Vec::with_capacity(n);
    for (i, stage) in plan.stages.iter().enumerate() {
        match unsafe { unistd::fork() } {
            Ok(ForkResult::Parent { child }) => {
                trace!(stage = i, pid = child.as_raw(), "forked pipeline stage");
                children.push(child);
            }
            Ok(ForkResult::Child) => {
                run_child_stage(i, n, stage, &pipes, env);
                unreachable!("run_child_stage always exits the process");
            }
            Err(errno) => {
                eprintln!("{}", SystemError::Fork(errno));
                for (r, w) in &pipes {
                    let _ = unistd::close(*r);
                    let _ = unistd::close(*w);
                }
                for child in &children {
                    let _ = waitpid(*child, None);
                }
                return 1;
            }
        }
    }

    for (r, w) in &pipes {
        let _ = unistd::close(*r);
        let _ = unistd::close(*w);
    }

    let mut last_status = 0u8;
    for (i, child) in children.into_iter().enumerate() {
        let status = wait_for(child);
        if i == n - 1 {
            last_status = status;
        }
    }
    last_status
}

/// The child side of one pipeline stage. Never returns: every path ends in
/// `std::process::exit`.
fn run_child_stage(
    index: usize,
    stage_count: usize,
    stage: &ExecCommand,
    pipes: &[(RawFd, RawFd)],
    env: &Env,
) -> ! {
    let _ = signal::install(SignalContext::Child);

    if index > 0 {
        let (read_end, _) = pipes[index - 1];
        if let Err(errno) = unistd::dup2(read_end, 0) {
            eprintln!("{}", SystemError::Dup2(errno));
            std::process::exit(1);
        }
    }
    if index < stage_count - 1 {
        let (_, write_end) = pipes[index];
        if let Err(errno) = unistd::dup2(write_end, 1) {
            eprintln!("{}", SystemError::Dup2(errno));
            std::process::exit(1);
        }
    }
    trace!(stage = index, "wired stage stdin/stdout to pipeline pipes");
    for (r, w) in pipes {
        let _ = unistd::close(*r);
        let _ = unistd::close(*w);
    }

    if let Err(e) = apply_redirs(&stage.redirs) {
        eprintln!("{e}");
        std::process::exit(1);
    }

    if stage.argv.is_empty() {
        std::process::exit(0);
    }

    if builtin::is_builtin(&stage.argv[0]) {
        debug!(stage = index, argv = ?stage.argv, "running built-in in forked stage");
        let mut env = env.clone();
        let mut stdout = io::stdout();
        let mut stderr = io::stderr();
        let outcome = builtin::dispatch(&stage.argv, &mut env, &mut stdout, &mut stderr);
        std::process::exit(outcome.status() as i32);
    }

    exec_external(&stage.argv, env)
}

/// Resolves and `execve`s an external command. Only returns via
/// `std::process::exit` on any failure path (a successful `execve` never
/// returns).
fn exec_external(argv: &[String], env: &Env) -> ! {
    let path = match resolve_command(&argv[0]) {
        Ok(path) => path,
        Err(e) => {
            debug!(command = %argv[0], error = %e, "command resolution failed");
            eprintln!("{e}");
            let status = match e {
                ResolutionError::NotFound(_) => 127,
                ResolutionError::NotExecutable(_) => 126,
            };
            std::process::exit(status);
        }
    };
    debug!(command = %argv[0], resolved = %path, "resolved command, executing");

    let c_path = match CString::new(path) {
        Ok(c) => c,
        Err(_) => std::process::exit(1),
    };
    let c_argv: Vec<CString> = argv
        .iter()
        .filter_map(|a| CString::new(a.as_str()).ok())
        .collect();
    let envp = match env.envp() {
        Ok(envp) => envp,
        Err(_) => std::process::exit(1),
    };

    match unistd::execve(&c_path, &c_argv, &envp) {
        Ok(_) => unreachable!("execve only returns on error"),
        Err(_) => std::process::exit(126),
    }
}

/// Resolves `name` to an executable path: verbatim if it contains `/`,
/// otherwise the first match in `$PATH`. A verbatim path that doesn't
/// exist at all is reported as not-found (127), distinct from one that
/// exists but lacks the executable bit (126, permission denied).
fn resolve_command(name: &str) -> Result<String, ResolutionError> {
    if name.contains('/') {
        let path = Path::new(name);
        if !path.exists() {
            return Err(ResolutionError::NotFound(name.to_string()));
        }
        return if is_executable_file(path) {
            Ok(name.to_string())
        } else {
            Err(ResolutionError::NotExecutable(name.to_string()))
        };
    }

    let path_var = std::env::var("PATH").unwrap_or_default();
    for dir in path_var.split(':') {
        let dir = if dir.is_empty() { "." } else { dir };
        let candidate = Path::new(dir).join(name);
        if is_executable_file(&candidate) {
            return Ok(candidate.to_string_lossy().into_owned());
        }
    }
    Err(ResolutionError::NotFound(name.to_string()))
}

fn is_executable_file(path: &Path) -> bool {
    unistd::access(path, unistd::AccessFlags::X_OK).is_ok() && path.is_file()
}

/// Applies every redirection in `redirs`, left to right, to the current
/// process's fds. A later redirection of the same fd overrides an earlier
/// one, matching shell semantics for repeated `>`/`<` on one command.
fn apply_redirs(redirs: &[ExecRedir]) -> Result<(), ShellError> {
    for redir in redirs {
        match redir.op {
            RedirOp::In => open_and_dup(&redir.target, OFlag::O_RDONLY, Mode::empty(), 0)?,
            RedirOp::Out => open_and_dup(
                &redir.target,
                OFlag::O_WRONLY | OFlag::O_CREAT | OFlag::O_TRUNC,
                Mode::from_bits_truncate(0o644),
                1,
            )?,
            RedirOp::Append => open_and_dup(
                &redir.target,
                OFlag::O_WRONLY | OFlag::O_CREAT | OFlag::O_APPEND,
                Mode::from_bits_truncate(0o644),
                1,
            )?,
            RedirOp::Heredoc => apply_heredoc(&redir.heredoc_body)?,
        }
    }
    Ok(())
}

fn open_and_dup(target: &str, flags: OFlag, mode: Mode, fd: RawFd) -> Result<(), ShellError> {
    let opened = fcntl::open(target, flags, mode).map_err(|errno| RedirError::Open {
        target: target.to_string(),
        source: io::Error::from_raw_os_error(errno as i32),
    })?;
    let dup_result = unistd::dup2(opened, fd);
    let _ = unistd::close(opened);
    dup_result.map_err(SystemError::Dup2)?;
    Ok(())
}

/// Writes `body` into an anonymous pipe and wires the read end to fd 0, so
/// the child sees the heredoc body as its stdin exactly as if it had been
/// redirected from a real file.
fn apply_heredoc(body: &str) -> Result<(), ShellError> {
    let (read_end, write_end) = unistd::pipe().map_err(|errno| RedirError::Open {
        target: "<<".to_string(),
        source: io::Error::from_raw_os_error(errno as i32),
    })?;

    // A heredoc body larger than the pipe buffer would deadlock a
    // single-process write; real shells fork a writer for this. This
    // shell's heredocs are small interactive entries, so a direct write
    // is sufficient (see DESIGN.md).
    let mut writer = PipeWriter(write_end);
    let _ = writer.write_all(body.as_bytes());
    drop(writer);

    let dup_result = unistd::dup2(read_end, 0);
    let _ = unistd::close(read_end);
    dup_result.map_err(SystemError::Dup2)?;
    Ok(())
}

struct PipeWriter(RawFd);

impl Write for PipeWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        unistd::write(self.0, buf).map_err(|errno| io::Error::from_raw_os_error(errno as i32))
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Drop for PipeWriter {
    fn drop(&mut self) {
        let _ = unistd::close(self.0);
    }
}

/// Waits for `pid` and maps its termination into a shell exit status: the
/// exit code if it exited normally, or `128 + signal` if killed by one. A
/// `SIGINT` kill additionally prints a bare newline so the next prompt
/// starts on its own line instead of appending to the interrupted one.
fn wait_for(pid: Pid) -> u8 {
    match waitpid(pid, None) {
        Ok(WaitStatus::Exited(_, code)) => code as u8,
        Ok(WaitStatus::Signaled(_, sig, _)) => {
            if sig == nix::sys::signal::Signal::SIGINT {
                println!();
            }
            128 + sig as u8
        }
        Ok(_) | Err(Errno::ECHILD) => 0,
        Err(_) => 1,
    }
}
