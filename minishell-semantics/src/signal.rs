//! The three signal dispositions named in the spec, switched explicitly at
//! well-defined transitions: right after every fork in the child, right
//! before and right after heredoc collection, and once at shell startup.
//!
//! The handler is kept async-signal-safe: it only flips an atomic flag.
//! Callers on the main thread inspect the flag after a blocking read
//! returns (or is interrupted) rather than doing any work inside the
//! handler itself (see DESIGN.md, "Signal handling").

use nix::sys::signal::{self, SaFlags, SigAction, SigHandler, SigSet, Signal};
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::trace;

static SIGINT_RECEIVED: AtomicBool = AtomicBool::new(false);

extern "C" fn record_sigint(_: libc::c_int) {
    SIGINT_RECEIVED.store(true, Ordering::SeqCst);
}

/// Consumes and returns whether SIGINT has been recorded since the last
/// call.
pub fn take_sigint() -> bool {
    SIGINT_RECEIVED.swap(false, Ordering::SeqCst)
}

/// A signal disposition context, one of the three named in §4.6.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Context {
    /// At the interactive prompt: SIGINT sets the flag (no SA_RESTART, so
    /// a blocked read returns EINTR immediately), SIGQUIT is ignored.
    Interactive,
    /// Between fork and exec, and in exec'd children: both signals revert
    /// to their default (terminating) disposition.
    Child,
    /// During heredoc collection: same handler as `Interactive`, but the
    /// heredoc collector interprets the flag as "abort the pipeline"
    /// rather than "redisplay the prompt".
    Heredoc,
}

/// Installs the disposition for `context`. Called once at startup
/// (`Interactive`), immediately before and after heredoc collection
/// (`Heredoc` / `Interactive`), and immediately after every fork in the
/// child (`Child`).
pub fn install(context: Context) -> nix::Result<()> {
    trace!(?context, "installing signal disposition");
    match context {
        Context::Interactive | Context::Heredoc => {
            let sigint_action =
                SigAction::new(SigHandler::Handler(record_sigint), SaFlags::empty(), SigSet::empty());
            let sigquit_action =
                SigAction::new(SigHandler::SigIgn, SaFlags::empty(), SigSet::empty());
            // SAFETY: both handlers only touch an atomic flag via async-signal-safe
            // operations, satisfying sigaction's safety requirement.
            unsafe {
                signal::sigaction(Signal::SIGINT, &sigint_action)?;
                signal::sigaction(Signal::SIGQUIT, &sigquit_action)?;
            }
        }
        Context::Child => {
            let default_action = SigAction::new(SigHandler::SigDfl, SaFlags::empty(), SigSet::empty());
            // SAFETY: SigDfl installs no custom handler at all.
            unsafe {
                signal::sigaction(Signal::SIGINT, &default_action)?;
                signal::sigaction(Signal::SIGQUIT, &default_action)?;
            }
        }
    }
    Ok(())
}
