//! The parsed command/pipeline representation.
//!
//! Collapses the source shell's seven parallel string arrays per command
//! (`cmd`, `flags`, `args`, `input`, `output`, `heredoc`, `append`) into one
//! `argv` sequence and one order-preserving `redirs` sequence tagged with
//! their operator (see DESIGN.md). Redirection order is load-bearing:
//! later redirections of the same fd override earlier ones, and all of
//! them — including heredocs whose result is discarded — must still be
//! applied for their side effects.

use crate::token::Token;

/// A redirection operator.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum RedirOp {
    In,
    Out,
    Append,
    Heredoc,
}

/// One redirection attached to a [`Command`].
///
/// `target` is the WORD token following the operator, as lexed. For
/// `In`/`Out`/`Append` it is subject to expansion like any other word (see
/// `minishell-semantics`'s expander). For `Heredoc` it is the delimiter and
/// is NEVER expanded — it is compared verbatim against each line read, and
/// whether it was entirely unquoted decides whether the body is expanded
/// (§4.4). `heredoc_body` is filled in by the heredoc collector before
/// execution.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Redir {
    pub op: RedirOp,
    pub target: Token,
    pub heredoc_body: Option<String>,
}

impl Redir {
    pub fn new(op: RedirOp, target: Token) -> Self {
        Redir {
            op,
            target,
            heredoc_body: None,
        }
    }
}

/// One pipeline stage: a command name plus arguments, plus its ordered
/// redirections. `argv` is empty only when the stage consists solely of
/// redirection side effects (e.g. the input `> f` alone).
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Command {
    pub argv: Vec<Token>,
    pub redirs: Vec<Redir>,
}

impl Command {
    pub fn is_empty(&self) -> bool {
        self.argv.is_empty() && self.redirs.is_empty()
    }
}

/// A pipeline of one or more [`Command`]s connected by `|`.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Pipeline {
    pub commands: Vec<Command>,
}

impl Pipeline {
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}
